//! Company administration and the per-company chart of accounts

use std::collections::HashMap;
use tracing::{debug, info};

use crate::traits::*;
use crate::types::*;
use crate::utils::validation;

/// The standard UK small-business chart installed by
/// [`AccountRegistry::install_standard_chart`]
const STANDARD_CHART: &[(&str, &str, AccountType)] = &[
    // Assets (1000-1999)
    ("1000", "Cash", AccountType::Asset),
    ("1100", "Accounts Receivable", AccountType::Asset),
    ("1200", "Inventory", AccountType::Asset),
    ("1400", "VAT Recoverable", AccountType::Asset),
    ("1500", "Equipment", AccountType::Asset),
    ("1600", "Vehicles", AccountType::Asset),
    // Liabilities (2000-2999)
    ("2000", "Accounts Payable", AccountType::Liability),
    ("2100", "VAT Payable", AccountType::Liability),
    ("2500", "Bank Loan", AccountType::Liability),
    ("2600", "Credit Card", AccountType::Liability),
    // Equity (3000-3999)
    ("3000", "Owner's Capital", AccountType::Equity),
    ("3900", "Retained Earnings", AccountType::Equity),
    // Income (4000-4999)
    ("4000", "Product Sales", AccountType::Income),
    ("4100", "Service Revenue", AccountType::Income),
    ("4200", "Consulting Income", AccountType::Income),
    // Expenses (5000-5999)
    ("5000", "Cost of Goods Sold", AccountType::Expense),
    ("5100", "Salary Expense", AccountType::Expense),
    ("5200", "Rent Expense", AccountType::Expense),
    ("5300", "Utilities Expense", AccountType::Expense),
    ("5400", "Marketing Expense", AccountType::Expense),
    ("5500", "Office Supplies", AccountType::Expense),
    ("5600", "Travel Expense", AccountType::Expense),
    ("5700", "Professional Fees", AccountType::Expense),
];

/// Registry for companies and their charts of accounts
pub struct AccountRegistry<S: LedgerStorage> {
    pub(crate) storage: S,
}

impl<S: LedgerStorage> AccountRegistry<S> {
    /// Create a new registry over the given storage backend
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Create a new company with its own (initially empty) chart and journal
    pub async fn create_company(
        &mut self,
        name: String,
        base_currency: String,
        vat_registered: bool,
    ) -> LedgerResult<Company> {
        validation::validate_name(&name)?;
        validation::validate_currency(&base_currency)?;

        let company = Company::new(name, base_currency, vat_registered);
        self.storage.save_company(&company).await?;

        info!(company = %company.id, name = %company.name, "company created");
        Ok(company)
    }

    /// Rename a company
    pub async fn rename_company(&mut self, company_id: CompanyId, name: String) -> LedgerResult<()> {
        validation::validate_name(&name)?;
        let mut company = self.get_company_required(company_id).await?;
        company.name = name;
        self.storage.save_company(&company).await
    }

    /// Get a company by id
    pub async fn get_company(&self, company_id: CompanyId) -> LedgerResult<Option<Company>> {
        self.storage.get_company(company_id).await
    }

    /// Get a company by id, returning an error if not found
    pub async fn get_company_required(&self, company_id: CompanyId) -> LedgerResult<Company> {
        self.storage
            .get_company(company_id)
            .await?
            .ok_or(LedgerError::CompanyNotFound(company_id))
    }

    /// List all companies
    pub async fn list_companies(&self) -> LedgerResult<Vec<Company>> {
        self.storage.list_companies().await
    }

    /// Create a new account in a company's chart
    pub async fn create_account(
        &mut self,
        company_id: CompanyId,
        code: String,
        name: String,
        account_type: AccountType,
    ) -> LedgerResult<Account> {
        validation::validate_account_code(&code)?;
        validation::validate_name(&name)?;
        self.get_company_required(company_id).await?;

        if self.storage.get_account(company_id, &code).await?.is_some() {
            return Err(LedgerError::DuplicateAccountCode {
                company: company_id,
                code,
            });
        }

        let account = Account::new(company_id, code, name, account_type);
        self.storage.save_account(&account).await?;

        debug!(company = %company_id, code = %account.code, "account created");
        Ok(account)
    }

    /// Deactivate an account. Always permitted: the account stays in the
    /// chart for historical reporting, but the journal engine rejects new
    /// lines against it.
    pub async fn deactivate_account(
        &mut self,
        company_id: CompanyId,
        code: &str,
    ) -> LedgerResult<()> {
        let mut account = self.get_account_required(company_id, code).await?;
        account.active = false;
        self.storage.save_account(&account).await?;

        debug!(company = %company_id, code, "account deactivated");
        Ok(())
    }

    /// Get an account by company and code
    pub async fn get_account(
        &self,
        company_id: CompanyId,
        code: &str,
    ) -> LedgerResult<Option<Account>> {
        self.storage.get_account(company_id, code).await
    }

    /// Get an account by company and code, returning an error if not found
    pub async fn get_account_required(
        &self,
        company_id: CompanyId,
        code: &str,
    ) -> LedgerResult<Account> {
        self.storage
            .get_account(company_id, code)
            .await?
            .ok_or_else(|| LedgerError::AccountNotFound {
                company: company_id,
                code: code.to_string(),
            })
    }

    /// Get an account that new lines may be posted against: it must exist
    /// and be active
    pub async fn get_postable_account(
        &self,
        company_id: CompanyId,
        code: &str,
    ) -> LedgerResult<Account> {
        let account = self.get_account_required(company_id, code).await?;
        if !account.active {
            return Err(LedgerError::AccountInactive {
                company: company_id,
                code: code.to_string(),
            });
        }
        Ok(account)
    }

    /// List a company's accounts, optionally filtered by type
    pub async fn list_accounts(
        &self,
        company_id: CompanyId,
        account_type: Option<AccountType>,
    ) -> LedgerResult<Vec<Account>> {
        self.get_company_required(company_id).await?;
        self.storage.list_accounts(company_id, account_type).await
    }

    /// Install the standard UK small-business chart of accounts for a
    /// company. Returns the created accounts keyed by code.
    pub async fn install_standard_chart(
        &mut self,
        company_id: CompanyId,
    ) -> LedgerResult<HashMap<String, Account>> {
        let mut accounts = HashMap::new();

        for (code, name, account_type) in STANDARD_CHART {
            let account = self
                .create_account(
                    company_id,
                    (*code).to_string(),
                    (*name).to_string(),
                    *account_type,
                )
                .await?;
            accounts.insert(account.code.clone(), account);
        }

        Ok(accounts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::memory_store::MemoryStore;

    async fn registry_with_company() -> (AccountRegistry<MemoryStore>, Company) {
        let mut registry = AccountRegistry::new(MemoryStore::new());
        let company = registry
            .create_company("Tech Solutions Ltd".to_string(), "GBP".to_string(), true)
            .await
            .unwrap();
        (registry, company)
    }

    #[tokio::test]
    async fn duplicate_codes_are_rejected() {
        let (mut registry, company) = registry_with_company().await;

        registry
            .create_account(
                company.id,
                "1000".to_string(),
                "Cash".to_string(),
                AccountType::Asset,
            )
            .await
            .unwrap();

        let err = registry
            .create_account(
                company.id,
                "1000".to_string(),
                "Petty Cash".to_string(),
                AccountType::Asset,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::DuplicateAccountCode { .. }));
    }

    #[tokio::test]
    async fn same_code_allowed_across_companies() {
        let (mut registry, first) = registry_with_company().await;
        let second = registry
            .create_company(
                "Consulting Partners Ltd".to_string(),
                "GBP".to_string(),
                false,
            )
            .await
            .unwrap();

        for company_id in [first.id, second.id] {
            registry
                .create_account(
                    company_id,
                    "1000".to_string(),
                    "Cash".to_string(),
                    AccountType::Asset,
                )
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn deactivation_is_always_permitted() {
        let (mut registry, company) = registry_with_company().await;
        registry
            .create_account(
                company.id,
                "1000".to_string(),
                "Cash".to_string(),
                AccountType::Asset,
            )
            .await
            .unwrap();

        registry.deactivate_account(company.id, "1000").await.unwrap();

        let account = registry
            .get_account_required(company.id, "1000")
            .await
            .unwrap();
        assert!(!account.active);
        // still visible for historical reporting
        let all = registry.list_accounts(company.id, None).await.unwrap();
        assert_eq!(all.len(), 1);
        // but no longer postable
        let err = registry
            .get_postable_account(company.id, "1000")
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::AccountInactive { .. }));
    }

    #[tokio::test]
    async fn standard_chart_installs_expected_accounts() {
        let (mut registry, company) = registry_with_company().await;
        let chart = registry.install_standard_chart(company.id).await.unwrap();

        assert_eq!(chart["1000"].name, "Cash");
        assert_eq!(chart["2100"].name, "VAT Payable");
        assert_eq!(chart["2100"].account_type, AccountType::Liability);
        assert_eq!(chart["1400"].account_type, AccountType::Asset);

        let expenses = registry
            .list_accounts(company.id, Some(AccountType::Expense))
            .await
            .unwrap();
        assert_eq!(expenses.len(), 8);
    }
}
