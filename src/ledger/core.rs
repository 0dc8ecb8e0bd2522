//! Main ledger orchestrator that coordinates companies, journals and reports

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use std::collections::HashMap;

use crate::backup::{self, CompanySnapshot};
use crate::ledger::journal::JournalEngine;
use crate::ledger::projector::{self, LedgerIntegrityReport};
use crate::ledger::registry::AccountRegistry;
use crate::reports::consolidation::{
    self, ConsolidatedBalanceSheet, ConsolidatedIncomeStatement, EliminationSet,
};
use crate::reports::statements::{self, BalanceSheet, IncomeStatement};
use crate::tax::{self, VatPosition, VatRateTable};
use crate::traits::*;
use crate::types::*;

/// Multi-company accounting system over a storage backend.
///
/// All writes funnel through the journal engine and require `&mut self`, so
/// a `Ledger` value is a serialized writer; reads borrow immutably and may
/// run concurrently across clones of the backend.
pub struct Ledger<S: LedgerStorage> {
    registry: AccountRegistry<S>,
    journal: JournalEngine<S>,
    storage: S,
}

impl<S: LedgerStorage + Clone> Ledger<S> {
    /// Create a ledger with the standard UK VAT rate table
    pub fn new(storage: S) -> Self {
        Self::with_vat_table(storage, VatRateTable::uk())
    }

    /// Create a ledger with an injected VAT rate table (configuration,
    /// never hardcoded business rules)
    pub fn with_vat_table(storage: S, vat_table: VatRateTable) -> Self {
        Self {
            registry: AccountRegistry::new(storage.clone()),
            journal: JournalEngine::with_vat_table(storage.clone(), vat_table),
            storage,
        }
    }

    /// The VAT rate table in effect
    pub fn vat_table(&self) -> &VatRateTable {
        self.journal.vat_table()
    }

    // Company administration

    /// Create a new company
    pub async fn create_company(
        &mut self,
        name: impl Into<String>,
        base_currency: impl Into<String>,
        vat_registered: bool,
    ) -> LedgerResult<Company> {
        self.registry
            .create_company(name.into(), base_currency.into(), vat_registered)
            .await
    }

    /// Rename a company
    pub async fn rename_company(
        &mut self,
        company_id: CompanyId,
        name: impl Into<String>,
    ) -> LedgerResult<()> {
        self.registry.rename_company(company_id, name.into()).await
    }

    /// Get a company by id
    pub async fn get_company(&self, company_id: CompanyId) -> LedgerResult<Option<Company>> {
        self.registry.get_company(company_id).await
    }

    /// List all companies
    pub async fn list_companies(&self) -> LedgerResult<Vec<Company>> {
        self.registry.list_companies().await
    }

    // Account administration

    /// Create an account in a company's chart
    pub async fn create_account(
        &mut self,
        company_id: CompanyId,
        code: impl Into<String>,
        name: impl Into<String>,
        account_type: AccountType,
    ) -> LedgerResult<Account> {
        self.registry
            .create_account(company_id, code.into(), name.into(), account_type)
            .await
    }

    /// Deactivate an account (kept for history, closed to new postings)
    pub async fn deactivate_account(
        &mut self,
        company_id: CompanyId,
        code: &str,
    ) -> LedgerResult<()> {
        self.registry.deactivate_account(company_id, code).await
    }

    /// Get an account by company and code
    pub async fn get_account(
        &self,
        company_id: CompanyId,
        code: &str,
    ) -> LedgerResult<Option<Account>> {
        self.registry.get_account(company_id, code).await
    }

    /// List a company's accounts, optionally filtered by type
    pub async fn list_accounts(
        &self,
        company_id: CompanyId,
        account_type: Option<AccountType>,
    ) -> LedgerResult<Vec<Account>> {
        self.registry.list_accounts(company_id, account_type).await
    }

    /// Install the standard UK small-business chart of accounts
    pub async fn install_standard_chart(
        &mut self,
        company_id: CompanyId,
    ) -> LedgerResult<HashMap<String, Account>> {
        self.registry.install_standard_chart(company_id).await
    }

    // Journal - the sole mutation surface

    /// Validate and post a transaction; returns the new transaction id
    pub async fn post(
        &mut self,
        company_id: CompanyId,
        date: NaiveDate,
        description: impl Into<String>,
        lines: Vec<LineInput>,
    ) -> LedgerResult<TransactionId> {
        self.journal
            .post(company_id, date, description.into(), lines)
            .await
    }

    /// Reverse a posted transaction as of `date`
    pub async fn reverse(
        &mut self,
        transaction_id: TransactionId,
        date: NaiveDate,
    ) -> LedgerResult<TransactionId> {
        self.journal.reverse(transaction_id, date).await
    }

    /// Get a transaction by id
    pub async fn get_transaction(
        &self,
        transaction_id: TransactionId,
    ) -> LedgerResult<Option<Transaction>> {
        self.journal.get_transaction(transaction_id).await
    }

    /// List a company's transactions in posting order
    pub async fn get_transactions(
        &self,
        company_id: CompanyId,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> LedgerResult<Vec<Transaction>> {
        self.journal
            .get_transactions(company_id, start_date, end_date)
            .await
    }

    // Projections and reports - read-only surface

    /// An account's net balance as of a date
    pub async fn balance_as_of(
        &self,
        company_id: CompanyId,
        code: &str,
        as_of_date: NaiveDate,
    ) -> LedgerResult<BigDecimal> {
        projector::balance_as_of(&self.storage, company_id, code, as_of_date).await
    }

    /// An account's signed activity strictly within a period
    pub async fn movement(
        &self,
        company_id: CompanyId,
        code: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> LedgerResult<BigDecimal> {
        projector::movement(&self.storage, company_id, code, start_date, end_date).await
    }

    /// Trial balance as of a date
    pub async fn trial_balance(
        &self,
        company_id: CompanyId,
        as_of_date: NaiveDate,
    ) -> LedgerResult<TrialBalance> {
        projector::trial_balance(&self.storage, company_id, as_of_date).await
    }

    /// Audit the ledger's invariants as of a date
    pub async fn verify_integrity(
        &self,
        company_id: CompanyId,
        as_of_date: NaiveDate,
    ) -> LedgerResult<LedgerIntegrityReport> {
        projector::verify_integrity(&self.storage, company_id, as_of_date).await
    }

    /// Net VAT position for a period
    pub async fn vat_position(
        &self,
        company_id: CompanyId,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> LedgerResult<VatPosition> {
        self.registry.get_company_required(company_id).await?;
        tax::vat_position(
            &self.storage,
            self.journal.vat_table(),
            company_id,
            period_start,
            period_end,
        )
        .await
    }

    /// Balance sheet as of a date
    pub async fn balance_sheet(
        &self,
        company_id: CompanyId,
        as_of_date: NaiveDate,
    ) -> LedgerResult<BalanceSheet> {
        statements::balance_sheet(&self.storage, company_id, as_of_date).await
    }

    /// Income statement for a period
    pub async fn income_statement(
        &self,
        company_id: CompanyId,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> LedgerResult<IncomeStatement> {
        statements::income_statement(&self.storage, company_id, start_date, end_date).await
    }

    /// Consolidated balance sheet across companies
    pub async fn consolidated(
        &self,
        company_ids: &[CompanyId],
        as_of_date: NaiveDate,
        eliminations: Option<&EliminationSet>,
    ) -> LedgerResult<ConsolidatedBalanceSheet> {
        consolidation::consolidated(&self.storage, company_ids, as_of_date, eliminations).await
    }

    /// Consolidated income statement across companies
    pub async fn consolidated_income(
        &self,
        company_ids: &[CompanyId],
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> LedgerResult<ConsolidatedIncomeStatement> {
        consolidation::consolidated_income(&self.storage, company_ids, start_date, end_date).await
    }

    // Backup

    /// Export one company's books as a serializable snapshot
    pub async fn export_company(&self, company_id: CompanyId) -> LedgerResult<CompanySnapshot> {
        backup::export_company(&self.storage, company_id).await
    }

    /// Restore a company snapshot into this system
    pub async fn restore_company(&mut self, snapshot: &CompanySnapshot) -> LedgerResult<()> {
        backup::restore_company(&mut self.storage, snapshot).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::journal::patterns;
    use crate::utils::memory_store::MemoryStore;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn basic_workflow() {
        let mut ledger = Ledger::new(MemoryStore::new());

        let company = ledger
            .create_company("Tech Solutions Ltd", "GBP", true)
            .await
            .unwrap();
        ledger
            .create_account(company.id, "1000", "Cash", AccountType::Asset)
            .await
            .unwrap();
        ledger
            .create_account(company.id, "4000", "Sales", AccountType::Income)
            .await
            .unwrap();

        ledger
            .post(
                company.id,
                date(2024, 1, 1),
                "Cash sale",
                patterns::sales_receipt("1000", "4000", BigDecimal::from(1000)),
            )
            .await
            .unwrap();

        assert_eq!(
            ledger
                .balance_as_of(company.id, "1000", date(2024, 1, 1))
                .await
                .unwrap(),
            BigDecimal::from(1000)
        );

        let statement = ledger
            .income_statement(company.id, date(2024, 1, 1), date(2024, 1, 31))
            .await
            .unwrap();
        assert_eq!(statement.net_income, BigDecimal::from(1000));

        let sheet = ledger
            .balance_sheet(company.id, date(2024, 1, 1))
            .await
            .unwrap();
        assert_eq!(sheet.total_assets, BigDecimal::from(1000));
        assert_eq!(sheet.total_equity, BigDecimal::from(1000));
    }
}
