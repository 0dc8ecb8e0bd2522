//! In-memory storage implementation for testing and development

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::traits::*;
use crate::types::*;

/// Per-company append-only journals plus the reversal index. Kept behind a
/// single lock so an append and its reversal bookkeeping are atomic.
#[derive(Debug, Default)]
struct Journal {
    by_company: HashMap<CompanyId, Vec<Transaction>>,
    company_of: HashMap<TransactionId, CompanyId>,
    reversals: HashMap<TransactionId, TransactionId>,
}

/// In-memory storage implementation for testing and development
#[derive(Debug, Clone)]
pub struct MemoryStore {
    companies: Arc<RwLock<HashMap<CompanyId, Company>>>,
    accounts: Arc<RwLock<HashMap<(CompanyId, String), Account>>>,
    journal: Arc<RwLock<Journal>>,
}

impl MemoryStore {
    /// Create a new memory store instance
    pub fn new() -> Self {
        Self {
            companies: Arc::new(RwLock::new(HashMap::new())),
            accounts: Arc::new(RwLock::new(HashMap::new())),
            journal: Arc::new(RwLock::new(Journal::default())),
        }
    }

    /// Clear all data (useful for testing)
    pub fn clear(&self) {
        self.companies.write().unwrap().clear();
        self.accounts.write().unwrap().clear();
        *self.journal.write().unwrap() = Journal::default();
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn in_range(date: NaiveDate, start: Option<NaiveDate>, end: Option<NaiveDate>) -> bool {
    if let Some(start) = start {
        if date < start {
            return false;
        }
    }
    if let Some(end) = end {
        if date > end {
            return false;
        }
    }
    true
}

#[async_trait]
impl LedgerStorage for MemoryStore {
    async fn save_company(&mut self, company: &Company) -> LedgerResult<()> {
        self.companies
            .write()
            .unwrap()
            .insert(company.id, company.clone());
        Ok(())
    }

    async fn get_company(&self, company_id: CompanyId) -> LedgerResult<Option<Company>> {
        Ok(self.companies.read().unwrap().get(&company_id).cloned())
    }

    async fn list_companies(&self) -> LedgerResult<Vec<Company>> {
        let mut companies: Vec<Company> =
            self.companies.read().unwrap().values().cloned().collect();
        companies.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(companies)
    }

    async fn save_account(&mut self, account: &Account) -> LedgerResult<()> {
        self.accounts
            .write()
            .unwrap()
            .insert((account.company_id, account.code.clone()), account.clone());
        Ok(())
    }

    async fn get_account(
        &self,
        company_id: CompanyId,
        code: &str,
    ) -> LedgerResult<Option<Account>> {
        Ok(self
            .accounts
            .read()
            .unwrap()
            .get(&(company_id, code.to_string()))
            .cloned())
    }

    async fn list_accounts(
        &self,
        company_id: CompanyId,
        account_type: Option<AccountType>,
    ) -> LedgerResult<Vec<Account>> {
        let accounts = self.accounts.read().unwrap();
        let mut filtered: Vec<Account> = accounts
            .values()
            .filter(|account| {
                account.company_id == company_id
                    && account_type.is_none_or(|t| account.account_type == t)
            })
            .cloned()
            .collect();
        filtered.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(filtered)
    }

    async fn append_transaction(&mut self, transaction: &Transaction) -> LedgerResult<()> {
        let mut journal = self.journal.write().unwrap();

        if journal.company_of.contains_key(&transaction.id) {
            return Err(LedgerError::Storage(format!(
                "duplicate transaction id {}",
                transaction.id
            )));
        }

        if let Some(original_id) = transaction.reverses {
            match journal.company_of.get(&original_id) {
                Some(company) if *company == transaction.company_id => {}
                _ => return Err(LedgerError::TransactionNotFound(original_id)),
            }
            if let Some(existing) = journal.reversals.get(&original_id) {
                return Err(LedgerError::AlreadyReversed {
                    original: original_id,
                    reversal: *existing,
                });
            }
            journal.reversals.insert(original_id, transaction.id);
        }

        journal
            .company_of
            .insert(transaction.id, transaction.company_id);
        journal
            .by_company
            .entry(transaction.company_id)
            .or_default()
            .push(transaction.clone());
        Ok(())
    }

    async fn get_transaction(
        &self,
        transaction_id: TransactionId,
    ) -> LedgerResult<Option<Transaction>> {
        let journal = self.journal.read().unwrap();
        let Some(company_id) = journal.company_of.get(&transaction_id) else {
            return Ok(None);
        };
        Ok(journal
            .by_company
            .get(company_id)
            .and_then(|txns| txns.iter().find(|t| t.id == transaction_id))
            .cloned())
    }

    async fn reversal_of(
        &self,
        transaction_id: TransactionId,
    ) -> LedgerResult<Option<TransactionId>> {
        Ok(self
            .journal
            .read()
            .unwrap()
            .reversals
            .get(&transaction_id)
            .copied())
    }

    async fn get_transactions(
        &self,
        company_id: CompanyId,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> LedgerResult<Vec<Transaction>> {
        let journal = self.journal.read().unwrap();
        Ok(journal
            .by_company
            .get(&company_id)
            .map(|txns| {
                txns.iter()
                    .filter(|t| in_range(t.date, start_date, end_date))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn get_account_transactions(
        &self,
        company_id: CompanyId,
        code: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> LedgerResult<Vec<Transaction>> {
        let journal = self.journal.read().unwrap();
        Ok(journal
            .by_company
            .get(&company_id)
            .map(|txns| {
                txns.iter()
                    .filter(|t| {
                        in_range(t.date, start_date, end_date)
                            && t.lines.iter().any(|l| l.account == code)
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;

    fn sample_transaction(company_id: CompanyId, reverses: Option<TransactionId>) -> Transaction {
        Transaction {
            id: TransactionId::new(),
            company_id,
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            description: "sample".to_string(),
            lines: vec![
                Line {
                    account: "1000".to_string(),
                    side: Side::Debit,
                    amount: BigDecimal::from(100),
                    vat: None,
                },
                Line {
                    account: "4000".to_string(),
                    side: Side::Credit,
                    amount: BigDecimal::from(100),
                    vat: None,
                },
            ],
            posted_at: chrono::Utc::now().naive_utc(),
            reverses,
        }
    }

    #[tokio::test]
    async fn append_preserves_posting_order() {
        let mut store = MemoryStore::new();
        let company_id = CompanyId::new();

        let first = sample_transaction(company_id, None);
        let second = sample_transaction(company_id, None);
        store.append_transaction(&first).await.unwrap();
        store.append_transaction(&second).await.unwrap();

        let txns = store.get_transactions(company_id, None, None).await.unwrap();
        assert_eq!(txns.len(), 2);
        assert_eq!(txns[0].id, first.id);
        assert_eq!(txns[1].id, second.id);
    }

    #[tokio::test]
    async fn second_reversal_is_rejected() {
        let mut store = MemoryStore::new();
        let company_id = CompanyId::new();

        let original = sample_transaction(company_id, None);
        store.append_transaction(&original).await.unwrap();

        let reversal = sample_transaction(company_id, Some(original.id));
        store.append_transaction(&reversal).await.unwrap();
        assert_eq!(
            store.reversal_of(original.id).await.unwrap(),
            Some(reversal.id)
        );

        let another = sample_transaction(company_id, Some(original.id));
        let err = store.append_transaction(&another).await.unwrap_err();
        assert!(matches!(err, LedgerError::AlreadyReversed { .. }));
        // the failed append must leave the journal untouched
        assert_eq!(
            store
                .get_transactions(company_id, None, None)
                .await
                .unwrap()
                .len(),
            2
        );
    }

    #[tokio::test]
    async fn reversal_of_foreign_transaction_is_rejected() {
        let mut store = MemoryStore::new();
        let company_a = CompanyId::new();
        let company_b = CompanyId::new();

        let original = sample_transaction(company_a, None);
        store.append_transaction(&original).await.unwrap();

        let cross = sample_transaction(company_b, Some(original.id));
        let err = store.append_transaction(&cross).await.unwrap_err();
        assert!(matches!(err, LedgerError::TransactionNotFound(_)));
    }
}
