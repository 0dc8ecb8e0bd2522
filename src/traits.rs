//! Storage abstraction for the ledger system

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::types::*;

/// Storage backend for companies, charts of accounts and journals.
///
/// This trait lets the accounting core work with any backend (PostgreSQL,
/// SQLite, in-memory, etc.). Journals are append-only: there is no update or
/// delete for transactions, and implementations must keep each company's
/// transactions in posting order so projections are deterministic.
#[async_trait]
pub trait LedgerStorage: Send + Sync {
    /// Save a company (insert or update by id)
    async fn save_company(&mut self, company: &Company) -> LedgerResult<()>;

    /// Get a company by id
    async fn get_company(&self, company_id: CompanyId) -> LedgerResult<Option<Company>>;

    /// List all companies
    async fn list_companies(&self) -> LedgerResult<Vec<Company>>;

    /// Save an account (insert or update by company + code)
    async fn save_account(&mut self, account: &Account) -> LedgerResult<()>;

    /// Get an account by company and code
    async fn get_account(
        &self,
        company_id: CompanyId,
        code: &str,
    ) -> LedgerResult<Option<Account>>;

    /// List a company's accounts, optionally filtered by type
    async fn list_accounts(
        &self,
        company_id: CompanyId,
        account_type: Option<AccountType>,
    ) -> LedgerResult<Vec<Account>>;

    /// Append a transaction to its company's journal.
    ///
    /// Must be atomic: the transaction is appended with all its lines or not
    /// at all, and concurrent appends to one company are serialized. When
    /// `transaction.reverses` is set, the implementation must atomically
    /// verify that the original exists, belongs to the same company, and has
    /// no prior reversal - failing with [`LedgerError::AlreadyReversed`]
    /// otherwise.
    async fn append_transaction(&mut self, transaction: &Transaction) -> LedgerResult<()>;

    /// Get a transaction by id
    async fn get_transaction(
        &self,
        transaction_id: TransactionId,
    ) -> LedgerResult<Option<Transaction>>;

    /// The id of the transaction reversing `transaction_id`, if one exists
    async fn reversal_of(
        &self,
        transaction_id: TransactionId,
    ) -> LedgerResult<Option<TransactionId>>;

    /// List a company's transactions in posting order, filtered to
    /// `start_date..=end_date` where given
    async fn get_transactions(
        &self,
        company_id: CompanyId,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> LedgerResult<Vec<Transaction>>;

    /// List transactions touching a specific account, in posting order
    async fn get_account_transactions(
        &self,
        company_id: CompanyId,
        code: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> LedgerResult<Vec<Transaction>>;
}
