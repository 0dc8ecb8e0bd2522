//! Core types and data structures for the accounting system

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Account types following standard accounting principles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountType {
    /// Assets - what the business owns (Cash, Inventory, Equipment, etc.)
    Asset,
    /// Liabilities - what the business owes (Loans, VAT Payable, etc.)
    Liability,
    /// Equity - owner's interest in the business (Capital, Retained Earnings, etc.)
    Equity,
    /// Income/Revenue - money earned by the business
    Income,
    /// Expenses - costs incurred by the business
    Expense,
}

impl AccountType {
    /// Returns the normal balance side for this account type.
    /// Assets and Expenses normally carry debit balances;
    /// Liabilities, Equity, and Income normally carry credit balances.
    pub fn normal_side(&self) -> Side {
        match self {
            AccountType::Asset | AccountType::Expense => Side::Debit,
            AccountType::Liability | AccountType::Equity | AccountType::Income => Side::Credit,
        }
    }
}

impl FromStr for AccountType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asset" => Ok(AccountType::Asset),
            "liability" => Ok(AccountType::Liability),
            "equity" => Ok(AccountType::Equity),
            "income" => Ok(AccountType::Income),
            "expense" => Ok(AccountType::Expense),
            other => Err(LedgerError::InvalidAccountType(other.to_string())),
        }
    }
}

/// The two sides of a double-entry posting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Debit - increases Assets and Expenses, decreases Liabilities, Equity, and Income
    Debit,
    /// Credit - increases Liabilities, Equity, and Income, decreases Assets and Expenses
    Credit,
}

impl Side {
    /// The opposite side, used when reversing a posting
    pub fn opposite(&self) -> Side {
        match self {
            Side::Debit => Side::Credit,
            Side::Credit => Side::Debit,
        }
    }
}

/// Unique identifier for a company
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CompanyId(Uuid);

impl CompanyId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CompanyId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CompanyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Unique identifier for a posted transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TransactionId(Uuid);

impl TransactionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TransactionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A company with its own chart of accounts and journal.
/// Companies never share accounts or transactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    /// Unique identifier
    pub id: CompanyId,
    /// Legal/trading name
    pub name: String,
    /// ISO currency code all amounts are expressed in (e.g. "GBP")
    pub base_currency: String,
    /// Whether the company is registered for VAT
    pub vat_registered: bool,
    /// When the company was created
    pub created_at: NaiveDateTime,
}

impl Company {
    pub fn new(name: String, base_currency: String, vat_registered: bool) -> Self {
        Self {
            id: CompanyId::new(),
            name,
            base_currency,
            vat_registered,
            created_at: chrono::Utc::now().naive_utc(),
        }
    }
}

/// An account in a company's chart of accounts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Owning company
    pub company_id: CompanyId,
    /// Account code, unique within the company (e.g. "1000")
    pub code: String,
    /// Human-readable account name
    pub name: String,
    /// Type of account (Asset, Liability, etc.)
    pub account_type: AccountType,
    /// Deactivated accounts reject new postings but stay visible in history
    pub active: bool,
    /// When the account was created
    pub created_at: NaiveDateTime,
}

impl Account {
    pub fn new(
        company_id: CompanyId,
        code: String,
        name: String,
        account_type: AccountType,
    ) -> Self {
        Self {
            company_id,
            code,
            name,
            account_type,
            active: true,
            created_at: chrono::Utc::now().naive_utc(),
        }
    }

    /// The side this account's balance is conventionally positive on.
    /// Derived from the account type, never stored.
    pub fn normal_side(&self) -> Side {
        self.account_type.normal_side()
    }
}

/// VAT recorded against a single line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VatCharge {
    /// Code from the injected VAT rate table (e.g. "S")
    pub code: String,
    /// VAT amount, rounded to two decimal places at the line
    pub amount: BigDecimal,
}

/// A single posted line within a transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    /// Code of the account being affected
    pub account: String,
    /// Debit or Credit
    pub side: Side,
    /// Positive amount with at most two decimal places
    pub amount: BigDecimal,
    /// Optional VAT tracked against this line
    pub vat: Option<VatCharge>,
}

/// Line as submitted to the journal engine. VAT amounts are computed at
/// posting time from the rate table, so callers only name the code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineInput {
    pub account: String,
    pub side: Side,
    pub amount: BigDecimal,
    pub vat_code: Option<String>,
}

impl LineInput {
    pub fn new(account: impl Into<String>, side: Side, amount: BigDecimal) -> Self {
        Self {
            account: account.into(),
            side,
            amount,
            vat_code: None,
        }
    }

    /// Create a debit line
    pub fn debit(account: impl Into<String>, amount: BigDecimal) -> Self {
        Self::new(account, Side::Debit, amount)
    }

    /// Create a credit line
    pub fn credit(account: impl Into<String>, amount: BigDecimal) -> Self {
        Self::new(account, Side::Credit, amount)
    }

    /// Tag this line with a VAT code from the rate table
    pub fn with_vat(mut self, code: impl Into<String>) -> Self {
        self.vat_code = Some(code.into());
        self
    }
}

/// An immutable journal transaction. Once appended it is never modified or
/// deleted; corrections are posted as reversing transactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier
    pub id: TransactionId,
    /// Owning company
    pub company_id: CompanyId,
    /// Effective date of the transaction
    pub date: NaiveDate,
    /// Description of the transaction
    pub description: String,
    /// Ordered lines making up the posting
    pub lines: Vec<Line>,
    /// When the transaction was appended to the journal
    pub posted_at: NaiveDateTime,
    /// Set when this transaction reverses an earlier one
    pub reverses: Option<TransactionId>,
}

impl Transaction {
    /// Sum of debit-side line amounts
    pub fn total_debits(&self) -> BigDecimal {
        self.lines
            .iter()
            .filter(|l| l.side == Side::Debit)
            .map(|l| &l.amount)
            .sum()
    }

    /// Sum of credit-side line amounts
    pub fn total_credits(&self) -> BigDecimal {
        self.lines
            .iter()
            .filter(|l| l.side == Side::Credit)
            .map(|l| &l.amount)
            .sum()
    }

    /// Whether debits equal credits exactly
    pub fn is_balanced(&self) -> bool {
        self.total_debits() == self.total_credits()
    }

    /// Structural validation: at least two lines, positive two-decimal
    /// amounts, exact balance. Account and VAT reference checks are the
    /// journal engine's job.
    pub fn validate(&self) -> LedgerResult<()> {
        if self.lines.len() < 2 {
            return Err(LedgerError::InsufficientLines(self.lines.len()));
        }

        for line in &self.lines {
            if line.amount <= BigDecimal::from(0) || !has_max_two_dp(&line.amount) {
                return Err(LedgerError::InvalidAmount(line.amount.clone()));
            }
        }

        let debits = self.total_debits();
        let credits = self.total_credits();
        if debits != credits {
            return Err(LedgerError::UnbalancedEntry { debits, credits });
        }

        Ok(())
    }
}

/// Round an amount to two decimal places
pub fn round2(amount: &BigDecimal) -> BigDecimal {
    amount.round(2)
}

/// Whether an amount has at most two decimal places
pub fn has_max_two_dp(amount: &BigDecimal) -> bool {
    *amount == amount.round(2)
}

/// Trial balance - every account's balance in its debit or credit column
/// as of a point in time, with the zero-sum check exposed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialBalance {
    /// Company the trial balance belongs to
    pub company_id: CompanyId,
    /// Date of the trial balance
    pub as_of_date: NaiveDate,
    /// Account balances keyed by account code
    pub balances: HashMap<String, AccountBalance>,
    /// Total of the debit column
    pub total_debits: BigDecimal,
    /// Total of the credit column
    pub total_credits: BigDecimal,
    /// Whether the two columns agree - the primary consistency check
    pub is_balanced: bool,
}

/// A single account's position in a trial balance. Balances sit in the
/// column of their normal side; a negative balance flips to the other column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountBalance {
    /// Account information
    pub account: Account,
    /// Debit column balance (if applicable)
    pub debit_balance: Option<BigDecimal>,
    /// Credit column balance (if applicable)
    pub credit_balance: Option<BigDecimal>,
}

impl AccountBalance {
    /// The balance amount regardless of column
    pub fn balance_amount(&self) -> BigDecimal {
        self.debit_balance
            .clone()
            .or_else(|| self.credit_balance.clone())
            .unwrap_or_else(|| BigDecimal::from(0))
    }
}

/// How an error should be interpreted by callers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Bad input, rejected before any mutation
    Validation,
    /// Unknown company/account/VAT code/transaction; log unchanged
    Reference,
    /// Ledger corruption detected downstream; surfaced, never repaired
    Integrity,
    /// Storage backend failure
    Storage,
}

/// Errors that can occur in the ledger system
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Company not found: {0}")]
    CompanyNotFound(CompanyId),
    #[error("Account '{code}' already exists in company {company}")]
    DuplicateAccountCode { company: CompanyId, code: String },
    #[error("Unrecognized account type: {0}")]
    InvalidAccountType(String),
    #[error("Account not found: '{code}' in company {company}")]
    AccountNotFound { company: CompanyId, code: String },
    #[error("Account '{code}' in company {company} is deactivated")]
    AccountInactive { company: CompanyId, code: String },
    #[error("Transaction not found: {0}")]
    TransactionNotFound(TransactionId),
    #[error("Transaction {original} was already reversed by {reversal}")]
    AlreadyReversed {
        original: TransactionId,
        reversal: TransactionId,
    },
    #[error("Unbalanced entry: debits = {debits}, credits = {credits}")]
    UnbalancedEntry {
        debits: BigDecimal,
        credits: BigDecimal,
    },
    #[error("Transaction requires at least two lines, got {0}")]
    InsufficientLines(usize),
    #[error("Invalid amount: {0} (must be positive with at most two decimal places)")]
    InvalidAmount(BigDecimal),
    #[error("Unknown VAT code: {0}")]
    UnknownVatCode(String),
    #[error("Company {0} is not VAT registered")]
    VatNotRegistered(CompanyId),
    #[error("Ledger out of balance: assets = {assets}, liabilities + equity = {liabilities_and_equity}")]
    UnbalancedLedger {
        assets: BigDecimal,
        liabilities_and_equity: BigDecimal,
    },
    #[error(
        "Elimination mismatch: {receivable_company}/{receivable_code} = {receivable_balance}, \
         {payable_company}/{payable_code} = {payable_balance}"
    )]
    EliminationMismatch {
        receivable_company: CompanyId,
        receivable_code: String,
        receivable_balance: BigDecimal,
        payable_company: CompanyId,
        payable_code: String,
        payable_balance: BigDecimal,
    },
    #[error("Validation error: {0}")]
    Validation(String),
}

impl LedgerError {
    /// Classify the error so callers can tell bad input from ledger
    /// integrity violations
    pub fn class(&self) -> ErrorClass {
        match self {
            LedgerError::Storage(_) => ErrorClass::Storage,
            LedgerError::CompanyNotFound(_)
            | LedgerError::AccountNotFound { .. }
            | LedgerError::TransactionNotFound(_)
            | LedgerError::UnknownVatCode(_) => ErrorClass::Reference,
            LedgerError::UnbalancedLedger { .. } | LedgerError::EliminationMismatch { .. } => {
                ErrorClass::Integrity
            }
            LedgerError::DuplicateAccountCode { .. }
            | LedgerError::InvalidAccountType(_)
            | LedgerError::AccountInactive { .. }
            | LedgerError::AlreadyReversed { .. }
            | LedgerError::UnbalancedEntry { .. }
            | LedgerError::InsufficientLines(_)
            | LedgerError::InvalidAmount(_)
            | LedgerError::VatNotRegistered(_)
            | LedgerError::Validation(_) => ErrorClass::Validation,
        }
    }
}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;
