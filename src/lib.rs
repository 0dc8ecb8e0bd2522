//! # BusinessFin Core
//!
//! A multi-company double-entry accounting engine: immutable per-company
//! journals, UK VAT tracking, and financial statements derived on demand.
//!
//! ## Features
//!
//! - **Double-entry bookkeeping**: balanced-transaction validation with an
//!   append-only journal per company; corrections are reversing entries,
//!   never edits
//! - **Account management**: Assets, Liabilities, Equity, Income and Expense
//!   accounts with derived normal balance sides and soft deactivation
//! - **UK VAT**: per-line VAT from an injected rate table (standard,
//!   reduced, zero-rated and exempt codes) and per-period net VAT positions
//! - **Financial reporting**: trial balances, balance sheets, income
//!   statements, and consolidated multi-company statements with
//!   inter-company eliminations
//! - **Backup**: serializable company snapshots that fully reconstruct
//!   balances and reports
//! - **Storage abstraction**: database-agnostic design with trait-based
//!   storage; an in-memory backend ships for tests and development
//!
//! ## Quick Start
//!
//! ```rust
//! use businessfin_core::{Ledger, AccountType, LineInput, MemoryStore};
//! use bigdecimal::BigDecimal;
//! use chrono::NaiveDate;
//!
//! # async fn demo() -> businessfin_core::LedgerResult<()> {
//! let mut ledger = Ledger::new(MemoryStore::new());
//! let company = ledger.create_company("Tech Solutions Ltd", "GBP", true).await?;
//! ledger.install_standard_chart(company.id).await?;
//!
//! let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! ledger.post(company.id, date, "Cash sale", vec![
//!     LineInput::debit("1000", BigDecimal::from(250)),
//!     LineInput::credit("4000", BigDecimal::from(250)),
//! ]).await?;
//!
//! let sheet = ledger.balance_sheet(company.id, date).await?;
//! assert_eq!(sheet.total_assets, BigDecimal::from(250));
//! # Ok(())
//! # }
//! ```

pub mod backup;
pub mod ledger;
pub mod reports;
pub mod tax;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use backup::*;
pub use ledger::*;
pub use reports::*;
pub use tax::*;
pub use traits::*;
pub use types::*;
pub use utils::memory_store::MemoryStore;

// Re-export posting patterns for convenience
pub use ledger::journal::patterns;
