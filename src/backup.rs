//! Durable export/import of a company's books
//!
//! A [`CompanySnapshot`] is the stable backup representation: the company,
//! its chart of accounts, and the ordered transaction log. Balances and
//! reports are projections, so a snapshot restored into an empty system
//! reproduces them exactly.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::traits::*;
use crate::types::*;

/// Serializable backup of one company's books
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanySnapshot {
    /// When the snapshot was taken
    pub exported_at: NaiveDateTime,
    pub company: Company,
    /// Full chart of accounts, including deactivated accounts
    pub accounts: Vec<Account>,
    /// The journal in posting order
    pub transactions: Vec<Transaction>,
}

/// Export a company's books as a snapshot
pub async fn export_company<S: LedgerStorage>(
    storage: &S,
    company_id: CompanyId,
) -> LedgerResult<CompanySnapshot> {
    let company = storage
        .get_company(company_id)
        .await?
        .ok_or(LedgerError::CompanyNotFound(company_id))?;
    let accounts = storage.list_accounts(company_id, None).await?;
    let transactions = storage.get_transactions(company_id, None, None).await?;

    Ok(CompanySnapshot {
        exported_at: chrono::Utc::now().naive_utc(),
        company,
        accounts,
        transactions,
    })
}

/// Restore a snapshot into storage.
///
/// The target company id must not already exist. Each transaction is
/// structurally re-validated before appending, and appends go through the
/// same atomic path as live postings, so a tampered snapshot is rejected
/// rather than silently loaded.
pub async fn restore_company<S: LedgerStorage>(
    storage: &mut S,
    snapshot: &CompanySnapshot,
) -> LedgerResult<()> {
    let company_id = snapshot.company.id;
    if storage.get_company(company_id).await?.is_some() {
        return Err(LedgerError::Validation(format!(
            "Company {company_id} already exists; restore requires a fresh id"
        )));
    }

    storage.save_company(&snapshot.company).await?;

    for account in &snapshot.accounts {
        if account.company_id != company_id {
            return Err(LedgerError::Validation(format!(
                "Account '{}' does not belong to company {company_id}",
                account.code
            )));
        }
        storage.save_account(account).await?;
    }

    for transaction in &snapshot.transactions {
        if transaction.company_id != company_id {
            return Err(LedgerError::Validation(format!(
                "Transaction {} does not belong to company {company_id}",
                transaction.id
            )));
        }
        transaction.validate()?;
        storage.append_transaction(transaction).await?;
    }

    info!(
        company = %company_id,
        accounts = snapshot.accounts.len(),
        transactions = snapshot.transactions.len(),
        "company restored from snapshot"
    );
    Ok(())
}
