//! Balance projection: pure, deterministic replay of the journal
//!
//! Nothing here mutates state or caches results. Balances, movements and
//! trial balances are recomputed from the transaction log on every call, so
//! the log remains the single source of truth - if any stored figure ever
//! disagreed with a projection, the log wins by construction.

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::traits::*;
use crate::types::*;

fn signed_delta(normal_side: Side, line: &Line) -> BigDecimal {
    if line.side == normal_side {
        line.amount.clone()
    } else {
        -line.amount.clone()
    }
}

/// Net balance of one account from all transactions dated on or before
/// `as_of_date`. Debits add on debit-normal accounts and subtract on
/// credit-normal ones; credits mirror.
pub async fn balance_as_of<S: LedgerStorage>(
    storage: &S,
    company_id: CompanyId,
    code: &str,
    as_of_date: NaiveDate,
) -> LedgerResult<BigDecimal> {
    let account = storage
        .get_account(company_id, code)
        .await?
        .ok_or_else(|| LedgerError::AccountNotFound {
            company: company_id,
            code: code.to_string(),
        })?;

    let transactions = storage
        .get_account_transactions(company_id, code, None, Some(as_of_date))
        .await?;

    let normal_side = account.normal_side();
    let mut balance = BigDecimal::from(0);
    for transaction in &transactions {
        for line in transaction.lines.iter().filter(|l| l.account == code) {
            balance += signed_delta(normal_side, line);
        }
    }

    Ok(balance)
}

/// Signed activity on one account strictly within `start_date..=end_date`,
/// excluding any opening balance. This is what period statements are built
/// from.
pub async fn movement<S: LedgerStorage>(
    storage: &S,
    company_id: CompanyId,
    code: &str,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> LedgerResult<BigDecimal> {
    let account = storage
        .get_account(company_id, code)
        .await?
        .ok_or_else(|| LedgerError::AccountNotFound {
            company: company_id,
            code: code.to_string(),
        })?;

    let transactions = storage
        .get_account_transactions(company_id, code, Some(start_date), Some(end_date))
        .await?;

    let normal_side = account.normal_side();
    let mut total = BigDecimal::from(0);
    for transaction in &transactions {
        for line in transaction.lines.iter().filter(|l| l.account == code) {
            total += signed_delta(normal_side, line);
        }
    }

    Ok(total)
}

/// Project every account's balance as of a date. Each balance lands in the
/// column of the account's normal side; negative balances flip to the other
/// column. For a correctly posted ledger the two columns always agree.
pub async fn trial_balance<S: LedgerStorage>(
    storage: &S,
    company_id: CompanyId,
    as_of_date: NaiveDate,
) -> LedgerResult<TrialBalance> {
    storage
        .get_company(company_id)
        .await?
        .ok_or(LedgerError::CompanyNotFound(company_id))?;

    let accounts = storage.list_accounts(company_id, None).await?;
    let mut balances = HashMap::new();
    let mut total_debits = BigDecimal::from(0);
    let mut total_credits = BigDecimal::from(0);

    for account in accounts {
        let balance = balance_as_of(storage, company_id, &account.code, as_of_date).await?;

        let account_balance = match account.normal_side() {
            Side::Debit => {
                if balance >= BigDecimal::from(0) {
                    total_debits += &balance;
                    AccountBalance {
                        account: account.clone(),
                        debit_balance: Some(balance),
                        credit_balance: None,
                    }
                } else {
                    total_credits += balance.abs();
                    AccountBalance {
                        account: account.clone(),
                        debit_balance: None,
                        credit_balance: Some(balance.abs()),
                    }
                }
            }
            Side::Credit => {
                if balance >= BigDecimal::from(0) {
                    total_credits += &balance;
                    AccountBalance {
                        account: account.clone(),
                        debit_balance: None,
                        credit_balance: Some(balance),
                    }
                } else {
                    total_debits += balance.abs();
                    AccountBalance {
                        account: account.clone(),
                        debit_balance: Some(balance.abs()),
                        credit_balance: None,
                    }
                }
            }
        };

        balances.insert(account.code.clone(), account_balance);
    }

    let is_balanced = total_debits == total_credits;

    Ok(TrialBalance {
        company_id,
        as_of_date,
        balances,
        total_debits,
        total_credits,
        is_balanced,
    })
}

/// Report on ledger integrity checks for one company
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerIntegrityReport {
    pub company_id: CompanyId,
    pub as_of_date: NaiveDate,
    pub is_valid: bool,
    pub issues: Vec<String>,
    pub trial_balance_total_debits: BigDecimal,
    pub trial_balance_total_credits: BigDecimal,
}

/// Audit a company's ledger: the trial balance must sum to zero and every
/// appended transaction must still pass structural validation. Violations
/// are reported, never repaired.
pub async fn verify_integrity<S: LedgerStorage>(
    storage: &S,
    company_id: CompanyId,
    as_of_date: NaiveDate,
) -> LedgerResult<LedgerIntegrityReport> {
    let trial = trial_balance(storage, company_id, as_of_date).await?;
    let mut issues = Vec::new();

    if !trial.is_balanced {
        issues.push(format!(
            "Trial balance does not sum to zero: debits = {}, credits = {}",
            trial.total_debits, trial.total_credits
        ));
    }

    let transactions = storage
        .get_transactions(company_id, None, Some(as_of_date))
        .await?;
    for transaction in &transactions {
        if let Err(err) = transaction.validate() {
            issues.push(format!("Transaction {} is invalid: {err}", transaction.id));
        }
    }

    Ok(LedgerIntegrityReport {
        company_id,
        as_of_date,
        is_valid: issues.is_empty(),
        issues,
        trial_balance_total_debits: trial.total_debits,
        trial_balance_total_credits: trial.total_credits,
    })
}
