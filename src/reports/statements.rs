//! Balance sheet and income statement generation
//!
//! Reports are pure derivations over the projected ledger: no side effects,
//! and identical inputs always produce identical output.

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ledger::projector;
use crate::traits::*;
use crate::types::*;

/// One account's row in a financial statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportLine {
    pub code: String,
    pub name: String,
    pub amount: BigDecimal,
}

/// Balance sheet as of a date. Generation fails with
/// [`LedgerError::UnbalancedLedger`] if the accounting equation does not
/// hold - that means the journal engine's invariant was violated upstream
/// and must never be masked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceSheet {
    pub company_id: CompanyId,
    pub as_of_date: NaiveDate,
    pub assets: Vec<ReportLine>,
    pub liabilities: Vec<ReportLine>,
    pub equity: Vec<ReportLine>,
    pub total_assets: BigDecimal,
    pub total_liabilities: BigDecimal,
    pub total_equity: BigDecimal,
}

/// Income statement for a period. Only activity dated within the window
/// counts; opening balances are excluded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeStatement {
    pub company_id: CompanyId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub revenue: Vec<ReportLine>,
    pub expenses: Vec<ReportLine>,
    pub total_revenue: BigDecimal,
    pub total_expenses: BigDecimal,
    pub net_income: BigDecimal,
}

/// Signed balance recovered from a trial-balance row: positive on the
/// account's normal side, negative if the balance flipped columns
fn signed_balance(entry: &AccountBalance) -> BigDecimal {
    let debit = entry
        .debit_balance
        .clone()
        .unwrap_or_else(|| BigDecimal::from(0));
    let credit = entry
        .credit_balance
        .clone()
        .unwrap_or_else(|| BigDecimal::from(0));
    match entry.account.normal_side() {
        Side::Debit => debit - credit,
        Side::Credit => credit - debit,
    }
}

fn section(trial: &TrialBalance, account_type: AccountType) -> (Vec<ReportLine>, BigDecimal) {
    let mut lines: Vec<ReportLine> = trial
        .balances
        .values()
        .filter(|entry| entry.account.account_type == account_type)
        .map(|entry| ReportLine {
            code: entry.account.code.clone(),
            name: entry.account.name.clone(),
            amount: signed_balance(entry),
        })
        .filter(|line| line.amount != BigDecimal::from(0))
        .collect();
    lines.sort_by(|a, b| a.code.cmp(&b.code));

    let total = lines.iter().map(|l| &l.amount).sum();
    (lines, total)
}

/// Generate a balance sheet as of a date. Net income to date is folded into
/// equity as a derived "Net Income" row so the statement reflects retained
/// earnings without a closing entry.
pub async fn balance_sheet<S: LedgerStorage>(
    storage: &S,
    company_id: CompanyId,
    as_of_date: NaiveDate,
) -> LedgerResult<BalanceSheet> {
    let trial = projector::trial_balance(storage, company_id, as_of_date).await?;

    let (assets, total_assets) = section(&trial, AccountType::Asset);
    let (liabilities, total_liabilities) = section(&trial, AccountType::Liability);
    let (mut equity, equity_base) = section(&trial, AccountType::Equity);
    let (_, total_income) = section(&trial, AccountType::Income);
    let (_, total_expenses) = section(&trial, AccountType::Expense);

    let net_income = &total_income - &total_expenses;
    if net_income != BigDecimal::from(0) {
        equity.push(ReportLine {
            code: "net_income".to_string(),
            name: "Net Income".to_string(),
            amount: net_income.clone(),
        });
    }
    let total_equity = equity_base + net_income;

    let liabilities_and_equity = &total_liabilities + &total_equity;
    if total_assets != liabilities_and_equity {
        return Err(LedgerError::UnbalancedLedger {
            assets: total_assets,
            liabilities_and_equity,
        });
    }

    Ok(BalanceSheet {
        company_id,
        as_of_date,
        assets,
        liabilities,
        equity,
        total_assets,
        total_liabilities,
        total_equity,
    })
}

/// Generate an income statement for `start_date..=end_date`
pub async fn income_statement<S: LedgerStorage>(
    storage: &S,
    company_id: CompanyId,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> LedgerResult<IncomeStatement> {
    storage
        .get_company(company_id)
        .await?
        .ok_or(LedgerError::CompanyNotFound(company_id))?;

    let mut revenue = Vec::new();
    let mut expenses = Vec::new();

    for account_type in [AccountType::Income, AccountType::Expense] {
        let accounts = storage.list_accounts(company_id, Some(account_type)).await?;
        for account in accounts {
            let amount =
                projector::movement(storage, company_id, &account.code, start_date, end_date)
                    .await?;
            if amount == BigDecimal::from(0) {
                continue;
            }
            let line = ReportLine {
                code: account.code,
                name: account.name,
                amount,
            };
            match account_type {
                AccountType::Income => revenue.push(line),
                _ => expenses.push(line),
            }
        }
    }

    revenue.sort_by(|a, b| a.code.cmp(&b.code));
    expenses.sort_by(|a, b| a.code.cmp(&b.code));

    let total_revenue: BigDecimal = revenue.iter().map(|l| &l.amount).sum();
    let total_expenses: BigDecimal = expenses.iter().map(|l| &l.amount).sum();
    let net_income = &total_revenue - &total_expenses;

    Ok(IncomeStatement {
        company_id,
        start_date,
        end_date,
        revenue,
        expenses,
        total_revenue,
        total_expenses,
        net_income,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::journal::{patterns, JournalEngine};
    use crate::ledger::registry::AccountRegistry;
    use crate::utils::memory_store::MemoryStore;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn fixture() -> (MemoryStore, CompanyId) {
        let store = MemoryStore::new();
        let mut registry = AccountRegistry::new(store.clone());
        let company = registry
            .create_company("Tech Solutions Ltd".to_string(), "GBP".to_string(), true)
            .await
            .unwrap();
        registry.install_standard_chart(company.id).await.unwrap();
        (store, company.id)
    }

    #[tokio::test]
    async fn simple_sale_balances_through_net_income() {
        let (store, company) = fixture().await;
        let mut engine = JournalEngine::new(store.clone());

        engine
            .post(
                company,
                date(2024, 1, 1),
                "Cash sale".to_string(),
                patterns::sales_receipt("1000", "4000", BigDecimal::from(1000)),
            )
            .await
            .unwrap();

        let sheet = balance_sheet(&store, company, date(2024, 1, 1)).await.unwrap();
        assert_eq!(sheet.total_assets, BigDecimal::from(1000));
        assert_eq!(sheet.total_liabilities, BigDecimal::from(0));
        assert_eq!(sheet.total_equity, BigDecimal::from(1000));
        // equity is carried entirely by the derived net income row
        assert_eq!(sheet.equity.len(), 1);
        assert_eq!(sheet.equity[0].name, "Net Income");

        let statement = income_statement(&store, company, date(2024, 1, 1), date(2024, 1, 31))
            .await
            .unwrap();
        assert_eq!(statement.net_income, BigDecimal::from(1000));
    }

    #[tokio::test]
    async fn income_statement_counts_period_activity_only() {
        let (store, company) = fixture().await;
        let mut engine = JournalEngine::new(store.clone());

        engine
            .post(
                company,
                date(2024, 1, 15),
                "January sale".to_string(),
                patterns::sales_receipt("1000", "4000", BigDecimal::from(800)),
            )
            .await
            .unwrap();
        engine
            .post(
                company,
                date(2024, 2, 15),
                "February sale".to_string(),
                patterns::sales_receipt("1000", "4000", BigDecimal::from(200)),
            )
            .await
            .unwrap();
        engine
            .post(
                company,
                date(2024, 2, 20),
                "February rent".to_string(),
                patterns::expense_payment("5200", "1000", BigDecimal::from(150)),
            )
            .await
            .unwrap();

        let feb = income_statement(&store, company, date(2024, 2, 1), date(2024, 2, 29))
            .await
            .unwrap();
        // January's 800 must not leak into February's statement
        assert_eq!(feb.total_revenue, BigDecimal::from(200));
        assert_eq!(feb.total_expenses, BigDecimal::from(150));
        assert_eq!(feb.net_income, BigDecimal::from(50));
    }

    #[tokio::test]
    async fn zero_balance_accounts_are_omitted() {
        let (store, company) = fixture().await;
        let mut engine = JournalEngine::new(store.clone());

        engine
            .post(
                company,
                date(2024, 1, 1),
                "Owner investment".to_string(),
                patterns::owner_investment("1000", "3000", BigDecimal::from(9000)),
            )
            .await
            .unwrap();

        let sheet = balance_sheet(&store, company, date(2024, 1, 31)).await.unwrap();
        assert_eq!(sheet.assets.len(), 1);
        assert_eq!(sheet.assets[0].code, "1000");
        assert!(sheet.liabilities.is_empty());
    }

    #[tokio::test]
    async fn reports_are_deterministic() {
        let (store, company) = fixture().await;
        let mut engine = JournalEngine::new(store.clone());

        engine
            .post(
                company,
                date(2024, 1, 1),
                "Sale".to_string(),
                patterns::sales_receipt("1000", "4000", BigDecimal::from(123)),
            )
            .await
            .unwrap();

        let first = balance_sheet(&store, company, date(2024, 1, 31)).await.unwrap();
        let second = balance_sheet(&store, company, date(2024, 1, 31)).await.unwrap();
        assert_eq!(first, second);
    }
}
