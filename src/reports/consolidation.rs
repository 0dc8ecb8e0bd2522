//! Cross-company consolidated statements with inter-company eliminations

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ledger::projector;
use crate::reports::statements::{self, BalanceSheet, IncomeStatement};
use crate::traits::*;
use crate::types::*;

/// An inter-company receivable/payable pairing. At consolidation time both
/// balances must match exactly; the matched amount is netted to zero before
/// group totals are summed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EliminationPair {
    pub receivable_company: CompanyId,
    pub receivable_account: String,
    pub payable_company: CompanyId,
    pub payable_account: String,
}

/// Configured set of inter-company eliminations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EliminationSet {
    pub pairs: Vec<EliminationPair>,
}

/// Combined balance sheet across companies, retaining each company's own
/// statement alongside the group totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsolidatedBalanceSheet {
    pub as_of_date: NaiveDate,
    pub companies: Vec<BalanceSheet>,
    pub total_assets: BigDecimal,
    pub total_liabilities: BigDecimal,
    pub total_equity: BigDecimal,
    /// Inter-company balances netted out of assets and liabilities
    pub eliminated: BigDecimal,
}

/// Combined income statement across companies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsolidatedIncomeStatement {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub companies: Vec<IncomeStatement>,
    pub total_revenue: BigDecimal,
    pub total_expenses: BigDecimal,
    pub net_income: BigDecimal,
}

/// Consolidate balance sheets as of a date.
///
/// Each company's sheet is generated (and equation-checked) individually,
/// then summed line-group by line-group. Elimination pairs whose two
/// balances differ raise [`LedgerError::EliminationMismatch`] - a mismatch
/// means the inter-company postings disagree and silently ignoring it would
/// overstate the group.
pub async fn consolidated<S: LedgerStorage>(
    storage: &S,
    company_ids: &[CompanyId],
    as_of_date: NaiveDate,
    eliminations: Option<&EliminationSet>,
) -> LedgerResult<ConsolidatedBalanceSheet> {
    let mut companies = Vec::with_capacity(company_ids.len());
    let mut total_assets = BigDecimal::from(0);
    let mut total_liabilities = BigDecimal::from(0);
    let mut total_equity = BigDecimal::from(0);

    for &company_id in company_ids {
        let sheet = statements::balance_sheet(storage, company_id, as_of_date).await?;
        total_assets += &sheet.total_assets;
        total_liabilities += &sheet.total_liabilities;
        total_equity += &sheet.total_equity;
        companies.push(sheet);
    }

    let mut eliminated = BigDecimal::from(0);
    if let Some(set) = eliminations {
        for pair in &set.pairs {
            for company in [pair.receivable_company, pair.payable_company] {
                if !company_ids.contains(&company) {
                    return Err(LedgerError::Validation(format!(
                        "Elimination pair references company {company} outside the consolidation"
                    )));
                }
            }

            let receivable = projector::balance_as_of(
                storage,
                pair.receivable_company,
                &pair.receivable_account,
                as_of_date,
            )
            .await?;
            let payable = projector::balance_as_of(
                storage,
                pair.payable_company,
                &pair.payable_account,
                as_of_date,
            )
            .await?;

            if receivable != payable {
                return Err(LedgerError::EliminationMismatch {
                    receivable_company: pair.receivable_company,
                    receivable_code: pair.receivable_account.clone(),
                    receivable_balance: receivable,
                    payable_company: pair.payable_company,
                    payable_code: pair.payable_account.clone(),
                    payable_balance: payable,
                });
            }

            total_assets -= &receivable;
            total_liabilities -= &payable;
            eliminated += receivable;
        }
    }

    Ok(ConsolidatedBalanceSheet {
        as_of_date,
        companies,
        total_assets,
        total_liabilities,
        total_equity,
        eliminated,
    })
}

/// Consolidate income statements over a period
pub async fn consolidated_income<S: LedgerStorage>(
    storage: &S,
    company_ids: &[CompanyId],
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> LedgerResult<ConsolidatedIncomeStatement> {
    let mut companies = Vec::with_capacity(company_ids.len());
    let mut total_revenue = BigDecimal::from(0);
    let mut total_expenses = BigDecimal::from(0);

    for &company_id in company_ids {
        let statement =
            statements::income_statement(storage, company_id, start_date, end_date).await?;
        total_revenue += &statement.total_revenue;
        total_expenses += &statement.total_expenses;
        companies.push(statement);
    }

    let net_income = &total_revenue - &total_expenses;
    Ok(ConsolidatedIncomeStatement {
        start_date,
        end_date,
        companies,
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

    async fn two_companies() -> (MemoryStore, CompanyId, CompanyId) {
        let store = MemoryStore::new();
        let mut registry = AccountRegistry::new(store.clone());
        let a = registry
            .create_company("Tech Solutions Ltd".to_string(), "GBP".to_string(), true)
            .await
            .unwrap();
        let b = registry
            .create_company(
                "Consulting Partners Ltd".to_string(),
                "GBP".to_string(),
                true,
            )
            .await
            .unwrap();
        registry.install_standard_chart(a.id).await.unwrap();
        registry.install_standard_chart(b.id).await.unwrap();
        (store, a.id, b.id)
    }

    #[tokio::test]
    async fn totals_sum_without_eliminations() {
        let (store, a, b) = two_companies().await;
        let mut engine = JournalEngine::new(store.clone());

        engine
            .post(
                a,
                date(2024, 1, 1),
                "Sale".to_string(),
                patterns::sales_receipt("1000", "4000", BigDecimal::from(1000)),
            )
            .await
            .unwrap();
        engine
            .post(
                b,
                date(2024, 1, 1),
                "Sale".to_string(),
                patterns::sales_receipt("1000", "4000", BigDecimal::from(500)),
            )
            .await
            .unwrap();

        let group = consolidated(&store, &[a, b], date(2024, 1, 31), None)
            .await
            .unwrap();
        assert_eq!(group.total_assets, BigDecimal::from(1500));
        assert_eq!(group.eliminated, BigDecimal::from(0));
        assert_eq!(group.companies.len(), 2);
    }

    #[tokio::test]
    async fn matched_pair_is_netted_to_zero() {
        let (store, a, b) = two_companies().await;
        let mut engine = JournalEngine::new(store.clone());

        // A invoices B for 300: receivable in A, payable in B
        engine
            .post(
                a,
                date(2024, 1, 10),
                "Intercompany service".to_string(),
                vec![
                    LineInput::debit("1100", BigDecimal::from(300)),
                    LineInput::credit("4100", BigDecimal::from(300)),
                ],
            )
            .await
            .unwrap();
        engine
            .post(
                b,
                date(2024, 1, 10),
                "Intercompany service".to_string(),
                vec![
                    LineInput::debit("5700", BigDecimal::from(300)),
                    LineInput::credit("2000", BigDecimal::from(300)),
                ],
            )
            .await
            .unwrap();

        let set = EliminationSet {
            pairs: vec![EliminationPair {
                receivable_company: a,
                receivable_account: "1100".to_string(),
                payable_company: b,
                payable_account: "2000".to_string(),
            }],
        };

        let group = consolidated(&store, &[a, b], date(2024, 1, 31), Some(&set))
            .await
            .unwrap();
        assert_eq!(group.eliminated, BigDecimal::from(300));
        // A's receivable asset is gone from the group view
        assert_eq!(group.total_assets, BigDecimal::from(0));
        assert_eq!(group.total_liabilities, BigDecimal::from(0));
    }

    #[tokio::test]
    async fn mismatched_pair_is_surfaced() {
        let (store, a, b) = two_companies().await;
        let mut engine = JournalEngine::new(store.clone());

        engine
            .post(
                a,
                date(2024, 1, 10),
                "Intercompany service".to_string(),
                vec![
                    LineInput::debit("1100", BigDecimal::from(300)),
                    LineInput::credit("4100", BigDecimal::from(300)),
                ],
            )
            .await
            .unwrap();
        // B recorded a different figure
        engine
            .post(
                b,
                date(2024, 1, 10),
                "Intercompany service".to_string(),
                vec![
                    LineInput::debit("5700", BigDecimal::from(250)),
                    LineInput::credit("2000", BigDecimal::from(250)),
                ],
            )
            .await
            .unwrap();

        let set = EliminationSet {
            pairs: vec![EliminationPair {
                receivable_company: a,
                receivable_account: "1100".to_string(),
                payable_company: b,
                payable_account: "2000".to_string(),
            }],
        };

        let err = consolidated(&store, &[a, b], date(2024, 1, 31), Some(&set))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::EliminationMismatch { .. }));
        assert_eq!(err.class(), ErrorClass::Integrity);
    }

    #[tokio::test]
    async fn income_consolidates_across_companies() {
        let (store, a, b) = two_companies().await;
        let mut engine = JournalEngine::new(store.clone());

        engine
            .post(
                a,
                date(2024, 1, 5),
                "Sale".to_string(),
                patterns::sales_receipt("1000", "4000", BigDecimal::from(700)),
            )
            .await
            .unwrap();
        engine
            .post(
                b,
                date(2024, 1, 6),
                "Rent".to_string(),
                patterns::expense_payment("5200", "1000", BigDecimal::from(200)),
            )
            .await
            .unwrap();

        let group = consolidated_income(&store, &[a, b], date(2024, 1, 1), date(2024, 1, 31))
            .await
            .unwrap();
        assert_eq!(group.total_revenue, BigDecimal::from(700));
        assert_eq!(group.total_expenses, BigDecimal::from(200));
        assert_eq!(group.net_income, BigDecimal::from(500));
    }
}
