//! UK VAT calculation and per-period VAT position tracking

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::traits::LedgerStorage;
use crate::types::*;

/// How a VAT code is treated when computing tax on a line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Option<BigDecimal>", into = "Option<BigDecimal>")]
pub enum VatTreatment {
    /// Charged at a percentage rate; zero-rated supplies use `Rated(0)`
    Rated(BigDecimal),
    /// Outside the scope of VAT. Yields zero like `Rated(0)`, but is
    /// reported separately from zero-rated supplies.
    Exempt,
}

impl From<Option<BigDecimal>> for VatTreatment {
    fn from(rate: Option<BigDecimal>) -> Self {
        match rate {
            Some(rate) => VatTreatment::Rated(rate),
            None => VatTreatment::Exempt,
        }
    }
}

impl From<VatTreatment> for Option<BigDecimal> {
    fn from(treatment: VatTreatment) -> Self {
        match treatment {
            VatTreatment::Rated(rate) => Some(rate),
            VatTreatment::Exempt => None,
        }
    }
}

/// Injected `{code -> treatment}` mapping. In serialized form a code maps to
/// its percentage rate, with `null` marking exemption:
/// `{"S": "20", "R": "5", "Z": "0", "E": null}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VatRateTable {
    codes: HashMap<String, VatTreatment>,
}

impl VatRateTable {
    /// An empty table; every code is unknown
    pub fn empty() -> Self {
        Self {
            codes: HashMap::new(),
        }
    }

    /// The standard UK table: `S` 20%, `R` 5%, `Z` 0%, `E` exempt
    pub fn uk() -> Self {
        let mut table = Self::empty();
        table.insert("S", VatTreatment::Rated(BigDecimal::from(20)));
        table.insert("R", VatTreatment::Rated(BigDecimal::from(5)));
        table.insert("Z", VatTreatment::Rated(BigDecimal::from(0)));
        table.insert("E", VatTreatment::Exempt);
        table
    }

    /// Add or replace a code
    pub fn insert(&mut self, code: impl Into<String>, treatment: VatTreatment) {
        self.codes.insert(code.into(), treatment);
    }

    /// Look up a code's treatment
    pub fn treatment(&self, code: &str) -> LedgerResult<&VatTreatment> {
        self.codes
            .get(code)
            .ok_or_else(|| LedgerError::UnknownVatCode(code.to_string()))
    }

    /// Compute the VAT amount for a line. Rounding happens here, per line
    /// and to two decimal places - never on aggregates - so each line's VAT
    /// is independently reproducible.
    pub fn compute_vat(&self, amount: &BigDecimal, code: &str) -> LedgerResult<BigDecimal> {
        match self.treatment(code)? {
            VatTreatment::Rated(rate) => Ok(round2(&(amount * rate / BigDecimal::from(100)))),
            VatTreatment::Exempt => Ok(BigDecimal::from(0)),
        }
    }
}

impl Default for VatRateTable {
    fn default() -> Self {
        Self::uk()
    }
}

/// A company's net VAT position over a period, derived from VAT-tagged
/// journal lines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VatPosition {
    pub company_id: CompanyId,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    /// VAT collected on credit-side lines (sales)
    pub output_vat: BigDecimal,
    /// VAT paid on debit-side lines (purchases)
    pub input_vat: BigDecimal,
    /// Net line amounts of zero-rated credit lines
    pub zero_rated_outputs: BigDecimal,
    /// Net line amounts of exempt credit lines, kept apart from zero-rated
    pub exempt_outputs: BigDecimal,
}

impl VatPosition {
    /// Output minus input VAT: positive is payable to HMRC, negative is
    /// receivable
    pub fn net(&self) -> BigDecimal {
        &self.output_vat - &self.input_vat
    }

    pub fn is_payable(&self) -> bool {
        self.net() > BigDecimal::from(0)
    }
}

/// Aggregate a company's VAT position over `period_start..=period_end`.
///
/// Classification is by line side: VAT on credit lines is output (collected),
/// VAT on debit lines is input (paid). Reversals flip sides, so a reversed
/// invoice's VAT nets itself out of the period automatically. Codes no longer
/// present in the table still contribute their stored amounts; only the
/// zero-rated/exempt turnover split needs the table.
pub async fn vat_position<S: LedgerStorage>(
    storage: &S,
    table: &VatRateTable,
    company_id: CompanyId,
    period_start: NaiveDate,
    period_end: NaiveDate,
) -> LedgerResult<VatPosition> {
    let transactions = storage
        .get_transactions(company_id, Some(period_start), Some(period_end))
        .await?;

    let mut position = VatPosition {
        company_id,
        period_start,
        period_end,
        output_vat: BigDecimal::from(0),
        input_vat: BigDecimal::from(0),
        zero_rated_outputs: BigDecimal::from(0),
        exempt_outputs: BigDecimal::from(0),
    };

    for transaction in &transactions {
        for line in &transaction.lines {
            let Some(vat) = &line.vat else { continue };

            match line.side {
                Side::Credit => {
                    position.output_vat += &vat.amount;
                    match table.treatment(&vat.code) {
                        Ok(VatTreatment::Rated(rate)) if *rate == BigDecimal::from(0) => {
                            position.zero_rated_outputs += &line.amount;
                        }
                        Ok(VatTreatment::Exempt) => {
                            position.exempt_outputs += &line.amount;
                        }
                        _ => {}
                    }
                }
                Side::Debit => {
                    position.input_vat += &vat.amount;
                }
            }
        }
    }

    Ok(position)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn standard_rate_on_round_amount() {
        let table = VatRateTable::uk();
        assert_eq!(table.compute_vat(&dec("100"), "S").unwrap(), dec("20.00"));
        assert_eq!(table.compute_vat(&dec("1000"), "S").unwrap(), dec("200.00"));
    }

    #[test]
    fn reduced_rate_rounds_per_line() {
        let table = VatRateTable::uk();
        // 5% of 12.34 = 0.617, rounded at the line
        assert_eq!(table.compute_vat(&dec("12.34"), "R").unwrap(), dec("0.62"));
    }

    #[test]
    fn zero_and_exempt_both_yield_zero() {
        let table = VatRateTable::uk();
        assert_eq!(table.compute_vat(&dec("500"), "Z").unwrap(), BigDecimal::from(0));
        assert_eq!(table.compute_vat(&dec("500"), "E").unwrap(), BigDecimal::from(0));
        // but the treatments stay distinguishable for reporting
        assert_ne!(table.treatment("Z").unwrap(), table.treatment("E").unwrap());
    }

    #[test]
    fn unknown_codes_are_rejected() {
        let table = VatRateTable::uk();
        assert!(matches!(
            table.compute_vat(&dec("100"), "X"),
            Err(LedgerError::UnknownVatCode(_))
        ));
    }

    #[test]
    fn table_round_trips_through_config_json() {
        let json = r#"{"S":"20","R":"5","Z":"0","E":null}"#;
        let table: VatRateTable = serde_json::from_str(json).unwrap();
        assert_eq!(table.compute_vat(&dec("100"), "S").unwrap(), dec("20.00"));
        assert_eq!(*table.treatment("E").unwrap(), VatTreatment::Exempt);

        let reparsed: VatRateTable =
            serde_json::from_str(&serde_json::to_string(&table).unwrap()).unwrap();
        assert_eq!(reparsed, table);
    }
}
