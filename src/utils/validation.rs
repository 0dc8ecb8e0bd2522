//! Validation utilities

use crate::types::*;
use bigdecimal::BigDecimal;

/// Validate that an amount is positive with at most two decimal places
pub fn validate_amount(amount: &BigDecimal) -> LedgerResult<()> {
    if *amount <= BigDecimal::from(0) || !has_max_two_dp(amount) {
        Err(LedgerError::InvalidAmount(amount.clone()))
    } else {
        Ok(())
    }
}

/// Validate that an account code is well formed
pub fn validate_account_code(code: &str) -> LedgerResult<()> {
    if code.trim().is_empty() {
        return Err(LedgerError::Validation(
            "Account code cannot be empty".to_string(),
        ));
    }

    if code.len() > 50 {
        return Err(LedgerError::Validation(
            "Account code cannot exceed 50 characters".to_string(),
        ));
    }

    // Alphanumeric plus dashes and underscores
    if !code
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(LedgerError::Validation(
            "Account code can only contain alphanumeric characters, dashes, and underscores"
                .to_string(),
        ));
    }

    Ok(())
}

/// Validate that an account or company name is well formed
pub fn validate_name(name: &str) -> LedgerResult<()> {
    if name.trim().is_empty() {
        return Err(LedgerError::Validation("Name cannot be empty".to_string()));
    }

    if name.len() > 100 {
        return Err(LedgerError::Validation(
            "Name cannot exceed 100 characters".to_string(),
        ));
    }

    Ok(())
}

/// Validate that a transaction description is well formed
pub fn validate_description(description: &str) -> LedgerResult<()> {
    if description.trim().is_empty() {
        return Err(LedgerError::Validation(
            "Transaction description cannot be empty".to_string(),
        ));
    }

    if description.len() > 500 {
        return Err(LedgerError::Validation(
            "Transaction description cannot exceed 500 characters".to_string(),
        ));
    }

    Ok(())
}

/// Validate that a currency code looks like an ISO 4217 code
pub fn validate_currency(currency: &str) -> LedgerResult<()> {
    if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_uppercase()) {
        return Err(LedgerError::Validation(format!(
            "Currency must be a three-letter ISO code, got '{currency}'"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn amounts() {
        assert!(validate_amount(&BigDecimal::from_str("0.01").unwrap()).is_ok());
        assert!(validate_amount(&BigDecimal::from(0)).is_err());
        assert!(validate_amount(&BigDecimal::from(-5)).is_err());
        assert!(validate_amount(&BigDecimal::from_str("1.005").unwrap()).is_err());
    }

    #[test]
    fn account_codes() {
        assert!(validate_account_code("1000").is_ok());
        assert!(validate_account_code("vat-payable").is_ok());
        assert!(validate_account_code("").is_err());
        assert!(validate_account_code("no spaces").is_err());
    }

    #[test]
    fn currencies() {
        assert!(validate_currency("GBP").is_ok());
        assert!(validate_currency("gbp").is_err());
        assert!(validate_currency("POUND").is_err());
    }
}
