use crate::error::{CalcError, Result};
use crate::schedule::PaymentType;
use log::debug;
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

/// Longest term accepted when no setting overrides it: ten thousand years,
/// far past any real contract, bounding only the schedule allocation.
pub const DEFAULT_MAX_TERM_MONTHS: u32 = 120_000;

fn term_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[1-9]\d*$").expect("term pattern is valid"))
}

fn decimal_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[0-9]+(\.[0-9]+)?$").expect("decimal pattern is valid"))
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ValidatedInput {
    pub amount: f64,
    pub term_months: u32,
    pub annual_rate_percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LoanInput {
    pub payment_type: PaymentType,
    pub amount: f64,
    pub term_months: u32,
    pub annual_rate_percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DepositInput {
    pub amount: f64,
    pub term_months: u32,
    pub annual_rate_percent: f64,
}

impl ValidatedInput {
    pub fn into_loan(self, payment_type: PaymentType) -> LoanInput {
        LoanInput {
            payment_type,
            amount: self.amount,
            term_months: self.term_months,
            annual_rate_percent: self.annual_rate_percent,
        }
    }

    pub fn into_deposit(self) -> DepositInput {
        DepositInput {
            amount: self.amount,
            term_months: self.term_months,
            annual_rate_percent: self.annual_rate_percent,
        }
    }
}

/// Validates the raw form fields with the default term limit.
pub fn validate(amount: &str, term: &str, rate: &str) -> Result<ValidatedInput> {
    validate_with_limit(amount, term, rate, DEFAULT_MAX_TERM_MONTHS)
}

/// Checks run in a fixed order: term pattern, amount pattern, rate pattern,
/// then the parsed values. The first failure is returned.
pub fn validate_with_limit(
    amount: &str,
    term: &str,
    rate: &str,
    max_term_months: u32,
) -> Result<ValidatedInput> {
    let term_re = term_pattern();
    let decimal_re = decimal_pattern();

    let amount = normalize_decimal(amount);
    let rate = normalize_decimal(rate);

    if !term_re.is_match(term) {
        return Err(CalcError::invalid_term());
    }
    if !decimal_re.is_match(&amount) {
        return Err(CalcError::invalid_amount());
    }
    if !decimal_re.is_match(&rate) {
        return Err(CalcError::invalid_rate());
    }

    let amount: f64 = amount.parse().map_err(|_| CalcError::invalid_amount())?;
    let term_months: u32 = term.parse().map_err(|_| CalcError::invalid_term())?;
    let annual_rate_percent: f64 = rate.parse().map_err(|_| CalcError::invalid_rate())?;

    if !(amount > 0.0 && amount.is_finite()) {
        return Err(CalcError::invalid_amount());
    }
    if term_months == 0 {
        return Err(CalcError::invalid_term());
    }
    if term_months > max_term_months {
        return Err(CalcError::InvalidTerm(format!(
            "term must not exceed {max_term_months} months"
        )));
    }
    if !(annual_rate_percent > 0.0 && annual_rate_percent.is_finite()) {
        return Err(CalcError::invalid_rate());
    }

    debug!(
        "validated amount {}, term {}, rate {}",
        amount, term_months, annual_rate_percent
    );

    Ok(ValidatedInput {
        amount,
        term_months,
        annual_rate_percent,
    })
}

/// `,` is accepted as the decimal separator.
fn normalize_decimal(raw: &str) -> String {
    raw.replace(',', ".")
}
