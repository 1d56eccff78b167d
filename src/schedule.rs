use crate::error::{CalcError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentType {
    Annuity,
    #[default]
    Differentiated,
}

impl PaymentType {
    pub fn toggle(self) -> Self {
        match self {
            PaymentType::Annuity => PaymentType::Differentiated,
            PaymentType::Differentiated => PaymentType::Annuity,
        }
    }
}

impl fmt::Display for PaymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentType::Annuity => write!(f, "Annuity"),
            PaymentType::Differentiated => write!(f, "Differentiated"),
        }
    }
}

/// What the values of a schedule stand for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleKind {
    /// Amount paid in the month.
    Payment,
    /// Account balance at the end of the month.
    Balance,
}

impl ScheduleKind {
    pub fn value_label(self) -> &'static str {
        match self {
            ScheduleKind::Payment => "Payment",
            ScheduleKind::Balance => "Balance",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScheduleEntry {
    pub period: u32,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentSchedule {
    pub kind: ScheduleKind,
    pub entries: Vec<ScheduleEntry>,
}

impl PaymentSchedule {
    /// Numbers `values` from period 1.
    pub fn from_values(kind: ScheduleKind, values: impl IntoIterator<Item = f64>) -> Self {
        let entries = values
            .into_iter()
            .zip(1..)
            .map(|(amount, period)| ScheduleEntry { period, amount })
            .collect();
        Self { kind, entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScheduleEntry> {
        self.entries.iter()
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.entries.iter().map(|e| e.amount)
    }

    pub fn first(&self) -> Option<f64> {
        self.entries.first().map(|e| e.amount)
    }

    pub fn last(&self) -> Option<f64> {
        self.entries.last().map(|e| e.amount)
    }

    pub fn max_value(&self) -> Option<f64> {
        self.values().reduce(f64::max)
    }

    pub fn min_value(&self) -> Option<f64> {
        self.values().reduce(f64::min)
    }

    pub fn total(&self) -> f64 {
        self.values().sum()
    }
}

/// Annual percentage rate to a monthly fraction.
pub fn monthly_rate(annual_rate_percent: f64) -> f64 {
    annual_rate_percent / 100.0 / 12.0
}

/// `1 + rate`, or a domain error when the rate is lost to rounding.
pub fn growth_factor(rate: f64) -> Result<f64> {
    let factor = 1.0 + rate;
    if factor == 1.0 || !factor.is_finite() {
        return Err(CalcError::Domain(
            "interest rate is too small to affect the schedule".into(),
        ));
    }
    Ok(factor)
}
