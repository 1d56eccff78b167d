use crate::error::{CalcError, Result};
use crate::input::DepositInput;
use crate::schedule::{growth_factor, monthly_rate, PaymentSchedule, ScheduleKind};
use log::debug;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DepositSummary {
    pub total_interest: f64,
    pub final_balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepositResult {
    pub input: DepositInput,
    pub schedule: PaymentSchedule,
    pub summary: DepositSummary,
}

pub fn calculate_deposit(input: &DepositInput) -> Result<DepositResult> {
    let rate = monthly_rate(input.annual_rate_percent);
    let balances = compound_balances(input.amount, input.term_months, rate)?;

    // balances[0] is the principal and stays out of the displayed schedule
    let final_balance = balances.last().copied().unwrap_or(input.amount);
    if !final_balance.is_finite() {
        return Err(CalcError::Domain(
            "deposit balance is out of the representable range".into(),
        ));
    }

    let summary = DepositSummary {
        total_interest: final_balance - input.amount,
        final_balance,
    };
    let schedule =
        PaymentSchedule::from_values(ScheduleKind::Balance, balances.into_iter().skip(1));

    debug!(
        "deposit of {} over {} months at {}%: interest {:.2}, final {:.2}",
        input.amount,
        input.term_months,
        input.annual_rate_percent,
        summary.total_interest,
        summary.final_balance
    );

    Ok(DepositResult {
        input: *input,
        schedule,
        summary,
    })
}

/// Balances from month 0 (the principal) through month `term`.
pub fn compound_balances(principal: f64, term: u32, rate: f64) -> Result<Vec<f64>> {
    let factor = growth_factor(rate)?;
    let mut balances = Vec::with_capacity(term as usize + 1);
    balances.push(principal);
    for _ in 1..=term {
        let previous = balances[balances.len() - 1];
        let next = previous * factor;
        if !next.is_finite() {
            return Err(CalcError::Domain(
                "deposit balance is out of the representable range".into(),
            ));
        }
        if next <= previous {
            return Err(CalcError::Domain(
                "interest rate is too small to grow the balance".into(),
            ));
        }
        balances.push(next);
    }
    Ok(balances)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    fn deposit(amount: f64, term_months: u32, rate: f64) -> DepositInput {
        DepositInput {
            amount,
            term_months,
            annual_rate_percent: rate,
        }
    }

    #[test]
    fn reference_scenario() {
        let result = calculate_deposit(&deposit(10000., 6, 6.)).unwrap();
        assert_eq!(result.schedule.len(), 6);
        assert_eq!(result.schedule.kind, ScheduleKind::Balance);
        assert!((result.summary.final_balance - 10303.78).abs() < 0.005);
        assert!((result.summary.total_interest - 303.78).abs() < 0.005);
        assert_eq!(result.schedule.last(), Some(result.summary.final_balance));
    }

    #[test]
    fn schedule_excludes_the_principal() {
        let result = calculate_deposit(&deposit(1000., 2, 12.)).unwrap();
        let values: Vec<f64> = result.schedule.values().collect();
        assert!((values[0] - 1010.).abs() < 1e-9);
        assert!((values[1] - 1020.1).abs() < 1e-9);
        assert_eq!(result.schedule.entries[0].period, 1);
    }

    #[test]
    fn balances_grow_geometrically() {
        let (amount, term, annual) = (2500., 120, 4.25);
        let result = calculate_deposit(&deposit(amount, term, annual)).unwrap();
        let values: Vec<f64> = result.schedule.values().collect();
        assert!(values.windows(2).all(|w| w[1] > w[0]));
        assert!(values[0] > amount);

        let closed_form = amount * (1.0 + monthly_rate(annual)).powi(term as i32);
        assert!((result.summary.final_balance - closed_form).abs() < 1e-6);
    }

    #[test]
    fn compound_balances_keeps_the_seed() {
        let balances = compound_balances(100., 3, 0.5).unwrap();
        assert_eq!(balances, vec![100., 150., 225., 337.5]);
    }

    #[test]
    fn vanishing_rate_is_a_domain_error() {
        let input = crate::input::validate("1000", "3", "0.00000000000001").unwrap();
        let err = calculate_deposit(&input.into_deposit()).unwrap_err();
        assert!(matches!(err, CalcError::Domain(_)));
        assert!(compound_balances(1000., 3, 1e-17).is_err());
    }

    #[test]
    fn overflow_is_a_domain_error() {
        let err = calculate_deposit(&deposit(1e300, 1200, 99999.)).unwrap_err();
        assert!(matches!(err, CalcError::Domain(_)));
    }
}
