use crate::error::{CalcError, Result};
use crate::input::LoanInput;
use crate::schedule::{growth_factor, monthly_rate, PaymentSchedule, PaymentType, ScheduleKind};
use log::{debug, trace};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LoanSummary {
    pub total_payment: f64,
    pub overpayment: f64,
    pub first_payment: f64,
    pub last_payment: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoanResult {
    pub input: LoanInput,
    pub schedule: PaymentSchedule,
    pub summary: LoanSummary,
}

pub fn calculate_loan(input: &LoanInput) -> Result<LoanResult> {
    let rate = monthly_rate(input.annual_rate_percent);
    let (schedule, total_payment) = match input.payment_type {
        PaymentType::Annuity => {
            let payment = annuity_payment(input.amount, input.term_months, rate)?;
            let payments = vec![payment; input.term_months as usize];
            (
                PaymentSchedule::from_values(ScheduleKind::Payment, payments),
                payment * input.term_months as f64,
            )
        }
        PaymentType::Differentiated => {
            let payments = differentiated_payments(input.amount, input.term_months, rate)?;
            let schedule = PaymentSchedule::from_values(ScheduleKind::Payment, payments);
            let total = schedule.total();
            (schedule, total)
        }
    };

    let summary = LoanSummary {
        total_payment,
        overpayment: total_payment - input.amount,
        first_payment: schedule.first().unwrap_or_default(),
        last_payment: schedule.last().unwrap_or_default(),
    };

    if !(summary.total_payment.is_finite() && summary.overpayment.is_finite()) {
        return Err(CalcError::Domain(
            "payment amount is out of the representable range".into(),
        ));
    }

    debug!(
        "{} loan of {} over {} months at {}%: total {:.2}, overpayment {:.2}",
        input.payment_type,
        input.amount,
        input.term_months,
        input.annual_rate_percent,
        summary.total_payment,
        summary.overpayment
    );

    Ok(LoanResult {
        input: *input,
        schedule,
        summary,
    })
}

/// Fixed monthly payment for `principal` repaid over `term` months at
/// monthly rate `rate`.
pub fn annuity_payment(principal: f64, term: u32, rate: f64) -> Result<f64> {
    let factor = growth_factor(rate)?.powf(term as f64);
    let denominator = factor - 1.0;
    if denominator == 0.0 || !denominator.is_finite() {
        return Err(CalcError::Domain(
            "interest rate is too small to compute an annuity payment".into(),
        ));
    }

    let payment = principal * (rate * factor) / denominator;
    if !payment.is_finite() {
        return Err(CalcError::Domain("annuity payment is not finite".into()));
    }
    trace!("annuity factor {}, payment {}", factor, payment);
    Ok(payment)
}

/// Constant principal share plus interest on the remaining debt.
pub fn differentiated_payments(principal: f64, term: u32, rate: f64) -> Result<Vec<f64>> {
    growth_factor(rate)?;
    let principal_per_month = principal / term as f64;
    let payments: Vec<f64> = (0..term)
        .map(|month| {
            let interest = (principal - principal_per_month * month as f64) * rate;
            principal_per_month + interest
        })
        .collect();

    // payments must shrink every month; a rate near rounding noise flattens them
    if payments.windows(2).any(|w| w[1] >= w[0]) {
        return Err(CalcError::Domain(
            "interest rate is too small to differentiate the payments".into(),
        ));
    }
    Ok(payments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    const EPS: f64 = 1e-6;

    fn loan(payment_type: PaymentType, amount: f64, term_months: u32, rate: f64) -> LoanInput {
        LoanInput {
            payment_type,
            amount,
            term_months,
            annual_rate_percent: rate,
        }
    }

    #[test]
    fn annuity_reference_scenario() {
        let result = calculate_loan(&loan(PaymentType::Annuity, 100000., 12, 12.)).unwrap();
        assert_eq!(result.schedule.len(), 12);
        assert_eq!(result.schedule.kind, ScheduleKind::Payment);
        let payment = result.schedule.first().unwrap();
        assert!((payment - 8884.88).abs() < 0.005, "payment {payment}");
        assert!((result.summary.overpayment - 6618.55).abs() < 0.01);
        assert!((result.summary.total_payment - 106618.55).abs() < 0.01);
    }

    #[test]
    fn annuity_payments_satisfy_the_formula() {
        for (amount, term, annual) in [(1000., 1, 5.), (250000., 360, 6.5), (5000., 7, 0.1)] {
            let result = calculate_loan(&loan(PaymentType::Annuity, amount, term, annual)).unwrap();
            let r = monthly_rate(annual);
            let factor = (1.0 + r).powf(term as f64);
            let payment = result.summary.first_payment;
            let lhs = payment * (factor - 1.0);
            let rhs = amount * r * factor;
            assert!((lhs - rhs).abs() < EPS, "{lhs} vs {rhs}");
            assert_eq!(result.schedule.len(), term as usize);
            assert!(result.schedule.values().all(|p| p == payment));
        }
    }

    #[test]
    fn differentiated_payments_decrease() {
        let result = calculate_loan(&loan(PaymentType::Differentiated, 120000., 24, 10.)).unwrap();
        let payments: Vec<f64> = result.schedule.values().collect();
        assert_eq!(payments.len(), 24);
        assert!(payments.windows(2).all(|w| w[1] < w[0]));

        // the principal parts of all payments add up to the loan
        let r = monthly_rate(10.);
        let principal_per_month = 120000.0_f64 / 24.0;
        let repaid: f64 = payments
            .iter()
            .enumerate()
            .map(|(month, payment)| {
                let interest = (120000.0 - principal_per_month * month as f64) * r;
                payment - interest
            })
            .sum();
        assert!((repaid - 120000.0).abs() < EPS, "repaid {repaid}");
        // first month pays interest on the whole debt
        assert!((payments[0] - (principal_per_month + 120000. * r)).abs() < EPS);
        assert!((payments[23] - (principal_per_month + principal_per_month * r)).abs() < EPS);
    }

    #[test]
    fn differentiated_summary_totals() {
        let result = calculate_loan(&loan(PaymentType::Differentiated, 1200., 12, 12.)).unwrap();
        // interest sums to r * P * (n + 1) / 2
        let expected_interest = 0.01 * 1200. * 13. / 2.;
        assert!((result.summary.overpayment - expected_interest).abs() < EPS);
        assert!((result.summary.total_payment - (1200. + expected_interest)).abs() < EPS);
        assert_eq!(result.summary.first_payment, result.schedule.first().unwrap());
        assert_eq!(result.summary.last_payment, result.schedule.last().unwrap());
    }

    #[test]
    fn single_month_loans() {
        let annuity = calculate_loan(&loan(PaymentType::Annuity, 1000., 1, 12.)).unwrap();
        assert!((annuity.summary.first_payment - 1010.).abs() < EPS);
        let diff = calculate_loan(&loan(PaymentType::Differentiated, 1000., 1, 12.)).unwrap();
        assert!((diff.summary.first_payment - 1010.).abs() < EPS);
    }

    #[test]
    fn vanishing_rate_is_a_domain_error() {
        let err = annuity_payment(1000., 12, 1e-20).unwrap_err();
        assert!(matches!(err, CalcError::Domain(_)));
        let err = calculate_loan(&loan(PaymentType::Annuity, 1000., 12, 1e-18)).unwrap_err();
        assert!(matches!(err, CalcError::Domain(_)));
    }

    #[test]
    fn vanishing_rate_fails_differentiated_loans_too() {
        let input = crate::input::validate("1000", "3", "0.00000000000001").unwrap();
        let err = calculate_loan(&input.into_loan(PaymentType::Differentiated)).unwrap_err();
        assert!(matches!(err, CalcError::Domain(_)));
        let err = calculate_loan(&input.into_loan(PaymentType::Annuity)).unwrap_err();
        assert!(matches!(err, CalcError::Domain(_)));
        assert!(differentiated_payments(1000., 3, 1e-17).is_err());
    }
}
