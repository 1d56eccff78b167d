use crate::deposit::DepositResult;
use crate::loan::LoanResult;
use crate::schedule::{PaymentSchedule, PaymentType};
use std::fmt;

/// Headroom above the tallest bar, as a share of the data range.
pub const Y_MARGIN: f64 = 0.1;

/// Two decimals, used for table cells, tick labels and summary values.
pub fn format_amount(value: f64) -> String {
    format!("{:.2}", value)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub title: &'static str,
    pub x_label: &'static str,
    pub y_label: &'static str,
    /// (period, value), period counted from 1.
    pub points: Vec<(u32, f64)>,
    pub y_min: f64,
    pub y_max: f64,
}

impl ChartSeries {
    fn new(schedule: &PaymentSchedule, title: &'static str) -> Self {
        let points: Vec<(u32, f64)> = schedule.iter().map(|e| (e.period, e.amount)).collect();
        let (y_min, y_max) = y_bounds(schedule);
        Self {
            title,
            x_label: "Month",
            y_label: schedule.kind.value_label(),
            points,
            y_min,
            y_max,
        }
    }

    /// `count` labels from the top of the axis down to the bottom.
    pub fn y_ticks(&self, count: usize) -> Vec<String> {
        match count {
            0 => Vec::new(),
            1 => vec![format_amount(self.y_max)],
            _ => {
                let step = (self.y_max - self.y_min) / (count - 1) as f64;
                (0..count)
                    .map(|i| format_amount(self.y_max - step * i as f64))
                    .collect()
            }
        }
    }
}

/// Bars grow from zero; the top gets `Y_MARGIN` of the range as headroom.
fn y_bounds(schedule: &PaymentSchedule) -> (f64, f64) {
    let lo = schedule.min_value().unwrap_or(0.0).min(0.0);
    let hi = schedule.max_value().unwrap_or(0.0).max(0.0);
    let span = hi - lo;
    if span == 0.0 {
        return (lo, lo + 1.0);
    }
    (lo, hi + span * Y_MARGIN)
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableView {
    pub headers: [&'static str; 2],
    pub rows: Vec<[String; 2]>,
}

impl TableView {
    fn new(schedule: &PaymentSchedule) -> Self {
        let rows = schedule
            .iter()
            .map(|e| [e.period.to_string(), format_amount(e.amount)])
            .collect();
        Self {
            headers: ["Month", schedule.kind.value_label()],
            rows,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryLine {
    pub label: &'static str,
    pub value: f64,
}

impl fmt::Display for SummaryLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:.2}", self.label, self.value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Presentation {
    pub chart: ChartSeries,
    pub table: TableView,
    pub summary: Vec<SummaryLine>,
}

impl Presentation {
    pub fn from_loan(result: &LoanResult) -> Self {
        let s = &result.summary;
        let summary = match result.input.payment_type {
            PaymentType::Annuity => vec![
                SummaryLine { label: "Monthly payment", value: s.first_payment },
                SummaryLine { label: "Total payment", value: s.total_payment },
                SummaryLine { label: "Overpayment", value: s.overpayment },
            ],
            PaymentType::Differentiated => vec![
                SummaryLine { label: "First payment", value: s.first_payment },
                SummaryLine { label: "Last payment", value: s.last_payment },
                SummaryLine { label: "Total payment", value: s.total_payment },
                SummaryLine { label: "Overpayment", value: s.overpayment },
            ],
        };
        Self {
            chart: ChartSeries::new(&result.schedule, "Payments by month"),
            table: TableView::new(&result.schedule),
            summary,
        }
    }

    pub fn from_deposit(result: &DepositResult) -> Self {
        let s = &result.summary;
        Self {
            chart: ChartSeries::new(&result.schedule, "Account balance by month"),
            table: TableView::new(&result.schedule),
            summary: vec![
                SummaryLine { label: "Total interest", value: s.total_interest },
                SummaryLine { label: "Final balance", value: s.final_balance },
            ],
        }
    }
}
