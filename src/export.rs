use crate::deposit::DepositResult;
use crate::loan::LoanResult;
use crate::present::Presentation;
use crate::schedule::PaymentSchedule;
use anyhow::{Context, Result};
use log::info;
use serde::Serialize;
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

/// The last successful result of either calculator.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Calculation {
    Loan(LoanResult),
    Deposit(DepositResult),
}

impl Calculation {
    pub fn schedule(&self) -> &PaymentSchedule {
        match self {
            Calculation::Loan(r) => &r.schedule,
            Calculation::Deposit(r) => &r.schedule,
        }
    }

    pub fn presentation(&self) -> Presentation {
        match self {
            Calculation::Loan(r) => Presentation::from_loan(r),
            Calculation::Deposit(r) => Presentation::from_deposit(r),
        }
    }

    fn file_stem(&self) -> &'static str {
        match self {
            Calculation::Loan(_) => "loan_schedule",
            Calculation::Deposit(_) => "deposit_schedule",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

pub fn write_csv<W: Write>(mut out: W, calc: &Calculation) -> Result<()> {
    let schedule = calc.schedule();
    writeln!(out, "Month,{}", schedule.kind.value_label())?;
    for entry in schedule.iter() {
        writeln!(out, "{},{:.2}", entry.period, entry.amount)?;
    }

    writeln!(out)?;
    writeln!(out, "Summary")?;
    for line in calc.presentation().summary {
        writeln!(out, "{},{:.2}", line.label, line.value)?;
    }
    Ok(())
}

pub fn write_json<W: Write>(mut out: W, calc: &Calculation) -> Result<()> {
    serde_json::to_writer_pretty(&mut out, calc)?;
    writeln!(out)?;
    Ok(())
}

/// Writes `calc` into `dir` and returns the path of the new file.
pub fn export_to_dir(dir: &Path, calc: &Calculation, format: ExportFormat) -> Result<PathBuf> {
    let path = dir.join(format!("{}.{}", calc.file_stem(), format.extension()));
    let file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
    let mut out = BufWriter::new(file);
    match format {
        ExportFormat::Csv => write_csv(&mut out, calc)?,
        ExportFormat::Json => write_json(&mut out, calc)?,
    }
    out.flush()?;
    info!("exported {} rows to {}", calc.schedule().len(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deposit::calculate_deposit;
    use crate::input::{DepositInput, LoanInput};
    use crate::loan::calculate_loan;
    use crate::schedule::PaymentType;
    use test_log::test;

    fn deposit() -> Calculation {
        Calculation::Deposit(
            calculate_deposit(&DepositInput {
                amount: 1000.,
                term_months: 2,
                annual_rate_percent: 12.,
            })
            .unwrap(),
        )
    }

    #[test]
    fn csv_layout() {
        let mut out = Vec::new();
        write_csv(&mut out, &deposit()).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "Month,Balance\n1,1010.00\n2,1020.10\n\nSummary\nTotal interest,20.10\nFinal balance,1020.10\n"
        );
    }

    #[test]
    fn json_is_tagged_by_kind() {
        let calc = Calculation::Loan(
            calculate_loan(&LoanInput {
                payment_type: PaymentType::Annuity,
                amount: 1000.,
                term_months: 1,
                annual_rate_percent: 12.,
            })
            .unwrap(),
        );
        let mut out = Vec::new();
        write_json(&mut out, &calc).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["kind"], "loan");
        assert_eq!(value["input"]["payment_type"], "annuity");
        assert_eq!(value["schedule"]["kind"], "payment");
        assert_eq!(value["schedule"]["entries"][0]["period"], 1);
        assert!(value["summary"]["overpayment"].as_f64().unwrap() > 9.99);
    }

    #[test]
    fn exports_into_directory() {
        let dir = std::env::temp_dir().join(format!("loancalc-export-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = export_to_dir(&dir, &deposit(), ExportFormat::Csv).unwrap();
        assert_eq!(path.file_name().unwrap(), "deposit_schedule.csv");
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("Month,Balance\n"));
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
