use crate::config::{FormPreset, Settings};
use crate::deposit::calculate_deposit;
use crate::error::CalcError;
use crate::export::{export_to_dir, Calculation, ExportFormat};
use crate::input::validate_with_limit;
use crate::loan::calculate_loan;
use crate::present::Presentation;
use crate::schedule::PaymentType;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use log::{debug, info, warn};
use ratatui::widgets::TableState;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Loan,
    Deposit,
}

impl Tab {
    pub const ALL: [Tab; 2] = [Tab::Loan, Tab::Deposit];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Loan => "Loan calculator",
            Tab::Deposit => "Deposit calculator",
        }
    }

    fn other(self) -> Self {
        match self {
            Tab::Loan => Tab::Deposit,
            Tab::Deposit => Tab::Loan,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    PaymentType,
    Amount,
    Term,
    Rate,
}

impl Field {
    pub fn label(self) -> &'static str {
        match self {
            Field::PaymentType => "Payment type",
            Field::Amount => "Amount",
            Field::Term => "Term (months)",
            Field::Rate => "Annual rate (%)",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Info(String),
    Error(String),
}

/// One calculator tab: its own fields, last result and table scroll.
#[derive(Debug)]
pub struct CalculatorForm {
    pub tab: Tab,
    pub payment_type: PaymentType,
    pub amount: String,
    pub term: String,
    pub rate: String,
    pub focus: Field,
    pub calculation: Option<Calculation>,
    pub presentation: Option<Presentation>,
    pub table_state: TableState,
    pub status: Option<Status>,
}

impl CalculatorForm {
    fn new(tab: Tab, preset: &FormPreset, payment_type: PaymentType) -> Self {
        Self {
            tab,
            payment_type,
            amount: preset.amount.clone(),
            term: preset.term.clone(),
            rate: preset.rate.clone(),
            focus: Field::Amount,
            calculation: None,
            presentation: None,
            table_state: TableState::default(),
            status: None,
        }
    }

    pub fn fields(&self) -> &'static [Field] {
        match self.tab {
            Tab::Loan => &[Field::PaymentType, Field::Amount, Field::Term, Field::Rate],
            Tab::Deposit => &[Field::Amount, Field::Term, Field::Rate],
        }
    }

    pub fn value(&self, field: Field) -> String {
        match field {
            Field::PaymentType => self.payment_type.to_string(),
            Field::Amount => self.amount.clone(),
            Field::Term => self.term.clone(),
            Field::Rate => self.rate.clone(),
        }
    }

    fn text_mut(&mut self, field: Field) -> Option<&mut String> {
        match field {
            Field::PaymentType => None,
            Field::Amount => Some(&mut self.amount),
            Field::Term => Some(&mut self.term),
            Field::Rate => Some(&mut self.rate),
        }
    }

    fn move_focus(&mut self, forward: bool) {
        let fields = self.fields();
        let current = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
        let next = if forward {
            (current + 1) % fields.len()
        } else {
            (current + fields.len() - 1) % fields.len()
        };
        self.focus = fields[next];
    }

    /// Runs validation and the calculator. On failure the previous chart and
    /// table stay as they were.
    pub fn calculate(&mut self, max_term_months: u32) -> Result<(), CalcError> {
        let outcome = validate_with_limit(&self.amount, &self.term, &self.rate, max_term_months)
            .and_then(|input| match self.tab {
                Tab::Loan => calculate_loan(&input.into_loan(self.payment_type)).map(Calculation::Loan),
                Tab::Deposit => calculate_deposit(&input.into_deposit()).map(Calculation::Deposit),
            });

        match outcome {
            Ok(calculation) => {
                debug!("{} produced {} rows", self.tab.title(), calculation.schedule().len());
                self.presentation = Some(calculation.presentation());
                self.calculation = Some(calculation);
                self.table_state.select(Some(0));
                self.status = None;
                Ok(())
            }
            Err(err) => {
                warn!("{} rejected input: {} ({})", self.tab.title(), err, err.kind());
                self.status = Some(Status::Error(err.to_string()));
                Err(err)
            }
        }
    }

    fn rows(&self) -> usize {
        self.presentation.as_ref().map_or(0, |p| p.table.len())
    }

    fn scroll(&mut self, delta: isize) {
        let rows = self.rows();
        if rows == 0 {
            return;
        }
        let current = self.table_state.selected().unwrap_or(0) as isize;
        let next = (current + delta).clamp(0, rows as isize - 1);
        self.table_state.select(Some(next as usize));
    }
}

pub struct App {
    pub tab: Tab,
    pub loan: CalculatorForm,
    pub deposit: CalculatorForm,
    pub max_term_months: u32,
    pub export_dir: PathBuf,
}

impl Default for App {
    fn default() -> Self {
        Self::new(&Settings::default())
    }
}

impl App {
    pub fn new(settings: &Settings) -> Self {
        Self {
            tab: Tab::Loan,
            loan: CalculatorForm::new(Tab::Loan, &settings.loan, settings.payment_type),
            deposit: CalculatorForm::new(Tab::Deposit, &settings.deposit, settings.payment_type),
            max_term_months: settings.max_term_months,
            export_dir: settings.export_dir.clone(),
        }
    }

    pub fn form(&self) -> &CalculatorForm {
        match self.tab {
            Tab::Loan => &self.loan,
            Tab::Deposit => &self.deposit,
        }
    }

    pub fn form_mut(&mut self) -> &mut CalculatorForm {
        match self.tab {
            Tab::Loan => &mut self.loan,
            Tab::Deposit => &mut self.deposit,
        }
    }

    fn export(&mut self, format: ExportFormat) {
        let dir = self.export_dir.clone();
        let form = self.form_mut();
        let Some(calculation) = &form.calculation else {
            form.status = Some(Status::Error("nothing to export yet, press Enter first".into()));
            return;
        };
        form.status = Some(match export_to_dir(&dir, calculation, format) {
            Ok(path) => Status::Info(format!("Exported to {}", path.display())),
            Err(e) => {
                warn!("export failed: {:#}", e);
                Status::Error(format!("Error exporting: {:#}", e))
            }
        });
    }

    /// Returns `true` when the app should quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.kind != KeyEventKind::Press {
            return false;
        }
        let max_term_months = self.max_term_months;
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => return true,
            KeyCode::Tab | KeyCode::BackTab => {
                self.tab = self.tab.other();
                info!("switched to {}", self.tab.title());
            }
            KeyCode::Down => self.form_mut().move_focus(true),
            KeyCode::Up => self.form_mut().move_focus(false),
            KeyCode::Enter => {
                // the error is kept in the form status for display
                let _ = self.form_mut().calculate(max_term_months);
            }
            KeyCode::Char('e') | KeyCode::Char('E') => self.export(ExportFormat::Csv),
            KeyCode::Char('x') | KeyCode::Char('X') => self.export(ExportFormat::Json),
            KeyCode::Char('j') => self.form_mut().scroll(1),
            KeyCode::Char('k') => self.form_mut().scroll(-1),
            KeyCode::PageDown => self.form_mut().scroll(10),
            KeyCode::PageUp => self.form_mut().scroll(-10),
            KeyCode::Char('g') => self.form_mut().scroll(isize::MIN / 2),
            KeyCode::Char('G') => self.form_mut().scroll(isize::MAX / 2),
            KeyCode::Char(' ') | KeyCode::Left | KeyCode::Right => {
                let form = self.form_mut();
                if form.focus == Field::PaymentType {
                    form.payment_type = form.payment_type.toggle();
                }
            }
            KeyCode::Char(c) if c.is_ascii_digit() || matches!(c, '.' | ',' | '-' | '+') => {
                let form = self.form_mut();
                if let Some(text) = form.text_mut(form.focus) {
                    text.push(c);
                }
            }
            KeyCode::Backspace => {
                let form = self.form_mut();
                if let Some(text) = form.text_mut(form.focus) {
                    text.pop();
                }
            }
            _ => {}
        }
        false
    }
}
