//! Loan repayment and deposit growth schedules with a terminal front end.

pub mod app;
pub mod config;
pub mod deposit;
pub mod error;
pub mod export;
pub mod input;
pub mod loan;
pub mod present;
pub mod schedule;
pub mod ui;
