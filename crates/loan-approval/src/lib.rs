//! Loan approval prediction: applicant form parsing, the fixed-order feature encoding, and
//! inference against a classifier artifact loaded once per process.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
