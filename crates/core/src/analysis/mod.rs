//! Allocation analysis - drift, out-of-range flags and rebalance hints.
//!
//! [`analyze`] is a pure function over a portfolio, its items and a completed
//! price snapshot. It has no I/O and no clock, so identical inputs always
//! produce identical output.

mod analysis_errors;
mod analysis_model;
mod analyzer;


pub use analysis_errors::AnalysisError;
pub use analysis_model::{
    IssueCode, ItemAnalysis, ItemIssue, ItemStatus, MissingPricePolicy, PortfolioAnalysis,
    PriceSource,
};
pub use analyzer::analyze;
