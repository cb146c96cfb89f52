//! Rule-based financial self-assessment: health scoring, risk profiling, safety overrides,
//! portfolio allocation and safe investment sizing.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
