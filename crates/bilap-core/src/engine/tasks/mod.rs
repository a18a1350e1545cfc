//! Per-mode computations run against an assembled operator.
//!
//! Each task is a plain function that takes validated inputs and returns a result
//! without touching any cached state; input validation happens in the
//! [`SpectralAnalyzer`](crate::engine::analyzer::SpectralAnalyzer) before a task runs.

pub mod energy_decomposition;
pub mod valuation_invariance;
