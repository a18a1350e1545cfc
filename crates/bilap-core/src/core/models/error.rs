use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParameterError {
    #[error("Grid size must be at least 2, got {0}")]
    GridTooSmall(usize),

    #[error("Half-period must be positive and finite, got {0}")]
    InvalidPeriod(f64),

    #[error("Modulus {0} is not a prime")]
    NotPrime(u64),

    #[error("Prime {0} appears more than once in the prime set")]
    DuplicatePrime(u64),

    #[error("Prime {prime} must be smaller than the grid size {grid_size}")]
    PrimeOutOfRange { prime: u64, grid_size: usize },

    #[error("Expected {expected} weights (one per prime), got {actual}")]
    WeightCountMismatch { expected: usize, actual: usize },

    #[error("Weight {weight} for prime {prime} must be finite and non-negative")]
    InvalidWeight { prime: u64, weight: f64 },
}
