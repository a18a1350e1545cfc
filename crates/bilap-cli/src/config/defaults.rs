use bilap::core::models::primes::DEFAULT_PRIMES;
use bilap::engine::config::{DEFAULT_ANALYSIS_MODE, DEFAULT_MODE_COUNT};

/// Values used when neither `--set`, a flag, nor the config file provides one.
pub struct DefaultsConfig {
    pub grid_size: usize,
    pub primes: Vec<u64>,
    pub spectrum_count: usize,
    pub spectrum_mode: usize,
    pub experiment_modes: usize,
    pub experiment_mode: usize,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            grid_size: 100,
            primes: DEFAULT_PRIMES.to_vec(),
            spectrum_count: DEFAULT_MODE_COUNT,
            spectrum_mode: 1,
            experiment_modes: DEFAULT_MODE_COUNT,
            experiment_mode: DEFAULT_ANALYSIS_MODE,
        }
    }
}
