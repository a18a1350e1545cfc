use super::error::ParameterError;
use std::collections::HashSet;

pub const DEFAULT_PRIMES: [u64; 2] = [2, 3];
pub const DEFAULT_WEIGHT: f64 = 1.0;

pub fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    if n < 4 {
        return true;
    }
    if n % 2 == 0 || n % 3 == 0 {
        return false;
    }
    let mut d: u64 = 5;
    while d <= n / d {
        if n % d == 0 || n % (d + 2) == 0 {
            return false;
        }
        d += 6;
    }
    true
}

/// Rejects anything that cannot serve as a shift modulus on a ring of `grid_size` samples.
pub fn validate_modulus(prime: u64, grid_size: usize) -> Result<(), ParameterError> {
    if prime >= grid_size as u64 {
        return Err(ParameterError::PrimeOutOfRange { prime, grid_size });
    }
    if !is_prime(prime) {
        return Err(ParameterError::NotPrime(prime));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedPrime {
    pub prime: u64,
    pub weight: f64,
}

/// Distinct primes in caller order, each with a finite non-negative weight.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PrimeSet {
    entries: Vec<WeightedPrime>,
}

impl PrimeSet {
    pub fn new(
        primes: &[u64],
        weights: Option<&[f64]>,
        grid_size: usize,
    ) -> Result<Self, ParameterError> {
        if let Some(weights) = weights {
            if weights.len() != primes.len() {
                return Err(ParameterError::WeightCountMismatch {
                    expected: primes.len(),
                    actual: weights.len(),
                });
            }
        }

        let mut seen = HashSet::with_capacity(primes.len());
        let mut entries = Vec::with_capacity(primes.len());
        for (i, &prime) in primes.iter().enumerate() {
            validate_modulus(prime, grid_size)?;
            if !seen.insert(prime) {
                return Err(ParameterError::DuplicatePrime(prime));
            }
            let weight = weights.map_or(DEFAULT_WEIGHT, |w| w[i]);
            if !weight.is_finite() || weight < 0.0 {
                return Err(ParameterError::InvalidWeight { prime, weight });
            }
            entries.push(WeightedPrime { prime, weight });
        }

        Ok(Self { entries })
    }

    pub fn iter(&self) -> impl Iterator<Item = &WeightedPrime> {
        self.entries.iter()
    }

    pub fn primes(&self) -> Vec<u64> {
        self.entries.iter().map(|e| e.prime).collect()
    }

    pub fn weights(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.weight).collect()
    }

    pub fn weight_of(&self, prime: u64) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.prime == prime)
            .map(|e| e.weight)
    }

    pub fn contains(&self, prime: u64) -> bool {
        self.entries.iter().any(|e| e.prime == prime)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
