use super::error::ParameterError;
use std::f64::consts::PI;

/// How the half-period `T` of the ring is derived from the number of samples.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PeriodMapping {
    /// `T = ln(N)`.
    #[default]
    Logarithmic,
    /// A caller-supplied half-period, independent of `N`.
    Fixed(f64),
}

impl PeriodMapping {
    pub fn resolve(&self, size: usize) -> f64 {
        match *self {
            PeriodMapping::Logarithmic => (size as f64).ln(),
            PeriodMapping::Fixed(period) => period,
        }
    }
}

/// `N` equally spaced samples on a periodic interval of half-length `T`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    size: usize,
    period: f64,
    mapping: PeriodMapping,
}

impl Grid {
    pub fn new(size: usize) -> Result<Self, ParameterError> {
        Self::with_mapping(size, PeriodMapping::default())
    }

    pub fn with_mapping(size: usize, mapping: PeriodMapping) -> Result<Self, ParameterError> {
        if size < 2 {
            return Err(ParameterError::GridTooSmall(size));
        }
        let period = mapping.resolve(size);
        if !period.is_finite() || period <= 0.0 {
            return Err(ParameterError::InvalidPeriod(period));
        }
        Ok(Self {
            size,
            period,
            mapping,
        })
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Half-length `T` of the periodic interval.
    #[inline]
    pub fn period(&self) -> f64 {
        self.period
    }

    #[inline]
    pub fn mapping(&self) -> PeriodMapping {
        self.mapping
    }

    /// Grid spacing `Δ = 2T / N`.
    #[inline]
    pub fn spacing(&self) -> f64 {
        2.0 * self.period / self.size as f64
    }

    /// Sample coordinates spanning `[-T, T]` inclusive, one per grid index.
    pub fn coordinates(&self) -> Vec<f64> {
        let step = 2.0 * self.period / (self.size - 1) as f64;
        (0..self.size)
            .map(|i| -self.period + step * i as f64)
            .collect()
    }

    /// Continuum value `(π/T)²` of the first nonzero Laplacian eigenvalue on the ring.
    pub fn theoretical_first_mode(&self) -> f64 {
        (PI / self.period).powi(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_uses_logarithmic_period_by_default() {
        let grid = Grid::new(100).unwrap();
        assert_eq!(grid.size(), 100);
        assert!((grid.period() - 4.605170185988092).abs() < 1e-12);
        assert_eq!(grid.mapping(), PeriodMapping::Logarithmic);
    }

    #[test]
    fn fixed_mapping_overrides_period() {
        let grid = Grid::with_mapping(50, PeriodMapping::Fixed(3.0)).unwrap();
        assert_eq!(grid.period(), 3.0);
        assert!((grid.spacing() - 0.12).abs() < 1e-15);
    }

    #[test]
    fn new_rejects_grids_smaller_than_two() {
        assert_eq!(Grid::new(0), Err(ParameterError::GridTooSmall(0)));
        assert_eq!(Grid::new(1), Err(ParameterError::GridTooSmall(1)));
        assert!(Grid::new(2).is_ok());
    }

    #[test]
    fn with_mapping_rejects_non_positive_or_non_finite_period() {
        assert!(matches!(
            Grid::with_mapping(10, PeriodMapping::Fixed(0.0)),
            Err(ParameterError::InvalidPeriod(_))
        ));
        assert!(matches!(
            Grid::with_mapping(10, PeriodMapping::Fixed(-1.0)),
            Err(ParameterError::InvalidPeriod(_))
        ));
        assert!(matches!(
            Grid::with_mapping(10, PeriodMapping::Fixed(f64::NAN)),
            Err(ParameterError::InvalidPeriod(_))
        ));
    }

    #[test]
    fn coordinates_span_closed_interval() {
        let grid = Grid::with_mapping(5, PeriodMapping::Fixed(2.0)).unwrap();
        assert_eq!(grid.coordinates(), vec![-2.0, -1.0, 0.0, 1.0, 2.0]);
    }

    #[test]
    fn theoretical_first_mode_matches_reference_value() {
        let grid = Grid::new(100).unwrap();
        assert!((grid.theoretical_first_mode() - 0.465381).abs() < 1e-6);
    }
}
