use super::analytic::build_analytic;
use super::prime::build_prime_operator;
use super::{max_asymmetry, quadratic_form};
use crate::core::models::error::ParameterError;
use crate::core::models::grid::Grid;
use crate::core::models::ids::ComponentId;
use crate::core::models::primes::PrimeSet;
use nalgebra::{DMatrix, DVector};
use std::collections::BTreeMap;
use tracing::debug;

/// One labeled summand of the combined operator, stored unweighted.
#[derive(Debug, Clone)]
pub struct Addend {
    id: ComponentId,
    weight: f64,
    matrix: DMatrix<f64>,
}

impl Addend {
    pub fn id(&self) -> ComponentId {
        self.id
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }

    /// `ψᵗ A ψ` without the weight.
    pub fn raw_energy(&self, psi: &DVector<f64>) -> f64 {
        quadratic_form(&self.matrix, psi)
    }

    /// `w · ψᵗ A ψ`, the contribution of this addend to `ψᵗ H ψ`.
    pub fn energy(&self, psi: &DVector<f64>) -> f64 {
        self.weight * self.raw_energy(psi)
    }
}

/// `H = L + Σ_p w_p · H_p` together with every addend that went into it.
#[derive(Debug, Clone)]
pub struct CombinedOperator {
    grid: Grid,
    primes: PrimeSet,
    matrix: DMatrix<f64>,
    addends: Vec<Addend>,
}

impl CombinedOperator {
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn primes(&self) -> &PrimeSet {
        &self.primes
    }

    pub fn size(&self) -> usize {
        self.grid.size()
    }

    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }

    /// Addends in construction order: the analytic part first, then primes in set order.
    pub fn addends(&self) -> &[Addend] {
        &self.addends
    }

    pub fn addend(&self, id: ComponentId) -> Option<&Addend> {
        self.addends.iter().find(|a| a.id == id)
    }

    /// Unweighted addend matrices keyed by component.
    pub fn labeled(&self) -> BTreeMap<ComponentId, &DMatrix<f64>> {
        self.addends.iter().map(|a| (a.id, &a.matrix)).collect()
    }

    /// `ψᵗ H ψ`.
    pub fn energy(&self, psi: &DVector<f64>) -> f64 {
        quadratic_form(&self.matrix, psi)
    }

    pub fn max_asymmetry(&self) -> f64 {
        max_asymmetry(&self.matrix)
    }

    pub fn is_symmetric(&self, tolerance: f64) -> bool {
        self.max_asymmetry() <= tolerance
    }
}

pub fn build_combined(grid: &Grid, primes: &PrimeSet) -> Result<CombinedOperator, ParameterError> {
    let analytic = build_analytic(grid);
    let mut matrix = analytic.clone();
    let mut addends = Vec::with_capacity(primes.len() + 1);
    addends.push(Addend {
        id: ComponentId::Analytic,
        weight: 1.0,
        matrix: analytic,
    });

    for entry in primes.iter() {
        let prime_matrix = build_prime_operator(grid.size(), entry.prime)?;
        matrix += &prime_matrix * entry.weight;
        addends.push(Addend {
            id: ComponentId::Prime(entry.prime),
            weight: entry.weight,
            matrix: prime_matrix,
        });
    }

    debug!(
        grid_size = grid.size(),
        period = grid.period(),
        addends = addends.len(),
        "Combined operator assembled."
    );

    Ok(CombinedOperator {
        grid: *grid,
        primes: primes.clone(),
        matrix,
        addends,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_operator() -> CombinedOperator {
        let grid = Grid::new(30).unwrap();
        let primes = PrimeSet::new(&[2, 3, 5], Some(&[1.0, 0.5, 2.0]), 30).unwrap();
        build_combined(&grid, &primes).unwrap()
    }

    #[test]
    fn build_combined_equals_weighted_sum_of_addends() {
        let op = reference_operator();
        let mut expected = DMatrix::<f64>::zeros(30, 30);
        for addend in op.addends() {
            expected += addend.matrix() * addend.weight();
        }
        assert!((op.matrix() - expected).amax() < 1e-12);
    }

    #[test]
    fn build_combined_keeps_labeled_addends_in_order() {
        let op = reference_operator();
        let ids: Vec<_> = op.addends().iter().map(Addend::id).collect();
        assert_eq!(
            ids,
            vec![
                ComponentId::Analytic,
                ComponentId::Prime(2),
                ComponentId::Prime(3),
                ComponentId::Prime(5)
            ]
        );
        assert_eq!(op.labeled().len(), 4);
        assert_eq!(op.addend(ComponentId::Prime(3)).unwrap().weight(), 0.5);
        assert!(op.addend(ComponentId::Prime(7)).is_none());
    }

    #[test]
    fn combined_operator_is_symmetric() {
        let op = reference_operator();
        assert!(op.is_symmetric(1e-12));
    }

    #[test]
    fn addend_energies_sum_to_total_energy() {
        let op = reference_operator();
        let psi = DVector::from_fn(30, |i, _| ((i * i) as f64 * 0.37).cos());
        let parts: f64 = op.addends().iter().map(|a| a.energy(&psi)).sum();
        let total = op.energy(&psi);
        assert!((parts - total).abs() <= 1e-9 * total.abs());
    }

    #[test]
    fn constant_vector_has_exactly_zero_addend_energies() {
        let op = reference_operator();
        let psi = DVector::from_element(30, 1.0 / 30f64.sqrt());
        for addend in op.addends() {
            assert_eq!(addend.energy(&psi), 0.0, "{} not annihilated", addend.id());
        }
    }

    #[test]
    fn build_combined_rejects_primes_outside_grid() {
        let grid = Grid::new(5).unwrap();
        let primes = PrimeSet::new(&[7], None, 10).unwrap();
        assert_eq!(
            build_combined(&grid, &primes).unwrap_err(),
            ParameterError::PrimeOutOfRange {
                prime: 7,
                grid_size: 5
            }
        );
    }

    #[test]
    fn empty_prime_set_yields_pure_laplacian() {
        let grid = Grid::new(8).unwrap();
        let op = build_combined(&grid, &PrimeSet::default()).unwrap();
        assert_eq!(op.addends().len(), 1);
        assert_eq!(op.matrix(), &build_analytic(&grid));
    }
}
