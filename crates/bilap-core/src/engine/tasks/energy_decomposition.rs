use crate::core::decomposition::EnergyDecomposition;
use crate::core::operators::combined::CombinedOperator;
use nalgebra::DVector;
use std::collections::BTreeMap;
use tracing::{debug, instrument};

/// Splits `ψᵗ H ψ` into the weighted energy of every addend of `operator`.
#[instrument(skip_all, name = "energy_decomposition_task", fields(mode = mode))]
pub fn run(
    operator: &CombinedOperator,
    psi: &DVector<f64>,
    mode: usize,
    eigenvalue: f64,
) -> EnergyDecomposition {
    let components: BTreeMap<_, _> = operator
        .addends()
        .iter()
        .map(|addend| (addend.id(), addend.energy(psi)))
        .collect();
    let total = operator.energy(psi);

    let decomposition = EnergyDecomposition::new(mode, eigenvalue, total, components);
    debug!(
        total,
        eigenvalue,
        residual = decomposition.residual(),
        "Energy decomposed."
    );
    decomposition
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::grid::Grid;
    use crate::core::models::ids::ComponentId;
    use crate::core::models::primes::PrimeSet;
    use crate::core::operators::combined::build_combined;

    fn operator() -> CombinedOperator {
        let grid = Grid::new(24).unwrap();
        let primes = PrimeSet::new(&[2, 3, 7], Some(&[1.0, 0.25, 3.0]), 24).unwrap();
        build_combined(&grid, &primes).unwrap()
    }

    #[test]
    fn run_produces_one_component_per_addend() {
        let op = operator();
        let psi = DVector::from_fn(24, |i, _| (i as f64 * 0.3).sin());
        let d = run(&op, &psi, 3, 0.0);
        let ids: Vec<_> = d.components().map(|(id, _)| id).collect();
        assert_eq!(
            ids,
            vec![
                ComponentId::Analytic,
                ComponentId::Prime(2),
                ComponentId::Prime(3),
                ComponentId::Prime(7)
            ]
        );
        assert_eq!(d.mode(), 3);
    }

    #[test]
    fn run_components_sum_to_quadratic_form() {
        let op = operator();
        let psi = DVector::from_fn(24, |i, _| ((i * 7 % 5) as f64) - 2.0);
        let d = run(&op, &psi, 0, 0.0);
        assert!(d.residual().abs() <= 1e-9 * d.total().abs().max(1.0));
        assert!((d.total() - op.energy(&psi)).abs() < 1e-12);
    }

    #[test]
    fn run_applies_weights_to_prime_components() {
        let op = operator();
        let psi = DVector::from_fn(24, |i, _| if i % 2 == 0 { 1.0 } else { -1.0 });
        let d = run(&op, &psi, 0, 0.0);
        let raw = op.addend(ComponentId::Prime(7)).unwrap().raw_energy(&psi);
        assert!((d.prime(7).unwrap() - 3.0 * raw).abs() < 1e-12);
    }
}
