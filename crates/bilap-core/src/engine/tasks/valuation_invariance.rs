use crate::core::operators::shift::apply_shift;
use nalgebra::DVector;
use tracing::{instrument, trace};

/// `‖S_p ψ − ψ‖ / ‖ψ‖`, or `0` for the zero vector.
///
/// Zero means `ψ` is invariant under translation by `p` grid steps.
#[instrument(skip_all, name = "valuation_invariance_task", fields(prime = prime))]
pub fn run(psi: &DVector<f64>, prime: u64) -> f64 {
    let norm = psi.norm();
    if norm == 0.0 {
        return 0.0;
    }
    let shifted = apply_shift(psi, prime);
    let ratio = (shifted - psi).norm() / norm;
    trace!(ratio, "Shift deviation computed.");
    ratio
}
