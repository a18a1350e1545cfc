use crate::core::models::ids::ComponentId;
use std::collections::BTreeMap;

/// Valuation totals at or below this are treated as zero when forming ratios.
pub const VALUATION_FLOOR: f64 = 1e-10;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelStats {
    pub mean: f64,
    pub std_dev: f64,
    pub coefficient_of_variation: f64,
}

/// Energy of one eigenmode split across the addends of the combined operator.
#[derive(Debug, Clone, PartialEq)]
pub struct EnergyDecomposition {
    mode: usize,
    eigenvalue: f64,
    total: f64,
    components: BTreeMap<ComponentId, f64>,
}

impl EnergyDecomposition {
    pub fn new(
        mode: usize,
        eigenvalue: f64,
        total: f64,
        components: BTreeMap<ComponentId, f64>,
    ) -> Self {
        Self {
            mode,
            eigenvalue,
            total,
            components,
        }
    }

    pub fn mode(&self) -> usize {
        self.mode
    }

    /// The eigenvalue reported by the diagonalization for this mode.
    pub fn eigenvalue(&self) -> f64 {
        self.eigenvalue
    }

    /// `ψᵗ H ψ` for the mode's eigenvector.
    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn get(&self, id: ComponentId) -> Option<f64> {
        self.components.get(&id).copied()
    }

    /// Looks up a value by its textual label: `"total"`, `"analytic"` or `"p=<prime>"`.
    pub fn get_label(&self, label: &str) -> Option<f64> {
        if label.trim().eq_ignore_ascii_case("total") {
            return Some(self.total);
        }
        label.parse::<ComponentId>().ok().and_then(|id| self.get(id))
    }

    pub fn analytic(&self) -> f64 {
        self.get(ComponentId::Analytic).unwrap_or_default()
    }

    pub fn prime(&self, prime: u64) -> Option<f64> {
        self.get(ComponentId::Prime(prime))
    }

    /// Components ordered analytic first, then by prime.
    pub fn components(&self) -> impl Iterator<Item = (ComponentId, f64)> + '_ {
        self.components.iter().map(|(id, value)| (*id, *value))
    }

    pub fn prime_components(&self) -> impl Iterator<Item = (u64, f64)> + '_ {
        self.components
            .iter()
            .filter_map(|(id, value)| id.prime().map(|p| (p, *value)))
    }

    pub fn valuation_total(&self) -> f64 {
        self.prime_components().map(|(_, v)| v).sum()
    }

    pub fn component_sum(&self) -> f64 {
        self.components.values().sum()
    }

    /// `total − Σ components`; zero up to rounding.
    pub fn residual(&self) -> f64 {
        self.total - self.component_sum()
    }

    /// Checks both accounting identities: components sum to the total and the total
    /// matches the eigenvalue. `tolerance` is relative, with an absolute floor of the
    /// same size for modes whose energy is close to zero.
    pub fn is_consistent(&self, tolerance: f64) -> bool {
        let scale = self.total.abs().max(1.0);
        self.residual().abs() <= tolerance * scale
            && (self.total - self.eigenvalue).abs() <= tolerance * scale
    }

    /// Analytic energy over the summed valuation energy, `None` when the valuation
    /// energy vanishes.
    pub fn analytic_to_valuation_ratio(&self) -> Option<f64> {
        let valuation = self.valuation_total();
        (valuation > VALUATION_FLOOR).then(|| self.analytic() / valuation)
    }

    /// Mean, population standard deviation and coefficient of variation over the
    /// analytic and prime channels.
    pub fn channel_stats(&self) -> ChannelStats {
        let count = self.components.len();
        if count == 0 {
            return ChannelStats {
                mean: 0.0,
                std_dev: 0.0,
                coefficient_of_variation: 0.0,
            };
        }
        let mean = self.component_sum() / count as f64;
        let variance = self
            .components
            .values()
            .map(|v| (v - mean).powi(2))
            .sum::<f64>()
            / count as f64;
        let std_dev = variance.sqrt();
        let coefficient_of_variation = if mean > 0.0 { std_dev / mean } else { 0.0 };
        ChannelStats {
            mean,
            std_dev,
            coefficient_of_variation,
        }
    }
}
