mod defaults;

use crate::cli::{ExperimentArgs, HamiltonianArgs, SpectrumArgs};
use crate::error::{CliError, Result};
use crate::utils::parser;
use bilap::engine::config::{ExperimentConfig, ExperimentConfigBuilder, HamiltonianConfig};
use bilap::engine::error::EngineError;
use defaults::DefaultsConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialHamiltonianConfig {
    grid_size: Option<usize>,
    primes: Option<Vec<u64>>,
    weights: Option<Vec<f64>>,
    period: Option<f64>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialSpectrumConfig {
    count: Option<usize>,
    mode: Option<usize>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialExperimentsConfig {
    modes: Option<usize>,
    grid_sizes: Option<Vec<usize>>,
    prime_sets: Option<Vec<Vec<u64>>>,
    mode: Option<usize>,
    output_dir: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialConfig {
    hamiltonian: Option<PartialHamiltonianConfig>,
    spectrum: Option<PartialSpectrumConfig>,
    experiments: Option<PartialExperimentsConfig>,
}

/// Fully resolved settings for `bilap spectrum`.
#[derive(Debug, Clone)]
pub struct SpectrumSettings {
    pub hamiltonian: HamiltonianConfig,
    pub count: usize,
    pub mode: usize,
}

/// Fully resolved settings for `bilap experiment`.
#[derive(Debug, Clone)]
pub struct ExperimentSettings {
    pub experiment: ExperimentConfig,
    pub output_dir: Option<PathBuf>,
}

impl PartialConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Reads `path` when given, otherwise starts from an empty configuration.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn merge_spectrum(self, args: &SpectrumArgs) -> Result<SpectrumSettings> {
        let defaults = DefaultsConfig::default();
        let overrides = Self::from_set_values(&args.set_values)?;

        let hamiltonian = resolve_hamiltonian(
            &overrides.hamiltonian.unwrap_or_default(),
            &args.hamiltonian,
            &self.hamiltonian.unwrap_or_default(),
            &defaults,
        )?;

        let set = overrides.spectrum.unwrap_or_default();
        let file = self.spectrum.unwrap_or_default();
        Ok(SpectrumSettings {
            hamiltonian,
            count: set
                .count
                .or(args.count)
                .or(file.count)
                .unwrap_or(defaults.spectrum_count),
            mode: set
                .mode
                .or(args.mode)
                .or(file.mode)
                .unwrap_or(defaults.spectrum_mode),
        })
    }

    pub fn merge_experiment(self, args: &ExperimentArgs) -> Result<ExperimentSettings> {
        let defaults = DefaultsConfig::default();
        let overrides = Self::from_set_values(&args.set_values)?;

        let hamiltonian = resolve_hamiltonian(
            &overrides.hamiltonian.unwrap_or_default(),
            &args.hamiltonian,
            &self.hamiltonian.unwrap_or_default(),
            &defaults,
        )?;

        let set = overrides.experiments.unwrap_or_default();
        let file = self.experiments.unwrap_or_default();

        let mut builder = ExperimentConfigBuilder::new()
            .hamiltonian(hamiltonian)
            .mode_count(
                set.modes
                    .or(args.modes)
                    .or(file.modes)
                    .unwrap_or(defaults.experiment_modes),
            )
            .analysis_mode(
                set.mode
                    .or(args.mode)
                    .or(file.mode)
                    .unwrap_or(defaults.experiment_mode),
            );
        if let Some(sizes) = set
            .grid_sizes
            .or_else(|| args.grid_sizes.clone())
            .or(file.grid_sizes)
        {
            builder = builder.grid_sizes(sizes);
        }
        if let Some(sets) = set
            .prime_sets
            .or_else(|| args.prime_sets.clone())
            .or(file.prime_sets)
        {
            builder = builder.prime_sets(sets);
        }
        let experiment = builder.build().map_err(EngineError::from)?;

        Ok(ExperimentSettings {
            experiment,
            output_dir: set
                .output_dir
                .or_else(|| args.output_dir.clone())
                .or(file.output_dir),
        })
    }

    fn from_set_values(set_values: &[String]) -> Result<Self> {
        let mut config = Self::default();
        for kv_pair in set_values {
            let (key, value) = parser::parse_key_value(kv_pair)?;

            match key {
                "hamiltonian.grid-size" => {
                    config
                        .hamiltonian
                        .get_or_insert_with(Default::default)
                        .grid_size = Some(parser::parse_scalar(key, value, "integer")?);
                }
                "hamiltonian.primes" => {
                    config.hamiltonian.get_or_insert_with(Default::default).primes =
                        Some(parser::parse_list(key, value, "integer")?);
                }
                "hamiltonian.weights" => {
                    config.hamiltonian.get_or_insert_with(Default::default).weights =
                        Some(parser::parse_list(key, value, "float")?);
                }
                "hamiltonian.period" => {
                    config.hamiltonian.get_or_insert_with(Default::default).period =
                        Some(parser::parse_scalar(key, value, "float")?);
                }
                "spectrum.count" => {
                    config.spectrum.get_or_insert_with(Default::default).count =
                        Some(parser::parse_scalar(key, value, "integer")?);
                }
                "spectrum.mode" => {
                    config.spectrum.get_or_insert_with(Default::default).mode =
                        Some(parser::parse_scalar(key, value, "integer")?);
                }
                "experiments.modes" => {
                    config.experiments.get_or_insert_with(Default::default).modes =
                        Some(parser::parse_scalar(key, value, "integer")?);
                }
                "experiments.grid-sizes" => {
                    config
                        .experiments
                        .get_or_insert_with(Default::default)
                        .grid_sizes = Some(parser::parse_list(key, value, "integer")?);
                }
                "experiments.prime-sets" => {
                    config
                        .experiments
                        .get_or_insert_with(Default::default)
                        .prime_sets = Some(parser::parse_nested_list(key, value, "integer")?);
                }
                "experiments.mode" => {
                    config.experiments.get_or_insert_with(Default::default).mode =
                        Some(parser::parse_scalar(key, value, "integer")?);
                }
                "experiments.output-dir" => {
                    config
                        .experiments
                        .get_or_insert_with(Default::default)
                        .output_dir = Some(PathBuf::from(value));
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(config)
    }
}

/// Index and value of the first layer that provides a value.
fn first_layer<T: Clone>(layers: [Option<&T>; 3]) -> Option<(usize, T)> {
    layers
        .into_iter()
        .enumerate()
        .find_map(|(i, value)| value.map(|v| (i, v.clone())))
}

/// Layers are `--set`, flags, file. Weights from a lower layer than the primes
/// are dropped, since they were written for a different prime list.
fn resolve_hamiltonian(
    set: &PartialHamiltonianConfig,
    args: &HamiltonianArgs,
    file: &PartialHamiltonianConfig,
    defaults: &DefaultsConfig,
) -> Result<HamiltonianConfig> {
    let grid_size = set
        .grid_size
        .or(args.grid_size)
        .or(file.grid_size)
        .unwrap_or(defaults.grid_size);
    let period = set.period.or(args.period).or(file.period);

    let primes = first_layer([set.primes.as_ref(), args.primes.as_ref(), file.primes.as_ref()]);
    let weights = first_layer([
        set.weights.as_ref(),
        args.weights.as_ref(),
        file.weights.as_ref(),
    ]);
    let primes_layer = primes.as_ref().map_or(usize::MAX, |(layer, _)| *layer);
    let weights = match weights {
        Some((layer, _)) if layer > primes_layer => {
            debug!("Ignoring weights from a lower-precedence source than the prime list.");
            None
        }
        other => other.map(|(_, w)| w),
    };
    let primes = primes
        .map(|(_, p)| p)
        .unwrap_or_else(|| defaults.primes.clone());

    let mut builder = HamiltonianConfig::builder()
        .grid_size(grid_size)
        .primes(primes)
        .period_override(period);
    if let Some(weights) = weights {
        builder = builder.weights(weights);
    }
    Ok(builder.build()?)
}
