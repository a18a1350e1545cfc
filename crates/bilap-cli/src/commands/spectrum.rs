use crate::cli::SpectrumArgs;
use crate::config::PartialConfig;
use crate::error::Result;
use crate::output;
use bilap::engine::analyzer::SpectralAnalyzer;
use std::path::Path;
use tracing::info;

pub fn run(args: SpectrumArgs, config_path: Option<&Path>) -> Result<()> {
    let settings = PartialConfig::load(config_path)?.merge_spectrum(&args)?;
    info!(
        grid_size = settings.hamiltonian.grid.size(),
        count = settings.count,
        mode = settings.mode,
        "Resolved spectrum settings."
    );

    let analyzer = SpectralAnalyzer::new(settings.hamiltonian)?;
    println!("{}\n", output::describe_hamiltonian(&analyzer));

    let eigenvalues = analyzer.eigenvalues(settings.count)?;
    println!("{}\n", output::format_eigenvalues(eigenvalues));

    let decomposition = analyzer.decompose_energy(settings.mode)?;
    println!(
        "{}\n",
        output::format_decomposition(&decomposition, analyzer.theoretical_first_mode())
    );

    println!("Shift invariance ‖S_p ψ − ψ‖ / ‖ψ‖:");
    let mut modes = vec![settings.mode];
    if settings.mode != 0 {
        modes.push(0);
    }
    for mode in modes {
        let values = analyzer
            .primes()
            .primes()
            .into_iter()
            .map(|p| analyzer.check_valuation_invariance(mode, p).map(|v| (p, v)))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        println!("{}", output::format_invariance(mode, &values));
    }

    Ok(())
}
