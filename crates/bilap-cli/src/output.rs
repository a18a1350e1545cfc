use crate::error::Result;
use bilap::core::decomposition::EnergyDecomposition;
use bilap::core::models::grid::PeriodMapping;
use bilap::engine::analyzer::SpectralAnalyzer;
use bilap::workflows::tables::{TableRow, write_csv};
use itertools::Itertools;
use std::fmt::Write as _;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::info;

pub fn describe_hamiltonian(analyzer: &SpectralAnalyzer) -> String {
    let grid = analyzer.grid();
    let source = match grid.mapping() {
        PeriodMapping::Logarithmic => "ln N",
        PeriodMapping::Fixed(_) => "fixed",
    };
    let primes = if analyzer.primes().is_empty() {
        "none (pure Laplacian)".to_string()
    } else {
        analyzer
            .primes()
            .iter()
            .map(|e| format!("p={} (w={})", e.prime, e.weight))
            .join(", ")
    };
    format!(
        "Hamiltonian: N = {}, T = {:.6} ({}), Δ = {:.6}\nPrimes: {}",
        grid.size(),
        grid.period(),
        source,
        grid.spacing(),
        primes
    )
}

pub fn format_eigenvalues(eigenvalues: &[f64]) -> String {
    let mut out = format!("Lowest {} eigenvalues:", eigenvalues.len());
    for (n, value) in eigenvalues.iter().enumerate() {
        let _ = write!(out, "\n  λ{:<4} {:>14.6}", n, value);
    }
    out
}

/// Channel energies with their share of the total, the accounting residual and the
/// continuum cross-check for the analytic part.
pub fn format_decomposition(d: &EnergyDecomposition, theoretical_first: f64) -> String {
    let mut out = format!(
        "Energy decomposition of mode {} (λ = {:.6}):",
        d.mode(),
        d.eigenvalue()
    );
    let total = d.total();
    for (id, value) in d.components() {
        let share = if total.abs() > f64::EPSILON {
            format!("{:>7.2}%", 100.0 * value / total)
        } else {
            "      -".to_string()
        };
        let _ = write!(out, "\n  {:<10} {:>14.6}  {}", id.to_string(), value, share);
    }
    let _ = write!(out, "\n  {:<10} {:>14.6}", "total", total);
    let _ = write!(out, "\n  {:<10} {:>14.3e}", "residual", d.residual());

    let deviation = 100.0 * (d.analytic() - theoretical_first).abs() / theoretical_first;
    let _ = write!(
        out,
        "\n  {:<10} {:>14.6}  (analytic deviates by {:.3}%)",
        "(π/T)²", theoretical_first, deviation
    );
    match d.analytic_to_valuation_ratio() {
        Some(ratio) => {
            let _ = write!(out, "\n  analytic/valuation ratio: {:.4}", ratio);
        }
        None => out.push_str("\n  analytic/valuation ratio: undefined (no valuation energy)"),
    }
    out
}

pub fn format_invariance(mode: usize, values: &[(u64, f64)]) -> String {
    if values.is_empty() {
        return format!("  mode {}: no primes configured", mode);
    }
    let cells = values
        .iter()
        .map(|(p, v)| format!("p={} {:.6e}", p, v))
        .join("  ");
    format!("  mode {}: {}", mode, cells)
}

/// Left-aligned text table with a header rule; empty input yields a placeholder.
pub fn render_table<R: TableRow>(rows: &[R]) -> String {
    let Some(first) = rows.first() else {
        return "(no rows)".to_string();
    };
    let headers = first.headers();
    let records: Vec<Vec<String>> = rows.iter().map(TableRow::record).collect();

    let widths: Vec<usize> = (0..headers.len())
        .map(|col| {
            records
                .iter()
                .filter_map(|r| r.get(col))
                .chain(std::iter::once(&headers[col]))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let line = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = line(&headers);
    let rule_len = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
    out.push('\n');
    out.push_str(&"-".repeat(rule_len));
    for record in &records {
        out.push('\n');
        out.push_str(&line(record));
    }
    out
}

/// Writes `rows` to `<dir>/<name>.csv`, creating `dir` when needed.
pub fn write_table<R: TableRow>(dir: &Path, name: &str, rows: &[R]) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}.csv", name));
    let file = File::create(&path)?;
    write_csv(rows, BufWriter::new(file))?;
    info!(path = %path.display(), rows = rows.len(), "Table exported.");
    Ok(path)
}
