use crate::core::decomposition::{ChannelStats, EnergyDecomposition};
use crate::core::models::ids::ComponentId;
use itertools::Itertools;
use std::io;

/// A row of a result table that can be exported column by column.
///
/// Rows of one table share their headers; [`write_csv`] takes them from the first row.
pub trait TableRow {
    fn headers(&self) -> Vec<String>;
    fn record(&self) -> Vec<String>;
}

/// Writes a header line followed by one record per row. An empty table writes nothing.
pub fn write_csv<R: TableRow, W: io::Write>(rows: &[R], sink: W) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(sink);
    if let Some(first) = rows.first() {
        writer.write_record(first.headers())?;
    }
    for row in rows {
        writer.write_record(row.record())?;
    }
    writer.flush()?;
    Ok(())
}

fn optional(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// One mode of a mode sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct ModeRow {
    pub mode: usize,
    pub eigenvalue: f64,
    pub analytic: f64,
    pub primes: Vec<(u64, f64)>,
    pub valuation_total: f64,
    pub ratio: Option<f64>,
}

impl From<&EnergyDecomposition> for ModeRow {
    fn from(d: &EnergyDecomposition) -> Self {
        Self {
            mode: d.mode(),
            eigenvalue: d.eigenvalue(),
            analytic: d.analytic(),
            primes: d.prime_components().collect(),
            valuation_total: d.valuation_total(),
            ratio: d.analytic_to_valuation_ratio(),
        }
    }
}

impl TableRow for ModeRow {
    fn headers(&self) -> Vec<String> {
        let mut headers = vec!["mode".to_string(), "eigenvalue".to_string(), "analytic".to_string()];
        headers.extend(self.primes.iter().map(|(p, _)| ComponentId::Prime(*p).to_string()));
        headers.push("valuation_total".to_string());
        headers.push("analytic_to_valuation".to_string());
        headers
    }

    fn record(&self) -> Vec<String> {
        let mut record = vec![
            self.mode.to_string(),
            self.eigenvalue.to_string(),
            self.analytic.to_string(),
        ];
        record.extend(self.primes.iter().map(|(_, v)| v.to_string()));
        record.push(self.valuation_total.to_string());
        record.push(optional(self.ratio));
        record
    }
}

/// Shift-invariance of one mode under every configured prime.
#[derive(Debug, Clone, PartialEq)]
pub struct InvarianceRow {
    pub mode: usize,
    pub eigenvalue: f64,
    pub invariance: Vec<(u64, f64)>,
}

impl TableRow for InvarianceRow {
    fn headers(&self) -> Vec<String> {
        let mut headers = vec!["mode".to_string(), "eigenvalue".to_string()];
        headers.extend(self.invariance.iter().map(|(p, _)| ComponentId::Prime(*p).to_string()));
        headers
    }

    fn record(&self) -> Vec<String> {
        let mut record = vec![self.mode.to_string(), self.eigenvalue.to_string()];
        record.extend(self.invariance.iter().map(|(_, v)| v.to_string()));
        record
    }
}

/// Low end of the spectrum at one grid size.
#[derive(Debug, Clone, PartialEq)]
pub struct GridRow {
    pub grid_size: usize,
    pub period: f64,
    pub ground: f64,
    pub first: f64,
    pub ratio: Option<f64>,
    pub theoretical_first: f64,
}

impl TableRow for GridRow {
    fn headers(&self) -> Vec<String> {
        ["grid_size", "period", "lambda_0", "lambda_1", "analytic_to_valuation", "theoretical_lambda_1"]
            .iter()
            .map(|h| h.to_string())
            .collect()
    }

    fn record(&self) -> Vec<String> {
        vec![
            self.grid_size.to_string(),
            self.period.to_string(),
            self.ground.to_string(),
            self.first.to_string(),
            optional(self.ratio),
            self.theoretical_first.to_string(),
        ]
    }
}

/// Channel split of one mode for one prime set.
///
/// Prime sets differ between rows, so channel energies are packed into a single
/// `label:value` column separated by semicolons.
#[derive(Debug, Clone, PartialEq)]
pub struct PrimeSetRow {
    pub primes: Vec<u64>,
    pub mode: usize,
    pub eigenvalue: f64,
    pub channels: Vec<(ComponentId, f64)>,
    pub stats: ChannelStats,
}

impl PrimeSetRow {
    pub fn primes_label(&self) -> String {
        self.primes.iter().join(";")
    }

    pub fn channels_label(&self) -> String {
        self.channels
            .iter()
            .map(|(id, value)| format!("{}:{}", id, value))
            .join(";")
    }
}

impl From<&EnergyDecomposition> for PrimeSetRow {
    fn from(d: &EnergyDecomposition) -> Self {
        Self {
            primes: d.prime_components().map(|(p, _)| p).collect(),
            mode: d.mode(),
            eigenvalue: d.eigenvalue(),
            channels: d.components().collect(),
            stats: d.channel_stats(),
        }
    }
}

impl TableRow for PrimeSetRow {
    fn headers(&self) -> Vec<String> {
        ["primes", "mode", "eigenvalue", "channels", "mean", "std_dev", "cv"]
            .iter()
            .map(|h| h.to_string())
            .collect()
    }

    fn record(&self) -> Vec<String> {
        vec![
            self.primes_label(),
            self.mode.to_string(),
            self.eigenvalue.to_string(),
            self.channels_label(),
            self.stats.mean.to_string(),
            self.stats.std_dev.to_string(),
            self.stats.coefficient_of_variation.to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn decomposition() -> EnergyDecomposition {
        let components = BTreeMap::from([
            (ComponentId::Analytic, 0.5),
            (ComponentId::Prime(2), 0.25),
            (ComponentId::Prime(3), 0.25),
        ]);
        EnergyDecomposition::new(1, 1.0, 1.0, components)
    }

    #[test]
    fn write_csv_emits_header_and_one_record_per_row() {
        let row = ModeRow::from(&decomposition());
        let rows = vec![row.clone(), ModeRow { mode: 2, ..row }];
        let mut buffer = Vec::new();
        write_csv(&rows, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "mode,eigenvalue,analytic,p=2,p=3,valuation_total,analytic_to_valuation"
        );
        assert_eq!(lines[1], "1,1,0.5,0.25,0.25,0.5,1");
        assert!(lines[2].starts_with("2,"));
    }

    #[test]
    fn write_csv_on_empty_table_writes_nothing() {
        let mut buffer = Vec::new();
        write_csv::<GridRow, _>(&[], &mut buffer).unwrap();
        assert!(buffer.is_empty());
    }

    #[test]
    fn missing_ratio_is_written_as_empty_field() {
        let row = GridRow {
            grid_size: 2,
            period: 0.5,
            ground: 0.0,
            first: 4.0,
            ratio: None,
            theoretical_first: 1.0,
        };
        assert_eq!(row.record()[4], "");
        assert_eq!(row.headers().len(), row.record().len());
    }

    #[test]
    fn prime_set_row_packs_channels() {
        let row = PrimeSetRow::from(&decomposition());
        assert_eq!(row.primes_label(), "2;3");
        assert_eq!(row.channels_label(), "analytic:0.5;p=2:0.25;p=3:0.25");
        assert_eq!(row.headers().len(), row.record().len());
    }

    #[test]
    fn invariance_row_has_one_column_per_prime() {
        let row = InvarianceRow {
            mode: 0,
            eigenvalue: 0.0,
            invariance: vec![(2, 0.0), (5, 1e-12)],
        };
        assert_eq!(row.headers(), vec!["mode", "eigenvalue", "p=2", "p=5"]);
        assert_eq!(row.record().len(), 4);
    }
}
