pub mod charts;
pub mod palette;
pub mod stats;

use std::fs;
use std::path::Path;

use camino::{Utf8Path, Utf8PathBuf};
use tracing::info;

use crate::domain::CreatureRecord;
use crate::error::EtlError;
use crate::store::DataStore;

type RenderFn = fn(&[CreatureRecord], &Path) -> Result<(), EtlError>;

#[derive(Clone, Copy)]
pub struct Chart {
    pub number: u8,
    pub file_name: &'static str,
    render: RenderFn,
}

impl Chart {
    pub fn render(&self, records: &[CreatureRecord], path: &Path) -> Result<(), EtlError> {
        (self.render)(records, path)
    }
}

pub const CHARTS: [Chart; 7] = [
    Chart {
        number: 1,
        file_name: "1_histograma_hp.png",
        render: charts::hp_histogram,
    },
    Chart {
        number: 2,
        file_name: "2_conteo_tipos.png",
        render: charts::type_counts,
    },
    Chart {
        number: 3,
        file_name: "3_top10_ataque.png",
        render: charts::top_attack,
    },
    Chart {
        number: 4,
        file_name: "4_scatter_ataque_defensa.png",
        render: charts::attack_defense_scatter,
    },
    Chart {
        number: 5,
        file_name: "5_boxplot_legendarios.png",
        render: charts::legendary_boxplots,
    },
    Chart {
        number: 6,
        file_name: "6_radar_iconicos.png",
        render: charts::reference_radar,
    },
    Chart {
        number: 7,
        file_name: "7_heatmap_correlacion.png",
        render: charts::correlation_heatmap,
    },
];

pub fn load_table(store: &DataStore) -> Result<Vec<CreatureRecord>, EtlError> {
    let records = store.read_csv()?;
    info!("loaded {} rows from {}", records.len(), store.csv_path());
    Ok(records)
}

pub struct Reporter {
    reports_dir: Utf8PathBuf,
}

impl Reporter {
    pub fn new(reports_dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            reports_dir: reports_dir.into(),
        }
    }

    pub fn reports_dir(&self) -> &Utf8Path {
        &self.reports_dir
    }

    pub fn chart_path(&self, chart: &Chart) -> Utf8PathBuf {
        self.reports_dir.join(chart.file_name)
    }

    // The first failure stops the run.
    pub fn run<F>(&self, records: &[CreatureRecord], mut on_saved: F) -> Result<Vec<Utf8PathBuf>, EtlError>
    where
        F: FnMut(&Chart, &Utf8Path),
    {
        fs::create_dir_all(self.reports_dir.as_std_path())
            .map_err(|err| EtlError::Filesystem(format!("create {}: {err}", self.reports_dir)))?;

        let mut written = Vec::with_capacity(CHARTS.len());
        for chart in &CHARTS {
            let path = self.chart_path(chart);
            chart.render(records, path.as_std_path())?;
            info!(chart = chart.number, "saved {path}");
            on_saved(chart, &path);
            written.push(path);
        }
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chart_sequence_is_fixed() {
        let numbers = CHARTS.iter().map(|chart| chart.number).collect::<Vec<_>>();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5, 6, 7]);
        for chart in &CHARTS {
            assert!(chart.file_name.starts_with(&format!("{}_", chart.number)));
            assert!(chart.file_name.ends_with(".png"));
        }
    }

    #[test]
    fn chart_paths_live_in_reports_dir() {
        let reporter = Reporter::new("reports");
        assert_eq!(
            reporter.chart_path(&CHARTS[6]),
            Utf8PathBuf::from("reports/7_heatmap_correlacion.png")
        );
    }
}
