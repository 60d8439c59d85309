use std::io::{self, Write};

use crate::app::ExtractionResult;
use crate::domain::CreatureRecord;

const RULE_WIDTH: usize = 50;
const SUMMARY_TITLE: &str = "RESUMEN DE EXTRACCIÓN";
const SUMMARY_COLUMNS: [&str; 8] = [
    "id",
    "nombre",
    "tipos",
    "hp",
    "ataque",
    "defensa",
    "es_legendario",
    "generacion",
];

pub struct SummaryOutput;

impl SummaryOutput {
    pub fn print(result: &ExtractionResult) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(Self::render(result).as_bytes())
    }

    pub fn render(result: &ExtractionResult) -> String {
        let rule = "=".repeat(RULE_WIDTH);
        let mut out = String::new();
        out.push('\n');
        out.push_str(&rule);
        out.push('\n');
        out.push_str(SUMMARY_TITLE);
        out.push('\n');
        out.push_str(&rule);
        out.push('\n');
        out.push_str(&render_table(&result.records));
        out.push_str(&rule);
        out.push('\n');
        out.push_str(&format!(
            "extracted: {} / requested: {} (species defaults: {})\n",
            result.records.len(),
            result.requested(),
            result.species_fallbacks.len()
        ));
        out
    }
}

fn summary_cells(record: &CreatureRecord) -> [String; 8] {
    let opt = |value: Option<u32>| value.map(|v| v.to_string()).unwrap_or_default();
    [
        record.id.to_string(),
        record.name.clone(),
        record.types.clone(),
        opt(record.hp),
        opt(record.attack),
        opt(record.defense),
        record.is_legendary.to_string(),
        record.generation.clone(),
    ]
}

pub fn render_table(records: &[CreatureRecord]) -> String {
    let rows = records.iter().map(summary_cells).collect::<Vec<_>>();
    let mut widths = SUMMARY_COLUMNS.map(|header| header.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let headers = SUMMARY_COLUMNS.map(str::to_string);
    for row in std::iter::once(&headers).chain(rows.iter()) {
        let line = row
            .iter()
            .zip(widths.iter())
            .map(|(cell, width)| {
                let pad = width.saturating_sub(cell.chars().count());
                format!("{cell}{}", " ".repeat(pad))
            })
            .collect::<Vec<_>>()
            .join("  ");
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}
