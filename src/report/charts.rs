use std::f64::consts::TAU;
use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::domain::{CreatureRecord, Stat};
use crate::error::EtlError;
use crate::report::palette;
use crate::report::stats::{self, BoxSummary};

const FONT: &str = "sans-serif";

pub const HP_BINS: usize = 20;
pub const TOP_N: usize = 10;
pub const PROFILE_STATS: [Stat; 3] = [Stat::Hp, Stat::Attack, Stat::Defense];
pub const REFERENCE_CREATURES: [(&str, RGBColor); 5] = [
    ("charizard", RGBColor(0xF0, 0x80, 0x30)),
    ("blastoise", RGBColor(0x68, 0x90, 0xF0)),
    ("venusaur", RGBColor(0x78, 0xC8, 0x50)),
    ("pikachu", RGBColor(0xF8, 0xD0, 0x30)),
    ("mewtwo", RGBColor(0x70, 0x38, 0xF8)),
];

const BOX_OFFSET: f64 = 0.175;
const BOX_HALF_WIDTH: f64 = 0.15;
const DASH_SEGMENTS: usize = 40;

fn chart_err<E: std::fmt::Display>(err: E) -> EtlError {
    EtlError::Chart(err.to_string())
}

fn canvas(path: &Path, size: (u32, u32)) -> Result<DrawingArea<BitMapBackend<'_>, Shift>, EtlError> {
    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;
    Ok(root)
}

fn title_style() -> TextStyle<'static> {
    (FONT, 32.0).into_font().style(FontStyle::Bold).into()
}

fn value_label_style(h: HPos, v: VPos) -> TextStyle<'static> {
    TextStyle::from((FONT, 17.0).into_font().style(FontStyle::Bold)).pos(Pos::new(h, v))
}

// Axes are plain f64 ranges with one label slot per category; anything off
// an integer position gets an empty label.
fn category_label(labels: &[String], value: f64) -> String {
    let index = value.round();
    if index < 0.0 || (value - index).abs() > 1e-6 {
        return String::new();
    }
    labels.get(index as usize).cloned().unwrap_or_default()
}

fn dashed_vertical(x: f64, top: f64, color: RGBColor) -> Vec<PathElement<(f64, f64)>> {
    let dash = top / DASH_SEGMENTS as f64;
    (0..DASH_SEGMENTS)
        .step_by(2)
        .map(|i| {
            PathElement::new(
                vec![(x, dash * i as f64), (x, dash * (i + 1) as f64)],
                color.stroke_width(3),
            )
        })
        .collect()
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn hp_histogram(records: &[CreatureRecord], path: &Path) -> Result<(), EtlError> {
    let values = stats::column(records, Stat::Hp);
    let histogram = stats::histogram(&values, HP_BINS).ok_or(EtlError::EmptyColumn("hp"))?;
    let mean = stats::mean(&values).ok_or(EtlError::EmptyColumn("hp"))?;
    let median = stats::median(&values).ok_or(EtlError::EmptyColumn("hp"))?;
    let (low, high) = histogram.range();
    let y_max = histogram.max_count() as f64 * 1.1 + 1.0;

    let root = canvas(path, (1350, 750))?;
    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("Distribución de HP en los {} Pokémon", records.len()),
            title_style(),
        )
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(80)
        .build_cartesian_2d(low..high, 0f64..y_max)
        .map_err(chart_err)?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_desc("HP")
        .y_desc("Cantidad de Pokémon")
        .y_label_formatter(&|v| format!("{v:.0}"))
        .axis_desc_style((FONT, 22.0))
        .label_style((FONT, 18.0))
        .draw()
        .map_err(chart_err)?;

    chart
        .draw_series(histogram.bins().map(|(lo, hi, count)| {
            Rectangle::new([(lo, 0.0), (hi, count as f64)], palette::NORMAL.filled())
        }))
        .map_err(chart_err)?;
    chart
        .draw_series(histogram.bins().map(|(lo, hi, count)| {
            Rectangle::new([(lo, 0.0), (hi, count as f64)], WHITE.stroke_width(2))
        }))
        .map_err(chart_err)?;

    let references = [
        (mean, format!("Media: {mean:.1}"), palette::MEAN_LINE),
        (median, format!("Mediana: {median:.1}"), palette::MEDIAN_LINE),
    ];
    for (value, label, color) in references {
        chart
            .draw_series(dashed_vertical(value, y_max, color))
            .map_err(chart_err)?
            .label(label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 24, y)], color.stroke_width(3)));
    }
    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.85))
        .border_style(BLACK.mix(0.3))
        .label_font((FONT, 18.0))
        .draw()
        .map_err(chart_err)?;

    root.present().map_err(chart_err)
}

pub fn type_counts(records: &[CreatureRecord], path: &Path) -> Result<(), EtlError> {
    let counts = stats::primary_type_counts(records);
    let most = counts
        .first()
        .map(|(_, count)| *count)
        .ok_or(EtlError::EmptyColumn("tipos"))?;
    let names = counts.iter().map(|(name, _)| name.clone()).collect::<Vec<_>>();
    let span = counts.len() as f64 - 0.5;

    let root = canvas(path, (1650, 900))?;
    let mut chart = ChartBuilder::on(&root)
        .caption("¿Cuántos Pokémon hay de cada tipo?", title_style())
        .margin(20)
        .x_label_area_size(70)
        .y_label_area_size(70)
        .build_cartesian_2d(
            -0.5f64..span,
            0f64..(most + 5) as f64,
        )
        .map_err(chart_err)?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_labels(names.len())
        .x_label_formatter(&|v| category_label(&names, *v))
        .y_label_formatter(&|v| format!("{v:.0}"))
        .x_desc("Tipo principal")
        .y_desc("Cantidad")
        .axis_desc_style((FONT, 22.0))
        .label_style((FONT, 17.0))
        .draw()
        .map_err(chart_err)?;

    chart
        .draw_series(counts.iter().enumerate().map(|(i, (name, count))| {
            let x = i as f64;
            Rectangle::new(
                [(x - 0.4, 0.0), (x + 0.4, *count as f64)],
                palette::type_color(Some(name.as_str())).filled(),
            )
        }))
        .map_err(chart_err)?;
    chart
        .draw_series(counts.iter().enumerate().map(|(i, (_, count))| {
            Text::new(
                count.to_string(),
                (i as f64, *count as f64),
                value_label_style(HPos::Center, VPos::Bottom),
            )
        }))
        .map_err(chart_err)?;

    root.present().map_err(chart_err)
}

/// Highest attack on the top row.
pub fn top_attack(records: &[CreatureRecord], path: &Path) -> Result<(), EtlError> {
    let top = stats::top_by(records, Stat::Attack, TOP_N);
    let strongest = top
        .first()
        .and_then(|record| record.attack)
        .ok_or(EtlError::EmptyColumn("ataque"))?;
    let rows = top.len();
    // Row 0 is the bottom of the chart, so rank r sits on row rows-1-r.
    let row_labels = top
        .iter()
        .rev()
        .map(|record| record.name.clone())
        .collect::<Vec<_>>();

    let root = canvas(path, (1500, 900))?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Top 10 Pokémon con Mayor Ataque", title_style())
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(140)
        .build_cartesian_2d(
            0f64..f64::from(strongest + 20),
            -0.5f64..rows as f64 - 0.5,
        )
        .map_err(chart_err)?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_desc("Ataque")
        .x_label_formatter(&|v| format!("{v:.0}"))
        .y_labels(rows)
        .y_label_formatter(&|v| category_label(&row_labels, *v))
        .axis_desc_style((FONT, 22.0))
        .label_style((FONT, 18.0))
        .draw()
        .map_err(chart_err)?;

    let bars = top
        .iter()
        .enumerate()
        .filter_map(|(rank, record)| {
            let row = (rows - 1 - rank) as f64;
            Some((row, f64::from(record.attack?), record.primary_type()))
        })
        .collect::<Vec<_>>();
    chart
        .draw_series(bars.iter().map(|(row, value, primary)| {
            Rectangle::new(
                [(0.0, row - 0.4), (*value, row + 0.4)],
                palette::type_color(*primary).filled(),
            )
        }))
        .map_err(chart_err)?;
    chart
        .draw_series(bars.iter().map(|(row, value, _)| {
            Text::new(
                format!(" {value:.0}"),
                (*value, *row),
                value_label_style(HPos::Left, VPos::Center),
            )
        }))
        .map_err(chart_err)?;

    root.present().map_err(chart_err)
}

pub fn attack_defense_scatter(records: &[CreatureRecord], path: &Path) -> Result<(), EtlError> {
    let points = records
        .iter()
        .filter_map(|record| {
            Some((
                record,
                f64::from(record.attack?),
                f64::from(record.defense?),
            ))
        })
        .collect::<Vec<_>>();
    if points.is_empty() {
        return Err(EtlError::EmptyColumn("ataque"));
    }
    let x_max = points.iter().map(|p| p.1).fold(0.0, f64::max) * 1.1 + 5.0;
    let y_max = points.iter().map(|p| p.2).fold(0.0, f64::max) * 1.1 + 5.0;

    let root = canvas(path, (1350, 1050))?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Ataque vs Defensa: ¿Quién es más equilibrado?", title_style())
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(80)
        .build_cartesian_2d(0f64..x_max, 0f64..y_max)
        .map_err(chart_err)?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_desc("Ataque")
        .y_desc("Defensa")
        .axis_desc_style((FONT, 22.0))
        .label_style((FONT, 18.0))
        .draw()
        .map_err(chart_err)?;

    chart
        .draw_series(
            points
                .iter()
                .filter(|point| !point.0.is_legendary)
                .map(|(_, x, y)| Circle::new((*x, *y), 7, palette::NORMAL.mix(0.6).filled())),
        )
        .map_err(chart_err)?
        .label("Normal")
        .legend(|(x, y)| Circle::new((x + 10, y), 7, palette::NORMAL.mix(0.6).filled()));
    chart
        .draw_series(
            points
                .iter()
                .filter(|point| point.0.is_legendary)
                .map(|(_, x, y)| {
                    TriangleMarker::new((*x, *y), 14, palette::LEGENDARY.mix(0.9).filled())
                }),
        )
        .map_err(chart_err)?
        .label("Legendario")
        .legend(|(x, y)| TriangleMarker::new((x + 10, y), 10, palette::LEGENDARY.filled()));
    chart
        .draw_series(
            points
                .iter()
                .filter(|point| point.0.is_legendary)
                .map(|(record, x, y)| {
                    EmptyElement::at((*x, *y))
                        + Text::new(
                            record.name.clone(),
                            (9, -18),
                            (FONT, 15.0).into_font().color(&palette::LEGENDARY_LABEL),
                        )
                }),
        )
        .map_err(chart_err)?;

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.85))
        .border_style(BLACK.mix(0.3))
        .label_font((FONT, 18.0))
        .draw()
        .map_err(chart_err)?;

    root.present().map_err(chart_err)
}

pub fn legendary_boxplots(records: &[CreatureRecord], path: &Path) -> Result<(), EtlError> {
    let (regular, legendary) = stats::partition_legendary(records);
    let groups = [
        (regular, palette::NORMAL, -BOX_OFFSET),
        (legendary, palette::LEGENDARY, BOX_OFFSET),
    ];

    let mut boxes = Vec::new();
    for (position, stat) in PROFILE_STATS.iter().enumerate() {
        for (members, color, offset) in &groups {
            let values = members
                .iter()
                .filter_map(|record| record.stat(*stat))
                .map(f64::from)
                .collect::<Vec<_>>();
            if let Some(summary) = BoxSummary::from_values(&values) {
                boxes.push((position as f64 + offset, *color, summary));
            }
        }
    }
    if boxes.is_empty() {
        return Err(EtlError::EmptyColumn("hp"));
    }
    let y_max = boxes
        .iter()
        .map(|(_, _, summary)| summary.max())
        .fold(0.0, f64::max)
        * 1.1;
    let labels = PROFILE_STATS
        .iter()
        .map(|stat| stat.label().to_string())
        .collect::<Vec<_>>();

    let root = canvas(path, (1500, 900))?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Estadísticas: Legendarios vs Pokémon Normales", title_style())
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(80)
        .build_cartesian_2d(
            -0.6f64..2.6f64,
            0f64..y_max,
        )
        .map_err(chart_err)?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .y_desc("Valor")
        .x_labels(labels.len())
        .x_label_formatter(&|v| category_label(&labels, *v))
        .axis_desc_style((FONT, 22.0))
        .label_style((FONT, 20.0))
        .draw()
        .map_err(chart_err)?;

    let hw = BOX_HALF_WIDTH;
    for (x, color, summary) in &boxes {
        let x = *x;
        chart
            .draw_series([
                Rectangle::new(
                    [(x - hw, summary.q1), (x + hw, summary.q3)],
                    color.mix(0.7).filled(),
                ),
                Rectangle::new(
                    [(x - hw, summary.q1), (x + hw, summary.q3)],
                    BLACK.stroke_width(1),
                ),
            ])
            .map_err(chart_err)?;
        chart
            .draw_series([
                PathElement::new(
                    vec![(x - hw, summary.median), (x + hw, summary.median)],
                    WHITE.stroke_width(3),
                ),
                PathElement::new(
                    vec![(x, summary.q3), (x, summary.whisker_high)],
                    BLACK.stroke_width(1),
                ),
                PathElement::new(
                    vec![(x, summary.q1), (x, summary.whisker_low)],
                    BLACK.stroke_width(1),
                ),
                PathElement::new(
                    vec![
                        (x - hw / 2.0, summary.whisker_high),
                        (x + hw / 2.0, summary.whisker_high),
                    ],
                    BLACK.stroke_width(1),
                ),
                PathElement::new(
                    vec![
                        (x - hw / 2.0, summary.whisker_low),
                        (x + hw / 2.0, summary.whisker_low),
                    ],
                    BLACK.stroke_width(1),
                ),
            ])
            .map_err(chart_err)?;
        chart
            .draw_series(
                summary
                    .outliers
                    .iter()
                    .map(|value| Circle::new((x, *value), 5, BLACK.stroke_width(1))),
            )
            .map_err(chart_err)?;
    }

    for (label, color) in [("Normales", palette::NORMAL), ("Legendarios", palette::LEGENDARY)] {
        chart
            .draw_series(std::iter::empty::<Rectangle<(f64, f64)>>())
            .map_err(chart_err)?
            .label(label)
            .legend(move |(x, y)| {
                Rectangle::new([(x, y - 7), (x + 20, y + 7)], color.mix(0.7).filled())
            });
    }
    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.85))
        .border_style(BLACK.mix(0.3))
        .label_font((FONT, 18.0))
        .draw()
        .map_err(chart_err)?;

    root.present().map_err(chart_err)
}

/// Reference creatures missing from the table are skipped.
pub fn reference_radar(records: &[CreatureRecord], path: &Path) -> Result<(), EtlError> {
    let profiles = REFERENCE_CREATURES
        .iter()
        .filter_map(|(name, color)| {
            let record = stats::find_by_name(records, name)?;
            let values = PROFILE_STATS
                .iter()
                .map(|stat| record.stat(*stat).map(f64::from))
                .collect::<Option<Vec<_>>>()?;
            Some((*name, *color, values))
        })
        .collect::<Vec<_>>();
    let peak = profiles
        .iter()
        .flat_map(|(_, _, values)| values.iter().copied())
        .fold(0.0, f64::max);
    let radius_max = (peak / 20.0).ceil().max(1.0) * 20.0;
    let angles = (0..PROFILE_STATS.len())
        .map(|i| TAU * i as f64 / PROFILE_STATS.len() as f64)
        .collect::<Vec<_>>();
    let polar = |angle: f64, radius: f64| (radius * angle.cos(), radius * angle.sin());

    let root = canvas(path, (1050, 1050))?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Perfil de Estadísticas: Pokémon Icónicos", title_style())
        .margin(30)
        .build_cartesian_2d(-1.35f64..1.35f64, -1.35f64..1.35f64)
        .map_err(chart_err)?;

    let grid = BLACK.mix(0.2);
    chart
        .draw_series((1..=4).map(|ring| {
            let radius = ring as f64 / 4.0;
            let outline = (0..=72)
                .map(|step| polar(TAU * step as f64 / 72.0, radius))
                .collect::<Vec<_>>();
            PathElement::new(outline, grid.stroke_width(1))
        }))
        .map_err(chart_err)?;
    chart
        .draw_series((1..=4).map(|ring| {
            let fraction = ring as f64 / 4.0;
            Text::new(
                format!("{:.0}", radius_max * fraction),
                polar(TAU / 12.0, fraction),
                (FONT, 14.0).into_font().color(&palette::GRID_LABEL),
            )
        }))
        .map_err(chart_err)?;
    chart
        .draw_series(
            angles
                .iter()
                .map(|angle| PathElement::new(vec![(0.0, 0.0), polar(*angle, 1.0)], grid.stroke_width(1))),
        )
        .map_err(chart_err)?;
    chart
        .draw_series(angles.iter().zip(PROFILE_STATS.iter()).map(|(angle, stat)| {
            Text::new(
                stat.label(),
                polar(*angle, 1.14),
                TextStyle::from((FONT, 24.0).into_font()).pos(Pos::new(HPos::Center, VPos::Center)),
            )
        }))
        .map_err(chart_err)?;

    for (name, color, values) in &profiles {
        let color = *color;
        let vertices = angles
            .iter()
            .zip(values.iter())
            .map(|(angle, value)| polar(*angle, value / radius_max))
            .collect::<Vec<_>>();
        let mut outline = vertices.clone();
        outline.extend(vertices.first().copied());

        chart
            .draw_series(std::iter::once(Polygon::new(
                vertices.clone(),
                color.mix(0.1).filled(),
            )))
            .map_err(chart_err)?;
        chart
            .draw_series(std::iter::once(PathElement::new(outline, color.stroke_width(3))))
            .map_err(chart_err)?
            .label(capitalize(name))
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 24, y)], color.stroke_width(3)));
        chart
            .draw_series(
                vertices
                    .iter()
                    .map(|point| Circle::new(*point, 6, color.filled())),
            )
            .map_err(chart_err)?;
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.85))
        .border_style(BLACK.mix(0.3))
        .label_font((FONT, 18.0))
        .draw()
        .map_err(chart_err)?;

    root.present().map_err(chart_err)
}

pub fn correlation_heatmap(records: &[CreatureRecord], path: &Path) -> Result<(), EtlError> {
    let matrix = stats::correlation_matrix(records, &PROFILE_STATS);
    let size = PROFILE_STATS.len();
    let last = size - 1;
    let column_labels = PROFILE_STATS
        .iter()
        .map(|stat| stat.label().to_string())
        .collect::<Vec<_>>();
    // Row 0 is drawn at the top.
    let row_labels = column_labels.iter().rev().cloned().collect::<Vec<_>>();
    let span = size as f64 - 0.5;

    let root = canvas(path, (900, 750))?;
    let (plot_area, bar_area) = root.split_horizontally(760);
    let mut chart = ChartBuilder::on(&plot_area)
        .caption("¿Qué estadísticas están relacionadas?", title_style())
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(100)
        .build_cartesian_2d(
            -0.5f64..span,
            -0.5f64..span,
        )
        .map_err(chart_err)?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_labels(size)
        .y_labels(size)
        .x_label_formatter(&|v| category_label(&column_labels, *v))
        .y_label_formatter(&|v| category_label(&row_labels, *v))
        .label_style((FONT, 20.0))
        .draw()
        .map_err(chart_err)?;

    let cells = matrix
        .iter()
        .enumerate()
        .flat_map(|(row, values)| {
            values
                .iter()
                .enumerate()
                .map(move |(col, value)| (col as f64, (last - row) as f64, *value))
        })
        .collect::<Vec<_>>();
    chart
        .draw_series(cells.iter().map(|(x, y, value)| {
            let fill = value.map(palette::coolwarm).unwrap_or(palette::FALLBACK);
            Rectangle::new([(x - 0.5, y - 0.5), (x + 0.5, y + 0.5)], fill.filled())
        }))
        .map_err(chart_err)?;
    chart
        .draw_series(cells.iter().map(|(x, y, value)| {
            let (text, strong) = match value {
                Some(r) => (format!("{r:.2}"), r.abs() > 0.5),
                None => ("nan".to_string(), false),
            };
            let ink: &'static RGBColor = if strong { &WHITE } else { &BLACK };
            Text::new(
                text,
                (*x, *y),
                TextStyle::from((FONT, 26.0).into_font().style(FontStyle::Bold))
                    .color(ink)
                    .pos(Pos::new(HPos::Center, VPos::Center)),
            )
        }))
        .map_err(chart_err)?;

    let mut color_bar = ChartBuilder::on(&bar_area)
        .margin_top(80)
        .margin_bottom(70)
        .margin_right(10)
        .y_label_area_size(60)
        .build_cartesian_2d(0f64..1f64, -1f64..1f64)
        .map_err(chart_err)?;
    color_bar
        .configure_mesh()
        .disable_mesh()
        .disable_x_axis()
        .y_labels(5)
        .y_label_formatter(&|v| format!("{v:.1}"))
        .label_style((FONT, 16.0))
        .draw()
        .map_err(chart_err)?;
    color_bar
        .draw_series((0..100).map(|step| {
            let low = -1.0 + step as f64 * 0.02;
            Rectangle::new(
                [(0.0, low), (1.0, low + 0.02)],
                palette::coolwarm(low + 0.01).filled(),
            )
        }))
        .map_err(chart_err)?;

    root.present().map_err(chart_err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_labels_only_on_integers() {
        let labels = vec!["fire".to_string(), "water".to_string()];
        assert_eq!(category_label(&labels, 0.0), "fire");
        assert_eq!(category_label(&labels, 1.0), "water");
        assert_eq!(category_label(&labels, 0.5), "");
        assert_eq!(category_label(&labels, 2.0), "");
        assert_eq!(category_label(&labels, -1.0), "");
    }

    #[test]
    fn capitalize_names() {
        assert_eq!(capitalize("mewtwo"), "Mewtwo");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn dashes_stay_inside_the_plot() {
        let dashes = dashed_vertical(5.0, 10.0, palette::MEAN_LINE);
        assert_eq!(dashes.len(), DASH_SEGMENTS / 2);
    }
}
