use crate::domain::{CreatureRecord, Stat};

pub fn column(records: &[CreatureRecord], stat: Stat) -> Vec<f64> {
    records
        .iter()
        .filter_map(|record| record.stat(stat))
        .map(f64::from)
        .collect()
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

pub fn median(values: &[f64]) -> Option<f64> {
    quantile(&sorted(values), 0.5)
}

fn sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

// Input must be sorted.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let position = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn range(&self) -> (f64, f64) {
        (
            self.edges.first().copied().unwrap_or(0.0),
            self.edges.last().copied().unwrap_or(1.0),
        )
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    pub fn bins(&self) -> impl Iterator<Item = (f64, f64, usize)> + '_ {
        self.edges
            .windows(2)
            .zip(self.counts.iter())
            .map(|(edge, count)| (edge[0], edge[1], *count))
    }
}

/// Equal-width bins between the minimum and maximum value. Every bin is
/// half-open except the last, which also takes the maximum. A single
/// distinct value gets a unit-wide range centered on it.
pub fn histogram(values: &[f64], bins: usize) -> Option<Histogram> {
    if values.is_empty() || bins == 0 {
        return None;
    }
    let mut low = values.iter().copied().fold(f64::INFINITY, f64::min);
    let mut high = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if low == high {
        low -= 0.5;
        high += 0.5;
    }
    let width = (high - low) / bins as f64;
    let edges = (0..=bins)
        .map(|i| if i == bins { high } else { low + width * i as f64 })
        .collect::<Vec<_>>();

    let mut counts = vec![0usize; bins];
    for value in values {
        let index = (((value - low) / width).floor() as usize).min(bins - 1);
        counts[index] += 1;
    }
    Some(Histogram { edges, counts })
}

// Ties keep first-appearance order.
pub fn primary_type_counts(records: &[CreatureRecord]) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for primary in records.iter().filter_map(|record| record.primary_type()) {
        match counts.iter_mut().find(|(name, _)| name == primary) {
            Some((_, count)) => *count += 1,
            None => counts.push((primary.to_string(), 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

pub fn top_by(records: &[CreatureRecord], stat: Stat, n: usize) -> Vec<&CreatureRecord> {
    let mut ranked = records
        .iter()
        .filter(|record| record.stat(stat).is_some())
        .collect::<Vec<_>>();
    ranked.sort_by(|a, b| b.stat(stat).cmp(&a.stat(stat)));
    ranked.truncate(n);
    ranked
}

pub fn partition_legendary(
    records: &[CreatureRecord],
) -> (Vec<&CreatureRecord>, Vec<&CreatureRecord>) {
    records.iter().partition(|record| !record.is_legendary)
}

pub fn find_by_name<'a>(records: &'a [CreatureRecord], name: &str) -> Option<&'a CreatureRecord> {
    records.iter().find(|record| record.name == name)
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoxSummary {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub whisker_low: f64,
    pub whisker_high: f64,
    pub outliers: Vec<f64>,
}

impl BoxSummary {
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let sorted = sorted(values);
        let q1 = quantile(&sorted, 0.25)?;
        let median = quantile(&sorted, 0.5)?;
        let q3 = quantile(&sorted, 0.75)?;
        let reach = 1.5 * (q3 - q1);
        let (low_fence, high_fence) = (q1 - reach, q3 + reach);

        let inside = || {
            sorted
                .iter()
                .copied()
                .filter(move |v| *v >= low_fence && *v <= high_fence)
        };
        let whisker_low = inside().next().unwrap_or(q1).min(q1);
        let whisker_high = inside().last().unwrap_or(q3).max(q3);
        let outliers = sorted
            .iter()
            .copied()
            .filter(|v| *v < low_fence || *v > high_fence)
            .collect();

        Some(Self {
            q1,
            median,
            q3,
            whisker_low,
            whisker_high,
            outliers,
        })
    }

    pub fn max(&self) -> f64 {
        self.outliers
            .iter()
            .copied()
            .fold(self.whisker_high, f64::max)
    }
}

// None for fewer than two pairs or a constant side.
pub fn pearson(pairs: &[(f64, f64)]) -> Option<f64> {
    if pairs.len() < 2 {
        return None;
    }
    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;
    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (x, y) in pairs {
        let (dx, dy) = (x - mean_x, y - mean_y);
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some(cov / (var_x.sqrt() * var_y.sqrt()))
}

pub fn correlation_matrix(records: &[CreatureRecord], stats: &[Stat]) -> Vec<Vec<Option<f64>>> {
    stats
        .iter()
        .map(|row| {
            stats
                .iter()
                .map(|col| {
                    let pairs = records
                        .iter()
                        .filter_map(|record| Some((record.stat(*row)?, record.stat(*col)?)))
                        .map(|(x, y)| (f64::from(x), f64::from(y)))
                        .collect::<Vec<_>>();
                    pearson(&pairs)
                })
                .collect()
        })
        .collect()
}
