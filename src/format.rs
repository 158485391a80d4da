use crate::accumulator::Accumulator;
use crate::stats::Statistics;

/// Renders one station as `name=min/mean/max`.
///
/// Extremes use plain decimal text (`10.0`, `-3.0`, `0.00001`); the mean is
/// fixed to one fractional digit.
pub fn render_entry(name: &str, stats: &Statistics) -> String {
    format!(
        "{name}={min}/{mean:.1}/{max}",
        min = natural(stats.minimum),
        mean = stats.mean(),
        max = natural(stats.maximum)
    )
}

/// Shortest round-trip digits, never in exponent form. Finite integral
/// values keep a `.0`.
fn natural(value: f64) -> String {
    let mut text = value.to_string();
    if value.is_finite() && !text.contains('.') {
        text.push_str(".0");
    }
    text
}

/// Renders the whole accumulator as `{a=.., b=..}`.
///
/// Entries are ordered by their rendered text, not by station name, so
/// `A b=..` comes before `A=..`.
pub fn format_summary(acc: &Accumulator) -> String {
    let mut entries: Vec<String> = acc
        .iter()
        .map(|(name, stats)| render_entry(name, stats))
        .collect();

    entries.sort_unstable();

    format!("{{{}}}", entries.join(", "))
}
