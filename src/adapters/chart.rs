use crate::domain::model::{ChartSpec, Metric, RankedList};
use crate::domain::ports::ChartRenderer;
use crate::utils::error::Result;
use std::fmt::Write;

const BAR: char = '█';

/// Scales dollar amounts to a K/M/B suffix; counts print as whole numbers.
pub fn format_value(metric: Metric, value: f64) -> String {
    if !metric.is_monetary() {
        return format!("{:.0}", value);
    }
    let abs = value.abs();
    if abs >= 1e9 {
        format!("${:.2}B", value / 1e9)
    } else if abs >= 1e6 {
        format!("${:.2}M", value / 1e6)
    } else if abs >= 1e3 {
        format!("${:.2}K", value / 1e3)
    } else {
        format!("${:.0}", value)
    }
}

/// Horizontal bar chart drawn with block characters, one line per category.
#[derive(Debug, Clone)]
pub struct TextBarChart {
    width: usize,
}

impl TextBarChart {
    pub fn new(width: usize) -> Self {
        Self { width: width.max(1) }
    }

    fn bar_length(&self, value: f64, x_max: f64) -> usize {
        if x_max <= 0.0 || !value.is_finite() || value <= 0.0 {
            return 0;
        }
        let ratio = (value / x_max).min(1.0);
        (ratio * self.width as f64).round() as usize
    }
}

impl Default for TextBarChart {
    fn default() -> Self {
        Self::new(40)
    }
}

impl ChartRenderer for TextBarChart {
    fn file_extension(&self) -> &'static str {
        "txt"
    }

    fn render(&self, spec: &ChartSpec, ranked: &RankedList) -> Result<String> {
        let label_width = ranked
            .entries
            .iter()
            .map(|e| e.category.as_str().chars().count())
            .max()
            .unwrap_or(0);

        let mut out = String::new();
        writeln!(out, "{}", spec.title)?;
        writeln!(out, "{}", "=".repeat(spec.title.chars().count()))?;

        if ranked.is_empty() {
            writeln!(out, "(no data)")?;
        }

        for entry in &ranked.entries {
            let bar: String = std::iter::repeat(BAR)
                .take(self.bar_length(entry.value, spec.x_max))
                .collect();
            writeln!(
                out,
                "{:>width$} | {} {}",
                entry.category.as_str(),
                bar,
                format_value(ranked.metric, entry.value),
                width = label_width
            )?;
        }

        writeln!(
            out,
            "{:>width$}   {} (max {})",
            "",
            spec.x_label,
            format_value(ranked.metric, spec.x_max),
            width = label_width
        )?;

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Category, RankedEntry};

    fn ranking(metric: Metric, rows: &[(&str, f64)]) -> RankedList {
        RankedList {
            metric,
            entries: rows
                .iter()
                .map(|(c, v)| RankedEntry {
                    category: Category::new(c),
                    value: *v,
                })
                .collect(),
        }
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(Metric::Fatalities, 5633.0), "5633");
        assert_eq!(format_value(Metric::PropertyDamage, 1_002_500.0), "$1.00M");
        assert_eq!(format_value(Metric::CropDamage, 2_000.0), "$2.00K");
        assert_eq!(format_value(Metric::PropertyDamage, 1e9), "$1.00B");
        assert_eq!(format_value(Metric::CropDamage, 12.0), "$12");
    }

    #[test]
    fn test_bars_scale_to_x_max() {
        let ranked = ranking(Metric::Fatalities, &[("TORNADO", 100.0), ("HEAT", 50.0), ("HAIL", 0.0)]);
        let spec = ChartSpec::for_ranking(&ranked);
        let chart = TextBarChart::new(10).render(&spec, &ranked).unwrap();

        let lines: Vec<&str> = chart.lines().collect();
        assert_eq!(lines[0], "Top 3 event types by fatalities");
        assert_eq!(lines[2], "TORNADO | ██████████ 100");
        assert_eq!(lines[3], "   HEAT | █████ 50");
        assert_eq!(lines[4], "   HAIL |  0");
    }

    #[test]
    fn test_empty_ranking_renders_placeholder() {
        let ranked = ranking(Metric::CropDamage, &[]);
        let spec = ChartSpec::for_ranking(&ranked);
        let chart = TextBarChart::default().render(&spec, &ranked).unwrap();
        assert!(chart.contains("(no data)"));
    }
}
