use crate::adapters::chart::format_value;
use crate::domain::model::{ChartSpec, Metric, RankedList, ReportResult, SkippedRow};
use crate::domain::ports::ChartRenderer;
use crate::utils::error::{EtlError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Write;

/// A named output file produced by the load step.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub name: String,
    pub data: Vec<u8>,
}

impl Artifact {
    fn text(name: impl Into<String>, content: String) -> Self {
        Self {
            name: name.into(),
            data: content.into_bytes(),
        }
    }
}

#[derive(Serialize)]
struct RankingRow<'a> {
    metric: Metric,
    rank: usize,
    category: &'a str,
    value: f64,
}

#[derive(Serialize)]
struct ReportSummary<'a> {
    generated_at: DateTime<Utc>,
    records_processed: usize,
    categories: usize,
    top_n: usize,
    skipped_rows: &'a [SkippedRow],
    rankings: &'a [RankedList],
}

fn csv_bytes(writer: csv::Writer<Vec<u8>>) -> Result<Vec<u8>> {
    writer.into_inner().map_err(|e| EtlError::IoError(e.into_error()))
}

pub fn totals_csv(result: &ReportResult) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for totals in result.totals.iter() {
        writer.serialize(totals)?;
    }
    csv_bytes(writer)
}

pub fn rankings_csv(result: &ReportResult) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for ranked in &result.rankings {
        for (i, entry) in ranked.entries.iter().enumerate() {
            writer.serialize(RankingRow {
                metric: ranked.metric,
                rank: i + 1,
                category: entry.category.as_str(),
                value: entry.value,
            })?;
        }
    }
    csv_bytes(writer)
}

pub fn summary_json(result: &ReportResult) -> Result<Vec<u8>> {
    let summary = ReportSummary {
        generated_at: result.generated_at,
        records_processed: result.records_processed,
        categories: result.totals.len(),
        top_n: result.top_n,
        skipped_rows: &result.skipped_rows,
        rankings: &result.rankings,
    };
    Ok(serde_json::to_vec_pretty(&summary)?)
}

fn leader(result: &ReportResult, metric: Metric) -> String {
    match result.ranking(metric).and_then(RankedList::first) {
        Some(top) => format!(
            "**{}** ({})",
            top.category,
            format_value(metric, top.value)
        ),
        None => "no event type".to_string(),
    }
}

fn chart_block<R: ChartRenderer>(
    out: &mut String,
    result: &ReportResult,
    metric: Metric,
    renderer: &R,
) -> Result<()> {
    if let Some(ranked) = result.ranking(metric) {
        let chart = renderer.render(&ChartSpec::for_ranking(ranked), ranked)?;
        writeln!(out, "```\n{}```\n", chart)?;
    }
    Ok(())
}

/// Markdown write-up answering which event types hurt people most and which
/// cost the most, with both chart pairs embedded.
pub fn narrative_markdown<R: ChartRenderer>(result: &ReportResult, renderer: &R) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "# Storm events: health and economic impact by event type\n")?;
    writeln!(
        out,
        "Generated {}. {} rows were aggregated into {} event types; rankings show the top {}.",
        result.generated_at.format("%Y-%m-%d %H:%M UTC"),
        result.records_processed,
        result.totals.len(),
        result.top_n
    )?;
    if !result.skipped_rows.is_empty() {
        writeln!(
            out,
            "{} malformed rows were skipped and are not included in the totals.",
            result.skipped_rows.len()
        )?;
    }
    writeln!(
        out,
        "\nEvent type labels are used exactly as recorded, so spelling variants of one kind of \
event (for example `TSTM WIND` and `THUNDERSTORM WIND`) are counted separately.\n"
    )?;

    writeln!(out, "## Which event types are most harmful to population health?\n")?;
    chart_block(&mut out, result, Metric::Fatalities, renderer)?;
    chart_block(&mut out, result, Metric::Injuries, renderer)?;
    writeln!(
        out,
        "The most fatalities are caused by {} and the most injuries by {}.\n",
        leader(result, Metric::Fatalities),
        leader(result, Metric::Injuries)
    )?;

    writeln!(out, "## Which event types have the greatest economic consequences?\n")?;
    chart_block(&mut out, result, Metric::PropertyDamage, renderer)?;
    chart_block(&mut out, result, Metric::CropDamage, renderer)?;
    writeln!(
        out,
        "The largest property damage comes from {} and the largest crop damage from {}.",
        leader(result, Metric::PropertyDamage),
        leader(result, Metric::CropDamage)
    )?;

    Ok(out)
}

/// Renders every artifact enabled in `formats` (`csv`, `json`, `md`, `txt`).
pub fn build_artifacts<R: ChartRenderer>(
    result: &ReportResult,
    formats: &[String],
    renderer: &R,
) -> Result<Vec<Artifact>> {
    let enabled = |f: &str| formats.iter().any(|x| x == f);
    let mut artifacts = Vec::new();

    if enabled("csv") {
        artifacts.push(Artifact {
            name: "totals.csv".to_string(),
            data: totals_csv(result)?,
        });
        artifacts.push(Artifact {
            name: "rankings.csv".to_string(),
            data: rankings_csv(result)?,
        });
    }
    if enabled("json") {
        artifacts.push(Artifact {
            name: "report.json".to_string(),
            data: summary_json(result)?,
        });
    }
    if enabled("md") {
        artifacts.push(Artifact::text("report.md", narrative_markdown(result, renderer)?));
    }
    if enabled("txt") {
        for ranked in &result.rankings {
            let chart = renderer.render(&ChartSpec::for_ranking(ranked), ranked)?;
            artifacts.push(Artifact::text(
                format!("charts/{}.{}", ranked.metric, renderer.file_extension()),
                chart,
            ));
        }
    }

    Ok(artifacts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::chart::TextBarChart;
    use crate::core::{aggregate::aggregate, rank::rank_all};
    use crate::domain::model::NormalizedRecord;

    fn result() -> ReportResult {
        let records = vec![
            NormalizedRecord {
                category: "TORNADO".to_string(),
                fatalities: 8.0,
                injuries: 10.0,
                property_damage_dollars: 1_002_500.0,
                crop_damage_dollars: 0.0,
            },
            NormalizedRecord {
                category: "FLOOD".to_string(),
                fatalities: 1.0,
                injuries: 1.0,
                property_damage_dollars: 1e9,
                crop_damage_dollars: 2_000.0,
            },
        ];
        let totals = aggregate(&records);
        let rankings = rank_all(&totals, 10).unwrap();
        ReportResult {
            totals,
            rankings,
            top_n: 10,
            records_processed: 2,
            skipped_rows: vec![SkippedRow {
                line: 5,
                reason: "bad".to_string(),
            }],
            generated_at: Utc::now(),
        }
    }

    fn all_formats() -> Vec<String> {
        ["csv", "json", "md", "txt"].iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_totals_csv_in_first_seen_order() {
        let csv = String::from_utf8(totals_csv(&result()).unwrap()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines[0],
            "category,fatalities,injuries,property_damage_dollars,crop_damage_dollars"
        );
        assert!(lines[1].starts_with("TORNADO,8.0,10.0,1002500.0"));
        assert!(lines[2].starts_with("FLOOD,"));
    }

    #[test]
    fn test_rankings_csv_lists_every_metric() {
        let csv = String::from_utf8(rankings_csv(&result()).unwrap()).unwrap();
        assert!(csv.starts_with("metric,rank,category,value\n"));
        assert!(csv.contains("fatalities,1,TORNADO,8.0"));
        assert!(csv.contains("property_damage,1,FLOOD,1000000000.0"));
        assert_eq!(csv.lines().count(), 1 + 4 * 2);
    }

    #[test]
    fn test_summary_json_reports_skipped_rows() {
        let json: serde_json::Value = serde_json::from_slice(&summary_json(&result()).unwrap()).unwrap();
        assert_eq!(json["records_processed"], 2);
        assert_eq!(json["categories"], 2);
        assert_eq!(json["skipped_rows"][0]["line"], 5);
        assert_eq!(json["rankings"][2]["metric"], "property_damage");
        assert_eq!(json["rankings"][2]["entries"][0]["category"], "FLOOD");
    }

    #[test]
    fn test_narrative_answers_both_questions() {
        let md = narrative_markdown(&result(), &TextBarChart::default()).unwrap();
        assert!(md.contains("## Which event types are most harmful to population health?"));
        assert!(md.contains("## Which event types have the greatest economic consequences?"));
        assert!(md.contains("most fatalities are caused by **TORNADO** (8)"));
        assert!(md.contains("largest property damage comes from **FLOOD** ($1.00B)"));
        assert!(md.contains("1 malformed rows were skipped"));
    }

    #[test]
    fn test_build_artifacts_respects_formats() {
        let renderer = TextBarChart::default();
        let all = build_artifacts(&result(), &all_formats(), &renderer).unwrap();
        let names: Vec<&str> = all.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "totals.csv",
                "rankings.csv",
                "report.json",
                "report.md",
                "charts/fatalities.txt",
                "charts/injuries.txt",
                "charts/property_damage.txt",
                "charts/crop_damage.txt",
            ]
        );

        let only_md = build_artifacts(&result(), &["md".to_string()], &renderer).unwrap();
        assert_eq!(only_md.len(), 1);
        assert_eq!(only_md[0].name, "report.md");
    }
}
