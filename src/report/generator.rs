//! Report generation.
//!
//! This module renders the analysis results as the plain text summary
//! printed to stdout, as Markdown, or as JSON.

use crate::cli::OutputFormat;
use crate::models::{DemographicSummary, RaceCount, Report, ReportMetadata};
use anyhow::{Context, Result};
use std::path::Path;

/// Generate the fixed-format text summary, one line per statistic.
///
/// `rich_label` is the salary bracket the income statistics count.
pub fn generate_text_report(
    summary: &DemographicSummary,
    target_country: &str,
    rich_label: &str,
) -> String {
    let mut lines = Vec::new();

    lines.push("Number of each race:".to_string());
    lines.push(format_race_lines(&summary.race_count));
    lines.push(format!(
        "Average age of men: {}",
        format_float(summary.average_age_men)
    ));
    lines.push(format!(
        "Percentage with Bachelors degrees: {}%",
        format_float(summary.percentage_bachelors)
    ));
    lines.push(format!(
        "Percentage with higher education that earn {}: {}%",
        rich_label,
        format_float(summary.higher_education_rich)
    ));
    lines.push(format!(
        "Percentage without higher education that earn {}: {}%",
        rich_label,
        format_float(summary.lower_education_rich)
    ));
    lines.push(format!("Min work time: {} hours/week", summary.min_work_hours));
    lines.push(format!(
        "Percentage of rich among those who work fewest hours: {}%",
        format_float(summary.rich_percentage)
    ));
    lines.push(format!(
        "Country with highest percentage of rich: {}",
        summary.highest_earning_country
    ));
    lines.push(format!(
        "Highest percentage of rich people in country: {}%",
        format_float(summary.highest_earning_country_percentage)
    ));
    lines.push(format!(
        "Top occupations in {}: {}",
        target_country, summary.top_in_occupation
    ));

    lines.join("\n")
}

/// Race counts as aligned ` label  count` lines.
fn format_race_lines(races: &RaceCount) -> String {
    let label_width = races.iter().map(|(race, _)| race.len()).max().unwrap_or(0);
    let count_width = races
        .iter()
        .map(|(_, count)| count.to_string().len())
        .max()
        .unwrap_or(0);

    races
        .iter()
        .map(|(race, count)| {
            format!(
                " {:<label_width$}    {:>count_width$}",
                race,
                count,
                label_width = label_width,
                count_width = count_width
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Shortest round-trip form, always with at least one decimal digit.
pub fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &Report) -> String {
    let mut output = String::new();

    output.push_str("# Demographic Analysis Report\n\n");
    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_race_section(&report.summary.race_count));
    output.push_str(&generate_statistics_section(&report.summary, &report.metadata));

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Dataset:** `{}`\n", metadata.dataset_path));
    section.push_str(&format!(
        "- **Analysis Date:** {}\n",
        metadata.analysis_date.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Records:** {}\n", metadata.total_records));
    section.push_str(&format!(
        "- **Analysis Duration:** {:.3}s\n",
        metadata.duration_seconds
    ));
    section.push('\n');

    section
}

/// Generate the race breakdown table.
fn generate_race_section(races: &RaceCount) -> String {
    let mut section = String::new();

    section.push_str("## Records by Race\n\n");
    section.push_str("| Race | Count |\n");
    section.push_str("|:---|---:|\n");
    for (race, count) in races.iter() {
        section.push_str(&format!("| {} | {} |\n", race, count));
    }
    section.push('\n');

    section
}

/// Generate the statistics table.
fn generate_statistics_section(summary: &DemographicSummary, metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Statistics\n\n");
    section.push_str("| Statistic | Value |\n");
    section.push_str("|:---|---:|\n");

    let rows = [
        (
            "Average age of men".to_string(),
            format_float(summary.average_age_men),
        ),
        (
            "Bachelors degrees".to_string(),
            format!("{}%", format_float(summary.percentage_bachelors)),
        ),
        (
            format!("Higher education earning {}", metadata.rich_label),
            format!("{}%", format_float(summary.higher_education_rich)),
        ),
        (
            format!("Lower education earning {}", metadata.rich_label),
            format!("{}%", format_float(summary.lower_education_rich)),
        ),
        (
            "Minimum work time".to_string(),
            format!("{} hours/week", summary.min_work_hours),
        ),
        (
            format!("Earning {} at minimum hours", metadata.rich_label),
            format!("{}%", format_float(summary.rich_percentage)),
        ),
        (
            "Highest earning country".to_string(),
            format!(
                "{} ({}%)",
                summary.highest_earning_country,
                format_float(summary.highest_earning_country_percentage)
            ),
        ),
        (
            format!("Top occupation in {}", metadata.target_country),
            summary.top_in_occupation.clone(),
        ),
    ];

    for (label, value) in rows {
        section.push_str(&format!("| {} | {} |\n", label, value));
    }
    section.push('\n');

    section
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

/// Render the report in `format` and write it to `path`.
pub fn write_report(report: &Report, format: OutputFormat, path: &Path) -> Result<()> {
    let content = match format {
        OutputFormat::Text => {
            generate_text_report(
                &report.summary,
                &report.metadata.target_country,
                &report.metadata.rich_label,
            ) + "\n"
        }
        OutputFormat::Markdown => generate_markdown_report(report),
        OutputFormat::Json => generate_json_report(report)?,
    };

    std::fs::write(path, content)
        .with_context(|| format!("Failed to write report to {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn create_test_summary() -> DemographicSummary {
        DemographicSummary {
            race_count: RaceCount(vec![
                ("White".to_string(), 27816),
                ("Black".to_string(), 3124),
                ("Asian-Pac-Islander".to_string(), 1039),
            ]),
            average_age_men: 39.43,
            percentage_bachelors: 16.45,
            higher_education_rich: 12.52,
            lower_education_rich: 11.56,
            min_work_hours: 1,
            rich_percentage: 0.006,
            highest_earning_country: "Iran".to_string(),
            highest_earning_country_percentage: 41.9,
            top_in_occupation: "Prof-specialty".to_string(),
        }
    }

    fn create_test_report() -> Report {
        Report {
            metadata: ReportMetadata {
                dataset_path: "adult.data.csv".to_string(),
                analysis_date: Utc::now(),
                total_records: 31979,
                target_country: "India".to_string(),
                rich_label: ">50K".to_string(),
                duration_seconds: 0.25,
            },
            summary: create_test_summary(),
        }
    }

    #[test]
    fn test_format_float() {
        assert_eq!(format_float(40.0), "40.0");
        assert_eq!(format_float(42.67), "42.67");
        assert_eq!(format_float(0.006), "0.006");
        assert_eq!(format_float(100.0), "100.0");
    }

    #[test]
    fn test_generate_text_report() {
        let text = generate_text_report(&create_test_summary(), "India", ">50K");
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Number of each race:");
        assert_eq!(lines[1], " White                 27816");
        assert_eq!(lines[2], " Black                  3124");
        assert_eq!(lines[4], "Average age of men: 39.43");
        assert_eq!(lines[5], "Percentage with Bachelors degrees: 16.45%");
        assert_eq!(
            lines[6],
            "Percentage with higher education that earn >50K: 12.52%"
        );
        assert_eq!(
            lines[7],
            "Percentage without higher education that earn >50K: 11.56%"
        );
        assert_eq!(lines[8], "Min work time: 1 hours/week");
        assert_eq!(
            lines[9],
            "Percentage of rich among those who work fewest hours: 0.006%"
        );
        assert_eq!(lines[10], "Country with highest percentage of rich: Iran");
        assert_eq!(
            lines[11],
            "Highest percentage of rich people in country: 41.9%"
        );
        assert_eq!(lines[12], "Top occupations in India: Prof-specialty");
        assert_eq!(lines.len(), 13);
    }

    #[test]
    fn test_text_report_uses_configured_rich_label() {
        let text = generate_text_report(&create_test_summary(), "India", "over 50K");

        assert!(text.contains("Percentage with higher education that earn over 50K: 12.52%"));
        assert!(text.contains("Percentage without higher education that earn over 50K: 11.56%"));
        assert!(!text.contains(">50K"));
    }

    #[test]
    fn test_markdown_report_uses_configured_rich_label() {
        let mut report = create_test_report();
        report.metadata.rich_label = "over 50K".to_string();
        let markdown = generate_markdown_report(&report);

        assert!(markdown.contains("| Higher education earning over 50K | 12.52% |"));
        assert!(markdown.contains("| Lower education earning over 50K | 11.56% |"));
        assert!(markdown.contains("| Earning over 50K at minimum hours | 0.006% |"));
        assert!(!markdown.contains(">50K"));
    }

    #[test]
    fn test_generate_markdown_report() {
        let markdown = generate_markdown_report(&create_test_report());

        assert!(markdown.contains("# Demographic Analysis Report"));
        assert!(markdown.contains("## Metadata"));
        assert!(markdown.contains("`adult.data.csv`"));
        assert!(markdown.contains("| White | 27816 |"));
        assert!(markdown.contains("| Minimum work time | 1 hours/week |"));
        assert!(markdown.contains("| Top occupation in India | Prof-specialty |"));
    }

    #[test]
    fn test_generate_json_report() {
        let json = generate_json_report(&create_test_report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["summary"]["top_IN_occupation"], "Prof-specialty");
        assert_eq!(value["summary"]["race_count"]["White"], 27816);
        assert_eq!(value["metadata"]["total_records"], 31979);
    }

    #[test]
    fn test_write_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.md");

        write_report(&create_test_report(), OutputFormat::Markdown, &path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("# Demographic Analysis Report"));

        let path = dir.path().join("summary.txt");
        write_report(&create_test_report(), OutputFormat::Text, &path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.ends_with("Top occupations in India: Prof-specialty\n"));
    }
}
