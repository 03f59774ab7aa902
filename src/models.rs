//! Data models for the demographic analyzer.
//!
//! This module contains the census records the analysis runs over and
//! the structures used to carry its results into reports.

use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Value substituted for every empty cell while loading.
pub const MISSING_VALUE: &str = "0";

/// One individual from the census dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Person {
    pub race: String,
    pub sex: String,
    pub age: i64,
    pub education: String,
    pub salary: String,
    pub hours_per_week: i64,
    pub native_country: String,
    pub occupation: String,
}

/// A loaded and cleaned dataset. Read-only once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    records: Vec<Person>,
}

impl Dataset {
    /// Creates a dataset from already-cleaned records.
    pub fn new(records: Vec<Person>) -> Self {
        Self { records }
    }

    /// Returns the records in file order.
    pub fn records(&self) -> &[Person] {
        &self.records
    }

    /// Returns the number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true when the dataset has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Record counts per race, highest count first.
///
/// Serializes as a JSON object whose keys keep this order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RaceCount(pub Vec<(String, usize)>);

impl RaceCount {
    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.0.iter().map(|(_, count)| count).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(String, usize)> {
        self.0.iter()
    }
}

impl Serialize for RaceCount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (race, count) in &self.0 {
            map.serialize_entry(race, count)?;
        }
        map.end()
    }
}

/// The ten statistics computed over a dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemographicSummary {
    pub race_count: RaceCount,
    pub average_age_men: f64,
    pub percentage_bachelors: f64,
    pub higher_education_rich: f64,
    pub lower_education_rich: f64,
    pub min_work_hours: i64,
    pub rich_percentage: f64,
    pub highest_earning_country: String,
    pub highest_earning_country_percentage: f64,
    #[serde(rename = "top_IN_occupation")]
    pub top_in_occupation: String,
}

/// Metadata about an analysis run.
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    /// Path of the analyzed dataset.
    pub dataset_path: String,
    /// Date and time of the analysis.
    pub analysis_date: DateTime<Utc>,
    /// Number of records loaded.
    pub total_records: usize,
    /// Country used for the top-occupation statistic.
    pub target_country: String,
    /// Salary bracket counted as rich.
    pub rich_label: String,
    /// Duration of the run in seconds.
    pub duration_seconds: f64,
}

/// The complete analysis report.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    pub summary: DemographicSummary,
}
