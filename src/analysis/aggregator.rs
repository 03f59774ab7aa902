//! Census aggregation queries.
//!
//! Each query is a pure function of the loaded dataset. Percentages are
//! rounded half away from zero to the precision the summary reports.

use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, Result};
use crate::models::{Dataset, DemographicSummary, Person, RaceCount};
use std::collections::HashMap;
use tracing::debug;

/// Labels and targets the queries select on.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisSettings {
    pub target_country: String,
    pub higher_education: Vec<String>,
    pub rich_label: String,
    pub poor_label: String,
    pub male_label: String,
    pub bachelors_label: String,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self::from(&AnalysisConfig::default())
    }
}

impl From<&AnalysisConfig> for AnalysisSettings {
    fn from(config: &AnalysisConfig) -> Self {
        Self {
            target_country: config.target_country.clone(),
            higher_education: config.higher_education.clone(),
            rich_label: config.rich_label.clone(),
            poor_label: config.poor_label.clone(),
            male_label: config.male_label.clone(),
            bachelors_label: config.bachelors_label.clone(),
        }
    }
}

/// Computes the summary statistics over one dataset.
pub struct Aggregator<'a> {
    dataset: &'a Dataset,
    settings: AnalysisSettings,
}

impl<'a> Aggregator<'a> {
    pub fn new(dataset: &'a Dataset, settings: AnalysisSettings) -> Self {
        Self { dataset, settings }
    }

    /// Run every query and collect the results.
    pub fn summarize(&self) -> Result<DemographicSummary> {
        let (higher_education_rich, lower_education_rich) = self.education_income_split()?;
        let (highest_earning_country, highest_earning_country_percentage) =
            self.highest_earning_country()?;

        Ok(DemographicSummary {
            race_count: self.race_count()?,
            average_age_men: self.average_age_men()?,
            percentage_bachelors: self.percentage_bachelors()?,
            higher_education_rich,
            lower_education_rich,
            min_work_hours: self.min_work_hours()?,
            rich_percentage: self.rich_percentage()?,
            highest_earning_country,
            highest_earning_country_percentage,
            top_in_occupation: self.top_occupation()?,
        })
    }

    /// Records per race, highest count first. Equal counts keep the
    /// order in which the races first appear.
    pub fn race_count(&self) -> Result<RaceCount> {
        let records = self.records()?;

        let mut counts: Vec<(String, usize)> =
            count_in_order(records.iter().map(|p| p.race.as_str()))
                .into_iter()
                .map(|(race, count)| (race.to_string(), count))
                .collect();
        counts.sort_by_key(|(_, count)| std::cmp::Reverse(*count));

        Ok(RaceCount(counts))
    }

    /// Mean age of male records, to 2 decimals.
    pub fn average_age_men(&self) -> Result<f64> {
        let records = self.records()?;

        let (total_age, men) = records
            .iter()
            .filter(|p| p.sex == self.settings.male_label)
            .fold((0f64, 0usize), |(sum, n), p| (sum + p.age as f64, n + 1));

        if men == 0 {
            return Err(AnalysisError::DivisionUndefined(
                "average age of men".to_string(),
            ));
        }

        Ok(round_to(total_age / men as f64, 2))
    }

    /// Share of all records holding a bachelor's degree, to 2 decimals.
    pub fn percentage_bachelors(&self) -> Result<f64> {
        let records = self.records()?;

        let bachelors = records
            .iter()
            .filter(|p| p.education == self.settings.bachelors_label)
            .count();

        Ok(round_to(
            percentage(bachelors, records.len(), "percentage of bachelors")?,
            2,
        ))
    }

    /// Rich records with and without higher education, each as a share of
    /// all records with a known salary, to 2 decimals.
    pub fn education_income_split(&self) -> Result<(f64, f64)> {
        let records = self.records()?;

        let known_salary = records.iter().filter(|p| self.has_known_salary(p)).count();
        let (higher_rich, lower_rich) = records
            .iter()
            .filter(|p| self.is_rich(p))
            .fold((0usize, 0usize), |(higher, lower), p| {
                if self.has_higher_education(p) {
                    (higher + 1, lower)
                } else {
                    (higher, lower + 1)
                }
            });

        debug!(
            "Education split: {} higher / {} lower rich of {} known salaries",
            higher_rich, lower_rich, known_salary
        );

        Ok((
            round_to(
                percentage(higher_rich, known_salary, "higher education income share")?,
                2,
            ),
            round_to(
                percentage(lower_rich, known_salary, "lower education income share")?,
                2,
            ),
        ))
    }

    /// Fewest hours per week worked by anyone.
    pub fn min_work_hours(&self) -> Result<i64> {
        self.records()?
            .iter()
            .map(|p| p.hours_per_week)
            .min()
            .ok_or(AnalysisError::EmptyDataset)
    }

    /// Rich records among those working the minimum hours, as a share of
    /// the whole dataset, to 3 decimals.
    pub fn rich_percentage(&self) -> Result<f64> {
        let records = self.records()?;
        let min_hours = self.min_work_hours()?;

        let rich_at_min = records
            .iter()
            .filter(|p| p.hours_per_week == min_hours && self.is_rich(p))
            .count();

        Ok(round_to(
            percentage(rich_at_min, records.len(), "rich percentage at minimum hours")?,
            3,
        ))
    }

    /// Country with the largest rich share among its known salaries, and
    /// that share to 1 decimal. Countries without a known salary are
    /// skipped; ties go to the country seen first.
    pub fn highest_earning_country(&self) -> Result<(String, f64)> {
        let records = self.records()?;

        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut tallies: Vec<(&str, usize, usize)> = Vec::new();

        for person in records.iter().filter(|p| self.has_known_salary(p)) {
            let country = person.native_country.as_str();
            let slot = *index.entry(country).or_insert_with(|| {
                tallies.push((country, 0, 0));
                tallies.len() - 1
            });
            tallies[slot].1 += 1;
            if self.is_rich(person) {
                tallies[slot].2 += 1;
            }
        }

        let mut best: Option<(&str, f64)> = None;
        for (country, known, rich) in tallies {
            let share = percentage(rich, known, "country income share")?;
            if best.map_or(true, |(_, top)| share > top) {
                best = Some((country, share));
            }
        }

        let (country, share) = best.ok_or_else(|| {
            AnalysisError::DivisionUndefined("highest earning country".to_string())
        })?;
        debug!("Highest earning country: {} ({:.4}%)", country, share);

        Ok((country.to_string(), round_to(share, 1)))
    }

    /// Most common occupation in the target country. Ties go to the
    /// occupation seen first.
    pub fn top_occupation(&self) -> Result<String> {
        let records = self.records()?;
        let target = self.settings.target_country.as_str();

        let counts = count_in_order(
            records
                .iter()
                .filter(|p| p.native_country == target)
                .map(|p| p.occupation.as_str()),
        );

        first_max(&counts)
            .map(str::to_string)
            .ok_or_else(|| AnalysisError::NoMatchingRecords {
                column: crate::dataset::NATIVE_COUNTRY.to_string(),
                value: target.to_string(),
            })
    }

    fn records(&self) -> Result<&'a [Person]> {
        if self.dataset.is_empty() {
            return Err(AnalysisError::EmptyDataset);
        }
        Ok(self.dataset.records())
    }

    fn is_rich(&self, person: &Person) -> bool {
        person.salary == self.settings.rich_label
    }

    fn has_known_salary(&self, person: &Person) -> bool {
        self.is_rich(person) || person.salary == self.settings.poor_label
    }

    fn has_higher_education(&self, person: &Person) -> bool {
        self.settings
            .higher_education
            .iter()
            .any(|level| *level == person.education)
    }
}

/// Count occurrences, keeping values in first-seen order.
fn count_in_order<'v>(values: impl Iterator<Item = &'v str>) -> Vec<(&'v str, usize)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(&str, usize)> = Vec::new();

    for value in values {
        match index.get(value) {
            Some(&slot) => counts[slot].1 += 1,
            None => {
                index.insert(value, counts.len());
                counts.push((value, 1));
            }
        }
    }

    counts
}

/// The value with the highest count; the earliest one on ties.
fn first_max<'v>(counts: &[(&'v str, usize)]) -> Option<&'v str> {
    let mut best: Option<(&str, usize)> = None;
    for &(value, count) in counts {
        if best.map_or(true, |(_, top)| count > top) {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value)
}

fn percentage(numerator: usize, denominator: usize, what: &str) -> Result<f64> {
    if denominator == 0 {
        return Err(AnalysisError::DivisionUndefined(what.to_string()));
    }
    Ok(numerator as f64 / denominator as f64 * 100.0)
}

/// Round half away from zero to `places` decimals.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
