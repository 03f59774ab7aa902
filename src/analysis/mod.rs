//! Demographic analysis.
//!
//! The aggregator holds the individual queries; this module adds the
//! single entry point that loads a dataset and runs all of them.

pub mod aggregator;

pub use aggregator::*;

use crate::dataset;
use crate::error::Result;
use crate::models::DemographicSummary;
use crate::report;
use std::path::Path;

/// Load the dataset at `path`, compute every statistic and optionally
/// print the text report to stdout.
pub fn calculate_demographic_data(
    path: &Path,
    delimiter: u8,
    settings: AnalysisSettings,
    print_data: bool,
) -> Result<DemographicSummary> {
    let data = dataset::load_dataset(path, delimiter)?;
    let summary = Aggregator::new(&data, settings.clone()).summarize()?;

    if print_data {
        println!(
            "{}",
            report::generate_text_report(&summary, &settings.target_country, &settings.rich_label)
        );
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisError;
    use std::path::PathBuf;

    #[test]
    fn test_calculate_from_fixture() {
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures/census_sample.csv");
        let summary =
            calculate_demographic_data(&path, b',', AnalysisSettings::default(), false).unwrap();

        assert_eq!(summary.race_count.total(), 15);
        assert_eq!(summary.top_in_occupation, "Prof-specialty");
    }

    #[test]
    fn test_calculate_empty_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(
            &mut file,
            b"age,education,occupation,race,sex,hours-per-week,native-country,salary\n",
        )
        .unwrap();

        let result = calculate_demographic_data(file.path(), b',', AnalysisSettings::default(), false);
        assert!(matches!(result, Err(AnalysisError::EmptyDataset)));
    }
}
