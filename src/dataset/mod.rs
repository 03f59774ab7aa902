//! Census dataset loading.
//!
//! Reads a delimited-text file with a header row into a [`Dataset`],
//! replacing every empty cell with `0` on the way in.

use crate::error::{AnalysisError, Result};
use crate::models::{Dataset, Person, MISSING_VALUE};
use csv::StringRecord;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

pub const RACE: &str = "race";
pub const SEX: &str = "sex";
pub const AGE: &str = "age";
pub const EDUCATION: &str = "education";
pub const SALARY: &str = "salary";
pub const HOURS_PER_WEEK: &str = "hours-per-week";
pub const NATIVE_COUNTRY: &str = "native-country";
pub const OCCUPATION: &str = "occupation";

/// Positions of the required columns within a header row.
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    race: usize,
    sex: usize,
    age: usize,
    education: usize,
    salary: usize,
    hours_per_week: usize,
    native_country: usize,
    occupation: usize,
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| AnalysisError::MissingColumn(name.to_string()))
        };

        Ok(Self {
            race: find(RACE)?,
            sex: find(SEX)?,
            age: find(AGE)?,
            education: find(EDUCATION)?,
            salary: find(SALARY)?,
            hours_per_week: find(HOURS_PER_WEEK)?,
            native_country: find(NATIVE_COUNTRY)?,
            occupation: find(OCCUPATION)?,
        })
    }
}

/// Load a dataset from a file path.
pub fn load_dataset(path: &Path, delimiter: u8) -> Result<Dataset> {
    info!("Loading dataset from {}", path.display());

    let file = File::open(path).map_err(|source| AnalysisError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let dataset = read_dataset(file, delimiter)?;
    info!("Loaded {} records", dataset.len());
    Ok(dataset)
}

/// Read a dataset from any reader producing delimited text.
pub fn read_dataset<R: Read>(reader: R, delimiter: u8) -> Result<Dataset> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    debug!("Header columns: {:?}", headers);
    let columns = ColumnIndex::from_headers(&headers)?;

    let mut records = Vec::new();
    let mut filled = 0usize;

    for result in rdr.records() {
        let row = result?;
        let line = row.position().map(|p| p.line()).unwrap_or_default();
        records.push(parse_person(&row, &columns, line, &mut filled)?);
    }

    if filled > 0 {
        debug!("Replaced {} missing values with {}", filled, MISSING_VALUE);
    }

    Ok(Dataset::new(records))
}

fn parse_person(
    row: &StringRecord,
    columns: &ColumnIndex,
    line: u64,
    filled: &mut usize,
) -> Result<Person> {
    let mut text = |idx: usize| -> String {
        match row.get(idx) {
            Some(value) if !value.is_empty() => value.to_string(),
            _ => {
                *filled += 1;
                MISSING_VALUE.to_string()
            }
        }
    };

    let race = text(columns.race);
    let sex = text(columns.sex);
    let age = text(columns.age);
    let education = text(columns.education);
    let salary = text(columns.salary);
    let hours_per_week = text(columns.hours_per_week);
    let native_country = text(columns.native_country);
    let occupation = text(columns.occupation);

    Ok(Person {
        race,
        sex,
        age: parse_integer(&age, AGE, line)?,
        education,
        salary,
        hours_per_week: parse_integer(&hours_per_week, HOURS_PER_WEEK, line)?,
        native_country,
        occupation,
    })
}

fn parse_integer(value: &str, column: &str, line: u64) -> Result<i64> {
    value.parse::<i64>().map_err(|_| {
        AnalysisError::MalformedInput(format!(
            "line {}: {} must be an integer, got {:?}",
            line, column, value
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    const HEADER: &str =
        "age,workclass,education,occupation,race,sex,hours-per-week,native-country,salary";

    fn fixture_path() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures/census_sample.csv")
    }

    fn read(content: &str) -> Result<Dataset> {
        read_dataset(content.as_bytes(), b',')
    }

    #[test]
    fn test_load_fixture() {
        let dataset = load_dataset(&fixture_path(), b',').unwrap();
        assert_eq!(dataset.len(), 15);

        let first = &dataset.records()[0];
        assert_eq!(first.age, 39);
        assert_eq!(first.race, "White");
        assert_eq!(first.sex, "Male");
        assert_eq!(first.education, "Bachelors");
        assert_eq!(first.occupation, "Adm-clerical");
        assert_eq!(first.hours_per_week, 40);
        assert_eq!(first.native_country, "United-States");
        assert_eq!(first.salary, "<=50K");
    }

    #[test]
    fn test_missing_values_filled_with_zero() {
        let content = format!("{}\n,Private,,Sales,White,,,Cuba,\n", HEADER);
        let dataset = read(&content).unwrap();

        let person = &dataset.records()[0];
        assert_eq!(person.age, 0);
        assert_eq!(person.hours_per_week, 0);
        assert_eq!(person.education, "0");
        assert_eq!(person.sex, "0");
        assert_eq!(person.salary, "0");
        assert_eq!(person.native_country, "Cuba");
    }

    #[test]
    fn test_fields_are_trimmed() {
        let content = format!(
            "{}\n 25 , Private , Masters , Sales , Black , Female , 38 , Peru , >50K\n",
            HEADER
        );
        let dataset = read(&content).unwrap();

        let person = &dataset.records()[0];
        assert_eq!(person.age, 25);
        assert_eq!(person.education, "Masters");
        assert_eq!(person.salary, ">50K");
    }

    #[test]
    fn test_missing_column() {
        let content = "age,education,occupation,race,sex,native-country,salary\n";
        match read(content) {
            Err(AnalysisError::MissingColumn(column)) => assert_eq!(column, "hours-per-week"),
            other => panic!("expected MissingColumn, got {:?}", other),
        }
    }

    #[test]
    fn test_non_integer_age_is_malformed() {
        let content = format!("{}\nforty,Private,HS-grad,Sales,White,Male,40,Cuba,<=50K\n", HEADER);
        assert!(matches!(read(&content), Err(AnalysisError::MalformedInput(_))));
    }

    #[test]
    fn test_ragged_row_is_malformed() {
        let content = format!("{}\n40,Private,HS-grad\n", HEADER);
        assert!(matches!(read(&content), Err(AnalysisError::MalformedInput(_))));
    }

    #[test]
    fn test_header_only_gives_empty_dataset() {
        let dataset = read(&format!("{}\n", HEADER)).unwrap();
        assert!(dataset.is_empty());
    }

    #[test]
    fn test_custom_delimiter() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{}", HEADER.replace(',', ";")).unwrap();
        writeln!(file, "52;Private;Doctorate;Prof-specialty;White;Male;60;India;>50K").unwrap();

        let dataset = load_dataset(file.path(), b';').unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.records()[0].education, "Doctorate");
    }

    #[test]
    fn test_missing_file() {
        let result = load_dataset(Path::new("/nonexistent/adult.data.csv"), b',');
        assert!(matches!(result, Err(AnalysisError::Io { .. })));
    }
}
