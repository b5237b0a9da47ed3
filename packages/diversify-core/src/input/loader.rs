//! CSV loading for user-entered returns.

use crate::types::ReturnSeries;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Where to find the two securities in a CSV file and how to read the numbers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CsvLayout {
    /// Header of the column holding S (matched case-insensitively)
    pub column_s: String,
    /// Header of the column holding T (matched case-insensitively)
    pub column_t: String,
    /// Whether the cells are percentages (6.6) rather than decimals (0.066)
    pub percent: bool,
}

impl Default for CsvLayout {
    fn default() -> Self {
        Self {
            column_s: "S".to_string(),
            column_t: "T".to_string(),
            percent: true,
        }
    }
}

/// Load two return series from a CSV file.
///
/// See [`read_csv`] for the accepted format.
pub fn load_csv(path: &Path, layout: &CsvLayout) -> Result<(ReturnSeries, ReturnSeries)> {
    let file = File::open(path)?;
    tracing::debug!(path = %path.display(), "reading returns");
    read_csv(file, layout)
}

/// Read two return series from CSV data.
///
/// The first row is a header. Extra columns are ignored. Rows with a blank
/// cell in either security column are dropped; any other cell that does not
/// parse as a number is an error. The series are named after the headers as
/// written in the file.
pub fn read_csv<R: Read>(reader: R, layout: &CsvLayout) -> Result<(ReturnSeries, ReturnSeries)> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let (idx_s, name_s) = find_column(&headers, &layout.column_s)?;
    let (idx_t, name_t) = find_column(&headers, &layout.column_t)?;

    let mut values_s = Vec::new();
    let mut values_t = Vec::new();
    let mut dropped = 0usize;

    for (row, record) in rdr.records().enumerate() {
        let record = record?;
        // Header is line 1
        let line = row + 2;

        let cell_s = record.get(idx_s).unwrap_or("");
        let cell_t = record.get(idx_t).unwrap_or("");
        if cell_s.is_empty() || cell_t.is_empty() {
            dropped += 1;
            continue;
        }

        values_s.push(parse_cell(cell_s, &name_s, line)?);
        values_t.push(parse_cell(cell_t, &name_t, line)?);
    }

    if dropped > 0 {
        tracing::warn!(dropped, "skipped rows with missing returns");
    }

    if layout.percent {
        return Ok((
            ReturnSeries::from_percent(&name_s, &values_s)?,
            ReturnSeries::from_percent(&name_t, &values_t)?,
        ));
    }

    Ok((
        ReturnSeries::new(&name_s, values_s)?,
        ReturnSeries::new(&name_t, values_t)?,
    ))
}

fn find_column(headers: &csv::StringRecord, wanted: &str) -> Result<(usize, String)> {
    headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case(wanted))
        .map(|idx| (idx, headers[idx].to_string()))
        .ok_or_else(|| {
            Error::InvalidInput(format!(
                "CSV has no '{}' column (found: {})",
                wanted,
                headers.iter().collect::<Vec<_>>().join(", ")
            ))
        })
}

fn parse_cell(cell: &str, column: &str, line: usize) -> Result<f64> {
    let trimmed = cell.trim_end_matches('%').trim();
    trimmed.parse::<f64>().map_err(|_| {
        Error::InvalidInput(format!(
            "Line {}: '{}' in column {} is not a number",
            line, cell, column
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_percent_csv() {
        let data = "S,T\n6.6,24.5\n5.6,-5.9\n-9.0,19.9\n12.6,-7.8\n14.0,14.8\n";
        let (s, t) = read_csv(data.as_bytes(), &CsvLayout::default()).unwrap();

        assert_eq!(s.len(), 5);
        assert_eq!(t.len(), 5);
        assert_relative_eq!(s.values()[0], 0.066, epsilon = 1e-12);
        assert_relative_eq!(t.values()[3], -0.078, epsilon = 1e-12);
    }

    #[test]
    fn test_read_decimal_csv_with_extra_columns() {
        let data = "year,s,t,note\n2019,0.10,0.05,a\n2020,0.02,0.07,b\n";
        let layout = CsvLayout {
            percent: false,
            ..CsvLayout::default()
        };

        let (s, t) = read_csv(data.as_bytes(), &layout).unwrap();

        assert_eq!(s.name(), "s");
        assert_eq!(s.values(), &[0.10, 0.02]);
        assert_eq!(t.values(), &[0.05, 0.07]);
    }

    #[test]
    fn test_blank_rows_dropped() {
        let data = "S,T\n1.0,2.0\n,3.0\n4.0,\n5.0,6.0\n";
        let layout = CsvLayout {
            percent: false,
            ..CsvLayout::default()
        };

        let (s, t) = read_csv(data.as_bytes(), &layout).unwrap();

        assert_eq!(s.values(), &[1.0, 5.0]);
        assert_eq!(t.values(), &[2.0, 6.0]);
    }

    #[test]
    fn test_percent_sign_accepted() {
        let data = "S,T\n6.6%,24.5%\n";
        let (s, t) = read_csv(data.as_bytes(), &CsvLayout::default()).unwrap();
        assert_relative_eq!(s.values()[0], 0.066, epsilon = 1e-12);
        assert_relative_eq!(t.values()[0], 0.245, epsilon = 1e-12);
    }

    #[test]
    fn test_custom_columns() {
        let data = "Equity,Bonds\n8,3\n-2,4\n";
        let layout = CsvLayout {
            column_s: "equity".to_string(),
            column_t: "BONDS".to_string(),
            percent: true,
        };

        let (s, t) = read_csv(data.as_bytes(), &layout).unwrap();
        assert_eq!(s.name(), "Equity");
        assert_eq!(t.name(), "Bonds");
    }

    #[test]
    fn test_missing_column() {
        let data = "A,B\n1,2\n";
        let result = read_csv(data.as_bytes(), &CsvLayout::default());
        match result {
            Err(Error::InvalidInput(msg)) => assert!(msg.contains("'S'")),
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_unparseable_cell() {
        let data = "S,T\n1.0,2.0\nabc,3.0\n";
        let result = read_csv(data.as_bytes(), &CsvLayout::default());
        match result {
            Err(Error::InvalidInput(msg)) => assert!(msg.contains("Line 3")),
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_load_csv_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "S,T").unwrap();
        writeln!(file, "10,9").unwrap();
        writeln!(file, "12,11").unwrap();

        let (s, _t) = load_csv(file.path(), &CsvLayout::default()).unwrap();
        assert_relative_eq!(s.values()[1], 0.12, epsilon = 1e-12);
    }

    #[test]
    fn test_load_csv_missing_file() {
        let result = load_csv(Path::new("/nonexistent/returns.csv"), &CsvLayout::default());
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
