//! CSV ingestion for the incident dataset.
//!
//! The upstream file is a plain comma-separated export with a header row.
//! Fields may be quoted; quoted fields may contain commas, doubled quotes
//! and newlines. Column order is not assumed: the header row is matched by
//! name and the five required columns are located by index.

use crate::record::{IncidentRecord, parse_count, parse_year};

const COL_STATE: &str = "State";
const COL_CATEGORY: &str = "Crime Category";
const COL_TYPE: &str = "Crime Type";
const COL_DATE: &str = "Incident Date";
const COL_COUNT: &str = "Reported Crimes";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CsvError {
    Empty,
    MissingColumn(String),
    /// `row` is the 1-based physical line the record starts on, counting
    /// the header; quoted fields may span further lines.
    BadRow {
        row: usize,
        reason: String,
    },
    InvalidYear {
        row: usize,
        reason: String,
    },
    InvalidCount {
        row: usize,
        reason: String,
    },
}

impl std::fmt::Display for CsvError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CsvError::Empty => write!(f, "CSV input has no header row"),
            CsvError::MissingColumn(name) => write!(f, "missing required column: {name}"),
            CsvError::BadRow { row, reason } => write!(f, "bad CSV row {row}: {reason}"),
            CsvError::InvalidYear { row, reason } => write!(f, "row {row}: {reason}"),
            CsvError::InvalidCount { row, reason } => write!(f, "row {row}: {reason}"),
        }
    }
}

impl std::error::Error for CsvError {}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IncidentTable {
    pub records: Vec<IncidentRecord>,
}

impl IncidentTable {
    pub fn from_csv_str(payload: &str) -> Result<Self, CsvError> {
        let mut rows = parse_rows(payload)?.into_iter();
        let header = rows.next().ok_or(CsvError::Empty)?;

        let col = |name: &str| -> Result<usize, CsvError> {
            header
                .fields
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| CsvError::MissingColumn(name.to_string()))
        };

        let state_col = col(COL_STATE)?;
        let category_col = col(COL_CATEGORY)?;
        let type_col = col(COL_TYPE)?;
        let date_col = col(COL_DATE)?;
        let count_col = col(COL_COUNT)?;
        let width = [state_col, category_col, type_col, date_col, count_col]
            .into_iter()
            .max()
            .unwrap_or(0)
            + 1;

        let mut records = Vec::new();
        for raw in rows {
            // Trailing blank lines are common in exports; skip them.
            if raw.fields.len() == 1 && raw.fields[0].trim().is_empty() {
                continue;
            }
            if raw.fields.len() < width {
                return Err(CsvError::BadRow {
                    row: raw.row,
                    reason: format!(
                        "expected at least {width} fields, found {}",
                        raw.fields.len()
                    ),
                });
            }

            let year = parse_year(&raw.fields[date_col]).map_err(|reason| {
                CsvError::InvalidYear {
                    row: raw.row,
                    reason,
                }
            })?;
            let reported_crimes = parse_count(&raw.fields[count_col]).map_err(|reason| {
                CsvError::InvalidCount {
                    row: raw.row,
                    reason,
                }
            })?;

            records.push(IncidentRecord {
                state: raw.fields[state_col].trim().to_string(),
                crime_category: raw.fields[category_col].trim().to_string(),
                crime_type: raw.fields[type_col].trim().to_string(),
                year,
                reported_crimes,
            });
        }

        Ok(Self { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

struct RawRow {
    /// 1-based physical line the record starts on, counting the header.
    row: usize,
    fields: Vec<String>,
}

/// Split CSV text into rows of fields, honoring quoting. Line counting is
/// physical: a quoted field spanning newlines advances the line counter,
/// so reported row numbers keep matching file positions.
fn parse_rows(payload: &str) -> Result<Vec<RawRow>, CsvError> {
    let mut rows = Vec::new();
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut line = 1usize;
    let mut row_start = 1usize;

    let mut chars = payload.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' => {
                    if chars.peek() == Some(&'"') {
                        chars.next();
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                }
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' => {
                if !field.is_empty() {
                    return Err(CsvError::BadRow {
                        row: row_start,
                        reason: "quote inside unquoted field".to_string(),
                    });
                }
                in_quotes = true;
            }
            ',' => {
                fields.push(std::mem::take(&mut field));
            }
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                fields.push(std::mem::take(&mut field));
                rows.push(RawRow {
                    row: row_start,
                    fields: std::mem::take(&mut fields),
                });
                line += 1;
                row_start = line;
            }
            '\n' => {
                fields.push(std::mem::take(&mut field));
                rows.push(RawRow {
                    row: row_start,
                    fields: std::mem::take(&mut fields),
                });
                line += 1;
                row_start = line;
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(CsvError::BadRow {
            row: row_start,
            reason: "unterminated quoted field".to_string(),
        });
    }
    if !field.is_empty() || !fields.is_empty() {
        fields.push(field);
        rows.push(RawRow {
            row: row_start,
            fields,
        });
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const HEADER: &str = "State,Crime Category,Crime Type,Incident Date,Reported Crimes";

    #[test]
    fn parses_plain_rows() {
        let csv = format!("{HEADER}\nSelangor,Property,Theft,2020,5\nJohor,Assault,Robbery,2021,3\n");
        let table = IncidentTable::from_csv_str(&csv).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.records[0],
            IncidentRecord {
                state: "Selangor".to_string(),
                crime_category: "Property".to_string(),
                crime_type: "Theft".to_string(),
                year: 2020,
                reported_crimes: 5,
            }
        );
    }

    #[test]
    fn quoted_fields_keep_commas_and_quotes() {
        let csv = format!(
            "{HEADER}\n\"Kuala Lumpur, W.P.\",Property,\"Theft \"\"petty\"\"\",2020,7\n"
        );
        let table = IncidentTable::from_csv_str(&csv).unwrap();
        assert_eq!(table.records[0].state, "Kuala Lumpur, W.P.");
        assert_eq!(table.records[0].crime_type, "Theft \"petty\"");
    }

    #[test]
    fn reordered_columns_are_found_by_name() {
        let csv = "Reported Crimes,Incident Date,Crime Type,Crime Category,State\n\
                   9,2019,Theft,Property,Perak\n";
        let table = IncidentTable::from_csv_str(csv).unwrap();
        assert_eq!(table.records[0].state, "Perak");
        assert_eq!(table.records[0].reported_crimes, 9);
    }

    #[test]
    fn missing_column_is_named() {
        let csv = "State,Crime Category,Crime Type,Incident Date\nSelangor,Property,Theft,2020\n";
        let err = IncidentTable::from_csv_str(csv).unwrap_err();
        assert_eq!(err, CsvError::MissingColumn("Reported Crimes".to_string()));
    }

    #[test]
    fn bad_year_reports_row_number() {
        let csv = format!("{HEADER}\nSelangor,Property,Theft,2020,5\nJohor,Assault,Robbery,May 2021,3\n");
        match IncidentTable::from_csv_str(&csv).unwrap_err() {
            CsvError::InvalidYear { row, .. } => assert_eq!(row, 3),
            other => panic!("expected InvalidYear, got {other:?}"),
        }
    }

    #[test]
    fn float_counts_from_the_upstream_export_parse() {
        let csv = format!("{HEADER}\nSelangor,Property,Theft,2020,5.0\n");
        let table = IncidentTable::from_csv_str(&csv).unwrap();
        assert_eq!(table.records[0].reported_crimes, 5);
    }

    #[test]
    fn short_row_is_rejected() {
        let csv = format!("{HEADER}\nSelangor,Property,Theft\n");
        match IncidentTable::from_csv_str(&csv).unwrap_err() {
            CsvError::BadRow { row, .. } => assert_eq!(row, 2),
            other => panic!("expected BadRow, got {other:?}"),
        }
    }

    #[test]
    fn row_numbers_stay_physical_across_quoted_newlines() {
        // The quoted state name spans lines 2-3, so the bad record starts
        // on line 4.
        let csv = format!(
            "{HEADER}\n\"Kuala\nLumpur\",Property,Theft,2020,5\nJohor,Assault,Robbery,May 2021,3\n"
        );
        match IncidentTable::from_csv_str(&csv).unwrap_err() {
            CsvError::InvalidYear { row, .. } => assert_eq!(row, 4),
            other => panic!("expected InvalidYear, got {other:?}"),
        }
    }

    #[test]
    fn trailing_blank_lines_are_skipped() {
        let csv = format!("{HEADER}\nSelangor,Property,Theft,2020,5\n\n");
        let table = IncidentTable::from_csv_str(&csv).unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn unterminated_quote_is_an_error() {
        let csv = format!("{HEADER}\n\"Selangor,Property,Theft,2020,5\n");
        assert!(IncidentTable::from_csv_str(&csv).is_err());
    }
}
