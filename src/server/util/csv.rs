//! CSV import and export over the `csv` crate.
//!
//! Exports always start with a header row, even when there are no records. Imports read
//! the header to map columns by name, so column order is free and unknown columns are
//! ignored. A row that fails is reported with its line number and never aborts the rest of
//! the import.

use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    model::api::{ImportRowErrorDto, ImportSummaryDto},
    server::error::Error,
};

/// Serializes `rows` under the given header
pub fn write<T: Serialize>(headers: &[&str], rows: impl IntoIterator<Item = T>) -> Result<String, Error> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(headers)?;
    for row in rows {
        writer.serialize(row)?;
    }

    let data = writer
        .into_inner()
        .map_err(|e| Error::InternalError(format!("Failed to flush CSV writer: {}", e)))?;

    String::from_utf8(data)
        .map_err(|e| Error::InternalError(format!("CSV output is not valid UTF-8: {}", e)))
}

/// A parsed CSV row with the line it started on
pub struct Row<T> {
    pub line: u64,
    pub record: Result<T, csv::Error>,
}

/// Parses every data row of `data`, requiring each of `required` to be a header column.
///
/// Fields are trimmed and empty fields read as `None` for optional columns.
pub fn read<T: DeserializeOwned>(data: &[u8], required: &[&str]) -> Result<Vec<Row<T>>, Error> {
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(data);

    let headers: StringRecord = reader.headers()?.clone();
    let missing: Vec<&str> = required
        .iter()
        .copied()
        .filter(|column| !headers.iter().any(|h| h == *column))
        .collect();
    if !missing.is_empty() {
        return Err(Error::validation(format!(
            "CSV is missing required column(s): {}",
            missing.join(", ")
        )));
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        match record {
            Ok(record) => {
                let line = record.position().map(|p| p.line()).unwrap_or_default();

                if record.iter().all(str::is_empty) {
                    continue;
                }

                rows.push(Row {
                    line,
                    record: record.deserialize(Some(&headers)),
                });
            }
            Err(e) => {
                let line = e.position().map(|p| p.line()).unwrap_or_default();
                rows.push(Row {
                    line,
                    record: Err(e),
                });
            }
        }
    }

    Ok(rows)
}

/// What an imported row did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOutcome {
    Created,
    Updated,
    Skipped,
}

/// Accumulates row outcomes into an [`ImportSummaryDto`]
#[derive(Default)]
pub struct ImportReport {
    summary: ImportSummaryDto,
}

impl ImportReport {
    pub fn record(&mut self, line: u64, outcome: Result<RowOutcome, Error>) {
        match outcome {
            Ok(RowOutcome::Created) => self.summary.created += 1,
            Ok(RowOutcome::Updated) => self.summary.updated += 1,
            Ok(RowOutcome::Skipped) => self.summary.skipped += 1,
            Err(e) => {
                tracing::debug!(line = %line, "CSV row rejected: {}", e);

                self.summary.errors.push(ImportRowErrorDto {
                    line,
                    message: row_error_message(&e),
                });
            }
        }
    }

    pub fn finish(self) -> ImportSummaryDto {
        self.summary
    }
}

/// Client-facing message for a failed row, hiding database internals
fn row_error_message(error: &Error) -> String {
    match error {
        Error::DbErr(_) | Error::InternalError(_) => "Failed to store row".to_string(),
        Error::CsvError(e) => match e.kind() {
            csv::ErrorKind::Deserialize { err, .. } => match err.field() {
                Some(field) => format!("Invalid value in column {}: {}", field + 1, err.kind()),
                None => err.kind().to_string(),
            },
            _ => e.to_string(),
        },
        e => e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Row {
        name: String,
        email: Option<String>,
        rate: Option<i64>,
    }

    mod write {
        use super::Row;
        use crate::server::util::csv::write;

        /// Expect a header even with no rows
        #[test]
        fn header_only_when_empty() {
            let csv = write::<Row>(&["name", "email", "rate"], Vec::new()).unwrap();

            assert_eq!(csv, "name,email,rate\n");
        }

        /// Expect quoting for commas and quotes, and blanks for missing values
        #[test]
        fn quotes_special_characters() {
            let rows = vec![Row {
                name: "Acme, \"Aerial\"".to_string(),
                email: None,
                rate: Some(7500),
            }];

            let csv = write(&["name", "email", "rate"], rows).unwrap();

            assert_eq!(csv, "name,email,rate\n\"Acme, \"\"Aerial\"\"\",,7500\n");
        }
    }

    mod read {
        use super::Row;
        use crate::server::util::csv::{read, write};

        /// Expect columns mapped by header name in any order, with blanks as None
        #[test]
        fn maps_columns_by_header() {
            let data = b"rate,name,email,extra\n,Acme, ops@acme.example ,x\n100,Skyline,,\n";

            let rows = read::<Row>(data, &["name"]).unwrap();

            assert_eq!(rows.len(), 2);
            assert_eq!(rows[0].line, 2);
            assert_eq!(
                rows[0].record.as_ref().unwrap(),
                &Row {
                    name: "Acme".to_string(),
                    email: Some("ops@acme.example".to_string()),
                    rate: None,
                }
            );
            assert_eq!(rows[1].record.as_ref().unwrap().rate, Some(100));
        }

        /// Expect a bad value to fail only its own row
        #[test]
        fn bad_row_is_isolated() {
            let data = b"name,rate\nAcme,abc\nSkyline,5\n";

            let rows = read::<Row>(data, &["name"]).unwrap();

            assert_eq!(rows.len(), 2);
            assert!(rows[0].record.is_err());
            assert!(rows[1].record.is_ok());
        }

        /// Expect the whole file rejected when a required column is absent
        #[test]
        fn missing_required_column() {
            assert!(read::<Row>(b"email\nops@acme.example\n", &["name"]).is_err());
        }

        /// Expect exported rows to read back unchanged
        #[test]
        fn export_reads_back() {
            let rows = vec![
                Row {
                    name: "Acme, \"Aerial\"".to_string(),
                    email: Some("ops@acme.example".to_string()),
                    rate: Some(1),
                },
                Row {
                    name: "Skyline".to_string(),
                    email: None,
                    rate: None,
                },
            ];
            let csv = write(&["name", "email", "rate"], &rows).unwrap();

            let read_back: Vec<Row> = read::<Row>(csv.as_bytes(), &["name"])
                .unwrap()
                .into_iter()
                .map(|row| row.record.unwrap())
                .collect();

            assert_eq!(read_back, rows);
        }
    }
}
