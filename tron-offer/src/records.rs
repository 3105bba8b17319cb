use serde::{Deserialize, Serialize};

/// Columns every offer sheet must carry
pub const REQUIRED_COLUMNS: [&str; 8] = [
    "id", "sfname", "name", "tariff", "title_pl", "period", "cashback", "fee",
];

pub const DELIMITER: u8 = b';';

/// One row of the partner offer sheet
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CsvOfferRecord {
    pub id: String,
    pub sfname: String,
    pub name: String,
    pub tariff: String,
    pub title_pl: String,
    pub period: String,
    pub cashback: String,
    pub fee: String,
    /// 1-based line the row starts on; 0 for records not read from text
    #[serde(skip)]
    pub line: u64,
}

/// Result of reading a sheet: the usable rows plus the rows that were dropped
#[derive(Debug, Clone, Default, Serialize)]
pub struct CsvImport {
    pub records: Vec<CsvOfferRecord>,
    pub skipped: Vec<SkippedRow>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SkippedRow {
    /// 1-based line in the source text
    pub line: u64,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    ColumnCount { expected: usize, found: usize },
    DuplicateId { id: String },
    Unreadable { message: String },
}

/// Read a `;`-delimited sheet with a header row.
///
/// Blank lines are ignored. Rows whose column count differs from the header
/// are skipped and reported; a missing header or a missing required column
/// fails the whole read.
pub fn parse_csv(input: &str) -> Result<CsvImport, CsvError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input.as_bytes());

    let headers = reader.headers().map_err(CsvError::Read)?.clone();
    if headers.iter().all(str::is_empty) {
        return Err(CsvError::MissingHeader);
    }
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(CsvError::MissingColumn(column.to_string()));
        }
    }

    let mut import = CsvImport::default();
    for result in reader.records() {
        let record = match result {
            Ok(record) => record,
            Err(err) => {
                let line = err.position().map(|p| p.line()).unwrap_or(0);
                tracing::warn!(line, error = %err, "Skipping unreadable CSV row");
                import.skipped.push(SkippedRow {
                    line,
                    reason: SkipReason::Unreadable { message: err.to_string() },
                });
                continue;
            }
        };
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        if record.len() != headers.len() {
            tracing::warn!(
                line,
                expected = headers.len(),
                found = record.len(),
                "Skipping CSV row with wrong column count"
            );
            import.skipped.push(SkippedRow {
                line,
                reason: SkipReason::ColumnCount {
                    expected: headers.len(),
                    found: record.len(),
                },
            });
            continue;
        }

        match record.deserialize::<CsvOfferRecord>(Some(&headers)) {
            Ok(offer) => import.records.push(CsvOfferRecord { line, ..offer }),
            Err(err) => {
                tracing::warn!(line, error = %err, "Skipping CSV row that does not decode");
                import.skipped.push(SkippedRow {
                    line,
                    reason: SkipReason::Unreadable { message: err.to_string() },
                });
            }
        }
    }

    Ok(import)
}

#[derive(Debug, thiserror::Error)]
pub enum CsvError {
    #[error("CSV input has no header row")]
    MissingHeader,

    #[error("CSV header is missing column: {0}")]
    MissingColumn(String),

    #[error("Failed to read CSV: {0}")]
    Read(#[source] csv::Error),
}
