use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type, Int64Type};
use arrow::record_batch::RecordBatch;
use once_cell::unsync::OnceCell;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::model::{required_headers, Column, Record, SalaryDataset, SALARY_HEADER};
use crate::error::LoadError;

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// Where the salary table comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSource {
    /// `http(s)://` or `file://` URL. Remote content is always CSV.
    Url(String),
    /// Local file, format chosen by extension.
    File(PathBuf),
}

impl DatasetSource {
    /// Interpret a user-supplied location: URLs stay URLs, `file://` and bare
    /// paths become local files.
    pub fn parse(location: &str) -> Self {
        if let Some(path) = location.strip_prefix("file://") {
            DatasetSource::File(PathBuf::from(path))
        } else if location.starts_with("http://") || location.starts_with("https://") {
            DatasetSource::Url(location.to_string())
        } else {
            DatasetSource::File(PathBuf::from(location))
        }
    }
}

impl std::fmt::Display for DatasetSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatasetSource::Url(url) => write!(f, "{url}"),
            DatasetSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

// ---------------------------------------------------------------------------
// Loader with per-instance cache
// ---------------------------------------------------------------------------

/// Loads the dataset once and hands out the same shared table afterwards.
///
/// Constructed explicitly and passed to whoever needs the data, so tests can
/// point it at a temporary file instead of the network.
pub struct DatasetLoader {
    source: DatasetSource,
    timeout: Duration,
    cache: OnceCell<Arc<SalaryDataset>>,
}

impl DatasetLoader {
    pub fn new(source: DatasetSource, timeout: Duration) -> Self {
        Self {
            source,
            timeout,
            cache: OnceCell::new(),
        }
    }

    pub fn source(&self) -> &DatasetSource {
        &self.source
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Return the cached table, fetching and parsing it on first use.
    pub fn load(&self) -> Result<Arc<SalaryDataset>, LoadError> {
        if let Some(ds) = self.cache.get() {
            log::debug!("dataset cache hit for {}", self.source);
            return Ok(Arc::clone(ds));
        }
        let ds = self.cache.get_or_try_init(|| {
            let records = match &self.source {
                DatasetSource::Url(url) => parse_csv(fetch(url, self.timeout)?.as_slice())?,
                DatasetSource::File(path) => load_file(path)?,
            };
            log::info!("loaded {} salary records from {}", records.len(), self.source);
            Ok::<_, LoadError>(Arc::new(SalaryDataset::from_records(records)))
        })?;
        Ok(Arc::clone(ds))
    }
}

fn fetch(url: &str, timeout: Duration) -> Result<Vec<u8>, LoadError> {
    let fetch_err = |source| LoadError::Fetch {
        url: url.to_string(),
        source,
    };

    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(fetch_err)?;
    let resp = client.get(url).send().map_err(fetch_err)?;
    let status = resp.status();
    if !status.is_success() {
        return Err(LoadError::Status {
            url: url.to_string(),
            status,
        });
    }
    let bytes = resp.bytes().map_err(fetch_err)?;
    Ok(bytes.to_vec())
}

// ---------------------------------------------------------------------------
// Local files
// ---------------------------------------------------------------------------

/// Load records from a local file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the source column names
/// * `.json`    – `[{ "ano_de_trabalho": 2024, "usd": 120000.0, ... }, ...]`
/// * `.parquet` – flat columns, any integer/float/string physical types
pub fn load_file(path: &Path) -> Result<Vec<Record>, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let io_err = |source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    };

    match ext.as_str() {
        "csv" => parse_csv(File::open(path).map_err(io_err)?),
        "json" => {
            let mut text = String::new();
            File::open(path)
                .and_then(|mut f| f.read_to_string(&mut text))
                .map_err(io_err)?;
            parse_json(&text)
        }
        "parquet" | "pq" => parse_parquet(File::open(path).map_err(io_err)?),
        other => Err(LoadError::UnsupportedFormat(other.to_string())),
    }
}

fn check_headers<'a>(present: impl IntoIterator<Item = &'a str>) -> Result<(), LoadError> {
    let present: Vec<&str> = present.into_iter().collect();
    let missing: Vec<String> = required_headers()
        .into_iter()
        .filter(|h| !present.contains(h))
        .map(str::to_string)
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(LoadError::MissingColumns(missing))
    }
}

fn validate(records: &[Record]) -> Result<(), LoadError> {
    for (row, r) in records.iter().enumerate() {
        if !r.salary_usd.is_finite() {
            return Err(LoadError::InvalidValue {
                row,
                reason: format!("salary {} is not a finite number", r.salary_usd),
            });
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

/// Parse CSV text with a header row. Extra columns are ignored.
pub fn parse_csv<R: Read>(input: R) -> Result<Vec<Record>, LoadError> {
    let mut reader = csv::Reader::from_reader(input);
    check_headers(reader.headers()?.iter())?;

    let records = reader
        .deserialize::<Record>()
        .collect::<Result<Vec<_>, _>>()?;
    validate(&records)?;
    Ok(records)
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`.
pub fn parse_json(text: &str) -> Result<Vec<Record>, LoadError> {
    let rows: Vec<serde_json::Map<String, serde_json::Value>> = serde_json::from_str(text)?;
    if let Some(first) = rows.first() {
        check_headers(first.keys().map(String::as_str))?;
    }
    let records = rows
        .into_iter()
        .map(|row| serde_json::from_value::<Record>(serde_json::Value::Object(row)))
        .collect::<Result<Vec<_>, _>>()?;
    validate(&records)?;
    Ok(records)
}

// ---------------------------------------------------------------------------
// Parquet
// ---------------------------------------------------------------------------

/// Read every record batch; columns are cast to the record's field types so
/// files written by Pandas (`int64`, `object`) and Polars (`i32`, `large_utf8`)
/// both work.
fn parse_parquet(file: File) -> Result<Vec<Record>, LoadError> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    check_headers(builder.schema().fields().iter().map(|f| f.name().as_str()))?;
    let reader = builder.build()?;

    let mut records = Vec::new();
    for batch in reader {
        let batch = batch?;
        append_batch(&batch, records.len(), &mut records)?;
    }
    validate(&records)?;
    Ok(records)
}

fn append_batch(batch: &RecordBatch, offset: usize, out: &mut Vec<Record>) -> Result<(), LoadError> {
    let column = |name: &str, to: &DataType| -> Result<ArrayRef, LoadError> {
        let idx = batch.schema().index_of(name)?;
        Ok(cast(batch.column(idx), to)?)
    };

    let year = column(Column::WorkYear.header(), &DataType::Int64)?;
    let salary = column(SALARY_HEADER, &DataType::Float64)?;
    let text_columns = [
        Column::Seniority,
        Column::Contract,
        Column::CompanySize,
        Column::RemoteType,
        Column::JobTitle,
        Column::ResidenceIso3,
    ]
    .iter()
    .map(|c| column(c.header(), &DataType::Utf8))
    .collect::<Result<Vec<_>, _>>()?;

    let years = year.as_primitive::<Int64Type>();
    let salaries = salary.as_primitive::<Float64Type>();
    let texts: Vec<_> = text_columns.iter().map(|a| a.as_string::<i32>()).collect();
    let text = |col: usize, row: usize| -> String {
        let arr = texts[col];
        if arr.is_null(row) {
            String::new()
        } else {
            arr.value(row).to_string()
        }
    };

    for row in 0..batch.num_rows() {
        if years.is_null(row) || salaries.is_null(row) {
            return Err(LoadError::InvalidValue {
                row: offset + row,
                reason: "missing work year or salary".to_string(),
            });
        }
        out.push(Record {
            work_year: years.value(row),
            seniority: text(0, row),
            contract: text(1, row),
            company_size: text(2, row),
            remote_type: text(3, row),
            job_title: text(4, row),
            residence_iso3: text(5, row),
            salary_usd: salaries.value(row),
        });
    }
    Ok(())
}
