use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

// ---------------------------------------------------------------------------
// Column – a categorical column that can be filtered or grouped on
// ---------------------------------------------------------------------------

/// Categorical columns of the salary table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    WorkYear,
    Seniority,
    Contract,
    CompanySize,
    RemoteType,
    JobTitle,
    ResidenceIso3,
}

impl Column {
    /// Every categorical column, in source order.
    pub const ALL: [Column; 7] = [
        Column::WorkYear,
        Column::Seniority,
        Column::Contract,
        Column::CompanySize,
        Column::RemoteType,
        Column::JobTitle,
        Column::ResidenceIso3,
    ];

    /// Columns exposed as multi-select filters in the sidebar.
    pub const SIDEBAR: [Column; 4] = [
        Column::WorkYear,
        Column::Seniority,
        Column::Contract,
        Column::CompanySize,
    ];

    /// Header name in the source file.
    pub fn header(self) -> &'static str {
        match self {
            Column::WorkYear => "ano_de_trabalho",
            Column::Seniority => "senioridade",
            Column::Contract => "contrato",
            Column::CompanySize => "tamanho_da_empresa",
            Column::RemoteType => "remoto",
            Column::JobTitle => "cargo",
            Column::ResidenceIso3 => "residencia_iso3",
        }
    }

    /// Human-readable label for widgets and reports.
    pub fn label(self) -> &'static str {
        match self {
            Column::WorkYear => "Year",
            Column::Seniority => "Seniority",
            Column::Contract => "Contract type",
            Column::CompanySize => "Company size",
            Column::RemoteType => "Remote type",
            Column::JobTitle => "Job title",
            Column::ResidenceIso3 => "Country",
        }
    }
}

/// Header of the salary column in the source file.
pub const SALARY_HEADER: &str = "usd";

/// Every header a source file must carry.
pub fn required_headers() -> Vec<&'static str> {
    Column::ALL
        .iter()
        .map(|c| c.header())
        .chain(std::iter::once(SALARY_HEADER))
        .collect()
}

/// Numeric columns that can be summarized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericColumn {
    SalaryUsd,
    WorkYear,
}

// ---------------------------------------------------------------------------
// CellValue – a single categorical cell
// ---------------------------------------------------------------------------

/// The value a record holds in a categorical column.
/// Ordered so it can be stored in `BTreeSet` filter selections.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CellValue {
    Integer(i64),
    Text(String),
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Integer(i)
    }
}

// ---------------------------------------------------------------------------
// Record – one row of the salary table
// ---------------------------------------------------------------------------

/// One job/salary observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "ano_de_trabalho", deserialize_with = "lenient_year")]
    pub work_year: i64,
    #[serde(rename = "senioridade")]
    pub seniority: String,
    #[serde(rename = "contrato")]
    pub contract: String,
    #[serde(rename = "tamanho_da_empresa")]
    pub company_size: String,
    #[serde(rename = "remoto")]
    pub remote_type: String,
    #[serde(rename = "cargo")]
    pub job_title: String,
    #[serde(rename = "residencia_iso3")]
    pub residence_iso3: String,
    #[serde(rename = "usd")]
    pub salary_usd: f64,
}

impl Record {
    /// Value of a categorical column.
    pub fn value(&self, column: Column) -> CellValue {
        match column {
            Column::WorkYear => CellValue::Integer(self.work_year),
            other => CellValue::Text(self.text(other).to_string()),
        }
    }

    /// Borrowed text of a categorical column. The work year has no text form
    /// and yields an empty string.
    pub fn text(&self, column: Column) -> &str {
        match column {
            Column::WorkYear => "",
            Column::Seniority => &self.seniority,
            Column::Contract => &self.contract,
            Column::CompanySize => &self.company_size,
            Column::RemoteType => &self.remote_type,
            Column::JobTitle => &self.job_title,
            Column::ResidenceIso3 => &self.residence_iso3,
        }
    }

    /// Whether the record holds `value` in `column`, without allocating.
    pub fn holds(&self, column: Column, value: &CellValue) -> bool {
        match (column, value) {
            (Column::WorkYear, CellValue::Integer(y)) => self.work_year == *y,
            (Column::WorkYear, CellValue::Text(_)) => false,
            (_, CellValue::Text(t)) => self.text(column) == t,
            (_, CellValue::Integer(_)) => false,
        }
    }

    pub fn numeric(&self, column: NumericColumn) -> f64 {
        match column {
            NumericColumn::SalaryUsd => self.salary_usd,
            NumericColumn::WorkYear => self.work_year as f64,
        }
    }
}

/// Pandas exports may write integer years as `2023.0`.
fn lenient_year<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Year {
        Int(i64),
        Float(f64),
        Text(String),
    }

    match Year::deserialize(deserializer)? {
        Year::Int(i) => Ok(i),
        Year::Float(f) if f.fract() == 0.0 && f.is_finite() => Ok(f as i64),
        Year::Float(f) => Err(serde::de::Error::custom(format!(
            "work year {f} is not a whole number"
        ))),
        Year::Text(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.fract() == 0.0)
            .map(|f| f as i64)
            .ok_or_else(|| serde::de::Error::custom(format!("work year '{s}' is not a number"))),
    }
}

// ---------------------------------------------------------------------------
// SalaryDataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed column indices.
/// Immutable once built; shared behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct SalaryDataset {
    /// All records (rows) in source order.
    pub records: Vec<Record>,
    /// For each categorical column the sorted set of unique values.
    pub unique_values: BTreeMap<Column, BTreeSet<CellValue>>,
}

impl SalaryDataset {
    /// Build column indices from the loaded records.
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut unique_values: BTreeMap<Column, BTreeSet<CellValue>> = Column::ALL
            .iter()
            .map(|&c| (c, BTreeSet::new()))
            .collect();

        for record in &records {
            for column in Column::ALL {
                if let Some(values) = unique_values.get_mut(&column) {
                    values.insert(record.value(column));
                }
            }
        }

        SalaryDataset {
            records,
            unique_values,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
