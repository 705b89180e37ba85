//! Write a synthetic salary survey with the dashboard's schema, as
//! `sample_salaries.csv` and `sample_salaries.parquet`, for offline use:
//!
//! ```text
//! cargo run --bin generate_sample -- 2000
//! cargo run -- --file sample_salaries.parquet
//! ```

use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::print_batches;
use parquet::arrow::ArrowWriter;

use salary_dash::data::model::{Column, Record, SALARY_HEADER};

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }
}

// (title, base salary in USD)
const TITLES: [(&str, f64); 12] = [
    ("Data Analyst", 70_000.0),
    ("Data Scientist", 120_000.0),
    ("Data Engineer", 125_000.0),
    ("Machine Learning Engineer", 150_000.0),
    ("Analytics Engineer", 115_000.0),
    ("Business Intelligence Analyst", 80_000.0),
    ("Research Scientist", 160_000.0),
    ("Data Architect", 145_000.0),
    ("Applied Scientist", 170_000.0),
    ("Data Manager", 110_000.0),
    ("Head of Data", 190_000.0),
    ("Data Specialist", 65_000.0),
];

// (seniority, multiplier)
const SENIORITY: [(&str, f64); 4] = [
    ("junior", 0.6),
    ("pleno", 0.85),
    ("senior", 1.1),
    ("executivo", 1.5),
];

// (country, multiplier)
const COUNTRIES: [(&str, f64); 8] = [
    ("USA", 1.0),
    ("CAN", 0.85),
    ("GBR", 0.8),
    ("DEU", 0.75),
    ("ESP", 0.55),
    ("BRA", 0.35),
    ("IND", 0.3),
    ("PRT", 0.45),
];

const CONTRACTS: [&str; 4] = ["integral", "parcial", "contrato", "freelancer"];
const COMPANY_SIZES: [&str; 3] = ["pequena", "media", "grande"];
const REMOTE: [&str; 3] = ["remoto", "hibrido", "presencial"];
const YEARS: [i64; 5] = [2020, 2021, 2022, 2023, 2024];

fn generate(n: usize, rng: &mut SimpleRng) -> Vec<Record> {
    (0..n)
        .map(|_| {
            let &(title, base) = rng.pick(&TITLES);
            let &(seniority, s_mult) = rng.pick(&SENIORITY);
            let &(country, c_mult) = rng.pick(&COUNTRIES);
            let year = *rng.pick(&YEARS);
            // Salaries drift up ~4% a year.
            let drift = 1.0 + 0.04 * (year - YEARS[0]) as f64;
            let salary = (base * s_mult * c_mult * drift * rng.gauss(1.0, 0.15)).max(5_000.0);

            Record {
                work_year: year,
                seniority: seniority.to_string(),
                contract: rng.pick(&CONTRACTS).to_string(),
                company_size: rng.pick(&COMPANY_SIZES).to_string(),
                remote_type: rng.pick(&REMOTE).to_string(),
                job_title: title.to_string(),
                residence_iso3: country.to_string(),
                salary_usd: salary.round(),
            }
        })
        .collect()
}

fn to_batch(records: &[Record]) -> Result<RecordBatch> {
    let text = |f: fn(&Record) -> &str| -> ArrayRef {
        Arc::new(StringArray::from(records.iter().map(f).collect::<Vec<_>>()))
    };

    let mut fields = vec![Field::new(Column::WorkYear.header(), DataType::Int64, false)];
    let mut columns: Vec<ArrayRef> = vec![Arc::new(Int64Array::from(
        records.iter().map(|r| r.work_year).collect::<Vec<_>>(),
    ))];

    let text_columns: [(Column, fn(&Record) -> &str); 6] = [
        (Column::Seniority, |r| &r.seniority),
        (Column::Contract, |r| &r.contract),
        (Column::CompanySize, |r| &r.company_size),
        (Column::RemoteType, |r| &r.remote_type),
        (Column::JobTitle, |r| &r.job_title),
        (Column::ResidenceIso3, |r| &r.residence_iso3),
    ];
    for (column, getter) in text_columns {
        fields.push(Field::new(column.header(), DataType::Utf8, false));
        columns.push(text(getter));
    }

    fields.push(Field::new(SALARY_HEADER, DataType::Float64, false));
    columns.push(Arc::new(Float64Array::from(
        records.iter().map(|r| r.salary_usd).collect::<Vec<_>>(),
    )));

    RecordBatch::try_new(Arc::new(Schema::new(fields)), columns).context("building record batch")
}

fn main() -> Result<()> {
    let n: usize = match std::env::args().nth(1) {
        Some(arg) => arg.parse().with_context(|| format!("'{arg}' is not a row count"))?,
        None => 1000,
    };

    let mut rng = SimpleRng::new(42);
    let records = generate(n, &mut rng);

    // Write CSV
    let csv_path = "sample_salaries.csv";
    let mut writer = csv::Writer::from_path(csv_path).context("creating CSV file")?;
    for record in &records {
        writer.serialize(record).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV file")?;

    // Write Parquet
    let batch = to_batch(&records)?;
    let parquet_path = "sample_salaries.parquet";
    let file = std::fs::File::create(parquet_path).context("creating parquet file")?;
    let mut writer =
        ArrowWriter::try_new(file, batch.schema(), None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;

    print_batches(&[batch.slice(0, batch.num_rows().min(5))]).context("printing preview")?;
    println!("Wrote {n} salary records to {csv_path} and {parquet_path}");
    Ok(())
}
