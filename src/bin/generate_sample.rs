//! Write a synthetic sleep & lifestyle dataset for trying out the dashboard.
//!
//! Usage: `generate_sample [output.csv | output.parquet]`

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

const ROWS: usize = 400;
const DEFAULT_OUTPUT: &str = "sample_sleep_data.csv";

/// (occupation, baseline sleep hours, baseline stress, baseline activity minutes)
const OCCUPATIONS: &[(&str, f64, f64, f64)] = &[
    ("Accountant", 7.1, 4.5, 58.0),
    ("Doctor", 6.9, 6.7, 55.0),
    ("Engineer", 7.9, 3.9, 51.0),
    ("Lawyer", 7.4, 5.1, 70.0),
    ("Manager", 6.9, 5.0, 55.0),
    ("Nurse", 7.0, 5.5, 78.0),
    ("Sales Representative", 5.9, 8.0, 30.0),
    ("Salesperson", 6.4, 7.0, 45.0),
    ("Scientist", 6.0, 7.0, 41.0),
    ("Software Engineer", 6.8, 6.0, 48.0),
    ("Teacher", 6.7, 4.5, 45.0),
    // Exercises quote handling in the occupation filter.
    ("Doctor's Assistant", 6.6, 6.2, 60.0),
];

/// One generated row. Field names follow the common public sleep dataset.
#[derive(Debug, Serialize)]
struct SampleRow {
    #[serde(rename = "Person ID")]
    person_id: i64,
    #[serde(rename = "Gender")]
    gender: String,
    #[serde(rename = "Age")]
    age: i64,
    #[serde(rename = "Occupation")]
    occupation: String,
    #[serde(rename = "Sleep Duration")]
    sleep_duration: f64,
    #[serde(rename = "Quality of Sleep")]
    quality_of_sleep: i64,
    #[serde(rename = "Physical Activity Level")]
    physical_activity: i64,
    #[serde(rename = "Stress Level")]
    stress_level: i64,
    #[serde(rename = "BMI Category")]
    bmi_category: String,
    #[serde(rename = "Daily Steps")]
    daily_steps: i64,
}

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

    fn below(&mut self, n: usize) -> usize {
        (self.next_f64() * n as f64) as usize % n.max(1)
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn generate_rows(rng: &mut SimpleRng) -> Vec<SampleRow> {
    (0..ROWS)
        .map(|i| {
            let (occupation, sleep_mu, stress_mu, activity_mu) =
                OCCUPATIONS[rng.below(OCCUPATIONS.len())];
            let gender = if rng.next_f64() < 0.5 { "Male" } else { "Female" };
            let age = 27 + rng.below(33) as i64;

            // Sleep shortens a little as stress rises above the occupation baseline.
            let stress = rng.gauss(stress_mu, 1.0).round().clamp(1.0, 10.0);
            let activity = rng.gauss(activity_mu, 12.0).round().clamp(10.0, 100.0);
            let sleep = rng.gauss(sleep_mu - 0.1 * (stress - stress_mu), 0.35);
            let sleep = (sleep.clamp(5.0, 9.5) * 10.0).round() / 10.0;

            let quality = (sleep * 1.1 - stress * 0.25 + 1.5).round().clamp(1.0, 10.0);
            let bmi = match rng.below(10) {
                0..=5 => "Normal",
                6..=8 => "Overweight",
                _ => "Obese",
            };
            let steps = (activity * 100.0 + rng.gauss(0.0, 600.0)).max(2000.0).round();

            SampleRow {
                person_id: i as i64 + 1,
                gender: gender.to_string(),
                age,
                occupation: occupation.to_string(),
                sleep_duration: sleep,
                quality_of_sleep: quality as i64,
                physical_activity: activity as i64,
                stress_level: stress as i64,
                bmi_category: bmi.to_string(),
                daily_steps: steps as i64,
            }
        })
        .collect()
}

fn to_record_batch(rows: &[SampleRow]) -> Result<RecordBatch> {
    let int = |f: fn(&SampleRow) -> i64| -> ArrayRef {
        Arc::new(Int64Array::from(rows.iter().map(f).collect::<Vec<_>>()))
    };
    let text = |f: fn(&SampleRow) -> &str| -> ArrayRef {
        Arc::new(StringArray::from(rows.iter().map(f).collect::<Vec<_>>()))
    };

    let schema = Arc::new(Schema::new(vec![
        Field::new("Person ID", DataType::Int64, false),
        Field::new("Gender", DataType::Utf8, false),
        Field::new("Age", DataType::Int64, false),
        Field::new("Occupation", DataType::Utf8, false),
        Field::new("Sleep Duration", DataType::Float64, false),
        Field::new("Quality of Sleep", DataType::Int64, false),
        Field::new("Physical Activity Level", DataType::Int64, false),
        Field::new("Stress Level", DataType::Int64, false),
        Field::new("BMI Category", DataType::Utf8, false),
        Field::new("Daily Steps", DataType::Int64, false),
    ]));

    RecordBatch::try_new(
        schema,
        vec![
            int(|r| r.person_id),
            text(|r| r.gender.as_str()),
            int(|r| r.age),
            text(|r| r.occupation.as_str()),
            Arc::new(Float64Array::from(
                rows.iter().map(|r| r.sleep_duration).collect::<Vec<_>>(),
            )),
            int(|r| r.quality_of_sleep),
            int(|r| r.physical_activity),
            int(|r| r.stress_level),
            text(|r| r.bmi_category.as_str()),
            int(|r| r.daily_steps),
        ],
    )
    .context("building record batch")
}

fn write_csv(rows: &[SampleRow], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV output")?;
    for row in rows {
        writer.serialize(row).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV output")?;
    Ok(())
}

fn write_parquet(batch: &RecordBatch, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path).context("creating parquet output")?;
    let mut writer =
        ArrowWriter::try_new(file, batch.schema(), None).context("creating parquet writer")?;
    writer.write(batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let output = PathBuf::from(
        std::env::args()
            .nth(1)
            .unwrap_or_else(|| DEFAULT_OUTPUT.to_string()),
    );

    let mut rng = SimpleRng::new(42);
    let rows = generate_rows(&mut rng);
    let batch = to_record_batch(&rows)?;

    let ext = output
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    match ext.as_str() {
        "csv" => write_csv(&rows, &output)?,
        "parquet" | "pq" => write_parquet(&batch, &output)?,
        other => bail!("Unsupported output extension: .{other} (use .csv or .parquet)"),
    }

    println!("{}", pretty_format_batches(&[batch.slice(0, 5)])?);
    println!("Wrote {} records to {}", rows.len(), output.display());
    Ok(())
}
