use std::io::{self, Read};
use std::path::Path;

use anyhow::{bail, Context, Result};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type, Int64Type};
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{CellValue, Dataset, SleepColumn, SleepRecord};
use crate::error::LoadError;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a sleep dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one record per line
/// * `.json`    – `[{ "Occupation": "Nurse", "Sleep Duration": 7.2, ... }, ...]`
/// * `.parquet` – flat table with one column per field
///
/// A missing file, a zero-byte file and a table without data rows are all
/// reported as distinct [`LoadError`] variants.
pub fn load_dataset(path: &Path) -> Result<Dataset, LoadError> {
    let meta = std::fs::metadata(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => LoadError::NotFound {
            path: path.to_path_buf(),
        },
        _ => LoadError::Unreadable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        },
    })?;
    if meta.len() == 0 {
        return Err(LoadError::Empty {
            path: path.to_path_buf(),
        });
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let parsed = match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => {
            return Err(LoadError::UnsupportedFormat {
                extension: other.to_string(),
            })
        }
    };

    let dataset = parsed.map_err(|e| LoadError::Unreadable {
        path: path.to_path_buf(),
        reason: format!("{e:#}"),
    })?;

    if dataset.is_empty() {
        return Err(LoadError::Empty {
            path: path.to_path_buf(),
        });
    }

    log::info!(
        "Loaded {} records from {} (extra columns: {:?})",
        dataset.len(),
        path.display(),
        dataset.extra_columns()
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Column layout shared by all formats
// ---------------------------------------------------------------------------

/// Position of each fixed column in a source row, plus the leftovers.
#[derive(Debug)]
struct ColumnLayout {
    occupation: usize,
    sleep_duration: usize,
    stress_level: usize,
    physical_activity: usize,
    age: usize,
    gender: usize,
    extra: Vec<(usize, String)>,
}

impl ColumnLayout {
    /// Map headers onto the fixed schema. The first header matching a fixed
    /// column wins; every other header becomes an extra column.
    fn resolve(headers: &[String]) -> Result<Self> {
        let find = |col: SleepColumn| -> Result<usize> {
            headers
                .iter()
                .position(|h| SleepColumn::from_header(h) == Some(col))
                .with_context(|| format!("missing required column '{}'", col.label()))
        };

        let occupation = find(SleepColumn::Occupation)?;
        let sleep_duration = find(SleepColumn::SleepDuration)?;
        let stress_level = find(SleepColumn::StressLevel)?;
        let physical_activity = find(SleepColumn::PhysicalActivity)?;
        let age = find(SleepColumn::Age)?;
        let gender = find(SleepColumn::Gender)?;

        let fixed = [
            occupation,
            sleep_duration,
            stress_level,
            physical_activity,
            age,
            gender,
        ];
        let extra = headers
            .iter()
            .enumerate()
            .filter(|(i, _)| !fixed.contains(i))
            .map(|(i, h)| (i, h.clone()))
            .collect();

        Ok(ColumnLayout {
            occupation,
            sleep_duration,
            stress_level,
            physical_activity,
            age,
            gender,
            extra,
        })
    }

    fn fixed(&self) -> [(SleepColumn, usize); 6] {
        [
            (SleepColumn::Occupation, self.occupation),
            (SleepColumn::SleepDuration, self.sleep_duration),
            (SleepColumn::StressLevel, self.stress_level),
            (SleepColumn::PhysicalActivity, self.physical_activity),
            (SleepColumn::Age, self.age),
            (SleepColumn::Gender, self.gender),
        ]
    }

    fn extra_columns(&self) -> Vec<String> {
        self.extra.iter().map(|(_, name)| name.clone()).collect()
    }

    /// Build a record from cells indexed like the header row. Short rows read
    /// as missing trailing cells.
    fn build_record(&self, cells: &[CellValue]) -> SleepRecord {
        let cell = |idx: usize| cells.get(idx);
        SleepRecord {
            occupation: cell(self.occupation).and_then(CellValue::as_text),
            sleep_duration: cell(self.sleep_duration).and_then(CellValue::as_f64),
            stress_level: cell(self.stress_level).and_then(CellValue::as_f64),
            physical_activity: cell(self.physical_activity).and_then(CellValue::as_f64),
            age: cell(self.age).and_then(CellValue::as_i64),
            gender: cell(self.gender).and_then(CellValue::as_text),
            extra: self
                .extra
                .iter()
                .map(|(i, name)| (name.clone(), cell(*i).cloned().unwrap_or(CellValue::Null)))
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path).context("opening CSV")?;
    parse_csv(file)
}

/// CSV layout: header row with column names, then one record per line.
/// Cells are kept as raw text; the fixed columns are coerced per field.
fn parse_csv<R: Read>(input: R) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(input);
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    let layout = ColumnLayout::resolve(&headers)?;

    let mut records = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let row = result.with_context(|| format!("CSV row {}", row_no + 1))?;
        let cells: Vec<CellValue> = row.iter().map(CellValue::from_raw).collect();
        records.push(layout.build_record(&cells));
    }

    Ok(Dataset::new(records, layout.extra_columns()))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

fn load_json(path: &Path) -> Result<Dataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    parse_json(&text)
}

/// Records-oriented JSON (the default `df.to_json(orient='records')`).
/// Columns are collected in order of first appearance across all objects.
fn parse_json(text: &str) -> Result<Dataset> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;
    let rows = root.as_array().context("Expected top-level JSON array")?;

    let mut objects = Vec::with_capacity(rows.len());
    let mut headers: Vec<String> = Vec::new();
    for (i, row) in rows.iter().enumerate() {
        let obj = row
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
        objects.push(obj);
    }
    let layout = ColumnLayout::resolve(&headers)?;

    let records = objects
        .into_iter()
        .map(|obj| {
            let cells: Vec<CellValue> = headers
                .iter()
                .map(|h| obj.get(h).map(json_to_cell).unwrap_or(CellValue::Null))
                .collect();
            layout.build_record(&cells)
        })
        .collect();

    Ok(Dataset::new(records, layout.extra_columns()))
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::from_raw(s),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::Text(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a flat Parquet table, as written by Pandas (`df.to_parquet()`),
/// Polars (`df.write_parquet()`) or the `generate_sample` binary.
fn load_parquet(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;

    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let layout = ColumnLayout::resolve(&headers)?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let columns = batch
            .columns()
            .iter()
            .map(normalize_column)
            .collect::<Result<Vec<_>>>()?;
        for (col, idx) in layout.fixed() {
            let data_type = columns[idx].data_type();
            if !is_cell_type(data_type) {
                bail!(
                    "{} column '{}' has unsupported type {data_type}",
                    col.label(),
                    headers[idx]
                );
            }
        }
        for row in 0..batch.num_rows() {
            let cells: Vec<CellValue> = columns.iter().map(|col| extract_cell(col, row)).collect();
            records.push(layout.build_record(&cells));
        }
    }

    Ok(Dataset::new(records, layout.extra_columns()))
}

/// Types [`extract_cell`] reads natively.
fn is_cell_type(data_type: &DataType) -> bool {
    matches!(
        data_type,
        DataType::Utf8 | DataType::Int64 | DataType::Float64 | DataType::Boolean
    )
}

/// Cast a column to the nearest type [`extract_cell`] reads natively.
/// Dictionary (categorical) columns are unpacked to their values first.
fn normalize_column(col: &ArrayRef) -> Result<ArrayRef> {
    let target = match col.data_type() {
        DataType::Dictionary(_, values) => {
            let unpacked = cast(col, values).context("unpacking dictionary column")?;
            return normalize_column(&unpacked);
        }
        DataType::LargeUtf8 | DataType::Utf8View => DataType::Utf8,
        DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32
        | DataType::UInt64 => DataType::Int64,
        DataType::Float16 | DataType::Float32 => DataType::Float64,
        _ => return Ok(col.clone()),
    };
    cast(col, &target).with_context(|| format!("casting {} column", col.data_type()))
}

/// Extract a single cell from a normalized Arrow column at a given row.
/// Types outside [`is_cell_type`] only occur in extra columns and are kept
/// as their display text.
fn extract_cell(col: &ArrayRef, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    let cell = match col.data_type() {
        DataType::Utf8 => col
            .as_string_opt::<i32>()
            .map(|a| CellValue::from_raw(a.value(row))),
        DataType::Int64 => col
            .as_primitive_opt::<Int64Type>()
            .map(|a| CellValue::Integer(a.value(row))),
        DataType::Float64 => col
            .as_primitive_opt::<Float64Type>()
            .map(|a| CellValue::Float(a.value(row))),
        DataType::Boolean => col.as_boolean_opt().map(|a| CellValue::Bool(a.value(row))),
        _ => array_value_to_string(col, row).ok().map(CellValue::Text),
    };
    cell.unwrap_or(CellValue::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{
        BinaryArray, DictionaryArray, Float32Array, Float64Array, Int16Array, Int64Array,
        StringArray,
    };
    use arrow::datatypes::{Field, Int32Type, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;
    use std::path::PathBuf;
    use std::sync::Arc;

    const SLEEP_CSV: &str = "\
Person ID,Gender,Age,Occupation,Sleep_duration,Stress Level,Physical Activity Level,BMI Category
1,Male,27,Software Engineer,6.1,6,42,Overweight
2,Female,28,Doctor,6.2,8,60,Normal
3,Male,28,O'Brien,,7,,Normal
";

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("sleep-dash-{}-{name}", std::process::id()))
    }

    #[test]
    fn csv_maps_fixed_and_extra_columns() {
        let ds = parse_csv(SLEEP_CSV.as_bytes()).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.extra_columns(), &["Person ID", "BMI Category"]);

        let first = &ds.records()[0];
        assert_eq!(first.occupation.as_deref(), Some("Software Engineer"));
        assert_eq!(first.sleep_duration, Some(6.1));
        assert_eq!(first.stress_level, Some(6.0));
        assert_eq!(first.physical_activity, Some(42.0));
        assert_eq!(first.age, Some(27));
        assert_eq!(first.gender.as_deref(), Some("Male"));
        assert_eq!(
            first.extra.get("BMI Category"),
            Some(&CellValue::Text("Overweight".into()))
        );
    }

    #[test]
    fn csv_blank_cells_are_missing() {
        let ds = parse_csv(SLEEP_CSV.as_bytes()).unwrap();
        let third = &ds.records()[2];
        assert_eq!(third.occupation.as_deref(), Some("O'Brien"));
        assert_eq!(third.sleep_duration, None);
        assert_eq!(third.physical_activity, None);
        assert_eq!(third.stress_level, Some(7.0));
    }

    #[test]
    fn csv_missing_required_column_is_an_error() {
        let err = parse_csv("Occupation,Age\nNurse,30\n".as_bytes()).unwrap_err();
        assert!(format!("{err:#}").contains("missing required column"));
    }

    #[test]
    fn json_records_load() {
        let text = r#"[
            {"Occupation": "Nurse", "Sleep Duration": 7.5, "Stress Level": 4,
             "Physical Activity Level": 30, "Age": 40, "Gender": "Female"},
            {"Occupation": null, "Sleep Duration": "6.0", "Stress Level": 5,
             "Physical Activity Level": 45, "Age": 41.0, "Gender": "Male", "Daily Steps": 8000}
        ]"#;
        let ds = parse_json(text).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.extra_columns(), &["Daily Steps"]);
        assert_eq!(ds.records()[0].sleep_duration, Some(7.5));
        assert_eq!(ds.records()[0].stress_level, Some(4.0));
        assert_eq!(ds.records()[1].occupation, None);
        assert_eq!(ds.records()[1].sleep_duration, Some(6.0));
        assert_eq!(ds.records()[1].age, Some(41));
        assert_eq!(
            ds.records()[0].extra.get("Daily Steps"),
            Some(&CellValue::Null)
        );
    }

    #[test]
    fn json_must_be_an_array() {
        assert!(parse_json(r#"{"Occupation": "Nurse"}"#).is_err());
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = load_dataset(&temp_path("does-not-exist.csv")).unwrap_err();
        assert!(matches!(err, LoadError::NotFound { .. }));
    }

    #[test]
    fn zero_byte_and_header_only_files_are_empty() {
        let blank = temp_path("blank.csv");
        std::fs::write(&blank, "").unwrap();
        assert!(matches!(
            load_dataset(&blank).unwrap_err(),
            LoadError::Empty { .. }
        ));

        let header_only = temp_path("header-only.csv");
        std::fs::write(
            &header_only,
            "Gender,Age,Occupation,Sleep Duration,Stress Level,Physical Activity Level\n",
        )
        .unwrap();
        assert!(matches!(
            load_dataset(&header_only).unwrap_err(),
            LoadError::Empty { .. }
        ));

        let _ = std::fs::remove_file(blank);
        let _ = std::fs::remove_file(header_only);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let path = temp_path("data.xlsx");
        std::fs::write(&path, "not a spreadsheet").unwrap();
        assert!(matches!(
            load_dataset(&path).unwrap_err(),
            LoadError::UnsupportedFormat { extension } if extension == "xlsx"
        ));
        let _ = std::fs::remove_file(path);
    }

    fn write_parquet(name: &str, fields: Vec<Field>, columns: Vec<ArrayRef>) -> PathBuf {
        let schema = Arc::new(Schema::new(fields));
        let batch = RecordBatch::try_new(schema.clone(), columns).unwrap();
        let path = temp_path(name);
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();
        path
    }

    #[test]
    fn parquet_categorical_and_narrow_numeric_columns() {
        let dict = DataType::Dictionary(Box::new(DataType::Int32), Box::new(DataType::Utf8));
        let occupations: DictionaryArray<Int32Type> = vec!["Doctor", "Nurse"].into_iter().collect();
        let genders: DictionaryArray<Int32Type> = vec!["Male", "Female"].into_iter().collect();
        let path = write_parquet(
            "categorical.parquet",
            vec![
                Field::new("Gender", dict.clone(), false),
                Field::new("Age", DataType::Int16, false),
                Field::new("Occupation", dict, false),
                Field::new("Sleep Duration", DataType::Float32, false),
                Field::new("Stress Level", DataType::Int16, false),
                Field::new("Physical Activity Level", DataType::Int16, false),
            ],
            vec![
                Arc::new(genders),
                Arc::new(Int16Array::from(vec![30, 40])),
                Arc::new(occupations),
                Arc::new(Float32Array::from(vec![6.5, 7.25])),
                Arc::new(Int16Array::from(vec![5, 3])),
                Arc::new(Int16Array::from(vec![60, 90])),
            ],
        );

        let ds = load_dataset(&path).unwrap();
        let _ = std::fs::remove_file(path);
        let first = &ds.records()[0];
        assert_eq!(first.occupation.as_deref(), Some("Doctor"));
        assert_eq!(first.gender.as_deref(), Some("Male"));
        assert_eq!(first.age, Some(30));
        assert_eq!(first.sleep_duration, Some(6.5));
        assert_eq!(first.stress_level, Some(5.0));
        let second = &ds.records()[1];
        assert_eq!(second.occupation.as_deref(), Some("Nurse"));
        assert_eq!(second.age, Some(40));
        assert_eq!(second.sleep_duration, Some(7.25));
        assert_eq!(second.physical_activity, Some(90.0));
    }

    #[test]
    fn parquet_unsupported_fixed_column_type_is_unreadable() {
        let path = write_parquet(
            "binary-occupation.parquet",
            vec![
                Field::new("Gender", DataType::Utf8, false),
                Field::new("Age", DataType::Int64, false),
                Field::new("Occupation", DataType::Binary, false),
                Field::new("Sleep Duration", DataType::Float64, false),
                Field::new("Stress Level", DataType::Int64, false),
                Field::new("Physical Activity Level", DataType::Int64, false),
            ],
            vec![
                Arc::new(StringArray::from(vec!["Male"])),
                Arc::new(Int64Array::from(vec![30])),
                Arc::new(BinaryArray::from_iter_values(["Doctor"])),
                Arc::new(Float64Array::from(vec![7.0])),
                Arc::new(Int64Array::from(vec![5])),
                Arc::new(Int64Array::from(vec![60])),
            ],
        );

        let err = load_dataset(&path).unwrap_err();
        let _ = std::fs::remove_file(path);
        assert!(matches!(
            err,
            LoadError::Unreadable { ref reason, .. } if reason.contains("Occupation")
        ));
    }

    #[cfg(unix)]
    #[test]
    fn inaccessible_path_is_unreadable_not_missing() {
        // A path through a regular file fails with NotADirectory, not NotFound.
        let file = temp_path("plain-file");
        std::fs::write(&file, "x").unwrap();
        let err = load_dataset(&file.join("sleep.csv")).unwrap_err();
        let _ = std::fs::remove_file(file);
        assert!(matches!(err, LoadError::Unreadable { .. }));
    }

    #[test]
    fn parquet_round_trip() {
        let path = write_parquet(
            "round-trip.parquet",
            vec![
                Field::new("Gender", DataType::Utf8, false),
                Field::new("Age", DataType::Int64, false),
                Field::new("Occupation", DataType::Utf8, true),
                Field::new("Sleep Duration", DataType::Float64, true),
                Field::new("Stress Level", DataType::Int64, false),
                Field::new("Physical Activity Level", DataType::Int64, false),
            ],
            vec![
                Arc::new(StringArray::from(vec!["Male", "Female"])),
                Arc::new(Int64Array::from(vec![30, 45])),
                Arc::new(StringArray::from(vec![Some("Doctor"), None])),
                Arc::new(Float64Array::from(vec![Some(7.25), None])),
                Arc::new(Int64Array::from(vec![5, 3])),
                Arc::new(Int64Array::from(vec![60, 90])),
            ],
        );

        let ds = load_dataset(&path).unwrap();
        assert_eq!(ds.len(), 2);
        assert!(ds.extra_columns().is_empty());
        assert_eq!(ds.records()[0].sleep_duration, Some(7.25));
        assert_eq!(ds.records()[0].occupation.as_deref(), Some("Doctor"));
        assert_eq!(ds.records()[1].occupation, None);
        assert_eq!(ds.records()[1].sleep_duration, None);
        assert_eq!(ds.records()[1].physical_activity, Some(90.0));
        let _ = std::fs::remove_file(path);
    }
}
