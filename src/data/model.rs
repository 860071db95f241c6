use std::collections::BTreeMap;
use std::fmt;

// ---------------------------------------------------------------------------
// CellValue – a single cell outside the fixed sleep schema
// ---------------------------------------------------------------------------

/// A dynamically-typed cell, as read from CSV text, JSON or an Arrow column.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            // Blank so exported CSV round-trips missing cells as empty fields.
            CellValue::Null => Ok(()),
        }
    }
}

impl CellValue {
    /// Raw CSV field: empty means missing, anything else is kept verbatim.
    pub fn from_raw(s: &str) -> Self {
        if s.is_empty() {
            CellValue::Null
        } else {
            CellValue::Text(s.to_string())
        }
    }

    /// Interpret the cell as text. Text is returned byte-for-byte.
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Text(s) if s.is_empty() => None,
            CellValue::Null => None,
            other => Some(other.to_string()),
        }
    }

    /// Interpret the cell as a finite number; NaN and unparseable text are missing.
    pub fn as_f64(&self) -> Option<f64> {
        let v = match self {
            CellValue::Float(v) => *v,
            CellValue::Integer(i) => *i as f64,
            CellValue::Text(s) => s.trim().parse::<f64>().ok()?,
            CellValue::Bool(_) | CellValue::Null => return None,
        };
        v.is_finite().then_some(v)
    }

    /// Interpret the cell as a whole number. `30.0` is accepted, `30.5` is not.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            CellValue::Integer(i) => Some(*i),
            CellValue::Text(s) => match s.trim().parse::<i64>() {
                Ok(i) => Some(i),
                Err(_) => CellValue::Float(s.trim().parse::<f64>().ok()?).as_i64(),
            },
            CellValue::Float(v) if v.is_finite() && v.fract() == 0.0 => Some(*v as i64),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// SleepColumn – the fixed part of the schema
// ---------------------------------------------------------------------------

/// The six columns every sleep dataset must provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SleepColumn {
    Gender,
    Age,
    Occupation,
    SleepDuration,
    PhysicalActivity,
    StressLevel,
}

impl SleepColumn {
    /// Display / export order.
    pub const ALL: [SleepColumn; 6] = [
        SleepColumn::Gender,
        SleepColumn::Age,
        SleepColumn::Occupation,
        SleepColumn::SleepDuration,
        SleepColumn::PhysicalActivity,
        SleepColumn::StressLevel,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SleepColumn::Gender => "Gender",
            SleepColumn::Age => "Age",
            SleepColumn::Occupation => "Occupation",
            SleepColumn::SleepDuration => "Sleep Duration",
            SleepColumn::PhysicalActivity => "Physical Activity Level",
            SleepColumn::StressLevel => "Stress Level",
        }
    }

    /// Match a source header, ignoring case, spaces, underscores and punctuation.
    ///
    /// `Sleep_duration`, `Sleep Duration` and `sleep-duration` all resolve to
    /// [`SleepColumn::SleepDuration`].
    pub fn from_header(header: &str) -> Option<Self> {
        let key: String = header
            .chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(char::to_lowercase)
            .collect();
        match key.as_str() {
            "gender" => Some(SleepColumn::Gender),
            "age" => Some(SleepColumn::Age),
            "occupation" => Some(SleepColumn::Occupation),
            "sleepduration" => Some(SleepColumn::SleepDuration),
            "physicalactivitylevel" | "physicalactivity" => Some(SleepColumn::PhysicalActivity),
            "stresslevel" => Some(SleepColumn::StressLevel),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// SleepRecord – one row of the dataset
// ---------------------------------------------------------------------------

/// One respondent. Any fixed field may be missing in the source.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SleepRecord {
    pub occupation: Option<String>,
    /// Hours per night.
    pub sleep_duration: Option<f64>,
    pub stress_level: Option<f64>,
    pub physical_activity: Option<f64>,
    pub age: Option<i64>,
    pub gender: Option<String>,
    /// Columns outside the fixed schema: column_name → value.
    pub extra: BTreeMap<String, CellValue>,
}

impl SleepRecord {
    /// Text for one fixed column; missing values render as an empty string.
    pub fn fixed_cell(&self, column: SleepColumn) -> String {
        fn num(v: Option<f64>) -> String {
            v.map(|v| v.to_string()).unwrap_or_default()
        }
        match column {
            SleepColumn::Gender => self.gender.clone().unwrap_or_default(),
            SleepColumn::Age => self.age.map(|a| a.to_string()).unwrap_or_default(),
            SleepColumn::Occupation => self.occupation.clone().unwrap_or_default(),
            SleepColumn::SleepDuration => num(self.sleep_duration),
            SleepColumn::PhysicalActivity => num(self.physical_activity),
            SleepColumn::StressLevel => num(self.stress_level),
        }
    }

    /// All cells of this row in [`Dataset::column_headers`] order.
    pub fn display_cells(&self, extra_columns: &[String]) -> Vec<String> {
        SleepColumn::ALL
            .iter()
            .map(|&col| self.fixed_cell(col))
            .chain(extra_columns.iter().map(|name| {
                self.extra
                    .get(name)
                    .map(|v| v.to_string())
                    .unwrap_or_default()
            }))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Dataset – the loaded table
// ---------------------------------------------------------------------------

/// An immutable, ordered table of sleep records sharing one schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    records: Vec<SleepRecord>,
    /// Names of non-fixed columns, in source order.
    extra_columns: Vec<String>,
}

impl Dataset {
    pub fn new(records: Vec<SleepRecord>, extra_columns: Vec<String>) -> Self {
        Dataset {
            records,
            extra_columns,
        }
    }

    pub fn records(&self) -> &[SleepRecord] {
        &self.records
    }

    pub fn extra_columns(&self) -> &[String] {
        &self.extra_columns
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SleepRecord> {
        self.records.iter()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// New dataset with the rows at `indices`, in that order, same schema.
    pub fn select(&self, indices: &[usize]) -> Dataset {
        Dataset {
            records: indices
                .iter()
                .filter_map(|&i| self.records.get(i).cloned())
                .collect(),
            extra_columns: self.extra_columns.clone(),
        }
    }

    /// Header row: fixed columns first, then the extra columns.
    pub fn column_headers(&self) -> Vec<String> {
        SleepColumn::ALL
            .iter()
            .map(|c| c.label().to_string())
            .chain(self.extra_columns.iter().cloned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_aliases_resolve_to_fixed_columns() {
        assert_eq!(
            SleepColumn::from_header("Sleep_duration"),
            Some(SleepColumn::SleepDuration)
        );
        assert_eq!(
            SleepColumn::from_header("Sleep Duration"),
            Some(SleepColumn::SleepDuration)
        );
        assert_eq!(
            SleepColumn::from_header("Physical Activity Level"),
            Some(SleepColumn::PhysicalActivity)
        );
        assert_eq!(SleepColumn::from_header(" AGE "), Some(SleepColumn::Age));
        assert_eq!(SleepColumn::from_header("BMI Category"), None);
    }

    #[test]
    fn cell_numeric_coercion() {
        assert_eq!(CellValue::from_raw(" 7.5 ").as_f64(), Some(7.5));
        assert_eq!(CellValue::from_raw("").as_f64(), None);
        assert_eq!(CellValue::from_raw("n/a").as_f64(), None);
        assert_eq!(CellValue::Float(f64::NAN).as_f64(), None);
        assert_eq!(CellValue::from_raw("30.0").as_i64(), Some(30));
        assert_eq!(CellValue::from_raw("30.5").as_i64(), None);
        assert_eq!(CellValue::Integer(41).as_f64(), Some(41.0));
    }

    #[test]
    fn cell_text_is_kept_verbatim() {
        assert_eq!(
            CellValue::from_raw(" O'Brien ").as_text().as_deref(),
            Some(" O'Brien ")
        );
        assert_eq!(CellValue::Null.as_text(), None);
        assert_eq!(CellValue::Integer(7).as_text().as_deref(), Some("7"));
    }

    #[test]
    fn select_keeps_order_and_schema() {
        let rows: Vec<SleepRecord> = (0..4)
            .map(|i| SleepRecord {
                age: Some(i),
                ..Default::default()
            })
            .collect();
        let ds = Dataset::new(rows, vec!["BMI Category".into()]);
        let picked = ds.select(&[3, 1]);
        let ages: Vec<_> = picked.iter().map(|r| r.age).collect();
        assert_eq!(ages, vec![Some(3), Some(1)]);
        assert_eq!(picked.extra_columns(), ds.extra_columns());
    }

    #[test]
    fn display_cells_follow_header_order() {
        let mut extra = BTreeMap::new();
        extra.insert("BMI Category".to_string(), CellValue::Text("Normal".into()));
        let rec = SleepRecord {
            occupation: Some("Nurse".into()),
            sleep_duration: Some(7.2),
            age: Some(40),
            gender: Some("Female".into()),
            extra,
            ..Default::default()
        };
        let ds = Dataset::new(vec![rec.clone()], vec!["BMI Category".into()]);
        assert_eq!(ds.column_headers().len(), 7);
        assert_eq!(
            rec.display_cells(ds.extra_columns()),
            vec!["Female", "40", "Nurse", "7.2", "", "", "Normal"]
        );
    }
}
