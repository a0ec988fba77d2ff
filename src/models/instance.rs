//! Source instances (rows)

use super::feature::{FeatureType, SourceFeature};
use crate::decode::Record;
use crate::error::{Error, Result};
use crate::types::{JsonObject, JsonValue, StringMap};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Rows of a source, one value per feature column
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawInstances")]
pub struct InstanceTable {
    features: Vec<String>,
    #[serde(rename = "instances")]
    rows: Vec<Vec<JsonValue>>,
}

impl Record for InstanceTable {
    const KIND: &'static str = "instances";
}

/// Wire shape of `source/{id}/instances`
#[derive(Deserialize)]
struct RawInstances {
    features: Vec<FeatureName>,
    #[serde(default)]
    instances: Vec<Vec<JsonValue>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FeatureName {
    Name(String),
    Described { name: String },
}

impl TryFrom<RawInstances> for InstanceTable {
    type Error = String;

    fn try_from(raw: RawInstances) -> std::result::Result<Self, Self::Error> {
        let features = raw
            .features
            .into_iter()
            .map(|f| match f {
                FeatureName::Name(name) | FeatureName::Described { name } => name,
            })
            .collect();

        InstanceTable::try_new(features, raw.instances).map_err(|e| e.to_string())
    }
}

impl InstanceTable {
    /// An empty table with the given columns
    pub fn new(features: Vec<String>) -> Self {
        Self {
            features,
            rows: Vec::new(),
        }
    }

    /// A table with rows; every row must match the column count
    pub fn try_new(features: Vec<String>, rows: Vec<Vec<JsonValue>>) -> Result<Self> {
        let mut table = Self::new(features);
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    /// Append a row
    pub fn push_row(&mut self, row: Vec<JsonValue>) -> Result<()> {
        if row.len() != self.features.len() {
            return Err(Error::validation(
                "INSTANCE_WIDTH",
                format!(
                    "row {} has {} values but the table has {} features",
                    self.rows.len(),
                    row.len(),
                    self.features.len()
                ),
            ));
        }
        self.rows.push(row);
        Ok(())
    }

    /// Column names
    pub fn features(&self) -> &[String] {
        &self.features
    }

    /// Rows in order
    pub fn rows(&self) -> &[Vec<JsonValue>] {
        &self.rows
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values of one column
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &JsonValue>> {
        let index = self.features.iter().position(|f| f == name)?;
        Some(self.rows.iter().map(move |row| &row[index]))
    }

    /// Rows as `feature -> value` objects
    pub fn records(&self) -> Vec<JsonObject> {
        self.rows
            .iter()
            .map(|row| {
                self.features
                    .iter()
                    .cloned()
                    .zip(row.iter().cloned())
                    .collect()
            })
            .collect()
    }

    /// Feature definitions inferred from the column values.
    ///
    /// `date_formats` maps column names to a date format; it is only applied
    /// to columns inferred as dates.
    pub fn infer_features(&self, date_formats: &StringMap) -> Vec<SourceFeature> {
        self.features
            .iter()
            .enumerate()
            .map(|(index, name)| {
                let feature_type = FeatureType::infer(self.rows.iter().map(|row| &row[index]));
                let feature = SourceFeature::new(index as u64, name.clone(), feature_type);
                match date_formats.get(name) {
                    Some(format) if feature_type == FeatureType::Date => {
                        feature.with_date_format(format.clone())
                    }
                    _ => feature,
                }
            })
            .collect()
    }

    /// Render as CSV with a header row.
    ///
    /// Nulls become empty cells; nested values are written as JSON.
    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        write_csv_line(&mut out, self.features.iter().map(|f| csv_field(f)));
        for row in &self.rows {
            write_csv_line(&mut out, row.iter().map(csv_value));
        }
        out
    }
}

fn write_csv_line(out: &mut String, fields: impl Iterator<Item = String>) {
    let line: Vec<String> = fields.collect();
    out.push_str(&line.join(","));
    out.push('\n');
}

fn csv_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => csv_field(s),
        Value::Bool(_) | Value::Number(_) => value.to_string(),
        Value::Array(_) | Value::Object(_) => csv_field(&value.to_string()),
    }
}

/// Quote a field if it contains a delimiter, quote or line break
fn csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Filters for reading instances
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstanceQuery {
    /// Filter expression, in the platform's query syntax
    pub where_clause: Option<String>,
    /// Columns to return
    pub select: Vec<String>,
    /// Maximum number of rows
    pub limit: Option<u64>,
    /// Rows to skip
    pub offset: Option<u64>,
}

impl InstanceQuery {
    /// Read every instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the filter expression
    #[must_use]
    pub fn filter(mut self, expression: impl Into<String>) -> Self {
        self.where_clause = Some(expression.into());
        self
    }

    /// Restrict the returned columns
    #[must_use]
    pub fn select(mut self, features: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.select = features.into_iter().map(Into::into).collect();
        self
    }

    /// Set the row limit
    #[must_use]
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set the row offset
    #[must_use]
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Query string parameters
    pub fn to_query(&self) -> StringMap {
        let mut query = StringMap::new();
        if let Some(ref clause) = self.where_clause {
            query.insert("where".to_string(), clause.clone());
        }
        if !self.select.is_empty() {
            query.insert("select".to_string(), self.select.join(","));
        }
        if let Some(limit) = self.limit {
            query.insert("limit".to_string(), limit.to_string());
        }
        if let Some(offset) = self.offset {
            query.insert("offset".to_string(), offset.to_string());
        }
        query
    }
}

/// Options for uploading instances
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateInstances {
    /// Replace existing rows instead of appending
    pub replace: bool,
    /// Primary key column, to update matching rows in place
    pub pk: Option<String>,
    /// Date format of date columns in the uploaded data
    pub date_format: Option<String>,
}

impl UpdateInstances {
    /// Append rows
    pub fn append() -> Self {
        Self::default()
    }

    /// Replace all rows
    pub fn replace() -> Self {
        Self {
            replace: true,
            ..Self::default()
        }
    }

    /// Set the primary key column
    #[must_use]
    pub fn with_pk(mut self, pk: impl Into<String>) -> Self {
        self.pk = Some(pk.into());
        self
    }

    /// Set the date format
    #[must_use]
    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = Some(format.into());
        self
    }

    /// Request body carrying the table as CSV
    pub fn to_body(&self, table: &InstanceTable) -> JsonValue {
        let mut body = json!({
            "replace": self.replace,
            "data": table.to_csv(),
        });
        if let Some(ref pk) = self.pk {
            body["pk"] = json!(pk);
        }
        if let Some(ref format) = self.date_format {
            body["date_format"] = json!(format);
        }
        body
    }
}
