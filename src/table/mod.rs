use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by table mutations. Reads never error: a missing column,
/// row, or cell is an absence.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TableError {
    #[error("column {column:?} already exists")]
    DuplicateColumn { column: String },

    #[error("column {column:?} does not exist")]
    UnknownColumn { column: String },

    #[error("type mismatch for column {column:?}: expected {expected:?}, got {actual:?}")]
    TypeMismatch {
        column: String,
        expected: ColumnType,
        actual: ColumnType,
    },

    #[error("cannot migrate column {column:?} to {target:?}: row {row:?} holds {actual:?}")]
    IncompatibleMigration {
        column: String,
        target: ColumnType,
        row: String,
        actual: ColumnType,
    },
}

/// Declared type of a table column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColumnType {
    String,
    Integer,
    Long,
    Double,
    Boolean,
    StringList,
}

impl ColumnType {
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            ColumnType::Integer | ColumnType::Long | ColumnType::Double
        )
    }
}

/// A table column. Identity (`id`) is immutable once created; `name` and
/// `ty` change only through the explicit migration methods on the table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    id: String,
    name: Option<String>,
    ty: ColumnType,
}

impl Column {
    pub fn new(id: impl Into<String>, ty: ColumnType) -> Self {
        Self {
            id: id.into(),
            name: None,
            ty,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display name; falls back to the id.
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    pub fn ty(&self) -> ColumnType {
        self.ty
    }
}

/// A stored attribute value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttrValue {
    String(String),
    Integer(i32),
    Long(i64),
    Double(f64),
    Boolean(bool),
    StringList(Vec<String>),
}

impl AttrValue {
    pub fn column_type(&self) -> ColumnType {
        match self {
            AttrValue::String(_) => ColumnType::String,
            AttrValue::Integer(_) => ColumnType::Integer,
            AttrValue::Long(_) => ColumnType::Long,
            AttrValue::Double(_) => ColumnType::Double,
            AttrValue::Boolean(_) => ColumnType::Boolean,
            AttrValue::StringList(_) => ColumnType::StringList,
        }
    }

    /// Numeric view of the value, when it has one.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            AttrValue::Integer(v) => Some(f64::from(*v)),
            AttrValue::Long(v) => Some(*v as f64),
            AttrValue::Double(v) => Some(*v),
            _ => None,
        }
    }

    /// Hashable key used by discrete mappings. `Double` and `StringList`
    /// values have no key and fall through to the mapping default.
    pub fn discrete_key(&self) -> Option<DiscreteKey> {
        match self {
            AttrValue::String(v) => Some(DiscreteKey::Text(v.clone())),
            AttrValue::Integer(v) => Some(DiscreteKey::Int(i64::from(*v))),
            AttrValue::Long(v) => Some(DiscreteKey::Int(*v)),
            AttrValue::Boolean(v) => Some(DiscreteKey::Bool(*v)),
            AttrValue::Double(_) | AttrValue::StringList(_) => None,
        }
    }

    /// Coercion used by column type migration. `None` means the value cannot
    /// represent the target type.
    fn coerce(&self, target: ColumnType) -> Option<AttrValue> {
        if self.column_type() == target {
            return Some(self.clone());
        }
        match (self, target) {
            (AttrValue::Integer(v), ColumnType::Long) => Some(AttrValue::Long(i64::from(*v))),
            (AttrValue::Integer(v), ColumnType::Double) => Some(AttrValue::Double(f64::from(*v))),
            (AttrValue::Long(v), ColumnType::Double) => Some(AttrValue::Double(*v as f64)),
            (AttrValue::Integer(v), ColumnType::String) => Some(AttrValue::String(v.to_string())),
            (AttrValue::Long(v), ColumnType::String) => Some(AttrValue::String(v.to_string())),
            (AttrValue::Double(v), ColumnType::String) => Some(AttrValue::String(v.to_string())),
            (AttrValue::Boolean(v), ColumnType::String) => Some(AttrValue::String(v.to_string())),
            _ => None,
        }
    }
}

impl From<&str> for AttrValue {
    fn from(v: &str) -> Self {
        AttrValue::String(v.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(v: String) -> Self {
        AttrValue::String(v)
    }
}

impl From<i32> for AttrValue {
    fn from(v: i32) -> Self {
        AttrValue::Integer(v)
    }
}

impl From<i64> for AttrValue {
    fn from(v: i64) -> Self {
        AttrValue::Long(v)
    }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        AttrValue::Double(v)
    }
}

impl From<bool> for AttrValue {
    fn from(v: bool) -> Self {
        AttrValue::Boolean(v)
    }
}

/// Key type for discrete mapping lookup.
///
/// Serializes as a plain string so mapping tables stay JSON maps; numeric
/// and boolean keys round-trip through their canonical string form.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum DiscreteKey {
    Text(String),
    Int(i64),
    Bool(bool),
}

impl From<DiscreteKey> for String {
    fn from(key: DiscreteKey) -> Self {
        match key {
            DiscreteKey::Text(s) => s,
            DiscreteKey::Int(i) => i.to_string(),
            DiscreteKey::Bool(b) => b.to_string(),
        }
    }
}

impl From<String> for DiscreteKey {
    fn from(s: String) -> Self {
        if let Ok(i) = s.parse::<i64>() {
            return DiscreteKey::Int(i);
        }
        match s.as_str() {
            "true" => DiscreteKey::Bool(true),
            "false" => DiscreteKey::Bool(false),
            _ => DiscreteKey::Text(s),
        }
    }
}

impl From<&str> for DiscreteKey {
    fn from(v: &str) -> Self {
        DiscreteKey::Text(v.to_string())
    }
}

impl From<i64> for DiscreteKey {
    fn from(v: i64) -> Self {
        DiscreteKey::Int(v)
    }
}

impl From<bool> for DiscreteKey {
    fn from(v: bool) -> Self {
        DiscreteKey::Bool(v)
    }
}

/// Column id → declared type, used for style validation without holding row
/// data.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    columns: BTreeMap<String, ColumnType>,
}

impl TableSchema {
    pub fn column_type(&self, column: &str) -> Option<ColumnType> {
        self.columns.get(column).copied()
    }

    pub fn contains(&self, column: &str) -> bool {
        self.columns.contains_key(column)
    }
}

/// Typed columnar storage of per-element attributes, keyed by element id.
///
/// Every cell write is checked against the column's declared type; the
/// style engine consumes the table read-only.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AttributeTable {
    columns: Vec<Column>,
    rows: HashMap<String, HashMap<String, AttrValue>>,
}

impl AttributeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_column(&mut self, column: Column) -> Result<(), TableError> {
        if self.column(column.id()).is_some() {
            return Err(TableError::DuplicateColumn {
                column: column.id().to_string(),
            });
        }
        self.columns.push(column);
        Ok(())
    }

    pub fn column(&self, id: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == id)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn schema(&self) -> TableSchema {
        TableSchema {
            columns: self.columns.iter().map(|c| (c.id.clone(), c.ty)).collect(),
        }
    }

    /// Writes one cell. The value must match the column's declared type.
    pub fn set(
        &mut self,
        element: impl Into<String>,
        column: &str,
        value: impl Into<AttrValue>,
    ) -> Result<(), TableError> {
        let value = value.into();
        let col = self
            .column(column)
            .ok_or_else(|| TableError::UnknownColumn {
                column: column.to_string(),
            })?;
        if value.column_type() != col.ty {
            return Err(TableError::TypeMismatch {
                column: column.to_string(),
                expected: col.ty,
                actual: value.column_type(),
            });
        }
        self.rows
            .entry(element.into())
            .or_default()
            .insert(column.to_string(), value);
        Ok(())
    }

    /// Reads one cell. Absence of the column, the row, or the cell is `None`.
    pub fn value(&self, element: &str, column: &str) -> Option<&AttrValue> {
        self.rows.get(element)?.get(column)
    }

    /// Removes an element's row entirely.
    pub fn remove_row(&mut self, element: &str) -> bool {
        self.rows.remove(element).is_some()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Renames a column's display name. Identity (`id`) stays fixed.
    pub fn rename_column(&mut self, id: &str, name: impl Into<String>) -> Result<(), TableError> {
        let col = self
            .columns
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| TableError::UnknownColumn {
                column: id.to_string(),
            })?;
        col.name = Some(name.into());
        Ok(())
    }

    /// Migrates a column to a new type, coercing every stored value.
    ///
    /// Checks all rows before touching any of them: an incompatible value
    /// fails the whole migration and leaves column and rows unchanged.
    pub fn migrate_column_type(&mut self, id: &str, target: ColumnType) -> Result<(), TableError> {
        if self.column(id).is_none() {
            return Err(TableError::UnknownColumn {
                column: id.to_string(),
            });
        }

        let mut coerced: Vec<(String, AttrValue)> = Vec::new();
        for (element, row) in &self.rows {
            if let Some(value) = row.get(id) {
                match value.coerce(target) {
                    Some(v) => coerced.push((element.clone(), v)),
                    None => {
                        return Err(TableError::IncompatibleMigration {
                            column: id.to_string(),
                            target,
                            row: element.clone(),
                            actual: value.column_type(),
                        })
                    }
                }
            }
        }

        for (element, value) in coerced {
            if let Some(row) = self.rows.get_mut(&element) {
                row.insert(id.to_string(), value);
            }
        }
        if let Some(col) = self.columns.iter_mut().find(|c| c.id == id) {
            col.ty = target;
        }
        Ok(())
    }
}
