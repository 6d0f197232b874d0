//! Driver-independent result rows.

use super::DbError;

/// A result row with named, nullable text columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    columns: Vec<String>,
    values: Vec<Option<String>>,
}

impl Row {
    /// Create an empty row.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column.
    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: Option<&str>) -> Self {
        self.push(column, value.map(String::from));
        self
    }

    /// Build a row from `(column, value)` pairs with no NULLs.
    #[must_use]
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        pairs
            .iter()
            .fold(Self::new(), |row, (column, value)| row.with(*column, Some(*value)))
    }

    /// Append a column in place.
    pub fn push(&mut self, column: impl Into<String>, value: Option<String>) {
        self.columns.push(column.into());
        self.values.push(value);
    }

    /// Number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the row has no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Column names in result order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Look a value up by column name, ignoring ASCII case.
    ///
    /// # Errors
    ///
    /// Returns `DbError::MissingColumn` if no such column exists and
    /// `DbError::NullValue` if the value is NULL.
    pub fn get(&self, column: &str) -> Result<&str, DbError> {
        let index = self
            .columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(column))
            .ok_or_else(|| DbError::MissingColumn(column.to_string()))?;
        self.values[index]
            .as_deref()
            .ok_or_else(|| DbError::NullValue(column.to_string()))
    }

    /// Look a value up by position.
    ///
    /// # Errors
    ///
    /// Returns `DbError::MissingColumn` if the row is shorter than `index`
    /// and `DbError::NullValue` if the value is NULL.
    pub fn get_index(&self, index: usize) -> Result<&str, DbError> {
        let value = self
            .values
            .get(index)
            .ok_or_else(|| DbError::MissingColumn(format!("#{index}")))?;
        value
            .as_deref()
            .ok_or_else(|| DbError::NullValue(self.columns[index].clone()))
    }
}
