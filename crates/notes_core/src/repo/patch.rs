//! Parameterized `UPDATE` statement builder for partial updates.
//!
//! Column names are `&'static str` supplied by the stores; caller data only
//! ever travels as bound values.

use rusqlite::types::Value;

/// Accumulates `(column, value)` assignments in insertion order.
#[derive(Debug, Clone)]
pub struct UpdateBuilder {
    table: &'static str,
    assignments: Vec<(&'static str, Value)>,
}

impl UpdateBuilder {
    pub fn new(table: &'static str) -> Self {
        Self {
            table,
            assignments: Vec::new(),
        }
    }

    /// Adds `column = ?` when `value` is present.
    pub fn set_if_present<T: Into<Value>>(mut self, column: &'static str, value: Option<T>) -> Self {
        if let Some(value) = value {
            self.assignments.push((column, value.into()));
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    pub fn columns(&self) -> Vec<&'static str> {
        self.assignments.iter().map(|(column, _)| *column).collect()
    }

    /// Renders the statement with `filter` as the `WHERE` clause.
    ///
    /// `filter` uses anonymous `?` placeholders bound to `filter_values`
    /// after the assignment values. Returns `None` when nothing is assigned.
    pub fn build(self, filter: &str, filter_values: Vec<Value>) -> Option<(String, Vec<Value>)> {
        if self.assignments.is_empty() {
            return None;
        }

        let set_clause = self
            .assignments
            .iter()
            .map(|(column, _)| format!("{column} = ?"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!("UPDATE {} SET {set_clause} WHERE {filter};", self.table);

        let mut values: Vec<Value> = self
            .assignments
            .into_iter()
            .map(|(_, value)| value)
            .collect();
        values.extend(filter_values);
        Some((sql, values))
    }
}

#[cfg(test)]
mod tests {
    use super::UpdateBuilder;
    use rusqlite::types::Value;

    #[test]
    fn builds_only_present_columns_in_order() {
        let (sql, values) = UpdateBuilder::new("notes_items")
            .set_if_present("title", Some("renamed".to_string()))
            .set_if_present::<String>("description", None)
            .set_if_present("archived", Some(true))
            .build("id = ?", vec![Value::Integer(9)])
            .unwrap();

        assert_eq!(
            sql,
            "UPDATE notes_items SET title = ?, archived = ? WHERE id = ?;"
        );
        assert_eq!(
            values,
            vec![
                Value::Text("renamed".to_string()),
                Value::Integer(1),
                Value::Integer(9),
            ]
        );
    }

    #[test]
    fn caller_text_never_reaches_sql() {
        let hostile = "x'; DROP TABLE users; --".to_string();
        let (sql, values) = UpdateBuilder::new("notes_lists")
            .set_if_present("title", Some(hostile.clone()))
            .build("id = ?", vec![Value::Integer(1)])
            .unwrap();
        assert!(!sql.contains("DROP"));
        assert_eq!(values[0], Value::Text(hostile));
    }

    #[test]
    fn empty_builder_yields_nothing() {
        let builder = UpdateBuilder::new("notes_lists").set_if_present::<String>("title", None);
        assert!(builder.is_empty());
        assert!(builder.build("id = ?", vec![]).is_none());
    }
}
