//! Small SQL builder: fixed statement text plus a bound-parameter list.
//!
//! Only identifiers known at compile time (table and column names) are spliced into
//! the text. Every value travels as a bound parameter.

use rusqlite::types::Value;

use crate::models::TimeBounds;

/// `SELECT` with optional `measured_at`-style bounds, ordering and pagination
#[derive(Debug, Clone)]
pub struct SelectQuery {
    table: &'static str,
    columns: String,
    conditions: Vec<String>,
    params: Vec<Value>,
    order_by: Option<&'static str>,
    limit: Option<u32>,
    offset: Option<u32>,
}

impl SelectQuery {
    pub fn new(table: &'static str, columns: impl Into<String>) -> Self {
        Self {
            table,
            columns: columns.into(),
            conditions: Vec::new(),
            params: Vec::new(),
            order_by: None,
            limit: None,
            offset: None,
        }
    }

    /// Add a condition with exactly one `?` placeholder
    pub fn filter(mut self, condition: &str, value: impl Into<Value>) -> Self {
        self.conditions.push(condition.to_string());
        self.params.push(value.into());
        self
    }

    /// Add a condition that binds nothing
    pub fn filter_raw(mut self, condition: &str) -> Self {
        self.conditions.push(condition.to_string());
        self
    }

    /// Inclusive bounds on `column`; absent ends add no condition
    pub fn within(mut self, column: &'static str, bounds: &TimeBounds) -> Self {
        if let Some(start) = &bounds.start {
            self = self.filter(&format!("{column} >= ?"), start.clone());
        }
        if let Some(end) = &bounds.end {
            self = self.filter(&format!("{column} <= ?"), end.clone());
        }
        self
    }

    pub fn order_by(mut self, clause: &'static str) -> Self {
        self.order_by = Some(clause);
        self
    }

    pub fn limit(mut self, limit: Option<u32>) -> Self {
        self.limit = limit;
        self
    }

    /// A zero offset is dropped from the statement
    pub fn offset(mut self, offset: Option<u32>) -> Self {
        self.offset = offset.filter(|o| *o > 0);
        self
    }

    pub fn build(self) -> (String, Vec<Value>) {
        let mut sql = format!("SELECT {} FROM {}", self.columns, self.table);
        let mut params = self.params;

        if !self.conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.conditions.join(" AND "));
        }
        if let Some(order) = self.order_by {
            sql.push_str(" ORDER BY ");
            sql.push_str(order);
        }
        match (self.limit, self.offset) {
            (Some(limit), offset) => {
                sql.push_str(" LIMIT ?");
                params.push(Value::Integer(i64::from(limit)));
                if let Some(offset) = offset {
                    sql.push_str(" OFFSET ?");
                    params.push(Value::Integer(i64::from(offset)));
                }
            }
            // SQLite only accepts OFFSET after LIMIT; -1 means unbounded
            (None, Some(offset)) => {
                sql.push_str(" LIMIT -1 OFFSET ?");
                params.push(Value::Integer(i64::from(offset)));
            }
            (None, None) => {}
        }

        (sql, params)
    }
}

/// `UPDATE ... SET` touching only the columns that were supplied
#[derive(Debug, Clone)]
pub struct UpdateQuery {
    table: &'static str,
    assignments: Vec<&'static str>,
    params: Vec<Value>,
}

impl UpdateQuery {
    pub fn new(table: &'static str) -> Self {
        Self {
            table,
            assignments: Vec::new(),
            params: Vec::new(),
        }
    }

    pub fn set(mut self, column: &'static str, value: impl Into<Value>) -> Self {
        self.assignments.push(column);
        self.params.push(value.into());
        self
    }

    /// Assign only when a value was supplied
    pub fn set_if<T: Into<Value>>(self, column: &'static str, value: Option<T>) -> Self {
        match value {
            Some(value) => self.set(column, value),
            None => self,
        }
    }

    /// Assign a nullable column: outer `None` skips it, inner `None` writes NULL
    pub fn set_nullable<T: Into<Value>>(self, column: &'static str, value: Option<Option<T>>) -> Self {
        match value {
            Some(Some(value)) => self.set(column, value),
            Some(None) => self.set(column, Value::Null),
            None => self,
        }
    }

    /// Finish with `WHERE id = ?`
    pub fn build_for_id(self, id: i64) -> (String, Vec<Value>) {
        let assignments = self
            .assignments
            .iter()
            .map(|column| format!("{column} = ?"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!("UPDATE {} SET {} WHERE id = ?", self.table, assignments);
        let mut params = self.params;
        params.push(Value::Integer(id));
        (sql, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_without_options_has_no_clauses() {
        let (sql, params) = SelectQuery::new("bp_records", "*").build();
        assert_eq!(sql, "SELECT * FROM bp_records");
        assert!(params.is_empty());
    }

    #[test]
    fn test_select_with_bounds_and_pagination() {
        let bounds = TimeBounds::between("2024-03-03T00:00:00.000Z", "2024-03-10T23:59:59.999Z");
        let (sql, params) = SelectQuery::new("bp_records", "id")
            .within("measured_at", &bounds)
            .order_by("measured_at DESC")
            .limit(Some(10))
            .offset(Some(20))
            .build();

        assert_eq!(
            sql,
            "SELECT id FROM bp_records WHERE measured_at >= ? AND measured_at <= ? ORDER BY measured_at DESC LIMIT ? OFFSET ?"
        );
        assert_eq!(
            params,
            vec![
                Value::Text("2024-03-03T00:00:00.000Z".to_string()),
                Value::Text("2024-03-10T23:59:59.999Z".to_string()),
                Value::Integer(10),
                Value::Integer(20),
            ]
        );
    }

    #[test]
    fn test_zero_offset_is_omitted() {
        let (sql, params) = SelectQuery::new("bp_records", "id")
            .limit(Some(5))
            .offset(Some(0))
            .build();
        assert_eq!(sql, "SELECT id FROM bp_records LIMIT ?");
        assert_eq!(params, vec![Value::Integer(5)]);
    }

    #[test]
    fn test_offset_without_limit_uses_unbounded_limit() {
        let (sql, _) = SelectQuery::new("bp_records", "id").offset(Some(3)).build();
        assert_eq!(sql, "SELECT id FROM bp_records LIMIT -1 OFFSET ?");
    }

    #[test]
    fn test_update_only_sets_supplied_columns() {
        let (sql, params) = UpdateQuery::new("bp_records")
            .set_if("systolic", None::<i32>)
            .set_nullable("note", Some(Some("after coffee".to_string())))
            .set_nullable("image_path", Some(None::<String>))
            .set("updated_at", "2024-03-10T09:00:00.000Z".to_string())
            .build_for_id(7);

        assert_eq!(sql, "UPDATE bp_records SET note = ?, image_path = ?, updated_at = ? WHERE id = ?");
        assert_eq!(params.len(), 4);
        assert_eq!(params[1], Value::Null);
        assert_eq!(params[3], Value::Integer(7));
    }
}
