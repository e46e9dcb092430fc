//! Declarative search criteria.
//!
//! Each entity turns its search DTO into a [`Criteria`] list. The same list is
//! rendered into a SQL `WHERE` fragment for Postgres and evaluated against the
//! JSON form of a row by the in-memory store, so both backends agree on what
//! a filter means.

use commons_core::types::{DbId, Timestamp};
use serde_json::Value;
use sqlx::{Postgres, QueryBuilder};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A typed value compared against a column.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Id(DbId),
    Text(String),
    Flag(bool),
    Int(i32),
    Time(Timestamp),
}

impl From<DbId> for FilterValue {
    fn from(value: DbId) -> Self {
        FilterValue::Id(value)
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Text(value.to_string())
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        FilterValue::Flag(value)
    }
}

impl From<i32> for FilterValue {
    fn from(value: i32) -> Self {
        FilterValue::Int(value)
    }
}

impl From<Timestamp> for FilterValue {
    fn from(value: Timestamp) -> Self {
        FilterValue::Time(value)
    }
}

/// The test applied to one column.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Exact match.
    Equals(FilterValue),
    /// Case-insensitive substring match on text columns.
    Contains(String),
    /// Inclusive lower time bound.
    AtOrAfter(Timestamp),
    /// Inclusive upper time bound.
    AtOrBefore(Timestamp),
    /// `true`: column is non-null. `false`: column is null.
    Present(bool),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Criterion {
    pub column: &'static str,
    pub condition: Condition,
}

/// Conjunction of criteria. Builder methods skip `None` inputs so search DTO
/// fields can be passed straight through.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Criteria {
    items: Vec<Criterion>,
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

impl Criteria {
    pub fn new() -> Self {
        Self::default()
    }

    fn with(mut self, column: &'static str, condition: Condition) -> Self {
        self.items.push(Criterion { column, condition });
        self
    }

    pub fn eq<V: Into<FilterValue>>(self, column: &'static str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.with(column, Condition::Equals(v.into())),
            None => self,
        }
    }

    /// Substring filter. Blank input is ignored rather than matching everything.
    pub fn contains(self, column: &'static str, value: Option<&str>) -> Self {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            Some(v) => self.with(column, Condition::Contains(v.to_string())),
            None => self,
        }
    }

    pub fn since(self, column: &'static str, bound: Option<Timestamp>) -> Self {
        match bound {
            Some(t) => self.with(column, Condition::AtOrAfter(t)),
            None => self,
        }
    }

    pub fn until(self, column: &'static str, bound: Option<Timestamp>) -> Self {
        match bound {
            Some(t) => self.with(column, Condition::AtOrBefore(t)),
            None => self,
        }
    }

    pub fn present(self, column: &'static str, present: Option<bool>) -> Self {
        match present {
            Some(p) => self.with(column, Condition::Present(p)),
            None => self,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// ---------------------------------------------------------------------------
// In-memory evaluation
// ---------------------------------------------------------------------------

fn as_time(value: &Value) -> Option<Timestamp> {
    value
        .as_str()
        .and_then(|s| chrono::DateTime::parse_from_rfc3339(s).ok())
        .map(|t| t.with_timezone(&chrono::Utc))
}

fn equals(column: &Value, expected: &FilterValue) -> bool {
    match expected {
        FilterValue::Id(id) => column
            .as_str()
            .and_then(|s| DbId::parse_str(s).ok())
            .is_some_and(|v| v == *id),
        FilterValue::Text(text) => column.as_str() == Some(text.as_str()),
        FilterValue::Flag(flag) => column.as_bool() == Some(*flag),
        FilterValue::Int(n) => column.as_i64() == Some(i64::from(*n)),
        FilterValue::Time(t) => as_time(column).is_some_and(|v| v == *t),
    }
}

impl Criterion {
    /// Evaluate against the JSON form of a row. Missing keys count as null.
    pub fn matches(&self, row: &Value) -> bool {
        let column = row.get(self.column).unwrap_or(&Value::Null);
        match &self.condition {
            Condition::Equals(expected) => equals(column, expected),
            Condition::Contains(needle) => column
                .as_str()
                .is_some_and(|s| s.to_lowercase().contains(&needle.to_lowercase())),
            Condition::AtOrAfter(bound) => as_time(column).is_some_and(|t| t >= *bound),
            Condition::AtOrBefore(bound) => as_time(column).is_some_and(|t| t <= *bound),
            Condition::Present(present) => !column.is_null() == *present,
        }
    }
}

impl Criteria {
    pub fn matches(&self, row: &Value) -> bool {
        self.items.iter().all(|c| c.matches(row))
    }
}

// ---------------------------------------------------------------------------
// SQL rendering
// ---------------------------------------------------------------------------

/// Escape `LIKE` metacharacters so user input is matched literally.
pub fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

fn push_value(qb: &mut QueryBuilder<'_, Postgres>, value: &FilterValue) {
    match value {
        FilterValue::Id(v) => qb.push_bind(*v),
        FilterValue::Text(v) => qb.push_bind(v.clone()),
        FilterValue::Flag(v) => qb.push_bind(*v),
        FilterValue::Int(v) => qb.push_bind(*v),
        FilterValue::Time(v) => qb.push_bind(*v),
    };
}

impl Criteria {
    /// Append one `AND ...` clause per criterion. The builder must already be
    /// positioned inside a `WHERE` clause.
    pub fn push_sql(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        for criterion in &self.items {
            qb.push(" AND ").push(criterion.column);
            match &criterion.condition {
                Condition::Equals(value) => {
                    qb.push(" = ");
                    push_value(qb, value);
                }
                Condition::Contains(needle) => {
                    qb.push(" ILIKE ")
                        .push_bind(format!("%{}%", escape_like(needle)));
                }
                Condition::AtOrAfter(bound) => {
                    qb.push(" >= ").push_bind(*bound);
                }
                Condition::AtOrBefore(bound) => {
                    qb.push(" <= ").push_bind(*bound);
                }
                Condition::Present(true) => {
                    qb.push(" IS NOT NULL");
                }
                Condition::Present(false) => {
                    qb.push(" IS NULL");
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
