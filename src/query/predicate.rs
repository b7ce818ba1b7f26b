//! Predicate builder
//!
//! Each active filter becomes `upper(<column>) like '%<VALUE>%'`, where VALUE is the
//! user value with single quotes doubled and then uppercased. Conditions are joined
//! with ` AND `.

use std::fmt;

use crate::query::filter::{FilterCriteria, FilterField};

const CONJUNCTION: &str = " AND ";

/// Server-side filter expression. Empty when no filter is active.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Predicate(String);

impl Predicate {
    pub fn build(criteria: &FilterCriteria) -> Self {
        let conditions: Vec<String> = criteria
            .active()
            .map(|(field, value)| condition(field, value))
            .collect();

        Predicate(conditions.join(CONJUNCTION))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[allow(dead_code)]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The predicate as a request parameter; `None` means the parameter is omitted.
    pub fn as_param(&self) -> Option<&str> {
        (!self.is_empty()).then_some(self.0.as_str())
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn condition(field: FilterField, value: &str) -> String {
    format!(
        "upper({}) like '%{}%'",
        field.column(),
        escape_quotes(value).to_uppercase()
    )
}

/// Double every single quote so the value stays inside its string literal.
pub fn escape_quotes(value: &str) -> String {
    value.replace('\'', "''")
}
