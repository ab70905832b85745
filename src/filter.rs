//! Query filter expressions handed to the persistence layer
//!
//! The engine only relies on equality, set membership, AND, OR and a
//! guaranteed-empty predicate. `matches` is the reference evaluation over
//! JSON records: a field matches a value if it equals it or, when the field
//! is an array, contains it. Missing fields never match.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Filter {
    /// No constraint
    #[default]
    Always,
    /// Matches zero records
    Never,
    Eq { field: String, value: String },
    In { field: String, values: BTreeSet<String> },
    And { all: Vec<Filter> },
    Or { any: Vec<Filter> },
}

impl Filter {
    pub fn equals(field: impl Into<String>, value: impl Into<String>) -> Filter {
        Filter::Eq { field: field.into(), value: value.into() }
    }

    /// Membership test; an empty set is `Never`
    pub fn is_in<I, S>(field: impl Into<String>, values: I) -> Filter
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: BTreeSet<String> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            Filter::Never
        } else {
            Filter::In { field: field.into(), values }
        }
    }

    /// Conjunction. `Always` operands drop out, any `Never` wins.
    pub fn and(self, other: Filter) -> Filter {
        match (self, other) {
            (Filter::Never, _) | (_, Filter::Never) => Filter::Never,
            (Filter::Always, f) | (f, Filter::Always) => f,
            (Filter::And { mut all }, Filter::And { all: rest }) => {
                all.extend(rest);
                Filter::And { all }
            }
            (Filter::And { mut all }, f) | (f, Filter::And { mut all }) => {
                all.push(f);
                Filter::And { all }
            }
            (a, b) => Filter::And { all: vec![a, b] },
        }
    }

    /// Disjunction of `parts`. No parts is `Never`; `Never` parts drop out.
    pub fn any(parts: impl IntoIterator<Item = Filter>) -> Filter {
        let mut any = Vec::new();
        for p in parts {
            match p {
                Filter::Never => {}
                Filter::Always => return Filter::Always,
                p => any.push(p),
            }
        }
        match any.len() {
            0 => Filter::Never,
            1 => any.remove(0),
            _ => Filter::Or { any },
        }
    }

    pub fn is_never(&self) -> bool {
        matches!(self, Filter::Never)
    }

    /// Evaluate against a JSON object record
    pub fn matches(&self, record: &Value) -> bool {
        match self {
            Filter::Always => true,
            Filter::Never => false,
            Filter::Eq { field, value } => field_has(record, field, |v| v == value.as_str()),
            Filter::In { field, values } => field_has(record, field, |v| values.contains(v)),
            Filter::And { all } => all.iter().all(|f| f.matches(record)),
            Filter::Or { any } => any.iter().any(|f| f.matches(record)),
        }
    }
}

fn field_has(record: &Value, field: &str, pred: impl Fn(&str) -> bool) -> bool {
    match record.get(field) {
        Some(Value::Array(items)) => items.iter().any(|i| scalar(i).is_some_and(|s| pred(&s))),
        Some(v) => scalar(v).is_some_and(|s| pred(&s)),
        None => false,
    }
}

fn scalar(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
