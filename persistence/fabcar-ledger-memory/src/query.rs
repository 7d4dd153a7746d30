//! Selector queries over JSON world state.
//!
//! A query is a JSON object such as
//! `{"selector": {"owner": "Tom", "addedAt": {"$gt": 1000}}, "limit": 10}`.
//! Supported selector syntax:
//! - implicit equality, `{"field": value}`, and nested field objects
//! - dotted field paths, `{"engine.fuel": "petrol"}`
//! - field operators `$eq $ne $gt $gte $lt $lte $in $nin $exists`
//! - combinators `$and $or $not`
//!
//! Top-level `skip` and `limit` page through matches. Other top-level fields
//! (`fields`, `sort`, `use_index`, `bookmark`) are accepted and ignored.
//! Operators other than `$exists` only match documents that contain the
//! field. Ordering comparisons only relate numbers to numbers and strings to
//! strings.

use fabcar_chaincode::ledger::{KeyValue, LedgerError};
use serde::Deserialize;
use serde_json::Value;
use std::cmp::Ordering;

#[derive(Debug, Deserialize)]
struct QueryDocument {
    selector: Value,
    #[serde(default)]
    skip: usize,
    limit: Option<usize>,
}

#[derive(Debug)]
pub(crate) struct Query {
    selector: Selector,
    skip: usize,
    limit: Option<usize>,
}

#[derive(Debug, PartialEq)]
enum Selector {
    And(Vec<Selector>),
    Or(Vec<Selector>),
    Not(Box<Selector>),
    Field {
        path: Vec<String>,
        condition: Condition,
    },
}

#[derive(Debug, PartialEq)]
enum Condition {
    Eq(Value),
    Ne(Value),
    Gt(Value),
    Gte(Value),
    Lt(Value),
    Lte(Value),
    In(Vec<Value>),
    Nin(Vec<Value>),
    Exists(bool),
}

fn invalid(message: impl Into<String>) -> LedgerError {
    LedgerError::InvalidQuery(message.into())
}

impl Query {
    pub(crate) fn parse(query: &str) -> Result<Self, LedgerError> {
        let document: QueryDocument =
            serde_json::from_str(query).map_err(|e| invalid(e.to_string()))?;

        Ok(Self {
            selector: Selector::parse(&document.selector, &[])?,
            skip: document.skip,
            limit: document.limit,
        })
    }

    /// Filter `entries` down to the page of matching documents.
    pub(crate) fn apply(&self, entries: impl Iterator<Item = KeyValue>) -> Vec<KeyValue> {
        entries
            .filter(|entry| self.matches(&entry.value))
            .skip(self.skip)
            .take(self.limit.unwrap_or(usize::MAX))
            .collect()
    }

    /// Whether a stored value matches. Values that are not JSON objects never
    /// match.
    fn matches(&self, value: &[u8]) -> bool {
        match serde_json::from_slice::<Value>(value) {
            Ok(document @ Value::Object(_)) => self.selector.matches(&document),
            _ => false,
        }
    }
}

impl Selector {
    /// Parse a selector object. `prefix` is the field path the object is
    /// nested under, empty at the top level.
    fn parse(selector: &Value, prefix: &[String]) -> Result<Self, LedgerError> {
        let object = selector
            .as_object()
            .ok_or_else(|| invalid(format!("selector must be a JSON object, got {selector}")))?;

        let mut clauses = object
            .iter()
            .map(|(key, value)| Self::parse_clause(key, value, prefix))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(if clauses.len() == 1 {
            clauses.remove(0)
        } else {
            Selector::And(clauses)
        })
    }

    fn parse_clause(key: &str, value: &Value, prefix: &[String]) -> Result<Self, LedgerError> {
        match key {
            "$and" => Ok(Selector::And(Self::parse_list(key, value, prefix)?)),
            "$or" => Ok(Selector::Or(Self::parse_list(key, value, prefix)?)),
            "$not" => Ok(Selector::Not(Box::new(Self::parse(value, prefix)?))),
            operator if operator.starts_with('$') => {
                if prefix.is_empty() {
                    return Err(invalid(format!("operator {operator} must apply to a field")));
                }
                Ok(Selector::Field {
                    path: prefix.to_vec(),
                    condition: Condition::parse(operator, value)?,
                })
            }
            field => {
                let path: Vec<String> = prefix
                    .iter()
                    .cloned()
                    .chain(field.split('.').map(str::to_string))
                    .collect();

                match value {
                    Value::Object(object) if !object.is_empty() => Self::parse(value, &path),
                    _ => Ok(Selector::Field {
                        path,
                        condition: Condition::Eq(value.clone()),
                    }),
                }
            }
        }
    }

    fn parse_list(operator: &str, value: &Value, prefix: &[String]) -> Result<Vec<Self>, LedgerError> {
        value
            .as_array()
            .ok_or_else(|| invalid(format!("{operator} takes an array of selectors")))?
            .iter()
            .map(|selector| Self::parse(selector, prefix))
            .collect()
    }

    fn matches(&self, document: &Value) -> bool {
        match self {
            Selector::And(selectors) => selectors.iter().all(|s| s.matches(document)),
            Selector::Or(selectors) => selectors.iter().any(|s| s.matches(document)),
            Selector::Not(selector) => !selector.matches(document),
            Selector::Field { path, condition } => condition.matches(lookup(document, path)),
        }
    }
}

fn lookup<'a>(document: &'a Value, path: &[String]) -> Option<&'a Value> {
    path.iter()
        .try_fold(document, |value, segment| value.get(segment.as_str()))
}

impl Condition {
    fn parse(operator: &str, value: &Value) -> Result<Self, LedgerError> {
        let list = |value: &Value| -> Result<Vec<Value>, LedgerError> {
            value
                .as_array()
                .cloned()
                .ok_or_else(|| invalid(format!("{operator} takes an array")))
        };

        Ok(match operator {
            "$eq" => Condition::Eq(value.clone()),
            "$ne" => Condition::Ne(value.clone()),
            "$gt" => Condition::Gt(value.clone()),
            "$gte" => Condition::Gte(value.clone()),
            "$lt" => Condition::Lt(value.clone()),
            "$lte" => Condition::Lte(value.clone()),
            "$in" => Condition::In(list(value)?),
            "$nin" => Condition::Nin(list(value)?),
            "$exists" => Condition::Exists(
                value
                    .as_bool()
                    .ok_or_else(|| invalid("$exists takes a boolean"))?,
            ),
            other => return Err(invalid(format!("unsupported operator {other}"))),
        })
    }

    fn matches(&self, field: Option<&Value>) -> bool {
        let field = match (self, field) {
            (Condition::Exists(expected), field) => return field.is_some() == *expected,
            (_, None) => return false,
            (_, Some(field)) => field,
        };

        match self {
            Condition::Eq(expected) => field == expected,
            Condition::Ne(expected) => field != expected,
            Condition::Gt(bound) => compare(field, bound) == Some(Ordering::Greater),
            Condition::Gte(bound) => matches!(
                compare(field, bound),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            Condition::Lt(bound) => compare(field, bound) == Some(Ordering::Less),
            Condition::Lte(bound) => {
                matches!(compare(field, bound), Some(Ordering::Less | Ordering::Equal))
            }
            Condition::In(values) => values.contains(field),
            Condition::Nin(values) => !values.contains(field),
            Condition::Exists(_) => true,
        }
    }
}

fn compare(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Number(left), Value::Number(right)) => left.as_f64()?.partial_cmp(&right.as_f64()?),
        (Value::String(left), Value::String(right)) => Some(left.cmp(right)),
        _ => None,
    }
}
