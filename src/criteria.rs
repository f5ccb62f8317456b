//! User filter criteria.
//!
//! A [`CriterionInput`] is the wire shape sent by a client; [`CriterionInput::parse`]
//! turns it into a typed [`Criterion`]. Column membership is checked later,
//! against the registry, when a statement is built.

use std::fmt;

use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::error::{Result, SearchError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Operator {
    #[default]
    Equals,
    Contains,
    NotEquals,
}

impl Operator {
    /// Recognize an operator token, `None` when the token is unknown.
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_lowercase().as_str() {
            "equals" | "equal" | "=" => Some(Operator::Equals),
            "contains" | "like" => Some(Operator::Contains),
            "does not equal" | "not equals" | "not equal" | "!=" | "<>" => Some(Operator::NotEquals),
            _ => None,
        }
    }

    /// Predicate text for an already quoted column and a placeholder.
    pub fn render(&self, column: &str, placeholder: &str) -> String {
        match self {
            Operator::Equals => format!("{} = {}", column, placeholder),
            Operator::NotEquals => format!("{} <> {}", column, placeholder),
            Operator::Contains => format!("{} LIKE {} ESCAPE '!'", column, placeholder),
        }
    }

    /// The value actually bound for `value`.
    pub fn bind(&self, value: &str) -> String {
        match self {
            Operator::Contains => {
                let mut pattern = String::with_capacity(value.len() + 2);
                pattern.push('%');
                for c in value.chars() {
                    if matches!(c, '!' | '%' | '_') {
                        pattern.push('!');
                    }
                    pattern.push(c);
                }
                pattern.push('%');
                pattern
            }
            _ => value.to_string(),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = match self {
            Operator::Equals => "equals",
            Operator::Contains => "contains",
            Operator::NotEquals => "does not equal",
        };
        write!(f, "{}", token)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Conjunction {
    #[default]
    And,
    Or,
}

impl Conjunction {
    pub fn from_token(token: &str) -> Result<Self> {
        match token.trim().to_uppercase().as_str() {
            "AND" => Ok(Conjunction::And),
            "OR" => Ok(Conjunction::Or),
            _ => Err(SearchError::Validation(format!("Invalid conjunction ({})", token))),
        }
    }
}

impl fmt::Display for Conjunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Conjunction::And => write!(f, "AND"),
            Conjunction::Or => write!(f, "OR"),
        }
    }
}

/// A single filter unit. The conjunction says how this criterion joins the
/// predicate accumulated from the criteria before it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Criterion {
    column: String,
    operator: Operator,
    value: String,
    conjunction: Option<Conjunction>,
}

impl Criterion {
    pub fn new(
        column: impl Into<String>,
        operator: Operator,
        value: impl Into<String>,
        conjunction: Option<Conjunction>,
    ) -> Self {
        Self { column: column.into(), operator, value: value.into(), conjunction }
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn conjunction(&self) -> Option<Conjunction> {
        self.conjunction
    }
}

/// Criterion as sent by a client. Every field may be missing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CriterionInput {
    #[serde(default)]
    pub column: Option<String>,
    #[serde(default)]
    pub operator: Option<String>,
    /// Numbers and booleans are accepted and compared as their text.
    #[serde(default, deserialize_with = "scalar_text")]
    pub value: Option<String>,
    #[serde(default)]
    pub conjunction: Option<String>,
}

fn scalar_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(de::Error::custom(format!("criterion value must be a scalar, got {}", other))),
    }
}

/// Outcome of parsing one input: the criterion and, when an operator token
/// was not recognized, a note describing the fallback.
#[derive(Debug)]
pub struct Parsed {
    pub criterion: Criterion,
    pub note: Option<String>,
}

impl CriterionInput {
    /// `first` marks the first non-removed slot, whose conjunction is ignored.
    pub fn parse(&self, first: bool, strict: bool) -> Result<Parsed> {
        let column = match self.column.as_deref() {
            Some(c) if !c.is_empty() => c,
            _ => return Err(SearchError::Validation("A criterion is missing its 'column'".into())),
        };
        let mut note = None;
        let operator = match self.operator.as_deref() {
            None => Operator::Equals,
            Some(token) => match Operator::from_token(token) {
                Some(op) => op,
                None if strict => {
                    return Err(SearchError::Validation(format!("Unrecognized operator ({})", token)));
                }
                None => {
                    warn!(%token, %column, "unrecognized operator, using equals");
                    note = Some(format!("Unrecognized operator ({}) on column ({}) treated as equals.", token, column));
                    Operator::Equals
                }
            },
        };
        let conjunction = match (first, self.conjunction.as_deref()) {
            (true, _) | (false, None) => None,
            (false, Some(token)) => Some(Conjunction::from_token(token)?),
        };
        Ok(Parsed {
            criterion: Criterion::new(column, operator, self.value.clone().unwrap_or_default(), conjunction),
            note,
        })
    }
}
