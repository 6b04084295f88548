//! Declarative field rules and their interpreter
//!
//! A `RuleTable` lists, per field path, the rules that apply to it. The
//! interpreter runs the rules stage by stage (required, type, enum,
//! predicate), visiting every field in each stage and accumulating all
//! violations.

use rentflow_core::{AppError, AppResult, FieldError};
use serde_json::Value;
use std::fmt;

/// Primitive JSON type a field must carry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonType {
    String,
    Number,
    Boolean,
    Object,
}

impl JsonType {
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            JsonType::String => value.is_string(),
            JsonType::Number => value.is_number(),
            JsonType::Boolean => value.is_boolean(),
            JsonType::Object => value.is_object(),
        }
    }
}

impl fmt::Display for JsonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JsonType::String => "string",
            JsonType::Number => "number",
            JsonType::Boolean => "boolean",
            JsonType::Object => "object",
        };
        f.write_str(name)
    }
}

/// Custom check: receives the field value (if present) and the whole payload
pub type Predicate = fn(Option<&Value>, &Value) -> Result<(), String>;

/// A single rule attached to a field
#[derive(Clone)]
pub enum Rule {
    Required,
    Type(JsonType),
    OneOf(&'static [&'static str]),
    Check(Predicate),
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Required => write!(f, "Required"),
            Rule::Type(t) => write!(f, "Type({})", t),
            Rule::OneOf(values) => write!(f, "OneOf({:?})", values),
            Rule::Check(_) => write!(f, "Check(..)"),
        }
    }
}

/// Rules for one field path
#[derive(Debug, Clone)]
pub struct FieldRule {
    pub field: &'static str,
    pub rules: Vec<Rule>,
}

impl FieldRule {
    pub fn new(field: &'static str, rules: Vec<Rule>) -> Self {
        Self { field, rules }
    }
}

/// Evaluation stages, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Required,
    Type,
    Enum,
    Predicate,
}

impl Stage {
    pub const ALL: [Stage; 4] = [Stage::Required, Stage::Type, Stage::Enum, Stage::Predicate];
}

/// Ordered list of field rules
#[derive(Debug, Clone)]
pub struct RuleTable {
    fields: Vec<FieldRule>,
}

impl RuleTable {
    /// Build a table, rejecting fields the request shape does not have
    pub fn new(fields: Vec<FieldRule>, known_fields: &[&str]) -> AppResult<Self> {
        if let Some(unknown) = fields.iter().find(|f| !known_fields.contains(&f.field)) {
            return Err(AppError::Config(format!(
                "rule table references unknown field '{}'",
                unknown.field
            )));
        }
        Ok(Self { fields })
    }

    /// Run one stage over every field
    pub fn run_stage(&self, stage: Stage, payload: &Value) -> Vec<FieldError> {
        let mut errors = Vec::new();
        for field_rule in &self.fields {
            let value = lookup(payload, field_rule.field);
            for rule in &field_rule.rules {
                if let Some(message) = apply(stage, rule, field_rule.field, value, payload) {
                    errors.push(FieldError::new(field_rule.field, message));
                }
            }
        }
        errors
    }

    /// Run all stages in order, concatenating their errors
    pub fn evaluate(&self, payload: &Value) -> Vec<FieldError> {
        Stage::ALL
            .iter()
            .flat_map(|stage| self.run_stage(*stage, payload))
            .collect()
    }
}

fn apply(
    stage: Stage,
    rule: &Rule,
    field: &str,
    value: Option<&Value>,
    payload: &Value,
) -> Option<String> {
    match (stage, rule) {
        (Stage::Required, Rule::Required) => {
            is_blank(value).then(|| format!("{} is required", field))
        }
        (Stage::Type, Rule::Type(expected)) => match value {
            Some(v) if !expected.matches(v) => {
                Some(format!("{} must be of type {}", field, expected))
            }
            _ => None,
        },
        (Stage::Enum, Rule::OneOf(allowed)) => match value.and_then(Value::as_str) {
            Some(s) if !s.is_empty() && !allowed.contains(&s) => Some(format!(
                "{} must be one of {}",
                field,
                allowed.join(", ")
            )),
            _ => None,
        },
        (Stage::Predicate, Rule::Check(predicate)) => predicate(value, payload).err(),
        _ => None,
    }
}

/// Resolve a dotted path; `null` counts as absent
pub fn lookup<'a>(payload: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(payload, |current, key| current.get(key))
        .filter(|v| !v.is_null())
}

/// Missing, null, or empty string
pub fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}
