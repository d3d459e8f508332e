//! # Rule Engine — Validation Tags
//!
//! Interprets the validation tag attached to a field, e.g.
//! `"required,min=2,max=64"` or `"omitempty,email|url"`.
//!
//! ## Tag Grammar
//!
//! ```text
//! tag         := segment ("," segment)*
//! segment     := alternative ("|" alternative)*
//! alternative := name | name "=" param
//! ```
//!
//! Every segment must pass. Within a segment at least one alternative must
//! pass. `omitempty` is special: when the value is its zero value the
//! remaining segments are skipped and the tag passes.
//!
//! ## Size Rules
//!
//! `len`, `min`, `max`, `gt`, `gte`, `lt`, `lte` measure strings by
//! character count, arrays and objects by element count and numbers by
//! value. `eq` and `ne` compare strings and booleans by content.
//!
//! ## Sharing
//!
//! [`RuleEngine::global`] is built once on first use and is read-only
//! afterwards. Custom rules go on an owned engine passed to
//! [`crate::Params::bind_and_validate_with`].

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use chrono::format::{parse, Parsed, StrftimeItems};
use grape_core::Value;
use regex::Regex;
use url::Url;
use uuid::Uuid;

use crate::error::RuleError;

/// A rule predicate: the value under test and the optional `=param`.
pub type RuleFn = dyn Fn(&Value, Option<&str>) -> bool + Send + Sync;

/// Registry of named validation rules.
#[derive(Clone)]
pub struct RuleEngine {
    rules: HashMap<String, Arc<RuleFn>>,
}

impl fmt::Debug for RuleEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.rules.keys().collect();
        names.sort();
        f.debug_struct("RuleEngine").field("rules", &names).finish()
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleEngine {
    /// Creates an engine with the built-in rules.
    pub fn new() -> Self {
        let mut engine = Self {
            rules: HashMap::new(),
        };
        engine
            .register("required", |v, _| !v.is_zero())
            .register("email", |v, _| v.as_str().is_some_and(is_email))
            .register("url", |v, _| v.as_str().is_some_and(is_url))
            .register("uuid", |v, _| v.as_str().is_some_and(is_uuid))
            .register("alpha", |v, _| {
                non_empty_str(v).is_some_and(|s| s.chars().all(|c| c.is_ascii_alphabetic()))
            })
            .register("alphanum", |v, _| {
                non_empty_str(v).is_some_and(|s| s.chars().all(|c| c.is_ascii_alphanumeric()))
            })
            .register("numeric", |v, _| match v {
                Value::Int(_) | Value::Float(_) => true,
                Value::String(s) => is_decimal(s),
                _ => false,
            })
            .register("number", |v, _| match v {
                Value::Int(_) | Value::Float(_) => true,
                Value::String(s) => !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()),
                _ => false,
            })
            .register("boolean", |v, _| match v {
                Value::Bool(_) => true,
                Value::String(s) => parse_bool(s).is_some(),
                _ => false,
            })
            .register("lowercase", |v, _| {
                non_empty_str(v).is_some_and(|s| s == s.to_lowercase())
            })
            .register("uppercase", |v, _| {
                non_empty_str(v).is_some_and(|s| s == s.to_uppercase())
            })
            .register("ascii", |v, _| v.as_str().is_some_and(|s| s.is_ascii()))
            .register("len", |v, p| compare(v, p, |a, b| a == b))
            .register("min", |v, p| compare(v, p, |a, b| a >= b))
            .register("max", |v, p| compare(v, p, |a, b| a <= b))
            .register("gt", |v, p| compare(v, p, |a, b| a > b))
            .register("gte", |v, p| compare(v, p, |a, b| a >= b))
            .register("lt", |v, p| compare(v, p, |a, b| a < b))
            .register("lte", |v, p| compare(v, p, |a, b| a <= b))
            .register("eq", |v, p| equals(v, p).unwrap_or(false))
            .register("ne", |v, p| equals(v, p).is_some_and(|eq| !eq))
            .register("oneof", |v, p| one_of(v, p.unwrap_or_default()))
            .register("contains", |v, p| {
                str_with_param(v, p).is_some_and(|(s, p)| s.contains(p))
            })
            .register("excludes", |v, p| {
                str_with_param(v, p).is_some_and(|(s, p)| !s.contains(p))
            })
            .register("startswith", |v, p| {
                str_with_param(v, p).is_some_and(|(s, p)| s.starts_with(p))
            })
            .register("endswith", |v, p| {
                str_with_param(v, p).is_some_and(|(s, p)| s.ends_with(p))
            })
            .register("datetime", |v, p| {
                str_with_param(v, p).is_some_and(|(s, layout)| matches_layout(s, layout))
            });
        engine
    }

    /// Returns the process-wide engine with the built-in rules.
    pub fn global() -> &'static RuleEngine {
        static GLOBAL: OnceLock<RuleEngine> = OnceLock::new();
        GLOBAL.get_or_init(RuleEngine::new)
    }

    /// Registers (or replaces) a rule.
    pub fn register<F>(&mut self, name: impl Into<String>, rule: F) -> &mut Self
    where
        F: Fn(&Value, Option<&str>) -> bool + Send + Sync + 'static,
    {
        self.rules.insert(name.into(), Arc::new(rule));
        self
    }

    /// Returns true if a rule with this name is registered.
    pub fn contains(&self, name: &str) -> bool {
        name == "omitempty" || self.rules.contains_key(name)
    }

    /// Evaluates `tag` against `value`.
    ///
    /// # Errors
    ///
    /// [`RuleError::Failed`] names the first segment that did not pass.
    /// [`RuleError::UnknownRule`] is returned as soon as an unregistered
    /// rule name is reached.
    pub fn check(&self, value: &Value, tag: &str) -> Result<(), RuleError> {
        for segment in tag.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            if segment == "omitempty" {
                if value.is_zero() {
                    return Ok(());
                }
                continue;
            }

            let mut passed = false;
            for alternative in segment.split('|') {
                let (name, param) = match alternative.split_once('=') {
                    Some((name, param)) => (name.trim(), Some(param)),
                    None => (alternative.trim(), None),
                };
                let rule = self
                    .rules
                    .get(name)
                    .ok_or_else(|| RuleError::UnknownRule {
                        rule: name.to_owned(),
                    })?;
                if rule(value, param) {
                    passed = true;
                    break;
                }
            }

            if !passed {
                return Err(RuleError::Failed {
                    rule: segment.to_owned(),
                });
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Built-in rule helpers
// ---------------------------------------------------------------------------

fn non_empty_str(value: &Value) -> Option<&str> {
    value.as_str().filter(|s| !s.is_empty())
}

fn str_with_param<'a>(value: &'a Value, param: Option<&'a str>) -> Option<(&'a str, &'a str)> {
    Some((value.as_str()?, param?))
}

/// Size of a value for the ordering rules.
fn measure(value: &Value) -> Option<f64> {
    match value {
        Value::String(s) => Some(s.chars().count() as f64),
        Value::Int(i) => Some(*i as f64),
        Value::Float(f) => Some(*f),
        Value::Array(items) => Some(items.len() as f64),
        Value::Object(map) => Some(map.len() as f64),
        Value::Null | Value::Bool(_) => None,
    }
}

fn compare(value: &Value, param: Option<&str>, op: fn(f64, f64) -> bool) -> bool {
    let Some(bound) = param.and_then(|p| p.trim().parse::<f64>().ok()) else {
        return false;
    };
    measure(value).is_some_and(|size| op(size, bound))
}

/// Equality used by `eq` / `ne`. `None` when the comparison is undefined.
fn equals(value: &Value, param: Option<&str>) -> Option<bool> {
    let param = param?;
    match value {
        Value::String(s) => Some(s == param),
        Value::Bool(b) => parse_bool(param).map(|p| p == *b),
        _ => {
            let bound = param.trim().parse::<f64>().ok()?;
            measure(value).map(|size| size == bound)
        }
    }
}

fn one_of(value: &Value, options: &str) -> bool {
    let mut options = options.split_whitespace();
    match value {
        Value::String(s) => options.any(|o| o == s.as_str()),
        Value::Int(i) => options.any(|o| o.parse::<i64>().is_ok_and(|o| o == *i)),
        Value::Float(f) => options.any(|o| o.parse::<f64>().is_ok_and(|o| o == *f)),
        _ => false,
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}

/// `[+-]?digits(.digits)?`
fn is_decimal(s: &str) -> bool {
    let digits = s.strip_prefix(['+', '-']).unwrap_or(s);
    let (int, frac) = match digits.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (digits, None),
    };
    let all_digits = |part: &str| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit());
    all_digits(int) && frac.map_or(true, all_digits)
}

const EMAIL_PATTERN: &str = concat!(
    r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@",
    r"[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?",
    r"(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$",
);

fn email_regex() -> Option<&'static Regex> {
    static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(EMAIL_PATTERN).ok()).as_ref()
}

fn is_email(s: &str) -> bool {
    email_regex().is_some_and(|re| re.is_match(s))
}

/// Absolute URL with a scheme.
fn is_url(s: &str) -> bool {
    Url::parse(s).is_ok()
}

/// Hyphenated form only; braced, URN and simple forms are rejected.
fn is_uuid(s: &str) -> bool {
    s.len() == 36 && Uuid::parse_str(s).is_ok()
}

fn matches_layout(s: &str, layout: &str) -> bool {
    let mut parsed = Parsed::new();
    parse(&mut parsed, s, StrftimeItems::new(layout)).is_ok()
}
