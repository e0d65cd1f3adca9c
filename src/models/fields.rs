//! Validation and coercion of request form fields.
//!
//! A field that is absent and a field sent as an empty string are the same
//! thing: "not provided". Updates rely on that to leave columns untouched.

use std::collections::HashMap;
use std::str::FromStr;

use bigdecimal::{BigDecimal, RoundingMode};

use crate::domain::errors::DomainError;

/// Width of the `VARCHAR(255)` name and email columns.
pub const NAME_MAX_CHARS: usize = 255;
pub const PHONE_MAX_CHARS: usize = 50;
pub const ROLE_NAME_MAX_CHARS: usize = 100;

/// Money columns are `NUMERIC(10, 2)`: eight integer digits after rounding.
const AMOUNT_SCALE: i64 = 2;
const AMOUNT_LIMIT: i64 = 100_000_000;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FormFields {
    values: HashMap<String, String>,
}

impl FormFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Later duplicates of a name are ignored, matching a first-value lookup.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut fields = Self::new();
        for (name, value) in pairs {
            fields.insert(name, value);
        }
        fields
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.entry(name.into()).or_insert_with(|| value.into());
    }

    /// The field's value when it was provided and non-empty.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.values
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    pub fn owned(&self, name: &str) -> Option<String> {
        self.text(name).map(str::to_string)
    }

    /// Fails with one message naming every required field that is missing.
    pub fn require(&self, names: &[&str]) -> Result<(), DomainError> {
        let missing: Vec<&str> = names
            .iter()
            .copied()
            .filter(|name| self.text(name).is_none())
            .collect();
        match missing.as_slice() {
            [] => Ok(()),
            [one] => Err(DomainError::invalid(format!("{one} is required"))),
            many => Err(DomainError::invalid(format!(
                "{} are required",
                many.join(", ")
            ))),
        }
    }

    pub fn parse<T: FromStr>(&self, name: &str) -> Result<Option<T>, DomainError> {
        self.text(name)
            .map(|raw| {
                raw.parse::<T>()
                    .map_err(|_| DomainError::invalid(format!("Invalid {name} format")))
            })
            .transpose()
    }

    pub fn parse_required<T: FromStr>(&self, name: &str) -> Result<T, DomainError> {
        self.parse(name)?
            .ok_or_else(|| DomainError::invalid(format!("{name} is required")))
    }

    pub fn required_text(&self, name: &str) -> Result<String, DomainError> {
        self.owned(name)
            .ok_or_else(|| DomainError::invalid(format!("{name} is required")))
    }

    /// Text that must fit a `VARCHAR(max_chars)` column.
    pub fn bounded(&self, name: &str, max_chars: usize) -> Result<Option<String>, DomainError> {
        match self.text(name) {
            Some(value) if value.chars().count() > max_chars => Err(DomainError::invalid(
                format!("{name} must be at most {max_chars} characters"),
            )),
            value => Ok(value.map(str::to_string)),
        }
    }

    pub fn required_bounded(&self, name: &str, max_chars: usize) -> Result<String, DomainError> {
        self.bounded(name, max_chars)?
            .ok_or_else(|| DomainError::invalid(format!("{name} is required")))
    }

    /// A decimal that fits a money column once rounded to cents.
    pub fn amount(&self, name: &str) -> Result<Option<BigDecimal>, DomainError> {
        let Some(value) = self.parse::<BigDecimal>(name)? else {
            return Ok(None);
        };
        let rounded = value.with_scale_round(AMOUNT_SCALE, RoundingMode::HalfUp);
        if rounded.abs() >= BigDecimal::from(AMOUNT_LIMIT) {
            return Err(DomainError::invalid(format!("{name} is out of range")));
        }
        Ok(Some(value))
    }

    pub fn required_amount(&self, name: &str) -> Result<BigDecimal, DomainError> {
        self.amount(name)?
            .ok_or_else(|| DomainError::invalid(format!("{name} is required")))
    }

    pub fn boolean(&self, name: &str) -> Result<Option<bool>, DomainError> {
        self.text(name)
            .map(|raw| {
                parse_flag(raw).ok_or_else(|| DomainError::invalid(format!("Invalid {name} format")))
            })
            .transpose()
    }
}

/// Accepts the spellings clients historically sent for flags.
fn parse_flag(raw: &str) -> Option<bool> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}
