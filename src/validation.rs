//! Request contract checks.
//!
//! Bodies are inspected as raw JSON so that every offending field can be
//! reported at once instead of stopping at the first serde error.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::models::{EnergyProfile, Location};

const TEXT: &str = "string";
const INTEGER: &str = "integer";
const NUMBER: &str = "number";
const OBJECT: &str = "object";

/// Why a field was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldErrorKind {
    Missing,
    InvalidType,
    InvalidValue,
}

/// Diagnostic for a single field. `field` is a dotted path, e.g. `location.lat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub expected: &'static str,
    pub kind: FieldErrorKind,
    pub message: String,
}

impl FieldError {
    pub fn missing(field: impl Into<String>, expected: &'static str) -> Self {
        Self {
            field: field.into(),
            expected,
            kind: FieldErrorKind::Missing,
            message: "Field required".to_string(),
        }
    }

    pub fn invalid_type(field: impl Into<String>, expected: &'static str) -> Self {
        Self {
            field: field.into(),
            expected,
            kind: FieldErrorKind::InvalidType,
            message: format!("Input should be a valid {expected}"),
        }
    }

    pub fn invalid_value(
        field: impl Into<String>,
        expected: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            expected,
            kind: FieldErrorKind::InvalidValue,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// All field errors found in one request body. Never empty when returned as `Err`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    #[must_use]
    pub fn single(error: FieldError) -> Self {
        Self {
            errors: vec![error],
        }
    }

    /// Names of the offending fields, in the order they were checked
    #[must_use]
    pub fn fields(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.field.as_str()).collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Rejection produced by a coercion, before the field path is known
enum Rejection {
    Type,
    Value(String),
}

struct FieldReader<'a> {
    object: &'a Map<String, Value>,
    prefix: &'static str,
    errors: Vec<FieldError>,
}

impl<'a> FieldReader<'a> {
    fn new(object: &'a Map<String, Value>, prefix: &'static str) -> Self {
        Self {
            object,
            prefix,
            errors: Vec::new(),
        }
    }

    fn path(&self, name: &str) -> String {
        if self.prefix.is_empty() {
            name.to_string()
        } else {
            format!("{}.{name}", self.prefix)
        }
    }

    fn required<T>(
        &mut self,
        name: &str,
        expected: &'static str,
        coerce: fn(&Value) -> Result<T, Rejection>,
    ) -> Option<T> {
        match self.object.get(name) {
            None | Some(Value::Null) => {
                self.errors.push(FieldError::missing(self.path(name), expected));
                None
            }
            Some(value) => self.coerce(name, expected, value, coerce),
        }
    }

    fn optional<T>(
        &mut self,
        name: &str,
        expected: &'static str,
        coerce: fn(&Value) -> Result<T, Rejection>,
    ) -> Option<T> {
        match self.object.get(name) {
            None | Some(Value::Null) => None,
            Some(value) => self.coerce(name, expected, value, coerce),
        }
    }

    fn coerce<T>(
        &mut self,
        name: &str,
        expected: &'static str,
        value: &Value,
        coerce: fn(&Value) -> Result<T, Rejection>,
    ) -> Option<T> {
        match coerce(value) {
            Ok(v) => Some(v),
            Err(Rejection::Type) => {
                self.errors
                    .push(FieldError::invalid_type(self.path(name), expected));
                None
            }
            Err(Rejection::Value(message)) => {
                self.errors
                    .push(FieldError::invalid_value(self.path(name), expected, message));
                None
            }
        }
    }

    /// Optional nested object; its own field errors are reported under `name.`
    fn optional_location(&mut self, name: &'static str) -> Option<Location> {
        match self.object.get(name) {
            None | Some(Value::Null) => None,
            Some(Value::Object(inner)) => {
                let mut nested = FieldReader::new(inner, name);
                let lat = nested.required("lat", NUMBER, coerce_float);
                let lng = nested.required("lng", NUMBER, coerce_float);
                self.errors.append(&mut nested.errors);
                Some(Location::new(lat?, lng?))
            }
            Some(_) => {
                self.errors.push(FieldError::invalid_type(self.path(name), OBJECT));
                None
            }
        }
    }

    fn finish(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors {
                errors: self.errors,
            })
        }
    }
}

fn coerce_text(value: &Value) -> Result<String, Rejection> {
    match value {
        Value::String(s) => Ok(s.clone()),
        _ => Err(Rejection::Type),
    }
}

/// Integers, integral floats (`600.0`) and integer strings (`" 600 "`)
fn coerce_integer(value: &Value) -> Result<i64, Rejection> {
    const LOWER: f64 = -9_223_372_036_854_775_808.0;
    const UPPER: f64 = 9_223_372_036_854_775_808.0;

    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Ok(i);
            }
            let f = n.as_f64().ok_or(Rejection::Type)?;
            if f.fract() != 0.0 {
                Err(Rejection::Value(
                    "Input should be a valid integer, got a number with a fractional part"
                        .to_string(),
                ))
            } else if !(LOWER..UPPER).contains(&f) {
                Err(Rejection::Value(
                    "Input should be an integer within the 64-bit range".to_string(),
                ))
            } else {
                Ok(f as i64)
            }
        }
        Value::String(s) => s.trim().parse::<i64>().map_err(|_| {
            Rejection::Value(
                "Input should be a valid integer, unable to parse string as an integer"
                    .to_string(),
            )
        }),
        _ => Err(Rejection::Type),
    }
}

fn coerce_float(value: &Value) -> Result<f64, Rejection> {
    match value {
        Value::Number(n) => n.as_f64().ok_or(Rejection::Type),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .ok_or_else(|| {
                Rejection::Value(
                    "Input should be a valid number, unable to parse string as a number"
                        .to_string(),
                )
            }),
        _ => Err(Rejection::Type),
    }
}

/// Validates a recommendation request body into an [`EnergyProfile`].
///
/// Unknown fields are ignored. Either the whole profile is accepted or every
/// problem is returned.
pub fn parse_energy_profile(body: &Value) -> Result<EnergyProfile, ValidationErrors> {
    let Some(object) = body.as_object() else {
        return Err(ValidationErrors::single(FieldError::invalid_type(
            "body", OBJECT,
        )));
    };

    let mut reader = FieldReader::new(object, "");
    let name = reader.required("name", TEXT, coerce_text);
    let email = reader.optional("email", TEXT, coerce_text);
    let consumption = reader.required("monthlyConsumptionKWh", INTEGER, coerce_integer);
    let cost = reader.required("monthlyCostCOP", INTEGER, coerce_integer);
    let property_type = reader.required("propertyType", TEXT, coerce_text);
    let budget = reader.optional("budgetCOP", TEXT, coerce_text);
    let hours = reader.required("operatingHours", INTEGER, coerce_integer);
    let days = reader.required("operatingDays", INTEGER, coerce_integer);
    let location = reader.optional_location("location");
    reader.finish()?;

    match (name, consumption, cost, property_type, hours, days) {
        (Some(name), Some(consumption), Some(cost), Some(property_type), Some(hours), Some(days)) => {
            Ok(EnergyProfile {
                name,
                email,
                monthly_consumption_kwh: consumption,
                monthly_cost_cop: cost,
                property_type,
                budget_cop: budget,
                operating_hours: hours,
                operating_days: days,
                location,
            })
        }
        // every None above has already been recorded as an error
        _ => Err(ValidationErrors::single(FieldError::invalid_type(
            "body", OBJECT,
        ))),
    }
}

/// A lead is any JSON object; its keys are not inspected.
pub fn parse_lead_payload(body: Value) -> Result<Map<String, Value>, ValidationErrors> {
    match body {
        Value::Object(map) => Ok(map),
        _ => Err(ValidationErrors::single(FieldError::invalid_type(
            "body", OBJECT,
        ))),
    }
}
