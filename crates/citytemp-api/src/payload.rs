//! Transfer representations: request parsing, field validation, and the
//! JSON shapes returned to clients.
//!
//! Request bodies arrive as arbitrary JSON. Each `from_json` constructor
//! walks the expected fields, collects every problem into [`FieldErrors`]
//! keyed by field name, and only returns a typed value when the whole body
//! is valid. Unknown keys (including server-assigned ones such as `id`) are
//! ignored.

use std::collections::BTreeMap;
use std::fmt;

use citytemp_types::{City, CityChanges, CityId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::{Validate, ValidationErrors};

/// Message for a required field that is absent.
pub const MSG_REQUIRED: &str = "This field is required.";
/// Message for a field explicitly set to `null`.
pub const MSG_NULL: &str = "This field may not be null.";
/// Message for a required text field that is empty after trimming.
pub const MSG_BLANK: &str = "This field may not be blank.";
/// Message for a text field containing U+0000, which `PostgreSQL` text
/// columns cannot store.
pub const MSG_NULL_CHAR: &str = "Null characters are not allowed.";
/// Message for a text field holding a non-text value.
pub const MSG_NOT_STRING: &str = "Not a valid string.";
/// Message for a numeric field holding a non-numeric value.
pub const MSG_NOT_NUMBER: &str = "A valid number is required.";
/// Message for a malformed `city_id` filter.
pub const MSG_INVALID_CITY_ID: &str = "Invalid city_id format";
/// Key used for errors that concern the body as a whole.
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

// ---------------------------------------------------------------------------
// Field errors
// ---------------------------------------------------------------------------

/// Validation messages grouped by field name.
///
/// Serializes as `{"field": ["message", ...], ...}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    /// Create an empty error set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message against `field`.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_owned())
            .or_default()
            .push(message.into());
    }

    /// Whether no errors have been recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether `field` has at least one error.
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Messages recorded against `field`.
    pub fn messages(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    /// Merge the failures reported by a [`Validate`] derive.
    ///
    /// Uses the rule's message when one is set, otherwise its code.
    pub fn absorb(&mut self, errors: &ValidationErrors) {
        for (field, errs) in errors.field_errors() {
            let field: &str = &field;
            for err in errs {
                let message = err
                    .message
                    .as_ref()
                    .map_or_else(|| err.code.to_string(), ToString::to_string);
                self.add(field, message);
            }
        }
    }

    /// `Ok(value)` when no errors were recorded, otherwise `Err(self)`.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Field extraction helpers
// ---------------------------------------------------------------------------

/// Require the body to be a JSON object.
fn expect_object(body: Value) -> Result<Map<String, Value>, FieldErrors> {
    match body {
        Value::Object(map) => Ok(map),
        other => {
            let kind = match other {
                Value::Null => "null",
                Value::Bool(_) => "bool",
                Value::Number(_) => "number",
                Value::String(_) => "str",
                Value::Array(_) => "list",
                Value::Object(_) => "dict",
            };
            let mut errors = FieldErrors::new();
            errors.add(
                NON_FIELD_ERRORS,
                format!("Invalid data. Expected a dictionary, but got {kind}."),
            );
            Err(errors)
        }
    }
}

/// Read a text field.
///
/// Strings are trimmed; numbers are accepted in their decimal form. Returns
/// `None` (recording an error where appropriate) when no usable value is
/// present.
fn text_field(
    body: &Map<String, Value>,
    field: &str,
    required: bool,
    allow_blank: bool,
    errors: &mut FieldErrors,
) -> Option<String> {
    let text = match body.get(field) {
        None => {
            if required {
                errors.add(field, MSG_REQUIRED);
            }
            return None;
        }
        Some(Value::Null) => {
            errors.add(field, MSG_NULL);
            return None;
        }
        Some(Value::String(s)) => s.trim().to_owned(),
        Some(Value::Number(n)) => n.to_string(),
        Some(_) => {
            errors.add(field, MSG_NOT_STRING);
            return None;
        }
    };

    if text.contains('\0') {
        errors.add(field, MSG_NULL_CHAR);
        return None;
    }
    if !allow_blank && text.is_empty() {
        errors.add(field, MSG_BLANK);
        return None;
    }
    Some(text)
}

/// Read a finite floating-point field.
///
/// JSON numbers and numeric strings are accepted. Bodies keep numbers in
/// their source form, so a literal beyond the `f64` range (`1e400`) arrives
/// here and fails the finiteness check like `"inf"` does.
fn number_field(body: &Map<String, Value>, field: &str, errors: &mut FieldErrors) -> Option<f64> {
    let parsed = match body.get(field) {
        None => {
            errors.add(field, MSG_REQUIRED);
            return None;
        }
        Some(Value::Null) => {
            errors.add(field, MSG_NULL);
            return None;
        }
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    };

    match parsed {
        Some(value) if value.is_finite() => Some(value),
        _ => {
            errors.add(field, MSG_NOT_NUMBER);
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Body of `POST /city/`.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct NewCity {
    /// City name, required and non-blank.
    #[validate(length(max = 100, message = "Ensure this field has no more than 100 characters."))]
    pub name: String,
    /// Description, required but may be empty.
    pub description: String,
}

impl NewCity {
    /// Parse and validate a creation body.
    ///
    /// # Errors
    ///
    /// Returns every field problem found, keyed by field name.
    pub fn from_json(body: Value) -> Result<Self, FieldErrors> {
        let body = expect_object(body)?;
        let mut errors = FieldErrors::new();

        // A required field that comes back `None` always has an error
        // recorded, so the placeholder defaults never escape.
        let payload = Self {
            name: text_field(&body, "name", true, false, &mut errors).unwrap_or_default(),
            description: text_field(&body, "description", true, true, &mut errors)
                .unwrap_or_default(),
        };

        if let Err(e) = payload.validate() {
            errors.absorb(&e);
        }
        errors.into_result(payload)
    }

    /// Build the record to persist.
    pub fn into_city(self) -> City {
        City::new(self.name, self.description)
    }
}

/// Body of `PATCH /city/{id}/`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct CityPatch {
    /// New name, if supplied. Must be non-blank.
    #[validate(length(max = 100, message = "Ensure this field has no more than 100 characters."))]
    pub name: Option<String>,
    /// New description, if supplied. May be empty.
    pub description: Option<String>,
}

impl CityPatch {
    /// Parse and validate a partial update body. Every field is optional.
    ///
    /// # Errors
    ///
    /// Returns every field problem found, keyed by field name.
    pub fn from_json(body: Value) -> Result<Self, FieldErrors> {
        let body = expect_object(body)?;
        let mut errors = FieldErrors::new();

        let payload = Self {
            name: text_field(&body, "name", false, false, &mut errors),
            description: text_field(&body, "description", false, true, &mut errors),
        };

        if let Err(e) = payload.validate() {
            errors.absorb(&e);
        }
        errors.into_result(payload)
    }

    /// The storage-level change set.
    pub fn into_changes(self) -> CityChanges {
        CityChanges {
            name: self.name,
            description: self.description,
        }
    }
}

/// Body of `POST /city/{id}/setTemperature/`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewTemperature {
    /// The recorded temperature.
    pub value: f64,
}

impl NewTemperature {
    /// Parse and validate a submission body.
    ///
    /// # Errors
    ///
    /// Returns a `value` error when it is missing, null, non-numeric, or
    /// not finite.
    pub fn from_json(body: Value) -> Result<Self, FieldErrors> {
        let body = expect_object(body)?;
        let mut errors = FieldErrors::new();

        match number_field(&body, "value", &mut errors) {
            Some(value) => errors.into_result(Self { value }),
            None => Err(errors),
        }
    }
}

/// Query string of `GET /stats/`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatsQuery {
    /// Restrict the average to this city. Empty means no filter.
    pub city_id: Option<String>,
}

impl StatsQuery {
    /// The city filter, if any.
    ///
    /// Only the syntax of the token is checked; the city does not need to
    /// exist.
    ///
    /// # Errors
    ///
    /// Returns a `city_id` error when the token is not a valid UUID.
    pub fn city_filter(&self) -> Result<Option<CityId>, FieldErrors> {
        match self.city_id.as_deref() {
            None | Some("") => Ok(None),
            Some(raw) => match raw.parse::<CityId>() {
                Ok(id) => Ok(Some(id)),
                Err(_) => Err(Self::invalid_city_id()),
            },
        }
    }

    /// The error reported for any unusable `city_id`, including a query
    /// string that cannot be decoded at all (e.g. `city_id` repeated).
    pub fn invalid_city_id() -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.add("city_id", MSG_INVALID_CITY_ID);
        errors
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// Public representation of a city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CityView {
    /// City ID.
    pub id: CityId,
    /// Display name.
    pub name: String,
    /// Description.
    pub description: String,
}

impl From<City> for CityView {
    fn from(city: City) -> Self {
        Self {
            id: city.id(),
            name: city.name,
            description: city.description,
        }
    }
}

/// Response of `GET /city/`.
#[derive(Debug, Clone, Serialize)]
pub struct CityList {
    /// Every stored city.
    pub cities: Vec<CityView>,
}

/// Response of `POST /city/{id}/setTemperature/`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TemperatureCreated {
    /// The value that was stored.
    pub value: f64,
}

/// Response of `GET /stats/`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct AverageTemperature {
    /// Mean of the matching readings, `null` when there are none.
    pub average: Option<f64>,
}
