//! Form submission parsing primitives.
//!
//! [`FormData`] holds the raw `application/x-www-form-urlencoded` pairs of a
//! submission. A [`FormReader`] reads individual fields out of it, converting
//! text into typed values and collecting field-scoped [`FieldErrors`] instead
//! of failing on the first bad value. Entity forms are built on top of these
//! in the api crate.

use std::collections::{BTreeMap, HashMap};
use std::net::IpAddr;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

use crate::types::{DbId, Date, Timestamp};

/// Error message for a missing required value.
pub const MSG_REQUIRED: &str = "This field is required.";
/// Error message for a non-numeric integer field.
pub const MSG_WHOLE_NUMBER: &str = "Enter a whole number.";
/// Error message for a non-numeric decimal field.
pub const MSG_NUMBER: &str = "Enter a number.";
/// Error message for an unparseable date.
pub const MSG_DATE: &str = "Enter a valid date.";
/// Error message for an unparseable date/time.
pub const MSG_DATETIME: &str = "Enter a valid date/time.";
/// Error message for an unparseable IP address.
pub const MSG_IP_ADDRESS: &str = "Enter a valid IPv4 or IPv6 address.";
/// Key under which errors not tied to a single field are stored.
pub const NON_FIELD_ERRORS: &str = "__all__";

/// Accepted local date/time layouts, tried in order.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Raw submitted form values keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormData(BTreeMap<String, String>);

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(name, value)` pairs. Later duplicates win.
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Set a value, replacing any previous one.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.0.insert(name.to_string(), value.into());
    }

    /// Set a value only when `value` is `Some`.
    pub fn set_opt(&mut self, name: &str, value: Option<impl ToString>) {
        if let Some(v) = value {
            self.set(name, v.to_string());
        }
    }

    /// Set a checkbox value (`"on"` when checked, absent otherwise).
    pub fn set_checked(&mut self, name: &str, checked: bool) {
        if checked {
            self.set(name, "on");
        } else {
            self.0.remove(name);
        }
    }

    /// Raw value of a field, untrimmed.
    pub fn raw(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Trimmed value of a field; blank values read as `None`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.raw(name).map(str::trim).filter(|v| !v.is_empty())
    }

    /// Keep only the named fields, dropping everything else.
    pub fn retain_fields(mut self, allowed: &[&str]) -> Self {
        self.0.retain(|name, _| allowed.contains(&name.as_str()));
        self
    }

    /// Whether a checkbox counts as checked: present and not blank, `off`,
    /// `false` or `0`.
    pub fn is_checked(&self, name: &str) -> bool {
        !matches!(
            self.get(name).map(str::to_ascii_lowercase).as_deref(),
            None | Some("off" | "false" | "0")
        )
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<HashMap<String, String>> for FormData {
    fn from(map: HashMap<String, String>) -> Self {
        Self(map.into_iter().collect())
    }
}

/// Field-scoped validation errors, in field-name order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// A single error not tied to any field.
    pub fn non_field(message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(NON_FIELD_ERRORS, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    /// Errors recorded for one field (empty slice if none).
    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Errors not tied to any field.
    pub fn non_field_errors(&self) -> &[String] {
        self.get(NON_FIELD_ERRORS)
    }

    pub fn has(&self, field: &str) -> bool {
        !self.get(field).is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Names of fields with at least one error.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Flatten into `field: message` lines for logs and JSON errors.
    pub fn summary(&self) -> String {
        self.0
            .iter()
            .flat_map(|(field, msgs)| msgs.iter().map(move |m| format!("{field}: {m}")))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Reads typed values out of [`FormData`], accumulating errors.
///
/// Every accessor returns `None` when the value is blank or invalid; invalid
/// values (and blank required values) also record an error. Call
/// [`finish`](Self::finish) to turn the collected values into a result.
pub struct FormReader<'a> {
    data: &'a FormData,
    errors: FieldErrors,
}

impl<'a> FormReader<'a> {
    pub fn new(data: &'a FormData) -> Self {
        Self {
            data,
            errors: FieldErrors::new(),
        }
    }

    fn present(&mut self, name: &str, required: bool) -> Option<&'a str> {
        let value = self.data.get(name);
        if value.is_none() && required {
            self.errors.add(name, MSG_REQUIRED);
        }
        value
    }

    /// Single-line text with a maximum length in characters.
    pub fn text(&mut self, name: &str, max_len: usize, required: bool) -> Option<String> {
        let value = self.present(name, required)?;
        let len = value.chars().count();
        if len > max_len {
            self.errors.add(
                name,
                format!("Ensure this value has at most {max_len} characters (it has {len})."),
            );
            return None;
        }
        Some(value.to_string())
    }

    /// Unbounded text (textarea).
    pub fn long_text(&mut self, name: &str, required: bool) -> Option<String> {
        self.present(name, required).map(str::to_string)
    }

    /// Checkbox: checked unless absent, blank, `off`, `false` or `0`.
    pub fn checkbox(&mut self, name: &str) -> bool {
        self.data.is_checked(name)
    }

    /// 32-bit integer with an optional lower bound.
    pub fn integer(&mut self, name: &str, required: bool, min: Option<i32>) -> Option<i32> {
        let value = self.present(name, required)?;
        let Ok(parsed) = value.parse::<i32>() else {
            self.errors.add(name, MSG_WHOLE_NUMBER);
            return None;
        };
        if let Some(min) = min {
            if parsed < min {
                self.errors.add(
                    name,
                    format!("Ensure this value is greater than or equal to {min}."),
                );
                return None;
            }
        }
        Some(parsed)
    }

    /// Fixed-point decimal limited to `max_digits` total and `decimal_places`
    /// fractional digits, returned as `f64` for binding to a NUMERIC column.
    pub fn decimal(
        &mut self,
        name: &str,
        required: bool,
        max_digits: usize,
        decimal_places: usize,
    ) -> Option<f64> {
        let value = self.present(name, required)?;
        let unsigned = value.strip_prefix('-').unwrap_or(value);
        let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
        let well_formed = !(whole.is_empty() && fraction.is_empty())
            && whole.chars().all(|c| c.is_ascii_digit())
            && fraction.chars().all(|c| c.is_ascii_digit());
        let parsed = value.parse::<f64>().ok().filter(|_| well_formed);
        let Some(parsed) = parsed else {
            self.errors.add(name, MSG_NUMBER);
            return None;
        };

        let whole_digits = whole.trim_start_matches('0').len();
        if fraction.len() > decimal_places {
            self.errors.add(
                name,
                format!("Ensure that there are no more than {decimal_places} decimal places."),
            );
            return None;
        }
        if whole_digits > max_digits - decimal_places {
            self.errors.add(
                name,
                format!(
                    "Ensure that there are no more than {} digits before the decimal point.",
                    max_digits - decimal_places
                ),
            );
            return None;
        }
        Some(parsed)
    }

    /// Calendar date. Accepts `YYYY-MM-DD` or a local date/time whose date
    /// part is kept.
    pub fn date(&mut self, name: &str, required: bool) -> Option<Date> {
        let value = self.present(name, required)?;
        match parse_date(value) {
            Some(date) => Some(date),
            None => {
                self.errors.add(name, MSG_DATE);
                None
            }
        }
    }

    /// Point in time. Accepts `YYYY-MM-DD` (midnight) or a local date/time
    /// (`T` or space separated, optional seconds), interpreted as UTC.
    pub fn datetime(&mut self, name: &str, required: bool) -> Option<Timestamp> {
        let value = self.present(name, required)?;
        match parse_datetime(value) {
            Some(ts) => Some(ts),
            None => {
                self.errors.add(name, MSG_DATETIME);
                None
            }
        }
    }

    /// One of the enumerated `(value, label)` choices.
    pub fn choice(
        &mut self,
        name: &str,
        choices: &[(&str, &str)],
        required: bool,
    ) -> Option<String> {
        let value = self.present(name, required)?;
        if choices.iter().any(|(v, _)| *v == value) {
            Some(value.to_string())
        } else {
            self.errors.add(
                name,
                format!("Select a valid choice. {value} is not one of the available choices."),
            );
            None
        }
    }

    /// Id of a related row. Existence is checked by the foreign key on write.
    pub fn foreign_key(&mut self, name: &str, required: bool) -> Option<DbId> {
        let value = self.present(name, required)?;
        match value.parse::<DbId>() {
            Ok(id) if id > 0 => Some(id),
            _ => {
                self.errors.add(
                    name,
                    "Select a valid choice. That choice is not one of the available choices.",
                );
                None
            }
        }
    }

    /// IPv4 or IPv6 address, stored in canonical textual form.
    pub fn ip_address(&mut self, name: &str, required: bool) -> Option<String> {
        let value = self.present(name, required)?;
        match value.parse::<IpAddr>() {
            Ok(addr) => Some(addr.to_string()),
            Err(_) => {
                self.errors.add(name, MSG_IP_ADDRESS);
                None
            }
        }
    }

    /// Record an error that is not tied to one field.
    pub fn add_non_field_error(&mut self, message: impl Into<String>) {
        self.errors.add(NON_FIELD_ERRORS, message);
    }

    /// Produce the validated value, or the collected errors.
    ///
    /// `build` is only invoked when no errors were recorded; it should
    /// assemble the value from the `Option`s returned by the accessors
    /// (using `?` on required ones).
    pub fn finish<T>(self, build: impl FnOnce() -> Option<T>) -> Result<T, FieldErrors> {
        if !self.errors.is_empty() {
            return Err(self.errors);
        }
        build().ok_or_else(|| FieldErrors::non_field("Incomplete form submission."))
    }
}

/// Parse a date input (`YYYY-MM-DD` or a local date/time).
pub fn parse_date(value: &str) -> Option<Date> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_naive_datetime(value).map(|dt| dt.date()))
}

/// Parse a date/time input; date-only values mean midnight UTC.
pub fn parse_datetime(value: &str) -> Option<Timestamp> {
    parse_naive_datetime(value)
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN))
        })
        .map(|dt| dt.and_utc())
}

fn parse_naive_datetime(value: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}

/// Format a timestamp for a `datetime-local` input.
pub fn format_datetime_local(ts: Timestamp) -> String {
    ts.format("%Y-%m-%dT%H:%M").to_string()
}
