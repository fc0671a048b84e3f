// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Student record, editable draft, and wire payload.
//! Kept free of UI and HTTP concerns so both layers can share it.

use std::fmt;

use email_address::EmailAddress;
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// Server-assigned identifier of a student record.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StudentId(String);

impl StudentId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for StudentId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for StudentId {
    /// Accepts string ids (document stores) as well as integer ids (SQL backends).
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Unsigned(u64),
            Signed(i64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(text) => Self(text),
            RawId::Unsigned(n) => Self(n.to_string()),
            RawId::Signed(n) => Self(n.to_string()),
        })
    }
}

/// Numeric mark attached to a student.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct Mark(f64);

impl Mark {
    pub fn new(value: f64) -> Self {
        Self(value)
    }

    /// Parse user or wire text the way a numeric input would accept it.
    ///
    /// Surrounding whitespace is ignored; NaN and infinities are rejected.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// assert_eq!(Mark::parse(" 95 "), Some(Mark::new(95.0)));
    /// assert_eq!(Mark::parse("abc"), None);
    /// ```
    pub fn parse(text: &str) -> Option<Self> {
        text.trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(Self)
    }

    fn as_integer(self) -> Option<i64> {
        let integral = self.0.fract() == 0.0 && self.0.abs() < i64::MAX as f64;
        integral.then_some(self.0 as i64)
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // f64's Display already drops a trailing ".0".
        write!(f, "{}", self.0)
    }
}

impl Serialize for Mark {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.as_integer() {
            Some(n) => serializer.serialize_i64(n),
            None => serializer.serialize_f64(self.0),
        }
    }
}

impl<'de> Deserialize<'de> for Mark {
    /// Accepts JSON numbers and numeric strings; forms that post raw input values
    /// leave string marks behind in the backend.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawMark {
            Number(f64),
            Text(String),
        }

        match RawMark::deserialize(deserializer)? {
            RawMark::Number(value) => Ok(Self(value)),
            RawMark::Text(text) => {
                Self::parse(&text).ok_or_else(|| de::Error::custom(format!("invalid mark: {text:?}")))
            }
        }
    }
}

/// A persisted student as returned by the backend.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Student {
    #[serde(rename = "_id", alias = "id")]
    pub id: StudentId,
    pub name: String,
    pub email: String,
    pub mark: Mark,
}

/// Body sent on create and update.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StudentPayload {
    pub name: String,
    pub email: String,
    pub mark: Mark,
}

impl StudentPayload {
    /// Attach a server id, producing the record the backend would store.
    #[cfg(test)]
    pub fn into_student(self, id: StudentId) -> Student {
        Student {
            id,
            name: self.name,
            email: self.email,
            mark: self.mark,
        }
    }
}

/// Editable form fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StudentField {
    Name,
    Email,
    Mark,
}

impl StudentField {
    /// Fields in form order.
    pub const ALL: [StudentField; 3] = [Self::Name, Self::Email, Self::Mark];

    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Email => "Email",
            Self::Mark => "Mark",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            Self::Name => "Enter name",
            Self::Email => "Enter email",
            Self::Mark => "Enter mark",
        }
    }
}

/// Unsaved form state. Values are raw text until submit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StudentDraft {
    pub name: String,
    pub email: String,
    pub mark: String,
}

impl StudentDraft {
    /// Copy a record's editable fields into a fresh draft.
    pub fn from_student(student: &Student) -> Self {
        Self {
            name: student.name.clone(),
            email: student.email.clone(),
            mark: student.mark.to_string(),
        }
    }

    pub fn get(&self, field: StudentField) -> &str {
        match field {
            StudentField::Name => &self.name,
            StudentField::Email => &self.email,
            StudentField::Mark => &self.mark,
        }
    }

    /// Merge a single field value into the draft.
    pub fn set(&mut self, field: StudentField, value: String) {
        match field {
            StudentField::Name => self.name = value,
            StudentField::Email => self.email = value,
            StudentField::Mark => self.mark = value,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.email.is_empty() && self.mark.is_empty()
    }

    /// Build the wire payload, or report the first field that fails its input constraint.
    pub fn to_payload(&self) -> Result<StudentPayload, DraftError> {
        if let Some((field, reason)) = validate_draft(self) {
            return Err(DraftError { field, reason });
        }
        let mark = Mark::parse(&self.mark).ok_or(DraftError {
            field: StudentField::Mark,
            reason: "invalid_number",
        })?;

        Ok(StudentPayload {
            name: self.name.clone(),
            email: self.email.trim().to_string(),
            mark,
        })
    }
}

/// Input constraint violated by a draft field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DraftError {
    pub field: StudentField,
    /// One of `"required"`, `"invalid_email"`, `"invalid_number"`.
    pub reason: &'static str,
}

impl fmt::Display for DraftError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason {
            "required" => write!(f, "Field '{}' is required.", self.field.label()),
            "invalid_email" => write!(f, "Field '{}' must be a valid email address.", self.field.label()),
            "invalid_number" => write!(f, "Field '{}' must be a valid number.", self.field.label()),
            _ => write!(f, "Field '{}' is invalid.", self.field.label()),
        }
    }
}

impl std::error::Error for DraftError {}

/// Check the constraints a native form enforces before submit: every field
/// required, email well-formed, mark numeric.
///
/// Only an empty value counts as missing. Email inputs strip surrounding
/// whitespace, so a blank email is missing too; a blank name is kept as typed.
///
/// Returns the first offending field and a reason code, or `None` when the
/// draft may be submitted.
pub fn validate_draft(draft: &StudentDraft) -> Option<(StudentField, &'static str)> {
    for field in StudentField::ALL {
        let value = draft.get(field);
        let missing = match field {
            StudentField::Email => value.trim().is_empty(),
            StudentField::Name | StudentField::Mark => value.is_empty(),
        };
        if missing {
            return Some((field, "required"));
        }
    }

    if EmailAddress::parse_with_options(draft.email.trim(), Default::default()).is_err() {
        return Some((StudentField::Email, "invalid_email"));
    }

    if Mark::parse(&draft.mark).is_none() {
        return Some((StudentField::Mark, "invalid_number"));
    }

    None
}
