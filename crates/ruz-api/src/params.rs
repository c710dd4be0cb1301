//! Request parameter types.

use std::fmt;

use chrono::NaiveDate;

use crate::email::EmailClassifier;
use crate::types::ReceiverType;
use crate::util::{date_with_bias, format_date};

/// Semantic type a schema entry declares for a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    /// Text value.
    Str,
    /// Integer value.
    Int,
    /// Boolean value.
    Bool,
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str => f.write_str("string"),
            Self::Int => f.write_str("integer"),
            Self::Bool => f.write_str("boolean"),
        }
    }
}

/// A scalar parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// Text value.
    Str(String),
    /// Integer value.
    Int(i64),
    /// Boolean value.
    Bool(bool),
}

impl ParamValue {
    /// Semantic type of the value, for schema checks.
    #[must_use]
    pub const fn kind(&self) -> ParamType {
        match self {
            Self::Str(_) => ParamType::Str,
            Self::Int(_) => ParamType::Int,
            Self::Bool(_) => ParamType::Bool,
        }
    }

    /// Query-string rendering of the value.
    #[must_use]
    pub fn to_wire(&self) -> String {
        match self {
            Self::Str(s) => s.clone(),
            Self::Int(n) => n.to_string(),
            Self::Bool(b) => b.to_string(),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// An insertion-ordered set of named request parameters.
///
/// Built per call and discarded afterwards. Absent values are never
/// inserted ([`push_opt`](Self::push_opt) drops `None`), so they are
/// never serialized onto the query string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestParameters {
    entries: Vec<(String, ParamValue)>,
}

impl RequestParameters {
    /// Creates an empty parameter set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Appends a parameter.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        self.entries.push((name.into(), value.into()));
    }

    /// Appends a parameter when the value is present; drops `None` silently.
    pub fn push_opt<V: Into<ParamValue>>(&mut self, name: impl Into<String>, value: Option<V>) {
        if let Some(value) = value {
            self.push(name, value);
        }
    }

    /// Whether no parameters were supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of supplied parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Looks up a parameter by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Whether a parameter with the given name was supplied.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterates over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    /// Stable memoization key: the un-encoded query rendering.
    pub(crate) fn cache_key(&self) -> String {
        self.entries
            .iter()
            .map(|(name, value)| format!("{name}={}", value.to_wire()))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Options for a schedule query.
///
/// All fields are optional; exactly one of `email`, `lecturer_id`,
/// `auditorium_id`, `student_id` must identify the query subject or
/// validation fails with
/// [`RuzError::MissingIdentifier`](crate::RuzError::MissingIdentifier).
/// Unset dates default to a one-week window starting today.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScheduleRequest {
    /// Institutional email of the schedule subject.
    pub email: Option<String>,
    /// Lecturer ID (`lecturerOid`).
    pub lecturer_id: Option<i64>,
    /// Auditorium ID (`auditoriumOid`).
    pub auditorium_id: Option<i64>,
    /// Student ID (`studentOid`).
    pub student_id: Option<i64>,
    /// Explicit receiver type; inferred from the other fields when unset.
    pub receiver_type: Option<ReceiverType>,
    /// Start of the period, inclusive. Defaults to today.
    pub from_date: Option<NaiveDate>,
    /// End of the period, inclusive. Defaults to six days from today.
    pub to_date: Option<NaiveDate>,
}

impl ScheduleRequest {
    /// Resolves the effective `receiverType` discriminator.
    ///
    /// Precedence: an explicit value wins, except that `Student` is
    /// normalized to `None` (the upstream API treats student as its
    /// default and rejects an echoed discriminator); next a staff email
    /// infers `Lecturer`; then a lecturer ID infers `Lecturer`; then an
    /// auditorium ID infers `Auditorium`; otherwise unset.
    #[must_use]
    pub fn resolve_receiver_type(&self, classifier: &EmailClassifier) -> Option<ReceiverType> {
        if let Some(explicit) = self.receiver_type {
            return match explicit {
                ReceiverType::Student => None,
                other => Some(other),
            };
        }
        if let Some(email) = &self.email {
            let student = classifier.is_student(email).unwrap_or_else(|_| {
                tracing::debug!(%email, "unrecognized email domain");
                false
            });
            if !student {
                tracing::debug!(%email, "detected lecturer email");
                return Some(ReceiverType::Lecturer);
            }
        }
        if self.lecturer_id.is_some() {
            return Some(ReceiverType::Lecturer);
        }
        if self.auditorium_id.is_some() {
            return Some(ReceiverType::Auditorium);
        }
        None
    }

    /// Renders the request as wire parameters for the schedule endpoint.
    ///
    /// Unset fields are omitted entirely; dates fall back to the default
    /// one-week window formatted as `YYYY.MM.DD`.
    #[must_use]
    pub fn to_parameters(&self, classifier: &EmailClassifier) -> RequestParameters {
        let from_date = self.from_date.unwrap_or_else(|| date_with_bias(0));
        let to_date = self.to_date.unwrap_or_else(|| date_with_bias(6));

        let mut params = RequestParameters::new();
        params.push("fromDate", format_date(from_date));
        params.push("toDate", format_date(to_date));
        params.push_opt("email", self.email.clone());
        params.push_opt(
            "receiverType",
            self.resolve_receiver_type(classifier)
                .map(ReceiverType::as_wire),
        );
        params.push_opt("lecturerOid", self.lecturer_id);
        params.push_opt("auditoriumOid", self.auditorium_id);
        params.push_opt("studentOid", self.student_id);
        params
    }
}

/// Subjects for a multi-subject schedule query.
///
/// The four collections of the original API are mutually exclusive, so
/// they are modelled as one enum: supplying more than one kind, or none,
/// is unrepresentable.
#[derive(Debug, Clone, PartialEq)]
pub enum ScheduleSubjects {
    /// Institutional email addresses.
    Emails(Vec<String>),
    /// Lecturer IDs.
    Lecturers(Vec<i64>),
    /// Auditorium IDs.
    Auditoriums(Vec<i64>),
    /// Student IDs.
    Students(Vec<i64>),
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn classifier() -> EmailClassifier {
        EmailClassifier::default()
    }

    #[test]
    fn test_push_opt_drops_none() {
        // Arrange
        let mut params = RequestParameters::new();

        // Act
        params.push("fromDate", "2018.06.07");
        params.push_opt::<i64>("lecturerOid", None);
        params.push_opt("auditoriumOid", Some(100_i64));

        // Assert
        assert_eq!(params.len(), 2);
        assert!(!params.contains("lecturerOid"));
        assert_eq!(params.get("auditoriumOid"), Some(&ParamValue::Int(100)));
    }

    #[test]
    fn test_parameters_preserve_insertion_order() {
        // Arrange
        let mut params = RequestParameters::new();
        params.push("b", 2_i64);
        params.push("a", 1_i64);

        // Act
        let names: Vec<&str> = params.iter().map(|(name, _)| name).collect();

        // Assert
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(params.cache_key(), "b=2&a=1");
    }

    #[test]
    fn test_explicit_receiver_type_is_used_verbatim() {
        // Arrange
        let request = ScheduleRequest {
            receiver_type: Some(ReceiverType::Auditorium),
            email: Some(String::from("someone@hse.ru")),
            ..ScheduleRequest::default()
        };

        // Act & Assert
        assert_eq!(
            request.resolve_receiver_type(&classifier()),
            Some(ReceiverType::Auditorium)
        );
    }

    #[test]
    fn test_explicit_student_normalizes_to_unset() {
        // Arrange
        let request = ScheduleRequest {
            receiver_type: Some(ReceiverType::Student),
            student_id: Some(42),
            ..ScheduleRequest::default()
        };

        // Act & Assert
        assert_eq!(request.resolve_receiver_type(&classifier()), None);
    }

    #[test]
    fn test_staff_email_infers_lecturer() {
        // Arrange
        let request = ScheduleRequest {
            email: Some(String::from("aromanov@hse.ru")),
            ..ScheduleRequest::default()
        };

        // Act & Assert
        assert_eq!(
            request.resolve_receiver_type(&classifier()),
            Some(ReceiverType::Lecturer)
        );
    }

    #[test]
    fn test_student_email_leaves_receiver_unset() {
        // Arrange
        let request = ScheduleRequest {
            email: Some(String::from("dapchelkin@edu.hse.ru")),
            ..ScheduleRequest::default()
        };

        // Act & Assert
        assert_eq!(request.resolve_receiver_type(&classifier()), None);
    }

    #[test]
    fn test_lecturer_id_infers_lecturer() {
        // Arrange
        let request = ScheduleRequest {
            lecturer_id: Some(6232),
            ..ScheduleRequest::default()
        };

        // Act & Assert
        assert_eq!(
            request.resolve_receiver_type(&classifier()),
            Some(ReceiverType::Lecturer)
        );
    }

    #[test]
    fn test_auditorium_id_infers_auditorium() {
        // Arrange
        let request = ScheduleRequest {
            auditorium_id: Some(100),
            ..ScheduleRequest::default()
        };

        // Act & Assert
        assert_eq!(
            request.resolve_receiver_type(&classifier()),
            Some(ReceiverType::Auditorium)
        );
    }

    #[test]
    fn test_student_id_leaves_receiver_unset() {
        // Arrange
        let request = ScheduleRequest {
            student_id: Some(42),
            ..ScheduleRequest::default()
        };

        // Act & Assert
        assert_eq!(request.resolve_receiver_type(&classifier()), None);
    }

    #[test]
    fn test_to_parameters_omits_unset_fields() {
        // Arrange
        let request = ScheduleRequest {
            auditorium_id: Some(100),
            from_date: NaiveDate::from_ymd_opt(2018, 6, 7),
            to_date: NaiveDate::from_ymd_opt(2018, 6, 13),
            ..ScheduleRequest::default()
        };

        // Act
        let params = request.to_parameters(&classifier());

        // Assert
        assert_eq!(
            params.get("fromDate"),
            Some(&ParamValue::Str(String::from("2018.06.07")))
        );
        assert_eq!(
            params.get("toDate"),
            Some(&ParamValue::Str(String::from("2018.06.13")))
        );
        assert_eq!(params.get("receiverType"), Some(&ParamValue::Int(2)));
        assert_eq!(params.get("auditoriumOid"), Some(&ParamValue::Int(100)));
        assert!(!params.contains("email"));
        assert!(!params.contains("lecturerOid"));
        assert!(!params.contains("studentOid"));
    }

    #[test]
    fn test_to_parameters_defaults_to_one_week() {
        // Arrange
        let request = ScheduleRequest {
            student_id: Some(42),
            ..ScheduleRequest::default()
        };

        // Act
        let params = request.to_parameters(&classifier());

        // Assert: both dates present, formatted as YYYY.MM.DD
        let from = match params.get("fromDate").unwrap() {
            ParamValue::Str(s) => s.clone(),
            other => panic!("unexpected value: {other:?}"),
        };
        let to = match params.get("toDate").unwrap() {
            ParamValue::Str(s) => s.clone(),
            other => panic!("unexpected value: {other:?}"),
        };
        assert_eq!(from.len(), 10);
        assert_eq!(to.len(), 10);
        assert!(from < to);
    }
}
