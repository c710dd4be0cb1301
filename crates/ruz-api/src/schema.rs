//! Declarative request schema and parameter validation.

use std::collections::HashMap;

use crate::email::EmailClassifier;
use crate::error::RuzError;
use crate::params::{ParamType, ParamValue, RequestParameters};

/// Endpoint that carries the subject-identifier rule and email checks.
const SCHEDULE_ENDPOINT: &str = "schedule";

/// At least one of these must be present on a schedule request.
const SCHEDULE_IDENTIFIERS: [&str; 4] = ["lecturerOid", "auditoriumOid", "studentOid", "email"];

/// Declared parameter types per endpoint.
///
/// Loaded once at construction; every endpoint used by a public operation
/// has exactly one entry (possibly empty).
#[derive(Debug, Clone)]
pub struct ParamSchema {
    endpoints: HashMap<String, HashMap<String, ParamType>>,
}

impl Default for ParamSchema {
    fn default() -> Self {
        let table: [(&str, &[(&str, ParamType)]); 13] = [
            (
                "schedule",
                &[
                    ("fromDate", ParamType::Str),
                    ("toDate", ParamType::Str),
                    ("receiverType", ParamType::Int),
                    ("lecturerOid", ParamType::Int),
                    ("auditoriumOid", ParamType::Int),
                    ("studentOid", ParamType::Int),
                    ("email", ParamType::Str),
                ],
            ),
            (
                "groups",
                &[("facultyOid", ParamType::Int), ("findText", ParamType::Str)],
            ),
            (
                "staffOfGroup",
                &[("groupOid", ParamType::Int), ("findText", ParamType::Str)],
            ),
            ("streams", &[("findText", ParamType::Str)]),
            ("staffOfStreams", &[("streamOid", ParamType::Int)]),
            (
                "lecturers",
                &[("chairOid", ParamType::Int), ("findText", ParamType::Str)],
            ),
            (
                "auditoriums",
                &[("buildingOid", ParamType::Int), ("findText", ParamType::Str)],
            ),
            ("typeOfAuditoriums", &[]),
            ("kindOfWorks", &[]),
            ("buildings", &[("findText", ParamType::Str)]),
            ("faculties", &[("findText", ParamType::Str)]),
            (
                "chairs",
                &[("facultyOid", ParamType::Int), ("findText", ParamType::Str)],
            ),
            ("subGroups", &[("findText", ParamType::Str)]),
        ];

        let endpoints = table
            .into_iter()
            .map(|(endpoint, params)| {
                (
                    String::from(endpoint),
                    params
                        .iter()
                        .map(|&(name, kind)| (String::from(name), kind))
                        .collect(),
                )
            })
            .collect();
        Self { endpoints }
    }
}

impl ParamSchema {
    /// Builds a schema from a caller-supplied table.
    ///
    /// # Errors
    ///
    /// Returns [`RuzError::Configuration`] if any endpoint or parameter
    /// name is empty.
    pub fn from_table(
        endpoints: HashMap<String, HashMap<String, ParamType>>,
    ) -> Result<Self, RuzError> {
        for (endpoint, params) in &endpoints {
            if endpoint.is_empty() {
                return Err(RuzError::Configuration(String::from(
                    "empty endpoint name in schema",
                )));
            }
            if params.keys().any(String::is_empty) {
                return Err(RuzError::Configuration(format!(
                    "empty parameter name in schema for '{endpoint}'"
                )));
            }
        }
        Ok(Self { endpoints })
    }

    /// Declared parameters for the endpoint, if it has a schema entry.
    #[must_use]
    pub fn endpoint(&self, name: &str) -> Option<&HashMap<String, ParamType>> {
        self.endpoints.get(name)
    }
}

/// Validates request parameters against the declared schema.
///
/// Pure and idempotent: identical inputs yield identical outcomes with no
/// observable side effect. Runs before any network I/O.
#[derive(Debug, Clone)]
pub struct SchemaValidator {
    schema: ParamSchema,
    classifier: EmailClassifier,
}

impl SchemaValidator {
    /// Creates a validator over the given schema and classifier.
    #[must_use]
    pub const fn new(schema: ParamSchema, classifier: EmailClassifier) -> Self {
        Self { schema, classifier }
    }

    /// The classifier used for email checks.
    #[must_use]
    pub const fn classifier(&self) -> &EmailClassifier {
        &self.classifier
    }

    /// Checks the parameter set against the endpoint's schema entry.
    ///
    /// The schedule identifier rule runs first, then email format/domain
    /// checks, then the generic per-parameter checks.
    ///
    /// # Errors
    ///
    /// - [`RuzError::MissingIdentifier`] for a schedule request without
    ///   any subject identifier.
    /// - [`RuzError::MalformedEmail`] / [`RuzError::UnknownDomain`] for a
    ///   rejected email value.
    /// - [`RuzError::UnknownEndpoint`] when the endpoint has no schema
    ///   entry.
    /// - [`RuzError::UnknownParameter`] / [`RuzError::TypeMismatch`] for
    ///   undeclared names or wrongly typed values.
    pub fn validate(&self, endpoint: &str, params: &RequestParameters) -> Result<(), RuzError> {
        if endpoint == SCHEDULE_ENDPOINT
            && !SCHEDULE_IDENTIFIERS
                .iter()
                .any(|name| params.contains(name))
        {
            return Err(RuzError::MissingIdentifier);
        }

        if let Some(ParamValue::Str(email)) = params.get("email") {
            if !self.classifier.is_valid_format(email) {
                return Err(RuzError::MalformedEmail(email.clone()));
            }
            let allowed = self.classifier.allowed_domains();
            if !self.classifier.is_valid_domain(email, &allowed) {
                let domain = email.rsplit('@').next().unwrap_or_default().to_lowercase();
                return Err(RuzError::UnknownDomain(domain));
            }
        }

        let schema = self
            .schema
            .endpoint(endpoint)
            .ok_or_else(|| RuzError::UnknownEndpoint(String::from(endpoint)))?;

        for (name, value) in params.iter() {
            let expected = *schema.get(name).ok_or_else(|| RuzError::UnknownParameter {
                endpoint: String::from(endpoint),
                param: String::from(name),
            })?;
            if value.kind() != expected {
                return Err(RuzError::TypeMismatch {
                    endpoint: String::from(endpoint),
                    param: String::from(name),
                    expected,
                    got: value.kind(),
                });
            }
        }
        Ok(())
    }
}
