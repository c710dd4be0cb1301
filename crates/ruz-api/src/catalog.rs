//! Endpoint catalog and URL resolution.

use std::collections::HashMap;

use url::Url;

use crate::error::RuzError;
use crate::params::RequestParameters;

/// API version preference for URL resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiVersion {
    /// The original API.
    V1,
    /// The newer API; not every endpoint is available here.
    V2,
}

/// Logical endpoint name to path-fragment tables, one per API version.
///
/// Immutable after construction. The v2 table intentionally covers only
/// the schedule endpoint; everything else is served by v1 alone.
#[derive(Debug, Clone)]
pub struct EndpointCatalog {
    v1: HashMap<String, String>,
    v2: HashMap<String, String>,
}

impl Default for EndpointCatalog {
    fn default() -> Self {
        let v1 = [
            ("schedule", "personLessons"),
            ("groups", "groups"),
            ("staffOfGroup", "staffOfGroup"),
            ("streams", "streams"),
            ("staffOfStreams", "staffOfStreams"),
            ("lecturers", "lecturers"),
            ("auditoriums", "auditoriums"),
            ("typeOfAuditoriums", "typeOfAuditoriums"),
            ("kindOfWorks", "kindOfWorks"),
            ("buildings", "buildings"),
            ("faculties", "faculties"),
            ("chairs", "chairs"),
            ("subGroups", "subGroups"),
        ]
        .into_iter()
        .map(|(name, path)| (String::from(name), String::from(path)))
        .collect();

        let v2 = [("schedule", "timetable/lessons")]
            .into_iter()
            .map(|(name, path)| (String::from(name), String::from(path)))
            .collect();

        Self { v1, v2 }
    }
}

impl EndpointCatalog {
    /// Builds a catalog from caller-supplied tables.
    ///
    /// # Errors
    ///
    /// Returns [`RuzError::Configuration`] if any endpoint name or path
    /// fragment is empty.
    pub fn from_tables(
        v1: HashMap<String, String>,
        v2: HashMap<String, String>,
    ) -> Result<Self, RuzError> {
        for (name, path) in v1.iter().chain(v2.iter()) {
            if name.is_empty() || path.is_empty() {
                return Err(RuzError::Configuration(format!(
                    "empty endpoint catalog entry: '{name}' -> '{path}'"
                )));
            }
        }
        Ok(Self { v1, v2 })
    }

    /// Path fragment for the endpoint under the given version, if any.
    #[must_use]
    pub fn path(&self, version: ApiVersion, endpoint: &str) -> Option<&str> {
        let table = match version {
            ApiVersion::V1 => &self.v1,
            ApiVersion::V2 => &self.v2,
        };
        table.get(endpoint).map(String::as_str)
    }
}

/// Maps a logical endpoint plus version preference to a request URL.
///
/// Pure: no I/O, identical inputs always resolve to the identical URL.
#[derive(Debug, Clone)]
pub struct UrlResolver {
    base_v1: Url,
    base_v2: Url,
    catalog: EndpointCatalog,
}

impl UrlResolver {
    /// Creates a resolver over the given base URLs and catalog.
    #[must_use]
    pub const fn new(base_v1: Url, base_v2: Url, catalog: EndpointCatalog) -> Self {
        Self {
            base_v1,
            base_v2,
            catalog,
        }
    }

    /// Resolves the endpoint to a fully qualified URL.
    ///
    /// Non-empty parameter sets append exactly one `?` followed by
    /// percent-encoded pairs in insertion order; an empty set appends
    /// nothing.
    ///
    /// # Errors
    ///
    /// Returns [`RuzError::UnknownEndpoint`] when the version's table has
    /// no entry for the endpoint, or [`RuzError::Configuration`] if the
    /// path fragment cannot be joined onto the base URL.
    pub fn resolve(
        &self,
        endpoint: &str,
        params: &RequestParameters,
        version: ApiVersion,
    ) -> Result<Url, RuzError> {
        let path = self
            .catalog
            .path(version, endpoint)
            .ok_or_else(|| RuzError::UnknownEndpoint(String::from(endpoint)))?;

        let base = match version {
            ApiVersion::V1 => &self.base_v1,
            ApiVersion::V2 => &self.base_v2,
        };
        let mut url = base
            .join(path)
            .map_err(|e| RuzError::Configuration(format!("cannot join '{path}': {e}")))?;

        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in params.iter() {
                pairs.append_pair(name, &value.to_wire());
            }
        }
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::params::ParamValue;

    fn resolver() -> UrlResolver {
        UrlResolver::new(
            Url::parse("https://ruz.hse.ru/api/").unwrap(),
            Url::parse("https://ruz.hse.ru/api/v2/").unwrap(),
            EndpointCatalog::default(),
        )
    }

    #[test]
    fn test_resolve_without_params_has_no_query() {
        // Arrange
        let resolver = resolver();

        // Act
        let url = resolver
            .resolve("groups", &RequestParameters::new(), ApiVersion::V1)
            .unwrap();

        // Assert
        assert_eq!(url.as_str(), "https://ruz.hse.ru/api/groups");
        assert!(!url.as_str().contains('?'));
    }

    #[test]
    fn test_resolve_with_params_percent_encodes() {
        // Arrange
        let resolver = resolver();
        let mut params = RequestParameters::new();
        params.push("findText", "математический анализ");

        // Act
        let url = resolver
            .resolve("groups", &params, ApiVersion::V1)
            .unwrap();

        // Assert: exactly one '?', value percent-encoded
        assert_eq!(url.as_str().matches('?').count(), 1);
        assert!(url.as_str().starts_with("https://ruz.hse.ru/api/groups?findText="));
        assert!(!url.as_str().contains(' '));
        assert_eq!(
            url.query_pairs().next().unwrap().1,
            "математический анализ"
        );
    }

    #[test]
    fn test_resolve_preserves_insertion_order() {
        // Arrange
        let resolver = resolver();
        let mut params = RequestParameters::new();
        params.push("fromDate", "2018.06.07");
        params.push("toDate", "2018.06.13");
        params.push("auditoriumOid", 100_i64);

        // Act
        let url = resolver
            .resolve("schedule", &params, ApiVersion::V1)
            .unwrap();

        // Assert
        assert_eq!(
            url.query(),
            Some("fromDate=2018.06.07&toDate=2018.06.13&auditoriumOid=100")
        );
    }

    #[test]
    fn test_resolve_is_idempotent() {
        // Arrange
        let resolver = resolver();
        let mut params = RequestParameters::new();
        params.push("buildingOid", ParamValue::Int(7));

        // Act
        let first = resolver
            .resolve("auditoriums", &params, ApiVersion::V1)
            .unwrap();
        let second = resolver
            .resolve("auditoriums", &params, ApiVersion::V1)
            .unwrap();

        // Assert
        assert_eq!(first, second);
    }

    #[test]
    fn test_resolve_unknown_endpoint() {
        // Arrange
        let resolver = resolver();

        // Act
        let result = resolver.resolve("bogus", &RequestParameters::new(), ApiVersion::V1);

        // Assert
        assert!(matches!(result, Err(RuzError::UnknownEndpoint(e)) if e == "bogus"));
    }

    #[test]
    fn test_v2_table_only_covers_schedule() {
        // Arrange
        let resolver = resolver();

        // Act
        let schedule = resolver.resolve("schedule", &RequestParameters::new(), ApiVersion::V2);
        let groups = resolver.resolve("groups", &RequestParameters::new(), ApiVersion::V2);

        // Assert
        assert_eq!(
            schedule.unwrap().as_str(),
            "https://ruz.hse.ru/api/v2/timetable/lessons"
        );
        assert!(matches!(groups, Err(RuzError::UnknownEndpoint(_))));
    }

    #[test]
    fn test_from_tables_rejects_empty_fragments() {
        // Arrange
        let v1 = HashMap::from([(String::from("schedule"), String::new())]);

        // Act
        let result = EndpointCatalog::from_tables(v1, HashMap::new());

        // Assert
        assert!(matches!(result, Err(RuzError::Configuration(_))));
    }
}
