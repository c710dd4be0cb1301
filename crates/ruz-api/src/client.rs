//! `RuzClient` - RUZ API client implementation.

use reqwest::Client;
use serde_json::Value;
use tracing::instrument;
use url::Url;

use crate::api::LocalRuzApi;
use crate::cache::ResponseCache;
use crate::catalog::{ApiVersion, EndpointCatalog, UrlResolver};
use crate::email::EmailClassifier;
use crate::error::{DispatchError, RuzError, TransportError};
use crate::params::{ParamValue, RequestParameters, ScheduleRequest};
use crate::schema::{ParamSchema, SchemaValidator};
use crate::types::Lesson;
use crate::util::{date_with_bias, format_date};

/// Default base URL for the v1 API.
const DEFAULT_BASE_URL: &str = "https://ruz.hse.ru/api/";

/// Default base URL for the v2 API.
const DEFAULT_BASE_URL_V2: &str = "https://ruz.hse.ru/api/v2/";

/// Default response charset.
const DEFAULT_ENCODING: &str = "utf-8";

/// RUZ API client.
///
/// A request travels validate -> resolve -> execute. Validation failures
/// surface as typed errors before any I/O; transport failures after a
/// successful validation collapse to an empty result so a flaky upstream
/// degrades to "no data" rather than an error.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct RuzClient {
    /// HTTP client.
    http_client: Client,
    /// URL resolver over both API versions.
    resolver: UrlResolver,
    /// Request validator.
    validator: SchemaValidator,
    /// Reference-collection memoization.
    cache: ResponseCache,
    /// Response charset used when decoding bodies.
    encoding: String,
    /// Whether schedule emails are additionally verified upstream.
    check_email_online: bool,
}

/// Builder for `RuzClient`.
#[derive(Debug, Default)]
#[allow(clippy::module_name_repetitions)]
pub struct RuzClientBuilder {
    base_url: Option<Url>,
    base_url_v2: Option<Url>,
    catalog: Option<EndpointCatalog>,
    schema: Option<ParamSchema>,
    email_domains: Option<(String, String)>,
    encoding: Option<String>,
    check_email_online: bool,
}

impl RuzClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            base_url_v2: None,
            catalog: None,
            schema: None,
            email_domains: None,
            encoding: None,
            check_email_online: false,
        }
    }

    /// Overrides the v1 base URL (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Overrides the v2 base URL (for wiremock in tests).
    #[must_use]
    pub fn base_url_v2(mut self, url: Url) -> Self {
        self.base_url_v2 = Some(url);
        self
    }

    /// Replaces the endpoint catalog.
    #[must_use]
    pub fn catalog(mut self, catalog: EndpointCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Replaces the parameter schema.
    #[must_use]
    pub fn schema(mut self, schema: ParamSchema) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Replaces the institutional email domains (student, staff).
    #[must_use]
    pub fn email_domains(
        mut self,
        student: impl Into<String>,
        staff: impl Into<String>,
    ) -> Self {
        self.email_domains = Some((student.into(), staff.into()));
        self
    }

    /// Sets the response charset (default: `utf-8`).
    #[must_use]
    pub fn encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = Some(encoding.into());
        self
    }

    /// Enables remote email verification before schedule requests.
    #[must_use]
    pub const fn check_email_online(mut self, enabled: bool) -> Self {
        self.check_email_online = enabled;
        self
    }

    /// Builds the client, validating the configuration up front.
    ///
    /// # Errors
    ///
    /// Returns [`RuzError::Configuration`] if a base URL does not end in
    /// `/`, the encoding is empty, the email domains are empty, or the
    /// HTTP client cannot be constructed.
    pub fn build(self) -> Result<RuzClient, RuzError> {
        let base_url = match self.base_url {
            Some(url) => url,
            None => Url::parse(DEFAULT_BASE_URL)
                .map_err(|e| RuzError::Configuration(format!("invalid default base URL: {e}")))?,
        };
        let base_url_v2 = match self.base_url_v2 {
            Some(url) => url,
            None => Url::parse(DEFAULT_BASE_URL_V2)
                .map_err(|e| RuzError::Configuration(format!("invalid default base URL: {e}")))?,
        };
        for url in [&base_url, &base_url_v2] {
            if !url.path().ends_with('/') {
                return Err(RuzError::Configuration(format!(
                    "base URL must end with '/': {url}"
                )));
            }
        }

        let encoding = self.encoding.unwrap_or_else(|| String::from(DEFAULT_ENCODING));
        if encoding.is_empty() {
            return Err(RuzError::Configuration(String::from(
                "encoding must be non-empty",
            )));
        }

        let classifier = match self.email_domains {
            Some((student, staff)) => EmailClassifier::new(student, staff)?,
            None => EmailClassifier::default(),
        };

        let http_client = Client::builder()
            .gzip(true)
            .build()
            .map_err(|e| RuzError::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(RuzClient {
            http_client,
            resolver: UrlResolver::new(
                base_url,
                base_url_v2,
                self.catalog.unwrap_or_default(),
            ),
            validator: SchemaValidator::new(self.schema.unwrap_or_default(), classifier),
            cache: ResponseCache::default(),
            encoding,
            check_email_online: self.check_email_online,
        })
    }
}

impl RuzClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> RuzClientBuilder {
        RuzClientBuilder::new()
    }

    /// Creates a client with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RuzError::Configuration`] if the HTTP client cannot be
    /// constructed.
    pub fn new() -> Result<Self, RuzError> {
        Self::builder().build()
    }

    /// Sends a GET request and decodes the JSON body.
    async fn execute(&self, url: Url) -> Result<Value, TransportError> {
        tracing::debug!(%url, "RUZ API request");
        let response = self
            .http_client
            .get(url)
            .send()
            .await?
            .error_for_status()?;
        let body = response.text_with_charset(&self.encoding).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Resolves and executes against v2 first, then v1 exactly once.
    ///
    /// Endpoints without a v2 route go straight to v1, so any endpoint
    /// costs at most two HTTP attempts.
    async fn dispatch(
        &self,
        endpoint: &str,
        params: &RequestParameters,
    ) -> Result<Value, DispatchError> {
        if let Ok(url) = self.resolver.resolve(endpoint, params, ApiVersion::V2) {
            match self.execute(url).await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    tracing::warn!(error = %e, endpoint, "v2 API unavailable, falling back to v1");
                }
            }
        }

        let url = self
            .resolver
            .resolve(endpoint, params, ApiVersion::V1)
            .map_err(DispatchError::Validation)?;
        self.execute(url).await.map_err(DispatchError::Transport)
    }

    /// Validates and performs a request against a logical endpoint.
    ///
    /// Transport failures are logged and collapse to an empty array.
    ///
    /// # Errors
    ///
    /// Returns a validation error from the [`RuzError`] family; never a
    /// transport error.
    #[instrument(skip_all, fields(endpoint))]
    pub async fn get(
        &self,
        endpoint: &str,
        params: &RequestParameters,
    ) -> Result<Value, RuzError> {
        self.validator.validate(endpoint, params)?;

        if self.check_email_online
            && let Some(ParamValue::Str(email)) = params.get("email")
            && !self.verify_email(email).await
        {
            tracing::warn!(%email, "email not recognized by the remote API");
        }

        match self.dispatch(endpoint, params).await {
            Ok(value) => Ok(value),
            Err(DispatchError::Validation(e)) => Err(e),
            Err(DispatchError::Transport(e)) => {
                tracing::warn!(error = %e, endpoint, "request failed, returning empty result");
                Ok(Value::Array(Vec::new()))
            }
        }
    }

    /// Checks whether the remote API recognizes the email.
    ///
    /// Best-effort: a malformed address short-circuits to `false` without
    /// I/O; otherwise a one-day schedule probe is issued and any
    /// successfully decoded response counts as recognized.
    #[instrument(skip_all)]
    pub async fn verify_email(&self, email: &str) -> bool {
        let email = email.trim().to_lowercase();
        if !self.validator.classifier().is_valid_format(&email) {
            return false;
        }

        let mut params = RequestParameters::new();
        params.push("fromDate", format_date(date_with_bias(0)));
        params.push("toDate", format_date(date_with_bias(1)));
        params.push("email", email.clone());
        // Student is the upstream default and must not be echoed back.
        if !matches!(self.validator.classifier().is_student(&email), Ok(true)) {
            params.push("receiverType", 1_i64);
        }

        self.dispatch("schedule", &params).await.is_ok()
    }

    /// Pulls the lesson list out of a schedule payload.
    ///
    /// v1 answers with a flat array, v2 wraps it in an object; elements
    /// that do not parse as lessons are skipped.
    fn extract_lessons(value: Value) -> Vec<Lesson> {
        let raw = match value {
            Value::Array(items) => items,
            Value::Object(mut map) => match map.remove("Lessons") {
                Some(Value::Array(items)) => items,
                _ => {
                    tracing::warn!("unexpected schedule payload shape");
                    Vec::new()
                }
            },
            _ => {
                tracing::warn!("unexpected schedule payload shape");
                Vec::new()
            }
        };

        raw.into_iter()
            .filter_map(|item| match serde_json::from_value::<Lesson>(item) {
                Ok(lesson) => Some(lesson),
                Err(e) => {
                    tracing::debug!(error = %e, "skipping malformed lesson");
                    None
                }
            })
            .collect()
    }

    /// Performs a memoized reference-collection request.
    async fn reference(
        &self,
        endpoint: &'static str,
        params: RequestParameters,
    ) -> Result<Value, RuzError> {
        let key = params.cache_key();
        if let Some(hit) = self.cache.get(endpoint, &key) {
            tracing::debug!(endpoint, "cache hit");
            return Ok(hit);
        }

        let value = self.get(endpoint, &params).await?;
        self.cache.put(endpoint, key, value.clone());
        Ok(value)
    }
}

impl LocalRuzApi for RuzClient {
    #[instrument(skip_all)]
    async fn person_lessons(&self, request: &ScheduleRequest) -> Result<Vec<Lesson>, RuzError> {
        let params = request.to_parameters(self.validator.classifier());
        let value = self.get("schedule", &params).await?;
        Ok(Self::extract_lessons(value))
    }

    #[instrument(skip_all)]
    async fn groups(
        &self,
        faculty_id: Option<i64>,
        find_text: Option<&str>,
    ) -> Result<Value, RuzError> {
        let mut params = RequestParameters::new();
        params.push_opt("facultyOid", faculty_id);
        params.push_opt("findText", find_text);
        self.reference("groups", params).await
    }

    #[instrument(skip_all)]
    async fn staff_of_group(
        &self,
        group_id: i64,
        find_text: Option<&str>,
    ) -> Result<Value, RuzError> {
        let mut params = RequestParameters::new();
        params.push("groupOid", group_id);
        params.push_opt("findText", find_text);
        self.reference("staffOfGroup", params).await
    }

    #[instrument(skip_all)]
    async fn streams(&self, find_text: Option<&str>) -> Result<Value, RuzError> {
        let mut params = RequestParameters::new();
        params.push_opt("findText", find_text);
        self.reference("streams", params).await
    }

    #[instrument(skip_all)]
    async fn staff_of_streams(&self, stream_id: i64) -> Result<Value, RuzError> {
        let mut params = RequestParameters::new();
        params.push("streamOid", stream_id);
        self.reference("staffOfStreams", params).await
    }

    #[instrument(skip_all)]
    async fn lecturers(
        &self,
        chair_id: Option<i64>,
        find_text: Option<&str>,
    ) -> Result<Value, RuzError> {
        let mut params = RequestParameters::new();
        params.push_opt("chairOid", chair_id);
        params.push_opt("findText", find_text);
        self.reference("lecturers", params).await
    }

    #[instrument(skip_all)]
    async fn auditoriums(
        &self,
        building_id: Option<i64>,
        find_text: Option<&str>,
    ) -> Result<Value, RuzError> {
        let mut params = RequestParameters::new();
        params.push_opt("buildingOid", building_id);
        params.push_opt("findText", find_text);
        self.reference("auditoriums", params).await
    }

    #[instrument(skip_all)]
    async fn type_of_auditoriums(&self) -> Result<Value, RuzError> {
        self.reference("typeOfAuditoriums", RequestParameters::new())
            .await
    }

    #[instrument(skip_all)]
    async fn kind_of_works(&self) -> Result<Value, RuzError> {
        self.reference("kindOfWorks", RequestParameters::new()).await
    }

    #[instrument(skip_all)]
    async fn buildings(&self, find_text: Option<&str>) -> Result<Value, RuzError> {
        let mut params = RequestParameters::new();
        params.push_opt("findText", find_text);
        self.reference("buildings", params).await
    }

    #[instrument(skip_all)]
    async fn faculties(&self, find_text: Option<&str>) -> Result<Value, RuzError> {
        let mut params = RequestParameters::new();
        params.push_opt("findText", find_text);
        self.reference("faculties", params).await
    }

    #[instrument(skip_all)]
    async fn chairs(
        &self,
        faculty_id: Option<i64>,
        find_text: Option<&str>,
    ) -> Result<Value, RuzError> {
        let mut params = RequestParameters::new();
        params.push_opt("facultyOid", faculty_id);
        params.push_opt("findText", find_text);
        self.reference("chairs", params).await
    }

    #[instrument(skip_all)]
    async fn sub_groups(&self, find_text: Option<&str>) -> Result<Value, RuzError> {
        let mut params = RequestParameters::new();
        params.push_opt("findText", find_text);
        self.reference("subGroups", params).await
    }
}
