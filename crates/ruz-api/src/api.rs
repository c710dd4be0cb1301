//! RUZ API trait.

use serde_json::Value;

use crate::error::RuzError;
use crate::params::ScheduleRequest;
use crate::types::Lesson;

/// RUZ API trait.
///
/// Abstracts API operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(RuzApi: Send)]
pub trait LocalRuzApi {
    /// Fetches the schedule of a lecturer, auditorium, or student.
    ///
    /// # Errors
    ///
    /// Returns an error if the request parameters fail validation.
    async fn person_lessons(&self, request: &ScheduleRequest) -> Result<Vec<Lesson>, RuzError>;

    /// Lists student groups, optionally filtered by faculty or name.
    ///
    /// # Errors
    ///
    /// Returns an error if the request parameters fail validation.
    async fn groups(
        &self,
        faculty_id: Option<i64>,
        find_text: Option<&str>,
    ) -> Result<Value, RuzError>;

    /// Lists the staff teaching a group.
    ///
    /// # Errors
    ///
    /// Returns an error if the request parameters fail validation.
    async fn staff_of_group(
        &self,
        group_id: i64,
        find_text: Option<&str>,
    ) -> Result<Value, RuzError>;

    /// Lists educational streams.
    ///
    /// # Errors
    ///
    /// Returns an error if the request parameters fail validation.
    async fn streams(&self, find_text: Option<&str>) -> Result<Value, RuzError>;

    /// Lists the staff teaching a stream.
    ///
    /// # Errors
    ///
    /// Returns an error if the request parameters fail validation.
    async fn staff_of_streams(&self, stream_id: i64) -> Result<Value, RuzError>;

    /// Lists lecturers, optionally filtered by chair or name.
    ///
    /// # Errors
    ///
    /// Returns an error if the request parameters fail validation.
    async fn lecturers(
        &self,
        chair_id: Option<i64>,
        find_text: Option<&str>,
    ) -> Result<Value, RuzError>;

    /// Lists auditoriums, optionally filtered by building or name.
    ///
    /// # Errors
    ///
    /// Returns an error if the request parameters fail validation.
    async fn auditoriums(
        &self,
        building_id: Option<i64>,
        find_text: Option<&str>,
    ) -> Result<Value, RuzError>;

    /// Lists auditorium types.
    ///
    /// # Errors
    ///
    /// Returns an error if the request parameters fail validation.
    async fn type_of_auditoriums(&self) -> Result<Value, RuzError>;

    /// Lists kinds of academic work.
    ///
    /// # Errors
    ///
    /// Returns an error if the request parameters fail validation.
    async fn kind_of_works(&self) -> Result<Value, RuzError>;

    /// Lists campus buildings.
    ///
    /// # Errors
    ///
    /// Returns an error if the request parameters fail validation.
    async fn buildings(&self, find_text: Option<&str>) -> Result<Value, RuzError>;

    /// Lists faculties.
    ///
    /// # Errors
    ///
    /// Returns an error if the request parameters fail validation.
    async fn faculties(&self, find_text: Option<&str>) -> Result<Value, RuzError>;

    /// Lists chairs, optionally filtered by faculty or name.
    ///
    /// # Errors
    ///
    /// Returns an error if the request parameters fail validation.
    async fn chairs(
        &self,
        faculty_id: Option<i64>,
        find_text: Option<&str>,
    ) -> Result<Value, RuzError>;

    /// Lists sub-groups.
    ///
    /// # Errors
    ///
    /// Returns an error if the request parameters fail validation.
    async fn sub_groups(&self, find_text: Option<&str>) -> Result<Value, RuzError>;
}
