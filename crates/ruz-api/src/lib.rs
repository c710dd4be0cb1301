//! Client library for the HSE RUZ timetable API.
//!
//! Wraps the university scheduling service: schedule queries for
//! lecturers, auditoriums, and students, the reference collections
//! (faculties, groups, buildings, ...), institutional email
//! classification, and day-wise grouping of lesson lists.

mod api;
mod cache;
mod catalog;
mod client;
mod email;
mod error;
mod params;
mod schema;
mod types;
mod util;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalRuzApi, RuzApi};
pub use catalog::{ApiVersion, EndpointCatalog, UrlResolver};
#[allow(clippy::module_name_repetitions)]
pub use client::{RuzClient, RuzClientBuilder};
pub use email::{EmailClassifier, STAFF_DOMAIN, STUDENT_DOMAIN};
#[allow(clippy::module_name_repetitions)]
pub use error::RuzError;
pub use params::{ParamType, ParamValue, RequestParameters, ScheduleRequest, ScheduleSubjects};
pub use schema::{ParamSchema, SchemaValidator};
pub use types::{DayGroup, Lesson, ReceiverType};
pub use util::{date_with_bias, find_by_field, format_date, schedules, split_by_day};
