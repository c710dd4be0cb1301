//! Response types for the RUZ API.

use serde::{Deserialize, Serialize};

/// Schedule receiver discriminator used by the `receiverType` parameter.
///
/// Wire values: 1 for lecturer, 2 for auditorium, 3 for student. The
/// upstream API treats student as its default and the discriminator is
/// never echoed back for it (see
/// [`ScheduleRequest::resolve_receiver_type`](crate::ScheduleRequest::resolve_receiver_type)).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiverType {
    /// Schedule of a lecturer.
    Lecturer,
    /// Schedule of an auditorium.
    Auditorium,
    /// Schedule of a student.
    Student,
}

impl ReceiverType {
    /// Integer encoding expected by the API.
    #[must_use]
    pub const fn as_wire(self) -> i64 {
        match self {
            Self::Lecturer => 1,
            Self::Auditorium => 2,
            Self::Student => 3,
        }
    }
}

/// One schedule entry.
///
/// Only the two fields needed for day grouping are typed; everything else
/// the API returns (auditorium, lecturer, discipline, time range, ...) is
/// preserved verbatim in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    /// Calendar date, `YYYY.MM.DD`.
    pub date: String,
    /// Weekday index as delivered by the API (1 = Monday).
    #[serde(rename = "dayOfWeek")]
    pub day_of_week: u8,
    /// Remaining lesson fields, passed through untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A contiguous run of lessons sharing one date.
///
/// Produced by [`split_by_day`](crate::split_by_day); never mutated after
/// construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayGroup {
    /// Date shared by every lesson in the group.
    pub date: String,
    /// Weekday index of the group's date.
    #[serde(rename = "dayOfWeek")]
    pub day_of_week: u8,
    /// Number of lessons folded into the group.
    pub count: usize,
    /// The lessons, in delivery order.
    pub lessons: Vec<Lesson>,
}
