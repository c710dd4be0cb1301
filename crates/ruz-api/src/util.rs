//! Schedule post-processing and date helpers.

use chrono::{Local, NaiveDate, TimeDelta};
use futures::stream::{self, Stream, StreamExt};
use serde_json::Value;

use crate::api::LocalRuzApi;
use crate::error::RuzError;
use crate::params::{ScheduleRequest, ScheduleSubjects};
use crate::types::{DayGroup, Lesson};

/// Date rendering used by the API, `YYYY.MM.DD`.
const DATE_FORMAT: &str = "%Y.%m.%d";

/// Formats a date the way the API expects it.
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Today shifted by the given number of days; saturates to today on
/// calendar overflow.
#[must_use]
pub fn date_with_bias(days: i64) -> NaiveDate {
    let today = Local::now().date_naive();
    today.checked_add_signed(TimeDelta::days(days)).unwrap_or(today)
}

/// Splits a lesson list into contiguous single-date runs.
///
/// Delivery order is preserved and runs are never merged across a gap: a
/// date that reappears later starts a fresh group.
#[must_use]
pub fn split_by_day(lessons: &[Lesson]) -> Vec<DayGroup> {
    let mut groups: Vec<DayGroup> = Vec::new();
    for lesson in lessons {
        match groups.last_mut() {
            Some(group) if group.date == lesson.date => {
                group.count += 1;
                group.lessons.push(lesson.clone());
            }
            _ => groups.push(DayGroup {
                date: lesson.date.clone(),
                day_of_week: lesson.day_of_week,
                count: 1,
                lessons: vec![lesson.clone()],
            }),
        }
    }
    groups
}

/// Lazily fetches one schedule per subject.
///
/// Yields results in subject order; nothing is requested until the stream
/// is polled, and each item costs exactly one
/// [`person_lessons`](LocalRuzApi::person_lessons) call. Fields of
/// `shared` other than the subject identifiers apply to every request.
pub fn schedules<'a, A>(
    api: &'a A,
    subjects: ScheduleSubjects,
    shared: &ScheduleRequest,
) -> impl Stream<Item = Result<Vec<Lesson>, RuzError>> + 'a
where
    A: LocalRuzApi + Sync,
{
    let template = ScheduleRequest {
        email: None,
        lecturer_id: None,
        auditorium_id: None,
        student_id: None,
        ..shared.clone()
    };
    let requests: Vec<ScheduleRequest> = match subjects {
        ScheduleSubjects::Emails(emails) => emails
            .into_iter()
            .map(|email| ScheduleRequest {
                email: Some(email),
                ..template.clone()
            })
            .collect(),
        ScheduleSubjects::Lecturers(ids) => ids
            .into_iter()
            .map(|id| ScheduleRequest {
                lecturer_id: Some(id),
                ..template.clone()
            })
            .collect(),
        ScheduleSubjects::Auditoriums(ids) => ids
            .into_iter()
            .map(|id| ScheduleRequest {
                auditorium_id: Some(id),
                ..template.clone()
            })
            .collect(),
        ScheduleSubjects::Students(ids) => ids
            .into_iter()
            .map(|id| ScheduleRequest {
                student_id: Some(id),
                ..template.clone()
            })
            .collect(),
    };

    stream::iter(requests).then(move |request| async move { api.person_lessons(&request).await })
}

/// Filters objects whose string field contains the query,
/// case-insensitively.
#[must_use]
pub fn find_by_field(items: &[Value], field: &str, query: &str) -> Vec<Value> {
    let query = query.trim().to_lowercase();
    items
        .iter()
        .filter(|item| {
            item.get(field)
                .and_then(Value::as_str)
                .is_some_and(|text| text.to_lowercase().contains(&query))
        })
        .cloned()
        .collect()
}
