/*
[INPUT]:  Raw JSON rows and auth payloads returned by the hosted store
[OUTPUT]: Loosely-typed response structs plus the ingestion filter into Task
[POS]:    Data layer - ingestion boundary, nothing unparseable passes it
[UPDATE]: When the hosted store response shapes change
[UPDATE]: 2026-10-05 Accept datetime-local shaped timestamps (no offset, no seconds)
*/

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::Deserialize;
use thiserror::Error;

use super::enums::{TaskPriority, TaskStatus, UnknownVariant};
use super::models::{Session, Task, TaskId, User};

/// Row identifiers arrive as uuid strings or as integer keys depending on the table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Text(String),
    Number(i64),
}

impl From<RawId> for TaskId {
    fn from(value: RawId) -> Self {
        match value {
            RawId::Text(text) => TaskId::new(text),
            RawId::Number(number) => TaskId::new(number.to_string()),
        }
    }
}

/// A task row exactly as the store returns it, before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTask {
    pub id: RawId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

/// Why a raw row was rejected at ingestion.
#[derive(Debug, Error, PartialEq)]
pub enum IngestError {
    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("invalid timestamp in `{field}`: {value:?}")]
    InvalidTimestamp { field: &'static str, value: String },

    #[error(transparent)]
    UnknownVariant(#[from] UnknownVariant),
}

impl RawTask {
    /// Validate the row. Present-but-invalid timestamps and unknown statuses fail.
    pub fn into_task(self) -> Result<Task, IngestError> {
        let title = self
            .title
            .map(|title| title.trim().to_string())
            .filter(|title| !title.is_empty())
            .ok_or(IngestError::MissingField("title"))?;

        let status = self
            .status
            .as_deref()
            .ok_or(IngestError::MissingField("status"))?
            .parse::<TaskStatus>()?;

        let priority = match self.priority.as_deref().map(str::trim) {
            None | Some("") => TaskPriority::default(),
            Some(value) => value.parse::<TaskPriority>()?,
        };

        let created_at = optional_timestamp("created_at", self.created_at)?
            .ok_or(IngestError::MissingField("created_at"))?;

        let tags: BTreeSet<String> = self
            .tags
            .unwrap_or_default()
            .into_iter()
            .map(|tag| tag.trim().to_string())
            .filter(|tag| !tag.is_empty())
            .collect();

        Ok(Task {
            id: self.id.into(),
            title,
            description: self.description.unwrap_or_default(),
            status,
            priority,
            user_id: self.user_id.unwrap_or_default(),
            created_at,
            start_date: optional_timestamp("start_date", self.start_date)?,
            end_date: optional_timestamp("end_date", self.end_date)?,
            tags,
        })
    }
}

/// Validate every row, dropping and logging the ones that fail.
pub fn ingest_tasks(rows: Vec<RawTask>) -> Vec<Task> {
    rows.into_iter()
        .filter_map(|row| {
            let id = TaskId::from(row.id.clone());
            match row.into_task() {
                Ok(task) => Some(task),
                Err(err) => {
                    tracing::warn!(task_id = %id, error = %err, "Dropping task row at ingestion");
                    None
                }
            }
        })
        .collect()
}

/// Parse the timestamp shapes the store and its form inputs produce.
///
/// Accepts RFC 3339, naive `YYYY-MM-DDTHH:MM[:SS[.f]]` read as UTC, and a bare
/// date read as midnight UTC.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M") {
        return Ok(naive.and_utc());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map(|date| date.and_time(NaiveTime::MIN).and_utc())
}

fn optional_timestamp(
    field: &'static str,
    value: Option<String>,
) -> Result<Option<DateTime<Utc>>, IngestError> {
    match value {
        None => Ok(None),
        Some(value) if value.trim().is_empty() => Ok(None),
        Some(value) => parse_timestamp(&value)
            .map(Some)
            .map_err(|_| IngestError::InvalidTimestamp { field, value }),
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserMetadata {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: Option<UserMetadata>,
}

impl AuthUser {
    pub fn into_user(self) -> User {
        let name = self.user_metadata.and_then(|meta| meta.name);
        User::new(&self.id, self.email.as_deref().unwrap_or_default(), name.as_deref())
    }
}

/// Response from the password grant (and from sign-up when no confirmation is required).
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub expires_in: i64,
    pub user: AuthUser,
}

impl AuthResponse {
    pub fn into_session(self) -> Session {
        Session {
            access_token: self.access_token,
            expires_at: Utc::now() + chrono::Duration::seconds(self.expires_in),
            user: self.user.into_user(),
        }
    }
}

/// Sign-up returns a session, or only the user when e-mail confirmation is pending.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SignUpResponse {
    Session(AuthResponse),
    Pending(AuthUser),
}

/// Error body shapes used by the REST and auth services.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ApiErrorBody {
    pub fn message(self) -> Option<String> {
        self.message
            .or(self.msg)
            .or(self.error_description)
            .or(self.error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;
    use serde_json::json;

    fn raw(value: serde_json::Value) -> RawTask {
        serde_json::from_value(value).expect("raw task")
    }

    #[rstest]
    #[case("2026-03-01T10:30:00Z", Utc.with_ymd_and_hms(2026, 3, 1, 10, 30, 0).unwrap())]
    #[case("2026-03-01T10:30:00+02:00", Utc.with_ymd_and_hms(2026, 3, 1, 8, 30, 0).unwrap())]
    #[case("2026-03-01T10:30", Utc.with_ymd_and_hms(2026, 3, 1, 10, 30, 0).unwrap())]
    #[case("2026-03-01T10:30:15", Utc.with_ymd_and_hms(2026, 3, 1, 10, 30, 15).unwrap())]
    #[case("2026-03-01", Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap())]
    fn accepts_known_timestamp_shapes(#[case] input: &str, #[case] expected: DateTime<Utc>) {
        assert_eq!(parse_timestamp(input).unwrap(), expected);
    }

    #[rstest]
    #[case("tomorrow")]
    #[case("2026-13-01")]
    #[case("Invalid Date")]
    fn rejects_garbage_timestamps(#[case] input: &str) {
        assert!(parse_timestamp(input).is_err());
    }

    #[test]
    fn defaults_fill_optional_columns() {
        let task = raw(json!({
            "id": 7,
            "title": "Call bank",
            "description": null,
            "status": "pending",
            "user_id": "u1",
            "created_at": "2026-03-01T10:00:00Z",
            "start_date": "",
            "tags": null
        }))
        .into_task()
        .unwrap();

        assert_eq!(task.id.as_str(), "7");
        assert_eq!(task.description, "");
        assert_eq!(task.priority, TaskPriority::Medium);
        assert_eq!(task.start_date, None);
        assert!(task.tags.is_empty());
    }

    #[test]
    fn ingest_drops_invalid_rows_and_keeps_order() {
        let rows = vec![
            raw(json!({"id": "a", "title": "A", "status": "pending", "created_at": "2026-03-02T00:00:00Z"})),
            raw(json!({"id": "b", "title": "B", "status": "archived", "created_at": "2026-03-01T00:00:00Z"})),
            raw(json!({"id": "c", "title": "C", "status": "pending", "created_at": "2026-03-01T00:00:00Z", "end_date": "soon"})),
            raw(json!({"id": "d", "title": "D", "status": "completed", "created_at": "2026-02-28T00:00:00Z"})),
        ];

        let ids: Vec<_> = ingest_tasks(rows).into_iter().map(|t| t.id.to_string()).collect();
        assert_eq!(ids, vec!["a", "d"]);
    }

    #[test]
    fn invalid_end_date_names_the_field() {
        let err = raw(json!({"id": "c", "title": "C", "status": "pending", "created_at": "2026-03-01", "end_date": "soon"}))
            .into_task()
            .unwrap_err();
        assert_eq!(
            err,
            IngestError::InvalidTimestamp {
                field: "end_date",
                value: "soon".to_string()
            }
        );
    }

    #[test]
    fn error_body_prefers_message_fields_in_order() {
        let body: ApiErrorBody =
            serde_json::from_value(json!({"msg": "Invalid login", "error": "invalid_grant"})).unwrap();
        assert_eq!(body.message().as_deref(), Some("Invalid login"));
    }
}
