//! Training session domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// One logged practice session for a player.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TrainingSession {
    pub id: Uuid,
    pub player_id: Uuid,
    pub session_date: DateTime<Utc>,
    pub hs_rate: f64,
    pub kills: i32,
    pub deaths: i32,
    pub accuracy: Option<f64>,
    pub map_name: String,
    pub duration_minutes: Option<i32>,
    pub notes: Option<String>,
    pub exercise_type: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Request to log a session. `hs_rate`, `kills`, `deaths` and `map_name` are required.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateSessionRequest {
    pub session_date: Option<DateTime<Utc>>,

    #[validate(
        required(message = "hs_rate is required"),
        custom(function = "shared::validation::validate_percentage")
    )]
    pub hs_rate: Option<f64>,

    #[validate(
        required(message = "kills is required"),
        custom(function = "shared::validation::validate_count")
    )]
    pub kills: Option<i32>,

    #[validate(
        required(message = "deaths is required"),
        custom(function = "shared::validation::validate_count")
    )]
    pub deaths: Option<i32>,

    #[validate(custom(function = "shared::validation::validate_percentage"))]
    pub accuracy: Option<f64>,

    #[validate(
        required(message = "map_name is required"),
        length(min = 1, max = 50, message = "map_name must be 1-50 characters")
    )]
    pub map_name: Option<String>,

    #[validate(custom(function = "shared::validation::validate_duration_minutes"))]
    pub duration_minutes: Option<i32>,

    #[validate(length(max = 2000, message = "notes must be at most 2000 characters"))]
    pub notes: Option<String>,

    #[validate(length(max = 50, message = "exercise_type must be at most 50 characters"))]
    pub exercise_type: Option<String>,
}

/// Validated fields for inserting a session.
#[derive(Debug, Clone)]
pub struct NewTrainingSession {
    pub session_date: DateTime<Utc>,
    pub hs_rate: f64,
    pub kills: i32,
    pub deaths: i32,
    pub accuracy: Option<f64>,
    pub map_name: String,
    pub duration_minutes: Option<i32>,
    pub notes: Option<String>,
    pub exercise_type: Option<String>,
}

impl CreateSessionRequest {
    /// Converts a validated request, defaulting `session_date` to `now`.
    ///
    /// Returns `None` if a required field is missing; call `validate()` first
    /// to get a descriptive error.
    pub fn into_new_session(self, now: DateTime<Utc>) -> Option<NewTrainingSession> {
        Some(NewTrainingSession {
            session_date: self.session_date.unwrap_or(now),
            hs_rate: self.hs_rate?,
            kills: self.kills?,
            deaths: self.deaths?,
            accuracy: self.accuracy,
            map_name: self.map_name?.trim().to_string(),
            duration_minutes: self.duration_minutes,
            notes: self.notes,
            exercise_type: non_blank(self.exercise_type),
        })
    }
}

/// Partial update of a session; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateSessionRequest {
    pub session_date: Option<DateTime<Utc>>,

    #[validate(custom(function = "shared::validation::validate_percentage"))]
    pub hs_rate: Option<f64>,

    #[validate(custom(function = "shared::validation::validate_count"))]
    pub kills: Option<i32>,

    #[validate(custom(function = "shared::validation::validate_count"))]
    pub deaths: Option<i32>,

    #[validate(custom(function = "shared::validation::validate_percentage"))]
    pub accuracy: Option<f64>,

    #[validate(length(min = 1, max = 50, message = "map_name must be 1-50 characters"))]
    pub map_name: Option<String>,

    #[validate(custom(function = "shared::validation::validate_duration_minutes"))]
    pub duration_minutes: Option<i32>,

    #[validate(length(max = 2000, message = "notes must be at most 2000 characters"))]
    pub notes: Option<String>,

    #[validate(length(max = 50, message = "exercise_type must be at most 50 characters"))]
    pub exercise_type: Option<String>,
}

impl UpdateSessionRequest {
    /// Applies the update onto an existing session.
    pub fn apply_to(self, session: &mut TrainingSession) {
        if let Some(date) = self.session_date {
            session.session_date = date;
        }
        if let Some(hs_rate) = self.hs_rate {
            session.hs_rate = hs_rate;
        }
        if let Some(kills) = self.kills {
            session.kills = kills;
        }
        if let Some(deaths) = self.deaths {
            session.deaths = deaths;
        }
        if self.accuracy.is_some() {
            session.accuracy = self.accuracy;
        }
        if let Some(map_name) = self.map_name {
            session.map_name = map_name.trim().to_string();
        }
        if self.duration_minutes.is_some() {
            session.duration_minutes = self.duration_minutes;
        }
        if self.notes.is_some() {
            session.notes = self.notes;
        }
        if self.exercise_type.is_some() {
            session.exercise_type = non_blank(self.exercise_type);
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
