//! Performance chart route.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use domain::models::TrainingSession;
use domain::services::chart::{
    build_chart, ChartGeometry, ChartMetric, ExerciseFilter, ExerciseMatch, ReferenceToggles,
};
use persistence::repositories::{PlayerRepository, TrainingSessionRepository};
use serde::Deserialize;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{PathParams, QueryParams};
use crate::routes::players::player_not_found;

/// Response representation of a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartFormat {
    #[default]
    Json,
    Svg,
}

/// Query parameters for `GET /api/players/:id/chart`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChartQuery {
    pub metric: Option<ChartMetric>,
    pub exercise_type: Option<String>,
    #[serde(rename = "match")]
    pub match_mode: Option<ExerciseMatch>,
    pub format: Option<ChartFormat>,
    pub show_min: Option<bool>,
    pub show_avg: Option<bool>,
    pub show_max: Option<bool>,
}

impl ChartQuery {
    fn toggles(&self) -> ReferenceToggles {
        let defaults = ReferenceToggles::default();
        ReferenceToggles {
            show_min: self.show_min.unwrap_or(defaults.show_min),
            show_avg: self.show_avg.unwrap_or(defaults.show_avg),
            show_max: self.show_max.unwrap_or(defaults.show_max),
        }
    }

    fn filter(&self) -> Option<ExerciseFilter> {
        self.exercise_type
            .as_deref()
            .and_then(|e| ExerciseFilter::new(e, self.match_mode.unwrap_or_default()))
    }
}

/// Chart a player's sessions for one metric, as JSON or SVG.
///
/// GET /api/players/:id/chart
pub async fn player_chart(
    State(state): State<AppState>,
    PathParams(player_id): PathParams<Uuid>,
    QueryParams(query): QueryParams<ChartQuery>,
) -> Result<Response, ApiError> {
    let players = PlayerRepository::new(state.pool.clone());
    if players.find_by_id(player_id).await?.is_none() {
        return Err(player_not_found());
    }

    let repo = TrainingSessionRepository::new(state.pool.clone());
    let sessions: Vec<TrainingSession> = repo
        .list_for_player(player_id)
        .await?
        .into_iter()
        .map(TrainingSession::from)
        .collect();

    let filter = query.filter();
    let chart = build_chart(
        &sessions,
        query.metric.unwrap_or_default(),
        filter.as_ref(),
        ChartGeometry::default(),
        query.toggles(),
    );

    let response = match query.format.unwrap_or_default() {
        ChartFormat::Json => Json(chart).into_response(),
        ChartFormat::Svg => (
            [(header::CONTENT_TYPE, "image/svg+xml")],
            chart.to_svg(),
        )
            .into_response(),
    };

    Ok(response)
}
