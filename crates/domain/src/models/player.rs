//! Player domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A player followed by a coach.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Player {
    pub id: Uuid,
    pub coach_id: Uuid,
    pub user_id: Option<Uuid>,
    pub player_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to add a player to a coach's roster.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlayerRequest {
    pub coach_id: Uuid,

    #[validate(
        length(min = 1, max = 100, message = "Player name must be 1-100 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub player_name: String,

    pub user_id: Option<Uuid>,
}

/// Query for listing a coach's players.
#[derive(Debug, Clone, Deserialize)]
pub struct ListPlayersQuery {
    pub coach: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_player_request_validation() {
        let valid = CreatePlayerRequest {
            coach_id: Uuid::new_v4(),
            player_name: "ZywOo".to_string(),
            user_id: None,
        };
        assert!(valid.validate().is_ok());

        let blank = CreatePlayerRequest {
            coach_id: Uuid::new_v4(),
            player_name: "   ".to_string(),
            user_id: None,
        };
        assert!(blank.validate().is_err());

        let too_long = CreatePlayerRequest {
            coach_id: Uuid::new_v4(),
            player_name: "x".repeat(101),
            user_id: None,
        };
        assert!(too_long.validate().is_err());
    }

    #[test]
    fn test_create_player_request_camel_case() {
        let coach = Uuid::new_v4();
        let request: CreatePlayerRequest = serde_json::from_value(serde_json::json!({
            "coachId": coach,
            "playerName": "ropz",
        }))
        .unwrap();
        assert_eq!(request.coach_id, coach);
        assert!(request.user_id.is_none());
    }
}
