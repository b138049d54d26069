use chrono::NaiveDate;
use serde_json::Value;

use crate::error::{IngestError, Result};
use crate::metadata::{GameMetadata, scalar_text};
use crate::period::normalize_period;

/// Entity id of the team-totals row in every period list.
pub const TEAM_ENTITY_ID: &str = "0";

const ENTITY_ID_FIELD: &str = "EntityId";
const NAME_FIELD: &str = "Name";
pub const MINUTES_STAT: &str = "Minutes";

/// One row of `player_stats`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawStatFact {
    pub season: String,
    pub game_id: String,
    pub game_date: NaiveDate,
    pub team: String,
    pub player_id: String,
    pub player_name: String,
    pub period: String,
    pub stat_name: String,
    pub stat_value: String,
}

/// Turns one team's player list for one period into stat facts.
pub fn flatten(
    period_player_stats: &Value,
    metadata: &GameMetadata,
    team_code: &str,
    period_label: &str,
) -> Result<Vec<RawStatFact>> {
    let players = period_player_stats.as_array().ok_or_else(|| {
        IngestError::malformed(format!(
            "stats for {team_code} period {period_label:?} is not a list"
        ))
    })?;
    let period = normalize_period(period_label);

    let mut out = Vec::new();
    for player in players {
        let fields = player.as_object().ok_or_else(|| {
            IngestError::malformed(format!(
                "player entry in {team_code} period {period_label:?} is not an object"
            ))
        })?;
        let player_id = scalar_text(fields.get(ENTITY_ID_FIELD)).ok_or_else(|| {
            IngestError::malformed(format!(
                "player without {ENTITY_ID_FIELD} in {team_code} period {period_label:?}"
            ))
        })?;
        if player_id == TEAM_ENTITY_ID {
            continue;
        }
        let player_name = fields
            .get(NAME_FIELD)
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                IngestError::malformed(format!("player {player_id} without {NAME_FIELD}"))
            })?;

        let fact = |stat_name: &str, stat_value: String| RawStatFact {
            season: metadata.season.clone(),
            game_id: metadata.game_id.clone(),
            game_date: metadata.game_date,
            team: team_code.to_string(),
            player_id: player_id.clone(),
            player_name: player_name.to_string(),
            period: period.clone(),
            stat_name: stat_name.to_string(),
            stat_value,
        };

        // Only "M:SS" text is kept; a bare number cannot be split into seconds.
        if let Some(minutes) = fields.get(MINUTES_STAT).and_then(|v| v.as_str()) {
            out.push(fact(MINUTES_STAT, minutes.to_string()));
        }

        for (stat_name, value) in fields {
            if stat_name == ENTITY_ID_FIELD || stat_name == MINUTES_STAT {
                continue;
            }
            if let Value::Number(n) = value {
                out.push(fact(stat_name, n.to_string()));
            }
        }
    }
    Ok(out)
}
