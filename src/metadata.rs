use chrono::{Datelike, NaiveDate};
use serde_json::Value;

use crate::error::{IngestError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameMetadata {
    pub game_id: String,
    pub season: String,
    pub game_date: NaiveDate,
    pub away_team: String,
    pub home_team: String,
}

impl GameMetadata {
    /// Resolves a box-score side key (`Away`, `Home`, any case) to its team code.
    pub fn team_for_side(&self, side: &str) -> Option<&str> {
        match side.to_ascii_lowercase().as_str() {
            "away" => Some(self.away_team.as_str()),
            "home" => Some(self.home_team.as_str()),
            _ => None,
        }
    }
}

/// Reads identifiers, date and season from the `game` object of a box-score document.
pub fn extract_metadata(game: &Value) -> Result<GameMetadata> {
    let game_id = scalar_text(game.get("gameId")).ok_or_else(|| missing("game.gameId"))?;

    let raw_date = game
        .get("gameDateEst")
        .and_then(|v| v.as_str())
        .ok_or_else(|| missing("game.gameDateEst"))?;
    let game_date = parse_game_date(raw_date)?;

    let away_team = team_code(game, "awayTeam")?;
    let home_team = team_code(game, "homeTeam")?;

    Ok(GameMetadata {
        game_id,
        season: season_label(game_date.year()),
        game_date,
        away_team,
        home_team,
    })
}

/// A game played in calendar year `Y` belongs to the season that started in `Y - 1`.
pub fn season_label(year: i32) -> String {
    format!("{}-{:02}", year - 1, year.rem_euclid(100))
}

fn parse_game_date(raw: &str) -> Result<NaiveDate> {
    let head = raw
        .get(..10)
        .ok_or_else(|| IngestError::malformed(format!("game.gameDateEst too short: {raw:?}")))?;
    NaiveDate::parse_from_str(head, "%Y-%m-%d").map_err(|err| {
        IngestError::malformed(format!("game.gameDateEst not a date ({raw:?}): {err}"))
    })
}

fn team_code(game: &Value, key: &str) -> Result<String> {
    game.get(key)
        .and_then(|team| team.get("teamTricode"))
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| missing(&format!("game.{key}.teamTricode")))
}

pub(crate) fn scalar_text(v: Option<&Value>) -> Option<String> {
    match v? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn missing(field: &str) -> IngestError {
    IngestError::malformed(format!("missing {field}"))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use serde_json::json;

    use super::{extract_metadata, season_label};
    use crate::error::IngestError;

    fn game() -> serde_json::Value {
        json!({
            "gameId": "0022300901",
            "gameDateEst": "2024-03-15T00:00:00Z",
            "awayTeam": { "teamTricode": "BOS", "teamId": 1610612738 },
            "homeTeam": { "teamTricode": "LAL", "teamId": 1610612747 }
        })
    }

    #[test]
    fn extracts_all_fields() {
        let meta = extract_metadata(&game()).expect("valid game");
        assert_eq!(meta.game_id, "0022300901");
        assert_eq!(meta.season, "2023-24");
        assert_eq!(meta.game_date, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        assert_eq!(meta.away_team, "BOS");
        assert_eq!(meta.home_team, "LAL");
        assert_eq!(meta.team_for_side("Away"), Some("BOS"));
        assert_eq!(meta.team_for_side("HOME"), Some("LAL"));
        assert_eq!(meta.team_for_side("Neutral"), None);
    }

    #[test]
    fn season_uses_previous_year_as_start() {
        assert_eq!(season_label(2024), "2023-24");
        assert_eq!(season_label(2000), "1999-00");
        assert_eq!(season_label(2009), "2008-09");
    }

    #[test]
    fn season_follows_calendar_year_even_in_autumn() {
        let mut g = game();
        g["gameDateEst"] = json!("2023-10-24T00:00:00Z");
        let meta = extract_metadata(&g).expect("valid game");
        assert_eq!(meta.season, "2022-23");
    }

    #[test]
    fn missing_team_is_malformed() {
        let mut g = game();
        g.as_object_mut().unwrap().remove("homeTeam");
        let err = extract_metadata(&g).unwrap_err();
        assert!(matches!(err, IngestError::MalformedDocument(ref m) if m.contains("homeTeam")));
    }

    #[test]
    fn bad_date_is_malformed() {
        let mut g = game();
        g["gameDateEst"] = json!("2024-13-40");
        assert!(matches!(
            extract_metadata(&g),
            Err(IngestError::MalformedDocument(_))
        ));
        g["gameDateEst"] = json!("2024");
        assert!(matches!(
            extract_metadata(&g),
            Err(IngestError::MalformedDocument(_))
        ));
    }
}
