use anyhow::{Context, Result};
use rusqlite::{Connection, params};
use serde::Serialize;

/// One row of the `player_game_stats` view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerGameStat {
    pub game_id: String,
    pub team_id: String,
    pub entity_id: String,
    pub player_name: String,
    pub period: String,
    pub minutes: Option<String>,
    pub points: i64,
    pub rebounds: i64,
    pub assists: i64,
    pub steals: i64,
    pub blocks: i64,
    pub turnovers: i64,
    pub fg_made: i64,
    pub fg_attempted: i64,
    pub fg3_made: i64,
    pub fg3_attempted: i64,
    pub ft_made: i64,
    pub ft_attempted: i64,
    pub plus_minus: Option<i64>,
    pub starter: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSummary {
    pub game_id: String,
    pub season: String,
    pub game_date: String,
    pub teams: Vec<String>,
}

pub fn load_game_box_score(conn: &Connection, game_id: &str) -> Result<Vec<PlayerGameStat>> {
    let mut stmt = conn
        .prepare(
            r#"
            SELECT
                game_id, team_id, entity_id, player_name, period, minutes,
                points, rebounds, assists, steals, blocks, turnovers,
                fg_made, fg_attempted, fg3_made, fg3_attempted,
                ft_made, ft_attempted, plus_minus, starter
            FROM player_game_stats
            WHERE game_id = ?1
            ORDER BY
                team_id ASC,
                CASE WHEN period = 'FullGame' THEN 1 ELSE 0 END ASC,
                CAST(period AS INTEGER) ASC,
                points DESC,
                entity_id ASC
            "#,
        )
        .context("prepare box score query")?;

    let rows = stmt
        .query_map(params![game_id], |row| {
            Ok(PlayerGameStat {
                game_id: row.get(0)?,
                team_id: row.get(1)?,
                entity_id: row.get(2)?,
                player_name: row.get(3)?,
                period: row.get(4)?,
                minutes: row.get(5)?,
                points: row.get(6)?,
                rebounds: row.get(7)?,
                assists: row.get(8)?,
                steals: row.get(9)?,
                blocks: row.get(10)?,
                turnovers: row.get(11)?,
                fg_made: row.get(12)?,
                fg_attempted: row.get(13)?,
                fg3_made: row.get(14)?,
                fg3_attempted: row.get(15)?,
                ft_made: row.get(16)?,
                ft_attempted: row.get(17)?,
                plus_minus: row.get(18)?,
                starter: row.get::<_, i64>(19)? != 0,
            })
        })
        .context("query box score")?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row.context("decode box score row")?);
    }
    Ok(out)
}

pub fn list_games(conn: &Connection) -> Result<Vec<GameSummary>> {
    let mut stmt = conn
        .prepare(
            r#"
            SELECT game_id, season, game_date, group_concat(DISTINCT team)
            FROM player_stats
            GROUP BY game_id, season, game_date
            ORDER BY game_date ASC, game_id ASC
            "#,
        )
        .context("prepare game list query")?;

    let rows = stmt
        .query_map([], |row| {
            let teams: Option<String> = row.get(3)?;
            let mut teams = teams
                .unwrap_or_default()
                .split(',')
                .filter(|t| !t.is_empty())
                .map(|t| t.to_string())
                .collect::<Vec<_>>();
            teams.sort();
            Ok(GameSummary {
                game_id: row.get(0)?,
                season: row.get(1)?,
                game_date: row.get(2)?,
                teams,
            })
        })
        .context("query game list")?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row.context("decode game row")?);
    }
    Ok(out)
}
