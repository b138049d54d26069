use rusqlite::Connection;
use tracing::debug;

use crate::error::{IngestError, Result};

pub const FACT_TABLE: &str = "player_stats";
pub const LEDGER_TABLE: &str = "processed_files";
pub const PLAYER_GAME_VIEW: &str = "player_game_stats";

const TABLES_DDL: &str = r#"
    CREATE TABLE IF NOT EXISTS player_stats (
        season TEXT NOT NULL,
        game_id TEXT NOT NULL,
        game_date TEXT NOT NULL,
        team TEXT NOT NULL,
        player_id TEXT NOT NULL,
        player_name TEXT NOT NULL,
        period TEXT NOT NULL,
        stat_name TEXT NOT NULL,
        stat_value TEXT NOT NULL,
        PRIMARY KEY (game_id, player_id, period, stat_name)
    );
    CREATE INDEX IF NOT EXISTS idx_player_stats_game_team ON player_stats(game_id, team);
    CREATE INDEX IF NOT EXISTS idx_player_stats_season ON player_stats(season);

    CREATE TABLE IF NOT EXISTS processed_files (
        file_name TEXT PRIMARY KEY,
        processed_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
    );
"#;

// Long-to-wide pivot. Starter ranks every non-FullGame row of a (game, team)
// by points; equal points fall back to entity id, then period.
const VIEW_DDL: &str = r#"
    DROP VIEW IF EXISTS player_game_stats;
    CREATE VIEW player_game_stats AS
    WITH period_stats AS (
        SELECT
            game_id,
            team AS team_id,
            player_id AS entity_id,
            player_name,
            period,
            MAX(CASE WHEN stat_name = 'Minutes' THEN stat_value END) AS minutes,
            CAST(COALESCE(MAX(CASE WHEN stat_name = 'Points' THEN stat_value END), '0') AS INTEGER) AS points,
            CAST(COALESCE(MAX(CASE WHEN stat_name = 'OffRebounds' THEN stat_value END), '0') AS INTEGER)
                + CAST(COALESCE(MAX(CASE WHEN stat_name = 'DefRebounds' THEN stat_value END), '0') AS INTEGER) AS rebounds,
            CAST(COALESCE(MAX(CASE WHEN stat_name = 'Assists' THEN stat_value END), '0') AS INTEGER) AS assists,
            CAST(COALESCE(MAX(CASE WHEN stat_name = 'Steals' THEN stat_value END), '0') AS INTEGER) AS steals,
            CAST(COALESCE(MAX(CASE WHEN stat_name = 'Blocks' THEN stat_value END), '0') AS INTEGER) AS blocks,
            CAST(COALESCE(MAX(CASE WHEN stat_name = 'Turnovers' THEN stat_value END), '0') AS INTEGER) AS turnovers,
            CAST(COALESCE(MAX(CASE WHEN stat_name = 'FG2M' THEN stat_value END), '0') AS INTEGER)
                + CAST(COALESCE(MAX(CASE WHEN stat_name = 'FG3M' THEN stat_value END), '0') AS INTEGER) AS fg_made,
            CAST(COALESCE(MAX(CASE WHEN stat_name = 'FG2A' THEN stat_value END), '0') AS INTEGER)
                + CAST(COALESCE(MAX(CASE WHEN stat_name = 'FG3A' THEN stat_value END), '0') AS INTEGER) AS fg_attempted,
            CAST(COALESCE(MAX(CASE WHEN stat_name = 'FG3M' THEN stat_value END), '0') AS INTEGER) AS fg3_made,
            CAST(COALESCE(MAX(CASE WHEN stat_name = 'FG3A' THEN stat_value END), '0') AS INTEGER) AS fg3_attempted,
            CAST(COALESCE(MAX(CASE WHEN stat_name = 'FtPoints' THEN stat_value END), '0') AS INTEGER) AS ft_made,
            CAST(COALESCE(MAX(CASE WHEN stat_name = 'FTA' THEN stat_value END), '0') AS INTEGER) AS ft_attempted,
            NULL AS plus_minus
        FROM player_stats
        WHERE player_id != '0'
        GROUP BY game_id, team, player_id, player_name, period
    ),
    period_stats_with_starter AS (
        SELECT
            ps.*,
            CASE
                WHEN ROW_NUMBER() OVER (
                    PARTITION BY game_id, team_id
                    ORDER BY points DESC, entity_id ASC, period ASC
                ) <= 5 THEN 1
                ELSE 0
            END AS starter
        FROM period_stats ps
        WHERE period != 'FullGame'
    ),
    full_game AS (
        SELECT
            game_id,
            team_id,
            entity_id,
            player_name,
            SUM(
                CAST(substr(minutes, 1, instr(minutes, ':') - 1) AS INTEGER) * 60
                + CAST(substr(minutes, instr(minutes, ':') + 1) AS INTEGER)
            ) AS seconds,
            SUM(points) AS points,
            SUM(rebounds) AS rebounds,
            SUM(assists) AS assists,
            SUM(steals) AS steals,
            SUM(blocks) AS blocks,
            SUM(turnovers) AS turnovers,
            SUM(fg_made) AS fg_made,
            SUM(fg_attempted) AS fg_attempted,
            SUM(fg3_made) AS fg3_made,
            SUM(fg3_attempted) AS fg3_attempted,
            SUM(ft_made) AS ft_made,
            SUM(ft_attempted) AS ft_attempted,
            MAX(starter) AS starter
        FROM period_stats_with_starter
        GROUP BY game_id, team_id, entity_id, player_name
    )
    SELECT * FROM period_stats_with_starter
    UNION ALL
    SELECT
        game_id,
        team_id,
        entity_id,
        player_name,
        'FullGame' AS period,
        CASE
            WHEN seconds IS NULL THEN NULL
            ELSE printf('%d:%02d', seconds / 60, seconds % 60)
        END AS minutes,
        points,
        rebounds,
        assists,
        steals,
        blocks,
        turnovers,
        fg_made,
        fg_attempted,
        fg3_made,
        fg3_attempted,
        ft_made,
        ft_attempted,
        NULL AS plus_minus,
        starter
    FROM full_game;
"#;

/// Creates the fact table and ledger if missing and rebuilds the derived view.
pub fn ensure_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(TABLES_DDL).map_err(IngestError::Schema)?;
    conn.execute_batch(VIEW_DDL).map_err(IngestError::Schema)?;
    debug!("schema ready: {FACT_TABLE}, {LEDGER_TABLE}, {PLAYER_GAME_VIEW}");
    Ok(())
}
