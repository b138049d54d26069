use std::path::PathBuf;

use chrono::NaiveDate;
use rusqlite::Connection;

use nba_box_scores::box_score::{PlayerGameStat, list_games, load_game_box_score};
use nba_box_scores::flatten::RawStatFact;
use nba_box_scores::ingest::{commit_file, ingest_file};
use nba_box_scores::schema::ensure_schema;

fn fixture_store() -> Connection {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push("box_score_0022300901.json");

    let mut conn = Connection::open_in_memory().unwrap();
    ensure_schema(&conn).expect("schema");
    ingest_file(&mut conn, &path, 1000).expect("ingest fixture");
    conn
}

fn fact(team: &str, player: &str, period: &str, stat: &str, value: &str) -> RawStatFact {
    RawStatFact {
        season: "2023-24".to_string(),
        game_id: "0022300777".to_string(),
        game_date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
        team: team.to_string(),
        player_id: player.to_string(),
        player_name: format!("Player {player}"),
        period: period.to_string(),
        stat_name: stat.to_string(),
        stat_value: value.to_string(),
    }
}

fn row<'a>(rows: &'a [PlayerGameStat], entity: &str, period: &str) -> &'a PlayerGameStat {
    rows.iter()
        .find(|r| r.entity_id == entity && r.period == period)
        .unwrap_or_else(|| panic!("missing row {entity}/{period}"))
}

#[test]
fn rebounds_combine_offensive_and_defensive() {
    let conn = fixture_store();
    let rows = load_game_box_score(&conn, "0022300901").expect("box score");
    let tatum_q2 = row(&rows, "1628369", "2");
    assert_eq!(tatum_q2.rebounds, 8);
    assert_eq!(tatum_q2.steals, 2);
    assert_eq!(tatum_q2.minutes.as_deref(), Some("9:45"));
}

#[test]
fn field_goals_merge_two_and_three_point_attempts() {
    let conn = fixture_store();
    let rows = load_game_box_score(&conn, "0022300901").expect("box score");
    let tatum_q1 = row(&rows, "1628369", "1");
    assert_eq!(tatum_q1.fg_made, 4);
    assert_eq!(tatum_q1.fg_attempted, 7);
    assert_eq!(tatum_q1.fg3_made, 2);
    assert_eq!(tatum_q1.fg3_attempted, 3);
    assert_eq!(tatum_q1.plus_minus, None);
}

#[test]
fn full_game_row_sums_periods() {
    let conn = fixture_store();
    let rows = load_game_box_score(&conn, "0022300901").expect("box score");
    let full = row(&rows, "1628369", "FullGame");
    assert_eq!(full.team_id, "BOS");
    assert_eq!(full.points, 28);
    assert_eq!(full.rebounds, 11);
    assert_eq!(full.fg_made, 10);
    assert_eq!(full.fg_attempted, 18);
    assert_eq!(full.fg3_made, 4);
    assert_eq!(full.fg3_attempted, 8);
    assert_eq!(full.ft_made, 4);
    assert_eq!(full.ft_attempted, 4);
    assert_eq!(full.minutes.as_deref(), Some("40:05"));
    assert!(full.starter);
    assert_eq!(full.plus_minus, None);
}

#[test]
fn full_game_is_synthesized_not_copied() {
    let conn = fixture_store();
    let rows = load_game_box_score(&conn, "0022300901").expect("box score");
    let full_rows = rows
        .iter()
        .filter(|r| r.entity_id == "1628369" && r.period == "FullGame")
        .count();
    assert_eq!(full_rows, 1);

    // Raw FullGame facts only carry Minutes and Points; the derived row has the rest.
    let lebron = row(&rows, "2544", "FullGame");
    assert_eq!(lebron.points, 10);
    assert_eq!(lebron.assists, 3);
    assert_eq!(lebron.fg3_made, 1);
    assert_eq!(lebron.minutes.as_deref(), Some("17:00"));
}

#[test]
fn rows_are_ordered_by_team_then_period() {
    let conn = fixture_store();
    let rows = load_game_box_score(&conn, "0022300901").expect("box score");
    assert_eq!(rows.len(), 13);

    let keys = rows
        .iter()
        .map(|r| (r.team_id.as_str(), r.period.as_str(), r.entity_id.as_str()))
        .collect::<Vec<_>>();
    assert_eq!(keys[0], ("BOS", "1", "1628369"));
    assert_eq!(keys[1], ("BOS", "1", "201950"));
    assert_eq!(keys[6], ("BOS", "FullGame", "1628369"));
    assert_eq!(keys[7], ("BOS", "FullGame", "201950"));
    assert_eq!(keys[8], ("LAL", "1", "2544"));
    assert_eq!(keys[10], ("LAL", "5", "2544"));
    assert_eq!(keys[12], ("LAL", "FullGame", "203076"));
}

#[test]
fn starter_flags_top_five_rows_and_full_game_takes_any() {
    let conn = fixture_store();
    let rows = load_game_box_score(&conn, "0022300901").expect("box score");

    // BOS period rows by points: 10, 8, 6, 4 (Tatum) then 2 and 0 (Holiday).
    assert!(row(&rows, "201950", "1").starter);
    assert!(!row(&rows, "201950", "2").starter);
    assert!(row(&rows, "201950", "FullGame").starter);
    assert_eq!(row(&rows, "201950", "FullGame").minutes.as_deref(), Some("18:15"));
    assert_eq!(row(&rows, "201950", "FullGame").turnovers, 1);
}

#[test]
fn starter_ties_break_on_entity_id() {
    let mut conn = Connection::open_in_memory().unwrap();
    ensure_schema(&conn).expect("schema");

    let points = [
        ("101", "20"),
        ("102", "18"),
        ("103", "16"),
        ("104", "14"),
        ("106", "12"),
        ("105", "12"),
    ];
    let facts = points
        .iter()
        .map(|(player, pts)| fact("NYK", player, "1", "Points", pts))
        .collect::<Vec<_>>();
    commit_file(&mut conn, "synthetic.json", &facts, 1000).expect("commit");

    let rows = load_game_box_score(&conn, "0022300777").expect("box score");
    let starters = rows
        .iter()
        .filter(|r| r.period == "1" && r.starter)
        .map(|r| r.entity_id.as_str())
        .collect::<Vec<_>>();
    assert_eq!(starters, vec!["101", "102", "103", "104", "105"]);
    assert!(!row(&rows, "106", "FullGame").starter);
    assert!(row(&rows, "105", "FullGame").starter);
}

#[test]
fn full_game_minutes_are_zero_padded_and_absent_without_minutes() {
    let mut conn = Connection::open_in_memory().unwrap();
    ensure_schema(&conn).expect("schema");
    let facts = vec![
        fact("MIA", "7", "1", "Minutes", "0:40"),
        fact("MIA", "7", "2", "Minutes", "0:25"),
        fact("MIA", "7", "2", "Points", "3"),
        fact("MIA", "8", "1", "Points", "2"),
    ];
    commit_file(&mut conn, "minutes.json", &facts, 1000).expect("commit");

    let rows = load_game_box_score(&conn, "0022300777").expect("box score");
    assert_eq!(row(&rows, "7", "FullGame").minutes.as_deref(), Some("1:05"));
    assert_eq!(row(&rows, "7", "FullGame").points, 3);
    assert_eq!(row(&rows, "8", "1").minutes, None);
    assert_eq!(row(&rows, "8", "FullGame").minutes, None);
}

#[test]
fn float_stat_values_cast_to_integers() {
    let mut conn = Connection::open_in_memory().unwrap();
    ensure_schema(&conn).expect("schema");
    let facts = vec![fact("MIA", "9", "1", "Points", "4.0")];
    commit_file(&mut conn, "floats.json", &facts, 1000).expect("commit");

    let rows = load_game_box_score(&conn, "0022300777").expect("box score");
    assert_eq!(row(&rows, "9", "1").points, 4);
}

#[test]
fn games_are_listed_with_both_teams() {
    let conn = fixture_store();
    let games = list_games(&conn).expect("game list");
    assert_eq!(games.len(), 1);
    assert_eq!(games[0].game_id, "0022300901");
    assert_eq!(games[0].season, "2023-24");
    assert_eq!(games[0].game_date, "2024-03-15");
    assert_eq!(games[0].teams, vec!["BOS", "LAL"]);
}
