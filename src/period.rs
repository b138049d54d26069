/// Marker for the whole-game aggregate; never rewritten into a number.
pub const FULL_GAME: &str = "FullGame";

const OVERTIME_PREFIX: &str = "OT";
const REGULATION_PERIODS: i64 = 4;

/// Maps a raw period label onto the sequential code stored in `player_stats.period`.
///
/// Quarters stay `1..=4`, numeric overtime codes (`5`, `6`, ...) pass through,
/// `OTn` becomes `n + 4`, and anything else (`FullGame`) is kept verbatim.
pub fn normalize_period(label: &str) -> String {
    if let Ok(num) = label.trim().parse::<i64>() {
        if num > REGULATION_PERIODS {
            return label.to_string();
        }
        return num.to_string();
    }

    if let Some(rest) = label.strip_prefix(OVERTIME_PREFIX)
        && let Ok(ot) = rest.trim().parse::<i64>()
        && let Some(code) = ot.checked_add(REGULATION_PERIODS)
    {
        return code.to_string();
    }

    label.to_string()
}

pub fn is_full_game(period: &str) -> bool {
    period == FULL_GAME
}
