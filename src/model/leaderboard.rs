use serde::Serialize;

/// Stat a leaderboard can be ranked by.
#[derive(
    Debug,
    Clone,
    Copy,
    Hash,
    Eq,
    PartialEq,
    Serialize,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::EnumIter,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LeaderboardStat {
    Wins,
    Finals,
    Kills,
    Deaths,
    Wdmg,
    Wkills,
    Arrowhit,
    Arrowshot,
    Fkdr,
    Kdr,
    Fdr,
    Wdd,
    Wkd,
    Aa,
}

impl LeaderboardStat {
    pub fn title(self) -> &'static str {
        match self {
            LeaderboardStat::Wins => "Wins",
            LeaderboardStat::Finals => "Final Kills",
            LeaderboardStat::Kills => "Kills",
            LeaderboardStat::Deaths => "Deaths",
            LeaderboardStat::Wdmg => "Wither Damage",
            LeaderboardStat::Wkills => "Wither Kills",
            LeaderboardStat::Arrowhit => "Arrows Hit",
            LeaderboardStat::Arrowshot => "Arrows Shot",
            LeaderboardStat::Fkdr => "Final K/D",
            LeaderboardStat::Kdr => "K/D",
            LeaderboardStat::Fdr => "F/D",
            LeaderboardStat::Wdd => "Wither Damage per Death",
            LeaderboardStat::Wkd => "Wither Kills per Death",
            LeaderboardStat::Aa => "Arrow Accuracy",
        }
    }
}

/// Time window of a leaderboard.
#[derive(
    Default,
    Debug,
    Clone,
    Copy,
    Hash,
    Eq,
    PartialEq,
    Serialize,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::EnumIter,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LeaderboardPeriod {
    #[default]
    Lifetime,
    Monthly,
    Weekly,
    Daily,
}

/// One ranked row; position is the index in the returned sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardEntry {
    pub username: String,
    pub value: f64,
}
