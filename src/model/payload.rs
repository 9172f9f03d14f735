//! Wire shapes of the upstream responses.

use std::collections::HashMap;

use serde::Deserialize;

/// Identifier lookup response.
#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
    pub id: String,
}

/// `{success, player?, cause?}` wrapper of the player endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct PlayerEnvelope {
    pub success: bool,
    #[serde(default)]
    pub cause: Option<String>,
    #[serde(default)]
    pub player: Option<RawPlayer>,
}

/// The subset of a player object we read.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPlayer {
    #[serde(default, rename = "displayname")]
    pub display_name: Option<String>,
    #[serde(default)]
    pub rank: Option<String>,
    #[serde(default)]
    pub new_package_rank: Option<String>,
    #[serde(default)]
    pub monthly_package_rank: Option<String>,
    #[serde(default)]
    pub first_login: Option<i64>,
    #[serde(default)]
    pub last_login: Option<i64>,
    #[serde(default)]
    pub stats: Option<RawStats>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawStats {
    #[serde(default, rename = "Arcade")]
    pub arcade: Option<ArcadeStats>,
}

/// Mini Walls counters inside `stats.Arcade`. Counters the player never
/// touched are omitted upstream and read as zero.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ArcadeStats {
    #[serde(rename = "wins_mini_walls")]
    pub wins: u64,
    #[serde(rename = "final_kills_mini_walls")]
    pub finals: u64,
    #[serde(rename = "kills_mini_walls")]
    pub kills: u64,
    #[serde(rename = "deaths_mini_walls")]
    pub deaths: u64,
    #[serde(rename = "wither_damage_mini_walls")]
    pub wither_damage: u64,
    #[serde(rename = "wither_kills_mini_walls")]
    pub wither_kills: u64,
    #[serde(rename = "arrows_hit_mini_walls")]
    pub arrows_hit: u64,
    #[serde(rename = "arrows_shot_mini_walls")]
    pub arrows_shot: u64,
}

/// `{success, games?, cause?}` wrapper of the live counts endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct GameCountsEnvelope {
    pub success: bool,
    #[serde(default)]
    pub cause: Option<String>,
    #[serde(default)]
    pub games: HashMap<String, GameCount>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GameCount {
    #[serde(default)]
    pub players: u64,
}
