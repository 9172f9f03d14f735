use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::Rank;

/// Raw Mini Walls counters as reported by the stats service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Counters {
    pub wins: u64,
    pub finals: u64,
    pub kills: u64,
    pub deaths: u64,
    pub wither_damage: u64,
    pub wither_kills: u64,
    pub arrows_hit: u64,
    pub arrows_shot: u64,
}

/// One snapshot of a player's Mini Walls statistics.
///
/// Built fresh for every command and never mutated afterwards. Every ratio
/// substitutes 1 for a zero denominator, so a player without deaths reports
/// the raw numerator instead of infinity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsRecord {
    uuid: String,
    display_name: String,
    rank: Rank,
    counters: Counters,
    first_login: Option<i64>,
    last_login: Option<i64>,
}

impl StatsRecord {
    pub fn new(
        uuid: impl Into<String>,
        display_name: impl Into<String>,
        rank: Rank,
        counters: Counters,
    ) -> Self {
        Self {
            uuid: uuid.into(),
            display_name: display_name.into(),
            rank,
            counters,
            first_login: None,
            last_login: None,
        }
    }

    /// Attach login timestamps (epoch milliseconds).
    pub fn with_logins(mut self, first_login: Option<i64>, last_login: Option<i64>) -> Self {
        self.first_login = first_login;
        self.last_login = last_login;
        self
    }

    pub fn uuid(&self) -> &str {
        &self.uuid
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn rank(&self) -> Rank {
        self.rank
    }

    pub fn counters(&self) -> &Counters {
        &self.counters
    }

    pub fn wins(&self) -> u64 {
        self.counters.wins
    }

    pub fn finals(&self) -> u64 {
        self.counters.finals
    }

    pub fn kills(&self) -> u64 {
        self.counters.kills
    }

    /// Finals plus regular kills.
    pub fn kills_overall(&self) -> u64 {
        self.counters.finals.saturating_add(self.counters.kills)
    }

    pub fn deaths(&self) -> u64 {
        self.counters.deaths
    }

    pub fn wither_damage(&self) -> u64 {
        self.counters.wither_damage
    }

    pub fn wither_kills(&self) -> u64 {
        self.counters.wither_kills
    }

    pub fn arrows_hit(&self) -> u64 {
        self.counters.arrows_hit
    }

    pub fn arrows_shot(&self) -> u64 {
        self.counters.arrows_shot
    }

    pub fn first_login(&self) -> Option<DateTime<Utc>> {
        self.first_login.and_then(DateTime::from_timestamp_millis)
    }

    pub fn last_login(&self) -> Option<DateTime<Utc>> {
        self.last_login.and_then(DateTime::from_timestamp_millis)
    }

    pub fn kd_ratio(&self) -> f64 {
        round_to(ratio(self.kills_overall(), self.deaths()), 2)
    }

    pub fn kd_no_finals_ratio(&self) -> f64 {
        round_to(ratio(self.kills(), self.deaths()), 2)
    }

    pub fn fd_ratio(&self) -> f64 {
        round_to(ratio(self.finals(), self.deaths()), 2)
    }

    /// Wither damage per death, whole number.
    pub fn wd_ratio(&self) -> f64 {
        round_to(ratio(self.wither_damage(), self.deaths()), 0)
    }

    pub fn wk_ratio(&self) -> f64 {
        round_to(ratio(self.wither_kills(), self.deaths()), 2)
    }

    /// Percentage of shot arrows that hit.
    pub fn arrow_accuracy(&self) -> f64 {
        round_to(ratio(self.arrows_hit(), self.arrows_shot()) * 100.0, 1)
    }

    pub fn wins_per_death(&self) -> f64 {
        round_to(ratio(self.wins(), self.deaths()), 2)
    }

    /// Wither damage per win, whole number.
    pub fn average_wither_damage(&self) -> f64 {
        round_to(ratio(self.wither_damage(), self.wins()), 0)
    }
}

/// `numerator / max(denominator, 1)`.
pub fn ratio(numerator: u64, denominator: u64) -> f64 {
    numerator as f64 / denominator.max(1) as f64
}

pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
