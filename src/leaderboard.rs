use async_trait::async_trait;

use crate::error::Result;
use crate::model::{LeaderboardEntry, LeaderboardPeriod, LeaderboardStat};

/// Backing store for ranked leaderboards.
#[async_trait]
pub trait LeaderboardSource: Send + Sync {
    /// Entries ordered best first.
    async fn fetch_leaderboard(
        &self,
        stat: LeaderboardStat,
        period: LeaderboardPeriod,
    ) -> Result<Vec<LeaderboardEntry>>;
}

/// Source used until a leaderboard backend exists; always empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComingSoon;

#[async_trait]
impl LeaderboardSource for ComingSoon {
    async fn fetch_leaderboard(
        &self,
        _stat: LeaderboardStat,
        _period: LeaderboardPeriod,
    ) -> Result<Vec<LeaderboardEntry>> {
        Ok(Vec::new())
    }
}
