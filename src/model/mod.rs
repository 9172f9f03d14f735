mod leaderboard;
mod payload;
mod rank;
mod stats;

pub use leaderboard::*;
pub use payload::*;
pub use rank::*;
pub use stats::*;
