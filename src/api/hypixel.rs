use tracing::{debug, instrument};

use crate::api;
use crate::error::{ApiError, Result, Service};
use crate::model::{Counters, GameCountsEnvelope, PlayerEnvelope, Rank, RawPlayer, StatsRecord};

const UNKNOWN_CAUSE: &str = "Unknown error";
const UNKNOWN_NAME: &str = "Unknown";

/// Fetch the raw player object. `Ok(None)` means the service has no record.
#[instrument(skip(client, base_url, api_key))]
pub(crate) async fn fetch_stats(
    client: &reqwest::Client,
    base_url: &str,
    api_key: &str,
    uuid: &str,
) -> Result<Option<RawPlayer>> {
    let url = format!(
        "{base_url}/player?key={api_key}&uuid={}",
        api::compact_uuid(uuid)
    );
    let (status, body) = api::get_text(client, Service::Hypixel, &url).await?;

    if !status.is_success() {
        return Err(status_error(status, &body));
    }

    let envelope: PlayerEnvelope = api::decode(Service::Hypixel, &body, "player envelope")?;
    if !envelope.success {
        return Err(envelope_error(envelope.cause));
    }
    debug!(found = envelope.player.is_some(), "fetched player");
    Ok(envelope.player)
}

/// Fetch the live player count of `mode_key`; a missing key counts as 0.
#[instrument(skip(client, base_url, api_key))]
pub(crate) async fn get_live_player_count(
    client: &reqwest::Client,
    base_url: &str,
    api_key: &str,
    mode_key: &str,
) -> Result<u64> {
    let url = format!("{base_url}/gameCounts?key={api_key}");
    let (status, body) = api::get_text(client, Service::Hypixel, &url).await?;

    if !status.is_success() {
        return Err(status_error(status, &body));
    }

    let envelope: GameCountsEnvelope = api::decode(Service::Hypixel, &body, "counts envelope")?;
    if !envelope.success {
        return Err(envelope_error(envelope.cause));
    }
    let players = envelope.games.get(mode_key).map_or(0, |g| g.players);
    debug!(players, "fetched live player count");
    Ok(players)
}

/// Turn a raw player object into a [`StatsRecord`].
///
/// The `stats.Arcade` section must be present; individual counters default to 0.
pub(crate) fn parse_player(uuid: &str, player: RawPlayer) -> Result<StatsRecord> {
    let arcade = player
        .stats
        .and_then(|s| s.arcade)
        .ok_or_else(|| ApiError::parse(Service::Hypixel, "missing player.stats.Arcade"))?;

    let rank = Rank::derive(
        player.rank.as_deref(),
        player.monthly_package_rank.as_deref(),
        player.new_package_rank.as_deref(),
    );

    let counters = Counters {
        wins: arcade.wins,
        finals: arcade.finals,
        kills: arcade.kills,
        deaths: arcade.deaths,
        wither_damage: arcade.wither_damage,
        wither_kills: arcade.wither_kills,
        arrows_hit: arcade.arrows_hit,
        arrows_shot: arcade.arrows_shot,
    };

    let display_name = player
        .display_name
        .unwrap_or_else(|| UNKNOWN_NAME.to_string());

    Ok(StatsRecord::new(uuid, display_name, rank, counters)
        .with_logins(player.first_login, player.last_login))
}

/// Non-2xx status. The body usually still carries an envelope with a cause.
fn status_error(status: reqwest::StatusCode, body: &str) -> ApiError {
    let cause = serde_json::from_str::<PlayerEnvelope>(body)
        .ok()
        .and_then(|e| e.cause);
    match cause {
        Some(cause) => ApiError::upstream(Service::Hypixel, cause),
        None => ApiError::upstream(Service::Hypixel, format!("HTTP {}", status.as_u16())),
    }
}

fn envelope_error(cause: Option<String>) -> ApiError {
    ApiError::upstream(
        Service::Hypixel,
        cause.unwrap_or_else(|| UNKNOWN_CAUSE.to_string()),
    )
}
