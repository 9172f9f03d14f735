//! Prefix command parsing and dispatch.

use std::sync::Arc;

use itertools::Itertools;
use strum::IntoEnumIterator;
use tracing::{debug, error, instrument, warn};

use crate::client::StatsClient;
use crate::config::BotConfig;
use crate::embed::{Embed, Formatter};
use crate::error::CommandError;
use crate::leaderboard::{ComingSoon, LeaderboardSource};
use crate::model::{LeaderboardPeriod, LeaderboardStat};

const FLAG_MARKER: char = '-';
const EXTENDED_FLAGS: [&str; 2] = ["ext", "extended"];

/// Canonical command, parsed from any of its aliases.
#[derive(
    Debug,
    Clone,
    Copy,
    Hash,
    Eq,
    PartialEq,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum CommandKind {
    #[strum(to_string = "stats", serialize = "s")]
    Stats,
    #[strum(to_string = "compare", serialize = "c", serialize = "vs")]
    Compare,
    #[strum(to_string = "playercount", serialize = "pc", serialize = "players")]
    PlayerCount,
    #[strum(to_string = "leaderboard", serialize = "lb", serialize = "top")]
    Leaderboard,
    #[strum(to_string = "help", serialize = "h")]
    Help,
}

impl CommandKind {
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            CommandKind::Stats => &["s", "stats"],
            CommandKind::Compare => &["c", "compare", "vs"],
            CommandKind::PlayerCount => &["pc", "players", "playercount"],
            CommandKind::Leaderboard => &["lb", "top", "leaderboard"],
            CommandKind::Help => &["help", "h"],
        }
    }

    pub fn usage(self, prefix: &str) -> String {
        match self {
            CommandKind::Stats => format!("{prefix}s <username> [-ext]"),
            CommandKind::Compare => format!("{prefix}c <username1> <username2>"),
            CommandKind::PlayerCount => format!("{prefix}pc"),
            CommandKind::Leaderboard => format!("{prefix}lb <stat> [period]"),
            CommandKind::Help => format!("{prefix}help [command]"),
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            CommandKind::Stats => "Display detailed Mini Walls statistics for a player",
            CommandKind::Compare => "Compare statistics between two players",
            CommandKind::PlayerCount => "Show current Mini Walls player count",
            CommandKind::Leaderboard => "View leaderboards (coming soon)",
            CommandKind::Help => "Show this help message or details about a specific command",
        }
    }
}

/// A tokenized command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedCommand {
    /// Lower-cased command name without the prefix.
    pub name: String,
    pub args: Vec<String>,
    /// Lower-cased flags without the marker.
    pub flags: Vec<String>,
}

impl ParsedCommand {
    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.iter().any(|f| f == flag)
    }
}

/// Split `content` into command name, positional args and flags.
///
/// Returns `None` when `content` does not start with `prefix` or carries no command name.
pub fn parse(prefix: &str, content: &str) -> Option<ParsedCommand> {
    let rest = content.trim().strip_prefix(prefix)?;
    let mut tokens = rest.split_whitespace();
    let name = tokens.next()?.to_lowercase();

    let (flags, args): (Vec<_>, Vec<_>) = tokens.partition(|t| t.starts_with(FLAG_MARKER));
    let flags = flags
        .into_iter()
        .map(|f| f.trim_start_matches(FLAG_MARKER).to_lowercase())
        .filter(|f| !f.is_empty())
        .collect();
    let args = args.into_iter().map(str::to_string).collect();

    Some(ParsedCommand { name, args, flags })
}

/// Routes parsed commands to their handlers and turns every outcome into a reply.
pub struct CommandRouter {
    client: StatsClient,
    leaderboard: Arc<dyn LeaderboardSource>,
    formatter: Formatter,
    prefix: String,
}

impl CommandRouter {
    pub fn new(client: StatsClient, formatter: Formatter, prefix: impl Into<String>) -> Self {
        Self {
            client,
            leaderboard: Arc::new(ComingSoon),
            formatter,
            prefix: prefix.into(),
        }
    }

    pub fn from_config(config: &BotConfig) -> reqwest::Result<Self> {
        let client = StatsClient::new(config.api.clone())?;
        let formatter = Formatter::new(config.embed, config.discord.prefix.clone());
        Ok(Self::new(client, formatter, config.discord.prefix.clone()))
    }

    pub fn with_leaderboard(mut self, source: Arc<dyn LeaderboardSource>) -> Self {
        self.leaderboard = source;
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn formatter(&self) -> &Formatter {
        &self.formatter
    }

    /// Handle one chat message. `None` when the message is not a known command.
    #[instrument(skip(self))]
    pub async fn handle(&self, content: &str) -> Option<Embed> {
        let parsed = parse(&self.prefix, content)?;
        let Ok(kind) = parsed.name.parse::<CommandKind>() else {
            debug!(name = %parsed.name, "ignoring unknown command");
            return None;
        };

        let reply = match self.dispatch(kind, &parsed).await {
            Ok(embed) => embed,
            Err(CommandError::Usage(message)) => self.formatter.usage_error(&message),
            Err(CommandError::Api(err)) => {
                warn!(%kind, error = %err, "command failed");
                self.formatter.upstream_error(&err.to_string())
            }
        };
        Some(reply)
    }

    /// Like [`handle`](Self::handle), but a panic while handling becomes the
    /// generic error reply instead of reaching the caller.
    pub async fn handle_guarded(self: &Arc<Self>, content: &str) -> Option<Embed> {
        let router = Arc::clone(self);
        let content = content.to_string();
        match tokio::spawn(async move { router.handle(&content).await }).await {
            Ok(reply) => reply,
            Err(err) => {
                error!(error = %err, "command task failed");
                Some(self.formatter.unexpected_error())
            }
        }
    }

    pub async fn dispatch(
        &self,
        kind: CommandKind,
        parsed: &ParsedCommand,
    ) -> Result<Embed, CommandError> {
        match kind {
            CommandKind::Stats => self.stats(parsed).await,
            CommandKind::Compare => self.compare(parsed).await,
            CommandKind::PlayerCount => self.player_count().await,
            CommandKind::Leaderboard => self.leaderboard(parsed).await,
            CommandKind::Help => self.help(parsed),
        }
    }

    async fn stats(&self, parsed: &ParsedCommand) -> Result<Embed, CommandError> {
        let Some(username) = parsed.args.first() else {
            return Err(CommandError::Usage(format!(
                "Please provide a username. Usage: `{p}s <username>` or `{p}s <username> -ext`",
                p = self.prefix
            )));
        };
        let extended = EXTENDED_FLAGS.iter().any(|f| parsed.has_flag(f));

        Ok(match self.client.get_player_stats(username).await? {
            Some(stats) => self.formatter.stats(&stats, extended),
            None => self.formatter.not_found(username),
        })
    }

    async fn compare(&self, parsed: &ParsedCommand) -> Result<Embed, CommandError> {
        let [first, second] = parsed.args.as_slice() else {
            return Err(CommandError::Usage(format!(
                "Please provide exactly two usernames. Usage: `{}`",
                CommandKind::Compare.usage(&self.prefix)
            )));
        };

        let Some(first_stats) = self.client.get_player_stats(first).await? else {
            return Ok(self.formatter.not_found(first));
        };
        let Some(second_stats) = self.client.get_player_stats(second).await? else {
            return Ok(self.formatter.not_found(second));
        };
        Ok(self.formatter.comparison(&first_stats, &second_stats))
    }

    async fn player_count(&self) -> Result<Embed, CommandError> {
        let count = self.client.get_live_player_count().await?;
        Ok(self.formatter.player_count(count))
    }

    async fn leaderboard(&self, parsed: &ParsedCommand) -> Result<Embed, CommandError> {
        let (stat, period) = match parsed.args.as_slice() {
            [stat] => (stat, None),
            [stat, period] => (stat, Some(period)),
            _ => {
                return Err(CommandError::Usage(format!(
                    "Please provide a valid command. Usage: `{}`",
                    CommandKind::Leaderboard.usage(&self.prefix)
                )))
            }
        };

        let stat: LeaderboardStat = stat.parse().map_err(|_| {
            CommandError::Usage(format!(
                "Invalid stat. Valid stats are: {}",
                LeaderboardStat::iter().join(", ")
            ))
        })?;
        let period: LeaderboardPeriod = match period {
            Some(p) => p.parse().map_err(|_| {
                CommandError::Usage(format!(
                    "Invalid period. Valid periods are: {}",
                    LeaderboardPeriod::iter().join(", ")
                ))
            })?,
            None => LeaderboardPeriod::default(),
        };

        let entries = self.leaderboard.fetch_leaderboard(stat, period).await?;
        Ok(self.formatter.leaderboard(stat, period, &entries))
    }

    fn help(&self, parsed: &ParsedCommand) -> Result<Embed, CommandError> {
        match parsed.args.as_slice() {
            [] => Ok(self.formatter.help(&CommandKind::iter().collect_vec())),
            [name] => {
                let bare = name.strip_prefix(self.prefix.as_str()).unwrap_or(name);
                bare.parse::<CommandKind>()
                    .map(|kind| self.formatter.help_for(kind))
                    .map_err(|_| {
                        CommandError::Usage(format!(
                            "Unknown command `{name}`. Use `{}help` to list commands.",
                            self.prefix
                        ))
                    })
            }
            _ => Err(CommandError::Usage(format!(
                "Usage: `{}`",
                CommandKind::Help.usage(&self.prefix)
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::api::stub::{serve, Route};
    use crate::client::tests::{client_for, player_body, UUID};
    use crate::config::{ApiConfig, EmbedConfig};
    use crate::model::LeaderboardEntry;

    fn router(base: &str) -> CommandRouter {
        CommandRouter::new(
            client_for(base),
            Formatter::new(EmbedConfig::default(), "."),
            ".",
        )
    }

    // Nothing listens here; handlers that must not reach the network use it.
    fn offline_router() -> CommandRouter {
        router("http://127.0.0.1:9")
    }

    #[test]
    fn test_parse_command() {
        let parsed = parse(".", ".S Notch -EXT other").unwrap();
        assert_eq!(
            parsed,
            ParsedCommand {
                name: "s".into(),
                args: vec!["Notch".into(), "other".into()],
                flags: vec!["ext".into()],
            }
        );
    }

    #[test]
    fn test_parse_keeps_arg_order_and_case() {
        let parsed = parse("!", "  !vs Bob -x alice  ").unwrap();
        assert_eq!(parsed.name, "vs");
        assert_eq!(parsed.args, vec!["Bob", "alice"]);
        assert_eq!(parsed.flags, vec!["x"]);
    }

    #[test]
    fn test_parse_rejects_unprefixed_and_empty() {
        assert!(parse(".", "s Notch").is_none());
        assert!(parse(".", ".").is_none());
        assert!(parse(".", "   ").is_none());
        assert_eq!(parse(".", ". help").unwrap().name, "help");
    }

    #[test]
    fn test_aliases() {
        for (alias, kind) in [
            ("s", CommandKind::Stats),
            ("STATS", CommandKind::Stats),
            ("c", CommandKind::Compare),
            ("compare", CommandKind::Compare),
            ("vs", CommandKind::Compare),
            ("pc", CommandKind::PlayerCount),
            ("players", CommandKind::PlayerCount),
            ("playercount", CommandKind::PlayerCount),
            ("lb", CommandKind::Leaderboard),
            ("top", CommandKind::Leaderboard),
            ("leaderboard", CommandKind::Leaderboard),
            ("help", CommandKind::Help),
            ("h", CommandKind::Help),
        ] {
            assert_eq!(alias.parse::<CommandKind>().unwrap(), kind, "alias {alias}");
        }
        assert!("stat".parse::<CommandKind>().is_err());

        for kind in CommandKind::iter() {
            for alias in kind.aliases() {
                assert_eq!(alias.parse::<CommandKind>().unwrap(), kind);
            }
        }
    }

    #[tokio::test]
    async fn test_unknown_and_plain_messages_are_ignored() {
        let router = offline_router();
        assert!(router.handle("hello there").await.is_none());
        assert!(router.handle(".dance").await.is_none());
    }

    #[tokio::test]
    async fn test_stats_without_username() {
        let reply = offline_router().handle(".s").await.unwrap();
        let text = reply.description.unwrap();
        assert!(text.contains("Please provide a username"));
        assert!(text.contains("`.s <username>`"));
    }

    #[tokio::test]
    async fn test_compare_needs_two_usernames() {
        for content in [".c alice", ".compare", ".vs a b c"] {
            let reply = offline_router().handle(content).await.unwrap();
            let text = reply.description.unwrap();
            assert!(text.contains("exactly two usernames"), "{content}: {text}");
            assert!(text.contains("`.c <username1> <username2>`"), "{content}: {text}");
        }
    }

    #[tokio::test]
    async fn test_stats_player_not_found() {
        let base = serve(vec![Route::new("/users/profiles/minecraft/", 404, "")]).await;

        let reply = router(&base).handle(".s ghost").await.unwrap();
        assert_eq!(reply.title, "Player not found");
        assert!(reply.description.unwrap().contains("'ghost' not found"));
    }

    #[tokio::test]
    async fn test_stats_found() {
        let base = serve(vec![
            Route::new("/users/profiles/minecraft/", 200, format!(r#"{{"id":"{UUID}"}}"#)),
            Route::new("/player", 200, player_body("Walls", 10, 5)),
        ])
        .await;

        let reply = router(&base).handle(".stats walls -extended").await.unwrap();
        assert_eq!(reply.title, "🟩 [VIP] Walls");
        assert!(reply.field_value("🎮 Game Impact").is_some());
    }

    #[tokio::test]
    async fn test_upstream_failure_reply_includes_cause() {
        let base = serve(vec![
            Route::new("/users/profiles/minecraft/", 200, format!(r#"{{"id":"{UUID}"}}"#)),
            Route::new("/player", 403, r#"{"success":false,"cause":"Invalid API key"}"#),
        ])
        .await;

        let reply = router(&base).handle(".s Walls").await.unwrap();
        assert_eq!(reply.color, EmbedConfig::default().error_color);
        assert!(reply.description.unwrap().contains("Invalid API key"));
    }

    #[tokio::test]
    async fn test_compare_second_player_missing() {
        let base = serve(vec![
            Route::new("/users/profiles/minecraft/alice", 200, format!(r#"{{"id":"{UUID}"}}"#)),
            Route::new("/users/profiles/minecraft/", 404, ""),
            Route::new("/player", 200, player_body("alice", 10, 5)),
        ])
        .await;

        let reply = router(&base).handle(".c alice bob").await.unwrap();
        assert!(reply.description.unwrap().contains("'bob' not found"));
    }

    #[tokio::test]
    async fn test_compare_found() {
        let base = serve(vec![
            Route::new("/users/profiles/minecraft/", 200, format!(r#"{{"id":"{UUID}"}}"#)),
            Route::new("/player", 200, player_body("Twin", 10, 5)),
        ])
        .await;

        let reply = router(&base).handle(".vs a b").await.unwrap();
        assert_eq!(reply.title, "⚔️ Battle Analysis");
        assert!(reply.field_value("🥊 Battle Results").unwrap().contains("(0-0-12)"));
    }

    #[tokio::test]
    async fn test_player_count() {
        let base = serve(vec![Route::new(
            "/gameCounts",
            200,
            r#"{"success":true,"games":{"MINI_WALLS":{"players":160}}}"#,
        )])
        .await;

        let reply = router(&base).handle(".players").await.unwrap();
        assert!(reply.description.unwrap().contains("**160**"));
    }

    #[tokio::test]
    async fn test_leaderboard_validation() {
        let router = offline_router();

        let reply = router.handle(".lb").await.unwrap();
        assert!(reply.description.unwrap().contains("`.lb <stat> [period]`"));

        let reply = router.handle(".lb coins").await.unwrap();
        let text = reply.description.unwrap();
        assert!(text.contains("Invalid stat"));
        assert!(text.contains("wins, finals, kills"));

        let reply = router.handle(".top wins yearly").await.unwrap();
        assert!(reply.description.unwrap().contains("Invalid period"));

        let reply = router.handle(".lb wins").await.unwrap();
        assert!(reply.description.unwrap().contains("coming soon"));
    }

    struct Fixed;

    #[async_trait]
    impl LeaderboardSource for Fixed {
        async fn fetch_leaderboard(
            &self,
            stat: LeaderboardStat,
            period: LeaderboardPeriod,
        ) -> crate::Result<Vec<LeaderboardEntry>> {
            assert_eq!(stat, LeaderboardStat::Fkdr);
            assert_eq!(period, LeaderboardPeriod::Monthly);
            Ok(vec![LeaderboardEntry {
                username: "Leader".into(),
                value: 4.5,
            }])
        }
    }

    #[tokio::test]
    async fn test_leaderboard_uses_source() {
        let router = offline_router().with_leaderboard(Arc::new(Fixed));
        let reply = router.handle(".lb FKDR monthly").await.unwrap();
        assert!(reply.description.unwrap().contains("**Leader**: `4.50`"));
    }

    #[tokio::test]
    async fn test_help() {
        let router = offline_router();

        let all = router.handle(".help").await.unwrap();
        assert_eq!(all.fields.len(), 5);

        let one = router.handle(".h .c").await.unwrap();
        assert_eq!(one.title, "📖 compare");
        assert_eq!(one.field_value("Aliases"), Some("`.c`, `.compare`, `.vs`"));

        let unknown = router.handle(".help nothing").await.unwrap();
        assert!(unknown.description.unwrap().contains("Unknown command `nothing`"));
    }

    struct Broken;

    #[async_trait]
    impl LeaderboardSource for Broken {
        async fn fetch_leaderboard(
            &self,
            _stat: LeaderboardStat,
            _period: LeaderboardPeriod,
        ) -> crate::Result<Vec<LeaderboardEntry>> {
            panic!("leaderboard backend exploded")
        }
    }

    #[tokio::test]
    async fn test_panic_becomes_generic_reply() {
        let router = Arc::new(offline_router().with_leaderboard(Arc::new(Broken)));

        let reply = router.handle_guarded(".lb wins").await.unwrap();
        assert_eq!(reply.title, "❌ Something went wrong");

        // The router stays usable afterwards.
        let help = router.handle_guarded(".help").await.unwrap();
        assert_eq!(help.fields.len(), 5);
    }

    #[tokio::test]
    async fn test_transport_error_hides_api_key() {
        let base = serve(vec![Route::new(
            "/users/profiles/minecraft/",
            200,
            format!(r#"{{"id":"{UUID}"}}"#),
        )])
        .await;
        let config = ApiConfig {
            api_key: "SECRET-HYPIXEL-KEY".to_string(),
            mojang_base_url: base,
            hypixel_base_url: "http://127.0.0.1:9".to_string(),
            ..ApiConfig::default()
        };
        let router = CommandRouter::new(
            StatsClient::with_client(crate::api::stub::client(), config),
            Formatter::new(EmbedConfig::default(), "."),
            ".",
        );

        let reply = router.handle(".s Walls").await.unwrap();
        let text = reply.description.unwrap();
        assert!(text.contains("Hypixel API error"));
        assert!(!text.contains("SECRET-HYPIXEL-KEY"));
        assert!(!text.contains("key="));
    }
}
