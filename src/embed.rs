//! Rendering of stats records into chat embeds.
//!
//! Everything here is pure: records in, [`Embed`] values out. The bot shell
//! converts an [`Embed`] into the chat platform's own builder.

use itertools::Itertools;
use serde::Serialize;

use crate::command::CommandKind;
use crate::config::EmbedConfig;
use crate::model::{ratio, LeaderboardEntry, LeaderboardPeriod, LeaderboardStat, StatsRecord};

pub const STATS_FOOTER: &str = "Mini Walls • Powered by Hypixel API";
pub const COMPARE_FOOTER: &str = "Mini Walls • Head-to-Head Comparison";
const AVATAR_URL: &str = "https://mc-heads.net/avatar";
const NAME_LABEL_LEN: usize = 8;

/// A named block of text inside an embed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

/// Platform-neutral rich message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Embed {
    pub title: String,
    pub description: Option<String>,
    pub color: u32,
    pub fields: Vec<EmbedField>,
    pub thumbnail: Option<String>,
    pub footer: Option<String>,
    /// Stamp the message with the send time.
    pub timestamp: bool,
}

impl Embed {
    pub fn new(title: impl Into<String>, color: u32) -> Self {
        Self {
            title: title.into(),
            description: None,
            color,
            fields: Vec::new(),
            thumbnail: None,
            footer: None,
            timestamp: false,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        self.fields.push(EmbedField {
            name: name.into(),
            value: value.into(),
            inline,
        });
        self
    }

    pub fn thumbnail(mut self, url: impl Into<String>) -> Self {
        self.thumbnail = Some(url.into());
        self
    }

    pub fn footer(mut self, text: impl Into<String>) -> Self {
        self.footer = Some(text.into());
        self
    }

    pub fn timestamped(mut self) -> Self {
        self.timestamp = true;
        self
    }

    pub fn field_value(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }
}

/// `1234567` -> `"1,234,567"`.
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Fixed-point decimal with a grouped integer part.
pub fn format_decimal(value: f64, places: usize) -> String {
    let formatted = format!("{:.*}", places, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };
    let grouped = int_part
        .parse::<u64>()
        .map(group_thousands)
        .unwrap_or_else(|_| int_part.to_string());
    let sign = if value < 0.0 && formatted.chars().any(|c| c.is_ascii_digit() && c != '0') {
        "-"
    } else {
        ""
    };
    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}

pub fn avatar_url(uuid: &str) -> String {
    format!("{AVATAR_URL}/{uuid}/128")
}

/// `min(100, round(kd * 20 + wins_per_death * 10))`.
pub fn impact_score(stats: &StatsRecord) -> u32 {
    let score = (stats.kd_ratio() * 20.0 + stats.wins_per_death() * 10.0).round();
    score.min(100.0) as u32
}

pub fn impact_emoji(score: u32) -> &'static str {
    if score > 80 {
        "🔥"
    } else if score > 50 {
        "⚡"
    } else {
        "💤"
    }
}

pub fn playstyle(stats: &StatsRecord) -> &'static str {
    if stats.kd_ratio() > 2.0 {
        "Aggressive"
    } else if stats.wins_per_death() > 0.5 {
        "Balanced"
    } else {
        "Defensive"
    }
}

pub fn versatility(stats: &StatsRecord) -> &'static str {
    if stats.kd_ratio() > 2.0 && stats.arrow_accuracy() > 50.0 {
        "High 🎯"
    } else if stats.kd_ratio() > 1.0 {
        "Moderate ⚔️"
    } else {
        "Low 🐢"
    }
}

pub fn performance_tier(stats: &StatsRecord) -> &'static str {
    let kd = stats.kd_ratio();
    if kd >= 3.0 {
        "Diamond 🏆"
    } else if kd >= 2.0 {
        "Gold 🥇"
    } else if kd >= 1.0 {
        "Silver 🥈"
    } else {
        "Bronze 🥉"
    }
}

/// Which side of a comparison came out ahead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Outcome {
    First,
    Second,
    Tie,
}

/// Strictly better value wins; equal values tie.
pub fn winner(first: f64, second: f64, lower_is_better: bool) -> Outcome {
    let (first, second) = if lower_is_better {
        (-first, -second)
    } else {
        (first, second)
    };
    if first > second {
        Outcome::First
    } else if second > first {
        Outcome::Second
    } else {
        Outcome::Tie
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueFormat {
    Count,
    Decimal(usize),
    Percent,
}

impl ValueFormat {
    fn render(self, value: f64) -> String {
        match self {
            ValueFormat::Count => group_thousands(value as u64),
            ValueFormat::Decimal(places) => format_decimal(value, places),
            ValueFormat::Percent => format!("{}%", format_decimal(value, 1)),
        }
    }
}

/// A stat both players are compared on.
#[derive(Clone, Copy)]
pub struct Category {
    pub name: &'static str,
    pub lower_is_better: bool,
    pub format: ValueFormat,
    pub is_ratio: bool,
    value: fn(&StatsRecord) -> f64,
}

impl Category {
    const fn count(name: &'static str, value: fn(&StatsRecord) -> f64) -> Self {
        Self {
            name,
            lower_is_better: false,
            format: ValueFormat::Count,
            is_ratio: false,
            value,
        }
    }

    const fn ratio(name: &'static str, format: ValueFormat, value: fn(&StatsRecord) -> f64) -> Self {
        Self {
            name,
            lower_is_better: false,
            format,
            is_ratio: true,
            value,
        }
    }

    const fn lower_is_better(mut self) -> Self {
        self.lower_is_better = true;
        self
    }

    pub fn value(&self, stats: &StatsRecord) -> f64 {
        (self.value)(stats)
    }

    pub fn outcome(&self, first: &StatsRecord, second: &StatsRecord) -> Outcome {
        winner(self.value(first), self.value(second), self.lower_is_better)
    }
}

pub const CATEGORIES: [Category; 12] = [
    Category::count("Wins", |s| s.wins() as f64),
    Category::count("Kills", |s| s.kills() as f64),
    Category::count("Finals", |s| s.finals() as f64),
    Category::count("Wither Damage", |s| s.wither_damage() as f64),
    Category::count("Wither Kills", |s| s.wither_kills() as f64),
    Category::count("Deaths", |s| s.deaths() as f64).lower_is_better(),
    Category::ratio("K/D", ValueFormat::Decimal(2), StatsRecord::kd_ratio),
    Category::ratio("K/D (no finals)", ValueFormat::Decimal(2), StatsRecord::kd_no_finals_ratio),
    Category::ratio("F/D", ValueFormat::Decimal(2), StatsRecord::fd_ratio),
    Category::ratio("WD/D", ValueFormat::Decimal(0), StatsRecord::wd_ratio),
    Category::ratio("WK/D", ValueFormat::Decimal(2), StatsRecord::wk_ratio),
    Category::ratio("Arrow Accuracy", ValueFormat::Percent, StatsRecord::arrow_accuracy),
];

/// Aggregate of per-category outcomes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HeadToHead {
    pub first: u32,
    pub second: u32,
    pub ties: u32,
}

impl HeadToHead {
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::First => self.first += 1,
            Outcome::Second => self.second += 1,
            Outcome::Tie => self.ties += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.first + self.second + self.ties
    }

    /// Side with more category wins; equal counts stay a tie.
    pub fn overall(&self) -> Outcome {
        winner(self.first as f64, self.second as f64, false)
    }
}

pub fn head_to_head(first: &StatsRecord, second: &StatsRecord) -> HeadToHead {
    CATEGORIES
        .iter()
        .map(|c| c.outcome(first, second))
        .fold(HeadToHead::default(), |mut score, outcome| {
            score.record(outcome);
            score
        })
}

/// Player count activity tier: (status, blurb, color).
fn activity(count: u64, colors: &EmbedConfig) -> (&'static str, &'static str, u32) {
    if count >= 150 {
        ("🟢 Peak Hours", "Perfect time to play! Lots of active players.", colors.success_color)
    } else if count >= 100 {
        ("🟡 High Activity", "Great activity level with quick matchmaking.", colors.success_color)
    } else if count >= 50 {
        ("🟠 Moderate Activity", "Somewhat active, might experience longer queues.", colors.warning_color)
    } else {
        ("🔴 Low Activity", "Low player activity, matchmaking may be slow.", colors.error_color)
    }
}

/// Builds every reply embed with the configured colors.
#[derive(Debug, Clone)]
pub struct Formatter {
    colors: EmbedConfig,
    prefix: String,
}

impl Formatter {
    pub fn new(colors: EmbedConfig, prefix: impl Into<String>) -> Self {
        Self {
            colors,
            prefix: prefix.into(),
        }
    }

    pub fn stats(&self, stats: &StatsRecord, extended: bool) -> Embed {
        let rank = stats.rank();
        let counts = [
            ("Wins", stats.wins()),
            ("Finals", stats.finals()),
            ("Kills", stats.kills()),
            ("Overall Kills", stats.kills_overall()),
            ("Deaths", stats.deaths()),
            ("Wither Damage", stats.wither_damage()),
            ("Wither Kills", stats.wither_kills()),
            ("Arrows Hit", stats.arrows_hit()),
            ("Arrows Shot", stats.arrows_shot()),
        ]
        .iter()
        .map(|(name, value)| format!("> {name}: `{}`", group_thousands(*value)))
        .join("\n");

        let ratios = [
            ("K/D", format_decimal(stats.kd_ratio(), 2)),
            ("K/D (no finals)", format_decimal(stats.kd_no_finals_ratio(), 2)),
            ("F/D", format_decimal(stats.fd_ratio(), 2)),
            ("WD/D", format_decimal(stats.wd_ratio(), 0)),
            ("WK/D", format_decimal(stats.wk_ratio(), 2)),
            ("Wins/Death", format_decimal(stats.wins_per_death(), 2)),
            ("Arrow Accuracy", format!("{}%", format_decimal(stats.arrow_accuracy(), 1))),
        ]
        .iter()
        .map(|(name, value)| format!("> {name}: `{value}`"))
        .join("\n");

        let mut embed = Embed::new(
            format!("{} [{}] {}", rank.emoji(), rank.label(), stats.display_name()),
            rank.color(),
        )
        .description("Mini Walls Stats")
        .thumbnail(avatar_url(stats.uuid()))
        .field("Stats", counts, true)
        .field("Ratios", ratios, true);

        let logins = [("First login", stats.first_login()), ("Last login", stats.last_login())]
            .iter()
            .filter_map(|(name, at)| at.map(|at| format!("> {name}: `{}`", at.format("%Y-%m-%d"))))
            .join("\n");
        if !logins.is_empty() {
            embed = embed.field("Activity", logins, false);
        }

        if extended {
            embed = self.add_extended(embed, stats);
        }

        embed.footer(STATS_FOOTER).timestamped()
    }

    fn add_extended(&self, embed: Embed, stats: &StatsRecord) -> Embed {
        let advanced = [
            format!("Wither K/D: `{}`", format_decimal(stats.wk_ratio(), 2)),
            format!("Wither Dmg/Death: `{}`", format_decimal(stats.wd_ratio(), 0)),
            format!("No-Final K/D: `{}`", format_decimal(stats.kd_no_finals_ratio(), 2)),
            format!("Kills per Win: `{}`", format_decimal(ratio(stats.kills(), stats.wins()), 2)),
            format!("Finals per Win: `{}`", format_decimal(ratio(stats.finals(), stats.wins()), 2)),
        ]
        .join("\n");

        let combat = [
            format!("Hit Rate: `{}%`", format_decimal(ratio(stats.arrows_hit(), stats.arrows_shot()) * 100.0, 1)),
            format!("Shots per Kill: `{}`", format_decimal(ratio(stats.arrows_shot(), stats.kills()), 1)),
            format!("Hits per Kill: `{}`", format_decimal(ratio(stats.arrows_hit(), stats.kills()), 1)),
            format!(
                "Damage per Wither Kill: `{}`",
                format_decimal(ratio(stats.wither_damage(), stats.wither_kills()), 0)
            ),
            format!(
                "Wither Kill Efficiency: `{}%`",
                format_decimal(ratio(stats.wither_kills(), stats.kills()) * 100.0, 1)
            ),
        ]
        .join("\n");

        let impact = impact_score(stats);
        let game_impact = [
            format!("Impact Score: `{impact}/100` {}", impact_emoji(impact)),
            format!("Versatility: {}", versatility(stats)),
            format!("Playstyle: {}", playstyle(stats)),
            format!("Tier: {}", performance_tier(stats)),
        ]
        .join("\n");

        embed
            .field("📊 Advanced Ratios", advanced, true)
            .field("🔬 Combat Analysis", combat, true)
            .field("🎮 Game Impact", game_impact, false)
    }

    pub fn comparison(&self, first: &StatsRecord, second: &StatsRecord) -> Embed {
        let score = head_to_head(first, second);
        let winner_line = match score.overall() {
            Outcome::First => format!("🏆 Winner: **{}**", first.display_name()),
            Outcome::Second => format!("🏆 Winner: **{}**", second.display_name()),
            Outcome::Tie => "🤝 Result: **Tie**".to_string(),
        };
        let overview = format!(
            "{winner_line} ({}-{}-{})\n📊 Categories: {}",
            score.first,
            score.second,
            score.ties,
            score.total()
        );

        let label1 = short_label(first.display_name());
        let label2 = short_label(second.display_name());
        let render = |ratios: bool| {
            CATEGORIES
                .iter()
                .filter(|c| c.is_ratio == ratios)
                .map(|c| comparison_line(c, first, second))
                .join("\n")
        };

        Embed::new("⚔️ Battle Analysis", self.colors.primary_color)
            .description(format!(
                "**{}** vs **{}**\n`{label1}` | `{label2}`",
                first.display_name(),
                second.display_name()
            ))
            .field("🥊 Battle Results", overview, false)
            .field("━━━━━━ Stats ━━━━━━", render(false), true)
            .field("━━━━━ Ratios ━━━━━", render(true), true)
            .field("🔍 Tactical Analysis", analysis(first, second), false)
            .footer(COMPARE_FOOTER)
            .timestamped()
    }

    pub fn player_count(&self, count: u64) -> Embed {
        let (status, blurb, color) = activity(count, &self.colors);
        Embed::new("📈 Mini Walls Player Count", color)
            .description(format!(
                "Current players: **{}**\nStatus: {status}\n{blurb}",
                group_thousands(count)
            ))
            .footer("Powered by Hypixel API")
            .timestamped()
    }

    pub fn leaderboard(
        &self,
        stat: LeaderboardStat,
        period: LeaderboardPeriod,
        entries: &[LeaderboardEntry],
    ) -> Embed {
        let title = format!("🏅 {} Leaderboard ({period})", stat.title());
        if entries.is_empty() {
            return Embed::new(title, self.colors.warning_color)
                .description("Leaderboards are coming soon!");
        }
        let rows = entries
            .iter()
            .enumerate()
            .map(|(i, e)| {
                let value = if e.value.fract() == 0.0 && e.value >= 0.0 {
                    group_thousands(e.value as u64)
                } else {
                    format_decimal(e.value, 2)
                };
                format!("`#{}` **{}**: `{value}`", i + 1, e.username)
            })
            .join("\n");
        Embed::new(title, self.colors.primary_color)
            .description(rows)
            .footer(STATS_FOOTER)
            .timestamped()
    }

    pub fn help(&self, commands: &[CommandKind]) -> Embed {
        commands
            .iter()
            .fold(
                Embed::new("📖 Mini Walls Bot Help", self.colors.primary_color).description(format!(
                    "Use `{}help <command>` for details on a single command.",
                    self.prefix
                )),
                |embed, kind| {
                    embed.field(
                        kind.to_string(),
                        format!("`{}`\n{}", kind.usage(&self.prefix), kind.description()),
                        false,
                    )
                },
            )
    }

    pub fn help_for(&self, kind: CommandKind) -> Embed {
        let aliases = kind
            .aliases()
            .iter()
            .map(|a| format!("`{}{a}`", self.prefix))
            .join(", ");
        Embed::new(format!("📖 {}", kind), self.colors.primary_color)
            .description(kind.description())
            .field("Usage", format!("`{}`", kind.usage(&self.prefix)), false)
            .field("Aliases", aliases, false)
    }

    /// Neutral reply for a username without stats.
    pub fn not_found(&self, username: &str) -> Embed {
        Embed::new("Player not found", self.colors.warning_color).description(format!(
            "Player '{username}' not found or has no Mini Walls stats"
        ))
    }

    pub fn usage_error(&self, message: &str) -> Embed {
        Embed::new("⚠️ Invalid usage", self.colors.warning_color).description(message)
    }

    pub fn upstream_error(&self, cause: &str) -> Embed {
        Embed::new("Error", self.colors.error_color)
            .description(format!("An error occurred while fetching stats: `{cause}`"))
    }

    pub fn unexpected_error(&self) -> Embed {
        Embed::new("❌ Something went wrong", self.colors.error_color)
            .description("An unexpected error occurred. Please try again later.")
    }
}

fn short_label(name: &str) -> String {
    name.chars().take(NAME_LABEL_LEN).collect()
}

fn comparison_line(category: &Category, first: &StatsRecord, second: &StatsRecord) -> String {
    let marker = match category.outcome(first, second) {
        Outcome::First => "◀",
        Outcome::Second => "▶",
        Outcome::Tie => "=",
    };
    format!(
        "{marker} **{}**\n`{}` | `{}`",
        category.name,
        category.format.render(category.value(first)),
        category.format.render(category.value(second))
    )
}

fn analysis(first: &StatsRecord, second: &StatsRecord) -> String {
    let combat = match winner(first.kd_ratio(), second.kd_ratio(), false) {
        Outcome::First => format!("{} has superior combat skills.", first.display_name()),
        Outcome::Second => format!("{} has superior combat skills.", second.display_name()),
        Outcome::Tie => "Both players have similar combat skills.".to_string(),
    };
    let wins = match winner(first.wins() as f64, second.wins() as f64, false) {
        Outcome::First => format!("{} has more wins.", first.display_name()),
        Outcome::Second => format!("{} has more wins.", second.display_name()),
        Outcome::Tie => "Both players have equal wins.".to_string(),
    };
    let styles = format!(
        "Playstyles: {} is {}, {} is {}.",
        first.display_name(),
        playstyle(first),
        second.display_name(),
        playstyle(second)
    );
    let impact = format!(
        "Impact: `{}` vs `{}`",
        impact_score(first),
        impact_score(second)
    );
    [combat, wins, styles, impact].join(" ")
}
