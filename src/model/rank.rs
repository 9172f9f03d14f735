use serde::Serialize;

/// Monthly package rank value granting the top purchasable tier.
pub const SUPERSTAR: &str = "SUPERSTAR";

/// A player's account tier.
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
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum Rank {
    #[default]
    Default,
    Vip,
    VipPlus,
    Mvp,
    MvpPlus,
    MvpPlusPlus,
    Helper,
    Moderator,
    Admin,
    Youtuber,
}

impl Rank {
    /// Short label shown in front of the player name.
    pub fn label(self) -> &'static str {
        match self {
            Rank::Admin => "ADMIN",
            Rank::Moderator => "MOD",
            Rank::Helper => "HELPER",
            Rank::Youtuber => "YOUTUBE",
            Rank::MvpPlusPlus => "MVP++",
            Rank::MvpPlus => "MVP+",
            Rank::Mvp => "MVP",
            Rank::VipPlus => "VIP+",
            Rank::Vip => "VIP",
            Rank::Default => "NON",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Rank::Admin | Rank::Youtuber => "🔴",
            Rank::Moderator => "🟢",
            Rank::Helper => "🔵",
            Rank::MvpPlusPlus => "🟡",
            Rank::MvpPlus | Rank::Mvp => "🟦",
            Rank::VipPlus | Rank::Vip => "🟩",
            Rank::Default => "⚪",
        }
    }

    /// Embed accent color.
    pub fn color(self) -> u32 {
        match self {
            Rank::Vip | Rank::VipPlus => 0x2ECC71,
            Rank::Mvp => 0x3498DB,
            Rank::MvpPlus => 0x9B59B6,
            Rank::MvpPlusPlus => 0xF1C40F,
            Rank::Admin | Rank::Youtuber => 0xE74C3C,
            Rank::Moderator => 0x1F8B4C,
            Rank::Helper => 0x206694,
            Rank::Default => 0x979C9F,
        }
    }

    /// Resolve a rank from the raw player fields.
    ///
    /// Staff rank wins outright, then a `SUPERSTAR` monthly package, then the
    /// regular package rank, then the free tier.
    pub fn derive(
        staff_rank: Option<&str>,
        monthly_package_rank: Option<&str>,
        package_rank: Option<&str>,
    ) -> Rank {
        if let Some(rank) = staff_rank.and_then(|r| r.parse().ok()) {
            return rank;
        }
        if monthly_package_rank.is_some_and(|r| r.eq_ignore_ascii_case(SUPERSTAR)) {
            return Rank::MvpPlusPlus;
        }
        package_rank
            .and_then(|r| r.parse().ok())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_parse_api_names() {
        assert_eq!("MVP_PLUS_PLUS".parse::<Rank>().unwrap(), Rank::MvpPlusPlus);
        assert_eq!("vip_plus".parse::<Rank>().unwrap(), Rank::VipPlus);
        assert_eq!("ADMIN".parse::<Rank>().unwrap(), Rank::Admin);
        assert!("NORMAL".parse::<Rank>().is_err());
        assert_eq!(Rank::MvpPlus.to_string(), "MVP_PLUS");
    }

    #[test]
    fn test_staff_rank_beats_superstar() {
        let rank = Rank::derive(Some("ADMIN"), Some("SUPERSTAR"), Some("MVP_PLUS"));
        assert_eq!(rank, Rank::Admin);

        let rank = Rank::derive(Some("HELPER"), Some("SUPERSTAR"), None);
        assert_eq!(rank, Rank::Helper);
    }

    #[test]
    fn test_superstar_beats_package_rank() {
        let rank = Rank::derive(None, Some("SUPERSTAR"), Some("MVP_PLUS"));
        assert_eq!(rank, Rank::MvpPlusPlus);
    }

    #[test]
    fn test_unrecognized_staff_rank_falls_through() {
        let rank = Rank::derive(Some("NORMAL"), Some("NONE"), Some("VIP"));
        assert_eq!(rank, Rank::Vip);
    }

    #[test]
    fn test_default_tier() {
        assert_eq!(Rank::derive(None, None, None), Rank::Default);
        assert_eq!(Rank::derive(None, Some("NONE"), Some("SOMETHING")), Rank::Default);
    }

    #[test]
    fn test_every_rank_has_a_label() {
        for rank in Rank::iter() {
            assert!(!rank.label().is_empty());
            assert!(!rank.emoji().is_empty());
        }
    }
}
