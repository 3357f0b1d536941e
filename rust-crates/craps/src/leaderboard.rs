use crate::stats::{
    GameStats,
    PlayerStats,
};
use std::{
    cmp::Ordering,
    fmt,
};

pub const LEADERBOARD_DISPLAY_LIMIT: usize = 10;

#[derive(PartialEq, Eq, Debug, Copy, Clone, Default)]
pub enum SortKey {
    #[default]
    NetEth,
    WinRate,
    TotalWon,
    GamesPlayed,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [
        SortKey::NetEth,
        SortKey::WinRate,
        SortKey::TotalWon,
        SortKey::GamesPlayed,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SortKey::NetEth => "Net ETH",
            SortKey::WinRate => "Win Rate",
            SortKey::TotalWon => "Total Won",
            SortKey::GamesPlayed => "Games Played",
        }
    }

    pub fn next(self) -> SortKey {
        let idx = Self::ALL.iter().position(|k| *k == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    fn value(self, stats: &GameStats) -> f64 {
        match self {
            SortKey::NetEth => stats.net(),
            SortKey::WinRate => stats.win_rate(),
            SortKey::TotalWon => stats.total_won,
            SortKey::GamesPlayed => stats.games_played as f64,
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Drop players with no games and sort the rest descending by `key`.
/// The sort is stable: equal keys keep their snapshot order.
pub fn rank(entries: Vec<PlayerStats>, key: SortKey) -> Vec<PlayerStats> {
    let mut ranked: Vec<_> = entries
        .into_iter()
        .filter(|entry| entry.stats.has_played())
        .collect();
    ranked.sort_by(|a, b| {
        key.value(&b.stats)
            .partial_cmp(&key.value(&a.stats))
            .unwrap_or(Ordering::Equal)
    });
    ranked
}

/// The rows shown to players plus how many players were ranked in total.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct LeaderboardView {
    pub entries: Vec<PlayerStats>,
    pub total_players: usize,
}

impl LeaderboardView {
    pub fn from_ranked(mut ranked: Vec<PlayerStats>) -> Self {
        let total_players = ranked.len();
        ranked.truncate(LEADERBOARD_DISPLAY_LIMIT);
        Self {
            entries: ranked,
            total_players,
        }
    }

    pub fn is_truncated(&self) -> bool {
        self.total_players > self.entries.len()
    }
}

/// `0x1234...abcd` for anything longer than ten characters.
pub fn format_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 10 {
        return address.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

pub fn format_win_rate(stats: &GameStats) -> String {
    format!("{:.1}%", stats.win_rate() * 100.0)
}

pub fn format_net_eth(stats: &GameStats) -> String {
    let net = stats.net();
    let sign = if net >= 0.0 { "+" } else { "" };
    format!("{sign}{net:.4} ETH")
}
