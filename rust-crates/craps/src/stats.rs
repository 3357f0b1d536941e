use serde::{
    Deserialize,
    Serialize,
};

/// Cumulative results for one wallet address.
///
/// Serialized with the field names the stored JSON has always used, so
/// existing records keep loading.
#[derive(PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStats {
    pub games_played: u64,
    pub games_won: u64,
    pub games_lost: u64,
    #[serde(rename = "totalEthWon")]
    pub total_won: f64,
    #[serde(rename = "totalEthLost")]
    pub total_lost: f64,
}

impl GameStats {
    pub fn record_win(&mut self, amount: f64) {
        self.games_played += 1;
        self.games_won += 1;
        self.total_won += amount;
    }

    pub fn record_loss(&mut self, amount: f64) {
        self.games_played += 1;
        self.games_lost += 1;
        self.total_lost += amount;
    }

    pub fn record(&mut self, won: bool, amount: f64) {
        if won {
            self.record_win(amount)
        } else {
            self.record_loss(amount)
        }
    }

    pub fn net(&self) -> f64 {
        self.total_won - self.total_lost
    }

    pub fn win_rate(&self) -> f64 {
        if self.games_played == 0 {
            0.0
        } else {
            self.games_won as f64 / self.games_played as f64
        }
    }

    pub fn has_played(&self) -> bool {
        self.games_played > 0
    }
}

/// One row of the persisted leaderboard snapshot.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct PlayerStats {
    pub address: String,
    pub stats: GameStats,
}

impl PlayerStats {
    pub fn new(address: impl Into<String>, stats: GameStats) -> Self {
        Self {
            address: address.into(),
            stats,
        }
    }
}
