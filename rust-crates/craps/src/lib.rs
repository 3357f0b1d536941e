pub mod dice;

pub mod error;

pub mod leaderboard;

pub mod ledger;

pub mod round;

pub mod session;

pub mod stats;

pub mod storage;

pub mod wager;

pub mod wallet;

pub type Result<T, E = anyhow::Error> = std::result::Result<T, E>;
