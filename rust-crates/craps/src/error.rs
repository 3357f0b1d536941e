use thiserror::Error;

/// Rejections raised by the round engine before any state changes.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RoundError {
    #[error("Round is finished; start a new game before rolling again")]
    RoundFinished,

    #[error("Die face {0} is outside 1..=6")]
    InvalidDie(u8),
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum WagerError {
    #[error("Please enter a valid bet amount")]
    InvalidAmount,

    #[error("Insufficient ETH balance")]
    InsufficientBalance { requested: f64, available: f64 },
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Connect a wallet to roll")]
    WalletNotConnected,

    #[error(transparent)]
    Wager(#[from] WagerError),

    #[error(transparent)]
    Round(#[from] RoundError),

    #[error("ledger storage failed: {0:#}")]
    Storage(#[from] anyhow::Error),
}
