//! Come-out / point state machine for a single pass-line round.
use crate::{
    dice::Dice,
    error::RoundError,
    wager::Wager,
};
use std::fmt;

pub const NATURALS: [u8; 2] = [7, 11];
pub const CRAPS: [u8; 3] = [2, 3, 12];
pub const POINT_NUMBERS: [u8; 6] = [4, 5, 6, 8, 9, 10];
pub const SEVEN: u8 = 7;

#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub enum Outcome {
    Win,
    Lose,
}

/// Where the round stands. The point only exists while in `Point`, and an
/// outcome only exists once `Finished`.
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub enum Phase {
    ComeOut,
    Point(u8),
    Finished(Outcome),
}

/// What a single roll did to the round.
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub enum Transition {
    /// 7 or 11 on the come-out roll.
    Natural { total: u8 },
    /// 2, 3 or 12 on the come-out roll.
    CrapOut { total: u8 },
    PointEstablished { point: u8 },
    PointHit { point: u8 },
    SevenOut { point: u8 },
    KeepRolling { total: u8, point: u8 },
}

impl Transition {
    pub fn total(&self) -> u8 {
        match *self {
            Transition::Natural { total }
            | Transition::CrapOut { total }
            | Transition::KeepRolling { total, .. } => total,
            Transition::PointEstablished { point } | Transition::PointHit { point } => {
                point
            }
            Transition::SevenOut { .. } => SEVEN,
        }
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self {
            Transition::Natural { .. } | Transition::PointHit { .. } => Some(Outcome::Win),
            Transition::CrapOut { .. } | Transition::SevenOut { .. } => {
                Some(Outcome::Lose)
            }
            Transition::PointEstablished { .. } | Transition::KeepRolling { .. } => None,
        }
    }

    /// One line for the round history.
    pub fn narration(&self) -> String {
        let total = self.total();
        match self {
            Transition::Natural { .. } => {
                format!("Come-out roll: {total} - Pass! You win!")
            }
            Transition::CrapOut { .. } => {
                format!("Come-out roll: {total} - Crap out! You lose!")
            }
            Transition::PointEstablished { .. } => {
                format!("Come-out roll: {total} - Point established!")
            }
            Transition::PointHit { .. } => format!("Roll: {total} - Hit the point! You win!"),
            Transition::SevenOut { .. } => format!("Roll: {total} - Seven out! You lose!"),
            Transition::KeepRolling { .. } => format!("Roll: {total} - Keep rolling..."),
        }
    }
}

/// Wager attributed to the round's result. Produced once, on the roll that
/// finishes the round.
#[derive(PartialEq, Debug, Copy, Clone)]
pub struct Settlement {
    pub outcome: Outcome,
    pub amount: f64,
}

impl Settlement {
    pub fn won(&self) -> bool {
        self.outcome == Outcome::Win
    }

    /// Positive for a win, negative for a loss.
    pub fn signed_amount(&self) -> f64 {
        match self.outcome {
            Outcome::Win => self.amount,
            Outcome::Lose => -self.amount,
        }
    }
}

#[derive(PartialEq, Debug, Copy, Clone)]
pub struct RollResult {
    pub round: Round,
    pub transition: Transition,
    pub settlement: Option<Settlement>,
}

#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub struct Round {
    phase: Phase,
    last_roll: Dice,
}

impl Default for Round {
    fn default() -> Self {
        Self::new()
    }
}

impl Round {
    pub fn new() -> Self {
        Self {
            phase: Phase::ComeOut,
            last_roll: Dice::default(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn point(&self) -> Option<u8> {
        match self.phase {
            Phase::Point(point) => Some(point),
            _ => None,
        }
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.phase {
            Phase::Finished(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn last_roll(&self) -> Dice {
        self.last_roll
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, Phase::Finished(_))
    }

    /// Apply one throw. A finished round is rejected untouched; it must be
    /// reset first.
    pub fn roll(&self, wager: Wager, dice: Dice) -> Result<RollResult, RoundError> {
        let total = dice.total();
        let transition = match self.phase {
            Phase::Finished(_) => return Err(RoundError::RoundFinished),
            Phase::ComeOut if NATURALS.contains(&total) => Transition::Natural { total },
            Phase::ComeOut if CRAPS.contains(&total) => Transition::CrapOut { total },
            Phase::ComeOut => Transition::PointEstablished { point: total },
            Phase::Point(point) if total == point => Transition::PointHit { point },
            Phase::Point(point) if total == SEVEN => Transition::SevenOut { point },
            Phase::Point(point) => Transition::KeepRolling { total, point },
        };

        let phase = match transition {
            Transition::PointEstablished { point }
            | Transition::KeepRolling { point, .. } => Phase::Point(point),
            Transition::Natural { .. } | Transition::PointHit { .. } => {
                Phase::Finished(Outcome::Win)
            }
            Transition::CrapOut { .. } | Transition::SevenOut { .. } => {
                Phase::Finished(Outcome::Lose)
            }
        };
        let settlement = transition.outcome().map(|outcome| Settlement {
            outcome,
            amount: wager.amount(),
        });
        tracing::debug!(%dice, ?transition, "round advanced");

        Ok(RollResult {
            round: Round {
                phase,
                last_roll: dice,
            },
            transition,
            settlement,
        })
    }

    /// A fresh come-out round, whatever came before.
    pub fn reset(&self) -> Round {
        Round::new()
    }
}

impl fmt::Display for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.phase {
            Phase::ComeOut => {
                write!(f, "Come-out roll - Roll for 7 or 11 to win, avoid 2, 3, or 12")
            }
            Phase::Point(point) => {
                write!(f, "Point is {point} - Roll {point} again to win, avoid 7")
            }
            Phase::Finished(Outcome::Win) => write!(f, "You won!"),
            Phase::Finished(Outcome::Lose) => write!(f, "You lost!"),
        }
    }
}
