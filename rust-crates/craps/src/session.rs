//! Command handlers driving one player's table: roll, reset, and
//! leaderboard sort changes. Front-ends call these and render the results.
use crate::{
    dice::{
        Dice,
        DiceSource,
    },
    error::{
        RoundError,
        SessionError,
    },
    leaderboard::{
        LeaderboardView,
        SortKey,
    },
    ledger::Ledger,
    round::{
        Round,
        Settlement,
        Transition,
    },
    stats::GameStats,
    storage::KeyValueStore,
    wager::Wager,
    wallet::WalletAccount,
};

#[derive(PartialEq, Debug, Clone)]
pub struct RollReport {
    pub dice: Dice,
    pub transition: Transition,
    pub settlement: Option<Settlement>,
    /// The player's record after a settled round.
    pub stats: Option<GameStats>,
}

impl RollReport {
    pub fn narration(&self) -> String {
        self.transition.narration()
    }
}

pub struct Session<S, W> {
    ledger: Ledger<S>,
    wallet: W,
    round: Round,
    history: Vec<String>,
    sort_key: SortKey,
}

impl<S, W> Session<S, W> {
    pub fn new(ledger: Ledger<S>, wallet: W) -> Self {
        Self {
            ledger,
            wallet,
            round: Round::new(),
            history: Vec::new(),
            sort_key: SortKey::default(),
        }
    }

    pub fn round(&self) -> &Round {
        &self.round
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    pub fn wallet(&self) -> &W {
        &self.wallet
    }

    pub fn ledger(&self) -> &Ledger<S> {
        &self.ledger
    }

    /// Start a new come-out round and clear its history.
    pub fn reset_round(&mut self) {
        self.round = self.round.reset();
        self.history.clear();
        tracing::debug!("round reset");
    }
}

impl<S: KeyValueStore, W: WalletAccount> Session<S, W> {
    pub fn can_roll(&self) -> bool {
        self.wallet.is_connected() && !self.round.is_finished()
    }

    /// Check every roll precondition without touching the round.
    pub fn validate_roll(&self, wager_input: &str) -> Result<Wager, SessionError> {
        self.prepare_roll(wager_input).map(|(_, wager)| wager)
    }

    fn prepare_roll(&self, wager_input: &str) -> Result<(String, Wager), SessionError> {
        let address = self
            .wallet
            .address()
            .ok_or(SessionError::WalletNotConnected)?;
        if self.round.is_finished() {
            return Err(RoundError::RoundFinished.into());
        }
        let balance = self.wallet.balance();
        let wager = Wager::parse(wager_input, balance.as_ref())?;
        Ok((address, wager))
    }

    /// Validate the wager, throw the dice and advance the round. A settled
    /// round is recorded in the ledger once the new round state is in place.
    pub fn submit_roll<D: DiceSource + ?Sized>(
        &mut self,
        wager_input: &str,
        dice: &mut D,
    ) -> Result<RollReport, SessionError> {
        let (address, wager) = self.prepare_roll(wager_input)?;

        let throw = dice.roll();
        let result = self.round.roll(wager, throw)?;
        self.round = result.round;
        self.history.push(result.transition.narration());

        let stats = match result.settlement {
            Some(settlement) => {
                let stats = self.ledger.record_result(
                    &address,
                    settlement.won(),
                    settlement.amount,
                )?;
                tracing::info!(
                    address = %address,
                    outcome = ?settlement.outcome,
                    amount = settlement.amount,
                    "round settled"
                );
                Some(stats)
            }
            None => None,
        };

        Ok(RollReport {
            dice: throw,
            transition: result.transition,
            settlement: result.settlement,
            stats,
        })
    }

    /// Switch the leaderboard ordering and return the new top entries.
    pub fn change_sort_key(
        &mut self,
        key: SortKey,
    ) -> Result<LeaderboardView, SessionError> {
        self.sort_key = key;
        self.leaderboard()
    }

    pub fn leaderboard(&self) -> Result<LeaderboardView, SessionError> {
        Ok(self.ledger.top_leaderboard(self.sort_key)?)
    }

    /// Record of the connected address; zero when nothing is connected.
    pub fn player_stats(&self) -> Result<GameStats, SessionError> {
        match self.wallet.address() {
            Some(address) => Ok(self.ledger.load_record(&address)?),
            None => Ok(GameStats::default()),
        }
    }
}
