use crate::ui;
use color_eyre::eyre::{
    Result,
    WrapErr,
};
use craps::{
    dice::{
        Dice,
        DiceSource,
        RandomDice,
    },
    error::SessionError,
    leaderboard::{
        LeaderboardView,
        SortKey,
    },
    ledger::Ledger,
    round::{
        Outcome,
        Round,
    },
    session::Session,
    stats::GameStats,
    storage::KeyValueStore,
    wager::DEFAULT_WAGER_INPUT,
    wallet::{
        StaticWallet,
        WalletAccount,
    },
};
use rand::rngs::ThreadRng;
use std::time::Duration;
use street_craps::config::AppConfig;
use tokio::time;

const ROLL_ANIMATION_FRAMES: usize = 10;
const ROLL_ANIMATION_FRAME: Duration = Duration::from_millis(100);
const MAX_ERRORS: usize = 5;

type Table = Session<Box<dyn KeyValueStore>, StaticWallet>;

#[derive(Clone, Debug)]
pub struct AppSnapshot {
    pub address: Option<String>,
    pub balance: Option<String>,
    pub round: Round,
    pub dice: Dice,
    pub rolling: bool,
    pub can_roll: bool,
    pub wager_input: String,
    pub history: Vec<String>,
    pub stats: GameStats,
    pub leaderboard: LeaderboardView,
    pub sort_key: SortKey,
    pub status: String,
    pub errors: Vec<String>,
}

pub struct AppController {
    session: Table,
    dice: Box<dyn DiceSource>,
    animation: RandomDice<ThreadRng>,
    wager_input: String,
    stats: GameStats,
    leaderboard: LeaderboardView,
    pub status: String,
    errors: Vec<String>,
}

impl AppController {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let store = config.open_store()?;
        let ledger = Ledger::with_namespace(store, config.namespace.clone());
        let session = Session::new(ledger, config.wallet.clone());
        let dice: Box<dyn DiceSource> = match config.seed {
            Some(seed) => {
                tracing::info!("Seeding dice with {seed}");
                Box::new(RandomDice::seeded(seed))
            }
            None => Box::new(RandomDice::new()),
        };
        Ok(Self::from_parts(session, dice))
    }

    pub fn from_parts(session: Table, dice: Box<dyn DiceSource>) -> Self {
        let status = if session.wallet().is_connected() {
            "Place your bet and press r to roll".to_string()
        } else {
            "No wallet connected; start with --address to play".to_string()
        };
        let mut controller = Self {
            session,
            dice,
            animation: RandomDice::new(),
            wager_input: DEFAULT_WAGER_INPUT.to_string(),
            stats: GameStats::default(),
            leaderboard: LeaderboardView::default(),
            status,
            errors: Vec::new(),
        };
        controller.refresh_ledger_views();
        controller
    }

    pub fn snapshot(&self) -> AppSnapshot {
        let wallet = self.session.wallet();
        AppSnapshot {
            address: wallet.address(),
            balance: wallet.balance().map(|b| b.formatted),
            round: *self.session.round(),
            dice: self.session.round().last_roll(),
            rolling: false,
            can_roll: self.session.can_roll(),
            wager_input: self.wager_input.clone(),
            history: self.session.history().to_vec(),
            stats: self.stats.clone(),
            leaderboard: self.leaderboard.clone(),
            sort_key: self.session.sort_key(),
            status: self.status.clone(),
            errors: self.errors.clone(),
        }
    }

    /// A cosmetic frame: random faces, round state untouched.
    pub fn animation_frame(&mut self) -> AppSnapshot {
        let mut snapshot = self.snapshot();
        snapshot.dice = self.animation.roll();
        snapshot.rolling = true;
        snapshot.can_roll = false;
        snapshot.status = "Rolling...".to_string();
        snapshot
    }

    pub fn set_wager(&mut self, input: String) {
        self.wager_input = input;
        self.set_status(format!("Bet set to {} ETH", self.wager_input));
    }

    /// Run the roll preconditions, surfacing any rejection as a notice.
    pub fn precheck_roll(&mut self) -> bool {
        match self.session.validate_roll(&self.wager_input) {
            Ok(_) => true,
            Err(e) => {
                self.reject(e);
                false
            }
        }
    }

    pub fn roll(&mut self) {
        let report = match self
            .session
            .submit_roll(&self.wager_input, self.dice.as_mut())
        {
            Ok(report) => report,
            Err(e) => {
                self.reject(e);
                return;
            }
        };
        let message = match report.settlement {
            Some(settlement) => {
                let verb = match settlement.outcome {
                    Outcome::Win => "won",
                    Outcome::Lose => "lost",
                };
                format!(
                    "{} | You {verb} {} ETH. Press n for a new game",
                    report.narration(),
                    settlement.amount
                )
            }
            None => report.narration(),
        };
        self.set_status(message);
        if report.settlement.is_some() {
            self.refresh_ledger_views();
        }
    }

    pub fn new_game(&mut self) {
        self.session.reset_round();
        self.set_status("New game: come-out roll");
    }

    pub fn cycle_sort(&mut self) {
        let next = self.session.sort_key().next();
        match self.session.change_sort_key(next) {
            Ok(view) => {
                self.leaderboard = view;
                self.set_status(format!("Leaderboard sorted by {next}"));
            }
            Err(e) => self.reject(e),
        }
    }

    fn refresh_ledger_views(&mut self) {
        match self.session.player_stats() {
            Ok(stats) => self.stats = stats,
            Err(e) => self.reject(e),
        }
        match self.session.leaderboard() {
            Ok(view) => self.leaderboard = view,
            Err(e) => self.reject(e),
        }
    }

    fn reject(&mut self, error: SessionError) {
        match &error {
            SessionError::Storage(_) => tracing::error!("{error}"),
            _ => tracing::debug!("roll rejected: {error}"),
        }
        let message = error.to_string();
        self.set_status(message.clone());
        self.push_errors(vec![message]);
    }

    fn set_status(&mut self, message: impl Into<String>) {
        self.status = message.into();
    }

    fn push_errors(&mut self, mut items: Vec<String>) {
        self.errors.append(&mut items);
        if self.errors.len() > MAX_ERRORS {
            let excess = self.errors.len() - MAX_ERRORS;
            self.errors.drain(0..excess);
        }
    }
}

pub async fn run_app(config: AppConfig) -> Result<()> {
    let controller = AppController::new(&config)?;
    let mut ui_state = ui::UiState::default();

    tracing::info!("Starting UI");
    ui::terminal_enter(&mut ui_state)?;
    tracing::info!("UI ready");
    let res = run_loop(controller, &mut ui_state).await;
    ui::terminal_exit()?;
    res
}

async fn run_loop(mut controller: AppController, ui_state: &mut ui::UiState) -> Result<()> {
    tracing::info!("Running app loop");
    ui::draw(ui_state, &controller.snapshot()).wrap_err("initial draw failed")?;
    loop {
        let event = ui::next_event(ui_state).await?;
        match event {
            ui::UserEvent::Quit => break,
            ui::UserEvent::Roll => {
                if controller.precheck_roll() {
                    for _ in 0..ROLL_ANIMATION_FRAMES {
                        let frame = controller.animation_frame();
                        ui::draw(ui_state, &frame)
                            .wrap_err("draw during roll animation failed")?;
                        time::sleep(ROLL_ANIMATION_FRAME).await;
                    }
                    controller.roll();
                }
            }
            ui::UserEvent::NewGame => controller.new_game(),
            ui::UserEvent::CycleSort => controller.cycle_sort(),
            ui::UserEvent::SetWager(input) => controller.set_wager(input),
            ui::UserEvent::OpenWagerModal | ui::UserEvent::Redraw => {}
        }
        ui::draw(ui_state, &controller.snapshot())
            .wrap_err("draw after user event failed")?;
    }
    tracing::info!("Exiting app loop");
    Ok(())
}
