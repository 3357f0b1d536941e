use crate::client::AppSnapshot;
use color_eyre::eyre::Result;
use craps::{
    dice::Dice,
    leaderboard::{
        self,
        LeaderboardView,
        SortKey,
    },
    round::{
        Outcome,
        Phase,
    },
};
use crossterm::{
    event::{
        self,
        Event,
        KeyCode,
        KeyEvent,
        KeyEventKind,
    },
    terminal::{
        disable_raw_mode,
        enable_raw_mode,
    },
};
use ratatui::{
    prelude::*,
    widgets::*,
};
use std::io::stdout;

const MAX_WAGER_INPUT_LEN: usize = 18;
const HISTORY_ROWS: usize = 8;

#[derive(Debug, PartialEq, Eq)]
pub enum UserEvent {
    Quit,
    Roll,
    NewGame,
    CycleSort,
    OpenWagerModal,
    SetWager(String),
    Redraw,
}

#[derive(Default)]
pub struct UiState {
    mode: Mode,
    terminal: Option<Terminal<CrosstermBackend<std::io::Stdout>>>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
enum Mode {
    #[default]
    Normal,
    WagerModal(WagerState),
    QuitModal,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct WagerState {
    input: String,
}

impl WagerState {
    fn push(&mut self, c: char) {
        if self.input.len() >= MAX_WAGER_INPUT_LEN {
            return;
        }
        if c == '.' && self.input.contains('.') {
            return;
        }
        self.input.push(c);
    }
}

pub fn terminal_enter(state: &mut UiState) -> Result<()> {
    enable_raw_mode()?;
    crossterm::execute!(
        std::io::stdout(),
        crossterm::terminal::EnterAlternateScreen,
        crossterm::event::EnableMouseCapture
    )?;
    let backend = CrosstermBackend::new(stdout());
    let terminal = Terminal::new(backend)?;
    state.terminal = Some(terminal);
    Ok(())
}

pub fn terminal_exit() -> Result<()> {
    disable_raw_mode()?;
    crossterm::execute!(
        std::io::stdout(),
        crossterm::event::DisableMouseCapture,
        crossterm::terminal::LeaveAlternateScreen
    )?;
    Ok(())
}

pub fn draw(state: &mut UiState, snap: &AppSnapshot) -> Result<()> {
    if let Some(mut term) = state.terminal.take() {
        term.draw(|f| ui(f, state, snap))?;
        state.terminal = Some(term);
    }
    Ok(())
}

pub async fn next_event(state: &mut UiState) -> Result<UserEvent> {
    loop {
        if let Event::Key(k) = event::read()? {
            if let Some(ev) = interpret_key(state, k) {
                return Ok(ev);
            }
        }
    }
}

fn interpret_key(state: &mut UiState, k: KeyEvent) -> Option<UserEvent> {
    if k.kind != KeyEventKind::Press {
        return None;
    }
    match &mut state.mode {
        Mode::WagerModal(ws) => match k.code {
            KeyCode::Esc => {
                state.mode = Mode::Normal;
                Some(UserEvent::Redraw)
            }
            KeyCode::Enter => {
                let input = ws.input.clone();
                state.mode = Mode::Normal;
                Some(UserEvent::SetWager(input))
            }
            KeyCode::Backspace => {
                ws.input.pop();
                Some(UserEvent::Redraw)
            }
            KeyCode::Char(c) if c.is_ascii_digit() || c == '.' => {
                ws.push(c);
                Some(UserEvent::Redraw)
            }
            _ => None,
        },
        Mode::QuitModal => match k.code {
            KeyCode::Char('y') | KeyCode::Enter => Some(UserEvent::Quit),
            _ => {
                state.mode = Mode::Normal;
                Some(UserEvent::Redraw)
            }
        },
        Mode::Normal => match k.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                state.mode = Mode::QuitModal;
                Some(UserEvent::Redraw)
            }
            KeyCode::Char('r') => Some(UserEvent::Roll),
            KeyCode::Char('n') => Some(UserEvent::NewGame),
            KeyCode::Char('s') => Some(UserEvent::CycleSort),
            KeyCode::Char('b') => {
                state.mode = Mode::WagerModal(WagerState::default());
                Some(UserEvent::OpenWagerModal)
            }
            _ => None,
        },
    }
}

fn ui(f: &mut Frame, state: &UiState, snap: &AppSnapshot) {
    f.render_widget(Clear, f.area());
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),  // wallet + player stats
            Constraint::Length(10), // dice + history
            Constraint::Min(8),     // leaderboard
            Constraint::Length(5),  // status/errors + help
        ])
        .split(f.area());

    draw_top(f, chunks[0], snap);
    draw_table(f, chunks[1], snap);
    draw_leaderboard(f, chunks[2], snap);
    draw_bottom(f, chunks[3], snap);
    draw_modals(f, state);
}

fn draw_top(f: &mut Frame, area: Rect, snap: &AppSnapshot) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    draw_wallet_panel(f, cols[0], snap);
    draw_stats_panel(f, cols[1], snap);
}

fn draw_wallet_panel(f: &mut Frame, area: Rect, snap: &AppSnapshot) {
    let address = snap
        .address
        .as_deref()
        .map(leaderboard::format_address)
        .unwrap_or_else(|| "not connected".to_string());
    let balance = snap
        .balance
        .as_deref()
        .map(|b| format!("{b} ETH"))
        .unwrap_or_else(|| "-".to_string());
    let lines = vec![
        Line::from(format!("Address: {address}")),
        Line::from(format!("Balance: {balance}")),
        Line::from(format!("Bet: {} ETH", snap.wager_input)),
    ];
    let p = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Wallet"));
    f.render_widget(p, area);
}

fn draw_stats_panel(f: &mut Frame, area: Rect, snap: &AppSnapshot) {
    let stats = &snap.stats;
    let net_style = if stats.net() >= 0.0 {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::Red)
    };
    let lines = vec![
        Line::from(format!(
            "Played: {}  Won: {}  Lost: {}",
            stats.games_played, stats.games_won, stats.games_lost
        )),
        Line::from(format!(
            "Win rate: {}  Won: {:.4} ETH  Lost: {:.4} ETH",
            leaderboard::format_win_rate(stats),
            stats.total_won,
            stats.total_lost
        )),
        Line::from(vec![
            Span::raw("Net: "),
            Span::styled(leaderboard::format_net_eth(stats), net_style),
        ]),
    ];
    let p = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Your Stats"));
    f.render_widget(p, area);
}

fn draw_table(f: &mut Frame, area: Rect, snap: &AppSnapshot) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    let phase_style = match snap.round.phase() {
        Phase::ComeOut => Style::default().fg(Color::Cyan),
        Phase::Point(_) => Style::default().fg(Color::Yellow),
        Phase::Finished(Outcome::Win) => {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        }
        Phase::Finished(Outcome::Lose) => {
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
        }
    };
    let dice_style = if snap.rolling {
        Style::default().fg(Color::Magenta)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };
    let mut lines = vec![
        Line::from(Span::styled(dice_faces(snap.dice), dice_style)),
        Line::from(format!("Total: {}", snap.dice.total())),
        Line::from(""),
        Line::from(Span::styled(snap.round.to_string(), phase_style)),
    ];
    if let Some(point) = snap.round.point() {
        lines.push(Line::from(format!("Point: {point}")));
    }
    let title = if snap.rolling { "Rolling..." } else { "Street Craps" };
    let p = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(p, cols[0]);

    let skip = snap.history.len().saturating_sub(HISTORY_ROWS);
    let items: Vec<ListItem> = snap
        .history
        .iter()
        .skip(skip)
        .map(|line| ListItem::new(line.clone()))
        .collect();
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("This Game"));
    f.render_widget(list, cols[1]);
}

fn draw_leaderboard(f: &mut Frame, area: Rect, snap: &AppSnapshot) {
    let title = format!(
        "Leaderboard - {} ({})",
        snap.sort_key,
        sort_key_tabs(snap.sort_key)
    );
    let mut block = Block::default().borders(Borders::ALL).title(title);
    if let Some(footer) = leaderboard_footer(&snap.leaderboard) {
        block = block.title_bottom(Line::from(footer).right_aligned());
    }
    if snap.leaderboard.entries.is_empty() {
        let p = Paragraph::new("No players yet. Be the first to play!")
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(p, area);
        return;
    }
    let header = Row::new(vec!["#", "Player", "Games", "W-L", "Win Rate", "Net", "Won"])
        .style(Style::default().add_modifier(Modifier::BOLD));
    let rows: Vec<Row> = snap
        .leaderboard
        .entries
        .iter()
        .enumerate()
        .map(|(idx, player)| {
            let stats = &player.stats;
            let net_color = if stats.net() >= 0.0 {
                Color::Green
            } else {
                Color::Red
            };
            let is_me = snap.address.as_deref() == Some(player.address.as_str());
            let row = Row::new(vec![
                Cell::from(format!("{}", idx + 1)),
                Cell::from(leaderboard::format_address(&player.address)),
                Cell::from(stats.games_played.to_string()),
                Cell::from(format!("{}W - {}L", stats.games_won, stats.games_lost)),
                Cell::from(leaderboard::format_win_rate(stats)),
                Cell::from(leaderboard::format_net_eth(stats))
                    .style(Style::default().fg(net_color)),
                Cell::from(format!("{:.4} ETH", stats.total_won)),
            ]);
            if is_me {
                row.style(Style::default().add_modifier(Modifier::REVERSED))
            } else {
                row
            }
        })
        .collect();
    let widths = [
        Constraint::Length(3),
        Constraint::Length(15),
        Constraint::Length(6),
        Constraint::Length(12),
        Constraint::Length(9),
        Constraint::Length(16),
        Constraint::Length(14),
    ];
    let table = Table::new(rows, widths).header(header).block(block);
    f.render_widget(table, area);
}

fn leaderboard_footer(view: &LeaderboardView) -> Option<String> {
    view.is_truncated().then(|| {
        format!(
            "Showing top {} of {} players",
            view.entries.len(),
            view.total_players
        )
    })
}

fn draw_bottom(f: &mut Frame, area: Rect, snap: &AppSnapshot) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let mut lines = vec![Line::from(snap.status.clone())];
    if let Some(last) = snap.errors.last() {
        lines.push(Line::from(Span::styled(
            format!("! {last}"),
            Style::default().fg(Color::Red),
        )));
    }
    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Status"));
    f.render_widget(p, cols[0]);

    let roll_hint = if snap.can_roll {
        Span::raw("r roll")
    } else {
        Span::styled("r roll", Style::default().fg(Color::DarkGray))
    };
    let help = vec![
        Line::from(vec![roll_hint, Span::raw("  n new game  b bet")]),
        Line::from("s sort leaderboard  q quit"),
    ];
    let p = Paragraph::new(help).block(Block::default().borders(Borders::ALL).title("Keys"));
    f.render_widget(p, cols[1]);
}

fn draw_modals(f: &mut Frame, state: &UiState) {
    match &state.mode {
        Mode::Normal => {}
        Mode::WagerModal(ws) => {
            let area = centered_rect(40, 20, f.area());
            f.render_widget(Clear, area);
            let lines = vec![
                Line::from(format!("Bet (ETH): {}_", ws.input)),
                Line::from(""),
                Line::from("Enter confirm  Esc cancel"),
            ];
            let p = Paragraph::new(lines)
                .block(Block::default().borders(Borders::ALL).title("Place Bet"));
            f.render_widget(p, area);
        }
        Mode::QuitModal => {
            let area = centered_rect(30, 15, f.area());
            f.render_widget(Clear, area);
            let p = Paragraph::new("Quit? y to confirm, any other key to stay")
                .wrap(Wrap { trim: true })
                .block(Block::default().borders(Borders::ALL).title("Quit"));
            f.render_widget(p, area);
        }
    }
}

fn centered_rect(w_percent: u16, h_percent: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - h_percent) / 2),
            Constraint::Percentage(h_percent),
            Constraint::Percentage((100 - h_percent) / 2),
        ])
        .split(r);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - w_percent) / 2),
            Constraint::Percentage(w_percent),
            Constraint::Percentage((100 - w_percent) / 2),
        ])
        .split(popup_layout[1])[1]
}

fn die_face(value: u8) -> char {
    match value {
        1 => '⚀',
        2 => '⚁',
        3 => '⚂',
        4 => '⚃',
        5 => '⚄',
        _ => '⚅',
    }
}

fn dice_faces(dice: Dice) -> String {
    format!(
        "{} {}   ({} + {})",
        die_face(dice.die1()),
        die_face(dice.die2()),
        dice.die1(),
        dice.die2()
    )
}

fn sort_key_tabs(current: SortKey) -> String {
    SortKey::ALL
        .iter()
        .map(|key| {
            if *key == current {
                format!("[{}]", key.label())
            } else {
                key.label().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" | ")
}
