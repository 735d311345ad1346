use std::{thread, time::Duration};

use anyhow::Result;
use chrono::{DateTime, Local};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use tokio::sync::mpsc;
use tracing::{debug, info};

use hilo_core::{
    controls::{Action, Applied, Keymap},
    session::{CountingSession, DealOutcome, ExhaustionPolicy, Headline, SessionView},
};

use crate::{block_font, terminal::TerminalGuard};

const TICK_RATE: Duration = Duration::from_millis(250);
const TITLE: &str = "HI-LO";

#[derive(Debug, Clone)]
struct Theme {
    primary_fg: Color,
    accent: Color,
    muted: Color,
    success: Color,
    warning: Color,
    danger: Color,
    red_suit: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary_fg: Color::White,
            accent: Color::Cyan,
            muted: Color::DarkGray,
            success: Color::Green,
            warning: Color::Yellow,
            danger: Color::Red,
            red_suit: Color::LightRed,
        }
    }
}

enum AppEvent {
    Input(Event),
    Tick,
}

/// Terminal front end for a counting session.
pub struct CountingApp {
    session: CountingSession,
    keymap: Keymap,
    seed: Option<u64>,
    show_controls: bool,
    status: String,
    started_at: DateTime<Local>,
    should_quit: bool,
    theme: Theme,
}

impl CountingApp {
    pub fn new(
        session: CountingSession,
        keymap: Keymap,
        seed: Option<u64>,
        show_controls: bool,
    ) -> Self {
        let status = format!(
            "Press {} to deal the first card",
            keymap.label(Action::Deal)
        );
        Self {
            session,
            keymap,
            seed,
            show_controls,
            status,
            started_at: Local::now(),
            should_quit: false,
            theme: Theme::default(),
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut guard = TerminalGuard::acquire()?;

        let (event_tx, mut event_rx) = mpsc::channel::<AppEvent>(128);
        spawn_input_thread(event_tx);

        loop {
            guard.terminal().draw(|frame| self.draw(frame))?;
            if self.should_quit {
                break;
            }
            match event_rx.recv().await {
                Some(AppEvent::Input(event)) => self.handle_input(event),
                Some(AppEvent::Tick) => {}
                None => break,
            }
        }

        info!(
            dealt = self.session.dealt(),
            count = self.session.running_count(),
            "leaving counting session"
        );
        guard.release()
    }

    fn handle_input(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Resize(_, _) => {}
            Event::Mouse(_) => {}
            Event::FocusGained | Event::FocusLost | Event::Paste(_) => {}
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }
        let Some(name) = key_name(&key) else {
            return;
        };
        match self.keymap.action_for(&name) {
            Some(action) => self.handle_action(action),
            None => debug!(key = %name, "unbound key"),
        }
    }

    fn handle_action(&mut self, action: Action) {
        self.status = match action.apply(&mut self.session) {
            Applied::Dealt(DealOutcome::Dealt(card)) => {
                format!("Dealt {card} ({} left)", self.session.remaining())
            }
            Applied::Dealt(DealOutcome::Reshuffled(card)) => {
                format!("Deck exhausted; reshuffled and dealt {card}")
            }
            Applied::Dealt(DealOutcome::Finished) | Applied::DealDisabled => format!(
                "Deck finished. Press {} to start over",
                self.keymap.label(Action::Reset)
            ),
            Applied::Revealed(count) => format!("Running count: {}", signed(count)),
            Applied::Reset => {
                self.started_at = Local::now();
                format!(
                    "New deck shuffled. Press {} to deal",
                    self.keymap.label(Action::Deal)
                )
            }
            Applied::Quit => {
                self.should_quit = true;
                return;
            }
        };
    }

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.size();
        let view = self.session.view();
        let panels = PanelHeights::plan(area.height, self.show_controls);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(panels.banner),
                Constraint::Length(panels.card),
                Constraint::Length(panels.count),
                Constraint::Length(panels.controls),
                Constraint::Length(panels.status),
            ])
            .split(area);

        if panels.banner > 0 {
            self.render_banner(frame, layout[0]);
        }
        self.render_card(frame, layout[1], &view);
        self.render_count(frame, layout[2], &view);
        if panels.controls > 0 {
            self.render_controls(frame, layout[3], &view);
        }
        self.render_status(frame, layout[4], &view);
    }

    fn render_banner(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title("Card Counting Practice");
        let style = Style::default()
            .fg(self.theme.accent)
            .add_modifier(Modifier::BOLD);
        let inner = block.inner(area);
        let banner_fits = fits(inner, block_font::banner_width(TITLE), block_font::BANNER_HEIGHT);
        let content: Vec<Line> = if banner_fits {
            block_font::render(TITLE)
                .into_iter()
                .map(|line| Line::from(Span::styled(line, style)))
                .collect()
        } else {
            vec![Line::from(Span::styled(TITLE, style))]
        };
        let paragraph = Paragraph::new(centered(content, inner.height))
            .block(block)
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, area);
    }

    fn render_card(&self, frame: &mut Frame, area: Rect, view: &SessionView) {
        let block = Block::default().borders(Borders::ALL).title("Current Card");
        let inner = block.inner(area);

        let lines: Vec<Line> = match view.headline {
            Headline::Card(card) => {
                let color = if card.suit.is_red() {
                    self.theme.red_suit
                } else {
                    self.theme.primary_fg
                };
                let style = Style::default().fg(color).add_modifier(Modifier::BOLD);
                big_text(&card.to_string(), style, inner)
            }
            Headline::Finished => vec![
                Line::from(Span::styled(
                    view.headline.to_string(),
                    Style::default()
                        .fg(self.theme.warning)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    format!("Press {} to reset", self.keymap.label(Action::Reset)),
                    Style::default().fg(self.theme.muted),
                )),
            ],
            Headline::AwaitingDeal => vec![Line::from(Span::styled(
                format!("Press {} to deal a card", self.keymap.label(Action::Deal)),
                Style::default().fg(self.theme.primary_fg),
            ))],
        };

        let paragraph = Paragraph::new(centered(lines, inner.height))
            .block(block)
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, area);
    }

    fn render_count(&self, frame: &mut Frame, area: Rect, view: &SessionView) {
        let block = Block::default().borders(Borders::ALL).title("Running Count");
        let inner = block.inner(area);
        let lines: Vec<Line> = match view.count {
            Some(count) => {
                let color = match count {
                    c if c > 0 => self.theme.success,
                    c if c < 0 => self.theme.danger,
                    _ => self.theme.primary_fg,
                };
                let style = Style::default().fg(color).add_modifier(Modifier::BOLD);
                big_text(&signed(count), style, inner)
            }
            None => vec![Line::from(Span::styled(
                format!("Hidden. Press {} to reveal", self.keymap.label(Action::Reveal)),
                Style::default().fg(self.theme.muted),
            ))],
        };
        let paragraph = Paragraph::new(centered(lines, inner.height))
            .block(block)
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, area);
    }

    fn render_controls(&self, frame: &mut Frame, area: Rect, view: &SessionView) {
        let lines: Vec<Line> = Action::ALL
            .iter()
            .map(|action| {
                let enabled = *action != Action::Deal || view.deal_enabled;
                let key_style = if enabled {
                    Style::default()
                        .fg(self.theme.accent)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                        .fg(self.theme.muted)
                        .add_modifier(Modifier::CROSSED_OUT)
                };
                let text_style = if enabled {
                    Style::default().fg(self.theme.primary_fg)
                } else {
                    Style::default().fg(self.theme.muted)
                };
                Line::from(vec![
                    Span::styled(format!("{:>18}", self.keymap.label(*action)), key_style),
                    Span::raw("  →  "),
                    Span::styled(action.describe(), text_style),
                ])
            })
            .collect();
        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Controls"));
        frame.render_widget(paragraph, area);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect, view: &SessionView) {
        let block = Block::default().borders(Borders::ALL).title("Status");
        let seed = self
            .seed
            .map(|seed| seed.to_string())
            .unwrap_or_else(|| "random".to_string());
        let policy = match self.session.policy() {
            ExhaustionPolicy::Finish => "finish",
            ExhaustionPolicy::Reshuffle => "reshuffle",
        };
        let secondary = format!(
            "Remaining: {}  Dealt: {}  Seed: {seed}  On empty: {policy}  Elapsed: {}",
            view.remaining,
            view.dealt,
            format_elapsed(Local::now() - self.started_at),
        );
        let paragraph = Paragraph::new(vec![
            Line::from(self.status.clone()),
            Line::from(Span::styled(secondary, Style::default().fg(self.theme.muted))),
        ])
        .block(block)
        .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }
}

/// Row budget for each panel, highest priority first: status, a one-line
/// card and count, controls, block-letter card and count, banner. Any rows
/// left over go to the card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PanelHeights {
    banner: u16,
    card: u16,
    count: u16,
    controls: u16,
    status: u16,
}

const STATUS_HEIGHT: u16 = 4;
const LINE_PANEL_HEIGHT: u16 = 3;
const BIG_PANEL_HEIGHT: u16 = block_font::FLAT_HEIGHT as u16 + 2;
const BANNER_PANEL_HEIGHT: u16 = block_font::BANNER_HEIGHT as u16 + 2;

impl PanelHeights {
    fn plan(height: u16, show_controls: bool) -> Self {
        let mut left = height;
        let status = take(&mut left, STATUS_HEIGHT);
        let mut card = take(&mut left, LINE_PANEL_HEIGHT);
        let mut count = take(&mut left, LINE_PANEL_HEIGHT);
        let controls = if show_controls {
            take_whole(&mut left, Action::ALL.len() as u16 + 2)
        } else {
            0
        };
        card += take_whole(&mut left, BIG_PANEL_HEIGHT - LINE_PANEL_HEIGHT);
        count += take_whole(&mut left, BIG_PANEL_HEIGHT - LINE_PANEL_HEIGHT);
        let banner = match take_whole(&mut left, BANNER_PANEL_HEIGHT) {
            0 => take_whole(&mut left, LINE_PANEL_HEIGHT),
            rows => rows,
        };
        card += left;
        Self {
            banner,
            card,
            count,
            controls,
            status,
        }
    }
}

fn take(left: &mut u16, wanted: u16) -> u16 {
    let granted = wanted.min(*left);
    *left -= granted;
    granted
}

/// All of `wanted` or nothing.
fn take_whole(left: &mut u16, wanted: u16) -> u16 {
    if *left < wanted {
        return 0;
    }
    *left -= wanted;
    wanted
}

fn fits(area: Rect, width: usize, height: usize) -> bool {
    width <= area.width as usize && height <= area.height as usize
}

/// Block letters when they fit `area`, plain text otherwise.
fn big_text(text: &str, style: Style, area: Rect) -> Vec<Line<'static>> {
    if fits(area, block_font::flat_width(text), block_font::FLAT_HEIGHT) {
        block_font::render_flat(text)
            .into_iter()
            .map(|line| Line::from(Span::styled(line, style)))
            .collect()
    } else {
        vec![Line::from(Span::styled(text.to_string(), style))]
    }
}

/// Pad `lines` from the top so they sit in the middle of `height` rows.
fn centered(lines: Vec<Line<'static>>, height: u16) -> Vec<Line<'static>> {
    let pad = (height as usize).saturating_sub(lines.len()) / 2;
    let mut padded = vec![Line::from(""); pad];
    padded.extend(lines);
    padded
}

/// Canonical key name understood by [`Keymap`].
fn key_name(key: &KeyEvent) -> Option<String> {
    let name = match key.code {
        KeyCode::Tab => "tab".to_string(),
        KeyCode::Enter => "enter".to_string(),
        KeyCode::Esc => "esc".to_string(),
        KeyCode::Backspace => "backspace".to_string(),
        KeyCode::Up => "up".to_string(),
        KeyCode::Down => "down".to_string(),
        KeyCode::Left => "left".to_string(),
        KeyCode::Right => "right".to_string(),
        KeyCode::Char(' ') => "space".to_string(),
        KeyCode::Char(ch) if key.modifiers.contains(KeyModifiers::CONTROL) => {
            format!("ctrl+{}", ch.to_ascii_lowercase())
        }
        KeyCode::Char(ch) => ch.to_string(),
        _ => return None,
    };
    Some(name)
}

fn signed(count: i32) -> String {
    if count > 0 {
        format!("+{count}")
    } else {
        count.to_string()
    }
}

fn format_elapsed(elapsed: chrono::Duration) -> String {
    let total = elapsed.num_seconds().max(0);
    format!("{:02}:{:02}", total / 60, total % 60)
}

fn spawn_input_thread(sender: mpsc::Sender<AppEvent>) {
    thread::spawn(move || loop {
        match event::poll(TICK_RATE) {
            Ok(true) => match event::read() {
                Ok(evt) => {
                    if sender.blocking_send(AppEvent::Input(evt)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            },
            Ok(false) => {
                if sender.blocking_send(AppEvent::Tick).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    });
}
