mod display;

use std::collections::HashMap;
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, KeyboardEnhancementFlags, MouseButton, MouseEvent, MouseEventKind,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use tank_arcade::compute::{apply_menu_action, new_session, tick};
use tank_arcade::config::FRAME;
use tank_arcade::entities::{Input, Phase, Session, TankClass};
use tank_arcade::high_score;
use tank_arcade::menu::{hit_test, MenuAction, GAME_OVER_BUTTONS, HOME_BUTTONS};

#[derive(Parser)]
#[command(author, version, about = "Top-down tank shooter for the terminal", long_about = None)]
struct Args {
    /// File holding the best score (default: $TANK_GAME_SCORE_FILE or ~/.tank_game_score)
    #[arg(long)]
    high_score_file: Option<PathBuf>,
    /// Seed the RNG for a reproducible run
    #[arg(long)]
    seed: Option<u64>,
}

// ── Held-key input ────────────────────────────────────────────────────────────

/// Min frames between shots while Space is held.
/// 10 frames @ 60 FPS = 6 shots/sec.
const SHOOT_COOLDOWN: u32 = 10;

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events:
/// the OS key-repeat rate is ≥ 15 Hz, so a window of 8 frames (≈133 ms) is
/// always refreshed before expiry.
const HOLD_WINDOW: u64 = 8;

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

fn any_held(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|k| is_held(key_frame, k, frame))
}

/// Reduce the held-key map to this frame's intent.
fn held_input(key_frame: &HashMap<KeyCode, u64>, frame: u64, fire: bool) -> Input {
    Input {
        left: any_held(key_frame, &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')], frame),
        right: any_held(key_frame, &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')], frame),
        up: any_held(key_frame, &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')], frame),
        down: any_held(key_frame, &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')], frame),
        fire,
    }
}

/// Keyboard shortcut for a menu button on the current screen.
fn menu_key(phase: Phase, code: KeyCode) -> Option<MenuAction> {
    match (phase, code) {
        (Phase::Menu, KeyCode::Enter | KeyCode::Char('p') | KeyCode::Char('P')) => {
            Some(MenuAction::Play)
        }
        (Phase::Menu, KeyCode::Char('r') | KeyCode::Char('R')) => {
            Some(MenuAction::ResetHighScore)
        }
        (Phase::Menu, KeyCode::Char('1')) => Some(MenuAction::SelectPower),
        (Phase::Menu, KeyCode::Char('2')) => Some(MenuAction::SelectDefence),
        (Phase::GameOver, KeyCode::Enter | KeyCode::Char('h') | KeyCode::Char('H')) => {
            Some(MenuAction::Home)
        }
        _ => None,
    }
}

// ── Main loop ─────────────────────────────────────────────────────────────────

/// Owns everything that outlives a single session.
struct App {
    session: Session,
    score_path: PathBuf,
    rng: StdRng,
}

impl App {
    fn menu_action(&mut self, action: MenuAction) {
        if action == MenuAction::ResetHighScore {
            if let Err(err) = high_score::reset(&self.score_path) {
                warn!("could not reset high score: {}", err);
            }
        }
        self.session = apply_menu_action(&self.session, action, &mut self.rng);
    }

    /// Called once on the frame the session enters game over.
    fn session_finished(&mut self) {
        let best = high_score::record(
            &self.score_path,
            self.session.high_score,
            self.session.player.score,
        );
        info!("best score now {}", best);
    }
}

/// Runs until the player quits.
///
/// Input model: instead of acting on each key event individually, we maintain
/// a `key_frame` map that records the frame number of the last press/repeat
/// event for every key.  Each frame we check which keys are still "fresh"
/// (within `HOLD_WINDOW` frames) and apply all their effects simultaneously.
/// This allows Space + arrows to be held at the same time with no
/// interference.  Mouse clicks are only used on the menu screens.
fn game_loop<W: Write>(out: &mut W, app: &mut App, rx: &mpsc::Receiver<Event>) -> Result<()> {
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut shoot_cooldown: u32 = 0;
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;
        let (width, height) = terminal::size()?;
        let vp = display::playfield_viewport(width, height);

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            match ev {
                Event::Key(KeyEvent { code, kind, modifiers, .. }) => match kind {
                    KeyEventKind::Press => {
                        key_frame.insert(code, frame);
                        match code {
                            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                                return Ok(());
                            }
                            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                                return Ok(());
                            }
                            _ => {}
                        }
                        if let Some(action) = menu_key(app.session.phase, code) {
                            app.menu_action(action);
                        }
                    }
                    KeyEventKind::Repeat => {
                        key_frame.insert(code, frame);
                    }
                    KeyEventKind::Release => {
                        key_frame.remove(&code);
                    }
                },
                Event::Mouse(MouseEvent {
                    kind: MouseEventKind::Down(MouseButton::Left),
                    column,
                    row,
                    ..
                }) => {
                    let buttons: &[_] = match app.session.phase {
                        Phase::Menu => &HOME_BUTTONS[..],
                        Phase::GameOver => &GAME_OVER_BUTTONS[..],
                        Phase::Playing => &[],
                    };
                    let action = vp
                        .to_logical(column, row)
                        .and_then(|(x, y)| hit_test(buttons, x, y));
                    if let Some(action) = action {
                        app.menu_action(action);
                    }
                }
                _ => {}
            }
        }

        // ── Simulate ──────────────────────────────────────────────────────────
        if app.session.phase == Phase::Playing {
            let fire_held = is_held(&key_frame, &KeyCode::Char(' '), frame);
            let fire = fire_held && shoot_cooldown == 0;
            if fire {
                shoot_cooldown = SHOOT_COOLDOWN;
            }
            let input = held_input(&key_frame, frame, fire);
            app.session = tick(&app.session, &input, &mut app.rng);
            if app.session.phase == Phase::GameOver {
                app.session_finished();
            }
        }
        shoot_cooldown = shoot_cooldown.saturating_sub(1);

        display::render(out, &app.session, &vp)?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            std::thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let score_path = args.high_score_file.unwrap_or_else(high_score::default_path);
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let best = high_score::load(&score_path);
    info!("high score {} from {}", best, score_path.display());
    let session = new_session(TankClass::Defence, best, &mut rng);
    let mut app = App {
        session,
        score_path,
        rng,
    };

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let result = game_loop(&mut out, &mut app, &rx);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}
