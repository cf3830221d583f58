mod prompt;
mod render;

use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    terminal, ExecutableCommand,
};
use log::warn;

use prompt::{Prompt, PromptKind, PromptOutcome};
use render::Layout;
use tank_arcade::editor::{Editor, NO_IMAGE};

#[derive(Parser)]
#[command(author, version, about = "Crop, undo, resize and save an image in the terminal", long_about = None)]
struct Args {
    /// Image to open on start (png, jpg, jpeg, bmp)
    input: Option<PathBuf>,
    /// Default path offered by the save prompt
    #[arg(long, short, default_value = "cropped.png")]
    output: PathBuf,
}

struct App {
    editor: Editor,
    prompt: Option<Prompt>,
    /// One-shot message (errors, confirmations) shown instead of the image info.
    message: Option<String>,
    last_open: Option<PathBuf>,
    output: PathBuf,
}

enum Flow {
    Continue,
    Quit,
}

impl App {
    fn open(&mut self, path: &Path) {
        match self.editor.load(path) {
            Ok(()) => self.last_open = Some(path.to_path_buf()),
            Err(err) => self.fail(err),
        }
    }

    fn save(&mut self, path: &Path) {
        match self.editor.save(path) {
            Ok(()) => self.output = path.to_path_buf(),
            Err(err) => self.fail(err),
        }
    }

    fn fail(&mut self, err: anyhow::Error) {
        warn!("{:#}", err);
        self.message = Some(format!("Error: {:#}", err));
    }

    fn status_line(&self) -> Option<String> {
        match (&self.prompt, &self.message) {
            (Some(prompt), _) => Some(prompt.label()),
            (None, Some(message)) => Some(message.clone()),
            (None, None) => None,
        }
    }

    fn on_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> Flow {
        if let Some(prompt) = self.prompt.as_mut() {
            match prompt.handle_key(code) {
                PromptOutcome::Pending => {}
                PromptOutcome::Cancelled => self.prompt = None,
                PromptOutcome::Submitted(kind, path) => {
                    self.prompt = None;
                    match kind {
                        PromptKind::Open => self.open(&path),
                        PromptKind::Save => self.save(&path),
                    }
                }
            }
            return Flow::Continue;
        }

        self.message = None;
        match code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Flow::Quit,
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return Flow::Quit,
            KeyCode::Char('o') | KeyCode::Char('O') => {
                let initial = self
                    .last_open
                    .as_deref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default();
                self.prompt = Some(Prompt::new(PromptKind::Open, &initial));
            }
            KeyCode::Char('s') | KeyCode::Char('S') => {
                if self.editor.working().is_none() {
                    self.message = Some(NO_IMAGE.to_string());
                } else {
                    let initial = self.output.display().to_string();
                    self.prompt = Some(Prompt::new(PromptKind::Save, &initial));
                }
            }
            KeyCode::Char('u') | KeyCode::Char('U') => {
                self.editor.undo();
            }
            KeyCode::Char('+') | KeyCode::Char('=') => self.editor.nudge_scale(1),
            KeyCode::Char('-') | KeyCode::Char('_') => self.editor.nudge_scale(-1),
            _ => {}
        }
        Flow::Continue
    }

    fn on_mouse(&mut self, ev: MouseEvent, layout: &Layout) {
        let canvas = &layout.main;
        match ev.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some((x, y)) = canvas.to_logical(ev.column, ev.row) {
                    self.message = None;
                    self.editor.begin_drag(x, y);
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                let (x, y) = canvas.to_logical_clamped(ev.column, ev.row);
                self.editor.drag_to(x, y);
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let (x, y) = canvas.to_logical_clamped(ev.column, ev.row);
                self.editor.end_drag(x, y);
            }
            _ => {}
        }
    }
}

/// Synchronous event dispatch: wait for an event, handle it, redraw.
fn event_loop<W: Write>(out: &mut W, app: &mut App) -> Result<()> {
    loop {
        let (width, height) = terminal::size()?;
        let layout = Layout::new(width, height);
        let status = app.status_line();
        render::render(out, &app.editor, &layout, status.as_deref())?;

        match event::read()? {
            Event::Key(KeyEvent {
                code,
                modifiers,
                kind: KeyEventKind::Press,
                ..
            }) => {
                if let Flow::Quit = app.on_key(code, modifiers) {
                    return Ok(());
                }
            }
            Event::Mouse(ev) if app.prompt.is_none() => app.on_mouse(ev, &layout),
            _ => {}
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let mut app = App {
        editor: Editor::new(),
        prompt: None,
        message: None,
        last_open: None,
        output: args.output,
    };
    if let Some(path) = args.input.as_deref() {
        app.open(path);
    }

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;

    let result = event_loop(&mut out, &mut app);

    // Always restore the terminal
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}
