/// One-line path prompt standing in for the open/save file dialogs.
use std::path::PathBuf;

use crossterm::event::KeyCode;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PromptKind {
    Open,
    Save,
}

#[derive(Debug)]
pub enum PromptOutcome {
    Pending,
    Cancelled,
    Submitted(PromptKind, PathBuf),
}

#[derive(Debug)]
pub struct Prompt {
    pub kind: PromptKind,
    pub buffer: String,
}

impl Prompt {
    pub fn new(kind: PromptKind, initial: &str) -> Self {
        Prompt {
            kind,
            buffer: initial.to_string(),
        }
    }

    pub fn handle_key(&mut self, code: KeyCode) -> PromptOutcome {
        match code {
            KeyCode::Esc => PromptOutcome::Cancelled,
            KeyCode::Enter => {
                let path = self.buffer.trim();
                if path.is_empty() {
                    PromptOutcome::Cancelled
                } else {
                    PromptOutcome::Submitted(self.kind, PathBuf::from(path))
                }
            }
            KeyCode::Backspace => {
                self.buffer.pop();
                PromptOutcome::Pending
            }
            KeyCode::Char(c) => {
                self.buffer.push(c);
                PromptOutcome::Pending
            }
            _ => PromptOutcome::Pending,
        }
    }

    pub fn label(&self) -> String {
        let title = match self.kind {
            PromptKind::Open => "Open image (png, jpg, jpeg, bmp)",
            PromptKind::Save => "Save as (png, jpg)",
        };
        format!("{}: {}_", title, self.buffer)
    }
}
