use std::collections::VecDeque;

use eyre::Result;
use rustyline::error::ReadlineError;
use rustyline::Editor;

use super::prompt;

/// Where lines of input come from: the terminal, or a fixed script.
pub enum InputSource {
    Readline(Box<Editor<()>>),
    Scripted(VecDeque<String>),
}

impl InputSource {
    pub fn terminal() -> Result<Self> {
        Ok(Self::Readline(Box::new(prompt::rl()?)))
    }

    pub fn scripted<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Scripted(lines.into_iter().map(Into::into).collect())
    }

    /// Next line, or `None` at end of input. Ctrl-C at the prompt discards
    /// the line being typed.
    pub fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        match self {
            Self::Readline(rl) => loop {
                match rl.readline(prompt) {
                    Ok(line) => {
                        if !line.trim().is_empty() {
                            rl.add_history_entry(line.as_str());
                        }
                        return Ok(Some(line));
                    }
                    Err(ReadlineError::Interrupted) => continue,
                    Err(ReadlineError::Eof) => return Ok(None),
                    Err(e) => return Err(e.into()),
                }
            },
            Self::Scripted(lines) => Ok(lines.pop_front()),
        }
    }
}
