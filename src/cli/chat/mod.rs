pub mod command;
pub mod generate;
pub mod history;
pub mod input_source;
pub mod prompt;
pub mod render;
pub mod session;

use std::io::Write;
use std::process::ExitCode;
use std::sync::Arc;

use chrono::Local;
use color_print::cformat;
use command::Command;
use eyre::Result;
use generate::{generate_response, Dispatcher};
use input_source::InputSource;
use prompt::generate_prompt;
use session::Session;
use tracing::{debug, error};

use crate::backend_client::{history_url, Backend};
use crate::config::Config;

const HELP_TEXT: &str = "
AI Assistant

/login [id]     Log in, optionally as a different user
/logout         Log out
/whoami         Show the current user
/history        List this session's conversations
/history N      Expand conversation N
/link           Show the link to your full history
/help           Show this help dialogue
/quit           Quit the application

Anything else is sent as a query. Start a query with // to send text
that begins with /. Ctrl-C cancels a pending request.
";

enum Flow {
    Continue,
    Quit,
}

pub struct ChatContext {
    output: Box<dyn Write>,
    input: Option<String>,
    interactive: bool,
    config: Config,
    session: Session,
    dispatcher: Dispatcher,
}

impl ChatContext {
    pub fn new(
        output: Box<dyn Write>,
        input: Option<String>,
        interactive: bool,
        config: Config,
        backend: Arc<dyn Backend>,
    ) -> Self {
        let session = Session::new(&config.default_user_id);
        Self {
            output,
            input,
            interactive,
            config,
            session,
            dispatcher: Dispatcher::new(backend),
        }
    }

    pub async fn run(&mut self, source: InputSource) -> Result<ExitCode> {
        // Single query: log in as the configured user and answer once
        if let Some(input) = self.input.take() {
            let user_id = self.config.default_user_id.clone();
            self.session.login(&user_id);
            let ok = self.submit(&input).await?;
            return Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE });
        }

        if self.interactive {
            self.print_welcome()?;
            self.run_interactive(source).await?;
        }

        Ok(ExitCode::SUCCESS)
    }

    fn print_welcome(&mut self) -> Result<()> {
        writeln!(self.output, "{}", cformat!("<bold>🔐 Authentication</>"))?;
        writeln!(
            self.output,
            "Log in with /login <user id>, or just /login to continue as {}.",
            self.session.user_id()
        )?;
        writeln!(self.output)?;
        Ok(())
    }

    async fn run_interactive(&mut self, mut source: InputSource) -> Result<()> {
        loop {
            let prompt_text = generate_prompt(&self.session);
            let Some(line) = source.read_line(&prompt_text)? else {
                break;
            };

            match self.handle_input(&line).await {
                Ok(Flow::Quit) => break,
                Ok(Flow::Continue) => {}
                Err(e) => {
                    error!("Failed to handle input: {}", e);
                    writeln!(self.output, "Error: {}", e)?;
                }
            }
        }

        Ok(())
    }

    async fn handle_input(&mut self, line: &str) -> Result<Flow> {
        let command = Command::parse(line);
        debug!("Parsed input as {:?}", command);

        if !self.session.is_authenticated() && !command.allowed_logged_out() {
            render::notice(&mut *self.output, "Please log in first: /login [user id]")?;
            return Ok(Flow::Continue);
        }

        match command {
            Command::Login(user_id) => {
                let user_id = user_id.unwrap_or_else(|| self.session.user_id().to_string());
                self.session.login(&user_id);
                let today = Local::now().format("%Y-%m-%d").to_string();
                render::banner(&mut *self.output, &today)?;
                render::user_line(&mut *self.output, self.session.user_id())?;
                self.print_history_link()?;
            }
            Command::Logout => {
                self.session.logout();
                render::notice(&mut *self.output, "Logged out.")?;
            }
            Command::WhoAmI => {
                render::user_line(&mut *self.output, self.session.user_id())?;
            }
            Command::History(None) => {
                render::history_panel(&mut *self.output, self.session.history())?;
            }
            Command::History(Some(number)) => match self.session.history().get(number) {
                Some(entry) => {
                    render::history_entry(&mut *self.output, number, entry, render::terminal_width())?
                }
                None => render::notice(&mut *self.output, &format!("No history entry {}", number))?,
            },
            Command::Link => self.print_history_link()?,
            Command::Help => {
                writeln!(self.output, "{}", HELP_TEXT)?;
            }
            Command::Quit => return Ok(Flow::Quit),
            Command::Unknown(name) => {
                render::notice(
                    &mut *self.output,
                    &format!(
                        "Unknown command /{}. Type /help for the list, or start with // to send it as a query.",
                        name
                    ),
                )?;
            }
            Command::InvalidArgument(message) => {
                render::notice(&mut *self.output, &message)?;
            }
            Command::Query(query) => {
                self.submit(&query).await?;
            }
        }

        Ok(Flow::Continue)
    }

    fn print_history_link(&mut self) -> Result<()> {
        let url = history_url(&self.config, self.session.user_id());
        render::history_link(&mut *self.output, url.as_str())
    }

    /// Runs one generate-response and renders its outcome. Returns whether it
    /// succeeded.
    async fn submit(&mut self, query: &str) -> Result<bool> {
        if !query.trim().is_empty() {
            writeln!(self.output, "{}", cformat!("<dim>Generating responses...</>"))?;
            self.output.flush()?;
        }

        let cancel = async {
            if tokio::signal::ctrl_c().await.is_err() {
                std::future::pending::<()>().await;
            }
        };

        match generate_response(&mut self.session, &self.dispatcher, query, cancel).await {
            Ok(generation) => {
                render::generation(&mut *self.output, &generation, render::terminal_width())?;
                Ok(true)
            }
            Err(e) => {
                render::error(&mut *self.output, &e.to_string())?;
                Ok(false)
            }
        }
    }

    #[cfg(test)]
    fn session(&self) -> &Session {
        &self.session
    }
}
