use rustyline::{Config, Editor, Result};

use super::session::Session;

/// `login> ` while logged out, `{user}> ` afterwards.
pub fn generate_prompt(session: &Session) -> String {
    if session.is_authenticated() {
        format!("{}> ", session.user_id())
    } else {
        "login> ".to_string()
    }
}

pub fn rl() -> Result<Editor<()>> {
    let config = Config::builder()
        .history_ignore_space(true)
        .build();
    Editor::with_config(config)
}
