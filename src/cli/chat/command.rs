/// A line of user input, classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/login [id]`. `None` keeps the current identifier.
    Login(Option<String>),
    Logout,
    /// `/history [n]`
    History(Option<usize>),
    Link,
    WhoAmI,
    Help,
    Quit,
    /// A `/word` that is not a known command.
    Unknown(String),
    /// `/history` with an argument that is not a positive number.
    InvalidArgument(String),
    /// Anything that is not a command is a query. A leading `//` escapes a
    /// query that itself starts with `/`.
    Query(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        let Some(rest) = trimmed.strip_prefix('/') else {
            return Command::Query(line.to_string());
        };
        // `//text` sends `/text` as a query
        if rest.starts_with('/') {
            return Command::Query(rest.to_string());
        }
        if rest.trim().is_empty() {
            return Command::Query(line.to_string());
        }

        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (rest, ""),
        };
        let arg = (!arg.is_empty()).then(|| arg.to_string());

        match name {
            "login" => Command::Login(arg),
            "logout" => Command::Logout,
            "history" => match arg {
                None => Command::History(None),
                Some(n) => match n.parse::<usize>() {
                    Ok(n) if n > 0 => Command::History(Some(n)),
                    _ => Command::InvalidArgument(format!("Not a history entry number: {}", n)),
                },
            },
            "link" => Command::Link,
            "whoami" => Command::WhoAmI,
            "help" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => Command::Unknown(other.to_string()),
        }
    }

    /// Commands reachable before logging in.
    pub fn allowed_logged_out(&self) -> bool {
        matches!(self, Command::Login(_) | Command::Help | Command::Quit)
    }
}
