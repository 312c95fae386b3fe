use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Tick,
    QuitRequested,
    Command(ShellCommand),
}

/// A parsed line of shell input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    NewRoom(String),
    ListRooms,
    Open(String),
    Close,
    Delete(String),
    Search(String),
    OlderMessages,
    Attach(PathBuf),
    Copy(usize),
    ToggleTheme,
    Logout,
    Help,
    Send(String),
    Unknown(String),
}

impl ShellCommand {
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let Some(rest) = line.strip_prefix('/') else {
            return Some(Self::Send(line.to_owned()));
        };

        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (rest, ""),
        };

        let command = match (name, arg) {
            ("new", title) => Self::NewRoom(title.to_owned()),
            ("rooms", _) => Self::ListRooms,
            ("open", target) if !target.is_empty() => Self::Open(target.to_owned()),
            ("close", _) => Self::Close,
            ("delete", target) if !target.is_empty() => Self::Delete(target.to_owned()),
            ("search", query) => Self::Search(query.to_owned()),
            ("more", _) => Self::OlderMessages,
            ("image", path) if !path.is_empty() => Self::Attach(PathBuf::from(path)),
            ("copy", index) => match index.parse::<usize>() {
                Ok(index) if index > 0 => Self::Copy(index),
                _ => Self::Unknown(line.to_owned()),
            },
            ("theme", _) => Self::ToggleTheme,
            ("logout", _) => Self::Logout,
            ("help", _) => Self::Help,
            _ => Self::Unknown(line.to_owned()),
        };

        Some(command)
    }
}
