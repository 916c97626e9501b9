//! Text commands read from stdin.

use std::str::FromStr;

use strum::EnumString;

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum Command {
    #[strum(serialize = "start", serialize = "s")]
    Start,
    /// Toggles between paused and running
    #[strum(serialize = "pause", serialize = "resume", serialize = "p")]
    Pause,
    #[strum(serialize = "save")]
    Save,
    #[strum(serialize = "load")]
    Load,
    #[strum(serialize = "status", serialize = "?")]
    Status,
    #[strum(serialize = "quit", serialize = "exit", serialize = "q")]
    Quit,
}

impl Command {
    /// `Ok(None)` for blank lines.
    pub fn parse_line(line: &str) -> Result<Option<Self>, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        Command::from_str(line)
            .map(Some)
            .map_err(|_| format!("unknown command '{line}' (try start, pause, save, load, status, quit)"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!(Command::parse_line("start"), Ok(Some(Command::Start)));
        assert_eq!(Command::parse_line("  P \n"), Ok(Some(Command::Pause)));
        assert_eq!(Command::parse_line("Resume"), Ok(Some(Command::Pause)));
        assert_eq!(Command::parse_line("exit"), Ok(Some(Command::Quit)));
    }

    #[test]
    fn test_blank_and_unknown() {
        assert_eq!(Command::parse_line("   "), Ok(None));
        assert!(Command::parse_line("jump").is_err());
    }
}
