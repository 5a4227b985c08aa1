//! Console command parsing.

/// Command names understood by the console, in help order.
pub const COMMANDS: &[(&str, &str)] = &[
    ("help", "Show this help"),
    ("status", "Show overall status"),
    ("pools", "List all pools and member states"),
    ("pool <name>", "Show detailed info for specific pool"),
    ("virtual", "Show virtual servers"),
    ("logs", "Show recent system logs"),
    ("summary", "Show health summary"),
    ("quit", "Exit the monitor"),
];

pub const USAGE_HINT: &str = "Unknown command. Type 'help' for available commands.";

/// A parsed console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Status,
    Pools,
    Pool(String),
    Virtual,
    Logs,
    Summary,
    Quit,
    /// Blank line.
    Empty,
    Unknown(String),
}

impl Command {
    /// Parse one input line. Keywords are case-insensitive; pool names keep
    /// their case since upstream names are case-sensitive.
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Command::Empty;
        }

        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match (word.to_ascii_lowercase().as_str(), rest.is_empty()) {
            ("help", true) => Command::Help,
            ("status", true) => Command::Status,
            ("pools", true) => Command::Pools,
            ("pool", false) => Command::Pool(rest.to_string()),
            ("virtual" | "virtuals", true) => Command::Virtual,
            ("logs", true) => Command::Logs,
            ("summary", true) => Command::Summary,
            ("quit" | "exit", true) => Command::Quit,
            _ => Command::Unknown(line.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_are_case_insensitive_and_trimmed() {
        assert_eq!(Command::parse("  HELP  "), Command::Help);
        assert_eq!(Command::parse("Status"), Command::Status);
        assert_eq!(Command::parse("virtuals"), Command::Virtual);
        assert_eq!(Command::parse("VIRTUAL"), Command::Virtual);
        assert_eq!(Command::parse("Exit"), Command::Quit);
        assert_eq!(Command::parse("quit\n"), Command::Quit);
    }

    #[test]
    fn test_pool_keeps_name_case() {
        assert_eq!(Command::parse("POOL  Web_Pool "), Command::Pool("Web_Pool".into()));
    }

    #[test]
    fn test_pool_without_name_is_unknown() {
        assert_eq!(Command::parse("pool"), Command::Unknown("pool".into()));
    }

    #[test]
    fn test_blank_and_garbage() {
        assert_eq!(Command::parse("   "), Command::Empty);
        assert_eq!(Command::parse("reboot now"), Command::Unknown("reboot now".into()));
        assert_eq!(Command::parse("status please"), Command::Unknown("status please".into()));
    }

    #[test]
    fn test_every_listed_command_parses() {
        for (name, _) in COMMANDS {
            let line = name.replace("<name>", "p1");
            assert!(!matches!(Command::parse(&line), Command::Unknown(_)), "{}", line);
        }
    }
}
