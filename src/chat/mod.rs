//! Chat command parsing.
//!
//! Only lines starting with the configured prefix are commands. The word
//! right after the prefix picks the command; for song requests the rest of
//! the line is the query.

/// Aliases that trigger a song request.
pub const SONG_REQUEST_ALIASES: &[&str] = &["songrequest", "sr", "songreq"];

/// A recognised chat command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    /// Song request; `alias` is the command word as typed (lower-cased)
    SongRequest { alias: String, query: String },
    Ping,
}

impl ChatCommand {
    /// Parse a chat line, or `None` if it is not a known command.
    pub fn parse(message: &str, prefix: &str) -> Option<Self> {
        let rest = message.strip_prefix(prefix)?.trim();
        let (word, query) = match rest.split_once(' ') {
            Some((word, query)) => (word, query.trim()),
            None => (rest, ""),
        };
        let word = word.to_lowercase();

        if SONG_REQUEST_ALIASES.contains(&word.as_str()) {
            Some(ChatCommand::SongRequest {
                alias: word,
                query: query.to_string(),
            })
        } else if word == "ping" {
            Some(ChatCommand::Ping)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(alias: &str, query: &str) -> Option<ChatCommand> {
        Some(ChatCommand::SongRequest {
            alias: alias.to_string(),
            query: query.to_string(),
        })
    }

    #[test]
    fn test_parse_song_request_aliases() {
        assert_eq!(ChatCommand::parse("!sr hero", "!"), request("sr", "hero"));
        assert_eq!(
            ChatCommand::parse("!SongRequest  Pegboard   Nerds ", "!"),
            request("songrequest", "Pegboard   Nerds")
        );
        assert_eq!(ChatCommand::parse("!songreq", "!"), request("songreq", ""));
    }

    #[test]
    fn test_parse_ping() {
        assert_eq!(ChatCommand::parse("!ping", "!"), Some(ChatCommand::Ping));
        assert_eq!(ChatCommand::parse("!PING now", "!"), Some(ChatCommand::Ping));
    }

    #[test]
    fn test_parse_ignores_other_lines() {
        assert_eq!(ChatCommand::parse("sr hero", "!"), None);
        assert_eq!(ChatCommand::parse("!dance", "!"), None);
        assert_eq!(ChatCommand::parse("!", "!"), None);
        assert_eq!(ChatCommand::parse("", "!"), None);
    }

    #[test]
    fn test_parse_custom_prefix() {
        assert_eq!(ChatCommand::parse("~~sr hero", "~~"), request("sr", "hero"));
        assert_eq!(ChatCommand::parse("!sr hero", "~~"), None);
    }
}
