//! Twitch IRC wire protocol
//!
//! Only the handful of commands the relay needs: login (PASS/NICK/JOIN),
//! chat (PRIVMSG), leave (PART) and the keepalive reply. Every line is
//! newline-terminated plain text.

/// Keepalive ping sent by the server
pub const PING_MESSAGE: &str = "PING :tmi.twitch.tv";

/// Reply expected by the server for [`PING_MESSAGE`]
pub const PONG_MESSAGE: &str = "PONG :tmi.twitch.tv";

/// Chat command that makes Twitch drop the connection
pub const DISCONNECT_COMMAND: &str = "/disconnect";

/// Outbound commands understood by the relay
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Authenticate with an OAuth token
    Pass(String),
    /// Set the login name
    Nick(String),
    /// Join a channel
    Join(String),
    /// Leave a channel
    Part(String),
    /// Send a chat message to a channel
    Privmsg { channel: String, text: String },
    /// Answer a keepalive ping
    Pong,
}

impl Command {
    /// Wire form of the command, newline-terminated
    pub fn to_line(&self) -> String {
        terminate(self.to_string())
    }

    /// Text safe to put in logs
    pub fn redacted(&self) -> String {
        match self {
            Command::Pass(_) => "PASS <redacted>".to_string(),
            other => other.to_string(),
        }
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::Pass(token) => write!(f, "PASS {}", token),
            Command::Nick(nick) => write!(f, "NICK {}", nick),
            Command::Join(channel) => write!(f, "JOIN {}", channel),
            Command::Part(channel) => write!(f, "PART {}", channel),
            Command::Privmsg { channel, text } => write!(f, "PRIVMSG {} :{}", channel, text),
            Command::Pong => f.write_str(PONG_MESSAGE),
        }
    }
}

/// Append a trailing newline unless one is already present
pub fn terminate(mut line: String) -> String {
    if !line.ends_with('\n') {
        line.push('\n');
    }
    line
}

/// Whether a raw inbound read carries a keepalive ping
///
/// Matches the literal anywhere in the buffer, so a ping split across two
/// reads is missed and will be answered on a later one.
pub fn contains_ping(reply: &[u8]) -> bool {
    let needle = PING_MESSAGE.as_bytes();
    reply.windows(needle.len()).any(|window| window == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handshake_lines() {
        assert_eq!(Command::Pass("oauth:abc".into()).to_line(), "PASS oauth:abc\n");
        assert_eq!(Command::Nick("voter".into()).to_line(), "NICK voter\n");
        assert_eq!(Command::Join("#chan".into()).to_line(), "JOIN #chan\n");
    }

    #[test]
    fn test_privmsg_line() {
        let cmd = Command::Privmsg {
            channel: "#chan".into(),
            text: "#b".into(),
        };
        assert_eq!(cmd.to_line(), "PRIVMSG #chan :#b\n");
    }

    #[test]
    fn test_pong_and_part() {
        assert_eq!(Command::Pong.to_line(), "PONG :tmi.twitch.tv\n");
        assert_eq!(Command::Part("#chan".into()).to_line(), "PART #chan\n");
    }

    #[test]
    fn test_terminate_keeps_existing_newline() {
        assert_eq!(terminate("hello\n".into()), "hello\n");
        assert_eq!(terminate("hello".into()), "hello\n");
    }

    #[test]
    fn test_redacts_token() {
        let cmd = Command::Pass("oauth:secret".into());
        assert!(!cmd.redacted().contains("secret"));
        assert_eq!(Command::Nick("voter".into()).redacted(), "NICK voter");
    }

    #[test]
    fn test_ping_detection() {
        assert!(contains_ping(b"PING :tmi.twitch.tv\r\n"));
        assert!(contains_ping(
            b":tmi.twitch.tv 001 voter :Welcome\r\nPING :tmi.twitch.tv\r\n"
        ));
        assert!(!contains_ping(b":voter!voter@voter.tmi.twitch.tv JOIN #chan\r\n"));
        assert!(!contains_ping(b"PING :tmi.twi"));
        assert!(!contains_ping(b""));
    }
}
