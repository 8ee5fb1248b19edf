//! Registration state and inbound line classification.

use multibot_proto::ParsedMessage;

/// What an inbound control line asks the relay to do.
#[derive(Debug, PartialEq, Eq)]
pub enum Inbound<'a> {
    /// Server PING; answer with PONG.
    Ping,
    /// Reply to our keepalive PING.
    Pong,
    /// A sourced message to look up a command for.
    Message(ParsedMessage<'a>),
    /// Nothing to do.
    Ignored,
}

/// Classify one control line (delimiter stripped).
///
/// Unsourced lines only matter when they start with `PING` or `PONG`.
/// Sourced lines need at least an origin and a command.
pub fn classify(line: &str, max_params: usize) -> Inbound<'_> {
    if !line.starts_with(':') {
        return if line.starts_with("PING") {
            Inbound::Ping
        } else if line.starts_with("PONG") {
            Inbound::Pong
        } else {
            Inbound::Ignored
        };
    }

    let msg = ParsedMessage::parse_with_limit(line, max_params);
    match msg.command() {
        _ if msg.len() < 2 => Inbound::Ignored,
        Some("PING") => Inbound::Ping,
        Some("PONG") => Inbound::Pong,
        _ => Inbound::Message(msg),
    }
}

/// Bot identity and the one-time channel join.
#[derive(Debug)]
pub struct Session {
    nick: String,
    channel: String,
    joined: bool,
}

impl Session {
    pub fn new(nick: impl Into<String>, channel: impl Into<String>) -> Self {
        Self {
            nick: nick.into(),
            channel: channel.into(),
            joined: false,
        }
    }

    pub fn nick(&self) -> &str {
        &self.nick
    }

    /// USER and NICK lines sent as soon as the relay starts.
    pub fn registration(&self) -> [String; 2] {
        [
            format!("USER {} localhost localhost :MultiBot", self.nick),
            format!("NICK :{}", self.nick),
        ]
    }

    /// The JOIN line the first time a sourced line arrives, `None` after that.
    pub fn join_once(&mut self) -> Option<String> {
        if self.joined {
            return None;
        }
        self.joined = true;
        Some(format!("JOIN #{}", self.channel))
    }
}
