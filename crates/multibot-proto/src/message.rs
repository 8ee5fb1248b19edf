//! Bounded parameter splitting for a single IRC line.
//!
//! [`ParsedMessage`] borrows from the line it was parsed from, so parameters
//! can be held while the line buffer keeps receiving data.
//!
//! # Example
//!
//! ```
//! use multibot_proto::ParsedMessage;
//!
//! let msg = ParsedMessage::parse(":origin CMD a b :c d e");
//! assert!(msg.is_sourced());
//! assert_eq!(msg.params(), ["origin", "CMD", "a", "b", "c d e"]);
//! ```

use smallvec::SmallVec;

use crate::prefix::Identity;

/// Default cap on the number of parameters kept from one line.
pub const DEFAULT_MAX_PARAMS: usize = 10;

/// One line split into parameters.
///
/// For a sourced line (one starting with `:`) parameter 0 is the origin
/// without its marker and parameter 1 is the command. Otherwise parameter 0
/// is the first token of the line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedMessage<'a> {
    sourced: bool,
    params: SmallVec<[&'a str; DEFAULT_MAX_PARAMS]>,
}

impl<'a> ParsedMessage<'a> {
    /// Parse `line` keeping at most [`DEFAULT_MAX_PARAMS`] parameters.
    pub fn parse(line: &'a str) -> Self {
        Self::parse_with_limit(line, DEFAULT_MAX_PARAMS)
    }

    /// Parse `line` keeping at most `max_params` parameters.
    ///
    /// Tokens are separated by single spaces. Once a token after the first
    /// starts with `:`, the rest of the line (marker stripped) is the final
    /// parameter. When the cap is reached the last slot holds one token and
    /// whatever follows it is dropped.
    pub fn parse_with_limit(line: &'a str, max_params: usize) -> Self {
        let (sourced, body) = match line.strip_prefix(':') {
            Some(rest) => (true, rest),
            None => (false, line),
        };

        let mut params = SmallVec::new();
        let mut remaining = (max_params > 0).then_some(body);

        while let Some(text) = remaining.take() {
            if !params.is_empty() {
                if let Some(trailing) = text.strip_prefix(':') {
                    params.push(trailing);
                    break;
                }
            }

            match text.split_once(' ') {
                Some((token, _)) if params.len() + 1 == max_params => params.push(token),
                Some((token, tail)) => {
                    params.push(token);
                    remaining = Some(tail);
                }
                None => params.push(text),
            }
        }

        Self { sourced, params }
    }

    /// Whether the line began with an origin marker.
    #[inline]
    pub fn is_sourced(&self) -> bool {
        self.sourced
    }

    /// All parameters in order.
    #[inline]
    pub fn params(&self) -> &[&'a str] {
        &self.params
    }

    /// Parameter at `index`, if present.
    #[inline]
    pub fn param(&self, index: usize) -> Option<&'a str> {
        self.params.get(index).copied()
    }

    /// Number of parameters.
    #[inline]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Whether no parameters were parsed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// The origin of a sourced line.
    pub fn origin(&self) -> Option<&'a str> {
        if self.sourced {
            self.param(0)
        } else {
            None
        }
    }

    /// The command of a sourced line (parameter 1).
    pub fn command(&self) -> Option<&'a str> {
        if self.sourced {
            self.param(1)
        } else {
            None
        }
    }

    /// The `nick!ident@host` split of the origin.
    pub fn identity(&self) -> Option<Identity<'a>> {
        self.origin().map(Identity::parse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_parameter() {
        let msg = ParsedMessage::parse(":origin CMD a b :c d e");
        assert_eq!(msg.params(), ["origin", "CMD", "a", "b", "c d e"]);
    }

    #[test]
    fn test_unsourced_line() {
        let msg = ParsedMessage::parse("PING :irc.example.net");
        assert!(!msg.is_sourced());
        assert_eq!(msg.params(), ["PING", "irc.example.net"]);
        assert_eq!(msg.origin(), None);
        assert_eq!(msg.command(), None);
    }

    #[test]
    fn test_origin_colon_is_not_trailing() {
        let msg = ParsedMessage::parse(":srv 001 bot :Welcome :to it");
        assert_eq!(msg.params(), ["srv", "001", "bot", "Welcome :to it"]);
    }

    #[test]
    fn test_empty_trailing() {
        let msg = ParsedMessage::parse(":n!u@h PRIVMSG #c :");
        assert_eq!(msg.params(), ["n!u@h", "PRIVMSG", "#c", ""]);
    }

    #[test]
    fn test_consecutive_spaces_yield_empty_params() {
        let msg = ParsedMessage::parse(":o CMD  x");
        assert_eq!(msg.params(), ["o", "CMD", "", "x"]);
    }

    #[test]
    fn test_cap_drops_remainder() {
        let line = ":o C 2 3 4 5 6 7 8 9 10 11 12";
        let msg = ParsedMessage::parse(line);
        assert_eq!(msg.len(), DEFAULT_MAX_PARAMS);
        assert_eq!(msg.param(9), Some("9"));
    }

    #[test]
    fn test_trailing_in_last_slot() {
        let msg = ParsedMessage::parse_with_limit(":o C a :b c d", 4);
        assert_eq!(msg.params(), ["o", "C", "a", "b c d"]);
    }

    #[test]
    fn test_marker_beyond_cap_is_ignored() {
        let msg = ParsedMessage::parse_with_limit(":o C a b :c d", 4);
        assert_eq!(msg.params(), ["o", "C", "a", "b"]);
    }

    #[test]
    fn test_zero_limit() {
        assert!(ParsedMessage::parse_with_limit(":o C", 0).is_empty());
    }

    #[test]
    fn test_bare_marker() {
        let msg = ParsedMessage::parse(":");
        assert!(msg.is_sourced());
        assert_eq!(msg.params(), [""]);
        assert_eq!(msg.command(), None);
    }

    #[test]
    fn test_identity_from_origin() {
        let msg = ParsedMessage::parse(":nick!ident@host PRIVMSG #c :hi");
        let id = msg.identity().unwrap();
        assert_eq!((id.nick, id.ident, id.host), ("nick", "ident", "host"));
    }
}
