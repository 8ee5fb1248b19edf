//! Message origin identity.
//!
//! An origin of the form `nick!ident@host` is split into its three parts.
//! Missing separators are not errors: the part that would follow a missing
//! separator reuses the text it would have been split from.

/// The `nick`, `ident` and `host` of a message origin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Identity<'a> {
    /// Nickname, everything before `!`.
    pub nick: &'a str,
    /// Username between `!` and `@`.
    pub ident: &'a str,
    /// Hostname after `@`.
    pub host: &'a str,
}

impl<'a> Identity<'a> {
    /// Split an origin (without its leading `:`).
    ///
    /// ```
    /// use multibot_proto::Identity;
    ///
    /// let id = Identity::parse("irc.example.net");
    /// assert_eq!(id.nick, "irc.example.net");
    /// assert_eq!(id.host, "irc.example.net");
    /// ```
    pub fn parse(origin: &'a str) -> Self {
        match origin.split_once('!') {
            Some((nick, rest)) => {
                let (ident, host) = rest.split_once('@').unwrap_or((rest, rest));
                Self { nick, ident, host }
            }
            None => {
                let (nick, host) = origin.split_once('@').unwrap_or((origin, origin));
                Self {
                    nick,
                    ident: nick,
                    host,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_mask() {
        let id = Identity::parse("nick!~user@host.example.com");
        assert_eq!(id.nick, "nick");
        assert_eq!(id.ident, "~user");
        assert_eq!(id.host, "host.example.com");
    }

    #[test]
    fn test_missing_host() {
        let id = Identity::parse("nick!user");
        assert_eq!((id.nick, id.ident, id.host), ("nick", "user", "user"));
    }

    #[test]
    fn test_missing_ident() {
        let id = Identity::parse("nick@host");
        assert_eq!((id.nick, id.ident, id.host), ("nick", "nick", "host"));
    }

    #[test]
    fn test_server_name() {
        let id = Identity::parse("irc.example.net");
        assert_eq!(id.nick, "irc.example.net");
        assert_eq!(id.ident, "irc.example.net");
        assert_eq!(id.host, "irc.example.net");
    }

    #[test]
    fn test_at_before_bang_belongs_to_nick() {
        let id = Identity::parse("a@b!c@d");
        assert_eq!((id.nick, id.ident, id.host), ("a@b", "c", "d"));
    }
}
