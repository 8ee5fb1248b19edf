//! # multibot-proto
//!
//! Wire-level building blocks for the multibot command relay:
//!
//! - [`LineBuffer`] / [`LineCodec`]: incremental extraction of
//!   delimiter-terminated lines from a byte stream that arrives in
//!   arbitrary chunks.
//! - [`ParsedMessage`]: a borrowed view of one IRC line split into an
//!   optional origin and a bounded parameter list with trailing-parameter
//!   semantics.
//! - [`Identity`]: the `nick!ident@host` split of a message origin.
//!
//! ## Quick Start
//!
//! ```rust
//! use multibot_proto::{Delimiter, LineBuffer, ParsedMessage};
//!
//! let mut buffer = LineBuffer::new(Delimiter::CrLf);
//! buffer.append(b":nick!user@host PRIVMSG #chan :hello th");
//! assert!(buffer.extract_line().is_none());
//!
//! buffer.append(b"ere\r\n");
//! let line = buffer.extract_line().unwrap();
//! let line = String::from_utf8_lossy(&line);
//! let msg = ParsedMessage::parse(&line);
//!
//! assert_eq!(msg.command(), Some("PRIVMSG"));
//! assert_eq!(msg.param(3), Some("hello there"));
//! assert_eq!(msg.identity().unwrap().nick, "nick");
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod error;
pub mod line;
pub mod message;
pub mod prefix;

pub use self::error::ProtocolError;
pub use self::line::{sanitize_relay_line, Delimiter, LineBuffer, LineCodec};
pub use self::message::{ParsedMessage, DEFAULT_MAX_PARAMS};
pub use self::prefix::Identity;
