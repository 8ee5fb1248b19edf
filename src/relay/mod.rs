//! Relay between the IRC control connection and local commands.
//!
//! - [`event_loop`]: the single-task reactor
//! - [`sink`]: every outbound line passes through [`sink::OutboundSink`]
//! - [`protocol_log`]: timestamped record of protocol traffic
//! - [`local`]: datagram socket that commands write replies to

pub mod event_loop;
pub mod local;
pub mod protocol_log;
pub mod sink;

pub use event_loop::Relay;
pub use local::LocalChannel;
