//! Candidate command paths, most specific first.
//!
//! For each specificity level, from the configured maximum down to 1, the
//! level base is built from message parameters 1..=level and three variants
//! are probed:
//!
//! 1. `<base>/tr_<HH>.cmd`, keyed on the first byte of the payload
//! 2. `<base>-chan.cmd` or `<base>-user.cmd`, depending on the target
//! 3. `<base>.cmd`
//!
//! Every segment is reduced to `[A-Za-z0-9_.]` and can never be `.` or
//! `..`, so a candidate cannot leave the commands root.

use multibot_proto::ParsedMessage;

/// Parameter index of the message target.
const TARGET: usize = 2;
/// Parameter index of the message payload.
const PAYLOAD: usize = 3;

/// Whether `byte` may appear in a path segment unchanged.
#[inline]
fn is_safe(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'.'
}

/// Reduce message text to a single safe path segment.
pub fn sanitize_segment(raw: &[u8]) -> String {
    if raw.is_empty() {
        return "_".to_string();
    }

    let mut segment: String = raw
        .iter()
        .map(|&b| if is_safe(b) { b as char } else { '_' })
        .collect();

    if segment.bytes().all(|b| b == b'.') {
        segment = "_".repeat(segment.len());
    }
    segment
}

/// Segment for parameter `index`; the payload only contributes its first byte.
fn segment(param: &str, index: usize) -> String {
    let bytes = param.as_bytes();
    if index == PAYLOAD {
        sanitize_segment(&bytes[..bytes.len().min(1)])
    } else {
        sanitize_segment(bytes)
    }
}

/// Ordered candidate paths, relative to the commands root.
pub fn candidates(msg: &ParsedMessage<'_>, max_specificity: usize) -> Vec<String> {
    let mut out = Vec::new();

    for level in (1..=max_specificity).rev() {
        // Parameters 1..=level must all be present.
        if msg.len() <= level {
            continue;
        }

        let base = (1..=level)
            .map(|i| segment(msg.params()[i], i))
            .collect::<Vec<_>>()
            .join("/");

        if let Some(payload) = msg.param(PAYLOAD) {
            let first = payload.as_bytes().first().copied().unwrap_or(0);
            out.push(format!("{base}/tr_{first:02X}.cmd"));
        }

        if let Some(target) = msg.param(TARGET) {
            let kind = if target.starts_with('#') { "chan" } else { "user" };
            out.push(format!("{base}-{kind}.cmd"));
        }

        out.push(format!("{base}.cmd"));
    }

    out
}
