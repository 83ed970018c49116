//! Line parser for rule files.

use std::borrow::Cow;

use crate::iprange::Intervals;

/// Counters for one parsed rule source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseStats {
    /// Lines that looked like rules (had a `-` separator).
    pub read: usize,
    /// Rules whose endpoints both parsed as addresses.
    pub accepted: usize,
}

impl std::ops::AddAssign for ParseStats {
    fn add_assign(&mut self, rhs: Self) {
        self.read += rhs.read;
        self.accepted += rhs.accepted;
    }
}

/// Splits one line into its two address tokens.
///
/// Returns `None` for blank lines, comments (`#`, `//`) and lines without
/// a `-` in front of the first `,`. The tokens are trimmed and zero-padded
/// IPv4 octets are normalised; whether they are valid addresses is left to
/// the caller.
///
/// ```
/// use ipfilter::dat::parse_line;
///
/// let (from, to) = parse_line("001.002.004.000 - 001.002.004.255 , 000 , China").unwrap();
/// assert_eq!(from, "1.2.4.0");
/// assert_eq!(to, "1.2.4.255");
/// assert!(parse_line("# comment").is_none());
/// ```
#[must_use]
pub fn parse_line(line: &str) -> Option<(Cow<'_, str>, Cow<'_, str>)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') || line.starts_with("//") {
        return None;
    }

    let range = line.split_once(',').map_or(line, |(range, _)| range);
    let mut sides = range.splitn(3, '-');
    let from = sides.next()?;
    let to = sides.next()?;

    Some((normalize(from.trim()), normalize(to.trim())))
}

/// Parses every rule in `text` into `into`.
///
/// Malformed rules are dropped; the returned counters tell how many were
/// seen and how many made it.
pub fn parse_rules(text: &str, into: &mut Intervals) -> ParseStats {
    let mut stats = ParseStats::default();

    for line in text.lines() {
        let Some((from, to)) = parse_line(line) else {
            if !line.trim().is_empty() {
                tracing::trace!(line, "skipping non-rule line");
            }
            continue;
        };

        stats.read += 1;
        if into.append(&from, &to) {
            stats.accepted += 1;
            tracing::trace!(from = %from, to = %to, "read rule");
        } else {
            tracing::trace!(from = %from, to = %to, "dropping malformed rule");
        }
    }

    stats
}

/// Strips leading zeros from dotted-quad octets (`010.000.000.001` → `10.0.0.1`).
///
/// Tokens that are not four groups of one to three digits are returned as is.
fn normalize(token: &str) -> Cow<'_, str> {
    let octets: Vec<&str> = token.split('.').collect();
    let dotted_quad = octets.len() == 4
        && octets
            .iter()
            .all(|o| (1..=3).contains(&o.len()) && o.bytes().all(|b| b.is_ascii_digit()));

    if !dotted_quad || octets.iter().all(|o| o.len() == 1 || !o.starts_with('0')) {
        return Cow::Borrowed(token);
    }

    let trimmed: Vec<&str> = octets
        .iter()
        .map(|o| {
            let t = o.trim_start_matches('0');
            if t.is_empty() { "0" } else { t }
        })
        .collect();
    Cow::Owned(trimmed.join("."))
}
