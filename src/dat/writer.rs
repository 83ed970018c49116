//! Rule file writer.

use std::fmt::{self, Write as _};
use std::io::{self, Write as _};

use crate::iprange::{IpInterval, Intervals};

/// Renders merged intervals in `ipfilter.dat` form, one rule per line.
///
/// ```
/// use ipfilter::dat::render;
/// use ipfilter::iprange::Intervals;
///
/// let mut rules = Intervals::new();
/// rules.append("10.0.0.0", "10.0.0.255");
/// assert_eq!(render(&rules), "10.0.0.0 - 10.0.0.255 , 0 , \n");
/// ```
#[must_use]
pub fn render(intervals: &Intervals) -> String {
    let mut out = String::with_capacity(intervals.len() * 36);
    for interval in intervals {
        // Writing into a String cannot fail
        let _ = writeln!(out, "{}", Rule::traced(interval));
    }
    out
}

/// Writes merged intervals to any byte sink.
///
/// # Errors
///
/// Returns the sink's I/O error.
pub fn write_rules<W: io::Write>(sink: &mut W, intervals: &Intervals) -> io::Result<()> {
    for interval in intervals {
        writeln!(sink, "{}", Rule::traced(interval))?;
    }
    sink.flush()
}

/// One output line without its newline.
struct Rule<'a>(&'a IpInterval);

impl<'a> Rule<'a> {
    fn traced(interval: &'a IpInterval) -> Self {
        tracing::trace!(from = %interval.from, to = %interval.to, "write rule");
        Self(interval)
    }
}

impl fmt::Display for Rule<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} , 0 , ", self.0.from, self.0.to)
    }
}
