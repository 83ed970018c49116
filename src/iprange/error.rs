//! Error types for address parsing and conversion.

use thiserror::Error;

/// Error type for [`Address`](super::Address) construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// The text is not a valid IPv4 or IPv6 literal.
    #[error("Invalid IP address '{input}'")]
    Parse {
        /// The rejected text
        input: String,
    },

    /// The integer does not fit in the requested byte width.
    #[error("Value {value} does not fit in {width} bytes")]
    Conversion {
        /// The integer that was being converted
        value: u128,
        /// The requested byte width
        width: usize,
    },

    /// The byte width is neither 4 (IPv4) nor 16 (IPv6).
    #[error("Unsupported address width {0}: expected 4 or 16")]
    UnsupportedWidth(usize),
}
