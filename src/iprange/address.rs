//! Addresses as arbitrary-width unsigned integers.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use super::AddressError;

/// Byte width of an IPv4 address.
pub const V4_WIDTH: usize = 4;

/// Byte width of an IPv6 address.
pub const V6_WIDTH: usize = 16;

/// A single IPv4 or IPv6 address.
///
/// The numeric value is the big-endian integer of the address bytes.
/// The address family is kept alongside so the value can be rendered
/// back with its original width; `u128` covers the full IPv6 space.
///
/// # Equality
///
/// Two addresses are equal only if family and value match. Ordering for
/// merge purposes goes through [`Address::to_integer`] and ignores the
/// family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address(IpAddr);

impl Address {
    /// Parses an IPv4 or IPv6 literal.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::Parse`] if the text is not a valid literal.
    pub fn parse(text: &str) -> Result<Self, AddressError> {
        text.parse::<IpAddr>()
            .map(Self)
            .map_err(|_| AddressError::Parse {
                input: text.to_string(),
            })
    }

    /// Builds an address from an integer and a byte width (4 or 16).
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::Conversion`] if `value` needs more than
    /// `width` bytes, or [`AddressError::UnsupportedWidth`] for any width
    /// other than 4 and 16.
    pub fn from_integer(value: u128, width: usize) -> Result<Self, AddressError> {
        match width {
            V4_WIDTH => u32::try_from(value)
                .map(|v| Self(IpAddr::V4(Ipv4Addr::from(v))))
                .map_err(|_| AddressError::Conversion { value, width }),
            V6_WIDTH => Ok(Self(IpAddr::V6(Ipv6Addr::from(value)))),
            other => Err(AddressError::UnsupportedWidth(other)),
        }
    }

    /// Returns the big-endian numeric value of the address bytes.
    #[must_use]
    pub fn to_integer(&self) -> u128 {
        match self.0 {
            IpAddr::V4(v4) => u128::from(u32::from(v4)),
            IpAddr::V6(v6) => u128::from(v6),
        }
    }

    /// Returns the byte width of the address family (4 or 16).
    #[must_use]
    pub const fn width(&self) -> usize {
        match self.0 {
            IpAddr::V4(_) => V4_WIDTH,
            IpAddr::V6(_) => V6_WIDTH,
        }
    }

    /// Returns true for IPv6 addresses.
    #[must_use]
    pub const fn is_ipv6(&self) -> bool {
        self.0.is_ipv6()
    }
}

impl From<IpAddr> for Address {
    fn from(ip: IpAddr) -> Self {
        Self(ip)
    }
}

impl From<Ipv4Addr> for Address {
    fn from(ip: Ipv4Addr) -> Self {
        Self(IpAddr::V4(ip))
    }
}

impl From<Ipv6Addr> for Address {
    fn from(ip: Ipv6Addr) -> Self {
        Self(IpAddr::V6(ip))
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
