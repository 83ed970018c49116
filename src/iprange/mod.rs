//! IP range merging.
//!
//! This module provides:
//! - Addresses as unsigned integers ([`Address`])
//! - Inclusive address ranges ([`IpInterval`])
//! - Range collections with minimal-cover merging ([`Intervals`])
//! - Parse and conversion errors ([`AddressError`])
//!
//! # Adjacency
//!
//! Ranges that merely touch are fused: `[10, 20]` and `[21, 30]` merge
//! into `[10, 30]`. A gap of a single address keeps ranges apart.
//!
//! # Address families
//!
//! Comparison is purely numeric. An IPv4 address and an IPv6 address
//! with the same integer value compare equal for merge purposes.

mod address;
mod error;
mod interval;
mod intervals;


pub use address::Address;
pub use error::AddressError;
pub use interval::IpInterval;
pub use intervals::Intervals;
