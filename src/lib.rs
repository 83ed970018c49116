//! ipfilter: IP range block-list merging
//!
//! A library for parsing `ipfilter.dat` style block lists, merging their
//! ranges into a minimal sorted set, and keeping qBittorrent pointed at
//! an up-to-date merged list.

pub mod config;
pub mod dat;
pub mod iprange;
pub mod qbittorrent;
pub mod slots;
pub mod source;
pub mod store;
pub mod sync;
pub mod time;
pub mod transport;
