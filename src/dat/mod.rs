//! The `ipfilter.dat` rule format.
//!
//! Each rule line reads `first - last , level , description`. Only the
//! address pair matters here; level and description are discarded on
//! read and written back as `0` and empty.

mod collect;
mod parser;
mod writer;


pub use collect::{CollectError, Collection, collect_files};
pub use parser::{ParseStats, parse_line, parse_rules};
pub use writer::{render, write_rules};
