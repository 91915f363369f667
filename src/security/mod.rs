//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Passthrough request:
//!     → allow_list.rs (parse target, check hostname)
//!     → upstream call
//!     → headers.rs (strip hop-by-hop headers from the relayed response)
//! ```
//!
//! # Design Decisions
//! - Fail closed: anything that does not parse as an allow-listed http(s) URL is rejected
//! - The merged endpoint never takes a target from the caller

pub mod allow_list;
pub mod headers;

pub use allow_list::HostAllowList;
