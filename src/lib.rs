//! peerdrop — file-lifecycle management for a peer-to-peer file handoff
//! agent.
//!
//! The agent embeds this library to manage the inbox directory that peers
//! drop files into: interrupted transfers leave `*.partial` payloads
//! behind, removals are signalled by `*.deleted` tombstones, and the
//! [`reaper::FileReaper`] cleans both up after a grace period.

pub use common;
pub use reaper;
