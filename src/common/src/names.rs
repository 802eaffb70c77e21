//! Naming conventions for lifecycle markers in the drop inbox.
//!
//! Two on-disk marker conventions drive the file-lifecycle manager:
//!
//! - `*.partial` — an incomplete, potentially resumable transfer payload.
//! - `*.deleted` — a tombstone whose companion file (same name with the
//!   suffix stripped) is the actual payload slated for removal.

/// Suffix marking an incomplete, potentially resumable transfer payload.
pub const PARTIAL_SUFFIX: &str = ".partial";

/// Suffix marking a deletion tombstone.
pub const DELETED_SUFFIX: &str = ".deleted";

/// Whether `name` is a partial-transfer payload.
///
/// Partial payloads may carry a transfer id after the marker, so
/// classification is a substring match.
pub fn is_partial(name: &str) -> bool {
    name.contains(PARTIAL_SUFFIX)
}

/// Whether `name` looks like a deletion tombstone.
pub fn is_deleted_marker(name: &str) -> bool {
    name.contains(DELETED_SUFFIX)
}

/// The companion payload of a tombstone.
///
/// Companions are derived only from a strict suffix; a name that merely
/// contains the marker somewhere in the middle has no companion.
pub fn companion_of(name: &str) -> Option<&str> {
    name.strip_suffix(DELETED_SUFFIX)
}

/// The tombstone name for a payload.
pub fn deleted_marker(name: &str) -> String {
    format!("{name}{DELETED_SUFFIX}")
}
