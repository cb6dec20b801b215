//! Slash-delimited shadow paths
//!
//! A path is the parent's path with the node identifier appended; the root
//! path is the bare root identifier.

use crate::{VdomError, VdomResult};

/// Path segment separator
pub const SEPARATOR: char = '/';

/// Append `identifier` to `parent`
pub fn join(parent: &str, identifier: &str) -> String {
    let parent = parent.trim_end_matches(SEPARATOR);
    let identifier = identifier.trim_matches(SEPARATOR);
    match (parent.is_empty(), identifier.is_empty()) {
        (true, _) => identifier.to_string(),
        (false, true) => parent.to_string(),
        (false, false) => format!("{}{}{}", parent, SEPARATOR, identifier),
    }
}

/// Identifiers become path segments, so they cannot be empty, contain the
/// separator, or be a relative segment.
pub fn validate_identifier(identifier: &str) -> VdomResult<()> {
    if identifier.is_empty()
        || identifier.contains(SEPARATOR)
        || identifier == "."
        || identifier == ".."
    {
        return Err(VdomError::InvalidIdentifier(identifier.to_string()));
    }
    Ok(())
}
