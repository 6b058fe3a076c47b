//! Revision extraction and next-revision calculation
//!
//! A revision tag has the form `<version>-<counter>`. The counter of an
//! existing tag is whatever follows its last `-`; the next revision is one
//! past the highest counter among the tags that start with the version.

use crate::error::{Error, Result};
use crate::strategy::PaddingStrategy;
use tracing::{debug, trace};

/// Read the revision counter embedded in `tag`
///
/// Returns `Some(0)` when the tag is empty, equals `version`, or contains no
/// `-`. Returns `None` when the suffix after the last `-` is not a
/// non-negative integer; such tags are not counted.
pub fn extract_revision(tag: &str, version: &str) -> Option<u64> {
    if tag.is_empty() || tag == version {
        return Some(0);
    }

    let Some(idx) = tag.rfind('-') else {
        return Some(0);
    };

    let suffix = &tag[idx + 1..];
    match suffix.parse::<u64>() {
        Ok(revision) => Some(revision),
        Err(_) => {
            debug!("Ignoring tag with non-numeric revision suffix: {}", tag);
            None
        }
    }
}

/// Compute the next revision tag for `version`
///
/// Fails with [`Error::NoVersionTag`] when no tag starts with `version`:
/// the version itself has never been published.
pub fn next_revision<S: AsRef<str>>(
    tags: &[S],
    version: &str,
    strategy: PaddingStrategy,
) -> Result<String> {
    let matching: Vec<&str> = tags
        .iter()
        .map(AsRef::as_ref)
        .filter(|tag| tag.starts_with(version))
        .collect();

    if matching.is_empty() {
        return Err(Error::no_version_tag(version));
    }

    trace!("{} tags match version {}", matching.len(), version);

    let current = matching
        .iter()
        .filter_map(|tag| extract_revision(tag, version))
        .max()
        .unwrap_or(0);

    let next = format!("{}-{}", version, strategy.pad(current.saturating_add(1)));
    debug!("Next revision for {} after {}: {}", version, current, next);

    Ok(next)
}
