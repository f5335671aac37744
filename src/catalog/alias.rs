//! Alias resolution over a resource catalog
//!
//! Matches a free-text token against every name a descriptor is known by:
//! plural, kind, group, singular, short names and categories. Comparison is
//! exact and case-insensitive; no fuzzy matching or scoring.

use super::{ResourceCatalog, ResourceDescriptor};

/// Return every descriptor the token refers to, preserving catalog order.
///
/// Zero matches is a valid result; the caller decides how to react.
pub fn find_resources<'a>(
    catalog: &'a ResourceCatalog,
    token: &str,
) -> Vec<&'a ResourceDescriptor> {
    let token = token.to_lowercase();
    catalog
        .iter()
        .filter(|rd| {
            rd.plural.to_lowercase() == token
                || rd.kind.to_lowercase() == token
                || rd.group.to_lowercase() == token
                || rd.singular.to_lowercase() == token
                || rd.short_names.iter().any(|s| s.to_lowercase() == token)
                || rd.categories.iter().any(|c| c.to_lowercase() == token)
        })
        .collect()
}
