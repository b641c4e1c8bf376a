//! Slug and path utilities
//!
//! Pure helpers shared by the registry, library and module layers. All
//! identifier derivation lives here so that an id can always be recomputed
//! from metadata alone, without consulting an index.

use uuid::Uuid;

/// Namespace for deterministic module ids (UUIDv5).
const MODULE_ID_NAMESPACE: Uuid = Uuid::from_bytes([
    0x8f, 0x2a, 0x1c, 0x4e, 0x9b, 0x30, 0x4d, 0x17, 0xa6, 0x5d, 0x02, 0xc8, 0x7e, 0x91, 0x44,
    0x6b,
]);

/// Derive a file-safe slug from a human title.
///
/// Lowercases, collapses whitespace runs into single hyphens and drops
/// anything outside `[a-z0-9-]`. The result is stable across platforms.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_hyphen = true;

    for ch in name.trim().chars() {
        let ch = ch.to_ascii_lowercase();
        if ch.is_ascii_alphanumeric() {
            slug.push(ch);
            last_hyphen = false;
        } else if (ch.is_whitespace() || ch == '-' || ch == '_') && !last_hyphen {
            slug.push('-');
            last_hyphen = true;
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Canonical path normalization used by every registry operation.
///
/// Back slashes become forward slashes and trailing separators are trimmed.
/// Case is preserved so the stored path stays usable on case-sensitive
/// filesystems; comparisons go through [`paths_equal`] instead. Register,
/// unregister and exists must all use these two functions so membership
/// checks and removals agree.
pub fn normalize_path(path: &str) -> String {
    let mut normalized = path.replace('\\', "/");
    while normalized.len() > 1 && normalized.ends_with('/') {
        normalized.pop();
    }
    normalized
}

/// Case-insensitive equality over normalized paths.
pub fn paths_equal(a: &str, b: &str) -> bool {
    normalize_path(a).eq_ignore_ascii_case(&normalize_path(b))
}

/// Derive the stable module identifier from its slug and creation timestamp.
///
/// UUIDv5 over `"{slug}:{createdAt}"` with the timestamp rendered as RFC 3339
/// with millisecond precision in UTC. Recomputable from metadata on every
/// lookup; editing the stored slug or createdAt changes the identifier.
pub fn derive_module_id(slug: &str, created_at: chrono::DateTime<chrono::Utc>) -> String {
    let stamp = created_at.to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
    Uuid::new_v5(&MODULE_ID_NAMESPACE, format!("{}:{}", slug, stamp).as_bytes()).to_string()
}
