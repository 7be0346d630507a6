/*!
 * Virtual Path Handling
 * Normalization, prefix matching, and archive entry name sanitizing
 */

/// Virtual root
pub const ROOT: &str = "/";

/// Normalize a virtual path
///
/// The result is absolute, has no `.` or `..` segments, no duplicate or
/// trailing separators. Relative input is taken relative to `/`. Returns
/// `None` when a `..` would climb above the root.
pub fn normalize(path: &str) -> Option<String> {
    let mut components: Vec<&str> = Vec::with_capacity(8);

    for component in path.split('/') {
        match component {
            "" | "." => {}
            ".." => {
                components.pop()?;
            }
            name => components.push(name),
        }
    }

    let mut result = String::with_capacity(path.len() + 1);
    if components.is_empty() {
        result.push('/');
    }
    for component in components {
        result.push('/');
        result.push_str(component);
    }
    Some(result)
}

/// Relative remainder of `path` below `prefix`
///
/// Both arguments must already be normalized. The prefix only matches whole
/// components: `/res` matches `/res` and `/res/a` but not `/resources`.
/// Returns `""` when `path` equals `prefix`.
pub fn strip_prefix<'a>(path: &'a str, prefix: &str) -> Option<&'a str> {
    if prefix == ROOT {
        return Some(path.trim_start_matches('/'));
    }

    let rest = path.strip_prefix(prefix)?;
    if rest.is_empty() {
        Some(rest)
    } else {
        rest.strip_prefix('/')
    }
}

/// Sanitize a file name stored in an archive
///
/// Backslashes count as separators, and leading `/`, empty and `.` segments
/// are dropped. The result is relative and never ends in `/`. Returns `None`
/// if any segment is `..`.
/// [SECURITY] Entries that could escape the mount root never reach the index
pub fn sanitize_entry_name(name: &str) -> Option<String> {
    let mut result = String::with_capacity(name.len());

    for component in name.split(['/', '\\']) {
        match component {
            "" | "." => {}
            ".." => return None,
            segment => {
                if !result.is_empty() {
                    result.push('/');
                }
                result.push_str(segment);
            }
        }
    }

    Some(result)
}

/// Parent of a relative path, `""` for top-level names
pub fn parent(relative: &str) -> &str {
    relative.rsplit_once('/').map(|(parent, _)| parent).unwrap_or("")
}

/// Final component of a relative path
pub fn file_name(relative: &str) -> &str {
    relative.rsplit_once('/').map(|(_, name)| name).unwrap_or(relative)
}
