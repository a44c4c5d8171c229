// ABOUTME: Qualified-name rules for catalog entries
// ABOUTME: Dot-delimited segments of ASCII alphanumerics and underscores

use crate::error::Error;

/// Check that `name` is a well-formed dotted qualified name
pub fn validate(name: &str) -> Result<(), Error> {
    let well_formed = !name.is_empty()
        && name.split('.').all(|segment| {
            !segment.is_empty()
                && segment
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_')
        });

    if well_formed {
        Ok(())
    } else {
        Err(Error::InvalidName(name.to_string()))
    }
}

/// Namespace part of a qualified name (everything before the last dot)
pub fn namespace_of(name: &str) -> Option<&str> {
    name.rsplit_once('.').map(|(ns, _)| ns)
}

/// True when `name` lives at or below the dotted `prefix`
pub fn is_within(name: &str, prefix: &str) -> bool {
    if prefix.is_empty() {
        return true;
    }
    match name.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('.'),
        None => false,
    }
}
