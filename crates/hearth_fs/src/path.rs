//! File name validation.

use crate::error::{FsError, FsResult, PathRejection};

/// Longest accepted path component, in bytes.
pub const PATH_COMPONENT_MAX_LENGTH: usize = 255;

/// Checks that `component` is usable as a single file or directory name.
///
/// A component is rejected if it is empty or whitespace only, longer than
/// [`PATH_COMPONENT_MAX_LENGTH`] bytes, or breaks the platform rules: on Unix
/// it cannot contain NUL or `/` and cannot be `.` or `..`; on Windows it also
/// cannot contain control characters or `<>:"/\|?*`, be a reserved device name
/// (`CON`, `PRN`, `AUX`, `NUL`, `COM1`..`COM9`, `LPT1`..`LPT9`, with or without
/// extension), or end with a dot or space.
///
/// # Errors
///
/// Returns [`FsError::InvalidPath`] with the reason for the rejection.
pub fn validate_path_component(component: &str) -> FsResult<()> {
    check(component).map_or(Ok(()), |reason| {
        Err(FsError::InvalidPath {
            component: component.to_string(),
            reason,
        })
    })
}

fn check(component: &str) -> Option<PathRejection> {
    if component.len() > PATH_COMPONENT_MAX_LENGTH {
        return Some(PathRejection::TooLong {
            len: component.len(),
        });
    }
    if component.trim().is_empty() {
        return Some(PathRejection::Empty);
    }
    platform::check(component)
}

#[cfg(not(windows))]
mod platform {
    use crate::error::PathRejection;

    pub(super) fn check(component: &str) -> Option<PathRejection> {
        if let Some(c) = component.chars().find(|&c| c == '\0' || c == '/') {
            return Some(PathRejection::ForbiddenCharacter(c));
        }
        if component == "." || component == ".." {
            return Some(PathRejection::ForbiddenKeyword);
        }
        None
    }
}

#[cfg(windows)]
mod platform {
    use crate::error::PathRejection;

    const RESERVED_CHARACTERS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

    pub(super) fn check(component: &str) -> Option<PathRejection> {
        if let Some(c) = component
            .chars()
            .find(|&c| c <= '\u{1f}' || RESERVED_CHARACTERS.contains(&c))
        {
            return Some(PathRejection::ForbiddenCharacter(c));
        }
        if is_device_name(component) {
            return Some(PathRejection::ForbiddenKeyword);
        }
        if component.ends_with('.') || component.ends_with(' ') {
            return Some(PathRejection::TrailingDotOrSpace);
        }
        None
    }

    fn is_device_name(component: &str) -> bool {
        let stem = component.split('.').next().unwrap_or(component);
        let upper = stem.to_ascii_uppercase();

        match upper.as_str() {
            "CON" | "PRN" | "AUX" | "NUL" => true,
            _ => {
                let numbered = upper
                    .strip_prefix("COM")
                    .or_else(|| upper.strip_prefix("LPT"));
                matches!(numbered, Some(suffix) if is_port_digit(suffix))
            }
        }
    }

    fn is_port_digit(suffix: &str) -> bool {
        let mut chars = suffix.chars();
        matches!(
            (chars.next(), chars.next()),
            (Some('1'..='9' | '¹' | '²' | '³'), None)
        )
    }
}
