use snafu::{Snafu, ensure};

/// Splits a name at its last period. The extension keeps the period, so a
/// dotfile such as `.bashrc` is all extension.
pub fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(index) => name.split_at(index),
        None => (name, ""),
    }
}

/// Longest prefix of `s` that fits in `max_len` bytes without splitting a
/// character.
fn prefix_within(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        return s;
    }
    let mut end = max_len;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Shortens `name` to at most `max_len` bytes.
///
/// Directories and names without an extension are cut at the end. Files with
/// an extension lose characters from the stem only; when the extension alone
/// does not fit the name cannot be shortened and an error is returned.
pub fn truncate_name(
    name: &str,
    is_dir: bool,
    max_len: usize,
) -> Result<String, ExtensionTooLongError> {
    if name.len() <= max_len {
        return Ok(name.to_string());
    }

    let (stem, extension) = split_extension(name);
    if is_dir || extension.is_empty() {
        return Ok(prefix_within(name, max_len).to_string());
    }

    ensure!(
        extension.len() <= max_len,
        ExtensionTooLongSnafu {
            name,
            extension,
            max_len
        }
    );
    let stem = prefix_within(stem, max_len - extension.len());
    Ok(format!("{stem}{extension}"))
}

/// Number of digits needed to print every attempt number below `max_attempts`.
pub fn suffix_width(max_attempts: usize) -> usize {
    max_attempts
        .saturating_sub(1)
        .checked_ilog10()
        .map_or(1, |digits| digits as usize + 1)
}

/// Adds the zero-padded attempt number to a candidate name. For files the
/// number goes in front of the extension. Names made only of periods, or
/// ending in a bare period, get it appended so the result never ends in `.`.
pub fn with_attempt_suffix(candidate: &str, is_dir: bool, attempt: usize, width: usize) -> String {
    let suffix = format!("_{attempt:0width$}");
    match split_extension(candidate) {
        (stem, extension)
            if !is_dir && extension.len() > 1 && !stem.chars().all(|c| c == '.') =>
        {
            format!("{stem}{suffix}{extension}")
        }
        _ => format!("{candidate}{suffix}"),
    }
}

#[derive(Debug, Snafu)]
#[snafu(display(
    "Could not truncate name '{}' to {} bytes while preserving file extension '{}'",
    name,
    max_len,
    extension
))]
pub struct ExtensionTooLongError {
    name: String,
    extension: String,
    max_len: usize,
}
