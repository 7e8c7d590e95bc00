//! Filesystem helpers.

use eyre::{Result, WrapErr};
use once_cell::sync::Lazy;
use regex::Regex;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Characters that cannot appear in a file name (Windows being the
/// restrictive one).
/// See https://docs.microsoft.com/en-us/windows/win32/fileio/naming-a-file
static ILLEGAL_CHARS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"[/\?<>\\:\*\|"]"#).expect("invalid chars regexp")
});

/// Clean a name to safely use it as a file name.
pub fn sanitize_name(name: &str) -> PathBuf {
    let name = name.trim_end_matches(|c| c == '.' || c == ' ');

    ILLEGAL_CHARS.replace_all(name, "_").into_owned().into()
}

/// Recursively create a directory and all of its parents if necessary.
pub fn mkdir_p(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .with_context(|| format!("mkdir_p {}", path.display()))
}

/// Write a file atomically (using a tempfile + atomic rename).
pub fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    let mut tmp_path = path.to_path_buf();
    tmp_path.set_extension("part");

    fs::write(&tmp_path, data)
        .with_context(|| format!("write {}", tmp_path.display()))?;

    fs::rename(&tmp_path, path)
        .with_context(|| format!("rename to {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_trailing_dots_and_spaces() {
        let expected: PathBuf = "foo".into();

        assert_eq!(sanitize_name("foo   "), expected);
        assert_eq!(sanitize_name("foo."), expected);
        assert_eq!(sanitize_name("foo. . "), expected);
    }

    #[test]
    fn sanitize_replaces_illegal_chars() {
        assert_eq!(sanitize_name("go/to:a?bar"), PathBuf::from("go_to_a_bar"));
        assert_eq!(sanitize_name(r#"a"b*c"#), PathBuf::from("a_b_c"));
        assert_eq!(
            sanitize_name("one<two>three"),
            PathBuf::from("one_two_three")
        );
    }
}
