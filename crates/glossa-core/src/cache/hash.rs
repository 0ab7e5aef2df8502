use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use std::time::UNIX_EPOCH;

use super::{CacheError, Result};

/// Fingerprint of a set of tracked files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fingerprint {
    /// Lowercase hex BLAKE3 digest over every file's path, mtime and size
    pub hash: String,

    /// Matched files in the order they were hashed
    pub files: Vec<PathBuf>,
}

/// Literal text of one pattern component, or `None` if it holds a wildcard.
///
/// `[c]` is how `glob::Pattern::escape` writes a literal metacharacter.
fn literal_component(component: &str) -> Option<String> {
    let mut literal = String::new();
    let mut chars = component.chars();
    while let Some(c) = chars.next() {
        match c {
            '*' | '?' => return None,
            '[' => {
                let escaped = chars.next()?;
                if chars.next()? != ']' {
                    return None;
                }
                literal.push(escaped);
            }
            c => literal.push(c),
        }
    }
    Some(literal)
}

/// Directories the pattern names without wildcards, shallowest first
fn literal_dirs(pattern: &str) -> Vec<PathBuf> {
    let components: Vec<_> = Path::new(pattern).components().collect();
    // The last component selects files, it is never entered.
    let Some((_, parents)) = components.split_last() else {
        return Vec::new();
    };

    let mut dirs = Vec::new();
    let mut current = PathBuf::new();
    for component in parents {
        match component {
            Component::Normal(part) => {
                let Some(literal) = literal_component(&part.to_string_lossy()) else {
                    break;
                };
                current.push(literal);
                dirs.push(current.clone());
            }
            other => current.push(other.as_os_str()),
        }
    }
    dirs
}

/// Stat every literal directory of `pattern`.
///
/// `glob` skips literal components it cannot stat, which would turn an
/// inaccessible directory into an empty match set. A missing directory still
/// means no tracked files.
fn check_literal_dirs(pattern: &str) -> Result<()> {
    for dir in literal_dirs(pattern) {
        match fs::metadata(&dir) {
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => break,
            Err(e) => return Err(CacheError::io(dir, e)),
        }
    }
    Ok(())
}

/// Fingerprint all files matching `pattern` without reading their contents.
///
/// Paths are sorted before hashing so the result does not depend on directory
/// traversal order. Directories matched by the pattern are skipped. An empty
/// match set is not an error; it hashes to the digest of no input.
pub fn hash_files(pattern: &str) -> Result<Fingerprint> {
    let paths = glob::glob(pattern).map_err(|source| CacheError::Pattern {
        pattern: pattern.to_string(),
        source,
    })?;
    check_literal_dirs(pattern)?;

    let mut files = Vec::new();
    for entry in paths {
        let path = entry?;
        let metadata = fs::metadata(&path).map_err(|e| CacheError::io(&path, e))?;
        if metadata.is_file() {
            files.push((path, metadata));
        }
    }
    files.sort_by(|(a, _), (b, _)| a.cmp(b));

    let mut hasher = blake3::Hasher::new();
    for (path, metadata) in &files {
        let modified = metadata
            .modified()
            .map_err(|e| CacheError::io(path, e))?
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        let line = format!("{}:{}:{}\n", path.display(), modified, metadata.len());
        hasher.update(line.as_bytes());
    }

    let fingerprint = Fingerprint {
        hash: hasher.finalize().to_hex().to_string(),
        files: files.into_iter().map(|(path, _)| path).collect(),
    };
    tracing::debug!(
        pattern,
        files = fingerprint.files.len(),
        hash = %fingerprint.hash,
        "Hashed message files"
    );
    Ok(fingerprint)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn pattern_in(dir: &TempDir, tail: &str) -> String {
        format!(
            "{}/{}",
            glob::Pattern::escape(&dir.path().to_string_lossy()),
            tail
        )
    }

    #[test]
    fn test_hash_is_deterministic() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("en.json"), "{}").unwrap();
        fs::write(dir.path().join("de.json"), "{\"a\":1}").unwrap();

        let pattern = pattern_in(&dir, "*.json");
        let first = hash_files(&pattern).unwrap();
        let second = hash_files(&pattern).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.hash.len(), 64);
        assert!(first.hash.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_files_are_sorted() {
        let dir = TempDir::new().unwrap();
        for name in ["zh.json", "en.json", "de.json"] {
            fs::write(dir.path().join(name), "{}").unwrap();
        }

        let fingerprint = hash_files(&pattern_in(&dir, "*.json")).unwrap();
        let names: Vec<_> = fingerprint
            .files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();

        assert_eq!(names, vec!["de.json", "en.json", "zh.json"]);
    }

    #[test]
    fn test_empty_match_set_has_constant_hash() {
        let dir = TempDir::new().unwrap();

        let a = hash_files(&pattern_in(&dir, "*.json")).unwrap();
        let b = hash_files(&pattern_in(&dir, "missing/*.json")).unwrap();

        assert!(a.files.is_empty());
        assert_eq!(a.hash, b.hash);
        assert_eq!(a.hash, blake3::Hasher::new().finalize().to_hex().to_string());
    }

    #[test]
    fn test_size_change_changes_hash() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("en.json");
        fs::write(&file, "{}").unwrap();
        let pattern = pattern_in(&dir, "*.json");
        let before = hash_files(&pattern).unwrap();

        fs::write(&file, "{\"greeting\":\"hello\"}").unwrap();
        let after = hash_files(&pattern).unwrap();

        assert_ne!(before.hash, after.hash);
    }

    #[test]
    fn test_directories_are_skipped() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("nested.json")).unwrap();
        fs::write(dir.path().join("en.json"), "{}").unwrap();

        let fingerprint = hash_files(&pattern_in(&dir, "*.json")).unwrap();

        assert_eq!(fingerprint.files, vec![dir.path().join("en.json")]);
    }

    #[test]
    fn test_literal_dirs_stop_at_wildcards() {
        assert_eq!(
            literal_dirs("/a/b[[]c[]]/m/*.json"),
            vec![
                PathBuf::from("/a"),
                PathBuf::from("/a/b[c]"),
                PathBuf::from("/a/b[c]/m"),
            ]
        );
        assert_eq!(literal_dirs("/a/*/m/*.json"), vec![PathBuf::from("/a")]);
        assert!(literal_dirs("*.json").is_empty());
    }

    #[test]
    fn test_escaped_root_is_checked() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("app[1]");
        fs::create_dir_all(root.join("messages")).unwrap();

        let pattern = format!(
            "{}/messages/*.json",
            glob::Pattern::escape(&root.to_string_lossy())
        );

        assert_eq!(literal_dirs(&pattern).last(), Some(&root.join("messages")));
    }

    #[cfg(unix)]
    #[test]
    fn test_untraversable_directory_is_an_error() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let locked = dir.path().join("locked");
        fs::create_dir_all(locked.join("messages")).unwrap();
        fs::write(locked.join("messages/en.json"), "{}").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Privileged users bypass permission bits.
        let privileged = fs::metadata(locked.join("messages")).is_ok();
        let result = hash_files(&pattern_in(&dir, "locked/messages/*.json"));
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o700)).unwrap();
        if privileged {
            return;
        }

        match result {
            Err(CacheError::Io { path, source }) => {
                assert_eq!(path, locked.join("messages"));
                assert_eq!(source.kind(), ErrorKind::PermissionDenied);
            }
            other => panic!("expected an I/O error, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_directory_is_an_error() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let messages = dir.path().join("messages");
        fs::create_dir_all(&messages).unwrap();
        fs::write(messages.join("en.json"), "{}").unwrap();
        fs::set_permissions(&messages, fs::Permissions::from_mode(0o300)).unwrap();

        let privileged = fs::read_dir(&messages).is_ok();
        let result = hash_files(&pattern_in(&dir, "messages/*.json"));
        fs::set_permissions(&messages, fs::Permissions::from_mode(0o700)).unwrap();
        if privileged {
            return;
        }

        assert!(matches!(result, Err(CacheError::Walk(_))));
    }

    #[test]
    fn test_invalid_pattern_is_an_error() {
        let err = hash_files("/tmp/[unterminated").unwrap_err();
        assert!(matches!(err, CacheError::Pattern { .. }));
    }
}
