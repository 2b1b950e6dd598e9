//! Flat file storage keyed by file name.
//!
//! Every stored file lives directly in the storage root.
//! There is no index:
//! a file exists if and only if it is present in the directory.
//! Writes go through a temporary file in the same directory
//! which is then renamed over the target,
//! so readers never observe a partially written file.
//! Concurrent writes to the same name are not serialized,
//! the last rename wins.
use snafu::{ensure, OptionExt, ResultExt, Snafu};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::debug;
use unicode_normalization::UnicodeNormalization;

#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    /// The storage directory could not be created.
    #[snafu(display("Could not create storage directory {}", path.display()))]
    CreateRoot {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The file name is not in its sanitized form.
    #[snafu(display("Invalid file name `{}`", name))]
    InvalidName { name: String },
    /// No file is stored under this name.
    #[snafu(display("{} not found", name))]
    NotFound { name: String },
    #[snafu(display("Could not write {}", name))]
    Write {
        name: String,
        source: std::io::Error,
    },
    #[snafu(display("Could not read {}", name))]
    Read {
        name: String,
        source: std::io::Error,
    },
    #[snafu(display("Could not delete {}", name))]
    Delete {
        name: String,
        source: std::io::Error,
    },
}

impl Error {
    /// Whether this error means that the file does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A handle to the storage directory.
///
/// Created once at start-up and shared by reference.
#[derive(Debug, Clone)]
pub struct Storage {
    root: PathBuf,
}

impl Storage {
    /// Open the storage at the given directory,
    /// creating it and its parents if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root).context(CreateRootSnafu { path: &root })?;
        debug!("Storage ready at {}", root.display());
        Ok(Storage { root })
    }

    /// The storage directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether a file is stored under this name.
    pub fn exists(&self, name: &str) -> bool {
        self.path_of(name).map(|p| p.is_file()).unwrap_or(false)
    }

    /// Store the given bytes under this name,
    /// replacing any previous content.
    pub fn save(&self, name: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path_of(name).context(InvalidNameSnafu { name })?;

        let mut file = tempfile::NamedTempFile::new_in(&self.root).context(WriteSnafu { name })?;
        file.write_all(bytes).context(WriteSnafu { name })?;
        file.as_file().sync_all().context(WriteSnafu { name })?;
        file.persist(&path)
            .map_err(|e| e.error)
            .context(WriteSnafu { name })?;

        debug!("Saved {} ({} bytes)", name, bytes.len());
        Ok(())
    }

    /// Retrieve the full content of the file stored under this name.
    pub fn load(&self, name: &str) -> Result<Vec<u8>> {
        let path = self.path_of(name).context(NotFoundSnafu { name })?;
        match std::fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => NotFoundSnafu { name }.fail(),
            Err(e) => Err(e).context(ReadSnafu { name }),
        }
    }

    /// Remove the file stored under this name.
    pub fn delete(&self, name: &str) -> Result<()> {
        let path = self.path_of(name).context(NotFoundSnafu { name })?;
        match std::fs::remove_file(&path) {
            Ok(()) => {
                debug!("Deleted {}", name);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => NotFoundSnafu { name }.fail(),
            Err(e) => Err(e).context(DeleteSnafu { name }),
        }
    }

    /// Resolve a name to its path in the storage root.
    ///
    /// Only names which are already sanitized resolve,
    /// so no name can reach outside of the root
    /// nor address a temporary file.
    fn path_of(&self, name: &str) -> Option<PathBuf> {
        if name.is_empty() || sanitize_filename(name) != name {
            return None;
        }
        Some(self.root.join(name))
    }
}

/// Turn a client supplied file name into one safe to store.
///
/// Characters are decomposed (NFKD) and whatever is not ASCII is dropped,
/// path separators and runs of whitespace become a single `_`,
/// anything other than ASCII letters, digits, `_`, `.` and `-` is removed,
/// and leading or trailing dots and underscores are stripped.
/// The result may be empty.
pub fn sanitize_filename(name: &str) -> String {
    let ascii: String = name
        .nfkd()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();
    let joined = ascii.split_ascii_whitespace().collect::<Vec<_>>().join("_");
    let kept: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();
    kept.trim_matches(|c| c == '.' || c == '_').to_string()
}

/// Sanitize a name for storage, failing if nothing usable remains.
pub fn sanitized_name(name: &str) -> Result<String> {
    let sanitized = sanitize_filename(name);
    ensure!(!sanitized.is_empty(), InvalidNameSnafu { name });
    Ok(sanitized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("test.dcm", "test.dcm")]
    #[case("My cool scan.dcm", "My_cool_scan.dcm")]
    #[case("../../etc/passwd", "etc_passwd")]
    #[case("C:\\Windows\\scan.dcm", "C_Windows_scan.dcm")]
    #[case(".hidden", "hidden")]
    #[case("_scan_.dcm_", "scan_.dcm")]
    #[case("scan (1).dcm", "scan_1.dcm")]
    #[case("résumé.dcm", "resume.dcm")]
    #[case("ﬁle.dcm", "file.dcm")]
    #[case("Ｓｃａｎ.dcm", "Scan.dcm")]
    #[case("日本.dcm", "dcm")]
    #[case("..", "")]
    #[case("", "")]
    fn sanitizes_file_names(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(sanitize_filename(input), expected);
    }

    #[test]
    fn creates_root_directory() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("nested").join("store");
        let storage = Storage::open(&root).unwrap();
        assert!(root.is_dir());
        assert_eq!(storage.root(), root);
    }

    #[test]
    fn save_load_delete() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::open(dir.path()).unwrap();

        assert!(!storage.exists("a.dcm"));
        storage.save("a.dcm", b"first").unwrap();
        assert!(storage.exists("a.dcm"));
        assert_eq!(storage.load("a.dcm").unwrap(), b"first");

        storage.delete("a.dcm").unwrap();
        assert!(!storage.exists("a.dcm"));
        assert!(storage.load("a.dcm").unwrap_err().is_not_found());
    }

    #[test]
    fn save_overwrites_without_leftovers() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::open(dir.path()).unwrap();

        storage.save("a.dcm", b"first version").unwrap();
        storage.save("a.dcm", b"second").unwrap();
        storage.save("a.dcm", b"third").unwrap();

        assert_eq!(storage.load("a.dcm").unwrap(), b"third");
        let entries: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("a.dcm")]);
    }

    #[test]
    fn unsanitized_names_do_not_resolve() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::open(dir.path().join("store")).unwrap();
        std::fs::write(dir.path().join("outside.dcm"), b"secret").unwrap();

        assert!(!storage.exists("../outside.dcm"));
        assert!(storage.load("../outside.dcm").unwrap_err().is_not_found());
        assert!(matches!(
            storage.save("../outside.dcm", b"x"),
            Err(Error::InvalidName { .. })
        ));
        assert_eq!(std::fs::read(dir.path().join("outside.dcm")).unwrap(), b"secret");
    }

    #[test]
    fn delete_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::open(dir.path()).unwrap();
        assert!(storage.delete("nothing.dcm").unwrap_err().is_not_found());
    }

    #[test]
    fn empty_sanitized_name_is_invalid() {
        assert!(matches!(sanitized_name("../"), Err(Error::InvalidName { .. })));
        assert_eq!(sanitized_name("a b.dcm").unwrap(), "a_b.dcm");
    }
}
