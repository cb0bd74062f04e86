//! Filesystem-backed exceptions storage.

use crate::core::error::{ExceptionsError, ExceptionsResult};
use crate::core::ExceptionPolicy;
use crate::exceptions::traits::{
    decode_exceptions, encode_exceptions, ExceptionsLocation, ExceptionsStore,
};

use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Default location the scan engine reads exceptions from.
pub const DEFAULT_EXCEPTIONS_PATH: &str = "/tmp/exceptions.json";

/// File name used by [`FixedPathStore::in_dir`].
pub const EXCEPTIONS_FILE_NAME: &str = "exceptions.json";

/// Writes every exception list to the same well-known path.
///
/// This is the contract existing engine deployments rely on: the engine
/// (or an operator) can always find the latest exceptions at one place.
///
/// # Concurrency
///
/// All requests share the path. Two overlapping requests race: the scan
/// started by one of them may read the exceptions written by the other.
/// No locking is done here. Use [`UniquePathStore`] when requests must be
/// isolated from each other.
#[derive(Debug, Clone)]
pub struct FixedPathStore {
    path: PathBuf,
}

impl FixedPathStore {
    /// Creates a store writing to the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates a store writing `exceptions.json` inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(EXCEPTIONS_FILE_NAME))
    }

    /// Returns the file this store writes to.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FixedPathStore {
    fn default() -> Self {
        Self::new(DEFAULT_EXCEPTIONS_PATH)
    }
}

impl ExceptionsStore for FixedPathStore {
    fn persist(&self, exceptions: &[ExceptionPolicy]) -> ExceptionsResult<ExceptionsLocation> {
        let data = encode_exceptions(exceptions)?;
        write_exceptions_file(&self.path, &data)?;
        Ok(ExceptionsLocation::new(self.path.clone()))
    }

    fn load(&self, location: &ExceptionsLocation) -> ExceptionsResult<Vec<ExceptionPolicy>> {
        read_exceptions_file(location)
    }

    fn name(&self) -> &str {
        "fixed-path"
    }
}

/// Writes each exception list to its own file inside a directory.
///
/// Files are named `exceptions-<uuid>.json`, so concurrent requests never
/// overwrite each other. A file stays on disk until the engine consumes it
/// with [`take`](ExceptionsStore::take).
#[derive(Debug, Clone)]
pub struct UniquePathStore {
    dir: PathBuf,
}

impl UniquePathStore {
    /// Creates a store writing into `dir`.
    ///
    /// The directory must already exist.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the directory files are written to.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn next_path(&self) -> PathBuf {
        self.dir.join(format!("exceptions-{}.json", Uuid::new_v4()))
    }
}

impl Default for UniquePathStore {
    fn default() -> Self {
        Self::new(std::env::temp_dir())
    }
}

impl ExceptionsStore for UniquePathStore {
    fn persist(&self, exceptions: &[ExceptionPolicy]) -> ExceptionsResult<ExceptionsLocation> {
        let data = encode_exceptions(exceptions)?;
        let path = self.next_path();
        write_exceptions_file(&path, &data)?;
        Ok(ExceptionsLocation::new(path))
    }

    fn load(&self, location: &ExceptionsLocation) -> ExceptionsResult<Vec<ExceptionPolicy>> {
        read_exceptions_file(location)
    }

    fn take(&self, location: &ExceptionsLocation) -> ExceptionsResult<Vec<ExceptionPolicy>> {
        let exceptions = read_exceptions_file(location)?;
        std::fs::remove_file(location.as_path())?;
        Ok(exceptions)
    }

    fn name(&self) -> &str {
        "unique-path"
    }
}

/// Writes `data` to `path`, replacing any previous content.
///
/// New files get mode `0644` on unix.
fn write_exceptions_file(path: &Path, data: &[u8]) -> ExceptionsResult<()> {
    let mut options = std::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o644);
    }

    let mut file = options
        .open(path)
        .map_err(|e| ExceptionsError::write_failed(path, e))?;
    file.write_all(data)
        .map_err(|e| ExceptionsError::write_failed(path, e))?;

    Ok(())
}

fn read_exceptions_file(location: &ExceptionsLocation) -> ExceptionsResult<Vec<ExceptionPolicy>> {
    let data = std::fs::read(location.as_path()).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ExceptionsError::not_found(location.to_string()),
        _ => ExceptionsError::Io(e),
    })?;
    decode_exceptions(&data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PosturePolicy;
    use tempfile::TempDir;

    fn sample_exceptions() -> Vec<ExceptionPolicy> {
        vec![
            ExceptionPolicy::new("e1")
                .with_action("alertOnly")
                .with_posture_policy(PosturePolicy::control("C-0034")),
            ExceptionPolicy::new("e2").with_policy_type("postureExceptionPolicy"),
        ]
    }

    #[test]
    fn test_default_fixed_path() {
        let store = FixedPathStore::default();
        assert_eq!(store.path(), Path::new(DEFAULT_EXCEPTIONS_PATH));
    }

    #[test]
    fn test_fixed_path_persist_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let store = FixedPathStore::in_dir(temp_dir.path());

        let location = store.persist(&sample_exceptions()).unwrap();
        assert_eq!(location.as_path(), temp_dir.path().join("exceptions.json"));

        let loaded = store.load(&location).unwrap();
        assert_eq!(loaded, sample_exceptions());
    }

    #[test]
    fn test_fixed_path_overwrites_previous_list() {
        let temp_dir = TempDir::new().unwrap();
        let store = FixedPathStore::in_dir(temp_dir.path());

        let first = store.persist(&sample_exceptions()).unwrap();
        let second = store.persist(&[ExceptionPolicy::new("only")]).unwrap();
        assert_eq!(first, second);

        // The earlier location now yields the later list.
        let loaded = store.load(&first).unwrap();
        assert_eq!(loaded, vec![ExceptionPolicy::new("only")]);
    }

    #[test]
    fn test_fixed_path_missing_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        let store = FixedPathStore::new(temp_dir.path().join("missing").join("exceptions.json"));

        let err = store.persist(&sample_exceptions()).unwrap_err();
        assert!(matches!(err, ExceptionsError::WriteFailed { .. }));
        assert!(err.is_storage_failure());
    }

    #[cfg(unix)]
    #[test]
    fn test_written_file_mode() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let store = FixedPathStore::in_dir(temp_dir.path());
        let location = store.persist(&[]).unwrap();

        let mode = std::fs::metadata(location.as_path())
            .unwrap()
            .permissions()
            .mode();
        // The process umask can only clear bits.
        assert_eq!(mode & 0o777 & !0o644, 0);
        assert_eq!(mode & 0o600, 0o600);
    }

    #[test]
    fn test_unique_path_isolates_calls() {
        let temp_dir = TempDir::new().unwrap();
        let store = UniquePathStore::new(temp_dir.path());

        let a = store.persist(&[ExceptionPolicy::new("a")]).unwrap();
        let b = store.persist(&[ExceptionPolicy::new("b")]).unwrap();
        assert_ne!(a, b);
        assert!(a.as_path().starts_with(temp_dir.path()));

        assert_eq!(store.load(&a).unwrap()[0].name(), "a");
        assert_eq!(store.load(&b).unwrap()[0].name(), "b");
    }

    #[test]
    fn test_unique_path_take_removes_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = UniquePathStore::new(temp_dir.path());

        let location = store.persist(&sample_exceptions()).unwrap();
        assert_eq!(store.take(&location).unwrap(), sample_exceptions());
        assert!(!location.as_path().exists());

        let err = store.take(&location).unwrap_err();
        assert!(matches!(err, ExceptionsError::NotFound { .. }));
    }

    #[test]
    fn test_fixed_path_take_keeps_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = FixedPathStore::in_dir(temp_dir.path());

        let location = store.persist(&sample_exceptions()).unwrap();
        assert_eq!(store.take(&location).unwrap(), sample_exceptions());
        assert!(location.as_path().exists());
    }

    #[test]
    fn test_null_fields_written_back_verbatim() {
        let temp_dir = TempDir::new().unwrap();
        let store = FixedPathStore::in_dir(temp_dir.path());
        let raw = br#"[{"name":"","policyType":null,"actions":[],"posturePolicies":[{"controlID":null}]}]"#;

        let exceptions = decode_exceptions(raw).unwrap();
        let location = store.persist(&exceptions).unwrap();
        assert_eq!(std::fs::read(location.as_path()).unwrap(), raw);
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = UniquePathStore::new(temp_dir.path());
        let location = ExceptionsLocation::new(temp_dir.path().join("nope.json"));

        let err = store.load(&location).unwrap_err();
        assert!(matches!(err, ExceptionsError::NotFound { .. }));
    }
}
