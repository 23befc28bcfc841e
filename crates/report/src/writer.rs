// In crates/report/src/writer.rs

use std::fs::{self, Permissions};
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{Error, Result};

/// Replaces `path` with `contents` so readers see either the old file or the
/// complete new one, never a truncated document.
///
/// The temporary file is created next to the target because a rename is only
/// atomic within one filesystem. The replaced file keeps its permissions; a new
/// file gets the usual 0644.
pub fn write_atomically(path: &Path, contents: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    // Temp files are created owner-only; without this the published report
    // would turn 0600 after the first run.
    if let Some(permissions) = target_permissions(path)? {
        tmp.as_file().set_permissions(permissions)?;
    }
    tmp.write_all(contents.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| Error::Persist {
        path: path.to_path_buf(),
        source: e.error,
    })?;

    tracing::debug!(path = %path.display(), bytes = contents.len(), "Report file replaced.");
    Ok(())
}

fn target_permissions(path: &Path) -> io::Result<Option<Permissions>> {
    match fs::metadata(path) {
        Ok(metadata) => Ok(Some(metadata.permissions())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(new_file_permissions()),
        Err(e) => Err(e),
    }
}

#[cfg(unix)]
fn new_file_permissions() -> Option<Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn new_file_permissions() -> Option<Permissions> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("README.md");

        write_atomically(&target, "## report\n").unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "## report\n");
    }

    #[test]
    fn test_fully_replaces_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("README.md");
        fs::write(&target, "a much longer previous report that must not survive\n").unwrap();

        write_atomically(&target, "short\n").unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "short\n");
    }

    #[test]
    fn test_leaves_no_temporary_files_behind() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("README.md");

        write_atomically(&target, "one\n").unwrap();
        write_atomically(&target, "two\n").unwrap();

        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[cfg(unix)]
    fn mode(path: &Path) -> u32 {
        use std::os::unix::fs::PermissionsExt;
        fs::metadata(path).unwrap().permissions().mode() & 0o777
    }

    #[cfg(unix)]
    #[test]
    fn test_keeps_permissions_of_replaced_file() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("README.md");
        fs::write(&target, "old\n").unwrap();
        fs::set_permissions(&target, fs::Permissions::from_mode(0o640)).unwrap();

        write_atomically(&target, "new\n").unwrap();

        assert_eq!(mode(&target), 0o640);
        assert_eq!(fs::read_to_string(&target).unwrap(), "new\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_new_file_is_world_readable() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("README.md");

        write_atomically(&target, "fresh\n").unwrap();
        assert_eq!(mode(&target), 0o644);

        write_atomically(&target, "again\n").unwrap();
        assert_eq!(mode(&target), 0o644);
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("missing").join("README.md");

        assert!(write_atomically(&target, "x\n").is_err());
        assert!(!target.exists());
    }
}
