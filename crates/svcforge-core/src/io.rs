use crate::error::Result;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Atomically write `data` to `path` using a tempfile in the same directory.
/// Prevents partial writes from corrupting generated artifacts.
pub fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Create a directory and all parents, idempotent.
pub fn ensure_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path)?;
    Ok(())
}

/// How a guarded write resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteDisposition {
    Written,
    SkippedExisting,
}

/// Write a file, refusing to clobber an existing one unless `overwrite`
/// is set. The refusal is per-file and reported, never an error.
pub fn write_guarded(path: &Path, data: &[u8], overwrite: bool) -> Result<WriteDisposition> {
    if path.exists() && !overwrite {
        return Ok(WriteDisposition::SkippedExisting);
    }
    atomic_write(path, data)?;
    Ok(WriteDisposition::Written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn atomic_write_creates_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("wrangler.toml");
        atomic_write(&path, b"name = \"svc\"").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "name = \"svc\"");
    }

    #[test]
    fn atomic_write_creates_parents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".github/workflows/deploy.yml");
        atomic_write(&path, b"on: push").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn guarded_write_skips_existing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("package.json");
        std::fs::write(&path, b"original").unwrap();

        let d = write_guarded(&path, b"replacement", false).unwrap();
        assert_eq!(d, WriteDisposition::SkippedExisting);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "original");
    }

    #[test]
    fn guarded_write_overwrites_when_asked() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("package.json");
        std::fs::write(&path, b"original").unwrap();

        let d = write_guarded(&path, b"replacement", true).unwrap();
        assert_eq!(d, WriteDisposition::Written);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "replacement");
    }

    #[test]
    fn guarded_write_writes_when_missing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("README.md");
        let d = write_guarded(&path, b"# svc", false).unwrap();
        assert_eq!(d, WriteDisposition::Written);
    }
}
