use std::fs;
use std::io;

use camino::Utf8Path;
use tempfile::Builder;
use tracing::info;

use crate::error::BinStageError;

/// Filesystem capability used by the router. Reads are plain `io` results so
/// callers decide whether a failure is recoverable; writes are fatal.
pub trait FileOps: Send + Sync {
    fn exists(&self, path: &Utf8Path) -> bool;
    fn read(&self, path: &Utf8Path) -> io::Result<Vec<u8>>;
    fn create_dir_all(&self, path: &Utf8Path) -> Result<(), BinStageError>;
    /// Copies `source` to exactly `dest`, replacing any previous file there.
    fn copy_file(&self, source: &Utf8Path, dest: &Utf8Path) -> Result<(), BinStageError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl FileOps for LocalFs {
    fn exists(&self, path: &Utf8Path) -> bool {
        path.as_std_path().exists()
    }

    fn read(&self, path: &Utf8Path) -> io::Result<Vec<u8>> {
        fs::read(path.as_std_path())
    }

    fn create_dir_all(&self, path: &Utf8Path) -> Result<(), BinStageError> {
        fs::create_dir_all(path.as_std_path()).map_err(|err| BinStageError::CreateDir {
            path: path.to_path_buf(),
            message: err.to_string(),
        })
    }

    fn copy_file(&self, source: &Utf8Path, dest: &Utf8Path) -> Result<(), BinStageError> {
        info!(cmd = %format!("cp {source} {dest}"), "copy");
        let copy_err = |message: String| BinStageError::Copy {
            from: source.to_path_buf(),
            to: dest.to_path_buf(),
            message,
        };
        let parent = dest
            .parent()
            .ok_or_else(|| copy_err("invalid destination path".to_string()))?;
        // Same directory as `dest`: persisting is a plain rename.
        let temp = Builder::new()
            .prefix(".kira-binstage")
            .tempfile_in(parent.as_std_path())
            .map_err(|err| copy_err(err.to_string()))?;
        fs::copy(source.as_std_path(), temp.path()).map_err(|err| copy_err(err.to_string()))?;
        temp.persist(dest.as_std_path())
            .map_err(|err| copy_err(err.error.to_string()))?;
        Ok(())
    }
}

/// Reads through to the wrapped filesystem and only logs writes.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunFs<F: FileOps> {
    inner: F,
}

impl<F: FileOps> DryRunFs<F> {
    pub fn new(inner: F) -> Self {
        Self { inner }
    }
}

impl<F: FileOps> FileOps for DryRunFs<F> {
    fn exists(&self, path: &Utf8Path) -> bool {
        self.inner.exists(path)
    }

    fn read(&self, path: &Utf8Path) -> io::Result<Vec<u8>> {
        self.inner.read(path)
    }

    fn create_dir_all(&self, path: &Utf8Path) -> Result<(), BinStageError> {
        info!(path = %path, "dry-run: would create directory");
        Ok(())
    }

    fn copy_file(&self, source: &Utf8Path, dest: &Utf8Path) -> Result<(), BinStageError> {
        info!(cmd = %format!("cp {source} {dest}"), "dry-run: would copy");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use camino::Utf8PathBuf;

    use super::*;

    fn utf8_tempdir() -> (tempfile::TempDir, Utf8PathBuf) {
        let temp = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
        (temp, root)
    }

    #[test]
    fn copy_overwrites_by_path() {
        let (_temp, root) = utf8_tempdir();
        let source = root.join("bin.1.fa");
        let dest = root.join("out").join("bin.1.fna");
        fs::write(source.as_std_path(), b">contig\nACGT\n").unwrap();
        LocalFs.create_dir_all(dest.parent().unwrap()).unwrap();
        fs::write(dest.as_std_path(), b"stale").unwrap();

        LocalFs.copy_file(&source, &dest).unwrap();
        assert_eq!(fs::read(dest.as_std_path()).unwrap(), b">contig\nACGT\n");
    }

    #[test]
    fn copy_missing_source_is_error() {
        let (_temp, root) = utf8_tempdir();
        let err = LocalFs
            .copy_file(&root.join("absent.fa"), &root.join("dest.fa"))
            .unwrap_err();
        assert!(matches!(err, BinStageError::Copy { .. }));
    }

    #[test]
    fn dry_run_writes_nothing() {
        let (_temp, root) = utf8_tempdir();
        let source = root.join("bin.1.fa");
        fs::write(source.as_std_path(), b"ACGT").unwrap();
        let dry = DryRunFs::new(LocalFs);

        dry.create_dir_all(&root.join("hq")).unwrap();
        dry.copy_file(&source, &root.join("copy.fa")).unwrap();
        assert!(dry.exists(&source));
        assert!(!root.join("hq").as_std_path().exists());
        assert!(!root.join("copy.fa").as_std_path().exists());
    }
}
