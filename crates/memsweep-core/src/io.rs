use crate::error::Result;
use std::io::{ErrorKind, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Atomically write `data` to `path` using a tempfile in the same directory.
/// Prevents partial writes from leaving a truncated report behind.
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

/// Move `src` to `dst`.
///
/// Uses `rename` where the filesystem allows it. Across devices the file is
/// copied into a tempfile next to `dst`, synced, checked for length, persisted
/// without clobbering, and only then is `src` removed. The caller is expected
/// to pick a `dst` that does not exist.
pub fn move_file(src: &Path, dst: &Path) -> Result<()> {
    match std::fs::rename(src, dst) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::CrossesDevices => copy_then_remove(src, dst),
        Err(e) => Err(e.into()),
    }
}

fn copy_then_remove(src: &Path, dst: &Path) -> Result<()> {
    let dir = dst.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    let mut source = std::fs::File::open(src)?;
    let copied = std::io::copy(&mut source, tmp.as_file_mut())?;
    tmp.as_file().sync_all()?;

    let expected = source.metadata()?.len();
    if copied != expected {
        return Err(std::io::Error::new(
            ErrorKind::UnexpectedEof,
            format!(
                "copied {copied} of {expected} bytes from {}",
                src.display()
            ),
        )
        .into());
    }

    tmp.persist_noclobber(dst).map_err(|e| e.error)?;
    std::fs::remove_file(src)?;
    Ok(())
}
