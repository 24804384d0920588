use memsweep_core::paths;
use std::path::{Path, PathBuf};

/// Resolve the memory root.
///
/// Priority:
/// 1. `--root` flag / `MEMSWEEP_ROOT` env var (passed in as `explicit`)
/// 2. The cwd, if it holds a `.memsweep.yaml`
/// 3. Walk upward from the cwd looking for a `memories/` directory
/// 4. Fall back to the cwd
pub fn resolve_root(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    discover_from(&cwd)
}

fn discover_from(start: &Path) -> PathBuf {
    if paths::config_path(start).is_file() {
        return start.to_path_buf();
    }

    let mut dir = start.to_path_buf();
    loop {
        if dir.file_name().is_some_and(|n| n == paths::MEMORIES_DIR) {
            return dir;
        }
        let candidate = dir.join(paths::MEMORIES_DIR);
        if candidate.is_dir() {
            return candidate;
        }
        match dir.parent() {
            Some(p) => dir = p.to_path_buf(),
            None => break,
        }
    }

    start.to_path_buf()
}
