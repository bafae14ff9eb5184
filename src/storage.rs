// File: ./src/storage.rs
// Atomic artifact output. Exports are written to a sibling temp file
// and renamed into place so an interrupted run never leaves a
// half-written workbook or feed behind.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub fn atomic_write(path: &Path, contents: &[u8]) -> Result<()> {
    if let Some(dir) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create output directory '{}'", dir.display()))?;
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    fs::write(&tmp, contents).with_context(|| format!("failed to write '{}'", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("failed to move '{}' into place", tmp.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_and_replaces() {
        let dir = std::env::temp_dir().join("zvonok-storage-test");
        let path = dir.join("artifact.bin");

        atomic_write(&path, b"first").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"first");

        atomic_write(&path, b"second").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"second");

        fs::remove_dir_all(&dir).unwrap();
    }
}
