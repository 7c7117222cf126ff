use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Input and output roots: sibling `input/` and `output/` directories
/// under one install root, created on demand.
#[derive(Debug, Clone)]
pub struct MediaDirs {
    pub input: PathBuf,
    pub output: PathBuf,
}

impl MediaDirs {
    pub fn resolve(root: &Path) -> io::Result<Self> {
        let input = root.join("input");
        let output = root.join("output");
        fs::create_dir_all(&input)?;
        fs::create_dir_all(&output)?;
        Ok(Self { input, output })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_creates_siblings() {
        let root = tempfile::tempdir().unwrap();
        let dirs = MediaDirs::resolve(root.path()).unwrap();
        assert!(dirs.input.is_dir());
        assert!(dirs.output.is_dir());
        assert_eq!(dirs.input.parent(), dirs.output.parent());
    }
}
