use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

pub struct Scanner;

impl Scanner {
    /// Every `.java` file under `root`, honouring `.gitignore`, sorted by path.
    pub fn collect_java_files(root: &Path) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = WalkBuilder::new(root)
            .build()
            .filter_map(|entry| {
                let entry = entry.ok()?;
                let path = entry.path();
                if path.is_file() && is_java_path(path) {
                    return Some(path.to_path_buf());
                }
                None
            })
            .collect();
        paths.sort();
        paths
    }
}

pub fn is_java_path(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "java")
}
