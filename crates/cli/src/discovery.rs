use ignore::WalkBuilder;
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

/// Decides which files the tool touches
#[derive(Debug, Clone)]
pub struct FileFilter {
    extension: String,
    excluded_file_names: Vec<String>,
}

impl FileFilter {
    pub fn new(extension: &str, excluded_file_names: &[String]) -> Self {
        Self {
            extension: extension.trim_start_matches('.').to_string(),
            excluded_file_names: excluded_file_names.to_vec(),
        }
    }

    pub fn is_eligible(&self, path: &Path) -> bool {
        let has_extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext == self.extension);
        if !has_extension {
            return false;
        }

        let excluded = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| self.excluded_file_names.iter().any(|ex| ex == name));
        !excluded
    }
}

/// Eligible files under `root` (.gitignore aware), sorted.
pub fn discover_files(root: &Path, filter: &FileFilter) -> Vec<PathBuf> {
    if !root.is_dir() {
        log::debug!("Skipping missing directory {}", root.display());
        return Vec::new();
    }

    let mut files = Vec::new();
    for result in WalkBuilder::new(root).hidden(true).git_ignore(true).build() {
        match result {
            Ok(entry) => {
                let is_file = entry.file_type().is_some_and(|ft| ft.is_file());
                if is_file && filter.is_eligible(entry.path()) {
                    files.push(entry.path().to_path_buf());
                }
            }
            Err(e) => log::warn!("Failed to read entry: {e}"),
        }
    }

    files.sort();
    log::info!("Found {} source files under {}", files.len(), root.display());
    files
}

/// Eligible files git reports as modified in the working tree.
///
/// Tracked files deleted from the working tree are skipped. A failing git
/// invocation is logged and yields no files.
pub async fn modified_files(root: &Path, filter: &FileFilter) -> Vec<PathBuf> {
    let output = tokio::process::Command::new("git")
        .arg("-C")
        .arg(root)
        .arg("ls-files")
        .arg("-m")
        .output()
        .await;

    let output = match output {
        Ok(output) if output.status.success() => output,
        Ok(output) => {
            log::warn!(
                "git ls-files failed ({}): {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
            return Vec::new();
        }
        Err(e) => {
            log::warn!("Failed to run git: {e}");
            return Vec::new();
        }
    };

    let stdout = String::from_utf8_lossy(&output.stdout);
    let files: Vec<PathBuf> = stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| root.join(line))
        .filter(|path| filter.is_eligible(path))
        .filter(|path| {
            let present = path.is_file();
            if !present {
                log::debug!("Skipping deleted {}", path.display());
            }
            present
        })
        .collect();
    log::info!("Found {} modified source files", files.len());
    files
}

/// Groups files by the configured module named in their first path component.
///
/// Files outside every module are left out.
pub fn group_by_module(
    root: &Path,
    files: &[PathBuf],
    modules: &[String],
) -> BTreeMap<String, Vec<PathBuf>> {
    let mut groups: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
    for file in files {
        let Some(module) = module_of(root, file, modules) else {
            log::debug!("{} belongs to no module", file.display());
            continue;
        };
        groups.entry(module.to_string()).or_default().push(file.clone());
    }
    groups
}

fn module_of<'a>(root: &Path, file: &Path, modules: &'a [String]) -> Option<&'a str> {
    let relative = file.strip_prefix(root).ok()?;
    let Some(Component::Normal(first)) = relative.components().next() else {
        return None;
    };
    let first = first.to_str()?;
    modules
        .iter()
        .find(|module| module.as_str() == first)
        .map(String::as_str)
}
