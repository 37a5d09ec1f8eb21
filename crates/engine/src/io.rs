use crate::error::{EngineError, Result};
use crate::source::SourceFile;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

/// Reads and splits a source file.
pub async fn read_source(path: &Path) -> Result<(SourceFile, String)> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| EngineError::read(path, e))?;
    Ok((SourceFile::parse(&content), content))
}

/// Replaces `path` with `contents` through a sibling temp file and a rename.
///
/// A symlinked `path` is followed so the link survives, and an existing
/// file keeps its permissions.
pub async fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let target = match tokio::fs::canonicalize(path).await {
        Ok(resolved) => resolved,
        Err(_) => path.to_path_buf(),
    };
    let permissions = tokio::fs::metadata(&target)
        .await
        .ok()
        .map(|meta| meta.permissions());

    let tmp = temp_sibling(&target);
    if let Err(err) = write_and_sync(&tmp, contents, permissions).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(EngineError::write(path, err));
    }

    if let Err(err) = tokio::fs::rename(&tmp, &target).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(EngineError::write(path, err));
    }
    Ok(())
}

/// Renders `source` with `import_lines` and writes it atomically.
pub async fn write_source<S: AsRef<str>>(
    path: &Path,
    source: &SourceFile,
    import_lines: &[S],
) -> Result<()> {
    write_atomic(path, &source.render_with(import_lines)).await
}

async fn write_and_sync(
    tmp: &Path,
    contents: &str,
    permissions: Option<std::fs::Permissions>,
) -> std::io::Result<()> {
    let mut file = tokio::fs::File::create(tmp).await?;
    file.write_all(contents.as_bytes()).await?;
    if let Some(permissions) = permissions {
        file.set_permissions(permissions).await?;
    }
    file.sync_all().await?;
    Ok(())
}

fn temp_sibling(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("source");
    path.with_file_name(format!(".{name}.tmp-{}", std::process::id()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn read_reports_missing_file() {
        let dir = tempdir().expect("tempdir");
        let err = read_source(&dir.path().join("Missing.scala"))
            .await
            .expect_err("missing file");
        assert!(matches!(err, EngineError::Read { .. }));
    }

    #[tokio::test]
    async fn write_replaces_content_without_leftovers() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("Main.scala");
        std::fs::write(&path, "package old\n").expect("seed");

        write_atomic(&path, "package new\n").await.expect("write");

        assert_eq!(std::fs::read_to_string(&path).expect("read"), "package new\n");
        let entries = std::fs::read_dir(dir.path()).expect("list").count();
        assert_eq!(entries, 1, "temp file must be renamed away");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn write_keeps_file_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("run.scala");
        std::fs::write(&path, "package old\n").expect("seed");
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o754)).expect("chmod");

        write_atomic(&path, "package new\n").await.expect("write");

        let mode = std::fs::metadata(&path).expect("meta").permissions().mode();
        assert_eq!(mode & 0o777, 0o754);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn write_through_symlink_keeps_link() {
        let dir = tempdir().expect("tempdir");
        let real = dir.path().join("Real.scala");
        let link = dir.path().join("Link.scala");
        std::fs::write(&real, "package old\n").expect("seed");
        std::os::unix::fs::symlink(&real, &link).expect("symlink");

        write_atomic(&link, "package new\n").await.expect("write");

        let link_meta = std::fs::symlink_metadata(&link).expect("link meta");
        assert!(link_meta.file_type().is_symlink());
        assert_eq!(std::fs::read_to_string(&real).expect("read"), "package new\n");
    }

    #[tokio::test]
    async fn write_into_missing_directory_fails() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("nope").join("Main.scala");
        let err = write_atomic(&path, "x").await.expect_err("no parent");
        assert!(matches!(err, EngineError::Write { .. }));
    }
}
