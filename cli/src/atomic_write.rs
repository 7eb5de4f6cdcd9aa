use std::io::Write as _;
use std::path::Path;

use anyhow::Context;

/// Replace `path` with `contents` by writing a sibling temp file and renaming it over the target,
/// so a crash never leaves a half-written config behind.
pub fn write_atomic_text(path: &Path, contents: &str) -> anyhow::Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => anyhow::bail!("invalid path for atomic write: {}", path.display()),
    };
    std::fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;

    let mut staged = tempfile::Builder::new()
        .prefix(".artistsearch-")
        .suffix(".tmp")
        .tempfile_in(parent)
        .with_context(|| format!("stage write next to {}", path.display()))?;
    staged
        .write_all(contents.as_bytes())
        .context("write staged file")?;
    if !contents.ends_with('\n') {
        staged.write_all(b"\n").context("write staged newline")?;
    }
    staged.as_file().sync_all().context("sync staged file")?;

    staged
        .persist(path)
        .map_err(|err| anyhow::Error::new(err.error))
        .with_context(|| format!("move staged file to {}", path.display()))?;
    Ok(())
}
