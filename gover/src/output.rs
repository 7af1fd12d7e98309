use anyhow::{Context, Result};
use gover_core::model::VersionData;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{error, info};

/// Writes the versions as 2-space indented JSON.
///
/// The document is written to a temporary file next to `path` and moved into
/// place once complete, so a failure never leaves a truncated file behind.
pub fn write_versions(path: &Path, versions: &[VersionData]) -> Result<()> {
    let json = serde_json::to_string_pretty(versions).context("Error marshaling JSON")?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
    file.write_all(json.as_bytes())
        .with_context(|| format!("Error writing JSON to file {}", path.display()))?;
    // Temporary files are created 0600; the output is an ordinary 0644 file.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.as_file()
            .set_permissions(std::fs::Permissions::from_mode(0o644))
            .with_context(|| format!("Failed to set permissions on {}", path.display()))?;
    }
    file.persist(path).map_err(|e| {
        error!(error = ?e.error, path = %path.display(), "Failed to move output into place");
        anyhow::Error::new(e.error)
            .context(format!("Error writing JSON to file {}", path.display()))
    })?;

    info!(path = %path.display(), versions = versions.len(), bytes = json.len(), "Wrote version data");
    Ok(())
}
