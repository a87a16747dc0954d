//! `.editorconfig` generation.
//!
//! The file is written once and never overwritten, so local edits survive
//! later runs.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;

/// File name of the generated style file.
pub const EDITORCONFIG_FILE_NAME: &str = ".editorconfig";

/// Content written into a new `.editorconfig`.
pub const EDITORCONFIG_CONTENT: &str = "\
# EditorConfig is awesome: https://EditorConfig.org

# top-most EditorConfig file
root = true

[*]
indent_style = space
indent_size = 4
end_of_line = crlf
trim_trailing_whitespace = true
insert_final_newline = true
";

/// Result of [`write_editorconfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmitOutcome {
    /// The file was created.
    Written(PathBuf),
    /// The file already existed and was left alone.
    Skipped(PathBuf),
}

/// Writes `dir/.editorconfig` unless it already exists.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_editorconfig(dir: &Path) -> anyhow::Result<EmitOutcome> {
    let path = dir.join(EDITORCONFIG_FILE_NAME);
    if path.exists() {
        info!("'{}' already exists, skipped", path.display());
        return Ok(EmitOutcome::Skipped(path));
    }

    fs::write(&path, EDITORCONFIG_CONTENT)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Generated {}", path.display());
    Ok(EmitOutcome::Written(path))
}
