//! Descriptor lookup in a directory tree.
//!
//! Within a directory, files are visited before sub-directories; otherwise
//! the walk keeps the order the OS lists entries in. A descriptor at the top
//! of the search root therefore wins over one in a vendored sub-project.

use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::{DESCRIPTOR_EXTENSION, DescriptorError, Result};

fn is_descriptor(entry: &DirEntry) -> bool {
    // symlinks are not followed by the walk, so resolve them here
    !entry.file_type().is_dir()
        && entry.path().is_file()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.ends_with(DESCRIPTOR_EXTENSION))
}

/// Yields every descriptor below `root`.
///
/// A failure on the root itself is returned as an error. Unreadable entries
/// deeper in the tree are skipped.
fn descriptors(root: &Path) -> impl Iterator<Item = Result<PathBuf>> + '_ {
    WalkDir::new(root)
        .sort_by(|a, b| a.file_type().is_dir().cmp(&b.file_type().is_dir()))
        .into_iter()
        .filter_map(move |entry| match entry {
            Ok(entry) if is_descriptor(&entry) => Some(Ok(entry.into_path())),
            Ok(_) => None,
            Err(e) if e.depth() == 0 => Some(Err(DescriptorError::Walk {
                root: root.to_path_buf(),
                source: e,
            })),
            Err(e) => {
                debug!("skip unreadable entry: {e}");
                None
            }
        })
}

/// Returns all descriptors found below `root`, in walk order.
///
/// # Errors
///
/// Returns [`DescriptorError::Walk`] if `root` cannot be read.
pub fn find_descriptors(root: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    descriptors(root.as_ref()).collect()
}

/// Returns the first descriptor found below `root`, or `None`.
///
/// # Errors
///
/// Returns [`DescriptorError::Walk`] if `root` cannot be read.
pub fn find_first_descriptor(root: impl AsRef<Path>) -> Result<Option<PathBuf>> {
    descriptors(root.as_ref()).next().transpose()
}
