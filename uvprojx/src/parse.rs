//! Build-settings extraction from descriptor XML.
//!
//! Only the C compiler block (`Cads`) is read. Inside it, the include paths
//! live in `VariousControls/IncludePath` (`;` separated) and the macro
//! definitions in `VariousControls/Define` (`,` separated):
//!
//! ```xml
//! <Cads>
//!   <VariousControls>
//!     <Define>USE_HAL_DRIVER,STM32F103xB</Define>
//!     <IncludePath>../Core/Inc;../Drivers/CMSIS/Include</IncludePath>
//!   </VariousControls>
//! </Cads>
//! ```

use std::{fs, path::Path};

use roxmltree::{Document, Node};

use crate::{DescriptorError, Result, path::normalize_include_path};

const BUILD_SETTINGS_TAG: &str = "Cads";
const CONTROLS_TAG: &str = "VariousControls";
const INCLUDE_PATH_TAG: &str = "IncludePath";
const DEFINE_TAG: &str = "Define";

const INCLUDE_PATH_DELIMITER: char = ';';
const DEFINE_DELIMITER: char = ',';

/// Compiler settings read from a descriptor.
///
/// Order and duplicates are kept exactly as they appear in the source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedSettings {
    /// Normalized include paths.
    pub include_paths: Vec<String>,
    /// Preprocessor macro definitions.
    pub defines: Vec<String>,
}

impl ExtractedSettings {
    /// Returns `true` if neither list holds anything.
    pub fn is_empty(&self) -> bool {
        self.include_paths.is_empty() && self.defines.is_empty()
    }
}

/// Splits a delimited field, trimming every piece and dropping empty ones.
pub fn split_field(text: &str, delimiter: char) -> Vec<String> {
    text.split(delimiter)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Finds the first `<tag>` whose parent is a `VariousControls` element
/// below `cads`.
fn find_control<'a, 'input>(cads: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    cads.descendants()
        .filter(|n| n.has_tag_name(CONTROLS_TAG))
        .flat_map(|n| n.children())
        .find(|n| n.has_tag_name(tag))
}

fn control_text<'a>(cads: Node<'a, '_>, tag: &str) -> Option<&'a str> {
    find_control(cads, tag).and_then(|n| n.text())
}

/// Extracts the compiler settings from descriptor XML text.
///
/// # Errors
///
/// Returns [`DescriptorError::Xml`] for malformed XML and
/// [`DescriptorError::MissingBuildSettings`] when there is no `Cads` node.
/// Missing `IncludePath`/`Define` nodes are not errors; they yield empty
/// lists.
pub fn parse_str(text: &str) -> Result<ExtractedSettings> {
    let doc = Document::parse(text)?;

    let cads = doc
        .descendants()
        .find(|n| n.has_tag_name(BUILD_SETTINGS_TAG))
        .ok_or(DescriptorError::MissingBuildSettings)?;

    let include_paths: Vec<String> = control_text(cads, INCLUDE_PATH_TAG)
        .map(|text| {
            split_field(text, INCLUDE_PATH_DELIMITER)
                .iter()
                .map(|p| normalize_include_path(p))
                .collect()
        })
        .unwrap_or_default();

    let defines: Vec<String> = control_text(cads, DEFINE_TAG)
        .map(|text| split_field(text, DEFINE_DELIMITER))
        .unwrap_or_default();

    Ok(ExtractedSettings {
        include_paths,
        defines,
    })
}

/// Reads and parses a descriptor file.
///
/// # Errors
///
/// Returns [`DescriptorError::NotFound`] if the file does not exist,
/// [`DescriptorError::Io`] if it cannot be read, and any error of
/// [`parse_str`].
pub fn parse_file(path: impl AsRef<Path>) -> Result<ExtractedSettings> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(DescriptorError::NotFound(path.to_path_buf()));
    }

    let text = fs::read_to_string(path).map_err(|source| DescriptorError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let settings = parse_str(&text)?;
    debug!(
        "{}: {} include paths, {} defines",
        path.display(),
        settings.include_paths.len(),
        settings.defines.len()
    );
    Ok(settings)
}
