//! Application context and the conversion pipeline.
//!
//! This module provides the [`AppContext`] type which holds everything one
//! run needs: where to look for the Keil project, where the VS Code
//! configuration lives, and the resolved [`ToolConfig`].

use std::path::{Path, PathBuf};

use anyhow::Context;
use uvprojx::{find_first_descriptor, parse_file};

use crate::{
    config::ToolConfig,
    editorconfig::{EmitOutcome, write_editorconfig},
    properties::{UpdateOutcome, ensure_properties_file, update_properties_file},
};

/// Path configuration grouping all path-related fields.
#[derive(Default, Clone, Debug)]
pub struct PathConfig {
    /// Directory searched for the `.uvprojx` descriptor. The
    /// `.editorconfig` is written here as well.
    pub src_dir: PathBuf,
    /// Target `.vscode` directory.
    pub vscode_dir: PathBuf,
}

/// Result of a completed [`AppContext::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// No descriptor was found; nothing was written.
    NoDescriptor,
    /// The properties file was updated.
    Updated {
        /// Descriptor the settings were read from.
        descriptor: PathBuf,
        /// The `c_cpp_properties.json` that was written.
        properties: PathBuf,
        /// Name of the configuration entry.
        name: String,
        /// Whether the entry was created or updated.
        outcome: UpdateOutcome,
    },
}

/// The main application context holding all state.
#[derive(Default, Clone, Debug)]
pub struct AppContext {
    /// Source and output directories.
    pub paths: PathConfig,
    /// Compiler path and entry defaults.
    pub tool: ToolConfig,
    /// Configuration entry name; defaults to the descriptor file stem.
    pub config_name: Option<String>,
    /// Whether to write `.editorconfig` into the source directory.
    pub create_editorconfig: bool,
    /// Whether a missing properties file gets a `Default` entry.
    pub create_default: bool,
}

impl AppContext {
    /// Writes `.editorconfig` into the source directory.
    ///
    /// Failures are logged and otherwise ignored; the style file is not
    /// part of the conversion.
    pub fn emit_editorconfig(&self) -> Option<EmitOutcome> {
        write_editorconfig(&self.paths.src_dir)
            .inspect_err(|e| error!("Failed to generate .editorconfig: {e:#}"))
            .ok()
    }

    /// Finds the first descriptor below the source directory.
    ///
    /// A search failure is reported as a warning and treated as not found.
    pub fn locate_descriptor(&self) -> Option<PathBuf> {
        let src_dir = &self.paths.src_dir;
        match find_first_descriptor(src_dir) {
            Ok(Some(path)) => Some(path),
            Ok(None) => {
                warn!("No .uvprojx file found in '{}'", src_dir.display());
                None
            }
            Err(e) => {
                warn!("{e}");
                None
            }
        }
    }

    /// Returns the configuration entry name for `descriptor`.
    pub fn config_name_for(&self, descriptor: &Path) -> String {
        self.config_name.clone().unwrap_or_else(|| {
            descriptor
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default()
        })
    }

    /// Runs the whole conversion.
    ///
    /// 1. Writes `.editorconfig` if requested.
    /// 2. Locates the descriptor; stops with [`RunOutcome::NoDescriptor`]
    ///    if there is none.
    /// 3. Extracts include paths and defines.
    /// 4. Ensures `c_cpp_properties.json` exists and updates the entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the descriptor cannot be parsed or the properties
    /// file cannot be created or updated.
    pub fn run(&self) -> anyhow::Result<RunOutcome> {
        if self.create_editorconfig {
            self.emit_editorconfig();
        }

        let Some(descriptor) = self.locate_descriptor() else {
            return Ok(RunOutcome::NoDescriptor);
        };
        let name = self.config_name_for(&descriptor);
        info!("Parsing {}", descriptor.display());
        info!("Target configuration: {name}");

        let settings = parse_file(&descriptor)
            .with_context(|| format!("Failed to parse Keil project {}", descriptor.display()))?;

        let vscode_dir = &self.paths.vscode_dir;
        let properties = ensure_properties_file(vscode_dir, self.create_default, &self.tool)
            .with_context(|| format!("Failed to prepare {}", vscode_dir.display()))?;
        let outcome = update_properties_file(&settings, &properties, &name, &self.tool)
            .with_context(|| format!("Failed to update {}", properties.display()))?;

        Ok(RunOutcome::Updated {
            descriptor,
            properties,
            name,
            outcome,
        })
    }
}
