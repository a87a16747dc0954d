//! # keil2vscode
//!
//! Keeps VS Code IntelliSense in sync with a Keil µVision project.
//!
//! `keil2vscode` reads the C compiler include paths and macro definitions
//! from the first `.uvprojx` found below a directory and writes them into
//! `.vscode/c_cpp_properties.json`, creating the file or the configuration
//! entry when needed.
//!
//! ## Modules
//!
//! - [`config`] - Compiler path and entry defaults
//! - [`ctx`] - Application context and the conversion pipeline
//! - [`editorconfig`] - Optional `.editorconfig` generation
//! - [`properties`] - `c_cpp_properties.json` read-modify-write
//!
//! ## Example
//!
//! ```rust,no_run
//! use keil2vscode::ctx::{AppContext, PathConfig};
//!
//! let ctx = AppContext {
//!     paths: PathConfig {
//!         src_dir: "firmware".into(),
//!         vscode_dir: ".vscode".into(),
//!     },
//!     create_default: true,
//!     ..Default::default()
//! };
//! ctx.run().unwrap();
//! ```

/// Compiler path and entry defaults.
pub mod config;

/// Application context and the conversion pipeline.
pub mod ctx;

/// Optional `.editorconfig` generation.
pub mod editorconfig;

/// `c_cpp_properties.json` handling.
pub mod properties;

#[macro_use]
extern crate log;

pub use uvprojx;
