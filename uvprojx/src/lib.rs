//! # uvprojx
//!
//! A small library for reading compiler settings out of Keil µVision
//! project descriptors (`*.uvprojx`).
//!
//! ## Features
//!
//! - Recursive lookup of the first descriptor below a directory
//! - Extraction of the C compiler include paths and macro definitions
//! - Include path normalization (forward slashes, leading `../` stripped)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use uvprojx::{find_first_descriptor, parse_file};
//!
//! if let Some(path) = find_first_descriptor("firmware").unwrap() {
//!     let settings = parse_file(&path).unwrap();
//!     println!("{:?}", settings.include_paths);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types and result definitions
//! - [`locate`] - Descriptor lookup
//! - [`parse`] - Build-settings extraction
//! - [`path`] - Include path normalization

#[macro_use]
extern crate log;

/// Error types and result definitions for descriptor operations.
pub mod error;

/// Descriptor lookup in a directory tree.
pub mod locate;

/// Build-settings extraction from descriptor XML.
pub mod parse;

/// Include path normalization.
pub mod path;

pub use error::{DescriptorError, Result};
pub use locate::{find_descriptors, find_first_descriptor};
pub use parse::{ExtractedSettings, parse_file, parse_str};
pub use path::normalize_include_path;

/// File extension of Keil µVision 5 project descriptors.
pub const DESCRIPTOR_EXTENSION: &str = ".uvprojx";
