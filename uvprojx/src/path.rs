//! Include path normalization.
//!
//! Keil stores include paths relative to the directory holding the
//! `.uvprojx`, which usually sits one or more levels below the repository
//! root. Stripping the leading `../` segments rebases them onto the root.
//! This is an approximation: the result is never checked against the
//! file system.

const PARENT_SEGMENT: &str = "../";

/// Normalizes one include path.
///
/// Every `\` becomes `/`, then leading `../` segments are stripped until
/// none remain.
///
/// # Example
///
/// ```rust
/// use uvprojx::normalize_include_path;
///
/// assert_eq!(normalize_include_path(r"..\..\Drivers\Inc"), "Drivers/Inc");
/// ```
pub fn normalize_include_path(raw: &str) -> String {
    let path = raw.replace('\\', "/");
    let mut rest = path.as_str();
    while let Some(stripped) = rest.strip_prefix(PARENT_SEGMENT) {
        rest = stripped;
    }
    rest.to_string()
}
