//! VS Code `c_cpp_properties.json` handling.
//!
//! The document is kept as an open JSON object so that keys this tool does
//! not know about (`browse`, `compileCommands`, custom entries, ...) are
//! written back exactly as they were read. Only `configurations` and the
//! fields of the targeted entry are touched.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Serialize;
use serde_json::{Map, Value, json, ser::PrettyFormatter};
use thiserror::Error;
use uvprojx::ExtractedSettings;

use crate::config::ToolConfig;

/// File name of the IntelliSense configuration.
pub const PROPERTIES_FILE_NAME: &str = "c_cpp_properties.json";

/// Schema version written into new documents.
pub const PROPERTIES_VERSION: u64 = 4;

/// Name of the entry created by [`ensure_properties_file`].
pub const DEFAULT_ENTRY_NAME: &str = "Default";

const CONFIGURATIONS: &str = "configurations";
const NAME: &str = "name";
const COMPILER_PATH: &str = "compilerPath";
const INCLUDE_PATH: &str = "includePath";
const DEFINES: &str = "defines";

/// Failures while reading or updating the properties file.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The properties file does not exist.
    #[error("'{}' does not exist, create a base configuration first", .0.display())]
    Missing(PathBuf),

    /// Reading or writing the file failed.
    #[error("I/O error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid JSON.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The document has no `configurations` array.
    #[error("missing 'configurations' list, can not update")]
    MissingConfigurations,
}

/// What [`CppProperties::apply`] did to the target entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// An existing entry was updated.
    Updated,
    /// No entry had the target name; a new one was appended.
    Created,
}

/// Builds a configuration entry with the configured metadata and empty lists.
pub fn default_entry(name: &str, tool: &ToolConfig) -> Map<String, Value> {
    let mut entry = Map::new();
    entry.insert(NAME.into(), name.into());
    entry.insert("intelliSenseMode".into(), tool.intelli_sense_mode.clone().into());
    entry.insert(COMPILER_PATH.into(), tool.compiler_path.clone().into());
    entry.insert("cStandard".into(), tool.c_standard.clone().into());
    entry.insert("cppStandard".into(), tool.cpp_standard.clone().into());
    entry.insert(INCLUDE_PATH.into(), Value::Array(Vec::new()));
    entry.insert(DEFINES.into(), Value::Array(Vec::new()));
    entry
}

fn write_settings(
    entry: &mut Map<String, Value>,
    settings: &ExtractedSettings,
    tool: &ToolConfig,
) {
    entry.insert(COMPILER_PATH.into(), tool.compiler_path.clone().into());
    entry.insert(INCLUDE_PATH.into(), string_array(&settings.include_paths));
    entry.insert(DEFINES.into(), string_array(&settings.defines));
}

/// An in-memory `c_cpp_properties.json` document.
#[derive(Debug, Clone, PartialEq)]
pub struct CppProperties {
    root: Map<String, Value>,
}

impl CppProperties {
    /// Creates the minimal document, with one `Default` entry if
    /// `with_default` is set, otherwise with no entries.
    pub fn skeleton(with_default: bool, tool: &ToolConfig) -> Self {
        let configurations = if with_default {
            vec![Value::Object(default_entry(DEFAULT_ENTRY_NAME, tool))]
        } else {
            Vec::new()
        };

        let mut root = Map::new();
        root.insert(CONFIGURATIONS.into(), Value::Array(configurations));
        root.insert("version".into(), PROPERTIES_VERSION.into());
        Self { root }
    }

    /// Parses a document.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Json`] if `s` is not a JSON object.
    pub fn parse(s: &str) -> Result<Self, StoreError> {
        let root = serde_json::from_str(s)?;
        Ok(Self { root })
    }

    /// Returns the `configurations` array, if present.
    pub fn configurations(&self) -> Option<&Vec<Value>> {
        self.root.get(CONFIGURATIONS).and_then(Value::as_array)
    }

    fn configurations_mut(&mut self) -> Result<&mut Vec<Value>, StoreError> {
        self.root
            .get_mut(CONFIGURATIONS)
            .and_then(Value::as_array_mut)
            .ok_or(StoreError::MissingConfigurations)
    }

    /// Returns the first entry named `name`.
    pub fn entry(&self, name: &str) -> Option<&Map<String, Value>> {
        self.configurations()?
            .iter()
            .filter_map(Value::as_object)
            .find(|e| entry_name(e) == Some(name))
    }

    /// Writes `settings` into the first entry named `name`, appending a new
    /// entry if none exists.
    ///
    /// `compilerPath` is always overwritten with `tool.compiler_path`;
    /// `includePath` and `defines` are replaced, never merged. All other
    /// fields and entries are left alone.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MissingConfigurations`] if the document has no
    /// `configurations` array.
    pub fn apply(
        &mut self,
        settings: &ExtractedSettings,
        name: &str,
        tool: &ToolConfig,
    ) -> Result<UpdateOutcome, StoreError> {
        let configurations = self.configurations_mut()?;

        if let Some(entry) = configurations
            .iter_mut()
            .filter_map(Value::as_object_mut)
            .find(|e| entry_name(e) == Some(name))
        {
            write_settings(entry, settings, tool);
            return Ok(UpdateOutcome::Updated);
        }

        warn!("Configuration '{name}' not found, creating it");
        let mut entry = default_entry(name, tool);
        write_settings(&mut entry, settings, tool);
        configurations.push(Value::Object(entry));
        Ok(UpdateOutcome::Created)
    }

    /// Renders the document with a four-space indent and a final newline.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Json`] if serialization fails.
    pub fn to_pretty_bytes(&self) -> Result<Vec<u8>, StoreError> {
        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.root.serialize(&mut ser)?;
        buf.push(b'\n');
        Ok(buf)
    }

    /// Reads a document from disk.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Missing`] if the file does not exist, otherwise
    /// I/O and JSON errors.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        if !path.exists() {
            return Err(StoreError::Missing(path.to_path_buf()));
        }
        let content = fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Rewrites the whole document on disk.
    ///
    /// # Errors
    ///
    /// Returns I/O and serialization errors.
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        let content = self.to_pretty_bytes()?;
        fs::write(path, content).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn entry_name(entry: &Map<String, Value>) -> Option<&str> {
    entry.get(NAME).and_then(Value::as_str)
}

fn string_array(items: &[String]) -> Value {
    Value::Array(items.iter().cloned().map(Value::String).collect())
}

/// Makes sure `dir/c_cpp_properties.json` exists.
///
/// The directory is created if needed. An existing file is never touched;
/// otherwise a skeleton document is written (see [`CppProperties::skeleton`]).
///
/// # Returns
///
/// The path of the properties file.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be created.
pub fn ensure_properties_file(
    dir: &Path,
    create_default: bool,
    tool: &ToolConfig,
) -> Result<PathBuf, StoreError> {
    fs::create_dir_all(dir).map_err(|source| StoreError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let path = dir.join(PROPERTIES_FILE_NAME);
    if !path.exists() {
        info!("Creating {}", path.display());
        CppProperties::skeleton(create_default, tool).save(&path)?;
    }
    Ok(path)
}

/// Loads `path`, applies `settings` to the entry `name` and writes the
/// document back.
///
/// # Errors
///
/// Returns [`StoreError`] when the file is missing, unreadable, not JSON or
/// has no `configurations` array. Nothing is written in those cases.
pub fn update_properties_file(
    settings: &ExtractedSettings,
    path: &Path,
    name: &str,
    tool: &ToolConfig,
) -> Result<UpdateOutcome, StoreError> {
    let mut doc = CppProperties::load(path)?;
    let outcome = doc.apply(settings, name, tool)?;
    doc.save(path)?;
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tool() -> ToolConfig {
        ToolConfig {
            compiler_path: "/opt/gcc/bin/arm-none-eabi-gcc".to_string(),
            ..Default::default()
        }
    }

    fn settings() -> ExtractedSettings {
        ExtractedSettings {
            include_paths: vec!["Core/Inc".into(), "Drivers/CMSIS/Include".into()],
            defines: vec!["USE_HAL_DRIVER".into(), "STM32F103xB".into()],
        }
    }

    const EXISTING: &str = r#"{
    "configurations": [
        {
            "name": "Other",
            "intelliSenseMode": "gcc-x64",
            "compilerPath": "/usr/bin/gcc",
            "includePath": ["${workspaceFolder}/**"],
            "defines": []
        },
        {
            "name": "Foo",
            "intelliSenseMode": "gcc-arm",
            "compilerPath": "C:/old/gcc.exe",
            "cStandard": "c11",
            "cppStandard": "c++17",
            "includePath": ["old/inc", "older/inc"],
            "defines": ["OLD"],
            "browse": {"limitSymbolsToIncludedHeaders": true}
        }
    ],
    "version": 4,
    "enableConfigurationSquiggles": true
}"#;

    #[test]
    fn test_ensure_with_default() {
        let dir = tempfile::tempdir().unwrap();
        let vscode = dir.path().join("nested/.vscode");

        let path = ensure_properties_file(&vscode, true, &tool()).unwrap();
        assert_eq!(path, vscode.join(PROPERTIES_FILE_NAME));

        let doc = CppProperties::load(&path).unwrap();
        let configurations = doc.configurations().unwrap();
        assert_eq!(configurations.len(), 1);

        let entry = doc.entry(DEFAULT_ENTRY_NAME).unwrap();
        assert_eq!(entry["intelliSenseMode"], "linux-gcc-arm");
        assert_eq!(entry["compilerPath"], "/opt/gcc/bin/arm-none-eabi-gcc");
        assert_eq!(entry["cStandard"], "c99");
        assert_eq!(entry["cppStandard"], "c++11");
        assert_eq!(entry["includePath"], json!([]));
        assert_eq!(entry["defines"], json!([]));
        assert_eq!(doc.root["version"], 4);
    }

    #[test]
    fn test_ensure_without_default() {
        let dir = tempfile::tempdir().unwrap();

        let path = ensure_properties_file(dir.path(), false, &tool()).unwrap();
        let doc = CppProperties::load(&path).unwrap();
        assert!(doc.configurations().unwrap().is_empty());
        assert_eq!(doc.root["version"], 4);
    }

    #[test]
    fn test_ensure_keeps_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(PROPERTIES_FILE_NAME);
        fs::write(&path, "not json at all").unwrap();

        let ensured = ensure_properties_file(dir.path(), true, &tool()).unwrap();
        assert_eq!(ensured, path);
        assert_eq!(fs::read_to_string(&path).unwrap(), "not json at all");
    }

    #[test]
    fn test_create_missing_entry() {
        let mut doc = CppProperties::parse(EXISTING).unwrap();
        let before = doc.configurations().unwrap().clone();

        let outcome = doc.apply(&settings(), "Bar", &tool()).unwrap();
        assert_eq!(outcome, UpdateOutcome::Created);

        let configurations = doc.configurations().unwrap();
        assert_eq!(configurations.len(), before.len() + 1);
        assert_eq!(&configurations[..before.len()], &before[..]);

        let entry = doc.entry("Bar").unwrap();
        assert_eq!(entry["intelliSenseMode"], "linux-gcc-arm");
        assert_eq!(entry["cStandard"], "c99");
        assert_eq!(entry["cppStandard"], "c++11");
        assert_eq!(entry["compilerPath"], "/opt/gcc/bin/arm-none-eabi-gcc");
        assert_eq!(entry["includePath"], json!(["Core/Inc", "Drivers/CMSIS/Include"]));
        assert_eq!(entry["defines"], json!(["USE_HAL_DRIVER", "STM32F103xB"]));
    }

    #[test]
    fn test_replace_existing_entry() {
        let mut doc = CppProperties::parse(EXISTING).unwrap();
        let other = doc.entry("Other").unwrap().clone();

        let outcome = doc.apply(&settings(), "Foo", &tool()).unwrap();
        assert_eq!(outcome, UpdateOutcome::Updated);
        assert_eq!(doc.configurations().unwrap().len(), 2);

        let entry = doc.entry("Foo").unwrap();
        // 列表整体替换，不合并
        assert_eq!(entry["includePath"], json!(["Core/Inc", "Drivers/CMSIS/Include"]));
        assert_eq!(entry["defines"], json!(["USE_HAL_DRIVER", "STM32F103xB"]));
        assert_eq!(entry["compilerPath"], "/opt/gcc/bin/arm-none-eabi-gcc");
        assert_eq!(entry["intelliSenseMode"], "gcc-arm");
        assert_eq!(entry["cStandard"], "c11");
        assert_eq!(entry["cppStandard"], "c++17");
        assert_eq!(entry["browse"], json!({"limitSymbolsToIncludedHeaders": true}));

        assert_eq!(doc.entry("Other").unwrap(), &other);
        assert_eq!(doc.root["enableConfigurationSquiggles"], true);
    }

    #[test]
    fn test_first_duplicate_wins() {
        let mut doc = CppProperties::parse(
            r#"{"configurations": [{"name": "A", "defines": ["1"]}, {"name": "A", "defines": ["2"]}], "version": 4}"#,
        )
        .unwrap();

        doc.apply(&settings(), "A", &tool()).unwrap();
        let configurations = doc.configurations().unwrap();
        assert_eq!(configurations.len(), 2);
        assert_eq!(configurations[0]["defines"], json!(["USE_HAL_DRIVER", "STM32F103xB"]));
        assert_eq!(configurations[1]["defines"], json!(["2"]));
    }

    #[test]
    fn test_non_object_entries_skipped() {
        let mut doc = CppProperties::parse(
            r#"{"configurations": ["Foo", {"name": "Foo", "defines": ["OLD"]}], "version": 4}"#,
        )
        .unwrap();

        let outcome = doc.apply(&settings(), "Foo", &tool()).unwrap();
        assert_eq!(outcome, UpdateOutcome::Updated);
        let configurations = doc.configurations().unwrap();
        assert_eq!(configurations.len(), 2);
        assert_eq!(configurations[0], "Foo");
        assert_eq!(configurations[1]["defines"], json!(["USE_HAL_DRIVER", "STM32F103xB"]));
        assert_eq!(configurations[1]["compilerPath"], "/opt/gcc/bin/arm-none-eabi-gcc");

        let mut doc =
            CppProperties::parse(r#"{"configurations": [42, null], "version": 4}"#).unwrap();
        assert_eq!(
            doc.apply(&settings(), "Foo", &tool()).unwrap(),
            UpdateOutcome::Created
        );
        let configurations = doc.configurations().unwrap();
        assert_eq!(configurations.len(), 3);
        assert_eq!(configurations[0], 42);
        assert!(configurations[1].is_null());
        assert_eq!(configurations[2]["includePath"], json!(["Core/Inc", "Drivers/CMSIS/Include"]));
    }

    #[test]
    fn test_unknown_keys_keep_order() {
        let doc = CppProperties::parse(EXISTING).unwrap();
        let keys: Vec<_> = doc.root.keys().cloned().collect();
        assert_eq!(keys, vec!["configurations", "version", "enableConfigurationSquiggles"]);

        let rendered = String::from_utf8(doc.to_pretty_bytes().unwrap()).unwrap();
        let reparsed = CppProperties::parse(&rendered).unwrap();
        assert_eq!(reparsed, doc);
    }

    #[test]
    fn test_update_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(PROPERTIES_FILE_NAME);
        fs::write(&path, EXISTING).unwrap();

        update_properties_file(&settings(), &path, "Foo", &tool()).unwrap();
        let first = fs::read(&path).unwrap();
        update_properties_file(&settings(), &path, "Foo", &tool()).unwrap();
        let second = fs::read(&path).unwrap();
        assert_eq!(first, second);

        // 新建配置后再次更新，也不应重复追加
        assert_eq!(
            update_properties_file(&settings(), &path, "Bar", &tool()).unwrap(),
            UpdateOutcome::Created
        );
        let third = fs::read(&path).unwrap();
        assert_eq!(
            update_properties_file(&settings(), &path, "Bar", &tool()).unwrap(),
            UpdateOutcome::Updated
        );
        assert_eq!(third, fs::read(&path).unwrap());
    }

    #[test]
    fn test_pretty_format() {
        let doc = CppProperties::skeleton(false, &tool());
        assert_eq!(
            String::from_utf8(doc.to_pretty_bytes().unwrap()).unwrap(),
            "{\n    \"configurations\": [],\n    \"version\": 4\n}\n"
        );

        let mut doc = CppProperties::skeleton(false, &tool());
        let utf8 = ExtractedSettings {
            include_paths: vec!["驱动/Inc".into()],
            defines: vec![],
        };
        doc.apply(&utf8, "工程", &tool()).unwrap();
        let rendered = String::from_utf8(doc.to_pretty_bytes().unwrap()).unwrap();
        assert!(rendered.contains("\"驱动/Inc\""));
        assert!(rendered.contains("\"name\": \"工程\""));
    }

    #[test]
    fn test_update_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(PROPERTIES_FILE_NAME);

        let err = update_properties_file(&settings(), &path, "Foo", &tool()).unwrap_err();
        assert!(matches!(err, StoreError::Missing(_)));

        fs::write(&path, "{ broken").unwrap();
        let err = update_properties_file(&settings(), &path, "Foo", &tool()).unwrap_err();
        assert!(matches!(err, StoreError::Json(_)));

        fs::write(&path, r#"{"configurations": {}, "version": 4}"#).unwrap();
        let err = update_properties_file(&settings(), &path, "Foo", &tool()).unwrap_err();
        assert!(matches!(err, StoreError::MissingConfigurations));
        // 失败时不改写文件
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            r#"{"configurations": {}, "version": 4}"#
        );

        fs::write(&path, "[]").unwrap();
        let err = update_properties_file(&settings(), &path, "Foo", &tool()).unwrap_err();
        assert!(matches!(err, StoreError::Json(_)));
    }
}
