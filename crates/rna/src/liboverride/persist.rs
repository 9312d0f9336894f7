// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! JSON persistence of override records.

use super::model::LibraryOverride;
use crate::error::PersistError;
use std::fs;
use std::path::Path;

pub fn to_json(ov: &LibraryOverride) -> Result<String, PersistError> {
    serde_json::to_string_pretty(ov).map_err(|e| PersistError::Format(e.to_string()))
}

pub fn from_json(text: &str) -> Result<LibraryOverride, PersistError> {
    serde_json::from_str(text).map_err(|e| PersistError::Format(e.to_string()))
}

/// Write `ov` to `path` as pretty-printed JSON.
pub fn save(ov: &LibraryOverride, path: impl AsRef<Path>) -> Result<(), PersistError> {
    let text = to_json(ov)?;
    fs::write(path.as_ref(), text).map_err(|e| PersistError::IoError(e.to_string()))?;
    log::debug!(
        "[liboverride::persist] saved {} properties to {}",
        ov.len(),
        path.as_ref().display()
    );
    Ok(())
}

pub fn load(path: impl AsRef<Path>) -> Result<LibraryOverride, PersistError> {
    let text =
        fs::read_to_string(path.as_ref()).map_err(|e| PersistError::IoError(e.to_string()))?;
    from_json(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::liboverride::{OverrideOpKind, OverrideOperation};
    use crate::value::Value;

    #[test]
    fn test_json_keeps_operations() {
        let mut ov = LibraryOverride::with_reference("Main");
        let (prop, _) = ov.ensure_property("location");
        let mut op = OverrideOperation::element(OverrideOpKind::Add, 2);
        op.value = Some(Value::Float(0.25));
        prop.operations.push(op);

        let text = to_json(&ov).expect("serialize");
        assert!(text.contains("\"Add\""));
        assert_eq!(from_json(&text).expect("parse"), ov);
    }

    #[test]
    fn test_missing_fields_default() {
        let ov = from_json(r#"{ "properties": [ { "path": "frame" } ] }"#).expect("parse");
        assert_eq!(ov.reference, None);
        assert!(ov.property("frame").is_some_and(|p| p.operations.is_empty()));
        assert!(matches!(from_json("[1, 2"), Err(PersistError::Format(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = load(dir.path().join("absent.json")).expect_err("no file");
        assert!(matches!(err, PersistError::IoError(_)));
    }
}
