//! JSON I/O handling for CLI
//!
//! - Input: one JSON document from a file or stdin
//! - Output: one JSON object per command on stdout
//! - UTF-8 only

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use serde_json::Value;

use super::errors::{CliError, CliResult};

/// Read the document to validate from a file, or stdin when no path is given
pub fn read_input(path: Option<&Path>) -> CliResult<Value> {
    let text = match path {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut text = String::new();
            io::stdin().lock().read_to_string(&mut text)?;
            text
        }
    };

    if text.trim().is_empty() {
        return Err(CliError::EmptyInput);
    }

    Ok(serde_json::from_str(&text)?)
}

/// Write a success response
pub fn write_response<W: Write>(out: &mut W, data: Value) -> CliResult<()> {
    let response = serde_json::json!({
        "status": "ok",
        "data": data
    });
    write_json(out, &response)
}

/// Write an error response
pub fn write_error<W: Write>(
    out: &mut W,
    code: &str,
    key_path: Option<&str>,
    message: &str,
) -> CliResult<()> {
    let response = serde_json::json!({
        "status": "error",
        "code": code,
        "key_path": key_path,
        "message": message
    });
    write_json(out, &response)
}

fn write_json<W: Write>(out: &mut W, value: &Value) -> CliResult<()> {
    serde_json::to_writer(&mut *out, value)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_input_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"a": 1}}"#).unwrap();
        assert_eq!(read_input(Some(file.path())).unwrap(), json!({ "a": 1 }));
    }

    #[test]
    fn test_read_input_rejects_empty_file() {
        let file = NamedTempFile::new().unwrap();
        let err = read_input(Some(file.path())).unwrap_err();
        assert!(matches!(err, CliError::EmptyInput));
    }

    #[test]
    fn test_error_response_shape() {
        let mut out = Vec::new();
        write_error(&mut out, "SHAPE_NON_NULLABLE", Some("a.b"), "missing").unwrap();
        let parsed: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed["status"], "error");
        assert_eq!(parsed["key_path"], "a.b");
    }
}
