//! CLI command implementations

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use serde_json::Value;
use tracing::info;

use crate::schema::{
    validate, ElementKind, FieldKind, Schema, SchemaLoader, ValidateOptions,
};

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::{read_input, write_error, write_response};

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    let mut stdout = io::stdout().lock();
    match cmd {
        Command::Check {
            schema,
            input,
            config,
            strict,
            root_key,
        } => {
            let options = load_options(config.as_deref(), strict, root_key)?;
            let value = read_input(input.as_deref())?;
            check(&schema, value, &options, &mut stdout)
        }
        Command::Inspect { schema } => inspect(&schema, &mut stdout),
    }
}

/// Builds validation options from an optional options file plus flags.
///
/// `--strict` can only turn strict mode on; `--root-key` replaces any
/// root key from the file.
pub fn load_options(
    config_path: Option<&Path>,
    strict: bool,
    root_key: Option<String>,
) -> CliResult<ValidateOptions> {
    let mut options = match config_path {
        Some(path) => {
            let text = fs::read_to_string(path).map_err(|e| {
                CliError::Config(format!("failed to read {}: {}", path.display(), e))
            })?;
            serde_json::from_str(&text).map_err(|e| {
                CliError::Config(format!("invalid options in {}: {}", path.display(), e))
            })?
        }
        None => ValidateOptions::default(),
    };

    if strict {
        options.strict = true;
    }
    if root_key.is_some() {
        options.root_key = root_key;
    }

    Ok(options)
}

/// Validate a document against a schema definition file.
///
/// Writes an `ok` response with the validated document, or an `error`
/// response naming the failing key path and returns `Rejected`.
pub fn check<W: Write>(
    schema_path: &Path,
    value: Value,
    options: &ValidateOptions,
    out: &mut W,
) -> CliResult<()> {
    let schema = SchemaLoader::new().load_file(schema_path)?;

    match validate(&schema, value, options) {
        Ok(value) => {
            info!(schema = %schema_path.display(), "document accepted");
            write_response(out, value)
        }
        Err(err) => {
            write_error(out, err.code(), err.key_path(), &err.to_string())?;
            Err(err.into())
        }
    }
}

/// Print one line per declared field: path, kind, and optionality.
pub fn inspect<W: Write>(schema_path: &Path, out: &mut W) -> CliResult<()> {
    let schema = SchemaLoader::new().load_file(schema_path)?;

    let mut lines = Vec::new();
    describe_schema(&schema, "", &mut lines);
    for line in lines {
        writeln!(out, "{}", line)?;
    }
    out.flush()?;
    Ok(())
}

fn describe_schema(schema: &Schema, prefix: &str, lines: &mut Vec<String>) {
    for (name, spec) in schema.iter() {
        let path = if prefix.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", prefix, name)
        };
        let presence = if spec.is_optional() { "optional" } else { "required" };
        lines.push(format!("{}\t{}\t{}", path, spec.kind().type_name(), presence));

        match spec.kind() {
            FieldKind::Object(nested) => describe_schema(nested, &path, lines),
            FieldKind::Array(element) => {
                let elem_path = format!("{}[]", path);
                lines.push(format!("{}\t{}\trequired", elem_path, element.type_name()));
                if let ElementKind::Object(nested) = element {
                    describe_schema(nested, &elem_path, lines);
                }
            }
            FieldKind::Primitive(_) | FieldKind::Custom(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::NamedTempFile;

    fn temp_json(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    const PROFILE_SCHEMA: &str = r#"{"fields": {
        "name": {"type": "string"},
        "address": {"type": "object", "fields": {"city": {"type": "string"}}},
        "tags": {"type": "array", "element": {"type": "string"}, "optional": true}
    }}"#;

    #[test]
    fn test_check_accepts_valid_document() {
        let schema = temp_json(PROFILE_SCHEMA);
        let mut out = Vec::new();

        check(
            schema.path(),
            json!({ "name": "A", "address": { "city": "X" } }),
            &ValidateOptions::default(),
            &mut out,
        )
        .unwrap();

        let parsed: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed["status"], "ok");
        assert_eq!(parsed["data"]["address"]["city"], "X");
    }

    #[test]
    fn test_check_reports_key_path() {
        let schema = temp_json(PROFILE_SCHEMA);
        let mut out = Vec::new();

        let err = check(
            schema.path(),
            json!({ "name": "A", "address": { "city": 3 } }),
            &ValidateOptions::new().root_key("body"),
            &mut out,
        )
        .unwrap_err();
        assert_eq!(err.code(), "SHAPE_CLI_REJECTED");

        let parsed: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed["status"], "error");
        assert_eq!(parsed["code"], "SHAPE_TYPE_MISMATCH");
        assert_eq!(parsed["key_path"], "body.address.city");
    }

    #[test]
    fn test_check_with_bad_schema_file() {
        let schema = temp_json(r#"{"fields": {"a": {"type": "object"}}}"#);
        let mut out = Vec::new();
        let err = check(schema.path(), json!({}), &ValidateOptions::default(), &mut out)
            .unwrap_err();
        assert_eq!(err.code(), "SHAPE_CLI_SCHEMA_ERROR");
        assert!(out.is_empty());
    }

    #[test]
    fn test_inspect_lists_paths() {
        let schema = temp_json(PROFILE_SCHEMA);
        let mut out = Vec::new();
        inspect(schema.path(), &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "name\tstring\trequired",
                "address\tobject\trequired",
                "address.city\tstring\trequired",
                "tags\tarray\toptional",
                "tags[]\tstring\trequired",
            ]
        );
    }

    #[test]
    fn test_options_file_and_flag_overrides() {
        let config = temp_json(r#"{"strict": false, "root_key": "file"}"#);

        let options = load_options(Some(config.path()), false, None).unwrap();
        assert!(!options.strict);
        assert_eq!(options.root_key.as_deref(), Some("file"));

        let options = load_options(Some(config.path()), true, Some("flag".into())).unwrap();
        assert!(options.strict);
        assert_eq!(options.root_key.as_deref(), Some("flag"));
    }

    #[test]
    fn test_invalid_options_file() {
        let config = temp_json(r#"{"strict": "yes"}"#);
        let err = load_options(Some(config.path()), false, None).unwrap_err();
        assert_eq!(err.code(), "SHAPE_CLI_CONFIG_ERROR");
    }
}
