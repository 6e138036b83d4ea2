//! Debugging CLI: coerce script parameters by hand or in bulk.
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use once_cell::sync::Lazy;
use rayon::prelude::*;
use regex::Regex;
use serde::Deserialize;

use crate::ir::{parse_param_type, FieldDecl};
use crate::record::SchemaRegistry;
use crate::value::RawParam;
use crate::variables::GameVariables;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// coerce raw map-script parameters into typed values
#[derive(Parser, Debug)]
#[command(name = "tilekit")]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// coerce parameters against positional descriptors
    Coerce(CoerceOut),
    /// coerce parameters into a record declared in a schema file
    Record(RecordOut),
    /// coerce many recorded calls (JSON or NDJSON documents)
    Batch(BatchOut),
    /// print the registered records and each field's type set
    Schema(SchemaOut),
    /// resolve a number literal or numeric game variable
    Number(NumberOut),
}

#[derive(Args, Debug, Clone)]
struct SchemaSettings {
    /// One or more schema files. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    schema: Vec<String>,
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// treat input as newline-delimited JSON (NDJSON)
    #[arg(long, default_value_t = false)]
    ndjson: bool,

    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(clap::Parser, Debug)]
struct CoerceOut {
    /// inline descriptor `NAME=TYPES`; `int` is a bare type, `int|str` or `(int)` a set
    #[arg(long = "field", short = 'f', value_parser = parse_field_arg)]
    fields: Vec<FieldDecl>,

    /// JSON file with a descriptor list (used instead of --field)
    #[arg(long, conflicts_with = "fields")]
    descriptors: Option<PathBuf>,

    /// raw parameter, in call order
    #[arg(long = "param", short = 'p')]
    params: Vec<String>,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct RecordOut {
    #[command(flatten)]
    schema_settings: SchemaSettings,

    /// record type to build
    #[arg(long, short)]
    record: String,

    /// raw parameter, in call order
    #[arg(long = "param", short = 'p')]
    params: Vec<String>,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct BatchOut {
    #[command(flatten)]
    schema_settings: SchemaSettings,

    #[command(flatten)]
    input_settings: InputSettings,

    /// output .ndjson file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct SchemaOut {
    #[command(flatten)]
    schema_settings: SchemaSettings,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct NumberOut {
    /// digits, or the name of a game variable
    value: String,

    /// game variable `NAME=VALUE`
    #[arg(long = "var", value_parser = parse_var_arg)]
    vars: Vec<(String, String)>,
}

/// One recorded action call.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchCall {
    pub record: String,
    #[serde(default)]
    pub params: Vec<RawParam>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BatchDoc {
    Many(Vec<BatchCall>),
    One(BatchCall),
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl SchemaSettings {
    fn load_registry(&self) -> Result<SchemaRegistry> {
        let mut registry = SchemaRegistry::new();
        for source_path in resolve_file_path_patterns(&self.schema)? {
            let source = read_source(&source_path)?;
            let count = registry
                .load_json(&source)
                .with_context(|| format!("invalid schema file ({})", source_path.display()))?;
            tracing::debug!(path = %source_path.display(), count, "schema file loaded");
        }
        Ok(registry)
    }
}

impl InputSettings {
    /// Every call of every input document, labelled `path#index`.
    fn load_calls(&self) -> Result<Vec<(String, BatchCall)>> {
        let mut out = Vec::new();
        for source_path in resolve_file_path_patterns(&self.input)? {
            let first_ix = out.len();
            let source = read_source(&source_path)?;
            let source_path_str = source_path.to_string_lossy().to_string();
            let documents: Vec<&str> = if self.ndjson {
                source.lines().filter(|line| !line.trim().is_empty()).collect()
            } else {
                vec![source.as_str()]
            };
            for (doc_ix, document) in documents.into_iter().enumerate() {
                let doc = crate::path_de::from_str_with_path::<BatchDoc>(document).with_context(|| {
                    format!("failed to parse call document {doc_ix} ({source_path_str})")
                })?;
                let calls = match doc {
                    BatchDoc::Many(calls) => calls,
                    BatchDoc::One(call) => vec![call],
                };
                for call in calls {
                    let label = format!("{source_path_str}#{}", out.len() - first_ix);
                    out.push((label, call));
                }
            }
        }
        Ok(out)
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }
    pub fn run(&self) -> Result<ExitCode> {
        match &self.cmd {
            Command::Coerce(target) => {
                let descriptors = match target.descriptors.as_ref() {
                    Some(path) => {
                        let source = read_source(path)?;
                        crate::path_de::from_str_with_path::<Vec<FieldDecl>>(&source)
                            .with_context(|| format!("invalid descriptor file ({})", path.display()))?
                    }
                    None => target.fields.clone(),
                };
                let params = raw_params(&target.params);
                let values = crate::coerce::coerce(&params, &descriptors)?;
                write_output(target.out.as_deref(), &serde_json::to_string_pretty(&values)?)?;
                Ok(ExitCode::SUCCESS)
            }
            Command::Record(target) => {
                let registry = target.schema_settings.load_registry()?;
                let record = registry.coerce(&target.record, &raw_params(&target.params))?;
                write_output(target.out.as_deref(), &serde_json::to_string_pretty(&record)?)?;
                Ok(ExitCode::SUCCESS)
            }
            Command::Batch(target) => {
                let registry = target.schema_settings.load_registry()?;
                let calls = target.input_settings.load_calls()?;

                // calls are independent; collect keeps input order
                let results = calls
                    .par_iter()
                    .map(|(_, call)| registry.coerce(&call.record, &call.params))
                    .collect::<Vec<_>>();

                let mut lines = Vec::with_capacity(results.len());
                let mut failures = 0usize;
                for ((label, _), result) in calls.iter().zip(results) {
                    match result {
                        Ok(record) => lines.push(serde_json::to_string(&record)?),
                        Err(error) => {
                            failures += 1;
                            eprintln!("{} {label}: {error}", "✗".red());
                        }
                    }
                }
                let mut text = lines.join("\n");
                if !text.is_empty() { text.push('\n'); }
                write_output_raw(target.out.as_deref(), &text)?;

                if failures > 0 {
                    eprintln!("{}", format!("{failures} of {} calls failed", calls.len()).red().bold());
                    return Ok(ExitCode::FAILURE)
                }
                eprintln!("{}", format!("{} calls coerced", calls.len()).green());
                Ok(ExitCode::SUCCESS)
            }
            Command::Schema(target) => {
                let registry = target.schema_settings.load_registry()?;
                let view: serde_json::Map<String, serde_json::Value> = registry
                    .iter()
                    .map(|schema| -> Result<(String, serde_json::Value)> {
                        Ok((schema.name().to_string(), serde_json::to_value(schema.descriptors())?))
                    })
                    .collect::<Result<_>>()?;
                write_output(target.out.as_deref(), &serde_json::to_string_pretty(&view)?)?;
                Ok(ExitCode::SUCCESS)
            }
            Command::Number(target) => {
                let variables = target.vars.iter().cloned().collect::<GameVariables>();
                let n = crate::variables::number_or_variable(&variables, &target.value)?;
                println!("{n}");
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

static FIELD_ARG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([A-Za-z_][A-Za-z0-9_]*)\s*=\s*(\S.*?)\s*$").expect("valid field regex")
});

static VAR_ARG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z_][A-Za-z0-9_]*)=(.*)$").expect("valid var regex")
});

fn parse_field_arg(src: &str) -> Result<FieldDecl, String> {
    let caps = FIELD_ARG
        .captures(src)
        .ok_or_else(|| format!("expected NAME=TYPES, got `{src}`"))?;
    let ty = parse_param_type(&caps[2]).map_err(|e| e.to_string())?;
    Ok(FieldDecl::new(&caps[1], ty))
}

fn parse_var_arg(src: &str) -> Result<(String, String), String> {
    let caps = VAR_ARG
        .captures(src)
        .ok_or_else(|| format!("expected NAME=VALUE, got `{src}`"))?;
    Ok((caps[1].to_string(), caps[2].to_string()))
}

fn raw_params(params: &[String]) -> Vec<RawParam> {
    params.iter().map(|p| RawParam::text(p.as_str())).collect()
}

fn read_source(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read source file ({})", path.display()))
}

fn write_output(out: Option<&Path>, text: &str) -> Result<()> {
    write_output_raw(out, &format!("{text}\n"))
}

fn write_output_raw(out: Option<&Path>, text: &str) -> Result<()> {
    if let Some(out) = out {
        if let Some(parent) = out.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(out, text).with_context(|| format!("failed to write {}", out.display()))?;
    } else {
        print!("{text}");
    }
    Ok(())
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{' ))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern)? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{ParamType, Ty, TypeSet};

    #[test]
    fn field_args() {
        let decl = parse_field_arg("x = int|null").unwrap();
        assert_eq!(decl.name, "x");
        assert_eq!(decl.ty, ParamType::Set(TypeSet(vec![Ty::Int, Ty::Null])));
        assert_eq!(parse_field_arg("map_name=str").unwrap().ty, ParamType::Bare(Ty::Str));
        assert!(parse_field_arg("=int").is_err());
        assert!(parse_field_arg("x=").is_err());
        assert!(parse_field_arg("x=tile").is_err());
    }

    #[test]
    fn var_args() {
        assert_eq!(parse_var_arg("steps=12").unwrap(), ("steps".into(), "12".into()));
        assert_eq!(parse_var_arg("empty=").unwrap(), ("empty".into(), String::new()));
        assert!(parse_var_arg("12").is_err());
    }

    #[test]
    fn batch_documents() {
        let one: BatchDoc = serde_json::from_str(r#"{"record": "wait", "params": [1.5]}"#).unwrap();
        assert!(matches!(one, BatchDoc::One(BatchCall { ref record, .. }) if record == "wait"));
        let many: BatchDoc = serde_json::from_str(r#"[{"record": "wait"}, {"record": "warp", "params": ["a", null]}]"#).unwrap();
        match many {
            BatchDoc::Many(calls) => assert_eq!(calls[1].params, vec![RawParam::text("a"), RawParam::null()]),
            other => panic!("expected a list, got {other:?}"),
        }
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        CommandLineInterface::command().debug_assert();
    }

    #[test]
    fn call_labels_count_per_file() {
        let dir = std::env::temp_dir().join(format!("tilekit-calls-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let first = dir.join("first.ndjson");
        let second = dir.join("second.ndjson");
        std::fs::write(&first, "{\"record\": \"wait\"}\n[{\"record\": \"a\"}, {\"record\": \"b\"}]\n").unwrap();
        std::fs::write(&second, "{\"record\": \"c\"}\n{\"record\": \"d\"}\n").unwrap();

        let settings = InputSettings {
            ndjson: true,
            input: vec![first.to_string_lossy().into(), second.to_string_lossy().into()],
        };
        let labels = settings.load_calls().unwrap().into_iter().map(|(label, _)| label).collect::<Vec<_>>();
        std::fs::remove_dir_all(&dir).ok();

        let first = first.to_string_lossy();
        let second = second.to_string_lossy();
        assert_eq!(labels, vec![
            format!("{first}#0"),
            format!("{first}#1"),
            format!("{first}#2"),
            format!("{second}#0"),
            format!("{second}#1"),
        ]);
    }

    #[test]
    fn literal_paths_pass_through() {
        let paths = resolve_file_path_patterns(["schemas/actions.json"]).unwrap();
        assert_eq!(paths, vec![PathBuf::from("schemas/actions.json")]);
    }
}
