use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

/// Schema path variables, first non-empty wins
pub const SCHEMA_VARS: [&str; 2] = ["INPUT_SCHEMA", "SCHEMA"];
/// Data path variables, first non-empty wins
pub const DATA_VARS: [&str; 2] = ["INPUT_JSONS", "JSONS"];
/// Root the variable paths are joined against
pub const WORKSPACE_VAR: &str = "GITHUB_WORKSPACE";

pub const USAGE: [&str; 3] = [
    "Usage: schema-debug <schema-path> <json-path>",
    "Example: schema-debug boards/schema.json boards/example/definition.json",
    "Or set environment variables: INPUT_SCHEMA, INPUT_JSONS, GITHUB_WORKSPACE",
];

/// The two files a run works on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inputs {
    pub schema: PathBuf,
    pub data: PathBuf,
}

/// Positional arguments win when both are given; otherwise the paths come
/// from the environment, looked up through `env`.
#[instrument(skip(env))]
pub fn resolve(
    schema_arg: Option<&Path>,
    data_arg: Option<&Path>,
    env: impl Fn(&str) -> Option<String>,
) -> Option<Inputs> {
    if let (Some(schema), Some(data)) = (schema_arg, data_arg) {
        debug!("Using positional arguments");
        return Some(Inputs {
            schema: schema.to_path_buf(),
            data: data.to_path_buf(),
        });
    }

    let first_set = |names: &[&str]| {
        names
            .iter()
            .filter_map(|&name| env(name))
            .find(|value| !value.is_empty())
    };

    let schema = first_set(&SCHEMA_VARS);
    let data = first_set(&DATA_VARS);
    let workspace = first_set(&[WORKSPACE_VAR]).unwrap_or_else(|| ".".to_string());

    match (schema, data) {
        (Some(schema), Some(data)) => {
            let root = Path::new(&workspace);
            debug!(workspace = %workspace, "Using environment variables");
            Some(Inputs {
                schema: root.join(schema),
                data: root.join(data),
            })
        }
        _ => {
            debug!("No schema/data pair could be resolved");
            None
        }
    }
}

/// [`resolve`] against the process environment
pub fn resolve_from_process(schema_arg: Option<&Path>, data_arg: Option<&Path>) -> Option<Inputs> {
    resolve(schema_arg, data_arg, |name| std::env::var(name).ok())
}
