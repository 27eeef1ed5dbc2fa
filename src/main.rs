use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use schema_debug::{
    RunOptions, inputs, pretty::FrameStyle, report::Console, run, validation::ValidatorOptions,
};
use tracing::{debug, error};

/// Validate a JSON document against a JSON Schema and explain every failure.
///
/// Without positional arguments the paths are read from INPUT_SCHEMA/SCHEMA
/// and INPUT_JSONS/JSONS, relative to GITHUB_WORKSPACE.
#[derive(Parser, Debug)]
#[command(name = "schema-debug", version, about)]
struct Cli {
    /// Path to the JSON Schema
    schema: Option<PathBuf>,

    /// Path to the JSON document to validate
    data: Option<PathBuf>,

    /// Arguments after the two paths are ignored
    #[arg(hide = true)]
    ignored: Vec<String>,

    /// Stop at the first violation instead of collecting all of them
    #[arg(long)]
    first_error: bool,

    /// Leave schema context and offending data out of the raw records
    #[arg(long)]
    terse: bool,

    /// Treat `format` as an annotation instead of an assertion
    #[arg(long)]
    no_formats: bool,

    /// Validate with this draft instead of detecting it from `$schema`
    #[arg(long, value_enum)]
    draft: Option<DraftArg>,

    /// Source lines shown around each error
    #[arg(long, default_value_t = 2)]
    context: usize,

    /// Indentation of the code frames
    #[arg(long, default_value_t = 2)]
    indent: usize,

    /// Disable coloured output (NO_COLOR is honoured as well)
    #[arg(long)]
    no_color: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum DraftArg {
    #[value(name = "4")]
    Draft4,
    #[value(name = "6")]
    Draft6,
    #[value(name = "7")]
    Draft7,
    #[value(name = "2019-09")]
    Draft201909,
    #[value(name = "2020-12")]
    Draft202012,
}

impl From<DraftArg> for jsonschema::Draft {
    fn from(draft: DraftArg) -> Self {
        match draft {
            DraftArg::Draft4 => jsonschema::Draft::Draft4,
            DraftArg::Draft6 => jsonschema::Draft::Draft6,
            DraftArg::Draft7 => jsonschema::Draft::Draft7,
            DraftArg::Draft201909 => jsonschema::Draft::Draft201909,
            DraftArg::Draft202012 => jsonschema::Draft::Draft202012,
        }
    }
}

impl Cli {
    fn run_options(&self) -> RunOptions {
        RunOptions {
            validator: ValidatorOptions {
                all_errors: !self.first_error,
                verbose: !self.terse,
                validate_formats: !self.no_formats,
                draft: self.draft.map(Into::into),
            },
            frame: FrameStyle {
                indent: self.indent,
                context: self.context,
            },
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    if !cli.ignored.is_empty() {
        debug!(ignored = ?cli.ignored, "Ignoring extra arguments");
    }

    let mut console = Console::stdio();

    let Some(paths) = inputs::resolve_from_process(cli.schema.as_deref(), cli.data.as_deref())
    else {
        return match console.usage() {
            Ok(()) => ExitCode::from(2),
            Err(e) => {
                error!(error = %e, "Failed to write usage");
                ExitCode::FAILURE
            }
        };
    };

    match run(&paths.schema, &paths.data, &cli.run_options(), &mut console) {
        Ok(outcome) => ExitCode::from(outcome.exit_code()),
        Err(e) => {
            error!(error = %e, "Failed to write to the console");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_map_onto_run_options() {
        let cli = Cli::parse_from([
            "schema-debug",
            "s.json",
            "d.json",
            "--first-error",
            "--terse",
            "--draft",
            "7",
            "--context",
            "0",
        ]);

        let options = cli.run_options();

        assert_eq!(cli.schema.as_deref(), Some(std::path::Path::new("s.json")));
        assert!(!options.validator.all_errors);
        assert!(!options.validator.verbose);
        assert!(options.validator.validate_formats);
        assert_eq!(options.validator.draft, Some(jsonschema::Draft::Draft7));
        assert_eq!(options.frame, FrameStyle { indent: 2, context: 0 });
    }

    #[test]
    fn defaults_collect_everything() {
        let cli = Cli::parse_from(["schema-debug"]);

        assert_eq!(cli.schema, None);
        assert_eq!(cli.run_options().validator, ValidatorOptions::default());
    }

    #[test]
    fn extra_positional_arguments_are_ignored() -> Result<(), clap::Error> {
        let cli = Cli::try_parse_from(["schema-debug", "s.json", "d.json", "more", "args"])?;

        assert_eq!(cli.schema.as_deref(), Some(std::path::Path::new("s.json")));
        assert_eq!(cli.data.as_deref(), Some(std::path::Path::new("d.json")));
        assert_eq!(cli.ignored, vec!["more", "args"]);
        Ok(())
    }
}
