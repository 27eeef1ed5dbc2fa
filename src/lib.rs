pub mod document;
pub mod error;
pub mod inputs;
pub mod json_pointer;
pub mod line_number;
pub mod pointer_index;
pub mod pretty;
pub mod record;
pub mod report;
pub mod validation;

use std::io::{self, Write};
use std::path::Path;

use tracing::{debug, error, info, instrument};

use crate::{
    document::Document,
    error::{DebugError, DebugResult},
    pretty::FrameStyle,
    report::Console,
    validation::{SchemaValidator, ValidationReport, ValidatorOptions},
};

/// Everything configurable about a single run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    pub validator: ValidatorOptions,
    pub frame: FrameStyle,
}

/// How a run ended
#[derive(Debug)]
pub enum RunOutcome {
    Valid,
    Invalid(ValidationReport),
    /// A file could not be loaded or the schema did not compile
    Failed(DebugError),
}

impl RunOutcome {
    /// Process exit status: zero only when the data passed validation
    pub fn exit_code(&self) -> u8 {
        match self {
            RunOutcome::Valid => 0,
            RunOutcome::Invalid(_) | RunOutcome::Failed(_) => 1,
        }
    }
}

/// Loads both files, validates data against schema and reports to `console`.
///
/// Load and compile failures are reported as a single error line and
/// returned as [`RunOutcome::Failed`]; only console write failures are `Err`.
#[instrument(skip(options, console), fields(
    schema = %schema_path.display(),
    data = %data_path.display()
))]
pub fn run<O: Write, E: Write>(
    schema_path: &Path,
    data_path: &Path,
    options: &RunOptions,
    console: &mut Console<O, E>,
) -> io::Result<RunOutcome> {
    info!("Starting validation run");

    let (schema, data) = match load_pair(schema_path, data_path) {
        Ok(pair) => pair,
        Err(e) => return fail(console, e),
    };

    console.banner(schema_path, data_path)?;

    let validator = match SchemaValidator::compile(&schema.value, &schema.path, options.validator)
    {
        Ok(validator) => validator,
        Err(e) => return fail(console, e),
    };

    let report = validator.validate(&data.value);

    if report.is_valid() {
        console.passed()?;
        return Ok(RunOutcome::Valid);
    }

    debug!(error_count = report.errors.len(), "Rendering diagnostics");
    let pretty = pretty::render(&data.source, &report.errors, options.frame);
    console.failed(&pretty, &report.errors)?;

    Ok(RunOutcome::Invalid(report))
}

fn load_pair(schema_path: &Path, data_path: &Path) -> DebugResult<(Document, Document)> {
    let schema = Document::load(schema_path)?;
    let data = Document::load(data_path)?;
    Ok((schema, data))
}

fn fail<O: Write, E: Write>(
    console: &mut Console<O, E>,
    e: DebugError,
) -> io::Result<RunOutcome> {
    error!(error = %e, schema_error = e.is_schema_error(), "Run aborted");
    console.error(&e)?;
    Ok(RunOutcome::Failed(e))
}
