use std::path::Path;

use jsonschema::{Draft, Validator};
use serde_json::Value;
use tracing::{debug, info, instrument, trace, warn};

use crate::error::{DebugError, DebugResult};
use crate::record::ErrorRecord;

/// Validator configuration, fixed once a [`SchemaValidator`] is compiled.
/// Error locations are always JSON pointers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatorOptions {
    /// Report every violation instead of stopping at the first
    pub all_errors: bool,
    /// Keep schema context and offending data in each record
    pub verbose: bool,
    pub validate_formats: bool,
    /// Force a draft instead of detecting it from `$schema`
    pub draft: Option<Draft>,
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        Self {
            all_errors: true,
            verbose: true,
            validate_formats: true,
            draft: None,
        }
    }
}

/// Pass/fail plus the ordered violations
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport {
    pub errors: Vec<ErrorRecord>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A schema compiled into a reusable validation procedure
pub struct SchemaValidator<'a> {
    schema: &'a Value,
    validator: Validator,
    options: ValidatorOptions,
}

impl<'a> SchemaValidator<'a> {
    /// Compiles `schema`; `schema_path` is only used to attribute errors.
    #[instrument(skip(schema), fields(path = %schema_path.display()))]
    pub fn compile(
        schema: &'a Value,
        schema_path: &Path,
        options: ValidatorOptions,
    ) -> DebugResult<Self> {
        trace!(?options, "Creating schema validator");

        let built = match options.draft {
            Some(draft) => jsonschema::options()
                .with_draft(draft)
                .should_validate_formats(options.validate_formats)
                .build(schema),
            None => jsonschema::options()
                .should_validate_formats(options.validate_formats)
                .build(schema),
        };

        let validator = built.map_err(|e| {
            warn!(error = %e, "Schema failed to compile");
            DebugError::InvalidSchema {
                path: schema_path.to_path_buf(),
                reason: e.to_string(),
            }
        })?;

        debug!("Schema validator created successfully");

        Ok(Self {
            schema,
            validator,
            options,
        })
    }

    #[instrument(skip_all)]
    pub fn validate(&self, data: &Value) -> ValidationReport {
        let limit = if self.options.all_errors { usize::MAX } else { 1 };

        let errors: Vec<ErrorRecord> = self
            .validator
            .iter_errors(data)
            .flat_map(|e| ErrorRecord::expand(&e, self.schema, data, self.options.verbose))
            .take(limit)
            .collect();

        if errors.is_empty() {
            info!("Schema validation passed with no errors");
        } else {
            warn!(
                error_count = errors.len(),
                "Schema validation found errors"
            );
        }

        ValidationReport { errors }
    }
}
