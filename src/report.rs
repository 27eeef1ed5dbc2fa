use std::io::{self, Write};
use std::path::Path;

use colored::Colorize;

use crate::error::DebugError;
use crate::inputs::USAGE;
use crate::record::ErrorRecord;

/// Console the runner reports to: regular output plus an error stream
pub struct Console<O, E> {
    pub out: O,
    pub err: E,
}

impl Console<io::Stdout, io::Stderr> {
    pub fn stdio() -> Self {
        Self {
            out: io::stdout(),
            err: io::stderr(),
        }
    }
}

impl<O: Write, E: Write> Console<O, E> {
    pub fn banner(&mut self, schema_path: &Path, data_path: &Path) -> io::Result<()> {
        writeln!(
            self.out,
            "{}",
            format!("\n🔍 Validating: {}", data_path.display()).blue()
        )?;
        writeln!(
            self.out,
            "{}",
            format!("📋 Schema: {}\n", schema_path.display()).blue()
        )
    }

    pub fn passed(&mut self) -> io::Result<()> {
        writeln!(self.out, "{}", "✅ Validation passed!".green())
    }

    pub fn failed(&mut self, pretty: &str, errors: &[ErrorRecord]) -> io::Result<()> {
        writeln!(self.out, "{}", "❌ Validation failed!\n".red())?;
        writeln!(self.out, "{pretty}")?;

        let raw = serde_json::to_string_pretty(errors).map_err(io::Error::other)?;
        writeln!(self.out, "{}", "\n📝 Raw errors:".yellow())?;
        writeln!(self.out, "{raw}")
    }

    pub fn error(&mut self, error: &DebugError) -> io::Result<()> {
        writeln!(self.err, "{} {error}", "💥 Error:".red())
    }

    pub fn usage(&mut self) -> io::Result<()> {
        for line in USAGE {
            writeln!(self.out, "{}", line.yellow())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn console() -> Console<Vec<u8>, Vec<u8>> {
        colored::control::set_override(false);
        Console {
            out: Vec::new(),
            err: Vec::new(),
        }
    }

    #[test]
    fn usage_lists_arguments_and_variables() -> Result<(), Box<dyn std::error::Error>> {
        let mut console = console();

        console.usage()?;

        let out = String::from_utf8(console.out)?;
        assert_eq!(out.lines().count(), 3);
        assert!(out.starts_with("Usage: schema-debug <schema-path> <json-path>"));
        assert!(out.contains("INPUT_SCHEMA, INPUT_JSONS, GITHUB_WORKSPACE"));
        assert!(console.err.is_empty());
        Ok(())
    }

    #[test]
    fn errors_go_to_error_stream() -> Result<(), Box<dyn std::error::Error>> {
        let mut console = console();
        let error = DebugError::InvalidSchema {
            path: PathBuf::from("schema.json"),
            reason: "12 is not valid".to_string(),
        };

        console.error(&error)?;

        let err = String::from_utf8(console.err)?;
        assert_eq!(
            err,
            "💥 Error: Invalid JSON schema in schema.json: 12 is not valid\n"
        );
        assert!(console.out.is_empty());
        Ok(())
    }

    #[test]
    fn failure_dumps_raw_records() -> Result<(), Box<dyn std::error::Error>> {
        let mut console = console();

        console.failed("PRETTY", &[])?;

        let out = String::from_utf8(console.out)?;
        assert!(out.starts_with("❌ Validation failed!\n\nPRETTY\n"));
        assert!(out.ends_with("📝 Raw errors:\n[]\n"));
        Ok(())
    }
}
