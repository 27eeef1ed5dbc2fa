//! Human-oriented rendering of validation errors: a headline per error and
//! a code frame of the data file pointing at the offending location.

use colored::Colorize;
use serde_json::Value;
use tracing::{instrument, trace};

use crate::json_pointer;
use crate::record::ErrorRecord;

/// Layout of the code frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameStyle {
    pub indent: usize,
    /// Lines shown on either side of the offending one
    pub context: usize,
}

impl Default for FrameStyle {
    fn default() -> Self {
        Self {
            indent: 2,
            context: 2,
        }
    }
}

/// Renders every record against the data source text
#[instrument(skip_all, fields(error_count = errors.len()))]
pub fn render(data_source: &str, errors: &[ErrorRecord], style: FrameStyle) -> String {
    let mut out = String::new();

    for (idx, error) in errors.iter().enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        out.push_str(&headline(error));
        out.push('\n');
        out.push_str(&code_frame(data_source, error, style));
    }

    out
}

fn headline(error: &ErrorRecord) -> String {
    let label = keyword_label(&error.keyword).red().bold();

    let detail = if let Some(property) = error.missing_property() {
        format!("must have required property '{property}'")
    } else if let Some(property) = error.additional_property() {
        format!("must NOT have additional property '{property}'")
    } else if let Some(allowed) = error.allowed_values() {
        let listed: Vec<String> = allowed.iter().map(Value::to_string).collect();
        format!(
            "must be equal to one of the allowed values\n({})",
            listed.join(", ")
        )
    } else {
        error.message.clone()
    };

    let location = if error.instance_path.is_empty() {
        "(root)".to_string()
    } else {
        error.instance_path.clone()
    };

    format!("{label} {} {detail}", location.dimmed())
}

/// `additionalProperties` becomes `ADDITIONAL PROPERTIES`
fn keyword_label(keyword: &str) -> String {
    let mut label = String::with_capacity(keyword.len() + 4);
    for (idx, ch) in keyword.chars().enumerate() {
        if idx > 0 && ch.is_ascii_uppercase() {
            label.push(' ');
        }
        label.push(ch.to_ascii_uppercase());
    }
    label
}

/// Message printed next to the caret
fn caret_message(error: &ErrorRecord) -> String {
    if let Some(property) = error.missing_property() {
        return format!("☹️  {property} is missing here!");
    }
    if let Some(property) = error.additional_property() {
        return format!("☹️  {property} is not expected to be here!");
    }
    if let (Some(allowed), Some(Value::String(actual))) = (error.allowed_values(), &error.data) {
        if let Some(suggestion) = closest_match(actual, allowed) {
            return format!("👈🏽  Did you mean {suggestion}?");
        }
        return "👈🏽  Unexpected value, should be equal to one of the allowed values".to_string();
    }
    format!("👈🏽  {} {}", error.keyword, error.message)
}

fn code_frame(source: &str, error: &ErrorRecord, style: FrameStyle) -> String {
    let located = json_pointer::locate(&error.instance_path, source).and_then(|location| {
        match error.additional_property() {
            Some(property) => {
                let member = format!("{}/{}", error.instance_path, escape_token(property));
                json_pointer::locate(&member, source).and_then(|l| l.key)
            }
            None => Some(location.value),
        }
    });
    let position = located.unwrap_or_default();

    trace!(
        line = position.line,
        column = position.column,
        resolved = located.is_some(),
        "Rendering code frame"
    );

    let lines: Vec<&str> = source.lines().collect();
    if lines.is_empty() {
        return String::new();
    }
    let target = position.line.min(lines.len() - 1);
    let first = target.saturating_sub(style.context);
    let last = (target + style.context).min(lines.len() - 1);
    let gutter = (last + 1).to_string().len();
    let pad = " ".repeat(style.indent);

    let mut frame = Vec::with_capacity(last - first + 2);
    for (number, line) in lines.iter().enumerate().take(last + 1).skip(first) {
        let marker = if number == target { ">" } else { " " };
        let gutter_text = format!("{marker} {:>gutter$} |", number + 1);
        if number == target {
            frame.push(format!("{pad}{} {line}", gutter_text.red().bold()));
            frame.push(format!(
                "{pad}{} {}{} {}",
                format!("  {:>gutter$} |", "").dimmed(),
                " ".repeat(position.column),
                "^".red().bold(),
                caret_message(error).magenta()
            ));
        } else {
            frame.push(format!("{pad}{} {line}", gutter_text.dimmed()));
        }
    }

    frame.iter().map(|line| format!("{line}\n")).collect()
}

fn escape_token(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}

/// Closest allowed string within a small edit distance of `actual`
fn closest_match<'v>(actual: &str, allowed: &'v [Value]) -> Option<&'v str> {
    let threshold = (actual.chars().count() / 3).max(1);

    allowed
        .iter()
        .filter_map(Value::as_str)
        .map(|candidate| (levenshtein(actual, candidate), candidate))
        .filter(|(distance, _)| *distance <= threshold)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, candidate)| candidate)
}

fn levenshtein(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut previous: Vec<usize> = (0..=b.len()).collect();

    for (i, ca) in a.chars().enumerate() {
        let mut current = vec![i + 1; b.len() + 1];
        for (j, cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != *cb);
            current[j + 1] = substitution.min(previous[j + 1] + 1).min(current[j] + 1);
        }
        previous = current;
    }

    previous[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Map, json};

    const DATA: &str = r#"{
  "name": "board",
  "kind": "bord",
  "extra": true
}"#;

    fn record(keyword: &str, instance_path: &str, params: Value, data: Option<Value>) -> ErrorRecord {
        let params = match params {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        ErrorRecord {
            keyword: keyword.to_string(),
            instance_path: instance_path.to_string(),
            schema_path: format!("/{keyword}"),
            message: format!("{keyword} failed"),
            params,
            schema: None,
            parent_schema: None,
            data,
        }
    }

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn additional_property_points_at_key() {
        plain();
        let error = record("additionalProperties", "", json!({"additionalProperty": "extra"}), None);

        let out = render(DATA, &[error], FrameStyle::default());

        assert!(out.contains("ADDITIONAL PROPERTIES (root) must NOT have additional property 'extra'"));
        assert!(out.contains("> 4 |   \"extra\": true"));
        assert!(out.contains("|   ^ ☹️  extra is not expected to be here!"));
    }

    #[test]
    fn enum_suggests_closest_value() {
        plain();
        let error = record(
            "enum",
            "/kind",
            json!({"allowedValues": ["board", "module"]}),
            Some(json!("bord")),
        );

        let out = render(DATA, &[error], FrameStyle::default());

        assert!(out.contains("(\"board\", \"module\")"));
        assert!(out.contains("> 3 |   \"kind\": \"bord\","));
        assert!(out.contains("Did you mean board?"));
    }

    #[test]
    fn missing_property_frames_parent_object() {
        plain();
        let error = record("required", "", json!({"missingProperty": "version"}), None);

        let out = render(DATA, &[error], FrameStyle { indent: 0, context: 1 });

        assert!(out.contains("must have required property 'version'"));
        assert!(out.starts_with("REQUIRED (root)"));
        assert!(out.contains("> 1 | {"));
        assert!(out.contains("  2 |   \"name\": \"board\","));
        assert!(!out.contains("  3 |"));
    }

    #[test]
    fn unresolvable_pointer_falls_back_to_first_line() {
        plain();
        let error = record("type", "/nowhere", json!({}), None);

        let out = render(DATA, &[error], FrameStyle::default());

        assert!(out.contains("> 1 | {"));
        assert!(out.contains("type type failed"));
    }

    #[test]
    fn edit_distance() {
        assert_eq!(levenshtein("bord", "board"), 1);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(closest_match("xyz", &[json!("board")]), None);
    }
}
