use jsonschema::error::ValidationErrorKind;
use serde::Serialize;
use serde_json::{Map, Value, json};
use tracing::{instrument, trace};

/// One schema violation, shaped for both the pretty view and the raw dump
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorRecord {
    pub keyword: String,
    pub instance_path: String,
    pub schema_path: String,
    pub message: String,
    pub params: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_schema: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ErrorRecord {
    /// Builds a record from a library error. With `verbose` the violated
    /// keyword value, its parent schema and the offending data are attached.
    #[instrument(skip_all, fields(instance_path = %error.instance_path()))]
    pub fn new(
        error: &jsonschema::ValidationError<'_>,
        schema: &Value,
        data: &Value,
        verbose: bool,
    ) -> Self {
        let instance_path = error.instance_path().to_string();
        let schema_path = error.schema_path().to_string();
        let keyword = keyword_of(&schema_path);

        trace!(
            keyword = %keyword,
            schema_path = %schema_path,
            "Creating error record"
        );

        let (schema_value, parent_schema, data_value) = if verbose {
            let (parent, keyword_value) = match keyword_location(schema, &schema_path) {
                Some((parent, value)) => (Some(parent.clone()), Some(value.clone())),
                None => (None, None),
            };
            (keyword_value, parent, data.pointer(&instance_path).cloned())
        } else {
            (None, None, None)
        };

        Self {
            keyword,
            params: params_of(error.kind()),
            message: error.to_string(),
            instance_path,
            schema_path,
            schema: schema_value,
            parent_schema,
            data: data_value,
        }
    }

    /// Like [`ErrorRecord::new`], but a report of several unexpected
    /// properties becomes one record per property.
    pub fn expand(
        error: &jsonschema::ValidationError<'_>,
        schema: &Value,
        data: &Value,
        verbose: bool,
    ) -> Vec<Self> {
        let record = Self::new(error, schema, data, verbose);

        match error.kind() {
            ValidationErrorKind::AdditionalProperties { unexpected } if unexpected.len() > 1 => {
                trace!(count = unexpected.len(), "Splitting additional properties error");
                unexpected
                    .iter()
                    .map(|name| {
                        let mut single = record.clone();
                        single.params = additional_property_params(name);
                        single.message =
                            format!("Additional properties are not allowed ('{name}' was unexpected)");
                        single
                    })
                    .collect()
            }
            _ => vec![record],
        }
    }

    pub fn missing_property(&self) -> Option<&str> {
        self.params.get("missingProperty")?.as_str()
    }

    pub fn additional_property(&self) -> Option<&str> {
        self.params.get("additionalProperty")?.as_str()
    }

    pub fn allowed_values(&self) -> Option<&Vec<Value>> {
        self.params.get("allowedValues")?.as_array()
    }
}

/// Last segment of the schema path, which names the violated keyword
fn keyword_of(schema_path: &str) -> String {
    schema_path
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .unwrap_or("schema")
        .replace("~1", "/")
        .replace("~0", "~")
}

fn additional_property_params(name: &str) -> Map<String, Value> {
    let mut params = Map::new();
    params.insert("additionalProperty".to_string(), Value::from(name));
    params
}

/// Follows `schema_path` through the root schema and returns the schema
/// object holding the keyword together with the keyword's value.
/// Local `$ref` segments jump to their target; remote ones give `None`.
fn keyword_location<'s>(root: &'s Value, schema_path: &str) -> Option<(&'s Value, &'s Value)> {
    let mut parent = root;
    let mut node = root;
    let mut tokens = schema_path.split('/').skip(1).peekable();

    while let Some(raw) = tokens.next() {
        let token = raw.replace("~1", "/").replace("~0", "~");

        if token == "$ref" && tokens.peek().is_some() {
            if let Some(reference) = node.get("$ref").and_then(Value::as_str) {
                node = local_target(root, reference)?;
                continue;
            }
        }

        parent = node;
        node = match node {
            Value::Object(map) => map.get(&token)?,
            Value::Array(items) => items.get(token.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }

    Some((parent, node))
}

fn local_target<'s>(root: &'s Value, reference: &str) -> Option<&'s Value> {
    let fragment = reference.strip_prefix('#')?;
    if fragment.is_empty() {
        return Some(root);
    }
    root.pointer(&fragment.replace("%25", "%"))
}

fn params_of(kind: &ValidationErrorKind) -> Map<String, Value> {
    let params = match kind {
        ValidationErrorKind::Required { property } => json!({ "missingProperty": property }),
        ValidationErrorKind::AdditionalProperties { unexpected } => match unexpected.as_slice() {
            [single] => json!({ "additionalProperty": single }),
            _ => json!({}),
        },
        ValidationErrorKind::Enum { options } => json!({ "allowedValues": options }),
        _ => json!({}),
    };

    match params {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}
