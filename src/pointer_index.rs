use tracing::{debug, instrument, trace};

/// Byte offsets of the value a pointer refers to and, for object members, its key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Offsets {
    pub key: Option<usize>,
    pub value: usize,
}

/// Walks the raw JSON text following `json_pointer`.
/// Returns `None` if the pointer is malformed or leads nowhere in the text.
#[instrument(skip(raw_file_contents), fields(pointer = json_pointer))]
pub(crate) fn calculate(json_pointer: &str, raw_file_contents: &str) -> Option<Offsets> {
    let bytes = raw_file_contents.as_bytes();

    if !json_pointer.is_empty() && !json_pointer.starts_with('/') {
        debug!("Pointer does not start with '/'");
        return None;
    }

    let mut offsets = Offsets {
        key: None,
        value: skip_whitespace(bytes, 0),
    };

    for (idx, raw_token) in json_pointer.split('/').skip(1).enumerate() {
        let token = unescape_token(raw_token);
        let pos = offsets.value;

        offsets = match bytes.get(pos)? {
            b'{' => find_member(raw_file_contents, pos + 1, &token)?,
            b'[' => Offsets {
                key: None,
                value: find_element(bytes, pos + 1, token.parse().ok()?)?,
            },
            _ => {
                debug!(iteration = idx, token = %token, "Pointer descends into a scalar");
                return None;
            }
        };

        trace!(
            iteration = idx,
            token = %token,
            value_offset = offsets.value,
            "Processed path item"
        );
    }

    Some(offsets)
}

fn unescape_token(token: &str) -> String {
    token.replace("~1", "/").replace("~0", "~")
}

fn find_member(raw_file_contents: &str, mut pos: usize, wanted: &str) -> Option<Offsets> {
    let bytes = raw_file_contents.as_bytes();

    loop {
        pos = skip_whitespace(bytes, pos);
        if *bytes.get(pos)? != b'"' {
            return None;
        }

        let key_start = pos;
        let key_end = skip_string(bytes, pos)?;
        let key: String = serde_json::from_str(&raw_file_contents[key_start..key_end]).ok()?;

        pos = skip_whitespace(bytes, key_end);
        if *bytes.get(pos)? != b':' {
            return None;
        }
        pos = skip_whitespace(bytes, pos + 1);

        if key == wanted {
            return Some(Offsets {
                key: Some(key_start),
                value: pos,
            });
        }

        pos = skip_whitespace(bytes, skip_value(bytes, pos)?);
        if *bytes.get(pos)? != b',' {
            return None;
        }
        pos += 1;
    }
}

fn find_element(bytes: &[u8], mut pos: usize, wanted: usize) -> Option<usize> {
    for index in 0.. {
        pos = skip_whitespace(bytes, pos);
        if *bytes.get(pos)? == b']' {
            return None;
        }
        if index == wanted {
            return Some(pos);
        }

        pos = skip_whitespace(bytes, skip_value(bytes, pos)?);
        if *bytes.get(pos)? != b',' {
            return None;
        }
        pos += 1;
    }
    None
}

fn skip_whitespace(bytes: &[u8], mut pos: usize) -> usize {
    while bytes.get(pos).is_some_and(u8::is_ascii_whitespace) {
        pos += 1;
    }
    pos
}

/// `pos` must be on the opening quote; returns the offset after the closing one
fn skip_string(bytes: &[u8], mut pos: usize) -> Option<usize> {
    pos += 1;
    loop {
        match bytes.get(pos)? {
            b'\\' => pos += 2,
            b'"' => return Some(pos + 1),
            _ => pos += 1,
        }
    }
}

fn skip_value(bytes: &[u8], pos: usize) -> Option<usize> {
    match bytes.get(pos)? {
        b'"' => skip_string(bytes, pos),
        b'{' | b'[' => {
            let mut depth = 0usize;
            let mut pos = pos;
            loop {
                match bytes.get(pos)? {
                    b'"' => {
                        pos = skip_string(bytes, pos)?;
                        continue;
                    }
                    b'{' | b'[' => depth += 1,
                    b'}' | b']' => {
                        depth -= 1;
                        if depth == 0 {
                            return Some(pos + 1);
                        }
                    }
                    _ => {}
                }
                pos += 1;
            }
        }
        _ => {
            let mut pos = pos;
            while bytes
                .get(pos)
                .is_some_and(|b| !matches!(b, b',' | b'}' | b']') && !b.is_ascii_whitespace())
            {
                pos += 1;
            }
            Some(pos)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXT: &str = r#"{
  "runtime": { "type": "docker", "docker": { "tag": "1.25" } },
  "ports": [
    { "containerPort": 8080 },
    { "containerPort": "x", "a/b": [1, "]", 3] }
  ]
}"#;

    fn value_at(pointer: &str) -> Option<&'static str> {
        calculate(pointer, TEXT).map(|o| &TEXT[o.value..])
    }

    #[test]
    fn root_pointer_is_document_start() {
        assert_eq!(
            calculate("", TEXT),
            Some(Offsets { key: None, value: 0 })
        );
    }

    #[test]
    fn follows_nested_object_keys() {
        let offsets = calculate("/runtime/docker/tag", TEXT).unwrap();

        assert!(TEXT[offsets.key.unwrap()..].starts_with("\"tag\""));
        assert!(TEXT[offsets.value..].starts_with("\"1.25\""));
    }

    #[test]
    fn follows_array_indices() {
        assert!(value_at("/ports/1/containerPort").unwrap().starts_with("\"x\""));
        assert!(value_at("/ports/0").unwrap().starts_with("{ \"containerPort\": 8080"));
    }

    #[test]
    fn skips_brackets_inside_strings_and_decodes_tokens() {
        assert!(value_at("/ports/1/a~1b/2").unwrap().starts_with('3'));
    }

    #[test]
    fn does_not_match_key_at_wrong_depth() {
        // "type" exists only under /runtime
        assert_eq!(calculate("/type", TEXT), None);
        assert!(value_at("/runtime/type").unwrap().starts_with("\"docker\""));
    }

    #[test]
    fn unresolvable_pointers_are_none() {
        assert_eq!(calculate("/ports/7", TEXT), None);
        assert_eq!(calculate("/ports/first", TEXT), None);
        assert_eq!(calculate("/runtime/type/deeper", TEXT), None);
        assert_eq!(calculate("runtime", TEXT), None);
    }
}
