use tracing::{instrument, trace};

/// Zero-based line and column (in characters) of a byte offset
#[instrument(skip(raw_file_contents))]
pub(crate) fn from_index(raw_file_contents: &str, index: usize) -> (usize, usize) {
    let mut safe_index = index.min(raw_file_contents.len());
    while !raw_file_contents.is_char_boundary(safe_index) {
        safe_index -= 1;
    }

    let before = &raw_file_contents[..safe_index];
    let line_number = before.bytes().filter(|b| *b == b'\n').count();
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let column = before[line_start..].chars().count();

    trace!(
        index = safe_index,
        line_number = line_number,
        column = column,
        "Calculated line number from index"
    );

    (line_number, column)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_lines_and_columns() {
        let text = "{\n  \"a\": 1,\n  \"b\": 2\n}";
        let index = text.find("\"b\"").unwrap();

        assert_eq!(from_index(text, index), (2, 2));
        assert_eq!(from_index(text, 0), (0, 0));
    }

    #[test]
    fn clamps_out_of_range_index() {
        assert_eq!(from_index("ab\ncd", 99), (1, 2));
    }
}
