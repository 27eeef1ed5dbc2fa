use tracing::{debug, instrument, trace};

use crate::{line_number, pointer_index};

/// Zero-based position in the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

/// Where a JSON pointer lands in the raw file contents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    /// Start of the member key, if the pointer names an object member
    pub key: Option<Position>,
    /// Start of the value the pointer refers to
    pub value: Position,
}

/// Converts a JSON pointer into source positions.
/// Outputs `None` when the pointer can not be followed through the text.
#[instrument(skip(raw_file_contents), fields(
    pointer = json_pointer,
    content_len = raw_file_contents.len()
))]
pub fn locate(json_pointer: &str, raw_file_contents: &str) -> Option<Location> {
    trace!("Converting JSON pointer to location");

    let Some(offsets) = pointer_index::calculate(json_pointer, raw_file_contents) else {
        debug!(pointer = json_pointer, "Failed to resolve pointer in source");
        return None;
    };

    let position = |index| {
        let (line, column) = line_number::from_index(raw_file_contents, index);
        Position { line, column }
    };

    Some(Location {
        key: offsets.key.map(position),
        value: position(offsets.value),
    })
}
