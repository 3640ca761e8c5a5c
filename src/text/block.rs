use super::byte_offset;

/// Two spaces, the unit of one indent level.
pub const INDENT: &str = "  ";

/// Caret or span inside a buffer, in char offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    /// A span from `start` to `end`. Reversed ranges are reordered.
    pub const fn new(start: usize, end: usize) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    /// A zero-width selection at `at`.
    pub const fn caret(at: usize) -> Self {
        Self { start: at, end: at }
    }

    pub const fn is_caret(&self) -> bool {
        self.start == self.end
    }

    /// Ordered and clamped to a buffer of `len` chars.
    pub fn clamped(self, len: usize) -> Self {
        let Self { start, end } = Self::new(self.start, self.end);
        Self {
            start: start.min(len),
            end: end.min(len),
        }
    }
}

/// The whole-line span a selection touches.
///
/// `start` sits just after the previous newline (or at 0) and `end` on the
/// next newline at or after the selection end (or at the buffer length).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineBlock {
    pub start: usize,
    pub end: usize,
}

impl LineBlock {
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Result of a line-block edit: the new buffer and what to select in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineEdit {
    pub text: String,
    pub selection: Selection,
}

/// Widen `selection` to the whole lines it touches.
///
/// The backward scan looks at chars before `start` only, so a caret at the
/// start of a line stays on that line. The forward scan begins at `end`
/// itself, so a caret sitting on a newline does not pull in the next line.
pub fn select_block(buffer: &str, selection: Selection) -> LineBlock {
    let len = buffer.chars().count();
    let selection = selection.clamped(len);
    let start_byte = byte_offset(buffer, selection.start);
    let end_byte = byte_offset(buffer, selection.end);

    let block_start_byte = buffer[..start_byte].rfind('\n').map_or(0, |nl| nl + 1);
    let block_end_byte = buffer[end_byte..]
        .find('\n')
        .map_or(buffer.len(), |nl| end_byte + nl);

    let start = buffer[..block_start_byte].chars().count();
    LineBlock {
        start,
        end: start + buffer[block_start_byte..block_end_byte].chars().count(),
    }
}

/// Apply `transform` to every line of `block` and return the rejoined text.
pub fn transform_block<F>(buffer: &str, block: LineBlock, transform: F) -> String
where
    F: Fn(&str) -> String,
{
    let from = byte_offset(buffer, block.start);
    let to = byte_offset(buffer, block.end);
    buffer[from..to]
        .split('\n')
        .map(transform)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Transform each line touched by `selection` and select the whole result.
///
/// Selecting the transformed block, rather than mapping the old offsets,
/// lets indent or outdent be repeated without re-selecting.
pub fn apply_line_transform<F>(buffer: &str, selection: Selection, transform: F) -> LineEdit
where
    F: Fn(&str) -> String,
{
    let block = select_block(buffer, selection);
    let updated = transform_block(buffer, block, transform);
    let from = byte_offset(buffer, block.start);
    let to = byte_offset(buffer, block.end);

    let mut text = String::with_capacity(from + updated.len() + (buffer.len() - to));
    text.push_str(&buffer[..from]);
    text.push_str(&updated);
    text.push_str(&buffer[to..]);

    LineEdit {
        text,
        selection: Selection::new(block.start, block.start + updated.chars().count()),
    }
}

/// Prefix a line with one indent level, empty lines included.
pub fn indent_line(line: &str) -> String {
    format!("{INDENT}{line}")
}

/// Strip up to one indent level of literal spaces. Tabs are left alone.
pub fn outdent_line(line: &str) -> String {
    let spaces = line
        .bytes()
        .take(INDENT.len())
        .take_while(|&b| b == b' ')
        .count();
    line[spaces..].to_string()
}

pub fn indent(buffer: &str, selection: Selection) -> LineEdit {
    apply_line_transform(buffer, selection, indent_line)
}

pub fn outdent(buffer: &str, selection: Selection) -> LineEdit {
    apply_line_transform(buffer, selection, outdent_line)
}

/// Replace the selection with one indent level and put the caret after it.
pub fn insert_soft_tab(buffer: &str, selection: Selection) -> LineEdit {
    let selection = selection.clamped(buffer.chars().count());
    let from = byte_offset(buffer, selection.start);
    let to = byte_offset(buffer, selection.end);
    let text = format!("{}{INDENT}{}", &buffer[..from], &buffer[to..]);
    LineEdit {
        text,
        selection: Selection::caret(selection.start + INDENT.len()),
    }
}
