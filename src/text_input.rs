//! Cursor editing over a `String`. Cursors are char indices, never byte
//! offsets, so multi-byte input such as emoji stays intact.

use unicode_width::UnicodeWidthStr;

fn byte_index(text: &str, cursor: usize) -> usize {
    text.char_indices()
        .nth(cursor)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

pub fn insert_char(text: &mut String, cursor: &mut usize, c: char) {
    let at = byte_index(text, *cursor);
    text.insert(at, c);
    *cursor += 1;
}

pub fn backspace(text: &mut String, cursor: &mut usize) {
    if *cursor == 0 {
        return;
    }
    let at = byte_index(text, *cursor - 1);
    text.remove(at);
    *cursor -= 1;
}

pub fn delete(text: &mut String, cursor: usize) {
    if cursor < char_len(text) {
        let at = byte_index(text, cursor);
        text.remove(at);
    }
}

pub fn move_left(cursor: &mut usize) {
    *cursor = cursor.saturating_sub(1);
}

pub fn move_right(text: &str, cursor: &mut usize) {
    if *cursor < char_len(text) {
        *cursor += 1;
    }
}

pub fn move_end(text: &str, cursor: &mut usize) {
    *cursor = char_len(text);
}

/// (line, column) of the cursor, both in chars.
fn line_and_column(text: &str, cursor: usize) -> (usize, usize) {
    let before: String = text.chars().take(cursor).collect();
    let line = before.matches('\n').count();
    let column = before
        .rsplit('\n')
        .next()
        .map(|l| l.chars().count())
        .unwrap_or(0);
    (line, column)
}

/// Char index of `column` on `line`, clamped to that line's length.
fn index_at(text: &str, line: usize, column: usize) -> usize {
    let mut index = 0;
    for (n, l) in text.split('\n').enumerate() {
        let len = l.chars().count();
        if n == line {
            return index + column.min(len);
        }
        index += len + 1;
    }
    char_len(text)
}

pub fn move_up(text: &str, cursor: &mut usize) {
    let (line, column) = line_and_column(text, *cursor);
    if line > 0 {
        *cursor = index_at(text, line - 1, column);
    }
}

pub fn move_down(text: &str, cursor: &mut usize) {
    let (line, column) = line_and_column(text, *cursor);
    if line + 1 < text.split('\n').count() {
        *cursor = index_at(text, line + 1, column);
    }
}

/// Terminal cell offset (x, y) of the cursor relative to the text origin.
pub fn display_position(text: &str, cursor: usize) -> (u16, u16) {
    let before: String = text.chars().take(cursor).collect();
    let row = before.matches('\n').count();
    let current = before.rsplit('\n').next().unwrap_or("");
    (
        u16::try_from(current.width()).unwrap_or(u16::MAX),
        u16::try_from(row).unwrap_or(u16::MAX),
    )
}
