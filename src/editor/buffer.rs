use std::fmt;

use ropey::Rope;

use crate::format::{EditSurface, Selection};

/// Cursor movement directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// A rope-backed editable text buffer with selection state.
///
/// The selection is an anchor/head pair of character offsets: the head is
/// where the cursor sits, the anchor is where a Shift-extended selection
/// started. `anchor == head` is a plain caret. Vertical movement remembers
/// the column it started from (`col_memory`) so the cursor snaps back out of
/// short lines.
pub struct EditorBuffer {
    rope: Rope,
    anchor: usize,
    head: usize,
    col_memory: usize,
    focus_requested: bool,
}

impl Default for EditorBuffer {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for EditorBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditorBuffer")
            .field("len_chars", &self.rope.len_chars())
            .field("anchor", &self.anchor)
            .field("head", &self.head)
            .finish_non_exhaustive()
    }
}

impl EditorBuffer {
    pub fn empty() -> Self {
        Self {
            rope: Rope::new(),
            anchor: 0,
            head: 0,
            col_memory: 0,
            focus_requested: false,
        }
    }

    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            anchor: 0,
            head: 0,
            col_memory: 0,
            focus_requested: false,
        }
    }

    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// The cursor end of the selection.
    pub const fn head(&self) -> usize {
        self.head
    }

    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Contents of one line, without its trailing newline.
    pub fn line_at(&self, line: usize) -> String {
        if line >= self.rope.len_lines() {
            return String::new();
        }
        let mut s = self.rope.line(line).to_string();
        while s.ends_with('\n') || s.ends_with('\r') {
            s.pop();
        }
        s
    }

    /// Character length of one line, excluding its trailing newline.
    pub fn line_len(&self, line: usize) -> usize {
        if line >= self.rope.len_lines() {
            return 0;
        }
        let slice = self.rope.line(line);
        let mut len = slice.len_chars();
        while len > 0 {
            let c = slice.char(len - 1);
            if c == '\n' || c == '\r' {
                len -= 1;
            } else {
                break;
            }
        }
        len
    }

    /// `(line, column)` of a character offset.
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.rope.len_chars());
        let line = self.rope.char_to_line(offset);
        (line, offset - self.rope.line_to_char(line))
    }

    /// Character offset of `(line, col)`, clamped to the buffer.
    pub fn offset_at(&self, line: usize, col: usize) -> usize {
        let line = line.min(self.rope.len_lines().saturating_sub(1));
        self.rope.line_to_char(line) + col.min(self.line_len(line))
    }

    /// `(line, column)` of the cursor.
    pub fn head_line_col(&self) -> (usize, usize) {
        self.line_col(self.head)
    }

    pub fn selected_text(&self) -> String {
        let sel = self.selection();
        self.rope.slice(sel.start..sel.end).to_string()
    }

    /// Consume a pending focus request, if one was made.
    pub const fn take_focus_request(&mut self) -> bool {
        let requested = self.focus_requested;
        self.focus_requested = false;
        requested
    }

    // --- Editing ---

    pub fn insert_char(&mut self, c: char) {
        self.delete_selection();
        self.rope.insert_char(self.head, c);
        self.place_caret(self.head + 1);
    }

    pub fn insert_str(&mut self, s: &str) {
        self.delete_selection();
        self.rope.insert(self.head, s);
        self.place_caret(self.head + s.chars().count());
    }

    pub fn split_line(&mut self) {
        self.insert_char('\n');
    }

    /// Backspace. Returns whether anything was deleted.
    pub fn delete_back(&mut self) -> bool {
        if self.delete_selection() {
            return true;
        }
        if self.head == 0 {
            return false;
        }
        self.rope.remove(self.head - 1..self.head);
        self.place_caret(self.head - 1);
        true
    }

    /// Forward delete. Returns whether anything was deleted.
    pub fn delete_forward(&mut self) -> bool {
        if self.delete_selection() {
            return true;
        }
        if self.head >= self.rope.len_chars() {
            return false;
        }
        self.rope.remove(self.head..=self.head);
        self.place_caret(self.head);
        true
    }

    // --- Movement ---

    pub fn move_cursor(&mut self, dir: Direction, extend: bool) {
        match dir {
            Direction::Left => {
                let sel = self.selection();
                if !extend && !sel.is_empty() {
                    // Collapse to the left edge instead of moving.
                    self.place_caret(sel.start);
                } else {
                    self.set_head(self.head.saturating_sub(1), extend);
                }
                self.col_memory = self.line_col(self.head).1;
            }
            Direction::Right => {
                let sel = self.selection();
                if !extend && !sel.is_empty() {
                    self.place_caret(sel.end);
                } else {
                    self.set_head((self.head + 1).min(self.rope.len_chars()), extend);
                }
                self.col_memory = self.line_col(self.head).1;
            }
            Direction::Up | Direction::Down => self.move_vertical(dir, extend),
        }
    }

    fn move_vertical(&mut self, dir: Direction, extend: bool) {
        let (line, _) = self.line_col(self.head);
        let target_line = match dir {
            Direction::Up => {
                if line == 0 {
                    self.set_head(0, extend);
                    return;
                }
                line - 1
            }
            Direction::Down => {
                if line + 1 >= self.rope.len_lines() {
                    self.set_head(self.rope.len_chars(), extend);
                    return;
                }
                line + 1
            }
            Direction::Left | Direction::Right => unreachable!(),
        };
        // col_memory is deliberately untouched here: passing through a short
        // line keeps the original column for the next vertical step.
        let col = self.col_memory.min(self.line_len(target_line));
        self.set_head(self.rope.line_to_char(target_line) + col, extend);
    }

    pub fn move_home(&mut self, extend: bool) {
        let (line, _) = self.line_col(self.head);
        self.set_head(self.rope.line_to_char(line), extend);
        self.col_memory = 0;
    }

    pub fn move_end(&mut self, extend: bool) {
        let (line, _) = self.line_col(self.head);
        self.set_head(self.rope.line_to_char(line) + self.line_len(line), extend);
        self.col_memory = self.line_col(self.head).1;
    }

    pub fn move_to_start(&mut self, extend: bool) {
        self.set_head(0, extend);
        self.col_memory = 0;
    }

    pub fn move_to_end(&mut self, extend: bool) {
        self.set_head(self.rope.len_chars(), extend);
        self.col_memory = self.line_col(self.head).1;
    }

    /// Place the cursor at `(line, col)`, as from a mouse click.
    pub fn move_to(&mut self, line: usize, col: usize, extend: bool) {
        self.set_head(self.offset_at(line, col), extend);
        self.col_memory = self.line_col(self.head).1;
    }

    pub fn move_word_left(&mut self, extend: bool) {
        let chars: Vec<char> = self.rope.chars().collect();
        let mut pos = self.head;
        while pos > 0 && !is_word_char(chars[pos - 1]) && chars[pos - 1] != '\n' {
            pos -= 1;
        }
        let before_words = pos;
        while pos > 0 && is_word_char(chars[pos - 1]) {
            pos -= 1;
        }
        if pos == self.head && before_words == self.head {
            // Stuck against punctuation or a newline; step over it.
            pos = pos.saturating_sub(1);
        }
        self.set_head(pos, extend);
        self.col_memory = self.line_col(self.head).1;
    }

    pub fn move_word_right(&mut self, extend: bool) {
        let chars: Vec<char> = self.rope.chars().collect();
        let len = chars.len();
        let mut pos = self.head;
        while pos < len && is_word_char(chars[pos]) {
            pos += 1;
        }
        while pos < len && !is_word_char(chars[pos]) {
            pos += 1;
        }
        self.set_head(pos, extend);
        self.col_memory = self.line_col(self.head).1;
    }

    // --- Internals ---

    /// Delete the selected range, if any. Returns whether text was removed.
    fn delete_selection(&mut self) -> bool {
        let sel = self.selection();
        if sel.is_empty() {
            return false;
        }
        self.rope.remove(sel.start..sel.end);
        self.place_caret(sel.start);
        true
    }

    fn place_caret(&mut self, offset: usize) {
        let offset = offset.min(self.rope.len_chars());
        self.anchor = offset;
        self.head = offset;
        self.col_memory = self.line_col(offset).1;
    }

    fn set_head(&mut self, offset: usize, extend: bool) {
        self.head = offset.min(self.rope.len_chars());
        if !extend {
            self.anchor = self.head;
        }
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

impl EditSurface for EditorBuffer {
    fn text(&self) -> String {
        self.rope.to_string()
    }

    fn selection(&self) -> Selection {
        Selection::new(self.anchor, self.head)
    }

    fn set_selection(&mut self, selection: Selection) {
        let sel = selection.clamped(self.rope.len_chars());
        self.anchor = sel.start;
        self.head = sel.end;
        self.col_memory = self.line_col(self.head).1;
    }

    fn replace(&mut self, text: String) {
        self.rope = Rope::from_str(&text);
        // A content swap collapses the caret to the end of the new text.
        self.place_caret(self.rope.len_chars());
    }

    fn request_focus(&mut self) {
        self.focus_requested = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{FormatOp, dispatch};

    fn buf(text: &str) -> EditorBuffer {
        EditorBuffer::from_text(text)
    }

    // --- Construction and queries ---

    #[test]
    fn test_empty_buffer() {
        let b = EditorBuffer::empty();
        assert_eq!(b.len_chars(), 0);
        assert_eq!(b.selection(), Selection::caret(0));
        assert_eq!(b.line_count(), 1);
    }

    #[test]
    fn test_from_text_starts_at_origin() {
        let b = buf("hello\nworld");
        assert_eq!(b.len_chars(), 11);
        assert_eq!(b.head_line_col(), (0, 0));
    }

    #[test]
    fn test_line_at_strips_newline() {
        let b = buf("one\ntwo\n");
        assert_eq!(b.line_at(0), "one");
        assert_eq!(b.line_at(1), "two");
        assert_eq!(b.line_at(2), "");
    }

    #[test]
    fn test_line_len_excludes_newline() {
        let b = buf("abc\nde");
        assert_eq!(b.line_len(0), 3);
        assert_eq!(b.line_len(1), 2);
    }

    #[test]
    fn test_line_col_round_trip() {
        let b = buf("ab\ncde\nf");
        assert_eq!(b.line_col(4), (1, 1));
        assert_eq!(b.offset_at(1, 1), 4);
    }

    #[test]
    fn test_offset_at_clamps_column() {
        let b = buf("ab\ncde");
        assert_eq!(b.offset_at(0, 99), 2);
        assert_eq!(b.offset_at(99, 0), 3);
    }

    // --- Insertion ---

    #[test]
    fn test_insert_char_advances_caret() {
        let mut b = buf("ac");
        b.move_cursor(Direction::Right, false);
        b.insert_char('b');
        assert_eq!(b.text(), "abc");
        assert_eq!(b.selection(), Selection::caret(2));
    }

    #[test]
    fn test_insert_str_advances_by_char_count() {
        let mut b = buf("");
        b.insert_str("héllo");
        assert_eq!(b.selection(), Selection::caret(5));
    }

    #[test]
    fn test_insert_replaces_selection() {
        let mut b = buf("hello world");
        b.set_selection(Selection::new(0, 5));
        b.insert_char('X');
        assert_eq!(b.text(), "X world");
        assert_eq!(b.selection(), Selection::caret(1));
    }

    #[test]
    fn test_split_line() {
        let mut b = buf("ab");
        b.move_cursor(Direction::Right, false);
        b.split_line();
        assert_eq!(b.text(), "a\nb");
        assert_eq!(b.head_line_col(), (1, 0));
    }

    // --- Deletion ---

    #[test]
    fn test_delete_back() {
        let mut b = buf("ab");
        b.move_to_end(false);
        assert!(b.delete_back());
        assert_eq!(b.text(), "a");
    }

    #[test]
    fn test_delete_back_at_origin_is_noop() {
        let mut b = buf("ab");
        assert!(!b.delete_back());
        assert_eq!(b.text(), "ab");
    }

    #[test]
    fn test_delete_back_joins_lines() {
        let mut b = buf("a\nb");
        b.move_to(1, 0, false);
        assert!(b.delete_back());
        assert_eq!(b.text(), "ab");
        assert_eq!(b.selection(), Selection::caret(1));
    }

    #[test]
    fn test_delete_forward() {
        let mut b = buf("ab");
        assert!(b.delete_forward());
        assert_eq!(b.text(), "b");
        assert_eq!(b.selection(), Selection::caret(0));
    }

    #[test]
    fn test_delete_forward_at_end_is_noop() {
        let mut b = buf("ab");
        b.move_to_end(false);
        assert!(!b.delete_forward());
    }

    #[test]
    fn test_delete_selection_wins_over_direction() {
        let mut b = buf("hello");
        b.set_selection(Selection::new(1, 4));
        assert!(b.delete_forward());
        assert_eq!(b.text(), "ho");
        assert_eq!(b.selection(), Selection::caret(1));
    }

    // --- Horizontal movement ---

    #[test]
    fn test_move_right_and_left() {
        let mut b = buf("ab");
        b.move_cursor(Direction::Right, false);
        assert_eq!(b.head(), 1);
        b.move_cursor(Direction::Left, false);
        assert_eq!(b.head(), 0);
    }

    #[test]
    fn test_move_left_at_origin_stays() {
        let mut b = buf("ab");
        b.move_cursor(Direction::Left, false);
        assert_eq!(b.head(), 0);
    }

    #[test]
    fn test_move_right_at_end_stays() {
        let mut b = buf("ab");
        b.move_to_end(false);
        b.move_cursor(Direction::Right, false);
        assert_eq!(b.head(), 2);
    }

    #[test]
    fn test_move_collapses_selection_to_edge() {
        let mut b = buf("hello");
        b.set_selection(Selection::new(1, 4));
        b.move_cursor(Direction::Left, false);
        assert_eq!(b.selection(), Selection::caret(1));

        b.set_selection(Selection::new(1, 4));
        b.move_cursor(Direction::Right, false);
        assert_eq!(b.selection(), Selection::caret(4));
    }

    #[test]
    fn test_shift_move_extends_selection() {
        let mut b = buf("hello");
        b.move_cursor(Direction::Right, true);
        b.move_cursor(Direction::Right, true);
        assert_eq!(b.selection(), Selection::new(0, 2));
        assert_eq!(b.selected_text(), "he");
    }

    #[test]
    fn test_shift_move_backwards_selects_reversed() {
        let mut b = buf("hello");
        b.move_to_end(false);
        b.move_cursor(Direction::Left, true);
        assert_eq!(b.selection(), Selection::new(4, 5));
        assert_eq!(b.head(), 4);
    }

    // --- Vertical movement ---

    #[test]
    fn test_move_down_keeps_column() {
        let mut b = buf("abcd\nefgh");
        b.move_to(0, 2, false);
        b.move_cursor(Direction::Down, false);
        assert_eq!(b.head_line_col(), (1, 2));
    }

    #[test]
    fn test_sticky_column_through_short_line() {
        let mut b = buf("abcd\nx\nefgh");
        b.move_to(0, 3, false);
        b.move_cursor(Direction::Down, false);
        assert_eq!(b.head_line_col(), (1, 1));
        b.move_cursor(Direction::Down, false);
        assert_eq!(b.head_line_col(), (2, 3));
    }

    #[test]
    fn test_move_up_from_first_line_goes_to_start() {
        let mut b = buf("abc");
        b.move_to(0, 2, false);
        b.move_cursor(Direction::Up, false);
        assert_eq!(b.head(), 0);
    }

    #[test]
    fn test_move_down_from_last_line_goes_to_end() {
        let mut b = buf("abc");
        b.move_cursor(Direction::Down, false);
        assert_eq!(b.head(), 3);
    }

    #[test]
    fn test_horizontal_move_resets_sticky_column() {
        let mut b = buf("abcd\nx\nefgh");
        b.move_to(0, 3, false);
        b.move_cursor(Direction::Down, false);
        b.move_cursor(Direction::Left, false);
        b.move_cursor(Direction::Down, false);
        assert_eq!(b.head_line_col(), (2, 0));
    }

    // --- Home / End / document bounds ---

    #[test]
    fn test_move_home_and_end() {
        let mut b = buf("hello\nworld");
        b.move_to(0, 3, false);
        b.move_end(false);
        assert_eq!(b.head_line_col(), (0, 5));
        b.move_home(false);
        assert_eq!(b.head_line_col(), (0, 0));
    }

    #[test]
    fn test_shift_end_selects_to_line_end() {
        let mut b = buf("hello\nworld");
        b.move_end(true);
        assert_eq!(b.selected_text(), "hello");
    }

    #[test]
    fn test_move_to_document_bounds() {
        let mut b = buf("a\nb\nc");
        b.move_to_end(false);
        assert_eq!(b.head(), 5);
        b.move_to_start(false);
        assert_eq!(b.head(), 0);
    }

    // --- Word movement ---

    #[test]
    fn test_word_right_lands_on_next_word() {
        let mut b = buf("foo bar baz");
        b.move_word_right(false);
        assert_eq!(b.head(), 4);
        b.move_word_right(false);
        assert_eq!(b.head(), 8);
    }

    #[test]
    fn test_word_right_stops_at_end() {
        let mut b = buf("foo");
        b.move_word_right(false);
        b.move_word_right(false);
        assert_eq!(b.head(), 3);
    }

    #[test]
    fn test_word_left_lands_on_word_start() {
        let mut b = buf("foo bar");
        b.move_to_end(false);
        b.move_word_left(false);
        assert_eq!(b.head(), 4);
        b.move_word_left(false);
        assert_eq!(b.head(), 0);
    }

    #[test]
    fn test_word_movement_treats_underscore_as_word() {
        let mut b = buf("foo_bar baz");
        b.move_word_right(false);
        assert_eq!(b.head(), 8);
    }

    #[test]
    fn test_shift_word_right_selects() {
        let mut b = buf("foo bar");
        b.move_word_right(true);
        assert_eq!(b.selected_text(), "foo ");
    }

    // --- EditSurface contract ---

    #[test]
    fn test_replace_collapses_caret_to_end() {
        let mut b = buf("old");
        b.set_selection(Selection::new(0, 3));
        b.replace("brand new".to_string());
        assert_eq!(b.text(), "brand new");
        assert_eq!(b.selection(), Selection::caret(9));
    }

    #[test]
    fn test_set_selection_clamps() {
        let mut b = buf("abc");
        b.set_selection(Selection::new(1, 99));
        assert_eq!(b.selection(), Selection::new(1, 3));
    }

    #[test]
    fn test_request_focus_is_consumed_once() {
        let mut b = buf("");
        b.request_focus();
        assert!(b.take_focus_request());
        assert!(!b.take_focus_request());
    }

    #[test]
    fn test_dispatch_bold_through_buffer() {
        let mut b = buf("hello");
        b.set_selection(Selection::new(0, 5));
        let pending = dispatch(Some(&mut b), &FormatOp::BOLD).expect("surface attached");

        assert_eq!(b.text(), "**hello**");
        assert_eq!(b.selection(), Selection::caret(9));
        assert!(b.take_focus_request());

        b.set_selection(pending);
        assert_eq!(b.selected_text(), "hello");
    }
}
