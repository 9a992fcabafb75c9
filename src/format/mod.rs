//! The markdown formatting engine.
//!
//! Every operation is a pure function of `(buffer, selection, descriptor)`:
//! it takes the full document text plus a character-offset selection and
//! produces a new buffer together with the selection the editing surface
//! should show afterwards. No I/O, no rendering, no hidden state.
//!
//! Offsets are **character** offsets, not bytes. All inputs are clamped to
//! `[0, len_chars]` so the engine is total over arbitrary strings.

mod surface;

pub use surface::{EditSurface, dispatch};

use once_cell::sync::Lazy;
use regex::Regex;

/// Leading ATX heading marker (`# ` through `###### `).
static HEADING_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#{1,6}\s").expect("valid regex"));

/// Existing list marker: `-`/`*`/`+` or `1.` style, with optional indent.
static LIST_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\s*[-*+]\s+|\s*\d+\.\s+)").expect("valid regex"));

/// A selection range in character offsets.
///
/// `start == end` denotes a caret with no selected text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    /// Create a selection, normalizing a reversed range.
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

    /// A caret position with no selected text.
    pub const fn caret(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    /// Whether this is a caret (empty selection).
    pub const fn is_caret(&self) -> bool {
        self.start == self.end
    }

    /// Number of selected characters.
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clamp both offsets into `[0, len]`.
    pub fn clamped(self, len: usize) -> Self {
        let start = self.start.min(len);
        Self {
            start,
            end: self.end.clamp(start, len),
        }
    }
}

/// The result of a formatting operation: the new buffer text and the
/// selection to re-apply once the surface has committed the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub text: String,
    pub selection: Selection,
}

/// Parameters of a single formatting action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatOp {
    /// Surround the selection with a symbol pair.
    Wrap {
        start_symbol: &'static str,
        end_symbol: &'static str,
    },
    /// Set the heading level of the line containing the selection start.
    Heading(u8),
    /// Turn each selected line into a list item.
    List { ordered: bool },
    /// Prefix each selected line with `> `.
    Blockquote,
    /// Insert `[label](url)` link syntax.
    Link,
    /// Insert `![label](url)` image syntax.
    Image,
}

impl FormatOp {
    pub const BOLD: Self = Self::Wrap {
        start_symbol: "**",
        end_symbol: "**",
    };
    pub const ITALIC: Self = Self::Wrap {
        start_symbol: "*",
        end_symbol: "*",
    };
    pub const STRIKETHROUGH: Self = Self::Wrap {
        start_symbol: "~~",
        end_symbol: "~~",
    };
    pub const INLINE_CODE: Self = Self::Wrap {
        start_symbol: "`",
        end_symbol: "`",
    };
    pub const CODE_BLOCK: Self = Self::Wrap {
        start_symbol: "```\n",
        end_symbol: "\n```",
    };
}

/// Apply a formatting operation to `text` at `selection`.
///
/// The selection is clamped to the buffer before the operation runs, so any
/// `(start, end)` pair is accepted.
pub fn apply(text: &str, selection: Selection, op: &FormatOp) -> Edit {
    let sel = selection.clamped(text.chars().count());
    match *op {
        FormatOp::Wrap {
            start_symbol,
            end_symbol,
        } => wrap(text, sel, start_symbol, end_symbol),
        FormatOp::Heading(level) => heading(text, sel, level),
        FormatOp::List { ordered } => list(text, sel, ordered),
        FormatOp::Blockquote => blockquote(text, sel),
        FormatOp::Link => insert_link(text, sel, false),
        FormatOp::Image => insert_link(text, sel, true),
    }
}

/// Byte offset of the character at `char_idx`, or the buffer end.
fn byte_of(text: &str, char_idx: usize) -> usize {
    text.char_indices()
        .nth(char_idx)
        .map_or(text.len(), |(b, _)| b)
}

/// Wrap the selection in a symbol pair (bold, italic, code, ...).
///
/// With a non-empty selection the new selection re-covers exactly the
/// originally selected text, shifted right by the start symbol — the symbols
/// themselves stay outside it. With a caret the symbols are inserted
/// back-to-back and the caret lands between them.
///
/// There is no detection of existing symbols: applying bold twice yields
/// `****text****`.
fn wrap(text: &str, sel: Selection, start_symbol: &str, end_symbol: &str) -> Edit {
    let b_start = byte_of(text, sel.start);
    let shift = start_symbol.chars().count();

    if sel.is_caret() {
        let out = format!(
            "{}{start_symbol}{end_symbol}{}",
            &text[..b_start],
            &text[b_start..]
        );
        return Edit {
            text: out,
            selection: Selection::caret(sel.start + shift),
        };
    }

    let b_end = byte_of(text, sel.end);
    let out = format!(
        "{}{start_symbol}{}{end_symbol}{}",
        &text[..b_start],
        &text[b_start..b_end],
        &text[b_end..]
    );
    Edit {
        text: out,
        selection: Selection::new(sel.start + shift, sel.end + shift),
    }
}

/// Set the heading level of the line containing the selection start.
///
/// An existing heading marker is replaced, not stacked: re-applying with a
/// different level swaps the marker. Only the line containing `start`
/// changes; the selection end plays no part in line-boundary detection. The
/// caret lands at the end of the modified line.
fn heading(text: &str, sel: Selection, level: u8) -> Edit {
    let level = usize::from(level.clamp(1, 6));
    let b_start = byte_of(text, sel.start);
    let line_start_b = text[..b_start].rfind('\n').map_or(0, |i| i + 1);
    let line_end_b = text[line_start_b..]
        .find('\n')
        .map_or(text.len(), |i| line_start_b + i);
    let full_line = &text[line_start_b..line_end_b];
    let stripped = HEADING_MARKER.replace(full_line, "");
    let prefix = format!("{} ", "#".repeat(level));

    // The tail resumes at the selection end or the line end, whichever is
    // later: a selection reaching past the line end drops the overhang.
    let tail_b = byte_of(text, sel.end).max(line_end_b);
    let out = format!(
        "{}{prefix}{stripped}{}",
        &text[..line_start_b],
        &text[tail_b..]
    );

    let line_start_c = text[..line_start_b].chars().count();
    let caret = line_start_c + prefix.chars().count() + stripped.chars().count();
    Edit {
        text: out,
        selection: Selection::caret(caret),
    }
}

/// Turn each non-blank selected line into a list item.
///
/// Existing list markers are stripped first so re-applying converts between
/// ordered and unordered forms instead of nesting markers. Ordered numbering
/// restarts at 1 for each invocation and counts lines by their position in
/// the selection, blank lines included.
fn list(text: &str, sel: Selection, ordered: bool) -> Edit {
    reformat_lines(text, sel, |idx, line| {
        let cleaned = LIST_MARKER.replace(line, "");
        if ordered {
            format!("{}. {cleaned}", idx + 1)
        } else {
            format!("- {cleaned}")
        }
    })
}

/// Prefix each non-blank selected line with `> `.
///
/// Unlike wrap and list, this is idempotent: lines already quoted are left
/// alone.
fn blockquote(text: &str, sel: Selection) -> Edit {
    reformat_lines(text, sel, |_, line| {
        if line.starts_with("> ") {
            line.to_string()
        } else {
            format!("> {line}")
        }
    })
}

/// Shared shape of the block-scoped operations: split the selection into
/// lines, rewrite each non-blank line, splice the block back, and select the
/// reformatted block.
fn reformat_lines(text: &str, sel: Selection, rewrite: impl Fn(usize, &str) -> String) -> Edit {
    let b_start = byte_of(text, sel.start);
    let b_end = byte_of(text, sel.end);
    let formatted = text[b_start..b_end]
        .split('\n')
        .enumerate()
        .map(|(idx, line)| {
            if line.trim().is_empty() {
                line.to_string()
            } else {
                rewrite(idx, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n");

    let new_end = sel.start + formatted.chars().count();
    let out = format!("{}{formatted}{}", &text[..b_start], &text[b_end..]);
    Edit {
        text: out,
        selection: Selection::new(sel.start, new_end),
    }
}

/// Insert link or image syntax at the selection.
///
/// The selected text becomes the label (falling back to a placeholder), and
/// the new selection covers exactly the three characters of the literal
/// `url` placeholder so it can be overtyped immediately.
fn insert_link(text: &str, sel: Selection, image: bool) -> Edit {
    let b_start = byte_of(text, sel.start);
    let b_end = byte_of(text, sel.end);
    let selected = &text[b_start..b_end];

    let (open, placeholder) = if image {
        ("![", "alt text")
    } else {
        ("[", "link text")
    };
    let label = if selected.is_empty() {
        placeholder
    } else {
        selected
    };

    let out = format!("{}{open}{label}](url){}", &text[..b_start], &text[b_end..]);
    // `open` + label + "](" puts us on the first char of "url".
    let url_start = sel.start + open.chars().count() + label.chars().count() + 2;
    Edit {
        text: out,
        selection: Selection::new(url_start, url_start + 3),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn bold(text: &str, start: usize, end: usize) -> Edit {
        apply(text, Selection::new(start, end), &FormatOp::BOLD)
    }

    // --- Selection ---

    #[test]
    fn test_selection_normalizes_reversed_range() {
        let sel = Selection::new(5, 2);
        assert_eq!(sel, Selection { start: 2, end: 5 });
    }

    #[test]
    fn test_selection_clamps_to_buffer() {
        let sel = Selection::new(3, 99).clamped(5);
        assert_eq!(sel, Selection { start: 3, end: 5 });
        let sel = Selection::new(99, 120).clamped(5);
        assert_eq!(sel, Selection { start: 5, end: 5 });
    }

    // --- Wrap: non-empty selection ---

    #[test]
    fn test_wrap_bold_selection() {
        let edit = bold("hello world", 0, 5);
        assert_eq!(edit.text, "**hello** world");
        assert_eq!(edit.selection, Selection::new(2, 7));
    }

    #[test]
    fn test_wrap_selection_recovers_original_text() {
        let text = "one two three";
        let edit = bold(text, 4, 7);
        let covered: String = edit
            .text
            .chars()
            .skip(edit.selection.start)
            .take(edit.selection.len())
            .collect();
        assert_eq!(covered, "two");
    }

    #[test]
    fn test_wrap_grows_buffer_by_symbol_lengths() {
        let edit = bold("hello", 1, 4);
        assert_eq!(edit.text.chars().count(), 5 + 4);
    }

    #[test]
    fn test_wrap_italic_mid_buffer() {
        let edit = apply("ab cd ef", Selection::new(3, 5), &FormatOp::ITALIC);
        assert_eq!(edit.text, "ab *cd* ef");
        assert_eq!(edit.selection, Selection::new(4, 6));
    }

    #[test]
    fn test_wrap_is_not_idempotent() {
        let first = bold("text", 0, 4);
        let second = bold(&first.text, first.selection.start, first.selection.end);
        assert_eq!(second.text, "****text****");
    }

    // --- Wrap: caret ---

    #[test]
    fn test_wrap_caret_inserts_symbol_pair() {
        let edit = bold("hello", 2, 2);
        assert_eq!(edit.text, "he****llo");
        assert_eq!(edit.selection, Selection::caret(4));
    }

    #[test]
    fn test_wrap_caret_at_buffer_end() {
        let edit = apply("hi", Selection::caret(2), &FormatOp::INLINE_CODE);
        assert_eq!(edit.text, "hi``");
        assert_eq!(edit.selection, Selection::caret(3));
    }

    #[test]
    fn test_wrap_code_block_caret() {
        let edit = apply("before", Selection::caret(6), &FormatOp::CODE_BLOCK);
        assert_eq!(edit.text, "before```\n\n```");
        // Caret between the fences, after "```\n".
        assert_eq!(edit.selection, Selection::caret(10));
    }

    #[test]
    fn test_wrap_code_block_selection() {
        let edit = apply("let x = 1;", Selection::new(0, 10), &FormatOp::CODE_BLOCK);
        assert_eq!(edit.text, "```\nlet x = 1;\n```");
        assert_eq!(edit.selection, Selection::new(4, 14));
    }

    #[test]
    fn test_wrap_multibyte_text() {
        let edit = apply("café au lait", Selection::new(0, 4), &FormatOp::BOLD);
        assert_eq!(edit.text, "**café** au lait");
        assert_eq!(edit.selection, Selection::new(2, 6));
    }

    #[test]
    fn test_wrap_out_of_range_selection_clamps() {
        let edit = bold("abc", 1, 99);
        assert_eq!(edit.text, "a**bc**");
        assert_eq!(edit.selection, Selection::new(3, 5));
    }

    // --- Heading ---

    fn head(text: &str, pos: usize, level: u8) -> Edit {
        apply(text, Selection::caret(pos), &FormatOp::Heading(level))
    }

    #[test]
    fn test_heading_plain_line() {
        let edit = head("Hello", 0, 2);
        assert_eq!(edit.text, "## Hello");
        assert_eq!(edit.selection, Selection::caret(8));
    }

    #[test]
    fn test_heading_caret_mid_line() {
        let edit = head("Hello", 3, 1);
        assert_eq!(edit.text, "# Hello");
        assert_eq!(edit.selection, Selection::caret(7));
    }

    #[test]
    fn test_heading_replaces_existing_marker() {
        let edit = head("## Hello", 4, 3);
        assert_eq!(edit.text, "### Hello");
        assert_eq!(edit.selection, Selection::caret(9));
    }

    #[test]
    fn test_heading_second_line() {
        let edit = head("first\nsecond\nthird", 8, 2);
        assert_eq!(edit.text, "first\n## second\nthird");
    }

    #[test]
    fn test_heading_caret_lands_at_line_end() {
        let edit = head("a\nbc\nd", 2, 1);
        assert_eq!(edit.text, "a\n# bc\nd");
        // End of "# bc" = 2 (before line) + 2 (prefix) + 2 (content)
        assert_eq!(edit.selection, Selection::caret(6));
    }

    #[test]
    fn test_heading_level_clamped() {
        let edit = head("x", 0, 9);
        assert_eq!(edit.text, "###### x");
        let edit = head("x", 0, 0);
        assert_eq!(edit.text, "# x");
    }

    #[test]
    fn test_heading_selection_past_line_end_drops_overhang() {
        // A selection reaching into the next line loses the text between the
        // line end and the selection end. Pinned behavior, not a typo.
        let edit = apply("Hello\nworld", Selection::new(0, 8), &FormatOp::Heading(1));
        assert_eq!(edit.text, "# Hellorld");
    }

    #[test]
    fn test_heading_does_not_strip_seven_hashes() {
        // Seven hashes is not a heading; the marker stays and gets prefixed.
        let edit = head("####### x", 0, 1);
        assert_eq!(edit.text, "# ####### x");
    }

    #[test]
    fn test_heading_multibyte_line() {
        let edit = head("héllo", 0, 2);
        assert_eq!(edit.text, "## héllo");
        assert_eq!(edit.selection, Selection::caret(8));
    }

    // --- List ---

    fn as_list(text: &str, start: usize, end: usize, ordered: bool) -> Edit {
        apply(text, Selection::new(start, end), &FormatOp::List { ordered })
    }

    #[test]
    fn test_ordered_list_numbers_lines() {
        let edit = as_list("a\nb\nc", 0, 5, true);
        assert_eq!(edit.text, "1. a\n2. b\n3. c");
        assert_eq!(edit.selection, Selection::new(0, 14));
    }

    #[test]
    fn test_unordered_list_prefixes_lines() {
        let edit = as_list("a\nb", 0, 3, false);
        assert_eq!(edit.text, "- a\n- b");
    }

    #[test]
    fn test_list_skips_blank_lines_but_counts_them() {
        // Numbering follows line position within the selection, so the blank
        // line keeps its slot.
        let edit = as_list("a\n\nb", 0, 4, true);
        assert_eq!(edit.text, "1. a\n\n3. b");
    }

    #[test]
    fn test_list_strips_existing_unordered_markers() {
        let edit = as_list("- a\n* b\n+ c", 0, 11, true);
        assert_eq!(edit.text, "1. a\n2. b\n3. c");
    }

    #[test]
    fn test_list_strips_existing_ordered_markers() {
        let edit = as_list("1. a\n2. b", 0, 9, false);
        assert_eq!(edit.text, "- a\n- b");
    }

    #[test]
    fn test_list_strips_indented_markers() {
        let edit = as_list("  - a", 0, 5, true);
        assert_eq!(edit.text, "1. a");
    }

    #[test]
    fn test_list_splices_into_surrounding_text() {
        let edit = as_list("pre\na\nb\npost", 4, 7, true);
        assert_eq!(edit.text, "pre\n1. a\n2. b\npost");
        assert_eq!(edit.selection, Selection::new(4, 13));
    }

    #[test]
    fn test_list_numbering_restarts_each_invocation() {
        let first = as_list("a\nb", 0, 3, true);
        // Reformatting the same block renumbers from 1, it never continues.
        let again = as_list(
            &first.text,
            first.selection.start,
            first.selection.end,
            true,
        );
        assert_eq!(again.text, "1. a\n2. b");
    }

    // --- Blockquote ---

    fn quote(text: &str, start: usize, end: usize) -> Edit {
        apply(text, Selection::new(start, end), &FormatOp::Blockquote)
    }

    #[test]
    fn test_blockquote_prefixes_lines() {
        let edit = quote("a\nb", 0, 3);
        assert_eq!(edit.text, "> a\n> b");
        assert_eq!(edit.selection, Selection::new(0, 7));
    }

    #[test]
    fn test_blockquote_is_idempotent() {
        let first = quote("line", 0, 4);
        let second = quote(&first.text, first.selection.start, first.selection.end);
        assert_eq!(second.text, "> line");
    }

    #[test]
    fn test_blockquote_leaves_blank_lines() {
        let edit = quote("a\n\nb", 0, 4);
        assert_eq!(edit.text, "> a\n\n> b");
    }

    #[test]
    fn test_blockquote_mixed_quoted_and_plain() {
        let edit = quote("> a\nb", 0, 5);
        assert_eq!(edit.text, "> a\n> b");
    }

    // --- Link / image ---

    #[test]
    fn test_link_with_selection_uses_it_as_label() {
        let edit = apply("see docs here", Selection::new(4, 8), &FormatOp::Link);
        assert_eq!(edit.text, "see [docs](url) here");
        // "see [docs](" is 11 chars; "url" covers 11..14.
        assert_eq!(edit.selection, Selection::new(11, 14));
    }

    #[test]
    fn test_link_caret_inserts_placeholder_label() {
        let edit = apply("", Selection::caret(0), &FormatOp::Link);
        assert_eq!(edit.text, "[link text](url)");
        assert_eq!(edit.selection, Selection::new(12, 15));
    }

    #[test]
    fn test_link_selection_covers_url_exactly() {
        let edit = apply("x", Selection::caret(1), &FormatOp::Link);
        let covered: String = edit
            .text
            .chars()
            .skip(edit.selection.start)
            .take(edit.selection.len())
            .collect();
        assert_eq!(covered, "url");
    }

    #[test]
    fn test_image_caret_inserts_placeholder_alt() {
        let edit = apply("", Selection::caret(0), &FormatOp::Image);
        assert_eq!(edit.text, "![alt text](url)");
        assert_eq!(edit.selection, Selection::new(12, 15));
    }

    #[test]
    fn test_image_with_selection() {
        let edit = apply("logo", Selection::new(0, 4), &FormatOp::Image);
        assert_eq!(edit.text, "![logo](url)");
        assert_eq!(edit.selection, Selection::new(8, 11));
    }

    #[test]
    fn test_image_multibyte_label_offsets() {
        let edit = apply("héllo", Selection::new(0, 5), &FormatOp::Image);
        assert_eq!(edit.text, "![héllo](url)");
        let covered: String = edit
            .text
            .chars()
            .skip(edit.selection.start)
            .take(edit.selection.len())
            .collect();
        assert_eq!(covered, "url");
    }

    // --- Determinism / invariants ---

    #[test]
    fn test_apply_is_deterministic() {
        let sel = Selection::new(2, 6);
        let a = apply("some text here", sel, &FormatOp::STRIKETHROUGH);
        let b = apply("some text here", sel, &FormatOp::STRIKETHROUGH);
        assert_eq!(a, b);
    }

    #[test]
    fn test_all_ops_keep_selection_in_bounds() {
        let ops = [
            FormatOp::BOLD,
            FormatOp::CODE_BLOCK,
            FormatOp::Heading(3),
            FormatOp::List { ordered: true },
            FormatOp::Blockquote,
            FormatOp::Link,
            FormatOp::Image,
        ];
        for op in &ops {
            for (start, end) in [(0, 0), (0, 11), (5, 5), (3, 99), (99, 99)] {
                let edit = apply("hello\nworld", Selection::new(start, end), op);
                let len = edit.text.chars().count();
                assert!(
                    edit.selection.start <= edit.selection.end && edit.selection.end <= len,
                    "{op:?} produced out-of-range selection {:?} for buffer of {len}",
                    edit.selection
                );
            }
        }
    }

    proptest! {
        #[test]
        fn prop_wrap_bold_shifts_selection_and_preserves_text(
            text in "\\PC{0,40}",
            a in 0usize..40,
            b in 0usize..40,
        ) {
            let len = text.chars().count();
            let sel = Selection::new(a.min(len), b.min(len));
            let edit = apply(&text, sel, &FormatOp::BOLD);

            prop_assert_eq!(edit.text.chars().count(), len + 4);
            if sel.is_caret() {
                prop_assert_eq!(edit.selection, Selection::caret(sel.start + 2));
            } else {
                prop_assert_eq!(
                    edit.selection,
                    Selection::new(sel.start + 2, sel.end + 2)
                );
                let original: String = text
                    .chars()
                    .skip(sel.start)
                    .take(sel.len())
                    .collect();
                let covered: String = edit
                    .text
                    .chars()
                    .skip(edit.selection.start)
                    .take(edit.selection.len())
                    .collect();
                prop_assert_eq!(covered, original);
            }
        }

        #[test]
        fn prop_selection_always_in_bounds_after_heading(
            text in "\\PC{0,30}(\n\\PC{0,30}){0,3}",
            pos in 0usize..60,
            level in 1u8..=6,
        ) {
            let edit = apply(&text, Selection::caret(pos), &FormatOp::Heading(level));
            prop_assert!(edit.selection.end <= edit.text.chars().count());
        }
    }
}
