//! Markdown rendering with comrak.

use anyhow::Result;
use comrak::nodes::{AstNode, NodeValue, TableAlignment};
use comrak::{Arena, Options, parse_document};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::types::{InlineSpan, InlineStyle, LineType, Preview, RenderedLine};

/// Render markdown source into preview lines wrapped to `width`.
pub fn render(source: &str, width: u16) -> Result<Preview> {
    let arena = Arena::new();
    let options = create_options();
    let root = parse_document(&arena, source, &options);

    let wrap_width = usize::from(width.max(1));
    let mut lines = Vec::new();
    walk(root, &mut lines, 0, wrap_width, None);

    // Trim the trailing blank that block renderers leave behind.
    while lines
        .last()
        .is_some_and(|l| matches!(l.line_type(), LineType::Empty))
    {
        lines.pop();
    }

    Ok(Preview::new(lines))
}

fn create_options() -> Options {
    let mut options = Options::default();

    // GFM extensions
    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;

    options
}

fn walk<'a>(
    node: &'a AstNode<'a>,
    lines: &mut Vec<RenderedLine>,
    depth: usize,
    wrap_width: usize,
    list_marker: Option<String>,
) {
    match &node.data.borrow().value {
        NodeValue::Document => {
            for child in node.children() {
                walk(child, lines, depth, wrap_width, list_marker.clone());
            }
        }

        NodeValue::Heading(heading) => {
            let text = extract_text(node);
            if !lines.is_empty() {
                ensure_trailing_empty_line(lines);
            }
            let prefix = "#".repeat(usize::from(heading.level));
            lines.push(RenderedLine::new(
                format!("{prefix} {text}"),
                LineType::Heading(heading.level),
            ));
            lines.push(RenderedLine::new(String::new(), LineType::Empty));
        }

        NodeValue::Paragraph => {
            let spans = collect_inline_spans(node);
            let wrapped = wrap_spans(&spans, wrap_width, "", "");
            for line_spans in wrapped {
                let content = spans_to_string(&line_spans);
                lines.push(RenderedLine::with_spans(
                    content,
                    LineType::Paragraph,
                    line_spans,
                ));
            }
            lines.push(RenderedLine::new(String::new(), LineType::Empty));
        }

        NodeValue::CodeBlock(code_block) => {
            let language = code_block
                .info
                .split_whitespace()
                .next()
                .filter(|s| !s.is_empty())
                .unwrap_or("code");
            lines.push(RenderedLine::new(
                format!("┌ {language}"),
                LineType::CodeBlock,
            ));
            for raw_line in code_block.literal.lines() {
                let style = InlineStyle {
                    code: true,
                    ..InlineStyle::default()
                };
                let visible = truncate_text(raw_line, wrap_width.saturating_sub(2).max(1));
                let spans = vec![
                    InlineSpan::new("│ ".to_string(), InlineStyle::default()),
                    InlineSpan::new(visible.clone(), style),
                ];
                lines.push(RenderedLine::with_spans(
                    format!("│ {visible}"),
                    LineType::CodeBlock,
                    spans,
                ));
            }
            lines.push(RenderedLine::new("└".to_string(), LineType::CodeBlock));
            lines.push(RenderedLine::new(String::new(), LineType::Empty));
        }

        NodeValue::List(list) => {
            let list_depth = depth + 1;
            for (index, child) in node.children().enumerate() {
                let marker = match list.list_type {
                    comrak::nodes::ListType::Bullet => "• ".to_string(),
                    comrak::nodes::ListType::Ordered => format!("{}. ", list.start + index),
                };
                walk(child, lines, list_depth, wrap_width, Some(marker));
            }
            if depth == 0 {
                lines.push(RenderedLine::new(String::new(), LineType::Empty));
            }
        }

        NodeValue::Item(_) | NodeValue::TaskItem(_) => {
            render_list_item(node, lines, depth, wrap_width, list_marker);
        }

        NodeValue::BlockQuote => {
            render_blockquote(node, lines, wrap_width, 1);
            lines.push(RenderedLine::new(String::new(), LineType::Empty));
        }

        NodeValue::ThematicBreak => {
            lines.push(RenderedLine::new(
                "─".repeat(wrap_width.min(40)),
                LineType::HorizontalRule,
            ));
            lines.push(RenderedLine::new(String::new(), LineType::Empty));
        }

        NodeValue::Table(_) => {
            for line in render_table(node, wrap_width) {
                lines.push(RenderedLine::new(line, LineType::Table));
            }
            lines.push(RenderedLine::new(String::new(), LineType::Empty));
        }

        NodeValue::Image(image) => {
            let alt = extract_text(node);
            let label = if alt.is_empty() { &image.url } else { &alt };
            lines.push(RenderedLine::new(
                format!("[Image: {label}]"),
                LineType::Image,
            ));
        }

        _ => {
            for child in node.children() {
                walk(child, lines, depth, wrap_width, list_marker.clone());
            }
        }
    }
}

fn render_list_item<'a>(
    node: &'a AstNode<'a>,
    lines: &mut Vec<RenderedLine>,
    depth: usize,
    wrap_width: usize,
    list_marker: Option<String>,
) {
    let indent = "  ".repeat(depth.saturating_sub(1));
    let marker = task_marker(node).map_or_else(
        || list_marker.unwrap_or_else(|| "• ".to_string()),
        |m| format!("{m} "),
    );
    let prefix_first = format!("{indent}{marker}");
    let prefix_next = format!("{indent}{}", " ".repeat(marker.chars().count()));
    let mut rendered_any = false;

    for child in node.children() {
        match &child.data.borrow().value {
            NodeValue::Paragraph => {
                let spans = collect_inline_spans(child);
                let prefix = if rendered_any {
                    &prefix_next
                } else {
                    &prefix_first
                };
                for line_spans in wrap_spans(&spans, wrap_width, prefix, &prefix_next) {
                    let content = spans_to_string(&line_spans);
                    lines.push(RenderedLine::with_spans(
                        content,
                        LineType::ListItem(depth),
                        line_spans,
                    ));
                }
                rendered_any = true;
            }
            NodeValue::List(_) => {
                walk(child, lines, depth, wrap_width, None);
            }
            _ => {
                walk(child, lines, depth, wrap_width, None);
            }
        }
    }

    if !rendered_any {
        let spans = collect_inline_spans(node);
        for line_spans in wrap_spans(&spans, wrap_width, &prefix_first, &prefix_next) {
            let content = spans_to_string(&line_spans);
            lines.push(RenderedLine::with_spans(
                content,
                LineType::ListItem(depth),
                line_spans,
            ));
        }
    }
}

fn render_blockquote<'a>(
    node: &'a AstNode<'a>,
    lines: &mut Vec<RenderedLine>,
    wrap_width: usize,
    quote_depth: usize,
) {
    let prefix = "│ ".repeat(quote_depth);

    for child in node.children() {
        match &child.data.borrow().value {
            NodeValue::Paragraph => {
                let spans = collect_inline_spans(child);
                for line_spans in wrap_spans(&spans, wrap_width, &prefix, &prefix) {
                    let content = spans_to_string(&line_spans);
                    lines.push(RenderedLine::with_spans(
                        content,
                        LineType::BlockQuote,
                        line_spans,
                    ));
                }
            }
            NodeValue::BlockQuote => {
                render_blockquote(child, lines, wrap_width, quote_depth + 1);
            }
            _ => {
                for raw_line in extract_text(child).lines() {
                    lines.push(RenderedLine::new(
                        format!("{prefix}{raw_line}"),
                        LineType::BlockQuote,
                    ));
                }
            }
        }
    }
}

fn task_marker<'a>(node: &'a AstNode<'a>) -> Option<&'static str> {
    match &node.data.borrow().value {
        NodeValue::TaskItem(symbol) => Some(if symbol.is_some() { "✓" } else { "□" }),
        _ => None,
    }
}

fn ensure_trailing_empty_line(lines: &mut Vec<RenderedLine>) {
    if !lines
        .last()
        .is_some_and(|l| matches!(l.line_type(), LineType::Empty))
    {
        lines.push(RenderedLine::new(String::new(), LineType::Empty));
    }
}

// --- Tables ---

fn render_table<'a>(table_node: &'a AstNode<'a>, wrap_width: usize) -> Vec<String> {
    let (alignments, mut rows, has_header) = collect_table_rows(table_node);
    if rows.is_empty() {
        return Vec::new();
    }

    let num_cols = rows.iter().map(Vec::len).max().unwrap_or(0);
    if num_cols == 0 {
        return Vec::new();
    }
    for row in &mut rows {
        while row.len() < num_cols {
            row.push(String::new());
        }
    }

    let mut col_widths = vec![1_usize; num_cols];
    for row in &rows {
        for (idx, cell) in row.iter().enumerate() {
            col_widths[idx] = col_widths[idx].max(UnicodeWidthStr::width(cell.as_str()));
        }
    }

    // Row width is 1 + sum(col_width + 3); shrink the widest column until
    // the table fits.
    let max_table_width = wrap_width.max(4);
    while 1 + col_widths.iter().sum::<usize>() + (3 * num_cols) > max_table_width {
        match col_widths.iter().enumerate().max_by_key(|(_, w)| *w) {
            Some((widest, w)) if *w > 1 => col_widths[widest] -= 1,
            _ => break,
        }
    }

    let top = table_border(&col_widths, '┌', '┬', '┐');
    let mid = table_border(&col_widths, '├', '┼', '┤');
    let bottom = table_border(&col_widths, '└', '┴', '┘');

    let mut out = vec![top];
    for (idx, row) in rows.iter().enumerate() {
        out.push(table_row(row, &col_widths, &alignments));
        if has_header && idx == 0 {
            out.push(mid.clone());
        }
    }
    out.push(bottom);
    out
}

fn collect_table_rows<'a>(
    table_node: &'a AstNode<'a>,
) -> (Vec<TableAlignment>, Vec<Vec<String>>, bool) {
    let alignments = match &table_node.data.borrow().value {
        NodeValue::Table(table) => table.alignments.clone(),
        _ => Vec::new(),
    };

    let mut rows = Vec::new();
    let mut has_header = false;
    for row_node in table_node.children() {
        if matches!(row_node.data.borrow().value, NodeValue::TableRow(true)) {
            has_header = true;
        }
        if !matches!(row_node.data.borrow().value, NodeValue::TableRow(_)) {
            continue;
        }
        let mut cells = Vec::new();
        for cell_node in row_node.children() {
            if matches!(cell_node.data.borrow().value, NodeValue::TableCell) {
                let cell = extract_text(cell_node)
                    .split_whitespace()
                    .collect::<Vec<_>>()
                    .join(" ");
                cells.push(cell);
            }
        }
        rows.push(cells);
    }

    (alignments, rows, has_header)
}

fn table_border(widths: &[usize], left: char, middle: char, right: char) -> String {
    let mut out = String::new();
    out.push(left);
    for (idx, width) in widths.iter().enumerate() {
        out.push_str(&"─".repeat(width + 2));
        if idx + 1 < widths.len() {
            out.push(middle);
        }
    }
    out.push(right);
    out
}

fn table_row(cells: &[String], widths: &[usize], alignments: &[TableAlignment]) -> String {
    let mut out = String::new();
    out.push('│');
    for (idx, width) in widths.iter().enumerate() {
        let content = cells.get(idx).map_or("", String::as_str);
        let content = truncate_text(content, *width);
        let padding = width.saturating_sub(UnicodeWidthStr::width(content.as_str()));

        out.push(' ');
        match alignments.get(idx).copied().unwrap_or(TableAlignment::None) {
            TableAlignment::Right => {
                out.push_str(&" ".repeat(padding));
                out.push_str(&content);
            }
            TableAlignment::Center => {
                let left = padding / 2;
                out.push_str(&" ".repeat(left));
                out.push_str(&content);
                out.push_str(&" ".repeat(padding - left));
            }
            TableAlignment::Left | TableAlignment::None => {
                out.push_str(&content);
                out.push_str(&" ".repeat(padding));
            }
        }
        out.push_str(" │");
    }
    out
}

fn truncate_text(text: &str, max_width: usize) -> String {
    let mut out = String::new();
    let mut width = 0usize;
    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > max_width {
            break;
        }
        out.push(ch);
        width += ch_width;
    }
    out
}

// --- Inline spans ---

fn extract_text<'a>(node: &'a AstNode<'a>) -> String {
    let mut text = String::new();
    extract_text_recursive(node, &mut text);
    text
}

fn extract_text_recursive<'a>(node: &'a AstNode<'a>, text: &mut String) {
    match &node.data.borrow().value {
        NodeValue::Text(t) => text.push_str(t),
        NodeValue::Code(c) => text.push_str(&c.literal),
        NodeValue::SoftBreak | NodeValue::LineBreak => text.push('\n'),
        _ => {
            for child in node.children() {
                extract_text_recursive(child, text);
            }
        }
    }
}

fn collect_inline_spans<'a>(node: &'a AstNode<'a>) -> Vec<InlineSpan> {
    let mut spans = Vec::new();
    collect_spans_recursive(node, InlineStyle::default(), &mut spans);
    spans
}

fn collect_spans_recursive<'a>(
    node: &'a AstNode<'a>,
    style: InlineStyle,
    spans: &mut Vec<InlineSpan>,
) {
    match &node.data.borrow().value {
        // Nested blocks are rendered by their own walk pass.
        NodeValue::List(_) | NodeValue::Item(_) => {}
        NodeValue::Text(t) => spans.push(InlineSpan::new(t.clone(), style)),
        NodeValue::Code(code) => {
            // Code resets surrounding styles but keeps link coloring.
            let code_style = InlineStyle {
                code: true,
                link: style.link,
                ..InlineStyle::default()
            };
            spans.push(InlineSpan::new(code.literal.clone(), code_style));
        }
        NodeValue::Emph => {
            let mut next = style;
            next.emphasis = true;
            for child in node.children() {
                collect_spans_recursive(child, next, spans);
            }
        }
        NodeValue::Strong => {
            let mut next = style;
            next.strong = true;
            for child in node.children() {
                collect_spans_recursive(child, next, spans);
            }
        }
        NodeValue::Strikethrough => {
            let mut next = style;
            next.strikethrough = true;
            for child in node.children() {
                collect_spans_recursive(child, next, spans);
            }
        }
        NodeValue::Link(_) => {
            let mut next = style;
            next.link = true;
            for child in node.children() {
                collect_spans_recursive(child, next, spans);
            }
        }
        NodeValue::Image(image) => {
            let alt = extract_text(node);
            let label = if alt.is_empty() { &image.url } else { &alt };
            spans.push(InlineSpan::new(format!("[Image: {label}]"), style));
        }
        NodeValue::SoftBreak | NodeValue::LineBreak => {
            spans.push(InlineSpan::new(" ".to_string(), style));
        }
        _ => {
            for child in node.children() {
                collect_spans_recursive(child, style, spans);
            }
        }
    }
}

// --- Wrapping ---

fn wrap_spans(
    spans: &[InlineSpan],
    width: usize,
    prefix_first: &str,
    prefix_next: &str,
) -> Vec<Vec<InlineSpan>> {
    let mut tokens: Vec<InlineSpan> = Vec::new();
    for span in spans {
        tokens.extend(split_tokens(span));
    }

    let mut lines: Vec<Vec<InlineSpan>> = Vec::new();
    let mut current: Vec<InlineSpan> = Vec::new();
    let mut current_len = 0usize;
    let mut has_word = false;

    let start_line = |prefix: &str, current: &mut Vec<InlineSpan>, current_len: &mut usize| {
        current.clear();
        *current_len = 0;
        if !prefix.is_empty() {
            current.push(InlineSpan::new(prefix.to_string(), InlineStyle::default()));
            *current_len = prefix.chars().count();
        }
    };

    start_line(prefix_first, &mut current, &mut current_len);

    for token in tokens {
        let token_len = token.text().chars().count();
        let token_is_ws = token.text().chars().all(char::is_whitespace);

        if current_len + token_len > width && has_word {
            lines.push(current.clone());
            start_line(prefix_next, &mut current, &mut current_len);
            has_word = false;
        }

        // Drop leading whitespace at wrapped line starts.
        if token_is_ws && !has_word {
            continue;
        }

        current_len += token_len;
        current.push(token);
        if !token_is_ws {
            has_word = true;
        }
    }

    if current.is_empty() && !prefix_first.is_empty() {
        current.push(InlineSpan::new(
            prefix_first.to_string(),
            InlineStyle::default(),
        ));
    }

    lines.push(current);
    lines
}

/// Split a span into alternating word and whitespace tokens.
fn split_tokens(span: &InlineSpan) -> Vec<InlineSpan> {
    let mut out = Vec::new();
    let mut buf = String::new();
    let mut ws_state: Option<bool> = None;

    for ch in span.text().chars() {
        let is_ws = ch.is_whitespace();
        match ws_state {
            Some(state) if state == is_ws => buf.push(ch),
            Some(_) => {
                out.push(InlineSpan::new(std::mem::take(&mut buf), span.style()));
                buf.push(ch);
                ws_state = Some(is_ws);
            }
            None => {
                buf.push(ch);
                ws_state = Some(is_ws);
            }
        }
    }

    if !buf.is_empty() {
        out.push(InlineSpan::new(buf, span.style()));
    }

    out
}

fn spans_to_string(spans: &[InlineSpan]) -> String {
    let mut content = String::new();
    for span in spans {
        content.push_str(span.text());
    }
    content
}
