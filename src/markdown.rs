use pulldown_cmark::{Event, Parser, Tag};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};

/// Render the small Markdown subset used by the results panel (headings,
/// bold, paragraphs, line breaks) into styled ratatui text.
pub fn render_markdown(source: &str, base: Style) -> Text<'static> {
    let mut lines: Vec<Line<'static>> = Vec::new();
    let mut current: Vec<Span<'static>> = Vec::new();
    let mut styles = vec![base];

    let flush = |lines: &mut Vec<Line<'static>>, current: &mut Vec<Span<'static>>| {
        lines.push(Line::from(std::mem::take(current)));
    };

    for event in Parser::new(source) {
        match event {
            Event::Start(Tag::Heading(..)) => {
                let top = *styles.last().unwrap_or(&base);
                styles.push(top.add_modifier(Modifier::BOLD | Modifier::UNDERLINED));
            }
            Event::Start(Tag::Strong) => {
                let top = *styles.last().unwrap_or(&base);
                styles.push(top.add_modifier(Modifier::BOLD));
            }
            Event::Start(Tag::Emphasis) => {
                let top = *styles.last().unwrap_or(&base);
                styles.push(top.add_modifier(Modifier::ITALIC));
            }
            Event::End(Tag::Heading(..)) => {
                styles.pop();
                flush(&mut lines, &mut current);
                lines.push(Line::default());
            }
            Event::End(Tag::Strong) | Event::End(Tag::Emphasis) => {
                styles.pop();
            }
            Event::End(Tag::Paragraph) => {
                flush(&mut lines, &mut current);
                lines.push(Line::default());
            }
            Event::Text(text) | Event::Code(text) => {
                let style = *styles.last().unwrap_or(&base);
                current.push(Span::styled(text.into_string(), style));
            }
            Event::SoftBreak | Event::HardBreak => flush(&mut lines, &mut current),
            _ => {}
        }
    }

    if !current.is_empty() {
        flush(&mut lines, &mut current);
    }
    while lines.last().is_some_and(|line| line.spans.is_empty()) {
        lines.pop();
    }
    Text::from(lines)
}

/// Backslash-escape ASCII punctuation so `text` renders literally.
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_ascii_punctuation() {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
