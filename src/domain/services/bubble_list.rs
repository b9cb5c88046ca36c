#[cfg(test)]
#[path = "bubble_list_test.rs"]
mod tests;

use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;

use crate::domain::models::Author;
use crate::domain::models::Message;
use crate::domain::models::MessageType;

/// Renders the transcript as role-tagged bubbles in append order: a styled
/// author header, the wrapped message body, and a spacer line per message.
#[derive(Default)]
pub struct BubbleList {
    lines: Vec<Line<'static>>,
}

impl BubbleList {
    pub fn set_messages(&mut self, messages: &[Message], width: usize) {
        self.lines = messages
            .iter()
            .flat_map(|message| bubble_lines(message, width))
            .collect();
    }

    pub fn len(&self) -> usize {
        return self.lines.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.lines.is_empty();
    }

    pub fn lines(&self) -> Vec<Line<'static>> {
        return self.lines.clone();
    }
}

fn bubble_lines(message: &Message, width: usize) -> Vec<Line<'static>> {
    let author_color = match message.author {
        Author::User => Color::Cyan,
        Author::Assistant => Color::Green,
        Author::Parley => Color::Magenta,
    };

    let body_style = match message.message_type() {
        MessageType::Normal => Style::default(),
        MessageType::Error => Style::default().fg(Color::Red),
    };

    let mut lines = vec![Line::from(Span::styled(
        format!("▍ {}", message.author),
        Style::default()
            .fg(author_color)
            .add_modifier(Modifier::BOLD),
    ))];

    for text_line in wrap(&message.text, width.saturating_sub(2)) {
        lines.push(Line::from(Span::styled(format!("  {text_line}"), body_style)));
    }

    lines.push(Line::from(""));
    return lines;
}

/// Greedy word wrap. Words longer than the width are hard-split so a pasted
/// URL cannot push the layout past the viewport.
pub(super) fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut wrapped: Vec<String> = vec![];

    for raw_line in text.split('\n') {
        let mut current = String::new();

        for word in raw_line.split(' ') {
            let mut word = word.to_string();

            while word.chars().count() > width {
                if !current.is_empty() {
                    wrapped.push(current);
                    current = String::new();
                }
                let head: String = word.chars().take(width).collect();
                word = word.chars().skip(width).collect();
                wrapped.push(head);
            }

            if current.is_empty() {
                current = word;
            } else if current.chars().count() + 1 + word.chars().count() <= width {
                current.push(' ');
                current.push_str(&word);
            } else {
                wrapped.push(current);
                current = word;
            }
        }

        wrapped.push(current);
    }

    return wrapped;
}
