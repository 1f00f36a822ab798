use std::collections::BTreeSet;

use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::question::Question;
use crate::ui::theme::Theme;

/// The in-quiz question view: meta badges, prompt, and the choice list with
/// radio/checkbox markers.
pub struct QuestionCard<'a> {
    pub question: &'a Question,
    pub number: usize,
    pub total: usize,
    pub slot: &'a BTreeSet<usize>,
    pub cursor: usize,
    pub theme: &'a Theme,
}

impl<'a> QuestionCard<'a> {
    pub fn new(
        question: &'a Question,
        number: usize,
        total: usize,
        slot: &'a BTreeSet<usize>,
        cursor: usize,
        theme: &'a Theme,
    ) -> Self {
        Self { question, number, total, slot, cursor, theme }
    }
}

impl Widget for QuestionCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let question = self.question;

        let block = Block::bordered()
            .title(format!(" Question {} of {} ", self.number, self.total))
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let choice_rows = question.choices.len() as u16;
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(choice_rows),
            ])
            .split(inner);

        let mut badges = vec![
            Span::styled(
                format!(" {} ", question.difficulty.as_str()),
                Style::default().fg(colors.bg()).bg(colors.difficulty(question.difficulty)),
            ),
            Span::raw(" "),
            Span::styled(
                format!(" {} ", question.focus),
                Style::default().fg(colors.header_fg()).bg(colors.header_bg()),
            ),
            Span::raw(" "),
            Span::styled(
                format!(" {} ", question.category),
                Style::default().fg(colors.header_fg()).bg(colors.header_bg()),
            ),
        ];
        if question.multiple {
            badges.push(Span::raw(" "));
            badges.push(Span::styled(
                format!(" select {} ", question.answer.len()),
                Style::default().fg(colors.bg()).bg(colors.accent()),
            ));
        }
        Paragraph::new(Line::from(badges)).render(layout[0], buf);

        Paragraph::new(question.q.as_str())
            .style(Style::default().fg(colors.fg()))
            .wrap(Wrap { trim: true })
            .render(layout[2], buf);

        let choice_lines: Vec<Line> = question
            .choices
            .iter()
            .enumerate()
            .map(|(i, choice)| {
                let is_selected = self.slot.contains(&i);
                let at_cursor = i == self.cursor;

                let marker = match (question.multiple, is_selected) {
                    (true, true) => "[x]",
                    (true, false) => "[ ]",
                    (false, true) => "(o)",
                    (false, false) => "( )",
                };
                let pointer = if at_cursor { ">" } else { " " };

                let mut style = Style::default().fg(if is_selected {
                    colors.choice_selected()
                } else {
                    colors.fg()
                });
                if at_cursor {
                    style = style.add_modifier(Modifier::BOLD);
                }

                Line::from(Span::styled(
                    format!(" {pointer} {marker} {num}. {choice}", num = i + 1),
                    style,
                ))
            })
            .collect();
        Paragraph::new(choice_lines).render(layout[3], buf);
    }
}
