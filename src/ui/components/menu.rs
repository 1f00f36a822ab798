use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::ui::theme::Theme;

pub struct MenuItem {
    pub key: String,
    pub label: String,
    pub description: String,
    pub enabled: bool,
}

pub struct Menu<'a> {
    pub items: Vec<MenuItem>,
    pub selected: usize,
    pub theme: &'a Theme,
}

impl<'a> Menu<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self {
            items: vec![
                MenuItem {
                    key: "1".to_string(),
                    label: "Start Quiz".to_string(),
                    description: "Take a quiz with the configured settings".to_string(),
                    enabled: true,
                },
                MenuItem {
                    key: "2".to_string(),
                    label: "Sample Quiz".to_string(),
                    description: "Quick 10-question run".to_string(),
                    enabled: true,
                },
                MenuItem {
                    key: "p".to_string(),
                    label: "Practice Wrong Answers".to_string(),
                    description: "Retry the questions you last got wrong".to_string(),
                    enabled: false,
                },
                MenuItem {
                    key: "s".to_string(),
                    label: "Settings".to_string(),
                    description: "Question count, shuffling, balanced sampling".to_string(),
                    enabled: true,
                },
            ],
            selected: 0,
            theme,
        }
    }

    pub fn next(&mut self) {
        self.selected = (self.selected + 1) % self.items.len();
    }

    pub fn prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        } else {
            self.selected = self.items.len() - 1;
        }
    }

    /// Practice entry is only offered when a wrong-answer set exists.
    pub fn set_practice_enabled(&mut self, enabled: bool) {
        if let Some(item) = self.items.iter_mut().find(|item| item.key == "p") {
            item.enabled = enabled;
        }
    }
}

impl Widget for &Menu<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(inner);

        let title_lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "quizdr",
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Terminal Quiz Runner",
                Style::default().fg(colors.fg()),
            )),
            Line::from(""),
        ];
        Paragraph::new(title_lines)
            .alignment(Alignment::Center)
            .render(layout[0], buf);

        let menu_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(
                self.items
                    .iter()
                    .map(|_| Constraint::Length(3))
                    .collect::<Vec<_>>(),
            )
            .split(layout[2]);

        for (i, item) in self.items.iter().enumerate() {
            let is_selected = i == self.selected;
            let indicator = if is_selected { ">" } else { " " };

            let label_color = if !item.enabled {
                colors.text_dim()
            } else if is_selected {
                colors.accent()
            } else {
                colors.fg()
            };
            let label_style = Style::default().fg(label_color).add_modifier(if is_selected {
                Modifier::BOLD
            } else {
                Modifier::empty()
            });

            let label_text =
                format!(" {indicator} [{key}] {label}", key = item.key, label = item.label);
            let description_text = format!("      {}", item.description);

            let lines = vec![
                Line::from(Span::styled(label_text, label_style)),
                Line::from(Span::styled(
                    description_text,
                    Style::default().fg(colors.text_dim()),
                )),
            ];
            Paragraph::new(lines).render(menu_layout[i], buf);
        }
    }
}
