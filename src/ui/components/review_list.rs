use std::collections::BTreeSet;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::question::Question;
use crate::quiz::{Outcome, ScoreReport};
use crate::ui::theme::Theme;

/// Scrollable per-question breakdown: outcome, your answer vs the correct
/// one, and the explanation when enabled.
pub struct ReviewList<'a> {
    pub quiz: &'a [Question],
    pub slots: &'a [BTreeSet<usize>],
    pub report: &'a ScoreReport,
    pub show_explanations: bool,
    pub scroll: u16,
    pub theme: &'a Theme,
}

impl ReviewList<'_> {
    fn outcome_span(&self, outcome: Outcome) -> Span<'static> {
        let colors = &self.theme.colors;
        let (label, color) = match outcome {
            Outcome::Correct => ("correct", colors.success()),
            Outcome::Partial => ("partial credit", colors.warning()),
            Outcome::Incorrect => ("wrong", colors.error()),
            Outcome::Unanswered => ("skipped", colors.text_dim()),
        };
        Span::styled(label, Style::default().fg(color).add_modifier(Modifier::BOLD))
    }
}

/// Choice texts joined for display; "Not answered" for an empty slot.
pub fn format_answer(question: &Question, indices: &BTreeSet<usize>) -> String {
    if indices.is_empty() {
        return "Not answered".to_string();
    }
    indices
        .iter()
        .filter_map(|&i| question.choices.get(i).map(String::as_str))
        .collect::<Vec<_>>()
        .join(", ")
}

impl Widget for ReviewList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Review ")
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let dim = Style::default().fg(colors.text_dim());
        let mut lines: Vec<Line> = Vec::new();
        for (index, question) in self.quiz.iter().enumerate() {
            let score = &self.report.per_question[index];

            lines.push(Line::from(vec![
                Span::styled(
                    format!("Question {} ", index + 1),
                    Style::default().fg(colors.accent()).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("({}/{} pts) ", score.points, score.max_points),
                    dim,
                ),
                self.outcome_span(score.outcome),
            ]));
            lines.push(Line::from(Span::styled(
                question.q.clone(),
                Style::default().fg(colors.fg()),
            )));
            lines.push(Line::from(vec![
                Span::styled("Your answer:    ", dim),
                Span::styled(
                    format_answer(question, &self.slots[index]),
                    Style::default().fg(colors.fg()),
                ),
            ]));
            lines.push(Line::from(vec![
                Span::styled("Correct answer: ", dim),
                Span::styled(
                    format_answer(question, &question.answer),
                    Style::default().fg(colors.success()),
                ),
            ]));
            if self.show_explanations {
                let explanation = question
                    .explain
                    .as_deref()
                    .unwrap_or("No explanation available");
                lines.push(Line::from(vec![
                    Span::styled("Explanation:    ", dim),
                    Span::styled(explanation.to_string(), Style::default().fg(colors.fg())),
                ]));
            }
            lines.push(Line::from(""));
        }

        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((self.scroll, 0))
            .render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question() -> Question {
        Question {
            id: "q1".to_string(),
            q: "pick".to_string(),
            choices: vec!["alpha".to_string(), "beta".to_string(), "gamma".to_string()],
            answer: BTreeSet::from([0, 2]),
            multiple: true,
            difficulty: Default::default(),
            focus: "1.1".to_string(),
            category: "General".to_string(),
            tags: BTreeSet::new(),
            explain: None,
        }
    }

    #[test]
    fn test_format_answer_joins_choice_texts() {
        let q = question();
        assert_eq!(format_answer(&q, &BTreeSet::from([0, 2])), "alpha, gamma");
        assert_eq!(format_answer(&q, &BTreeSet::from([1])), "beta");
    }

    #[test]
    fn test_format_answer_empty_slot() {
        let q = question();
        assert_eq!(format_answer(&q, &BTreeSet::new()), "Not answered");
    }

    #[test]
    fn test_format_answer_skips_dangling_indices() {
        // Defensive: stale persisted data could hold an out-of-range index.
        let q = question();
        assert_eq!(format_answer(&q, &BTreeSet::from([1, 9])), "beta");
    }
}
