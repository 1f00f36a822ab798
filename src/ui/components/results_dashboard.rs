use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::quiz::ScoreReport;
use crate::ui::layout::format_mm_ss;
use crate::ui::theme::Theme;

/// Post-submit summary: percentage, pass/fail verdict, answer buckets,
/// elapsed time.
pub struct ResultsDashboard<'a> {
    pub report: &'a ScoreReport,
    pub elapsed_secs: u64,
    pub practice: bool,
    pub theme: &'a Theme,
}

impl<'a> ResultsDashboard<'a> {
    pub fn new(report: &'a ScoreReport, elapsed_secs: u64, practice: bool, theme: &'a Theme) -> Self {
        Self { report, elapsed_secs, practice, theme }
    }
}

impl Widget for ResultsDashboard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let report = self.report;

        let mode = if self.practice { " Practice Complete " } else { " Quiz Complete " };
        let block = Block::bordered()
            .title(mode)
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(2),
                Constraint::Length(1),
                Constraint::Length(6),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(inner);

        let verdict_color = if report.passed { colors.success() } else { colors.error() };
        let verdict = if report.passed { "PASS" } else { "FAIL" };

        Paragraph::new(Line::from(Span::styled(
            format!("{}%", report.percentage),
            Style::default().fg(verdict_color).add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .render(layout[1], buf);

        Paragraph::new(Line::from(Span::styled(
            verdict,
            Style::default().fg(verdict_color).add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .render(layout[2], buf);

        let detail_style = Style::default().fg(colors.fg());
        let dim = Style::default().fg(colors.text_dim());
        let details = vec![
            Line::from(vec![
                Span::styled("Points:     ", dim),
                Span::styled(
                    format!("{} / {}", report.total_points, report.max_points),
                    detail_style,
                ),
            ]),
            Line::from(vec![
                Span::styled("Correct:    ", dim),
                Span::styled(format!("{}", report.correct_count()), detail_style),
            ]),
            Line::from(vec![
                Span::styled("Wrong:      ", dim),
                Span::styled(format!("{}", report.incorrect_count()), detail_style),
            ]),
            Line::from(vec![
                Span::styled("Unanswered: ", dim),
                Span::styled(format!("{}", report.unanswered_count()), detail_style),
            ]),
            Line::from(vec![
                Span::styled("Time:       ", dim),
                Span::styled(format_mm_ss(self.elapsed_secs), detail_style),
            ]),
        ];
        Paragraph::new(details)
            .alignment(Alignment::Center)
            .render(layout[3], buf);

        let mut hints = vec![" [v] Review  [r] New quiz ".to_string()];
        if report.incorrect_count() > 0 {
            hints.push("[p] Practice wrong answers ".to_string());
        }
        Paragraph::new(Line::from(Span::styled(
            hints.concat(),
            Style::default().fg(colors.text_dim()),
        )))
        .alignment(Alignment::Center)
        .render(layout[5], buf);
    }
}
