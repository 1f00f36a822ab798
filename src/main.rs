mod app;
mod config;
mod error;
mod question;
mod quiz;
mod store;
mod ui;

use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Widget};
use tracing_subscriber::EnvFilter;

use app::{App, AppScreen, NoticeLevel, SETTINGS_FIELD_COUNT};
use ui::components::progress_bar::ProgressBar;
use ui::components::question_card::QuestionCard;
use ui::components::results_dashboard::ResultsDashboard;
use ui::components::review_list::ReviewList;
use ui::layout::{centered_rect, format_mm_ss};
use ui::theme::Theme;

/// Display-timer interval; also bounds the event poll.
const TICK_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Parser)]
#[command(name = "quizdr", version, about = "Terminal multiple-choice quiz runner")]
struct Cli {
    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(short, long, help = "Questions per quiz (5-40)")]
    count: Option<usize>,

    #[arg(short, long, help = "Question bank directory (contains index.json)")]
    bank: Option<PathBuf>,

    #[arg(short, long, help = "Replace the question pool from a JSON file")]
    import: Option<PathBuf>,
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let mut config = config::Config::load().unwrap_or_default();
    if let Some(count) = cli.count {
        config.question_count = count;
    }
    if let Some(bank) = &cli.bank {
        config.bank_dir = Some(bank.to_string_lossy().to_string());
    }
    config.validate();

    let theme_name = cli.theme.as_deref().unwrap_or(&config.theme);
    let loaded_theme = Theme::load(theme_name).unwrap_or_default();
    let theme: &'static Theme = Box::leak(Box::new(loaded_theme));

    let mut app = App::new(config, theme);
    if let Some(path) = &cli.import {
        app.import_pool(path);
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

/// Log to a file in the data dir; writing to stdout would corrupt the
/// alternate screen. Logging is best-effort: no data dir, no logs.
fn init_logging() {
    let Some(dir) = dirs::data_dir() else { return };
    let dir = dir.join("quizdr");
    if fs::create_dir_all(&dir).is_err() {
        return;
    }
    let Ok(file) = fs::File::options()
        .create(true)
        .append(true)
        .open(dir.join("quizdr.log"))
    else {
        return;
    };
    let filter = EnvFilter::try_from_env("QUIZDR_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        app.tick();
        terminal.draw(|frame| render(frame, app))?;

        // Single-threaded event loop: key handlers mutate state
        // synchronously, the poll timeout is the display-timer tick.
        if event::poll(TICK_INTERVAL)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => handle_key(app, key),
                Event::Resize(_, _) => {}
                _ => {}
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    // Pending confirmation swallows everything except yes/no
    if app.confirm.is_some() {
        match key.code {
            KeyCode::Char('y') => app.answer_confirm(true),
            KeyCode::Char('n') | KeyCode::Esc => app.answer_confirm(false),
            _ => {}
        }
        return;
    }

    match app.screen {
        AppScreen::Menu => handle_menu_key(app, key),
        AppScreen::Quiz => handle_quiz_key(app, key),
        AppScreen::Results => handle_results_key(app, key),
        AppScreen::Review => handle_review_key(app, key),
        AppScreen::Settings => handle_settings_key(app, key),
    }
}

fn handle_menu_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('1') => app.start_quiz(),
        KeyCode::Char('2') => app.start_sample(),
        KeyCode::Char('p') => app.start_practice(),
        KeyCode::Char('s') => app.screen = AppScreen::Settings,
        KeyCode::Char('e') => app.export_pool(),
        KeyCode::Char('x') => app.request_reset_wrong_answers(),
        KeyCode::Char('r') => {
            if app.load_error.is_some() {
                app.load_bank();
            }
        }
        KeyCode::Up | KeyCode::Char('k') => app.menu.prev(),
        KeyCode::Down | KeyCode::Char('j') => app.menu.next(),
        KeyCode::Enter => match app.menu.selected {
            0 => app.start_quiz(),
            1 => app.start_sample(),
            2 => app.start_practice(),
            3 => app.screen = AppScreen::Settings,
            _ => {}
        },
        _ => {}
    }
}

fn handle_quiz_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.abandon_session(),
        KeyCode::Left | KeyCode::Char('h') => app.prev_question(),
        KeyCode::Right | KeyCode::Char('l') => app.next_question(),
        KeyCode::Up | KeyCode::Char('k') => app.cursor_up(),
        KeyCode::Down | KeyCode::Char('j') => app.cursor_down(),
        KeyCode::Char(' ') | KeyCode::Enter => app.choose_at_cursor(),
        KeyCode::Char('s') => app.request_submit(),
        KeyCode::Char(ch) if ch.is_ascii_digit() && ch != '0' => {
            app.choose(ch as usize - '1' as usize);
        }
        _ => {}
    }
}

fn handle_results_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('v') => app.show_review(),
        KeyCode::Char('p') => app.start_practice(),
        KeyCode::Char('r') | KeyCode::Char('q') | KeyCode::Esc => app.back_to_menu(),
        _ => {}
    }
}

fn handle_review_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.screen = AppScreen::Results,
        KeyCode::Down | KeyCode::Char('j') => {
            app.review_scroll = app.review_scroll.saturating_add(1);
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.review_scroll = app.review_scroll.saturating_sub(1);
        }
        _ => {}
    }
}

fn handle_settings_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            let _ = app.config.save();
            app.screen = AppScreen::Menu;
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.settings_selected = app.settings_selected.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if app.settings_selected < SETTINGS_FIELD_COUNT - 1 {
                app.settings_selected += 1;
            }
        }
        KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => app.settings_cycle(true),
        KeyCode::Left | KeyCode::Char('h') => app.settings_cycle(false),
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    match app.screen {
        AppScreen::Menu => render_menu(frame, app),
        AppScreen::Quiz => render_quiz(frame, app),
        AppScreen::Results => render_results(frame, app),
        AppScreen::Review => render_review(frame, app),
        AppScreen::Settings => render_settings(frame, app),
    }

    render_notice(frame, app);
    render_confirm(frame, app);
}

fn render_menu(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    let header_info = format!(
        " {} questions | {} focus areas | {} to practice",
        app.pool.len(),
        app.focus_areas.len(),
        app.wrong_count,
    );
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " quizdr ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            header_info,
            Style::default().fg(colors.text_dim()).bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, layout[0]);

    // Persistent banner: bank load failed, start keys disabled until retry
    if let Some(load_error) = &app.load_error {
        let banner = Paragraph::new(Line::from(Span::styled(
            format!(" {load_error} — press [r] to retry "),
            Style::default().fg(colors.bg()).bg(colors.error()),
        )));
        frame.render_widget(banner, layout[1]);
    }

    let menu_area = centered_rect(50, 80, layout[2]);
    frame.render_widget(&app.menu, menu_area);

    let footer = Paragraph::new(Line::from(Span::styled(
        " [1-2] Start  [p] Practice  [s] Settings  [e] Export  [x] Reset  [q] Quit ",
        Style::default().fg(colors.text_dim()),
    )));
    frame.render_widget(footer, layout[3]);
}

fn render_quiz(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let Some(session) = &app.session else { return };
    let (Some(question), Some(slot)) = (session.current_question(), session.slot(session.current))
    else {
        return;
    };

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(8),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(area);

    let mode_label = if session.practice { "Practice Errors" } else { "Quiz" };
    let header_text = format!(
        " Mode: {mode_label} | {} | {} / {} answered ",
        format_mm_ss(app.elapsed_secs()),
        session.answered_count(),
        session.len(),
    );
    let header = Paragraph::new(Line::from(Span::styled(
        header_text,
        Style::default()
            .fg(colors.header_fg())
            .bg(colors.header_bg())
            .add_modifier(Modifier::BOLD),
    )))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, layout[0]);

    let card = QuestionCard::new(
        question,
        session.current + 1,
        session.len(),
        slot,
        app.choice_cursor,
        app.theme,
    );
    frame.render_widget(card, layout[1]);

    let progress = ProgressBar::new(session.answered_count(), session.len(), app.theme);
    frame.render_widget(progress, layout[2]);

    let footer = Paragraph::new(Line::from(Span::styled(
        " [Space] Select  [1-9] Pick  [←/→] Navigate  [s] Submit  [ESC] Abandon ",
        Style::default().fg(colors.text_dim()),
    )));
    frame.render_widget(footer, layout[3]);
}

fn render_results(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();

    if let Some(report) = &app.last_report {
        let practice = app.session.as_ref().is_some_and(|s| s.practice);
        let centered = centered_rect(60, 70, area);
        let dashboard = ResultsDashboard::new(report, app.elapsed_secs(), practice, app.theme);
        frame.render_widget(dashboard, centered);
    }
}

fn render_review(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let (Some(session), Some(report)) = (&app.session, &app.last_report) else { return };

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    let review = ReviewList {
        quiz: session.quiz(),
        slots: session.slots(),
        report,
        show_explanations: app.config.show_explanations,
        scroll: app.review_scroll,
        theme: app.theme,
    };
    frame.render_widget(review, layout[0]);

    let footer = Paragraph::new(Line::from(Span::styled(
        " [j/k] Scroll  [ESC] Back to results ",
        Style::default().fg(colors.text_dim()),
    )));
    frame.render_widget(footer, layout[1]);
}

fn render_settings(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let centered = centered_rect(60, 80, area);

    let block = Block::bordered()
        .title(" Settings ")
        .border_style(Style::default().fg(colors.accent()))
        .style(Style::default().bg(colors.bg()));
    let inner = block.inner(centered);
    block.render(centered, frame.buffer_mut());

    let on_off = |flag: bool| if flag { "on" } else { "off" };
    let fields: Vec<(String, String)> = vec![
        ("Question Count".to_string(), format!("{}", app.config.question_count)),
        ("Shuffle Questions".to_string(), on_off(app.config.shuffle_questions).to_string()),
        ("Balanced Focus Areas".to_string(), on_off(app.config.balanced_focus).to_string()),
        ("Show Explanations".to_string(), on_off(app.config.show_explanations).to_string()),
        ("Theme".to_string(), app.config.theme.clone()),
    ];

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(fields.len() as u16 * 3),
            Constraint::Min(0),
            Constraint::Length(2),
        ])
        .split(inner);

    let header = Paragraph::new(Line::from(Span::styled(
        "  Use arrows to navigate, Enter/Right to change, ESC to save & exit",
        Style::default().fg(colors.text_dim()),
    )));
    header.render(layout[0], frame.buffer_mut());

    let field_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(fields.iter().map(|_| Constraint::Length(3)).collect::<Vec<_>>())
        .split(layout[1]);

    for (i, (label, value)) in fields.iter().enumerate() {
        let is_selected = i == app.settings_selected;
        let indicator = if is_selected { " > " } else { "   " };

        let label_style = Style::default()
            .fg(if is_selected { colors.accent() } else { colors.fg() })
            .add_modifier(if is_selected { Modifier::BOLD } else { Modifier::empty() });
        let value_style = Style::default().fg(if is_selected {
            colors.choice_selected()
        } else {
            colors.text_dim()
        });

        let lines = vec![
            Line::from(Span::styled(format!("{indicator}{label}:"), label_style)),
            Line::from(Span::styled(format!("  < {value} >"), value_style)),
        ];
        Paragraph::new(lines).render(field_layout[i], frame.buffer_mut());
    }

    let footer = Paragraph::new(Line::from(Span::styled(
        "  [ESC] Save & back  [Enter/arrows] Change value",
        Style::default().fg(colors.accent()),
    )));
    footer.render(layout[3], frame.buffer_mut());
}

/// Transient notice in the bottom row; expired by App::tick.
fn render_notice(frame: &mut ratatui::Frame, app: &App) {
    let Some(notice) = &app.notice else { return };
    let colors = &app.theme.colors;
    let area = frame.area();
    if area.height < 2 {
        return;
    }

    let color = match notice.level {
        NoticeLevel::Info => colors.success(),
        NoticeLevel::Warn => colors.warning(),
    };
    let row = ratatui::layout::Rect::new(area.x, area.bottom() - 1, area.width, 1);
    let line = Paragraph::new(Line::from(Span::styled(
        format!(" {} ", notice.text),
        Style::default().fg(colors.bg()).bg(color),
    )));
    frame.render_widget(Clear, row);
    frame.render_widget(line, row);
}

fn render_confirm(frame: &mut ratatui::Frame, app: &App) {
    let Some(prompt) = app.confirm_prompt() else { return };
    let colors = &app.theme.colors;

    let area = centered_rect(50, 20, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::bordered()
        .title(" Confirm ")
        .border_style(Style::default().fg(colors.warning()))
        .style(Style::default().bg(colors.bg()));
    let inner = block.inner(area);
    block.render(area, frame.buffer_mut());

    let text = Paragraph::new(Line::from(Span::styled(
        prompt,
        Style::default().fg(colors.fg()),
    )))
    .alignment(ratatui::layout::Alignment::Center);
    frame.render_widget(text, inner);
}
