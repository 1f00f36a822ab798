use std::path::Path;
use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::{error, info, warn};

use crate::config::{Config, MAX_QUESTIONS, MIN_QUESTIONS};
use crate::question::Question;
use crate::question::bank::{self, QuestionBank};
use crate::quiz::sampler::{self, SampleMode};
use crate::quiz::scoring::{self, ScoreReport};
use crate::quiz::session::QuizSession;
use crate::store::JsonStore;
use crate::ui::components::menu::Menu;
use crate::ui::theme::Theme;

pub const SAMPLE_COUNT: usize = 10;
pub const EXPORT_FILE: &str = "quizdr-questions.json";
pub const SETTINGS_FIELD_COUNT: usize = 5;

const NOTICE_TTL: Duration = Duration::from_secs(5);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Menu,
    Quiz,
    Results,
    Review,
    Settings,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warn,
}

/// Transient message shown in the footer; expires on the tick loop.
pub struct Notice {
    pub text: String,
    pub level: NoticeLevel,
    shown_at: Instant,
}

/// Pending yes/no dialog. Takes key priority over the current screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Confirm {
    SubmitUnanswered(usize),
    ResetWrongAnswers,
}

pub struct App {
    pub screen: AppScreen,
    pub pool: Vec<Question>,
    pub focus_areas: Vec<String>,
    pub session: Option<QuizSession>,
    pub last_report: Option<ScoreReport>,
    pub menu: Menu<'static>,
    pub theme: &'static Theme,
    pub config: Config,
    pub store: Option<JsonStore>,
    pub wrong_count: usize,
    /// Persistent banner from a failed bank load; quiz start stays disabled
    /// while set.
    pub load_error: Option<String>,
    pub notice: Option<Notice>,
    pub confirm: Option<Confirm>,
    pub choice_cursor: usize,
    pub review_scroll: u16,
    pub settings_selected: usize,
    pub should_quit: bool,
    rng: SmallRng,
}

impl App {
    pub fn new(config: Config, theme: &'static Theme) -> Self {
        let store = match JsonStore::new() {
            Ok(store) => Some(store),
            Err(e) => {
                warn!("persistent store unavailable: {e}");
                None
            }
        };

        let mut app = Self {
            screen: AppScreen::Menu,
            pool: Vec::new(),
            focus_areas: Vec::new(),
            session: None,
            last_report: None,
            menu: Menu::new(theme),
            theme,
            config,
            store,
            wrong_count: 0,
            load_error: None,
            notice: None,
            confirm: None,
            choice_cursor: 0,
            review_scroll: 0,
            settings_selected: 0,
            should_quit: false,
            rng: SmallRng::from_entropy(),
        };
        app.load_bank();
        app.wrong_count = app
            .store
            .as_ref()
            .map(|s| s.load_wrong_answers().len())
            .unwrap_or(0);
        app.menu.set_practice_enabled(app.wrong_count > 0);
        app
    }

    /// Fetch the question bank: the configured directory when set, the
    /// bundled sample bank otherwise. A failure raises the persistent
    /// banner; a later retry can clear it.
    pub fn load_bank(&mut self) {
        let result = match self.config.bank_dir.as_deref() {
            Some(dir) => QuestionBank::load_dir(Path::new(dir), &mut self.rng),
            None => QuestionBank::load_bundled(&mut self.rng),
        };
        match result {
            Ok(bank) => {
                self.pool = bank.questions;
                self.focus_areas = bank.focus_areas;
                self.load_error = None;
            }
            Err(e) => {
                error!("bank load failed: {e}");
                self.load_error = Some(e.to_string());
                self.pool.clear();
                self.focus_areas.clear();
            }
        }
    }

    // --- quiz lifecycle ---

    pub fn start_quiz(&mut self) {
        self.start_with_count(self.config.question_count);
    }

    pub fn start_sample(&mut self) {
        self.start_with_count(SAMPLE_COUNT);
    }

    fn start_with_count(&mut self, count: usize) {
        if self.load_error.is_some() {
            self.notify_warn("Question bank failed to load; press [r] to retry.");
            return;
        }
        if !(MIN_QUESTIONS..=MAX_QUESTIONS).contains(&count) {
            self.notify_warn(&format!(
                "Please select between {MIN_QUESTIONS} and {MAX_QUESTIONS} questions."
            ));
            return;
        }
        let mode = if self.config.balanced_focus {
            SampleMode::Balanced
        } else {
            SampleMode::Plain
        };
        let quiz = sampler::select_quiz(
            &self.pool,
            count,
            mode,
            self.config.shuffle_questions,
            &mut self.rng,
        );
        if quiz.is_empty() {
            self.notify_warn("No questions available.");
            return;
        }
        info!(len = quiz.len(), ?mode, "starting quiz");
        self.enter_session(QuizSession::start(quiz, false));
    }

    /// Practice mode re-runs the stored wrong-answer set verbatim: exact
    /// questions, original order, no sampling.
    pub fn start_practice(&mut self) {
        let wrong = match &self.store {
            Some(store) => store.load_wrong_answers(),
            None => Vec::new(),
        };
        if wrong.is_empty() {
            self.notify_warn("No wrong answers to practice!");
            return;
        }
        info!(len = wrong.len(), "starting practice session");
        self.enter_session(QuizSession::start(wrong, true));
    }

    fn enter_session(&mut self, session: QuizSession) {
        self.session = Some(session);
        self.last_report = None;
        self.choice_cursor = 0;
        self.confirm = None;
        self.screen = AppScreen::Quiz;
    }

    /// Drop the running session and return to the menu. The session owns the
    /// clock, so dropping it is what stops the timer display.
    pub fn abandon_session(&mut self) {
        self.session = None;
        self.confirm = None;
        self.screen = AppScreen::Menu;
    }

    pub fn back_to_menu(&mut self) {
        self.session = None;
        self.last_report = None;
        self.screen = AppScreen::Menu;
    }

    // --- in-quiz interaction ---

    pub fn next_question(&mut self) {
        if let Some(session) = &mut self.session {
            session.next();
            self.choice_cursor = 0;
        }
    }

    pub fn prev_question(&mut self) {
        if let Some(session) = &mut self.session {
            session.prev();
            self.choice_cursor = 0;
        }
    }

    pub fn cursor_up(&mut self) {
        self.choice_cursor = self.choice_cursor.saturating_sub(1);
    }

    pub fn cursor_down(&mut self) {
        if let Some(question) = self.session.as_ref().and_then(|s| s.current_question()) {
            let last = question.choices.len().saturating_sub(1);
            self.choice_cursor = (self.choice_cursor + 1).min(last);
        }
    }

    /// Register a choice interaction at `index`: single-choice questions get
    /// it as the sole answer, multi-choice questions toggle its membership.
    pub fn choose(&mut self, index: usize) {
        let Some(session) = &mut self.session else { return };
        let Some(question) = session.current_question() else { return };
        if index >= question.choices.len() {
            return;
        }
        let selected = if question.multiple {
            !session
                .slot(session.current)
                .is_some_and(|slot| slot.contains(&index))
        } else {
            true
        };
        let current = session.current;
        if let Err(e) = session.record_answer(current, index, selected) {
            // UI guards should make this unreachable; never crash a session
            warn!("ignored answer: {e}");
            return;
        }
        self.choice_cursor = index;
    }

    pub fn choose_at_cursor(&mut self) {
        self.choose(self.choice_cursor);
    }

    // --- submit & scoring ---

    /// Submitting with unanswered slots requires confirmation.
    pub fn request_submit(&mut self) {
        let Some(session) = &self.session else { return };
        let unanswered = session.len() - session.answered_count();
        if unanswered > 0 {
            self.confirm = Some(Confirm::SubmitUnanswered(unanswered));
        } else {
            self.submit();
        }
    }

    pub fn submit(&mut self) {
        self.confirm = None;
        let Some(session) = &mut self.session else { return };
        session.finish();

        let report = scoring::score(session.quiz(), session.slots());
        info!(
            percentage = report.percentage,
            passed = report.passed,
            wrong = report.incorrect_count(),
            "session submitted"
        );

        let wrong: Vec<Question> = report
            .incorrect_indices
            .iter()
            .filter_map(|&i| session.quiz().get(i).cloned())
            .collect();
        if !wrong.is_empty() {
            match &self.store {
                Some(store) => match store.save_wrong_answers(&wrong) {
                    Ok(()) => self.wrong_count = wrong.len(),
                    Err(e) => {
                        warn!("could not persist wrong answers: {e}");
                        self.notify_warn("Could not save wrong answers for practice.");
                    }
                },
                None => warn!("no store; wrong answers not persisted"),
            }
        }
        self.menu.set_practice_enabled(self.wrong_count > 0);

        self.last_report = Some(report);
        self.screen = AppScreen::Results;
    }

    pub fn show_review(&mut self) {
        if self.last_report.is_some() && self.session.is_some() {
            self.review_scroll = 0;
            self.screen = AppScreen::Review;
        }
    }

    // --- wrong-answer store maintenance ---

    pub fn request_reset_wrong_answers(&mut self) {
        if self.wrong_count == 0 {
            self.notify_info("No stored wrong answers.");
            return;
        }
        self.confirm = Some(Confirm::ResetWrongAnswers);
    }

    pub fn reset_wrong_answers(&mut self) {
        self.confirm = None;
        let Some(store) = &self.store else { return };
        match store.clear_wrong_answers() {
            Ok(()) => {
                self.wrong_count = 0;
                self.menu.set_practice_enabled(false);
                self.notify_info("Wrong-answer history cleared.");
            }
            Err(e) => {
                warn!("clear failed: {e}");
                self.notify_warn("Could not clear wrong-answer history.");
            }
        }
    }

    // --- pool import/export ---

    pub fn import_pool(&mut self, path: &Path) {
        match bank::import_file(path, &mut self.rng) {
            Ok(questions) => {
                self.focus_areas = bank::derive_focus_areas(&questions);
                let count = questions.len();
                self.pool = questions;
                self.load_error = None;
                self.notify_info(&format!("Loaded {count} questions from file."));
            }
            Err(e) => {
                warn!("import rejected: {e}");
                self.notify_warn(&e.to_string());
            }
        }
    }

    pub fn export_pool(&mut self) {
        if self.pool.is_empty() {
            self.notify_warn("Nothing to export.");
            return;
        }
        match bank::export_file(&self.pool, Path::new(EXPORT_FILE)) {
            Ok(()) => self.notify_info(&format!("Exported {} questions to {EXPORT_FILE}.", self.pool.len())),
            Err(e) => {
                warn!("export failed: {e}");
                self.notify_warn("Failed to export questions.");
            }
        }
    }

    // --- settings ---

    pub fn settings_cycle(&mut self, forward: bool) {
        match self.settings_selected {
            0 => {
                self.config.question_count = if forward {
                    (self.config.question_count + 1).min(MAX_QUESTIONS)
                } else {
                    self.config.question_count.saturating_sub(1).max(MIN_QUESTIONS)
                };
            }
            1 => self.config.shuffle_questions = !self.config.shuffle_questions,
            2 => self.config.balanced_focus = !self.config.balanced_focus,
            3 => self.config.show_explanations = !self.config.show_explanations,
            4 => self.cycle_theme(forward),
            _ => {}
        }
    }

    fn cycle_theme(&mut self, forward: bool) {
        let themes = Theme::available_themes();
        if themes.is_empty() {
            return;
        }
        let current = themes
            .iter()
            .position(|name| *name == self.config.theme)
            .unwrap_or(0);
        let next = if forward {
            (current + 1) % themes.len()
        } else {
            (current + themes.len() - 1) % themes.len()
        };
        self.config.theme = themes[next].clone();
        if let Some(theme) = Theme::load(&self.config.theme) {
            let theme: &'static Theme = Box::leak(Box::new(theme));
            self.theme = theme;
            self.menu.theme = theme;
        }
    }

    // --- notices & ticking ---

    pub fn notify_info(&mut self, text: &str) {
        self.notice = Some(Notice {
            text: text.to_string(),
            level: NoticeLevel::Info,
            shown_at: Instant::now(),
        });
    }

    pub fn notify_warn(&mut self, text: &str) {
        self.notice = Some(Notice {
            text: text.to_string(),
            level: NoticeLevel::Warn,
            shown_at: Instant::now(),
        });
    }

    /// Periodic upkeep from the event loop: only expires notices. The live
    /// timer needs no upkeep because it reads the session clock at render
    /// time.
    pub fn tick(&mut self) {
        if let Some(notice) = &self.notice
            && notice.shown_at.elapsed() > NOTICE_TTL
        {
            self.notice = None;
        }
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.session
            .as_ref()
            .map(|s| s.elapsed().as_secs())
            .unwrap_or(0)
    }

    pub fn confirm_prompt(&self) -> Option<String> {
        self.confirm.map(|confirm| match confirm {
            Confirm::SubmitUnanswered(n) => {
                format!("{n} unanswered question(s). Submit anyway? [y/n]")
            }
            Confirm::ResetWrongAnswers => {
                "Reset all stored wrong answers? [y/n]".to_string()
            }
        })
    }

    pub fn answer_confirm(&mut self, yes: bool) {
        let Some(confirm) = self.confirm.take() else { return };
        if !yes {
            return;
        }
        match confirm {
            Confirm::SubmitUnanswered(_) => self.submit(),
            Confirm::ResetWrongAnswers => self.reset_wrong_answers(),
        }
    }
}
