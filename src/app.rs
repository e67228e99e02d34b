use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::calculator::{Calculator, Key};
use crate::calibration::CalibrationState;
use crate::config::{Settings, TabId};
use crate::countdown::CountdownStatus;
use crate::file_browser::FileBrowser;
use crate::history::{HistoryLog, HistoryView};
use crate::predictor::ReadingPredictor;
use crate::reading_session::SessionOutcome;
use crate::ticker::Interval;
use crate::timer_panel::{TimerFocus, TimerPanel};

/// How long a notice stays in the footer.
pub const NOTICE_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub text: String,
    pub level: NoticeLevel,
    pub shown_at: Instant,
}

/// Whole-session state. Every handler mutates it and the loop redraws after.
pub struct App {
    pub tab: TabId,
    pub calculator: Calculator,
    pub history: HistoryLog,
    pub history_view: HistoryView,
    pub timers: TimerPanel,
    pub browser: FileBrowser,
    pub predictor: ReadingPredictor,
    pub notice: Option<Notice>,
    pub should_quit: bool,
    bell: bool,
    rng: StdRng,
}

impl App {
    pub fn new(settings: &Settings) -> Result<Self> {
        let browser = FileBrowser::open(&settings.start_dir)
            .with_context(|| format!("opening {}", settings.start_dir.display()))?;
        let mut history = HistoryLog::new();
        let history_view = HistoryView::new(&mut history);

        Ok(Self {
            tab: settings.initial_tab,
            calculator: Calculator::new(),
            history,
            history_view,
            timers: TimerPanel::new(),
            browser,
            predictor: ReadingPredictor::new(settings.sample_limits),
            notice: None,
            should_quit: false,
            bell: false,
            rng: StdRng::from_entropy(),
        })
    }

    pub fn notify(&mut self, level: NoticeLevel, text: impl Into<String>, now: Instant) {
        self.notice = Some(Notice { text: text.into(), level, shown_at: now });
    }

    /// Intervals the event loop has to wake up for.
    pub fn intervals(&self) -> Vec<&Interval> {
        let mut all = self.timers.intervals().to_vec();
        all.push(self.predictor.redraw_interval());
        all
    }

    pub fn take_bell(&mut self) -> bool {
        std::mem::take(&mut self.bell)
    }

    /// Run due intervals and expire the notice. True if a redraw is needed.
    pub fn on_tick(&mut self, now: Instant) -> bool {
        let outcome = self.timers.on_tick(now);
        let mut redraw = outcome.redraw;

        if outcome.expired {
            self.bell = true;
            self.notify(NoticeLevel::Warning, "Time's up!", now);
        }
        if self.predictor.redraw_interval_mut().poll(now) > 0 {
            redraw = true;
        }
        if self.notice.as_ref().is_some_and(|n| now.duration_since(n.shown_at) >= NOTICE_TTL) {
            self.notice = None;
            redraw = true;
        }
        self.history_view.refresh(&self.history);
        if self.tab == TabId::History {
            self.history_view.mark_seen();
        }
        redraw
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if self.predictor.calibration().is_some() {
            self.handle_calibration_key(key.code, now);
            return;
        }

        let tabs = TabId::ALL.len();
        match key.code {
            KeyCode::Tab => {
                self.select_tab((self.tab.index() + 1) % tabs);
                return;
            }
            KeyCode::BackTab => {
                self.select_tab((self.tab.index() + tabs - 1) % tabs);
                return;
            }
            _ => {}
        }

        match self.tab {
            TabId::Calculator => self.handle_calculator_key(key.code),
            TabId::History => match key.code {
                KeyCode::Up => self.history_view.scroll_up(),
                KeyCode::Down => self.history_view.scroll_down(&self.history),
                KeyCode::Char('q') => self.should_quit = true,
                _ => {}
            },
            TabId::Timer => self.handle_timer_key(key.code, now),
            TabId::Reader => self.handle_reader_key(key.code, now),
        }
    }

    fn select_tab(&mut self, index: usize) {
        self.tab = TabId::ALL[index];
        if self.tab == TabId::History {
            self.history_view.mark_seen();
        }
    }

    fn handle_calculator_key(&mut self, code: KeyCode) {
        let key = match code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                return;
            }
            KeyCode::Backspace => {
                self.calculator.backspace();
                return;
            }
            KeyCode::Enter => Key::Equals,
            KeyCode::Esc => Key::Clear,
            KeyCode::Char(c) => match Key::from_char(c) {
                Some(key) => key,
                None => return,
            },
            _ => return,
        };
        if let Some(calculation) = self.calculator.press(key) {
            self.history.record(&calculation);
        }
    }

    fn handle_timer_key(&mut self, code: KeyCode, now: Instant) {
        match (self.timers.focus, code) {
            (_, KeyCode::Up) | (_, KeyCode::Down) => self.timers.toggle_focus(),
            (_, KeyCode::Char('q')) => self.should_quit = true,
            (TimerFocus::Stopwatch, KeyCode::Char(' ')) => self.timers.toggle_stopwatch(now),
            (TimerFocus::Stopwatch, KeyCode::Char('r')) => self.timers.reset_stopwatch(now),
            (TimerFocus::Countdown, KeyCode::Char(' ')) => self.timers.toggle_countdown_pause(now),
            (TimerFocus::Countdown, KeyCode::Char('r')) => self.timers.reset_countdown(),
            (TimerFocus::Countdown, KeyCode::Char(c)) => self.timers.push_input(c),
            (TimerFocus::Countdown, KeyCode::Backspace) => self.timers.pop_input(),
            (TimerFocus::Countdown, KeyCode::Enter) => {
                if self.timers.start_countdown(now).is_none() {
                    let hint = match self.timers.countdown.status() {
                        CountdownStatus::Running | CountdownStatus::Paused => "Countdown already set; press r to reset",
                        _ => "Enter a time as HH:MM:SS, MM:SS or seconds",
                    };
                    self.notify(NoticeLevel::Warning, hint, now);
                }
            }
            _ => {}
        }
    }

    fn handle_reader_key(&mut self, code: KeyCode, now: Instant) {
        let result = match code {
            KeyCode::Up => {
                self.browser.move_up();
                Ok(())
            }
            KeyCode::Down => {
                self.browser.move_down();
                Ok(())
            }
            KeyCode::Backspace => self.browser.parent(),
            KeyCode::Char('q') => {
                self.should_quit = true;
                Ok(())
            }
            KeyCode::Enter => self.browser.activate().map(|picked| {
                if let Some(path) = picked {
                    if let Err(err) = self.predictor.select_file(&path, &mut self.rng) {
                        self.notify(NoticeLevel::Error, err.to_string(), now);
                    }
                }
            }),
            _ => Ok(()),
        };
        if let Err(err) = result {
            log::warn!("file browser: {}", err);
            self.notify(NoticeLevel::Error, format!("Cannot open directory: {}", err), now);
        }
    }

    fn handle_calibration_key(&mut self, code: KeyCode, now: Instant) {
        let outcome = match code {
            KeyCode::Char('s') => {
                self.predictor.start(now);
                None
            }
            KeyCode::Char('x') => {
                self.predictor.stop(now);
                None
            }
            KeyCode::Enter => {
                let outcome = self.predictor.analyze(now);
                if outcome.is_none() {
                    let hint = match self.predictor.calibration().map(|c| c.state()) {
                        Some(CalibrationState::Idle) => "Press s to start the stopwatch first",
                        _ => "Nothing measured yet; start the stopwatch",
                    };
                    self.notify(NoticeLevel::Warning, hint, now);
                }
                outcome
            }
            KeyCode::Esc | KeyCode::Char('q') => self.predictor.cancel(now),
            _ => None,
        };

        if let Some(SessionOutcome::Report(_)) = outcome {
            self.notify(NoticeLevel::Info, "Analysis complete", now);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::countdown::TICK_PERIOD;
    use std::fs;

    fn press(app: &mut App, code: KeyCode, now: Instant) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE), now);
    }

    fn type_str(app: &mut App, s: &str, now: Instant) {
        for c in s.chars() {
            press(app, KeyCode::Char(c), now);
        }
    }

    fn app_in(dir: &std::path::Path) -> App {
        let settings = Settings { start_dir: dir.to_path_buf(), ..Settings::default() };
        App::new(&settings).unwrap()
    }

    #[test]
    fn test_calculations_reach_history() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        let now = Instant::now();
        type_str(&mut app, "7*6", now);
        press(&mut app, KeyCode::Enter, now);
        assert_eq!(app.calculator.display(), "42");
        assert_eq!(app.history.len(), 2);
        assert_eq!(app.history.entries()[1].expression, "7 × 6");

        app.on_tick(now);
        assert_eq!(app.history_view.unseen(), 2);
        press(&mut app, KeyCode::Tab, now);
        assert_eq!(app.tab, TabId::History);
        assert_eq!(app.history_view.unseen(), 0);
        assert_eq!(app.history_view.selected(), Some(1));
    }

    #[test]
    fn test_tab_cycles_both_ways() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        let now = Instant::now();
        press(&mut app, KeyCode::BackTab, now);
        assert_eq!(app.tab, TabId::Reader);
        press(&mut app, KeyCode::Tab, now);
        assert_eq!(app.tab, TabId::Calculator);
    }

    #[test]
    fn test_countdown_expiry_rings_once() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        app.tab = TabId::Timer;
        let t0 = Instant::now();
        press(&mut app, KeyCode::Down, t0);
        type_str(&mut app, "00:01", t0);
        press(&mut app, KeyCode::Enter, t0);

        let mut bells = 0;
        for step in 1..=30u32 {
            app.on_tick(t0 + TICK_PERIOD * step);
            if app.take_bell() {
                bells += 1;
            }
        }
        assert_eq!(bells, 1);
        assert_eq!(app.timers.countdown.status(), CountdownStatus::Expired);
        assert_eq!(app.notice.as_ref().map(|n| n.level), Some(NoticeLevel::Warning));
    }

    #[test]
    fn test_notice_expires() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        let t0 = Instant::now();
        app.notify(NoticeLevel::Info, "hello", t0);
        assert!(!app.on_tick(t0 + Duration::from_secs(1)));
        assert!(app.on_tick(t0 + NOTICE_TTL));
        assert!(app.notice.is_none());
    }

    #[test]
    fn test_reader_flow_through_keys() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("story.txt"),
            "One two three four. Five six seven eight. Nine ten eleven twelve. \
             Thirteen fourteen fifteen sixteen. Seventeen eighteen nineteen twenty. \
             Twenty one twenty two.",
        )
        .unwrap();
        let mut app = app_in(dir.path());
        app.tab = TabId::Reader;
        let t0 = Instant::now();

        press(&mut app, KeyCode::Down, t0);
        press(&mut app, KeyCode::Enter, t0);
        assert!(app.predictor.calibration().is_some());

        // Modal swallows tab switching and quit
        press(&mut app, KeyCode::Tab, t0);
        assert_eq!(app.tab, TabId::Reader);

        press(&mut app, KeyCode::Enter, t0);
        assert!(app.predictor.calibration().is_some());
        assert_eq!(app.notice.as_ref().map(|n| n.level), Some(NoticeLevel::Warning));

        press(&mut app, KeyCode::Char('s'), t0);
        press(&mut app, KeyCode::Enter, t0 + Duration::from_secs(5));
        assert!(app.predictor.calibration().is_none());
        assert!(app.predictor.results().contains("**Total Words:** 24"));
        assert!(!app.should_quit);
    }

    #[test]
    fn test_reader_reports_short_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("short.txt"), "Hi. There.").unwrap();
        let mut app = app_in(dir.path());
        app.tab = TabId::Reader;
        let t0 = Instant::now();
        press(&mut app, KeyCode::Down, t0);
        press(&mut app, KeyCode::Enter, t0);
        assert!(app.predictor.calibration().is_none());
        assert_eq!(app.notice.as_ref().map(|n| n.level), Some(NoticeLevel::Error));
    }

    #[test]
    fn test_ctrl_c_quits_even_in_modal() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL), Instant::now());
        assert!(app.should_quit);
    }
}
