use std::io::{stdout, Stdout, Write};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    cursor,
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Clear, Gauge, List, ListItem, ListState, Paragraph, Row, Table, TableState, Tabs, Wrap},
    Frame, Terminal,
};

use crate::app::{App, NoticeLevel};
use crate::calibration::CalibrationState;
use crate::config::{Settings, TabId};
use crate::countdown::{format_remaining, CountdownStatus};
use crate::markdown::render_markdown;
use crate::stopwatch::{format_elapsed, StopwatchStatus};
use crate::ticker::poll_timeout;
use crate::timer_panel::TimerFocus;

const BGRND: Color = Color::Rgb(10, 34, 171); // Background color
const TXT: Color = Color::Rgb(63, 252, 123); // Text color
const SCRTEXT: Color = Color::Rgb(230, 230, 250); // Screen text color
const ACCENT: Color = Color::Yellow;

/// Longest the loop sleeps when no interval is due.
const IDLE_POLL: Duration = Duration::from_millis(250);

type Term = Terminal<CrosstermBackend<Stdout>>;

pub fn run_ui(settings: &Settings) -> Result<()> {
    let mut app = App::new(settings)?;

    terminal::enable_raw_mode().context("enabling raw mode")?;
    let mut out = stdout();
    execute!(out, EnterAlternateScreen, cursor::Hide).context("entering alternate screen")?;
    let mut terminal = Terminal::new(CrosstermBackend::new(out))?;

    let result = event_loop(&mut terminal, &mut app);

    restore_terminal()?;
    terminal.show_cursor()?;
    result
}

pub fn restore_terminal() -> Result<()> {
    terminal::disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen, cursor::Show)?;
    Ok(())
}

/// Put the terminal back before a panic message is printed.
pub fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        default_hook(info);
    }));
}

fn event_loop(terminal: &mut Term, app: &mut App) -> Result<()> {
    terminal.draw(|f| draw_ui(f, app))?;

    loop {
        let timeout = poll_timeout(app.intervals(), Instant::now(), IDLE_POLL);
        let mut dirty = false;

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    app.handle_key(key, Instant::now());
                    dirty = true;
                }
                Event::Resize(..) => dirty = true,
                _ => {}
            }
        }

        if app.should_quit {
            log::info!("quit requested");
            return Ok(());
        }

        if app.on_tick(Instant::now()) {
            dirty = true;
        }
        if app.take_bell() {
            let backend = terminal.backend_mut();
            backend.write_all(b"\x07")?;
            backend.flush()?;
        }
        if dirty {
            terminal.draw(|f| draw_ui(f, app))?;
        }
    }
}

pub fn draw_ui(f: &mut Frame, app: &App) {
    let size = f.area();
    f.render_widget(Block::default().style(Style::default().bg(BGRND)), size);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tabs
            Constraint::Min(5),    // Body
            Constraint::Length(3), // Footer
        ])
        .split(size);

    let titles: Vec<Line> = TabId::ALL
        .iter()
        .map(|tab| match tab {
            TabId::History if app.history_view.unseen() > 0 => {
                Line::from(format!("{} ({})", tab.title(), app.history_view.unseen()))
            }
            _ => Line::from(tab.title()),
        })
        .collect();
    let tabs = Tabs::new(titles)
        .select(app.tab.index())
        .block(Block::default().borders(Borders::ALL).title("tabdesk"))
        .style(Style::default().fg(SCRTEXT).bg(BGRND))
        .highlight_style(Style::default().fg(TXT).add_modifier(Modifier::BOLD));
    f.render_widget(tabs, chunks[0]);

    match app.tab {
        TabId::Calculator => draw_calculator(f, chunks[1], app),
        TabId::History => draw_history(f, chunks[1], app),
        TabId::Timer => draw_timers(f, chunks[1], app),
        TabId::Reader => draw_reader(f, chunks[1], app),
    }

    draw_footer(f, chunks[2], app);

    if app.predictor.calibration().is_some() {
        draw_calibration(f, app);
    }
}

fn panel(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .style(Style::default().fg(SCRTEXT).bg(BGRND))
}

fn focused_panel(title: &str, focused: bool) -> Block<'_> {
    let block = panel(title);
    if focused {
        block.border_style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD))
    } else {
        block
    }
}

fn draw_calculator(f: &mut Frame, area: Rect, app: &App) {
    let calc = &app.calculator;
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    let tape: Vec<Line> = calc.tape().iter().map(|l| Line::from(l.as_str())).collect();
    f.render_widget(Paragraph::new(tape).block(panel("Tape")), columns[0]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(6)])
        .split(columns[1]);

    let display = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            calc.display().to_string(),
            Style::default().fg(TXT).add_modifier(Modifier::BOLD),
        )),
    ])
    .alignment(Alignment::Right)
    .block(panel(calc.operator().symbol()));
    f.render_widget(display, right[0]);

    let clear = if calc.shows_all_clear() { "AC" } else { "C" };
    let keypad = [
        [clear, "+/-", "%", "÷"],
        ["7", "8", "9", "×"],
        ["4", "5", "6", "-"],
        ["1", "2", "3", "+"],
        ["0", ".", "⌫", "="],
    ];
    let key_style = Style::default().fg(SCRTEXT);
    let op_style = Style::default().fg(ACCENT).add_modifier(Modifier::BOLD);
    let mut lines: Vec<Line> = Vec::new();
    for row in keypad {
        let spans: Vec<Span> = row
            .iter()
            .enumerate()
            .map(|(i, label)| {
                let style = if i == 3 { op_style } else { key_style };
                Span::styled(format!("{:^7}", label), style)
            })
            .collect();
        lines.push(Line::from(spans));
        lines.push(Line::from(""));
    }
    lines.push(Line::from(Span::styled(
        "keys: 0-9 . + - * / % _(+/-) = Enter c/Esc(clear) Backspace",
        Style::default().fg(Color::Gray),
    )));
    let keypad = Paragraph::new(lines).alignment(Alignment::Center).block(panel("Keypad"));
    f.render_widget(keypad, right[1]);
}

fn draw_history(f: &mut Frame, area: Rect, app: &App) {
    let rows: Vec<Row> = app
        .history
        .entries()
        .iter()
        .map(|e| Row::new(vec![Cell::from(e.time.clone()), Cell::from(e.expression.clone()), Cell::from(e.result.clone())]))
        .collect();

    let header = Row::new(vec!["Time", "Expression", "Result"])
        .style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD));

    let table = Table::new(rows, [Constraint::Length(10), Constraint::Percentage(50), Constraint::Percentage(40)])
        .header(header)
        .block(panel("Calculation History"))
        .row_highlight_style(Style::default().fg(TXT).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

    let mut state = TableState::default().with_selected(app.history_view.selected());
    f.render_stateful_widget(table, area, &mut state);
}

fn draw_timers(f: &mut Frame, area: Rect, app: &App) {
    let timers = &app.timers;
    let now = Instant::now();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    let status = match timers.stopwatch.status() {
        StopwatchStatus::Idle => "idle",
        StopwatchStatus::Running => "running",
        StopwatchStatus::Stopped => "stopped",
    };
    let stopwatch = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            format_elapsed(timers.stopwatch.elapsed(now)),
            Style::default().fg(TXT).add_modifier(Modifier::BOLD),
        )),
        Line::from(status),
        Line::from(Span::styled("[Space] start/stop  [r] reset", Style::default().fg(Color::Gray))),
    ])
    .alignment(Alignment::Center)
    .block(focused_panel("Stopwatch", timers.focus == TimerFocus::Stopwatch));
    f.render_widget(stopwatch, rows[0]);

    let countdown_area = rows[1];
    let block = focused_panel("Countdown", timers.focus == TimerFocus::Countdown);
    let inner = block.inner(countdown_area);
    f.render_widget(block, countdown_area);

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(2), Constraint::Length(3), Constraint::Min(1)])
        .split(inner);

    let input = Paragraph::new(Line::from(vec![
        Span::raw("Set (HH:MM:SS, MM:SS or seconds): "),
        Span::styled(format!("{}_", timers.input()), Style::default().fg(ACCENT)),
    ]));
    f.render_widget(input, parts[0]);

    let countdown = &timers.countdown;
    let label = match countdown.status() {
        CountdownStatus::Idle => "idle",
        CountdownStatus::Running => "running",
        CountdownStatus::Paused => "paused",
        CountdownStatus::Expired => "TIME'S UP",
    };
    let remaining = Paragraph::new(Line::from(vec![
        Span::styled(format_remaining(countdown.remaining()), Style::default().fg(TXT).add_modifier(Modifier::BOLD)),
        Span::raw(format!("  {}", label)),
    ]))
    .alignment(Alignment::Center);
    f.render_widget(remaining, parts[1]);

    let ratio = if countdown.target().is_zero() {
        0.0
    } else {
        1.0 - countdown.remaining().as_secs_f64() / countdown.target().as_secs_f64()
    };
    let gauge_color = if countdown.status() == CountdownStatus::Expired { Color::Red } else { Color::Green };
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title("Progress"))
        .gauge_style(Style::default().fg(gauge_color).bg(BGRND))
        .ratio(ratio.clamp(0.0, 1.0));
    f.render_widget(gauge, parts[2]);

    let hints = Paragraph::new(Span::styled(
        "[Enter] start  [Space] pause/resume  [r] reset  [Backspace] edit  [↑/↓] switch",
        Style::default().fg(Color::Gray),
    ));
    f.render_widget(hints, parts[3]);
}

fn draw_reader(f: &mut Frame, area: Rect, app: &App) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    let items: Vec<ListItem> = app
        .browser
        .items()
        .iter()
        .map(|item| {
            if item.is_dir {
                ListItem::new(format!("{}/", item.name)).style(Style::default().fg(ACCENT))
            } else {
                ListItem::new(item.name.clone())
            }
        })
        .collect();
    let title = app.browser.dir().display().to_string();
    let list = List::new(items)
        .block(panel(&title))
        .highlight_style(Style::default().fg(TXT).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");
    let mut state = ListState::default().with_selected(Some(app.browser.selected()));
    f.render_stateful_widget(list, columns[0], &mut state);

    let results = Paragraph::new(render_markdown(app.predictor.results(), Style::default().fg(SCRTEXT)))
        .wrap(Wrap { trim: true })
        .block(panel("Analysis"));
    f.render_widget(results, columns[1]);
}

fn draw_calibration(f: &mut Frame, app: &App) {
    let Some(calibration) = app.predictor.calibration() else {
        return;
    };
    let area = centered_rect(70, 60, f.area());
    f.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title("Reading Speed Calibration")
        .style(Style::default().fg(SCRTEXT).bg(Color::Black));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(3), Constraint::Length(2), Constraint::Length(1)])
        .split(inner);

    let sample = calibration.sample();
    let header = Paragraph::new(format!(
        "Read this sample ({} words), then press Enter:",
        sample.word_count()
    ))
    .style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD));
    f.render_widget(header, parts[0]);

    let text = Paragraph::new(Text::from(sample.text()))
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(TXT));
    f.render_widget(text, parts[1]);

    let state = match calibration.state() {
        CalibrationState::Idle => "ready",
        CalibrationState::Running => "reading...",
        CalibrationState::Stopped => "stopped",
        CalibrationState::Analyzed(_) | CalibrationState::Cancelled => "done",
    };
    let clock = Paragraph::new(Line::from(vec![
        Span::styled(
            format_elapsed(calibration.stopwatch().elapsed(Instant::now())),
            Style::default().fg(TXT).add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("  {}", state)),
    ]))
    .alignment(Alignment::Center);
    f.render_widget(clock, parts[2]);

    let hints = Paragraph::new("[s] start  [x] stop  [Enter] done - analyze  [Esc/q] quit analysis")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray));
    f.render_widget(hints, parts[3]);
}

fn draw_footer(f: &mut Frame, area: Rect, app: &App) {
    let paragraph = match &app.notice {
        Some(notice) => {
            let color = match notice.level {
                NoticeLevel::Info => TXT,
                NoticeLevel::Warning => ACCENT,
                NoticeLevel::Error => Color::Red,
            };
            Paragraph::new(Span::styled(notice.text.clone(), Style::default().fg(color).add_modifier(Modifier::BOLD)))
        }
        None => {
            let keys = match app.tab {
                TabId::Reader => "[↑/↓] move | [Enter] open/select | [Backspace] parent",
                TabId::History => "[↑/↓] scroll",
                TabId::Timer => "[↑/↓] switch stopwatch/countdown",
                TabId::Calculator => "type to calculate",
            };
            Paragraph::new(format!("[Q]uit | [Tab/Shift-Tab] switch tab | {}", keys))
        }
    };
    f.render_widget(paragraph.block(panel("Menu Keys")), area);
}

/// Rectangle of `percent_x` by `percent_y` centered inside `area`.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|c| c.symbol()).collect()
    }

    fn test_app() -> (tempfile::TempDir, App) {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings { start_dir: dir.path().to_path_buf(), ..Settings::default() };
        let app = App::new(&settings).unwrap();
        (dir, app)
    }

    #[test]
    fn test_centered_rect_is_inside() {
        let area = Rect::new(0, 0, 100, 50);
        let inner = centered_rect(70, 60, area);
        assert_eq!(inner.width, 70);
        assert_eq!(inner.height, 30);
        assert_eq!(inner.x, 15);
    }

    #[test]
    fn test_draws_every_tab() {
        let (_dir, mut app) = test_app();
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        let markers = [
            (TabId::Calculator, "Keypad"),
            (TabId::History, "Calculation History"),
            (TabId::Timer, "Countdown"),
            (TabId::Reader, "Select a file to begin..."),
        ];
        for (tab, marker) in markers {
            app.tab = tab;
            terminal.draw(|f| draw_ui(f, &app)).unwrap();
            let screen = buffer_text(&terminal);
            for (other, other_marker) in markers {
                assert_eq!(screen.contains(other_marker), other == tab, "{:?} tab, looking for {:?}", tab, marker);
            }
        }
    }

    #[test]
    fn test_footer_shows_notice() {
        let (_dir, mut app) = test_app();
        app.notify(NoticeLevel::Error, "Something broke", Instant::now());
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| draw_ui(f, &app)).unwrap();
        assert!(buffer_text(&terminal).contains("Something broke"));
    }
}
