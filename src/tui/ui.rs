//! UI rendering for the TUI.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

use crate::features::focus::{format_duration_mmss, ReadingProgress, SessionKind, TimerState, ToastKind};
use crate::tui::app::{App, FeedbackField, FeedbackForm, Mode, SetupField};
use crate::tui::event::help;

/// Render the application UI.
pub fn render(frame: &mut Frame<'_>, app: &App) {
    let lock_height = if app.timer.focus_lock().is_visible() { 3 } else { 0 };
    let toast_height = u16::try_from(app.toasts.len()).unwrap_or(0);

    // Create layout: header, focus lock, main, toasts, status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(lock_height),
            Constraint::Min(0),
            Constraint::Length(toast_height),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    if lock_height > 0 {
        render_focus_lock(frame, app, chunks[1]);
    }
    match app.mode() {
        Mode::Setup => render_setup(frame, app, chunks[2]),
        Mode::Running => render_countdown(frame, app, chunks[2]),
        Mode::Feedback => render_feedback(frame, app, chunks[2]),
        Mode::Editing => render_editor(frame, app, chunks[2]),
    }
    render_toasts(frame, app, chunks[3]);
    render_status_bar(frame, app, chunks[4]);
}

fn kind_color(kind: SessionKind) -> Color {
    match kind {
        SessionKind::Work => Color::Cyan,
        SessionKind::Break => Color::Green,
    }
}

/// Render the header.
fn render_header(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let kind = if app.mode() == Mode::Setup {
        app.form.setup.kind
    } else {
        app.timer.kind()
    };
    let color = kind_color(kind);
    let title = Line::from(vec![
        Span::styled(format!(" {} ", kind.label()), Style::default().fg(color).add_modifier(Modifier::BOLD)),
        Span::raw("  "),
        Span::raw(app.timer.display_task().to_string()),
    ]);

    let header = Paragraph::new(title).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color)),
    );

    frame.render_widget(header, area);
}

fn render_focus_lock(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let lock = Paragraph::new(app.timer.focus_lock().message().to_string())
        .style(Style::default().fg(Color::Yellow))
        .block(
            Block::default()
                .title(" Focus Lock (d: dismiss) ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        );
    frame.render_widget(lock, area);
}

fn render_clock(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let clock = format_duration_mmss(app.timer.countdown().remaining());
    let style = match app.timer.state() {
        TimerState::Paused => Style::default().fg(Color::Yellow),
        _ => Style::default().fg(Color::White),
    }
    .add_modifier(Modifier::BOLD);

    let paragraph = Paragraph::new(Line::from(Span::styled(clock, style)))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(format!(" {} ", app.timer.state())));
    frame.render_widget(paragraph, area);
}

fn field_line<'a>(label: &'a str, value: String, focused: bool) -> Line<'a> {
    let marker = if focused { "> " } else { "  " };
    let value_style = if focused {
        Style::default().fg(Color::Black).bg(Color::Cyan)
    } else {
        Style::default()
    };
    Line::from(vec![
        Span::raw(marker),
        Span::styled(format!("{label:<10}"), Style::default().fg(Color::DarkGray)),
        Span::styled(value, value_style),
    ])
}

fn render_setup(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);
    render_clock(frame, app, chunks[0]);

    let form = &app.form;
    let setup = &form.setup;
    let focused = |field: SetupField| form.field == field;

    let mut lines = vec![
        field_line("Task", setup.task_name.clone(), focused(SetupField::Task)),
        field_line("Duration", format!("{} min", form.duration_input), focused(SetupField::Duration)),
        field_line("Category", setup.category.clone(), focused(SetupField::Category)),
        field_line("Type", setup.kind.display_name().to_string(), focused(SetupField::Kind)),
        field_line(
            "Reading",
            if setup.reading { "[x]" } else { "[ ]" }.to_string(),
            focused(SetupField::Reading),
        ),
    ];

    if setup.reading {
        let book = match (&setup.book, app.timer.books().is_empty()) {
            (Some(book), _) => format!(
                "{} ({}/{} pages)",
                book.title, book.current_page, book.page_count
            ),
            (None, true) => "No books found. Add some books in Nook first!".to_string(),
            (None, false) => "Select a book (←/→)".to_string(),
        };
        lines.push(field_line("Book", book, focused(SetupField::Book)));
    }

    if app.timer.is_reading_pending() {
        lines.push(Line::from(Span::styled(
            "  Starting reading session...",
            Style::default().fg(Color::Yellow),
        )));
    }

    lines.push(Line::default());
    let presets = app
        .presets
        .iter()
        .enumerate()
        .map(|(i, p)| format!("F{}:{}m {}", i + 1, p.minutes, p.kind.as_str()))
        .collect::<Vec<_>>()
        .join("  ");
    lines.push(Line::from(Span::styled(presets, Style::default().fg(Color::DarkGray))));

    let paragraph = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" New Session "));
    frame.render_widget(paragraph, chunks[1]);
}

fn render_countdown(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(3), Constraint::Min(0)])
        .split(area);
    render_clock(frame, app, chunks[0]);

    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL))
        .gauge_style(Style::default().fg(kind_color(app.timer.kind())))
        .ratio(app.timer.countdown().progress().clamp(0.0, 1.0));
    frame.render_widget(gauge, chunks[1]);

    let mut lines = vec![Line::from(vec![
        Span::styled("Category  ", Style::default().fg(Color::DarkGray)),
        Span::raw(app.timer.category().to_string()),
    ])];
    if let Some(book) = app.timer.linked_book() {
        lines.push(Line::from(vec![
            Span::styled("Book      ", Style::default().fg(Color::DarkGray)),
            Span::raw(format!("{} (page {}/{})", book.title, book.current_page, book.page_count)),
        ]));
    }
    let details = Paragraph::new(lines).block(Block::default().borders(Borders::ALL));
    frame.render_widget(details, chunks[2]);
}

fn render_feedback(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let form = &app.feedback;
    let focused = |field: FeedbackField| form.field == field;

    let moods = app
        .moods
        .iter()
        .enumerate()
        .map(|(i, m)| if i == form.mood { format!("[{m}]") } else { format!(" {m} ") })
        .collect::<String>();
    let stars = format!(
        "{}{} ({}/5)",
        "★".repeat(usize::from(form.rating)),
        "☆".repeat(usize::from(5 - form.rating.min(5))),
        form.rating
    );

    let mut lines = vec![
        Line::from(Span::styled(
            format!("Timer Complete! How did \"{}\" go?", app.timer.display_task()),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        field_line("Mood", moods, focused(FeedbackField::Mood)),
        field_line("Rating", stars, focused(FeedbackField::Rating)),
    ];

    if let Some(progress) = app.timer.reading_progress() {
        lines.extend(reading_lines(progress, form));
    }

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(" Session Feedback "));
    frame.render_widget(paragraph, area);
}

fn reading_lines(progress: &ReadingProgress, form: &FeedbackForm) -> Vec<Line<'static>> {
    let book = progress.book();
    vec![
        Line::default(),
        Line::from(Span::styled(
            format!("Reading: {} (started at page {})", book.title, book.current_page),
            Style::default().fg(Color::Cyan),
        )),
        field_line("Pages", progress.pages_read().to_string(), form.field == FeedbackField::PagesRead),
        field_line(
            "Page",
            format!("{} of {} ({}%)", progress.current_page(), book.page_count, progress.percent()),
            form.field == FeedbackField::CurrentPage,
        ),
    ]
}

fn render_editor(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let input = app.editor.as_deref().unwrap_or_default();
    let saved = app.timer.focus_lock().domains();
    let lines = vec![
        Line::from(vec![Span::raw("> "), Span::raw(input.to_string()), Span::raw("_")]),
        Line::default(),
        Line::from(Span::styled(
            format!("{} saved: {}", saved.len(), saved.join(", ")),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(" Distraction List "));
    frame.render_widget(paragraph, area);
}

fn render_toasts(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let lines: Vec<Line<'_>> = app
        .toasts
        .iter()
        .map(|entry| {
            let color = match entry.toast.kind {
                ToastKind::Success => Color::Green,
                ToastKind::Info => Color::Cyan,
                ToastKind::Warning => Color::Yellow,
                ToastKind::Error => Color::Red,
            };
            Line::from(Span::styled(entry.toast.message.as_str(), Style::default().fg(color)))
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), area);
}

/// Render the status bar.
fn render_status_bar(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let status = Paragraph::new(help(app.mode())).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(status, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::tui::app::Action;
    use chrono::Utc;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use std::time::Instant;

    fn screen(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 24)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content
            .chunks(usize::from(buffer.area.width))
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_setup_screen() {
        let app = App::new(&Config::default(), "http://hook.test", Instant::now());
        let text = screen(&app);

        assert!(text.contains("Work Session"));
        assert!(text.contains("Ready to Focus"));
        assert!(text.contains("25:00"));
        assert!(text.contains("F2:5m break"));
    }

    #[test]
    fn test_countdown_screen() {
        let now = Instant::now();
        let mut app = App::new(&Config::default(), "http://hook.test", now);
        for c in "Write report".chars() {
            app.handle(Action::Input(c), now, Utc::now());
        }
        app.handle(Action::Submit, now, Utc::now());
        let text = screen(&app);

        assert!(text.contains("Write report"));
        assert!(text.contains("Running"));
        assert!(text.contains("Space:pause"));
    }
}
