use colored::Colorize;

use crate::api::{Ack, Book, CompleteResponse, ReadingSessionResponse, StartTimerResponse, TimerStatus};
use crate::features::focus::{book_label, format_duration_mmss, SessionSetup};

fn clock(seconds: u32) -> String {
    format_duration_mmss(chrono::Duration::seconds(i64::from(seconds)))
}

/// Format the active timer as pretty output
pub fn format_status_pretty(status: &TimerStatus) -> String {
    if !status.active {
        return format!("{}\n", "No active timer".dimmed());
    }

    let state = if status.is_paused {
        "Paused".yellow()
    } else {
        "Running".green()
    };
    let task = status.task_name.as_deref().unwrap_or("Timer");

    let mut output = format!("{} {}\n", clock(status.remaining_seconds()).bold(), task.bold());
    output.push_str(&format!("  {}: {}\n", "State".dimmed(), state));
    output.push_str(&format!("  {}: {}\n", "Type".dimmed(), status.kind().label()));
    if let Some(category) = &status.category {
        output.push_str(&format!("  {}: {}\n", "Category".dimmed(), category));
    }
    if let Some(priority) = &status.priority {
        output.push_str(&format!("  {}: {}\n", "Priority".dimmed(), priority));
    }
    output
}

/// Format a started session as pretty output
pub fn format_started_pretty(setup: &SessionSetup, resp: &StartTimerResponse) -> String {
    let message = resp.message.as_deref().unwrap_or("Timer started!");
    let mut output = format!("{} {}\n", "✓".green(), message);
    output.push_str(&format!(
        "  {} for {} ({})\n",
        setup.kind.label(),
        clock(setup.duration_minutes.saturating_mul(60)).bold(),
        setup.task_name
    ));

    if let Some(book) = &resp.linked_book {
        if let Some(title) = &book.title {
            output.push_str(&format!(
                "  {}: {} at page {}\n",
                "Reading".dimmed(),
                title,
                book.current_page
            ));
        }
    }
    if let Some(domains) = resp.distraction_domains.as_deref().filter(|d| !d.is_empty()) {
        output.push_str(&format!("  {}: {}\n", "Avoid".dimmed(), domains.join(", ").yellow()));
    }
    output
}

/// Format a started reading session as pretty output
pub fn format_reading_started_pretty(resp: &ReadingSessionResponse, minutes: u32) -> String {
    let message = resp.message.as_deref().unwrap_or("Reading session started!");
    let mut output = format!("{} {}\n", "✓".green(), message);

    if let Some(book) = &resp.book {
        output.push_str(&format!(
            "  {} for {}, starting at page {}/{}\n",
            book.title.bold(),
            clock(minutes.saturating_mul(60)),
            book.current_page,
            book.page_count
        ));
    }
    if let Some(domains) = resp.distraction_domains.as_deref().filter(|d| !d.is_empty()) {
        output.push_str(&format!("  {}: {}\n", "Avoid".dimmed(), domains.join(", ").yellow()));
    }
    output
}

/// Format an acknowledgement as pretty output
pub fn format_ack_pretty(ack: &Ack, fallback: &str) -> String {
    format!("{} {}\n", "✓".green(), ack.message.as_deref().unwrap_or(fallback))
}

/// Format a completed session as pretty output
pub fn format_completed_pretty(resp: &CompleteResponse, redirect_url: &str) -> String {
    let message = resp.message.as_deref().unwrap_or("Session completed!");
    let mut output = format!(
        "{} {} {}\n",
        "✓".green(),
        message,
        format!("(+{} points!)", resp.points).green().bold()
    );

    if resp.reading_bonus > 0 {
        output.push_str(&format!(
            "  Including {} bonus points for focused reading!\n",
            resp.reading_bonus.to_string().cyan()
        ));
    }
    if resp.pages_read > 0 {
        output.push_str(&format!("  {}: {}\n", "Pages read".dimmed(), resp.pages_read));
    }
    output.push_str(&format!("  {}: {}\n", "Continue at".dimmed(), redirect_url.underline()));
    output
}

/// Format books as a pretty list
pub fn format_books_pretty(books: &[Book]) -> String {
    if books.is_empty() {
        return "Books (0 items)\n  No books found. Add some books in Nook first!\n".to_string();
    }

    let mut output = format!("Books ({} items)\n", books.len());
    output.push_str(&"─".repeat(60));
    output.push('\n');

    for book in books {
        let mut line = format!("{}  {}", book.id.dimmed(), book_label(book).bold());
        if !book.authors.is_empty() {
            line.push_str(&format!("  {}", book.authors.join(", ").cyan()));
        }
        line.push_str(&format!("  {}", format!("{:.0}%", book.progress_percentage).yellow()));
        output.push_str(&line);
        output.push('\n');
    }

    output
}

/// Format the distraction list as pretty output
pub fn format_domains_pretty(domains: &[String], message: Option<&str>) -> String {
    let mut output = String::new();
    if let Some(message) = message {
        output.push_str(&format!("{} {}\n", "✓".green(), message));
    }

    if domains.is_empty() {
        output.push_str(&format!("{}\n", "No distraction domains saved".dimmed()));
        return output;
    }

    output.push_str(&format!("Distractions ({} domains)\n", domains.len()));
    for domain in domains {
        output.push_str(&format!("  - {}\n", domain.yellow()));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn test_status_inactive() {
        plain();
        assert_eq!(format_status_pretty(&TimerStatus::default()), "No active timer\n");
    }

    #[test]
    fn test_status_paused() {
        plain();
        let status = TimerStatus {
            active: true,
            task_name: Some("X".to_string()),
            timer_type: Some("work".to_string()),
            remaining: 120.0,
            is_paused: true,
            category: Some("general".to_string()),
            priority: None,
        };
        let output = format_status_pretty(&status);

        assert!(output.starts_with("02:00 X"));
        assert!(output.contains("State: Paused"));
        assert!(output.contains("Type: Work Session"));
        assert!(!output.contains("Priority"));
    }

    #[test]
    fn test_completed_with_bonus() {
        plain();
        let resp = CompleteResponse {
            status: "success".to_string(),
            message: Some("Session completed!".to_string()),
            points: 30,
            reading_bonus: 5,
            pages_read: 12,
            linked_module: Some("nook".to_string()),
        };
        let output = format_completed_pretty(&resp, "http://h/nook/");

        assert!(output.contains("Session completed! (+30 points!)"));
        assert!(output.contains("Including 5 bonus points for focused reading!"));
        assert!(output.contains("http://h/nook/"));
    }

    #[test]
    fn test_books_empty_and_listed() {
        plain();
        assert!(format_books_pretty(&[]).contains("No books found"));

        let books = vec![Book {
            id: "b1".to_string(),
            title: "Dune".to_string(),
            authors: vec!["Frank Herbert".to_string()],
            current_page: 120,
            page_count: 412,
            cover_image: String::new(),
            status: "reading".to_string(),
            progress_percentage: 29.1,
        }];
        let output = format_books_pretty(&books);
        assert!(output.contains("b1  Dune (120/412 pages)  Frank Herbert  29%"));
    }

    #[test]
    fn test_domains() {
        plain();
        let output = format_domains_pretty(&["a.com".to_string()], Some("Updated 1 distraction domains"));
        assert!(output.contains("Updated 1 distraction domains"));
        assert!(output.contains("  - a.com"));
        assert!(format_domains_pretty(&[], None).contains("No distraction domains"));
    }
}
