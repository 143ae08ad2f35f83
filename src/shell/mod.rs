//! Terminal front-end for the page controller.
//!
//! Drives a [`Page`] from the terminal. Stdin lines and network completions
//! arrive as [`Event`]s on one channel and are applied by a single owner
//! loop; network calls run on worker threads so typing never waits on the
//! backend.

use std::io::BufRead;
use std::sync::mpsc::{self, Sender};
use std::time::{Duration, Instant};

use anyhow::Result;
use colored::Colorize;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::gateway::{Backend, HttpBackend, UsageStats};
use crate::model::AnalysisResult;
use crate::ui::client::ProxyClient;
use crate::ui::clipboard::SystemClipboard;
use crate::ui::{Effect, Notice, NoticeLevel, Page, PageStatus};

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Generate(String),
    Show,
    Copy,
    Feedback,
    Rate(String),
    Comment(String),
    Improve(String),
    Send,
    Stats,
    Reset,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

/// Parse one input line. A bare URL is shorthand for `generate <url>`.
pub fn parse_command(line: &str) -> Command {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((w, r)) => (w, r.trim()),
        None => (line, ""),
    };

    match word.to_ascii_lowercase().as_str() {
        "" => Command::Empty,
        "generate" | "g" => Command::Generate(rest.to_string()),
        "show" => Command::Show,
        "copy" => Command::Copy,
        "feedback" => Command::Feedback,
        "rate" => Command::Rate(rest.to_string()),
        "comment" => Command::Comment(rest.to_string()),
        "improve" => Command::Improve(rest.to_string()),
        "send" => Command::Send,
        "stats" => Command::Stats,
        "reset" => Command::Reset,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        _ if word.starts_with("http://") || word.starts_with("https://") => {
            Command::Generate(line.to_string())
        }
        _ => Command::Unknown(word.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Event loop
// ---------------------------------------------------------------------------

enum Event {
    Line(String),
    InputClosed,
    Generated {
        request_id: u64,
        outcome: Result<AnalysisResult, AppError>,
    },
    FeedbackDone(Result<(), AppError>),
    Stats(Option<UsageStats>),
}

/// Runs effects on worker threads and reports back on the event channel.
struct Workers {
    proxy: ProxyClient,
    stats: HttpBackend,
    tx: Sender<Event>,
}

impl Workers {
    fn execute(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Generate { request_id, url } => {
                    let proxy = self.proxy.clone();
                    let tx = self.tx.clone();
                    println!("{}", "Analyzing...".dimmed());
                    std::thread::spawn(move || {
                        let outcome = proxy.generate(&url);
                        let _ = tx.send(Event::Generated { request_id, outcome });
                    });
                }
                Effect::SubmitFeedback(submission) => {
                    let proxy = self.proxy.clone();
                    let tx = self.tx.clone();
                    println!("{}", "Submitting...".dimmed());
                    std::thread::spawn(move || {
                        let outcome = proxy.submit_feedback(&submission);
                        let _ = tx.send(Event::FeedbackDone(outcome));
                    });
                }
                Effect::FetchStats => {
                    let stats = self.stats.clone();
                    let tx = self.tx.clone();
                    std::thread::spawn(move || {
                        let _ = tx.send(Event::Stats(stats.get_stats().ok()));
                    });
                }
                Effect::Notify(notice) => print_notice(&notice),
            }
        }
    }
}

/// Run the interactive front-end against the proxy at `proxy_url`.
pub fn run(config: &AppConfig, proxy_url: &str) -> Result<()> {
    let (tx, rx) = mpsc::channel();

    let input_tx = tx.clone();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines().map_while(Result::ok) {
            if input_tx.send(Event::Line(line)).is_err() {
                return;
            }
        }
        let _ = input_tx.send(Event::InputClosed);
    });

    let timeout = Duration::from_millis(config.backend.timeout_ms);
    let workers = Workers {
        proxy: ProxyClient::new(proxy_url, timeout),
        stats: HttpBackend::public_from_config(&config.backend),
        tx,
    };

    println!("{}", "GitHub MVP Generator".bold().cyan());
    println!("{}", "=".repeat(40));
    println!("  proxy: {}", workers.proxy.base_url().dimmed());
    print_help();

    let mut page = Page::new();
    let mut clipboard = SystemClipboard;
    workers.execute(page.load());

    for event in rx {
        match event {
            Event::Line(line) => {
                let command = parse_command(&line);
                if command == Command::Quit {
                    break;
                }
                let effects = apply_command(&mut page, command, &mut clipboard);
                workers.execute(effects);
            }
            Event::InputClosed => break,
            Event::Generated {
                request_id,
                outcome,
            } => {
                let effects = match outcome {
                    Ok(result) => page.on_generate_success(request_id, result),
                    Err(e) => page.on_generate_failure(request_id, e.message()),
                };
                let landed = !effects.is_empty() && page.status() == PageStatus::Success;
                workers.execute(effects);
                if landed {
                    print_result(&page);
                }
            }
            Event::FeedbackDone(outcome) => {
                let effects = page.on_feedback_result(outcome.map_err(|e| e.message().to_string()));
                workers.execute(effects);
            }
            Event::Stats(stats) => page.on_stats(stats),
        }
    }

    Ok(())
}

fn apply_command(page: &mut Page, command: Command, clipboard: &mut SystemClipboard) -> Vec<Effect> {
    match command {
        Command::Generate(url) => {
            if page.is_generating() {
                println!("{}", "A prompt is already being generated.".dimmed());
            }
            page.submit(&url)
        }
        Command::Show => {
            print_result(page);
            Vec::new()
        }
        Command::Copy => {
            if page.result().is_none() {
                println!("{}", "Nothing to copy yet.".dimmed());
            }
            page.copy_prompt(clipboard, Instant::now())
        }
        Command::Feedback => {
            if page.request_feedback() {
                print_feedback_help();
            } else {
                println!("{}", "Generate a prompt first.".dimmed());
            }
            Vec::new()
        }
        Command::Rate(value) => edit_feedback(page, |form| form.set_rating(value)),
        Command::Comment(text) => edit_feedback(page, |form| form.set_comments(text)),
        Command::Improve(text) => edit_feedback(page, |form| form.set_improvements(text)),
        Command::Send => {
            if page.feedback().is_none() {
                println!("{}", "Open the feedback panel with `feedback` first.".dimmed());
            }
            page.submit_feedback()
        }
        Command::Stats => {
            print_stats(page.stats());
            vec![Effect::FetchStats]
        }
        Command::Reset => {
            page.reset();
            println!("{}", "Cleared.".dimmed());
            Vec::new()
        }
        Command::Help => {
            print_help();
            Vec::new()
        }
        Command::Empty | Command::Quit => Vec::new(),
        Command::Unknown(word) => {
            println!("unknown command `{word}` (try `help`)");
            Vec::new()
        }
    }
}

fn edit_feedback(
    page: &mut Page,
    edit: impl FnOnce(&mut crate::ui::feedback::FeedbackForm),
) -> Vec<Effect> {
    match page.feedback_mut() {
        Some(form) => edit(form),
        None => println!("{}", "Open the feedback panel with `feedback` first.".dimmed()),
    }
    Vec::new()
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn print_notice(notice: &Notice) {
    match notice.level {
        NoticeLevel::Success => println!(
            "{} {}",
            format!("✓ {}", notice.title).green().bold(),
            notice.description
        ),
        NoticeLevel::Error => println!(
            "{} {}",
            format!("✗ {}", notice.title).red().bold(),
            notice.description
        ),
    }
}

fn print_result(page: &Page) {
    let Some(result) = page.result() else {
        println!("{}", "No prompt generated yet.".dimmed());
        return;
    };

    let copied = if page.is_copied(Instant::now()) {
        " [copied]".green().to_string()
    } else {
        String::new()
    };
    println!();
    println!(
        "{}{}",
        format!("Generated MVP Prompt: {}", result.repository_name)
            .bold()
            .cyan(),
        copied
    );
    println!("{}", "-".repeat(60));
    println!("{}", result.prompt_text);
    println!("{}", "-".repeat(60));
    println!(
        "  {}",
        "`copy` to copy, `feedback` to rate this prompt".dimmed()
    );
}

/// Stats table. Absent stats render as zeros.
pub fn print_stats(stats: Option<&UsageStats>) {
    let stats = stats.copied().unwrap_or_default();
    println!("{}", "Usage".bold().cyan());
    println!("  {:<20} {}", "Total generations:", stats.total_operations_label());
    println!("  {:<20} {}", "Success rate:", stats.success_rate_label());
    println!("  {:<20} {}", "Feedback received:", stats.total_feedback_label());
    println!("  {:<20} {}", "Average rating:", stats.average_rating_label());
}

fn print_help() {
    println!();
    println!("  {:<22} {}", "<url> | generate <url>", "generate a prompt".dimmed());
    println!("  {:<22} {}", "show", "print the current prompt".dimmed());
    println!("  {:<22} {}", "copy", "copy the prompt to the clipboard".dimmed());
    println!("  {:<22} {}", "feedback", "rate the current prompt".dimmed());
    println!("  {:<22} {}", "stats", "usage statistics".dimmed());
    println!("  {:<22} {}", "reset", "clear the page".dimmed());
    println!("  {:<22} {}", "quit", "exit".dimmed());
    println!();
}

fn print_feedback_help() {
    println!("{}", "Provide Feedback".bold().cyan());
    println!("  {:<22} {}", "rate <1-5>", "required".dimmed());
    println!("  {:<22} {}", "comment <text>", "what did you like?".dimmed());
    println!("  {:<22} {}", "improve <text>", "how could it be better?".dimmed());
    println!("  {:<22} {}", "send", "submit feedback".dimmed());
}
