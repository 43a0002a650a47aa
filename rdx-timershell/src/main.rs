mod cli;

use anyhow::Result;
use clap::Parser;
use clocktimer::config::ClockTimerConfig;
use clocktimer::format::{format_clock_time, format_countdown, format_date, progress_bar};
use clocktimer::prelude::*;
use clocktimer::{ENGINE_NAME, VERSION as LIB_VERSION};
use colored::Colorize;
use rustyline::highlight::Highlighter;
use rustyline::Editor;
use rustyline_derive::{Completer, Helper, Hinter, Validator};
use std::borrow::Cow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

const SHELL_VERSION: &str = env!("CARGO_PKG_VERSION");
const PROGRESS_WIDTH: usize = 30;

/// The words the REPL understands, as typed at the prompt.
const COMMANDS: &[&str] = &[
    "clock", "refresh", "set", "start", "pause", "resume", "reset", "status", "watch", "help",
    "exit",
];

/// Colours the command word by whether the shell knows it; arguments stay plain.
#[derive(Completer, Helper, Hinter, Validator)]
struct CommandHighlighter;

impl Highlighter for CommandHighlighter {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
        if command.is_empty() {
            return Cow::Borrowed(line);
        }
        let command = if COMMANDS.contains(&command) {
            command.cyan().bold()
        } else {
            command.red()
        };
        if line.contains(' ') {
            Cow::Owned(format!("{} {}", command, rest))
        } else {
            Cow::Owned(command.to_string())
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

fn print_banner() {
    let title = "Digital Clock & Timer".cyan().bold();
    let versions = format!("timershell {} / clocktimer {}", SHELL_VERSION, LIB_VERSION);
    println!("{}  {}", title, versions.dimmed());
    println!("{}", "=".repeat(48).dimmed());
}

/// Spawns the listeners that print asynchronous output between prompts.
fn spawn_event_listeners(engine: &ClockTimerEngine, is_watching: Arc<AtomicBool>) {
    let mut timer_rx = engine.subscribe_timer_events();
    tokio::spawn(async move {
        while let Ok(event) = timer_rx.recv().await {
            match event {
                TimerEvent::Tick(snapshot) => {
                    if is_watching.load(Ordering::Relaxed) {
                        println!(
                            "<-- {} {}",
                            format_countdown(snapshot.state.remaining_seconds).bold(),
                            progress_bar(snapshot.progress_percent, PROGRESS_WIDTH)
                        );
                    }
                }
                TimerEvent::Notice(notice) => {
                    println!(
                        "\n<-- {} {}\n>> ",
                        notice.title.green().bold(),
                        notice.message
                    );
                }
                _ => {}
            }
        }
    });
}

fn print_clock(state: ClockState, config: &ClockTimerConfig) {
    let time = state.current_time;
    println!(
        "{}",
        format_clock_time(&time, config.display.hour12).cyan().bold()
    );
    if config.display.show_date {
        println!("{}", format_date(&time).dimmed());
    }
}

/// Renders the timer card: the configuration form while no countdown is
/// active, the countdown and its controls otherwise.
fn print_timer(snapshot: TimerSnapshot) {
    match snapshot.phase {
        TimerPhase::Idle | TimerPhase::Completed => {
            if snapshot.phase == TimerPhase::Completed {
                println!("{}", "Timer complete.".green().bold());
            }
            let config = snapshot.configuration;
            println!(
                "Hours {:>2}   Minutes {:>2}   Seconds {:>2}",
                config.hours(),
                config.minutes(),
                config.seconds()
            );
            println!("{}", "Actions: set <H> <M> <S>, start".dimmed());
        }
        TimerPhase::Running | TimerPhase::Paused => {
            println!(
                "{}  {}",
                format_countdown(snapshot.state.remaining_seconds).bold(),
                progress_bar(snapshot.progress_percent, PROGRESS_WIDTH)
            );
            let actions = if snapshot.phase == TimerPhase::Running {
                "Actions: pause, reset"
            } else {
                "Actions: resume, reset"
            };
            println!("{} ({})", actions.dimmed(), snapshot.phase);
        }
    }
}

fn print_rejection(config: &ClockTimerConfig, error: TimerError) {
    println!(
        "{} {} ({})",
        config.alert.invalid_title.red().bold(),
        config.alert.invalid_message,
        error
    );
}

fn print_help() {
    println!("Available commands:");
    println!("  clock                 - Shows the current time and date.");
    println!("  refresh               - Re-reads the system clock now.");
    println!("  set <H> <M> <S>       - Sets the countdown duration.");
    println!("  start                 - Starts the countdown (resumes if paused).");
    println!("  pause                 - Pauses the running countdown.");
    println!("  resume                - Resumes a paused countdown.");
    println!("  reset                 - Stops the countdown and clears the duration.");
    println!("  status                - Shows the timer.");
    println!("  watch on|off          - Prints every countdown tick.");
    println!("  exit                  - Quits the shell.");
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Args::parse();
    if !args.quiet {
        print_banner();
    }

    let config = ClockTimerConfig::load(args.config.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with_target(false)
        .init();

    let engine = ClockTimerEngine::new(config.clone());
    let is_watching = Arc::new(AtomicBool::new(false));
    spawn_event_listeners(&engine, is_watching.clone());

    info!("Starting {} clock ticker...", ENGINE_NAME);
    engine.start_clock().await;

    let mut rl = Editor::new()?;
    rl.set_helper(Some(CommandHighlighter));

    println!(
        "{} is running. Type 'help' for commands or 'exit' to quit.",
        ENGINE_NAME.cyan()
    );
    print_clock(engine.clock_state().await, &config);

    loop {
        let prompt = format!("{}", ">> ".cyan().bold());
        match rl.readline(&prompt) {
            Ok(line) => {
                rl.add_history_entry(line.as_str())?;
                let args = line.split_whitespace().collect::<Vec<_>>();

                if let Some(command) = args.first() {
                    match *command {
                        "clock" => print_clock(engine.clock_state().await, &config),
                        "refresh" => print_clock(engine.manual_refresh().await, &config),
                        "set" => {
                            if let [_, h, m, s] = args.as_slice() {
                                let requested = TimerConfiguration::from_inputs(h, m, s);
                                if engine.configure(requested).await {
                                    print_timer(engine.timer_snapshot().await);
                                } else {
                                    println!("A countdown is active. Use 'reset' first.");
                                }
                            } else {
                                println!("Usage: set <HOURS> <MINUTES> <SECONDS>");
                            }
                        }
                        "start" => match engine.start().await {
                            Ok(StartOutcome::AlreadyRunning) => {
                                println!("--> The countdown is already running.")
                            }
                            Ok(_) => print_timer(engine.timer_snapshot().await),
                            Err(e) => print_rejection(&config, e),
                        },
                        "pause" => {
                            if engine.pause().await {
                                print_timer(engine.timer_snapshot().await);
                            } else {
                                println!("--> Nothing to pause.");
                            }
                        }
                        "resume" => {
                            if engine.resume().await {
                                print_timer(engine.timer_snapshot().await);
                            } else {
                                println!("--> Nothing to resume.");
                            }
                        }
                        "reset" => {
                            engine.reset().await;
                            print_timer(engine.timer_snapshot().await);
                        }
                        "status" => print_timer(engine.timer_snapshot().await),
                        "watch" => match args.get(1) {
                            Some(&"on") => {
                                is_watching.store(true, Ordering::Relaxed);
                                println!("--> Printing countdown ticks.");
                            }
                            Some(&"off") => {
                                is_watching.store(false, Ordering::Relaxed);
                                println!("--> Stopped printing countdown ticks.");
                            }
                            _ => println!("Usage: watch on|off"),
                        },
                        "help" => print_help(),
                        "exit" => break,
                        _ => println!("Unknown command: '{}'. Type 'help'.", line.trim()),
                    }
                }
            }
            Err(_) => {
                println!("Exiting timershell...");
                break;
            }
        }
    }

    engine.shutdown().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_commands_keep_their_arguments_plain() {
        let highlighted = CommandHighlighter.highlight("set 0 1 30", 0);
        assert_eq!(highlighted, format!("{} 0 1 30", "set".cyan().bold()));
    }

    #[test]
    fn unknown_commands_are_marked() {
        let highlighted = CommandHighlighter.highlight("stop", 0);
        assert_eq!(highlighted, "stop".red().to_string());
        assert_eq!(CommandHighlighter.highlight("", 0), "");
    }

    #[test]
    fn every_help_entry_is_a_known_command() {
        for command in ["clock", "refresh", "set", "start", "pause", "resume", "reset"] {
            assert!(COMMANDS.contains(&command), "{} missing", command);
        }
    }
}
