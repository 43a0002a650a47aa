mod cli;

use anyhow::Result;
use clap::Parser;
use clocktimer::format::{format_clock_time, format_countdown, format_date, progress_bar};
use clocktimer::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Args::parse();

    // 1. Load configuration before logging so the fallback level applies.
    let config = ClockTimerConfig::load(args.config.as_deref())?;

    // 2. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with_target(false)
        .init();

    // 3. Create the engine and attach listeners.
    let engine = ClockTimerEngine::new(config);
    spawn_event_listeners(&engine);

    // 4. Kick off a countdown if one was requested.
    if let Some(duration) = args.duration() {
        if let Err(e) = engine.start_with(duration).await {
            info!("Countdown not started: {}", e);
        }
    }

    // 5. Run the engine.
    engine.run().await?;

    Ok(())
}

/// Spawns one task per event stream, logging what the presentation layer would render.
fn spawn_event_listeners(engine: &ClockTimerEngine) {
    let hour12 = engine.config().display.hour12;
    let show_date = engine.config().display.show_date;

    let mut system_rx = engine.subscribe_system_events();
    tokio::spawn(async move {
        while let Ok(event) = system_rx.recv().await {
            info!("[SYSTEM] => {:?}", event);
        }
    });

    let mut clock_rx = engine.subscribe_clock_events();
    tokio::spawn(async move {
        while let Ok(event) = clock_rx.recv().await {
            let time = event.state().current_time;
            if show_date {
                info!("[CLOCK] {} | {}", format_clock_time(&time, hour12), format_date(&time));
            } else {
                info!("[CLOCK] {}", format_clock_time(&time, hour12));
            }
        }
    });

    let mut timer_rx = engine.subscribe_timer_events();
    tokio::spawn(async move {
        while let Ok(event) = timer_rx.recv().await {
            match event {
                TimerEvent::Tick(snapshot)
                | TimerEvent::Started(snapshot)
                | TimerEvent::Resumed(snapshot) => info!(
                    "[TIMER] {} {}",
                    format_countdown(snapshot.state.remaining_seconds),
                    progress_bar(snapshot.progress_percent, 20)
                ),
                TimerEvent::Completed(_) => info!("[TIMER] 00:00:00 complete"),
                TimerEvent::Notice(notice) => info!("[NOTICE] {}: {}", notice.title, notice.message),
                TimerEvent::Rejected(notice) => info!("[REJECTED] {}: {}", notice.title, notice.message),
                other => info!("[TIMER] => {:?}", other),
            }
        }
    });
}
