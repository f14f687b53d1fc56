use std::io::{BufRead, Write};

use chipstack_core::scoring::{MAX_QUALITY_RATING, MIN_QUALITY_RATING};
use chipstack_core::{Config, SessionType, TimerEngine, TimerEvent, TimerMode};
use chrono::Utc;
use clap::Subcommand;
use serde_json::json;
use tracing::{debug, info};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run a countdown in the foreground and score it when it completes
    Run {
        /// Session type (quick, standard, deep, test)
        #[arg(long = "type", default_value = "standard")]
        session_type: SessionType,
        /// Override the session length in seconds
        #[arg(long)]
        seconds: Option<u64>,
        /// Run a break instead of a work session
        #[arg(long = "break")]
        take_break: bool,
        /// Quality rating, 1 to 5; prompted for when omitted
        #[arg(
            long,
            allow_negative_numbers = true,
            value_parser = clap::value_parser!(i64).range(1..=5)
        )]
        rating: Option<i64>,
        /// Lifetime chips before this session
        #[arg(long, default_value = "0")]
        lifetime: u64,
    },
    /// List the session presets
    Types,
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    match action {
        TimerAction::Run {
            session_type,
            seconds,
            take_break,
            rating,
            lifetime,
        } => {
            let (mode, duration_secs) = if take_break {
                (TimerMode::Break, seconds.unwrap_or(config.sessions.break_secs()))
            } else {
                (
                    TimerMode::Work,
                    seconds.unwrap_or(config.sessions.duration_secs(session_type)),
                )
            };
            if duration_secs == 0 {
                return Err("session length must be at least one second".into());
            }

            let runtime = tokio::runtime::Builder::new_multi_thread()
                .worker_threads(1)
                .enable_time()
                .build()?;
            let started_at = Utc::now();
            let finished = runtime.block_on(countdown(&config, duration_secs, mode))?;
            let ended_at = Utc::now();

            if finished != mode {
                return Err(format!("countdown finished in unexpected mode {finished:?}").into());
            }

            match mode {
                TimerMode::Break => {
                    let report = json!({
                        "mode": mode,
                        "duration_secs": duration_secs,
                        "started_at": started_at.to_rfc3339(),
                        "ended_at": ended_at.to_rfc3339(),
                    });
                    println!("{}", serde_json::to_string_pretty(&report)?);
                }
                TimerMode::Work => {
                    let rating = match rating {
                        Some(r) => r,
                        None => prompt_rating()?,
                    };
                    let minutes = duration_secs as f64 / 60.0;
                    let chips = config.scoring.calculate(minutes, rating)?;
                    let table = config.rank_table()?;
                    let award = table.award(lifetime, chips);
                    info!(
                        chips = award.chips.total_chips,
                        lifetime = award.new_lifetime_total,
                        "Session scored"
                    );

                    let report = json!({
                        "mode": mode,
                        "session_type": seconds.is_none().then_some(session_type),
                        "duration_secs": duration_secs,
                        "quality_rating": rating,
                        "started_at": started_at.to_rfc3339(),
                        "ended_at": ended_at.to_rfc3339(),
                        "award": award,
                    });
                    println!("{}", serde_json::to_string_pretty(&report)?);
                }
            }
        }
        TimerAction::Types => {
            let presets: Vec<_> = SessionType::ALL
                .iter()
                .map(|&t| {
                    let duration_secs = config.sessions.duration_secs(t);
                    json!({
                        "type": t,
                        "label": t.label(),
                        "description": t.description(),
                        "duration_secs": duration_secs,
                        "max_chips": config.scoring.max_chips_for_duration(duration_secs),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&presets)?);
        }
    }
    Ok(())
}

async fn countdown(
    config: &Config,
    duration_secs: u64,
    mode: TimerMode,
) -> Result<TimerMode, Box<dyn std::error::Error>> {
    let (timer, mut events) = TimerEngine::spawn(config.timer.tick_interval())?;
    timer.start_with_mode(duration_secs, mode);

    let mut last_shown = None;
    let finished = events
        .until_complete(|event| {
            if let TimerEvent::Tick {
                remaining_seconds, ..
            } = event
            {
                if last_shown != Some(*remaining_seconds) {
                    last_shown = Some(*remaining_seconds);
                    eprint!(
                        "\r{:02}:{:02}",
                        remaining_seconds / 60,
                        remaining_seconds % 60
                    );
                    let _ = std::io::stderr().flush();
                }
            }
        })
        .await;
    eprintln!();

    let finished = finished.ok_or("countdown ended before completing")?;
    debug!(?finished, "Countdown complete");
    if config.notifications.alarm {
        eprint!("\x07");
    }
    Ok(finished)
}

fn prompt_rating() -> Result<i64, Box<dyn std::error::Error>> {
    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    loop {
        eprint!("Rate this session ({MIN_QUALITY_RATING}-{MAX_QUALITY_RATING}): ");
        std::io::stderr().flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Err("no rating given".into());
        }
        match line.trim().parse::<i64>() {
            Ok(rating) if (MIN_QUALITY_RATING..=MAX_QUALITY_RATING).contains(&rating) => {
                return Ok(rating)
            }
            _ => eprintln!("'{}' is not a rating", line.trim()),
        }
    }
}
