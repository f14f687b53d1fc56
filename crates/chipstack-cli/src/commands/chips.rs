use chipstack_core::{Config, SessionType};
use clap::Subcommand;
use serde_json::json;

#[derive(Subcommand)]
pub enum ChipsAction {
    /// Chips earned by a session
    Calc {
        /// Session length in minutes (fractions allowed)
        #[arg(long, allow_negative_numbers = true)]
        minutes: f64,
        /// Quality rating, 1 to 5
        #[arg(long, allow_negative_numbers = true)]
        rating: i64,
    },
    /// Best possible reward for a full session of a given type
    Max {
        /// Session type (quick, standard, deep, test)
        #[arg(long = "type", default_value = "standard")]
        session_type: SessionType,
    },
}

pub fn run(action: ChipsAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    match action {
        ChipsAction::Calc { minutes, rating } => {
            let result = config.scoring.calculate(minutes, rating)?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        ChipsAction::Max { session_type } => {
            let duration_secs = config.sessions.duration_secs(session_type);
            let max_chips = config.scoring.max_chips_for_duration(duration_secs);
            let report = json!({
                "session_type": session_type,
                "duration_secs": duration_secs,
                "max_chips": max_chips,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}
