use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "chipstack", version, about = "Chipstack CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run focus and break countdowns
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Chip calculations
    Chips {
        #[command(subcommand)]
        action: commands::chips::ChipsAction,
    },
    /// Rank lookups
    Rank {
        #[command(subcommand)]
        action: commands::rank::RankAction,
    },
    /// Score a finished session and credit it to a lifetime total
    Award(commands::award::AwardArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("chipstack=warn,chipstack_core=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Timer { action } => commands::timer::run(action),
        Commands::Chips { action } => commands::chips::run(action),
        Commands::Rank { action } => commands::rank::run(action),
        Commands::Award(args) => commands::award::run(args),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
