use chipstack_core::Config;
use clap::Subcommand;

#[derive(Subcommand)]
pub enum RankAction {
    /// Rank and progress for a lifetime chip total
    Show {
        /// Lifetime chips earned
        #[arg(long, allow_negative_numbers = true)]
        total: i64,
    },
    /// Print the rank table
    List,
}

pub fn run(action: RankAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let table = config.rank_table()?;
    match action {
        RankAction::Show { total } => {
            let progress = table.progress(total);
            println!("{}", serde_json::to_string_pretty(&progress)?);
        }
        RankAction::List => {
            println!("{}", serde_json::to_string_pretty(&table)?);
        }
    }
    Ok(())
}
