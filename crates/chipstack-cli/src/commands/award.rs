use chipstack_core::Config;
use clap::Args;

#[derive(Args)]
pub struct AwardArgs {
    /// Session length in minutes
    #[arg(long, allow_negative_numbers = true)]
    pub minutes: f64,
    /// Quality rating, 1 to 5
    #[arg(long, allow_negative_numbers = true)]
    pub rating: i64,
    /// Lifetime chips before this session
    #[arg(long, default_value = "0")]
    pub lifetime: u64,
}

pub fn run(args: AwardArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let chips = config.scoring.calculate(args.minutes, args.rating)?;
    let table = config.rank_table()?;
    let award = table.award(args.lifetime, chips);

    if award.transition.promoted {
        eprintln!(
            "Promoted: {} -> {} {}",
            award.transition.from.name, award.transition.to.name, award.transition.to.emoji
        );
    }
    println!("{}", serde_json::to_string_pretty(&award)?);
    Ok(())
}
