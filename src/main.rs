use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::{Builder, Env, Target};
use rand::rngs::StdRng;
use rand::SeedableRng;

use team_balancer::analysis::{analyze_rounds, report_stats};
use team_balancer::data_loader::{generate_players, load_players, register_players, setup_teams};
use team_balancer::report::{output_json, output_report};
use team_balancer::{balance_teams, BalanceContext, Roster};

/*
    Without --players a random roster is generated from the context's Elo range.
    --rounds above 1 switches to analysis mode and only prints aggregate numbers.
*/

#[derive(Parser)]
#[command(name = "team_balancer")]
#[command(about = "Split players into two teams and swap small groups to even out Elo", long_about = None)]
struct Cli {
    /// JSON file with balancing settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Roster file (.csv with name,elo or a JSON array)
    #[arg(long)]
    players: Option<PathBuf>,

    /// Seed for the random roster
    #[arg(long)]
    seed: Option<u64>,

    /// Number of random rounds to analyze
    #[arg(long, default_value_t = 1, conflicts_with_all = ["players", "json"])]
    rounds: usize,

    /// Print the round as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() -> Result<()> {
    Builder::from_env(Env::default().default_filter_or("warn"))
        .target(Target::Stdout)
        .init();

    let cli = Cli::parse();

    let mut context = match &cli.config {
        Some(path) => BalanceContext::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => BalanceContext::default(),
    };
    if cli.seed.is_some() {
        context.seed = cli.seed;
    }
    context.validate()?;

    let mut rng = match context.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    };

    if cli.rounds > 1 {
        let stats = analyze_rounds(&context, cli.rounds, &mut rng)?;
        report_stats(&stats);
        return Ok(());
    }

    let mut roster = Roster::new(&context)?;
    match &cli.players {
        Some(path) => {
            let records = load_players(path).with_context(|| format!("loading {}", path.display()))?;
            register_players(&mut roster, records);
        },
        None => generate_players(&mut roster, &context, &mut rng),
    }

    setup_teams(&mut roster, &context)?;
    let summary = balance_teams(&mut roster, &context)?;

    if cli.json {
        output_json(&roster, &summary)?;
    } else {
        output_report(&roster, &summary);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analysis_rejects_roster_file() {
        assert!(Cli::try_parse_from(["team_balancer", "--rounds", "50", "--players", "roster.csv"]).is_err());
        assert!(Cli::try_parse_from(["team_balancer", "--rounds", "50", "--json"]).is_err());
    }

    #[test]
    fn single_round_accepts_roster_file() {
        let cli = Cli::try_parse_from(["team_balancer", "--players", "roster.csv", "--json"]).unwrap();
        assert_eq!(cli.rounds, 1);
        assert!(cli.json);

        let cli = Cli::try_parse_from(["team_balancer", "--rounds", "50", "--seed", "4"]).unwrap();
        assert_eq!(cli.rounds, 50);
        assert_eq!(cli.seed, Some(4));
    }
}
