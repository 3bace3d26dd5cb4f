use std::time::Duration;

use log::debug;
use rand::Rng;

use crate::balance::balance_teams;
use crate::balance_context::BalanceContext;
use crate::data_loader::{generate_players, setup_teams};
use crate::error::RoundError;
use crate::roster::Roster;

// Aggregates over many random rounds. Mostly useful to see how far the subset cap
// lets the selector close the gap and how many players it moves to get there.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RoundStats {
    pub rounds: usize,
    pub mean_gap_before: f64,
    pub mean_gap_after: f64,
    pub mean_swapped: f64,
    pub max_swapped: usize,
    pub no_swap_rounds: usize,
    pub mean_balance_time: Duration,
}

pub fn analyze_rounds<R: Rng + ?Sized>(context: &BalanceContext, rounds: usize, rng: &mut R) -> Result<RoundStats, RoundError> {
    let mut stats = RoundStats { rounds, ..RoundStats::default() };
    if rounds == 0 { return Ok(stats); }

    let mut roster = Roster::new(context)?;

    let mut gap_before = 0.0;
    let mut gap_after = 0.0;
    let mut swapped = 0;
    let mut balance_time = Duration::ZERO;

    for round in 0..rounds {
        roster.reset();
        generate_players(&mut roster, context, rng);
        setup_teams(&mut roster, context)?;

        let summary = balance_teams(&mut roster, context)?;
        debug!("Round {round}: gap {} -> {}", summary.gap_before, summary.gap_after);

        gap_before += summary.gap_before as f64;
        gap_after += summary.gap_after as f64;
        swapped += summary.swapped;
        balance_time += summary.balance_time;

        stats.max_swapped = stats.max_swapped.max(summary.swapped);
        if !summary.swapped_any() { stats.no_swap_rounds += 1; }
    }

    stats.mean_gap_before = gap_before / rounds as f64;
    stats.mean_gap_after = gap_after / rounds as f64;
    stats.mean_swapped = swapped as f64 / rounds as f64;
    stats.mean_balance_time = mean_duration(balance_time, rounds);

    Ok(stats)
}

fn mean_duration(total: Duration, rounds: usize) -> Duration {
    total.div_f64(rounds as f64)
}

pub fn report_stats(stats: &RoundStats) {
    println!("Rounds played      {0:8}", stats.rounds);
    println!("Mean gap before    {0:8.1}", stats.mean_gap_before);
    println!("Mean gap after     {0:8.1}", stats.mean_gap_after);
    println!("Mean swapped       {0:8.2}", stats.mean_swapped);
    println!("Max swapped        {0:8}", stats.max_swapped);
    println!("Rounds w/o swap    {0:8}", stats.no_swap_rounds);
    println!("Mean balance time  {0:8.3}ms", stats.mean_balance_time.as_secs_f64() * 1000.0);
}
