use std::time::{Duration, Instant};

use log::{debug, info};

use crate::balance_context::BalanceContext;
use crate::error::RosterError;
use crate::roster::{Roster, Team, TeamSide};
use crate::subset::Subset;

/// Equal sized subsets to exchange: `heavy` leaves the stronger team, `light` leaves the weaker one.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SwapPair {
    pub heavy: Subset,
    pub light: Subset,
}

impl SwapPair {
    pub fn diff(&self) -> u64 {
        self.heavy.sum.saturating_sub(self.light.sum)
    }

    pub fn len(&self) -> usize {
        self.heavy.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heavy.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoundSummary {
    pub heavy_side: TeamSide,
    pub gap_before: u64,
    pub gap_after: u64,
    pub swapped: usize,           // Players moved in each direction
    pub balance_time: Duration,
}

impl RoundSummary {
    pub fn swapped_any(&self) -> bool {
        self.swapped > 0
    }
}

pub fn balance_teams(roster: &mut Roster, context: &BalanceContext) -> Result<RoundSummary, RosterError> {
    roster.check_partition()?;

    let heavy_side = roster.heavier_side();
    let gap_before = roster.gap();

    roster.populate_subsets(context.max_players_in_subset);

    let start = Instant::now();

    let pair = select_swap(roster.team(heavy_side), roster.team(heavy_side.other()));
    let swapped = match &pair {
        Some(pair) => {
            swap_players(roster, heavy_side, pair)?;
            pair.len()
        },
        None => {
            roster.clear_subsets();
            0
        },
    };

    update_expectations(roster, heavy_side, context);

    let balance_time = start.elapsed();

    roster.check_partition()?;

    let summary = RoundSummary {
        heavy_side,
        gap_before,
        gap_after: roster.gap(),
        swapped,
        balance_time,
    };

    if summary.swapped_any() {
        info!("Swapped {} player(s) each way, gap {} -> {}", summary.swapped, summary.gap_before, summary.gap_after);
    } else {
        info!("No swap brings the gap of {} closer to parity", summary.gap_before);
    }

    Ok(summary)
}

// Best equal-size pair whose Elo difference is positive and at most half the current gap.
// Ties keep the first pair found.
pub fn select_swap(heavy: &Team, light: &Team) -> Option<SwapPair> {
    let half_gap = heavy.total_elo.saturating_sub(light.total_elo) / 2;

    let mut closest = 0;
    let mut best: Option<(&Subset, &Subset)> = None;

    for heavy_subset in &heavy.subsets {
        for light_subset in &light.subsets {
            if heavy_subset.len() != light_subset.len() { continue; }
            if heavy_subset.sum <= light_subset.sum { continue; }

            let diff = heavy_subset.sum - light_subset.sum;
            if diff <= half_gap && diff > closest {
                closest = diff;
                best = Some((heavy_subset, light_subset));
            }
        }
    }

    best.map(|(heavy, light)| SwapPair { heavy: heavy.clone(), light: light.clone() })
}

// Every id is checked against its side before anything moves, so a stale pair fails
// with the roster untouched. Removals go first so neither team is ever over capacity mid-swap.
pub fn swap_players(roster: &mut Roster, heavy_side: TeamSide, pair: &SwapPair) -> Result<(), RosterError> {
    let light_side = heavy_side.other();

    if pair.heavy.len() != pair.light.len() {
        return Err(RosterError::UnevenSwap { heavy: pair.heavy.len(), light: pair.light.len() });
    }

    for (side, ids) in [(heavy_side, &pair.heavy.players), (light_side, &pair.light.players)] {
        for &id in ids {
            let player = roster.player(id).ok_or(RosterError::UnknownPlayer { id })?;
            if player.team != Some(side) {
                return Err(RosterError::NotOnTeam { id, side });
            }
        }
    }

    for (&from_heavy, &from_light) in pair.heavy.players.iter().zip(&pair.light.players) {
        roster.remove_player(heavy_side, from_heavy);
        roster.remove_player(light_side, from_light);

        roster.add_player(heavy_side, from_light)?;
        roster.add_player(light_side, from_heavy)?;

        debug!("Player {} ({:?}) <-> player {} ({:?})", from_heavy, heavy_side, from_light, light_side);
    }

    roster.clear_subsets();
    Ok(())
}

/// Logistic Elo expectation, in whole percent.
pub fn expected_win(own_elo: u64, opponent_elo: u64, elo_delta: f64) -> u8 {
    let exponent = (opponent_elo as f64 - own_elo as f64) / elo_delta;
    (100.0 / (1.0 + f64::powf(10.0, exponent))).round() as u8
}

// Only the heavy side is computed so the two always add up to 100.
pub fn update_expectations(roster: &mut Roster, heavy_side: TeamSide, context: &BalanceContext) {
    let heavy_elo = roster.team(heavy_side).total_elo;
    let light_elo = roster.team(heavy_side.other()).total_elo;

    let expected = expected_win(heavy_elo, light_elo, context.elo_delta);
    roster.team_mut(heavy_side).expected = expected;
    roster.team_mut(heavy_side.other()).expected = 100 - expected;
}
