use serde::Serialize;

use crate::balance::RoundSummary;
use crate::roster::{Roster, TeamSide};

#[derive(Debug, Serialize)]
pub struct PlayerReport {
    pub id: usize,
    pub name: String,
    pub elo: u32,
}

#[derive(Debug, Serialize)]
pub struct TeamReport {
    pub name: String,
    pub expected: u8,
    pub total_elo: u64,
    pub players: Vec<PlayerReport>,
}

#[derive(Debug, Serialize)]
pub struct RoundReport {
    pub teams: Vec<TeamReport>,
    pub gap_before: u64,
    pub gap_after: u64,
    pub swapped: usize,
    pub balance_time_ms: f64,
}

impl TeamReport {
    pub fn new(roster: &Roster, side: TeamSide) -> Self {
        let team = roster.team(side);
        let players = team.members.iter()
            .filter_map(|&id| roster.player(id))
            .map(|p| PlayerReport { id: p.id, name: p.name.clone(), elo: p.elo })
            .collect();

        Self {
            name: team.name.clone(),
            expected: team.expected,
            total_elo: team.total_elo,
            players,
        }
    }
}

impl RoundReport {
    pub fn new(roster: &Roster, summary: &RoundSummary) -> Self {
        Self {
            teams: vec![TeamReport::new(roster, TeamSide::Red), TeamReport::new(roster, TeamSide::Blue)],
            gap_before: summary.gap_before,
            gap_after: summary.gap_after,
            swapped: summary.swapped,
            balance_time_ms: summary.balance_time.as_secs_f64() * 1000.0,
        }
    }
}

pub fn output_report(roster: &Roster, summary: &RoundSummary) {
    let report = RoundReport::new(roster, summary);

    for t in &report.teams {
        println!("====================");
        println!("Team: {0} | Expected = {1}%", t.name, t.expected);

        for p in &t.players {
            println!("|{0:3}. | {1:20} | {2:5}", p.id, p.name, p.elo);
        }

        println!("\nTotal Elo: {}\n", t.total_elo);
    }

    println!("Gap: {0} -> {1} | Swapped {2} each way | Time taken: {3:.3}ms",
        report.gap_before,
        report.gap_after,
        report.swapped,
        report.balance_time_ms,
    );
}

pub fn output_json(roster: &Roster, summary: &RoundSummary) -> Result<(), serde_json::Error> {
    let report = RoundReport::new(roster, summary);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
