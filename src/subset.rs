use log::warn;
use serde::Serialize;

use crate::roster::{Player, Team};

/// Snapshot of a few players from one team and the sum of their Elo.
/// Holds player ids only; it goes stale as soon as that team's membership changes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Subset {
    pub sum: u64,
    pub players: Vec<usize>,
}

impl Subset {
    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

/// Number of subsets of 1..=max_players members a team of `team_size` yields, saturating on overflow.
pub fn subset_count(team_size: usize, max_players: usize) -> u64 {
    let mut total: u64 = 0;
    let mut binomial: u64 = 1;

    for k in 1..=max_players.min(team_size) {
        // C(n, k) = C(n, k - 1) * (n - k + 1) / k, exact at every step
        binomial = binomial.saturating_mul((team_size - k + 1) as u64) / k as u64;
        total = total.saturating_add(binomial);
    }

    total
}

// Every combination of 1..=max_players members. Bit b of the mask picks the member
// counted b places from the end of the team, so the order follows the member list backwards.
pub fn get_subsets(team: &Team, players: &[Player], max_players: usize) -> Vec<Subset> {
    let count = team.members.len();
    let mut subsets = Vec::new();

    let Some(end) = 1u64.checked_shl(count as u32).filter(|_| count < 64) else {
        warn!("Team {} has {} members, too many to enumerate", team.name, count);
        return subsets;
    };

    for mask in 1u64..end {
        let set_bits = mask.count_ones() as usize;
        if set_bits > max_players { continue; }

        let mut subset = Subset { sum: 0, players: Vec::with_capacity(set_bits) };

        for bit in 0..count {
            if (mask >> bit) & 1 == 0 { continue; }

            let id = team.members[count - bit - 1];
            subset.sum += players[id].elo as u64;
            subset.players.push(id);
        }

        subsets.push(subset);
    }

    subsets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::balance_context::BalanceContext;
    use crate::roster::{Roster, Team, TeamSide};

    fn red_team(elos: &[u32]) -> Roster {
        let mut roster = Roster::new(&BalanceContext::default()).unwrap();
        for (i, elo) in elos.iter().enumerate() {
            let id = roster.register_player(format!("p{i}"), *elo);
            roster.add_player(TeamSide::Red, id).unwrap();
        }
        roster
    }

    fn binomial(n: usize, k: usize) -> usize {
        (0..k).fold(1, |acc, i| acc * (n - i) / (i + 1))
    }

    #[test]
    fn counts_combinations_up_to_limit() {
        let roster = red_team(&[1000, 1100, 1200, 1300, 1400, 1500, 1600, 1700]);
        let subsets = get_subsets(roster.team(TeamSide::Red), roster.players(), 4);

        let expected: usize = (1..=4).map(|k| binomial(8, k)).sum();
        assert_eq!(subsets.len(), expected);
        assert_eq!(subsets.len(), 162);
        assert!(subsets.iter().all(|s| (1..=4).contains(&s.len())));
    }

    #[test]
    fn small_team_gets_every_combination() {
        let roster = red_team(&[1000, 2000, 3000]);
        let subsets = get_subsets(roster.team(TeamSide::Red), roster.players(), 4);

        // Mask order, with bit 0 mapped to the last member
        let sums: Vec<u64> = subsets.iter().map(|s| s.sum).collect();
        assert_eq!(sums, vec![3000, 2000, 5000, 1000, 4000, 3000, 6000]);
        assert_eq!(subsets[2].players, vec![2, 1]);
        assert_eq!(subsets[6].players, vec![2, 1, 0]);
    }

    #[test]
    fn sums_match_members() {
        let roster = red_team(&[1234, 2345, 1111, 2999, 1000]);
        for subset in get_subsets(roster.team(TeamSide::Red), roster.players(), 3) {
            let sum: u64 = subset.players.iter().map(|&id| roster.player(id).unwrap().elo as u64).sum();
            assert_eq!(subset.sum, sum);
        }
    }

    #[test]
    fn enumeration_is_repeatable() {
        let roster = red_team(&[1500, 2200, 1300, 2800, 1900, 1000]);
        let first = get_subsets(roster.team(TeamSide::Red), roster.players(), 4);
        let second = get_subsets(roster.team(TeamSide::Red), roster.players(), 4);
        assert_eq!(first, second);
    }

    #[test]
    fn subset_count_matches_enumeration() {
        let roster = red_team(&[1000, 1100, 1200, 1300, 1400, 1500, 1600, 1700]);
        for k in 1..=8 {
            let subsets = get_subsets(roster.team(TeamSide::Red), roster.players(), k);
            assert_eq!(subsets.len() as u64, subset_count(8, k));
        }

        assert_eq!(subset_count(20, 20), (1 << 20) - 1);
        assert_eq!(subset_count(3, 0), 0);
        assert_eq!(subset_count(2, 5), 3);
    }

    #[test]
    fn oversized_team_is_not_enumerated() {
        let mut team = Team::new("huge".to_string(), TeamSide::Red, 64);
        team.members = (0..64).collect();
        let players: Vec<Player> = (0..64)
            .map(|id| Player { id, name: format!("p{id}"), elo: 1000, team: Some(TeamSide::Red) })
            .collect();

        assert!(get_subsets(&team, &players, 1).is_empty());
    }

    #[test]
    fn empty_team_has_no_subsets() {
        let roster = red_team(&[]);
        assert!(get_subsets(roster.team(TeamSide::Red), roster.players(), 4).is_empty());
    }
}
