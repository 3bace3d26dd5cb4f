use serde::Serialize;

use crate::balance_context::BalanceContext;
use crate::error::{ConfigError, RosterError};
use crate::subset::{get_subsets, Subset};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TeamSide {
    Red,
    Blue,
}

impl TeamSide {
    pub fn other(self) -> Self {
        match self {
            TeamSide::Red => TeamSide::Blue,
            TeamSide::Blue => TeamSide::Red,
        }
    }
}

// The team field is a lookup key into the roster, never ownership.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Player {
    pub id: usize,
    pub name: String,
    pub elo: u32,
    pub team: Option<TeamSide>,
}

#[derive(Debug, Clone)]
pub struct Team {
    pub name: String,
    pub side: TeamSide,
    pub members: Vec<usize>,
    pub capacity: usize,

    pub total_elo: u64,
    pub expected: u8,               // Win chance in percent

    pub subsets: Vec<Subset>,       // Only valid until the next swap
}

impl Team {
    pub fn new(name: String, side: TeamSide, capacity: usize) -> Self {
        Self {
            name,
            side,
            members: Vec::with_capacity(capacity),
            capacity,
            total_elo: 0,
            expected: 0,
            subsets: Vec::new(),
        }
    }

    pub fn is_full(&self) -> bool {
        self.members.len() >= self.capacity
    }

    pub fn contains(&self, id: usize) -> bool {
        self.members.contains(&id)
    }
}

/// Owns every player of a round and both teams. All membership changes go through here.
#[derive(Debug, Clone)]
pub struct Roster {
    red: Team,
    blue: Team,
    players: Vec<Player>,
    total_elo: u64,
}

impl Roster {
    /// Fails on a context whose team size or subset cap the balancer cannot enumerate.
    pub fn new(context: &BalanceContext) -> Result<Self, ConfigError> {
        context.validate()?;

        Ok(Self {
            red: Team::new(context.red_name.clone(), TeamSide::Red, context.max_team_size),
            blue: Team::new(context.blue_name.clone(), TeamSide::Blue, context.max_team_size),
            players: Vec::with_capacity(context.max_players()),
            total_elo: 0,
        })
    }

    /// Clears players, teams and totals so the roster can host a new round.
    pub fn reset(&mut self) {
        for team in [&mut self.red, &mut self.blue] {
            team.members.clear();
            team.subsets.clear();
            team.total_elo = 0;
            team.expected = 0;
        }

        self.players.clear();
        self.total_elo = 0;
    }

    /// Adds a new, unassigned player and returns its id. Ids are indices into the player list.
    pub fn register_player(&mut self, name: String, elo: u32) -> usize {
        let id = self.players.len();
        self.players.push(Player { id, name, elo, team: None });
        self.total_elo += elo as u64;
        id
    }

    pub fn team(&self, side: TeamSide) -> &Team {
        match side {
            TeamSide::Red => &self.red,
            TeamSide::Blue => &self.blue,
        }
    }

    pub(crate) fn team_mut(&mut self, side: TeamSide) -> &mut Team {
        match side {
            TeamSide::Red => &mut self.red,
            TeamSide::Blue => &mut self.blue,
        }
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: usize) -> Option<&Player> {
        self.players.get(id)
    }

    pub fn total_elo(&self) -> u64 {
        self.total_elo
    }

    /// Red only counts as heavier when strictly ahead; a tie makes blue the heavy side.
    pub fn heavier_side(&self) -> TeamSide {
        if self.red.total_elo > self.blue.total_elo { TeamSide::Red } else { TeamSide::Blue }
    }

    pub fn gap(&self) -> u64 {
        self.red.total_elo.abs_diff(self.blue.total_elo)
    }

    pub fn add_player(&mut self, side: TeamSide, id: usize) -> Result<(), RosterError> {
        let player = self.players.get(id).ok_or(RosterError::UnknownPlayer { id })?;
        if let Some(current) = player.team {
            return Err(RosterError::AlreadyAssigned { id, side: current });
        }
        let elo = player.elo as u64;

        let team = self.team_mut(side);
        if team.is_full() {
            return Err(RosterError::CapacityExceeded { team: team.name.clone(), capacity: team.capacity });
        }

        team.members.push(id);
        team.total_elo += elo;
        self.players[id].team = Some(side);

        debug_assert_eq!(self.team(side).total_elo, self.member_elo(side));
        Ok(())
    }

    // Absent ids are a caller mistake and are ignored. Member order is not preserved.
    pub fn remove_player(&mut self, side: TeamSide, id: usize) {
        let Some(elo) = self.players.get(id).map(|p| p.elo as u64) else { return };

        let team = self.team_mut(side);
        let Some(idx) = team.members.iter().position(|&m| m == id) else { return };

        team.total_elo -= elo;
        team.members.swap_remove(idx);
        self.players[id].team = None;

        debug_assert_eq!(self.team(side).total_elo, self.member_elo(side));
    }

    /// Rebuilds both teams' subset collections from their current members.
    pub fn populate_subsets(&mut self, max_players_in_subset: usize) {
        self.red.subsets = get_subsets(&self.red, &self.players, max_players_in_subset);
        self.blue.subsets = get_subsets(&self.blue, &self.players, max_players_in_subset);
    }

    pub fn clear_subsets(&mut self) {
        self.red.subsets.clear();
        self.blue.subsets.clear();
    }

    fn member_elo(&self, side: TeamSide) -> u64 {
        self.team(side).members.iter().map(|&id| self.players[id].elo as u64).sum()
    }

    // Unassigned players pass this check; use check_partition once teams are set up.
    pub fn check_invariants(&self) -> Result<(), RosterError> {
        for side in [TeamSide::Red, TeamSide::Blue] {
            let team = self.team(side);

            if team.members.len() > team.capacity {
                return Err(RosterError::InvariantViolated(format!(
                    "team {} holds {} players, capacity is {}", team.name, team.members.len(), team.capacity
                )));
            }

            if team.total_elo != self.member_elo(side) {
                return Err(RosterError::InvariantViolated(format!(
                    "team {} total {} does not match its members ({})", team.name, team.total_elo, self.member_elo(side)
                )));
            }

            for (idx, id) in team.members.iter().enumerate() {
                if team.members[idx + 1..].contains(id) {
                    return Err(RosterError::InvariantViolated(format!("player {} listed twice on {}", id, team.name)));
                }
            }
        }

        for p in &self.players {
            let on_red = self.red.contains(p.id);
            let on_blue = self.blue.contains(p.id);

            let consistent = match p.team {
                Some(TeamSide::Red) => on_red && !on_blue,
                Some(TeamSide::Blue) => on_blue && !on_red,
                None => !on_red && !on_blue,
            };

            if !consistent {
                return Err(RosterError::InvariantViolated(format!("player {} membership does not match {:?}", p.id, p.team)));
            }
        }

        let player_elo: u64 = self.players.iter().map(|p| p.elo as u64).sum();
        if player_elo != self.total_elo {
            return Err(RosterError::InvariantViolated(format!(
                "roster total {} does not match players ({})", self.total_elo, player_elo
            )));
        }

        Ok(())
    }

    /// Structural checks plus: every registered player sits on exactly one team.
    pub fn check_partition(&self) -> Result<(), RosterError> {
        self.check_invariants()?;

        if let Some(p) = self.players.iter().find(|p| p.team.is_none()) {
            return Err(RosterError::InvariantViolated(format!("player {} is on no team", p.id)));
        }

        let assigned = self.red.members.len() + self.blue.members.len();
        if assigned != self.players.len() {
            return Err(RosterError::InvariantViolated(format!(
                "{} players on teams, {} registered", assigned, self.players.len()
            )));
        }

        Ok(())
    }
}
