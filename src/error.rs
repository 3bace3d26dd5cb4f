use thiserror::Error;

use crate::roster::TeamSide;

#[derive(Error, Debug, PartialEq)]
pub enum RosterError {
    #[error("Team {team} is full ({capacity} players)")]
    CapacityExceeded { team: String, capacity: usize },

    #[error("Unknown player id: {id}")]
    UnknownPlayer { id: usize },

    #[error("Player {id} is already on team {side:?}")]
    AlreadyAssigned { id: usize, side: TeamSide },

    #[error("Player {id} is not on team {side:?}")]
    NotOnTeam { id: usize, side: TeamSide },

    #[error("Cannot swap {heavy} player(s) for {light}")]
    UnevenSwap { heavy: usize, light: usize },

    #[error("Roster invariant violated: {0}")]
    InvariantViolated(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Team size must be between 1 and {max}, got {got}")]
    TeamSize { got: usize, max: usize },

    #[error("Subset size must be between 1 and the team size ({team_size}), got {got}")]
    SubsetSize { got: usize, team_size: usize },

    #[error("{subsets} subsets per team exceeds the limit of {max}")]
    TooManySubsets { subsets: u64, max: u64 },

    #[error("Elo range is empty: {min} > {max}")]
    EloRange { min: u32, max: u32 },

    #[error("Elo delta must be a positive number, got {0}")]
    EloDelta(f64),

    #[error("Both teams are named {0}")]
    DuplicateTeamName(String),
}

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum RoundError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Roster(#[from] RosterError),
}
