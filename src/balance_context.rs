use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::subset::subset_count;

pub const MAX_TEAM_SIZE: usize = 8;
pub const MAX_PLAYERS_IN_SUBSET: usize = 4;

// Subset enumeration walks 2^n masks per team, so n has to stay small.
pub const MAX_ENUMERABLE_TEAM_SIZE: usize = 20;

// The selector compares every pair of subsets, so this bounds its work at about 16M comparisons.
pub const MAX_SUBSETS_PER_TEAM: u64 = 4096;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalanceContext {
    pub max_team_size: usize,
    pub max_players_in_subset: usize,   // 4 keeps the average swap below three players

    pub min_elo: u32,
    pub max_elo: u32,
    pub elo_delta: f64,

    pub red_name: String,
    pub blue_name: String,

    pub seed: Option<u64>,
}

impl Default for BalanceContext {
    fn default() -> Self {
        Self {
            max_team_size: MAX_TEAM_SIZE,
            max_players_in_subset: MAX_PLAYERS_IN_SUBSET,

            min_elo: 1000,
            max_elo: 3000,
            elo_delta: 400.0,

            red_name: "red".to_string(),
            blue_name: "blue".to_string(),

            seed: None,
        }
    }
}

impl BalanceContext {
    /// Reads a JSON context. Missing fields keep their default value.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(path)?;
        let context: BalanceContext = serde_json::from_str(&data)?;
        context.validate()?;
        Ok(context)
    }

    pub fn max_players(&self) -> usize {
        self.max_team_size * 2
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_team_size == 0 || self.max_team_size > MAX_ENUMERABLE_TEAM_SIZE {
            return Err(ConfigError::TeamSize { got: self.max_team_size, max: MAX_ENUMERABLE_TEAM_SIZE });
        }

        if self.max_players_in_subset == 0 || self.max_players_in_subset > self.max_team_size {
            return Err(ConfigError::SubsetSize { got: self.max_players_in_subset, team_size: self.max_team_size });
        }

        let subsets = subset_count(self.max_team_size, self.max_players_in_subset);
        if subsets > MAX_SUBSETS_PER_TEAM {
            return Err(ConfigError::TooManySubsets { subsets, max: MAX_SUBSETS_PER_TEAM });
        }

        if self.min_elo > self.max_elo {
            return Err(ConfigError::EloRange { min: self.min_elo, max: self.max_elo });
        }

        if !self.elo_delta.is_finite() || self.elo_delta <= 0.0 {
            return Err(ConfigError::EloDelta(self.elo_delta));
        }

        if self.red_name == self.blue_name {
            return Err(ConfigError::DuplicateTeamName(self.red_name.clone()));
        }

        Ok(())
    }
}
