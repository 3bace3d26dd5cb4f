pub mod analysis;
pub mod balance;
pub mod balance_context;
pub mod data_loader;
pub mod error;
pub mod report;
pub mod roster;
pub mod subset;

pub use balance::{balance_teams, select_swap, swap_players, RoundSummary, SwapPair};
pub use balance_context::BalanceContext;
pub use error::{ConfigError, LoadError, RosterError, RoundError};
pub use roster::{Player, Roster, Team, TeamSide};
pub use subset::{get_subsets, Subset};
