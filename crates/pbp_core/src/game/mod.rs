//! Game simulation: appearances, statistics and the state reducer

mod appearance;
mod reducer;
mod state;
mod stats;

pub use appearance::{position_name, Appearance, Team};
pub use reducer::reduce_state;
pub use state::{GameState, PerTeam, Substitution};
pub use stats::{StatKey, StatKind, Statline, Stats};
