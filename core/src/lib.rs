use serde::{Deserialize, Serialize};

pub use autosave::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use movement::*;
pub use overlay::*;
pub use save::*;
pub use token::*;
pub use types::*;
pub use view::*;

mod autosave;
mod engine;
mod error;
mod generator;
mod movement;
mod overlay;
mod save;
mod token;
mod types;
mod view;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Token value the player is trying to reach.
    pub goal: u64,
    /// Interaction radius in cells, Chebyshev metric, boundary inclusive.
    pub radius: u64,
    /// World seed. Every world built from the same seed generates the same
    /// base tokens, so all players of a deployment share one world.
    pub seed: u64,
}

impl GameConfig {
    pub const DEFAULT_GOAL: u64 = 32;
    pub const DEFAULT_RADIUS: u64 = 3;

    pub const fn new_unchecked(goal: u64, radius: u64, seed: u64) -> Self {
        Self { goal, radius, seed }
    }

    pub fn new(goal: u64, radius: u64, seed: u64) -> Self {
        Self::new_unchecked(goal.max(2), radius, seed)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new_unchecked(Self::DEFAULT_GOAL, Self::DEFAULT_RADIUS, 0)
    }
}
