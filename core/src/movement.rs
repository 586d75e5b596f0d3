use crate::*;

/// How the player's cell changes: discrete manual steps, or snapping to an
/// external continuous position source. The modes are mutually exclusive and
/// switching between them never moves the player; it only changes which
/// input the host routes into the world.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MovementMode {
    Stepped,
    Sampled,
}

impl MovementMode {
    /// Wire name used by the save format.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stepped => "stepped",
            Self::Sampled => "sampled",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "stepped" => Some(Self::Stepped),
            "sampled" => Some(Self::Sampled),
            _ => None,
        }
    }
}

impl Default for MovementMode {
    fn default() -> Self {
        Self::Stepped
    }
}

/// Result of a movement input. Downstream effects (viewport recenter,
/// render rebuild, autosave) hang off `has_update`, identically for both
/// movement modes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Player relocated to the contained cell.
    Moved(Cell),
    /// Position sample mapped to the cell the player is already in.
    Holding,
}

impl MoveOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::Moved(_) => true,
            Self::Holding => false,
        }
    }
}

impl<G: TokenGenerator> GameWorld<G> {
    /// Manual relocation by one cell. Unconditional: the world is infinite
    /// in both axes, so there is no collision and no bounds check.
    pub fn step(&mut self, drow: i64, dcol: i64) -> MoveOutcome {
        let (row, col) = self.player_cell;
        let next = (
            row.saturating_add(drow.clamp(-1, 1)),
            col.saturating_add(dcol.clamp(-1, 1)),
        );
        log::trace!("step {:?} -> {:?}", self.player_cell, next);
        self.player_cell = next;
        MoveOutcome::Moved(next)
    }

    /// Snaps the player to the cell containing `sample`.
    ///
    /// A continuous source emits far more samples than there are cell
    /// transitions, so a sample that lands in the current cell is deduped to
    /// `Holding` and mutates nothing but the informational `last_sample`.
    pub fn apply_sample(&mut self, sample: GeoSample) -> MoveOutcome {
        self.last_sample = Some(sample);
        let cell = sample.cell();
        if cell == self.player_cell {
            MoveOutcome::Holding
        } else {
            log::debug!("sample moved player {:?} -> {:?}", self.player_cell, cell);
            self.player_cell = cell;
            MoveOutcome::Moved(cell)
        }
    }

    pub fn set_movement_mode(&mut self, mode: MovementMode) {
        if self.mode != mode {
            log::debug!("movement mode -> {}", mode.as_str());
            self.mode = mode;
        }
    }

    pub fn set_follow_enabled(&mut self, enabled: bool) {
        self.follow_enabled = enabled;
    }
}
