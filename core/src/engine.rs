use crate::*;

/// Result of clicking a cell. All six variants are expected, reportable
/// states; none is an error. Rejections mutate nothing.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Target is outside the interaction radius. Checked before any state
    /// inspection.
    TooFar,
    /// Hand and target are both empty.
    NothingToPickUp,
    /// Hand and target hold different non-empty values.
    Incompatible,
    /// Target token moved into the hand; the target cell is now empty.
    PickedUp { value: u64, goal_reached: bool },
    /// Held token moved into the empty target cell.
    Placed { value: u64 },
    /// Held and target tokens fused into double their value in the target.
    Merged { value: u64, goal_reached: bool },
}

impl ClickOutcome {
    /// Whether this outcome mutated the world.
    pub const fn has_update(self) -> bool {
        use ClickOutcome::*;
        match self {
            TooFar => false,
            NothingToPickUp => false,
            Incompatible => false,
            PickedUp { .. } => true,
            Placed { .. } => true,
            Merged { .. } => true,
        }
    }

    pub const fn goal_reached(self) -> bool {
        matches!(
            self,
            Self::PickedUp {
                goal_reached: true,
                ..
            } | Self::Merged {
                goal_reached: true,
                ..
            }
        )
    }
}

/// The full world-state aggregate: player position, held token, overlay,
/// movement mode, and the deterministic generator behind it all.
///
/// All token mutations are routed through [`GameWorld::click_cell`], which is
/// what keeps the doubling invariant structural rather than policed.
#[derive(Clone, Debug)]
pub struct GameWorld<G: TokenGenerator = HashedTokenGenerator> {
    pub(crate) config: GameConfig,
    pub(crate) generator: G,
    pub(crate) overlay: WorldOverlay,
    pub(crate) player_cell: Cell,
    pub(crate) held: Token,
    pub(crate) mode: MovementMode,
    pub(crate) follow_enabled: bool,
    pub(crate) last_sample: Option<GeoSample>,
}

impl GameWorld {
    pub fn new(config: GameConfig) -> Self {
        Self::with_generator(config, HashedTokenGenerator::new(config.seed))
    }
}

impl<G: TokenGenerator> GameWorld<G> {
    pub fn with_generator(config: GameConfig, generator: G) -> Self {
        Self {
            config,
            generator,
            overlay: WorldOverlay::new(),
            player_cell: START_CELL,
            held: Token::Empty,
            mode: MovementMode::default(),
            follow_enabled: false,
            last_sample: None,
        }
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn goal(&self) -> u64 {
        self.config.goal
    }

    pub fn radius(&self) -> u64 {
        self.config.radius
    }

    pub fn player_cell(&self) -> Cell {
        self.player_cell
    }

    pub fn held(&self) -> Token {
        self.held
    }

    pub fn movement_mode(&self) -> MovementMode {
        self.mode
    }

    pub fn follow_enabled(&self) -> bool {
        self.follow_enabled
    }

    pub fn last_sample(&self) -> Option<GeoSample> {
        self.last_sample
    }

    pub fn overlay_len(&self) -> usize {
        self.overlay.len()
    }

    /// Effective token at `cell`, overlay first, generator otherwise.
    pub fn token_at(&self, cell: Cell) -> Token {
        self.overlay.value_at(cell, &self.generator)
    }

    /// Whether `cell` is within the interaction radius, boundary inclusive.
    pub fn in_range(&self, cell: Cell) -> bool {
        chebyshev(self.player_cell, cell) <= self.config.radius
    }

    /// The pickup/place/merge state machine, keyed on (held, target).
    ///
    /// Accepted actions perform exactly one overlay write and one held-token
    /// mutation; rejected attempts are pure reads.
    pub fn click_cell(&mut self, cell: Cell) -> ClickOutcome {
        use ClickOutcome::*;

        if !self.in_range(cell) {
            log::debug!(
                "click {:?} rejected, distance {} > radius {}",
                cell,
                chebyshev(self.player_cell, cell),
                self.config.radius
            );
            return TooFar;
        }

        match (self.held, self.token_at(cell)) {
            (Token::Empty, Token::Empty) => NothingToPickUp,
            (Token::Empty, Token::Value(value)) => {
                self.overlay.set(cell, Token::Empty);
                self.held = Token::Value(value);
                log::debug!("picked up {} from {:?}", value, cell);
                PickedUp {
                    value,
                    goal_reached: value >= self.config.goal,
                }
            }
            (Token::Value(value), Token::Empty) => {
                self.overlay.set(cell, Token::Value(value));
                self.held = Token::Empty;
                log::debug!("placed {} at {:?}", value, cell);
                Placed { value }
            }
            (Token::Value(held), Token::Value(target)) if held == target => {
                // the one place a token value is ever produced: exactly 2v
                let value = held.saturating_mul(2);
                self.overlay.set(cell, Token::Value(value));
                self.held = Token::Empty;
                log::debug!("merged {} + {} -> {} at {:?}", held, target, value, cell);
                Merged {
                    value,
                    goal_reached: value >= self.config.goal,
                }
            }
            (Token::Value(_), Token::Value(_)) => Incompatible,
        }
    }

    /// Resets all in-memory state to defaults, keeping the config and the
    /// generator (the shared world itself never changes).
    pub fn new_game(&mut self) {
        log::debug!("new game, dropping {} overlay entries", self.overlay.len());
        self.overlay.reset();
        self.player_cell = START_CELL;
        self.held = Token::Empty;
        self.mode = MovementMode::default();
        self.follow_enabled = false;
        self.last_sample = None;
    }
}
