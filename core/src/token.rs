/// A single collectible token value.
///
/// `Empty` is a real, storable state, not an absence: the overlay records it
/// for cells the player has explicitly emptied, which must stay
/// distinguishable from cells that were never touched.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Token {
    Empty,
    Value(u64),
}

impl Token {
    pub const fn is_empty(self) -> bool {
        matches!(self, Self::Empty)
    }

    pub const fn value(self) -> Option<u64> {
        match self {
            Self::Empty => None,
            Self::Value(v) => Some(v),
        }
    }

    /// Codec helper: `null`/absent maps to `Empty`.
    pub const fn from_value(value: Option<u64>) -> Self {
        match value {
            None => Self::Empty,
            Some(v) => Self::Value(v),
        }
    }
}

impl Default for Token {
    fn default() -> Self {
        Self::Empty
    }
}
