use crate::*;
pub use hashed::*;

mod hashed;

/// Produces the base token for any cell of the infinite world.
///
/// Implementations must be pure functions of cell identity: the same cell
/// yields the same token for the lifetime of the world instance. The
/// generator is never consulted for a cell present in the overlay.
pub trait TokenGenerator {
    fn base_token(&self, cell: Cell) -> Token;
}
