use crate::*;
use hashbrown::HashMap;

/// Sparse record of player edits layered over the generated world.
///
/// Absence of a cell means "defer to the generator". Presence with
/// [`Token::Empty`] means the player emptied a cell the generator would have
/// populated. First-write order is tracked because the save codec caps the
/// number of persisted entries deterministically.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WorldOverlay {
    entries: HashMap<Cell, Token>,
    order: Vec<Cell>,
}

impl WorldOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Raw overlay entry, if the player has touched this cell.
    pub fn entry(&self, cell: Cell) -> Option<Token> {
        self.entries.get(&cell).copied()
    }

    /// Effective token at `cell`: the overlay always wins over the generator.
    pub fn value_at<G: TokenGenerator>(&self, cell: Cell, generator: &G) -> Token {
        self.entry(cell)
            .unwrap_or_else(|| generator.base_token(cell))
    }

    /// Unconditionally records `token` for `cell`, including `Empty`.
    pub fn set(&mut self, cell: Cell, token: Token) {
        log::trace!("overlay write {:?} <- {:?}", cell, token);
        if self.entries.insert(cell, token).is_none() {
            self.order.push(cell);
        }
    }

    /// Clears every entry. Used by new-game.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    /// Entries in first-write order, each with its latest value.
    pub fn entries_in_order(&self) -> impl Iterator<Item = (Cell, Token)> + '_ {
        self.order.iter().map(|&cell| (cell, self.entries[&cell]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct AllTwos;

    impl TokenGenerator for AllTwos {
        fn base_token(&self, _cell: Cell) -> Token {
            Token::Value(2)
        }
    }

    #[test]
    fn absent_cell_defers_to_generator() {
        let overlay = WorldOverlay::new();
        assert_eq!(overlay.value_at((3, 4), &AllTwos), Token::Value(2));
        assert_eq!(overlay.entry((3, 4)), None);
    }

    #[test]
    fn explicit_empty_beats_generator() {
        let mut overlay = WorldOverlay::new();
        overlay.set((3, 4), Token::Empty);
        assert_eq!(overlay.value_at((3, 4), &AllTwos), Token::Empty);
        assert_eq!(overlay.entry((3, 4)), Some(Token::Empty));
    }

    #[test]
    fn writes_do_not_leak_between_cells() {
        let mut overlay = WorldOverlay::new();
        overlay.set((0, 0), Token::Value(16));
        assert_eq!(overlay.value_at((0, 1), &AllTwos), Token::Value(2));
        assert_eq!(overlay.value_at((1, 0), &AllTwos), Token::Value(2));
    }

    #[test]
    fn rewrites_keep_first_write_order() {
        let mut overlay = WorldOverlay::new();
        overlay.set((0, 0), Token::Value(2));
        overlay.set((1, 1), Token::Value(4));
        overlay.set((0, 0), Token::Empty);

        let in_order: Vec<_> = overlay.entries_in_order().collect();
        assert_eq!(
            in_order,
            vec![((0, 0), Token::Empty), ((1, 1), Token::Value(4))]
        );
    }

    #[test]
    fn reset_clears_everything() {
        let mut overlay = WorldOverlay::new();
        overlay.set((0, 0), Token::Value(2));
        overlay.reset();
        assert!(overlay.is_empty());
        assert_eq!(overlay.entries_in_order().count(), 0);
        assert_eq!(overlay.value_at((0, 0), &AllTwos), Token::Value(2));
    }
}
