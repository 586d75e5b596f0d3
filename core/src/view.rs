use crate::*;

/// One visible cell of the render model.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CellView {
    pub cell: Cell,
    pub token: Token,
    /// Within the interaction radius of the player.
    pub near: bool,
}

/// HUD fields for the presentation layer to draw verbatim.
#[derive(Clone, Debug, PartialEq)]
pub struct HudModel {
    pub held: Token,
    pub goal: u64,
    pub player_cell: Cell,
    pub status: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RenderModel {
    /// Row-major, rows then columns ascending.
    pub cells: Vec<CellView>,
    pub hud: HudModel,
}

impl<G: TokenGenerator> GameWorld<G> {
    /// Pure projection of the world onto `window`: every cell whose bounds
    /// intersect it, padded by a one-cell margin on each side so edges do not
    /// flicker while the viewport moves.
    pub fn render_model(&self, window: GeoRect, status: &str) -> RenderModel {
        let (min_row, min_col) = to_cell(window.min_lat, window.min_lng);
        let (max_row, max_col) = to_cell(window.max_lat, window.max_lng);

        let rows = min_row.saturating_sub(1)..=max_row.saturating_add(1);
        let cols = min_col.saturating_sub(1)..=max_col.saturating_add(1);
        let mut cells = Vec::new();
        for row in rows {
            for col in cols.clone() {
                let cell = (row, col);
                cells.push(CellView {
                    cell,
                    token: self.token_at(cell),
                    near: self.in_range(cell),
                });
            }
        }

        RenderModel {
            cells,
            hud: HudModel {
                held: self.held(),
                goal: self.goal(),
                player_cell: self.player_cell(),
                status: status.to_owned(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::tests::world;

    #[test]
    fn window_enumeration_includes_one_cell_margin() {
        let world = world();
        // window spanning cells (0,0)..=(2,2)
        let window = GeoRect {
            min_lat: 0.000_05,
            min_lng: 0.000_05,
            max_lat: 0.000_25,
            max_lng: 0.000_25,
        };
        let model = world.render_model(window, "");

        // margin widens it to (-1,-1)..=(3,3): a 5x5 block
        assert_eq!(model.cells.len(), 25);
        assert_eq!(model.cells.first().map(|c| c.cell), Some((-1, -1)));
        assert_eq!(model.cells.last().map(|c| c.cell), Some((3, 3)));
    }

    #[test]
    fn near_flag_tracks_the_interaction_radius() {
        let mut world = world();
        world.step(1, 1); // player at (1,1), radius 3
        let model = world.render_model(cell_bounds((1, 1)), "");

        for cell_view in &model.cells {
            assert_eq!(
                cell_view.near,
                chebyshev(cell_view.cell, (1, 1)) <= GameConfig::DEFAULT_RADIUS,
                "near flag wrong for {:?}",
                cell_view.cell
            );
        }
    }

    #[test]
    fn hud_reflects_current_state() {
        let mut world = world();
        world.overlay.set((0, 1), Token::Value(4));
        world.click_cell((0, 1));

        let model = world.render_model(cell_bounds((0, 0)), "picked up 4");
        assert_eq!(model.hud.held, Token::Value(4));
        assert_eq!(model.hud.goal, GameConfig::DEFAULT_GOAL);
        assert_eq!(model.hud.player_cell, (0, 0));
        assert_eq!(model.hud.status, "picked up 4");
    }

    #[test]
    fn overlay_edits_show_through_the_model() {
        let mut world = world();
        world.overlay.set((0, 0), Token::Value(8));
        let model = world.render_model(cell_bounds((0, 0)), "");
        let view = model
            .cells
            .iter()
            .find(|c| c.cell == (0, 0))
            .expect("player cell must be visible");
        assert_eq!(view.token, Token::Value(8));
    }
}
