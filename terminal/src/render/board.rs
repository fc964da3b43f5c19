use super::traits::CellRenderer;
use super::types::{CharGrid, RenderConfig};
use common::{BoardFrame, Terrain};

pub struct BoardRenderer<R: CellRenderer> {
    renderer: R,
}

impl<R: CellRenderer> BoardRenderer<R> {
    pub fn new(renderer: R) -> Self {
        Self { renderer }
    }

    /// Terrain first, then shells, with a tank drawn over anything sharing
    /// its cell.
    pub fn render(&self, board: &BoardFrame, config: &RenderConfig) -> CharGrid {
        let mut grid = CharGrid::new(board.width, board.height, config.chars_per_point);

        for (x, y, cell) in board.cells() {
            let pattern = match cell.terrain {
                Terrain::Empty => self.renderer.render_empty(),
                Terrain::Wall { health } => self.renderer.render_wall(health),
                Terrain::Mine => self.renderer.render_mine(),
            };
            grid.set_logical_point(x, y, &pattern);

            if let Some(&owner) = cell.shells.last() {
                grid.set_logical_point(x, y, &self.renderer.render_shell(owner));
            }
            if let Some(tank) = cell.tank {
                grid.set_logical_point(x, y, &self.renderer.render_tank(tank));
            }
        }

        grid
    }
}
