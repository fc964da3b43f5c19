use super::types::{CharDimensions, CharPattern};
use common::TankMarker;

pub trait CellRenderer {
    fn char_dimensions(&self) -> CharDimensions;

    fn render_wall(&self, health: u8) -> CharPattern;

    fn render_mine(&self) -> CharPattern;

    fn render_tank(&self, tank: TankMarker) -> CharPattern;

    fn render_shell(&self, owner: u32) -> CharPattern;

    fn render_empty(&self) -> CharPattern;
}
