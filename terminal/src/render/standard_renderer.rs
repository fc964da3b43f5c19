use super::traits::CellRenderer;
use super::types::{player_color, CharDimensions, CharPattern};
use common::{Direction, TankMarker, FULL_WALL_HEALTH};
use ratatui::style::{Color, Modifier, Style};

pub struct StandardRenderer {
    char_dims: CharDimensions,
}

impl StandardRenderer {
    pub fn new(char_dims: CharDimensions) -> Self {
        Self { char_dims }
    }

    /// `glyph` in the first column, `rest` filling the other columns of the
    /// first row.
    fn lead_pattern(&self, glyph: char, rest: char) -> CharPattern {
        let mut chars = vec![vec![' '; self.char_dims.horizontal]; self.char_dims.vertical];
        if let Some(row) = chars.first_mut() {
            for (i, cell) in row.iter_mut().enumerate() {
                *cell = if i == 0 { glyph } else { rest };
            }
        }
        CharPattern::new(chars)
    }
}

pub fn direction_glyph(direction: Direction) -> char {
    match direction {
        Direction::Up => '↑',
        Direction::UpRight => '↗',
        Direction::Right => '→',
        Direction::DownRight => '↘',
        Direction::Down => '↓',
        Direction::DownLeft => '↙',
        Direction::Left => '←',
        Direction::UpLeft => '↖',
    }
}

impl CellRenderer for StandardRenderer {
    fn char_dimensions(&self) -> CharDimensions {
        self.char_dims
    }

    fn render_wall(&self, health: u8) -> CharPattern {
        // Damaged walls fade out.
        let (fill, color) = if health >= FULL_WALL_HEALTH {
            ('█', Color::Gray)
        } else {
            ('▒', Color::DarkGray)
        };
        CharPattern::single(fill, self.char_dims).styled(Style::default().fg(color))
    }

    fn render_mine(&self) -> CharPattern {
        let style = Style::default().fg(Color::Red).add_modifier(Modifier::BOLD);
        if self.char_dims.horizontal == 1 && self.char_dims.vertical == 1 {
            return CharPattern::new(vec![vec!['@']]).styled(style);
        }
        self.lead_pattern('@', ' ').styled(style)
    }

    fn render_tank(&self, tank: TankMarker) -> CharPattern {
        let style = Style::default()
            .fg(player_color(tank.player_id))
            .add_modifier(Modifier::BOLD);
        let glyph = direction_glyph(tank.direction);

        if self.char_dims.horizontal >= 2 {
            let id = char::from_digit(tank.player_id % 10, 10).unwrap_or('?');
            let mut pattern = self.lead_pattern(glyph, ' ');
            if let Some(cell) = pattern.chars.first_mut().and_then(|row| row.get_mut(1)) {
                *cell = id;
            }
            pattern.styled(style)
        } else {
            self.lead_pattern(glyph, ' ').styled(style)
        }
    }

    fn render_shell(&self, owner: u32) -> CharPattern {
        self.lead_pattern('•', ' ')
            .styled(Style::default().fg(player_color(owner)))
    }

    fn render_empty(&self) -> CharPattern {
        CharPattern::empty(self.char_dims)
    }
}
