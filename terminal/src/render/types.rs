use ratatui::style::{Color, Style};

#[derive(Clone, Copy, Debug)]
pub struct RenderConfig {
    pub chars_per_point: CharDimensions,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CharDimensions {
    pub horizontal: usize,
    pub vertical: usize,
}

impl CharDimensions {
    pub fn new(horizontal: usize, vertical: usize) -> Self {
        Self { horizontal, vertical }
    }
}

/// Board drawn as characters, each with its own style.
pub struct CharGrid {
    grid: Vec<Vec<(char, Style)>>,
    logical_width: usize,
    logical_height: usize,
    char_dims: CharDimensions,
}

impl CharGrid {
    pub fn new(logical_width: usize, logical_height: usize, char_dims: CharDimensions) -> Self {
        let physical_width = logical_width * char_dims.horizontal;
        let physical_height = logical_height * char_dims.vertical;
        let grid = vec![vec![(' ', Style::default()); physical_width]; physical_height];
        Self {
            grid,
            logical_width,
            logical_height,
            char_dims,
        }
    }

    pub fn set_logical_point(&mut self, x: usize, y: usize, pattern: &CharPattern) {
        let start_x = x * self.char_dims.horizontal;
        let start_y = y * self.char_dims.vertical;

        for (dy, row) in pattern.chars.iter().enumerate() {
            for (dx, &ch) in row.iter().enumerate() {
                if let Some(cell) = self
                    .grid
                    .get_mut(start_y + dy)
                    .and_then(|grid_row| grid_row.get_mut(start_x + dx))
                {
                    *cell = (ch, pattern.style);
                }
            }
        }
    }

    pub fn into_lines(self) -> Vec<Vec<char>> {
        self.grid
            .into_iter()
            .map(|row| row.into_iter().map(|(ch, _)| ch).collect())
            .collect()
    }

    pub fn into_styled_lines(self) -> Vec<Vec<(char, Style)>> {
        self.grid
    }

    pub fn physical_width(&self) -> usize {
        self.logical_width * self.char_dims.horizontal
    }

    pub fn physical_height(&self) -> usize {
        self.logical_height * self.char_dims.vertical
    }
}

#[derive(Clone, Debug)]
pub struct CharPattern {
    pub chars: Vec<Vec<char>>,
    pub style: Style,
}

impl CharPattern {
    pub fn new(chars: Vec<Vec<char>>) -> Self {
        Self {
            chars,
            style: Style::default(),
        }
    }

    pub fn single(ch: char, dims: CharDimensions) -> Self {
        Self::new(vec![vec![ch; dims.horizontal]; dims.vertical])
    }

    pub fn empty(dims: CharDimensions) -> Self {
        Self::single(' ', dims)
    }

    pub fn styled(mut self, style: Style) -> Self {
        self.style = style;
        self
    }
}

/// Color used for everything a player owns.
pub fn player_color(player_id: u32) -> Color {
    match player_id % 6 {
        1 => Color::LightRed,
        2 => Color::LightBlue,
        3 => Color::LightGreen,
        4 => Color::LightYellow,
        5 => Color::LightMagenta,
        _ => Color::LightCyan,
    }
}
