use common::{
    BoardFrame, Direction, GameData, PlaybackFrame, Position, Shell, Snapshot, Tank, WallHealth,
};
use ratatui::style::Color;
use terminal::render::{
    board::BoardRenderer,
    standard_renderer::StandardRenderer,
    types::{player_color, CharDimensions, RenderConfig},
};

fn board() -> BoardFrame {
    let snapshot = Snapshot {
        step: 4,
        message: String::new(),
        countdown: -1,
        board: vec![vec![1, 0, 0, 1], vec![0, 2, 0, 0], vec![1, 0, 0, 1]],
        tanks: vec![
            Tank {
                player_id: 1,
                position: Position::new(2, 1),
                direction: Direction::UpLeft,
                destroyed: false,
                remaining_shells: 12,
            },
            Tank {
                player_id: 2,
                position: Position::new(0, 1),
                direction: Direction::Down,
                destroyed: true,
                remaining_shells: 0,
            },
        ],
        shells: vec![
            Shell {
                player_id: 2,
                position: Position::new(1, 2),
                direction: Some(Direction::Right),
                destroyed: false,
            },
            // Shares a cell with tank 1, which is drawn on top.
            Shell {
                player_id: 2,
                position: Position::new(2, 1),
                direction: Some(Direction::Left),
                destroyed: false,
            },
        ],
        wall_health: vec![WallHealth { x: 3, y: 0, health: 1 }],
    };
    let data = GameData::new(vec![snapshot]);
    PlaybackFrame::build(&data, 0).unwrap().board
}

#[test]
fn test_2x1_rendering() {
    let char_dims = CharDimensions::new(2, 1);
    let renderer = BoardRenderer::new(StandardRenderer::new(char_dims));
    let config = RenderConfig {
        chars_per_point: char_dims,
    };

    let lines = renderer.render(&board(), &config).into_lines();

    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0].len(), 8);

    // Full and damaged walls
    assert_eq!(&lines[0][0..2], &['█', '█']);
    assert_eq!(&lines[0][6..8], &['▒', '▒']);

    // Mine
    assert_eq!(lines[1][2], '@');

    // Tank glyph shows the facing and the player number
    assert_eq!(&lines[1][4..6], &['↖', '1']);

    // Destroyed tank is not drawn
    assert_eq!(&lines[1][0..2], &[' ', ' ']);

    // Shell
    assert_eq!(lines[2][2], '•');
}

#[test]
fn test_1x1_rendering() {
    let char_dims = CharDimensions::new(1, 1);
    let renderer = BoardRenderer::new(StandardRenderer::new(char_dims));
    let config = RenderConfig {
        chars_per_point: char_dims,
    };

    let lines = renderer.render(&board(), &config).into_lines();

    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0].len(), 4);
    assert_eq!(lines[0][0], '█');
    assert_eq!(lines[1][1], '@');
    assert_eq!(lines[1][2], '↖');
    assert_eq!(lines[2][1], '•');
}

#[test]
fn tank_cells_use_player_colors() {
    let char_dims = CharDimensions::new(2, 1);
    let renderer = BoardRenderer::new(StandardRenderer::new(char_dims));
    let config = RenderConfig {
        chars_per_point: char_dims,
    };

    let lines = renderer.render(&board(), &config).into_styled_lines();

    let (ch, style) = lines[1][4];
    assert_eq!(ch, '↖');
    assert_eq!(style.fg, Some(player_color(1)));

    let (_, shell_style) = lines[2][2];
    assert_eq!(shell_style.fg, Some(player_color(2)));
    assert_ne!(player_color(1), player_color(2));
    assert_eq!(lines[0][0].1.fg, Some(Color::Gray));
}

#[test]
fn test_custom_dimensions() {
    let char_dims = CharDimensions::new(3, 2);
    let renderer = BoardRenderer::new(StandardRenderer::new(char_dims));
    let config = RenderConfig {
        chars_per_point: char_dims,
    };

    let grid = renderer.render(&board(), &config);
    assert_eq!(grid.physical_width(), 12);
    assert_eq!(grid.physical_height(), 6);

    let lines = grid.into_lines();
    // Walls fill their whole block
    assert!(lines[0..2].iter().all(|row| row[0..3] == ['█'; 3]));
    // Tank at (2,1) leads with its glyph and number on the first row
    assert_eq!(&lines[2][6..9], &['↖', '1', ' ']);
    assert_eq!(&lines[3][6..9], &[' ', ' ', ' ']);
}
