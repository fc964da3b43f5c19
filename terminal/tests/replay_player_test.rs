use common::{Direction, GameData, Position, Snapshot, Tank, MIN_PLAY_PERIOD};
use std::io::Write;
use std::time::Duration;
use terminal::replay::player::{self, advance_clock};
use terminal::replay::reader::ReplayReader;

fn game(len: u32) -> GameData {
    let snapshots = (0..len)
        .map(|step| Snapshot {
            step,
            message: if step == 2 {
                "Tank 1 fired".to_string()
            } else {
                format!("Step {step}")
            },
            countdown: -1,
            board: vec![vec![0; 4]; 3],
            tanks: vec![Tank {
                player_id: 1,
                position: Position::new(1, 1),
                direction: Direction::Right,
                destroyed: false,
                remaining_shells: 16,
            }],
            shells: vec![],
            wall_health: vec![],
        })
        .collect();
    GameData::new(snapshots)
}

#[test]
fn frame_clock_advances_by_accumulated_time() {
    let mut player = player::open(game(6), Duration::from_millis(100)).unwrap();
    assert_eq!(player.view().frame().unwrap().index, 0);

    // Paused: time passes without effect.
    assert_eq!(advance_clock(&mut player, Duration::from_millis(500)), 0);

    player.play();
    assert!(player.view().is_playing());
    assert_eq!(advance_clock(&mut player, Duration::from_millis(60)), 0);
    assert_eq!(advance_clock(&mut player, Duration::from_millis(60)), 1);
    assert_eq!(advance_clock(&mut player, Duration::from_millis(250)), 2);
    assert_eq!(player.cursor(), 3);
    assert_eq!(player.view().frame().unwrap().index, 3);
}

#[test]
fn playback_stops_at_last_snapshot() {
    let mut player = player::open(game(3), Duration::from_millis(100)).unwrap();
    player.play();

    let moved = advance_clock(&mut player, Duration::from_secs(5));
    assert_eq!(moved, 2);
    assert_eq!(player.cursor(), 2);
    assert!(!player.is_playing());
    assert!(!player.view().is_playing());
    assert!(!player.scheduler().is_running());
}

#[test]
fn speed_changes_restart_the_clock() {
    let mut player = player::open(game(10), Duration::from_millis(400)).unwrap();
    player.play();
    advance_clock(&mut player, Duration::from_millis(300));

    player.set_speed(Duration::from_millis(200));
    assert_eq!(player.scheduler().period(), Some(Duration::from_millis(200)));
    // Partial progress towards the old period is dropped.
    assert_eq!(advance_clock(&mut player, Duration::from_millis(150)), 0);
    assert_eq!(advance_clock(&mut player, Duration::from_millis(50)), 1);

    player.set_speed(Duration::from_millis(10));
    assert_eq!(player.period(), MIN_PLAY_PERIOD);
}

#[test]
fn empty_feed_cannot_be_played() {
    assert!(player::open(GameData::new(vec![]), Duration::from_millis(100)).is_err());
}

#[test]
fn reader_loads_plain_and_gzipped_feeds() {
    let dir = tempfile::tempdir().unwrap();
    let json = serde_json::to_string(&game(4)).unwrap();

    let plain = dir.path().join("game.json");
    std::fs::write(&plain, &json).unwrap();

    let nested = dir.path().join("older");
    std::fs::create_dir(&nested).unwrap();
    let gz = nested.join("game.json.gz");
    let mut encoder =
        flate2::write::GzEncoder::new(std::fs::File::create(&gz).unwrap(), Default::default());
    encoder.write_all(json.as_bytes()).unwrap();
    encoder.finish().unwrap();

    std::fs::write(dir.path().join("notes.txt"), "not a replay").unwrap();

    let mut found = ReplayReader::list_replays(dir.path()).unwrap();
    found.sort();
    assert_eq!(found, vec![plain.clone(), gz.clone()]);

    let loaded = ReplayReader::load_replay(&gz).unwrap();
    assert_eq!(loaded.game.len(), 4);
    assert_eq!(loaded.title(), "game.json.gz");
    assert_eq!(ReplayReader::load_replay(&plain).unwrap().game, loaded.game);
}

#[test]
fn reader_rejects_malformed_feed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, r#"{"snapshots": [{"step": "x"}]}"#).unwrap();

    let err = ReplayReader::load_replay(&path).unwrap_err();
    assert!(format!("{err:#}").contains("Failed to parse snapshots"));
}
