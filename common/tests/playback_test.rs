use std::time::Duration;

use common::{
    Direction, GameData, PlaybackError, PlaybackFrame, PlaybackSession, PlaybackState,
    PlaybackView, Position, Scheduler, Shell, Snapshot, Tank, Terrain, WallHealth,
};

#[derive(Default)]
struct RecordingView {
    frames: Vec<PlaybackFrame>,
    playing: Vec<bool>,
}

impl PlaybackView for RecordingView {
    fn render(&mut self, frame: &PlaybackFrame) {
        self.frames.push(frame.clone());
    }

    fn set_playing(&mut self, playing: bool) {
        self.playing.push(playing);
    }
}

#[derive(Default)]
struct RecordingScheduler {
    next_id: u32,
    live: Vec<(u32, Duration)>,
    started: u32,
    broken: bool,
}

impl Scheduler for RecordingScheduler {
    type Handle = u32;

    fn start(&mut self, period: Duration) -> Result<u32, PlaybackError> {
        if self.broken {
            return Err(PlaybackError::TimerUnavailable("no timers".to_string()));
        }
        self.next_id += 1;
        self.started += 1;
        self.live.push((self.next_id, period));
        Ok(self.next_id)
    }

    fn cancel(&mut self, handle: u32) {
        self.live.retain(|(id, _)| *id != handle);
    }
}

type Session = PlaybackSession<RecordingView, RecordingScheduler>;

fn snapshot(step: u32, message: &str) -> Snapshot {
    Snapshot {
        step,
        message: message.to_string(),
        countdown: -1,
        board: vec![vec![1, 0, 0], vec![0, 2, 3], vec![1, 0, 0]],
        tanks: vec![
            Tank {
                player_id: 2,
                position: Position::new(2, 2),
                direction: Direction::Left,
                destroyed: step >= 3,
                remaining_shells: 16 - step,
            },
            Tank {
                player_id: 1,
                position: Position::new(2, 1),
                direction: Direction::UpRight,
                destroyed: false,
                remaining_shells: 16,
            },
        ],
        shells: vec![
            Shell {
                player_id: 1,
                position: Position::new(1, 0),
                direction: Some(Direction::Up),
                destroyed: false,
            },
            Shell {
                player_id: 2,
                position: Position::new(2, 0),
                direction: None,
                destroyed: true,
            },
        ],
        wall_health: vec![WallHealth { x: 0, y: 0, health: 1 }],
    }
}

fn game(len: u32) -> GameData {
    let mut snapshots: Vec<Snapshot> = (0..len).map(|step| snapshot(step, &format!("Step {step}"))).collect();
    if let Some(last) = snapshots.last_mut() {
        last.message = String::new();
    }
    if len > 2 {
        snapshots[1].message = "Player 2 fired".to_string();
    }
    GameData::new(snapshots)
}

fn session(len: u32) -> Session {
    PlaybackSession::new(game(len), RecordingView::default(), RecordingScheduler::default())
        .unwrap()
}

#[test]
fn empty_sequence_aborts_initialization() {
    let result = PlaybackSession::new(
        GameData::new(vec![]),
        RecordingView::default(),
        RecordingScheduler::default(),
    );
    assert!(matches!(result, Err(PlaybackError::NoSnapshots)));
}

#[test]
fn construction_renders_first_snapshot() {
    let session = session(4);
    let frame = session.view().frames.last().unwrap();

    assert_eq!(session.cursor(), 0);
    assert_eq!(frame.status.to_string(), "Step: 0 / 3");
    assert!(!frame.transport.previous);
    assert!(frame.transport.next);
}

#[test]
fn render_is_idempotent() {
    let mut session = session(4);
    for index in 0..4 {
        session.render_at(index).unwrap();
        session.render_at(index).unwrap();
        let frames = &session.view().frames;
        assert_eq!(frames[frames.len() - 1], frames[frames.len() - 2]);
    }
}

#[test]
fn out_of_range_render_changes_nothing() {
    let mut session = session(3);
    session.render_at(1).unwrap();
    let rendered = session.view().frames.len();

    assert_eq!(
        session.render_at(3),
        Err(PlaybackError::InvalidIndex { index: 3, len: 3 })
    );
    assert_eq!(session.cursor(), 1);
    assert_eq!(session.view().frames.len(), rendered);
}

#[test]
fn board_frame_reflects_snapshot_contents() {
    let mut session = session(4);
    session.render_at(3).unwrap();
    let frame = session.view().frames.last().unwrap().clone();
    let board = &frame.board;

    assert_eq!(board.get(0, 0).unwrap().terrain, Terrain::Wall { health: 1 });
    // No health entry: drawn at full health.
    assert_eq!(board.get(0, 2).unwrap().terrain, Terrain::Wall { health: 2 });
    assert_eq!(board.get(1, 1).unwrap().terrain, Terrain::Mine);
    // Board tank code is only a hint; the tank list decides.
    assert_eq!(board.get(2, 1).unwrap().terrain, Terrain::Empty);
    assert_eq!(board.get(2, 1).unwrap().tank.map(|t| t.player_id), Some(1));
    // Player 2 is destroyed by step 3.
    assert_eq!(board.get(2, 2).unwrap().tank, None);
    assert_eq!(board.get(1, 0).unwrap().shells, vec![1]);
    assert!(board.get(2, 0).unwrap().shells.is_empty());

    let players: Vec<u32> = frame.tanks.iter().map(|t| t.player_id).collect();
    assert_eq!(players, vec![1, 2]);
}

#[test]
fn navigation_is_guarded_at_boundaries() {
    let mut session = session(3);

    assert!(!session.advance(-1));
    assert_eq!(session.cursor(), 0);

    session.last();
    assert_eq!(session.cursor(), 2);
    let rendered = session.view().frames.len();
    assert!(!session.advance(1));
    assert_eq!(session.cursor(), 2);
    assert_eq!(session.view().frames.len(), rendered);

    session.first();
    assert_eq!(session.cursor(), 0);
    session.next();
    session.next();
    session.previous();
    assert_eq!(session.cursor(), 1);
}

#[test]
fn playing_twice_keeps_a_single_timer() {
    let mut session = session(5);
    session.play();
    session.play();

    assert_eq!(session.state(), PlaybackState::Playing);
    assert_eq!(session.scheduler().live.len(), 1);
    assert_eq!(session.scheduler().started, 1);
    assert_eq!(session.view().playing, vec![true]);
}

#[test]
fn ticking_to_the_end_auto_pauses() {
    let mut session = session(3);
    session.play();

    session.tick();
    assert_eq!(session.cursor(), 1);
    assert!(session.is_playing());

    session.tick();
    assert_eq!(session.cursor(), 2);
    assert_eq!(session.state(), PlaybackState::Paused);
    assert!(session.scheduler().live.is_empty());
    assert_eq!(session.view().playing, vec![true, false]);

    // A stray tick after pausing is ignored.
    session.tick();
    assert_eq!(session.cursor(), 2);
}

#[test]
fn navigation_pauses_playback() {
    let mut session = session(5);
    session.play();
    session.next();

    assert_eq!(session.state(), PlaybackState::Paused);
    assert!(session.scheduler().live.is_empty());
    assert_eq!(session.cursor(), 1);

    session.pause();
    assert_eq!(session.view().playing, vec![true, false]);
}

#[test]
fn play_at_final_snapshot_stays_paused() {
    let mut session = session(3);
    session.last();
    session.play();

    assert_eq!(session.state(), PlaybackState::Paused);
    assert_eq!(session.scheduler().started, 0);
}

#[test]
fn failed_timer_start_leaves_session_paused() {
    let mut session = session(5);
    session.scheduler_mut().broken = true;
    session.play();

    assert_eq!(session.state(), PlaybackState::Paused);
    assert!(session.view().playing.is_empty());

    // Ticks without a live timer do nothing.
    session.tick();
    assert_eq!(session.cursor(), 0);

    session.scheduler_mut().broken = false;
    session.play();
    session.scheduler_mut().broken = true;
    session.set_speed(Duration::from_millis(200));
    assert_eq!(session.state(), PlaybackState::Paused);
    assert_eq!(session.view().playing, vec![true, false]);
}

#[test]
fn speed_change_restarts_running_timer() {
    let mut session = session(5);
    session.set_speed(Duration::from_millis(300));
    assert_eq!(session.scheduler().started, 0);

    session.play();
    session.set_speed(Duration::from_millis(100));

    let live = &session.scheduler().live;
    assert_eq!(live.len(), 1);
    assert_eq!(live[0].1, Duration::from_millis(100));
    assert_eq!(session.scheduler().started, 2);
    assert!(session.is_playing());

    session.set_speed(Duration::from_millis(1));
    assert_eq!(session.period(), common::MIN_PLAY_PERIOD);
}

#[test]
fn action_log_follows_messages() {
    let mut session = session(4);
    assert_eq!(session.view().frames.last().unwrap().log, None);

    session.render_at(1).unwrap();
    assert_eq!(
        session.view().frames.last().unwrap().log.as_ref().map(ToString::to_string),
        Some("Step 1: Player 2 fired".to_string())
    );

    session.last();
    assert_eq!(
        session.view().frames.last().unwrap().log.as_ref().map(ToString::to_string),
        Some("Game Complete: Player 2 fired".to_string())
    );
}
