use std::{
    fs,
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};

use engine::graphics::WHITE;
use engine::surface::Surface;

use tictactoe::board::{BLUE, OutOfGridPolicy, Player, RED};
use tictactoe::session::{Click, parse_clicks};
use tictactoe::settings::{BoardSettings, SettingsStore};
use tictactoe::snapshot::{render_clicks, replay_clicks, write_png};

fn unique_temp_path(tag: &str, ext: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    std::env::temp_dir().join(format!("tictactoe_{tag}_{nanos}.{ext}"))
}

#[test]
fn replay_records_one_state_per_click() {
    let settings = BoardSettings::default();
    let clicks = parse_clicks("150,150 20,20 305,20 250,250").expect("valid clicks");
    let runner = replay_clicks(&settings, &clicks);

    assert_eq!(runner.history().len(), clicks.len() + 1);
    let turns: Vec<Player> = runner.history().iter().map(|s| s.turn()).collect();
    // The third click lands off-grid and is ignored by default.
    assert_eq!(
        turns,
        vec![Player::X, Player::O, Player::X, Player::X, Player::O]
    );
    assert_eq!(runner.state().placements().len(), 3);
}

#[test]
fn render_clicks_matches_live_drawing() {
    let settings = BoardSettings::default();
    let surface = render_clicks(&settings, &[Click::new(20, 20), Click::new(150, 150)]);

    assert_eq!(surface.pixel(0, 0), Some(WHITE));
    assert_eq!(surface.pixel(60, 60), Some(BLUE));
    assert_eq!(surface.pixel(160, 112), Some(RED));
}

#[test]
fn write_png_emits_a_png_file() {
    let settings = BoardSettings::default();
    let surface = render_clicks(&settings, &[Click::new(150, 150)]);
    let size = surface.size();
    let out = unique_temp_path("snapshot", "png");

    write_png(&out, size.width, size.height, surface.frame()).expect("write png");

    let bytes = fs::read(&out).expect("read png back");
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");

    let _ = fs::remove_file(out);
}

#[test]
fn write_png_rejects_a_short_buffer() {
    let out = unique_temp_path("short", "png");
    let err = write_png(&out, 4, 4, &[0u8; 10]);
    assert!(err.is_err());
    let _ = fs::remove_file(out);
}

#[test]
fn settings_store_round_trips_and_falls_back_on_garbage() {
    let path = unique_temp_path("settings", "json");
    let store = SettingsStore::new(&path);

    // Missing file: defaults.
    assert_eq!(store.load(), BoardSettings::default());

    let mut settings = BoardSettings::default();
    settings.layout.cell_size = 60;
    settings.input.out_of_grid = OutOfGridPolicy::PassThrough;
    store.save(&settings).expect("save settings");
    assert_eq!(store.load(), settings);

    fs::write(&path, "{ not json").expect("write garbage");
    assert_eq!(store.load(), BoardSettings::default());

    let _ = fs::remove_file(path);
}
