use std::{
    fs,
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};

use engine::regression::{
    assert_or_update_golden_hashes, record_state_then_replay_and_compare_render_hashes_with,
    update_goldens_enabled,
};

use tictactoe::board::OutOfGridPolicy;
use tictactoe::session::{Click, SessionState, TicTacToe};
use tictactoe::settings::BoardSettings;
use tictactoe::snapshot::render_state;

fn unique_temp_dir() -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    std::env::temp_dir().join(format!("tictactoe_golden_board_{nanos}"))
}

fn check_golden(name: &str, policy: OutOfGridPolicy, clicks: &[Click]) {
    let out_dir = unique_temp_dir().join(name);
    let mut settings = BoardSettings::default();
    settings.input.out_of_grid = policy;
    let size = settings.canvas_size();

    let game = TicTacToe::new(settings.board_config(), policy);
    let artifacts = record_state_then_replay_and_compare_render_hashes_with(
        name,
        &out_dir,
        game,
        |runner| {
            runner.run(clicks.iter().copied());
        },
        size.width,
        size.height,
        |state: &SessionState, buf: &mut [u8], width: u32, height: u32| {
            render_state(&settings, state, buf, width, height);
        },
    )
    .expect("hash regression run should succeed");

    assert_eq!(artifacts.replay_hashes.len(), clicks.len() + 1);

    let golden_path = engine::regression_golden_path!(name);
    assert!(
        golden_path.exists() || update_goldens_enabled(),
        "missing golden {} (set TICTACTOE_UPDATE_GOLDENS=1 to generate it)",
        golden_path.display()
    );
    assert_or_update_golden_hashes(
        &golden_path,
        name,
        size.width,
        size.height,
        artifacts.replay_hashes,
        update_goldens_enabled(),
    )
    .unwrap_or_else(|e| {
        panic!(
            "golden check failed: {e}\n(hint: set TICTACTOE_UPDATE_GOLDENS=1 to generate/update {})",
            golden_path.display()
        )
    });

    let _ = fs::remove_dir_all(out_dir);
}

#[test]
fn golden_full_board_hashes_are_stable() {
    let clicks = [
        Click::new(150, 150),
        Click::new(20, 20),
        Click::new(250, 20),
        Click::new(20, 250),
        Click::new(250, 250),
        Click::new(150, 20),
        Click::new(20, 150),
        Click::new(250, 150),
        Click::new(150, 250),
    ];
    check_golden("golden_full_board_hashes_are_stable", OutOfGridPolicy::Ignore, &clicks);
}

#[test]
fn golden_pass_through_hashes_are_stable() {
    let clicks = [
        Click::new(305, 305),
        Click::new(150, 305),
        Click::new(150, 150),
        Click::new(150, 150),
    ];
    check_golden(
        "golden_pass_through_hashes_are_stable",
        OutOfGridPolicy::PassThrough,
        &clicks,
    );
}

#[test]
fn ignored_clicks_repeat_the_previous_frame_hash() {
    let out_dir = unique_temp_dir().join("ignored");
    let settings = BoardSettings::default();
    let size = settings.canvas_size();
    let game = TicTacToe::new(settings.board_config(), OutOfGridPolicy::Ignore);

    let artifacts = record_state_then_replay_and_compare_render_hashes_with(
        "ignored_clicks_repeat_the_previous_frame_hash",
        &out_dir,
        game,
        |runner| {
            runner.run([Click::new(50, 50), Click::new(305, 40), Click::new(-3, 60)]);
        },
        size.width,
        size.height,
        |state: &SessionState, buf: &mut [u8], width: u32, height: u32| {
            render_state(&settings, state, buf, width, height);
        },
    )
    .expect("hash regression run should succeed");

    let h = &artifacts.live_hashes;
    assert_ne!(h[0], h[1]);
    assert_eq!(h[1], h[2]);
    assert_ne!(h[2], h[3], "(-3, 60) truncates to cell (0, 0) and is accepted");

    let _ = fs::remove_dir_all(out_dir);
}
