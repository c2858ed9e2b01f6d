use std::{
    fs,
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};

use engine::TimeMachine;

fn unique_temp_json_path(tag: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    std::env::temp_dir().join(format!("tictactoe_engine_{tag}_{nanos}.json"))
}

#[test]
fn timemachine_save_and_load_roundtrips_history_and_frame() {
    let mut tm = TimeMachine::new(0i32);
    tm.record(1);
    tm.record(2);

    // Seek back and branch to ensure truncate-on-record behavior persists.
    tm.seek(1);
    tm.record(99);

    assert_eq!(tm.frame(), 2);
    assert_eq!(tm.history(), &[0, 1, 99]);

    let out = unique_temp_json_path("roundtrip");
    tm.save_json_file(&out).expect("save timemachine json");

    let loaded = TimeMachine::<i32>::load_json_file(&out).expect("load timemachine json");
    assert_eq!(loaded.frame(), tm.frame());
    assert_eq!(loaded.history(), tm.history());
    assert_eq!(loaded.state(), tm.state());

    let _ = fs::remove_file(out);
}

#[test]
fn loading_a_recording_with_an_out_of_range_frame_fails() {
    let out = unique_temp_json_path("bad_frame");
    fs::write(&out, r#"{"states":[1,2],"frame":5}"#).expect("write fixture");

    let err = TimeMachine::<i32>::load_json_file(&out).expect_err("frame 5 is out of range");
    assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);

    let _ = fs::remove_file(out);
}
