//! Frame-hash regression helpers.
//!
//! These utilities help you:
//! - run a scenario headlessly, hashing the rendered RGBA frame of every recorded state,
//! - save the recording as JSON, reload it, re-render it, and require identical hashes, and
//! - compare the hashes against a golden file checked into `tests/goldens/`.
//!
//! The engine stays sketch-agnostic by requiring a caller-provided render closure.

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use sha2::{Digest, Sha256};
use tracing::info;

use crate::{GameLogic, HeadlessRunner, TimeMachine};

/// Environment flag helper: accepts `1/true/yes/on` (case-insensitive).
pub fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .ok()
        .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false)
}

/// If set, regression tests may update golden files in-place.
pub fn update_goldens_enabled() -> bool {
    env_flag("TICTACTOE_UPDATE_GOLDENS")
}

pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

#[macro_export]
macro_rules! regression_golden_path {
    ($name:expr) => {{
        let base = $crate::regression::sanitize_filename($name);
        ::std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("goldens")
            .join(format!("{base}.json"))
    }};
}

pub fn rgba_sha256_hex(rgba: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(rgba);
    hex::encode(hasher.finalize())
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FrameHashGolden {
    pub version: u32,
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub hash_alg: String,
    /// One hash per recorded state.
    pub hashes: Vec<String>,
}

impl FrameHashGolden {
    pub fn new(name: impl Into<String>, width: u32, height: u32, hashes: Vec<String>) -> Self {
        Self {
            version: 1,
            name: name.into(),
            width,
            height,
            hash_alg: "sha256".to_string(),
            hashes,
        }
    }
}

pub fn load_golden_json(path: impl AsRef<Path>) -> io::Result<FrameHashGolden> {
    let path = path.as_ref();
    let file = fs::File::open(path)?;
    let reader = io::BufReader::new(file);
    serde_json::from_reader(reader).map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("failed parsing golden json {}: {e}", path.display()),
        )
    })
}

pub fn save_golden_json(path: impl AsRef<Path>, golden: &FrameHashGolden) -> io::Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = fs::File::create(path)?;
    let mut writer = io::BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, golden).map_err(io::Error::other)?;
    writer.flush()?;
    Ok(())
}

/// Compares `golden` against the file at `path`.
///
/// A missing file is written instead of compared, as is any file when `update` is set.
pub fn assert_or_update_golden_json(
    path: impl AsRef<Path>,
    golden: &FrameHashGolden,
    update: bool,
) -> io::Result<()> {
    let path = path.as_ref();
    let exists = path.exists();

    if update || !exists {
        save_golden_json(path, golden)?;
        if exists {
            info!(path = %path.display(), "updated golden");
        } else {
            info!(path = %path.display(), "wrote golden");
        }
        return Ok(());
    }

    let expected = load_golden_json(path)?;
    if expected.version != golden.version
        || expected.hash_alg != golden.hash_alg
        || expected.width != golden.width
        || expected.height != golden.height
    {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "golden metadata mismatch at {}:\nexpected: v{} alg={} {}x{}\nactual:   v{} alg={} {}x{}\n(hint: set TICTACTOE_UPDATE_GOLDENS=1 to rewrite)",
                path.display(),
                expected.version,
                expected.hash_alg,
                expected.width,
                expected.height,
                golden.version,
                golden.hash_alg,
                golden.width,
                golden.height
            ),
        ));
    }

    if expected.hashes.len() != golden.hashes.len() {
        return Err(io::Error::other(format!(
            "golden frame count mismatch at {}: expected {} hashes, got {}\n(hint: set TICTACTOE_UPDATE_GOLDENS=1 to rewrite)",
            path.display(),
            expected.hashes.len(),
            golden.hashes.len()
        )));
    }

    for (i, (a, b)) in expected.hashes.iter().zip(golden.hashes.iter()).enumerate() {
        if a != b {
            return Err(io::Error::other(format!(
                "golden mismatch at {} (frame {i}):\nexpected: {a}\nactual:   {b}\n(hint: set TICTACTOE_UPDATE_GOLDENS=1 to rewrite)",
                path.display()
            )));
        }
    }

    Ok(())
}

pub fn assert_or_update_golden_hashes(
    path: impl AsRef<Path>,
    name: &str,
    width: u32,
    height: u32,
    hashes: Vec<String>,
    update: bool,
) -> io::Result<()> {
    let golden = FrameHashGolden::new(name, width, height, hashes);
    assert_or_update_golden_json(path, &golden, update)
}

#[derive(Debug, Clone)]
pub struct ReplayHashArtifacts {
    pub state_json: PathBuf,
    pub live_hashes: Vec<String>,
    pub replay_hashes: Vec<String>,
}

/// Renders every state in `history` into a fresh buffer and hashes it.
pub fn render_hashes<State, Render>(
    history: &[State],
    width: u32,
    height: u32,
    mut render: Render,
) -> Vec<String>
where
    Render: FnMut(&State, &mut [u8], u32, u32),
{
    let len = (width as usize)
        .saturating_mul(height as usize)
        .saturating_mul(4);
    let mut buf = vec![0u8; len];
    history
        .iter()
        .map(|state| {
            buf.fill(0);
            render(state, &mut buf, width, height);
            rgba_sha256_hex(&buf)
        })
        .collect()
}

/// Record/replay check:
/// - drive `game` live through `drive`, hashing every recorded state,
/// - save the `TimeMachine` to JSON under `out_dir`, load it back, and
/// - re-render the loaded states, requiring hashes identical to the live run.
pub fn record_state_then_replay_and_compare_render_hashes_with<G, Drive, Render>(
    name: &str,
    out_dir: impl AsRef<Path>,
    game: G,
    drive: Drive,
    width: u32,
    height: u32,
    mut render: Render,
) -> io::Result<ReplayHashArtifacts>
where
    G: GameLogic,
    G::State: Serialize + DeserializeOwned,
    Drive: FnOnce(&mut HeadlessRunner<G>),
    Render: FnMut(&G::State, &mut [u8], u32, u32),
{
    let out_dir = out_dir.as_ref();
    fs::create_dir_all(out_dir)?;
    let state_json = out_dir.join(format!("{}.json", sanitize_filename(name)));

    let mut live = HeadlessRunner::new(game);
    drive(&mut live);
    let live_hashes = render_hashes(live.history(), width, height, &mut render);
    live.timemachine().save_json_file(&state_json)?;

    let (game, _) = live.into_parts();
    let tm = TimeMachine::<G::State>::load_json_file(&state_json)?;
    let replay = HeadlessRunner::from_timemachine(game, tm);
    let replay_hashes = render_hashes(replay.history(), width, height, &mut render);

    if live_hashes != replay_hashes {
        let frame = live_hashes
            .iter()
            .zip(replay_hashes.iter())
            .position(|(a, b)| a != b)
            .unwrap_or(live_hashes.len().min(replay_hashes.len()));
        return Err(io::Error::other(format!(
            "replay of {} diverged at frame {frame} (live {} frames, replay {} frames)",
            state_json.display(),
            live_hashes.len(),
            replay_hashes.len()
        )));
    }

    Ok(ReplayHashArtifacts {
        state_json,
        live_hashes,
        replay_hashes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_filename_replaces_separators() {
        assert_eq!(sanitize_filename("a/b c-d_e"), "a_b_c-d_e");
    }

    #[test]
    fn sha256_of_empty_input_is_well_known() {
        assert_eq!(
            rgba_sha256_hex(&[]),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
