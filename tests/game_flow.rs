//! End-to-end games through the public API.

use async_trait::async_trait;
use scavenger::client::RoundHeader;
use scavenger::models::MatcherConfig;
use scavenger::{
    FilePicker, GameConfig, GameSession, ImageDisplay, Matcher, MatcherClient, ProcessMatcher,
    RngState, RoundController, SampleSet, ScavengerError, ScriptedPicker, Verdict,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

#[derive(Default)]
struct RecordingDisplay {
    shown: Vec<PathBuf>,
    releases: usize,
}

impl ImageDisplay for RecordingDisplay {
    fn show(&mut self, _header: &RoundHeader<'_>, image: &Path) -> scavenger::Result<()> {
        self.shown.push(image.to_owned());
        Ok(())
    }

    fn release(&mut self) {
        self.releases += 1;
    }
}

/// Always answers with the same verdict and counts calls.
struct ConstantMatcher {
    verdict: Verdict,
    calls: Mutex<usize>,
}

#[async_trait]
impl Matcher for ConstantMatcher {
    async fn invoke(&self, _reference: &Path, _candidate: &Path) -> scavenger::Result<Verdict> {
        *self.calls.lock().unwrap() += 1;
        Ok(self.verdict)
    }
}

fn sample_dir(names: &[&str]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for name in names {
        fs::write(dir.path().join(name), b"img").unwrap();
    }
    dir
}

#[tokio::test]
async fn test_perfect_game_from_directory() {
    let dir = sample_dir(&["a.jpg", "b.jpg", "c.jpg", "d.jpg"]);
    let samples = SampleSet::load(dir.path()).unwrap();
    let config = GameConfig::new(3, samples.len()).unwrap();
    let session = GameSession::new(samples, config, &mut RngState::from_seed(2024)).unwrap();

    let matcher = Arc::new(ConstantMatcher {
        verdict: Verdict::Match,
        calls: Mutex::new(0),
    });
    let controller = RoundController::new(MatcherClient::new(matcher.clone()));
    let mut display = RecordingDisplay::default();
    let mut picker = ScriptedPicker::from_specs(["g1.jpg", "g2.jpg", "g3.jpg"]);

    let report = session
        .run(&mut display, &mut picker, &controller)
        .await
        .unwrap();

    assert_eq!(report.tally.match_count, 3);
    assert_eq!(report.tally.miss_count, 0);
    assert_eq!(report.score.total, 100_000 + 300);
    assert_eq!(*matcher.calls.lock().unwrap(), 3);
    assert_eq!(display.shown.len(), 3);
    assert!(display.shown.iter().all(|p| p.starts_with(dir.path())));
    assert_eq!(display.releases, 1);
}

#[tokio::test]
async fn test_all_cancelled_game_goes_negative() {
    let dir = sample_dir(&["a.jpg", "b.jpg", "c.jpg", "d.jpg", "e.jpg"]);
    let samples = SampleSet::load(dir.path()).unwrap();
    let config = GameConfig::new(5, samples.len()).unwrap();
    let session = GameSession::new(samples, config, &mut RngState::from_seed(1)).unwrap();

    let matcher = Arc::new(ConstantMatcher {
        verdict: Verdict::Match,
        calls: Mutex::new(0),
    });
    let controller = RoundController::new(MatcherClient::new(matcher.clone()));
    let mut display = RecordingDisplay::default();
    let mut picker = ScriptedPicker::from_specs(vec!["skip"; 15]);

    let report = session
        .run(&mut display, &mut picker, &controller)
        .await
        .unwrap();

    assert_eq!(report.tally.miss_count, 5);
    assert_eq!(report.score.miss_penalty, 500);
    assert_eq!(report.score.total, -500);
    assert_eq!(*matcher.calls.lock().unwrap(), 0);
}

#[test]
fn test_round_count_rejected_before_game() {
    let dir = sample_dir(&["a.jpg", "b.jpg"]);
    let samples = SampleSet::load(dir.path()).unwrap();

    for requested in ["0", "3", "lots"] {
        let err = GameConfig::parse(requested, samples.len()).unwrap_err();
        assert_eq!(err.exit_status().code(), 2);
    }
}

#[cfg(unix)]
#[tokio::test]
async fn test_game_with_matcher_process() {
    let dir = sample_dir(&["bridge.jpg", "tower.jpg"]);
    let work = TempDir::new().unwrap();

    // Match when the candidate's file name starts with the reference's stem.
    let script = work.path().join("matcher.sh");
    fs::write(
        &script,
        r#"ref=$(basename "$1"); ref=${ref%.*}
case "$(basename "$2")" in
  "$ref"*) exit 0 ;;
  garbage*) exit 7 ;;
  *) exit 1 ;;
esac
"#,
    )
    .unwrap();

    let matcher_config = MatcherConfig {
        program: PathBuf::from("/bin/sh"),
        leading_args: vec![script.to_string_lossy().into_owned()],
        artifact: work.path().join("lastMatch.png"),
        poll_interval_ms: 5,
        show_progress: false,
    };
    let matcher = Arc::new(ProcessMatcher::from_config(&matcher_config));
    let controller = RoundController::new(MatcherClient::new(matcher));

    let samples = SampleSet::load(dir.path()).unwrap();
    let config = GameConfig::new(2, samples.len()).unwrap();
    let session = GameSession::new(samples, config, &mut RngState::from_seed(9)).unwrap();
    let order: Vec<String> = session.challenges().to_vec();
    let stem = |name: &str| name.trim_end_matches(".jpg").to_string();

    // Round 1: unknown exit code, then a match. Round 2: three misses.
    let mut picker = ScriptedPicker::from_specs([
        "garbage.jpg".to_string(),
        format!("{}_other_angle.jpg", stem(&order[0])),
        "nothing.jpg".to_string(),
        "skip".to_string(),
        "still_nothing.jpg".to_string(),
    ]);
    let mut display = RecordingDisplay::default();

    let report = session
        .run(&mut display, &mut picker, &controller)
        .await
        .unwrap();

    assert_eq!(report.tally.match_count, 1);
    assert_eq!(report.tally.miss_count, 1);
    assert_eq!(
        picker.acknowledged(),
        &[
            (1, Verdict::Unknown(Some(7))),
            (2, Verdict::Match),
            (1, Verdict::NoMatch),
            (2, Verdict::NoMatch),
            (3, Verdict::NoMatch),
        ]
    );
    assert_eq!(report.score.total, 50_000 + 100 - 20);
    assert_eq!(display.releases, 1);
}

#[cfg(unix)]
#[tokio::test]
async fn test_invalid_request_from_process_aborts() {
    let dir = sample_dir(&["a.jpg", "b.jpg"]);
    let matcher_config = MatcherConfig {
        program: PathBuf::from("/bin/sh"),
        leading_args: vec!["-c".to_string(), "exit 2".to_string()],
        poll_interval_ms: 5,
        show_progress: false,
        ..MatcherConfig::default()
    };
    let controller = RoundController::new(MatcherClient::new(Arc::new(
        ProcessMatcher::from_config(&matcher_config),
    )));

    let samples = SampleSet::load(dir.path()).unwrap();
    let config = GameConfig::new(2, samples.len()).unwrap();
    let session = GameSession::new(samples, config, &mut RngState::from_seed(3)).unwrap();
    let mut picker = ScriptedPicker::from_specs(["x.jpg", "y.jpg"]);
    let mut display = RecordingDisplay::default();

    let err = session
        .run(&mut display, &mut picker, &controller)
        .await
        .unwrap_err();

    assert!(matches!(err, ScavengerError::InvalidRequest { .. }));
    assert_eq!(picker.remaining(), 1);
    assert_eq!(display.releases, 1);
}

#[tokio::test]
async fn test_picker_trait_object_runs_game() {
    let dir = sample_dir(&["only.jpg"]);
    let samples = SampleSet::load(dir.path()).unwrap();
    let config = GameConfig::new(1, 1).unwrap();
    let session = GameSession::new(samples, config, &mut RngState::from_seed(0)).unwrap();

    let matcher = Arc::new(ConstantMatcher {
        verdict: Verdict::NoMatch,
        calls: Mutex::new(0),
    });
    let controller = RoundController::new(MatcherClient::new(matcher));
    let mut boxed: Box<dyn FilePicker> =
        Box::new(ScriptedPicker::from_specs(["a.jpg", "b.jpg", "c.jpg"]));
    let mut display = RecordingDisplay::default();

    let report = session
        .run(&mut display, boxed.as_mut(), &controller)
        .await
        .unwrap();

    assert_eq!(report.tally.miss_count, 1);
    assert_eq!(report.score.accuracy, 0.0);
}
