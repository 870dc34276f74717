use super::*;

use std::collections::HashMap;
use std::sync::Mutex;

use crate::domain::graph::FilterGraph;

#[derive(Debug, Clone, PartialEq)]
enum EngineCall {
    Concat {
        list_file: PathBuf,
        list_body: String,
        output: PathBuf,
    },
    Graph {
        input: PathBuf,
        concat_inputs: Option<usize>,
        output: PathBuf,
    },
}

#[derive(Default)]
struct FakeProbe {
    durations: HashMap<PathBuf, u32>,
    calls: Mutex<u32>,
}

impl FakeProbe {
    fn with(entries: &[(&Path, u32)]) -> Self {
        Self {
            durations: entries
                .iter()
                .map(|(path, seconds)| (path.to_path_buf(), *seconds))
                .collect(),
            calls: Mutex::new(0),
        }
    }

    fn calls(&self) -> u32 {
        *self.calls.lock().unwrap()
    }
}

impl ProbePort for FakeProbe {
    fn clip_duration(&self, file_path: &Path) -> VloopResult<u32> {
        *self.calls.lock().unwrap() += 1;
        self.durations
            .get(file_path)
            .copied()
            .ok_or_else(|| VloopError::Probe {
                path: file_path.to_path_buf(),
                message: "no duration in report".to_string(),
            })
    }
}

#[derive(Default)]
struct RecordingEngine {
    calls: Mutex<Vec<EngineCall>>,
    fail: bool,
}

impl RecordingEngine {
    fn failing() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    fn calls(&self) -> Vec<EngineCall> {
        self.calls.lock().unwrap().clone()
    }

    fn outcome(&self) -> VloopResult<()> {
        if self.fail {
            return Err(VloopError::EngineSpawn {
                program: "ffmpeg".to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
            });
        }
        Ok(())
    }
}

impl EnginePort for RecordingEngine {
    fn run_concat(&self, list_file: &Path, output: &Path) -> VloopResult<()> {
        let list_body = std::fs::read_to_string(list_file).unwrap();
        self.calls.lock().unwrap().push(EngineCall::Concat {
            list_file: list_file.to_path_buf(),
            list_body,
            output: output.to_path_buf(),
        });
        self.outcome()
    }

    fn run_filter_graph(&self, input: &Path, graph: &FilterGraph, output: &Path) -> VloopResult<()> {
        graph.validate().unwrap();
        self.calls.lock().unwrap().push(EngineCall::Graph {
            input: input.to_path_buf(),
            concat_inputs: graph.concat_inputs(),
            output: output.to_path_buf(),
        });
        self.outcome()
    }
}

fn write_video(dir: &Path, name: &str) -> PathBuf {
    let mut header = vec![0x00, 0x00, 0x00, 0x20];
    header.extend_from_slice(b"ftypisom");
    header.extend_from_slice(&[0; 20]);
    let path = dir.join(name);
    std::fs::write(&path, header).unwrap();
    path
}

fn settings(request: LoopRequest, transition: TransitionSpec, out: &Path) -> LoopSettings {
    LoopSettings {
        request,
        transition,
        output_directory: out.to_path_buf(),
        verbose: false,
    }
}

fn interactor(
    probe: &Arc<FakeProbe>,
    engine: &Arc<RecordingEngine>,
    settings: LoopSettings,
) -> LoopInteractor {
    LoopInteractor::new(probe.clone(), engine.clone(), settings)
}

#[test]
fn test_plain_fixed_count_concatenates_without_probing() {
    let dir = tempfile::tempdir().unwrap();
    let clip = write_video(dir.path(), "clip.mp4");
    let probe = Arc::new(FakeProbe::default());
    let engine = Arc::new(RecordingEngine::default());

    let loops = interactor(
        &probe,
        &engine,
        settings(
            LoopRequest::FixedCount(3),
            TransitionSpec::disabled(),
            dir.path(),
        ),
    );
    let report = loops.run(&[clip.clone()]);

    assert!(report.is_success());
    assert_eq!(probe.calls(), 0);

    let calls = engine.calls();
    assert_eq!(calls.len(), 1);
    let EngineCall::Concat {
        list_file,
        list_body,
        output,
    } = &calls[0]
    else {
        panic!("expected concat call, got {:?}", calls[0]);
    };

    let absolute = std::fs::canonicalize(&clip).unwrap();
    let line = format!("file '{}'\n", absolute.display());
    assert_eq!(list_body, &line.repeat(3));
    assert_eq!(output, &dir.path().join("clip_loop-3.mp4"));
    assert!(!list_file.exists());

    let plan = report.succeeded().next().unwrap();
    assert_eq!(plan.count, 3);
    assert_eq!(plan.clip.duration_seconds, None);
}

#[test]
fn test_cross_fade_target_duration_builds_graph() {
    let dir = tempfile::tempdir().unwrap();
    let clip = write_video(dir.path(), "waves.mov");
    let probe = Arc::new(FakeProbe::with(&[(clip.as_path(), 15)]));
    let engine = Arc::new(RecordingEngine::default());

    let loops = interactor(
        &probe,
        &engine,
        settings(
            LoopRequest::TargetDuration { seconds: 35 },
            TransitionSpec::new(true, 5),
            dir.path(),
        ),
    );
    let plan = loops.process_clip(&clip).unwrap();

    assert_eq!(plan.count, 3);
    assert_eq!(plan.clip.duration_seconds, Some(15));
    assert_eq!(
        engine.calls(),
        vec![EngineCall::Graph {
            input: clip.clone(),
            concat_inputs: Some(6),
            output: dir.path().join("waves_length-35s.mp4"),
        }]
    );
}

#[test]
fn test_plain_target_in_minutes_names_output_by_length() {
    let dir = tempfile::tempdir().unwrap();
    let clip = write_video(dir.path(), "city.mp4");
    let probe = Arc::new(FakeProbe::with(&[(clip.as_path(), 25)]));
    let engine = Arc::new(RecordingEngine::default());

    let loops = interactor(
        &probe,
        &engine,
        settings(
            LoopRequest::target_minutes(1),
            TransitionSpec::disabled(),
            dir.path(),
        ),
    );
    let plan = loops.process_clip(&clip).unwrap();

    assert_eq!(plan.count, 3);
    assert_eq!(plan.output, dir.path().join("city_length-1.mp4"));
    assert_eq!(probe.calls(), 1);
}

#[test]
fn test_short_target_is_raised_to_minimum_loop() {
    let dir = tempfile::tempdir().unwrap();
    let clip = write_video(dir.path(), "long.mp4");
    let probe = Arc::new(FakeProbe::with(&[(clip.as_path(), 600)]));
    let engine = Arc::new(RecordingEngine::default());

    let loops = interactor(
        &probe,
        &engine,
        settings(
            LoopRequest::target_minutes(1),
            TransitionSpec::disabled(),
            dir.path(),
        ),
    );
    let plan = loops.plan_clip(&clip).unwrap();

    assert_eq!(plan.count, u32::from(MIN_LOOP_COUNT));
    assert!(engine.calls().is_empty());
}

#[test]
fn test_degenerate_clip_never_reaches_engine() {
    let dir = tempfile::tempdir().unwrap();
    let clip = write_video(dir.path(), "blink.mp4");
    let probe = Arc::new(FakeProbe::with(&[(clip.as_path(), 5)]));
    let engine = Arc::new(RecordingEngine::default());

    for request in [
        LoopRequest::FixedCount(3),
        LoopRequest::TargetDuration { seconds: 35 },
    ] {
        let loops = interactor(
            &probe,
            &engine,
            settings(request, TransitionSpec::new(true, 5), dir.path()),
        );
        let err = loops.process_clip(&clip).unwrap_err();
        assert!(
            matches!(err, VloopError::Domain(DomainError::DegenerateClip { .. })),
            "unexpected error for {}: {:?}",
            request,
            err
        );
    }

    assert!(engine.calls().is_empty());
}

#[test]
fn test_batch_continues_past_failing_clips() {
    let dir = tempfile::tempdir().unwrap();
    let notes = dir.path().join("notes.txt");
    std::fs::write(&notes, b"not a video").unwrap();
    let good = write_video(dir.path(), "good.mp4");
    let unprobed = write_video(dir.path(), "unprobed.mp4");
    let probe = Arc::new(FakeProbe::with(&[(good.as_path(), 20)]));
    let engine = Arc::new(RecordingEngine::default());

    let loops = interactor(
        &probe,
        &engine,
        settings(
            LoopRequest::FixedCount(2),
            TransitionSpec::new(true, 2),
            dir.path(),
        ),
    );
    let report = loops.run(&[notes.clone(), good.clone(), unprobed.clone()]);

    assert!(!report.is_success());
    assert_eq!(report.outcomes.len(), 3);
    assert_eq!(report.succeeded().count(), 1);

    let failed: Vec<_> = report.failed().collect();
    assert_eq!(failed.len(), 2);
    assert_eq!(failed[0].0, notes.as_path());
    assert!(matches!(failed[0].1, VloopError::NotAVideo { .. }));
    assert_eq!(failed[1].0, unprobed.as_path());
    assert!(matches!(failed[1].1, VloopError::Probe { .. }));

    assert_eq!(engine.calls().len(), 1);
}

#[test]
fn test_concat_list_removed_when_engine_fails() {
    let dir = tempfile::tempdir().unwrap();
    let clip = write_video(dir.path(), "clip.mp4");
    let probe = Arc::new(FakeProbe::default());
    let engine = Arc::new(RecordingEngine::failing());

    let loops = interactor(
        &probe,
        &engine,
        settings(
            LoopRequest::FixedCount(4),
            TransitionSpec::disabled(),
            dir.path(),
        ),
    );
    let err = loops.process_clip(&clip).unwrap_err();
    assert!(matches!(err, VloopError::EngineSpawn { .. }));

    let calls = engine.calls();
    let EngineCall::Concat { list_file, .. } = &calls[0] else {
        panic!("expected concat call");
    };
    assert!(!list_file.exists());
}

#[test]
fn test_directory_input_is_expanded() {
    let dir = tempfile::tempdir().unwrap();
    let folder = dir.path().join("clips");
    std::fs::create_dir(&folder).unwrap();
    write_video(&folder, "a.mp4");
    write_video(&folder, "b.mp4");
    std::fs::write(folder.join("readme.md"), b"skip me").unwrap();

    let out = dir.path().join("out");
    std::fs::create_dir(&out).unwrap();
    let probe = Arc::new(FakeProbe::default());
    let engine = Arc::new(RecordingEngine::default());

    let loops = interactor(
        &probe,
        &engine,
        settings(LoopRequest::FixedCount(2), TransitionSpec::disabled(), &out),
    );
    let report = loops.run(&[folder]);

    assert!(report.is_success());
    let outputs: Vec<_> = report.succeeded().map(|plan| plan.output.clone()).collect();
    assert_eq!(
        outputs,
        vec![out.join("a_loop-2.mp4"), out.join("b_loop-2.mp4")]
    );
}

struct BrokenProbe;

impl ProbePort for BrokenProbe {
    fn clip_duration(&self, _file_path: &Path) -> VloopResult<u32> {
        Err(VloopError::Config {
            message: "ffprobe path is not usable".to_string(),
        })
    }
}

#[test]
fn test_fatal_error_stops_batch() {
    let dir = tempfile::tempdir().unwrap();
    let first = write_video(dir.path(), "first.mp4");
    let second = write_video(dir.path(), "second.mp4");
    let engine = Arc::new(RecordingEngine::default());

    let loops = LoopInteractor::new(
        Arc::new(BrokenProbe),
        engine.clone(),
        settings(
            LoopRequest::FixedCount(2),
            TransitionSpec::new(true, 1),
            dir.path(),
        ),
    );
    let report = loops.run(&[first.clone(), second]);

    assert_eq!(report.outcomes.len(), 1);
    assert_eq!(report.outcomes[0].input, first);
    assert!(!report.is_success());
    assert!(engine.calls().is_empty());
}
