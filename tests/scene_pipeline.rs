//! End-to-end tests: snapshot files on disk to scene output.

use std::path::PathBuf;

use tipsy_scene::prelude::*;
use tipsy_scene::scene::manifest::{read_file_list, sources_from_paths};
use tipsy_scene::scene::output::{write_scene_file, SCENE_HEADER};
use tipsy_scene::tipsy::write_snapshot;

use tempfile::TempDir;

/// Write one small snapshot per time, named `<name>.<id>`, plus a file list.
fn write_run(dir: &TempDir, name: &str, times: &[f64], options: CodecOptions) -> PathBuf {
    let mut list = String::new();
    for (i, &t) in times.iter().enumerate() {
        let path = dir.path().join(format!("{}.{:05}", name, (i + 1) * 10));
        let set = ParticleSet {
            gas: vec![GasParticle { mass: t as f32, ..Default::default() }; 2],
            dark: vec![DarkParticle::default(); 3],
            star: Vec::new(),
        };
        write_snapshot(&path, &set.header(t).expect("header"), &set, options).expect("write snapshot");
        list.push_str(&path.to_string_lossy());
        list.push('\n');
    }
    let list_path = dir.path().join("files.txt");
    std::fs::write(&list_path, list).expect("write list");
    list_path
}

fn triples(frames: &[Interpolation]) -> Vec<(&str, &str, f64)> {
    frames
        .iter()
        .map(|f| (f.lower.as_str(), f.upper.as_str(), f.fraction))
        .collect()
}

#[test]
fn test_scene_from_files() {
    let dir = TempDir::new().expect("temp dir");
    let list = write_run(&dir, "cosmo", &[0.0, 1.0, 2.0, 3.0], CodecOptions::default());

    let paths = read_file_list(&list).expect("file list");
    assert_eq!(paths.len(), 4);
    let sources = sources_from_paths(&paths, "cosmo").expect("sources");
    assert_eq!(sources[0].id, "00010");

    let timeline = load_timeline(&sources, CodecOptions::default()).expect("timeline");
    let frames = generate(&timeline, 3).expect("generate");
    assert_eq!(
        triples(&frames),
        vec![
            ("00010", "00020", 0.0),
            ("00020", "00030", 0.0),
            ("00030", "00040", 0.0),
            ("00030", "00040", 1.0),
        ]
    );

    let out = dir.path().join("output.scene");
    write_scene_file(&out, &frames, false).expect("write scene");
    let text = std::fs::read_to_string(&out).expect("read scene");
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines[0], SCENE_HEADER);
    assert_eq!(lines[1], "00010 00020 0");
    assert_eq!(lines[4], "00030 00040 1");
}

#[test]
fn test_scene_native_unpadded() {
    let dir = TempDir::new().expect("temp dir");
    let options = CodecOptions::native().with_padding(false);
    let list = write_run(&dir, "run", &[0.0, 2.0], options);

    let paths = read_file_list(&list).expect("file list");
    let sources = sources_from_paths(&paths, "run").expect("sources");
    let timeline = load_timeline(&sources, options).expect("timeline");
    assert_eq!(timeline.time_of("00020").expect("time"), 2.0);

    let frames = SceneGenerator::new(SceneConfig::new(4)).generate(&timeline).expect("generate");
    let fractions: Vec<f64> = frames.iter().map(|f| f.fraction).collect();
    assert_eq!(fractions, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
    assert!(frames.iter().all(|f| f.lower == "00010" && f.upper == "00020"));
}

#[test]
fn test_unsorted_run_fails() {
    let dir = TempDir::new().expect("temp dir");
    let list = write_run(&dir, "snap", &[0.0, 2.0, 1.0], CodecOptions::default());

    let paths = read_file_list(&list).expect("file list");
    let sources = sources_from_paths(&paths, "snap").expect("sources");
    let err = load_timeline(&sources, CodecOptions::default()).expect_err("unsorted");
    assert!(matches!(err, Error::Unsorted { index: 1, next: 2, .. }));
}

#[test]
fn test_wrong_byte_order_breaks_ordering() {
    let dir = TempDir::new().expect("temp dir");
    let list = write_run(&dir, "snap", &[1.0, 2.0], CodecOptions::default());
    let paths = read_file_list(&list).expect("file list");
    let sources = sources_from_paths(&paths, "snap").expect("sources");

    // Byte-reversed 1.0 and 2.0 decode as denormals in the wrong order
    let err = load_timeline(&sources, CodecOptions::native()).expect_err("misread order");
    assert!(matches!(err, Error::Unsorted { index: 0, next: 1, .. }));
}

#[test]
fn test_missing_snapshot_fails_fast() {
    let dir = TempDir::new().expect("temp dir");
    let sources = vec![
        SnapshotSource::new("1", dir.path().join("gone.1")),
        SnapshotSource::new("2", dir.path().join("gone.2")),
    ];
    let err = load_timeline(&sources, CodecOptions::default()).expect_err("missing");
    assert!(err.to_string().contains("gone.1"));
}
