// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 camcast contributors

//! Integration tests for the camcast CLI
//!
//! These run the binary end-to-end with the assert_cmd crate pattern. The
//! target platform and board are always passed explicitly so the output does
//! not depend on the machine running the tests. Nothing here needs a camera
//! or a GStreamer installation.

use assert_cmd::Command;
use predicates::prelude::*;
use serial_test::serial;
use std::{env, fs, path::PathBuf};

/// Helper to create a Command for the camcast binary
/// Uses CAMCAST_BIN environment variable if set, otherwise uses cargo run
fn camcast_cmd() -> Command {
    if let Ok(bin_path) = env::var("CAMCAST_BIN") {
        Command::new(bin_path)
    } else {
        let mut c = Command::new("cargo");
        c.args(["run", "--quiet", "--bin", "camcast", "--"]);
        c
    }
}

/// Scratch file under target/testdata/camcast-cli
fn test_file(name: &str, contents: &str) -> PathBuf {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("target")
        .join("testdata")
        .join("camcast-cli");
    fs::create_dir_all(&dir).expect("Failed to create test data directory");

    let path = dir.join(name);
    fs::write(&path, contents).expect("Failed to write test file");
    path
}

const LINUX: [&str; 4] = ["--platform", "linux", "--variant", "generic"];

// =============================================================================
// Basic CLI Tests
// =============================================================================

#[test]
fn test_cli_help() {
    camcast_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("camcast"))
        .stdout(predicate::str::contains("video"))
        .stdout(predicate::str::contains("audio"))
        .stdout(predicate::str::contains("modes"))
        .stdout(predicate::str::contains("detect"))
        .stdout(predicate::str::contains("devices"))
        .stdout(predicate::str::contains("run"));
}

#[test]
fn test_cli_version() {
    camcast_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("camcast"));
}

#[test]
fn test_run_help() {
    camcast_cmd()
        .args(["run", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--config"))
        .stdout(predicate::str::contains("--interactive"))
        .stdout(predicate::str::contains("--dry-run"))
        .stdout(predicate::str::contains("--device-prop"))
        .stdout(predicate::str::contains("--audio-codec"));
}

// =============================================================================
// Pipeline Synthesis
// =============================================================================

#[test]
fn test_video_darwin_h264() {
    camcast_cmd()
        .args(["video", "--platform", "darwin", "-r", "1920x1080"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "avfvideosrc do-stats=true do-timestamp=true ! ",
        ))
        .stdout(predicate::str::contains(
            "width=1920,height=1080,framerate=30/1,format=NV12",
        ))
        .stdout(predicate::str::contains("vtenc_h264_hw"))
        .stdout(predicate::str::contains(
            "udpsink host=127.0.0.1 port=5000 sync=false async=false",
        ));
}

#[test]
fn test_video_jetson_vp9() {
    camcast_cmd()
        .args([
            "video",
            "--platform",
            "linux",
            "--variant",
            "jetson",
            "--codec",
            "vp9",
            "--host",
            "10.0.0.5",
            "--port",
            "6000",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("nvv4l2vp9enc bitrate=30000000"))
        .stdout(predicate::str::contains("rtpvp9pay"))
        .stdout(predicate::str::contains(
            "udpsink host=10.0.0.5 port=6000 sync=false async=false",
        ));
}

#[test]
fn test_video_device_prop() {
    camcast_cmd()
        .args(["video"])
        .args(LINUX)
        .args(["--device-prop", "path=/dev/video4"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "v4l2src do-timestamp=true device=\"/dev/video4\" ",
        ));
}

#[test]
fn test_video_json() {
    let output = camcast_cmd()
        .args(["--json", "video"])
        .args(LINUX)
        .args(["--codec", "H265"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["codec"], "H265");
    assert_eq!(json["branch"], "VaapiH265");
    assert_eq!(json["mode"]["width"], 640);
    assert!(json["launch"].as_str().unwrap().contains("vaapih265enc"));
}

#[test]
fn test_audio_pcmu() {
    camcast_cmd()
        .args(["audio", "--platform", "linux", "--audio-codec", "PCMU"])
        .args(["--audio-port", "7000"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("pipewiresrc do-timestamp=true"))
        .stdout(predicate::str::contains("mulawenc ! rtppcmupay"))
        .stdout(predicate::str::contains("udpsink host=127.0.0.1 port=7000"));
}

#[test]
fn test_audio_numeric_node_id() {
    camcast_cmd()
        .args(["audio", "--platform", "linux"])
        .args(["--audio-device-prop", "node.id=42"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "pipewiresrc do-timestamp=true target-object=\"42\" ! ",
        ));
}

// =============================================================================
// Invalid Input
// =============================================================================

#[test]
fn test_invalid_codec() {
    camcast_cmd()
        .args(["video", "--codec", "mjpeg"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_invalid_port() {
    camcast_cmd()
        .args(["video", "--port", "0"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_invalid_framerate() {
    camcast_cmd()
        .args(["video"])
        .args(LINUX)
        .args(["--framerate", "30"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Invalid arguments"));
}

#[test]
fn test_invalid_device_prop() {
    camcast_cmd()
        .args(["video"])
        .args(LINUX)
        .args(["--device-prop", "device"])
        .assert()
        .failure()
        .code(2);
}

// =============================================================================
// Mode Extraction
// =============================================================================

#[test]
fn test_modes_from_caps() {
    camcast_cmd()
        .args([
            "modes",
            "--caps",
            "video/x-raw, format=(string){ NV12, YUY2 }, width=(int)1280, \
             height=(int)720, framerate=(fraction){ 30/1, 15/1 }",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("1) 1280x720 30/1 NV12"))
        .stdout(predicate::str::contains("4) 1280x720 15/1 YUY2"));
}

#[test]
fn test_modes_limit_json() {
    let output = camcast_cmd()
        .args([
            "--json",
            "modes",
            "--limit",
            "2",
            "--caps",
            "video/x-raw, format=(string)NV12, width=(int){ 640, 1280 }, \
             height=(int)480, framerate=(fraction){ 30/1, 15/1 }",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let modes = json["modes"].as_array().unwrap();
    assert_eq!(modes.len(), 2);
    assert_eq!(modes[1]["framerate"], "15/1");
}

#[test]
fn test_modes_no_match_is_not_an_error() {
    camcast_cmd()
        .args(["modes", "--caps", "image/jpeg, width=(int)640"])
        .assert()
        .success()
        .stderr(predicate::str::contains("No usable capture modes"));
}

#[test]
fn test_modes_bad_caps() {
    camcast_cmd()
        .args(["modes", "--caps", "video/x-raw, width=(int){ 640"])
        .assert()
        .failure()
        .code(2);
}

// =============================================================================
// Detection
// =============================================================================

#[test]
#[serial]
fn test_detect_json() {
    let model = test_file("model-rock5", "Radxa ROCK 5B\0");
    let output = camcast_cmd()
        .args(["--json", "detect"])
        .env("CAMCAST_MODEL_PATH", &model)
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    if cfg!(target_os = "linux") {
        assert_eq!(json["platform"], "linux");
        assert_eq!(json["variant"], "rock5");
    }
}

// =============================================================================
// Sessions
// =============================================================================

#[test]
fn test_run_dry_run_defaults() {
    camcast_cmd()
        .args(["run", "--dry-run"])
        .args(LINUX)
        .assert()
        .success()
        .stdout(predicate::str::contains("video: v4l2src"))
        .stdout(predicate::str::contains("audio: pipewiresrc"))
        .stdout(predicate::str::contains("udpsink host=127.0.0.1 port=5001"));
}

#[test]
fn test_run_config_file_and_override() {
    let config = test_file(
        "session.json",
        r#"{
            "platform": "linux",
            "variant": "rock5",
            "codec": "H265",
            "host": "192.168.1.50",
            "port": 6000,
            "audio_codec": "PCMU"
        }"#,
    );

    let output = camcast_cmd()
        .args(["--json", "run", "--dry-run", "--config"])
        .arg(&config)
        .args(["--port", "6100"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["session"]["video"]["codec"], "H265");
    assert_eq!(json["session"]["video"]["endpoint"]["port"], 6100);
    assert_eq!(json["session"]["audio"]["endpoint"]["host"], "192.168.1.50");
    let legs = json["legs"].as_array().unwrap();
    assert_eq!(legs.len(), 2);
    assert!(legs[0]["launch"].as_str().unwrap().contains("mpph265enc"));
    assert!(legs[1]["launch"].as_str().unwrap().contains("rtppcmupay"));
}

#[test]
fn test_run_missing_config() {
    camcast_cmd()
        .args(["run", "--dry-run", "--config", "/nonexistent/camcast.json"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_run_no_audio() {
    camcast_cmd()
        .args(["run", "--dry-run", "--no-audio"])
        .args(LINUX)
        .assert()
        .success()
        .stdout(predicate::str::contains("video: "))
        .stdout(predicate::str::contains("audio: ").not());
}

#[test]
fn test_run_interactive_defaults() {
    // Closed stdin: every question takes its default.
    camcast_cmd()
        .args(["run", "--interactive", "--dry-run"])
        .args(LINUX)
        .args(["--device-prop", "device=/dev/video0"])
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("Video UDP host [127.0.0.1]: "))
        .stdout(predicate::str::contains("Select a codec:"))
        .stdout(predicate::str::contains("Select Linux H264 mode:"))
        .stdout(predicate::str::contains("Select a resolution:"))
        .stdout(predicate::str::contains("Audio UDP port [5001]: "))
        .stdout(predicate::str::contains(
            "video: v4l2src do-timestamp=true device=\"/dev/video0\"",
        ));
}

#[test]
fn test_run_interactive_answers() {
    // host, port, codec VP8, camera, resolution 1280x720, format I420,
    // framerate, audio host, audio port, audio codec PCMU, microphone
    let answers = "10.0.0.9\n6000\n3\n1\n4\n2\n25/1\n\n6001\n2\n1\n";
    camcast_cmd()
        .args(["run", "--interactive", "--dry-run"])
        .args(LINUX)
        .write_stdin(answers)
        .assert()
        .success()
        .stdout(predicate::str::contains("Select Linux H264 mode:").not())
        .stdout(predicate::str::contains(
            "video/x-raw,width=1280,height=720,framerate=25/1 ! videoconvert ! video/x-raw,format=I420",
        ))
        .stdout(predicate::str::contains("vp8enc deadline=1"))
        .stdout(predicate::str::contains(
            "udpsink host=10.0.0.9 port=6000 sync=false async=false",
        ))
        .stdout(predicate::str::contains("mulawenc"))
        .stdout(predicate::str::contains(
            "udpsink host=10.0.0.9 port=6001 sync=false async=false",
        ));
}

#[test]
#[serial]
fn test_run_missing_launcher() {
    camcast_cmd()
        .args(["run", "--no-audio"])
        .args(LINUX)
        .env("CAMCAST_GST_LAUNCH", "/nonexistent/camcast/gst-launch-1.0")
        .assert()
        .failure()
        .code(4)
        .stderr(predicate::str::contains("Runtime unavailable"));
}

#[test]
#[ignore = "requires gst-launch-1.0 and a camera"]
fn test_run_streams() {
    camcast_cmd()
        .args(["run", "--no-audio", "--codec", "VP8"])
        .timeout(std::time::Duration::from_secs(5))
        .assert()
        .interrupted();
}
