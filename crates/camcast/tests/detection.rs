// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 camcast contributors
//
// Board Detection Tests
//
// These point CAMCAST_MODEL_PATH at temporary files, so they mutate the
// process environment and must run serially.

use camcast::platform::{
    detect_linux_variant, model_path, LinuxVariant, DEFAULT_MODEL_PATH, MODEL_PATH_ENV,
};
use serial_test::serial;
use std::{env, fs, path::PathBuf};

fn model_file(name: &str, contents: &[u8]) -> PathBuf {
    let path = env::temp_dir().join(format!("camcast-{}-{}", std::process::id(), name));
    fs::write(&path, contents).unwrap();
    path
}

#[test]
#[serial]
fn test_detect_from_device_tree_model() {
    let path = model_file("jetson", b"NVIDIA Jetson Nano Developer Kit\0");
    env::set_var(MODEL_PATH_ENV, &path);

    assert_eq!(model_path(), path.to_string_lossy());
    assert_eq!(detect_linux_variant(), LinuxVariant::Jetson);

    env::remove_var(MODEL_PATH_ENV);
    let _ = fs::remove_file(path);
}

#[test]
#[serial]
fn test_detect_rock5() {
    let path = model_file("rock5", b"Radxa ROCK 5B\0");
    env::set_var(MODEL_PATH_ENV, &path);

    assert_eq!(detect_linux_variant(), LinuxVariant::Rock5);

    env::remove_var(MODEL_PATH_ENV);
    let _ = fs::remove_file(path);
}

#[test]
#[serial]
fn test_missing_model_file_is_generic() {
    env::set_var(MODEL_PATH_ENV, "/nonexistent/camcast/model");
    assert_eq!(detect_linux_variant(), LinuxVariant::Generic);
    env::remove_var(MODEL_PATH_ENV);
}

#[test]
#[serial]
fn test_default_model_path() {
    env::remove_var(MODEL_PATH_ENV);
    assert_eq!(model_path(), DEFAULT_MODEL_PATH);
}
