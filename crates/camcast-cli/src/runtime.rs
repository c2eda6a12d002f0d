// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 camcast contributors

//! Execution of synthesized pipelines.
//!
//! Both legs run independently; whichever ends first (end of stream, error,
//! process exit) or a SIGINT stops the other.

use crate::error::CliError;
use crate::session::Leg;
use std::io::ErrorKind;
use std::process::{Child, Command};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

/// Environment variable overriding the launcher executable.
pub const GST_LAUNCH_ENV: &str = "CAMCAST_GST_LAUNCH";
/// Launcher used when [`GST_LAUNCH_ENV`] is unset.
pub const DEFAULT_GST_LAUNCH: &str = "gst-launch-1.0";

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Something that can play a set of legs until one of them ends.
pub trait PipelineRuntime {
    /// Run every leg; return once all are stopped.
    ///
    /// Setting `term` requests a clean stop and yields `Ok`.
    fn run(&mut self, legs: &[Leg], term: &AtomicBool) -> Result<(), CliError>;
}

/// Split launch text into launcher arguments.
///
/// Whitespace separates arguments except inside double quotes. Quotes and
/// escapes are kept, since the launcher re-joins its arguments and parses
/// the result itself.
pub fn split_launch(text: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                quoted = !quoted;
                current.push(c);
            }
            '\\' if quoted => {
                current.push(c);
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            c if c.is_whitespace() && !quoted => {
                if !current.is_empty() {
                    args.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        args.push(current);
    }
    args
}

/// Runs each leg as a `gst-launch-1.0` child process.
#[derive(Debug, Clone)]
pub struct LaunchRuntime {
    program: String,
}

impl Default for LaunchRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl LaunchRuntime {
    /// Launcher from [`GST_LAUNCH_ENV`], else [`DEFAULT_GST_LAUNCH`].
    pub fn new() -> Self {
        match std::env::var(GST_LAUNCH_ENV) {
            Ok(program) => Self::with_program(&program),
            Err(_) => Self::with_program(DEFAULT_GST_LAUNCH),
        }
    }

    pub fn with_program(program: &str) -> Self {
        LaunchRuntime {
            program: program.to_string(),
        }
    }

    fn spawn(&self, leg: &Leg) -> Result<Child, CliError> {
        log::debug!("Spawning {} for {} leg", self.program, leg.label);
        Command::new(&self.program)
            .arg("-e")
            .args(split_launch(&leg.launch))
            .spawn()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => CliError::RuntimeUnavailable(format!(
                    "{} not found (set {} to override)",
                    self.program, GST_LAUNCH_ENV
                )),
                _ => CliError::General(format!("Failed to start {} leg: {}", leg.label, e)),
            })
    }
}

fn stop_all(children: &mut [(&'static str, Child)]) {
    for (label, child) in children.iter_mut() {
        if let Ok(None) = child.try_wait() {
            log::debug!("Stopping {} leg", label);
            let _ = child.kill();
        }
        let _ = child.wait();
    }
}

impl PipelineRuntime for LaunchRuntime {
    fn run(&mut self, legs: &[Leg], term: &AtomicBool) -> Result<(), CliError> {
        let mut children = Vec::with_capacity(legs.len());
        for leg in legs {
            match self.spawn(leg) {
                Ok(child) => children.push((leg.label, child)),
                Err(e) => {
                    stop_all(&mut children);
                    return Err(e);
                }
            }
        }

        let result = 'watch: loop {
            if term.load(Ordering::Relaxed) {
                log::info!("Interrupted, stopping pipelines");
                break Ok(());
            }

            for (label, child) in children.iter_mut() {
                match child.try_wait() {
                    Ok(Some(status)) if status.success() => {
                        log::info!("{} leg finished", label);
                        break 'watch Ok(());
                    }
                    Ok(Some(status)) => {
                        break 'watch Err(CliError::PipelineFailed(format!(
                            "{} leg exited with {}",
                            label, status
                        )));
                    }
                    Ok(None) => {}
                    Err(e) => break 'watch Err(CliError::from(e)),
                }
            }

            thread::sleep(POLL_INTERVAL);
        };

        stop_all(&mut children);
        result
    }
}

#[cfg(feature = "gstreamer")]
pub use in_process::GstRuntime;

#[cfg(feature = "gstreamer")]
mod in_process {
    use super::{PipelineRuntime, POLL_INTERVAL};
    use crate::error::CliError;
    use crate::session::Leg;
    use gstreamer::prelude::*;
    use gstreamer::MessageView;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Parses and plays each leg inside this process.
    #[derive(Debug)]
    pub struct GstRuntime;

    fn stop_all(pipelines: &[(&'static str, gstreamer::Pipeline)]) {
        for (label, pipeline) in pipelines {
            if let Err(e) = pipeline.set_state(gstreamer::State::Null) {
                log::warn!("Failed to stop {} pipeline: {}", label, e);
            }
        }
    }

    impl GstRuntime {
        pub fn new() -> Result<Self, CliError> {
            gstreamer::init().map_err(|e| {
                CliError::RuntimeUnavailable(format!("Failed to initialize GStreamer: {}", e))
            })?;
            Ok(GstRuntime)
        }

        fn build(leg: &Leg) -> Result<gstreamer::Pipeline, CliError> {
            let element = gstreamer::parse::launch(&leg.launch).map_err(|e| {
                CliError::RuntimeUnavailable(format!("Failed to parse {} pipeline: {}", leg.label, e))
            })?;
            element.downcast::<gstreamer::Pipeline>().map_err(|_| {
                CliError::General(format!("{} description is not a pipeline", leg.label))
            })
        }

        /// Drain pending bus messages of one leg; `Some` once it has ended.
        fn poll(
            label: &str,
            pipeline: &gstreamer::Pipeline,
            timeout: gstreamer::ClockTime,
        ) -> Option<Result<(), CliError>> {
            let bus = pipeline.bus()?;
            while let Some(msg) = bus.timed_pop(timeout) {
                match msg.view() {
                    MessageView::Eos(..) => {
                        log::info!("{} leg reached end of stream", label);
                        return Some(Ok(()));
                    }
                    MessageView::Error(err) => {
                        eprintln!("ERROR ({}): {}", label, err.error());
                        if let Some(debug) = err.debug() {
                            eprintln!("DEBUG: {}", debug);
                        }
                        return Some(Err(CliError::PipelineFailed(format!(
                            "{} leg: {}",
                            label,
                            err.error()
                        ))));
                    }
                    MessageView::StateChanged(state) => {
                        if state
                            .src()
                            .map(|s| s == pipeline.upcast_ref::<gstreamer::Object>())
                            .unwrap_or(false)
                        {
                            log::debug!(
                                "[{}] {:?} -> {:?}",
                                label,
                                state.old(),
                                state.current()
                            );
                        }
                    }
                    MessageView::Warning(warn) => {
                        log::warn!("[{}] {}", label, warn.error());
                    }
                    _ => {}
                }
            }
            None
        }
    }

    impl PipelineRuntime for GstRuntime {
        fn run(&mut self, legs: &[Leg], term: &AtomicBool) -> Result<(), CliError> {
            let mut pipelines = Vec::with_capacity(legs.len());
            for leg in legs {
                pipelines.push((leg.label, Self::build(leg)?));
            }

            for (label, pipeline) in &pipelines {
                if let Err(e) = pipeline.set_state(gstreamer::State::Playing) {
                    stop_all(&pipelines);
                    return Err(CliError::PipelineFailed(format!(
                        "Failed to start {} pipeline: {}",
                        label, e
                    )));
                }
            }

            let timeout = gstreamer::ClockTime::from_mseconds(POLL_INTERVAL.as_millis() as u64);
            let result = 'watch: loop {
                if term.load(Ordering::Relaxed) {
                    log::info!("Interrupted, stopping pipelines");
                    break Ok(());
                }
                for (label, pipeline) in &pipelines {
                    if let Some(result) = Self::poll(label, pipeline, timeout) {
                        break 'watch result;
                    }
                }
            };

            stop_all(&pipelines);
            result
        }
    }
}
