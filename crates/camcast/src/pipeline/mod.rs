// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 camcast contributors

//! Stage graph model and synthesis of the video and audio legs.
//!
//! A [`StageGraph`] is an ordered chain of [`Stage`]s: elements with their
//! properties, or bare caps filters. Its `Display` form is the launch
//! syntax understood by the streaming runtime:
//!
//! ```text
//! v4l2src do-timestamp=true device="/dev/video0" ! video/x-raw,width=640 ! udpsink host=h port=5000
//! ```
//!
//! Stages are joined by ` ! `. Integer and boolean properties are emitted
//! bare; string properties are quoted when they contain anything the
//! runtime's tokenizer would split on (see [`quote`]).
//!
//! Synthesis itself lives in [`synthesize_video`] and [`synthesize_audio`].
//! Both are total over their inputs: every combination of the closed
//! enumerations maps to exactly one branch of a fixed table, and every
//! branch ends in the same UDP sink policy.

mod audio;
pub mod presets;
mod video;

pub use audio::{select_audio_branch, synthesize_audio, AudioBranch, AudioRequest};
pub use video::{select_video_branch, synthesize_video, VideoBranch, VideoRequest};

use serde::Serialize;
use std::fmt::{self, Write as _};

/// Quote a string value with double quotes.
///
/// Backslashes and double quotes are escaped with a backslash. ASCII control
/// characters are written as `\n`, `\t` style escapes or `\xNN`; other
/// unprintable characters (C1 controls, format characters such as U+200B,
/// separators other than the ASCII space, private use) as `\uNNNN` or
/// `\UNNNNNNNN`. Unassigned code points are passed through unchanged.
///
/// ```
/// use camcast::pipeline::quote;
///
/// assert_eq!(quote("/dev/video0"), "\"/dev/video0\"");
/// assert_eq!(quote("a \"b\""), r#""a \"b\"""#);
/// assert_eq!(quote("cam\u{200b}"), r#""cam\u200b""#);
/// ```
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\x07' => out.push_str("\\a"),
            '\x08' => out.push_str("\\b"),
            '\x0b' => out.push_str("\\v"),
            '\x0c' => out.push_str("\\f"),
            c if c.is_ascii_control() => {
                let _ = write!(out, "\\x{:02x}", c as u32);
            }
            c if !is_printable(c) => {
                if (c as u32) < 0x10000 {
                    let _ = write!(out, "\\u{:04x}", c as u32);
                } else {
                    let _ = write!(out, "\\U{:08x}", c as u32);
                }
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn is_printable(c: char) -> bool {
    if c == ' ' {
        return true;
    }
    if c.is_control() || c.is_whitespace() {
        return false;
    }
    !matches!(
        c,
        '\u{00ad}'
            | '\u{0600}'..='\u{0605}'
            | '\u{061c}'
            | '\u{06dd}'
            | '\u{070f}'
            | '\u{180e}'
            | '\u{200b}'..='\u{200f}'
            | '\u{202a}'..='\u{202e}'
            | '\u{2060}'..='\u{2064}'
            | '\u{2066}'..='\u{206f}'
            | '\u{e000}'..='\u{f8ff}'
            | '\u{feff}'
            | '\u{fff9}'..='\u{fffb}'
            | '\u{e0001}'
            | '\u{e0020}'..='\u{e007f}'
            | '\u{f0000}'..='\u{10ffff}'
    )
}

fn needs_quoting(value: &str) -> bool {
    value.is_empty()
        || value
            .chars()
            .any(|c| {
                c.is_whitespace() || !is_printable(c) || matches!(c, '"' | '\'' | '\\' | '!')
            })
}

/// A property value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropValue {
    Int(i64),
    Bool(bool),
    /// Bare string, quoted only when it would not survive tokenizing
    Str(String),
    /// String that is always quoted
    Quoted(String),
    /// Caps string, e.g. the `caps` property of `capsfilter`
    Caps(Caps),
}

impl fmt::Display for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropValue::Int(i) => write!(f, "{}", i),
            PropValue::Bool(b) => write!(f, "{}", b),
            PropValue::Str(s) if needs_quoting(s) => f.write_str(&quote(s)),
            PropValue::Str(s) => f.write_str(s),
            PropValue::Quoted(s) => f.write_str(&quote(s)),
            PropValue::Caps(caps) => write!(f, "{}", caps),
        }
    }
}

/// A `name=value` element property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prop {
    name: String,
    value: PropValue,
}

impl Prop {
    pub fn new(name: &str, value: PropValue) -> Self {
        Prop {
            name: name.to_string(),
            value,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &PropValue {
        &self.value
    }
}

impl fmt::Display for Prop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

/// A pipeline element and its properties, in emission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    props: Vec<Prop>,
}

impl Element {
    pub fn new(name: &str) -> Self {
        Element {
            name: name.to_string(),
            props: Vec::new(),
        }
    }

    pub fn prop(mut self, name: &str, value: PropValue) -> Self {
        self.props.push(Prop::new(name, value));
        self
    }

    pub fn int(self, name: &str, value: i64) -> Self {
        self.prop(name, PropValue::Int(value))
    }

    pub fn flag(self, name: &str, value: bool) -> Self {
        self.prop(name, PropValue::Bool(value))
    }

    pub fn string(self, name: &str, value: &str) -> Self {
        self.prop(name, PropValue::Str(value.to_string()))
    }

    /// Append a device addressing property; the empty fragment adds nothing.
    pub fn fragment(mut self, fragment: &crate::device::PropertyFragment) -> Self {
        if let Some(prop) = fragment.prop() {
            self.props.push(prop.clone());
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn props(&self) -> &[Prop] {
        &self.props
    }

    pub fn get(&self, name: &str) -> Option<&PropValue> {
        self.props.iter().find(|p| p.name == name).map(|p| &p.value)
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        for prop in &self.props {
            write!(f, " {}", prop)?;
        }
        Ok(())
    }
}

/// A caps filter: media type, optional memory features, then fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caps {
    media: String,
    features: Option<String>,
    fields: Vec<(String, String)>,
}

impl Caps {
    pub fn new(media: &str) -> Self {
        Caps {
            media: media.to_string(),
            features: None,
            fields: Vec::new(),
        }
    }

    pub fn features(mut self, features: &str) -> Self {
        self.features = Some(features.to_string());
        self
    }

    pub fn field(mut self, name: &str, value: impl fmt::Display) -> Self {
        self.fields.push((name.to_string(), value.to_string()));
        self
    }

    pub fn media(&self) -> &str {
        &self.media
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Display for Caps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.media)?;
        if let Some(features) = &self.features {
            write!(f, "({})", features)?;
        }
        for (name, value) in &self.fields {
            write!(f, ",{}={}", name, value)?;
        }
        Ok(())
    }
}

/// One link of the chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    Element(Element),
    Caps(Caps),
}

impl From<Element> for Stage {
    fn from(element: Element) -> Self {
        Stage::Element(element)
    }
}

impl From<Caps> for Stage {
    fn from(caps: Caps) -> Self {
        Stage::Caps(caps)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Element(element) => write!(f, "{}", element),
            Stage::Caps(caps) => write!(f, "{}", caps),
        }
    }
}

/// A linear chain of stages, rendered as launch syntax.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageGraph {
    stages: Vec<Stage>,
}

impl StageGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, stage: impl Into<Stage>) {
        self.stages.push(stage.into());
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Elements in chain order, skipping caps filters.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.stages.iter().filter_map(|stage| match stage {
            Stage::Element(element) => Some(element),
            Stage::Caps(_) => None,
        })
    }

    /// First element with the given factory name.
    pub fn element(&self, name: &str) -> Option<&Element> {
        self.elements().find(|e| e.name() == name)
    }
}

impl fmt::Display for StageGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, stage) in self.stages.iter().enumerate() {
            if i > 0 {
                f.write_str(" ! ")?;
            }
            write!(f, "{}", stage)?;
        }
        Ok(())
    }
}

impl Serialize for StageGraph {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Destination of an RTP leg.
///
/// The port is any `u16` and is rendered as given, 0 included. Rejecting
/// ports the network cannot use is left to whoever collects them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    pub fn new(host: &str, port: u16) -> Self {
        Endpoint {
            host: host.to_string(),
            port,
        }
    }

    /// UDP sink for this endpoint. Sync and async state changes are off so
    /// frames leave as soon as they are encoded.
    pub fn sink(&self) -> Element {
        Element::new("udpsink")
            .string("host", &self.host)
            .int("port", i64::from(self.port))
            .flag("sync", false)
            .flag("async", false)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Leaky queue holding at most `buffers` buffers, dropping the oldest.
pub(crate) fn leaky_queue(buffers: i64) -> Element {
    Element::new("queue")
        .int("max-size-buffers", buffers)
        .string("leaky", "downstream")
}
