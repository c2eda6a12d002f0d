// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 camcast contributors

//! Capability model and text parser
//!
//! Devices advertise what they can produce as a *capability set*: an ordered
//! sequence of [`Structure`]s, each carrying a media-type name and a set of
//! named fields. A field holds either a single scalar or a container of
//! alternatives, and containers nest freely:
//!
//! | Form | Meaning | Model |
//! |------|---------|-------|
//! | `30/1` | a single value | [`CapValue::Scalar`] |
//! | `{ NV12, I420 }` | unordered alternatives | [`CapValue::List`] |
//! | `< 640, 1280 >` | ordered collection | [`CapValue::Array`] |
//! | `[ 1, 1920 ]` | a range | [`Scalar::Unsupported`] |
//!
//! Ranges and other value kinds that cannot be enumerated are kept as
//! [`Scalar::Unsupported`] so that the structure still parses but contributes
//! nothing when flattened.
//!
//! # Parsing
//!
//! ```
//! use camcast::caps::{parse_caps, CapValue, Scalar};
//!
//! let caps = parse_caps("video/x-raw, format=(string)YUY2, width=(int){ 640, 1280 }")?;
//! let st = &caps.structures()[0];
//! assert_eq!(st.name(), "video/x-raw");
//! let widths = st.get("width").map(|v| v.flatten(Scalar::as_int)).unwrap_or_default();
//! assert_eq!(widths, vec![640, 1280]);
//! # Ok::<(), camcast::Error>(())
//! ```

mod parser;
mod value;

pub use parser::{parse_caps, parse_structure};
pub use value::{CapValue, CapsSet, Scalar, Structure};
