// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 camcast contributors

use super::presets::{AUDIO_CHANNELS, AUDIO_RATE, ENCODER_QUEUE_BUFFERS};
use super::{leaky_queue, Caps, Element, Endpoint, StageGraph};
use crate::codec::AudioCodec;
use crate::device::PropertyFragment;
use crate::platform::Platform;

/// Inputs of the audio leg.
#[derive(Debug, Clone, Copy)]
pub struct AudioRequest<'a> {
    pub platform: Platform,
    pub codec: AudioCodec,
    pub device: &'a PropertyFragment,
    pub source: &'a str,
    pub endpoint: &'a Endpoint,
}

/// One row of the audio synthesis table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioBranch {
    DarwinOpus,
    DarwinPcmu,
    LinuxOpus,
    LinuxPcmu,
}

pub fn select_audio_branch(platform: Platform, codec: AudioCodec) -> AudioBranch {
    match (platform, codec) {
        (Platform::Darwin, AudioCodec::Opus) => AudioBranch::DarwinOpus,
        (Platform::Darwin, AudioCodec::Pcmu) => AudioBranch::DarwinPcmu,
        (Platform::Linux, AudioCodec::Opus) => AudioBranch::LinuxOpus,
        (Platform::Linux, AudioCodec::Pcmu) => AudioBranch::LinuxPcmu,
    }
}

/// Build the audio leg: normalise to 48 kHz stereo, encode, payload, send.
pub fn synthesize_audio(req: &AudioRequest) -> StageGraph {
    let branch = select_audio_branch(req.platform, req.codec);
    log::debug!("audio {} on {}: {:?}", req.codec, req.platform, branch);

    let raw = Caps::new("audio/x-raw")
        .field("rate", AUDIO_RATE)
        .field("channels", AUDIO_CHANNELS);
    let mut g = StageGraph::new();

    match branch {
        AudioBranch::DarwinOpus | AudioBranch::DarwinPcmu => {
            // device property precedes do-timestamp here
            g.push(
                Element::new(req.source)
                    .fragment(req.device)
                    .flag("do-timestamp", true),
            );
            g.push(raw);
            g.push(leaky_queue(ENCODER_QUEUE_BUFFERS));
            g.push(Element::new("audioconvert"));
            g.push(Element::new("audioresample"));
        }
        AudioBranch::LinuxOpus | AudioBranch::LinuxPcmu => {
            g.push(
                Element::new(req.source)
                    .flag("do-timestamp", true)
                    .fragment(req.device),
            );
            g.push(raw);
            g.push(Element::new("audioconvert"));
            g.push(Element::new("audioresample"));
            g.push(leaky_queue(ENCODER_QUEUE_BUFFERS));
        }
    }

    match req.codec {
        AudioCodec::Opus => {
            g.push(Element::new("opusenc"));
            g.push(Element::new("rtpopuspay"));
        }
        AudioCodec::Pcmu => {
            g.push(Element::new("mulawenc"));
            g.push(Element::new("rtppcmupay"));
        }
    }

    g.push(req.endpoint.sink());
    g
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_audio_branch() {
        assert_eq!(
            select_audio_branch(Platform::Linux, AudioCodec::Pcmu),
            AudioBranch::LinuxPcmu
        );
        assert_eq!(
            select_audio_branch(Platform::Darwin, AudioCodec::Opus),
            AudioBranch::DarwinOpus
        );
    }

    #[test]
    fn test_queue_position_differs_by_platform() {
        let endpoint = Endpoint::new("127.0.0.1", 5001);
        let device = PropertyFragment::empty();
        let names = |platform| {
            let req = AudioRequest {
                platform,
                codec: AudioCodec::Opus,
                device: &device,
                source: "src",
                endpoint: &endpoint,
            };
            synthesize_audio(&req)
                .elements()
                .map(|e| e.name().to_string())
                .collect::<Vec<_>>()
        };
        assert_eq!(
            names(Platform::Darwin),
            ["src", "queue", "audioconvert", "audioresample", "opusenc", "rtpopuspay", "udpsink"]
        );
        assert_eq!(
            names(Platform::Linux),
            ["src", "audioconvert", "audioresample", "queue", "opusenc", "rtpopuspay", "udpsink"]
        );
    }
}
