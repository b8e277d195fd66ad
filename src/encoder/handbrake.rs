//! HandBrakeCLI encoder.

use super::{run_tool, EncodeRequest, Encoder};
use crate::error::CompressError;
use crate::os_args;
use crate::platform::{PlatformCommands, HANDBRAKE};
use async_trait::async_trait;
use std::ffi::OsString;

/// Transcodes with a named HandBrake preset
#[derive(Debug, Default)]
pub struct HandBrakeEncoder;

impl HandBrakeEncoder {
    pub fn new() -> Self {
        Self
    }

    pub fn build_args(request: &EncodeRequest) -> Vec<OsString> {
        let mut args = os_args![
            "-i",
            request.source,
            "-o",
            request.destination,
            "--preset",
            request.preset,
            "-q",
            request.quality.to_string(),
        ];

        let flags = request.flags;
        if flags.all_audio {
            args.push("--all-audio".into());
        }
        if flags.all_subtitles {
            args.push("--all-subtitles".into());
        }
        if flags.markers {
            args.push("--markers".into());
        }
        if flags.optimize {
            args.push("--optimize".into());
        }

        args
    }
}

#[async_trait]
impl Encoder for HandBrakeEncoder {
    fn name(&self) -> &'static str {
        "handbrake"
    }

    async fn encode(&self, request: &EncodeRequest) -> Result<(), CompressError> {
        let program = PlatformCommands::instance().get_command(HANDBRAKE);
        run_tool(program, Self::build_args(request)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EncodeFlags;
    use std::path::PathBuf;

    fn request(flags: EncodeFlags) -> EncodeRequest {
        EncodeRequest {
            source: PathBuf::from("videos/sub/b.mkv"),
            destination: PathBuf::from("videos/compressed/sub/b_compressed.mp4"),
            preset: "H.265 Apple VideoToolbox 1080p".to_string(),
            quality: 5,
            flags,
        }
    }

    #[test]
    fn test_build_args_full_flag_set() {
        let args = HandBrakeEncoder::build_args(&request(EncodeFlags::default()));
        let expected: Vec<OsString> = [
            "-i",
            "videos/sub/b.mkv",
            "-o",
            "videos/compressed/sub/b_compressed.mp4",
            "--preset",
            "H.265 Apple VideoToolbox 1080p",
            "-q",
            "5",
            "--all-audio",
            "--all-subtitles",
            "--markers",
            "--optimize",
        ]
        .iter()
        .map(OsString::from)
        .collect();
        assert_eq!(args, expected);
    }

    #[test]
    fn test_build_args_respects_flags() {
        let flags = EncodeFlags {
            all_subtitles: false,
            optimize: false,
            ..Default::default()
        };
        let args = HandBrakeEncoder::build_args(&request(flags));
        assert!(args.contains(&OsString::from("--all-audio")));
        assert!(args.contains(&OsString::from("--markers")));
        assert!(!args.contains(&OsString::from("--all-subtitles")));
        assert!(!args.contains(&OsString::from("--optimize")));
    }
}
