//! ffmpeg based encoders: software HEVC and plain remux.

use super::{run_tool, EncodeRequest, Encoder};
use crate::config::EncodeFlags;
use crate::error::CompressError;
use crate::os_args;
use crate::platform::{PlatformCommands, FFMPEG};
use async_trait::async_trait;
use std::ffi::OsString;

/// Stream mapping shared by both ffmpeg modes
fn mapping_args(flags: EncodeFlags) -> Vec<OsString> {
    let mut args = os_args!["-map", "0:v:0"];
    if flags.all_audio {
        args.extend(os_args!["-map", "0:a?"]);
    }
    if flags.all_subtitles {
        args.extend(os_args!["-map", "0:s?", "-c:s", "mov_text"]);
    }
    if flags.markers {
        args.extend(os_args!["-map_chapters", "0"]);
    } else {
        args.extend(os_args!["-map_chapters", "-1"]);
    }
    args
}

/// Software HEVC transcode; quality is used as the CRF
#[derive(Debug, Default)]
pub struct FfmpegEncoder;

impl FfmpegEncoder {
    pub fn new() -> Self {
        Self
    }

    pub fn build_args(request: &EncodeRequest) -> Vec<OsString> {
        let mut args = os_args!["-nostdin", "-y", "-i", request.source];
        args.extend(mapping_args(request.flags));
        args.extend(os_args![
            "-c:v",
            "libx265",
            "-preset",
            "slow",
            "-crf",
            request.quality.to_string(),
            "-tag:v",
            "hvc1",
            "-c:a",
            "aac",
            "-b:a",
            "160k",
        ]);
        if request.flags.optimize {
            args.extend(os_args!["-movflags", "+faststart"]);
        }
        args.push(request.destination.clone().into_os_string());
        args
    }
}

#[async_trait]
impl Encoder for FfmpegEncoder {
    fn name(&self) -> &'static str {
        "ffmpeg"
    }

    async fn encode(&self, request: &EncodeRequest) -> Result<(), CompressError> {
        let program = PlatformCommands::instance().get_command(FFMPEG);
        run_tool(program, Self::build_args(request)).await
    }
}

/// Rewrap into mp4 without re-encoding; quality is ignored
#[derive(Debug, Default)]
pub struct RemuxEncoder;

impl RemuxEncoder {
    pub fn new() -> Self {
        Self
    }

    pub fn build_args(request: &EncodeRequest) -> Vec<OsString> {
        let mut args = os_args!["-nostdin", "-y", "-i", request.source];
        args.extend(mapping_args(request.flags));
        args.extend(os_args!["-map_metadata", "0", "-c:v", "copy", "-c:a", "copy"]);
        if request.flags.optimize {
            args.extend(os_args!["-movflags", "+faststart"]);
        }
        args.push(request.destination.clone().into_os_string());
        args
    }
}

#[async_trait]
impl Encoder for RemuxEncoder {
    fn name(&self) -> &'static str {
        "remux"
    }

    async fn encode(&self, request: &EncodeRequest) -> Result<(), CompressError> {
        let program = PlatformCommands::instance().get_command(FFMPEG);
        run_tool(program, Self::build_args(request)).await
    }
}
