use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::application::ports::{AudioDecoder, AudioDecoderError, DecodedAudio};
use crate::domain::{AudioFormat, CANONICAL_SAMPLE_RATE};

const FFMPEG_BINARY: &str = "ffmpeg";

/// External-process fallback for container variants the in-process path
/// cannot decode (OGG/Opus voice notes in particular). Bytes are piped
/// through ffmpeg and come back as canonical s16le/16k/mono; the source
/// rate and channel layout are not visible on this path.
pub struct FfmpegAudioDecoder;

/// Probe for the ffmpeg binary so a misconfigured deployment fails at
/// startup instead of on the first clip.
pub fn check_ffmpeg_binary() -> Result<(), AudioDecoderError> {
    let status = std::process::Command::new(FFMPEG_BINARY)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map_err(|e| AudioDecoderError::Unavailable(format!("{FFMPEG_BINARY}: {e}")))?;

    if !status.success() {
        return Err(AudioDecoderError::Unavailable(format!(
            "{FFMPEG_BINARY} exited with {status}"
        )));
    }
    Ok(())
}

#[async_trait]
impl AudioDecoder for FfmpegAudioDecoder {
    async fn decode(
        &self,
        data: &[u8],
        format: AudioFormat,
    ) -> Result<DecodedAudio, AudioDecoderError> {
        let mut child = Command::new(FFMPEG_BINARY)
            .args([
                "-hide_banner",
                "-loglevel",
                "error",
                "-f",
                container_demuxer(format),
                "-i",
                "pipe:0",
                "-f",
                "s16le",
                "-acodec",
                "pcm_s16le",
                "-ac",
                "1",
                "-ar",
            ])
            .arg(CANONICAL_SAMPLE_RATE.to_string())
            .arg("pipe:1")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| AudioDecoderError::Unavailable(format!("spawn {FFMPEG_BINARY}: {e}")))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| AudioDecoderError::DecodingFailed("ffmpeg stdin closed".to_string()))?;

        let input = data.to_vec();
        let writer = tokio::spawn(async move {
            let result = stdin.write_all(&input).await;
            drop(stdin);
            result
        });

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| AudioDecoderError::DecodingFailed(format!("ffmpeg wait: {e}")))?;

        // A broken pipe here just means ffmpeg gave up on the input early;
        // the exit status below carries the real failure.
        writer.await.ok();

        if !output.status.success() {
            tracing::warn!(status = %output.status, "ffmpeg decode failed");
            return Err(AudioDecoderError::DecodingFailed(format!(
                "ffmpeg exited with {}",
                output.status
            )));
        }

        if output.stdout.is_empty() {
            return Err(AudioDecoderError::DecodingFailed(
                "no audio samples decoded".to_string(),
            ));
        }

        let samples: Vec<i16> = output
            .stdout
            .chunks_exact(2)
            .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
            .collect();

        tracing::debug!(
            samples = samples.len(),
            duration_secs = samples.len() as f32 / CANONICAL_SAMPLE_RATE as f32,
            "Audio decoded via external ffmpeg"
        );

        Ok(DecodedAudio {
            samples,
            source_sample_rate: None,
            source_channels: None,
        })
    }
}

fn container_demuxer(format: AudioFormat) -> &'static str {
    match format {
        AudioFormat::Ogg => "ogg",
        AudioFormat::Mp3 => "mp3",
        AudioFormat::Wav => "wav",
        AudioFormat::Flac => "flac",
    }
}
