/// Sample rate of the canonical encoding the recognition backend accepts.
pub const CANONICAL_SAMPLE_RATE: u32 = 16_000;

/// Supported audio container formats, detected from magic bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioFormat {
    Ogg,
    Mp3,
    Wav,
    Flac,
}

impl AudioFormat {
    /// Detect the container from the file signature. The signature is
    /// authoritative; caller-provided hints are advisory only.
    pub fn from_signature(data: &[u8]) -> Option<Self> {
        if data.len() < 4 {
            return None;
        }
        if data.starts_with(b"OggS") {
            return Some(Self::Ogg);
        }
        if data.starts_with(b"ID3")
            || data.starts_with(&[0xFF, 0xFB])
            || data.starts_with(&[0xFF, 0xF3])
            || data.starts_with(&[0xFF, 0xF2])
        {
            return Some(Self::Mp3);
        }
        if data.starts_with(b"RIFF") {
            return Some(Self::Wav);
        }
        if data.starts_with(b"fLaC") {
            return Some(Self::Flac);
        }
        None
    }

    pub fn from_hint(hint: &str) -> Option<Self> {
        match hint.trim().to_lowercase().as_str() {
            "ogg" => Some(Self::Ogg),
            "mp3" => Some(Self::Mp3),
            "wav" => Some(Self::Wav),
            "flac" => Some(Self::Flac),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ogg => "ogg",
            Self::Mp3 => "mp3",
            Self::Wav => "wav",
            Self::Flac => "flac",
        }
    }

    /// File extension used when handing bytes to an external decoder.
    pub fn extension(&self) -> &'static str {
        self.as_str()
    }
}

/// Metadata of a validated clip, computed before any network call.
///
/// Source rate and channel count are unknown when the clip was decoded via
/// the external fallback, which only exposes the resampled output.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioClip {
    pub format: AudioFormat,
    pub sample_rate: Option<u32>,
    pub channels: Option<u16>,
    pub duration_seconds: f64,
    pub size_bytes: usize,
}

/// Canonical backend encoding: 16 kHz mono little-endian 16-bit PCM.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalAudio {
    pcm: Vec<u8>,
    sample_rate: u32,
}

impl CanonicalAudio {
    pub fn from_samples(samples: &[i16]) -> Self {
        let mut pcm = Vec::with_capacity(samples.len() * 2);
        for &sample in samples {
            pcm.extend_from_slice(&sample.to_le_bytes());
        }
        Self {
            pcm,
            sample_rate: CANONICAL_SAMPLE_RATE,
        }
    }

    pub fn pcm(&self) -> &[u8] {
        &self.pcm
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn duration_seconds(&self) -> f64 {
        (self.pcm.len() / 2) as f64 / self.sample_rate as f64
    }

    pub fn into_pcm(self) -> Vec<u8> {
        self.pcm
    }
}
