use serde::{Deserialize, Serialize};

/// Text-to-speech quality tier, priced differently upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TtsTier {
    /// Baseline quality, billed per million characters.
    Standard,
    /// High-definition quality, billed per million characters.
    Hd,
    /// Low-latency tier, billed per minute of generated audio; characters
    /// are converted through an assumed speaking rate.
    Flash,
}

/// Billing rates for the metered upstream speech APIs. These are overridable
/// constants, not business logic — callers may substitute their own.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostRates {
    /// Speech-to-text, USD per minute of audio.
    pub stt_per_minute: f64,
    /// Standard TTS, USD per million characters.
    pub tts_standard_per_million_chars: f64,
    /// HD TTS, USD per million characters.
    pub tts_hd_per_million_chars: f64,
    /// Low-latency TTS, USD per minute of generated audio.
    pub tts_flash_per_minute: f64,
    /// Assumed speaking rate used to convert characters to minutes for the
    /// low-latency tier.
    pub flash_chars_per_minute: f64,
}

impl Default for CostRates {
    fn default() -> Self {
        Self {
            stt_per_minute: 0.006,
            tts_standard_per_million_chars: 15.0,
            tts_hd_per_million_chars: 30.0,
            tts_flash_per_minute: 0.015,
            flash_chars_per_minute: 1000.0,
        }
    }
}

impl CostRates {
    /// Estimated cost of transcribing `seconds` of audio.
    pub fn stt_cost(&self, seconds: f64) -> f64 {
        (seconds / 60.0) * self.stt_per_minute
    }

    /// Estimated cost of synthesizing `chars` characters at the given tier.
    pub fn tts_cost(&self, chars: usize, tier: TtsTier) -> f64 {
        let chars = chars as f64;
        match tier {
            TtsTier::Standard => chars / 1_000_000.0 * self.tts_standard_per_million_chars,
            TtsTier::Hd => chars / 1_000_000.0 * self.tts_hd_per_million_chars,
            TtsTier::Flash => {
                let minutes = chars / self.flash_chars_per_minute;
                minutes * self.tts_flash_per_minute
            }
        }
    }
}
