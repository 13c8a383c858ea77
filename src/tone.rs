//! Intensity-to-parameters mapping.
//!
//! Maps a raw slider value (0-10) to a system prompt and a pair of decoding
//! parameters. Everything here is a pure function of its input: no I/O, no
//! shared state, no failure mode. The relay calls [`map_intensity`] once per
//! request.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Intensity
// ---------------------------------------------------------------------------

/// Tone intensity on the 0-10 slider scale.
///
/// Construction clamps to the valid range; out-of-range values are never
/// rejected. A missing or non-integer value in a request decodes to 0, which
/// is intentionally not the slider UI's displayed default of 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Intensity(u8);

impl Intensity {
    /// Lowest intensity: fully neutral tone.
    pub const MIN: Intensity = Intensity(0);
    /// Highest intensity: maximum edge, safety rules still apply.
    pub const MAX: Intensity = Intensity(10);

    /// Clamp any integer onto the 0-10 scale.
    pub fn new(raw: i64) -> Self {
        Self(raw.clamp(0, 10) as u8)
    }

    /// The clamped slider value.
    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Intensity {
    fn default() -> Self {
        Self::MIN
    }
}

impl fmt::Display for Intensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Tone table and prompt text
// ---------------------------------------------------------------------------

/// Tone description per intensity level, indexed by the clamped value.
///
/// The gradient runs from fully neutral at 0 to maximum sharpness at 10.
/// Profanity is progressively permitted from level 7 up; hate, discrimination
/// and incitement to violence stay forbidden at every level.
pub const TONE_TABLE: [&str; 11] = [
    "Completely neutral, professional, with no aggression whatsoever.",
    "Extremely tactful; avoid any negative emotion.",
    "Polite and restrained, but state the position clearly.",
    "Slightly blunt; light ribbing, no personal attacks.",
    "Express displeasure directly while staying respectful.",
    "Moderately sharp; call out the problem and make concrete demands.",
    "Noticeably curt; a barbed but rational tone.",
    "Visibly annoyed, forceful language; mild profanity allowed.",
    "Very forceful; short bursts of profanity allowed, avoid crudeness.",
    "Extremely sharp; overt profanity allowed, avoid demeaning the person.",
    "Maximum intensity: extremely sharp, coarse language allowed, but never \
     hate, discrimination, or incitement to violence.",
];

/// Safety instruction included verbatim in every system prompt, at every
/// intensity level.
pub const GUARDRAIL_CLAUSE: &str = "Regardless of the tone intensity, you must \
    avoid hate speech, discrimination, personal attacks on vulnerable or \
    protected groups, and any illegal content or incitement to violence. \
    General profanity and a strong, non-hateful tone are allowed.";

/// Look up the tone description for a clamped intensity.
///
/// Falls back to the level-5 description if the index somehow misses; the
/// clamp makes that branch unreachable in practice.
pub fn tone_description(intensity: Intensity) -> &'static str {
    TONE_TABLE
        .get(intensity.value() as usize)
        .copied()
        .unwrap_or(TONE_TABLE[5])
}

/// Compose the system prompt for a clamped intensity.
///
/// Persona preamble, the literal target level, the tone description, the
/// guardrail clause, and the output-format instruction, in that order.
pub fn build_system_prompt(intensity: Intensity) -> String {
    format!(
        "You are an assistant that adjusts how aggressive its tone is to a \
         requested intensity level.\n\
         Target tone intensity (0-10): {intensity}.\n\
         Tone guidance: {description}\n\
         Safety rules: {guardrails}\n\
         Respond in the same language as the user's message. Be concise and \
         direct, and where it helps, offer concrete actionable suggestions \
         or a ready-to-paste draft.",
        description = tone_description(intensity),
        guardrails = GUARDRAIL_CLAUSE,
    )
}

// ---------------------------------------------------------------------------
// Decoding parameters
// ---------------------------------------------------------------------------

/// Sampling temperature and output-length budget for one completion call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecodingParams {
    /// Sampling temperature in [0.20, 1.00], two decimal places.
    pub temperature: f64,
    /// Output token budget: 256 up to intensity 5, 512 above.
    pub max_tokens: u32,
}

impl DecodingParams {
    /// Derive decoding parameters from a clamped intensity.
    ///
    /// Temperature rises linearly, 0.2 + (i/10) * 0.8, rounded to two
    /// decimals. The token budget is a step function, not a gradient.
    pub fn for_intensity(intensity: Intensity) -> Self {
        let raw = 0.2 + f64::from(intensity.value()) / 10.0 * 0.8;
        Self {
            temperature: (raw * 100.0).round() / 100.0,
            max_tokens: if intensity.value() <= 5 { 256 } else { 512 },
        }
    }
}

// ---------------------------------------------------------------------------
// Mapping
// ---------------------------------------------------------------------------

/// Everything the relay needs to issue one completion call.
#[derive(Debug, Clone)]
pub struct ToneMapping {
    /// The clamped intensity the request resolved to.
    pub intensity: Intensity,
    /// Fully composed system prompt for this level.
    pub system_prompt: String,
    /// Temperature and token budget for this level.
    pub params: DecodingParams,
}

/// Map a raw intensity value to prompt and decoding parameters.
///
/// Accepts any integer; values outside 0-10 are clamped first, so this never
/// fails.
pub fn map_intensity(raw: i64) -> ToneMapping {
    let intensity = Intensity::new(raw);
    ToneMapping {
        intensity,
        system_prompt: build_system_prompt(intensity),
        params: DecodingParams::for_intensity(intensity),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
