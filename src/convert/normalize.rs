//! Deterministic post-processing of the model output.
//!
//! Two optional steps, always in this order:
//! 1. NFKC normalization, which folds presentation forms and other
//!    compatibility variants to their canonical letters.
//! 2. The NG final-glyph override: when the Turkish input ends with "n" or
//!    "ng", the last character of the output becomes [`NG_FINAL_GLYPH`].
//!
//! The override runs second because NFKC would fold U+FBD3 back to U+06AD.

use unicode_normalization::UnicodeNormalization;

/// ARABIC LETTER NG ISOLATED FORM (ﯓ).
pub const NG_FINAL_GLYPH: char = '\u{FBD3}';

/// Post-processing toggles for one conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OutputNormalizer {
    pub normalize: bool,
    pub force_ng_final: bool,
}

impl OutputNormalizer {
    pub fn new(normalize: bool, force_ng_final: bool) -> Self {
        Self {
            normalize,
            force_ng_final,
        }
    }

    /// Post-process `output`, the model's answer for the Turkish `source`.
    pub fn apply(&self, source: &str, output: &str) -> String {
        let mut text = if self.normalize {
            nfkc(output)
        } else {
            output.to_string()
        };

        if self.force_ng_final && ends_with_ng(source) {
            text.pop();
            text.push(NG_FINAL_GLYPH);
        }

        text
    }
}

/// Unicode Normalization Form KC.
pub fn nfkc(text: &str) -> String {
    text.nfkc().collect()
}

/// Whether the Latin-script input ends with "n" or "ng", ignoring case and
/// trailing whitespace. A plain suffix match: "gülümserken" qualifies,
/// "Merhaba dünya" and "ben." do not.
pub fn ends_with_ng(text: &str) -> bool {
    let tail = text.trim_end().to_lowercase();
    tail.ends_with('n') || tail.ends_with("ng")
}
