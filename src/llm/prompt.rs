//! Prompt builder for Turkish → Ottoman Turkish conversion.
//!
//! [`PromptBuilder::build`] assembles one flat prompt string, in order:
//! 1. System instruction (task + output format)
//! 2. Few-shot examples
//! 3. Reference material, only when a knowledgebase excerpt is present
//! 4. The user's Turkish text + "Ottoman Turkish:" cue

// ---------------------------------------------------------------------------
// System instruction
// ---------------------------------------------------------------------------

const SYSTEM_INSTRUCTION: &str = "\
You are an expert in Ottoman Turkish orthography.
Task: Convert modern Turkish written in the Latin alphabet into Ottoman Turkish written in the Arabic script.

Rules:
1. Use the historical Ottoman spelling of each word, not a letter-by-letter transliteration.
2. Keep Arabic and Persian loanwords in their classical spelling.
3. Write the nasal n (sağır kef) with ڭ where Ottoman orthography uses it.
4. Preserve line breaks, numbers and punctuation; use the Arabic comma (،) and question mark (؟).
5. Reply with ONLY the Ottoman Turkish text: no Latin transcription, no explanation, no quotes.";

// ---------------------------------------------------------------------------
// Few-shot examples
// ---------------------------------------------------------------------------

const FEW_SHOT_EXAMPLES: &str = "
Examples:
Input: \"kitap\"
Output: \"كتاب\"

Input: \"Merhaba dünya\"
Output: \"مرحبا دنیا\"

Input: \"İstanbul güzel bir şehir\"
Output: \"استانبول گوزل بر شهر\"
";

// ---------------------------------------------------------------------------
// Section labels
// ---------------------------------------------------------------------------

/// Heading placed above the knowledgebase excerpt.
pub const REFERENCE_LABEL: &str = "Reference material (knowledgebase excerpt):";
/// Heading placed above the user's text.
pub const INPUT_LABEL: &str = "Turkish text to convert:";
/// Cue that ends the prompt.
pub const OUTPUT_CUE: &str = "Ottoman Turkish:";

const REFERENCE_START: &str = "<<<REFERENCE";
const REFERENCE_END: &str = "REFERENCE>>>";

// ---------------------------------------------------------------------------
// PromptBuilder
// ---------------------------------------------------------------------------

/// Builds conversion prompts. Pure: the output depends only on the inputs.
///
/// # Example
/// ```rust
/// use ottoman_converter::llm::PromptBuilder;
///
/// let prompt = PromptBuilder::new().build("Merhaba dünya", "");
/// assert!(prompt.contains("Merhaba dünya"));
/// assert!(!prompt.contains("Reference material"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Build the prompt for `text`, grounding it with `excerpt` when the
    /// excerpt has any non-whitespace content.
    pub fn build(&self, text: &str, excerpt: &str) -> String {
        let mut prompt = String::with_capacity(
            SYSTEM_INSTRUCTION.len() + FEW_SHOT_EXAMPLES.len() + excerpt.len() + text.len() + 128,
        );

        prompt.push_str(SYSTEM_INSTRUCTION);
        prompt.push('\n');
        prompt.push_str(FEW_SHOT_EXAMPLES);

        let excerpt = excerpt.trim();
        if !excerpt.is_empty() {
            prompt.push_str(&format!(
                "\n{REFERENCE_LABEL}\nUse it to follow the spelling conventions it documents.\n{REFERENCE_START}\n{excerpt}\n{REFERENCE_END}\n"
            ));
        }

        prompt.push_str(&format!("\n{INPUT_LABEL}\n{text}\n\n{OUTPUT_CUE}\n"));
        prompt
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
