//! Translation, example-sentence and Hanja-meaning requests.
//!
//! Each purpose has a fixed system prompt. The plain operations return a
//! placeholder string on any failure; the `try_` variants keep the typed
//! [`ChatError`] for callers that report failures separately.

use crate::client::chat::{ChatError, LanguageModel};
use crate::model::saved_word::HanjaMeaning;
use log::warn;
use rayon::prelude::*;
use std::sync::Arc;

/// Target used when no language is given.
pub const DEFAULT_TARGET_LANGUAGE: &str = "English";

pub const TRANSLATION_ERROR: &str = "Translation error";
pub const EXAMPLES_ERROR: &str = "Error loading examples";
pub const HANJA_MEANING_ERROR: &str = "(error loading meaning)";

const EXAMPLES_PROMPT: &str = "You are a language assistant. Provide exactly 3 example sentences in Korean for the given word or phrase, categorized by difficulty level: easy, medium, and hard. Format your response exactly as:

Easy: <easy example sentence in Korean>
Medium: <medium example sentence in Korean>
Hard: <hard example sentence in Korean>

Add a line break after each example sentence (i.e., after each difficulty level). Do not add explanations or anything else.";

const HANJA_MEANING_PROMPT: &str = "You are a Korean language assistant. Provide a short, precise English meaning of the following Hanja character without extra explanation.";

/// System prompt for translating into `target_language`.
pub fn translation_prompt(target_language: &str) -> String {
    format!(
        "You are a translation assistant. Translate the given word or phrase into {target_language}. Provide a short and precise translation only, no explanations."
    )
}

/// Purpose-specific facade over a [`LanguageModel`].
#[derive(Clone)]
pub struct TranslationClient {
    model: Arc<dyn LanguageModel>,
}

impl TranslationClient {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    pub fn try_translate(&self, text: &str, target_language: &str) -> Result<String, ChatError> {
        self.model
            .complete(&translation_prompt(target_language), text)
    }

    /// Translates `text`; returns [`TRANSLATION_ERROR`] on failure.
    pub fn translate(&self, text: &str, target_language: &str) -> String {
        self.try_translate(text, target_language)
            .unwrap_or_else(|err| {
                warn!("event=translate module=client status=error error={err}");
                TRANSLATION_ERROR.to_string()
            })
    }

    /// Raw `Easy:/Medium:/Hard:` lines; no structure is enforced.
    pub fn try_generate_examples(&self, word: &str) -> Result<String, ChatError> {
        self.model.complete(EXAMPLES_PROMPT, word)
    }

    pub fn generate_examples(&self, word: &str) -> String {
        self.try_generate_examples(word).unwrap_or_else(|err| {
            warn!("event=generate_examples module=client status=error error={err}");
            EXAMPLES_ERROR.to_string()
        })
    }

    pub fn try_lookup_hanja_meaning(&self, character: &str) -> Result<String, ChatError> {
        self.model.complete(HANJA_MEANING_PROMPT, character)
    }

    pub fn lookup_hanja_meaning(&self, character: &str) -> String {
        self.try_lookup_hanja_meaning(character)
            .unwrap_or_else(|err| {
                warn!("event=hanja_meaning module=client status=error error={err}");
                HANJA_MEANING_ERROR.to_string()
            })
    }

    /// Looks up every character concurrently, keeping input order.
    ///
    /// Returns the meanings and whether any lookup failed.
    pub fn lookup_hanja_meanings(&self, characters: &[char]) -> (Vec<HanjaMeaning>, bool) {
        let results: Vec<(HanjaMeaning, bool)> = characters
            .par_iter()
            .map(|character| {
                let character = character.to_string();
                match self.try_lookup_hanja_meaning(&character) {
                    Ok(meaning) => (HanjaMeaning::new(character, meaning), false),
                    Err(err) => {
                        warn!("event=hanja_meaning module=client status=error error={err}");
                        (HanjaMeaning::new(character, HANJA_MEANING_ERROR), true)
                    }
                }
            })
            .collect();
        let failed = results.iter().any(|(_, failed)| *failed);
        (results.into_iter().map(|(meaning, _)| meaning).collect(), failed)
    }
}

/// Splits example output at each newline; every line, blank or not, is kept
/// as the model wrote it.
pub fn example_lines(examples: &str) -> Vec<String> {
    examples.split('\n').map(str::to_string).collect()
}
