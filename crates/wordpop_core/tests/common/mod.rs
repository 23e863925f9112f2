#![allow(dead_code)]

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use wordpop_core::{
    ChatError, DefinitionRecord, DictionaryError, DictionaryService, LanguageModel,
    MessageRouter, StorageAccessor, TranslationClient, WordStore,
};

/// Dictionary answering from a fixed table; unknown words are a 404.
#[derive(Default)]
pub struct FakeDictionary {
    records: HashMap<String, DefinitionRecord>,
    pub lookups: Mutex<Vec<String>>,
}

impl FakeDictionary {
    pub fn with(mut self, word: &str, record: DefinitionRecord) -> Self {
        self.records.insert(word.to_string(), record);
        self
    }
}

impl DictionaryService for FakeDictionary {
    fn lookup(&self, word: &str) -> Result<DefinitionRecord, DictionaryError> {
        self.lookups.lock().push(word.to_string());
        self.records
            .get(word)
            .cloned()
            .ok_or_else(|| DictionaryError::Status {
                status: 404,
                body: "not found".to_string(),
            })
    }
}

/// Model that answers by prompt kind: `T:<text>` for translations, three
/// example lines, `M:<char>` for Hanja meanings.
#[derive(Default)]
pub struct FakeModel {
    pub calls: Mutex<Vec<(Prompt, String)>>,
    pub offline: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt {
    Translate,
    Examples,
    HanjaMeaning,
}

impl FakeModel {
    pub fn offline() -> Self {
        Self {
            offline: true,
            ..Self::default()
        }
    }

    pub fn count(&self, prompt: Prompt) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|(kind, _)| *kind == prompt)
            .count()
    }
}

impl LanguageModel for FakeModel {
    fn complete(&self, system_prompt: &str, user_content: &str) -> Result<String, ChatError> {
        let prompt = if system_prompt.contains("translation assistant") {
            Prompt::Translate
        } else if system_prompt.contains("example sentences") {
            Prompt::Examples
        } else {
            Prompt::HanjaMeaning
        };
        self.calls.lock().push((prompt, user_content.to_string()));
        if self.offline {
            return Err(ChatError::Status {
                status: 503,
                body: "unavailable".to_string(),
            });
        }
        Ok(match prompt {
            Prompt::Translate => format!("T:{user_content}"),
            Prompt::Examples => format!(
                "Easy: {user_content} 1\n\nMedium: {user_content} 2\nHard: {user_content} 3"
            ),
            Prompt::HanjaMeaning => format!("M:{user_content}"),
        })
    }
}

pub fn school() -> DefinitionRecord {
    DefinitionRecord {
        title: Some("학교".to_string()),
        topik: Some("1".to_string()),
        importance: Some("★★★".to_string()),
        hanja: Some("學校".to_string()),
        endef: Some("school".to_string()),
        pronun: Some("[학꾜]".to_string()),
        part_speech: Some("명사".to_string()),
        meanings: Some("A place where students learn.".to_string()),
    }
}

pub fn love() -> DefinitionRecord {
    DefinitionRecord {
        title: Some("사랑".to_string()),
        endef: Some("love".to_string()),
        ..DefinitionRecord::default()
    }
}

pub struct Fixture {
    pub dictionary: Arc<FakeDictionary>,
    pub model: Arc<FakeModel>,
    pub words: WordStore,
    pub router: MessageRouter,
    pub translator: TranslationClient,
}

pub fn fixture_with(dictionary: FakeDictionary, model: FakeModel) -> Fixture {
    let storage = Arc::new(StorageAccessor::open_in_memory().unwrap());
    let words = WordStore::new(storage);
    let dictionary = Arc::new(dictionary);
    let model = Arc::new(model);
    let router = MessageRouter::new(dictionary.clone(), words.clone());
    let translator = TranslationClient::new(model.clone());
    Fixture {
        dictionary,
        model,
        words,
        router,
        translator,
    }
}

pub fn fixture() -> Fixture {
    fixture_with(
        FakeDictionary::default()
            .with("학교", school())
            .with("사랑", love())
            .with("빈", DefinitionRecord::default()),
        FakeModel::default(),
    )
}
