//! Terminal front end: drives every component from stdin.
//!
//! Lines starting with `/` are widget events; anything else is a chat message.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::chat::{Conversation, Sender};
use crate::config::AssistConfig;
use crate::error::{GatewayError, TranslationError};
use crate::gateway::{self, Gateway};
use crate::page::PageContext;
use crate::preferences::{PersonalizationStore, PreferenceField, PreferencesInput};
use crate::selection::SelectionTracker;
use crate::skills::{Skill, SkillDispatcher};
use crate::translation::{FnTranslator, Language, TranslationCoordinator, Translator};

const HELP: &str = "\
Commands:
  <text>                 ask the assistant
  /select [text]         simulate a page selection (empty clears it)
  /use                   quote the selection into the pending question
  /send                  send the pending question
  /glossary <text>       run the glossary skill
  /summarize <text>      run the summarize skill
  /tutor <text>          ask the tutor
  /page <path>           set the current page, e.g. /docs/kinematics/intro
  /lang <ur|es|fr|de>    set the translation target
  /translate [text]      translate the selection, or the given text
  /pref <key> <value>    set a preference (empty value unsets)
  /prefs                 show preferences
  /history               show the conversation
  /quit                  exit";

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Ask(String),
    Send,
    Select(Option<String>),
    UseSelection,
    Skill(Skill, String),
    Page(String),
    Language(Language),
    Translate(Option<String>),
    SetPreference(PreferenceField, String),
    ShowPreferences,
    History,
    Help,
    Quit,
    Invalid(String),
}

impl Command {
    pub fn parse(line: &str) -> Command {
        let Some(rest) = line.strip_prefix('/') else {
            return Command::Ask(line.to_string());
        };
        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (rest, ""),
        };
        let optional = |arg: &str| (!arg.is_empty()).then(|| arg.to_string());

        if let Ok(skill) = name.parse::<Skill>() {
            return Command::Skill(skill, arg.to_string());
        }
        match name {
            "select" => Command::Select(optional(arg)),
            "use" => Command::UseSelection,
            "send" => Command::Send,
            "page" => Command::Page(arg.to_string()),
            "lang" => match arg.parse() {
                Ok(lang) => Command::Language(lang),
                Err(e) => Command::Invalid(e),
            },
            "translate" => Command::Translate(optional(arg)),
            "pref" => {
                let (key, value) = arg.split_once(char::is_whitespace).unwrap_or((arg, ""));
                match key.parse::<PreferenceField>() {
                    Ok(field) if field.accepts(value.trim()) => {
                        Command::SetPreference(field, value.trim().to_string())
                    }
                    Ok(field) => Command::Invalid(format!(
                        "{} must be one of: {}",
                        field,
                        field
                            .options()
                            .iter()
                            .map(|(v, _)| *v)
                            .collect::<Vec<_>>()
                            .join(", ")
                    )),
                    Err(e) => Command::Invalid(e),
                }
            }
            "prefs" => Command::ShowPreferences,
            "history" => Command::History,
            "help" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => Command::Invalid(format!("Unknown command: /{other}")),
        }
    }
}

#[derive(Serialize)]
struct TranslateRequest {
    text: String,
    target_language: Language,
}

#[derive(Deserialize)]
struct TranslateResponse {
    translated_text: String,
}

/// Translator backed by a `{text, target_language} -> {translated_text}` endpoint.
fn http_translator(gateway: Arc<dyn Gateway>, endpoint: Option<String>) -> Arc<dyn Translator> {
    Arc::new(FnTranslator::new(move |text: String, target: Language| {
        let gateway = Arc::clone(&gateway);
        let endpoint = endpoint.clone();
        async move {
            let Some(endpoint) = endpoint else {
                return Err(TranslationError::Failed {
                    language: target.to_string(),
                    reason: "DOCS_ASSIST_TRANSLATE_PATH is not set".to_string(),
                });
            };
            let request = TranslateRequest {
                text,
                target_language: target,
            };
            let resp: Result<TranslateResponse, GatewayError> =
                gateway::call(gateway.as_ref(), &endpoint, &request).await;
            Ok(resp?.translated_text)
        }
    }))
}

/// All widget components wired to one shared selection.
pub struct Session {
    selection: SelectionTracker,
    chat: Conversation,
    skills: SkillDispatcher,
    translation: TranslationCoordinator,
    preferences: PersonalizationStore,
}

impl Session {
    pub fn new(config: &AssistConfig, gateway: Arc<dyn Gateway>) -> Self {
        let selection = SelectionTracker::mounted();
        let mut chat = Conversation::new(config, Arc::clone(&gateway), selection.clone());
        chat.open();
        let translate_endpoint = config.translate_path.as_deref().map(|p| config.endpoint(p));
        let translator = http_translator(Arc::clone(&gateway), translate_endpoint);
        Self {
            chat,
            skills: SkillDispatcher::new(config, gateway),
            translation: TranslationCoordinator::new(translator, selection.clone(), ""),
            preferences: PersonalizationStore::new(&PreferencesInput::default(), |prefs| {
                tracing::info!(preferences = ?prefs, "Preferences proposed");
            }),
            selection,
        }
    }

    pub fn conversation(&self) -> &Conversation {
        &self.chat
    }

    /// Apply one command, returning the text to print. `None` means quit.
    pub async fn handle(&mut self, command: Command) -> Option<String> {
        let out = match command {
            Command::Quit => return None,
            Command::Ask(text) => {
                self.chat.set_input(text);
                self.send().await
            }
            Command::Send => self.send().await,
            Command::Select(text) => {
                self.selection.on_pointer_release(text.as_deref());
                match self.selection.preview() {
                    Some(preview) => format!("Selected text: \"{preview}\""),
                    None => "Selection cleared".to_string(),
                }
            }
            Command::UseSelection => {
                if self.chat.use_selection() {
                    format!("Input: {}", self.chat.input())
                } else {
                    "No text selected".to_string()
                }
            }
            Command::Skill(skill, content) => {
                match self.skills.invoke(skill, &content, None).await {
                    Ok(result) => format!("## {}\n\n{}", result.title, result.content),
                    Err(e) => format!("({e})"),
                }
            }
            Command::Page(path) => {
                let page = PageContext::from_path(&path);
                let out = match page.chapter() {
                    Some(chapter) => format!("Chapter: {chapter}"),
                    None => "No chapter for this page".to_string(),
                };
                self.skills.set_page(page);
                out
            }
            Command::Language(lang) => {
                self.translation.set_target_language(lang);
                format!("Translate to: {}", lang.display_name())
            }
            Command::Translate(text) => {
                self.translation.set_content(text.unwrap_or_default());
                match self.translation.translate().await {
                    Ok(translated) => format!("Translation:\n{translated}"),
                    Err(e) => format!("({e})"),
                }
            }
            Command::SetPreference(field, value) => {
                self.preferences.set_field(field, &value);
                format!("{} = {:?}", field.label(), value)
            }
            Command::ShowPreferences => {
                let prefs = self.preferences.preferences();
                PreferenceField::ALL
                    .iter()
                    .map(|f| format!("{}: {}", f.label(), prefs.get(*f)))
                    .collect::<Vec<_>>()
                    .join("\n")
            }
            Command::History => self
                .chat
                .messages()
                .iter()
                .map(|m| {
                    let who = match m.sender {
                        Sender::User => "you",
                        Sender::Assistant => "assistant",
                    };
                    format!("[{}] {}: {}", m.time_label(), who, m.text)
                })
                .collect::<Vec<_>>()
                .join("\n"),
            Command::Help => HELP.to_string(),
            Command::Invalid(reason) => reason,
        };
        Some(out)
    }

    async fn send(&mut self) -> String {
        match self.chat.submit().await {
            Ok(reply) => reply.text.clone(),
            Err(e) => format!("({e})"),
        }
    }

    /// Read commands from stdin until EOF or `/quit`.
    pub async fn run(mut self) -> std::io::Result<()> {
        if let Some(greeting) = self.chat.messages().first() {
            println!("{}\n", greeting.text);
        }
        eprint!("> ");

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                eprint!("> ");
                continue;
            }
            match self.handle(Command::parse(line)).await {
                Some(out) => println!("\n{out}\n"),
                None => break,
            }
            eprint!("> ");
        }
        self.selection.unmount();
        Ok(())
    }
}
