//! Multi-turn reminder dialogues.
//!
//! One triggered voice command runs exactly one flow to a terminal
//! spoken outcome. Components:
//! - `intake`: the add-reminder state machine
//! - `review`: view and remove flows
//!
//! The assistant talks only through the injected speech collaborators,
//! so tests drive it with scripted fakes.

pub mod intake;
pub mod review;

use std::sync::Arc;

use chrono::{Local, Timelike};
use tracing::{info, warn};

use crate::config::DialogueConfig;
use crate::datetime::ResolveDateTime;
use crate::speech::{SpeechInput, SpeechOutput};
use crate::store::{ReminderStore, StoreError};

/// What the trigger loop should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Handled,
    Exit,
}

/// How a confirmation utterance reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Reply {
    Affirm,
    Deny,
    Unclear,
}

/// Substring confirmation check. Affirmatives win over negatives, so
/// "no, do it" confirms.
pub(crate) fn classify_reply(utterance: &str, affirmatives: &[&str], negatives: &[&str]) -> Reply {
    if affirmatives.iter().any(|a| utterance.contains(a)) {
        Reply::Affirm
    } else if negatives.iter().any(|n| utterance.contains(n)) {
        Reply::Deny
    } else {
        Reply::Unclear
    }
}

pub struct Assistant {
    pub(crate) input: Arc<dyn SpeechInput>,
    pub(crate) output: Arc<dyn SpeechOutput>,
    pub(crate) store: ReminderStore,
    pub(crate) resolver: Box<dyn ResolveDateTime>,
    pub(crate) dialogue: DialogueConfig,
}

impl Assistant {
    pub fn new(
        input: Arc<dyn SpeechInput>,
        output: Arc<dyn SpeechOutput>,
        store: ReminderStore,
        resolver: Box<dyn ResolveDateTime>,
        dialogue: DialogueConfig,
    ) -> Self {
        Self {
            input,
            output,
            store,
            resolver,
            dialogue,
        }
    }

    pub(crate) fn speak(&self, text: &str) {
        self.output.speak(text);
    }

    pub(crate) fn listen(&self, prompt: Option<&str>) -> String {
        self.input.listen(prompt)
    }

    /// Hour-appropriate greeting plus an introduction.
    pub fn greet(&self) {
        self.speak(greeting_for_hour(Local::now().hour()));
        self.speak("I am your reminder assistant. How can I help you today?");
    }

    /// Capture one command and dispatch it to a flow.
    pub fn run_command(&self) -> CommandOutcome {
        let command = self.listen(Some("Your command?"));
        if command.is_empty() {
            self.speak("No command received.");
            return CommandOutcome::Exit;
        }

        info!("Dispatching command: {command}");
        if command.contains("add") {
            self.add_reminder();
        } else if command.contains("view") || command.contains("show") {
            self.view_reminders();
        } else if command.contains("remove") || command.contains("delete") {
            self.remove_reminder();
        } else if command.contains("exit") || command.contains("stop") {
            self.speak("Goodbye!");
            return CommandOutcome::Exit;
        } else {
            self.speak("Unknown command. Try again.");
        }
        CommandOutcome::Handled
    }

    /// Speak a terminal message for a failed store operation.
    pub(crate) fn report_store_error(&self, error: &StoreError) {
        warn!("Store operation failed: {error}");
        self.speak("I couldn't access your reminders. Please check the reminder file.");
    }
}

fn greeting_for_hour(hour: u32) -> &'static str {
    if hour < 12 {
        "Good Morning!"
    } else if hour < 18 {
        "Good Afternoon!"
    } else {
        "Good Evening!"
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::datetime::PhraseResolver;
    use crate::speech::testing::ScriptedVoice;
    use tempfile::TempDir;

    /// Assistant wired to a scripted voice and a temp-dir store.
    pub(crate) fn scripted(replies: &[&str]) -> (Assistant, Arc<ScriptedVoice>, TempDir) {
        let dir = TempDir::new().unwrap();
        let voice = Arc::new(ScriptedVoice::new(replies));
        let assistant = Assistant::new(
            voice.clone(),
            voice.clone(),
            ReminderStore::new(dir.path().join("reminders.json")),
            Box::new(PhraseResolver),
            DialogueConfig::default(),
        );
        (assistant, voice, dir)
    }

    #[test]
    fn test_greeting_by_hour() {
        assert_eq!(greeting_for_hour(0), "Good Morning!");
        assert_eq!(greeting_for_hour(11), "Good Morning!");
        assert_eq!(greeting_for_hour(12), "Good Afternoon!");
        assert_eq!(greeting_for_hour(17), "Good Afternoon!");
        assert_eq!(greeting_for_hour(18), "Good Evening!");
        assert_eq!(greeting_for_hour(23), "Good Evening!");
    }

    #[test]
    fn test_classify_reply() {
        let affirm = ["do it", "add it", "yes"];
        let deny = ["cancel", "no"];
        assert_eq!(classify_reply("do it", &affirm, &deny), Reply::Affirm);
        assert_eq!(classify_reply("yes please", &affirm, &deny), Reply::Affirm);
        assert_eq!(classify_reply("cancel that", &affirm, &deny), Reply::Deny);
        assert_eq!(classify_reply("maybe", &affirm, &deny), Reply::Unclear);
        assert_eq!(classify_reply("", &affirm, &deny), Reply::Unclear);
        // Affirmatives are checked first.
        assert_eq!(classify_reply("no, do it", &affirm, &deny), Reply::Affirm);
    }

    #[test]
    fn test_view_command_dispatch() {
        let (assistant, voice, _dir) = scripted(&["show my reminders"]);
        assert_eq!(assistant.run_command(), CommandOutcome::Handled);
        assert!(voice.said("You have no reminders."));
    }

    #[test]
    fn test_exit_command() {
        let (assistant, voice, _dir) = scripted(&["exit"]);
        assert_eq!(assistant.run_command(), CommandOutcome::Exit);
        assert!(voice.said("Goodbye!"));
    }

    #[test]
    fn test_unknown_command() {
        let (assistant, voice, _dir) = scripted(&["make me a sandwich"]);
        assert_eq!(assistant.run_command(), CommandOutcome::Handled);
        assert!(voice.said("Unknown command. Try again."));
    }

    #[test]
    fn test_empty_command_exits() {
        let (assistant, voice, _dir) = scripted(&[]);
        assert_eq!(assistant.run_command(), CommandOutcome::Exit);
        assert!(voice.said("No command received."));
    }
}
