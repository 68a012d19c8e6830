//! Add-reminder intake flow.
//!
//! CollectContent → [DoctorDetail?] → ResolveDateTime(loop) →
//! CheckDuplicate → ResolveRepeat → Confirm → {Saved | Aborted}.
//! Only the date/time sub-loop and the confirmation retries re-enter a
//! step; every other state is passed once.

use chrono::Local;
use tracing::{debug, info};

use super::{classify_reply, Assistant, Reply};
use crate::datetime::{self, DateTimeParts};
use crate::repeat::Repeat;
use crate::store::{Reminder, KEY_FORMAT};

const DATETIME_PROMPT: &str =
    "Tell me the date and time like 'tomorrow at 9 AM', or just say date or time.";

const AFFIRM: [&str; 3] = ["do it", "add it", "yes"];
const DENY: [&str; 2] = ["cancel", "no"];

impl Assistant {
    /// Run the full add-reminder dialogue to a terminal spoken outcome.
    pub fn add_reminder(&self) {
        let content = self.listen(Some("What is the reminder about?"));
        if content.is_empty() {
            self.speak("Reminder content not received.");
            return;
        }

        let doctor = content
            .contains("doctor")
            .then(|| self.listen(Some("What is the doctor's name?")));

        let Some(key) = self.collect_datetime() else {
            self.speak("I couldn't hear a date and time. Reminder not saved.");
            return;
        };

        let mut reminders = match self.store.load() {
            Ok(map) => map,
            Err(e) => return self.report_store_error(&e),
        };
        if reminders.contains_key(&key) {
            self.speak(&format!(
                "You already have a reminder at {key}. Can't add another at the same time."
            ));
            return;
        }

        let repeat = self.collect_repeat();

        self.speak(&format!(
            "You said '{content}' on {key} repeating {repeat}. Say 'do it' to confirm."
        ));
        for _ in 0..self.dialogue.confirm_attempts {
            let confirmation = self.listen(None);
            match classify_reply(&confirmation, &AFFIRM, &DENY) {
                Reply::Affirm => {
                    let reminder = Reminder {
                        content,
                        doctor,
                        datetime: key.clone(),
                        repeat,
                    };
                    reminders.insert(key.clone(), reminder);
                    if let Err(e) = self.store.save(&reminders) {
                        return self.report_store_error(&e);
                    }
                    info!("Saved reminder at {key}");
                    self.speak("Reminder saved.");
                    return;
                }
                Reply::Deny => {
                    self.speak("Reminder not saved.");
                    return;
                }
                Reply::Unclear => {
                    self.speak("Please say 'do it' to confirm or 'cancel' to stop.");
                }
            }
        }
        self.speak("Reminder not saved after multiple attempts.");
    }

    /// Date/time sub-loop: retries until a future timestamp resolves,
    /// or gives up after too many consecutive silent captures.
    fn collect_datetime(&self) -> Option<String> {
        let mut silent = 0;
        loop {
            let mut phrase = self.listen(Some(DATETIME_PROMPT));
            if phrase.is_empty() {
                silent += 1;
                if silent >= self.dialogue.silence_limit {
                    return None;
                }
                continue;
            }
            silent = 0;

            match datetime::classify(&phrase) {
                DateTimeParts::None => {
                    self.speak("I didn't catch a date or time. Please try again.");
                    continue;
                }
                DateTimeParts::Date => {
                    self.speak("You gave only the date. Please say the time.");
                    let time = self.listen(Some("Say the time like '9 AM' or '14:30'."));
                    if time.is_empty() {
                        continue;
                    }
                    phrase = format!("{phrase} {time}");
                }
                DateTimeParts::Time => {
                    self.speak("You gave only the time. Please say the date.");
                    let date = self.listen(Some("Say the date like 'tomorrow' or 'July 14'."));
                    if date.is_empty() {
                        continue;
                    }
                    phrase = format!("{date} {phrase}");
                }
                DateTimeParts::Both => {}
            }

            let now = Local::now().naive_local();
            match self.resolver.resolve(&phrase, now) {
                None => {
                    debug!("Unparseable date/time phrase: {phrase}");
                    self.speak("I couldn't understand that. Please try again.");
                }
                Some(resolved) if resolved <= now => {
                    self.speak("That time has already passed. Please say a future time.");
                }
                Some(resolved) => {
                    return Some(resolved.format(KEY_FORMAT).to_string());
                }
            }
        }
    }

    /// Repeat cadence with bounded retries; silently defaults to Once.
    fn collect_repeat(&self) -> Repeat {
        for _ in 0..self.dialogue.repeat_attempts {
            let phrase = self.listen(Some("Repeat daily, weekly, monthly, yearly or one time?"));
            if phrase.is_empty() {
                continue;
            }
            match Repeat::normalize(&phrase) {
                Some(repeat) => return repeat,
                None => self.speak("Please say daily, weekly, monthly, yearly, or once."),
            }
        }
        debug!("No cadence understood, defaulting to once");
        Repeat::Once
    }
}
