//! View and remove flows.
//!
//! Viewing lists upcoming reminders in ascending timestamp order.
//! Removal fuzzy-locates by content substring and confirms in a single
//! shot: unlike the add flow, an unclear reply is simply a non-removal.

use chrono::{Local, NaiveDateTime};
use tracing::{info, warn};

use super::{classify_reply, Assistant, Reply};
use crate::store::KEY_FORMAT;

const DISPLAY_FORMAT: &str = "%A, %B %d at %I:%M %p";

const REMOVE_AFFIRM: [&str; 3] = ["do it", "remove it", "yes"];

impl Assistant {
    /// Speak every upcoming reminder, soonest first.
    pub fn view_reminders(&self) {
        let reminders = match self.store.load() {
            Ok(map) => map,
            Err(e) => return self.report_store_error(&e),
        };
        if reminders.is_empty() {
            self.speak("You have no reminders.");
            return;
        }

        let now = Local::now().naive_local();
        let mut upcoming: Vec<(NaiveDateTime, _)> = reminders
            .iter()
            .filter_map(|(key, reminder)| {
                match NaiveDateTime::parse_from_str(key, KEY_FORMAT) {
                    Ok(dt) if dt >= now => Some((dt, reminder)),
                    Ok(_) => None,
                    Err(e) => {
                        warn!("Skipping malformed reminder key '{key}': {e}");
                        None
                    }
                }
            })
            .collect();
        if upcoming.is_empty() {
            self.speak("No upcoming reminders.");
            return;
        }

        upcoming.sort_by_key(|(dt, _)| *dt);
        for (dt, reminder) in upcoming {
            let mut msg = format!("{} on {}", reminder.content, dt.format(DISPLAY_FORMAT));
            if let Some(doctor) = &reminder.doctor {
                msg.push_str(&format!(", Doctor: {doctor}"));
            }
            msg.push_str(&format!(", Repeat: {}", reminder.repeat));
            self.speak(&msg);
        }
    }

    /// Remove the first reminder whose content contains the spoken
    /// target, after a single-shot confirmation.
    pub fn remove_reminder(&self) {
        let target = self.listen(Some("What reminder do you want to remove?"));
        // An empty target would substring-match every entry.
        if target.is_empty() {
            self.speak("I didn't hear a reminder to remove.");
            return;
        }

        let mut reminders = match self.store.load() {
            Ok(map) => map,
            Err(e) => return self.report_store_error(&e),
        };

        // First match in insertion order, not timestamp order.
        let found = reminders
            .iter()
            .find(|(_, r)| r.content.to_lowercase().contains(&target))
            .map(|(key, _)| key.clone());

        let Some(key) = found else {
            self.speak("No matching reminder found.");
            return;
        };

        self.speak(&format!(
            "Found: {} at {}. Say 'do it' to confirm.",
            reminders[&key].content, key
        ));
        let confirmation = self.listen(None);
        match classify_reply(&confirmation, &REMOVE_AFFIRM, &[]) {
            Reply::Affirm => {
                reminders.shift_remove(&key);
                if let Err(e) = self.store.save(&reminders) {
                    return self.report_store_error(&e);
                }
                info!("Removed reminder at {key}");
                self.speak("Reminder removed.");
            }
            // Single-shot: anything unclear keeps the reminder.
            _ => self.speak("Reminder kept."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogue::tests::scripted;
    use crate::repeat::Repeat;
    use crate::store::{Reminder, ReminderMap};
    use chrono::Duration;

    fn key_in(days: i64, hour: u32) -> String {
        (Local::now().naive_local() + Duration::days(days))
            .date()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
            .format(KEY_FORMAT)
            .to_string()
    }

    fn entry(content: &str, key: &str, repeat: Repeat) -> Reminder {
        Reminder {
            content: content.into(),
            doctor: None,
            datetime: key.into(),
            repeat,
        }
    }

    #[test]
    fn test_view_empty_store() {
        let (assistant, voice, _dir) = scripted(&[]);
        assistant.view_reminders();
        assert!(voice.said("You have no reminders."));
    }

    #[test]
    fn test_view_only_past_entries() {
        let (assistant, voice, _dir) = scripted(&[]);
        let mut map = ReminderMap::new();
        map.insert(
            "2001-01-01 09:00".into(),
            entry("ancient task", "2001-01-01 09:00", Repeat::Once),
        );
        assistant.store.save(&map).unwrap();

        assistant.view_reminders();
        assert!(voice.said("No upcoming reminders."));
        assert!(!voice.said("You have no reminders."));
    }

    #[test]
    fn test_view_sorted_ascending_excluding_past() {
        let (assistant, voice, _dir) = scripted(&[]);
        let later = key_in(5, 9);
        let sooner = key_in(2, 9);
        let mut map = ReminderMap::new();
        // Inserted out of order; spoken order must be by timestamp.
        map.insert(later.clone(), entry("water plants", &later, Repeat::Weekly));
        map.insert(
            "2001-01-01 09:00".into(),
            entry("ancient task", "2001-01-01 09:00", Repeat::Once),
        );
        let mut medicine = entry("see the doctor", &sooner, Repeat::Once);
        medicine.doctor = Some("doctor smith".into());
        map.insert(sooner.clone(), medicine);
        assistant.store.save(&map).unwrap();

        assistant.view_reminders();
        let spoken = voice.spoken();
        assert_eq!(spoken.len(), 2);
        assert!(spoken[0].starts_with("see the doctor on "));
        assert!(spoken[0].contains(", Doctor: doctor smith"));
        assert!(spoken[0].ends_with(", Repeat: once"));
        assert!(spoken[1].starts_with("water plants on "));
        assert!(spoken[1].ends_with(", Repeat: weekly"));
        assert!(!spoken.iter().any(|s| s.contains("ancient task")));
    }

    #[test]
    fn test_remove_confirmed() {
        let (assistant, voice, _dir) = scripted(&["medicine", "do it"]);
        let key = key_in(1, 9);
        let mut map = ReminderMap::new();
        map.insert(key.clone(), entry("take medicine", &key, Repeat::Daily));
        assistant.store.save(&map).unwrap();

        assistant.remove_reminder();
        assert!(voice.said("Reminder removed."));
        assert!(assistant.store.load().unwrap().is_empty());
    }

    #[test]
    fn test_remove_unclear_reply_keeps_reminder() {
        let (assistant, voice, _dir) = scripted(&["medicine", "um, maybe"]);
        let key = key_in(1, 9);
        let mut map = ReminderMap::new();
        map.insert(key.clone(), entry("take medicine", &key, Repeat::Daily));
        assistant.store.save(&map).unwrap();

        assistant.remove_reminder();
        assert!(voice.said("Reminder kept."));
        assert_eq!(assistant.store.load().unwrap().len(), 1);
    }

    #[test]
    fn test_remove_no_match() {
        let (assistant, voice, _dir) = scripted(&["dentist"]);
        let key = key_in(1, 9);
        let mut map = ReminderMap::new();
        map.insert(key.clone(), entry("take medicine", &key, Repeat::Daily));
        assistant.store.save(&map).unwrap();

        assistant.remove_reminder();
        assert!(voice.said("No matching reminder found."));
        assert_eq!(assistant.store.load().unwrap().len(), 1);
    }

    #[test]
    fn test_remove_unheard_target_aborts_without_matching() {
        let (assistant, voice, _dir) = scripted(&[]);
        let key = key_in(1, 9);
        let mut map = ReminderMap::new();
        map.insert(key.clone(), entry("take medicine", &key, Repeat::Daily));
        assistant.store.save(&map).unwrap();

        assistant.remove_reminder();
        assert!(voice.said("I didn't hear a reminder to remove."));
        assert!(!voice.said("Found:"));
        assert_eq!(assistant.store.load().unwrap().len(), 1);
    }

    #[test]
    fn test_remove_twice_reports_not_found() {
        let (assistant, voice, _dir) = scripted(&["medicine", "yes", "medicine"]);
        let key = key_in(1, 9);
        let mut map = ReminderMap::new();
        map.insert(key.clone(), entry("take medicine", &key, Repeat::Daily));
        assistant.store.save(&map).unwrap();

        assistant.remove_reminder();
        assert!(voice.said("Reminder removed."));
        assistant.remove_reminder();
        assert!(voice.said("No matching reminder found."));
    }

    #[test]
    fn test_remove_first_match_in_insertion_order() {
        let (assistant, voice, _dir) = scripted(&["water", "do it"]);
        let first = key_in(5, 9);
        let second = key_in(2, 9);
        let mut map = ReminderMap::new();
        // Later timestamp inserted first; insertion order wins the scan.
        map.insert(first.clone(), entry("water plants", &first, Repeat::Weekly));
        map.insert(second.clone(), entry("drink water", &second, Repeat::Daily));
        assistant.store.save(&map).unwrap();

        assistant.remove_reminder();
        assert!(voice.said("Found: water plants"));
        let remaining = assistant.store.load().unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[&second].content, "drink water");
    }
}
