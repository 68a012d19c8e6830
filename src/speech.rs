//! Speech collaborator traits and the console-backed implementation.
//!
//! The dialogue flows only ever see these traits; microphone capture
//! and synthesis engines plug in behind them. The binary ships a
//! console surface that reads utterances from stdin and writes the
//! transcript to stdout.

use std::io::{self, BufRead, Write};

use tracing::warn;

/// Synchronous speech synthesis. Implementations also append the text
/// to the visible transcript.
pub trait SpeechOutput: Send + Sync {
    fn speak(&self, text: &str);
}

/// One-utterance capture with bounded internal retry.
///
/// Speaks `prompt` first when given. Returns lowercase-trimmed text,
/// or an empty string once the retry budget is exhausted.
pub trait SpeechInput: Send + Sync {
    fn listen(&self, prompt: Option<&str>) -> String;
}

/// Stdin/stdout transcript surface.
pub struct ConsoleSurface {
    retries: u32,
}

impl ConsoleSurface {
    pub fn new(retries: u32) -> Self {
        Self { retries }
    }
}

impl SpeechOutput for ConsoleSurface {
    fn speak(&self, text: &str) {
        println!("Assistant: {text}");
        let _ = io::stdout().flush();
    }
}

impl SpeechInput for ConsoleSurface {
    fn listen(&self, prompt: Option<&str>) -> String {
        if let Some(prompt) = prompt {
            self.speak(prompt);
        }

        for attempt in 0..self.retries {
            println!("Listening...");
            let _ = io::stdout().flush();

            let mut line = String::new();
            match io::stdin().lock().read_line(&mut line) {
                // EOF: no further input will arrive, stop retrying.
                Ok(0) => return String::new(),
                Ok(_) => {
                    let text = line.trim().to_lowercase();
                    if text.is_empty() {
                        if attempt + 1 < self.retries {
                            self.speak("Sorry, I didn't catch that.");
                        }
                        continue;
                    }
                    println!("You: {text}");
                    return text;
                }
                Err(e) => {
                    warn!("Failed to read utterance: {e}");
                    if attempt + 1 < self.retries {
                        self.speak("No response. Try again.");
                    }
                }
            }
        }

        String::new()
    }
}
