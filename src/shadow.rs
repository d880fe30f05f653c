//! Shadowing - hear the learner repeat a phrase and grade it, and scene playback

use crate::lang::Language;
use crate::similarity::{percent, similarity};
use crate::speech::{Recognizer, Speaker, SpeechError};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Graded repetition attempt
#[derive(Debug, Clone, PartialEq)]
pub struct ShadowResult {
    pub heard: String,
    pub target: String,
    pub score: f64,
    pub percent: u8,
}

impl ShadowResult {
    pub fn grade(heard: &str, target: &str) -> Self {
        let score = similarity(heard, target);
        Self {
            heard: heard.to_string(),
            target: target.to_string(),
            score,
            percent: percent(score),
        }
    }
}

impl fmt::Display for ShadowResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "You said: {} | Target: {} | Similarity: {}%",
            self.heard, self.target, self.percent
        )
    }
}

/// Recognize one utterance and grade it against `target`
///
/// Recognition errors are returned as-is and never reach the scorer.
pub fn shadow_once(
    recognizer: &dyn Recognizer,
    target: &str,
    lang: Language,
) -> Result<ShadowResult, SpeechError> {
    if !recognizer.available() {
        return Err(SpeechError::Unavailable);
    }
    let heard = recognizer.recognize_once(lang.speech_tag())?;
    let result = ShadowResult::grade(&heard, target);
    log::info!("shadow: {:?} vs {:?} -> {}%", heard, target, result.percent);
    Ok(result)
}

/// Plain message shown to the learner when shadowing fails
pub fn failure_message(err: &SpeechError) -> String {
    match err {
        SpeechError::Unavailable => "Speech recognition is not available.".to_string(),
        SpeechError::Timeout(_) => "Didn't hear anything. Try again.".to_string(),
        _ => "Could not hear you. Check the microphone or recognizer setup.".to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    Finished,
    Cancelled,
}

/// Speak each text in order, waiting for each to finish
///
/// Checks `cancel` between polls; when set, stops the speaker and returns
/// `Cancelled`. The flag is cleared on the way out.
pub fn play_all<S: AsRef<str>>(
    speaker: &dyn Speaker,
    texts: &[S],
    lang: Language,
    cancel: &AtomicBool,
) -> Result<PlayOutcome, SpeechError> {
    speaker.cancel();
    for text in texts {
        if cancel.swap(false, Ordering::SeqCst) {
            speaker.cancel();
            return Ok(PlayOutcome::Cancelled);
        }
        speaker.speak(text.as_ref(), lang.speech_tag())?;
        while speaker.is_speaking() {
            if cancel.swap(false, Ordering::SeqCst) {
                speaker.cancel();
                return Ok(PlayOutcome::Cancelled);
            }
            std::thread::sleep(POLL_INTERVAL);
        }
    }
    Ok(PlayOutcome::Finished)
}

/// Routes Ctrl-C: stops scene playback while one runs, otherwise ends the session
#[derive(Debug, Default)]
pub struct Interrupt {
    playing: AtomicBool,
    cancel: AtomicBool,
}

impl Interrupt {
    /// Handle one Ctrl-C; `true` means the session should end
    pub fn fire(&self) -> bool {
        if self.playing.load(Ordering::SeqCst) {
            self.cancel.store(true, Ordering::SeqCst);
            false
        } else {
            true
        }
    }

    /// `play_all` with Ctrl-C routed to cancellation for its duration
    pub fn play<S: AsRef<str>>(
        &self,
        speaker: &dyn Speaker,
        texts: &[S],
        lang: Language,
    ) -> Result<PlayOutcome, SpeechError> {
        self.cancel.store(false, Ordering::SeqCst);
        self.playing.store(true, Ordering::SeqCst);
        let outcome = play_all(speaker, texts, lang, &self.cancel);
        self.playing.store(false, Ordering::SeqCst);
        outcome
    }
}
