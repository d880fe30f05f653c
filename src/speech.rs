use std::io::{BufRead, BufReader, Write};
use std::process::{Child, Command, Stdio};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum SpeechError {
    #[error("speech recognition is not available")]
    Unavailable,
    #[error("no speech heard within {0:?}")]
    Timeout(Duration),
    #[error("recognition failed: {0}")]
    Recognition(String),
    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Speech synthesis capability
pub trait Speaker: Send + Sync {
    /// Start speaking `text`, cancelling any utterance still in progress
    fn speak(&self, text: &str, lang_tag: &str) -> Result<(), SpeechError>;

    /// Whether an utterance is still playing
    fn is_speaking(&self) -> bool;

    /// Stop playback immediately
    fn cancel(&self);
}

/// One-shot speech recognition capability
pub trait Recognizer: Send + Sync {
    fn available(&self) -> bool {
        true
    }

    /// Listen for a single utterance and return its transcript
    fn recognize_once(&self, lang_tag: &str) -> Result<String, SpeechError>;
}

/// Utterance rate and pitch, 1.0 is the engine's normal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Voice {
    pub rate: f32,
    pub pitch: f32,
}

impl Default for Voice {
    fn default() -> Self {
        Self {
            rate: 1.0,
            pitch: 1.0,
        }
    }
}

// ============================================================================
// Console Speaker
// ============================================================================

/// Writes utterances to the terminal instead of playing audio
pub struct ConsoleSpeaker;

impl Speaker for ConsoleSpeaker {
    fn speak(&self, text: &str, lang_tag: &str) -> Result<(), SpeechError> {
        // \r\n so output stays aligned when the terminal is in raw mode
        let mut out = std::io::stdout();
        write!(out, "\r\x1b[K\x1b[35m♪ [{}] {}\x1b[0m\r\n", lang_tag, text)?;
        out.flush()?;
        Ok(())
    }

    fn is_speaking(&self) -> bool {
        false
    }

    fn cancel(&self) {}
}

// ============================================================================
// Command Speaker
// ============================================================================

/// Speaks through an external TTS program such as `say` or `espeak-ng`
///
/// Arguments may contain `{text}`, `{lang}`, `{rate}` and `{pitch}`
/// placeholders. Cancelling kills the running process.
pub struct CommandSpeaker {
    program: String,
    args: Vec<String>,
    voice: Voice,
    child: Mutex<Option<Child>>,
}

impl CommandSpeaker {
    pub fn new(program: impl Into<String>, args: Vec<String>, voice: Voice) -> Self {
        Self {
            program: program.into(),
            args,
            voice,
            child: Mutex::new(None),
        }
    }

    fn lock_child(&self) -> std::sync::MutexGuard<'_, Option<Child>> {
        self.child.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Speaker for CommandSpeaker {
    fn speak(&self, text: &str, lang_tag: &str) -> Result<(), SpeechError> {
        self.cancel();
        let rate = self.voice.rate.to_string();
        let pitch = self.voice.pitch.to_string();
        let args = expand_args(
            &self.args,
            &[
                ("{text}", text),
                ("{lang}", lang_tag),
                ("{rate}", &rate),
                ("{pitch}", &pitch),
            ],
        );
        log::debug!("speak: {} {:?}", self.program, args);
        let child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| SpeechError::Spawn {
                program: self.program.clone(),
                source,
            })?;
        *self.lock_child() = Some(child);
        Ok(())
    }

    fn is_speaking(&self) -> bool {
        let mut guard = self.lock_child();
        let polled = match guard.as_mut() {
            Some(child) => child.try_wait(),
            None => return false,
        };
        match polled {
            Ok(None) => true,
            Ok(Some(status)) => {
                if !status.success() {
                    log::warn!("{} exited with {}", self.program, status);
                }
                *guard = None;
                false
            }
            Err(e) => {
                log::warn!("failed to poll {}: {}", self.program, e);
                *guard = None;
                false
            }
        }
    }

    fn cancel(&self) {
        if let Some(mut child) = self.lock_child().take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

impl Drop for CommandSpeaker {
    fn drop(&mut self) {
        self.cancel();
    }
}

// ============================================================================
// Typed Recognizer
// ============================================================================

/// Takes the learner's repetition as a typed line
pub struct TypedRecognizer<R> {
    input: Mutex<R>,
}

impl TypedRecognizer<BufReader<std::io::Stdin>> {
    pub fn stdin() -> Self {
        // capacity 1 leaves unread lines in the shared stdin buffer
        Self::new(BufReader::with_capacity(1, std::io::stdin()))
    }
}

impl<R: BufRead + Send> TypedRecognizer<R> {
    pub fn new(input: R) -> Self {
        Self {
            input: Mutex::new(input),
        }
    }
}

impl<R: BufRead + Send> Recognizer for TypedRecognizer<R> {
    fn recognize_once(&self, lang_tag: &str) -> Result<String, SpeechError> {
        let mut out = std::io::stdout();
        write!(out, "\x1b[90m[{}] say it (type) > \x1b[0m", lang_tag)?;
        out.flush()?;

        let mut line = String::new();
        let mut input = self.input.lock().unwrap_or_else(|e| e.into_inner());
        if input.read_line(&mut line)? == 0 {
            return Err(SpeechError::Recognition("input closed".into()));
        }
        Ok(line.trim().to_string())
    }
}

// ============================================================================
// Command Recognizer
// ============================================================================

/// Runs an external recognizer and takes the first non-empty stdout line
///
/// `{lang}` in the arguments is replaced by the language tag. The process
/// is killed if it has not answered within `timeout`.
pub struct CommandRecognizer {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandRecognizer {
    pub fn new(program: impl Into<String>, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args,
            timeout,
        }
    }
}

impl Recognizer for CommandRecognizer {
    fn recognize_once(&self, lang_tag: &str) -> Result<String, SpeechError> {
        let args = expand_args(&self.args, &[("{lang}", lang_tag)]);
        log::debug!("recognize: {} {:?}", self.program, args);
        let mut child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| SpeechError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let Some(stdout) = child.stdout.take() else {
            stop(&mut child);
            return Err(SpeechError::Recognition("no stdout from recognizer".into()));
        };
        let (tx, rx) = flume::bounded::<std::io::Result<Option<String>>>(1);
        std::thread::spawn(move || {
            for line in BufReader::new(stdout).lines() {
                match line {
                    Ok(line) if line.trim().is_empty() => continue,
                    Ok(line) => {
                        let _ = tx.send(Ok(Some(line.trim().to_string())));
                        return;
                    }
                    Err(e) => {
                        let _ = tx.send(Err(e));
                        return;
                    }
                }
            }
            let _ = tx.send(Ok(None));
        });

        match rx.recv_timeout(self.timeout) {
            // first line is the transcript; the recognizer may keep running
            Ok(Ok(Some(line))) => {
                stop(&mut child);
                Ok(line)
            }
            Ok(Ok(None)) => {
                let status = child.wait()?;
                if !status.success() {
                    return Err(SpeechError::Recognition(format!(
                        "{} exited with {}",
                        self.program, status
                    )));
                }
                Ok(String::new())
            }
            Ok(Err(e)) => {
                stop(&mut child);
                Err(e.into())
            }
            Err(_) => {
                stop(&mut child);
                Err(SpeechError::Timeout(self.timeout))
            }
        }
    }
}

fn stop(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

// ============================================================================
// Unavailable Recognizer
// ============================================================================

/// Stand-in when no recognizer is configured; shadowing is disabled
pub struct UnavailableRecognizer;

impl Recognizer for UnavailableRecognizer {
    fn available(&self) -> bool {
        false
    }

    fn recognize_once(&self, _lang_tag: &str) -> Result<String, SpeechError> {
        Err(SpeechError::Unavailable)
    }
}

fn expand_args(args: &[String], vars: &[(&str, &str)]) -> Vec<String> {
    args.iter()
        .map(|arg| {
            vars.iter()
                .fold(arg.clone(), |acc, (key, value)| acc.replace(key, value))
        })
        .collect()
}
