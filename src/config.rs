use crate::lang::Language;
use crate::seed::ExpandOptions;
use crate::speech::{
    CommandRecognizer, CommandSpeaker, ConsoleSpeaker, Recognizer, Speaker, TypedRecognizer,
    UnavailableRecognizer, Voice,
};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Language practised at startup
    #[serde(default)]
    pub lang: Language,
    /// JSON practice data; the built-in sample is used when unset
    #[serde(default)]
    pub data_path: Option<String>,
    #[serde(default)]
    pub speaker: SpeakerConfig,
    #[serde(default)]
    pub recognizer: RecognizerConfig,
    #[serde(default)]
    pub expand: ExpandConfig,
}

// ============================================================================
// Speaker Config
// ============================================================================

#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(tag = "engine")]
pub enum SpeakerConfig {
    /// Print utterances to the terminal (default)
    #[default]
    #[serde(rename = "console")]
    Console,
    /// Run an external TTS program per utterance
    #[serde(rename = "command")]
    Command {
        program: String,
        #[serde(default = "default_speaker_args")]
        args: Vec<String>,
        #[serde(default = "default_rate")]
        rate: f32,
        #[serde(default = "default_pitch")]
        pitch: f32,
    },
}

fn default_speaker_args() -> Vec<String> {
    vec!["{text}".to_string()]
}

fn default_rate() -> f32 {
    1.0
}

fn default_pitch() -> f32 {
    1.0
}

impl SpeakerConfig {
    pub fn build(&self) -> Box<dyn Speaker> {
        match self {
            SpeakerConfig::Console => {
                log::info!("speaker: console");
                Box::new(ConsoleSpeaker)
            }
            SpeakerConfig::Command {
                program,
                args,
                rate,
                pitch,
            } => {
                log::info!("speaker: {} (rate {}, pitch {})", program, rate, pitch);
                Box::new(CommandSpeaker::new(
                    expand_env_vars(program),
                    args.iter().map(|a| expand_env_vars(a)).collect(),
                    Voice {
                        rate: *rate,
                        pitch: *pitch,
                    },
                ))
            }
        }
    }
}

// ============================================================================
// Recognizer Config
// ============================================================================

#[derive(Debug, Deserialize, PartialEq)]
#[serde(tag = "engine")]
pub enum RecognizerConfig {
    /// Learner types what they said
    #[serde(rename = "typed")]
    Typed,
    /// External recognizer printing the transcript on stdout
    #[serde(rename = "command")]
    Command {
        program: String,
        #[serde(default = "default_recognizer_args")]
        args: Vec<String>,
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
    },
    /// Shadowing disabled
    #[serde(rename = "none")]
    Disabled,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        RecognizerConfig::Typed
    }
}

fn default_recognizer_args() -> Vec<String> {
    vec!["{lang}".to_string()]
}

fn default_timeout_secs() -> u64 {
    20
}

impl RecognizerConfig {
    pub fn build(&self) -> Box<dyn Recognizer> {
        match self {
            RecognizerConfig::Typed => {
                log::info!("recognizer: typed");
                Box::new(TypedRecognizer::stdin())
            }
            RecognizerConfig::Command {
                program,
                args,
                timeout_secs,
            } => {
                log::info!("recognizer: {} (timeout {}s)", program, timeout_secs);
                Box::new(CommandRecognizer::new(
                    expand_env_vars(program),
                    args.iter().map(|a| expand_env_vars(a)).collect(),
                    Duration::from_secs(*timeout_secs),
                ))
            }
            RecognizerConfig::Disabled => {
                log::info!("recognizer: disabled");
                Box::new(UnavailableRecognizer)
            }
        }
    }
}

// ============================================================================
// Expand Config
// ============================================================================

#[derive(Debug, Deserialize, PartialEq)]
pub struct ExpandConfig {
    #[serde(default = "default_deck_cards")]
    pub deck_cards: usize,
    #[serde(default = "default_scenes")]
    pub scenes: usize,
}

impl Default for ExpandConfig {
    fn default() -> Self {
        Self {
            deck_cards: default_deck_cards(),
            scenes: default_scenes(),
        }
    }
}

fn default_deck_cards() -> usize {
    500
}

fn default_scenes() -> usize {
    250
}

impl From<&ExpandConfig> for ExpandOptions {
    fn from(c: &ExpandConfig) -> Self {
        ExpandOptions {
            target_deck_cards: c.deck_cards,
            target_scenes: c.scenes,
        }
    }
}

/// Expand `${VAR}` from the environment in a single pass
///
/// Substituted values are not rescanned. Unset variables expand to nothing;
/// an unterminated `${` is kept as written.
fn expand_env_vars(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            out.push_str(&rest[start..]);
            return out;
        };
        let name = &after[..end];
        match std::env::var(name) {
            Ok(value) => out.push_str(&value),
            Err(_) => log::warn!("environment variable '{}' not set, using \"\"", name),
        }
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    out
}

impl Config {
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Load from `path` (or `config.toml`); falls back to defaults
    pub fn load(path: Option<&Path>) -> Self {
        let path = path.unwrap_or(Path::new(DEFAULT_CONFIG_PATH));
        if !path.exists() {
            log::debug!("no config at {}, using defaults", path.display());
            return Config::default();
        }
        match fs::read_to_string(path) {
            Ok(s) => Self::from_toml(&s).unwrap_or_else(|e| {
                log::warn!("ignoring {}: {}", path.display(), e);
                Config::default()
            }),
            Err(e) => {
                log::warn!("failed to read {}: {}", path.display(), e);
                Config::default()
            }
        }
    }
}
