//! Pluggable speech-recognition engines.

mod funasr;
mod sherpa_onnx;
mod wenet;
mod whisperx;

pub use funasr::FunAsrEngine;
pub use sherpa_onnx::SherpaOnnxEngine;
pub use wenet::WeNetEngine;
pub use whisperx::{Device, WhisperOptions, WhisperXEngine};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Trait for recognition engines.
///
/// Implementations load their model once at construction and hold it for
/// their lifetime. Only the transcript text is surfaced; timestamps and
/// confidence scores from the underlying libraries are dropped.
pub trait SpeechEngine {
    fn id(&self) -> &'static str;
    fn name(&self) -> &'static str;
    fn transcribe(&mut self, audio_path: &Path) -> Result<String, String>;
}

/// The closed set of supported engines.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EngineKind {
    Funasr,
    SherpaOnnx,
    Wenet,
    Whisperx,
}

impl EngineKind {
    /// All supported engine kinds.
    pub fn all() -> &'static [EngineKind] {
        &[
            EngineKind::Funasr,
            EngineKind::SherpaOnnx,
            EngineKind::Wenet,
            EngineKind::Whisperx,
        ]
    }

    /// CLI identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineKind::Funasr => "funasr",
            EngineKind::SherpaOnnx => "sherpa-onnx",
            EngineKind::Wenet => "wenet",
            EngineKind::Whisperx => "whisperx",
        }
    }

    /// Parse a CLI identifier.
    pub fn from_name(name: &str) -> Option<EngineKind> {
        EngineKind::all().iter().copied().find(|k| k.as_str() == name)
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

type EngineConstructor = fn(&Path) -> Result<Box<dyn SpeechEngine>, String>;

/// Kind-to-constructor table. Adding an engine means adding a row here,
/// not extending a conditional chain.
pub const ENGINE_REGISTRY: &[(EngineKind, EngineConstructor)] = &[
    (EngineKind::Funasr, |models_dir| {
        Ok(Box::new(FunAsrEngine::new(models_dir)?))
    }),
    (EngineKind::SherpaOnnx, |models_dir| {
        Ok(Box::new(SherpaOnnxEngine::new(models_dir)?))
    }),
    (EngineKind::Wenet, |_models_dir| {
        Ok(Box::new(WeNetEngine::new()?))
    }),
    (EngineKind::Whisperx, |models_dir| {
        Ok(Box::new(WhisperXEngine::new(
            models_dir,
            WhisperOptions::default(),
        )?))
    }),
];

/// Construct the engine for `kind`. May download model files into
/// `models_dir` and fail if the model cannot be obtained.
pub fn create_engine(kind: EngineKind, models_dir: &Path) -> Result<Box<dyn SpeechEngine>, String> {
    let (_, construct) = ENGINE_REGISTRY
        .iter()
        .find(|(k, _)| *k == kind)
        .ok_or_else(|| format!("No engine registered for '{}'", kind))?;
    construct(models_dir)
}
