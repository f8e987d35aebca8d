//! WeNet sidecar backend.
//!
//! There is no Rust binding for the WeNet runtime, so this engine shells
//! out to the `wenet` command-line tool and reads the transcript from its
//! stdout.

use super::SpeechEngine;
use std::path::Path;
use std::process::Command;

#[derive(Debug)]
pub struct WeNetEngine {
    binary_path: String,
    language: String,
}

impl WeNetEngine {
    /// Use the `wenet` command from PATH with the chinese model.
    pub fn new() -> Result<Self, String> {
        Self::with_binary("wenet")
    }

    /// Use a specific wenet binary (e.g. an absolute path).
    pub fn with_binary(binary: impl Into<String>) -> Result<Self, String> {
        let binary_path = binary.into();
        // Probe the runtime up front so a missing install fails at
        // construction rather than mid-transcription.
        let probe = Command::new(&binary_path)
            .arg("--help")
            .output()
            .map_err(|e| format!("Failed to run {}: {}", binary_path, e))?;
        if !probe.status.success() {
            let stderr = String::from_utf8_lossy(&probe.stderr);
            return Err(format!("{} is not usable: {}", binary_path, stderr.trim()));
        }
        Ok(Self {
            binary_path,
            language: "chinese".to_string(),
        })
    }
}

impl SpeechEngine for WeNetEngine {
    fn id(&self) -> &'static str {
        "wenet"
    }

    fn name(&self) -> &'static str {
        "WeNet (sidecar)"
    }

    fn transcribe(&mut self, audio_path: &Path) -> Result<String, String> {
        let output = Command::new(&self.binary_path)
            .arg("--language")
            .arg(&self.language)
            .arg(audio_path)
            .output()
            .map_err(|e| format!("Failed to run {}: {}", self.binary_path, e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(format!("wenet failed: {}", stderr.trim()));
        }

        let text = String::from_utf8_lossy(&output.stdout);
        Ok(text.trim().to_string())
    }
}
