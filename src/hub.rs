//! Download engine model snapshots from Hugging Face.

use crate::engine::EngineKind;
use log::info;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Where one engine's model files come from.
pub struct ModelSource {
    pub engine: EngineKind,
    pub hf_repo: &'static str,
    pub files: &'static [&'static str],
    pub local_dir: &'static str,
}

/// Model source table. The wenet engine has no entry: it delegates to an
/// externally installed runtime that manages its own models.
pub const MODEL_SOURCES: &[ModelSource] = &[
    ModelSource {
        engine: EngineKind::Funasr,
        hf_repo: "csukuangfj/sherpa-onnx-paraformer-zh-2024-03-09",
        files: &["model.int8.onnx", "tokens.txt"],
        local_dir: "paraformer-zh",
    },
    ModelSource {
        engine: EngineKind::SherpaOnnx,
        hf_repo: "csukuangfj/sherpa-onnx-zipformer-small-en-2023-06-26",
        files: &[
            "encoder-epoch-99-avg-1.onnx",
            "decoder-epoch-99-avg-1.onnx",
            "joiner-epoch-99-avg-1.onnx",
            "tokens.txt",
        ],
        local_dir: "zipformer-small-en",
    },
    ModelSource {
        engine: EngineKind::Whisperx,
        hf_repo: "ggerganov/whisper.cpp",
        files: &["ggml-medium.bin"],
        local_dir: "whisper-medium",
    },
];

const SNAPSHOT_FILE: &str = "snapshot.json";

/// Record written next to a completed snapshot.
#[derive(Debug, Serialize, Deserialize)]
pub struct SnapshotRecord {
    pub engine: EngineKind,
    pub hf_repo: String,
    pub files: Vec<String>,
    pub fetched_at: String,
}

/// Look up the model source for an engine, if it has downloadable models.
pub fn source_for(engine: EngineKind) -> Option<&'static ModelSource> {
    MODEL_SOURCES.iter().find(|s| s.engine == engine)
}

/// Ensure the model files for `engine` exist under `models_dir`, downloading
/// any that are missing. Returns the engine's local model directory.
pub fn ensure_engine_model(models_dir: &Path, engine: EngineKind) -> Result<PathBuf, String> {
    let source = source_for(engine)
        .ok_or_else(|| format!("Engine '{}' has no downloadable model", engine.as_str()))?;
    let model_dir = models_dir.join(source.local_dir);
    std::fs::create_dir_all(&model_dir).map_err(|e| e.to_string())?;

    for file in source.files {
        let target = model_dir.join(file);
        if target.exists() {
            continue;
        }
        download_file(source.hf_repo, file, &target)?;
    }

    // The file set is complete at this point; the record may still be
    // missing if earlier runs were interrupted partway through.
    if !model_dir.join(SNAPSHOT_FILE).exists() {
        write_snapshot_record(&model_dir, source)?;
    }
    Ok(model_dir)
}

/// List engines whose model files are all present under `models_dir`.
pub fn list_installed_models(models_dir: &Path) -> Vec<EngineKind> {
    MODEL_SOURCES
        .iter()
        .filter(|s| {
            let dir = models_dir.join(s.local_dir);
            s.files.iter().all(|f| dir.join(f).exists())
        })
        .map(|s| s.engine)
        .collect()
}

fn download_file(hf_repo: &str, file: &str, target: &Path) -> Result<(), String> {
    let url = format!("https://huggingface.co/{}/resolve/main/{}", hf_repo, file);
    info!("Downloading {} -> {}", url, target.display());

    let mut response = reqwest::blocking::get(&url).map_err(|e| e.to_string())?;
    if !response.status().is_success() {
        return Err(format!("Download failed for {}: {}", url, response.status()));
    }
    if let Some(total) = response.content_length() {
        info!("{}: {} bytes", file, total);
    }

    // Stream to a .part file so an interrupted download never looks complete.
    let partial = target.with_extension("part");
    let mut out = std::fs::File::create(&partial).map_err(|e| e.to_string())?;
    response.copy_to(&mut out).map_err(|e| e.to_string())?;
    std::fs::rename(&partial, target).map_err(|e| e.to_string())?;

    info!("Downloaded {}", target.display());
    Ok(())
}

fn write_snapshot_record(model_dir: &Path, source: &ModelSource) -> Result<(), String> {
    let record = SnapshotRecord {
        engine: source.engine,
        hf_repo: source.hf_repo.to_string(),
        files: source.files.iter().map(|f| f.to_string()).collect(),
        fetched_at: chrono::Local::now().to_rfc3339(),
    };
    let json = serde_json::to_string_pretty(&record).map_err(|e| e.to_string())?;
    std::fs::write(model_dir.join(SNAPSHOT_FILE), json).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sources_cover_all_hub_backed_engines() {
        assert!(source_for(EngineKind::Funasr).is_some());
        assert!(source_for(EngineKind::SherpaOnnx).is_some());
        assert!(source_for(EngineKind::Whisperx).is_some());
        // wenet runs through an external runtime, so it has no hub entry
        assert!(source_for(EngineKind::Wenet).is_none());
    }

    #[test]
    fn ensure_model_rejects_engine_without_source() {
        let dir = tempfile::tempdir().unwrap();
        let err = ensure_engine_model(dir.path(), EngineKind::Wenet).unwrap_err();
        assert!(err.contains("wenet"));
    }

    #[test]
    fn complete_file_set_gets_a_record_without_refetching() {
        let dir = tempfile::tempdir().unwrap();
        let paraformer = dir.path().join("paraformer-zh");
        std::fs::create_dir_all(&paraformer).unwrap();
        std::fs::write(paraformer.join("model.int8.onnx"), b"stub").unwrap();
        std::fs::write(paraformer.join("tokens.txt"), b"stub").unwrap();

        // All files present, so no network access happens; the record is
        // still written for the snapshot completed by earlier runs.
        let model_dir = ensure_engine_model(dir.path(), EngineKind::Funasr).unwrap();
        assert_eq!(model_dir, paraformer);

        let json = std::fs::read_to_string(model_dir.join(SNAPSHOT_FILE)).unwrap();
        let record: SnapshotRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record.engine, EngineKind::Funasr);
        assert!(json.contains("\"funasr\""));
    }

    #[test]
    fn list_installed_models_requires_complete_snapshots() {
        let dir = tempfile::tempdir().unwrap();
        assert!(list_installed_models(dir.path()).is_empty());

        // Partial snapshot does not count.
        let paraformer = dir.path().join("paraformer-zh");
        std::fs::create_dir_all(&paraformer).unwrap();
        std::fs::write(paraformer.join("model.int8.onnx"), b"stub").unwrap();
        assert!(list_installed_models(dir.path()).is_empty());

        std::fs::write(paraformer.join("tokens.txt"), b"stub").unwrap();
        assert_eq!(list_installed_models(dir.path()), vec![EngineKind::Funasr]);
    }
}
