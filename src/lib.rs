pub mod audio;
pub mod engine;
pub mod hub;
pub mod paths;
pub mod textnorm;

use clap::Parser;
use engine::EngineKind;
use log::info;
use std::path::PathBuf;

/// Transcribe an audio file with a pluggable speech-recognition engine.
#[derive(Parser, Debug)]
#[command(name = "uniasr", version, about)]
pub struct Cli {
    /// Path to the audio file to transcribe (WAV).
    pub wav_path: PathBuf,

    /// Recognition engine to use.
    #[arg(long, value_enum, default_value_t = EngineKind::Funasr)]
    pub engine: EngineKind,
}

fn init_logger() -> Result<PathBuf, fern::InitError> {
    let log_file = paths::log_file_path().map_err(std::io::Error::other)?;

    let format = |out: fern::FormatCallback<'_>,
                  message: &std::fmt::Arguments<'_>,
                  record: &log::Record| {
        out.finish(format_args!(
            "[{}][{}][{}][{:?}] {}",
            chrono::Local::now().format("%Y-%m-%d"),
            chrono::Local::now().format("%H:%M:%S"),
            record.target(),
            record.level(),
            message
        ))
    };

    // The transcript itself goes to stdout, so logs stay on stderr.
    fern::Dispatch::new()
        .format(format)
        .level(log::LevelFilter::Info)
        .level_for("uniasr", log::LevelFilter::Debug)
        .chain(std::io::stderr())
        .chain(fern::log_file(&log_file)?)
        .apply()?;

    Ok(log_file)
}

/// Parse the command line, run one transcription, print the text.
pub fn run() -> Result<(), String> {
    let _log_path = init_logger().ok();
    let cli = Cli::parse();
    run_with(cli)
}

/// Dispatch a parsed invocation: validate the path, construct the selected
/// engine, transcribe, and write the transcript to stdout.
pub fn run_with(cli: Cli) -> Result<(), String> {
    // Checked before any model is loaded.
    if !cli.wav_path.is_file() {
        return Err(format!("Audio file not found: {}", cli.wav_path.display()));
    }

    let models_dir = paths::models_dir()?;
    info!("engine={} file={}", cli.engine, cli.wav_path.display());

    let mut engine = engine::create_engine(cli.engine, &models_dir)?;
    let text = engine.transcribe(&cli.wav_path)?;
    println!("{}", text);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_engine_is_funasr() {
        let cli = Cli::try_parse_from(["uniasr", "audio.wav"]).unwrap();
        assert_eq!(cli.engine, EngineKind::Funasr);
        assert_eq!(cli.wav_path, PathBuf::from("audio.wav"));
    }

    #[test]
    fn engine_flag_accepts_all_literals() {
        for name in ["funasr", "sherpa-onnx", "wenet", "whisperx"] {
            let cli = Cli::try_parse_from(["uniasr", "audio.wav", "--engine", name]).unwrap();
            assert_eq!(cli.engine.as_str(), name);
        }
    }

    #[test]
    fn unknown_engine_literal_fails_to_parse() {
        assert!(Cli::try_parse_from(["uniasr", "audio.wav", "--engine", "vosk"]).is_err());
    }

    #[test]
    fn missing_path_fails_to_parse() {
        assert!(Cli::try_parse_from(["uniasr"]).is_err());
    }

    #[test]
    fn nonexistent_path_fails_before_engine_construction() {
        let cli = Cli::try_parse_from(["uniasr", "no/such/file.wav"]).unwrap();
        let err = run_with(cli).unwrap_err();
        assert!(err.contains("Audio file not found"));
    }
}
