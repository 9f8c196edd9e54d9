//! Binary entry point: record one utterance, transcribe it, paste it.

use dictate::audio::Recorder;
use dictate::config::AppConfig;
use dictate::status::StdoutStatus;
use dictate::telemetry;
use dictate::voice::{run_dictation, DictationOutcome};
use std::process::ExitCode;

fn main() -> ExitCode {
    let config = match AppConfig::parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("dictate: {err:#}");
            return ExitCode::FAILURE;
        }
    };
    telemetry::init_tracing(&config);

    if config.list_input_devices {
        return match Recorder::list_devices() {
            Ok(names) => {
                for name in names {
                    println!("{name}");
                }
                ExitCode::SUCCESS
            }
            Err(err) => {
                eprintln!("dictate: {err:#}");
                ExitCode::FAILURE
            }
        };
    }

    let mut status = StdoutStatus;
    match run_dictation(&config, &mut status) {
        Ok(DictationOutcome::Pasted { text, .. }) => {
            tracing::debug!(chars = text.len(), "transcript pasted");
            ExitCode::SUCCESS
        }
        Ok(DictationOutcome::NoSpeech { .. }) => {
            eprintln!("dictate: nothing heard");
            ExitCode::FAILURE
        }
        Err(err) => {
            eprintln!("dictate: {err:#}");
            ExitCode::FAILURE
        }
    }
}
