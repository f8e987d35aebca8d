use std::process::ExitCode;

fn main() -> ExitCode {
    match uniasr::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
