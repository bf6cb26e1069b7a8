use std::process::ExitCode;

fn main() -> ExitCode {
    match calgrid::app::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("ERROR: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}
