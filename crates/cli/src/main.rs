use std::process::ExitCode;

fn main() -> ExitCode {
    procsight_cli::run()
}
