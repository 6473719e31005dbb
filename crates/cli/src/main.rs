use std::process::ExitCode;

fn main() -> ExitCode {
    caddie_cli::run()
}
