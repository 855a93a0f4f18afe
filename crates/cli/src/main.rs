use std::process::ExitCode;

fn main() -> ExitCode {
    ringforge_cli::run()
}
