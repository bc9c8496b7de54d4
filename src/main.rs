use std::env;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    let code = stratadvisor::cli::run_with_args(&args);
    ExitCode::from(code as u8)
}
