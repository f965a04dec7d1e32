use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    socioscan_lib::run_cli().await
}
