use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match marketplace::start_server().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
