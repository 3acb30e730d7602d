#[tokio::main]
async fn main() {
    if let Err(e) = checkin_client::run_with_config().await {
        tracing::error!(error = %e, "check-in client stopped.");
        std::process::exit(1);
    }
}
