#[tokio::main]
async fn main() {
  if let Err(e) = lift_log::run().await {
    tracing::error!("lift-log failed: {}", e);
    eprintln!("Error: {}", e);
    std::process::exit(1);
  }
}
