/*
 * Responsibility
 * - Start the tokio runtime
 * - Call app::run() and nothing else
 */
use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    auth_gateway::app::run().await
}
