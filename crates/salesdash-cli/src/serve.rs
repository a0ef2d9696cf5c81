//! Serve command implementation.

use std::path::Path;

use salesdash_server::ServerConfig;

use crate::build_controller;
use crate::colors;

/// Start the report server.
pub async fn execute(data: &Path, content: Option<&Path>, host: String, port: u16) -> anyhow::Result<()> {
    if !data.exists() {
        tracing::warn!("Dataset {} does not exist yet, pages will fail until it does", data.display());
    }

    let controller = build_controller(data, content)?;
    let config = ServerConfig { host, port };

    println!("\n{}SalesDash Server{}", colors::BOLD, colors::RESET);
    println!("{}", "─".repeat(50));
    println!("{}  ◆ Dataset:{} {}", colors::CYAN, colors::RESET, data.display());
    println!(
        "{}  ◆ Report:{} http://{}:{}",
        colors::CYAN,
        colors::RESET,
        config.host,
        config.port
    );
    println!("{}", "─".repeat(50));
    println!("{}Press Ctrl+C to stop{}", colors::GREEN, colors::RESET);
    println!();

    salesdash_server::serve(controller, config).await?;

    Ok(())
}
