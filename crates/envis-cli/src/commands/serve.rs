//! Server command implementation

use std::path::Path;

use anyhow::Result;

use super::Session;

pub async fn cmd_serve(
    session: Session,
    host: Option<&str>,
    port: Option<u16>,
    static_dir: Option<&Path>,
) -> Result<()> {
    let host = host.unwrap_or(&session.config.server.host).to_string();
    let port = port.unwrap_or(session.config.server.port);

    println!("🚀 Starting Envis web server...");
    println!("   Snapshot: {}", session.state_path.display());
    if session.seeded {
        println!("   (no snapshot yet - serving demo data, changes will create it)");
    }
    println!("   Listening: http://{}:{}", host, port);
    if let Some(dir) = static_dir {
        println!("   Static files: {}", dir.display());
    }
    println!();
    println!("   ⚠️  No authentication - do not expose to network!");
    println!("   Press Ctrl+C to stop");

    let options = envis_server::ServerOptions {
        state_path: Some(session.state_path),
        today: session.today_pinned.then_some(session.today),
        static_dir: static_dir.map(Path::to_path_buf),
    };

    envis_server::serve(session.household, session.config, options, &host, port).await?;

    Ok(())
}
