use anyhow::Context;
use clap::Parser;
use snowflake_poster::form::router;

#[derive(Parser)]
#[command(about = "Serve the interactive snowflake poster form")]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:8501")]
    bind: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let listener = tokio::net::TcpListener::bind(&args.bind)
        .await
        .with_context(|| format!("failed to bind {}", args.bind))?;
    log::info!("snowflake form listening on http://{}", args.bind);

    axum::serve(listener, router())
        .await
        .context("form server stopped")?;
    Ok(())
}
