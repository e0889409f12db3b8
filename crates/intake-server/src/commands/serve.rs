use anyhow::{Context as _, Result};
use clap::Args;
use std::net::SocketAddr;
use tokio::net::TcpListener;

use super::Context;
use intake_server::server::{build_app, build_state, serve as run_server};

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Overrides server.bind
    #[arg(long)]
    pub bind: Option<SocketAddr>,
}

pub fn serve(ctx: &Context<'_>, args: ServeArgs) -> Result<()> {
    let store = ctx.open_store()?;
    let state = build_state(ctx.config, store).with_context(|| "prepare server")?;
    let app = build_app(state, &ctx.config.server).with_context(|| "build router")?;
    let bind = args.bind.unwrap_or(ctx.config.server.bind);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .with_context(|| "start async runtime")?;
    runtime.block_on(async move {
        let listener = TcpListener::bind(bind)
            .await
            .with_context(|| format!("bind {bind}"))?;
        run_server(listener, app).await.with_context(|| "serve")
    })
}
