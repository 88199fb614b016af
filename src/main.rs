use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use estuary::app::AppContext;
use estuary::cli::{commands, Cli, Commands};
use estuary::config::Config;
use estuary::source::PageScope;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;
    let ctx = AppContext::new(config, None)?;

    match cli.command {
        Commands::Feeds => {
            commands::list_feeds(&ctx).await?;
        }
        Commands::Articles { feed, pages } => {
            let scope = match feed {
                Some(id) => PageScope::Feed(id),
                None => PageScope::Home,
            };
            commands::list_articles(&ctx, scope, pages).await?;
        }
        Commands::History { pages } => {
            commands::list_articles(&ctx, PageScope::History, pages).await?;
        }
        Commands::Saved { pages } => {
            commands::list_articles(&ctx, PageScope::Saved, pages).await?;
        }
        Commands::Read { article_id } => {
            commands::mark_read(&ctx, &article_id).await?;
        }
        Commands::Save { article_id, remove } => {
            commands::set_saved(&ctx, &article_id, !remove).await?;
        }
    }

    Ok(())
}
