use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};

use scenesearch::api::{AppState, create_router};
use scenesearch::client::SearchClient;
use scenesearch::config::CONFIG;
use scenesearch::render::{ResultsGrid, Thumbnail, render_results};
use scenesearch::session::SearchSession;

#[derive(Parser, Debug)]
#[command(name = "scenesearch", about = "Search movie scenes by text, object or actor")]
struct Cli {
    /// Backend base URL (overrides SCENESEARCH_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the actors available as a search filter
    Actors,
    /// Search scenes; at least one of --query, --object, --actor is required
    Search {
        #[arg(short, long, default_value = "")]
        query: String,
        #[arg(short, long, default_value = "")]
        object: String,
        #[arg(short, long, default_value = "")]
        actor: String,
        #[arg(long)]
        top_k: Option<u32>,
        /// Save fetched frame images into this directory
        #[arg(long)]
        thumbnails: Option<PathBuf>,
    },
    /// List scenes, optionally only those an actor appears in
    Scenes {
        #[arg(short, long)]
        actor: Option<String>,
    },
    /// Scenes carrying an exact tag
    Tag { tag: String },
    /// Show the stored attributes of one scene
    Scene { scene_id: String },
    /// Check that the backend is up
    Ping,
    /// Serve the search page over HTTP
    Serve {
        #[arg(long)]
        bind: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(true)
        .init();

    let mut config = (*CONFIG).clone();
    if let Some(api_url) = cli.api_url {
        config = config.with_api_url(api_url);
    }
    let client = SearchClient::from_config(&config)
        .with_context(|| format!("invalid backend url {}", config.api_url))?;

    match cli.command {
        Command::Actors => {
            let mut session = SearchSession::new(client, config.thumb_concurrency);
            session.load_actors().await;
            println!("{}", session.status().line());
            for opt in session.actor_options() {
                if opt.value.is_empty() {
                    println!("{}", opt.label);
                } else {
                    println!("{:>6}  {}", opt.value, opt.label);
                }
            }
        }
        Command::Search {
            query,
            object,
            actor,
            top_k,
            thumbnails,
        } => {
            let mut session =
                SearchSession::new(client, config.thumb_concurrency).with_top_k(top_k);
            session.submit(&query, &object, &actor).await;
            println!("{}", session.status().line());
            print!("{}", session.grid().to_text());
            if let Some(dir) = thumbnails {
                let saved = save_thumbnails(session.grid(), &dir).await?;
                println!("saved {saved} thumbnails to {}", dir.display());
            }
        }
        Command::Scenes { actor } => {
            let scenes = client.scenes(actor.as_deref()).await?;
            let grid = render_results(&client, &scenes, config.thumb_concurrency).await;
            print!("{}", grid.to_text());
        }
        Command::Tag { tag } => {
            let scenes = client.search_by_tag(&tag).await?;
            let grid = render_results(&client, &scenes, config.thumb_concurrency).await;
            print!("{}", grid.to_text());
        }
        Command::Scene { scene_id } => {
            let attrs = client.scene_attributes(&scene_id).await?;
            println!("{}", serde_json::to_string_pretty(&attrs)?);
        }
        Command::Ping => {
            let message = client.health().await?;
            println!("{message}");
        }
        Command::Serve { bind } => {
            let bind = bind.unwrap_or_else(|| config.bind.clone());
            let state = Arc::new(AppState {
                client,
                thumb_concurrency: config.thumb_concurrency,
            });
            let app = create_router(state);
            let listener = tokio::net::TcpListener::bind(&bind)
                .await
                .with_context(|| format!("failed to bind {bind}"))?;
            tracing::info!("search page listening on http://{bind}");
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}

async fn save_thumbnails(grid: &ResultsGrid, dir: &Path) -> anyhow::Result<usize> {
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("failed to create {}", dir.display()))?;

    let mut saved = 0;
    for card in grid.cards() {
        if let Thumbnail::Frame { frame, .. } = &card.thumbnail {
            let ext = match frame.content_type.as_str() {
                "image/png" => "png",
                "image/webp" => "webp",
                _ => "jpg",
            };
            let id: String = card
                .scene_id
                .chars()
                .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
                .collect();
            let path = dir.join(format!("scene_{id}.{ext}"));
            tokio::fs::write(&path, &frame.bytes)
                .await
                .with_context(|| format!("failed to write {}", path.display()))?;
            saved += 1;
        }
    }
    Ok(saved)
}
