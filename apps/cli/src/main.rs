use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{load_character_page, load_settings, CatalogClient, CatalogSource};
use shared::{
    domain::{EpisodeId, PageRef},
    error::PageError,
    paging::{pagination_items, validate_page, PageItem},
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Query the episode catalog from the terminal")]
struct Args {
    /// Overrides the configured catalog API root.
    #[arg(long, global = true)]
    base_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List one page of episodes.
    Episodes {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// List one page (20 per page) of the characters in an episode.
    Characters {
        #[arg(long)]
        episode: i64,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
}

fn render_controls(items: &[PageItem], prev_enabled: bool, next_enabled: bool) -> String {
    let mut parts = vec![if prev_enabled { "<prev" } else { "(prev)" }.to_string()];
    parts.extend(items.iter().map(|item| match item {
        PageItem::Page {
            number,
            active: true,
        } => format!("[{number}]"),
        PageItem::Page { number, .. } => number.to_string(),
        PageItem::Ellipsis => "...".to_string(),
    }));
    parts.push(if next_enabled { "next>" } else { "(next)" }.to_string());
    parts.join(" ")
}

/// An empty result set still has a first page to show.
fn checked_page(page: u32, total_pages: u32) -> Result<u32, PageError> {
    validate_page(page, total_pages.max(1))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();
    let args = Args::parse();

    let mut config = load_settings()?;
    if let Some(base_url) = args.base_url {
        config.base_url = base_url;
    }
    let client = CatalogClient::new(&config).context("invalid catalog configuration")?;
    tracing::debug!(base_url = client.base_url(), "catalog client ready");

    match args.command {
        Command::Episodes { page } => {
            let page_ref = (page > 1).then_some(PageRef::Number(page));
            let episodes = client
                .fetch_episodes(page_ref.as_ref())
                .await
                .with_context(|| format!("failed to load episode page {page}"))?;
            checked_page(page, episodes.page_info.total_pages)?;
            for episode in &episodes.results {
                println!("{:>4}  {}", episode.id, episode.display_label());
            }
            let info = &episodes.page_info;
            let items: Vec<PageItem> = (1..=info.total_pages)
                .map(|number| PageItem::Page {
                    number,
                    active: number == page,
                })
                .collect();
            println!(
                "\n{} episodes, page {page} of {}",
                info.total_count, info.total_pages
            );
            println!("{}", render_controls(&items, info.has_prev(), info.has_next()));
        }
        Command::Characters { episode, page } => {
            let characters = load_character_page(&client, EpisodeId(episode), page)
                .await
                .with_context(|| format!("failed to load characters of episode {episode}"))?;
            checked_page(page, characters.page_info.total_pages)?;
            for character in &characters.characters {
                println!(
                    "{:>4}  {:<32} {}",
                    character.id, character.name, character.image_url
                );
            }
            let info = &characters.page_info;
            println!(
                "\n{} characters, page {} of {}",
                characters.total_count, characters.page, info.total_pages
            );
            println!(
                "{}",
                render_controls(
                    &pagination_items(characters.page, info.total_pages),
                    info.has_prev(),
                    info.has_next(),
                )
            );
        }
    }

    Ok(())
}
