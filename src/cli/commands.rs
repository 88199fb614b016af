use chrono::Utc;

use crate::app::{AppContext, Result};
use crate::clock;
use crate::domain::Article;
use crate::pager::LoadOutcome;
use crate::source::{ArticleSource, PageScope, pager_for};

pub async fn list_feeds(ctx: &AppContext) -> Result<()> {
    let entries = ctx.overview.load(Utc::now()).await?;

    if entries.is_empty() {
        println!("No feeds");
        return Ok(());
    }

    for entry in entries {
        let marker = if entry.has_unread { "●" } else { " " };
        let latest = if entry.latest == clock::epoch() {
            "          ".to_string()
        } else {
            entry.latest.format("%Y-%m-%d").to_string()
        };
        println!(
            "{} {} {}\n    {}",
            marker,
            latest,
            entry.feed.display_name(),
            entry.feed.url
        );
    }

    Ok(())
}

pub async fn list_articles(ctx: &AppContext, scope: PageScope, pages: usize) -> Result<()> {
    if let PageScope::Feed(id) = &scope {
        let feed = ctx.source.fetch_feed(id).await?;
        println!("{}\n", feed.display_name());
    }

    let pager = pager_for(ctx.source.clone(), scope.clone(), &ctx.config.pager);

    if pager.load_initial().await == LoadOutcome::Failed {
        eprintln!("Error loading articles");
        return Ok(());
    }

    for _ in 1..pages {
        match pager.load_more().await {
            LoadOutcome::EndOfList => break,
            LoadOutcome::Failed => {
                eprintln!("Error loading more articles");
                break;
            }
            _ => {}
        }
    }

    let items = pager.items();
    if items.is_empty() {
        println!("No articles");
        return Ok(());
    }

    for article in &items {
        print_article(article);
    }

    // Viewing a feed counts as catching up on it.
    if let PageScope::Feed(id) = &scope {
        ctx.overview.mark_feed_read(id, Utc::now())?;
    }

    Ok(())
}

pub async fn mark_read(ctx: &AppContext, article_id: &str) -> Result<()> {
    ctx.source.mark_read(article_id).await?;
    println!("Marked as read: {}", article_id);
    Ok(())
}

pub async fn set_saved(ctx: &AppContext, article_id: &str, saved: bool) -> Result<()> {
    ctx.source.set_saved(article_id, saved).await?;
    if saved {
        println!("Saved: {}", article_id);
    } else {
        println!("Removed from saved: {}", article_id);
    }
    Ok(())
}

fn print_article(article: &Article) {
    let read_marker = if article.is_read() { " " } else { "●" };
    let saved_marker = if article.saved { "*" } else { " " };
    let date = article
        .published_at
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "          ".to_string());

    println!(
        "{}{} {} {}",
        read_marker,
        saved_marker,
        date,
        article.display_title()
    );
}
