//! Common utility functions shared across CLI commands.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use colored::{Color, Colorize};
use imagematch_core::{
    ClientConfig, FileStore, HandoffStore, ImageMatchError, RedirectReason, ResultsPage,
    ResultsView, Theme, ThemeContext, ViewState,
};
use tracing::{debug, info};

use crate::{GlobalArgs, ViewArgs};

/// Handoff store the CLI uses between invocations.
pub type CliStore = HandoffStore<FileStore, FileStore>;

/// Session directory used when neither flag nor env var sets one.
pub fn default_session_dir() -> PathBuf {
    std::env::temp_dir().join("imagematch-session")
}

/// Build the file-backed handoff store.
///
/// The image slot lives under `local/`, the response slot under `tab/`.
pub fn session_store(global: &GlobalArgs) -> CliStore {
    let dir = global
        .session_dir
        .clone()
        .unwrap_or_else(default_session_dir);
    debug!(dir = %dir.display(), "Using session directory");
    HandoffStore::new(FileStore::new(dir.join("local")), FileStore::new(dir.join("tab")))
}

pub fn client_config(global: &GlobalArgs) -> Result<ClientConfig> {
    match &global.service_url {
        Some(url) => Ok(ClientConfig::with_service_url(url)?),
        None => Ok(ClientConfig::from_env()),
    }
}

/// Mount the results view from the stored session, apply the flags and print it.
pub fn show_results(global: &GlobalArgs, args: &ViewArgs, store: &CliStore) -> Result<()> {
    let theme = ThemeContext::new(global.theme);
    let mut view = ResultsView::open(store);

    if let ViewState::Redirected(reason) = view.state() {
        let hint = match reason {
            RedirectReason::MalformedSession(detail) => {
                format!("Stored search session is unreadable ({detail}). Start a new search")
            }
            _ => "No active search session. Run `imagematch search <FILE>` first".to_string(),
        };
        return Err(anyhow::Error::new(ImageMatchError::NoActiveSession).context(hint));
    }

    view.set_category(args.category.as_str());
    view.set_sort(args.sort);

    if let Some(dir) = &args.save_images {
        let saved = save_images(&view, dir)?;
        info!(count = saved, dir = %dir.display(), "Saved matched images");
    }

    if global.quiet {
        return Ok(());
    }
    if let Some(page) = view.render(&theme) {
        if args.json {
            let json = serde_json::to_string_pretty(&page)
                .context("Failed to serialize results page")?;
            println!("{json}");
        } else {
            print_page(&page);
        }
    }
    Ok(())
}

/// Write every inline match image in display order. Returns how many were written.
pub fn save_images(view: &ResultsView, dir: &Path) -> Result<usize> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to write images: cannot create {}", dir.display()))?;

    let mut saved = 0;
    for (index, result) in view.display().iter().enumerate() {
        let Some(uri) = result.data_uri() else {
            debug!(id = result.id, "Match has no inline image");
            continue;
        };
        let image = uri.decode()?;
        let path = dir.join(format!("similar-{}.{}", index + 1, image.extension()));
        std::fs::write(&path, &image.bytes)
            .with_context(|| format!("Failed to write image: {}", path.display()))?;
        saved += 1;
    }
    Ok(saved)
}

struct Colors {
    heading: Color,
    accent: Color,
    muted: Color,
}

fn colors(theme: Theme) -> Colors {
    match theme {
        Theme::Dark => Colors {
            heading: Color::White,
            accent: Color::BrightBlue,
            muted: Color::BrightBlack,
        },
        Theme::Light => Colors {
            heading: Color::Black,
            accent: Color::Blue,
            muted: Color::BrightBlack,
        },
    }
}

pub fn print_page(page: &ResultsPage) {
    let c = colors(page.theme);

    println!();
    println!(
        "   {} {} ({})",
        "Your image:".color(c.muted),
        page.query_mime_type,
        format_size(page.query_bytes as u64)
    );
    println!("{}", page.summary.color(c.heading).bold());
    println!(
        "   {} {}   {} {}",
        "Filter:".color(c.muted),
        page.category,
        "Sort:".color(c.muted),
        page.sort
    );
    println!();

    for card in &page.cards {
        println!(
            "  {}  {}",
            card.title.color(c.heading).bold(),
            format!("[{}]", card.badge).color(c.accent)
        );
        let category = if card.category.is_empty() {
            "-"
        } else {
            card.category.as_str()
        };
        println!("     {} {}", "Category:".color(c.muted), category);
        if !card.tags.is_empty() {
            println!("     {} {}", "Tags:".color(c.muted), card.tags.join(", "));
        }
    }
}

/// Human-readable byte size, e.g. `2.0 MB`.
pub fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    let b = bytes as f64;
    if b >= MB {
        format!("{:.1} MB", b / MB)
    } else if b >= KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{bytes} B")
    }
}
