//! Command-line interface for the cheatsheet.
//!
//! Provides commands for rendering the card page, inspecting the expanded
//! view, and following cross-references.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info};

use crate::app::Cheatsheet;
use crate::config::{self, ResolvedConfig};
use crate::core::{resolve, Reference, Resolution};
use crate::domain::StoryKey;
use crate::loader::{Source, LOAD_FAILURE_MESSAGE};
use crate::view::{render_error_page, render_page, LogSurface, PageOptions};

/// cheatsheet - Tip cards with cross-referenced stories
#[derive(Parser, Debug)]
#[command(name = "cheatsheet")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render the tip cards as an HTML page
    Render {
        /// Tip document path or URL (overrides config)
        #[arg(short, long)]
        source: Option<String>,

        /// Output file (prints to stdout if not provided)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the expanded tips as JSON
    Expand {
        /// Tip document path or URL (overrides config)
        #[arg(short, long)]
        source: Option<String>,

        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Show one tip with its stories
    Show {
        /// Tip number
        tip: u32,

        /// Tip document path or URL (overrides config)
        #[arg(short, long)]
        source: Option<String>,
    },

    /// Resolve a tip reference to a story instance
    Resolve {
        /// Tip the reference points at
        target: u32,

        /// Tip whose card holds the reference
        #[arg(long = "from")]
        origin: u32,

        /// Key of the story the reference belongs to
        #[arg(long)]
        story: Option<String>,

        /// Tip document path or URL (overrides config)
        #[arg(short, long)]
        source: Option<String>,
    },

    /// Follow a tip reference, logging scroll and highlight effects
    Navigate {
        /// Tip the reference points at
        target: u32,

        /// Tip whose card holds the reference
        #[arg(long = "from")]
        origin: u32,

        /// Key of the story the reference belongs to
        #[arg(long)]
        story: Option<String>,

        /// Tip document path or URL (overrides config)
        #[arg(short, long)]
        source: Option<String>,
    },

    /// Show resolved configuration (debug)
    Config,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Render { source, output } => render(source, output).await,
            Commands::Expand { source, pretty } => print_expanded(source, pretty).await,
            Commands::Show { tip, source } => show_tip(tip, source).await,
            Commands::Resolve {
                target,
                origin,
                story,
                source,
            } => resolve_reference(reference(target, origin, story), source).await,
            Commands::Navigate {
                target,
                origin,
                story,
                source,
            } => navigate(reference(target, origin, story), source).await,
            Commands::Config => show_config(),
        }
    }
}

fn reference(target: u32, origin: u32, story: Option<String>) -> Reference {
    let reference = Reference::new(target, origin);
    match story {
        Some(key) => reference.with_story(StoryKey::from_string(key)),
        None => reference,
    }
}

fn page_options(cfg: &ResolvedConfig) -> PageOptions {
    let defaults = PageOptions::default();
    PageOptions {
        title: cfg.page_title.clone().unwrap_or(defaults.title),
        contribute_href: cfg.contribute_href.clone().unwrap_or(defaults.contribute_href),
        inline_styles: defaults.inline_styles,
    }
}

/// Load and expand the tip document from the override or configured source
async fn load(cfg: &ResolvedConfig, source: Option<String>) -> Result<Cheatsheet> {
    let source = source
        .map(|s| Source::parse(&s))
        .unwrap_or_else(|| cfg.source.clone());

    match Cheatsheet::load(source, &cfg.loader).await {
        Ok(sheet) => Ok(sheet),
        Err(e) => {
            error!(error = %e, "Failed to load tips");
            anyhow::bail!(LOAD_FAILURE_MESSAGE)
        }
    }
}

/// Render the page; a load failure renders the error page instead
async fn render(source: Option<String>, output: Option<PathBuf>) -> Result<()> {
    let cfg = config::config()?;
    let options = page_options(cfg);
    let output = output.or_else(|| cfg.output.clone());

    let (html, result) = match load(cfg, source).await {
        Ok(sheet) => (render_page(sheet.tips(), &options), Ok(())),
        Err(e) => (render_error_page(LOAD_FAILURE_MESSAGE, &options), Err(e)),
    };

    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent)
                    .await
                    .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
            }
            tokio::fs::write(&path, html)
                .await
                .with_context(|| format!("Failed to write page: {}", path.display()))?;
            info!(path = %path.display(), "Wrote page");
        }
        None => print!("{}", html),
    }

    result
}

/// Print the expanded view as JSON
async fn print_expanded(source: Option<String>, pretty: bool) -> Result<()> {
    let cfg = config::config()?;
    let sheet = load(cfg, source).await?;

    let json = if pretty {
        serde_json::to_string_pretty(sheet.tips())?
    } else {
        serde_json::to_string(sheet.tips())?
    };
    println!("{}", json);

    let stats = sheet.stats();
    eprintln!(
        "[{} tips, {} stories, {} home copies, {} cross-references, {} unknown references dropped]",
        stats.tips, stats.stories, stats.home_copies, stats.xref_copies, stats.dropped_refs
    );

    Ok(())
}

/// Show one tip with its stories
async fn show_tip(number: u32, source: Option<String>) -> Result<()> {
    let cfg = config::config()?;
    let sheet = load(cfg, source).await?;

    let tip = sheet
        .tip(number)
        .ok_or_else(|| anyhow::anyhow!("Tip not found: #{}", number))?;

    println!("#{} {}", tip.number, tip.title);
    println!("{}", tip.description);
    println!();

    if !tip.has_stories() {
        println!("No stories yet");
        return Ok(());
    }

    println!("{}:", tip.expand_label());
    for (index, story) in tip.stories.iter().enumerate() {
        let placement = if story.is_home_tip() {
            "home".to_string()
        } else {
            format!("from Tip #{}", story.source_tip)
        };
        let related: Vec<String> = story
            .related_tips
            .iter()
            .map(|n| format!("#{}", n))
            .collect();

        println!();
        println!("  [{}] {} ({})", index, story.key, placement);
        println!("  {}", story.content);
        println!("  Related: {}", related.join(", "));
    }

    Ok(())
}

/// Resolve a reference and print the story instance it lands on
async fn resolve_reference(reference: Reference, source: Option<String>) -> Result<()> {
    let cfg = config::config()?;
    let sheet = load(cfg, source).await?;

    let resolution = resolve(sheet.tips(), &reference);
    println!("{}", serde_json::to_string(&resolution)?);

    match resolution {
        Resolution::Story { tip, index } => {
            if let Some(story) = sheet.tip(tip).and_then(|t| t.stories.get(index)) {
                eprintln!("Tip #{} story {}: {}", tip, index, story.content);
            }
        }
        Resolution::CardOnly { tip } => eprintln!("Tip #{} (no matching story)", tip),
        Resolution::TipNotFound { tip } => eprintln!("Tip #{} does not exist", tip),
    }

    Ok(())
}

/// Run the navigation sequence against a logging surface
async fn navigate(reference: Reference, source: Option<String>) -> Result<()> {
    let cfg = config::config()?;
    let sheet = load(cfg, source).await?;

    let navigator = sheet.navigator(Arc::new(LogSurface), cfg.navigation.clone());
    let outcome = navigator.navigate(reference).await;
    println!("{}", serde_json::to_string(&outcome)?);

    Ok(())
}

/// Show the resolved configuration (for debugging)
fn show_config() -> Result<()> {
    let cfg = config::config()?;

    println!("Config file: {}", cfg.config_file.as_ref().map(|p| p.display().to_string()).unwrap_or_else(|| "(none - using defaults)".to_string()));
    println!();
    println!("Data:");
    println!("  Source:  {}", cfg.source);
    println!("  Output:  {}", cfg.output.as_ref().map(|p| p.display().to_string()).unwrap_or_else(|| "(stdout)".to_string()));
    println!("  HTTP timeout: {}s", cfg.loader.http_timeout_seconds);
    println!("  Max size:     {} bytes", cfg.loader.max_bytes);
    println!();
    println!("Page:");
    let options = page_options(cfg);
    println!("  Title:      {}", options.title);
    println!("  Contribute: {}", options.contribute_href);
    println!();
    println!("Navigation:");
    println!("  Scroll delay: {}ms", cfg.navigation.scroll_delay_ms);
    println!("  Expand delay: {}ms", cfg.navigation.expand_delay_ms);
    println!("  Highlight:    {}ms", cfg.navigation.highlight_ms);
    println!("  Wait:         {} x {}ms", cfg.navigation.wait.max_attempts, cfg.navigation.wait.delay_ms);

    Ok(())
}
