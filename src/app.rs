//! The cheatsheet session.
//!
//! Owns the raw document and the expanded view built from it. There is no
//! shared instance: callers hold a `Cheatsheet` and hand out a `Board` or
//! `Navigator` built from it.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{info, instrument};

use crate::core::{expand_with_stats, ExpansionStats};
use crate::domain::{RawTip, Tip};
use crate::loader::{self, LoadError, LoaderSettings, Source};
use crate::view::{Board, NavigationSettings, Navigator, Surface};

/// Loaded tips plus their expanded view
#[derive(Debug, Clone)]
pub struct Cheatsheet {
    source: Source,
    raw: Vec<RawTip>,
    tips: Vec<Tip>,
    stats: ExpansionStats,
    loaded_at: DateTime<Utc>,
}

impl Cheatsheet {
    /// Load the document and build the expanded view
    #[instrument(skip_all, fields(source = %source))]
    pub async fn load(source: Source, settings: &LoaderSettings) -> Result<Self, LoadError> {
        let loaded = loader::load(&source, settings).await?;
        let mut sheet = Self::new(loaded.source, loaded.tips);
        sheet.loaded_at = loaded.loaded_at;
        Ok(sheet)
    }

    /// Build from an already parsed document
    pub fn new(source: Source, raw: Vec<RawTip>) -> Self {
        let (tips, stats) = expand_with_stats(&raw);
        info!(
            tips = stats.tips,
            stories = stats.stories,
            xref_copies = stats.xref_copies,
            "Expanded cheatsheet"
        );

        Self {
            source,
            raw,
            tips,
            stats,
            loaded_at: Utc::now(),
        }
    }

    /// Re-read the source and rebuild the expanded view from scratch.
    ///
    /// On failure the previous view is kept.
    pub async fn reload(&mut self, settings: &LoaderSettings) -> Result<(), LoadError> {
        let fresh = Self::load(self.source.clone(), settings).await?;
        *self = fresh;
        Ok(())
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    pub fn raw(&self) -> &[RawTip] {
        &self.raw
    }

    pub fn tips(&self) -> &[Tip] {
        &self.tips
    }

    pub fn tip(&self, number: u32) -> Option<&Tip> {
        self.tips.iter().find(|t| t.number == number)
    }

    pub fn stats(&self) -> &ExpansionStats {
        &self.stats
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    /// Fresh interactive board over the expanded view
    pub fn board(&self, settings: &NavigationSettings) -> Board {
        Board::new(self.tips.clone(), settings.expand_delay())
    }

    /// Navigator driving a new board through `surface`
    pub fn navigator(&self, surface: Arc<dyn Surface>, settings: NavigationSettings) -> Navigator {
        let board = Arc::new(Mutex::new(self.board(&settings)));
        Navigator::new(board, surface, settings)
    }
}
