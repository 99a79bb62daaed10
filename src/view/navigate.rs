//! Cross-reference navigation.
//!
//! Clicking a reference scrolls to the target card, opens it, waits for its
//! stories to appear and highlights the matching story. Each step is a
//! timed delay; a newer navigation makes any older one stop at its next
//! check without further effects.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};
use tracing::{debug, info, instrument};

use crate::core::{resolve, Reference, Resolution};

use super::board::Board;

/// Visual effects of a navigation
#[async_trait]
pub trait Surface: Send + Sync {
    /// Bring a card into view
    async fn scroll_to_card(&self, tip: u32);

    /// Outline a card for `duration`
    async fn highlight_card(&self, tip: u32, duration: Duration);

    /// Outline one story instance on a card for `duration`
    async fn highlight_story(&self, tip: u32, index: usize, duration: Duration);
}

/// Surface that only logs effects
#[derive(Debug, Default)]
pub struct LogSurface;

#[async_trait]
impl Surface for LogSurface {
    async fn scroll_to_card(&self, tip: u32) {
        info!(tip, "Scroll to card");
    }

    async fn highlight_card(&self, tip: u32, duration: Duration) {
        info!(tip, ms = duration.as_millis() as u64, "Highlight card");
    }

    async fn highlight_story(&self, tip: u32, index: usize, duration: Duration) {
        info!(tip, index, ms = duration.as_millis() as u64, "Highlight story");
    }
}

/// Bounded polling for a condition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaitPolicy {
    /// Maximum number of checks (including the first)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay between checks in milliseconds
    #[serde(default = "default_retry_delay")]
    pub delay_ms: u64,
}

fn default_max_attempts() -> u32 {
    10
}
fn default_retry_delay() -> u64 {
    100
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            delay_ms: default_retry_delay(),
        }
    }
}

impl WaitPolicy {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// Check if another attempt is allowed after `attempt` (1-indexed)
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }
}

/// Timing for navigation effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationSettings {
    /// Time for a scroll to settle (default: 400ms)
    #[serde(default = "default_scroll_delay")]
    pub scroll_delay_ms: u64,

    /// Expand animation length (default: 300ms)
    #[serde(default = "default_expand_delay")]
    pub expand_delay_ms: u64,

    /// How long highlights last (default: 2000ms)
    #[serde(default = "default_highlight")]
    pub highlight_ms: u64,

    /// Polling for story visibility
    #[serde(default)]
    pub wait: WaitPolicy,
}

fn default_scroll_delay() -> u64 {
    400
}
fn default_expand_delay() -> u64 {
    300
}
fn default_highlight() -> u64 {
    2000
}

impl Default for NavigationSettings {
    fn default() -> Self {
        Self {
            scroll_delay_ms: default_scroll_delay(),
            expand_delay_ms: default_expand_delay(),
            highlight_ms: default_highlight(),
            wait: WaitPolicy::default(),
        }
    }
}

impl NavigationSettings {
    pub fn scroll_delay(&self) -> Duration {
        Duration::from_millis(self.scroll_delay_ms)
    }

    pub fn expand_delay(&self) -> Duration {
        Duration::from_millis(self.expand_delay_ms)
    }

    pub fn highlight(&self) -> Duration {
        Duration::from_millis(self.highlight_ms)
    }
}

/// How a navigation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// Story instance found and highlighted
    StoryHighlighted { tip: u32, index: usize },

    /// Scrolled to the card and highlighted it; no story highlighted
    CardOnly { tip: u32 },

    /// Target tip does not exist; nothing happened
    TipNotFound { tip: u32 },

    /// A newer navigation took over
    Superseded,
}

/// Result of waiting for a condition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wait {
    Ready,
    TimedOut,
    Superseded,
}

/// Runs navigations against a shared board
#[derive(Clone)]
pub struct Navigator {
    board: Arc<Mutex<Board>>,
    surface: Arc<dyn Surface>,
    settings: NavigationSettings,
    generation: Arc<AtomicU64>,
}

impl Navigator {
    pub fn new(board: Arc<Mutex<Board>>, surface: Arc<dyn Surface>, settings: NavigationSettings) -> Self {
        Self {
            board,
            surface,
            settings,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Handle to the board, for expand/collapse clicks
    pub fn board(&self) -> Arc<Mutex<Board>> {
        Arc::clone(&self.board)
    }

    pub fn settings(&self) -> &NavigationSettings {
        &self.settings
    }

    /// Follow a clicked reference
    #[instrument(skip_all, fields(target_tip = reference.target, origin_tip = reference.origin))]
    pub async fn navigate(&self, reference: Reference) -> Outcome {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let resolution = {
            let board = self.board.lock().await;
            resolve(board.tips(), &reference)
        };
        debug!(?resolution, "Resolved reference");

        let (tip, index) = match resolution {
            Resolution::TipNotFound { tip } => return Outcome::TipNotFound { tip },
            Resolution::CardOnly { tip } => (tip, None),
            Resolution::Story { tip, index } => (tip, Some(index)),
        };

        self.surface.scroll_to_card(tip).await;
        sleep(self.settings.scroll_delay()).await;
        if self.is_superseded(generation) {
            return Outcome::Superseded;
        }

        let Some(index) = index else {
            self.surface.highlight_card(tip, self.settings.highlight()).await;
            return Outcome::CardOnly { tip };
        };

        {
            let mut board = self.board.lock().await;
            board.expand(tip, Instant::now());
        }

        match self
            .wait_for(generation, |board| board.is_ready(tip, Instant::now()))
            .await
        {
            Wait::Ready => {
                self.surface
                    .highlight_story(tip, index, self.settings.highlight())
                    .await;
                Outcome::StoryHighlighted { tip, index }
            }
            Wait::TimedOut => {
                debug!(tip, index, "Story never became visible");
                self.surface.highlight_card(tip, self.settings.highlight()).await;
                Outcome::CardOnly { tip }
            }
            Wait::Superseded => Outcome::Superseded,
        }
    }

    /// Poll `condition` against the board until it holds, the attempts run
    /// out, or a newer navigation starts.
    pub async fn wait_for<F>(&self, generation: u64, mut condition: F) -> Wait
    where
        F: FnMut(&Board) -> bool,
    {
        let policy = &self.settings.wait;
        let mut attempt = 1;

        loop {
            if self.is_superseded(generation) {
                return Wait::Superseded;
            }

            if condition(&*self.board.lock().await) {
                return Wait::Ready;
            }

            if !policy.should_retry(attempt) {
                return Wait::TimedOut;
            }

            attempt += 1;
            sleep(policy.delay()).await;
        }
    }

    /// Generation of the most recent navigation
    pub fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    fn is_superseded(&self, generation: u64) -> bool {
        self.current_generation() != generation
    }
}
