//! Watchable scanner
//!
//! Turns one [`Watchable`] into one [`ScanResult`]:
//! 1. stat the document (missing documents get the epoch sentinel)
//! 2. decide staleness against the configured age threshold
//! 3. evaluate each configured signal, weight it, and sum the scores
//! 4. note whether a deterministic signal fired
//! 5. map (score, deterministic, stale) to a tier and an action
//!
//! Scanning only reads the filesystem and runs read-only commands.

use crate::config::Watchable;
use crate::models::{ScanResult, SignalResult};
use crate::runner::{CommandRunner, SystemRunner};
use crate::scoring::score_to_tier;
use crate::signals::{ProjectLayout, SignalEnv, SignalKind, TrackedDoc};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Shared, read-only inputs for scanning watchables
pub struct ScanContext {
    root: PathBuf,
    layout: ProjectLayout,
    runner: Box<dyn CommandRunner>,
    now: DateTime<Utc>,
}

impl ScanContext {
    /// Context rooted at `root`, running real commands from that directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            runner: Box::new(SystemRunner::new().with_cwd(&root)),
            root,
            layout: ProjectLayout::default(),
            now: Utc::now(),
        }
    }

    pub fn with_layout(mut self, layout: ProjectLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_runner(mut self, runner: impl CommandRunner + 'static) -> Self {
        self.runner = Box::new(runner);
        self
    }

    /// Reference time for staleness
    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn layout(&self) -> &ProjectLayout {
        &self.layout
    }

    pub fn runner(&self) -> &dyn CommandRunner {
        self.runner.as_ref()
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    pub fn signal_env(&self) -> SignalEnv<'_> {
        SignalEnv {
            root: &self.root,
            layout: &self.layout,
            runner: self.runner.as_ref(),
        }
    }
}

/// A document is stale when it exists, the threshold is enabled, and its age
/// in fractional days exceeds the threshold.
pub fn is_stale(doc: &TrackedDoc, staleness_days: u32, now: DateTime<Utc>) -> bool {
    if !doc.exists || staleness_days == 0 {
        return false;
    }
    let age_days = (now - doc.modified).num_milliseconds() as f64 / MILLIS_PER_DAY;
    age_days > f64::from(staleness_days)
}

/// Evaluate every configured signal for one watchable.
pub fn scan_watchable(watchable: &Watchable, ctx: &ScanContext) -> ScanResult {
    let doc = TrackedDoc::inspect(ctx.root.join(&watchable.path));
    let stale = is_stale(&doc, watchable.staleness_days, ctx.now);
    let env = ctx.signal_env();

    let mut signals: IndexMap<String, SignalResult> = IndexMap::new();
    let mut total: u64 = 0;
    let mut deterministic = false;

    for spec in &watchable.signals {
        let Ok(kind) = spec.signal_type.parse::<SignalKind>() else {
            debug!(
                "{}: skipping unknown signal type '{}'",
                watchable.name, spec.signal_type
            );
            continue;
        };
        // First binding wins so the total always equals the sum of recorded scores
        if signals.contains_key(kind.name()) {
            warn!(
                "{}: signal '{}' configured more than once, keeping the first",
                watchable.name, kind
            );
            continue;
        }

        let threshold = if kind.accepts_threshold() {
            spec.threshold
        } else {
            None
        };
        let count = kind.evaluate(&doc, &env, threshold);
        let result = SignalResult::new(count, spec.weight);
        debug!(
            "{}: {} count={} weight={} score={}",
            watchable.name, kind, result.count, result.weight, result.score
        );

        total = total.saturating_add(result.score);
        if kind.is_deterministic() && count > 0 {
            deterministic = true;
        }
        signals.insert(kind.name().to_string(), result);
    }

    let tier = score_to_tier(total, deterministic, stale);

    ScanResult {
        path: watchable.path.clone(),
        exists: doc.exists,
        score: total,
        confidence: tier,
        stale,
        signals,
        recommended_action: tier.action(),
        generator: watchable.generator.clone(),
        generator_args: watchable.generator_args.clone(),
    }
}
