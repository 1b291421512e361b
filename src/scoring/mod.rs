//! Confidence tiers and recommended actions
//!
//! # Tier Precedence
//!
//! ```text
//! deterministic mismatch  -> Certain
//! stale                   -> High
//! score == 0              -> Green
//! score <= 2              -> Low
//! score <= 5              -> Medium
//! otherwise               -> High
//! ```
//!
//! The first matching rule wins. Deterministic signals (version and component
//! count mismatches) are verified facts, so they bypass the heuristic ladder
//! entirely; age alone is the next strongest evidence.
//!
//! # Actions
//!
//! | Tier | Action |
//! |---|---|
//! | Green | `none` |
//! | Low | `report-only` |
//! | Medium | `suggest-refresh` |
//! | High | `auto-refresh` |
//! | Certain | `auto-refresh-silent` |

mod tiers;

pub use tiers::{score_to_tier, ConfidenceTier, RecommendedAction};
