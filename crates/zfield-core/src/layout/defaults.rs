// crates/zfield-core/src/layout/defaults.rs
//
// Ready-made layouts for common leaderboards.

use crate::field::spec::FieldSpec;
use crate::layout::Layout;

/// Most kills first, ties broken by fewest deaths.
pub fn kill_death_layout() -> Layout {
    Layout::new(vec![
        FieldSpec::descending("kills", 10_000),
        FieldSpec::ascending("deaths", 10_000),
    ])
}

/// Points, then wins, then playtime (minutes), all highest first.
/// 20 + 14 + 20 = 54 bits would not fit 53, so playtime is capped lower.
pub fn game_layout() -> Layout {
    Layout::new(vec![
        FieldSpec::descending("points", 1_000_000),
        FieldSpec::descending("wins", 10_000),
        FieldSpec::descending("playtime", 500_000),
    ])
}
