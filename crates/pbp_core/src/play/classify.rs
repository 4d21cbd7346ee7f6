//! Pure predicates over a parsed [`Play`]

use super::ast::{Advancement, BasicPlay, Play};

/// True iff the batter homered or some runner crossed the plate safely.
pub fn play_is_scoring(play: &Play) -> bool {
    let home_run = matches!(&play.basic, BasicPlay::Hit(hit) if hit.is_home_run());

    home_run
        || play
            .advancements
            .iter()
            .any(|a| matches!(a, Advancement::Successful { to, .. } if to.is_home()))
}

impl Play {
    pub fn is_scoring(&self) -> bool {
        play_is_scoring(self)
    }
}
