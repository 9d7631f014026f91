//! Combines one page of per-source results into the accumulated feed.
//!
//! Each call receives the page's item lists in fixed source order (news
//! categories in [`Category::ALL`](crate::source::Category::ALL) order or the
//! news search, then movies, then social).  Failed or skipped fetches are
//! passed as empty lists.  The lists are interleaved and then either replace
//! the buffer (first page) or are appended to it.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::source::FeedItem;

/// How one page's lists are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interleave {
    /// Concatenate, then apply a uniform random permutation.
    #[default]
    Shuffle,
    /// Take one item from each list in turn.  Deterministic.
    RoundRobin,
}

pub struct FeedMerger {
    buffer: Vec<FeedItem>,
    interleave: Interleave,
    rng: StdRng,
}

impl FeedMerger {
    /// `seed` makes shuffling reproducible; `None` seeds from OS entropy.
    pub fn new(interleave: Interleave, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            buffer: Vec::new(),
            interleave,
            rng,
        }
    }

    pub fn items(&self) -> &[FeedItem] {
        &self.buffer
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Merge one page.  Returns the number of items it contributed.
    pub fn merge(&mut self, lists: Vec<Vec<FeedItem>>, first_page: bool) -> usize {
        let page = match self.interleave {
            Interleave::Shuffle => {
                let mut combined: Vec<FeedItem> = lists.into_iter().flatten().collect();
                combined.shuffle(&mut self.rng);
                combined
            }
            Interleave::RoundRobin => round_robin(lists),
        };

        let added = page.len();
        if first_page {
            self.buffer = page;
        } else {
            self.buffer.extend(page);
        }
        added
    }
}

fn round_robin(lists: Vec<Vec<FeedItem>>) -> Vec<FeedItem> {
    let total = lists.iter().map(Vec::len).sum();
    let mut iters: Vec<_> = lists.into_iter().map(Vec::into_iter).collect();
    let mut out = Vec::with_capacity(total);
    while out.len() < total {
        for it in iters.iter_mut() {
            if let Some(item) = it.next() {
                out.push(item);
            }
        }
    }
    out
}
