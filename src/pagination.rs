//! Lockstep page cursors for the three sources.
//!
//! All cursors start at 1, advance together and reset together.  A source
//! with fewer pages than the others just returns empty pages once it runs
//! out.  Every reset also bumps [`Pagination::generation`], which page
//! requests carry so that a response to a superseded filter can be told apart
//! from the current one.

use crate::source::SourceKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursors {
    pub news: u32,
    pub movies: u32,
    pub social: u32,
}

impl Cursors {
    pub const FIRST: Cursors = Cursors {
        news: 1,
        movies: 1,
        social: 1,
    };

    pub fn get(&self, kind: SourceKind) -> u32 {
        match kind {
            SourceKind::News => self.news,
            SourceKind::Movies => self.movies,
            SourceKind::Social => self.social,
        }
    }

    /// Whether every source is on its first page.
    pub fn is_first_page(&self) -> bool {
        *self == Self::FIRST
    }
}

#[derive(Debug, Clone)]
pub struct Pagination {
    cursors: Cursors,
    generation: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new()
    }
}

impl Pagination {
    pub fn new() -> Self {
        Self {
            cursors: Cursors::FIRST,
            generation: 0,
        }
    }

    pub fn cursors(&self) -> Cursors {
        self.cursors
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Back to page 1 everywhere, under a fresh generation.
    pub fn reset_all(&mut self) {
        self.cursors = Cursors::FIRST;
        self.generation += 1;
    }

    /// Every cursor moves forward by exactly one page.
    pub fn advance_all(&mut self) {
        self.cursors.news += 1;
        self.cursors.movies += 1;
        self.cursors.social += 1;
    }
}
