/// Phases of an archive run
///
/// A run moves through these strictly in order; there are no branches.
use std::fmt;

/// Represents where the crawl driver is in a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CrawlPhase {
    /// Fetching the top page and seeding the worklist from its links
    SeedingTop,

    /// Fetching worklist URLs until none remain
    DrainingWorklist,

    /// Fetching sitemap entries that the traversal did not reach
    ApplyingSitemap,

    /// Writing the output sitemap, URL logs and the retry ledger
    BuildingOutput,

    /// Nothing left to do
    Done,
}

impl CrawlPhase {
    /// Returns the phase that follows this one, or `None` from `Done`
    pub fn next(&self) -> Option<Self> {
        match self {
            Self::SeedingTop => Some(Self::DrainingWorklist),
            Self::DrainingWorklist => Some(Self::ApplyingSitemap),
            Self::ApplyingSitemap => Some(Self::BuildingOutput),
            Self::BuildingOutput => Some(Self::Done),
            Self::Done => None,
        }
    }

    /// Returns true if `to` directly follows this phase
    pub fn can_transition_to(&self, to: Self) -> bool {
        self.next() == Some(to)
    }

    /// Returns true if links discovered in this phase feed the worklist
    pub fn is_recursive(&self) -> bool {
        matches!(self, Self::SeedingTop | Self::DrainingWorklist)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SeedingTop => "seeding_top",
            Self::DrainingWorklist => "draining_worklist",
            Self::ApplyingSitemap => "applying_sitemap",
            Self::BuildingOutput => "building_output",
            Self::Done => "done",
        }
    }

    /// Returns all phases in run order
    pub fn all_phases() -> Vec<Self> {
        vec![
            Self::SeedingTop,
            Self::DrainingWorklist,
            Self::ApplyingSitemap,
            Self::BuildingOutput,
            Self::Done,
        ]
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
