//! The deployment region selector.

use std::fmt;

/// Which deployment's opcode and constants tables to load.
///
/// Selecting a region is the only input to this crate's fetch operations;
/// everything else (catalog URLs, field widths) is derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    /// The Global/English-language deployment.
    Global,
    /// The Chinese deployment, published under a separate operator.
    Chinese,
    /// The Korean deployment, published under a separate operator.
    Korean,
}

impl Region {
    /// Path segment this region's catalogs are published under.
    #[must_use]
    pub fn catalog_slug(self) -> &'static str {
        match self {
            Self::Global => "global",
            Self::Chinese => "chinese",
            Self::Korean => "korean",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.catalog_slug())
    }
}
