//! Course catalog
//!
//! Categories and the cards listed under them. The "all classes" view
//! concatenates categories in [`Category::ALL`] order.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Liveclass,
    Trading,
    Investing,
    Blockchain,
}

impl Category {
    /// Display and "all classes" order
    pub const ALL: [Category; 4] = [
        Category::Liveclass,
        Category::Trading,
        Category::Investing,
        Category::Blockchain,
    ];

    pub const fn slug(&self) -> &'static str {
        match self {
            Category::Liveclass => "liveclass",
            Category::Trading => "trading",
            Category::Investing => "investing",
            Category::Blockchain => "blockchain",
        }
    }

    pub const fn title(&self) -> &'static str {
        match self {
            Category::Liveclass => "Live Class",
            Category::Trading => "Trading",
            Category::Investing => "Investing",
            Category::Blockchain => "Crypto & Blockchain",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.slug() == slug)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// One card in a category listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogItem {
    pub title: &'static str,
    pub image: &'static str,
    pub link: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_roundtrip() {
        for category in Category::ALL {
            assert_eq!(Category::from_slug(category.slug()), Some(category));
        }
        assert_eq!(Category::from_slug("defi"), None);
    }

    #[test]
    fn test_all_classes_order() {
        let slugs: Vec<_> = Category::ALL.iter().map(Category::slug).collect();
        assert_eq!(slugs, ["liveclass", "trading", "investing", "blockchain"]);
    }
}
