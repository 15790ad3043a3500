//! Built-in course content

use crate::domain::catalog::{CatalogItem, Category};
use crate::domain::course::{CourseModule, Lesson};

pub const COURSE_PATH_PREFIX: &str = "/courses/";

const CRYPTO_REGULATION_2025: &[Lesson] = &[
    Lesson {
        id: "1",
        title: "Regulasi Aset Kripto di Indonesia 2025",
        video_url: "https://www.youtube.com/watch?v=Xq0xJ5b6f2A",
        thumbnail: None,
        link: "/courses/cross-chain-technology",
    },
    Lesson {
        id: "2",
        title: "Peralihan Pengawasan dari Bappebti ke OJK",
        video_url: "https://www.youtube.com/watch?v=R3tPqGQm9lE",
        thumbnail: None,
        link: "/courses/cross-chain-technology",
    },
    Lesson {
        id: "3",
        title: "Pajak Kripto dan Pelaporan",
        video_url: "https://youtu.be/k1mTn8WcVbY",
        thumbnail: None,
        link: "/courses/cross-chain-technology",
    },
    Lesson {
        id: "4",
        title: "Sesi Tanya Jawab",
        video_url: "",
        thumbnail: Some("/images/liveclass/regulation-qna.png"),
        link: "/courses/cross-chain-technology",
    },
];

const TRADING_FUNDAMENTALS: &[Lesson] = &[
    Lesson {
        id: "1",
        title: "Membaca Candlestick",
        video_url: "https://www.youtube.com/watch?v=Hk3bN4sZpQ0",
        thumbnail: None,
        link: "/courses/risk-management",
    },
    Lesson {
        id: "2",
        title: "Support dan Resistance",
        video_url: "https://www.youtube.com/watch?v=Ua7dW2cEr5M",
        thumbnail: None,
        link: "/courses/risk-management",
    },
    Lesson {
        id: "3",
        title: "Volume dan Konfirmasi Tren",
        video_url: "https://youtu.be/Lp9vF6gTn3K",
        thumbnail: None,
        link: "/courses/risk-management",
    },
];

const RISK_MANAGEMENT: &[Lesson] = &[
    Lesson {
        id: "1",
        title: "Ukuran Posisi",
        video_url: "https://www.youtube.com/watch?v=Qm2cR8yVb1S",
        thumbnail: None,
        link: "",
    },
    Lesson {
        id: "2",
        title: "Stop Loss dan Take Profit",
        video_url: "https://www.youtube.com/watch?v=Ws4hJ7nKx6D",
        thumbnail: None,
        link: "",
    },
];

const LONG_TERM_INVESTING: &[Lesson] = &[
    Lesson {
        id: "1",
        title: "Dollar Cost Averaging",
        video_url: "https://www.youtube.com/watch?v=Bn5tY3pLm8R",
        thumbnail: None,
        link: "",
    },
    Lesson {
        id: "2",
        title: "Menyusun Portofolio Kripto",
        video_url: "https://youtu.be/Zc6gV1qHs4T",
        thumbnail: None,
        link: "",
    },
    Lesson {
        id: "3",
        title: "Siklus Halving Bitcoin",
        video_url: "https://www.youtube.com/watch?v=Ef8kM2wPj9N",
        thumbnail: None,
        link: "",
    },
];

const CROSS_CHAIN_TECHNOLOGY: &[Lesson] = &[
    Lesson {
        id: "1",
        title: "Apa Itu Interoperabilitas",
        video_url: "https://www.youtube.com/watch?v=Td1sK9vQa7G",
        thumbnail: None,
        link: "",
    },
    Lesson {
        id: "2",
        title: "Cara Kerja Bridge",
        video_url: "https://www.youtube.com/watch?v=Jy3nP5rXc2H",
        thumbnail: None,
        link: "",
    },
    Lesson {
        id: "3",
        title: "Risiko Keamanan Bridge",
        video_url: "https://youtu.be/Gv7mL4bWe1Z",
        thumbnail: None,
        link: "",
    },
    Lesson {
        id: "4",
        title: "Protokol Messaging Lintas Chain",
        video_url: "https://www.youtube.com/watch?v=Ns2fD8hKy5U",
        thumbnail: None,
        link: "",
    },
];

/// Every module, grouped in [`Category::ALL`] order
pub const COURSES: &[CourseModule] = &[
    CourseModule {
        slug: "crypto-regulation-2025",
        title: "2025 Crypto Regulation",
        category: Category::Liveclass,
        image: "/images/liveclass/crypto-regulation-2025.png",
        follow_up: None,
        lessons: CRYPTO_REGULATION_2025,
    },
    CourseModule {
        slug: "trading-fundamentals",
        title: "Trading Fundamentals",
        category: Category::Trading,
        image: "/images/trading/fundamentals.png",
        follow_up: Some("/courses/risk-management"),
        lessons: TRADING_FUNDAMENTALS,
    },
    CourseModule {
        slug: "risk-management",
        title: "Risk Management",
        category: Category::Trading,
        image: "/images/trading/risk-management.png",
        follow_up: None,
        lessons: RISK_MANAGEMENT,
    },
    CourseModule {
        slug: "long-term-investing",
        title: "Long-term Investing",
        category: Category::Investing,
        image: "/images/investing/long-term.png",
        follow_up: None,
        lessons: LONG_TERM_INVESTING,
    },
    CourseModule {
        slug: "cross-chain-technology",
        title: "Cross-chain Technology",
        category: Category::Blockchain,
        image: "/images/blockchain/cross-chain-technology.png",
        follow_up: None,
        lessons: CROSS_CHAIN_TECHNOLOGY,
    },
];

pub fn find_course(slug: &str) -> Option<&'static CourseModule> {
    COURSES.iter().find(|c| c.slug == slug)
}

pub fn category_items(category: Category) -> Vec<CatalogItem> {
    COURSES
        .iter()
        .filter(|c| c.category == category)
        .map(|c| CatalogItem {
            title: c.title,
            image: c.image,
            link: format!("{COURSE_PATH_PREFIX}{}", c.slug),
        })
        .collect()
}

/// Liveclass, trading, investing, then blockchain
pub fn all_classes() -> Vec<CatalogItem> {
    Category::ALL.into_iter().flat_map(category_items).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_slugs_and_lesson_ids_are_unique() {
        let slugs: HashSet<_> = COURSES.iter().map(|c| c.slug).collect();
        assert_eq!(slugs.len(), COURSES.len());

        for course in COURSES {
            assert!(!course.lessons.is_empty(), "{} has no lessons", course.slug);
            let ids: HashSet<_> = course.lessons.iter().map(|l| l.id).collect();
            assert_eq!(ids.len(), course.lessons.len(), "{}", course.slug);
        }
    }

    #[test]
    fn test_internal_links_resolve() {
        let links = COURSES
            .iter()
            .filter_map(|c| c.follow_up)
            .chain(COURSES.iter().flat_map(|c| c.lessons.iter().map(|l| l.link)))
            .filter(|l| !l.is_empty());

        for link in links {
            let slug = link.strip_prefix(COURSE_PATH_PREFIX).unwrap_or(link);
            assert!(find_course(slug).is_some(), "dangling link {link}");
        }
    }

    #[test]
    fn test_all_classes_concatenates_in_category_order() {
        let expected: Vec<_> = Category::ALL
            .into_iter()
            .flat_map(category_items)
            .map(|i| i.link)
            .collect();
        let all: Vec<_> = all_classes().into_iter().map(|i| i.link).collect();

        assert_eq!(all, expected);
        assert_eq!(all.first().map(String::as_str), Some("/courses/crypto-regulation-2025"));
        assert_eq!(all.last().map(String::as_str), Some("/courses/cross-chain-technology"));
    }

    #[test]
    fn test_every_video_lesson_embeds() {
        for course in COURSES {
            for lesson in course.lessons {
                assert!(
                    lesson.embed_url().is_some() || lesson.thumbnail.is_some(),
                    "{}/{} has neither video nor thumbnail",
                    course.slug,
                    lesson.id
                );
            }
        }
    }
}
