//! Course modules and lesson navigation
//!
//! A module owns a fixed, ordered lesson list. Navigation never indexes past
//! the end: after the last lesson the learner is sent to a follow-up
//! destination, or back home with a congratulation.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::domain::catalog::Category;

/// Where a finished learner lands when no follow-up is configured
pub const COMPLETION_DESTINATION: &str = "/";
pub const COMPLETION_MESSAGE: &str = "Congratulations! You have completed all lessons.";

const EMBED_BASE: &str = "https://www.youtube.com/embed/";

static VIDEO_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:v=|youtu\.be/)([A-Za-z0-9_-]{11})").expect("video id pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lesson {
    pub id: &'static str,
    pub title: &'static str,
    /// Source URL (watch page or short link); may be empty
    pub video_url: &'static str,
    /// Still image shown instead of the player
    pub thumbnail: Option<&'static str>,
    /// Destination of the player's "next module" hotspot
    pub link: &'static str,
}

impl Lesson {
    pub fn embed_url(&self) -> Option<String> {
        embed_url(self.video_url)
    }
}

/// Embeddable player URL for a YouTube link, if it carries a video id
pub fn embed_url(video_url: &str) -> Option<String> {
    VIDEO_ID
        .captures(video_url)
        .and_then(|caps| caps.get(1))
        .map(|id| format!("{EMBED_BASE}{}", id.as_str()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CourseModule {
    pub slug: &'static str,
    pub title: &'static str,
    pub category: Category,
    pub image: &'static str,
    /// Where to go after the last lesson
    pub follow_up: Option<&'static str>,
    pub lessons: &'static [Lesson],
}

impl CourseModule {
    /// Index of `lesson_id`, or of the first lesson when none is selected
    pub fn position(&self, lesson_id: Option<&str>) -> Option<usize> {
        match lesson_id {
            None | Some("") => (!self.lessons.is_empty()).then_some(0),
            Some(id) => self.lessons.iter().position(|l| l.id == id),
        }
    }

    pub fn lesson_at(&self, index: usize) -> Option<&'static Lesson> {
        self.lessons.get(index)
    }

    /// `round((index + 1) / N * 100)`
    pub fn progress_percent(&self, index: usize) -> u8 {
        let total = self.lessons.len();
        if total == 0 {
            return 0;
        }
        let done = (index + 1).min(total) as f64;
        (done / total as f64 * 100.0).round() as u8
    }

    /// Step after lesson `index`. `follow_up` overrides the module's own.
    pub fn next_step(&self, index: usize, follow_up: Option<&str>) -> NextStep {
        if let Some(next) = self.lessons.get(index + 1) {
            return NextStep::Lesson {
                id: next.id.to_string(),
                title: next.title.to_string(),
            };
        }

        match follow_up.filter(|s| !s.is_empty()).or(self.follow_up) {
            Some(destination) => NextStep::FollowUp {
                destination: destination.to_string(),
            },
            None => NextStep::Completed {
                destination: COMPLETION_DESTINATION.to_string(),
                message: COMPLETION_MESSAGE.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NextStep {
    Lesson { id: String, title: String },
    FollowUp { destination: String },
    Completed { destination: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    const LESSONS: &[Lesson] = &[
        Lesson {
            id: "1",
            title: "Intro",
            video_url: "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            thumbnail: None,
            link: "",
        },
        Lesson {
            id: "2",
            title: "Bridges",
            video_url: "https://youtu.be/oHg5SJYRHA0?t=5",
            thumbnail: None,
            link: "",
        },
        Lesson {
            id: "3",
            title: "Wrap-up",
            video_url: "",
            thumbnail: Some("/images/wrap.png"),
            link: "",
        },
    ];

    fn module(follow_up: Option<&'static str>) -> CourseModule {
        CourseModule {
            slug: "test",
            title: "Test",
            category: Category::Blockchain,
            image: "",
            follow_up,
            lessons: LESSONS,
        }
    }

    #[test]
    fn test_embed_url() {
        assert_eq!(
            embed_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ&list=x").as_deref(),
            Some("https://www.youtube.com/embed/dQw4w9WgXcQ")
        );
        assert_eq!(
            embed_url("https://youtu.be/oHg5SJYRHA0").as_deref(),
            Some("https://www.youtube.com/embed/oHg5SJYRHA0")
        );
        assert_eq!(embed_url("https://drive.google.com/file/d/abc/view"), None);
        assert_eq!(embed_url(""), None);
    }

    #[test]
    fn test_position_defaults_to_first() {
        let m = module(None);
        assert_eq!(m.position(None), Some(0));
        assert_eq!(m.position(Some("")), Some(0));
        assert_eq!(m.position(Some("3")), Some(2));
        assert_eq!(m.position(Some("99")), None);
    }

    #[test]
    fn test_progress() {
        let m = module(None);
        assert_eq!(m.progress_percent(0), 33);
        assert_eq!(m.progress_percent(1), 67);
        assert_eq!(m.progress_percent(2), 100);
    }

    #[test]
    fn test_next_step_within_list() {
        assert_eq!(
            module(None).next_step(0, None),
            NextStep::Lesson {
                id: "2".into(),
                title: "Bridges".into()
            }
        );
    }

    #[test]
    fn test_next_step_after_last() {
        assert_eq!(
            module(None).next_step(2, None),
            NextStep::Completed {
                destination: "/".into(),
                message: COMPLETION_MESSAGE.into()
            }
        );
        assert_eq!(
            module(Some("/courses/defi")).next_step(2, None),
            NextStep::FollowUp {
                destination: "/courses/defi".into()
            }
        );
        assert_eq!(
            module(Some("/courses/defi")).next_step(2, Some("/courses/nft")),
            NextStep::FollowUp {
                destination: "/courses/nft".into()
            }
        );
        // Index past the end still resolves without panicking
        assert!(matches!(
            module(None).next_step(10, None),
            NextStep::Completed { .. }
        ));
    }
}
