//! Watch Lesson Use Case
//!
//! Resolves the selected lesson of a course, its place in the ordered list,
//! and where the learner goes next. Completion is recorded durably.

use std::collections::HashSet;
use std::sync::Arc;

use kernel::id::UserId;

use crate::domain::content;
use crate::domain::course::{CourseModule, Lesson, NextStep};
use crate::domain::repository::ProgressRepository;
use crate::error::{AcademyError, AcademyResult};

pub struct WatchLessonInput {
    pub course_slug: String,
    /// Defaults to the first lesson
    pub lesson_id: Option<String>,
    /// Follow-up destination overriding the course's own
    pub next: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LessonEntry {
    pub id: &'static str,
    pub title: &'static str,
    pub current: bool,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LessonView {
    pub course: &'static CourseModule,
    pub lesson: &'static Lesson,
    pub embed_url: Option<String>,
    /// 1-based
    pub position: usize,
    pub total: usize,
    pub progress_percent: u8,
    pub lessons: Vec<LessonEntry>,
    pub next: NextStep,
    /// Target of the player's "next module" hotspot
    pub next_module_link: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionOutput {
    pub completed_count: usize,
    pub total: usize,
    pub next: NextStep,
}

pub struct WatchLessonUseCase<P>
where
    P: ProgressRepository + Send + Sync + 'static,
{
    progress_repo: Arc<P>,
}

impl<P> WatchLessonUseCase<P>
where
    P: ProgressRepository + Send + Sync + 'static,
{
    pub fn new(progress_repo: Arc<P>) -> Self {
        Self { progress_repo }
    }

    pub async fn execute(&self, user_id: &UserId, input: WatchLessonInput) -> AcademyResult<LessonView> {
        let (course, index) = locate(&input.course_slug, input.lesson_id.as_deref())?;
        let lesson = course.lesson_at(index).ok_or(AcademyError::LessonNotFound)?;

        let completed: HashSet<String> = self
            .progress_repo
            .completed_lessons(user_id, course.slug)
            .await?
            .into_iter()
            .collect();

        let lessons = course
            .lessons
            .iter()
            .enumerate()
            .map(|(i, l)| LessonEntry {
                id: l.id,
                title: l.title,
                current: i == index,
                completed: completed.contains(l.id),
            })
            .collect();

        let follow_up = internal_destination(input.next.as_deref());
        let next_module_link = follow_up
            .map(str::to_string)
            .or_else(|| (!lesson.link.is_empty()).then(|| lesson.link.to_string()));

        Ok(LessonView {
            course,
            lesson,
            embed_url: lesson.embed_url(),
            position: index + 1,
            total: course.lessons.len(),
            progress_percent: course.progress_percent(index),
            lessons,
            next: course.next_step(index, follow_up),
            next_module_link,
        })
    }

    pub async fn complete(
        &self,
        user_id: &UserId,
        course_slug: &str,
        lesson_id: &str,
        next: Option<&str>,
    ) -> AcademyResult<CompletionOutput> {
        let (course, index) = locate(course_slug, Some(lesson_id))?;

        self.progress_repo
            .mark_completed(user_id, course.slug, lesson_id)
            .await?;

        let completed_count = self
            .progress_repo
            .completed_lessons(user_id, course.slug)
            .await?
            .iter()
            .filter(|id| course.lessons.iter().any(|l| l.id == id.as_str()))
            .count();

        tracing::info!(
            user_id = %user_id,
            course = course.slug,
            lesson = lesson_id,
            completed_count,
            "Lesson completed"
        );

        Ok(CompletionOutput {
            completed_count,
            total: course.lessons.len(),
            next: course.next_step(index, internal_destination(next)),
        })
    }
}

fn locate(course_slug: &str, lesson_id: Option<&str>) -> AcademyResult<(&'static CourseModule, usize)> {
    let course = content::find_course(course_slug).ok_or(AcademyError::CourseNotFound)?;
    let index = course
        .position(lesson_id)
        .ok_or(AcademyError::LessonNotFound)?;
    Ok((course, index))
}

/// Site-relative paths only; anything else is dropped
fn internal_destination(next: Option<&str>) -> Option<&str> {
    next.filter(|n| n.starts_with('/') && !n.starts_with("//"))
}
