//! The course catalog: lookups, browse filters, the home-screen picks, and
//! the admin builder operations that grow course content in place.
//!
//! Every lookup degrades to `None` or an empty list on unknown identifiers;
//! nothing here returns an error.

use chrono::Utc;
use tracing::{info, warn};

use crate::content::{BlockKind, ContentBlock};
use crate::types::{Course, Lesson, User};

/// Pricing filter for the course list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriceTier {
    #[default]
    All,
    Free,
    Premium,
}

/// The in-memory course collection owned by the application store.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    courses: Vec<Course>,
}

impl Catalog {
    pub fn new(courses: Vec<Course>) -> Self {
        Self { courses }
    }

    /// All courses in authoring order, drafts included.
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    /// Looks up a course by identifier.
    pub fn course(&self, course_id: &str) -> Option<&Course> {
        self.courses.iter().find(|c| c.course_id == course_id)
    }

    /// Looks up a lesson inside a course.
    pub fn lesson(&self, course_id: &str, lesson_id: &str) -> Option<&Lesson> {
        self.course(course_id).and_then(|c| c.lesson(lesson_id))
    }

    /// The student-facing listing: published courses only.
    pub fn published(&self) -> Vec<&Course> {
        self.courses.iter().filter(|c| c.is_published).collect()
    }

    /// Filters by category name (`None` means all categories) and pricing
    /// tier.
    pub fn filter(&self, category: Option<&str>, tier: PriceTier) -> Vec<&Course> {
        self.courses
            .iter()
            .filter(|c| category.map(|name| c.category == name).unwrap_or(true))
            .filter(|c| match tier {
                PriceTier::All => true,
                PriceTier::Free => !c.is_premium,
                PriceTier::Premium => c.is_premium,
            })
            .collect()
    }

    /// Case-insensitive substring search over title, description, and
    /// instructor. A blank query matches everything.
    pub fn search(&self, query: &str) -> Vec<&Course> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.courses.iter().collect();
        }
        self.courses
            .iter()
            .filter(|c| {
                c.title.to_lowercase().contains(&needle)
                    || c.description.to_lowercase().contains(&needle)
                    || c.instructor.to_lowercase().contains(&needle)
            })
            .collect()
    }

    // --- Home-Screen Picks ---

    /// The most recently added courses, newest first.
    pub fn popular(&self, limit: usize) -> Vec<&Course> {
        self.courses.iter().rev().take(limit).collect()
    }

    /// Courses the user has not started: none of their lessons appear in the
    /// user's completed set. Guests get the front of the catalog.
    pub fn recommended_for(&self, user: Option<&User>, limit: usize) -> Vec<&Course> {
        match user {
            Some(u) => self
                .courses
                .iter()
                .filter(|c| {
                    !c.lessons
                        .iter()
                        .any(|l| u.completed_lessons.contains(&l.lesson_id))
                })
                .take(limit)
                .collect(),
            None => self.courses.iter().take(limit).collect(),
        }
    }

    /// The course the user should resume: the in-progress course (strictly
    /// between 0 and 100 percent) with the highest percentage, or failing
    /// that the first enrolled course. Ties break on course id so the pick
    /// is stable.
    pub fn continue_pick(&self, user: &User) -> Option<&Course> {
        let mut in_progress: Vec<(&String, u8)> = user
            .progress
            .iter()
            .filter(|(_, p)| **p > 0 && **p < 100)
            .map(|(id, p)| (id, *p))
            .collect();
        in_progress.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

        let target = in_progress
            .first()
            .map(|(id, _)| (*id).clone())
            .or_else(|| user.enrolled_courses.first().cloned())?;
        self.course(&target)
    }

    // --- Admin Builder Operations ---

    /// Appends a scaffolded block of `kind` to a lesson and returns the new
    /// block's identifier, or `None` when the course or lesson is unknown.
    pub fn add_block(
        &mut self,
        course_id: &str,
        lesson_id: &str,
        kind: BlockKind,
    ) -> Option<String> {
        let Some(course) = self.courses.iter_mut().find(|c| c.course_id == course_id) else {
            warn!(course_id, "add_block: unknown course");
            return None;
        };
        let Some(lesson) = course
            .lessons
            .iter_mut()
            .find(|l| l.lesson_id == lesson_id)
        else {
            warn!(course_id, lesson_id, "add_block: unknown lesson");
            return None;
        };

        let block_id = format!("b{}", Utc::now().timestamp_millis());
        lesson
            .content_blocks
            .push(ContentBlock::scaffold(kind, block_id.clone()));
        info!(
            course_id,
            lesson_id,
            block_id = %block_id,
            kind = kind.label(),
            "content block added"
        );
        Some(block_id)
    }

    /// Appends a new lesson to a course, assigning the next `order` value.
    /// Returns the lesson's identifier, or `None` when the course is unknown.
    pub fn add_lesson(&mut self, course_id: &str, title: &str, duration: &str) -> Option<String> {
        let Some(course) = self.courses.iter_mut().find(|c| c.course_id == course_id) else {
            warn!(course_id, "add_lesson: unknown course");
            return None;
        };

        let lesson_id = format!("l{}", Utc::now().timestamp_millis());
        let order = course.lessons.len() as u32 + 1;
        course.lessons.push(Lesson {
            lesson_id: lesson_id.clone(),
            title: title.to_string(),
            description: None,
            duration: duration.to_string(),
            order,
            is_preview: false,
            content_blocks: vec![],
        });
        info!(course_id, lesson_id = %lesson_id, order, "lesson added");
        Some(lesson_id)
    }
}
