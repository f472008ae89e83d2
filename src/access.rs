//! Lesson and course access gating.
//!
//! Premium content unlocks through enrollment, an active subscription, or an
//! admin account; preview lessons and non-premium courses are open to
//! everyone, including guests.

use chrono::{DateTime, Utc};

use crate::types::{Course, Lesson, User, UserRole};

/// Whether the user may open the course's gated (non-preview) lessons.
///
/// `None` means a guest session, which never has paid access.
pub fn has_course_access(user: Option<&User>, course: &Course, now: DateTime<Utc>) -> bool {
    match user {
        Some(u) => {
            u.is_enrolled(&course.course_id)
                || u.role == UserRole::Admin
                || u.has_active_subscription(now)
        }
        None => false,
    }
}

/// Whether a specific lesson is viewable right now.
pub fn can_view_lesson(
    user: Option<&User>,
    course: &Course,
    lesson: &Lesson,
    now: DateTime<Utc>,
) -> bool {
    !course.is_premium || lesson.is_preview || has_course_access(user, course, now)
}
