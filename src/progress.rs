//! Completion-percentage math over courses and the user's completed-lesson
//! set. Recomputed in full on every toggle; there is no caching.

use std::collections::{HashMap, HashSet};

use crate::types::Course;

/// How many of `course`'s lessons appear in the completed set.
pub fn completed_in_course(course: &Course, completed: &HashSet<String>) -> usize {
    course
        .lessons
        .iter()
        .filter(|l| completed.contains(&l.lesson_id))
        .count()
}

/// The course's completion percentage: `round(100 * done / total)`.
///
/// A course with no lessons is 0 percent complete, never a division error.
/// The result is an integer in `[0, 100]` by construction.
pub fn course_progress(course: &Course, completed: &HashSet<String>) -> u8 {
    let total = course.lessons.len();
    if total == 0 {
        return 0;
    }
    let done = completed_in_course(course, completed);
    (done as f64 / total as f64 * 100.0).round() as u8
}

/// The mean of all recorded course percentages, rounded; 0 when the user has
/// no progress entries at all.
pub fn average_progress(progress: &HashMap<String, u8>) -> u8 {
    if progress.is_empty() {
        return 0;
    }
    let sum: u32 = progress.values().map(|p| *p as u32).sum();
    (sum as f64 / progress.len() as f64).round() as u8
}
