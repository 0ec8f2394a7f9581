use chrono::TimeDelta;
use serde::Serialize;

use super::{CourseImage, Lesson, LessonId};

/// The course aggregate: metadata plus the ordered lesson list.
///
/// Readable by anyone; mutated only through [`crate::form::CourseForm`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct Course {
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) image: Option<CourseImage>,
    #[serde(skip)]
    pub(crate) image_preview: String,
    pub(crate) lessons: Vec<Lesson>,
}

impl Course {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn image(&self) -> Option<&CourseImage> {
        self.image.as_ref()
    }

    /// `data:` URL of the cover image, empty until the preview has loaded.
    pub fn image_preview(&self) -> &str {
        &self.image_preview
    }

    /// Lessons in authoring order.
    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    pub fn lesson(&self, id: LessonId) -> Option<&Lesson> {
        self.lessons.iter().find(|l| l.id() == id)
    }

    pub(crate) fn position_of(&self, id: LessonId) -> Option<usize> {
        self.lessons.iter().position(|l| l.id() == id)
    }

    /// Sum of the lesson durations that parse; lessons without one count as zero.
    /// Saturates at [`TimeDelta::MAX`].
    pub fn total_duration(&self) -> TimeDelta {
        self.lessons
            .iter()
            .filter_map(Lesson::duration)
            .try_fold(TimeDelta::zero(), |acc, d| acc.checked_add(&d))
            .unwrap_or(TimeDelta::MAX)
    }
}
