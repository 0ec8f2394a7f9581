mod lesson;
pub use lesson::{Lesson, LessonDraft, LessonId};

mod course;
pub use course::Course;

mod image;
pub use image::{CourseImage, ImageSource, InMemoryImage, LocalImage};
