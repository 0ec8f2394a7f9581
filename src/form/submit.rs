use crate::model::entity::Course;

/// Receiver of a finished course. Called at most once per successful
/// [`CourseForm::submit`](super::CourseForm::submit).
pub trait OnSubmit {
    fn on_submit(&mut self, course: Course);
}

impl<F> OnSubmit for F
where
    F: FnMut(Course),
{
    fn on_submit(&mut self, course: Course) {
        self(course)
    }
}
