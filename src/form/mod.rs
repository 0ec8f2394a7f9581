//! Course form: the controller that owns a [`Course`](crate::model::entity::Course)
//! while it is being composed, plus the lesson-editor mode and the cover preview.

mod controller;
pub use controller::CourseForm;

mod issues;
pub use issues::FieldIssue;

mod mode;
pub use mode::LessonFormMode;

mod preview;
pub use preview::{PreviewEvent, PreviewOutcome, PreviewState, PreviewTicket};

mod submit;
pub use submit::OnSubmit;
