use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::issues::{FieldIssue, field_issues};
use super::{LessonFormMode, OnSubmit, PreviewEvent, PreviewOutcome, PreviewState, PreviewTicket};
use crate::config::{Config, FormLimits, ImageSettings};
use crate::model::entity::{Course, CourseImage, Lesson, LessonDraft, LessonId};

/// Sole owner of a [`Course`] being composed.
///
/// All mutations go through these methods and never fail; operations that find
/// nothing to act on (unknown lesson id, ineligible submit, stale preview) leave the
/// state untouched and report it through their `bool` return value.
pub struct CourseForm<S> {
    course: Course,
    mode: LessonFormMode,
    preview: PreviewState,
    generation: u64,
    inflight: Option<CancellationToken>,
    limits: FormLimits,
    images: ImageSettings,
    on_submit: S,
}

impl<S: OnSubmit> CourseForm<S> {
    pub fn new(on_submit: S) -> Self {
        Self::with_settings(FormLimits::default(), ImageSettings::default(), on_submit)
    }

    pub fn with_config(config: &Config, on_submit: S) -> Self {
        Self::with_settings(config.form().clone(), config.images().clone(), on_submit)
    }

    pub fn with_settings(limits: FormLimits, images: ImageSettings, on_submit: S) -> Self {
        Self {
            course: Course::default(),
            mode: LessonFormMode::Closed,
            preview: PreviewState::Empty,
            generation: 0,
            inflight: None,
            limits,
            images,
            on_submit,
        }
    }

    pub fn course(&self) -> &Course {
        &self.course
    }

    pub fn mode(&self) -> LessonFormMode {
        self.mode
    }

    pub fn show_lesson_form(&self) -> bool {
        self.mode.is_open()
    }

    /// The lesson currently open in the editor, `None` when creating or closed.
    pub fn editing_lesson(&self) -> Option<&Lesson> {
        self.mode.editing().and_then(|id| self.course.lesson(id))
    }

    pub fn preview_state(&self) -> &PreviewState {
        &self.preview
    }

    pub fn set_title<T: Into<String>>(&mut self, title: T) {
        self.course.title = title.into();
    }

    pub fn set_description<T: Into<String>>(&mut self, description: T) {
        self.course.description = description.into();
    }

    /// Replaces the cover image. The previous preview is dropped right away; the new
    /// one appears once the returned ticket has been loaded and applied.
    pub fn attach_image(&mut self, image: Option<CourseImage>) -> Option<PreviewTicket> {
        let Some(image) = image else {
            self.remove_image();
            return None;
        };

        self.cancel_inflight();
        self.generation += 1;
        debug!(
            "attaching image {} ({}), generation {}",
            image.file_name(),
            image.mime(),
            self.generation
        );

        let cancel = CancellationToken::new();
        self.inflight = Some(cancel.clone());
        self.course.image = Some(image.clone());
        self.course.image_preview.clear();
        self.preview = PreviewState::Loading;

        Some(PreviewTicket::new(
            self.generation,
            image,
            cancel,
            self.images.max_bytes(),
        ))
    }

    /// Applies a finished preview read. Returns `false` when the event belongs to an
    /// image that has since been replaced or removed.
    pub fn apply_preview(&mut self, event: PreviewEvent) -> bool {
        if event.generation != self.generation || self.course.image.is_none() {
            warn!(
                "ignoring stale preview for generation {} (current {})",
                event.generation, self.generation
            );
            return false;
        }

        match event.outcome {
            PreviewOutcome::Cancelled => return false,
            PreviewOutcome::Loaded(url) => {
                self.course.image_preview = url;
                self.preview = PreviewState::Ready;
            }
            PreviewOutcome::Failed(e) => {
                warn!("image preview failed: {}", e);
                self.course.image_preview.clear();
                self.preview = PreviewState::Failed(e.to_string());
            }
        }
        self.inflight = None;
        true
    }

    pub fn remove_image(&mut self) {
        self.cancel_inflight();
        self.generation += 1;
        self.course.image = None;
        self.course.image_preview.clear();
        self.preview = PreviewState::Empty;
    }

    pub fn open_lesson_creator(&mut self) {
        self.mode = LessonFormMode::Creating;
    }

    /// Opens the editor on an existing lesson. Unknown ids leave the mode unchanged.
    pub fn open_lesson_editor(&mut self, id: LessonId) -> bool {
        if self.course.lesson(id).is_none() {
            warn!("cannot edit unknown lesson {}", id);
            return false;
        }

        self.mode = LessonFormMode::Editing(id);
        true
    }

    pub fn close_lesson_form(&mut self) {
        self.mode = LessonFormMode::Closed;
    }

    pub fn add_lesson(&mut self, draft: LessonDraft) -> LessonId {
        let id = loop {
            let id = LessonId::new();
            if self.course.lesson(id).is_none() {
                break id;
            }
        };

        debug!("adding lesson {} '{}'", id, draft.title());
        self.course.lessons.push(Lesson::from_draft(id, draft));
        self.close_lesson_form();
        id
    }

    /// Replaces the lesson with the same id in place. The editor closes either way.
    pub fn update_lesson(&mut self, lesson: Lesson) -> bool {
        let updated = match self.course.position_of(lesson.id()) {
            Some(idx) => {
                debug!("updating lesson {} at {}", lesson.id(), idx);
                self.course.lessons[idx] = lesson;
                true
            }
            None => {
                warn!("update of unknown lesson {} ignored", lesson.id());
                false
            }
        };

        self.close_lesson_form();
        updated
    }

    pub fn delete_lesson(&mut self, id: LessonId) -> bool {
        let Some(idx) = self.course.position_of(id) else {
            warn!("delete of unknown lesson {} ignored", id);
            return false;
        };

        debug!("deleting lesson {} at {}", id, idx);
        self.course.lessons.remove(idx);
        if self.mode.editing() == Some(id) {
            self.close_lesson_form();
        }
        true
    }

    /// Whether [`Self::submit`] would hand the course over: a title and at least one
    /// lesson. Use this for the enabled state of any submit control as well.
    pub fn can_submit(&self) -> bool {
        !self.course.title.is_empty() && !self.course.lessons.is_empty()
    }

    /// Hands a snapshot of the course to the consumer. Does not reset the form.
    pub fn submit(&mut self) -> bool {
        if !self.can_submit() {
            debug!("submit ignored, course is incomplete");
            return false;
        }

        debug!(
            "submitting course '{}' with {} lessons",
            self.course.title,
            self.course.lessons.len()
        );
        self.on_submit.on_submit(self.course.clone());
        true
    }

    pub fn field_issues(&self) -> Vec<FieldIssue> {
        field_issues(&self.course, &self.limits)
    }

    /// Back to an empty course with the editor closed. Pending previews are dropped.
    pub fn reset(&mut self) {
        self.cancel_inflight();
        self.generation += 1;
        self.course = Course::default();
        self.mode = LessonFormMode::Closed;
        self.preview = PreviewState::Empty;
    }

    fn cancel_inflight(&mut self) {
        if let Some(token) = self.inflight.take() {
            token.cancel();
        }
    }
}

impl<S> Drop for CourseForm<S> {
    fn drop(&mut self) {
        if let Some(token) = self.inflight.take() {
            token.cancel();
        }
    }
}

#[cfg(test)]
mod test {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    type Submitted = Rc<RefCell<Vec<Course>>>;

    fn form() -> (CourseForm<impl FnMut(Course)>, Submitted) {
        let submitted: Submitted = Rc::default();
        let sink = submitted.clone();
        let form = CourseForm::new(move |c: Course| sink.borrow_mut().push(c));
        (form, submitted)
    }

    fn draft(title: &str) -> LessonDraft {
        LessonDraft::new(title, format!("http://x/{title}"))
    }

    fn titles(form: &CourseForm<impl OnSubmit>) -> Vec<&str> {
        form.course().lessons().iter().map(Lesson::title).collect()
    }

    #[test]
    fn starts_empty_and_closed() {
        let (form, _) = form();
        assert_eq!(form.course().title(), "");
        assert!(form.course().lessons().is_empty());
        assert!(form.course().image().is_none());
        assert_eq!(form.mode(), LessonFormMode::Closed);
        assert!(!form.show_lesson_form());
        assert!(!form.can_submit());
    }

    #[test]
    fn add_lesson_appends_with_distinct_ids() {
        let (mut form, _) = form();
        let ids: Vec<_> = (0..50).map(|i| form.add_lesson(draft(&i.to_string()))).collect();

        let mut unique = ids.clone();
        unique.sort_by_key(|id| id.as_uuid());
        unique.dedup();
        assert_eq!(unique.len(), 50);

        let stored: Vec<_> = form.course().lessons().iter().map(Lesson::id).collect();
        assert_eq!(stored, ids);
        assert_eq!(form.course().lessons()[3].title(), "3");
    }

    #[test]
    fn add_lesson_closes_creator() {
        let (mut form, _) = form();
        form.open_lesson_creator();
        assert_eq!(form.mode(), LessonFormMode::Creating);
        assert!(form.editing_lesson().is_none());

        form.add_lesson(draft("L1"));
        assert_eq!(form.mode(), LessonFormMode::Closed);
    }

    #[test]
    fn update_preserves_position() {
        let (mut form, _) = form();
        form.add_lesson(draft("a"));
        let b = form.add_lesson(draft("b"));
        form.add_lesson(draft("c"));

        assert!(form.open_lesson_editor(b));
        assert_eq!(form.editing_lesson().map(Lesson::title), Some("b"));
        assert!(form.show_lesson_form());

        let edited = form
            .editing_lesson()
            .cloned()
            .unwrap()
            .edited(draft("B").with_duration("3:00"));
        assert!(form.update_lesson(edited));

        assert_eq!(titles(&form), vec!["a", "B", "c"]);
        assert_eq!(form.course().lessons()[1].id(), b);
        assert!(!form.show_lesson_form());
        assert!(form.editing_lesson().is_none());
    }

    #[test]
    fn update_unknown_is_noop_but_closes() {
        let (mut form, _) = form();
        let a = form.add_lesson(draft("a"));
        let before = form.course().lessons().to_vec();

        let mut other = CourseForm::new(|_: Course| {});
        let stranger_id = other.add_lesson(draft("x"));
        let stranger = other.course().lesson(stranger_id).cloned().unwrap();

        form.open_lesson_editor(a);
        assert!(!form.update_lesson(stranger));
        assert_eq!(form.course().lessons(), before.as_slice());
        assert!(!form.show_lesson_form());
    }

    #[test]
    fn delete_removes_exactly_one() {
        let (mut form, _) = form();
        let a = form.add_lesson(draft("a"));
        form.add_lesson(draft("b"));

        assert!(form.delete_lesson(a));
        assert_eq!(titles(&form), vec!["b"]);

        assert!(!form.delete_lesson(a));
        assert_eq!(titles(&form), vec!["b"]);
    }

    #[test]
    fn deleting_edited_lesson_closes_editor() {
        let (mut form, _) = form();
        let a = form.add_lesson(draft("a"));
        let b = form.add_lesson(draft("b"));

        form.open_lesson_editor(a);
        form.delete_lesson(b);
        assert_eq!(form.mode(), LessonFormMode::Editing(a));

        form.delete_lesson(a);
        assert_eq!(form.mode(), LessonFormMode::Closed);
        assert!(form.editing_lesson().is_none());
    }

    #[test]
    fn open_editor_on_unknown_id_keeps_mode() {
        let (mut form, _) = form();
        let a = form.add_lesson(draft("a"));
        form.delete_lesson(a);
        form.open_lesson_creator();

        assert!(!form.open_lesson_editor(a));
        assert_eq!(form.mode(), LessonFormMode::Creating);
    }

    #[test]
    fn reopening_creator_drops_edit_linkage() {
        let (mut form, _) = form();
        let a = form.add_lesson(draft("a"));
        form.open_lesson_editor(a);
        form.open_lesson_creator();
        assert_eq!(form.mode(), LessonFormMode::Creating);
        assert!(form.editing_lesson().is_none());
    }

    #[test]
    fn submit_is_gated() {
        let (mut form, submitted) = form();
        assert!(!form.submit());

        form.set_title("Intro to Rust");
        assert!(!form.can_submit());
        assert!(!form.submit());

        form.add_lesson(draft("L1"));
        form.set_title("");
        assert!(!form.can_submit());
        assert!(!form.submit());
        assert!(submitted.borrow().is_empty());

        form.set_title("Intro to Rust");
        assert!(form.can_submit());
        assert!(form.submit());
        assert_eq!(submitted.borrow().len(), 1);

        // no reset after submit
        assert_eq!(form.course().title(), "Intro to Rust");
        assert!(form.submit());
        assert_eq!(submitted.borrow().len(), 2);
    }

    #[test]
    fn submitted_snapshot_is_detached() {
        let (mut form, submitted) = form();
        form.set_title("T");
        form.add_lesson(draft("L1"));
        form.submit();

        form.set_title("Changed");
        form.add_lesson(draft("L2"));

        let snapshot = &submitted.borrow()[0];
        assert_eq!(snapshot.title(), "T");
        assert_eq!(snapshot.lessons().len(), 1);
    }

    #[test]
    fn text_fields_are_verbatim() {
        let (mut form, _) = form();
        form.set_title("  a  ");
        form.set_description("x".repeat(2000));
        assert_eq!(form.course().title(), "  a  ");
        assert_eq!(form.course().description().len(), 2000);
        assert_eq!(
            form.field_issues(),
            vec![FieldIssue::DescriptionTooLong { max: 1000, actual: 2000 }]
        );
    }

    #[test]
    fn reset_clears_everything() {
        let (mut form, _) = form();
        form.set_title("T");
        let a = form.add_lesson(draft("a"));
        form.open_lesson_editor(a);
        let ticket = form.attach_image(Some(CourseImage::in_memory("c.png", vec![1u8]).unwrap()));

        form.reset();
        assert!(ticket.unwrap().is_cancelled());
        assert_eq!(form.course().title(), "");
        assert!(form.course().lessons().is_empty());
        assert!(form.course().image().is_none());
        assert_eq!(form.mode(), LessonFormMode::Closed);
        assert_eq!(form.preview_state(), &PreviewState::Empty);
    }
}
