use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use coursekit::{Course, CourseForm, LessonDraft, LessonId};

pub type Submitted = Rc<RefCell<Vec<Course>>>;
pub type TestForm = CourseForm<Box<dyn FnMut(Course)>>;

pub fn recording_form() -> (TestForm, Submitted) {
    let submitted: Submitted = Rc::default();
    let sink = submitted.clone();
    let on_submit: Box<dyn FnMut(Course)> = Box::new(move |c| sink.borrow_mut().push(c));
    (CourseForm::new(on_submit), submitted)
}

pub fn draft(title: &str) -> LessonDraft {
    LessonDraft::new(title, format!("http://x/{title}"))
}

pub fn write_image(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

/// State shared between the steps of a [`Flow`].
pub struct FlowContext {
    pub form: TestForm,
    pub submitted: Submitted,
    ids: HashMap<&'static str, LessonId>, // lessons added by earlier steps
}

impl FlowContext {
    pub fn store(&mut self, key: &'static str, id: LessonId) {
        self.ids.insert(key, id);
    }

    pub fn id(&self, key: &str) -> LessonId {
        *self.ids.get(key).expect("missing lesson key")
    }

    pub fn titles(&self) -> Vec<String> {
        self.form
            .course()
            .lessons()
            .iter()
            .map(|l| l.title().to_string())
            .collect()
    }
}

pub struct Action {
    name: &'static str,
    run: Box<dyn FnOnce(&mut FlowContext)>,
}

impl Action {
    pub fn new<F>(name: &'static str, run: F) -> Self
    where
        F: FnOnce(&mut FlowContext) + 'static,
    {
        Self {
            name,
            run: Box::new(run),
        }
    }
}

pub struct Flow {
    actions: Vec<Action>,
}

impl Flow {
    pub fn new() -> Self {
        Self { actions: vec![] }
    }

    pub fn step(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    pub fn run(self) -> FlowContext {
        let (form, submitted) = recording_form();
        let mut ctx = FlowContext {
            form,
            submitted,
            ids: HashMap::new(),
        };

        for action in self.actions {
            println!("==> Running form action `{}`", action.name);
            (action.run)(&mut ctx);
        }
        ctx
    }
}

// Common actions builders

pub fn add_lesson_action(key: &'static str, title: &'static str) -> Action {
    Action::new("add_lesson", move |ctx| {
        ctx.form.open_lesson_creator();
        let id = ctx.form.add_lesson(draft(title));
        ctx.store(key, id);
    })
}

pub fn delete_lesson_action(key: &'static str) -> Action {
    Action::new("delete_lesson", move |ctx| {
        let id = ctx.id(key);
        ctx.form.delete_lesson(id);
    })
}

pub fn set_title_action(title: &'static str) -> Action {
    Action::new("set_title", move |ctx| ctx.form.set_title(title))
}
