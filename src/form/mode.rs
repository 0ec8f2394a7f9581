use crate::model::entity::LessonId;

/// What the lesson editor is currently doing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LessonFormMode {
    #[default]
    Closed,
    Creating,
    Editing(LessonId),
}

impl LessonFormMode {
    pub fn is_open(&self) -> bool {
        !matches!(self, Self::Closed)
    }

    pub fn editing(&self) -> Option<LessonId> {
        match self {
            Self::Editing(id) => Some(*id),
            _ => None,
        }
    }
}
