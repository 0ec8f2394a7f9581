use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a lesson inside a course. Allocated by the course form, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LessonId(Uuid);

impl LessonId {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for LessonId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    id: LessonId,
    title: String,
    description: String,
    video_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    duration: Option<String>,
}

impl Lesson {
    pub(crate) fn from_draft(id: LessonId, draft: LessonDraft) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            video_url: draft.video_url,
            duration: draft.duration,
        }
    }

    pub fn id(&self) -> LessonId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn video_url(&self) -> &str {
        &self.video_url
    }

    pub fn duration_text(&self) -> Option<&str> {
        self.duration.as_deref()
    }

    /// Parsed `duration`, `None` when absent or not in `mm:ss` / `h:mm:ss` form.
    pub fn duration(&self) -> Option<TimeDelta> {
        self.duration.as_deref().and_then(parse_duration)
    }

    /// Same lesson (same id) carrying the fields of `draft`.
    pub fn edited(self, draft: LessonDraft) -> Self {
        Self::from_draft(self.id, draft)
    }

    pub fn to_draft(&self) -> LessonDraft {
        LessonDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            video_url: self.video_url.clone(),
            duration: self.duration.clone(),
        }
    }
}

/// Lesson fields as produced by a lesson editor, before an id is assigned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonDraft {
    title: String,
    #[serde(default)]
    description: String,
    video_url: String,
    #[serde(default)]
    duration: Option<String>,
}

impl LessonDraft {
    pub fn new<T: Into<String>, U: Into<String>>(title: T, video_url: U) -> Self {
        Self {
            title: title.into(),
            video_url: video_url.into(),
            ..Default::default()
        }
    }

    pub fn with_title<S: Into<String>>(mut self, title: S) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_duration<S: Into<String>>(mut self, duration: S) -> Self {
        self.duration = Some(duration.into());
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn video_url(&self) -> &str {
        &self.video_url
    }

    pub fn duration(&self) -> Option<&str> {
        self.duration.as_deref()
    }

    /// Names of the required fields that are still blank. Meant for lesson editors,
    /// the course form itself accepts any draft.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.title.trim().is_empty() {
            missing.push("title");
        }
        if self.video_url.trim().is_empty() {
            missing.push("video_url");
        }
        missing
    }
}

const MAX_DURATION_SECS: i64 = 1000 * 3600 - 1;

fn parse_duration(text: &str) -> Option<TimeDelta> {
    let parts = text
        .trim()
        .split(':')
        .map(|p| p.parse::<u32>().ok())
        .collect::<Option<Vec<_>>>()?;

    let (hours, minutes, seconds) = match parts.as_slice() {
        [m, s] => (0, *m, *s),
        [h, m, s] if *m < 60 => (*h, *m, *s),
        _ => return None,
    };
    if seconds >= 60 {
        return None;
    }

    let total = i64::from(hours) * 3600 + i64::from(minutes) * 60 + i64::from(seconds);
    if total > MAX_DURATION_SECS {
        return None;
    }
    TimeDelta::try_seconds(total)
}
