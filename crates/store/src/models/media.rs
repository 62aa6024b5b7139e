//! Object storage paths and upload payloads.

use coursehub_core::types::EntityId;

/// Fixed media slots on a course. Each slot holds at most one object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaSlot {
    Image,
    Video,
}

impl MediaSlot {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
        }
    }
}

/// Path of a binary object in object storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectPath(String);

impl ObjectPath {
    /// `courses/{course_id}/{image|video}`
    pub fn course_media(course_id: EntityId, slot: MediaSlot) -> Self {
        Self(format!("courses/{course_id}/{}", slot.as_str()))
    }

    /// `users/{uid}/profile`
    pub fn profile_photo(uid: EntityId) -> Self {
        Self(format!("users/{uid}/profile"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ObjectPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A binary payload to store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaUpload {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

impl MediaUpload {
    pub fn new(bytes: impl Into<Vec<u8>>, content_type: Option<&str>) -> Self {
        Self {
            bytes: bytes.into(),
            content_type: content_type.map(str::to_string),
        }
    }
}
