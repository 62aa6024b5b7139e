//! Shared fixtures for the store integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use coursehub_core::course::{CourseLevel, FormNumber};
use coursehub_core::types::{EntityId, Timestamp};
use coursehub_store::memory::{MemoryDocumentStore, MemoryIdentityStore, MemoryObjectStorage};
use coursehub_store::models::course::{
    Course, CoursePatch, CourseQuery, CreateCourse, NewCourseDocument,
};
use coursehub_store::models::media::{MediaUpload, ObjectPath};
use coursehub_store::ports::{CourseStore, ObjectStorage};
use coursehub_store::repositories::CourseRepo;
use coursehub_store::session::{SessionContext, SessionStores};
use coursehub_store::StoreError;
use mockable::Clock;

/// A clock that moves forward one second every time it is read, so
/// documents created in sequence get strictly increasing timestamps.
pub struct SteppingClock(Mutex<DateTime<Utc>>);

impl SteppingClock {
    pub fn new() -> Self {
        let start = match Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).single() {
            Some(start) => start,
            None => panic!("fixture start time"),
        };
        Self(Mutex::new(start))
    }

    pub fn peek(&self) -> Timestamp {
        *self.0.lock().unwrap()
    }
}

impl Clock for SteppingClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        let mut now = self.0.lock().unwrap();
        *now += TimeDelta::seconds(1);
        *now
    }
}

/// Repository wired to fresh in-memory stores.
pub struct Harness {
    pub docs: Arc<MemoryDocumentStore>,
    pub objects: Arc<MemoryObjectStorage>,
    pub clock: Arc<SteppingClock>,
    pub repo: CourseRepo,
}

impl Harness {
    pub fn new() -> Self {
        let docs = Arc::new(MemoryDocumentStore::new());
        let objects = Arc::new(MemoryObjectStorage::new());
        let clock = Arc::new(SteppingClock::new());
        let repo = CourseRepo::new(docs.clone(), docs.clone(), objects.clone(), clock.clone());
        Self {
            docs,
            objects,
            clock,
            repo,
        }
    }

    /// A repository over the same stores but with substituted courses/objects.
    pub fn with(
        &self,
        courses: Arc<dyn CourseStore>,
        objects: Arc<dyn ObjectStorage>,
    ) -> CourseRepo {
        CourseRepo::new(courses, self.docs.clone(), objects, self.clock.clone())
    }

    pub async fn course(&self, id: EntityId) -> Course {
        match self.repo.get_by_id(id).await.unwrap() {
            Some(course) => course,
            None => panic!("course {id} should exist"),
        }
    }
}

pub fn course_form(title: &str) -> CreateCourse {
    CreateCourse {
        title: title.into(),
        description: "A thorough introduction to the subject".into(),
        instructor: "Grace Hopper".into(),
        duration: "8 weeks".into(),
        level: CourseLevel::Beginner,
        category: "Programming".into(),
        price: FormNumber::from("49.99"),
        max_students: FormNumber::from("25"),
        start_date: "2025-04-01".into(),
        end_date: "2025-05-27".into(),
        materials: "Slides, Exercises,,  Reading list ".into(),
    }
}

pub fn session_stores() -> (SessionStores, Arc<MemoryDocumentStore>, Arc<MemoryObjectStorage>) {
    let docs = Arc::new(MemoryDocumentStore::new());
    let objects = Arc::new(MemoryObjectStorage::new());
    let stores = SessionStores {
        identities: Arc::new(MemoryIdentityStore::new()),
        profiles: docs.clone(),
        objects: objects.clone(),
        clock: Arc::new(SteppingClock::new()),
    };
    (stores, docs, objects)
}

pub fn session() -> (SessionContext, Arc<MemoryDocumentStore>, Arc<MemoryObjectStorage>) {
    let (stores, docs, objects) = session_stores();
    (SessionContext::new(stores), docs, objects)
}

pub fn png(bytes: &[u8]) -> MediaUpload {
    MediaUpload::new(bytes.to_vec(), Some("image/png"))
}

/// Course store whose `delete` always fails; everything else passes through.
pub struct UndeletableCourses(pub Arc<MemoryDocumentStore>);

#[async_trait]
impl CourseStore for UndeletableCourses {
    async fn insert(&self, doc: NewCourseDocument) -> Result<Course, StoreError> {
        CourseStore::insert(self.0.as_ref(), doc).await
    }

    async fn get(&self, id: EntityId) -> Result<Option<Course>, StoreError> {
        CourseStore::get(self.0.as_ref(), id).await
    }

    async fn list(&self, query: CourseQuery) -> Result<Vec<Course>, StoreError> {
        CourseStore::list(self.0.as_ref(), query).await
    }

    async fn patch(&self, id: EntityId, patch: CoursePatch) -> Result<Course, StoreError> {
        self.0.patch(id, patch).await
    }

    async fn add_student(
        &self,
        id: EntityId,
        user_id: EntityId,
        now: Timestamp,
    ) -> Result<(), StoreError> {
        self.0.add_student(id, user_id, now).await
    }

    async fn remove_student(
        &self,
        id: EntityId,
        user_id: EntityId,
        now: Timestamp,
    ) -> Result<(), StoreError> {
        self.0.remove_student(id, user_id, now).await
    }

    async fn delete(&self, _id: EntityId) -> Result<(), StoreError> {
        Err(StoreError::PermissionDenied("courses are read-only".into()))
    }
}

/// Object storage that accepts writes but fails every delete.
pub struct StickyObjects(pub Arc<MemoryObjectStorage>);

#[async_trait]
impl ObjectStorage for StickyObjects {
    async fn put(&self, path: &ObjectPath, upload: MediaUpload) -> Result<String, StoreError> {
        self.0.put(path, upload).await
    }

    async fn delete(&self, _path: &ObjectPath) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("object storage offline".into()))
    }

    async fn url(&self, path: &ObjectPath) -> Result<Option<String>, StoreError> {
        self.0.url(path).await
    }
}
