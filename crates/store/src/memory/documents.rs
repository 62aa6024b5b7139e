//! `courses`, `enrollments` and `users` collections held in memory.

use std::cmp::Reverse;
use std::collections::HashMap;

use async_trait::async_trait;
use coursehub_core::types::{EntityId, Timestamp};
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::models::course::{Course, CoursePatch, CourseQuery, NewCourseDocument};
use crate::models::enrollment::{Enrollment, EnrollmentQuery, NewEnrollment};
use crate::models::profile::{ProfilePatch, UserProfile};
use crate::ports::{CourseStore, EnrollmentStore, ProfileStore};

/// One in-memory "database" implementing every document port.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    courses: RwLock<HashMap<EntityId, Course>>,
    enrollments: RwLock<HashMap<EntityId, Enrollment>>,
    profiles: RwLock<HashMap<EntityId, UserProfile>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CourseStore for MemoryDocumentStore {
    async fn insert(&self, doc: NewCourseDocument) -> Result<Course, StoreError> {
        let course = doc.into_course(EntityId::now_v7());
        self.courses
            .write()
            .await
            .insert(course.id, course.clone());
        Ok(course)
    }

    async fn get(&self, id: EntityId) -> Result<Option<Course>, StoreError> {
        Ok(self.courses.read().await.get(&id).cloned())
    }

    async fn list(&self, query: CourseQuery) -> Result<Vec<Course>, StoreError> {
        let mut courses: Vec<Course> = self
            .courses
            .read()
            .await
            .values()
            .filter(|c| query.created_by.map_or(true, |by| c.created_by == by))
            .cloned()
            .collect();
        courses.sort_by_key(|c| (Reverse(c.created_at), Reverse(c.id)));
        Ok(courses)
    }

    async fn patch(&self, id: EntityId, patch: CoursePatch) -> Result<Course, StoreError> {
        let mut courses = self.courses.write().await;
        let course = courses
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found("courses", id))?;
        patch.apply_to(course);
        Ok(course.clone())
    }

    async fn add_student(
        &self,
        id: EntityId,
        user_id: EntityId,
        now: Timestamp,
    ) -> Result<(), StoreError> {
        let mut courses = self.courses.write().await;
        let course = courses
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found("courses", id))?;
        if !course.enrolled_students.contains(&user_id) {
            course.enrolled_students.push(user_id);
        }
        course.updated_at = now;
        Ok(())
    }

    async fn remove_student(
        &self,
        id: EntityId,
        user_id: EntityId,
        now: Timestamp,
    ) -> Result<(), StoreError> {
        let mut courses = self.courses.write().await;
        let course = courses
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found("courses", id))?;
        course.enrolled_students.retain(|s| *s != user_id);
        course.updated_at = now;
        Ok(())
    }

    async fn delete(&self, id: EntityId) -> Result<(), StoreError> {
        self.courses.write().await.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl EnrollmentStore for MemoryDocumentStore {
    async fn insert(&self, doc: NewEnrollment) -> Result<Enrollment, StoreError> {
        let enrollment = doc.into_enrollment(EntityId::now_v7());
        self.enrollments
            .write()
            .await
            .insert(enrollment.id, enrollment.clone());
        Ok(enrollment)
    }

    async fn list(&self, query: EnrollmentQuery) -> Result<Vec<Enrollment>, StoreError> {
        let mut enrollments: Vec<Enrollment> = self
            .enrollments
            .read()
            .await
            .values()
            .filter(|e| query.matches(e))
            .cloned()
            .collect();
        enrollments.sort_by_key(|e| (Reverse(e.enrolled_at), Reverse(e.id)));
        Ok(enrollments)
    }

    async fn delete(&self, id: EntityId) -> Result<(), StoreError> {
        self.enrollments.write().await.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl ProfileStore for MemoryDocumentStore {
    async fn get(&self, uid: EntityId) -> Result<Option<UserProfile>, StoreError> {
        Ok(self.profiles.read().await.get(&uid).cloned())
    }

    async fn merge(&self, uid: EntityId, patch: ProfilePatch) -> Result<UserProfile, StoreError> {
        let mut profiles = self.profiles.write().await;
        let profile = profiles
            .entry(uid)
            .or_insert_with(|| UserProfile::empty(uid));
        patch.apply_to(profile);
        Ok(profile.clone())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use coursehub_core::course::CourseLevel;
    use coursehub_core::roles::Role;

    use super::*;

    fn doc(created_by: EntityId, created_at: Timestamp) -> NewCourseDocument {
        NewCourseDocument {
            title: "Course".into(),
            description: "A course description".into(),
            instructor: "Someone".into(),
            duration: "1 week".into(),
            level: CourseLevel::Intermediate,
            category: "General".into(),
            price: 0.0,
            max_students: 10,
            start_date: created_at.date_naive(),
            end_date: created_at.date_naive(),
            materials: vec![],
            enrolled_students: vec![],
            is_active: true,
            created_by,
            created_at,
            updated_at: created_at,
        }
    }

    #[tokio::test]
    async fn list_orders_newest_first_and_filters_by_creator() {
        let store = MemoryDocumentStore::new();
        let alice = EntityId::new_v4();
        let bob = EntityId::new_v4();
        let t0 = Utc::now();

        let old = CourseStore::insert(&store, doc(alice, t0)).await.unwrap();
        let new = CourseStore::insert(&store, doc(alice, t0 + Duration::seconds(1)))
            .await
            .unwrap();
        CourseStore::insert(&store, doc(bob, t0 + Duration::seconds(2)))
            .await
            .unwrap();

        let mine = CourseStore::list(&store, CourseQuery::by_creator(alice))
            .await
            .unwrap();
        let ids: Vec<_> = mine.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![new.id, old.id]);

        let all = CourseStore::list(&store, CourseQuery::all()).await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].created_by, bob);
    }

    #[tokio::test]
    async fn patch_missing_course_is_not_found() {
        let store = MemoryDocumentStore::new();
        let result = store
            .patch(EntityId::new_v4(), CoursePatch::touch(Utc::now()))
            .await;
        assert!(matches!(result, Err(StoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn membership_updates_are_set_operations() {
        let store = MemoryDocumentStore::new();
        let course = CourseStore::insert(&store, doc(EntityId::new_v4(), Utc::now()))
            .await
            .unwrap();
        let student = EntityId::new_v4();

        store.add_student(course.id, student, Utc::now()).await.unwrap();
        store.add_student(course.id, student, Utc::now()).await.unwrap();
        let stored = CourseStore::get(&store, course.id).await.unwrap().unwrap();
        assert_eq!(stored.enrolled_students, vec![student]);

        store.remove_student(course.id, student, Utc::now()).await.unwrap();
        store.remove_student(course.id, student, Utc::now()).await.unwrap();
        let stored = CourseStore::get(&store, course.id).await.unwrap().unwrap();
        assert!(stored.enrolled_students.is_empty());
    }

    #[tokio::test]
    async fn profile_merge_upserts_and_keeps_unset_fields() {
        let store = MemoryDocumentStore::new();
        let uid = EntityId::new_v4();

        let created = store
            .merge(
                uid,
                ProfilePatch {
                    email: Some("a@example.com".into()),
                    display_name: Some("Ada".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(created.role, Role::Student);

        let merged = store
            .merge(
                uid,
                ProfilePatch {
                    photo_url: Some("https://img/a.png".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(merged.email, "a@example.com");
        assert_eq!(merged.display_name.as_deref(), Some("Ada"));
        assert_eq!(merged.photo_url.as_deref(), Some("https://img/a.png"));
    }
}
