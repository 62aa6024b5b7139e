mod common;

use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::NaiveDate;
use coursehub_core::course::{CourseLevel, FormNumber};
use coursehub_core::error::CoreError;
use coursehub_core::types::EntityId;
use coursehub_store::models::course::UpdateCourse;
use coursehub_store::models::enrollment::{EnrollmentQuery, NewEnrollment};
use coursehub_store::models::media::{MediaSlot, ObjectPath};
use coursehub_store::ports::{CourseStore, EnrollmentStore, ObjectStorage};
use coursehub_store::{RepositoryError, StoreError};

use common::{course_form, png, Harness, StickyObjects, UndeletableCourses};

// ---------------------------------------------------------------------------
// create / read / update
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_then_get_applies_form_coercions() {
    let h = Harness::new();
    let admin = EntityId::new_v4();

    let id = h.repo.create(&course_form("Intro to Rust"), admin).await.unwrap();
    let course = h.course(id).await;

    assert_eq!(course.title, "Intro to Rust");
    assert_eq!(course.price, 49.99);
    assert_eq!(course.max_students, 25);
    assert_eq!(course.level, CourseLevel::Beginner);
    assert_eq!(course.materials, vec!["Slides", "Exercises", "Reading list"]);
    assert_eq!(course.start_date, NaiveDate::from_ymd_opt(2025, 4, 1).unwrap());
    assert_eq!(course.end_date, NaiveDate::from_ymd_opt(2025, 5, 27).unwrap());
    assert!(course.enrolled_students.is_empty());
    assert!(course.is_active);
    assert_eq!(course.created_by, admin);
    assert_eq!(course.created_at, course.updated_at);
    assert_eq!(course.image_url, None);
}

#[tokio::test]
async fn create_accepts_numeric_fields_as_numbers() {
    let h = Harness::new();
    let mut form = course_form("Numbers");
    form.price = FormNumber::from(0.0);
    form.max_students = FormNumber::from(1.0);

    let id = h.repo.create(&form, EntityId::new_v4()).await.unwrap();
    let course = h.course(id).await;
    assert_eq!(course.price, 0.0);
    assert_eq!(course.max_students, 1);
}

#[tokio::test]
async fn identical_titles_are_allowed() {
    let h = Harness::new();
    let admin = EntityId::new_v4();
    let a = h.repo.create(&course_form("Same"), admin).await.unwrap();
    let b = h.repo.create(&course_form("Same"), admin).await.unwrap();
    assert_ne!(a, b);
    assert_eq!(h.repo.list_all().await.unwrap().len(), 2);
}

#[tokio::test]
async fn create_rejects_invalid_form_before_touching_the_store() {
    let h = Harness::new();
    let mut form = course_form("Go");
    form.max_students = FormNumber::from("0");

    let err = h.repo.create(&form, EntityId::new_v4()).await.unwrap_err();
    assert_matches!(err, RepositoryError::Input(CoreError::Validation(_)));
    assert!(h.repo.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn create_rejects_negative_price() {
    let h = Harness::new();
    let mut form = course_form("Negative price");
    form.price = FormNumber::from("-5");

    let err = h.repo.create(&form, EntityId::new_v4()).await.unwrap_err();
    assert_matches!(err, RepositoryError::Input(CoreError::Validation(_)));
}

#[tokio::test]
async fn get_missing_course_is_absent_not_an_error() {
    let h = Harness::new();
    assert_eq!(h.repo.get_by_id(EntityId::new_v4()).await.unwrap(), None);
}

#[tokio::test]
async fn update_changes_only_given_fields_and_updated_at() {
    let h = Harness::new();
    let id = h.repo.create(&course_form("Old title"), EntityId::new_v4()).await.unwrap();
    let before = h.course(id).await;

    let input = UpdateCourse {
        title: Some("New title".into()),
        ..UpdateCourse::default()
    };
    let after = h.repo.update(id, &input).await.unwrap();

    assert_eq!(after.title, "New title");
    assert!(after.updated_at > before.updated_at);

    let mut expected = before.clone();
    expected.title = "New title".into();
    expected.updated_at = after.updated_at;
    assert_eq!(after, expected);
    assert_eq!(h.course(id).await, expected);
}

#[tokio::test]
async fn update_coerces_numbers_and_materials() {
    let h = Harness::new();
    let id = h.repo.create(&course_form("Coerce"), EntityId::new_v4()).await.unwrap();

    let input = UpdateCourse {
        price: Some(FormNumber::from("10")),
        max_students: Some(FormNumber::from("3")),
        materials: Some(" a ,b,, ".into()),
        is_active: Some(false),
        ..UpdateCourse::default()
    };
    let course = h.repo.update(id, &input).await.unwrap();

    assert_eq!(course.price, 10.0);
    assert_eq!(course.max_students, 3);
    assert_eq!(course.materials, vec!["a", "b"]);
    assert!(!course.is_active);
}

#[tokio::test]
async fn update_missing_course_fails_with_store_not_found() {
    let h = Harness::new();
    let input = UpdateCourse {
        title: Some("Ghost".into()),
        ..UpdateCourse::default()
    };
    let err = h.repo.update(EntityId::new_v4(), &input).await.unwrap_err();
    assert_matches!(err, RepositoryError::Store(StoreError::NotFound { .. }));
}

// ---------------------------------------------------------------------------
// listing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_by_instructor_filters_and_orders_newest_first() {
    let h = Harness::new();
    let alice = EntityId::new_v4();
    let bob = EntityId::new_v4();

    let first = h.repo.create(&course_form("Alice 1"), alice).await.unwrap();
    h.repo.create(&course_form("Bob 1"), bob).await.unwrap();
    let second = h.repo.create(&course_form("Alice 2"), alice).await.unwrap();

    let ids: Vec<EntityId> = h
        .repo
        .list_by_instructor(alice)
        .await
        .unwrap()
        .iter()
        .map(|c| c.id)
        .collect();
    assert_eq!(ids, vec![second, first]);
}

#[tokio::test]
async fn list_all_includes_inactive_courses() {
    let h = Harness::new();
    let id = h.repo.create(&course_form("Archived"), EntityId::new_v4()).await.unwrap();
    h.repo
        .update(
            id,
            &UpdateCourse {
                is_active: Some(false),
                ..UpdateCourse::default()
            },
        )
        .await
        .unwrap();
    h.repo.create(&course_form("Live"), EntityId::new_v4()).await.unwrap();

    let all = h.repo.list_all().await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].title, "Live");
    assert!(!all[1].is_active);
}

// ---------------------------------------------------------------------------
// enrollment
// ---------------------------------------------------------------------------

#[tokio::test]
async fn repeated_enroll_keeps_one_member_and_one_enrollment() {
    let h = Harness::new();
    let course_id = h.repo.create(&course_form("Enroll"), EntityId::new_v4()).await.unwrap();
    let student = EntityId::new_v4();

    let first = h.repo.enroll(course_id, student).await.unwrap();
    let second = h.repo.enroll(course_id, student).await.unwrap();
    h.repo.enroll(course_id, student).await.unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(first.progress, 0);
    assert!(!first.completed);
    assert_eq!(h.course(course_id).await.enrolled_students, vec![student]);
    assert_eq!(
        h.repo.list_enrollments_by_user(student).await.unwrap().len(),
        1
    );
}

#[tokio::test]
async fn raw_enrollment_inserts_are_not_deduplicated_by_the_memory_store() {
    // Only the repository guards the (user, course) pair; the document store
    // accepts duplicates like any schemaless collection.
    let h = Harness::new();
    let course_id = EntityId::new_v4();
    let student = EntityId::new_v4();
    let now = h.clock.peek();

    EnrollmentStore::insert(h.docs.as_ref(), NewEnrollment::started(student, course_id, now))
        .await
        .unwrap();
    EnrollmentStore::insert(h.docs.as_ref(), NewEnrollment::started(student, course_id, now))
        .await
        .unwrap();

    let pair = EnrollmentStore::list(h.docs.as_ref(), EnrollmentQuery::by_pair(student, course_id))
        .await
        .unwrap();
    assert_eq!(pair.len(), 2);
}

#[tokio::test]
async fn enroll_into_missing_course_fails() {
    let h = Harness::new();
    let err = h
        .repo
        .enroll(EntityId::new_v4(), EntityId::new_v4())
        .await
        .unwrap_err();
    assert_matches!(err, RepositoryError::Store(StoreError::NotFound { .. }));
}

#[tokio::test]
async fn unenroll_removes_membership_and_every_matching_enrollment() {
    let h = Harness::new();
    let course_id = h.repo.create(&course_form("Leave"), EntityId::new_v4()).await.unwrap();
    let student = EntityId::new_v4();
    let other = EntityId::new_v4();

    h.repo.enroll(course_id, student).await.unwrap();
    h.repo.enroll(course_id, other).await.unwrap();
    // A stray duplicate written by an older client.
    EnrollmentStore::insert(
        h.docs.as_ref(),
        NewEnrollment::started(student, course_id, h.clock.peek()),
    )
    .await
    .unwrap();

    let removed = h.repo.unenroll(course_id, student).await.unwrap();

    assert_eq!(removed, 2);
    assert_eq!(h.course(course_id).await.enrolled_students, vec![other]);
    assert!(h.repo.list_enrollments_by_user(student).await.unwrap().is_empty());
    assert_eq!(h.repo.list_enrollments_by_user(other).await.unwrap().len(), 1);
}

#[tokio::test]
async fn unenroll_non_member_is_a_no_op() {
    let h = Harness::new();
    let course_id = h.repo.create(&course_form("Noop"), EntityId::new_v4()).await.unwrap();
    let member = EntityId::new_v4();
    h.repo.enroll(course_id, member).await.unwrap();

    let removed = h.repo.unenroll(course_id, EntityId::new_v4()).await.unwrap();

    assert_eq!(removed, 0);
    assert_eq!(h.course(course_id).await.enrolled_students, vec![member]);
}

#[tokio::test]
async fn capacity_is_advisory_in_the_repository() {
    let h = Harness::new();
    let mut form = course_form("Tiny");
    form.max_students = FormNumber::from("1");
    let course_id = h.repo.create(&form, EntityId::new_v4()).await.unwrap();
    let a = EntityId::new_v4();
    let b = EntityId::new_v4();

    h.repo.enroll(course_id, a).await.unwrap();
    assert!(!h.course(course_id).await.has_capacity());
    h.repo.enroll(course_id, b).await.unwrap();

    let course = h.course(course_id).await;
    assert_eq!(course.enrolled_students, vec![a, b]);
    assert!(course.enrolled_students.len() > course.max_students as usize);
}

#[tokio::test]
async fn enrollments_by_user_are_newest_first() {
    let h = Harness::new();
    let admin = EntityId::new_v4();
    let student = EntityId::new_v4();
    let c1 = h.repo.create(&course_form("One"), admin).await.unwrap();
    let c2 = h.repo.create(&course_form("Two"), admin).await.unwrap();

    h.repo.enroll(c1, student).await.unwrap();
    h.repo.enroll(c2, student).await.unwrap();

    let courses: Vec<EntityId> = h
        .repo
        .list_enrollments_by_user(student)
        .await
        .unwrap()
        .iter()
        .map(|e| e.course_id)
        .collect();
    assert_eq!(courses, vec![c2, c1]);
}

#[tokio::test]
async fn enrolled_courses_skip_deleted_courses() {
    let h = Harness::new();
    let admin = EntityId::new_v4();
    let student = EntityId::new_v4();
    let kept = h.repo.create(&course_form("Kept"), admin).await.unwrap();
    let gone = h.repo.create(&course_form("Gone"), admin).await.unwrap();
    h.repo.enroll(kept, student).await.unwrap();
    h.repo.enroll(gone, student).await.unwrap();

    // Remove only the course document, leaving its enrollment behind.
    CourseStore::delete(h.docs.as_ref(), gone).await.unwrap();

    let joined = h.repo.list_enrolled_courses(student).await.unwrap();
    assert_eq!(joined.len(), 1);
    assert_eq!(joined[0].course.id, kept);
    assert_eq!(joined[0].enrollment.course_id, kept);
}

// ---------------------------------------------------------------------------
// media
// ---------------------------------------------------------------------------

#[tokio::test]
async fn upload_image_sets_retrievable_url() {
    let h = Harness::new();
    let id = h.repo.create(&course_form("Media"), EntityId::new_v4()).await.unwrap();

    let url = h.repo.upload_image(id, png(b"cover")).await.unwrap();

    let course = h.course(id).await;
    assert_eq!(course.image_url.as_deref(), Some(url.as_str()));
    assert!(course.updated_at > course.created_at);
    assert_eq!(h.objects.fetch(&url).await.unwrap().bytes, b"cover");
}

#[tokio::test]
async fn reupload_overwrites_previous_object() {
    let h = Harness::new();
    let id = h.repo.create(&course_form("Media"), EntityId::new_v4()).await.unwrap();

    let old = h.repo.upload_video(id, png(b"v1")).await.unwrap();
    let new = h.repo.upload_video(id, png(b"v2")).await.unwrap();

    assert_ne!(old, new);
    assert!(h.objects.fetch(&old).await.is_none());
    assert_eq!(h.objects.fetch(&new).await.unwrap().bytes, b"v2");
    assert_eq!(h.course(id).await.video_url.as_deref(), Some(new.as_str()));
    assert_eq!(h.objects.len().await, 1);
}

// ---------------------------------------------------------------------------
// delete cascade
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delete_removes_course_enrollments_and_media() {
    let h = Harness::new();
    let admin = EntityId::new_v4();
    let id = h.repo.create(&course_form("Doomed"), admin).await.unwrap();
    let other = h.repo.create(&course_form("Survivor"), admin).await.unwrap();
    let student = EntityId::new_v4();
    h.repo.upload_image(id, png(b"img")).await.unwrap();
    h.repo.enroll(id, student).await.unwrap();
    h.repo.enroll(id, EntityId::new_v4()).await.unwrap();
    h.repo.enroll(other, student).await.unwrap();

    let report = h.repo.delete(id).await.unwrap();

    assert!(report.image_removed);
    assert!(!report.video_removed);
    assert_eq!(report.enrollments_removed, 2);
    assert_eq!(h.repo.get_by_id(id).await.unwrap(), None);
    let remaining = EnrollmentStore::list(h.docs.as_ref(), EnrollmentQuery::by_course(id))
        .await
        .unwrap();
    assert!(remaining.is_empty());
    assert_eq!(
        h.objects
            .url(&ObjectPath::course_media(id, MediaSlot::Image))
            .await
            .unwrap(),
        None
    );
    assert_eq!(h.repo.list_enrollments_by_user(student).await.unwrap().len(), 1);
}

#[tokio::test]
async fn delete_continues_when_media_removal_fails() {
    let h = Harness::new();
    let id = h.repo.create(&course_form("Sticky"), EntityId::new_v4()).await.unwrap();
    h.repo.upload_image(id, png(b"img")).await.unwrap();
    let repo = h.with(h.docs.clone(), Arc::new(StickyObjects(h.objects.clone())));

    let report = repo.delete(id).await.unwrap();

    assert!(!report.image_removed);
    assert_eq!(h.repo.get_by_id(id).await.unwrap(), None);
    // The orphaned object stays behind.
    assert_eq!(h.objects.len().await, 1);
}

#[tokio::test]
async fn failed_course_delete_propagates_without_restoring_children() {
    let h = Harness::new();
    let id = h.repo.create(&course_form("Half"), EntityId::new_v4()).await.unwrap();
    let student = EntityId::new_v4();
    h.repo.enroll(id, student).await.unwrap();
    let repo = h.with(
        Arc::new(UndeletableCourses(h.docs.clone())),
        h.objects.clone(),
    );

    let err = repo.delete(id).await.unwrap_err();

    assert_matches!(err, RepositoryError::Store(StoreError::PermissionDenied(_)));
    // Course still present, its enrollments already gone.
    assert_eq!(h.course(id).await.enrolled_students, vec![student]);
    assert!(h.repo.list_enrollments_by_user(student).await.unwrap().is_empty());
}

#[tokio::test]
async fn deleting_a_missing_course_succeeds_with_empty_report() {
    let h = Harness::new();
    let report = h.repo.delete(EntityId::new_v4()).await.unwrap();
    assert!(!report.image_removed);
    assert!(!report.video_removed);
    assert_eq!(report.enrollments_removed, 0);
}
