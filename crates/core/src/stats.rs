//! Dashboard statistics for instructors and students.

use serde::Serialize;

/// The parts of a course that instructor statistics depend on.
#[derive(Debug, Clone, Copy)]
pub struct CourseSummary {
    pub enrolled: usize,
    pub is_active: bool,
}

/// The parts of an enrollment that student statistics depend on.
#[derive(Debug, Clone, Copy)]
pub struct EnrollmentSummary {
    pub progress: u8,
    pub completed: bool,
}

/// Aggregates over the courses an admin created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstructorStats {
    pub total_courses: usize,
    pub active_courses: usize,
    pub total_students: usize,
    pub avg_enrollment: usize,
}

impl InstructorStats {
    pub fn from_courses(courses: impl IntoIterator<Item = CourseSummary>) -> Self {
        let mut total_courses = 0;
        let mut active_courses = 0;
        let mut total_students = 0;
        for course in courses {
            total_courses += 1;
            total_students += course.enrolled;
            if course.is_active {
                active_courses += 1;
            }
        }
        Self {
            total_courses,
            active_courses,
            total_students,
            avg_enrollment: rounded_mean(total_students, total_courses),
        }
    }
}

/// Aggregates over a student's enrollments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentStats {
    pub enrolled_courses: usize,
    pub completed_courses: usize,
    pub avg_progress: usize,
    pub active_learning: usize,
}

impl StudentStats {
    pub fn from_enrollments(enrollments: impl IntoIterator<Item = EnrollmentSummary>) -> Self {
        let mut enrolled_courses = 0;
        let mut completed_courses = 0;
        let mut total_progress = 0usize;
        for enrollment in enrollments {
            enrolled_courses += 1;
            total_progress += usize::from(enrollment.progress);
            if enrollment.completed {
                completed_courses += 1;
            }
        }
        Self {
            enrolled_courses,
            completed_courses,
            avg_progress: rounded_mean(total_progress, enrolled_courses),
            active_learning: enrolled_courses - completed_courses,
        }
    }
}

/// Mean rounded half-up; zero when there is nothing to average.
fn rounded_mean(sum: usize, count: usize) -> usize {
    if count == 0 {
        0
    } else {
        (2 * sum + count) / (2 * count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(enrolled: usize, is_active: bool) -> CourseSummary {
        CourseSummary { enrolled, is_active }
    }

    fn enrollment(progress: u8, completed: bool) -> EnrollmentSummary {
        EnrollmentSummary { progress, completed }
    }

    #[test]
    fn instructor_stats_over_no_courses_are_zero() {
        let stats = InstructorStats::from_courses(Vec::<CourseSummary>::new());
        assert_eq!(stats.total_courses, 0);
        assert_eq!(stats.avg_enrollment, 0);
    }

    #[test]
    fn instructor_stats_count_active_and_students() {
        let stats = InstructorStats::from_courses([
            course(3, true),
            course(0, false),
            course(2, true),
        ]);
        assert_eq!(stats.total_courses, 3);
        assert_eq!(stats.active_courses, 2);
        assert_eq!(stats.total_students, 5);
        // 5 / 3 = 1.67 -> 2
        assert_eq!(stats.avg_enrollment, 2);
    }

    #[test]
    fn averages_round_half_up() {
        // 5 / 2 = 2.5 -> 3
        let stats = InstructorStats::from_courses([course(5, true), course(0, true)]);
        assert_eq!(stats.avg_enrollment, 3);
    }

    #[test]
    fn student_stats_track_completion_and_progress() {
        let stats = StudentStats::from_enrollments([
            enrollment(100, true),
            enrollment(25, false),
            enrollment(0, false),
        ]);
        assert_eq!(stats.enrolled_courses, 3);
        assert_eq!(stats.completed_courses, 1);
        assert_eq!(stats.active_learning, 2);
        // 125 / 3 = 41.67 -> 42
        assert_eq!(stats.avg_progress, 42);
    }

    #[test]
    fn student_stats_without_enrollments_are_zero() {
        let stats = StudentStats::from_enrollments(Vec::<EnrollmentSummary>::new());
        assert_eq!(stats.avg_progress, 0);
        assert_eq!(stats.active_learning, 0);
    }
}
