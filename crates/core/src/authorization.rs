//! Route-level authorization gate.
//!
//! [`authorize`] is a pure function of the current identity, the current
//! profile's role and the view's [`Requirement`]. It is evaluated on every
//! request/navigation and its result is never cached.

use serde::Serialize;

use crate::roles::Role;
use crate::types::EntityId;

/// What a view demands of the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Public,
    Authenticated,
    Role(Role),
}

/// Outcome of evaluating the gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", content = "route", rename_all = "snake_case")]
pub enum AccessDecision {
    Allow,
    RedirectTo(AppRoute),
}

/// Decide whether a view may render.
///
/// - no identity and the view is not public: redirect to [`AppRoute::Login`]
/// - identity present but the required role is missing (or the profile has
///   not been loaded): redirect to [`AppRoute::Dashboard`]
pub fn authorize(
    identity: Option<EntityId>,
    role: Option<Role>,
    required: Requirement,
) -> AccessDecision {
    match required {
        Requirement::Public => AccessDecision::Allow,
        Requirement::Authenticated if identity.is_some() => AccessDecision::Allow,
        Requirement::Role(needed) if identity.is_some() => {
            if role == Some(needed) {
                AccessDecision::Allow
            } else {
                AccessDecision::RedirectTo(AppRoute::Dashboard)
            }
        }
        _ => AccessDecision::RedirectTo(AppRoute::Login),
    }
}

// ---------------------------------------------------------------------------
// Route table
// ---------------------------------------------------------------------------

/// Views of the application and the gate requirement of each.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AppRoute {
    GetStarted,
    Login,
    Signup,
    Dashboard,
    Courses,
    CourseDetail(EntityId),
    Profile,
    ManageCourses,
    CreateCourse,
    EditCourse(EntityId),
}

impl AppRoute {
    /// Resolve a browser path. Unknown paths fall back to the dashboard.
    pub fn resolve(path: &str) -> Self {
        let segments: Vec<&str> = path
            .split('?')
            .next()
            .unwrap_or_default()
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        match segments.as_slice() {
            [] => Self::GetStarted,
            ["login"] => Self::Login,
            ["signup"] => Self::Signup,
            ["dashboard"] => Self::Dashboard,
            ["courses"] => Self::Courses,
            ["courses", id] => id
                .parse()
                .map(Self::CourseDetail)
                .unwrap_or(Self::Dashboard),
            ["profile"] => Self::Profile,
            ["admin", "courses"] => Self::ManageCourses,
            ["admin", "courses", "create"] => Self::CreateCourse,
            ["admin", "courses", id, "edit"] => id
                .parse()
                .map(Self::EditCourse)
                .unwrap_or(Self::Dashboard),
            _ => Self::Dashboard,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Self::GetStarted => "/".into(),
            Self::Login => "/login".into(),
            Self::Signup => "/signup".into(),
            Self::Dashboard => "/dashboard".into(),
            Self::Courses => "/courses".into(),
            Self::CourseDetail(id) => format!("/courses/{id}"),
            Self::Profile => "/profile".into(),
            Self::ManageCourses => "/admin/courses".into(),
            Self::CreateCourse => "/admin/courses/create".into(),
            Self::EditCourse(id) => format!("/admin/courses/{id}/edit"),
        }
    }

    pub fn requirement(&self) -> Requirement {
        match self {
            Self::GetStarted | Self::Login | Self::Signup => Requirement::Public,
            Self::Dashboard | Self::Courses | Self::CourseDetail(_) | Self::Profile => {
                Requirement::Authenticated
            }
            Self::ManageCourses | Self::CreateCourse | Self::EditCourse(_) => {
                Requirement::Role(Role::Admin)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
