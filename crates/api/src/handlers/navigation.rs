//! Gate decisions for client-side navigation.

use axum::extract::Query;
use axum::Json;
use coursehub_core::authorization::{authorize, AccessDecision, AppRoute};
use serde::{Deserialize, Serialize};

use crate::middleware::auth::MaybeAuthUser;
use crate::response::DataResponse;

#[derive(Debug, Deserialize)]
pub struct NavigationParams {
    pub path: String,
}

#[derive(Debug, Serialize)]
pub struct Navigation {
    /// The view the path resolved to.
    pub view: AppRoute,
    /// Canonical path of that view.
    pub path: String,
    #[serde(flatten)]
    pub decision: AccessDecision,
}

/// GET /api/v1/navigation?path=
///
/// Resolve `path` to a view and evaluate the gate for the caller. Signed-out
/// callers are evaluated too.
pub async fn navigate(
    MaybeAuthUser(user): MaybeAuthUser,
    Query(params): Query<NavigationParams>,
) -> Json<DataResponse<Navigation>> {
    let route = AppRoute::resolve(&params.path);
    let decision = authorize(
        user.as_ref().map(|u| u.uid()),
        user.as_ref().and_then(|u| u.role()),
        route.requirement(),
    );
    Json(DataResponse {
        data: Navigation {
            path: route.path(),
            view: route,
            decision,
        },
    })
}
