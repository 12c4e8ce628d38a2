pub mod events;
pub mod destinations;
pub mod reservations;
pub mod users;
#[cfg(feature = "analytics")]
pub mod analytics;

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    Router,
};
use chrono::{NaiveDateTime, Utc};
use std::sync::Arc;

use crate::{error::AppError, AppState};

pub fn routes(state: &AppState) -> Router<Arc<AppState>> {
    let router = Router::new()
        .merge(events::routes())
        .merge(destinations::routes())
        .merge(reservations::routes())
        .merge(users::routes());

    #[cfg(feature = "analytics")]
    let router = if state.config.features.enable_analytics {
        router.merge(analytics::routes())
    } else {
        router
    };
    #[cfg(not(feature = "analytics"))]
    let _ = state;

    router
}

/// Reference instant for the upcoming/past tabs.
pub(crate) fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(format!("Paramètres invalides: {}", rejection.body_text()))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(format!("Corps de requête invalide: {}", rejection.body_text()))
    }
}
