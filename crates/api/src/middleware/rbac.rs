//! Role-based access control extractors.

use std::marker::PhantomData;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use commons_core::error::CoreError;
use commons_core::roles::ROLE_ADMIN;
use commons_db::Resource;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `admin` role. Rejects with 403 Forbidden otherwise.
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != ROLE_ADMIN {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin role required".into(),
            )));
        }
        Ok(RequireAdmin(user))
    }
}

/// Access gate for the generic CRUD handlers of `R`.
///
/// Resources declaring [`Resource::ADMIN_ONLY`] demand [`RequireAdmin`];
/// every other resource is open. Yields the admin identity when one was
/// checked.
pub struct ResourceAccess<R> {
    pub admin: Option<AuthUser>,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource> FromRequestParts<AppState> for ResourceAccess<R> {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let admin = if R::ADMIN_ONLY {
            let RequireAdmin(user) = RequireAdmin::from_request_parts(parts, state).await?;
            Some(user)
        } else {
            None
        };
        Ok(ResourceAccess {
            admin,
            _resource: PhantomData,
        })
    }
}
