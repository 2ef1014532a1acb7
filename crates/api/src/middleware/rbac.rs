//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose role does not
//! meet the minimum requirement. Use these in route handlers to enforce
//! authorization at the type level. Authentication failures are always 401;
//! an authenticated user with an insufficient role is always 403.

use agrihub_core::error::CoreError;
use agrihub_core::roles::{ROLE_ADMIN, ROLE_EXPERT, ROLE_FARMER, ROLE_MANAGER};
use agrihub_core::types::DbId;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `admin` role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(user): RequireAdmin) -> AppResult<Json<()>> {
///     // user is guaranteed to be an admin here
///     Ok(Json(()))
/// }
/// ```
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

/// Requires `manager` or `admin` role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn back_office(RequireManager(user): RequireManager) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireManager(pub AuthUser);

impl FromRequestParts<AppState> for RequireManager {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != ROLE_ADMIN && user.role != ROLE_MANAGER {
            return Err(AppError::Core(CoreError::Forbidden(
                "Manager or Admin role required".into(),
            )));
        }
        Ok(RequireManager(user))
    }
}

/// Requires the `farmer` role. Rejects with 403 Forbidden otherwise.
pub struct RequireFarmer(pub AuthUser);

impl FromRequestParts<AppState> for RequireFarmer {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != ROLE_FARMER {
            return Err(AppError::Core(CoreError::Forbidden(
                "Farmer role required".into(),
            )));
        }
        Ok(RequireFarmer(user))
    }
}

/// Requires the `expert` role. Rejects with 403 Forbidden otherwise.
pub struct RequireExpert(pub AuthUser);

impl FromRequestParts<AppState> for RequireExpert {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != ROLE_EXPERT {
            return Err(AppError::Core(CoreError::Forbidden(
                "Expert role required".into(),
            )));
        }
        Ok(RequireExpert(user))
    }
}

/// Resolve the farm a back-office request operates on.
///
/// Managers always operate on their own farm; a `farm_id` query parameter
/// pointing elsewhere is refused. Admins are unscoped and must say which
/// farm they mean.
pub fn resolve_farm_scope(user: &AuthUser, requested: Option<DbId>) -> Result<DbId, AppError> {
    if user.role == ROLE_ADMIN {
        return requested.ok_or_else(|| {
            AppError::BadRequest("farm_id query parameter is required for admin users".into())
        });
    }

    let own = user.farm_id.ok_or_else(|| {
        AppError::Core(CoreError::Forbidden(
            "Account is not associated with a farm".into(),
        ))
    })?;

    match requested {
        Some(requested) if requested != own => Err(AppError::Core(CoreError::Forbidden(
            "Cannot access another farm's resources".into(),
        ))),
        _ => Ok(own),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: &str, farm_id: Option<DbId>) -> AuthUser {
        AuthUser {
            user_id: 1,
            role: role.to_string(),
            farm_id,
        }
    }

    #[test]
    fn test_manager_scoped_to_own_farm() {
        let manager = user(ROLE_MANAGER, Some(4));
        assert_eq!(resolve_farm_scope(&manager, None).unwrap(), 4);
        assert_eq!(resolve_farm_scope(&manager, Some(4)).unwrap(), 4);
        assert!(resolve_farm_scope(&manager, Some(9)).is_err());
    }

    #[test]
    fn test_admin_must_name_a_farm() {
        let admin = user(ROLE_ADMIN, None);
        assert_eq!(resolve_farm_scope(&admin, Some(2)).unwrap(), 2);
        assert!(resolve_farm_scope(&admin, None).is_err());
    }

    #[test]
    fn test_manager_without_farm_is_forbidden() {
        let orphan = user(ROLE_MANAGER, None);
        assert!(resolve_farm_scope(&orphan, None).is_err());
    }
}
