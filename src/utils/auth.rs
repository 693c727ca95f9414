use actix_web::HttpRequest;
use mongodb::bson::doc;

use crate::db::Store;
use crate::errors::AppError;
use crate::models::employee::Role;
use crate::utils::jwt::{self, Claims};

pub const SESSION_COOKIE: &str = "token";

/// Session check: pulls the signed token out of the cookie and yields the
/// decoded principal. Runs before any handler logic.
pub fn authenticate(req: &HttpRequest) -> Result<Claims, AppError> {
    let cookie = req
        .cookie(SESSION_COOKIE)
        .ok_or_else(|| AppError::Unauthenticated("unauthorized access".to_string()))?;
    jwt::validate_token(cookie.value())
        .map_err(|_| AppError::Unauthenticated("unauthorized access".to_string()))
}

/// Role check: loads the employee record for the principal and rejects the
/// request unless its stored role matches.
pub async fn require_role(store: &Store, email: &str, role: Role) -> Result<(), AppError> {
    let employee = store
        .employees()
        .find_one(doc! { "email": email })
        .await
        .map_err(|err| AppError::StoreFailure(err.to_string()))?;

    match employee {
        Some(employee) if employee.role == role => Ok(()),
        _ => Err(AppError::Forbidden(format!(
            "Forbidden Access! {} Only Actions!",
            role
        ))),
    }
}
