use actix_web::{web, HttpRequest, HttpResponse};
use chrono::Utc;
use futures_util::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document};
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use crate::db::{self, Store};
use crate::errors::AppError;
use crate::models::employee::{Employee, Role};
use crate::utils::auth;
use crate::utils::validation::validate_payload;

#[derive(Deserialize, Validate)]
pub(crate) struct NewEmployee {
    #[validate(length(min = 2, max = 64))]
    name: String,
    #[validate(custom = "validate_signup_role")]
    role: Role,
    #[validate(range(min = 0))]
    salary: i64,
    designation: Option<String>,
    #[validate(url)]
    photo: Option<String>,
    bank_account_no: Option<String>,
}

#[derive(Deserialize)]
pub(crate) struct EmployeeQueryParams {
    role: Option<String>,
}

#[derive(Deserialize, Validate)]
pub(crate) struct SalaryUpdate {
    #[validate(range(min = 0))]
    salary: i64,
}

fn validate_signup_role(role: &Role) -> Result<(), validator::ValidationError> {
    // Admins are seeded out-of-band, never self-registered.
    if *role == Role::Admin {
        return Err(validator::ValidationError::new("role"));
    }
    Ok(())
}

fn parse_object_id(id: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(id).map_err(|_| AppError::BadRequest("Invalid employee ID".to_string()))
}

// Registration is idempotent: a repeat sign-in with a known email hands back
// the stored record untouched and writes nothing.
pub async fn add_employee(
    store: web::Data<Store>,
    email: web::Path<String>,
    body: web::Json<NewEmployee>,
) -> Result<HttpResponse, actix_web::Error> {
    validate_payload(&body.0)?;
    let email = email.into_inner();

    if let Some(existing) = store
        .employees()
        .find_one(doc! { "email": &email })
        .await
        .map_err(|err| AppError::StoreFailure(err.to_string()))?
    {
        return Ok(HttpResponse::Ok().json(existing));
    }

    let mut employee = Employee {
        id: None,
        email: email.clone(),
        name: body.name.clone(),
        designation: body.designation.clone(),
        photo: body.photo.clone(),
        bank_account_no: body.bank_account_no.clone(),
        role: body.role,
        salary: body.salary,
        is_verified: false,
        make_hr: false,
        timestamp: Utc::now().timestamp_millis(),
    };

    match store.employees().insert_one(&employee).await {
        Ok(result) => {
            employee.id = result.inserted_id.as_object_id();
            Ok(HttpResponse::Created().json(employee))
        }
        // Lost the insert race to a concurrent registration; the unique
        // email index kept the store consistent, so fetch and return.
        Err(err) if db::is_duplicate_key(&err) => {
            let existing = store
                .employees()
                .find_one(doc! { "email": &email })
                .await
                .map_err(|err| AppError::StoreFailure(err.to_string()))?
                .ok_or_else(|| AppError::StoreFailure("Employee lookup failed after duplicate insert".to_string()))?;
            Ok(HttpResponse::Ok().json(existing))
        }
        Err(err) => Err(AppError::StoreFailure(err.to_string()).into()),
    }
}

pub async fn get_all_employees(
    store: web::Data<Store>,
    query: web::Query<EmployeeQueryParams>,
) -> Result<HttpResponse, actix_web::Error> {
    let filter = match query.role.as_deref() {
        Some(role) if !role.is_empty() => doc! { "role": role },
        _ => doc! {},
    };

    let employees: Vec<Employee> = store
        .employees()
        .find(filter)
        .await
        .map_err(|err| AppError::StoreFailure(err.to_string()))?
        .try_collect()
        .await
        .map_err(|err| AppError::StoreFailure(err.to_string()))?;

    Ok(HttpResponse::Ok().json(employees))
}

// Same listing for signed-in staff; admins are filtered out by default.
pub async fn get_employees(
    req: HttpRequest,
    store: web::Data<Store>,
    query: web::Query<EmployeeQueryParams>,
) -> Result<HttpResponse, actix_web::Error> {
    auth::authenticate(&req)?;

    let filter: Document = match query.role.as_deref() {
        Some(role) if !role.is_empty() => doc! { "role": role },
        _ => doc! { "role": { "$ne": Role::Admin.as_str() } },
    };

    let employees: Vec<Employee> = store
        .employees()
        .find(filter)
        .await
        .map_err(|err| AppError::StoreFailure(err.to_string()))?
        .try_collect()
        .await
        .map_err(|err| AppError::StoreFailure(err.to_string()))?;

    Ok(HttpResponse::Ok().json(employees))
}

pub async fn get_employee_by_email(
    req: HttpRequest,
    store: web::Data<Store>,
    email: web::Path<String>,
) -> Result<HttpResponse, actix_web::Error> {
    auth::authenticate(&req)?;

    let employee = store
        .employees()
        .find_one(doc! { "email": email.into_inner() })
        .await
        .map_err(|err| AppError::StoreFailure(err.to_string()))?
        .ok_or_else(|| AppError::NotFound("Employee not found".to_string()))?;

    Ok(HttpResponse::Ok().json(employee))
}

pub async fn get_employee_by_id(
    store: web::Data<Store>,
    id: web::Path<String>,
) -> Result<HttpResponse, actix_web::Error> {
    let id = parse_object_id(&id.into_inner())?;

    let employee = store
        .employees()
        .find_one(doc! { "_id": id })
        .await
        .map_err(|err| AppError::StoreFailure(err.to_string()))?
        .ok_or_else(|| AppError::NotFound("Employee not found".to_string()))?;

    Ok(HttpResponse::Ok().json(employee))
}

pub async fn get_role(
    store: web::Data<Store>,
    email: web::Path<String>,
) -> Result<HttpResponse, actix_web::Error> {
    let employee = store
        .employees()
        .find_one(doc! { "email": email.into_inner() })
        .await
        .map_err(|err| AppError::StoreFailure(err.to_string()))?
        .ok_or_else(|| AppError::NotFound("Employee not found".to_string()))?;

    Ok(HttpResponse::Ok().json(json!({ "role": employee.role })))
}

// HR staff listing: plain employees only.
pub async fn get_only_employees(
    req: HttpRequest,
    store: web::Data<Store>,
) -> Result<HttpResponse, actix_web::Error> {
    let claims = auth::authenticate(&req)?;
    auth::require_role(&store, &claims.sub, Role::Hr).await?;

    let employees: Vec<Employee> = store
        .employees()
        .find(doc! { "role": Role::Employee.as_str() })
        .await
        .map_err(|err| AppError::StoreFailure(err.to_string()))?
        .try_collect()
        .await
        .map_err(|err| AppError::StoreFailure(err.to_string()))?;

    Ok(HttpResponse::Ok().json(employees))
}

pub async fn make_hr(
    req: HttpRequest,
    store: web::Data<Store>,
    id: web::Path<String>,
) -> Result<HttpResponse, actix_web::Error> {
    let claims = auth::authenticate(&req)?;
    auth::require_role(&store, &claims.sub, Role::Admin).await?;

    let id = parse_object_id(&id.into_inner())?;

    let result = store
        .employees()
        .update_one(
            doc! { "_id": id },
            doc! { "$set": { "role": Role::Hr.as_str(), "makeHR": true } },
        )
        .await
        .map_err(|err| AppError::StoreFailure(err.to_string()))?;

    if result.matched_count == 0 {
        return Err(AppError::NotFound("Employee not found".to_string()).into());
    }

    Ok(HttpResponse::Ok().json(json!({ "message": "Employee promoted to HR" })))
}

pub async fn adjust_salary(
    req: HttpRequest,
    store: web::Data<Store>,
    id: web::Path<String>,
    body: web::Json<SalaryUpdate>,
) -> Result<HttpResponse, actix_web::Error> {
    let claims = auth::authenticate(&req)?;
    auth::require_role(&store, &claims.sub, Role::Admin).await?;
    validate_payload(&body.0)?;

    let id = parse_object_id(&id.into_inner())?;

    let result = store
        .employees()
        .update_one(doc! { "_id": id }, doc! { "$set": { "salary": body.salary } })
        .await
        .map_err(|err| AppError::StoreFailure(err.to_string()))?;

    if result.matched_count == 0 {
        return Err(AppError::NotFound("Employee not found".to_string()).into());
    }

    Ok(HttpResponse::Ok().json(json!({ "message": "Salary updated" })))
}

pub async fn fire_employee(
    req: HttpRequest,
    store: web::Data<Store>,
    id: web::Path<String>,
) -> Result<HttpResponse, actix_web::Error> {
    let claims = auth::authenticate(&req)?;
    auth::require_role(&store, &claims.sub, Role::Admin).await?;

    let id = parse_object_id(&id.into_inner())?;

    let result = store
        .employees()
        .delete_one(doc! { "_id": id })
        .await
        .map_err(|err| AppError::StoreFailure(err.to_string()))?;

    if result.deleted_count == 0 {
        return Err(AppError::NotFound("Employee not found".to_string()).into());
    }

    Ok(HttpResponse::Ok().json(json!({ "message": "Employee deleted successfully" })))
}

pub async fn toggle_verified(
    req: HttpRequest,
    store: web::Data<Store>,
    id: web::Path<String>,
) -> Result<HttpResponse, actix_web::Error> {
    let claims = auth::authenticate(&req)?;
    auth::require_role(&store, &claims.sub, Role::Hr).await?;

    let id = parse_object_id(&id.into_inner())?;

    // Pipeline update: the negation happens inside the store, so concurrent
    // toggles cannot interleave a stale read.
    let toggle = vec![doc! { "$set": { "isVerified": { "$not": "$isVerified" } } }];

    let result = store
        .employees()
        .update_one(doc! { "_id": id }, toggle)
        .await
        .map_err(|err| AppError::StoreFailure(err.to_string()))?;

    if result.matched_count == 0 {
        return Err(AppError::NotFound("Employee not found".to_string()).into());
    }

    Ok(HttpResponse::Ok().json(json!({ "message": "Verification status toggled" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_cannot_be_self_assigned() {
        assert!(validate_signup_role(&Role::Admin).is_err());
        assert!(validate_signup_role(&Role::Hr).is_ok());
        assert!(validate_signup_role(&Role::Employee).is_ok());
    }

    #[test]
    fn malformed_object_id_is_rejected() {
        assert!(matches!(parse_object_id("nope"), Err(AppError::BadRequest(_))));
        assert!(parse_object_id("65f1a2b3c4d5e6f7a8b9c0d1").is_ok());
    }
}
