use actix_web::{web, HttpRequest, HttpResponse};
use chrono::Utc;
use futures_util::TryStreamExt;
use mongodb::bson::{doc, Document};
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use crate::db::{self, Store};
use crate::errors::AppError;
use crate::gateway::PaymentGateway;
use crate::models::employee::Role;
use crate::models::payroll::{PaymentRequest, PaymentStatus};
use crate::utils::auth;
use crate::utils::validation::validate_payload;

#[derive(Deserialize, Validate)]
pub(crate) struct NewPaymentRequest {
    #[validate(length(min = 1))]
    employee_id: String,
    #[validate(length(min = 1, max = 64))]
    #[serde(rename = "employeeName")]
    employee_name: Option<String>,
    #[validate(email)]
    #[serde(rename = "employeeEmail")]
    employee_email: Option<String>,
    #[validate(length(min = 1, max = 2))]
    month: String,
    #[validate(length(min = 4, max = 4))]
    year: String,
    #[validate(range(min = 1))]
    #[serde(rename = "payableSalary")]
    payable_salary: i64,
}

// All fields optional on purpose: a hole in this payload must come back as
// a 400 before anything reaches the gateway.
#[derive(Deserialize)]
pub(crate) struct IntentRequest {
    #[serde(rename = "payableSalary")]
    payable_salary: Option<i64>,
    employee_id: Option<String>,
    month: Option<String>,
    year: Option<String>,
}

#[derive(Deserialize, Validate)]
pub(crate) struct CompletePayment {
    #[validate(length(min = 1))]
    employee_id: String,
    #[validate(length(min = 1, max = 2))]
    month: String,
    #[validate(length(min = 4, max = 4))]
    year: String,
    #[validate(length(min = 1))]
    transaction_id: String,
}

/// Zero-pads the month so "3" and "03" name the same disbursement period.
fn normalize_month(month: &str) -> Result<String, AppError> {
    month
        .parse::<u32>()
        .ok()
        .filter(|m| (1..=12).contains(m))
        .map(|m| format!("{:02}", m))
        .ok_or_else(|| AppError::BadRequest("Invalid month".to_string()))
}

fn period_filter(employee_id: &str, month: &str, year: &str) -> Document {
    doc! { "employee_id": employee_id, "month": month, "year": year }
}

/// Gateway amounts are in minor currency units.
fn to_minor_units(amount: i64) -> Result<i64, AppError> {
    amount
        .checked_mul(100)
        .ok_or_else(|| AppError::BadRequest("Salary out of range".to_string()))
}

// Step 1 of the payment workflow: record the obligation, at most once per
// (employee, month, year).
pub async fn request_payment(
    req: HttpRequest,
    store: web::Data<Store>,
    body: web::Json<NewPaymentRequest>,
) -> Result<HttpResponse, actix_web::Error> {
    let claims = auth::authenticate(&req)?;
    auth::require_role(&store, &claims.sub, Role::Hr).await?;
    validate_payload(&body.0)?;

    let month = normalize_month(&body.month)?;

    let existing = store
        .payroll()
        .find_one(period_filter(&body.employee_id, &month, &body.year))
        .await
        .map_err(|err| AppError::StoreFailure(err.to_string()))?;

    if existing.is_some() {
        return Err(AppError::DuplicateRequest("Payment Exists".to_string()).into());
    }

    let mut request = PaymentRequest {
        id: None,
        employee_id: body.employee_id.clone(),
        employee_name: body.employee_name.clone(),
        employee_email: body.employee_email.clone(),
        month,
        year: body.year.clone(),
        payable_salary: body.payable_salary,
        is_complete: false,
        status: PaymentStatus::Pending,
        transaction_id: None,
        timestamp: Utc::now().timestamp_millis(),
    };

    match store.payroll().insert_one(&request).await {
        Ok(result) => {
            request.id = result.inserted_id.as_object_id();
            Ok(HttpResponse::Created().json(request))
        }
        // A concurrent request won the insert; the unique compound index
        // holds the invariant, report the duplicate the same way.
        Err(err) if db::is_duplicate_key(&err) => {
            Err(AppError::DuplicateRequest("Payment Exists".to_string()).into())
        }
        Err(err) => Err(AppError::StoreFailure(err.to_string()).into()),
    }
}

// Step 2: bridge to the gateway. No local writes, retryable; every guard
// runs before the gateway sees anything.
pub async fn create_payment_intent(
    req: HttpRequest,
    store: web::Data<Store>,
    gateway: web::Data<PaymentGateway>,
    body: web::Json<IntentRequest>,
) -> Result<HttpResponse, actix_web::Error> {
    auth::authenticate(&req)?;

    let missing = || AppError::BadRequest("Missing required fields.".to_string());

    let payable_salary = body.payable_salary.filter(|amount| *amount > 0).ok_or_else(missing)?;
    let employee_id = body
        .employee_id
        .as_deref()
        .filter(|id| !id.is_empty())
        .ok_or_else(missing)?;
    let month = normalize_month(body.month.as_deref().ok_or_else(missing)?)?;
    let year = body.year.as_deref().ok_or_else(missing)?;

    let obligation = store
        .payroll()
        .find_one(period_filter(employee_id, &month, year))
        .await
        .map_err(|err| AppError::StoreFailure(err.to_string()))?;

    match obligation {
        Some(obligation) if !obligation.is_complete => {}
        _ => return Err(missing().into()),
    }

    let client_secret = gateway.create_intent(to_minor_units(payable_salary)?).await?;

    Ok(HttpResponse::Ok().json(json!({ "clientSecret": client_secret })))
}

// Step 3: record completion. The gateway is consulted first; a
// client-supplied transaction id alone moves nothing. Re-running with the
// same arguments is a no-op in effect.
pub async fn payment_process(
    req: HttpRequest,
    store: web::Data<Store>,
    gateway: web::Data<PaymentGateway>,
    body: web::Json<CompletePayment>,
) -> Result<HttpResponse, actix_web::Error> {
    auth::authenticate(&req)?;
    validate_payload(&body.0)?;

    let month = normalize_month(&body.month)?;

    if !gateway.charge_succeeded(&body.transaction_id).await? {
        return Err(AppError::BadRequest("Charge has not succeeded".to_string()).into());
    }

    let result = store
        .payroll()
        .update_one(
            period_filter(&body.employee_id, &month, &body.year),
            doc! { "$set": {
                "isComplete": true,
                "status": "Complete",
                "transactionId": &body.transaction_id,
            } },
        )
        .await
        .map_err(|err| AppError::StoreFailure(err.to_string()))?;

    if result.matched_count == 0 {
        return Err(AppError::NotFound("Payment request not found".to_string()).into());
    }

    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

pub async fn get_all_payment_requests(
    req: HttpRequest,
    store: web::Data<Store>,
) -> Result<HttpResponse, actix_web::Error> {
    let claims = auth::authenticate(&req)?;
    auth::require_role(&store, &claims.sub, Role::Admin).await?;

    let requests: Vec<PaymentRequest> = store
        .payroll()
        .find(doc! {})
        .await
        .map_err(|err| AppError::StoreFailure(err.to_string()))?
        .try_collect()
        .await
        .map_err(|err| AppError::StoreFailure(err.to_string()))?;

    Ok(HttpResponse::Ok().json(requests))
}

pub async fn get_done_payments(
    req: HttpRequest,
    store: web::Data<Store>,
    empid: web::Path<String>,
) -> Result<HttpResponse, actix_web::Error> {
    auth::authenticate(&req)?;

    let requests: Vec<PaymentRequest> = store
        .payroll()
        .find(doc! { "employee_id": empid.into_inner(), "isComplete": true })
        .await
        .map_err(|err| AppError::StoreFailure(err.to_string()))?
        .try_collect()
        .await
        .map_err(|err| AppError::StoreFailure(err.to_string()))?;

    Ok(HttpResponse::Ok().json(requests))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_is_zero_padded() {
        assert_eq!(normalize_month("3").unwrap(), "03");
        assert_eq!(normalize_month("03").unwrap(), "03");
        assert_eq!(normalize_month("12").unwrap(), "12");
    }

    #[test]
    fn out_of_range_month_is_rejected() {
        assert!(normalize_month("0").is_err());
        assert!(normalize_month("13").is_err());
        assert!(normalize_month("march").is_err());
        assert!(normalize_month("").is_err());
    }

    #[test]
    fn period_filter_uses_the_composite_key() {
        let filter = period_filter("E1", "03", "2024");
        assert_eq!(filter.get_str("employee_id").unwrap(), "E1");
        assert_eq!(filter.get_str("month").unwrap(), "03");
        assert_eq!(filter.get_str("year").unwrap(), "2024");
        assert_eq!(filter.len(), 3);
    }

    #[test]
    fn salary_converts_to_minor_units() {
        assert_eq!(to_minor_units(1000).unwrap(), 100_000);
    }

    #[test]
    fn minor_unit_overflow_is_rejected() {
        assert!(to_minor_units(i64::MAX).is_err());
    }
}
