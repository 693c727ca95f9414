use actix_web::cookie::time::Duration;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use std::env;
use validator::Validate;

use crate::utils;
use crate::utils::validation::validate_payload;

#[derive(Deserialize, Validate)]
pub struct TokenRequest {
    #[validate(email)]
    email: String,
}

fn production() -> bool {
    env::var("APP_ENV").map(|v| v == "production").unwrap_or(false)
}

// Secure + cross-site attributes only make sense behind TLS, so they follow
// the deployment environment.
fn session_cookie(value: String, max_age: Duration) -> Cookie<'static> {
    Cookie::build(utils::auth::SESSION_COOKIE, value)
        .path("/")
        .http_only(true)
        .secure(production())
        .same_site(if production() { SameSite::None } else { SameSite::Strict })
        .max_age(max_age)
        .finish()
}

pub async fn issue_token(body: web::Json<TokenRequest>) -> Result<HttpResponse, actix_web::Error> {
    validate_payload(&body.0)?;

    let token = utils::jwt::generate_token(&body.email)
        .map_err(|_| actix_web::error::ErrorInternalServerError("Token generation error"))?;

    Ok(HttpResponse::Ok()
        .cookie(session_cookie(token, Duration::days(365)))
        .json(json!({ "success": true })))
}

pub async fn logout() -> Result<HttpResponse, actix_web::Error> {
    Ok(HttpResponse::Ok()
        .cookie(session_cookie(String::new(), Duration::ZERO))
        .json(json!({ "success": true })))
}
