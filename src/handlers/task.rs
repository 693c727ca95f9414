use actix_web::{web, HttpRequest, HttpResponse};
use chrono::{NaiveDate, Utc};
use futures_util::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document};
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use crate::db::Store;
use crate::errors::AppError;
use crate::models::employee::Role;
use crate::models::task::Task;
use crate::utils::validation::validate_payload;
use crate::utils::{auth, dates};

#[derive(Deserialize, Validate)]
pub(crate) struct NewTask {
    #[validate(length(min = 1, max = 120))]
    task: String,
    #[validate(range(min = 0.0))]
    #[serde(rename = "hoursWorked")]
    hours_worked: f64,
    date: NaiveDate,
    #[validate(length(min = 1, max = 64))]
    #[serde(rename = "employeeName")]
    employee_name: String,
    #[validate(email)]
    #[serde(rename = "employeeEmail")]
    employee_email: String,
}

#[derive(Deserialize, Validate)]
pub(crate) struct TaskUpdate {
    #[validate(length(min = 1, max = 120))]
    task: String,
    #[validate(range(min = 0.0))]
    #[serde(rename = "hoursWorked")]
    hours_worked: f64,
    date: NaiveDate,
}

#[derive(Deserialize)]
pub(crate) struct TaskQueryParams {
    name: Option<String>,
    month: Option<u32>,
    year: Option<i32>,
}

fn parse_task_id(id: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(id).map_err(|_| AppError::BadRequest("Invalid task ID".to_string()))
}

fn build_task_filter(query: &TaskQueryParams) -> Result<Document, AppError> {
    let mut filter = doc! {};

    if let Some(name) = query.name.as_deref() {
        if !name.is_empty() {
            filter.insert("employeeName", doc! { "$regex": name, "$options": "i" });
        }
    }

    match (query.month, query.year) {
        (Some(month), Some(year)) => {
            let (start, end) = dates::month_bounds(year, month)
                .ok_or_else(|| AppError::BadRequest("Invalid month filter".to_string()))?;
            filter.insert("date", doc! { "$gte": start.to_string(), "$lt": end.to_string() });
        }
        (None, Some(year)) => {
            let (start, end) = dates::year_bounds(year)
                .ok_or_else(|| AppError::BadRequest("Invalid year filter".to_string()))?;
            filter.insert("date", doc! { "$gte": start.to_string(), "$lt": end.to_string() });
        }
        (Some(month), None) => {
            let pattern = dates::month_pattern(month)
                .ok_or_else(|| AppError::BadRequest("Invalid month filter".to_string()))?;
            filter.insert("date", doc! { "$regex": pattern });
        }
        (None, None) => {}
    }

    Ok(filter)
}

pub async fn add_task(
    req: HttpRequest,
    store: web::Data<Store>,
    body: web::Json<NewTask>,
) -> Result<HttpResponse, actix_web::Error> {
    auth::authenticate(&req)?;
    validate_payload(&body.0)?;

    let mut task = Task {
        id: None,
        employee_email: body.employee_email.clone(),
        employee_name: body.employee_name.clone(),
        task: body.task.clone(),
        hours_worked: body.hours_worked,
        date: body.date,
        timestamp: Utc::now().timestamp_millis(),
    };

    let result = store
        .tasks()
        .insert_one(&task)
        .await
        .map_err(|err| AppError::StoreFailure(err.to_string()))?;
    task.id = result.inserted_id.as_object_id();

    Ok(HttpResponse::Created().json(task))
}

pub async fn get_tasks_by_email(
    store: web::Data<Store>,
    email: web::Path<String>,
) -> Result<HttpResponse, actix_web::Error> {
    let tasks: Vec<Task> = store
        .tasks()
        .find(doc! { "employeeEmail": email.into_inner() })
        .await
        .map_err(|err| AppError::StoreFailure(err.to_string()))?
        .try_collect()
        .await
        .map_err(|err| AppError::StoreFailure(err.to_string()))?;

    Ok(HttpResponse::Ok().json(tasks))
}

// HR progress view across all employees, filterable by name and period.
pub async fn get_all_tasks(
    req: HttpRequest,
    store: web::Data<Store>,
    query: web::Query<TaskQueryParams>,
) -> Result<HttpResponse, actix_web::Error> {
    let claims = auth::authenticate(&req)?;
    auth::require_role(&store, &claims.sub, Role::Hr).await?;

    let filter = build_task_filter(&query)?;

    let tasks: Vec<Task> = store
        .tasks()
        .find(filter)
        .await
        .map_err(|err| AppError::StoreFailure(err.to_string()))?
        .try_collect()
        .await
        .map_err(|err| AppError::StoreFailure(err.to_string()))?;

    Ok(HttpResponse::Ok().json(tasks))
}

pub async fn update_task(
    req: HttpRequest,
    store: web::Data<Store>,
    id: web::Path<String>,
    body: web::Json<TaskUpdate>,
) -> Result<HttpResponse, actix_web::Error> {
    auth::authenticate(&req)?;
    validate_payload(&body.0)?;

    let id = parse_task_id(&id.into_inner())?;

    let result = store
        .tasks()
        .update_one(
            doc! { "_id": id },
            doc! { "$set": {
                "task": &body.task,
                "hoursWorked": body.hours_worked,
                "date": body.date.to_string(),
            } },
        )
        .await
        .map_err(|err| AppError::StoreFailure(err.to_string()))?;

    if result.matched_count == 0 {
        return Err(AppError::NotFound("Task not found".to_string()).into());
    }

    Ok(HttpResponse::Ok().json(json!({ "message": "Task updated" })))
}

pub async fn delete_task(
    req: HttpRequest,
    store: web::Data<Store>,
    id: web::Path<String>,
) -> Result<HttpResponse, actix_web::Error> {
    auth::authenticate(&req)?;

    let id = parse_task_id(&id.into_inner())?;

    let result = store
        .tasks()
        .delete_one(doc! { "_id": id })
        .await
        .map_err(|err| AppError::StoreFailure(err.to_string()))?;

    if result.deleted_count == 0 {
        return Err(AppError::NotFound("Task not found".to_string()).into());
    }

    Ok(HttpResponse::Ok().json(json!({ "message": "Task deleted successfully" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(name: Option<&str>, month: Option<u32>, year: Option<i32>) -> TaskQueryParams {
        TaskQueryParams {
            name: name.map(str::to_string),
            month,
            year,
        }
    }

    #[test]
    fn empty_query_matches_everything() {
        let filter = build_task_filter(&params(None, None, None)).unwrap();
        assert!(filter.is_empty());
    }

    #[test]
    fn month_and_year_become_a_range() {
        let filter = build_task_filter(&params(None, Some(3), Some(2024))).unwrap();
        let date = filter.get_document("date").unwrap();
        assert_eq!(date.get_str("$gte").unwrap(), "2024-03-01");
        assert_eq!(date.get_str("$lt").unwrap(), "2024-04-01");
    }

    #[test]
    fn year_alone_becomes_a_year_range() {
        let filter = build_task_filter(&params(None, None, Some(2023))).unwrap();
        let date = filter.get_document("date").unwrap();
        assert_eq!(date.get_str("$gte").unwrap(), "2023-01-01");
        assert_eq!(date.get_str("$lt").unwrap(), "2024-01-01");
    }

    #[test]
    fn month_alone_falls_back_to_anchored_pattern() {
        let filter = build_task_filter(&params(None, Some(7), None)).unwrap();
        let date = filter.get_document("date").unwrap();
        assert_eq!(date.get_str("$regex").unwrap(), "^[0-9]{4}-07-");
    }

    #[test]
    fn name_filter_is_case_insensitive_substring() {
        let filter = build_task_filter(&params(Some("ali"), None, None)).unwrap();
        let name = filter.get_document("employeeName").unwrap();
        assert_eq!(name.get_str("$regex").unwrap(), "ali");
        assert_eq!(name.get_str("$options").unwrap(), "i");
    }

    #[test]
    fn out_of_range_month_is_rejected() {
        assert!(build_task_filter(&params(None, Some(13), Some(2024))).is_err());
        assert!(build_task_filter(&params(None, Some(0), None)).is_err());
    }
}
