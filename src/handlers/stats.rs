use actix_web::{web, HttpRequest, HttpResponse};
use futures_util::TryStreamExt;
use mongodb::bson::{doc, from_document};
use serde::{Deserialize, Serialize};

use crate::db::Store;
use crate::errors::AppError;
use crate::models::employee::Role;
use crate::utils::auth;

#[derive(Serialize)]
struct AdminStats {
    #[serde(rename = "totalHR")]
    total_hr: u64,
    #[serde(rename = "totalEmployee")]
    total_employee: u64,
    #[serde(rename = "totalWorkingHour")]
    total_working_hour: f64,
    #[serde(rename = "totalSalaryPaid")]
    total_salary_paid: i64,
    #[serde(rename = "taskOverview")]
    task_overview: Vec<TaskOverview>,
}

#[derive(Serialize, Deserialize)]
struct TaskOverview {
    #[serde(rename = "taskName")]
    task_name: String,
    #[serde(rename = "totalHours")]
    total_hours: f64,
}

pub async fn admin_stat(
    req: HttpRequest,
    store: web::Data<Store>,
) -> Result<HttpResponse, actix_web::Error> {
    let claims = auth::authenticate(&req)?;
    auth::require_role(&store, &claims.sub, Role::Admin).await?;

    let total_hr = store
        .employees()
        .count_documents(doc! { "role": Role::Hr.as_str() })
        .await
        .map_err(|err| AppError::StoreFailure(err.to_string()))?;

    let total_employee = store
        .employees()
        .count_documents(doc! { "role": Role::Employee.as_str() })
        .await
        .map_err(|err| AppError::StoreFailure(err.to_string()))?;

    let mut hours_cursor = store
        .tasks()
        .aggregate(vec![
            doc! { "$group": { "_id": null, "totalHours": { "$sum": "$hoursWorked" } } },
            doc! { "$project": { "_id": 0, "totalHours": 1 } },
        ])
        .await
        .map_err(|err| AppError::StoreFailure(err.to_string()))?;

    let total_working_hour = match hours_cursor
        .try_next()
        .await
        .map_err(|err| AppError::StoreFailure(err.to_string()))?
    {
        Some(group) => group.get_f64("totalHours").unwrap_or(0.0),
        None => 0.0,
    };

    let mut salary_cursor = store
        .payroll()
        .aggregate(vec![
            doc! { "$match": { "isComplete": true } },
            doc! { "$group": { "_id": null, "totalSalary": { "$sum": "$payableSalary" } } },
            doc! { "$project": { "_id": 0, "totalSalary": 1 } },
        ])
        .await
        .map_err(|err| AppError::StoreFailure(err.to_string()))?;

    let total_salary_paid = match salary_cursor
        .try_next()
        .await
        .map_err(|err| AppError::StoreFailure(err.to_string()))?
    {
        Some(group) => group.get_i64("totalSalary").unwrap_or(0),
        None => 0,
    };

    // Summed hours per task label.
    let mut overview_cursor = store
        .tasks()
        .aggregate(vec![
            doc! { "$group": { "_id": "$task", "totalHours": { "$sum": "$hoursWorked" } } },
            doc! { "$project": { "_id": 0, "taskName": "$_id", "totalHours": 1 } },
        ])
        .await
        .map_err(|err| AppError::StoreFailure(err.to_string()))?;

    let mut task_overview = Vec::new();
    while let Some(group) = overview_cursor
        .try_next()
        .await
        .map_err(|err| AppError::StoreFailure(err.to_string()))?
    {
        let entry: TaskOverview =
            from_document(group).map_err(|err| AppError::StoreFailure(err.to_string()))?;
        task_overview.push(entry);
    }

    Ok(HttpResponse::Ok().json(AdminStats {
        total_hr,
        total_employee,
        total_working_hour,
        total_salary_paid,
        task_overview,
    }))
}
