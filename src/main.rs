mod db;
mod errors;
mod gateway;
mod handlers;
mod models;
mod utils;

use actix_web::{web, App, HttpResponse, HttpServer};
use dotenv::dotenv;
use log::info;
use std::env;

async fn index() -> HttpResponse {
    HttpResponse::Ok().body("Hello from TeamLoom Server")
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    // Validate JWT secret
    let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET must be set");
    if jwt_secret.is_empty() {
        panic!("JWT_SECRET cannot be empty");
    }

    let store = db::Store::connect()
        .await
        .expect("Failed to connect to the database");
    store
        .ensure_indexes()
        .await
        .expect("Failed to prepare database indexes");
    let store = web::Data::new(store);
    let gateway = web::Data::new(gateway::PaymentGateway::from_env());

    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(9000);

    info!("Starting server at 0.0.0.0:{}", port);

    HttpServer::new(move || {
        App::new()
            .app_data(store.clone())
            .app_data(gateway.clone())
            .route("/", web::get().to(index))
            .service(
                web::resource("/jwt")
                    .route(web::post().to(handlers::auth::issue_token)),
            )
            .service(
                web::resource("/logout")
                    .route(web::get().to(handlers::auth::logout)),
            )
            .service(
                web::resource("/add-user/{email}")
                    .route(web::post().to(handlers::employee::add_employee)),
            )
            .service(
                web::resource("/all-employee")
                    .route(web::get().to(handlers::employee::get_all_employees)),
            )
            .service(
                web::resource("/allemployees")
                    .route(web::get().to(handlers::employee::get_employees)),
            )
            .service(
                web::resource("/only-employees")
                    .route(web::get().to(handlers::employee::get_only_employees)),
            )
            .service(
                web::resource("/employee/id/{id}")
                    .route(web::get().to(handlers::employee::get_employee_by_id)),
            )
            .service(
                web::resource("/employee/role/{email}")
                    .route(web::get().to(handlers::employee::get_role)),
            )
            .service(
                web::resource("/employee/{email}")
                    .route(web::get().to(handlers::employee::get_employee_by_email)),
            )
            .service(
                web::resource("/role/{email}")
                    .route(web::get().to(handlers::employee::get_role)),
            )
            .service(
                web::resource("/makehr/{id}")
                    .route(web::put().to(handlers::employee::make_hr)),
            )
            .service(
                web::resource("/adjust-salary/{id}")
                    .route(web::put().to(handlers::employee::adjust_salary)),
            )
            .service(
                web::resource("/fire/{id}")
                    .route(web::delete().to(handlers::employee::fire_employee)),
            )
            .service(
                web::resource("/verify/{id}")
                    .route(web::patch().to(handlers::employee::toggle_verified)),
            )
            .service(
                web::resource("/add-task")
                    .route(web::post().to(handlers::task::add_task)),
            )
            .service(
                web::resource("/all-tasks")
                    .route(web::get().to(handlers::task::get_all_tasks)),
            )
            .service(
                web::resource("/tasks/{email}")
                    .route(web::get().to(handlers::task::get_tasks_by_email)),
            )
            .service(
                web::resource("/update-task/{id}")
                    .route(web::put().to(handlers::task::update_task)),
            )
            .service(
                web::resource("/delete-task/{id}")
                    .route(web::delete().to(handlers::task::delete_task)),
            )
            .service(
                web::resource("/payment-req")
                    .route(web::post().to(handlers::payroll::request_payment)),
            )
            .service(
                web::resource("/all-payment-request")
                    .route(web::get().to(handlers::payroll::get_all_payment_requests)),
            )
            .service(
                web::resource("/donepayment/{empid}")
                    .route(web::get().to(handlers::payroll::get_done_payments)),
            )
            .service(
                web::resource("/create-payment-intent")
                    .route(web::post().to(handlers::payroll::create_payment_intent)),
            )
            .service(
                web::resource("/payment-process")
                    .route(web::patch().to(handlers::payroll::payment_process)),
            )
            .service(
                web::resource("/admin-stat")
                    .route(web::get().to(handlers::stats::admin_stat)),
            )
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
