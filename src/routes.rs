use actix_web::cookie::Cookie;
use actix_web::http::header::{self, ContentType};
use actix_web::{get, post, web, HttpRequest, HttpResponse, Responder};
use sqlx::SqlitePool;

use crate::error::AppError;
use crate::model::*;
use crate::{db, views, AppState};

/// Cookie carrying a one-shot notice to the next maintenance listing.
const NOTICE_COOKIE: &str = "notice";
const NOTICE_MAINTENANCE_DELETED: &str = "maintenance_deleted";

fn html(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(body)
}

fn redirect(location: String) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

fn notice_message(code: &str) -> Option<&'static str> {
    match code {
        NOTICE_MAINTENANCE_DELETED => Some("Maintenance entry deleted."),
        _ => None,
    }
}

fn notice_cookie(value: &str) -> Cookie<'static> {
    let mut cookie = Cookie::new(NOTICE_COOKIE, value.to_string());
    cookie.set_path("/");
    cookie
}

async fn find_vehicle(pool: &SqlitePool, vehicle_id: i64) -> Result<Vehicle, AppError> {
    db::get_vehicle(pool, vehicle_id)
        .await?
        .ok_or(AppError::NotFound("Vehicle"))
}

#[get("/")]
async fn index() -> impl Responder {
    html(views::index())
}

#[get("/vehicles")]
async fn get_vehicles(data: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let vehicles = db::list_vehicles(&data.db).await?;
    Ok(html(views::vehicles(&vehicles)))
}

#[get("/add_vehicle")]
async fn add_vehicle_form() -> impl Responder {
    html(views::add_vehicle_form())
}

#[post("/add_vehicle")]
async fn post_vehicle(
    data: web::Data<AppState>,
    form: web::Form<PostVehicle>,
) -> Result<HttpResponse, AppError> {
    let vehicle = form.into_inner().parse()?;
    let id = db::insert_vehicle(&data.db, &vehicle).await?;
    log::info!("created vehicle {id}: {} {} {}", vehicle.year, vehicle.make, vehicle.model);

    Ok(redirect("/vehicles".to_string()))
}

#[get("/vehicles/{id}/maintenance_logs")]
async fn get_maintenance_logs(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<(i64,)>,
) -> Result<HttpResponse, AppError> {
    let vehicle_id = path.into_inner().0;
    let vehicle = find_vehicle(&data.db, vehicle_id).await?;
    let entries = db::list_maintenance(&data.db, vehicle_id).await?;

    let notice = req
        .cookie(NOTICE_COOKIE)
        .and_then(|cookie| notice_message(cookie.value()));
    let body = views::maintenance_logs(&vehicle, &entries, notice);

    let mut response = HttpResponse::Ok();
    response.content_type(ContentType::html());
    if notice.is_some() {
        let mut removal = notice_cookie("");
        removal.make_removal();
        response.cookie(removal);
    }
    Ok(response.body(body))
}

#[get("/add_service")]
async fn add_service_form(
    data: web::Data<AppState>,
    query: web::Query<ServiceQuery>,
) -> Result<HttpResponse, AppError> {
    let vehicles = db::list_vehicles(&data.db).await?;
    Ok(html(views::add_service_form(&vehicles, query.vehicle_id)))
}

#[post("/add_service")]
async fn post_service(
    data: web::Data<AppState>,
    form: web::Form<PostMaintenance>,
) -> Result<HttpResponse, AppError> {
    let entry = form.into_inner().parse()?;
    find_vehicle(&data.db, entry.vehicle_id).await?;
    let id = db::insert_maintenance(&data.db, &entry).await?;
    log::info!("created maintenance {id} for vehicle {}", entry.vehicle_id);

    Ok(redirect(format!(
        "/vehicles/{}/maintenance_logs",
        entry.vehicle_id
    )))
}

#[post("/maintenance/{id}/delete")]
async fn delete_maintenance(
    data: web::Data<AppState>,
    path: web::Path<(i64,)>,
) -> Result<HttpResponse, AppError> {
    let maintenance_id = path.into_inner().0;
    let vehicle_id = db::delete_maintenance(&data.db, maintenance_id)
        .await?
        .ok_or(AppError::NotFound("Maintenance entry"))?;
    log::info!("deleted maintenance {maintenance_id} from vehicle {vehicle_id}");

    Ok(HttpResponse::Found()
        .insert_header((
            header::LOCATION,
            format!("/vehicles/{vehicle_id}/maintenance_logs"),
        ))
        .cookie(notice_cookie(NOTICE_MAINTENANCE_DELETED))
        .finish())
}

#[get("/vehicles/{id}/fuel")]
async fn get_fuel_logs(
    data: web::Data<AppState>,
    path: web::Path<(i64,)>,
) -> Result<HttpResponse, AppError> {
    let vehicle_id = path.into_inner().0;
    let vehicle = find_vehicle(&data.db, vehicle_id).await?;
    let logs = db::list_fuel_logs(&data.db, vehicle_id).await?;
    Ok(html(views::fuel_logs(&vehicle, &logs)))
}

#[get("/vehicles/{id}/fuel/add")]
async fn add_fuel_form(
    data: web::Data<AppState>,
    path: web::Path<(i64,)>,
) -> Result<HttpResponse, AppError> {
    let vehicle = find_vehicle(&data.db, path.into_inner().0).await?;
    Ok(html(views::add_fuel_form(&vehicle)))
}

#[post("/vehicles/{id}/fuel/add")]
async fn post_fuel_log(
    data: web::Data<AppState>,
    path: web::Path<(i64,)>,
    form: web::Form<PostFuelLog>,
) -> Result<HttpResponse, AppError> {
    let vehicle_id = path.into_inner().0;
    find_vehicle(&data.db, vehicle_id).await?;
    let fuel_log = form.into_inner().parse(vehicle_id)?;
    let id = db::insert_fuel_log(&data.db, &fuel_log).await?;
    log::info!("created fuel log {id} for vehicle {vehicle_id}");

    Ok(redirect(format!("/vehicles/{vehicle_id}/fuel")))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(index)
        .service(get_vehicles)
        .service(add_vehicle_form)
        .service(post_vehicle)
        .service(get_maintenance_logs)
        .service(add_service_form)
        .service(post_service)
        .service(delete_maintenance)
        .service(get_fuel_logs)
        .service(add_fuel_form)
        .service(post_fuel_log);
}
