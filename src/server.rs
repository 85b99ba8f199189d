//! HTTP surface of the map service.
//!
//! Every state-dependent answer is HTTP 200 with a `status` field in the body.
//! Only malformed JSON bodies are turned away with a client error.

use std::future::{ready, Ready};

use actix_web::dev::{Service, ServiceRequest, ServiceResponse};
use actix_web::http::{header, Method};
use actix_web::{middleware, web, App, HttpResponse, HttpServer};
use futures_util::future::Either;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::info;

use crate::config::{MapSettings, Settings};
use crate::error::ApiError;
use crate::models::{
    DisplayData, DisplaySubmission, Landmark, LandmarkSubmission, Pipe, PipeSubmission,
    SaveMapRequest,
};
use crate::store::MapStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

#[derive(Serialize)]
struct MessageResponse {
    status: Status,
    message: String,
}

#[derive(Serialize)]
struct PipesResponse {
    status: Status,
    pipes: Vec<Pipe>,
}

#[derive(Serialize)]
struct LandmarksResponse {
    status: Status,
    landmarks: Vec<Landmark>,
}

#[derive(Serialize)]
struct MapDataResponse {
    status: Status,
    map_data: Value,
}

#[derive(Serialize)]
struct CombinedResponse {
    status: Status,
    data: DisplayData,
}

#[derive(Serialize)]
struct DisplayResponse {
    status: Status,
    #[serde(flatten)]
    data: DisplayData,
}

fn error_message(err: impl ToString) -> HttpResponse {
    HttpResponse::Ok().json(MessageResponse {
        status: Status::Error,
        message: err.to_string(),
    })
}

async fn index() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "message": "Pipe map backend is running." }))
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

async fn send_pipes(store: web::Data<MapStore>, body: web::Json<PipeSubmission>) -> HttpResponse {
    match store.submit_pipes(body.into_inner().pipes) {
        Ok(pipes) => HttpResponse::Ok().json(PipesResponse {
            status: Status::Success,
            pipes,
        }),
        Err(err) => error_message(err),
    }
}

async fn get_distances(store: web::Data<MapStore>) -> HttpResponse {
    HttpResponse::Ok().json(store.distances())
}

async fn send_landmarks(
    store: web::Data<MapStore>,
    body: web::Json<LandmarkSubmission>,
) -> HttpResponse {
    let landmarks = store.submit_landmarks(body.into_inner().landmarks);
    HttpResponse::Ok().json(LandmarksResponse {
        status: Status::Success,
        landmarks,
    })
}

async fn get_landmarks(store: web::Data<MapStore>) -> HttpResponse {
    let (status, landmarks) = match store.landmarks() {
        Ok(landmarks) => (Status::Success, landmarks),
        Err(_) => (Status::Error, Vec::new()),
    };
    HttpResponse::Ok().json(LandmarksResponse { status, landmarks })
}

async fn save_map(store: web::Data<MapStore>, body: web::Json<SaveMapRequest>) -> HttpResponse {
    let SaveMapRequest { user_id, map_data } = body.into_inner();
    store.save_map(user_id, map_data);
    HttpResponse::Ok().json(MessageResponse {
        status: Status::Success,
        message: "Map data saved successfully".to_string(),
    })
}

async fn load_map(store: web::Data<MapStore>, user_id: web::Path<String>) -> HttpResponse {
    match store.load_map(&user_id) {
        Ok(map_data) => HttpResponse::Ok().json(MapDataResponse {
            status: Status::Success,
            map_data,
        }),
        Err(err) => error_message(err),
    }
}

async fn send_display_data(body: web::Json<DisplaySubmission>) -> HttpResponse {
    HttpResponse::Ok().json(CombinedResponse {
        status: Status::Success,
        data: body.into_inner().into(),
    })
}

async fn get_display_data(store: web::Data<MapStore>) -> HttpResponse {
    match store.display_data() {
        Ok(data) => HttpResponse::Ok().json(DisplayResponse {
            status: Status::Success,
            data,
        }),
        Err(err) => error_message(err),
    }
}

async fn map_settings(settings: web::Data<MapSettings>) -> HttpResponse {
    HttpResponse::Ok().json(settings.get_ref())
}

// Pipe paths can be long.
const JSON_LIMIT: usize = 16 * 1024 * 1024;

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_LIMIT)
        .content_type_required(false)
        .error_handler(|err, _req| ApiError::InvalidBody(err.to_string()).into())
}

/// Register every route. The caller supplies the `MapStore` and `MapSettings`
/// app data.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .route("/", web::get().to(index))
        .route("/health", web::get().to(health))
        .route("/send-pipes/", web::post().to(send_pipes))
        .route("/get-distances/", web::get().to(get_distances))
        .route("/send-landmarks/", web::post().to(send_landmarks))
        .route("/get-landmarks/", web::get().to(get_landmarks))
        .route("/save-map/", web::post().to(save_map))
        .route("/load-map/{user_id}", web::get().to(load_map))
        .route("/send-display-data/", web::post().to(send_display_data))
        .route("/get-display-data/", web::get().to(get_display_data))
        .route("/map-settings", web::get().to(map_settings));
}

/// Headers that open the API to any origin.
pub fn cors_headers() -> middleware::DefaultHeaders {
    middleware::DefaultHeaders::new()
        .add((header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"))
        .add((header::ACCESS_CONTROL_ALLOW_METHODS, "*"))
        .add((header::ACCESS_CONTROL_ALLOW_HEADERS, "*"))
}

/// Answer preflight requests before routing, for any path.
pub fn preflight<S>(
    req: ServiceRequest,
    srv: &S,
) -> Either<Ready<Result<ServiceResponse, actix_web::Error>>, S::Future>
where
    S: Service<ServiceRequest, Response = ServiceResponse, Error = actix_web::Error>,
{
    if req.method() == Method::OPTIONS {
        return Either::Left(ready(Ok(req.into_response(HttpResponse::Ok().finish()))));
    }
    Either::Right(srv.call(req))
}

pub async fn run(settings: Settings) -> std::io::Result<()> {
    let store = web::Data::new(MapStore::new());
    let map_settings = web::Data::new(settings.map.clone());
    let address = settings.bind_address();

    info!(host = %address.0, port = address.1, "starting pipe map backend");

    HttpServer::new(move || {
        App::new()
            .app_data(store.clone())
            .app_data(map_settings.clone())
            .wrap_fn(|req, srv| preflight(req, srv))
            .wrap(cors_headers())
            .wrap(middleware::Logger::default())
            .configure(configure)
    })
    .bind(address)?
    .run()
    .await
}
