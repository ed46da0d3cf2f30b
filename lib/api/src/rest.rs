use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer, Result as ActixResult};
use contactx_core::{
    scoring, ContactCandidate, ContactId, ContactPatch, Error, ListQuery, SubmitOutcome,
    SuspectQuery,
};
use contactx_storage::StorageManager;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

const MAX_PAGE_SIZE: usize = 1000;
const MIN_SEARCH_TERM_LEN: usize = 2;

#[derive(Deserialize)]
struct CreateContactRequest {
    name: String,
    organization: Option<String>,
    position: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    region: Option<String>,
    source_url: String,
    source_type: Option<String>,
    research_lines: Option<Vec<String>>,
}

impl From<CreateContactRequest> for ContactCandidate {
    fn from(req: CreateContactRequest) -> Self {
        ContactCandidate {
            name: req.name,
            organization: req.organization,
            position: req.position,
            email: req.email,
            phone: req.phone,
            region: req.region,
            source_url: req.source_url,
            source_type: req.source_type,
            research_lines: req.research_lines,
        }
    }
}

#[derive(Serialize)]
struct PaginatedResponse<T: Serialize> {
    items: Vec<T>,
    total: usize,
    skip: usize,
    limit: usize,
}

#[derive(Deserialize)]
struct ListParams {
    #[serde(default)]
    skip: usize,
    #[serde(default = "default_limit")]
    limit: usize,
    #[serde(default = "default_true")]
    only_valid: bool,
    region: Option<String>,
    organization: Option<String>,
    #[serde(default = "default_min_score")]
    min_validation_score: f64,
}

#[derive(Deserialize)]
struct SearchParams {
    q: String,
    #[serde(default)]
    skip: usize,
    #[serde(default = "default_limit")]
    limit: usize,
}

#[derive(Deserialize)]
struct DuplicateParams {
    #[serde(default)]
    skip: usize,
    #[serde(default = "default_limit")]
    limit: usize,
    #[serde(default = "default_max_score")]
    max_score: f64,
}

#[derive(Deserialize)]
struct InvalidateParams {
    #[serde(default = "default_reason")]
    reason: String,
}

fn default_limit() -> usize {
    100
}

fn default_true() -> bool {
    true
}

fn default_min_score() -> f64 {
    scoring::VALID_MIN_SCORE
}

fn default_max_score() -> f64 {
    scoring::SUSPECT_MAX_SCORE
}

fn default_reason() -> String {
    "Duplicate".to_string()
}

pub struct RestApi;

impl RestApi {
    pub async fn start(storage: Arc<StorageManager>, port: u16) -> std::io::Result<()> {
        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            App::new()
                .wrap(cors)
                .app_data(web::Data::new(storage.clone()))
                .route("/contacts", web::post().to(create_contact))
                .route("/contacts", web::get().to(list_contacts))
                .route("/contacts/search", web::get().to(search_contacts))
                .route("/contacts/duplicates", web::get().to(list_duplicates))
                .route("/contacts/{id}", web::get().to(get_contact))
                .route("/contacts/{id}", web::put().to(update_contact))
                .route("/contacts/{id}/invalidate", web::post().to(invalidate_contact))
        })
        .bind(("0.0.0.0", port))?
        .run()
        .await
    }
}

async fn create_contact(
    storage: web::Data<Arc<StorageManager>>,
    req: web::Json<CreateContactRequest>,
) -> ActixResult<HttpResponse> {
    match storage.submit(req.into_inner().into()) {
        Ok(SubmitOutcome::Created(contact)) => Ok(HttpResponse::Created().json(contact)),
        Ok(SubmitOutcome::AlreadyExisted(existing)) => {
            Ok(HttpResponse::Conflict().json(serde_json::json!({
                "error": format!(
                    "Duplicate email. Contact already exists with id {}: {}",
                    existing.id, existing.name
                ),
                "contact": existing,
            })))
        }
        Err(e) => Ok(error_response(&e)),
    }
}

async fn list_contacts(
    storage: web::Data<Arc<StorageManager>>,
    params: web::Query<ListParams>,
) -> ActixResult<HttpResponse> {
    let query = ListQuery {
        only_valid: params.only_valid,
        min_score: Some(params.min_validation_score),
        region: params.region.clone(),
        organization: params.organization.clone(),
        skip: params.skip,
        limit: params.limit.clamp(1, MAX_PAGE_SIZE),
    };

    let (items, total) = storage.registry().list(&query);
    Ok(HttpResponse::Ok().json(PaginatedResponse {
        items,
        total,
        skip: query.skip,
        limit: query.limit,
    }))
}

async fn search_contacts(
    storage: web::Data<Arc<StorageManager>>,
    params: web::Query<SearchParams>,
) -> ActixResult<HttpResponse> {
    if params.q.chars().count() < MIN_SEARCH_TERM_LEN {
        return Ok(HttpResponse::UnprocessableEntity().json(serde_json::json!({
            "error": format!("search term must be at least {MIN_SEARCH_TERM_LEN} characters")
        })));
    }

    let limit = params.limit.clamp(1, MAX_PAGE_SIZE);
    let (items, total) = storage.registry().search(&params.q, params.skip, limit);
    Ok(HttpResponse::Ok().json(PaginatedResponse {
        items,
        total,
        skip: params.skip,
        limit,
    }))
}

async fn list_duplicates(
    storage: web::Data<Arc<StorageManager>>,
    params: web::Query<DuplicateParams>,
) -> ActixResult<HttpResponse> {
    let query = SuspectQuery {
        max_score: params.max_score,
        skip: params.skip,
        limit: params.limit.clamp(1, MAX_PAGE_SIZE),
    };

    let (items, total) = storage.registry().suspects(&query);
    Ok(HttpResponse::Ok().json(PaginatedResponse {
        items,
        total,
        skip: query.skip,
        limit: query.limit,
    }))
}

async fn get_contact(
    storage: web::Data<Arc<StorageManager>>,
    path: web::Path<Uuid>,
) -> ActixResult<HttpResponse> {
    let id = ContactId::from(path.into_inner());

    match storage.registry().get(id) {
        Some(contact) => Ok(HttpResponse::Ok().json(contact)),
        None => Ok(HttpResponse::NotFound().json(serde_json::json!({
            "error": format!("Contact not found: {id}")
        }))),
    }
}

async fn update_contact(
    storage: web::Data<Arc<StorageManager>>,
    path: web::Path<Uuid>,
    req: web::Json<ContactPatch>,
) -> ActixResult<HttpResponse> {
    let id = ContactId::from(path.into_inner());

    match storage.update(id, req.into_inner()) {
        Ok(contact) => Ok(HttpResponse::Ok().json(contact)),
        Err(e) => Ok(error_response(&e)),
    }
}

async fn invalidate_contact(
    storage: web::Data<Arc<StorageManager>>,
    path: web::Path<Uuid>,
    params: web::Query<InvalidateParams>,
) -> ActixResult<HttpResponse> {
    let id = ContactId::from(path.into_inner());

    match storage.invalidate(id, &params.reason) {
        Ok(contact) => Ok(HttpResponse::Ok().json(contact)),
        Err(e) => Ok(error_response(&e)),
    }
}

fn error_response(e: &Error) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        Error::NotFound(_) => HttpResponse::NotFound().json(body),
        Error::DuplicateEmail(_) => HttpResponse::Conflict().json(body),
        Error::InvalidInput(_) => HttpResponse::UnprocessableEntity().json(body),
        _ => HttpResponse::InternalServerError().json(body),
    }
}
