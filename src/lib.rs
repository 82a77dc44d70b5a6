use actix_cors::Cors;
use actix_web::middleware::Compress;
use actix_web::{http::header, web, App, HttpResponse, HttpServer, Responder};
use actix_web_prometheus::PrometheusMetricsBuilder;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

pub mod config;
pub mod document;
pub mod invoice;
pub mod state;
pub mod validation;

pub use crate::config::AppConfig;
pub use crate::state::AppState;

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error_type: &str, message: &str) -> Self {
        Self {
            error: error_type.to_string(),
            message: message.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn not_found(message: &str) -> Self {
        Self::new("NotFound", message)
    }

    pub fn bad_request(message: &str) -> Self {
        Self::new("BadRequest", message)
    }

    pub fn internal_error(message: &str) -> Self {
        Self::new("InternalServerError", message)
    }
}

pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::invoice::handlers::create_session,
        crate::invoice::handlers::get_session,
        crate::invoice::handlers::delete_session,
        crate::invoice::handlers::update_header,
        crate::invoice::handlers::add_item,
        crate::invoice::handlers::update_item,
        crate::invoice::handlers::remove_item,
        crate::invoice::handlers::submit_invoice,
        crate::invoice::handlers::download_document
    ),
    components(
        schemas(
            invoice::SessionView,
            invoice::model::HeaderFields,
            invoice::model::LineItemView,
            invoice::model::Totals,
            invoice::model::UpdateHeaderRequest,
            invoice::model::UpdateLineItemRequest,
            ErrorResponse,
        )
    ),
    tags(
        (name = "Invoice Form", description = "Invoice form sessions and document generation.")
    )
)]
pub struct ApiDoc;

pub async fn run() -> std::io::Result<()> {
    if std::env::var_os("RUST_LOG").is_none() {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };
    let app_state = web::Data::new(AppState::new(&config));

    let prometheus = PrometheusMetricsBuilder::new("invoice_generator")
        .endpoint("/metrics")
        .build()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, format!("{:?}", e)))?;

    log::info!("Starting server at http://{}:{}", config.host, config.port);
    log::info!("Serving form page from {}", config.static_dir.display());

    let static_dir = config.static_dir.clone();
    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin("http://localhost:5173")
            .allowed_origin("http://localhost:3000")
            .allowed_origin("http://localhost:8080")
            .allowed_origin("http://127.0.0.1:8080")
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
            .expose_headers(vec![header::CONTENT_DISPOSITION])
            .max_age(3600);

        App::new()
            .wrap(Compress::default())
            .wrap(prometheus.clone())
            .wrap(cors)
            .app_data(app_state.clone())
            .service(web::scope("/api").configure(invoice::config))
            .service(web::resource("/health").route(web::get().to(health)))
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .service(actix_files::Files::new("/", static_dir.clone()).index_file("index.html"))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
