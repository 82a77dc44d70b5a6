use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use uuid::Uuid;

use crate::document::{GeneratedDocument, Generator};
use crate::invoice::model::{LineItemView, UpdateHeaderRequest, UpdateLineItemRequest};
use crate::invoice::session::{SessionError, SessionView};
use crate::invoice::store::SharedSession;
use crate::{AppState, ErrorResponse};

async fn find_session(state: &web::Data<AppState>, id: Uuid) -> Result<SharedSession, HttpResponse> {
    state
        .sessions
        .get(&id)
        .await
        .ok_or_else(|| HttpResponse::NotFound().json(ErrorResponse::not_found("Session not found")))
}

fn session_error_response(error: &SessionError) -> HttpResponse {
    match error {
        SessionError::ItemNotFound(_) => {
            HttpResponse::NotFound().json(ErrorResponse::not_found(&error.to_string()))
        }
        SessionError::Validation(message) => {
            HttpResponse::BadRequest().json(ErrorResponse::bad_request(message))
        }
        SessionError::NoLineItems => HttpResponse::UnprocessableEntity()
            .json(ErrorResponse::new("NoLineItems", &error.to_string())),
    }
}

fn document_response(document: &GeneratedDocument) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(document.content_type)
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(document.filename.clone())],
        })
        .body(document.bytes.clone())
}

#[utoipa::path(
    post,
    path = "/api/sessions",
    tag = "Invoice Form",
    responses(
        (status = 201, description = "Session created with default form values", body = SessionView)
    )
)]
pub async fn create_session(state: web::Data<AppState>) -> impl Responder {
    let session = state.sessions.create().await;
    let view = session.lock().view();
    HttpResponse::Created().json(view)
}

#[utoipa::path(
    get,
    path = "/api/sessions/{id}",
    tag = "Invoice Form",
    params(
        ("id" = Uuid, Path, description = "Session ID")
    ),
    responses(
        (status = 200, description = "Current form state with live totals", body = SessionView),
        (status = 404, description = "Session not found", body = ErrorResponse)
    )
)]
pub async fn get_session(state: web::Data<AppState>, path: web::Path<Uuid>) -> impl Responder {
    match find_session(&state, path.into_inner()).await {
        Ok(session) => HttpResponse::Ok().json(session.lock().view()),
        Err(response) => response,
    }
}

#[utoipa::path(
    delete,
    path = "/api/sessions/{id}",
    tag = "Invoice Form",
    params(
        ("id" = Uuid, Path, description = "Session ID")
    ),
    responses(
        (status = 204, description = "Session discarded"),
        (status = 404, description = "Session not found", body = ErrorResponse)
    )
)]
pub async fn delete_session(state: web::Data<AppState>, path: web::Path<Uuid>) -> impl Responder {
    if state.sessions.remove(&path.into_inner()).await {
        HttpResponse::NoContent().finish()
    } else {
        HttpResponse::NotFound().json(ErrorResponse::not_found("Session not found"))
    }
}

#[utoipa::path(
    put,
    path = "/api/sessions/{id}/header",
    tag = "Invoice Form",
    params(
        ("id" = Uuid, Path, description = "Session ID")
    ),
    request_body = UpdateHeaderRequest,
    responses(
        (status = 200, description = "Header fields updated", body = SessionView),
        (status = 404, description = "Session not found", body = ErrorResponse)
    )
)]
pub async fn update_header(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    item: web::Json<UpdateHeaderRequest>,
) -> impl Responder {
    let session = match find_session(&state, path.into_inner()).await {
        Ok(session) => session,
        Err(response) => return response,
    };

    let mut session = session.lock();
    session.edit_header(&item);
    HttpResponse::Ok().json(session.view())
}

#[utoipa::path(
    post,
    path = "/api/sessions/{id}/items",
    tag = "Invoice Form",
    params(
        ("id" = Uuid, Path, description = "Session ID")
    ),
    responses(
        (status = 201, description = "Blank line item appended", body = LineItemView),
        (status = 404, description = "Session not found", body = ErrorResponse)
    )
)]
pub async fn add_item(state: web::Data<AppState>, path: web::Path<Uuid>) -> impl Responder {
    let session = match find_session(&state, path.into_inner()).await {
        Ok(session) => session,
        Err(response) => return response,
    };

    let mut session = session.lock();
    let item = session.add_item().clone();
    let view = LineItemView::new(session.items().len(), &item);
    HttpResponse::Created().json(view)
}

#[utoipa::path(
    put,
    path = "/api/sessions/{id}/items/{item_id}",
    tag = "Invoice Form",
    params(
        ("id" = Uuid, Path, description = "Session ID"),
        ("item_id" = Uuid, Path, description = "Line item ID")
    ),
    request_body = UpdateLineItemRequest,
    responses(
        (status = 200, description = "Line item updated", body = SessionView),
        (status = 400, description = "Unit price below zero or quantity below one", body = ErrorResponse),
        (status = 404, description = "Session or line item not found", body = ErrorResponse)
    )
)]
pub async fn update_item(
    state: web::Data<AppState>,
    path: web::Path<(Uuid, Uuid)>,
    item: web::Json<UpdateLineItemRequest>,
) -> impl Responder {
    let (session_id, item_id) = path.into_inner();
    let session = match find_session(&state, session_id).await {
        Ok(session) => session,
        Err(response) => return response,
    };

    let mut session = session.lock();
    if let Err(e) = session.edit_item(item_id, &item) {
        return session_error_response(&e);
    }
    HttpResponse::Ok().json(session.view())
}

#[utoipa::path(
    delete,
    path = "/api/sessions/{id}/items/{item_id}",
    tag = "Invoice Form",
    params(
        ("id" = Uuid, Path, description = "Session ID"),
        ("item_id" = Uuid, Path, description = "Line item ID")
    ),
    responses(
        (status = 200, description = "Line item removed, remaining items renumbered", body = SessionView),
        (status = 404, description = "Session or line item not found", body = ErrorResponse)
    )
)]
pub async fn remove_item(
    state: web::Data<AppState>,
    path: web::Path<(Uuid, Uuid)>,
) -> impl Responder {
    let (session_id, item_id) = path.into_inner();
    let session = match find_session(&state, session_id).await {
        Ok(session) => session,
        Err(response) => return response,
    };

    let mut session = session.lock();
    if let Err(e) = session.remove_item(item_id) {
        return session_error_response(&e);
    }
    HttpResponse::Ok().json(session.view())
}

#[utoipa::path(
    post,
    path = "/api/sessions/{id}/submit",
    tag = "Invoice Form",
    params(
        ("id" = Uuid, Path, description = "Session ID")
    ),
    responses(
        (status = 200, description = "Generated DOCX invoice as an attachment"),
        (status = 404, description = "Session not found", body = ErrorResponse),
        (status = 422, description = "No line items to invoice", body = ErrorResponse),
        (status = 500, description = "Document could not be packaged", body = ErrorResponse)
    )
)]
pub async fn submit_invoice(state: web::Data<AppState>, path: web::Path<Uuid>) -> impl Responder {
    let session_id = path.into_inner();
    let session = match find_session(&state, session_id).await {
        Ok(session) => session,
        Err(response) => return response,
    };

    // One guard from submit until the document is stored
    let mut session = session.lock();
    let record = match session.submit() {
        Ok(record) => record,
        Err(e) => {
            log::warn!("Session {} submitted without line items", session_id);
            return session_error_response(&e);
        }
    };

    let document = match state.renderer.generate(&record) {
        Ok(document) => Arc::new(document),
        Err(e) => {
            log::error!("Failed to render invoice {}: {}", record.header.invoice_number, e);
            return HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error("Failed to generate the invoice document"));
        }
    };

    session.store_document(document.clone());
    document_response(&document)
}

#[utoipa::path(
    get,
    path = "/api/sessions/{id}/document",
    tag = "Invoice Form",
    params(
        ("id" = Uuid, Path, description = "Session ID")
    ),
    responses(
        (status = 200, description = "Last generated DOCX invoice"),
        (status = 404, description = "Session not found or nothing generated yet", body = ErrorResponse)
    )
)]
pub async fn download_document(state: web::Data<AppState>, path: web::Path<Uuid>) -> impl Responder {
    let session = match find_session(&state, path.into_inner()).await {
        Ok(session) => session,
        Err(response) => return response,
    };

    let document = session.lock().last_document();
    match document {
        Some(document) => document_response(&document),
        None => HttpResponse::NotFound().json(ErrorResponse::not_found(
            "No invoice has been generated for this session yet",
        )),
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/sessions").route(web::post().to(create_session)))
        .service(
            web::resource("/sessions/{id}")
                .route(web::get().to(get_session))
                .route(web::delete().to(delete_session)),
        )
        .service(web::resource("/sessions/{id}/header").route(web::put().to(update_header)))
        .service(web::resource("/sessions/{id}/items").route(web::post().to(add_item)))
        .service(
            web::resource("/sessions/{id}/items/{item_id}")
                .route(web::put().to(update_item))
                .route(web::delete().to(remove_item)),
        )
        .service(web::resource("/sessions/{id}/submit").route(web::post().to(submit_invoice)))
        .service(web::resource("/sessions/{id}/document").route(web::get().to(download_document)));
}
