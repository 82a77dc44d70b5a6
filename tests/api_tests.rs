use actix_web::{http::StatusCode, test, web, App};
use rust_decimal::Decimal;
use serde_json::{json, Value};

use invoice_generator::invoice::model::Totals;
use invoice_generator::invoice::session::NO_LINE_ITEMS_WARNING;
use invoice_generator::{AppConfig, AppState};

fn test_state() -> web::Data<AppState> {
    let config = AppConfig::from_lookup(|_| None).unwrap();
    web::Data::new(AppState::new(&config))
}

macro_rules! init_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data($state.clone())
                .service(web::scope("/api").configure(invoice_generator::invoice::config)),
        )
        .await
    };
}

macro_rules! create_session {
    ($app:expr) => {{
        let req = test::TestRequest::post().uri("/api/sessions").to_request();
        let resp = test::call_service(&$app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let view: Value = test::read_body_json(resp).await;
        view
    }};
}

#[actix_web::test]
async fn test_create_session_has_defaults_and_no_items() {
    let state = test_state();
    let app = init_app!(state);

    let view = create_session!(app);
    assert!(view["items"].as_array().unwrap().is_empty());
    assert_eq!(view["header"]["to_company"], "ABC Company W.L.L.");
    assert_eq!(view["header"]["payment_terms"], "30 days from invoice date");
    assert!(view["document_filename"].is_null());

    let totals: Totals = serde_json::from_value(view["totals"].clone()).unwrap();
    assert_eq!(totals.grand_total, Decimal::ZERO);
}

#[actix_web::test]
async fn test_unknown_session_is_not_found() {
    let state = test_state();
    let app = init_app!(state);

    let req = test::TestRequest::get()
        .uri(&format!("/api/sessions/{}", uuid::Uuid::new_v4()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "NotFound");
}

#[actix_web::test]
async fn test_edit_items_updates_live_totals() {
    let state = test_state();
    let app = init_app!(state);
    let id = create_session!(app)["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri(&format!("/api/sessions/{}/items", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let item: Value = test::read_body_json(resp).await;
    assert_eq!(item["no"], 1);
    assert_eq!(item["quantity"], 1);

    let req = test::TestRequest::put()
        .uri(&format!("/api/sessions/{}/items/{}", id, item["id"].as_str().unwrap()))
        .set_json(json!({ "description": "Consulting", "unit_price": 12.333, "quantity": 11 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let view: Value = test::read_body_json(resp).await;
    assert_eq!(view["items"][0]["description"], "Consulting");
    let totals: Totals = serde_json::from_value(view["totals"].clone()).unwrap();
    assert_eq!(totals.subtotal, Decimal::new(135_663, 3));
    assert_eq!(totals.vat_amount, Decimal::new(13_566, 3));
    assert_eq!(totals.grand_total, Decimal::new(149_229, 3));
}

#[actix_web::test]
async fn test_invalid_quantity_is_rejected() {
    let state = test_state();
    let app = init_app!(state);
    let id = create_session!(app)["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri(&format!("/api/sessions/{}/items", id))
        .to_request();
    let item: Value = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::put()
        .uri(&format!("/api/sessions/{}/items/{}", id, item["id"].as_str().unwrap()))
        .set_json(json!({ "quantity": 0 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get()
        .uri(&format!("/api/sessions/{}", id))
        .to_request();
    let view: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(view["items"][0]["quantity"], 1);
}

#[actix_web::test]
async fn test_remove_item_renumbers_the_rest() {
    let state = test_state();
    let app = init_app!(state);
    let id = create_session!(app)["id"].as_str().unwrap().to_string();

    let mut item_ids = Vec::new();
    for _ in 0..3 {
        let req = test::TestRequest::post()
            .uri(&format!("/api/sessions/{}/items", id))
            .to_request();
        let item: Value = test::call_and_read_body_json(&app, req).await;
        item_ids.push(item["id"].as_str().unwrap().to_string());
    }

    let req = test::TestRequest::delete()
        .uri(&format!("/api/sessions/{}/items/{}", id, item_ids[1]))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let view: Value = test::read_body_json(resp).await;
    let items = view["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["id"], item_ids[0].as_str());
    assert_eq!(items[1]["id"], item_ids[2].as_str());
    assert_eq!(items[1]["no"], 2);

    // Removing the same item again finds nothing
    let req = test::TestRequest::delete()
        .uri(&format!("/api/sessions/{}/items/{}", id, item_ids[1]))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_update_header_keeps_other_fields() {
    let state = test_state();
    let app = init_app!(state);
    let id = create_session!(app)["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::put()
        .uri(&format!("/api/sessions/{}/header", id))
        .set_json(json!({ "to_company": "Gulf Trading Co.", "invoice_date": "2025-03-07" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let view: Value = test::read_body_json(resp).await;
    assert_eq!(view["header"]["to_company"], "Gulf Trading Co.");
    assert_eq!(view["header"]["invoice_date"], "2025-03-07");
    assert_eq!(view["header"]["customer_po"], "PO-12345");
}

#[actix_web::test]
async fn test_submit_without_items_warns() {
    let state = test_state();
    let app = init_app!(state);
    let id = create_session!(app)["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri(&format!("/api/sessions/{}/submit", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "NoLineItems");
    assert_eq!(body["message"], NO_LINE_ITEMS_WARNING);

    let req = test::TestRequest::get()
        .uri(&format!("/api/sessions/{}/document", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_submit_returns_docx_attachment() {
    let state = test_state();
    let app = init_app!(state);
    let id = create_session!(app)["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::put()
        .uri(&format!("/api/sessions/{}/header", id))
        .set_json(json!({ "invoice_number": "SSS-250307-001" }))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/sessions/{}/items", id))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/sessions/{}/submit", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let content_type = resp.headers().get("content-type").unwrap().to_str().unwrap();
    assert_eq!(content_type, invoice_generator::document::DOCX_CONTENT_TYPE);
    let disposition = resp
        .headers()
        .get("content-disposition")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.contains("attachment"));
    assert!(disposition.contains("Invoice_SSS-250307-001.docx"));

    let bytes = test::read_body(resp).await;
    assert!(bytes.starts_with(b"PK"));

    // The generated file stays downloadable from the session
    let req = test::TestRequest::get()
        .uri(&format!("/api/sessions/{}/document", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(test::read_body(resp).await, bytes);

    let req = test::TestRequest::get()
        .uri(&format!("/api/sessions/{}", id))
        .to_request();
    let view: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(view["document_filename"], "Invoice_SSS-250307-001.docx");
}

#[actix_web::test]
async fn test_delete_session() {
    let state = test_state();
    let app = init_app!(state);
    let id = create_session!(app)["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::delete()
        .uri(&format!("/api/sessions/{}", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/sessions/{}", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_overflowing_edit_is_rejected_and_session_stays_usable() {
    let state = test_state();
    let app = init_app!(state);
    let id = create_session!(app)["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri(&format!("/api/sessions/{}/items", id))
        .to_request();
    let item: Value = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::put()
        .uri(&format!("/api/sessions/{}/items/{}", id, item["id"].as_str().unwrap()))
        .set_json(json!({ "unit_price": 1e28, "quantity": 10 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "BadRequest");

    let req = test::TestRequest::get()
        .uri(&format!("/api/sessions/{}", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let view: Value = test::read_body_json(resp).await;
    assert_eq!(view["items"][0]["quantity"], 1);

    let req = test::TestRequest::post()
        .uri(&format!("/api/sessions/{}/submit", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_latest_submit_owns_the_download() {
    let state = test_state();
    let app = init_app!(state);
    let id = create_session!(app)["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri(&format!("/api/sessions/{}/items", id))
        .to_request();
    let item: Value = test::call_and_read_body_json(&app, req).await;

    for number in ["SSS-250307-001", "SSS-250307-002"] {
        let req = test::TestRequest::put()
            .uri(&format!("/api/sessions/{}/header", id))
            .set_json(json!({ "invoice_number": number }))
            .to_request();
        test::call_service(&app, req).await;

        let req = test::TestRequest::post()
            .uri(&format!("/api/sessions/{}/submit", id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let req = test::TestRequest::get()
        .uri(&format!("/api/sessions/{}/document", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let disposition = resp
        .headers()
        .get("content-disposition")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.contains("Invoice_SSS-250307-002.docx"));

    // Emptying the list and submitting again withdraws the download
    let req = test::TestRequest::delete()
        .uri(&format!("/api/sessions/{}/items/{}", id, item["id"].as_str().unwrap()))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/sessions/{}/submit", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let req = test::TestRequest::get()
        .uri(&format!("/api/sessions/{}/document", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
