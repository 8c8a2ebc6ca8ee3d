//! Integration tests for the Bondbook API endpoints.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, HeaderName, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use bondbook_core::{LegalName, Lei};
use bondbook_engine::{BondService, BondServiceBuilder};
use bondbook_ext_file::{bundled_currencies, StaticNameResolver};
use bondbook_ext_redb::create_memory_storage;
use bondbook_server::config::DEFAULT_IDENTITY_HEADER;
use bondbook_server::routes::create_router;
use bondbook_server::AppState;
use bondbook_traits::error::ResolveError;
use bondbook_traits::resolver::LegalNameResolver;

const ADMIN: &str = "admin";
const ALT_USER: &str = "alt_user";

/// Resolver that always fails, either with a status or a timeout.
struct BrokenResolver {
    timeout: bool,
}

#[async_trait]
impl LegalNameResolver for BrokenResolver {
    async fn resolve_legal_name(&self, _lei: &Lei) -> Result<LegalName, ResolveError> {
        if self.timeout {
            Err(ResolveError::Timeout)
        } else {
            Err(ResolveError::Status(500))
        }
    }

    fn name(&self) -> &'static str {
        "broken"
    }
}

async fn create_service(resolver: Arc<dyn LegalNameResolver>) -> BondService {
    let service = BondServiceBuilder::new()
        .with_storage(create_memory_storage().expect("Failed to create memory storage"))
        .with_resolver(resolver)
        .build()
        .expect("Failed to build service");
    service
        .populate_currencies(&bundled_currencies().unwrap())
        .await
        .unwrap();
    service
}

fn router_for(service: BondService) -> Router {
    create_router(AppState::new(
        service,
        HeaderName::from_static(DEFAULT_IDENTITY_HEADER),
    ))
}

/// App backed by the bundled legal-name fixture.
async fn create_test_app() -> Router {
    router_for(create_service(Arc::new(StaticNameResolver::bundled().unwrap())).await)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

/// POST a JSON body as `user`.
async fn post_bond(app: &Router, user: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/bonds/")
        .header(header::CONTENT_TYPE, "application/json")
        .header(DEFAULT_IDENTITY_HEADER, user)
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

/// GET the bond list as `user`.
async fn get_bonds(app: &Router, user: &str, query: &str) -> (StatusCode, Value) {
    let uri = if query.is_empty() {
        "/bonds/".to_string()
    } else {
        format!("/bonds/?{query}")
    };
    let request = Request::builder()
        .uri(uri)
        .header(DEFAULT_IDENTITY_HEADER, user)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

fn bond_body(lei: &str, isin: &str, size: i64, currency: &str, maturity: &str) -> Value {
    json!({
        "isin": isin,
        "size": size,
        "currency": currency,
        "maturity": maturity,
        "lei": lei,
    })
}

fn bnp() -> Value {
    bond_body("R0MUWSFPU8MPRO8K5P83", "FR0000131104", 100_000_000, "EUR", "2025-02-28")
}

/// Four bonds owned by admin, one per fixture issuer.
async fn create_fixture_bonds(app: &Router) {
    for body in [
        bond_body("R0MUWSFPU8MPRO8K5P83", "FR0000131104", 100_000_000, "EUR", "2024-02-28"),
        bond_body("3003000G7W1O14CJXY62", "RU000A102E37", 200_000_000, "USD", "2025-02-28"),
        bond_body("984500UB306697672C56", "RU000A102DZ1", 300_000_000, "GBP", "2026-02-28"),
        bond_body("335800O79JS4I4IBD212", "RU000A102DV0", 400_000_000, "EUR", "2027-02-28"),
    ] {
        let (status, body) = post_bond(app, ADMIN, body).await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
    }
}

fn leis(body: &Value) -> Vec<&str> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|b| b["lei"].as_str().unwrap())
        .collect()
}

// =============================================================================
// HEALTH
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app().await;

    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["currencies"], 162);
}

#[tokio::test]
async fn test_currency_fixture_is_idempotent() {
    let service = create_service(Arc::new(StaticNameResolver::new())).await;
    service
        .populate_currencies(&bundled_currencies().unwrap())
        .await
        .unwrap();
    let app = router_for(service);

    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let (_, body) = send(&app, request).await;
    assert_eq!(body["currencies"], 162);
}

// =============================================================================
// CREATE
// =============================================================================

#[tokio::test]
async fn test_create_bond() {
    let app = create_test_app().await;

    let (status, body) = post_bond(&app, ADMIN, bnp()).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        body,
        json!({
            "isin": "FR0000131104",
            "size": 100000000,
            "currency": "EUR",
            "maturity": "2025-02-28",
            "lei": "R0MUWSFPU8MPRO8K5P83",
            "legal_name": "BNP PARIBAS",
        })
    );

    let (status, body) = get_bonds(&app, ADMIN, "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["legal_name"], "BNP PARIBAS");
}

#[tokio::test]
async fn test_client_legal_name_is_ignored() {
    let app = create_test_app().await;
    let mut body = bnp();
    body["legal_name"] = json!("SOMEONE ELSE");

    let (status, body) = post_bond(&app, ADMIN, body).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["legal_name"], "BNP PARIBAS");
}

#[tokio::test]
async fn test_create_from_form() {
    let app = create_test_app().await;

    let request = Request::builder()
        .method("POST")
        .uri("/bonds/")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .header(DEFAULT_IDENTITY_HEADER, ADMIN)
        .body(Body::from(
            "isin=FR0000131104&size=100000000&currency=EUR&maturity=2025-02-28&lei=R0MUWSFPU8MPRO8K5P83",
        ))
        .unwrap();
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["size"], 100000000);
    assert_eq!(body["legal_name"], "BNP PARIBAS");
}

#[tokio::test]
async fn test_create_from_multipart() {
    let app = create_test_app().await;

    let boundary = "bondbook-boundary";
    let mut form = String::new();
    for (name, value) in [
        ("isin", "FR0000131104"),
        ("size", "100000000"),
        ("currency", "EUR"),
        ("maturity", "2025-02-28"),
        ("lei", "R0MUWSFPU8MPRO8K5P83"),
        ("legal_name", "SOMEONE ELSE"),
    ] {
        form.push_str(&format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        ));
    }
    form.push_str(&format!("--{boundary}--\r\n"));

    let request = Request::builder()
        .method("POST")
        .uri("/bonds/")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .header(DEFAULT_IDENTITY_HEADER, ADMIN)
        .body(Body::from(form))
        .unwrap();
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["size"], 100000000);
    assert_eq!(body["lei"], "R0MUWSFPU8MPRO8K5P83");
    assert_eq!(body["legal_name"], "BNP PARIBAS");
}

#[tokio::test]
async fn test_lowercase_identifiers_are_stored_uppercased() {
    let app = create_test_app().await;

    let body = bond_body("r0muwsfpu8mpro8k5p83", "fr0000131104", 100_000_000, "EUR", "2025-02-28");
    let (status, body) = post_bond(&app, ADMIN, body).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["lei"], "R0MUWSFPU8MPRO8K5P83");
    assert_eq!(body["isin"], "FR0000131104");
    assert_eq!(body["legal_name"], "BNP PARIBAS");

    let (status, body) = post_bond(&app, ADMIN, bnp()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["lei"], json!(["bond with this lei already exists."]));
}

#[tokio::test]
async fn test_unsupported_media_type() {
    let app = create_test_app().await;

    let request = Request::builder()
        .method("POST")
        .uri("/bonds/")
        .header(header::CONTENT_TYPE, "text/plain")
        .header(DEFAULT_IDENTITY_HEADER, ADMIN)
        .body(Body::from("lei=R0MUWSFPU8MPRO8K5P83"))
        .unwrap();
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert!(body["detail"].as_str().unwrap().contains("text/plain"));
}

#[tokio::test]
async fn test_malformed_json() {
    let app = create_test_app().await;

    let request = Request::builder()
        .method("POST")
        .uri("/bonds/")
        .header(header::CONTENT_TYPE, "application/json")
        .header(DEFAULT_IDENTITY_HEADER, ADMIN)
        .body(Body::from("{\"lei\": "))
        .unwrap();
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn test_duplicate_lei() {
    let app = create_test_app().await;

    let (status, _) = post_bond(&app, ADMIN, bnp()).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = post_bond(&app, ALT_USER, bnp()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"lei": ["bond with this lei already exists."]}));

    let (_, body) = get_bonds(&app, ALT_USER, "").await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_invalid_lei() {
    let app = create_test_app().await;
    let mut body = bnp();
    body["lei"] = json!("NOOOOOOOOOOOOOOOOOPE");

    let (status, body) = post_bond(&app, ADMIN, body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"lei": ["NOOOOOOOOOOOOOOOOOPE is not a valid LEI"]}));
}

#[tokio::test]
async fn test_invalid_isin() {
    let app = create_test_app().await;
    let mut body = bnp();
    body["isin"] = json!("NOOOOOOOOOPE");

    let (status, body) = post_bond(&app, ADMIN, body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"isin": ["NOOOOOOOOOPE is not a valid ISIN"]}));
}

#[tokio::test]
async fn test_wrong_length_identifiers() {
    let app = create_test_app().await;
    let mut body = bnp();
    body["lei"] = json!("R0MUWSFPU8MPRO8K5P8");
    body["isin"] = json!("NOOOOOOOOPE");

    let (status, body) = post_bond(&app, ADMIN, body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({
            "lei": ["This value must be 20 characters long"],
            "isin": ["This value must be 12 characters long"],
        })
    );
}

#[tokio::test]
async fn test_invalid_currency() {
    let app = create_test_app().await;
    let mut body = bnp();
    body["currency"] = json!("XXX");

    let (status, body) = post_bond(&app, ADMIN, body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"currency": ["XXX is not a valid currency"]}));
}

#[tokio::test]
async fn test_errors_across_fields_are_aggregated() {
    let app = create_test_app().await;
    let body = bond_body("NOOOOOOOOOOOOOOOOOPE", "FR0000131104", 1, "XXX", "2025-02-28");

    let (status, body) = post_bond(&app, ADMIN, body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({
            "lei": ["NOOOOOOOOOOOOOOOOOPE is not a valid LEI"],
            "currency": ["XXX is not a valid currency"],
        })
    );
}

#[tokio::test]
async fn test_missing_and_malformed_fields() {
    let app = create_test_app().await;

    let (status, body) = post_bond(&app, ADMIN, json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    for field in ["isin", "size", "currency", "maturity", "lei"] {
        assert_eq!(body[field], json!(["This field is required."]), "{field}");
    }

    let mut body = bnp();
    body["size"] = json!("a lot");
    body["maturity"] = json!("28/02/2025");
    let (status, body) = post_bond(&app, ADMIN, body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["size"], json!(["A valid integer is required."]));
    assert_eq!(
        body["maturity"],
        json!(["Date has wrong format. Use one of these formats instead: YYYY-MM-DD."])
    );
}

#[tokio::test]
async fn test_null_fields() {
    let app = create_test_app().await;

    let mut body = bnp();
    body["size"] = Value::Null;
    body["currency"] = Value::Null;
    body.as_object_mut().unwrap().remove("maturity");
    let (status, body) = post_bond(&app, ADMIN, body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["size"], json!(["This field may not be null."]));
    assert_eq!(body["currency"], json!(["This field may not be null."]));
    assert_eq!(body["maturity"], json!(["This field is required."]));
    assert!(body.get("lei").is_none());
}

// =============================================================================
// RESOLVER FAILURES
// =============================================================================

#[tokio::test]
async fn test_resolver_failure_is_bad_gateway() {
    let app = router_for(create_service(Arc::new(BrokenResolver { timeout: false })).await);

    let (status, body) = post_bond(&app, ADMIN, bnp()).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(
        body["detail"],
        "could not resolve legal name for R0MUWSFPU8MPRO8K5P83: registry returned status 500"
    );

    let (_, body) = get_bonds(&app, ADMIN, "").await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_resolver_timeout_is_gateway_timeout() {
    let app = router_for(create_service(Arc::new(BrokenResolver { timeout: true })).await);

    let (status, _) = post_bond(&app, ADMIN, bnp()).await;
    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
}

#[tokio::test]
async fn test_validation_runs_before_resolver() {
    let app = router_for(create_service(Arc::new(BrokenResolver { timeout: false })).await);
    let mut body = bnp();
    body["currency"] = json!("XXX");

    let (status, _) = post_bond(&app, ADMIN, body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// LIST & FILTER
// =============================================================================

#[tokio::test]
async fn test_filtering() {
    let app = create_test_app().await;
    create_fixture_bonds(&app).await;

    let (status, body) = get_bonds(&app, ADMIN, "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 4);

    let (_, body) = get_bonds(&app, ADMIN, "isin=RU000A102DV0").await;
    assert_eq!(leis(&body), ["335800O79JS4I4IBD212"]);

    let (_, body) = get_bonds(&app, ADMIN, "size=300000000").await;
    assert_eq!(leis(&body), ["984500UB306697672C56"]);

    let (_, body) = get_bonds(&app, ADMIN, "currency=EUR").await;
    assert_eq!(leis(&body), ["335800O79JS4I4IBD212", "R0MUWSFPU8MPRO8K5P83"]);

    let (_, body) = get_bonds(&app, ADMIN, "maturity=2025-02-28").await;
    assert_eq!(leis(&body), ["3003000G7W1O14CJXY62"]);

    let (_, body) = get_bonds(&app, ADMIN, "lei=R0MUWSFPU8MPRO8K5P83").await;
    assert_eq!(leis(&body), ["R0MUWSFPU8MPRO8K5P83"]);

    let (_, body) = get_bonds(&app, ADMIN, "legal_name=ASLAM%20CONSULTING%20AS").await;
    assert_eq!(leis(&body), ["984500UB306697672C56"]);

    let (_, body) = get_bonds(&app, ADMIN, "currency=EUR&size=400000000").await;
    assert_eq!(leis(&body), ["335800O79JS4I4IBD212"]);

    let (_, body) = get_bonds(&app, ADMIN, "currency=USD&size=400000000").await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_unknown_and_unparsable_filters() {
    let app = create_test_app().await;
    create_fixture_bonds(&app).await;

    let (status, body) = get_bonds(&app, ADMIN, "page=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 4);

    let (status, body) = get_bonds(&app, ADMIN, "size=lots").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_multiple_users() {
    let app = create_test_app().await;
    create_fixture_bonds(&app).await;

    let (_, body) = get_bonds(&app, ALT_USER, "").await;
    assert_eq!(body, json!([]));

    let (_, body) = get_bonds(&app, ALT_USER, "lei=R0MUWSFPU8MPRO8K5P83").await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_route_without_trailing_slash() {
    let app = create_test_app().await;

    let request = Request::builder()
        .method("POST")
        .uri("/bonds")
        .header(header::CONTENT_TYPE, "application/json")
        .header(DEFAULT_IDENTITY_HEADER, ADMIN)
        .body(Body::from(bnp().to_string()))
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::CREATED);

    let request = Request::builder()
        .uri("/bonds")
        .header(DEFAULT_IDENTITY_HEADER, ADMIN)
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

// =============================================================================
// AUTHENTICATION
// =============================================================================

#[tokio::test]
async fn test_unauthenticated_requests() {
    let app = create_test_app().await;
    let expected = json!({"detail": "Authentication credentials were not provided."});

    let request = Request::builder().uri("/bonds/").body(Body::empty()).unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, expected);

    let request = Request::builder()
        .method("POST")
        .uri("/bonds/")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(bnp().to_string()))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, expected);

    let request = Request::builder()
        .uri("/bonds/")
        .header(DEFAULT_IDENTITY_HEADER, "   ")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
