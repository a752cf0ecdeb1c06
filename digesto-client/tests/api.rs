use std::sync::{Arc, Mutex};

use anyhow::Result;
use axum::{
    Json, Router,
    extract::{Path, RawQuery, State},
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
    routing::{get, post, put},
};
use digesto_client::{ClientError, DigestoClient};
use digesto_core::auth::RoleKind;
use digesto_core::domain::lookup::LookupKind;
use digesto_core::dto::auth::Credentials;
use digesto_core::dto::audit::AuditQuery;
use digesto_core::dto::document::DocumentRequest;
use digesto_core::dto::lookup::LookupRequest;
use digesto_core::dto::user::UserRequest;
use digesto_core::search::DocumentFilter;
use serde_json::{Value, json};
use tokio::net::TcpListener;

const TOKEN: &str = "test-token";

#[derive(Clone, Default)]
struct Recorded {
    queries: Arc<Mutex<Vec<String>>>,
    paths: Arc<Mutex<Vec<String>>>,
    bodies: Arc<Mutex<Vec<Value>>>,
}

fn document_json(id: i64) -> Value {
    json!({
        "id": id,
        "titulo": "Reglamento",
        "numero": format!("RES-{}/2024", id),
        "fechaCreacion": "2024-05-01",
        "tipo": {"id": 1, "nombre": "Resolución"},
        "sector": {"id": 2, "nombre": "Legales"},
        "estado": {"id": 1, "nombre": "Vigente"}
    })
}

fn is_authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {}", TOKEN))
}

fn unauthorized() -> axum::response::Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"message": "Token inválido"})),
    )
        .into_response()
}

async fn sign_in(Json(body): Json<Value>) -> axum::response::Response {
    if body["password"] != "secreto123" {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "Bad credentials"})),
        )
            .into_response();
    }
    Json(json!({
        "token": TOKEN,
        "tipo": "Bearer",
        "id": 1,
        "nombre": "Ana",
        "apellido": "Gómez",
        "email": body["email"],
        "rol": "ADMIN"
    }))
    .into_response()
}

async fn list_documents() -> Json<Value> {
    Json(json!([document_json(1), document_json(2)]))
}

async fn search_documents(
    State(recorded): State<Recorded>,
    RawQuery(query): RawQuery,
) -> Json<Value> {
    recorded
        .queries
        .lock()
        .unwrap()
        .push(query.unwrap_or_default());
    Json(json!([document_json(2)]))
}

async fn create_document(headers: HeaderMap, Json(body): Json<Value>) -> axum::response::Response {
    if !is_authorized(&headers) {
        return unauthorized();
    }
    let mut doc = document_json(9);
    doc["titulo"] = body["titulo"].clone();
    (StatusCode::CREATED, Json(doc)).into_response()
}

async fn retire_document(
    State(recorded): State<Recorded>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> axum::response::Response {
    if !is_authorized(&headers) {
        return unauthorized();
    }
    recorded
        .paths
        .lock()
        .unwrap()
        .push(format!("baja:{}", id));
    StatusCode::NO_CONTENT.into_response()
}

async fn get_document(Path(id): Path<i64>) -> axum::response::Response {
    if id == 404 {
        return (StatusCode::NOT_FOUND, "no existe").into_response();
    }
    Json(document_json(id)).into_response()
}

async fn upload(headers: HeaderMap) -> axum::response::Response {
    if !is_authorized(&headers) {
        return unauthorized();
    }
    let multipart = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("multipart/form-data"));
    if !multipart {
        return StatusCode::BAD_REQUEST.into_response();
    }
    Json(json!({"id": 31, "nombre": "acta.pdf"})).into_response()
}

async fn download(Path(name): Path<String>) -> axum::response::Response {
    (StatusCode::OK, format!("contents of {}", name)).into_response()
}

async fn sectors() -> Json<Value> {
    Json(json!([{"id": 1, "nombre": "Legales"}, {"id": 2, "nombre": "Hacienda"}]))
}

async fn create_sector(Json(body): Json<Value>) -> Json<Value> {
    Json(json!({"id": 3, "nombre": body["nombre"]}))
}

fn user_json(id: i64, status: Value) -> Value {
    json!({
        "id": id,
        "nombre": "Ana",
        "apellido": "Gómez",
        "email": format!("user{}@digesto.gob", id),
        "rol": {"id": 2, "nombre": "EDITOR"},
        "estado": status,
        "sector": {"id": 2, "nombre": "Legales"}
    })
}

fn active() -> Value {
    json!({"id": 1, "nombre": "Activo"})
}

async fn list_users(headers: HeaderMap) -> axum::response::Response {
    if !is_authorized(&headers) {
        return unauthorized();
    }
    Json(json!([user_json(5, active()), user_json(6, active())])).into_response()
}

async fn get_user(Path(id): Path<i64>) -> Json<Value> {
    Json(user_json(id, active()))
}

async fn create_user(State(recorded): State<Recorded>, Json(body): Json<Value>) -> impl IntoResponse {
    recorded.bodies.lock().unwrap().push(body.clone());
    let mut user = user_json(11, active());
    user["email"] = body["email"].clone();
    (StatusCode::CREATED, Json(user))
}

async fn update_user(
    State(recorded): State<Recorded>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Json<Value> {
    recorded.bodies.lock().unwrap().push(body.clone());
    let mut user = user_json(id, active());
    user["nombre"] = body["nombre"].clone();
    Json(user)
}

async fn set_user_status(
    State(recorded): State<Recorded>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Json<Value> {
    recorded.bodies.lock().unwrap().push(body.clone());
    Json(user_json(id, json!({"id": body["estadoId"], "nombre": "Inactivo"})))
}

async fn update_sector(
    State(recorded): State<Recorded>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Json<Value> {
    recorded.paths.lock().unwrap().push(format!("put:{}", id));
    Json(json!({"id": id, "nombre": body["nombre"], "descripcion": body["descripcion"]}))
}

async fn delete_sector(State(recorded): State<Recorded>, Path(id): Path<i64>) -> StatusCode {
    recorded.paths.lock().unwrap().push(format!("delete:{}", id));
    StatusCode::NO_CONTENT
}

async fn audit_records(
    State(recorded): State<Recorded>,
    RawQuery(query): RawQuery,
) -> Json<Value> {
    recorded
        .queries
        .lock()
        .unwrap()
        .push(query.unwrap_or_default());
    Json(json!([{
        "id": 1,
        "usuario": "ana@digesto.gob",
        "accion": "UPDATE",
        "entidad": "Documento",
        "entidadId": 7,
        "fecha": "2024-05-01T10:00:00Z"
    }]))
}

async fn spawn_server() -> Result<(String, Recorded)> {
    let recorded = Recorded::default();
    let app = Router::new()
        .route("/api/v1/auth/signin", post(sign_in))
        .route("/api/v1/documentos", get(list_documents).post(create_document))
        .route("/api/v1/documentos/buscar", get(search_documents))
        .route("/api/v1/documentos/{id}", get(get_document))
        .route("/api/v1/documentos/{id}/baja", put(retire_document))
        .route("/api/v1/archivos", post(upload))
        .route("/api/v1/archivos/{name}", get(download))
        .route("/api/sectores", get(sectors).post(create_sector))
        .route("/api/sectores/{id}", put(update_sector).delete(delete_sector))
        .route("/api/v1/usuarios", get(list_users).post(create_user))
        .route("/api/v1/usuarios/{id}", get(get_user).put(update_user))
        .route("/api/v1/usuarios/{id}/estado", put(set_user_status))
        .route("/api/v1/registros", get(audit_records))
        .with_state(recorded.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok((format!("http://{}", addr), recorded))
}

fn request() -> DocumentRequest {
    DocumentRequest {
        title: "Nueva ordenanza".to_string(),
        number: "ORD-9/2024".to_string(),
        created_on: chrono::NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        summary: None,
        type_id: 1,
        sector_id: 2,
        status_id: 1,
        keywords: vec![],
        reference_ids: vec![],
        file_ids: vec![],
    }
}

#[tokio::test]
async fn sign_in_builds_session() -> Result<()> {
    let (url, _) = spawn_server().await?;
    let client = DigestoClient::new(url);

    let session = client
        .sign_in(&Credentials {
            email: "ana@digesto.gob".to_string(),
            password: "secreto123".to_string(),
        })
        .await?;

    assert_eq!(session.token, TOKEN);
    assert_eq!(session.role, RoleKind::Admin);
    assert_eq!(session.display_name, "Ana Gómez");
    assert_eq!(session.expires_at, None);
    Ok(())
}

#[tokio::test]
async fn bad_credentials_are_unauthorized() -> Result<()> {
    let (url, _) = spawn_server().await?;
    let client = DigestoClient::new(url);

    let err = client
        .sign_in(&Credentials {
            email: "ana@digesto.gob".to_string(),
            password: "wrong".to_string(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Unauthorized(ref m) if m == "Bad credentials"));
    Ok(())
}

#[tokio::test]
async fn browsing_works_anonymously() -> Result<()> {
    let (url, _) = spawn_server().await?;
    let client = DigestoClient::new(url);

    let docs = client.list_documents().await?;
    assert_eq!(docs.len(), 2);

    let doc = client.get_document(7).await?;
    assert_eq!(doc.number, "RES-7/2024");

    let err = client.get_document(404).await.unwrap_err();
    assert!(err.is_not_found());
    Ok(())
}

#[tokio::test]
async fn search_sends_filter_as_query() -> Result<()> {
    let (url, recorded) = spawn_server().await?;
    let client = DigestoClient::new(url);

    let filter = DocumentFilter {
        text: Some("obras viales".to_string()),
        sector_id: Some(2),
        ..Default::default()
    };
    let docs = client.search_documents(&filter).await?;
    assert_eq!(docs.len(), 1);

    let queries = recorded.queries.lock().unwrap().clone();
    assert_eq!(queries, vec!["texto=obras+viales&sectorId=2".to_string()]);
    Ok(())
}

#[tokio::test]
async fn mutations_require_bearer_token() -> Result<()> {
    let (url, recorded) = spawn_server().await?;

    let anonymous = DigestoClient::new(url.clone());
    let err = anonymous.create_document(&request()).await.unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(err.user_message(), "Your session has expired. Please log in again.");

    let client = DigestoClient::new(url).with_token(TOKEN);
    let created = client.create_document(&request()).await?;
    assert_eq!(created.id, 9);
    assert_eq!(created.title, "Nueva ordenanza");

    client.retire_document(9).await?;
    assert_eq!(*recorded.paths.lock().unwrap(), vec!["baja:9".to_string()]);
    Ok(())
}

#[tokio::test]
async fn upload_and_download_files() -> Result<()> {
    let (url, _) = spawn_server().await?;
    let client = DigestoClient::new(url).with_token(TOKEN);

    let file = client.upload_file("acta.pdf", b"%PDF-1.4".to_vec()).await?;
    assert_eq!(file.id, 31);

    let bytes = client.download_file("acta 2024.pdf").await?;
    assert_eq!(bytes, b"contents of acta 2024.pdf".to_vec());
    Ok(())
}

#[tokio::test]
async fn lookups_and_managed_catalogs() -> Result<()> {
    let (url, _) = spawn_server().await?;
    let client = DigestoClient::new(url).with_token(TOKEN);

    let sectors = client.list_lookup(LookupKind::Sector).await?;
    assert_eq!(sectors.len(), 2);

    let created = client
        .create_lookup(
            LookupKind::Sector,
            &LookupRequest {
                name: "Obras".to_string(),
                description: None,
            },
        )
        .await?;
    assert_eq!(created.name, "Obras");

    let err = client
        .create_lookup(
            LookupKind::Keyword,
            &LookupRequest {
                name: "x".to_string(),
                description: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::InvalidRequest(_)));
    Ok(())
}

fn user_request(password: Option<&str>) -> UserRequest {
    UserRequest {
        first_name: "Ana María".to_string(),
        last_name: "Gómez".to_string(),
        email: "ana@digesto.gob".to_string(),
        password: password.map(str::to_string),
        role_id: 2,
        sector_id: 2,
        job_title_id: None,
        status_id: Some(1),
    }
}

#[tokio::test]
async fn user_administration() -> Result<()> {
    let (url, recorded) = spawn_server().await?;

    let anonymous = DigestoClient::new(url.clone());
    assert!(anonymous.list_users().await.unwrap_err().is_unauthorized());

    let client = DigestoClient::new(url).with_token(TOKEN);
    let users = client.list_users().await?;
    assert_eq!(users.len(), 2);
    assert_eq!(users[0].role.name, "EDITOR");

    let user = client.get_user(6).await?;
    assert_eq!(user.email, "user6@digesto.gob");

    let created = client.create_user(&user_request(Some("secreto123"))).await?;
    assert_eq!(created.id, 11);
    assert_eq!(created.email, "ana@digesto.gob");

    let updated = client.update_user(11, &user_request(None)).await?;
    assert_eq!(updated.first_name, "Ana María");

    let deactivated = client.set_user_status(11, 2).await?;
    assert_eq!(deactivated.status.id, 2);
    assert_eq!(deactivated.status.name, "Inactivo");

    let bodies = recorded.bodies.lock().unwrap().clone();
    assert_eq!(bodies.len(), 3);
    assert_eq!(bodies[0]["password"], "secreto123");
    assert_eq!(bodies[0]["rolId"], 2);
    assert_eq!(bodies[0]["estadoId"], 1);
    // an update without a new password leaves it out of the body
    assert!(bodies[1].get("password").is_none());
    assert_eq!(bodies[2], json!({"estadoId": 2}));
    Ok(())
}

#[tokio::test]
async fn rename_and_delete_managed_entries() -> Result<()> {
    let (url, recorded) = spawn_server().await?;
    let client = DigestoClient::new(url).with_token(TOKEN);

    let renamed = client
        .update_lookup(
            LookupKind::Sector,
            3,
            &LookupRequest {
                name: "Obras públicas".to_string(),
                description: Some("Infraestructura".to_string()),
            },
        )
        .await?;
    assert_eq!(renamed.name, "Obras públicas");
    assert_eq!(renamed.description.as_deref(), Some("Infraestructura"));

    client.delete_lookup(LookupKind::Sector, 3).await?;
    assert_eq!(
        *recorded.paths.lock().unwrap(),
        vec!["put:3".to_string(), "delete:3".to_string()]
    );

    let err = client.delete_lookup(LookupKind::DocumentType, 1).await.unwrap_err();
    assert!(matches!(err, ClientError::InvalidRequest(_)));
    Ok(())
}

#[tokio::test]
async fn audit_filters_are_sent_as_query() -> Result<()> {
    let (url, recorded) = spawn_server().await?;
    let client = DigestoClient::new(url).with_token(TOKEN);

    let query = AuditQuery {
        user: Some("ana@digesto.gob".to_string()),
        action: Some("UPDATE".to_string()),
        from: chrono::NaiveDate::from_ymd_opt(2024, 5, 1),
        to: chrono::NaiveDate::from_ymd_opt(2024, 5, 31),
    };
    let records = client.list_audit_records(&query).await?;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].entity_id, Some(7));
    assert_eq!(records[0].timestamp.to_rfc3339(), "2024-05-01T10:00:00+00:00");

    client.list_audit_records(&AuditQuery::default()).await?;

    let queries = recorded.queries.lock().unwrap().clone();
    assert_eq!(
        queries,
        vec![
            "usuario=ana%40digesto.gob&accion=UPDATE&desde=2024-05-01&hasta=2024-05-31".to_string(),
            String::new(),
        ]
    );
    Ok(())
}
