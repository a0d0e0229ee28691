// Handler tests for the Hospital API
// Drives the full router over the in-memory store

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, HeaderValue, Request, StatusCode};
use axum_test::{TestResponse, TestServer};
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::auth::models::Role;
use crate::config::Config;
use crate::memory::MemoryStore;
use crate::test_support::{memory_state_with, new_user, seed_user, test_config, TEST_PASSWORD};
use crate::create_router;

// ============================================================================
// Test Helpers
// ============================================================================

struct TestApp {
    server: TestServer,
    store: Arc<MemoryStore>,
    config: Config,
    // Keeps the avatar directory alive for the test
    _avatars: tempfile::TempDir,
}

fn create_test_app() -> TestApp {
    let avatars = tempfile::tempdir().unwrap();
    let config = test_config(avatars.path());
    let store = Arc::new(MemoryStore::new());
    let app = create_router(memory_state_with(store.clone(), &config), &config);

    TestApp {
        server: TestServer::new(app).unwrap(),
        store,
        config,
        _avatars: avatars,
    }
}

fn cookie(name: &str, token: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("{}={}", name, token)).unwrap()
}

fn patient_payload(email: &str) -> Value {
    json!({
        "firstName": "Jane",
        "lastName": "Doe",
        "email": email,
        "phone": "03001234567",
        "nationalIdentityNumber": "123456789",
        "dob": "1990-04-12",
        "gender": "Female",
        "password": TEST_PASSWORD,
        "confirmPassword": TEST_PASSWORD
    })
}

fn booking_payload(doctor_first_name: &str, doctor_last_name: &str, department: &str) -> Value {
    json!({
        "firstName": "Jane",
        "lastName": "Doe",
        "email": "jane@example.com",
        "phone": "03001234567",
        "nationalIdentityNumber": "123456789",
        "dob": "1990-04-12",
        "gender": "Female",
        "appointment_date": "2026-11-02",
        "department": department,
        "doctor_firstName": doctor_first_name,
        "doctor_lastName": doctor_last_name,
        "hasVisited": false,
        "address": "1 Main Street"
    })
}

async fn login(app: &TestApp, email: &str, role: &str) -> String {
    let response = app
        .server
        .post("/api/v1/user/login")
        .json(&json!({ "email": email, "password": TEST_PASSWORD, "role": role }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    response.json::<Value>()["token"].as_str().unwrap().to_string()
}

async fn seed_and_login(app: &TestApp, email: &str, role: Role) -> String {
    seed_user(&app.store, new_user("Sam", "Staff", email, role, None)).await;
    login(app, email, role.as_str()).await
}

async fn seed_doctor(app: &TestApp, email: &str) {
    seed_user(
        &app.store,
        new_user("Alice", "Smith", email, Role::Doctor, Some("Cardiology")),
    )
    .await;
}

async fn book(app: &TestApp, patient_token: &str, payload: &Value) -> TestResponse {
    app.server
        .post("/api/v1/appointment/post")
        .add_header(header::COOKIE, cookie("patientToken", patient_token))
        .json(payload)
        .await
}

fn assert_error(response: &TestResponse, status: StatusCode, message: &str) {
    assert_eq!(response.status_code(), status);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], message);
    assert!(body["timestamp"].is_string());
}

// ============================================================================
// Registration and login
// ============================================================================

#[tokio::test]
async fn test_register_patient_issues_session_and_hides_password() {
    let app = create_test_app();

    let mut payload = patient_payload("jane@example.com");
    payload["role"] = json!("Admin");
    let response = app
        .server
        .post("/api/v1/user/patient/register")
        .json(&payload)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "User Registered!");
    // The route decides the role
    assert_eq!(body["user"]["role"], "Patient");
    assert!(body["token"].is_string());

    let raw = response.text();
    assert!(!raw.contains(TEST_PASSWORD));
    assert!(!raw.contains("password"));
}

#[tokio::test]
async fn test_register_duplicate_email_is_rejected() {
    let app = create_test_app();
    let payload = patient_payload("jane@example.com");

    app.server
        .post("/api/v1/user/patient/register")
        .json(&payload)
        .await;
    let response = app
        .server
        .post("/api/v1/user/patient/register")
        .json(&payload)
        .await;

    assert_error(&response, StatusCode::BAD_REQUEST, "User already Registered!");
    assert_eq!(response.json::<Value>()["error_code"], "CONFLICT");
}

#[tokio::test]
async fn test_register_missing_field_is_named() {
    let app = create_test_app();
    let mut payload = patient_payload("jane@example.com");
    payload.as_object_mut().unwrap().remove("nationalIdentityNumber");

    let response = app
        .server
        .post("/api/v1/user/patient/register")
        .json(&payload)
        .await;

    assert_error(
        &response,
        StatusCode::BAD_REQUEST,
        "National Identity Number Is Required!",
    );
    assert!(response.json::<Value>()["details"]["national_identity_number"].is_array());
}

#[tokio::test]
async fn test_register_password_mismatch() {
    let app = create_test_app();
    let mut payload = patient_payload("jane@example.com");
    payload["confirmPassword"] = json!("Different#123");

    let response = app
        .server
        .post("/api/v1/user/patient/register")
        .json(&payload)
        .await;

    assert_error(
        &response,
        StatusCode::BAD_REQUEST,
        "Password & Confirm Password Do Not Match!",
    );
}

#[tokio::test]
async fn test_weak_password_is_not_echoed_back() {
    let app = create_test_app();
    let mut payload = patient_payload("jane@example.com");
    payload["password"] = json!("hunter2hunter");
    payload["confirmPassword"] = json!("hunter2hunter");

    let response = app
        .server
        .post("/api/v1/user/patient/register")
        .json(&payload)
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error_code"], "VALIDATION_ERROR");
    assert!(body["details"]["password"].is_array());
    assert!(!response.text().contains("hunter2hunter"));
}

#[tokio::test]
async fn test_malformed_json_is_a_bad_request() {
    let app = create_test_app();

    let response = app
        .server
        .post("/api/v1/user/login")
        .add_header(header::CONTENT_TYPE, HeaderValue::from_static("application/json"))
        .text("{not json")
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error_code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_login_failures() {
    let app = create_test_app();
    seed_user(
        &app.store,
        new_user("Jane", "Doe", "jane@example.com", Role::Patient, None),
    )
    .await;

    let wrong_password = app
        .server
        .post("/api/v1/user/login")
        .json(&json!({ "email": "jane@example.com", "password": "Wrong#1234", "role": "Patient" }))
        .await;
    assert_error(&wrong_password, StatusCode::BAD_REQUEST, "Invalid Email Or Password!");

    let wrong_role = app
        .server
        .post("/api/v1/user/login")
        .json(&json!({ "email": "jane@example.com", "password": TEST_PASSWORD, "role": "Admin" }))
        .await;
    assert_error(&wrong_role, StatusCode::BAD_REQUEST, "User Not Found With This Role!");

    let unknown_account = app
        .server
        .post("/api/v1/user/login")
        .json(&json!({ "email": "nobody", "password": "x", "role": "Nurse" }))
        .await;
    assert_error(&unknown_account, StatusCode::BAD_REQUEST, "Invalid Email Or Password!");

    let unknown_role = app
        .server
        .post("/api/v1/user/login")
        .json(&json!({ "email": "jane@example.com", "password": TEST_PASSWORD, "role": "Nurse" }))
        .await;
    assert_error(&unknown_role, StatusCode::BAD_REQUEST, "User Not Found With This Role!");
}

#[tokio::test]
async fn test_login_sets_role_scoped_cookie() {
    let app = create_test_app();
    seed_user(
        &app.store,
        new_user("Ada", "Admin", "admin@example.com", Role::Admin, None),
    )
    .await;
    let router = create_router(
        memory_state_with(app.store.clone(), &app.config),
        &app.config,
    );

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/user/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({ "email": "admin@example.com", "password": TEST_PASSWORD, "role": "Admin" })
                .to_string(),
        ))
        .unwrap();
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(set_cookie.starts_with("adminToken="));
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("Secure"));
    assert!(set_cookie.contains("SameSite=None"));
    assert!(set_cookie.contains("Max-Age=604800"));
}

// ============================================================================
// Guards
// ============================================================================

#[tokio::test]
async fn test_missing_cookie_is_rejected() {
    let app = create_test_app();

    let response = app.server.get("/api/v1/appointment/getall").await;
    assert_error(&response, StatusCode::BAD_REQUEST, "Admin is not authenticated!");

    let response = app.server.get("/api/v1/user/patient/me").await;
    assert_error(&response, StatusCode::BAD_REQUEST, "User is not authenticated!");
}

#[tokio::test]
async fn test_patient_cannot_reach_admin_routes() {
    let app = create_test_app();
    let token = seed_and_login(&app, "jane@example.com", Role::Patient).await;

    // Even when the patient's token is sent under the admin cookie name
    let response = app
        .server
        .get("/api/v1/appointment/getall")
        .add_header(header::COOKIE, cookie("adminToken", &token))
        .await;

    assert_error(
        &response,
        StatusCode::FORBIDDEN,
        "Patient not authorized for this resource!",
    );
}

#[tokio::test]
async fn test_doctor_session_cannot_book() {
    let app = create_test_app();
    seed_doctor(&app, "alice@example.com").await;
    let token = login(&app, "alice@example.com", "Doctor").await;

    let response = book(&app, &token, &booking_payload("Alice", "Smith", "Cardiology")).await;
    assert_error(
        &response,
        StatusCode::FORBIDDEN,
        "Doctor not authorized for this resource!",
    );
}

#[tokio::test]
async fn test_me_and_logout() {
    let app = create_test_app();
    let token = seed_and_login(&app, "jane@example.com", Role::Patient).await;

    let me = app
        .server
        .get("/api/v1/user/patient/me")
        .add_header(header::COOKIE, cookie("patientToken", &token))
        .await;
    assert_eq!(me.status_code(), StatusCode::OK);
    assert_eq!(me.json::<Value>()["user"]["email"], "jane@example.com");

    let logout = app
        .server
        .get("/api/v1/user/patient/logout")
        .add_header(header::COOKIE, cookie("patientToken", &token))
        .await;
    assert_eq!(logout.status_code(), StatusCode::OK);
    assert_eq!(
        logout.json::<Value>()["message"],
        "Patient Logged Out Successfully."
    );
    let cleared = logout.header(header::SET_COOKIE);
    let cleared = cleared.to_str().unwrap();
    assert!(cleared.starts_with("patientToken=;"));
    assert!(cleared.contains("Max-Age=0"));
}

// ============================================================================
// Appointment lifecycle
// ============================================================================

#[tokio::test]
async fn test_booking_lifecycle() {
    let app = create_test_app();
    seed_doctor(&app, "alice@example.com").await;

    let register = app
        .server
        .post("/api/v1/user/patient/register")
        .json(&patient_payload("jane@example.com"))
        .await;
    let register_body: Value = register.json();
    let patient_token = register_body["token"].as_str().unwrap().to_string();
    let patient_id = register_body["user"]["id"].clone();

    // Book
    let booked = book(&app, &patient_token, &booking_payload("Alice", "Smith", "Cardiology")).await;
    assert_eq!(booked.status_code(), StatusCode::OK);
    let booked_body: Value = booked.json();
    assert_eq!(booked_body["message"], "Appointment Send successfully!");
    let appointment = &booked_body["appointment"];
    assert_eq!(appointment["status"], "Pending");
    assert_eq!(appointment["patientId"], patient_id);
    assert_eq!(appointment["doctorName"]["firstName"], "Alice");
    let id = appointment["id"].as_str().unwrap().to_string();

    // Review as admin
    let admin_token = seed_and_login(&app, "admin@example.com", Role::Admin).await;
    let admin_cookie = cookie("adminToken", &admin_token);

    let listed = app
        .server
        .get("/api/v1/appointment/getall")
        .add_header(header::COOKIE, admin_cookie.clone())
        .await;
    assert_eq!(listed.status_code(), StatusCode::OK);
    assert_eq!(listed.json::<Value>()["appointments"].as_array().unwrap().len(), 1);

    let updated = app
        .server
        .put(&format!("/api/v1/appointment/update/{}", id))
        .add_header(header::COOKIE, admin_cookie.clone())
        .json(&json!({ "status": "Accepted" }))
        .await;
    assert_eq!(updated.status_code(), StatusCode::OK);
    let updated_body: Value = updated.json();
    assert_eq!(updated_body["appointment"]["status"], "Accepted");
    assert_eq!(updated_body["appointment"]["patientId"], patient_id);

    let deleted = app
        .server
        .delete(&format!("/api/v1/appointment/delete/{}", id))
        .add_header(header::COOKIE, admin_cookie.clone())
        .await;
    assert_eq!(deleted.status_code(), StatusCode::OK);
    assert_eq!(deleted.json::<Value>()["message"], "Appointment Deleted!");

    let deleted_again = app
        .server
        .delete(&format!("/api/v1/appointment/delete/{}", id))
        .add_header(header::COOKIE, admin_cookie)
        .await;
    assert_error(&deleted_again, StatusCode::NOT_FOUND, "Appointment not found!");
}

#[tokio::test]
async fn test_booking_unknown_doctor_is_not_found() {
    let app = create_test_app();
    seed_doctor(&app, "alice@example.com").await;
    let token = seed_and_login(&app, "jane@example.com", Role::Patient).await;

    let response = book(&app, &token, &booking_payload("Alice", "Smith", "Neurology")).await;
    assert_error(&response, StatusCode::NOT_FOUND, "Doctor not found");
}

#[tokio::test]
async fn test_booking_ambiguous_doctor_is_a_conflict() {
    let app = create_test_app();
    seed_doctor(&app, "alice1@example.com").await;
    seed_doctor(&app, "alice2@example.com").await;
    let token = seed_and_login(&app, "jane@example.com", Role::Patient).await;

    let response = book(&app, &token, &booking_payload("Alice", "Smith", "Cardiology")).await;
    assert_error(
        &response,
        StatusCode::BAD_REQUEST,
        "Doctors Conflict! Please Contact Through Email Or Phone!",
    );
}

#[tokio::test]
async fn test_booking_validation_precedes_doctor_lookup() {
    let app = create_test_app();
    let token = seed_and_login(&app, "jane@example.com", Role::Patient).await;

    let mut payload = booking_payload("Alice", "Smith", "Cardiology");
    payload["phone"] = json!("123");
    let response = book(&app, &token, &payload).await;

    assert_error(
        &response,
        StatusCode::BAD_REQUEST,
        "Phone Number Must Contain Exact 11 Digits!",
    );
}

#[tokio::test]
async fn test_status_update_rejects_other_fields_and_unknown_ids() {
    let app = create_test_app();
    let admin_token = seed_and_login(&app, "admin@example.com", Role::Admin).await;
    let admin_cookie = cookie("adminToken", &admin_token);

    let extra_fields = app
        .server
        .put(&format!("/api/v1/appointment/update/{}", uuid::Uuid::new_v4()))
        .add_header(header::COOKIE, admin_cookie.clone())
        .json(&json!({ "status": "Accepted", "doctorId": uuid::Uuid::new_v4() }))
        .await;
    assert_eq!(extra_fields.status_code(), StatusCode::BAD_REQUEST);

    let bad_status = app
        .server
        .put(&format!("/api/v1/appointment/update/{}", uuid::Uuid::new_v4()))
        .add_header(header::COOKIE, admin_cookie.clone())
        .json(&json!({ "status": "Cancelled" }))
        .await;
    assert_eq!(bad_status.status_code(), StatusCode::BAD_REQUEST);

    let unknown = app
        .server
        .put(&format!("/api/v1/appointment/update/{}", uuid::Uuid::new_v4()))
        .add_header(header::COOKIE, admin_cookie)
        .json(&json!({ "status": "Rejected" }))
        .await;
    assert_error(&unknown, StatusCode::NOT_FOUND, "Appointment not found!");
}

#[tokio::test]
async fn test_malformed_appointment_id_keeps_json_error_shape() {
    let app = create_test_app();
    let admin_token = seed_and_login(&app, "admin@example.com", Role::Admin).await;
    let admin_cookie = cookie("adminToken", &admin_token);

    let delete = app
        .server
        .delete("/api/v1/appointment/delete/not-a-uuid")
        .add_header(header::COOKIE, admin_cookie.clone())
        .await;
    assert_eq!(delete.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = delete.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["error_code"], "BAD_REQUEST");
    assert!(body["timestamp"].is_string());

    let update = app
        .server
        .put("/api/v1/appointment/update/not-a-uuid")
        .add_header(header::COOKIE, admin_cookie)
        .json(&json!({ "status": "Accepted" }))
        .await;
    assert_eq!(update.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(update.json::<Value>()["error_code"], "BAD_REQUEST");
}

// ============================================================================
// Admin onboarding, doctors and messages
// ============================================================================

#[tokio::test]
async fn test_add_admin_requires_admin_session() {
    let app = create_test_app();
    let admin_token = seed_and_login(&app, "admin@example.com", Role::Admin).await;

    let created = app
        .server
        .post("/api/v1/user/admin/addnew")
        .add_header(header::COOKIE, cookie("adminToken", &admin_token))
        .json(&patient_payload("second-admin@example.com"))
        .await;
    assert_eq!(created.status_code(), StatusCode::OK);
    let body: Value = created.json();
    assert_eq!(body["message"], "New Admin Registered");
    assert_eq!(body["user"]["role"], "Admin");

    let duplicate = app
        .server
        .post("/api/v1/user/admin/addnew")
        .add_header(header::COOKIE, cookie("adminToken", &admin_token))
        .json(&patient_payload("second-admin@example.com"))
        .await;
    assert_error(
        &duplicate,
        StatusCode::BAD_REQUEST,
        "Admin with this same email already exists!",
    );
}

fn multipart_body(boundary: &str, fields: &[(&str, &str)], avatar: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                boundary, name, value
            )
            .as_bytes(),
        );
    }
    if let Some((content_type, bytes)) = avatar {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"doctorAvatar\"; filename=\"avatar\"\r\nContent-Type: {}\r\n\r\n",
                boundary, content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", boundary).as_bytes());
    body
}

#[tokio::test]
async fn test_add_doctor_with_avatar_then_list() {
    let app = create_test_app();
    let admin_token = seed_and_login(&app, "admin@example.com", Role::Admin).await;
    let router = create_router(
        memory_state_with(app.store.clone(), &app.config),
        &app.config,
    );

    let boundary = "hospital-boundary";
    let fields = [
        ("firstName", "Alice"),
        ("lastName", "Smith"),
        ("email", "alice@example.com"),
        ("phone", "03001234567"),
        ("nationalIdentityNumber", "123456789"),
        ("dob", "1980-01-01"),
        ("gender", "Female"),
        ("password", TEST_PASSWORD),
        ("confirmPassword", TEST_PASSWORD),
        ("doctorDepartment", "Cardiology"),
    ];
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/user/doctor/addnew")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        )
        .header(header::COOKIE, format!("adminToken={}", admin_token))
        .body(Body::from(multipart_body(
            boundary,
            &fields,
            Some(("image/png", &b"\x89PNG fake image"[..])),
        )))
        .unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["message"], "New Doctor Registered");
    assert_eq!(body["user"]["doctorDepartment"], "Cardiology");
    assert!(body["user"]["doctorAvatar"]["url"]
        .as_str()
        .unwrap()
        .starts_with("/avatars/"));

    let doctors = app.server.get("/api/v1/user/doctors").await;
    assert_eq!(doctors.status_code(), StatusCode::OK);
    let doctors: Value = doctors.json();
    assert_eq!(doctors["doctors"].as_array().unwrap().len(), 1);
    assert_eq!(doctors["doctors"][0]["email"], "alice@example.com");
}

#[tokio::test]
async fn test_add_doctor_without_avatar_is_rejected() {
    let app = create_test_app();
    let admin_token = seed_and_login(&app, "admin@example.com", Role::Admin).await;
    let router = create_router(
        memory_state_with(app.store.clone(), &app.config),
        &app.config,
    );

    let boundary = "hospital-boundary";
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/user/doctor/addnew")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        )
        .header(header::COOKIE, format!("adminToken={}", admin_token))
        .body(Body::from(multipart_body(boundary, &[("firstName", "Alice")], None)))
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["message"], "Doctor Avatar Required!");
}

#[tokio::test]
async fn test_contact_messages() {
    let app = create_test_app();

    let sent = app
        .server
        .post("/api/v1/message/send")
        .json(&json!({
            "firstName": "Jane",
            "lastName": "Doe",
            "email": "jane@example.com",
            "phone": "03001234567",
            "message": "What are your visiting hours?"
        }))
        .await;
    assert_eq!(sent.status_code(), StatusCode::OK);
    assert_eq!(sent.json::<Value>()["message"], "Message Sent Successfully!");

    let anonymous = app.server.get("/api/v1/message/getall").await;
    assert_eq!(anonymous.status_code(), StatusCode::BAD_REQUEST);

    let admin_token = seed_and_login(&app, "admin@example.com", Role::Admin).await;
    let listed = app
        .server
        .get("/api/v1/message/getall")
        .add_header(header::COOKIE, cookie("adminToken", &admin_token))
        .await;
    assert_eq!(listed.status_code(), StatusCode::OK);
    let listed: Value = listed.json();
    assert_eq!(listed["messages"][0]["message"], "What are your visiting hours?");
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = create_test_app();

    let response = app.server.get("/api-docs/openapi.json").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let doc: Value = response.json();
    assert!(doc["paths"]["/api/v1/appointment/post"].is_object());
}
