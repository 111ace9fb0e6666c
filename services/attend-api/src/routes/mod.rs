pub mod attendance;
pub mod common;
pub mod employees;
pub mod geofence;
pub mod health;
pub mod offices;
pub mod sessions;
pub mod status;

use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health::health)
        .service(status::status)
        .service(sessions::create_session)
        .service(sessions::clear_session)
        .service(offices::list_offices)
        .service(offices::nearest_office)
        .service(offices::get_office)
        .service(offices::upsert_office)
        .service(offices::delete_office)
        .service(employees::list_employees)
        .service(employees::get_employee)
        .service(employees::upsert_employee)
        .service(employees::delete_employee)
        .service(attendance::check_in)
        .service(attendance::check_out)
        .service(attendance::export_attendance)
        .service(attendance::attendance_summary)
        .service(attendance::list_attendance)
        .service(geofence::evaluate);
}

#[cfg(test)]
mod tests {
    use super::configure;
    use crate::auth::ISSUER_HEADER;
    use crate::state::AppState;
    use actix_web::http::StatusCode;
    use actix_web::{test, web, App};
    use attend_config::{Environment, GeofenceConfig, ServiceConfig, SessionConfig, StorageBackend};
    use attend_core::{EmployeeId, TenantId, UserId};
    use attend_identity::{Role, Session, Subject};
    use attend_storage_memory::MemoryStore;
    use serde_json::{json, Value};

    const ISSUER: &str = "issuer-secret";

    fn state() -> web::Data<AppState> {
        let config = ServiceConfig {
            service_name: "attend-api-test".to_string(),
            environment: Environment::Test,
            region: None,
            bind_addr: "127.0.0.1:0".to_string(),
            metrics_addr: None,
            log_level: "warn".to_string(),
            storage: StorageBackend::Memory,
        };
        let sessions = SessionConfig {
            issuer_token: Some(ISSUER.to_string()),
            ttl_secs: 3_600,
        };
        web::Data::new(AppState::new(
            config,
            sessions,
            GeofenceConfig::default(),
            MemoryStore::new(),
        ))
    }

    fn issue(
        state: &web::Data<AppState>,
        tenant_id: TenantId,
        roles: Vec<Role>,
        employee_id: Option<EmployeeId>,
    ) -> String {
        let subject = Subject {
            tenant_id,
            user_id: UserId::new(),
            employee_id,
            roles,
        };
        let session = Session::issue(subject, 3_600_000);
        let token = session.token.to_string();
        state.sessions.set(session);
        token
    }

    fn bearer(token: &str) -> (&'static str, String) {
        ("authorization", format!("Bearer {token}"))
    }

    #[actix_web::test]
    async fn health_is_public() {
        let state = state();
        let app = test::init_service(App::new().app_data(state.clone()).configure(configure)).await;
        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn requests_without_session_are_rejected() {
        let state = state();
        let app = test::init_service(App::new().app_data(state.clone()).configure(configure)).await;
        let req = test::TestRequest::get().uri("/v1/offices").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::get()
            .uri("/v1/offices")
            .insert_header(bearer("nope"))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn session_issuing_needs_issuer_secret() {
        let state = state();
        let app = test::init_service(App::new().app_data(state.clone()).configure(configure)).await;
        let req = test::TestRequest::post()
            .uri("/v1/sessions")
            .insert_header((ISSUER_HEADER, "wrong"))
            .set_json(json!({
                "tenant_id": TenantId::new(),
                "user_id": UserId::new(),
                "roles": ["admin"],
            }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::post()
            .uri("/v1/sessions")
            .insert_header((ISSUER_HEADER, ISSUER))
            .set_json(json!({
                "tenant_id": TenantId::new(),
                "user_id": UserId::new(),
                "roles": ["admin"],
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        let token = body["token"].as_str().unwrap_or_default().to_string();
        assert!(!token.is_empty());

        let req = test::TestRequest::delete()
            .uri("/v1/sessions")
            .insert_header(bearer(&token))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);

        let req = test::TestRequest::get()
            .uri("/v1/offices")
            .insert_header(bearer(&token))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn check_in_flow() {
        let state = state();
        let app = test::init_service(App::new().app_data(state.clone()).configure(configure)).await;
        let tenant_id = TenantId::new();
        let admin = issue(&state, tenant_id, vec![Role::Admin], None);

        let req = test::TestRequest::post()
            .uri("/v1/offices")
            .insert_header(bearer(&admin))
            .set_json(json!({
                "name": "Kigali HQ",
                "location": { "latitude": -1.9441, "longitude": 30.0619 },
            }))
            .to_request();
        let office: Value = test::call_and_read_body_json(&app, req).await;

        let req = test::TestRequest::post()
            .uri("/v1/employees")
            .insert_header(bearer(&admin))
            .set_json(json!({
                "office_id": office["id"],
                "full_name": "Aline Uwase",
                "email": "Aline@Example.rw",
            }))
            .to_request();
        let employee: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(employee["email"], "aline@example.rw");
        assert_eq!(employee["active"], true);
        let employee_id: EmployeeId = serde_json::from_value(employee["id"].clone()).unwrap();

        let staff = issue(&state, tenant_id, vec![Role::Employee], Some(employee_id));
        let near = json!({ "latitude": -1.9445, "longitude": 30.0620 });
        let far = json!({ "latitude": -1.9396, "longitude": 30.0619 });

        let req = test::TestRequest::post()
            .uri("/v1/attendance/check-in")
            .insert_header(bearer(&staff))
            .set_json(&near)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let outcome: Value = test::read_body_json(resp).await;
        assert_eq!(outcome["record"]["status"], "checked_in");
        assert_eq!(outcome["decision"]["within_range"], true);

        let req = test::TestRequest::post()
            .uri("/v1/attendance/check-in")
            .insert_header(bearer(&staff))
            .set_json(&near)
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CONFLICT);

        let req = test::TestRequest::post()
            .uri("/v1/attendance/check-out")
            .insert_header(bearer(&staff))
            .set_json(&far)
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::post()
            .uri("/v1/attendance/check-out")
            .insert_header(bearer(&staff))
            .set_json(&near)
            .to_request();
        let outcome: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(outcome["record"]["status"], "checked_out");

        let req = test::TestRequest::get()
            .uri("/v1/attendance")
            .insert_header(bearer(&staff))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::get()
            .uri(&format!("/v1/attendance?employee_id={employee_id}"))
            .insert_header(bearer(&admin))
            .to_request();
        let records: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(records.as_array().map(Vec::len), Some(1));

        let req = test::TestRequest::get()
            .uri("/v1/attendance/export")
            .insert_header(bearer(&admin))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = test::read_body(resp).await;
        let csv = String::from_utf8(body.to_vec()).unwrap();
        assert!(csv.starts_with("record_id,employee_id,employee_name"));
        assert!(csv.contains("Aline Uwase"));

        let req = test::TestRequest::get()
            .uri("/v1/attendance/summary")
            .insert_header(bearer(&admin))
            .to_request();
        let summary: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(summary[0]["check_ins"], 1);
        assert_eq!(summary[0]["check_outs"], 1);
    }

    #[actix_web::test]
    async fn employees_cannot_act_for_others() {
        let state = state();
        let app = test::init_service(App::new().app_data(state.clone()).configure(configure)).await;
        let tenant_id = TenantId::new();
        let staff = issue(&state, tenant_id, vec![Role::Employee], Some(EmployeeId::new()));

        let req = test::TestRequest::post()
            .uri("/v1/attendance/check-in")
            .insert_header(bearer(&staff))
            .set_json(json!({
                "employee_id": EmployeeId::new(),
                "latitude": -1.9441,
                "longitude": 30.0619,
            }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::post()
            .uri("/v1/offices")
            .insert_header(bearer(&staff))
            .set_json(json!({ "name": "Rogue" }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn export_and_summary_honor_paging() {
        let state = state();
        let app = test::init_service(App::new().app_data(state.clone()).configure(configure)).await;
        let tenant_id = TenantId::new();
        let admin = issue(&state, tenant_id, vec![Role::Admin], None);

        let req = test::TestRequest::post()
            .uri("/v1/offices")
            .insert_header(bearer(&admin))
            .set_json(json!({
                "name": "Kigali HQ",
                "location": { "latitude": -1.9441, "longitude": 30.0619 },
            }))
            .to_request();
        let office: Value = test::call_and_read_body_json(&app, req).await;

        for name in ["Aline Uwase", "Jean Mugisha"] {
            let req = test::TestRequest::post()
                .uri("/v1/employees")
                .insert_header(bearer(&admin))
                .set_json(json!({
                    "office_id": office["id"],
                    "full_name": name,
                    "email": "staff@example.rw",
                }))
                .to_request();
            let employee: Value = test::call_and_read_body_json(&app, req).await;
            let req = test::TestRequest::post()
                .uri("/v1/attendance/check-in")
                .insert_header(bearer(&admin))
                .set_json(json!({
                    "employee_id": employee["id"],
                    "latitude": -1.9441,
                    "longitude": 30.0619,
                }))
                .to_request();
            assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
        }

        let req = test::TestRequest::get()
            .uri("/v1/attendance/export?limit=1")
            .insert_header(bearer(&admin))
            .to_request();
        let body = test::call_and_read_body(&app, req).await;
        let csv = String::from_utf8(body.to_vec()).unwrap();
        assert_eq!(csv.split("\r\n").filter(|line| !line.is_empty()).count(), 2);

        let req = test::TestRequest::get()
            .uri(&format!("/v1/attendance/summary?limit={}", usize::MAX))
            .insert_header(bearer(&admin))
            .to_request();
        let summary: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(summary[0]["check_ins"], 2);
        assert_eq!(summary[0]["unique_employees"], 2);
    }

    #[actix_web::test]
    async fn negative_accuracy_is_rejected() {
        let state = state();
        let app = test::init_service(App::new().app_data(state.clone()).configure(configure)).await;
        let tenant_id = TenantId::new();
        let admin = issue(&state, tenant_id, vec![Role::Admin], None);

        let req = test::TestRequest::post()
            .uri("/v1/offices")
            .insert_header(bearer(&admin))
            .set_json(json!({
                "name": "Kigali HQ",
                "location": { "latitude": -1.9441, "longitude": 30.0619 },
            }))
            .to_request();
        let office: Value = test::call_and_read_body_json(&app, req).await;
        let req = test::TestRequest::post()
            .uri("/v1/employees")
            .insert_header(bearer(&admin))
            .set_json(json!({
                "office_id": office["id"],
                "full_name": "Aline Uwase",
                "email": "aline@example.rw",
            }))
            .to_request();
        let employee: Value = test::call_and_read_body_json(&app, req).await;

        let req = test::TestRequest::post()
            .uri("/v1/attendance/check-in")
            .insert_header(bearer(&admin))
            .set_json(json!({
                "employee_id": employee["id"],
                "latitude": -1.9441,
                "longitude": 30.0619,
                "accuracy_m": -5.0,
            }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::get()
            .uri("/v1/attendance")
            .insert_header(bearer(&admin))
            .to_request();
        let records: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(records.as_array().map(Vec::len), Some(0));
    }

    #[actix_web::test]
    async fn unknown_employee_is_not_found() {
        let state = state();
        let app = test::init_service(App::new().app_data(state.clone()).configure(configure)).await;
        let staff = issue(&state, TenantId::new(), vec![Role::Employee], Some(EmployeeId::new()));

        let req = test::TestRequest::post()
            .uri("/v1/attendance/check-in")
            .insert_header(bearer(&staff))
            .set_json(json!({ "latitude": -1.9441, "longitude": 30.0619 }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn geofence_evaluate() {
        let state = state();
        let app = test::init_service(App::new().app_data(state.clone()).configure(configure)).await;
        let staff = issue(&state, TenantId::new(), vec![Role::Employee], None);
        let office = json!({ "latitude": -1.9441, "longitude": 30.0619 });

        let req = test::TestRequest::post()
            .uri("/v1/geofence/evaluate")
            .insert_header(bearer(&staff))
            .set_json(json!({ "point": office, "reference": office }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["distance_m"], 0.0);
        assert_eq!(body["threshold_m"], 100.0);
        assert_eq!(body["within_range"], true);

        let req = test::TestRequest::post()
            .uri("/v1/geofence/evaluate")
            .insert_header(bearer(&staff))
            .set_json(json!({
                "point": { "latitude": -1.9396, "longitude": 30.0619 },
                "reference": office,
                "threshold_m": 100.0,
            }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["within_range"], false);

        let req = test::TestRequest::post()
            .uri("/v1/geofence/evaluate")
            .insert_header(bearer(&staff))
            .set_json(json!({ "point": office, "reference": office, "threshold_m": -1.0 }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::post()
            .uri("/v1/geofence/evaluate")
            .insert_header(bearer(&staff))
            .set_json(json!({
                "point": { "latitude": 200.0, "longitude": 0.0 },
                "reference": office,
            }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn nearest_office_lookup() {
        let state = state();
        let app = test::init_service(App::new().app_data(state.clone()).configure(configure)).await;
        let tenant_id = TenantId::new();
        let admin = issue(&state, tenant_id, vec![Role::Owner], None);

        let req = test::TestRequest::get()
            .uri("/v1/offices/nearest?latitude=-1.9441&longitude=30.0619")
            .insert_header(bearer(&admin))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

        for (name, latitude) in [("Remera", -1.9536), ("Nyarugenge", -1.9441)] {
            let req = test::TestRequest::post()
                .uri("/v1/offices")
                .insert_header(bearer(&admin))
                .set_json(json!({
                    "name": name,
                    "location": { "latitude": latitude, "longitude": 30.0619 },
                    "radius_m": 150.0,
                }))
                .to_request();
            assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
        }

        let req = test::TestRequest::get()
            .uri("/v1/offices/nearest?latitude=-1.9445&longitude=30.0619")
            .insert_header(bearer(&admin))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["office"]["name"], "Nyarugenge");
        assert_eq!(body["within_range"], true);
    }
}
