//! Application Roles API Tests
//!
//! Exercises the HTTP surface against the in-memory store.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use utoipa_axum::router::OpenApiRouter;

use ar_platform::{
    roles_router, InMemoryRoleStore, ReferenceResolver, RolesState, ServerUrlBuilder,
    APPLICATIONS_BASE_PATH,
};

fn app() -> Router {
    let store = Arc::new(
        InMemoryRoleStore::new()
            .with_user("u1", "alice")
            .with_user("u2", "bob")
            .with_group("g1", "admins", "LOCAL")
            .with_group("g9", "partners", "Google"),
    );
    let urls = Arc::new(ServerUrlBuilder::new(
        "https://id.example.com",
        "https://id.example.com",
        "/scim2",
    ));
    let state = RolesState::new(store, Arc::new(ReferenceResolver::new(urls)));

    let (router, _api) = OpenApiRouter::new()
        .nest(APPLICATIONS_BASE_PATH, roles_router(state))
        .split_for_parts();
    router
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    send_with_tenant(app, method, uri, body, None).await
}

async fn send_with_tenant(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
    tenant: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(tenant) = tenant {
        builder = builder.header("X-Tenant-Domain", tenant);
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn roles_uri(app_id: &str) -> String {
    format!("{}/{}/roles", APPLICATIONS_BASE_PATH, app_id)
}

async fn create_role(app: &Router, name: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        &roles_uri("app-1"),
        Some(json!({ "name": name, "permissions": [{ "name": "read" }] })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

mod role_crud_tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_get_role() {
        let app = app();
        let id = create_role(&app, "editor").await;

        let uri = format!("{}/{}", roles_uri("app-1"), id);
        let (status, body) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "editor");
        assert_eq!(body["applicationId"], "app-1");
        assert_eq!(body["permissions"], json!([{ "name": "read" }]));
    }

    #[tokio::test]
    async fn test_create_sets_location() {
        let app = app();
        let request = Request::post(roles_uri("app-1"))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({ "name": "viewer" }).to_string()))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let location = response.headers()[header::LOCATION].to_str().unwrap();
        assert!(location.starts_with("/api/server/v1/applications/app-1/roles/"));
    }

    #[tokio::test]
    async fn test_blank_name_rejected() {
        let app = app();
        let body = json!({ "name": "  " });
        let (status, body) = send(&app, Method::POST, &roles_uri("app-1"), Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_list_is_scoped_to_application() {
        let app = app();
        create_role(&app, "b-role").await;
        create_role(&app, "a-role").await;

        let (status, body) = send(&app, Method::GET, &roles_uri("app-1"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 2);
        assert_eq!(body["roles"][0]["name"], "a-role");

        let uri = format!("{}?limit=1", roles_uri("app-1"));
        let (_, body) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(body["total"], 1);

        let (_, body) = send(&app, Method::GET, &roles_uri("app-2"), None).await;
        assert_eq!(body["total"], 0);
    }

    #[tokio::test]
    async fn test_zero_limit_rejected() {
        let app = app();
        create_role(&app, "editor").await;

        let uri = format!("{}?limit=0", roles_uri("app-1"));
        let (status, body) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_update_role() {
        let app = app();
        let id = create_role(&app, "editor").await;

        let (status, body) = send(
            &app,
            Method::PATCH,
            &format!("{}/{}", roles_uri("app-1"), id),
            Some(json!({
                "name": "writer",
                "addedPermissions": [{ "name": "write" }],
                "removedPermissions": [{ "name": "read" }]
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "writer");
        assert_eq!(body["permissions"], json!([{ "name": "write" }]));
    }

    #[tokio::test]
    async fn test_delete_role() {
        let app = app();
        let id = create_role(&app, "editor").await;
        let uri = format!("{}/{}", roles_uri("app-1"), id);

        let (status, _) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "ROLE_NOT_FOUND");

        let (status, _) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_role_of_other_application_not_found() {
        let app = app();
        let id = create_role(&app, "editor").await;

        let uri = format!("{}/{}", roles_uri("app-2"), id);
        let (status, _) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}

mod assignment_api_tests {
    use super::*;

    #[tokio::test]
    async fn test_patch_assigned_users() {
        let app = app();
        let id = create_role(&app, "editor").await;
        let uri = format!("{}/{}/assigned-users", roles_uri("app-1"), id);

        let (status, body) = send(
            &app,
            Method::PATCH,
            &uri,
            Some(json!({
                "operations": [
                    { "op": "add", "path": "users", "value": ["u1", { "value": "u2" }] }
                ]
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["assignedUsers"],
            json!([
                {
                    "value": "u1",
                    "display": "alice",
                    "$ref": "https://id.example.com/scim2/Users/u1"
                },
                {
                    "value": "u2",
                    "display": "bob",
                    "$ref": "https://id.example.com/scim2/Users/u2"
                }
            ])
        );

        let (status, body) = send(
            &app,
            Method::PATCH,
            &uri,
            Some(json!({ "operations": [{ "op": "Remove", "value": ["u1"] }] })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["assignedUsers"].as_array().unwrap().len(), 1);

        let (status, body) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["assignedUsers"][0]["value"], "u2");
    }

    #[tokio::test]
    async fn test_tenant_header_qualifies_references() {
        let app = app();
        let id = create_role(&app, "editor").await;
        let uri = format!("{}/{}/assigned-users", roles_uri("app-1"), id);

        let (status, body) = send_with_tenant(
            &app,
            Method::PATCH,
            &uri,
            Some(json!({ "operations": [{ "op": "add", "value": ["u1"] }] })),
            Some("acme.com"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["assignedUsers"][0]["$ref"],
            "https://id.example.com/t/acme.com/scim2/Users/u1"
        );
    }

    #[tokio::test]
    async fn test_invalid_patch_operations() {
        let app = app();
        let id = create_role(&app, "editor").await;
        let uri = format!("{}/{}/assigned-users", roles_uri("app-1"), id);

        let bodies = vec![
            json!({ "operations": [{ "op": "move", "value": ["u1"] }] }),
            json!({ "operations": [{ "op": "replace", "value": ["u1"] }] }),
            json!({ "operations": [{ "op": "add", "value": [] }] }),
            json!({ "operations": [{ "op": "remove" }] }),
        ];

        for body in bodies {
            let (status, response) = send(&app, Method::PATCH, &uri, Some(body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(response["error"], "INVALID_PATCH_OPERATION");
        }
    }

    #[tokio::test]
    async fn test_unknown_user_is_not_found() {
        let app = app();
        let id = create_role(&app, "editor").await;
        let uri = format!("{}/{}/assigned-users", roles_uri("app-1"), id);

        let (status, body) = send(
            &app,
            Method::PATCH,
            &uri,
            Some(json!({ "operations": [{ "op": "add", "value": ["nobody"] }] })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "PRINCIPAL_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_assigned_groups_by_identity_provider() {
        let app = app();
        let id = create_role(&app, "editor").await;
        let uri = format!("{}/{}/assigned-groups", roles_uri("app-1"), id);

        let (status, body) = send(
            &app,
            Method::PATCH,
            &uri,
            Some(json!({ "operations": [{ "op": "add", "value": ["g1"] }] })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["assignedGroups"][0]["$ref"],
            "https://id.example.com/scim2/Groups/g1"
        );

        let google = format!("{}?idp=Google", uri);
        let (status, body) = send(
            &app,
            Method::PATCH,
            &google,
            Some(json!({ "operations": [{ "op": "add", "value": ["g9"] }] })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["assignedGroups"], json!([{ "value": "g9", "display": "partners" }]));

        let (_, body) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(body["assignedGroups"].as_array().unwrap().len(), 1);
        assert_eq!(body["assignedGroups"][0]["value"], "g1");
    }

    #[tokio::test]
    async fn test_assignment_on_missing_role() {
        let app = app();
        let uri = format!("{}/missing/assigned-users", roles_uri("app-1"));

        let (status, body) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "ROLE_NOT_FOUND");
    }
}
