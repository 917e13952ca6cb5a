mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::TestApp;

async fn create_group(app: &TestApp, token: &str, family: &str, designation: &str) -> String {
    let (status, _) = app
        .send(
            "POST",
            &format!("/api/{family}"),
            Some(token),
            Some(json!({"designation": designation})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    app.find_uuid(&format!("/{family}"), token, designation).await
}

#[tokio::test]
async fn role_crud_round_trip() {
    let app = TestApp::new();
    let token = app.admin_token().await;
    let role = create_group(&app, &token, "roles", "Secretary").await;

    let (status, body) = app
        .send("GET", &format!("/api/roles/{role}"), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["designation"], "Secretary");
    assert!(body["data"].get("id").is_none());

    app.send(
        "PATCH",
        &format!("/api/roles/{role}"),
        Some(&token),
        Some(json!({"designation": "Head secretary"})),
    )
    .await;
    let (_, body) = app
        .send("GET", &format!("/api/roles/{role}"), Some(&token), None)
        .await;
    assert_eq!(body["data"]["designation"], "Head secretary");

    let (status, _) = app
        .send("DELETE", &format!("/api/roles/{role}"), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, active) = app
        .send("GET", "/api/roles?status=ACT", Some(&token), None)
        .await;
    assert_eq!(active["totalRows"], 0);
    let (_, deleted) = app.send("GET", "/api/roles", Some(&token), None).await;
    assert_eq!(deleted["data"][0]["uuid"], role);
    assert_eq!(deleted["data"][0]["status"]["code"], "SPR");
}

#[tokio::test]
async fn roles_and_rules_are_separate_families() {
    let app = TestApp::new();
    let token = app.admin_token().await;
    let role = create_group(&app, &token, "roles", "Auditor").await;

    let (status, body) = app
        .send("GET", &format!("/api/rules/{role}"), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], format!("Rule ID {role} not found in database."));

    let (_, rules) = app
        .send("GET", "/api/rules?status=ACT", Some(&token), None)
        .await;
    assert_eq!(rules["totalRows"], 0);
}

#[tokio::test]
async fn menu_links_carry_structured_privileges() {
    let app = TestApp::new();
    let token = app.admin_token().await;
    let role = create_group(&app, &token, "roles", "Teacher").await;
    let users_menu = app.store.menu_uuid("USR").unwrap();
    let levels_menu = app.store.menu_uuid("LVL").unwrap();

    let (status, _) = app
        .send(
            "POST",
            "/api/roles/menu",
            Some(&token),
            Some(json!([
                {"roleId": role, "menuId": users_menu, "privilege": {"read": true}},
                {"roleId": role, "menuId": levels_menu, "privilege": "{\"create\":true,\"update\":true}"}
            ])),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app
        .send("GET", &format!("/api/roles/{role}/menu"), Some(&token), None)
        .await;
    let links = body["data"].as_array().unwrap();
    assert_eq!(links.len(), 2);
    assert_eq!(links[0]["menu"]["path"], "/users");
    assert_eq!(
        links[0]["privilege"],
        json!({"create": false, "read": true, "update": false, "delete": false})
    );
    assert_eq!(links[1]["privilege"]["update"], true);

    let link = links[0]["uuid"].as_str().unwrap().to_string();
    let (status, _) = app
        .send(
            "PATCH",
            "/api/roles/menu/privilege",
            Some(&token),
            Some(json!({"menuRoleId": link, "privilege": {"read": true, "delete": true}})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app
        .send("GET", &format!("/api/roles/{role}/menu"), Some(&token), None)
        .await;
    assert_eq!(body["data"][0]["privilege"]["delete"], true);

    let (status, _) = app
        .send("DELETE", &format!("/api/roles/menu/{link}"), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = app
        .send("GET", &format!("/api/roles/{role}/menu"), Some(&token), None)
        .await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn duplicate_menu_link_conflicts_regardless_of_privilege() {
    let app = TestApp::new();
    let token = app.admin_token().await;
    let rule = create_group(&app, &token, "rules", "Grades").await;
    let menu = app.store.menu_uuid("SUB").unwrap();

    let (status, _) = app
        .send(
            "POST",
            "/api/rules/menu",
            Some(&token),
            Some(json!({"ruleId": rule, "menuId": menu, "privilege": {"read": true}})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .send(
            "POST",
            "/api/rules/menu",
            Some(&token),
            Some(json!({"ruleId": rule, "menuId": menu, "privilege": {"delete": true}})),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["statusCode"], 409);
}

#[tokio::test]
async fn unknown_menu_is_reported_as_conflict() {
    let app = TestApp::new();
    let token = app.admin_token().await;
    let role = create_group(&app, &token, "roles", "Nurse").await;

    let (status, body) = app
        .send(
            "POST",
            "/api/roles/menu",
            Some(&token),
            Some(json!({"roleId": role, "menuId": "nope", "privilege": {}})),
        )
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Menu ID nope not found in database.");
}

#[tokio::test]
async fn unknown_privilege_action_is_rejected() {
    let app = TestApp::new();
    let token = app.admin_token().await;
    let role = create_group(&app, &token, "roles", "Guard").await;
    let menu = app.store.menu_uuid("USR").unwrap();

    let (status, _) = app
        .send(
            "POST",
            "/api/roles/menu",
            Some(&token),
            Some(json!({"roleId": role, "menuId": menu, "privilege": {"launch": true}})),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn role_listing_paginates() {
    let app = TestApp::new();
    let token = app.admin_token().await;
    for i in 0..7 {
        app.send(
            "POST",
            "/api/roles",
            Some(&token),
            Some(json!({"designation": format!("Role {i}")})),
        )
        .await;
    }

    let (_, body) = app
        .send("GET", "/api/roles?limit=3&page=3&status=ACT", Some(&token), None)
        .await;

    assert_eq!(body["totalRows"], 7);
    assert_eq!(body["page"], 3);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["designation"], "Role 6");
}
