//! HTTP-level integration tests for `POST /api/ai/visual` and
//! `GET /api/designs/{id}`.

mod common;

use adcraft_core::provider::ProviderKind;
use adcraft_db::models::status::DesignStatus;
use adcraft_db::repositories::{AiUsageRepo, CreditRepo, DesignRepo, MediaFileRepo, UserRepo};
use axum::http::StatusCode;
use common::{
    body_json, build_test_app, build_test_app_with_config, create_user, get, get_auth,
    openai_only, png_base64, post_json, post_json_auth, test_config, token_for, FakeProvider,
};
use serde_json::json;
use sqlx::PgPool;

fn burger_brief() -> serde_json::Value {
    json!({
        "prompt": "20% off burgers",
        "category": "promo",
        "size": "1080x1080",
        "textMode": "topic",
        "brandColors": ["#ff5500"],
    })
}

// ---------------------------------------------------------------------------
// Success
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn generates_visual_and_debits_one_credit(pool: PgPool) {
    let user = create_user(&pool, "pro@example.com", "pro", 10).await;
    let dir = tempfile::tempdir().unwrap();
    let provider = FakeProvider::returning(ProviderKind::OpenAi, Some(png_base64(1024, 1024)));
    let app = build_test_app(pool.clone(), openai_only(provider), dir.path());

    let response = post_json_auth(app, "/api/ai/visual", burger_brief(), &token_for(user.id)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["creditsUsed"], 1);
    assert_eq!(json["data"]["creditsRemaining"], 9);
    assert_eq!(json["data"]["design"]["status"], "completed");
    assert_eq!(json["data"]["design"]["metadata"]["provider"], "openai");
    assert_eq!(json["data"]["mediaFile"]["width"], 1080);
    assert_eq!(json["data"]["mediaFile"]["mimeType"], "image/png");

    let design_id = json["data"]["design"]["id"].as_i64().unwrap();
    let design = DesignRepo::find_by_id(&pool, design_id).await.unwrap().unwrap();
    assert_eq!(design.status(), Some(DesignStatus::Completed));
    assert!(design.image_url.unwrap().starts_with("/storage/designs/"));

    assert_eq!(UserRepo::balance(&pool, user.id).await.unwrap(), Some(9));
    let ledger = CreditRepo::list_for_user(&pool, user.id).await.unwrap();
    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger[0].design_id, Some(design_id));
    assert_eq!(MediaFileRepo::list_for_design(&pool, design_id).await.unwrap().len(), 1);
    assert_eq!(AiUsageRepo::list_for_user(&pool, user.id).await.unwrap().len(), 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn generated_image_is_served_from_storage(pool: PgPool) {
    let user = create_user(&pool, "serve@example.com", "starter", 2).await;
    let dir = tempfile::tempdir().unwrap();
    let provider = FakeProvider::returning(ProviderKind::OpenAi, Some(png_base64(256, 256)));
    let providers = openai_only(provider);

    let app = build_test_app(pool.clone(), providers.clone(), dir.path());
    let json = body_json(
        post_json_auth(app, "/api/ai/visual", burger_brief(), &token_for(user.id)).await,
    )
    .await;
    let url = json["data"]["design"]["imageUrl"].as_str().unwrap().to_string();

    let app = build_test_app(pool, providers, dir.path());
    let response = get(app, &url).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "image/png");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn free_generation_completes_without_ledger_row(pool: PgPool) {
    let user = create_user(&pool, "promo@example.com", "starter", 5).await;
    let dir = tempfile::tempdir().unwrap();
    let provider = FakeProvider::returning(ProviderKind::OpenAi, Some(png_base64(256, 256)));
    let mut config = test_config(dir.path());
    config.visual_credit_cost = 0;
    let app = build_test_app_with_config(pool.clone(), openai_only(provider), config);

    let response = post_json_auth(app, "/api/ai/visual", burger_brief(), &token_for(user.id)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["creditsUsed"], 0);
    assert_eq!(json["data"]["creditsRemaining"], 5);

    let design_id = json["data"]["design"]["id"].as_i64().unwrap();
    assert_eq!(UserRepo::balance(&pool, user.id).await.unwrap(), Some(5));
    assert!(CreditRepo::list_for_user(&pool, user.id).await.unwrap().is_empty());
    assert_eq!(MediaFileRepo::list_for_design(&pool, design_id).await.unwrap().len(), 1);
    assert_eq!(AiUsageRepo::list_for_user(&pool, user.id).await.unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// Gates
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn missing_token_is_401(pool: PgPool) {
    let dir = tempfile::tempdir().unwrap();
    let provider = FakeProvider::returning(ProviderKind::OpenAi, Some(png_base64(64, 64)));
    let app = build_test_app(pool, openai_only(provider), dir.path());

    let response = post_json(app, "/api/ai/visual", burger_brief()).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["error"]["code"], "UNAUTHORIZED");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn free_plan_is_403_plan_required(pool: PgPool) {
    let user = create_user(&pool, "free@example.com", "free", 10).await;
    let dir = tempfile::tempdir().unwrap();
    let provider = FakeProvider::returning(ProviderKind::OpenAi, Some(png_base64(64, 64)));
    let app = build_test_app(pool.clone(), openai_only(provider.clone()), dir.path());

    let response = post_json_auth(app, "/api/ai/visual", burger_brief(), &token_for(user.id)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["error"]["code"], "PLAN_REQUIRED");
    assert!(DesignRepo::list_for_user(&pool, user.id, 10).await.unwrap().is_empty());
    assert!(provider.calls().is_empty());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn zero_balance_is_403_insufficient_credits(pool: PgPool) {
    let user = create_user(&pool, "broke@example.com", "starter", 0).await;
    let dir = tempfile::tempdir().unwrap();
    let provider = FakeProvider::returning(ProviderKind::OpenAi, Some(png_base64(64, 64)));
    let app = build_test_app(pool.clone(), openai_only(provider), dir.path());

    let response = post_json_auth(app, "/api/ai/visual", burger_brief(), &token_for(user.id)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["error"]["code"], "INSUFFICIENT_CREDITS");
    assert!(DesignRepo::list_for_user(&pool, user.id, 10).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn missing_fields_are_400(pool: PgPool) {
    let user = create_user(&pool, "lazy@example.com", "starter", 5).await;
    let dir = tempfile::tempdir().unwrap();
    let provider = FakeProvider::returning(ProviderKind::OpenAi, Some(png_base64(64, 64)));
    let app = build_test_app(pool.clone(), openai_only(provider), dir.path());

    let response = post_json_auth(
        app,
        "/api/ai/visual",
        json!({ "prompt": "hello" }),
        &token_for(user.id),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"]["message"], "Missing required fields: category, size");
    assert!(DesignRepo::list_for_user(&pool, user.id, 10).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn malformed_json_is_400(pool: PgPool) {
    let user = create_user(&pool, "typo@example.com", "starter", 5).await;
    let dir = tempfile::tempdir().unwrap();
    let provider = FakeProvider::returning(ProviderKind::OpenAi, Some(png_base64(64, 64)));
    let app = build_test_app(pool, openai_only(provider), dir.path());

    let response = post_json_auth(
        app,
        "/api/ai/visual",
        json!({ "prompt": 42, "category": "promo", "size": "1x1" }),
        &token_for(user.id),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"]["code"], "BAD_REQUEST");
}

// ---------------------------------------------------------------------------
// Failures after the design exists
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn provider_without_image_is_500_and_not_charged(pool: PgPool) {
    let user = create_user(&pool, "unlucky@example.com", "pro", 3).await;
    let dir = tempfile::tempdir().unwrap();
    let provider = FakeProvider::returning(ProviderKind::OpenAi, None);
    let app = build_test_app(pool.clone(), openai_only(provider), dir.path());

    let response = post_json_auth(app, "/api/ai/visual", burger_brief(), &token_for(user.id)).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "GENERATION_FAILED");
    assert_eq!(json["error"]["message"], "Failed to generate visual");

    let designs = DesignRepo::list_for_user(&pool, user.id, 10).await.unwrap();
    assert_eq!(designs.len(), 1);
    assert_eq!(designs[0].status(), Some(DesignStatus::Generating));
    assert_eq!(UserRepo::balance(&pool, user.id).await.unwrap(), Some(3));
    assert!(CreditRepo::list_for_user(&pool, user.id).await.unwrap().is_empty());
    assert!(MediaFileRepo::list_for_user(&pool, user.id).await.unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// GET /api/designs/{id}
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn designs_are_visible_only_to_their_owner(pool: PgPool) {
    let owner = create_user(&pool, "owner@example.com", "pro", 5).await;
    let other = create_user(&pool, "other@example.com", "pro", 5).await;
    let dir = tempfile::tempdir().unwrap();
    let provider = FakeProvider::returning(ProviderKind::OpenAi, Some(png_base64(128, 128)));
    let providers = openai_only(provider);

    let app = build_test_app(pool.clone(), providers.clone(), dir.path());
    let created = body_json(
        post_json_auth(app, "/api/ai/visual", burger_brief(), &token_for(owner.id)).await,
    )
    .await;
    let id = created["data"]["design"]["id"].as_i64().unwrap();
    let uri = format!("/api/designs/{id}");

    let app = build_test_app(pool.clone(), providers.clone(), dir.path());
    let response = get_auth(app, &uri, &token_for(owner.id)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["id"], id);
    assert_eq!(json["data"]["status"], "completed");

    let app = build_test_app(pool, providers, dir.path());
    let response = get_auth(app, &uri, &token_for(other.id)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"]["code"], "NOT_FOUND");
}
