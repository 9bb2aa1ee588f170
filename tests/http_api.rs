//! End-to-end tests driving the axum router against an in-memory database.

#![allow(clippy::unwrap_used)]

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header::CONTENT_TYPE},
};
use printshop_api::config::{
    database::{create_connection, create_tables},
    settings::Settings,
};
use printshop_api::http::{AppState, router};
use serde_json::{Value, json};
use tower::ServiceExt;

async fn setup_app() -> Router {
    let db = create_connection("sqlite::memory:").await.unwrap();
    create_tables(&db).await.unwrap();
    router(AppState::new(Settings::default(), db))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn product_payload(user_id: &str) -> Value {
    json!({
        "userId": user_id,
        "printifyId": "6862a2e379a2a4e66f05b610",
        "title": "AI T-shirt",
        "description": "A t-shirt with a generated print",
        "blueprintId": 5,
        "printProviderId": 1,
        "marginApplied": 40,
        "originalImageUrl": "https://cdn.example.com/original.jpg",
        "printifyImageId": "6861b339b9939664017b3ee1",
        "variants": [
            {
                "id": 17391,
                "title": "Unisex Basic T-shirt",
                "sku": "tshirt-17391",
                "price": 2500,
                "priceFormatted": "25.00",
                "cost": 1500,
                "profit": 1000,
                "isEnabled": true,
                "isDefault": true,
                "options": [831, 13]
            },
            {
                "id": 17393,
                "title": "Unisex Basic T-shirt",
                "sku": "tshirt-17393",
                "price": 2500,
                "priceFormatted": "25.00",
                "cost": 1500,
                "profit": 1000,
                "isEnabled": true,
                "isDefault": false,
                "options": [831, 15]
            }
        ],
        "images": [
            {
                "src": "https://images-api.printify.com/mockup/front.jpg",
                "variant_ids": [17391, 17393],
                "position": "front",
                "is_default": true,
                "is_selected_for_publishing": true,
                "order": null
            },
            {
                "src": "https://images-api.printify.com/mockup/back.jpg",
                "variant_ids": [17391, 17393],
                "position": "back",
                "is_default": false,
                "is_selected_for_publishing": true,
                "order": null
            }
        ]
    })
}

#[tokio::test]
async fn test_health() {
    let app = setup_app().await;

    for uri in ["/api/health", "/"] {
        let (status, body) = send(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert!(body["timestamp"].is_string());
    }
}

#[tokio::test]
async fn test_image_lifecycle() {
    let app = setup_app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/images",
        Some(json!({
            "userId": "user_owner",
            "prompt": "a red fox",
            "imageUrl": "https://cdn.example.com/fox.png"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["prompt"], "a red fox");
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(&app, Method::GET, "/api/images?userId=user_owner", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["images"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"]["pagination"]["total"], 1);
    assert_eq!(body["data"]["pagination"]["limit"], 10);

    let uri = format!("/api/images/{id}?userId=user_intruder");
    let (status, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Image not found");

    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let uri = format!("/api/images/{id}?userId=user_owner");
    let (status, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], id.as_str());

    // A blank owner filter is no filter
    let unscoped = format!("/api/images/{id}?userId=");
    let (status, body) = send(&app, Method::GET, &unscoped, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], id.as_str());

    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, _) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_image_validation_errors() {
    let app = setup_app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/images",
        Some(json!({ "userId": "user_1" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required fields: prompt, imageUrl");

    let (status, body) = send(&app, Method::GET, "/api/images", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "userId is required");

    for query in ["limit=0", "page=-1", "page=abc"] {
        let uri = format!("/api/images?userId=user_1&{query}");
        let (status, _) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "query {query}");
    }

    let (status, body) = send(&app, Method::GET, "/api/images/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_image_pagination() {
    let app = setup_app().await;

    for i in 0..15 {
        let (status, _) = send(
            &app,
            Method::POST,
            "/api/images",
            Some(json!({
                "userId": "user_1",
                "prompt": format!("prompt {i}"),
                "imageUrl": "https://cdn.example.com/img.png"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/images?userId=user_1&page=2&limit=10",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["images"].as_array().unwrap().len(), 5);
    assert_eq!(
        body["data"]["pagination"],
        json!({ "page": 2, "limit": 10, "total": 15, "pages": 2 })
    );
}

#[tokio::test]
async fn test_product_lifecycle() {
    let app = setup_app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/products",
        Some(product_payload("user_1")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(&app, Method::GET, &format!("/api/products/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let product = &body["data"];
    assert_eq!(product["title"], "AI T-shirt");
    assert_eq!(product["blueprintId"], 5);
    assert_eq!(product["variants"].as_array().unwrap().len(), 2);
    assert_eq!(product["variants"][0]["printifyVariantId"], 17391);
    assert_eq!(product["variants"][1]["options"], json!([831, 15]));

    let images = product["images"].as_array().unwrap();
    assert_eq!(images.len(), 2);
    assert_eq!(images[0]["position"], "front");
    assert_eq!(images[1]["position"], "back");
    for image in images {
        let refs: Vec<i64> = image["variantIds"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["variantId"].as_i64().unwrap())
            .collect();
        assert_eq!(refs, vec![17391, 17393]);
    }

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/products/{id}"),
        Some(json!({ "marginApplied": 55.5 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["marginApplied"], 55.5);
    assert_eq!(body["data"]["title"], "AI T-shirt");

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/products/{id}?userId="),
        Some(json!({ "description": null })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["description"].is_null());
    assert_eq!(body["data"]["marginApplied"], 55.5);

    let (status, body) = send(&app, Method::GET, "/api/products?userId=user_1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["products"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"]["pagination"]["total"], 1);

    let uri = format!("/api/products/{id}?userId=user_2");
    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let uri = format!("/api/products/{id}?userId=user_1");
    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, Method::GET, &format!("/api/products/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_product_validation_errors() {
    let app = setup_app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/products",
        Some(json!({ "userId": "user_1", "title": "Mug" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "Missing required fields: printifyId, blueprintId, printProviderId"
    );

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/products")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_credit_flow() {
    let app = setup_app().await;

    let (status, body) = send(&app, Method::GET, "/api/credits/user_1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"],
        json!({ "userId": "user_1", "credits": 2, "canGenerate": true })
    );

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/credits/use",
        Some(json!({ "userId": "user_1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["creditsUsed"], 1);
    assert_eq!(body["data"]["remainingCredits"], 1);
    assert_eq!(body["data"]["canGenerate"], true);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/credits/use",
        Some(json!({ "userId": "user_1", "amount": 5 })),
    )
    .await;
    assert_eq!(status, StatusCode::PAYMENT_REQUIRED);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Insufficient credits");
    assert_eq!(
        body["data"],
        json!({ "currentCredits": 1, "requiredCredits": 5, "canGenerate": false })
    );

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/credits/add",
        Some(json!({ "userId": "user_1", "amount": 10 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["creditsAdded"], 10);
    assert_eq!(body["data"]["totalCredits"], 11);

    let (status, body) = send(&app, Method::POST, "/api/credits/reset/user_1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"],
        json!({ "userId": "user_1", "credits": 0, "canGenerate": false })
    );
}

#[tokio::test]
async fn test_credit_errors() {
    let app = setup_app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/credits/use",
        Some(json!({ "userId": "nobody" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User credits not found");

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/credits/use",
        Some(json!({ "userId": "nobody", "amount": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/credits/add",
        Some(json!({ "userId": "user_1" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "userId and amount are required");

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/credits/add",
        Some(json!({ "userId": "user_1", "amount": -3 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // A fresh add creates the balance with exactly the added amount
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/credits/add",
        Some(json!({ "userId": "user_2", "amount": 10 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["totalCredits"], 10);
}
