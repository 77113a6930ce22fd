mod common;

use common::*;
use larder::application_impl::*;
use larder::application_port::*;
use larder::domain_model::*;
use mockito::Server;
use serde_json::json;
use std::io::Write;
use std::time::Duration;

fn basil() -> NewProduct {
    NewProduct {
        name: "Basil".to_string(),
        quantity: 2.0,
        unit: "kg".to_string(),
        category: "Herbs".to_string(),
        priority: "Low".to_string(),
        price: 4.0,
        min_stock_threshold: 1.0,
        description: String::new(),
    }
}

#[tokio::test]
async fn second_read_is_served_from_cache() {
    let mut server = Server::new_async().await;
    let csrf = server
        .mock("GET", "/api/auth/csrf-token")
        .with_body(format!(r#"{{"csrfToken":"{}"}}"#, CSRF))
        .expect(1)
        .create_async()
        .await;
    let products = server
        .mock("GET", "/api/inventory/products")
        .with_body(json!([product_json("p1", "Tomatoes", 12.0)]).to_string())
        .expect(1)
        .create_async()
        .await;

    let harness = Harness::new(&server);
    let first = harness.client.get_products().await.unwrap();
    let second = harness.client.get_products().await.unwrap();

    assert_eq!(first, second);
    products.assert_async().await;
    csrf.assert_async().await;
}

#[tokio::test]
async fn mutation_refreshes_subscribers_of_its_tags_only() {
    let mut server = Server::new_async().await;
    mock_csrf(&mut server).await;
    let empty = server
        .mock("GET", "/api/inventory/products")
        .with_body("[]")
        .expect(1)
        .create_async()
        .await;
    let recipes = server
        .mock("GET", "/api/inventory/recipes")
        .with_body("[]")
        .expect(1)
        .create_async()
        .await;
    let create = server
        .mock("POST", "/api/inventory/products")
        .match_body(mockito::Matcher::PartialJson(json!({ "name": "Basil" })))
        .with_status(201)
        .with_body(r#"{"_id":"p2"}"#)
        .create_async()
        .await;

    let harness = Harness::new(&server);
    let mut products = harness.client.subscribe::<Vec<Product>>(&GET_PRODUCTS);
    assert!(products.current().await.unwrap().is_empty());
    harness.client.get_recipes().await.unwrap();
    assert!(!products.has_update());

    empty.assert_async().await;
    empty.remove_async().await;
    let updated = server
        .mock("GET", "/api/inventory/products")
        .with_body(json!([product_json("p2", "Basil", 2.0)]).to_string())
        .expect(1)
        .create_async()
        .await;

    harness.client.create_product(basil()).await.unwrap();
    assert!(products.has_update());
    let list = products.next().await.unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].name, "Basil");

    // Recipes were not invalidated
    harness.client.get_recipes().await.unwrap();

    create.assert_async().await;
    updated.assert_async().await;
    recipes.assert_async().await;
}

#[tokio::test]
async fn failed_mutation_leaves_cache_fresh() {
    let mut server = Server::new_async().await;
    mock_csrf(&mut server).await;
    let products = server
        .mock("GET", "/api/inventory/products")
        .with_body("[]")
        .expect(1)
        .create_async()
        .await;
    server
        .mock("POST", "/api/inventory/products")
        .with_status(400)
        .with_body(r#"{"message":"Duplicate product"}"#)
        .create_async()
        .await;

    let harness = Harness::new(&server);
    harness.client.get_products().await.unwrap();
    assert!(harness.client.create_product(basil()).await.is_err());
    harness.client.get_products().await.unwrap();

    assert!(!harness.client.cache().is_stale(&GET_PRODUCTS.key()));
    products.assert_async().await;
}

#[tokio::test]
async fn delete_invalidates_dashboard_metrics() {
    let mut server = Server::new_async().await;
    mock_csrf(&mut server).await;
    let metrics = server
        .mock("GET", "/api/inventory/dashboard-metrics")
        .with_body(r#"{"stockSummary":{"totalStock":10,"lowStockCount":1}}"#)
        .expect(2)
        .create_async()
        .await;
    let delete = server
        .mock("DELETE", "/api/inventory/products/p1")
        .with_body(r#"{"deleted":true}"#)
        .create_async()
        .await;

    let harness = Harness::new(&server);
    let before = harness.client.get_dashboard_metrics().await.unwrap();
    assert_eq!(before.stock_summary.low_stock_count, 1);
    harness.client.get_dashboard_metrics().await.unwrap();

    let result = harness
        .client
        .delete_product(&ProductId("p1".to_string()))
        .await
        .unwrap();
    assert_eq!(result, json!({ "deleted": true }));
    harness.client.get_dashboard_metrics().await.unwrap();

    delete.assert_async().await;
    metrics.assert_async().await;
}

#[tokio::test]
async fn recipe_consumption_invalidates_stock_and_recipes() {
    let mut server = Server::new_async().await;
    mock_csrf(&mut server).await;
    let products = server
        .mock("GET", "/api/inventory/products")
        .with_body("[]")
        .expect(2)
        .create_async()
        .await;
    let recipes = server
        .mock("GET", "/api/inventory/recipes")
        .with_body("[]")
        .expect(2)
        .create_async()
        .await;
    server
        .mock("POST", "/api/inventory/recipe-consumption")
        .match_body(mockito::Matcher::Json(
            json!({ "recipeId": "r1", "servings": 3 }),
        ))
        .with_body("{}")
        .create_async()
        .await;

    let harness = Harness::new(&server);
    harness.client.get_products().await.unwrap();
    harness.client.get_recipes().await.unwrap();
    harness
        .client
        .record_recipe_consumption(RecipeConsumption {
            recipe_id: RecipeId("r1".to_string()),
            servings: 3,
        })
        .await
        .unwrap();
    harness.client.get_products().await.unwrap();
    harness.client.get_recipes().await.unwrap();

    products.assert_async().await;
    recipes.assert_async().await;
}

#[tokio::test]
async fn bulk_restock_posts_parsed_sheet() {
    let mut server = Server::new_async().await;
    mock_csrf(&mut server).await;
    let bulk = server
        .mock("POST", "/api/inventory/bulk-restock")
        .match_body(mockito::Matcher::Json(json!({
            "restocks": [
                { "productId": "p1", "quantityCredited": 10.0, "costForQuantityCredited": 45.0 }
            ]
        })))
        .with_body(r#"{"updated":1}"#)
        .create_async()
        .await;

    let harness = Harness::new(&server);
    let sheet = "productId,quantityCredited,costForQuantityCredited\np1,10,45\n";
    let restocks = parse_restocks(sheet).unwrap();
    harness.client.bulk_restock(restocks).await.unwrap();
    bulk.assert_async().await;
}

#[tokio::test]
async fn read_in_flight_during_mutation_is_not_cached_fresh() {
    let mut server = Server::new_async().await;
    mock_csrf(&mut server).await;
    let products = server
        .mock("GET", "/api/inventory/products")
        .with_chunked_body(|w| {
            std::thread::sleep(Duration::from_millis(400));
            w.write_all(b"[]")
        })
        .expect(2)
        .create_async()
        .await;
    let create = server
        .mock("POST", "/api/inventory/products")
        .with_status(201)
        .with_body(r#"{"_id":"p2"}"#)
        .create_async()
        .await;

    let harness = Harness::new(&server);
    let client = harness.client.clone();
    let slow_read = tokio::spawn(async move { client.get_products().await });

    // let the read reach the backend, then mutate before it answers
    tokio::time::sleep(Duration::from_millis(150)).await;
    harness.client.create_product(basil()).await.unwrap();
    slow_read.await.unwrap().unwrap();

    assert!(harness.client.cache().is_stale(&GET_PRODUCTS.key()));
    harness.client.get_products().await.unwrap();

    create.assert_async().await;
    products.assert_async().await;
}
