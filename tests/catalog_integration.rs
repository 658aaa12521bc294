//! Tests de integración contra PostgreSQL (`DATABASE_URL`).
//!
//! Cada test recibe una base de datos nueva con las migraciones aplicadas.

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use vehicle_catalog::{
    config::EnvironmentConfig,
    controllers::image_controller::ImageController,
    create_app,
    middleware::auth::AuthenticatedUser,
    models::{
        gallery::NewGalleryImage,
        user::{NewUser, User, UserRole},
        vehicle::{BodyType, FuelType, NewVehicle, Transmission, VehicleFilter},
        vehicle_image::NewVehicleImage,
        wishlist::WishlistToggle,
    },
    repositories::{
        gallery_repository::GalleryRepository, session_repository::SessionRepository,
        stats_repository::StatsRepository, user_repository::UserRepository,
        vehicle_image_repository::VehicleImageRepository, vehicle_repository::VehicleRepository,
        wishlist_repository::WishlistRepository,
    },
    state::AppState,
    utils::jwt::generate_token,
};

const PNG: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

fn test_state(pool: PgPool) -> AppState {
    let config = EnvironmentConfig {
        media_root: std::env::temp_dir().join(format!("vehicle-media-{}", Uuid::new_v4())),
        ..EnvironmentConfig::default()
    };
    AppState::new(pool, config)
}

async fn create_user(pool: &PgPool, username: &str, role: UserRole) -> User {
    UserRepository::new(pool.clone())
        .create(NewUser {
            username: username.to_string(),
            email: format!("{}@example.com", username),
            password_hash: "not-a-real-hash".to_string(),
            first_name: String::new(),
            last_name: String::new(),
            role,
        })
        .await
        .unwrap()
}

/// Cabecera `Authorization` con una sesión abierta para `user`
async fn bearer(state: &AppState, user: &User) -> String {
    let issued = generate_token(user.id, user.role, &state.jwt).unwrap();
    SessionRepository::new(state.pool.clone())
        .create(issued.session_id, user.id, issued.expires_at)
        .await
        .unwrap();
    format!("Bearer {}", issued.token)
}

fn actor(user: &User) -> AuthenticatedUser {
    AuthenticatedUser {
        user_id: user.id,
        username: user.username.clone(),
        role: user.role,
        session_id: Uuid::new_v4(),
    }
}

fn sample_vehicle(title: &str) -> NewVehicle {
    NewVehicle {
        title: title.to_string(),
        year: 2018,
        price: Decimal::new(1_450_000, 2),
        fuel_type: FuelType::Petrol,
        transmission: Transmission::Manual,
        mileage: "40,000 miles".to_string(),
        body_type: BodyType::Sedan,
        color: "Black".to_string(),
        engine: "1.6L".to_string(),
        description: "Well kept".to_string(),
        features: vec!["ABS".to_string()],
    }
}

async fn create_vehicle(pool: &PgPool, owner: &User, vehicle: NewVehicle, urls: Vec<String>) -> Uuid {
    let (vehicle, _) = VehicleRepository::new(pool.clone())
        .create_with_images(&vehicle, owner.id, urls)
        .await
        .unwrap();
    vehicle.id
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    auth: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, auth);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

fn listed_ids(body: &Value) -> Vec<String> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_str().unwrap().to_string())
        .collect()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_soft_deleted_vehicle_is_hidden(pool: PgPool) {
    let state = test_state(pool.clone());
    let app = create_app(state.clone());
    let admin = create_user(&pool, "admin", UserRole::Admin).await;
    let auth = bearer(&state, &admin).await;

    let kept = create_vehicle(&pool, &admin, sample_vehicle("Kept"), vec![]).await;
    let gone = create_vehicle(&pool, &admin, sample_vehicle("Gone"), vec![]).await;

    let (status, _) = send(&app, Method::DELETE, &format!("/api/v1/vehicles/{}", gone), &auth, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, Method::GET, &format!("/api/v1/vehicles/{}", gone), &auth, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, Method::GET, "/api/v1/vehicles", &auth, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed_ids(&body), vec![kept.to_string()]);

    // Un segundo borrado ya no encuentra el vehículo
    let (status, _) = send(&app, Method::DELETE, &format!("/api/v1/vehicles/{}", gone), &auth, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_concurrent_primary_attaches_keep_one_primary(pool: PgPool) {
    let admin = create_user(&pool, "admin", UserRole::Admin).await;
    let vehicle_id = create_vehicle(
        &pool,
        &admin,
        sample_vehicle("Golf"),
        vec!["https://cdn.example.com/first.jpg".to_string()],
    )
    .await;

    let mut handles = Vec::new();
    for i in 0..10 {
        let repository = VehicleImageRepository::new(pool.clone());
        handles.push(tokio::spawn(async move {
            let image = NewVehicleImage {
                image_url: format!("https://cdn.example.com/{}.jpg", i),
                is_primary: true,
            };
            repository.attach(vehicle_id, &[image]).await
        }));
    }
    for handle in handles {
        assert!(handle.await.unwrap().is_ok());
    }

    let images = VehicleImageRepository::new(pool.clone())
        .list_for_vehicle(vehicle_id)
        .await
        .unwrap();
    assert_eq!(images.len(), 11);
    assert_eq!(images.iter().filter(|image| image.is_primary).count(), 1);
    assert!(images[0].is_primary);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_set_primary_moves_the_flag(pool: PgPool) {
    let admin = create_user(&pool, "admin", UserRole::Admin).await;
    let vehicle_id = create_vehicle(
        &pool,
        &admin,
        sample_vehicle("Golf"),
        vec![
            "https://cdn.example.com/a.jpg".to_string(),
            "https://cdn.example.com/b.jpg".to_string(),
        ],
    )
    .await;
    let repository = VehicleImageRepository::new(pool.clone());
    let before = repository.list_for_vehicle(vehicle_id).await.unwrap();
    let second = before.iter().find(|image| !image.is_primary).unwrap().id;

    let promoted = repository.set_primary(vehicle_id, second).await.unwrap();
    assert!(promoted.is_primary);

    let after = repository.list_for_vehicle(vehicle_id).await.unwrap();
    assert_eq!(after[0].id, second);
    assert_eq!(after.iter().filter(|image| image.is_primary).count(), 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_wishlist_toggle_round_trip(pool: PgPool) {
    let state = test_state(pool.clone());
    let app = create_app(state.clone());
    let admin = create_user(&pool, "admin", UserRole::Admin).await;
    let user = create_user(&pool, "reader", UserRole::User).await;
    let auth = bearer(&state, &user).await;
    let vehicle_id = create_vehicle(&pool, &admin, sample_vehicle("Golf"), vec![]).await;
    let toggle_uri = format!("/api/v1/vehicles/{}/wishlist/toggle", vehicle_id);
    let detail_uri = format!("/api/v1/vehicles/{}", vehicle_id);

    let (status, body) = send(&app, Method::POST, &toggle_uri, &auth, None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["is_wishlisted"], true);
    let (_, detail) = send(&app, Method::GET, &detail_uri, &auth, None).await;
    assert_eq!(detail["is_wishlisted"], true);

    let (status, body) = send(&app, Method::POST, &toggle_uri, &auth, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_wishlisted"], false);
    let (_, detail) = send(&app, Method::GET, &detail_uri, &auth, None).await;
    assert_eq!(detail["is_wishlisted"], false);

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/api/v1/vehicles/{}/wishlist/toggle", Uuid::new_v4()),
        &auth,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_concurrent_toggles_compose(pool: PgPool) {
    let admin = create_user(&pool, "admin", UserRole::Admin).await;
    let user = create_user(&pool, "reader", UserRole::User).await;
    let vehicle_id = create_vehicle(&pool, &admin, sample_vehicle("Golf"), vec![]).await;

    let first = WishlistRepository::new(pool.clone());
    let second = WishlistRepository::new(pool.clone());
    assert!(first.add(user.id, vehicle_id).await.unwrap().is_some());

    for _ in 0..50 {
        let (a, b) = tokio::join!(
            first.toggle(user.id, vehicle_id),
            second.toggle(user.id, vehicle_id)
        );
        let mut outcomes = [a.unwrap(), b.unwrap()];
        outcomes.sort_by_key(|outcome| outcome.is_wishlisted());
        assert_eq!(outcomes, [WishlistToggle::Removed, WishlistToggle::Added]);

        // Dos toggles desde "presente" vuelven a "presente"
        let present: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM wishlist_items WHERE user_id = $1 AND vehicle_id = $2)",
        )
        .bind(user.id)
        .bind(vehicle_id)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert!(present);
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_owner_or_admin_modifies_vehicle(pool: PgPool) {
    let state = test_state(pool.clone());
    let app = create_app(state.clone());
    let admin = create_user(&pool, "admin", UserRole::Admin).await;
    let owner = create_user(&pool, "owner", UserRole::User).await;
    let stranger = create_user(&pool, "stranger", UserRole::User).await;
    let admin_auth = bearer(&state, &admin).await;
    let owner_auth = bearer(&state, &owner).await;
    let stranger_auth = bearer(&state, &stranger).await;

    let vehicle_id = create_vehicle(&pool, &owner, sample_vehicle("Golf"), vec![]).await;
    let uri = format!("/api/v1/vehicles/{}", vehicle_id);

    let (status, body) = send(&app, Method::PATCH, &uri, &stranger_auth, Some(json!({"color": "Red"}))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");
    let (status, _) = send(&app, Method::DELETE, &uri, &stranger_auth, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(&app, Method::PATCH, &uri, &owner_auth, Some(json!({"color": "Blue"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["color"], "Blue");
    assert_eq!(body["data"]["title"], "Golf");

    let (status, _) = send(&app, Method::DELETE, &uri, &admin_auth, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_permission_checked_before_body(pool: PgPool) {
    let state = test_state(pool.clone());
    let app = create_app(state.clone());
    let admin = create_user(&pool, "admin", UserRole::Admin).await;
    let owner = create_user(&pool, "owner", UserRole::User).await;
    let stranger = create_user(&pool, "stranger", UserRole::User).await;
    let admin_auth = bearer(&state, &admin).await;
    let stranger_auth = bearer(&state, &stranger).await;

    // Un no-admin nunca crea vehículos, sea cual sea el cuerpo
    let (status, _) = send(&app, Method::POST, "/api/v1/vehicles", &stranger_auth, Some(json!({"title": "x"}))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/vehicles")
        .header(header::AUTHORIZATION, &stranger_auth)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Un vehículo inexistente es 404 aunque el cuerpo sea inválido
    let missing = format!("/api/v1/vehicles/{}", Uuid::new_v4());
    let (status, _) = send(&app, Method::PUT, &missing, &admin_auth, Some(json!({"year": "abc"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let vehicle_id = create_vehicle(&pool, &owner, sample_vehicle("Golf"), vec![]).await;
    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/api/v1/vehicles/{}", vehicle_id),
        &stranger_auth,
        Some(json!({"year": "abc"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Autorizado, el mismo cuerpo sí es un error del cliente
    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/api/v1/vehicles/{}", vehicle_id),
        &admin_auth,
        Some(json!({"year": "abc"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_search_is_case_insensitive_across_columns(pool: PgPool) {
    let admin = create_user(&pool, "admin", UserRole::Admin).await;

    let by_title = create_vehicle(&pool, &admin, sample_vehicle("Volkswagen Golf"), vec![]).await;
    let by_description = create_vehicle(
        &pool,
        &admin,
        NewVehicle {
            description: "Panoramic sunroof and heated seats".to_string(),
            ..sample_vehicle("Family car")
        },
        vec![],
    )
    .await;
    let by_color = create_vehicle(
        &pool,
        &admin,
        NewVehicle {
            color: "Metallic Teal".to_string(),
            ..sample_vehicle("City car")
        },
        vec![],
    )
    .await;
    let by_fuel = create_vehicle(
        &pool,
        &admin,
        NewVehicle {
            fuel_type: FuelType::Electric,
            ..sample_vehicle("Commuter")
        },
        vec![],
    )
    .await;
    let by_body = create_vehicle(
        &pool,
        &admin,
        NewVehicle {
            body_type: BodyType::Convertible,
            ..sample_vehicle("Weekend car")
        },
        vec![],
    )
    .await;
    create_vehicle(&pool, &admin, sample_vehicle("Plain"), vec![]).await;

    let repository = VehicleRepository::new(pool.clone());
    for (term, expected) in [
        ("GOLF", by_title),
        ("SunRoof", by_description),
        ("teal", by_color),
        ("ELECTR", by_fuel),
        ("Convert", by_body),
    ] {
        let filter = VehicleFilter {
            search: Some(term.to_string()),
            ..Default::default()
        };
        let found = repository.list(&filter, admin.id).await.unwrap();
        let ids: Vec<Uuid> = found.iter().map(|vehicle| vehicle.id).collect();
        assert_eq!(ids, vec![expected], "search '{}'", term);
    }

    let everything = repository.list(&VehicleFilter::default(), admin.id).await.unwrap();
    assert_eq!(everything.len(), 6);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_json_image_url_must_be_http(pool: PgPool) {
    let state = test_state(pool.clone());
    let app = create_app(state.clone());
    let admin = create_user(&pool, "admin", UserRole::Admin).await;
    let auth = bearer(&state, &admin).await;
    let vehicle_id = create_vehicle(&pool, &admin, sample_vehicle("Golf"), vec![]).await;

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/v1/vehicles/{}/images", vehicle_id),
        &auth,
        Some(json!({"image_url": "/media/someone-else.png"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_deleting_image_keeps_shared_files(pool: PgPool) {
    let state = test_state(pool.clone());
    let owner = create_user(&pool, "owner", UserRole::User).await;
    let other = create_user(&pool, "other", UserRole::User).await;
    let vehicle_id = create_vehicle(&pool, &owner, sample_vehicle("Golf"), vec![]).await;
    let file_path = |url: &str| state.media.root().join(url.rsplit('/').next().unwrap());

    // Fichero de la galería de otro usuario, referenciado también por el vehículo
    let shared_url = state.media.store(PNG).await.unwrap();
    GalleryRepository::new(pool.clone())
        .create(
            other.id,
            &NewGalleryImage {
                title: None,
                description: None,
                image_url: shared_url.clone(),
            },
        )
        .await
        .unwrap();
    let own_url = state.media.store(PNG).await.unwrap();

    let images = VehicleImageRepository::new(pool.clone())
        .attach(
            vehicle_id,
            &[
                NewVehicleImage { image_url: shared_url.clone(), is_primary: true },
                NewVehicleImage { image_url: own_url.clone(), is_primary: false },
            ],
        )
        .await
        .unwrap();

    let controller = ImageController::new(&state);
    for image in &images {
        controller.delete(&actor(&owner), vehicle_id, image.id).await.unwrap();
    }

    assert!(tokio::fs::metadata(file_path(&shared_url)).await.is_ok());
    assert!(tokio::fs::metadata(file_path(&own_url)).await.is_err());

    let _ = tokio::fs::remove_dir_all(state.media.root()).await;
}

#[sqlx::test(migrations = "./migrations")]
async fn test_stats_ignore_deleted_vehicles(pool: PgPool) {
    let state = test_state(pool.clone());
    let app = create_app(state.clone());
    let admin = create_user(&pool, "admin", UserRole::Admin).await;
    let user = create_user(&pool, "reader", UserRole::User).await;
    let wishlist = WishlistRepository::new(pool.clone());

    let active = create_vehicle(
        &pool,
        &admin,
        sample_vehicle("Active"),
        vec!["https://cdn.example.com/a.jpg".to_string()],
    )
    .await;
    let deleted = create_vehicle(
        &pool,
        &admin,
        sample_vehicle("Deleted"),
        vec!["https://cdn.example.com/d.jpg".to_string()],
    )
    .await;
    wishlist.add(user.id, active).await.unwrap();
    wishlist.add(user.id, deleted).await.unwrap();
    assert!(VehicleRepository::new(pool.clone()).soft_delete(deleted).await.unwrap());

    let stats = StatsRepository::new(pool.clone()).totals().await.unwrap();
    assert_eq!(stats.total_vehicles, 1);
    assert_eq!(stats.total_wishlists, 1);
    assert_eq!(stats.total_images, 1);
    assert_eq!(stats.total_users, 2);

    let (status, _) = send(&app, Method::GET, "/api/v1/vehicles/stats", &bearer(&state, &user).await, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, body) = send(&app, Method::GET, "/api/v1/vehicles/stats", &bearer(&state, &admin).await, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_vehicles"], 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_deleting_primary_falls_back_to_earliest_image(pool: PgPool) {
    let state = test_state(pool.clone());
    let admin = create_user(&pool, "admin", UserRole::Admin).await;
    let vehicle_id = create_vehicle(
        &pool,
        &admin,
        sample_vehicle("Golf"),
        vec![
            "https://cdn.example.com/a.jpg".to_string(),
            "https://cdn.example.com/b.jpg".to_string(),
        ],
    )
    .await;
    let images = VehicleImageRepository::new(pool.clone());
    let primary = images.list_for_vehicle(vehicle_id).await.unwrap()[0].clone();
    assert_eq!(primary.image_url, "https://cdn.example.com/a.jpg");

    ImageController::new(&state)
        .delete(&actor(&admin), vehicle_id, primary.id)
        .await
        .unwrap();

    let remaining = images.list_for_vehicle(vehicle_id).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert!(!remaining[0].is_primary);

    let listed = VehicleRepository::new(pool.clone())
        .list(&VehicleFilter::default(), admin.id)
        .await
        .unwrap();
    assert_eq!(
        listed[0].primary_image.as_deref(),
        Some("https://cdn.example.com/b.jpg")
    );
}
