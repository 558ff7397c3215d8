pub mod config;
pub mod controllers;
pub mod database;
pub mod error;
pub mod middleware;
pub mod models;
pub mod repository;
pub mod services;

use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

use crate::config::{AuthScheme, Config};
use crate::database::InMemoryStore;
use crate::services::{
    auth::{
        AuthService, BcryptPasswordChecker, JwtTokenIssuer, PasswordChecker, PlainPasswordChecker,
        StaticTokenIssuer, TokenIssuer,
    },
    availability::AvailabilityEngine,
    booking::BookingService,
    room::RoomService,
    seed::{SeedError, SeedSummary, Seeder},
    write_lock,
};

// Shared state for the whole application
pub struct AppState {
    pub config: Config,
    pub store: Arc<InMemoryStore>,
    pub auth: AuthService,
    pub rooms: RoomService,
    pub bookings: BookingService,
}

impl AppState {
    /// Wires every service onto one store.
    pub fn new(config: Config, store: Arc<InMemoryStore>) -> Self {
        let (checker, issuer): (Arc<dyn PasswordChecker>, Arc<dyn TokenIssuer>) = match config.auth.scheme {
            AuthScheme::Jwt => (
                Arc::new(BcryptPasswordChecker::new(config.auth.bcrypt_cost)),
                Arc::new(JwtTokenIssuer::new(
                    &config.auth.jwt_secret,
                    &config.auth.jwt_issuer,
                    config.auth.jwt_expires_in_hours,
                )),
            ),
            AuthScheme::Placeholder => {
                warn!("placeholder auth scheme in use: passwords and tokens are NOT secure");
                (
                    Arc::new(PlainPasswordChecker),
                    Arc::new(StaticTokenIssuer::new(&config.auth.jwt_issuer)),
                )
            }
        };

        let availability = AvailabilityEngine::new(store.clone(), store.clone());
        let booking_lock = write_lock();

        Self {
            auth: AuthService::new(store.clone(), checker, issuer),
            rooms: RoomService::new(store.clone(), store.clone(), availability.clone())
                .with_write_lock(booking_lock.clone()),
            bookings: BookingService::new(store.clone(), availability).with_write_lock(booking_lock),
            store,
            config,
        }
    }

    pub fn seeder(&self) -> Seeder {
        Seeder::new(
            self.store.clone(),
            self.store.clone(),
            self.store.clone(),
            self.auth.password_checker(),
        )
    }

    pub async fn seed(&self) -> Result<SeedSummary, SeedError> {
        self.seeder().seed().await
    }
}

/// Full HTTP surface: health probes, `/api` routes, CORS and request tracing.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.cors.allowed_origins);

    Router::new()
        .route("/", get(|| async { "Hotel API v1.0" }))
        .route("/health", get(|| async { "OK" }))
        .nest("/api", controllers::routes())
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origin = if allowed_origins.is_empty() {
        AllowOrigin::mirror_request()
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|o| match HeaderValue::from_str(o) {
                Ok(v) => Some(v),
                Err(_) => {
                    warn!("ignoring invalid CORS origin {:?}", o);
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}
