//! HTTP handlers and route configuration.

mod auth;
mod health;
mod movies;
mod pages;

use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            // Auth routes, skipped by the route gate
            .service(
                web::scope("/auth")
                    .route("/providers", web::get().to(auth::list_providers))
                    .route(
                        "/callback/credentials",
                        web::post().to(auth::credentials_sign_in),
                    )
                    .route("/signin/{provider}", web::get().to(auth::oauth_sign_in))
                    .route("/callback/{provider}", web::get().to(auth::oauth_callback))
                    .route("/session", web::get().to(auth::session))
                    .route("/signout", web::post().to(auth::sign_out)),
            )
            // Catalog routes
            .service(
                web::scope("/movies")
                    .route("/now-playing", web::get().to(movies::now_playing))
                    .route("/popular", web::get().to(movies::popular))
                    .route("/{id}", web::get().to(movies::details))
                    .route("/{id}/videos", web::get().to(movies::videos)),
            ),
    )
    // Pages
    .route("/login", web::get().to(pages::login))
    .route("/signout", web::post().to(pages::sign_out))
    .route("/", web::get().to(pages::home));
}
