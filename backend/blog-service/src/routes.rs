//! Route configuration
//!
//! Centralized route setup; post and user route groups sit behind the JWT
//! middleware, everything else is public.

use actix_web::web;

use crate::handlers;
use crate::middleware::JwtAuthMiddleware;

/// Configure all routes for the application
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg
        // Public endpoints
        .route("/health", web::get().to(handlers::health_check))
        .route("/register", web::post().to(handlers::register))
        .route("/authenticate", web::post().to(handlers::authenticate))
        .route("/auth/google", web::get().to(handlers::google_login))
        .route(
            "/auth/google/callback",
            web::get().to(handlers::google_callback),
        )
        .route("/uploads/{filename}", web::get().to(handlers::serve_upload))
        // Authenticated route groups
        .configure(routes::posts::configure)
        .configure(routes::users::configure);
}

mod routes {
    use super::*;

    pub mod posts {
        use super::*;

        pub fn configure(cfg: &mut web::ServiceConfig) {
            cfg.service(
                web::scope("/posts")
                    .wrap(JwtAuthMiddleware)
                    .route("", web::post().to(handlers::create_post))
                    .route("", web::get().to(handlers::list_posts))
                    .route("/{id}/history", web::get().to(handlers::get_edit_history))
                    .route("/{id}", web::get().to(handlers::get_post))
                    .route("/{id}", web::put().to(handlers::update_post))
                    .route("/{id}", web::delete().to(handlers::delete_post)),
            );
        }
    }

    pub mod users {
        use super::*;

        pub fn configure(cfg: &mut web::ServiceConfig) {
            cfg.service(
                web::scope("/user")
                    .wrap(JwtAuthMiddleware)
                    .route("", web::put().to(handlers::update_current_user)),
            )
            .service(
                web::scope("/users")
                    .wrap(JwtAuthMiddleware)
                    .route("/me", web::get().to(handlers::current_user_profile))
                    .route("", web::get().to(handlers::list_users))
                    .route("/{id}", web::get().to(handlers::get_user_profile))
                    .route("/{id}", web::delete().to(handlers::delete_user)),
            );
        }
    }
}
