//! HTTP handlers and route configuration.

mod blogs;
mod categories;
mod health;
mod uploads;
mod users;

use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/health", web::get().to(health::health_check))
        .route("/uploads/{imageName}", web::get().to(uploads::download))
        .service(
            web::scope("/api/v1")
                // Literal segments are registered before `/blogs/{id}`.
                .service(
                    web::scope("/blogs")
                        .route("", web::get().to(blogs::list))
                        .route("/search", web::get().to(blogs::search))
                        .route(
                            "/delete/{userId}/{blogId}",
                            web::delete().to(blogs::delete),
                        )
                        .route(
                            "/categories/{categoryId}",
                            web::get().to(blogs::list_by_category),
                        )
                        .route("/user/{userId}", web::get().to(blogs::list_by_user))
                        .route(
                            "/create/{userId}/{categoryId}",
                            web::post().to(blogs::create),
                        )
                        .route(
                            "/update/{userId}/{blogId}",
                            web::put().to(blogs::update),
                        )
                        .route(
                            "/image/upload/{blogId}",
                            web::post().to(blogs::upload_image),
                        )
                        .route(
                            "/image/get/{imageName}",
                            web::get().to(blogs::image_url),
                        )
                        .route("/{id}", web::get().to(blogs::get)),
                )
                .service(
                    web::scope("/users")
                        .route("", web::post().to(users::create))
                        .route("/{id}", web::get().to(users::get))
                        .route("/{id}", web::delete().to(users::delete)),
                )
                .service(
                    web::scope("/categories")
                        .route("", web::post().to(categories::create))
                        .route("", web::get().to(categories::list))
                        .route("/{id}", web::get().to(categories::get)),
                ),
        );
}
