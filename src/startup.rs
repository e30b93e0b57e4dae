use actix_cors::Cors;
use actix_files as fs;
use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use sqlx::PgPool;
use std::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::configuration::Settings;
use crate::middleware::{JwtMiddleware, RequestLogger};
use crate::routes::{
    create_user, current_user, health_check, list_users, login, logout, refresh,
    update_current_user, update_current_user_password,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::users::create_user,
        crate::routes::users::list_users,
        crate::routes::users::current_user,
        crate::routes::users::update_current_user,
        crate::routes::users::update_current_user_password,
        crate::routes::auth::login,
        crate::routes::auth::refresh,
        crate::routes::auth::logout,
    ),
    components(schemas(
        crate::routes::users::CreateUserRequest,
        crate::routes::users::UpdateUserRequest,
        crate::routes::users::UpdatePasswordRequest,
        crate::routes::users::MessageResponse,
        crate::routes::users::UserResponse,
        crate::routes::auth::LoginRequest,
    )),
    tags(
        (name = "users", description = "Account registration and profile"),
        (name = "auth", description = "Login, token refresh, logout"),
    )
)]
struct ApiDoc;

pub fn run(
    listener: TcpListener,
    connection: PgPool,
    settings: Settings,
) -> Result<Server, std::io::Error> {
    let connection = web::Data::new(connection);
    let auth_settings = web::Data::new(settings.auth.clone());
    let app_settings = web::Data::new(settings.application.clone());
    let openapi = ApiDoc::openapi();

    let server = HttpServer::new(move || {
        let cors = match settings.application.cors_origin.as_deref() {
            Some(origin) => Cors::default()
                .allowed_origin(origin)
                .allow_any_method()
                .allow_any_header()
                .supports_credentials()
                .max_age(3600),
            None => Cors::permissive(),
        };

        App::new()
            .wrap(RequestLogger)
            .wrap(cors)

            // Shared state
            .app_data(connection.clone())
            .app_data(auth_settings.clone())
            .app_data(app_settings.clone())

            .route("/health_check", web::get().to(health_check))
            .service(
                SwaggerUi::new("/docs/{_:.*}")
                    .url("/api-docs/openapi.json", openapi.clone()),
            )
            .service(
                web::scope("/api")
                    // Protected profile routes; registered before the bare
                    // /users routes so the guard owns the /users/me subtree.
                    .service(
                        web::resource("/users/me")
                            .wrap(JwtMiddleware::new(settings.auth.clone()))
                            .route(web::get().to(current_user))
                            .route(web::patch().to(update_current_user)),
                    )
                    .service(
                        web::resource("/users/me/password")
                            .wrap(JwtMiddleware::new(settings.auth.clone()))
                            .route(web::put().to(update_current_user_password)),
                    )
                    .route("/users", web::post().to(create_user))
                    .route("/users", web::get().to(list_users))
                    .route("/auth/login", web::post().to(login))
                    .route("/auth/refresh", web::post().to(refresh))
                    .service(
                        web::resource("/auth/logout")
                            .wrap(JwtMiddleware::new(settings.auth.clone()))
                            .route(web::post().to(logout)),
                    ),
            )

            // Static file serving (must be last to not override API routes)
            .service(fs::Files::new("/", "./public").index_file("index.html"))
    })
    .listen(listener)?
    .run();

    Ok(server)
}
