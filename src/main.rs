use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};

use bloomquiz_server::{
    app_state::AppState, auth::JwtService, config::Config, handlers,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env();
    config.validate_for_production();

    let host = config.web_server_host.clone();
    let port = config.web_server_port;
    let jwt_service = web::Data::new(JwtService::new(
        &config.jwt_secret,
        config.jwt_expiration_hours,
    ));

    let state = AppState::new(config)
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    let state = web::Data::new(state);

    log::info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(jwt_service.clone())
            .wrap(Logger::default())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .configure(handlers::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
