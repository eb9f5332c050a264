mod refresh_config;

use actix_web::web;
use refresh_config::refresh_config_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/admin/config/refresh",
        web::post().to(refresh_config_controller),
    );
}
