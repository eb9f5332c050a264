use actix_web::{web, HttpResponse};
use lull_api_structs::get_service_health::*;
use lull_infra::LullContext;

async fn status(ctx: web::Data<LullContext>) -> HttpResponse {
    HttpResponse::Ok().json(APIResponse {
        message: "Yo! We are up!\r\n".into(),
        armed_timers: ctx.timers.len(),
    })
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(status));
}
