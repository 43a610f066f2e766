use actix_web::{web, HttpResponse};
use duesoon_api_structs::get_service_health::*;
use duesoon_infra::DuesoonContext;

async fn status(ctx: web::Data<DuesoonContext>) -> HttpResponse {
    HttpResponse::Ok().json(APIResponse {
        message: "Reminders are up!\r\n".into(),
        reminder_jobs_enabled: ctx.config.reminders.jobs_enabled,
    })
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(status));
}
