mod run_reminder_pass;
mod scheduler;

use actix_web::web;
use run_reminder_pass::run_reminder_pass_controller;
pub use scheduler::{ReminderError, ReminderPassError, ReminderScheduler};

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/reminders/run", web::post().to(run_reminder_pass_controller));
}
