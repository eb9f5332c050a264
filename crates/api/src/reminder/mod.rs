mod bias;
mod cancel_reminder;
mod create_reminder;
mod fire_reminder;
mod get_reminders;
pub mod scheduler;
mod submit_feedback;
mod subscribers;

use actix_web::web;
use cancel_reminder::cancel_reminder_controller;
use create_reminder::create_reminder_controller;
pub use create_reminder::CreateReminderUseCase;
pub use fire_reminder::{FireOutcome, FireReminderUseCase};
use get_reminders::get_reminders_controller;
use submit_feedback::submit_feedback_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/reminders", web::post().to(create_reminder_controller));
    cfg.route("/reminders", web::get().to(get_reminders_controller));
    cfg.route(
        "/reminders/{reminder_id}/cancel",
        web::post().to(cancel_reminder_controller),
    );
    cfg.route(
        "/reminders/{reminder_id}/feedback",
        web::post().to(submit_feedback_controller),
    );
}
