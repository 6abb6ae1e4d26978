mod scheduler;
mod send_reminders;

use crate::error::GatherlyError;
use actix_web::{web, HttpResponse};
use gatherly_api_structs::{get_scheduler_status, run_event_reminders, run_reminders};
pub use scheduler::{PassReport, ReminderScheduler, SchedulerState, SchedulerStatus};
pub use send_reminders::SendEventRemindersError;

impl From<SendEventRemindersError> for GatherlyError {
    fn from(e: SendEventRemindersError) -> Self {
        match e {
            SendEventRemindersError::NotFound(event_id) => Self::NotFound(format!(
                "The event with id: {}, was not found.",
                event_id
            )),
            SendEventRemindersError::NoParticipants(event_id) => Self::BadClientData(format!(
                "The event with id: {}, has no participants",
                event_id
            )),
            SendEventRemindersError::StorageError => Self::InternalError,
        }
    }
}

fn status_response(status: SchedulerStatus) -> get_scheduler_status::APIResponse {
    get_scheduler_status::APIResponse {
        running: status.is_running(),
        next_run_description: status.next_run_description,
    }
}

fn pass_response(report: PassReport) -> run_reminders::APIResponse {
    run_reminders::APIResponse {
        success: report.success,
        message: report.message,
        outcome: report.outcome,
    }
}

async fn get_scheduler_status_controller(
    scheduler: web::Data<ReminderScheduler>,
) -> HttpResponse {
    HttpResponse::Ok().json(status_response(scheduler.status()))
}

async fn start_scheduler_controller(scheduler: web::Data<ReminderScheduler>) -> HttpResponse {
    scheduler.start();
    HttpResponse::Ok().json(status_response(scheduler.status()))
}

async fn stop_scheduler_controller(scheduler: web::Data<ReminderScheduler>) -> HttpResponse {
    scheduler.stop();
    HttpResponse::Ok().json(status_response(scheduler.status()))
}

async fn run_reminders_controller(scheduler: web::Data<ReminderScheduler>) -> HttpResponse {
    let report = scheduler.run_manual_pass().await;
    if report.success {
        HttpResponse::Ok().json(pass_response(report))
    } else {
        HttpResponse::InternalServerError().json(pass_response(report))
    }
}

async fn run_event_reminders_controller(
    path_params: web::Path<run_event_reminders::PathParams>,
    scheduler: web::Data<ReminderScheduler>,
) -> Result<HttpResponse, GatherlyError> {
    let report = scheduler.run_for_event(path_params.event_id).await?;
    Ok(HttpResponse::Ok().json(pass_response(report)))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/reminders/scheduler",
        web::get().to(get_scheduler_status_controller),
    );
    cfg.route(
        "/reminders/scheduler/start",
        web::post().to(start_scheduler_controller),
    );
    cfg.route(
        "/reminders/scheduler/stop",
        web::post().to(stop_scheduler_controller),
    );
    cfg.route("/reminders/run", web::post().to(run_reminders_controller));
    cfg.route(
        "/reminders/run/{event_id}",
        web::post().to(run_event_reminders_controller),
    );
}
