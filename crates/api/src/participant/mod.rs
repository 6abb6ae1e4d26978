mod get_participants;
mod subscribe;
mod subscribers;
mod unsubscribe;

use actix_web::web;
use get_participants::get_participants_controller;
use subscribe::subscribe_controller;
use unsubscribe::unsubscribe_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/events/{event_id}/participants",
        web::post().to(subscribe_controller),
    );
    cfg.route(
        "/events/{event_id}/participants",
        web::get().to(get_participants_controller),
    );
    cfg.route(
        "/events/{event_id}/participants/{email}",
        web::delete().to(unsubscribe_controller),
    );
}
