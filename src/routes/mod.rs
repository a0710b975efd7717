use actix_files as fs;
use actix_web::web;

/// Configure the HTTP routes: the WebSocket upgrade plus the static
/// client files.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/ws").route(web::get().to(crate::websocket::ws_index)))
        .service(fs::Files::new("/", "./public").index_file("index.html"));
}
