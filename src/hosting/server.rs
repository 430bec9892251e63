use super::Lobby;
use super::Session;
use crate::config::Config;
use crate::dictionary::Dictionary;
use actix_cors::Cors;
use actix_web::App;
use actix_web::HttpRequest;
use actix_web::HttpResponse;
use actix_web::HttpServer;
use actix_web::Responder;
use actix_web::middleware::Logger;
use actix_web::web;
use std::sync::Arc;

pub struct Server;

impl Server {
    pub async fn run(config: Config, dictionary: Arc<Dictionary>) -> Result<(), std::io::Error> {
        let lobby = web::Data::from(Lobby::new(dictionary));
        log::info!("listening on port {}", config.port);
        HttpServer::new(move || {
            App::new()
                .wrap(Logger::new("%r %s %Ts"))
                .wrap(
                    Cors::default()
                        .allow_any_origin()
                        .allow_any_method()
                        .allow_any_header(),
                )
                .app_data(lobby.clone())
                .route("/", web::get().to(health))
                .route("/ws", web::get().to(connect))
        })
        .workers(config.workers)
        .bind(("0.0.0.0", config.port))?
        .run()
        .await
    }
}

async fn health() -> impl Responder {
    HttpResponse::Ok().body("yoink server is up")
}

async fn connect(
    lobby: web::Data<Lobby>,
    req: HttpRequest,
    body: web::Payload,
) -> impl Responder {
    match actix_ws::handle(&req, body) {
        Ok((response, ws, stream)) => {
            Session::spawn(lobby.into_inner(), ws, stream);
            response
        }
        Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
    }
}
