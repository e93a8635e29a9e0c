#![deny(clippy::wildcard_imports)]

use actix_web::{web, App, HttpServer};
use clap::Parser;
use knockout_whist_server::server::registry::{GameServer, ServerConfig};
use knockout_whist_server::{telemetry, ws};
use tracing::info;

/// Knockout Whist game server.
#[derive(Debug, Parser)]
#[command(name = "knockout-whist-server", version, about)]
struct Args {
    /// Host to bind to.
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to bind to.
    #[arg(long, default_value_t = 8765)]
    port: u16,

    /// Enable debug logging.
    #[arg(long)]
    debug: bool,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    telemetry::init_tracing(args.debug);

    let server = GameServer::new(ServerConfig::default());
    info!(host = %args.host, port = args.port, "starting Knockout Whist server");

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(server.clone()))
            .route("/ws", web::get().to(ws::session::upgrade))
    })
    .bind((args.host.as_str(), args.port))?
    .run()
    .await
}
