//! Draftforge backend server.
//!
//! One actix-web App serving the WebSocket drafting surface plus the
//! small HTTP sidecar: draft log retrieval, collection export, health,
//! and the key-guarded operator endpoints.
//!
//! ## Submodules
//!
//! - [`Lobby`] — Live session coordinators, spawned and revived on demand
//! - [`handlers`] — Route handlers and the per-connection WebSocket pump

mod lobby;
pub mod handlers;

pub use lobby::Lobby;

use df_cards::Catalog;
use df_gameroom::HeuristicScorer;
use df_gameroom::HttpScorer;
use df_gameroom::Scorer;
use df_store::KeyValue;
use df_store::MemoryStore;
use actix_cors::Cors;
use actix_web::App;
use actix_web::HttpResponse;
use actix_web::HttpServer;
use actix_web::Responder;
use actix_web::middleware::Logger;
use actix_web::web;
use std::sync::Arc;

async fn health() -> impl Responder {
    HttpResponse::Ok().body("ok")
}

fn catalog() -> anyhow::Result<Arc<Catalog>> {
    let path = std::env::var("CATALOG_PATH")
        .map_err(|_| anyhow::anyhow!("CATALOG_PATH must be set"))?;
    let json = std::fs::read_to_string(&path)?;
    let catalog = Catalog::from_json(&json)?;
    log::info!("loaded {} cards from {}", catalog.len(), path);
    Ok(Arc::new(catalog))
}

fn scorer(catalog: &Arc<Catalog>) -> Arc<dyn Scorer> {
    match std::env::var("ADVISOR_URL") {
        Ok(url) => {
            log::info!("bot picks scored by {}", url);
            Arc::new(HttpScorer::new(url))
        }
        Err(_) => Arc::new(HeuristicScorer::new(catalog.clone())),
    }
}

#[rustfmt::skip]
pub async fn run() -> anyhow::Result<()> {
    let catalog = catalog()?;
    let store: Arc<dyn KeyValue> = Arc::new(MemoryStore::new());
    let lobby = web::Data::new(Lobby::new(catalog.clone(), store, scorer(&catalog)));
    let catalog = web::Data::new(catalog);
    log::info!("starting draftforge server");
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
            .app_data(catalog.clone())
            .route("/health", web::get().to(health))
            .route("/ws/{session}", web::get().to(handlers::ws))
            .route("/draftlog/{session}", web::get().to(handlers::draftlog))
            .route("/export/{session}", web::get().to(handlers::export))
            .route("/status/{key}", web::get().to(handlers::status))
            .route("/sessions/{key}", web::get().to(handlers::sessions))
    })
    .workers(6)
    .bind(std::env::var("BIND_ADDR").map_err(|_| anyhow::anyhow!("BIND_ADDR must be set"))?)?
    .run()
    .await?;
    Ok(())
}
