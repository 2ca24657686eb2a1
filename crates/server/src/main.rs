//! Draftforge server binary.
//!
//! Serves WebSocket drafting sessions on BIND_ADDR (e.g. 0.0.0.0:8888).
//! Requires CATALOG_PATH pointing at a card catalog JSON file.

#[tokio::main]
async fn main() {
    df_core::log();
    df_core::kys();
    if let Err(e) = df_server::run().await {
        log::error!("server exited: {}", e);
        std::process::exit(1);
    }
}
