use samaj_backend::{account, config::Config, store::MemStore, Global};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let config = Config::load("./data/config.toml")?;
    let store = match config.data_dir {
        Some(ref dir) => MemStore::open(dir.join("store"))?,
        None => {
            tracing::warn!("no data directory configured, nothing will be persisted");
            MemStore::new()
        }
    };
    account::promote_superadmins(&store, &config.superadmins).await?;

    let addr = config.addr;
    // use an external function here so this won't be in a proc macros
    let app = samaj_backend::router(Global::new(store, config));

    tracing::info!("listening on {addr}");
    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await?;
    Ok(())
}
