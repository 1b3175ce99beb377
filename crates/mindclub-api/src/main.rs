use mindclub_core::Config;

// Use mimalloc as the global allocator for lower fragmentation, especially on
// musl-based container images.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // .env is optional; real environment variables take precedence
    let config = Config::from_env()?;

    let (_state, router) = mindclub_api::setup::initialize_app(config.clone()).await?;

    mindclub_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
