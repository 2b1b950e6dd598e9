use clap::Parser;
use dicom_vault::Storage;
use dicom_vault_server::config::{load_env_file, ServerOptions};
use dicom_vault_server::create_app;
use snafu::{Report, ResultExt, Whatever};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn main() {
    let env_file = std::env::current_dir().map(|dir| load_env_file(&dir));
    let options = ServerOptions::parse();

    let level = if options.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "dicom_vault={level},dicom_vault_server={level},tower_http={level}"
        ))
    });
    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_env_filter(filter)
            .finish(),
    )
    .whatever_context("Could not set up global logging subscriber")
    .unwrap_or_else(|e: Whatever| {
        eprintln!("[ERROR] {}", Report::from_error(e));
    });

    match env_file {
        Ok(Ok(Some(path))) => info!("Loaded environment from {}", path.display()),
        Ok(Ok(None)) => {}
        Ok(Err(e)) => warn!("Could not load environment file: {}", Report::from_error(e)),
        Err(e) => warn!("Could not look for an environment file: {}", e),
    }

    let result = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .whatever_context("Could not start the async runtime")
        .and_then(|runtime| runtime.block_on(run(options)));

    if let Err(e) = result {
        error!("{}", Report::from_error(e));
        std::process::exit(-2);
    }
}

async fn run(options: ServerOptions) -> Result<(), Whatever> {
    let storage = Storage::open(&options.dicom_folder)
        .whatever_context("Could not prepare the storage directory")?;
    info!("Storing files in {}", storage.root().display());

    let app = create_app(storage, &options);

    let addr = options.listen_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_whatever_context(|_| format!("Could not bind to {}", addr))?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .whatever_context("Server error")?;

    info!("Shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Could not listen for the shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
