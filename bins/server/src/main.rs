use dotenvy::dotenv;
use tracing::{error, info, warn};
use uuid::Uuid;

use server::errors::StartupError;

fn init_logging() {
    // load .env first so RUST_LOG / LOG_FORMAT take effect
    dotenv().ok();
    common::utils::logging::init_logging_from_env();
    info!(service = "todo-server", event = "logger_init", "tracing subscriber initialized");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(service = "todo-server", event = "signal_error", error = %e, "cannot listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!(service = "todo-server", event = "shutdown_signal", "received Ctrl+C, shutting down");
}

fn main() -> std::process::ExitCode {
    init_logging();

    let service_id = Uuid::new_v4();
    let pid = std::process::id();
    let version = env!("CARGO_PKG_VERSION");

    std::panic::set_hook(Box::new(move |info| {
        error!(
            service = "todo-server",
            event = "panic",
            %service_id,
            pid,
            message = %info,
            "unhandled panic occurred"
        );
    }));

    let cfg = match configs::AppConfig::load_and_validate() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(service = "todo-server", event = "config_invalid", error = %e, "failed to load configuration");
            return std::process::ExitCode::FAILURE;
        }
    };

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(w) = cfg.server.worker_threads { builder.worker_threads(w); }

    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "todo-server", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return std::process::ExitCode::FAILURE;
        }
    };

    info!(
        service = "todo-server",
        event = "start",
        %service_id,
        pid,
        version,
        threads = cfg.server.worker_threads.unwrap_or_default(),
        "todo server starting"
    );

    rt.block_on(async move {
        match server::run(cfg, shutdown_signal()).await {
            Ok(()) => {
                info!(service = "todo-server", event = "stop", %service_id, pid, "server stopped normally");
                std::process::ExitCode::SUCCESS
            }
            Err(e) => {
                if e.downcast_ref::<StartupError>().is_some_and(StartupError::is_corrupt_state) {
                    warn!(
                        service = "todo-server",
                        event = "corrupt_state",
                        "data file is unreadable; fix it, or set storage.on_corrupt = \"discard\" (TODOS_ON_CORRUPT=discard) to start empty"
                    );
                }
                error!(service = "todo-server", event = "run_failed", error = %e, "server::run returned error");
                std::process::ExitCode::FAILURE
            }
        }
    })
}
