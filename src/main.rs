#![forbid(unsafe_code)]

use engine::content::ContentStore;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> anyhow::Result<()> {
    let rt = tokio::runtime::Runtime::new()?;

    // Create the content store
    let content_store = ContentStore::default();
    content_store.create_req_dirs()?;

    let log_file = content_store.log_file();
    let log_dir = log_file.parent().unwrap_or_else(|| std::path::Path::new("."));
    let log_name = log_file.file_name().unwrap_or_else(|| std::ffi::OsStr::new("log"));

    // stdout belongs to the chat transcript
    let term_logger = fmt::layer().with_writer(std::io::stderr);
    let file_appender = tracing_appender::rolling::never(log_dir, log_name);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let file_logger = fmt::layer().with_ansi(false).with_writer(non_blocking);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::from("info")))
        .with(term_logger)
        .with(file_logger)
        .init();

    let app = emotes::App::new(content_store);
    rt.block_on(app.run())
}
