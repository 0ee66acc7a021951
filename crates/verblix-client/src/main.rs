use eyre::Result;
use tracing_subscriber::EnvFilter;

use verblix_client::api::RelayClient;
use verblix_client::app::{ChatApp, Flow};
use verblix_client::config;
use verblix_client::store::ChatSessionStore;
use verblix_client::terminal::{self, TerminalView};
use verblix_storage::objects::FileStore;

fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    // One thread: input, network reads and rendering interleave on it.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run())
}

async fn run() -> Result<()> {
    let config = config::load_or_init()?.with_overrides(|name| std::env::var(name).ok());
    let storage = FileStore::open(config.storage_dir()?)?;
    let store = ChatSessionStore::load(storage);
    let client = RelayClient::new(&config.server_url)?;

    let (mut input, confirmations) = terminal::spawn_stdin();
    let mut app = ChatApp::new(store, TerminalView::new(confirmations), client);

    app.refresh_identity().await;
    app.render_all();

    loop {
        tokio::select! {
            line = input.next_line() => match line {
                Some(line) => {
                    if app.handle_line(&line).await == Flow::Quit {
                        break;
                    }
                }
                None => break,
            },
            chunk = app.next_chunk(), if app.is_streaming() => app.on_chunk(chunk),
        }
    }

    Ok(())
}
