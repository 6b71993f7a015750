//! Biblio application library
//!
//! Hosts the books module and the bootstrap that runs it behind the HTTP
//! server.

use anyhow::Context;
use biblio_kernel::{settings::Settings, InitCtx, ModuleRegistry};

pub mod modules;

/// Re-export commonly used types
pub use modules::*;
pub use modules::books::session::BookShelf;

/// Build the registry, run the server until shutdown, then stop modules.
pub async fn serve(settings: &Settings) -> anyhow::Result<()> {
    let shelf = BookShelf::from_settings(settings)?;

    let mut registry = ModuleRegistry::new();
    register_all(&mut registry, shelf);

    let ctx = InitCtx { settings };
    registry.init_modules(&ctx).await?;
    registry.start_modules(&ctx).await?;

    let served = biblio_http::start_server(&registry, settings)
        .await
        .context("server exited with an error");

    registry.stop_modules().await?;
    served
}
