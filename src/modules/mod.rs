pub mod books;

use std::sync::Arc;

use biblio_kernel::ModuleRegistry;

use books::session::BookShelf;

/// Register all project-specific modules with the registry
pub fn register_all(registry: &mut ModuleRegistry, shelf: Arc<BookShelf>) {
    registry.register(books::create_module(shelf));
}
