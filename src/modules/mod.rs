pub mod books;

use std::sync::Arc;

use shelf_db::DbPool;
use shelf_kernel::ModuleRegistry;

/// Register all project-specific modules with the registry
pub fn register_all(registry: &mut ModuleRegistry, pool: &DbPool) -> anyhow::Result<()> {
    let book_store = Arc::new(books::store::SqlBookStore::new(pool.clone()));
    registry.register(books::create_module(book_store))?;
    Ok(())
}
