use std::sync::Arc;
use crate::books::factory::create_book_repository;
use crate::catalog::domain::CatalogService;
use crate::catalog::domain::service::CatalogServiceImpl;
use crate::core::domain::Configuration;
use crate::core::library::LibraryResult;
use crate::gateway::factory::create_book_lookup;

// built once per process and shared by every request
pub async fn create_catalog_service(config: &Configuration) -> LibraryResult<Arc<dyn CatalogService>> {
    let book_repo = create_book_repository(config).await?;
    let lookup = create_book_lookup(config)?;
    Ok(Arc::new(CatalogServiceImpl::new(book_repo, lookup)))
}
