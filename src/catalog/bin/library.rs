use tokio::io::BufReader;
use book_catalog::catalog::console::Console;
use book_catalog::catalog::factory::create_catalog_service;
use book_catalog::core::domain::Configuration;
use book_catalog::core::library::LibraryError;

// Interactive console over the same catalog as the http service; logging stays off
// so it does not interleave with the menu.
#[tokio::main]
async fn main() -> Result<(), LibraryError> {
    let config = Configuration::from_env()?;
    let catalog_service = create_catalog_service(&config).await?;
    let mut console = Console::new(catalog_service, BufReader::new(tokio::io::stdin()), tokio::io::stdout());
    console.run().await
}
