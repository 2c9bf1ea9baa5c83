//! Seed the product catalog from a YAML file.
//!
//! The file is a list of product payloads:
//!
//! ```yaml
//! - name: Pen
//!   description: Blue
//!   price: 1.5
//!   image_url: http://x/p.png
//! ```
//!
//! Each entry is created through the catalog service; an invalid entry is
//! logged and skipped, the rest still go in.

use std::path::Path;

use tracing::{error, info};

use toko_api::models::product::ProductPayload;
use toko_api::services::CatalogService;

use super::{CliError, app_state};

/// Outcome of a seeding run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub created: usize,
    pub failed: usize,
}

/// Seed products from a YAML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, the database is
/// unreachable, or any entry failed to seed.
pub async fn products(file_path: &str) -> Result<(), CliError> {
    let path = Path::new(file_path);
    info!(path = %file_path, "Loading products from file");

    // Read and validate YAML before connecting to database
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CliError::Read {
            path: file_path.to_owned(),
            source,
        })?;
    let payloads = parse_products(&content)?;
    info!(products = payloads.len(), "Parsed file");

    let state = app_state().await?;
    let total = payloads.len();
    let report = seed_products(state.catalog(), payloads).await;

    info!("Seeding complete!");
    info!("  Products created: {}", report.created);

    if report.failed > 0 {
        error!("  Failed: {}", report.failed);
        return Err(CliError::SeedFailures(report.failed, total));
    }

    Ok(())
}

/// Parse a YAML list of product payloads.
fn parse_products(content: &str) -> Result<Vec<ProductPayload>, CliError> {
    Ok(serde_yaml::from_str(content)?)
}

/// Create each payload, counting successes and failures.
async fn seed_products(catalog: &CatalogService, payloads: Vec<ProductPayload>) -> SeedReport {
    let mut report = SeedReport::default();

    for payload in payloads {
        let name = payload.name.clone();
        match catalog.create(payload).await {
            Ok(product) => {
                info!(product_id = %product.id, name = %product.name, "Seeded product");
                report.created += 1;
            }
            Err(e) => {
                error!(name = %name, "Failed to seed product: {e}");
                report.failed += 1;
            }
        }
    }

    report
}
