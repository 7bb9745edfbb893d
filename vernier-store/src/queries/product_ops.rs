//! Insert, update, get, list for products.

use rusqlite::{params, Connection, OptionalExtension};

use vernier_core::errors::StoreError;
use vernier_core::{Confidence, Product};

use crate::to_store_err;

use super::instant_at;

const PRODUCT_COLUMNS: &str = "sku, name, likes, views, created_at, created_by, \
     last_modified, last_modified_by, provisional_editor, confidence";

/// Insert a product, or replace every field if the SKU already exists.
pub fn upsert_product(conn: &Connection, product: &Product) -> Result<(), StoreError> {
    conn.execute(
        "INSERT INTO products (
            sku, name, likes, views, created_at, created_by,
            last_modified, last_modified_by, provisional_editor, confidence
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
        ON CONFLICT(sku) DO UPDATE SET
            name = excluded.name,
            likes = excluded.likes,
            views = excluded.views,
            created_at = excluded.created_at,
            created_by = excluded.created_by,
            last_modified = excluded.last_modified,
            last_modified_by = excluded.last_modified_by,
            provisional_editor = excluded.provisional_editor,
            confidence = excluded.confidence",
        params![
            product.sku,
            product.name,
            product.likes as i64,
            product.views as i64,
            product.created_at.to_rfc3339(),
            product.created_by,
            product.last_modified.to_rfc3339(),
            product.last_modified_by,
            product.provisional_editor,
            product.confidence.value(),
        ],
    )
    .map_err(|e| to_store_err(e.to_string()))?;
    Ok(())
}

/// Get a single product by SKU. A present row that fails to normalize is
/// a malformed-field error; absence is `None`.
pub fn get_product(conn: &Connection, sku: &str) -> Result<Option<Product>, StoreError> {
    let mut stmt = conn
        .prepare(&format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE sku = ?1"))
        .map_err(|e| to_store_err(e.to_string()))?;

    let result = stmt
        .query_row(params![sku], |row| Ok(row_to_product(row)))
        .optional()
        .map_err(|e| to_store_err(e.to_string()))?;

    match result {
        Some(Ok(product)) => Ok(Some(product)),
        Some(Err(e)) => Err(e),
        None => Ok(None),
    }
}

/// List every product ordered by SKU. Rows that cannot be normalized are
/// skipped with a warning so one bad record never aborts a whole pass.
pub fn list_products(conn: &Connection) -> Result<Vec<Product>, StoreError> {
    let mut stmt = conn
        .prepare(&format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY sku"))
        .map_err(|e| to_store_err(e.to_string()))?;

    let mut rows = stmt
        .query([])
        .map_err(|e| to_store_err(e.to_string()))?;

    let mut products = Vec::new();
    while let Some(row) = rows.next().map_err(|e| to_store_err(e.to_string()))? {
        match row_to_product(row) {
            Ok(product) => products.push(product),
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable product row");
            }
        }
    }
    Ok(products)
}

/// Write only the confidence column. Concurrent edits to any other field
/// survive a scoring pass untouched.
pub fn set_confidence(
    conn: &Connection,
    sku: &str,
    confidence: Confidence,
) -> Result<(), StoreError> {
    conn.execute(
        "UPDATE products SET confidence = ?2 WHERE sku = ?1",
        params![sku, confidence.value()],
    )
    .map_err(|e| to_store_err(e.to_string()))?;
    Ok(())
}

/// Parse a row from the products table into a Product.
pub(crate) fn row_to_product(row: &rusqlite::Row<'_>) -> Result<Product, StoreError> {
    let sku: String = row.get(0).map_err(|e| to_store_err(e.to_string()))?;

    Ok(Product {
        name: row.get(1).map_err(|e| to_store_err(e.to_string()))?,
        likes: row
            .get::<_, i64>(2)
            .map_err(|e| to_store_err(e.to_string()))?
            .max(0) as u64,
        views: row
            .get::<_, i64>(3)
            .map_err(|e| to_store_err(e.to_string()))?
            .max(0) as u64,
        created_at: instant_at(row, 4, &sku, "created_at")?,
        created_by: row.get(5).map_err(|e| to_store_err(e.to_string()))?,
        last_modified: instant_at(row, 6, &sku, "last_modified")?,
        last_modified_by: row.get(7).map_err(|e| to_store_err(e.to_string()))?,
        provisional_editor: row.get(8).map_err(|e| to_store_err(e.to_string()))?,
        confidence: Confidence::new(
            row.get::<_, i64>(9)
                .map_err(|e| to_store_err(e.to_string()))?,
        ),
        sku,
    })
}
