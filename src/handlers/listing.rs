// handlers/listing.rs - Table controls shared by every list endpoint

use serde::Serialize;
use serde_json::Value;

use crate::config::TableConfig;
use crate::error::ApiError;
use crate::middleware::ApiResponse;
use crate::table::{Column, TableQuery};

/// Serializes `items`; when the query string carries table controls the rows
/// go through the data table and a `TablePage` is returned instead of the
/// plain array.
pub fn list_response<T: Serialize>(
    items: Vec<T>,
    columns: Vec<Column>,
    query: &TableQuery,
    config: &TableConfig,
) -> Result<ApiResponse<Value>, ApiError> {
    let rows = match serde_json::to_value(items) {
        Ok(Value::Array(rows)) => rows,
        Ok(_) => vec![],
        Err(e) => {
            tracing::error!("Failed to serialize list rows: {}", e);
            return Err(ApiError::internal_server_error("Erreur serveur"));
        }
    };

    if !query.is_active() {
        return Ok(ApiResponse::success(Value::Array(rows)));
    }

    let page = query.apply(columns, &rows, config.items_per_page, config.max_per_page);
    let value = serde_json::to_value(page).map_err(|e| {
        tracing::error!("Failed to serialize table page: {}", e);
        ApiError::internal_server_error("Erreur serveur")
    })?;
    Ok(ApiResponse::success(value))
}
