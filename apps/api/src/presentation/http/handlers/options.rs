use crate::domain::catalog::{OptionCatalog, catalog};
use axum::Json;

/// Fixed choices for every select field on the form.
pub async fn get_options() -> Json<OptionCatalog> {
    Json(catalog())
}
