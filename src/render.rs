//! Static rendering of search results into a result container.

use crate::types::EntityId;
use crate::views::{ResultLink, ResultsPanel};
use serde::{Deserialize, Deserializer, Serialize};

/// Text of the disabled row shown when a query matches nothing.
pub const NO_RESULTS_TEXT: &str = "No Results...";

/// One product returned by the search endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductHit {
    #[serde(deserialize_with = "deserialize_product_id")]
    pub id: EntityId,
    pub product_name: String,
}

/// Product ids arrive as numbers from the catalog but may be strings.
fn deserialize_product_id<'de, D>(deserializer: D) -> Result<EntityId, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    EntityId::from_json(&value)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid product id: {}", value)))
}

/// Replace the panel's contents with one link per hit, or the placeholder.
pub fn render_results(panel: &mut ResultsPanel, hits: &[ProductHit]) {
    if hits.is_empty() {
        *panel = ResultsPanel::Placeholder;
        return;
    }

    *panel = ResultsPanel::Links(
        hits.iter()
            .map(|hit| ResultLink {
                element_id: format!("product-{}", hit.id),
                href: format!("/public/product/{}", hit.id),
                text: hit.product_name.clone(),
            })
            .collect(),
    );
}
