use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::sale_records;

/// A product/sale record as it appears in the seed feed and in API responses.
///
/// `sold` defaults to `false` when the feed omits it. `dateOfSale` accepts any
/// RFC 3339 offset and is normalized to UTC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleRecord {
    pub id: i64,
    pub title: String,
    pub price: f64,
    pub description: String,
    pub category: String,
    pub image: String,
    #[serde(default)]
    pub sold: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_sale: Option<DateTime<Utc>>,
}

impl From<sale_records::Model> for SaleRecord {
    fn from(model: sale_records::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            price: model.price,
            description: model.description,
            category: model.category,
            image: model.image,
            sold: model.sold,
            date_of_sale: model.date_of_sale,
        }
    }
}
