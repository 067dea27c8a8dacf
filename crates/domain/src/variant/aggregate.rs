use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use common::{AggregateId, Version};
use document_store::Document;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::aggregate::{Aggregate, FieldRule, image_url, non_empty, non_zero};
use crate::event::Change;

/// Attribute map of a variant, e.g. `{"color": "red", "size": "m"}`.
pub type Attributes = BTreeMap<String, String>;

/// Maximum number of attributes a variant may carry.
pub const MAX_ATTRIBUTES: usize = 3;

/// Lower-cases every key and value.
pub fn normalize_attributes(attributes: &Attributes) -> Attributes {
    attributes
        .iter()
        .map(|(k, v)| (k.to_lowercase(), v.to_lowercase()))
        .collect()
}

/// A purchasable variant of a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    pub id: AggregateId,
    pub version: Version,

    /// The product this variant belongs to.
    pub product: AggregateId,
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub price: i64,
    #[serde(default)]
    pub image: String,
    pub attributes: Attributes,
    pub created_at: DateTime<Utc>,
}

/// Variant event payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariantChange {
    DraftCreated {
        product: AggregateId,
        attributes: Attributes,
    },
    Sku(String),
    Quantity(i64),
    Price(i64),
    Image(String),
    Deleted,
}

impl Change for VariantChange {
    fn event_type(&self) -> &'static str {
        match self {
            VariantChange::DraftCreated { .. } => "PRODUCT_VARIANT_DRAFT_CREATED",
            VariantChange::Sku(_) => "PRODUCT_VARIANT_SKU_UPDATED",
            VariantChange::Quantity(_) => "PRODUCT_VARIANT_QUANTITY_UPDATED",
            VariantChange::Price(_) => "PRODUCT_VARIANT_PRICE_UPDATED",
            VariantChange::Image(_) => "PRODUCT_VARIANT_IMAGE_UPDATED",
            VariantChange::Deleted => "PRODUCT_VARIANT_DELETED",
        }
    }
}

/// Request to create a variant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CreateVariant {
    #[validate(required(message = "Product is required"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<AggregateId>,
    #[validate(required(message = "Attributes is required"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Attributes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[validate(range(min = 0, message = "Provide Valid Quantity"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    #[validate(range(min = 0, message = "Provide Valid Price"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<i64>,
    #[validate(custom(function = "image_url"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Partial update of a variant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct UpdateVariant {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[validate(range(min = 0, message = "Provide Valid Quantity"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    #[validate(range(min = 0, message = "Provide Valid Price"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<i64>,
    #[validate(custom(function = "image_url"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

static FIELDS: &[FieldRule<Variant>] = &[
    FieldRule {
        field: "sku",
        requested: |r| non_empty(&r.sku).map(VariantChange::Sku),
        current: |v| VariantChange::Sku(v.sku.clone()),
    },
    FieldRule {
        field: "quantity",
        requested: |r| non_zero(r.quantity).map(VariantChange::Quantity),
        current: |v| VariantChange::Quantity(v.quantity),
    },
    FieldRule {
        field: "price",
        requested: |r| non_zero(r.price).map(VariantChange::Price),
        current: |v| VariantChange::Price(v.price),
    },
    FieldRule {
        field: "image",
        requested: |r| non_empty(&r.image).map(VariantChange::Image),
        current: |v| VariantChange::Image(v.image.clone()),
    },
];

impl Document for Variant {
    fn collection() -> &'static str {
        "variants"
    }

    fn id(&self) -> AggregateId {
        self.id
    }

    fn version(&self) -> Version {
        self.version
    }
}

impl Aggregate for Variant {
    type Change = VariantChange;
    type Create = CreateVariant;
    type Update = UpdateVariant;

    fn aggregate_type() -> &'static str {
        "Variant"
    }

    fn fields() -> &'static [FieldRule<Self>] {
        FIELDS
    }

    fn draft(id: AggregateId, request: &CreateVariant, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            version: Version::first(),
            product: request.product.unwrap_or_default(),
            sku: String::new(),
            quantity: 0,
            price: 0,
            image: String::new(),
            attributes: request
                .attributes
                .as_ref()
                .map(normalize_attributes)
                .unwrap_or_default(),
            created_at,
        }
    }

    fn draft_change(&self) -> VariantChange {
        VariantChange::DraftCreated {
            product: self.product,
            attributes: self.attributes.clone(),
        }
    }

    fn deleted_change() -> VariantChange {
        VariantChange::Deleted
    }

    fn creation_fields(request: &CreateVariant) -> UpdateVariant {
        UpdateVariant {
            sku: request.sku.clone(),
            quantity: request.quantity,
            price: request.price,
            image: request.image.clone(),
        }
    }

    fn apply(&mut self, change: &VariantChange) {
        match change {
            VariantChange::DraftCreated {
                product,
                attributes,
            } => {
                self.product = *product;
                self.attributes = attributes.clone();
            }
            VariantChange::Sku(sku) => self.sku = sku.clone(),
            VariantChange::Quantity(quantity) => self.quantity = *quantity,
            VariantChange::Price(price) => self.price = *price,
            VariantChange::Image(image) => self.image = image.clone(),
            VariantChange::Deleted => {}
        }
    }

    fn set_version(&mut self, version: Version) {
        self.version = version;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attributes_are_lower_cased() {
        let mut attributes = Attributes::new();
        attributes.insert("Color".into(), "RED".into());
        let normalized = normalize_attributes(&attributes);
        assert_eq!(normalized.get("color").map(String::as_str), Some("red"));
    }

    #[test]
    fn draft_carries_product_and_normalized_attributes() {
        let product = AggregateId::new();
        let mut attributes = Attributes::new();
        attributes.insert("Size".into(), "M".into());
        let request = CreateVariant {
            product: Some(product),
            attributes: Some(attributes),
            ..Default::default()
        };

        let variant = Variant::draft(AggregateId::new(), &request, Utc::now());
        match variant.draft_change() {
            VariantChange::DraftCreated {
                product: p,
                attributes,
            } => {
                assert_eq!(p, product);
                assert_eq!(attributes.get("size").map(String::as_str), Some("m"));
            }
            other => panic!("unexpected change {other:?}"),
        }
    }

    #[test]
    fn create_requires_product_and_attributes() {
        let errors: crate::error::FieldErrors =
            CreateVariant::default().validate().unwrap_err().into();
        assert!(errors.contains_field("product"));
        assert!(errors.contains_field("attributes"));
    }
}
