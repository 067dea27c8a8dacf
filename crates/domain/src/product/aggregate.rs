use chrono::{DateTime, Utc};
use common::{AggregateId, Version};
use document_store::Document;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::aggregate::{Aggregate, FieldRule, image_url, non_empty, non_zero};
use crate::event::Change;

/// Publication status of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ProductStatus {
    Publish,
    #[default]
    Unpublish,
}

impl std::fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProductStatus::Publish => write!(f, "Publish"),
            ProductStatus::Unpublish => write!(f, "Unpublish"),
        }
    }
}

/// A sellable catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: AggregateId,
    pub version: Version,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub image: String,

    /// Brand name; must match an existing brand when set.
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub category: String,
    pub price: i64,
    pub status: ProductStatus,
    pub seller: String,
    pub created_at: DateTime<Utc>,
}

/// Product event payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductChange {
    DraftCreated {
        seller: String,
        status: ProductStatus,
    },
    Name(String),
    Description(String),
    Slug(String),
    Image(String),
    Brand(String),
    Category(String),
    Price(i64),
    Status(ProductStatus),
    Deleted,
}

impl Change for ProductChange {
    fn event_type(&self) -> &'static str {
        match self {
            ProductChange::DraftCreated { .. } => "PRODUCT_DRAFT_CREATED",
            ProductChange::Name(_) => "PRODUCT_NAME_UPDATED",
            ProductChange::Description(_) => "PRODUCT_DESCRIPTION_UPDATED",
            ProductChange::Slug(_) => "PRODUCT_SLUG_UPDATED",
            ProductChange::Image(_) => "PRODUCT_IMAGE_UPDATED",
            ProductChange::Brand(_) => "PRODUCT_BRAND_UPDATED",
            ProductChange::Category(_) => "PRODUCT_CATEGORY_UPDATED",
            ProductChange::Price(_) => "PRODUCT_PRICE_UPDATED",
            ProductChange::Status(ProductStatus::Publish) => "PRODUCT_PUBLISHED",
            ProductChange::Status(_) => "PRODUCT_UNPUBLISHED",
            ProductChange::Deleted => "PRODUCT_DELETED",
        }
    }
}

/// Request to create a product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CreateProduct {
    #[validate(
        required(message = "Name is required"),
        length(min = 1, message = "Name is required")
    )]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[validate(custom(function = "image_url"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[validate(
        required(message = "Price is required"),
        range(min = 1, message = "Provide Valid Price")
    )]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<i64>,
    #[validate(
        required(message = "Seller is required"),
        length(min = 1, message = "Seller is required")
    )]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seller: Option<String>,
}

/// Partial update of a product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct UpdateProduct {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[validate(custom(function = "image_url"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[validate(range(min = 0, message = "Provide Valid Price"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ProductStatus>,
}

impl UpdateProduct {
    /// An update that only changes the status.
    pub fn with_status(status: ProductStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }
}

static FIELDS: &[FieldRule<Product>] = &[
    FieldRule {
        field: "name",
        requested: |r| non_empty(&r.name).map(ProductChange::Name),
        current: |p| ProductChange::Name(p.name.clone()),
    },
    FieldRule {
        field: "description",
        requested: |r| non_empty(&r.description).map(ProductChange::Description),
        current: |p| ProductChange::Description(p.description.clone()),
    },
    FieldRule {
        field: "slug",
        requested: |r| non_empty(&r.slug).map(ProductChange::Slug),
        current: |p| ProductChange::Slug(p.slug.clone()),
    },
    FieldRule {
        field: "image",
        requested: |r| non_empty(&r.image).map(ProductChange::Image),
        current: |p| ProductChange::Image(p.image.clone()),
    },
    FieldRule {
        field: "brand",
        requested: |r| non_empty(&r.brand).map(ProductChange::Brand),
        current: |p| ProductChange::Brand(p.brand.clone()),
    },
    FieldRule {
        field: "category",
        requested: |r| non_empty(&r.category).map(ProductChange::Category),
        current: |p| ProductChange::Category(p.category.clone()),
    },
    FieldRule {
        field: "price",
        requested: |r| non_zero(r.price).map(ProductChange::Price),
        current: |p| ProductChange::Price(p.price),
    },
    FieldRule {
        field: "status",
        requested: |r| r.status.map(ProductChange::Status),
        current: |p| ProductChange::Status(p.status),
    },
];

impl Document for Product {
    fn collection() -> &'static str {
        "products"
    }

    fn id(&self) -> AggregateId {
        self.id
    }

    fn version(&self) -> Version {
        self.version
    }
}

impl Aggregate for Product {
    type Change = ProductChange;
    type Create = CreateProduct;
    type Update = UpdateProduct;

    fn aggregate_type() -> &'static str {
        "Product"
    }

    fn fields() -> &'static [FieldRule<Self>] {
        FIELDS
    }

    fn draft(id: AggregateId, request: &CreateProduct, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            version: Version::first(),
            name: String::new(),
            description: String::new(),
            slug: String::new(),
            image: String::new(),
            brand: String::new(),
            category: String::new(),
            price: 0,
            status: ProductStatus::Unpublish,
            seller: request.seller.clone().unwrap_or_default(),
            created_at,
        }
    }

    fn draft_change(&self) -> ProductChange {
        ProductChange::DraftCreated {
            seller: self.seller.clone(),
            status: self.status,
        }
    }

    fn deleted_change() -> ProductChange {
        ProductChange::Deleted
    }

    fn creation_fields(request: &CreateProduct) -> UpdateProduct {
        UpdateProduct {
            name: request.name.clone(),
            description: request.description.clone(),
            slug: request.slug.clone(),
            image: request.image.clone(),
            brand: request.brand.clone(),
            category: request.category.clone(),
            price: request.price,
            status: None,
        }
    }

    fn apply(&mut self, change: &ProductChange) {
        match change {
            ProductChange::DraftCreated { seller, status } => {
                self.seller = seller.clone();
                self.status = *status;
            }
            ProductChange::Name(name) => self.name = name.clone(),
            ProductChange::Description(description) => self.description = description.clone(),
            ProductChange::Slug(slug) => self.slug = slug.clone(),
            ProductChange::Image(image) => self.image = image.clone(),
            ProductChange::Brand(brand) => self.brand = brand.clone(),
            ProductChange::Category(category) => self.category = category.clone(),
            ProductChange::Price(price) => self.price = *price,
            ProductChange::Status(status) => self.status = *status,
            ProductChange::Deleted => {}
        }
    }

    fn set_version(&mut self, version: Version) {
        self.version = version;
    }
}
