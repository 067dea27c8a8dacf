use chrono::{DateTime, Utc};
use common::{AggregateId, Version};
use document_store::Document;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::aggregate::{Aggregate, FieldRule, non_empty};
use crate::event::Change;

/// A brand products can reference by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brand {
    pub id: AggregateId,
    pub version: Version,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub slug: String,
    pub created_at: DateTime<Utc>,
}

/// Brand event payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrandChange {
    DraftCreated,
    Name(String),
    Description(String),
    Slug(String),
    Deleted,
}

impl Change for BrandChange {
    fn event_type(&self) -> &'static str {
        match self {
            BrandChange::DraftCreated => "BRAND_DRAFT_CREATED",
            BrandChange::Name(_) => "BRAND_NAME_UPDATED",
            BrandChange::Description(_) => "BRAND_DESCRIPTION_UPDATED",
            BrandChange::Slug(_) => "BRAND_SLUG_UPDATED",
            BrandChange::Deleted => "BRAND_DELETED",
        }
    }
}

/// Request to create a brand.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CreateBrand {
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
}

/// Partial update of a brand.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct UpdateBrand {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

static FIELDS: &[FieldRule<Brand>] = &[
    FieldRule {
        field: "name",
        requested: |r| non_empty(&r.name).map(BrandChange::Name),
        current: |b| BrandChange::Name(b.name.clone()),
    },
    FieldRule {
        field: "description",
        requested: |r| non_empty(&r.description).map(BrandChange::Description),
        current: |b| BrandChange::Description(b.description.clone()),
    },
    FieldRule {
        field: "slug",
        requested: |r| non_empty(&r.slug).map(BrandChange::Slug),
        current: |b| BrandChange::Slug(b.slug.clone()),
    },
];

impl Document for Brand {
    fn collection() -> &'static str {
        "brands"
    }

    fn id(&self) -> AggregateId {
        self.id
    }

    fn version(&self) -> Version {
        self.version
    }
}

impl Aggregate for Brand {
    type Change = BrandChange;
    type Create = CreateBrand;
    type Update = UpdateBrand;

    fn aggregate_type() -> &'static str {
        "Brand"
    }

    fn fields() -> &'static [FieldRule<Self>] {
        FIELDS
    }

    fn draft(id: AggregateId, _request: &CreateBrand, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            version: Version::first(),
            name: String::new(),
            description: String::new(),
            slug: String::new(),
            created_at,
        }
    }

    fn draft_change(&self) -> BrandChange {
        BrandChange::DraftCreated
    }

    fn deleted_change() -> BrandChange {
        BrandChange::Deleted
    }

    fn creation_fields(request: &CreateBrand) -> UpdateBrand {
        UpdateBrand {
            name: request.name.clone(),
            description: request.description.clone(),
            slug: request.slug.clone(),
        }
    }

    fn apply(&mut self, change: &BrandChange) {
        match change {
            BrandChange::Name(name) => self.name = name.clone(),
            BrandChange::Description(description) => self.description = description.clone(),
            BrandChange::Slug(slug) => self.slug = slug.clone(),
            BrandChange::DraftCreated | BrandChange::Deleted => {}
        }
    }

    fn set_version(&mut self, version: Version) {
        self.version = version;
    }
}
