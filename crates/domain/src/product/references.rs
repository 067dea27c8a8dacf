use async_trait::async_trait;
use document_store::{DocumentQuery, DocumentReader};

use crate::aggregate::non_empty;
use crate::brand::Brand;
use crate::error::{DomainError, FieldErrors};
use crate::references::ReferenceValidator;

use super::{Product, UpdateProduct};

/// Checks that a product's brand names an existing brand.
#[derive(Debug, Clone)]
pub struct BrandReferences<B> {
    brands: B,
}

impl<B> BrandReferences<B> {
    pub fn new(brands: B) -> Self {
        Self { brands }
    }
}

#[async_trait]
impl<B: DocumentReader<Brand>> ReferenceValidator<Product> for BrandReferences<B> {
    async fn check_update(
        &self,
        request: &UpdateProduct,
        errors: &mut FieldErrors,
    ) -> Result<(), DomainError> {
        let Some(brand) = non_empty(&request.brand) else {
            return Ok(());
        };

        let query = DocumentQuery::new().eq("name", brand.as_str());
        if self.brands.find_one(query).await?.is_none() {
            errors.push("brand", format!("Brand {brand} Not found"));
        }
        Ok(())
    }
}
