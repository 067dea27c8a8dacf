use async_trait::async_trait;
use document_store::{DocumentQuery, DocumentReader};

use crate::error::{DomainError, FieldErrors};
use crate::product::Product;
use crate::references::ReferenceValidator;

use super::{CreateVariant, MAX_ATTRIBUTES, Variant, normalize_attributes};

/// Checks a new variant's product and attribute set.
///
/// The product must exist, and no other variant of the same product may
/// carry the same (lower-cased) attribute set.
#[derive(Debug, Clone)]
pub struct VariantReferences<P, V> {
    products: P,
    variants: V,
}

impl<P, V> VariantReferences<P, V> {
    pub fn new(products: P, variants: V) -> Self {
        Self { products, variants }
    }
}

#[async_trait]
impl<P, V> ReferenceValidator<Variant> for VariantReferences<P, V>
where
    P: DocumentReader<Product>,
    V: DocumentReader<Variant>,
{
    async fn check_create(
        &self,
        request: &CreateVariant,
        errors: &mut FieldErrors,
    ) -> Result<(), DomainError> {
        let Some(product) = request.product else {
            return Ok(());
        };

        if self.products.find_one_by_id(product).await?.is_none() {
            errors.push("product", format!("Product with ID {product} doesn't Exist"));
        }

        let Some(attributes) = request.attributes.as_ref() else {
            return Ok(());
        };
        let attributes = normalize_attributes(attributes);

        let query = DocumentQuery::new()
            .eq_serialized("product", &product)?
            .eq_serialized("attributes", &attributes)?;
        if let Some(existing) = self.variants.find_one(query).await? {
            errors.push(
                "attributes",
                format!("Variant Attributes Duplication with ID {}", existing.id),
            );
        }

        if attributes.len() > MAX_ATTRIBUTES {
            errors.push("attributes", format!("Max Attributes is {MAX_ATTRIBUTES}"));
        }
        Ok(())
    }
}
