use serde::{Deserialize, Serialize};

use stockroom_core::{DomainResult, Entity, ProductId, text};

/// Entity: Product.
///
/// Created once from a submission, edited in place afterwards, never deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    id: ProductId,
    name: String,
    description: Option<String>,
    image_url: Option<String>,
}

/// Command: CreateProduct (raw submitted fields).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateProduct {
    pub product_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Command: UpdateProduct. The identifier is taken from the addressed record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateProduct {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl Product {
    /// Validate a submission and build a new product.
    pub fn create(cmd: CreateProduct) -> DomainResult<Self> {
        let id = ProductId::new(&cmd.product_id)?;
        let name = text::required("name", &cmd.name)?;
        Ok(Self {
            id,
            name,
            description: text::optional(cmd.description),
            image_url: text::optional_trimmed(cmd.image_url.as_deref()),
        })
    }

    /// Rehydrate a product from storage. No validation is applied.
    pub fn restore(
        id: ProductId,
        name: String,
        description: Option<String>,
        image_url: Option<String>,
    ) -> Self {
        Self {
            id,
            name,
            description,
            image_url,
        }
    }

    /// Apply an edit. On validation failure the product is left untouched.
    pub fn update(&mut self, cmd: UpdateProduct) -> DomainResult<()> {
        let name = text::required("name", &cmd.name)?;
        self.name = name;
        self.description = text::optional(cmd.description);
        self.image_url = text::optional_trimmed(cmd.image_url.as_deref());
        Ok(())
    }

    pub fn id_typed(&self) -> &ProductId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
