use tracing::{debug, instrument};

use crate::actor_framework::{Query, ResourceClient};
use crate::domain::{Page, PageLimits, PageRequest, Product, ProductCreate, ProductPatch, ReservedStock};
use crate::product_actor::{ProductAction, ProductActionResult, ProductError};

/// Client for interacting with the Product actor.
#[derive(Clone)]
pub struct ProductClient {
    inner: ResourceClient<Product>,
}

impl_basic_client!(ProductClient, Product, ProductError, product);

fn unexpected(result: ProductActionResult) -> ProductError {
    ProductError::ActorCommunicationError(format!("Unexpected result: {:?}", result))
}

impl ProductClient {
    #[instrument(skip(self))]
    pub async fn create_product(&self, params: ProductCreate) -> Result<Product, ProductError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(ProductError::from)
    }

    #[instrument(skip(self))]
    pub async fn update_product(&self, id: String, patch: ProductPatch) -> Result<Product, ProductError> {
        debug!("Sending request");
        self.inner.update(id, patch).await.map_err(ProductError::from)
    }

    /// A product as customers see it: soft-deleted products are not found.
    #[instrument(skip(self))]
    pub async fn find_visible(&self, id: String) -> Result<Product, ProductError> {
        match self.get_product(id.clone()).await? {
            Some(product) if product.is_visible() => Ok(product),
            _ => Err(ProductError::NotFound(id)),
        }
    }

    /// Newest-first page of products whose name contains the search text.
    #[instrument(skip(self))]
    pub async fn list_page(
        &self,
        request: &PageRequest,
        include_deleted: bool,
        limits: PageLimits,
    ) -> Result<Page<Product>, ProductError> {
        let needle = request.search().to_string();
        let query = Query::new(move |p: &Product| (include_deleted || p.is_visible()) && p.name_matches(&needle));
        let mut products = self.list_products(query).await?;
        products.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(Page::paginate(products, request, limits))
    }

    #[instrument(skip(self))]
    pub async fn soft_delete(&self, id: String) -> Result<Product, ProductError> {
        debug!("Sending request");
        match self.inner.perform_action(id, ProductAction::SoftDelete).await? {
            ProductActionResult::SoftDelete(product) => Ok(product),
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self))]
    #[allow(dead_code)]
    pub async fn check_stock(&self, id: String) -> Result<u32, ProductError> {
        debug!("Sending request");
        match self.inner.perform_action(id, ProductAction::CheckStock).await? {
            ProductActionResult::CheckStock(level) => Ok(level),
            other => Err(unexpected(other)),
        }
    }

    /// Atomically takes `quantity` units and returns the name and price at that instant.
    #[instrument(skip(self))]
    pub async fn reserve_stock(&self, id: String, quantity: u32) -> Result<ReservedStock, ProductError> {
        debug!("Sending request");
        match self.inner.perform_action(id, ProductAction::ReserveStock(quantity)).await? {
            ProductActionResult::ReserveStock(reserved) => Ok(reserved),
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self))]
    pub async fn release_stock(&self, id: String, quantity: u32) -> Result<u32, ProductError> {
        debug!("Sending request");
        match self.inner.perform_action(id, ProductAction::ReleaseStock(quantity)).await? {
            ProductActionResult::ReleaseStock(level) => Ok(level),
            other => Err(unexpected(other)),
        }
    }
}
