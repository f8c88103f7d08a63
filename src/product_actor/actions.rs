use crate::domain::ReservedStock;

/// Custom actions for Product entities.
///
/// These actions represent domain-specific operations that can be performed
/// on a product beyond standard CRUD operations. Each runs to completion inside
/// the product actor, so a check and the write it guards can never interleave
/// with another request.
#[derive(Debug, Clone)]
pub enum ProductAction {
    /// Checks the current stock level without modifying it.
    CheckStock,
    /// Decrements stock by the given quantity if at least that much is available.
    ///
    /// # Errors
    /// Fails if the product is soft-deleted or the amount exceeds available stock.
    ReserveStock(u32),
    /// Gives back stock taken by an earlier reservation.
    ReleaseStock(u32),
    /// Hides the product from customer-facing reads.
    SoftDelete,
}

/// Results from ProductActions - variants match 1:1 with ProductAction
#[derive(Debug, Clone)]
pub enum ProductActionResult {
    CheckStock(u32),
    ReserveStock(ReservedStock),
    ReleaseStock(u32),
    SoftDelete(crate::domain::Product),
}
