/*
 * Resource-specific public id types. Decode logic lives in core.
 */
use super::core::PublicId;

// products
pub enum ProductTag {}
pub type PublicProductId = PublicId<ProductTag>;
