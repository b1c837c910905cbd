/*
 * Responsibility
 * - Handler-side extractors
 *   - AuthPrincipal: the Principal the scheme guard attached
 *   - PublicProductId: public product id in the path → internal id
 */
pub mod principal;
pub mod public_id;

pub use principal::AuthPrincipal;
pub use public_id::PublicProductId;
