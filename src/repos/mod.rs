/*
 * Responsibility
 * - Storage capabilities the gateway depends on (products, users, API keys)
 * - Each capability is a trait with an in-memory (demo) and a Postgres backing
 */
pub mod api_key_repo;
pub mod error;
pub mod product_repo;
pub mod user_repo;
