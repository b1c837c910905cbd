/*
 * Responsibility
 * - Public surface of the middleware layer
 *   - auth: per-scheme guard for route groups
 *   - http / security_headers: cross-cutting layers applied in app.rs
 */
pub mod auth;
pub mod http;
pub mod security_headers;
