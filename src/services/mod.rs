/*
 * Responsibility
 * - Domain services: the auth gateway, identity providers, id codec, product CRUD
 */
pub mod auth;
pub mod id_codec;
pub mod identity;
pub mod products;
