pub mod client;
pub mod google;

#[cfg(test)]
pub mod fake;

pub use client::{IdentityProvider, ProviderError, ProviderProfile, ProviderTokens};
pub use google::{GoogleConfig, GoogleProvider};
