//! Outbound network access: playlist fetch and the social persistence
//! endpoint client

pub mod playlist;
pub mod social_api;

pub use social_api::SocialApiClient;
