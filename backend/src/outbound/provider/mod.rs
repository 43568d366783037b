//! Identity provider outbound adapters.

mod dto;
mod http_provider;

pub use http_provider::{
    HttpIdentityProvider, HttpIdentityProviderBuildError, HttpIdentityProviderConfig,
};
