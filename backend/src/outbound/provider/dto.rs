//! Wire DTOs for the provider's public user API.
//!
//! Only the fields the service consumes are declared; everything else in
//! the provider payloads is ignored.

use serde::Deserialize;

use crate::domain::ports::ProviderAccount;

#[derive(Debug, Deserialize)]
pub(super) struct AccountDto {
    #[serde(default)]
    pub(super) login: Option<String>,
    #[serde(default)]
    pub(super) email: Option<String>,
}

impl From<AccountDto> for ProviderAccount {
    fn from(value: AccountDto) -> Self {
        Self {
            login: value.login,
            email: value.email,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct FollowerDto {
    pub(super) login: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct RepositoryDto {
    pub(super) name: String,
}
