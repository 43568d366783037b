//! Internal Diesel row structs.
//!
//! These types never leave the persistence layer.

use diesel::prelude::*;

use super::schema::{followers, user_repos, users};

/// Row read from `users`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i32,
    pub user_name: String,
    pub user_email: String,
    pub first_name: String,
    pub last_name: String,
    pub time_zone_id: String,
}

/// Scalar columns written back to `users`.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserChangeset<'a> {
    pub user_name: &'a str,
    pub user_email: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub time_zone_id: &'a str,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = followers)]
pub(crate) struct NewFollowerRow<'a> {
    pub user_id: i32,
    pub follower_user_name: Option<&'a str>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = user_repos)]
pub(crate) struct NewUserRepoRow<'a> {
    pub user_id: i32,
    pub repo_name: Option<&'a str>,
}
