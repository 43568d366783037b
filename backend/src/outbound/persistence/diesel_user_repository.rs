//! PostgreSQL-backed [`UserRepository`] built on Diesel.
//!
//! Mutations run inside one transaction per call. Reconciliation applies the
//! relation writes, then the email uniqueness check, then the scalar update;
//! the first failure rolls the whole call back.

use async_trait::async_trait;
use diesel::dsl::{exists, select};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use tracing::debug;

use crate::domain::ports::{UserPersistenceError, UserReconciliation, UserRepository};
use crate::domain::reconciler::RelationPlan;
use crate::domain::{RelationKind, User, UserId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error, map_write_error};
use super::models::{NewFollowerRow, NewUserRepoRow, UserChangeset, UserRow};
use super::pool::DbPool;
use super::schema::{followers, user_repos, users};

/// Diesel implementation of the user store.
#[derive(Clone, Debug)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Build a repository over the shared pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Failure inside a write transaction.
#[derive(Debug)]
enum WriteError {
    Diesel(diesel::result::Error),
    EmailTaken,
    Missing,
}

impl From<diesel::result::Error> for WriteError {
    fn from(value: diesel::result::Error) -> Self {
        Self::Diesel(value)
    }
}

impl WriteError {
    fn into_persistence(self, user: &User) -> UserPersistenceError {
        match self {
            Self::Diesel(error) => map_write_error(error, user.email()),
            Self::EmailTaken => UserPersistenceError::email_conflict(user.email()),
            Self::Missing => UserPersistenceError::not_found(user.id().get()),
        }
    }
}

fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    let id = UserId::new(row.id)
        .map_err(|err| UserPersistenceError::query(format!("stored user id {}: {err}", row.id)))?;
    Ok(User::new(id, row.user_name, row.user_email)
        .with_names(row.first_name, row.last_name)
        .with_time_zone_id(row.time_zone_id))
}

async fn email_taken_by_other(
    conn: &mut AsyncPgConnection,
    user: &User,
) -> Result<bool, diesel::result::Error> {
    select(exists(
        users::table
            .filter(users::user_email.eq(user.email()))
            .filter(users::id.ne(user.id().get())),
    ))
    .get_result(conn)
    .await
}

async fn write_scalars(conn: &mut AsyncPgConnection, user: &User) -> Result<(), WriteError> {
    if email_taken_by_other(conn, user).await? {
        return Err(WriteError::EmailTaken);
    }

    let changes = UserChangeset {
        user_name: user.username(),
        user_email: user.email(),
        first_name: user.first_name(),
        last_name: user.last_name(),
        time_zone_id: user.time_zone_id(),
    };
    let updated = diesel::update(users::table.find(user.id().get()))
        .set(&changes)
        .execute(conn)
        .await?;
    if updated == 0 {
        return Err(WriteError::Missing);
    }
    Ok(())
}

async fn clear_relation(
    conn: &mut AsyncPgConnection,
    user_id: i32,
    kind: RelationKind,
) -> Result<usize, diesel::result::Error> {
    match kind {
        RelationKind::Followers => {
            diesel::delete(followers::table.filter(followers::user_id.eq(user_id)))
                .execute(conn)
                .await
        }
        RelationKind::Repositories => {
            diesel::delete(user_repos::table.filter(user_repos::user_id.eq(user_id)))
                .execute(conn)
                .await
        }
    }
}

async fn insert_relation(
    conn: &mut AsyncPgConnection,
    user_id: i32,
    kind: RelationKind,
    values: &[String],
) -> Result<usize, diesel::result::Error> {
    if values.is_empty() {
        return Ok(0);
    }
    match kind {
        RelationKind::Followers => {
            let rows: Vec<NewFollowerRow<'_>> = values
                .iter()
                .map(|value| NewFollowerRow {
                    user_id,
                    follower_user_name: Some(value.as_str()),
                })
                .collect();
            diesel::insert_into(followers::table)
                .values(&rows)
                .execute(conn)
                .await
        }
        RelationKind::Repositories => {
            let rows: Vec<NewUserRepoRow<'_>> = values
                .iter()
                .map(|value| NewUserRepoRow {
                    user_id,
                    repo_name: Some(value.as_str()),
                })
                .collect();
            diesel::insert_into(user_repos::table)
                .values(&rows)
                .execute(conn)
                .await
        }
    }
}

async fn apply_plan(
    conn: &mut AsyncPgConnection,
    user_id: i32,
    kind: RelationKind,
    plan: &RelationPlan,
) -> Result<(), diesel::result::Error> {
    match plan {
        RelationPlan::Retain => {}
        RelationPlan::Clear => {
            let removed = clear_relation(conn, user_id, kind).await?;
            debug!(user_id, relation = %kind, removed, "relation cleared");
        }
        RelationPlan::Insert(values) => {
            let inserted = insert_relation(conn, user_id, kind, values).await?;
            debug!(user_id, relation = %kind, inserted, "relation rows inserted");
        }
    }
    Ok(())
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .find(id.get())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_user).transpose()
    }

    async fn list_relation(
        &self,
        id: UserId,
        kind: RelationKind,
    ) -> Result<Vec<Option<String>>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let values = match kind {
            RelationKind::Followers => {
                followers::table
                    .filter(followers::user_id.eq(id.get()))
                    .order(followers::id.asc())
                    .select(followers::follower_user_name)
                    .load::<Option<String>>(&mut conn)
                    .await
            }
            RelationKind::Repositories => {
                user_repos::table
                    .filter(user_repos::user_id.eq(id.get()))
                    .order(user_repos::id.asc())
                    .select(user_repos::repo_name)
                    .load::<Option<String>>(&mut conn)
                    .await
            }
        };
        values.map_err(map_diesel_error)
    }

    async fn update_profile(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction(|conn| {
            async move { write_scalars(conn, user).await }.scope_boxed()
        })
        .await
        .map_err(|err: WriteError| err.into_persistence(user))
    }

    async fn apply_reconciliation(
        &self,
        reconciliation: &UserReconciliation,
    ) -> Result<(), UserPersistenceError> {
        let user = &reconciliation.user;
        let user_id = user.id().get();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction(|conn| {
            async move {
                for kind in RelationKind::ALL {
                    apply_plan(conn, user_id, kind, reconciliation.plan(kind)).await?;
                }
                write_scalars(conn, user).await
            }
            .scope_boxed()
        })
        .await
        .map_err(|err: WriteError| err.into_persistence(user))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    fn alice() -> User {
        User::new(UserId::new(1).expect("valid id"), "alice", "a@x.com")
    }

    #[rstest]
    fn rows_map_to_users() {
        let user = row_to_user(UserRow {
            id: 3,
            user_name: "carol".into(),
            user_email: "c@x.com".into(),
            first_name: "Carol".into(),
            last_name: "Danvers".into(),
            time_zone_id: "America/New_York".into(),
        })
        .expect("valid row");

        assert_eq!(user.id().get(), 3);
        assert_eq!(user.username(), "carol");
        assert_eq!(user.time_zone_id(), "America/New_York");
        assert!(user.followers().is_empty());
    }

    #[rstest]
    fn rows_with_non_positive_ids_are_rejected() {
        let result = row_to_user(UserRow {
            id: 0,
            user_name: String::new(),
            user_email: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            time_zone_id: String::new(),
        });
        assert!(matches!(result, Err(UserPersistenceError::Query { .. })));
    }

    #[rstest]
    #[case(WriteError::EmailTaken, UserPersistenceError::email_conflict("a@x.com"))]
    #[case(WriteError::Missing, UserPersistenceError::not_found(1_i32))]
    #[case(
        WriteError::Diesel(diesel::result::Error::NotFound),
        UserPersistenceError::query("record not found")
    )]
    fn write_errors_map_to_port_errors(
        #[case] error: WriteError,
        #[case] expected: UserPersistenceError,
    ) {
        assert_eq!(error.into_persistence(&alice()), expected);
    }
}
