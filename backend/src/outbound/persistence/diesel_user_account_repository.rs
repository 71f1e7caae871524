//! PostgreSQL-backed `UserAccountRepository`.
//!
//! Activation is a single conditional `UPDATE ... WHERE is_paid = false
//! RETURNING *`, so two concurrent confirmations for the same user credit the
//! welcome bonus once. When the update touches no row the account is re-read
//! to tell a lost race apart from a deleted user.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_types::{Nullable, Numeric};
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::ports::{
    ActivationCredit, ActivationWrite, UserAccountRepository, UserAccountRepositoryError,
};
use crate::domain::{UserAccount, UserId};

use super::diesel_error_mapping::{DieselFailure, classify_diesel_error};
use super::models::UserRow;
use super::pool::{DbPool, PoolError};
use super::schema::users;

diesel::define_sql_function! {
    /// `coalesce` for the nullable wallet columns.
    fn coalesce(value: Nullable<Numeric>, fallback: Numeric) -> Numeric;
}

/// Diesel implementation of the user account port.
#[derive(Clone)]
pub struct DieselUserAccountRepository {
    pool: DbPool,
}

impl DieselUserAccountRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserAccountRepositoryError {
    UserAccountRepositoryError::connection(error.into_message())
}

fn map_diesel_error(error: &diesel::result::Error, operation: &str) -> UserAccountRepositoryError {
    match classify_diesel_error(error, operation) {
        DieselFailure::Connection(message) => UserAccountRepositoryError::connection(message),
        DieselFailure::UniqueViolation { .. } => {
            UserAccountRepositoryError::query("unexpected unique violation")
        }
        DieselFailure::Query(message) => UserAccountRepositoryError::query(message),
    }
}

async fn load_row(
    conn: &mut AsyncPgConnection,
    id: Uuid,
) -> Result<Option<UserRow>, UserAccountRepositoryError> {
    users::table
        .filter(users::id.eq(id))
        .select(UserRow::as_select())
        .first(conn)
        .await
        .optional()
        .map_err(|err| map_diesel_error(&err, "load user"))
}

#[async_trait]
impl UserAccountRepository for DieselUserAccountRepository {
    async fn find_by_id(
        &self,
        id: &UserId,
    ) -> Result<Option<UserAccount>, UserAccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = load_row(&mut conn, *id.as_uuid()).await?;
        Ok(row.map(UserAccount::from))
    }

    async fn activate(
        &self,
        credit: &ActivationCredit,
    ) -> Result<ActivationWrite, UserAccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let id = *credit.user_id.as_uuid();

        let updated: Option<UserRow> = diesel::update(
            users::table
                .filter(users::id.eq(id))
                .filter(users::is_paid.eq(false)),
        )
        .set((
            users::is_paid.eq(true),
            users::balance
                .eq((coalesce(users::balance, Decimal::ZERO) + credit.balance_delta).nullable()),
            users::total_earned.eq((coalesce(users::total_earned, Decimal::ZERO)
                + credit.total_earned_delta)
                .nullable()),
            users::updated_at.eq(diesel::dsl::now),
        ))
        .returning(UserRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(|err| map_diesel_error(&err, "activate user"))?;

        if let Some(row) = updated {
            return Ok(ActivationWrite::Applied(row.into()));
        }

        match load_row(&mut conn, id).await? {
            Some(row) => Ok(ActivationWrite::AlreadyActivated(row.into())),
            None => Err(UserAccountRepositoryError::missing(credit.user_id.to_string())),
        }
    }
}
