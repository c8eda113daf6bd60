use async_trait::async_trait;
use diesel::prelude::*;

use ax_core::otp::OtpChallenge;
use ax_core::ports::{OtpChallengeRepositoryPort, OtpStoreError};

use crate::db::{models::OtpChallengeRow, pool::DbPool, schema::t_otp_challenge::dsl::*};

/// Durable OTP challenge store.
///
/// The upsert keyed by email is what enforces the single-code-per-email
/// invariant; no cross-request locking is involved.
pub struct DieselOtpChallengeRepository {
    pool: DbPool,
}

impl DieselOtpChallengeRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OtpChallengeRepositoryPort for DieselOtpChallengeRepository {
    async fn upsert(&self, challenge: &OtpChallenge) -> Result<(), OtpStoreError> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| OtpStoreError::Storage(e.to_string()))?;

        let row = OtpChallengeRow::from(challenge);

        diesel::insert_into(t_otp_challenge)
            .values(&row)
            .on_conflict(email)
            .do_update()
            .set((
                otp.eq(row.otp.clone()),
                expires_at.eq(row.expires_at),
                created_at.eq(row.created_at),
            ))
            .execute(&mut conn)
            .map_err(|e| OtpStoreError::Storage(e.to_string()))?;

        Ok(())
    }

    async fn find(
        &self,
        account_email: &str,
        code: &str,
    ) -> Result<Option<OtpChallenge>, OtpStoreError> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| OtpStoreError::Storage(e.to_string()))?;

        let row = t_otp_challenge
            .filter(email.eq(account_email))
            .filter(otp.eq(code))
            .first::<OtpChallengeRow>(&mut conn)
            .optional()
            .map_err(|e| OtpStoreError::Storage(e.to_string()))?;

        Ok(row.map(OtpChallenge::from))
    }

    async fn delete(&self, account_email: &str) -> Result<(), OtpStoreError> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| OtpStoreError::Storage(e.to_string()))?;

        diesel::delete(t_otp_challenge.filter(email.eq(account_email)))
            .execute(&mut conn)
            .map_err(|e| OtpStoreError::Storage(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ax_core::otp::OtpCode;

    use crate::db::pool::init_db_pool;

    fn repository(temp_dir: &tempfile::TempDir) -> DieselOtpChallengeRepository {
        let db_path = temp_dir.path().join("otp.sqlite");
        let pool = init_db_pool(db_path.to_str().expect("utf-8 path")).expect("test pool");
        DieselOtpChallengeRepository::new(pool)
    }

    fn challenge(code: &str, now_ms: i64) -> OtpChallenge {
        OtpChallenge::issue("a@x.com", OtpCode::from_stored(code), now_ms)
    }

    #[tokio::test]
    async fn upsert_then_find_by_exact_pair() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let repo = repository(&temp_dir);

        repo.upsert(&challenge("123456", 1_000)).await.unwrap();

        let found = repo.find("a@x.com", "123456").await.unwrap();
        assert_eq!(found, Some(challenge("123456", 1_000)));

        assert_eq!(repo.find("a@x.com", "000000").await.unwrap(), None);
        assert_eq!(repo.find("b@x.com", "123456").await.unwrap(), None);
    }

    #[tokio::test]
    async fn upsert_overwrites_the_outstanding_challenge() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let repo = repository(&temp_dir);

        repo.upsert(&challenge("123456", 1_000)).await.unwrap();
        repo.upsert(&challenge("654321", 2_000)).await.unwrap();

        assert_eq!(repo.find("a@x.com", "123456").await.unwrap(), None);
        assert_eq!(
            repo.find("a@x.com", "654321").await.unwrap(),
            Some(challenge("654321", 2_000))
        );
    }

    #[tokio::test]
    async fn delete_removes_the_challenge() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let repo = repository(&temp_dir);

        repo.upsert(&challenge("123456", 1_000)).await.unwrap();
        repo.delete("a@x.com").await.unwrap();

        assert_eq!(repo.find("a@x.com", "123456").await.unwrap(), None);
    }

    #[tokio::test]
    async fn challenges_survive_a_pool_restart() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        {
            let repo = repository(&temp_dir);
            repo.upsert(&challenge("123456", 1_000)).await.unwrap();
        }

        let reopened = {
            let db_path = temp_dir.path().join("otp.sqlite");
            let pool = init_db_pool(db_path.to_str().unwrap()).unwrap();
            DieselOtpChallengeRepository::new(pool)
        };
        assert_eq!(
            reopened.find("a@x.com", "123456").await.unwrap(),
            Some(challenge("123456", 1_000))
        );
    }
}
