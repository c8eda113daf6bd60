use diesel::prelude::*;

use ax_core::otp::{OtpChallenge, OtpCode};

use crate::db::schema::t_otp_challenge;

#[derive(Debug, Clone, Queryable, Insertable, AsChangeset)]
#[diesel(table_name = t_otp_challenge)]
pub struct OtpChallengeRow {
    pub email: String,
    pub otp: String,
    pub expires_at: i64,
    pub created_at: i64,
}

impl From<&OtpChallenge> for OtpChallengeRow {
    fn from(challenge: &OtpChallenge) -> Self {
        Self {
            email: challenge.email.clone(),
            otp: challenge.code.as_str().to_owned(),
            expires_at: challenge.expires_at_ms,
            created_at: challenge.created_at_ms,
        }
    }
}

impl From<OtpChallengeRow> for OtpChallenge {
    fn from(row: OtpChallengeRow) -> Self {
        Self {
            email: row.email,
            code: OtpCode::from_stored(row.otp),
            expires_at_ms: row.expires_at,
            created_at_ms: row.created_at,
        }
    }
}
