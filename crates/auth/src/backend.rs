//! Concrete authentication backend
//!
//! Wraps `PgPool` + `AuthConfig` and owns all auth-specific SQL over the
//! `users`, `accounts`, `sessions` and `verifications` tables. Uses runtime
//! `sqlx::query_as` (not macros) consistent with the repository crates.

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::context::AuthContext;
use crate::error::AuthError;
use crate::password;
use crate::tokens;
use crate::types::{AuthIdentity, AuthSession, OtpPurpose};

const CREDENTIAL_PROVIDER: &str = "credential";

const IDENTITY_COLUMNS: &str =
    "id, name, email, email_verified, image, stripe_customer_id, created_at, updated_at";
const SESSION_COLUMNS: &str =
    "id, user_id, token, expires_at, ip_address, user_agent, created_at, updated_at";

/// Row type for credential account lookup (includes the password hash)
#[derive(sqlx::FromRow)]
struct AccountRow {
    password: Option<String>,
}

/// Row type for stored one-time passwords
#[derive(sqlx::FromRow)]
struct VerificationRow {
    id: Uuid,
    value: String,
    expires_at: chrono::DateTime<Utc>,
}

/// Storage key for a one-time password, scoping the code to its purpose
/// so a sign-in code can never verify an email address.
fn otp_identifier(purpose: OtpPurpose, email: &str) -> String {
    format!("email-otp:{}:{}", purpose.as_str(), email)
}

/// Concrete authentication backend.
///
/// Wraps a database pool and auth configuration. Domain states expose
/// this via `FromRef`:
/// ```ignore
/// impl FromRef<MyDomainState> for AuthBackend {
///     fn from_ref(state: &MyDomainState) -> Self {
///         state.auth.clone()
///     }
/// }
/// ```
#[derive(Clone)]
pub struct AuthBackend {
    pool: PgPool,
    config: AuthConfig,
}

impl AuthBackend {
    pub fn new(pool: PgPool, config: AuthConfig) -> Self {
        Self { pool, config }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Find user by ID
    pub async fn find_user_by_id(&self, id: Uuid) -> Result<Option<AuthIdentity>, AuthError> {
        let user: Option<AuthIdentity> = sqlx::query_as(&format!(
            "SELECT {IDENTITY_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, user_id = %id, "Failed to load user");
            AuthError::Database
        })?;

        Ok(user)
    }

    /// Find user by email (emails are stored lowercase)
    pub async fn find_user_by_email(
        &self,
        email: &str,
    ) -> Result<Option<AuthIdentity>, AuthError> {
        let user: Option<AuthIdentity> = sqlx::query_as(&format!(
            "SELECT {IDENTITY_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email.to_lowercase())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to load user by email");
            AuthError::Database
        })?;

        Ok(user)
    }

    /// Register a new user with a credential account, signing them in.
    ///
    /// User, account and first session are created in one transaction; a
    /// duplicate email surfaces as `UserExists` via the unique constraint.
    pub async fn sign_up(
        &self,
        name: &str,
        email: &str,
        raw_password: &str,
    ) -> Result<AuthContext, AuthError> {
        let email = email.to_lowercase();
        let password_hash = password::hash_password(raw_password)?;
        let user_id = Uuid::new_v4();

        let mut tx = self.pool.begin().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to begin sign-up transaction");
            AuthError::Database
        })?;

        let user: AuthIdentity = sqlx::query_as(&format!(
            r#"
            INSERT INTO users (id, name, email, email_verified, created_at, updated_at)
            VALUES ($1, $2, $3, FALSE, NOW(), NOW())
            RETURNING {IDENTITY_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(name)
        .bind(&email)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AuthError::UserExists;
                }
            }
            tracing::error!(error = %e, "Failed to create user");
            AuthError::Database
        })?;

        sqlx::query(
            r#"
            INSERT INTO accounts (id, user_id, provider_id, account_id, password, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, NOW(), NOW())
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(CREDENTIAL_PROVIDER)
        .bind(user_id.to_string())
        .bind(&password_hash)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, user_id = %user_id, "Failed to create credential account");
            AuthError::Database
        })?;

        let session = insert_session(&mut *tx, user_id, &self.config).await?;

        tx.commit().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to commit sign-up transaction");
            AuthError::Database
        })?;

        tracing::info!(user_id = %user_id, "User signed up");
        Ok(AuthContext::new(user, session))
    }

    /// Authenticate with email + password, creating a new session.
    pub async fn sign_in_with_password(
        &self,
        email: &str,
        raw_password: &str,
    ) -> Result<AuthContext, AuthError> {
        let user = self
            .find_user_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let account: Option<AccountRow> = sqlx::query_as(
            "SELECT password FROM accounts WHERE user_id = $1 AND provider_id = $2",
        )
        .bind(user.id)
        .bind(CREDENTIAL_PROVIDER)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, user_id = %user.id, "Failed to load credential account");
            AuthError::Database
        })?;

        let stored_hash = account
            .and_then(|row| row.password)
            .ok_or(AuthError::InvalidCredentials)?;

        if !password::verify_password(raw_password, &stored_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        let session = insert_session(&self.pool, user.id, &self.config).await?;
        Ok(AuthContext::new(user, session))
    }

    /// Resolve a bearer token to its session and user.
    ///
    /// Expired sessions reject and are deleted lazily on this path.
    pub async fn authenticate_session(&self, token: &str) -> Result<AuthContext, AuthError> {
        let session: Option<AuthSession> = sqlx::query_as(&format!(
            "SELECT {SESSION_COLUMNS} FROM sessions WHERE token = $1"
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to load session");
            AuthError::Database
        })?;

        let session = session.ok_or(AuthError::SessionExpired)?;

        if session.expires_at <= Utc::now() {
            // Best-effort cleanup; the reject stands either way
            if let Err(e) = sqlx::query("DELETE FROM sessions WHERE id = $1")
                .bind(session.id)
                .execute(&self.pool)
                .await
            {
                tracing::warn!(error = %e, session_id = %session.id, "Failed to delete expired session");
            }
            return Err(AuthError::SessionExpired);
        }

        let user = self
            .find_user_by_id(session.user_id)
            .await?
            .ok_or(AuthError::SessionExpired)?;

        Ok(AuthContext::new(user, session))
    }

    /// Revoke a session by its token. Idempotent.
    pub async fn sign_out(&self, token: &str) -> Result<(), AuthError> {
        sqlx::query("DELETE FROM sessions WHERE token = $1")
            .bind(token)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to delete session");
                AuthError::Database
            })?;
        Ok(())
    }

    /// Issue a one-time password for the given purpose, replacing any
    /// previous code for the same purpose + email. Returns the code so the
    /// caller can hand it to the email service; it is never logged.
    pub async fn issue_otp(
        &self,
        purpose: OtpPurpose,
        email: &str,
    ) -> Result<String, AuthError> {
        let email = email.to_lowercase();
        let otp = tokens::generate_otp(self.config.otp_length);
        let identifier = otp_identifier(purpose, &email);
        let expires_at = Utc::now() + self.config.otp_ttl;

        let mut tx = self.pool.begin().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to begin verification transaction");
            AuthError::Database
        })?;

        sqlx::query("DELETE FROM verifications WHERE identifier = $1")
            .bind(&identifier)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to clear previous verification");
                AuthError::Database
            })?;

        sqlx::query(
            r#"
            INSERT INTO verifications (id, identifier, value, expires_at, created_at, updated_at)
            VALUES ($1, $2, $3, $4, NOW(), NOW())
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&identifier)
        .bind(&otp)
        .bind(expires_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to store verification");
            AuthError::Database
        })?;

        tx.commit().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to commit verification transaction");
            AuthError::Database
        })?;

        tracing::info!(purpose = %purpose, "One-time password issued");
        Ok(otp)
    }

    /// Check and consume a one-time password.
    ///
    /// A matching code is deleted (single-use). A mismatched code leaves the
    /// stored one intact so a typo does not force a resend; an expired code
    /// is removed.
    pub async fn consume_otp(
        &self,
        purpose: OtpPurpose,
        email: &str,
        otp: &str,
    ) -> Result<(), AuthError> {
        let identifier = otp_identifier(purpose, &email.to_lowercase());

        let row: Option<VerificationRow> = sqlx::query_as(
            "SELECT id, value, expires_at FROM verifications WHERE identifier = $1",
        )
        .bind(&identifier)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to load verification");
            AuthError::Database
        })?;

        let row = row.ok_or(AuthError::InvalidOtp)?;

        if row.expires_at <= Utc::now() {
            if let Err(e) = sqlx::query("DELETE FROM verifications WHERE id = $1")
                .bind(row.id)
                .execute(&self.pool)
                .await
            {
                tracing::warn!(error = %e, "Failed to delete expired verification");
            }
            return Err(AuthError::OtpExpired);
        }

        if row.value != otp {
            return Err(AuthError::InvalidOtp);
        }

        sqlx::query("DELETE FROM verifications WHERE id = $1")
            .bind(row.id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to consume verification");
                AuthError::Database
            })?;

        Ok(())
    }

    /// Authenticate with a sign-in one-time password.
    ///
    /// Proving mailbox control also marks the email verified.
    pub async fn sign_in_with_otp(
        &self,
        email: &str,
        otp: &str,
    ) -> Result<AuthContext, AuthError> {
        let email = email.to_lowercase();
        self.consume_otp(OtpPurpose::SignIn, &email, otp).await?;

        let mut user = self
            .find_user_by_email(&email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !user.email_verified {
            user = self.mark_email_verified(user.id).await?;
        }

        let session = insert_session(&self.pool, user.id, &self.config).await?;
        Ok(AuthContext::new(user, session))
    }

    /// Consume an email-verification one-time password and flag the user.
    pub async fn verify_email(&self, email: &str, otp: &str) -> Result<(), AuthError> {
        let email = email.to_lowercase();
        self.consume_otp(OtpPurpose::EmailVerification, &email, otp)
            .await?;

        let result =
            sqlx::query("UPDATE users SET email_verified = TRUE, updated_at = NOW() WHERE email = $1")
                .bind(&email)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!(error = %e, "Failed to mark email verified");
                    AuthError::Database
                })?;

        if result.rows_affected() == 0 {
            return Err(AuthError::UserNotFound);
        }
        Ok(())
    }

    /// Consume a forget-password one-time password, replace the credential
    /// hash and revoke every session the user holds.
    pub async fn reset_password(
        &self,
        email: &str,
        otp: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let email = email.to_lowercase();
        self.consume_otp(OtpPurpose::ForgetPassword, &email, otp)
            .await?;

        let user = self
            .find_user_by_email(&email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let password_hash = password::hash_password(new_password)?;

        let mut tx = self.pool.begin().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to begin reset transaction");
            AuthError::Database
        })?;

        let updated = sqlx::query(
            r#"
            UPDATE accounts SET password = $2, updated_at = NOW()
            WHERE user_id = $1 AND provider_id = $3
            "#,
        )
        .bind(user.id)
        .bind(&password_hash)
        .bind(CREDENTIAL_PROVIDER)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, user_id = %user.id, "Failed to update credential hash");
            AuthError::Database
        })?;

        // A user created without a credential account gets one here
        if updated.rows_affected() == 0 {
            sqlx::query(
                r#"
                INSERT INTO accounts (id, user_id, provider_id, account_id, password, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, NOW(), NOW())
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(user.id)
            .bind(CREDENTIAL_PROVIDER)
            .bind(user.id.to_string())
            .bind(&password_hash)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, user_id = %user.id, "Failed to create credential account");
                AuthError::Database
            })?;
        }

        sqlx::query("DELETE FROM sessions WHERE user_id = $1")
            .bind(user.id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, user_id = %user.id, "Failed to revoke sessions");
                AuthError::Database
            })?;

        tx.commit().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to commit reset transaction");
            AuthError::Database
        })?;

        tracing::info!(user_id = %user.id, "Password reset");
        Ok(())
    }

    async fn mark_email_verified(&self, user_id: Uuid) -> Result<AuthIdentity, AuthError> {
        sqlx::query_as(&format!(
            r#"
            UPDATE users SET email_verified = TRUE, updated_at = NOW()
            WHERE id = $1
            RETURNING {IDENTITY_COLUMNS}
            "#
        ))
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, user_id = %user_id, "Failed to mark email verified");
            AuthError::Database
        })
    }
}

/// Insert a fresh session row for a user. Generic over pool/transaction.
async fn insert_session<'e, E>(
    executor: E,
    user_id: Uuid,
    config: &AuthConfig,
) -> Result<AuthSession, AuthError>
where
    E: sqlx::Executor<'e, Database = sqlx::Postgres>,
{
    let token = tokens::generate_session_token();
    let expires_at = Utc::now() + config.session_ttl;

    sqlx::query_as(&format!(
        r#"
        INSERT INTO sessions (id, user_id, token, expires_at, created_at, updated_at)
        VALUES ($1, $2, $3, $4, NOW(), NOW())
        RETURNING {SESSION_COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(&token)
    .bind(expires_at)
    .fetch_one(executor)
    .await
    .map_err(|e| {
        tracing::error!(error = %e, user_id = %user_id, "Failed to create session");
        AuthError::Database
    })
}
