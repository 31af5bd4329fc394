#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Jwt error")]
    JwtError(#[source] jsonwebtoken::errors::Error),
    #[error("Password error")]
    PasswordError(#[source] argon2::password_hash::Error),
    #[error("Unauthenticated")]
    Unauthenticated,
    #[error("Account not found")]
    AccountNotFound,
    #[error("Incorrect credential")]
    IncorrectCredential,
}
