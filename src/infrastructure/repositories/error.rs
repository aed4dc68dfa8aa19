use crate::domain::errors::DomainError;

const CNT_USER_USERNAME: &str = "users_username_key";
const CNT_TOKEN_HASH: &str = "auth_tokens_token_hash_key";
const CNT_AFFAIRE_REFERENCE: &str = "affaires_reference_key";
const CNT_ALERTE_REFERENCE: &str = "alertes_type_reference_key";
const CNT_AFFAIRE_STATUT_CHECK: &str = "affaires_statut_chk";

/// SQLSTATE raised when `FOR UPDATE` is not available on the backend.
pub(crate) const FEATURE_NOT_SUPPORTED: &str = "0A000";

pub fn map_sqlx(err: sqlx::Error) -> DomainError {
    match &err {
        sqlx::Error::RowNotFound => DomainError::NotFound("row not found".into()),
        sqlx::Error::Database(db_err) => {
            if let Some(constraint) = db_err.constraint() {
                match constraint {
                    CNT_USER_USERNAME => {
                        return DomainError::Conflict("username already exists".into());
                    }
                    CNT_TOKEN_HASH => {
                        return DomainError::Conflict("token already issued".into());
                    }
                    CNT_AFFAIRE_REFERENCE => {
                        return DomainError::Conflict("affaire reference already exists".into());
                    }
                    CNT_ALERTE_REFERENCE => {
                        return DomainError::Conflict("alert already exists for this record".into());
                    }
                    CNT_AFFAIRE_STATUT_CHECK => {
                        return DomainError::Validation("unknown affaire statut".into());
                    }
                    _ => {}
                }
            }

            if let Some(code) = db_err.code() {
                match code.as_ref() {
                    "23505" => {
                        return DomainError::Conflict("unique constraint violated".into());
                    }
                    // Same code for a dangling reference and for removing a
                    // row that is still referenced.
                    "23503" if db_err.message().starts_with("update or delete") => {
                        return DomainError::Conflict("record is still referenced".into());
                    }
                    "23503" => {
                        return DomainError::NotFound("referenced record not found".into());
                    }
                    "23514" => {
                        return DomainError::Validation("check constraint violated".into());
                    }
                    _ => {}
                }
            }

            DomainError::Persistence(db_err.message().to_string())
        }
        _ => DomainError::Persistence(err.to_string()),
    }
}

pub(crate) fn is_feature_not_supported(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some(FEATURE_NOT_SUPPORTED))
}
