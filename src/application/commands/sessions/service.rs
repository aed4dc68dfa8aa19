use std::sync::Arc;

use crate::application::ports::{
    security::{PasswordHasher, TokenGenerator},
    time::Clock,
};
use crate::domain::{
    session::{AuthTokenRepository, IdlePolicy},
    user::UserRepository,
};

pub struct SessionCommandService {
    pub(super) users: Arc<dyn UserRepository>,
    pub(super) tokens: Arc<dyn AuthTokenRepository>,
    pub(super) password_hasher: Arc<dyn PasswordHasher>,
    pub(super) token_generator: Arc<dyn TokenGenerator>,
    pub(super) clock: Arc<dyn Clock>,
    pub(super) policy: IdlePolicy,
}

impl SessionCommandService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        tokens: Arc<dyn AuthTokenRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
        token_generator: Arc<dyn TokenGenerator>,
        clock: Arc<dyn Clock>,
        policy: IdlePolicy,
    ) -> Self {
        Self {
            users,
            tokens,
            password_hasher,
            token_generator,
            clock,
            policy,
        }
    }
}
