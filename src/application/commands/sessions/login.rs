use super::SessionCommandService;
use crate::{
    application::error::{ApplicationError, ApplicationResult},
    domain::{
        session::NewAuthToken,
        user::{User, Username},
    },
};

pub struct LoginCommand {
    pub username: String,
    pub password: String,
}

pub struct LoginResult {
    /// Plain cookie value. Never persisted.
    pub token: String,
    pub user: User,
}

impl SessionCommandService {
    pub async fn login(&self, command: LoginCommand) -> ApplicationResult<LoginResult> {
        let username = Username::new(command.username)
            .map_err(|_| ApplicationError::unauthorized("invalid credentials"))?;
        let user = self
            .find_and_authenticate_user(username, &command.password)
            .await?;

        let token = self.token_generator.generate();
        let stored = self
            .tokens
            .insert(NewAuthToken {
                user_id: user.id,
                token_hash: self.token_generator.digest(&token),
                created_at: self.clock.now(),
            })
            .await?;

        tracing::info!(user_id = %user.id, token_id = stored.id, "session opened");
        Ok(LoginResult { token, user })
    }

    async fn find_and_authenticate_user(
        &self,
        username: Username,
        password: &str,
    ) -> ApplicationResult<User> {
        let user = self
            .users
            .find_by_username(&username)
            .await?
            .ok_or_else(|| ApplicationError::unauthorized("invalid credentials"))?;

        if !user.is_active {
            return Err(ApplicationError::forbidden("account is disabled"));
        }

        self.password_hasher
            .verify(password, user.password_hash.as_str())
            .await?;

        Ok(user)
    }
}
