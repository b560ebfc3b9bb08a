//! Scripted credentials for tests.
//!
//! ```ignore
//! let validator = MockSessionValidator::new()
//!     .with_test_user("tok-alice", "alice")
//!     .with_rejection("tok-old", AuthError::TokenExpired);
//! ```

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use chrono::Duration;

use crate::domain::foundation::{AuthError, AuthenticatedUser, Timestamp, UserId};
use crate::ports::SessionValidator;

type Outcome = Result<AuthenticatedUser, AuthError>;

/// Answers from a token table; unlisted tokens are `InvalidToken`.
#[derive(Debug, Default)]
pub struct MockSessionValidator {
    outcomes: RwLock<HashMap<String, Outcome>>,
}

impl MockSessionValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(self, token: impl Into<String>, user: AuthenticatedUser) -> Self {
        self.script(token.into(), Ok(user))
    }

    /// Adds a token for `user_id` that expires in one hour.
    ///
    /// Panics if `user_id` is blank.
    pub fn with_test_user(self, token: impl Into<String>, user_id: &str) -> Self {
        let user = AuthenticatedUser::new(
            UserId::new(user_id).unwrap_or_else(|e| panic!("invalid test user: {}", e)),
            Timestamp::from_datetime(*Timestamp::now().as_datetime() + Duration::hours(1)),
        );
        self.with_user(token, user)
    }

    /// Makes `token` fail validation with `error`.
    pub fn with_rejection(self, token: impl Into<String>, error: AuthError) -> Self {
        self.script(token.into(), Err(error))
    }

    fn script(self, token: String, outcome: Outcome) -> Self {
        self.outcomes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(token, outcome);
        self
    }
}

#[async_trait]
impl SessionValidator for MockSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        self.outcomes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(token)
            .cloned()
            .unwrap_or(Err(AuthError::InvalidToken))
    }
}
