//! [`Command`] for authorizing a [`User`] by a [`Session`] token.

use common::operations::{By, Select};
use derive_more::{Display, Error, From};
use jsonwebtoken::Validation;
use tracerr::Traced;

use crate::{
    domain::{
        user::{self, session, Session},
        User,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] verifying a [`session::Token`] issued to a [`User`].
#[derive(Clone, Debug, From)]
pub struct AuthorizeUserSession {
    /// [`session::Token`] to verify.
    pub token: session::Token,
}

impl<Db> Command<AuthorizeUserSession> for Service<Db>
where
    Db: Database<
        Select<By<Option<User>, user::Id>>,
        Ok = Option<User>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Session;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        AuthorizeUserSession { token }: AuthorizeUserSession,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let session = jsonwebtoken::decode::<Session>(
            token.as_ref(),
            &self.config().jwt_decoding_key,
            &Validation::default(),
        )
        .map_err(tracerr::from_and_wrap!(=> E))?
        .claims;

        let user = self
            .database()
            .execute(Select(By::new(session.user_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if user.is_none() {
            return Err(tracerr::new!(E::UserNotExists(session.user_id)));
        }

        Ok(session)
    }
}

/// Error of [`AuthorizeUserSession`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`session::Token`] is malformed, expired or signed by someone else.
    #[display("Failed to decode a JSON Web Token: {_0}")]
    JsonWebTokenDecodeError(jsonwebtoken::errors::Error),

    /// [`User`] the [`Session`] belongs to does not exist.
    #[display("`User(id: {_0})` does not exist")]
    #[from(ignore)]
    UserNotExists(#[error(not(source))] user::Id),
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::{operations::Insert, Handler as _};
    use jsonwebtoken::{DecodingKey, EncodingKey, Header};

    use crate::{
        domain::{
            user::{self, session, Session},
            User,
        },
        infra::Memory,
        Config, Service,
    };

    use super::{AuthorizeUserSession, ExecutionError};

    const SECRET: &[u8] = b"test-secret";

    fn token(session: &Session, secret: &[u8]) -> session::Token {
        let jwt = jsonwebtoken::encode(
            &Header::default(),
            session,
            &EncodingKey::from_secret(secret),
        )
        .unwrap();
        #[expect(unsafe_code, reason = "freshly encoded")]
        let token = unsafe { session::Token::new_unchecked(jwt) };
        token
    }

    async fn service() -> (Service<Memory>, user::Id) {
        let db = Memory::default();
        let id = user::Id::new();
        db.execute(Insert(User { id, email: None })).await.unwrap();
        let svc = Service::new(
            Config {
                jwt_decoding_key: DecodingKey::from_secret(SECRET),
            },
            db,
        );
        (svc, id)
    }

    fn valid_session(user_id: user::Id) -> Session {
        Session {
            user_id,
            expires_at: session::ExpirationDateTime::now()
                + Duration::from_secs(3600),
        }
    }

    #[tokio::test]
    async fn accepts_valid_token() {
        let (svc, id) = service().await;

        let session = svc
            .execute(AuthorizeUserSession {
                token: token(&valid_session(id), SECRET),
            })
            .await
            .unwrap();

        assert_eq!(session.user_id, id);
    }

    #[tokio::test]
    async fn rejects_foreign_signature() {
        let (svc, id) = service().await;

        let err = svc
            .execute(AuthorizeUserSession {
                token: token(&valid_session(id), b"another-secret"),
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::JsonWebTokenDecodeError(_),
        ));
    }

    #[tokio::test]
    async fn rejects_expired_token() {
        let (svc, id) = service().await;
        let expired = Session {
            user_id: id,
            expires_at: session::ExpirationDateTime::now()
                - Duration::from_secs(3600),
        };

        let err = svc
            .execute(AuthorizeUserSession {
                token: token(&expired, SECRET),
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::JsonWebTokenDecodeError(_),
        ));
    }

    #[tokio::test]
    async fn rejects_unknown_user() {
        let (svc, _) = service().await;
        let stranger = user::Id::new();

        let err = svc
            .execute(AuthorizeUserSession {
                token: token(&valid_session(stranger), SECRET),
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::UserNotExists(id) if *id == stranger,
        ));
    }
}
