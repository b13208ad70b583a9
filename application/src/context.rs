//! [`Context`]-related definitions.

use std::sync::atomic::{self, AtomicU16};

use axum::{async_trait, extract::FromRequestParts, RequestPartsExt as _};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use common::DateTime;
use juniper::{
    http::{GraphQLBatchResponse, GraphQLResponse},
    IntoFieldError as _,
};
use service::{
    command::{self, Command as _},
    domain::user::session,
};
use tokio::sync::OnceCell;

#[cfg(doc)]
use service::domain::User;

use crate::{api, define_error, AsError, Error, JuniperResponse, Service};

/// Context of a single GraphQL request.
#[derive(Debug)]
pub struct Context {
    /// [`Service`] to execute operations on.
    service: Service,

    /// Status code of the response, if it fails.
    error_status_code: AtomicU16,

    /// [`session::Token`] from the `Authorization` header, if any.
    ///
    /// Holds an [`Error`] if the header is malformed.
    token: Result<Option<session::Token>, Error>,

    /// Outcome of the [`Session`] authentication, once performed.
    session: OnceCell<Result<Session, Error>>,
}

impl Context {
    /// Returns the [`Service`] of this [`Context`].
    #[must_use]
    pub fn service(&self) -> &Service {
        &self.service
    }

    /// Returns the status code of the response if it fails.
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn error_status_code(&self) -> http::StatusCode {
        http::StatusCode::from_u16(
            self.error_status_code.load(atomic::Ordering::Relaxed),
        )
        .expect("invalid status code")
    }

    /// Sets the status code of the response if it fails.
    pub fn set_error_status_code(&self, status_code: http::StatusCode) {
        self.error_status_code
            .store(status_code.as_u16(), atomic::Ordering::Relaxed);
    }

    /// Returns a [`Result::map_err()`] closure recording the status code of
    /// the passed [`Error`] via [`Context::set_error_status_code()`].
    pub fn error(&self) -> impl FnOnce(Error) -> Error + '_ {
        move |err| {
            self.set_error_status_code(err.status_code);
            err
        }
    }

    /// Returns the [`Session`] of the current request.
    ///
    /// Authentication happens once per request, and its outcome is reused by
    /// every resolver.
    ///
    /// # Errors
    ///
    /// With `AUTHORIZATION_REQUIRED` code if the request carries no valid
    /// bearer token.
    pub async fn current_session(&self) -> Result<Session, Error> {
        self.session
            .get_or_init(|| self.authenticate())
            .await
            .clone()
            .map_err(self.error())
    }

    /// Verifies the bearer token of the current request.
    async fn authenticate(&self) -> Result<Session, Error> {
        let token = self
            .token
            .clone()?
            .ok_or_else(|| Error::from(AuthError::AuthorizationRequired))?;

        let session = self
            .service
            .execute(command::AuthorizeUserSession {
                token: token.clone(),
            })
            .await
            .map_err(AsError::into_error)?;
        Ok(Session {
            user_id: session.user_id.into(),
            token,
            expires_at: session.expires_at.coerce(),
        })
    }
}

impl juniper::Context for Context {}

#[async_trait]
impl<S> FromRequestParts<S> for Context
where
    S: Send + Sync,
{
    type Rejection = JuniperResponse;

    async fn from_request_parts(
        parts: &mut http::request::Parts,
        _: &S,
    ) -> Result<Self, Self::Rejection> {
        let service =
            parts.extensions.get::<Service>().cloned().ok_or_else(|| {
                JuniperResponse {
                    status_code: http::StatusCode::INTERNAL_SERVER_ERROR,
                    response: GraphQLBatchResponse::Single(
                        GraphQLResponse::error(
                            Error::internal(&"missing `Service` extension")
                                .into_field_error(),
                        ),
                    ),
                }
            })?;

        let token = match parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
        {
            Ok(TypedHeader(Authorization(bearer))) => {
                #[expect(unsafe_code, reason = "specified in correct header")]
                let token = unsafe {
                    session::Token::new_unchecked(bearer.token().to_owned())
                };
                Ok(Some(token))
            }
            Err(e) if e.is_missing() => Ok(None),
            Err(e) => Err(e.into_error()),
        };

        Ok(Self {
            service,
            error_status_code: AtomicU16::new(
                http::StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            ),
            token,
            session: OnceCell::new(),
        })
    }
}

/// Authenticated session of a [`User`].
#[derive(Clone, Debug)]
pub struct Session {
    /// ID of the [`User`] this [`Session`] belongs to.
    pub user_id: api::user::Id,

    /// Bearer token this [`Session`] was authenticated with.
    pub token: session::Token,

    /// [`DateTime`] when this [`Session`] expires.
    pub expires_at: DateTime,
}

impl AsError for command::authorize_user_session::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::JsonWebTokenDecodeError(_) | Self::UserNotExists(_) => {
                Some(AuthError::AuthorizationRequired.into())
            }
        }
    }
}

define_error! {
    enum AuthError {
        #[code = "AUTHORIZATION_REQUIRED"]
        #[status = UNAUTHORIZED]
        #[message = "Authorization required"]
        AuthorizationRequired,
    }
}
