use crate::domain::models::AuthSession;
use crate::infrastructure::error::ClientError;
use chrono::{DateTime, Utc};
use std::sync::{RwLock, RwLockWriteGuard};

/// Read side of credential storage. The gateway only ever needs the current
/// session; saving and clearing belong to whatever login flow owns the
/// concrete store, so they are inherent methods there rather than part of
/// this trait.
pub trait CredentialStore: Send + Sync {
    fn load_session(&self) -> Result<Option<AuthSession>, ClientError>;
}

const TOKEN_FIELD: &str = "access-token";
const USER_FIELD: &str = "user-id";
const EXPIRY_FIELD: &str = "expires-at";

/// OS-keychain-backed store. Each session field lives in its own keyring
/// entry (`<account>.<field>`), so a half-written session reads back as "no
/// session" instead of parsing into a bogus one.
#[derive(Debug, Clone)]
pub struct KeyringCredentialStore {
    service_name: String,
    account_name: String,
}

impl KeyringCredentialStore {
    pub fn new(service_name: impl Into<String>, account_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            account_name: account_name.into(),
        }
    }

    fn field_entry(&self, field: &str) -> Result<keyring::Entry, ClientError> {
        let account = format!("{}.{field}", self.account_name);
        keyring::Entry::new(&self.service_name, &account)
            .map_err(|error| ClientError::Credential(error.to_string()))
    }

    fn read_field(&self, field: &str) -> Result<Option<String>, ClientError> {
        match self.field_entry(field)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(error) => Err(ClientError::Credential(error.to_string())),
        }
    }

    fn write_field(&self, field: &str, value: &str) -> Result<(), ClientError> {
        self.field_entry(field)?
            .set_password(value)
            .map_err(|error| ClientError::Credential(error.to_string()))
    }

    fn clear_field(&self, field: &str) -> Result<(), ClientError> {
        match self.field_entry(field)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(error) => Err(ClientError::Credential(error.to_string())),
        }
    }

    pub fn save_session(&self, session: &AuthSession) -> Result<(), ClientError> {
        self.write_field(TOKEN_FIELD, &session.access_token)?;
        self.write_field(USER_FIELD, &session.user_id)?;
        match session.expires_at {
            Some(expires_at) => self.write_field(EXPIRY_FIELD, &expires_at.to_rfc3339()),
            None => self.clear_field(EXPIRY_FIELD),
        }
    }

    pub fn clear_session(&self) -> Result<(), ClientError> {
        self.clear_field(TOKEN_FIELD)?;
        self.clear_field(USER_FIELD)?;
        self.clear_field(EXPIRY_FIELD)
    }
}

impl Default for KeyringCredentialStore {
    fn default() -> Self {
        Self::new("hometask.auth", "default")
    }
}

impl CredentialStore for KeyringCredentialStore {
    fn load_session(&self) -> Result<Option<AuthSession>, ClientError> {
        let Some(access_token) = self.read_field(TOKEN_FIELD)? else {
            return Ok(None);
        };
        let Some(user_id) = self.read_field(USER_FIELD)? else {
            return Ok(None);
        };
        let expires_at = match self.read_field(EXPIRY_FIELD)? {
            Some(raw) => Some(
                DateTime::parse_from_rfc3339(&raw)
                    .map_err(|error| {
                        ClientError::Credential(format!("stored expiry unreadable: {error}"))
                    })?
                    .with_timezone(&Utc),
            ),
            None => None,
        };
        Ok(Some(AuthSession {
            access_token,
            user_id,
            expires_at,
        }))
    }
}

/// Test double and single-process fallback.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    session: RwLock<Option<AuthSession>>,
}

impl InMemoryCredentialStore {
    pub fn with_session(session: AuthSession) -> Self {
        Self {
            session: RwLock::new(Some(session)),
        }
    }

    pub fn save_session(&self, session: &AuthSession) -> Result<(), ClientError> {
        *self.write()? = Some(session.clone());
        Ok(())
    }

    pub fn clear_session(&self) -> Result<(), ClientError> {
        *self.write()? = None;
        Ok(())
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Option<AuthSession>>, ClientError> {
        self.session
            .write()
            .map_err(|error| ClientError::Credential(format!("in-memory lock poisoned: {error}")))
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn load_session(&self) -> Result<Option<AuthSession>, ClientError> {
        let guard = self
            .session
            .read()
            .map_err(|error| ClientError::Credential(format!("in-memory lock poisoned: {error}")))?;
        Ok(guard.clone())
    }
}
