//! Single-flight token refresh.
//!
//! A burst of requests can all hit a 401 at once when the access token
//! expires. Only one of them should call the refresh endpoint; the rest
//! wait for it and reuse the result.

use crate::ApiError;
use bloom_auth::CredentialStore;
use std::future::Future;
use tracing::{debug, warn};

/// Serializes refresh attempts across concurrent callers.
///
/// Callers pass the access token their failed request used. Whoever wins
/// the lock performs the refresh; everyone queued behind it finds a token
/// different from their stale one already in the store and returns that
/// without a second network call.
pub struct RefreshGate {
    lock: tokio::sync::Mutex<()>,
}

impl RefreshGate {
    pub fn new() -> Self {
        Self {
            lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Obtain a fresh access token, refreshing at most once per stale
    /// token. On refresh failure all credential state is cleared and
    /// `AuthExpired` is returned.
    pub async fn refresh_once<F, Fut>(
        &self,
        credentials: &CredentialStore,
        stale: Option<&str>,
        refresh: F,
    ) -> Result<String, ApiError>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = Result<String, ApiError>>,
    {
        let _guard = self.lock.lock().await;

        // A caller queued behind the winner sees the replaced token here.
        if let Some(current) = credentials.access_token()? {
            if Some(current.as_str()) != stale {
                debug!("token already refreshed by a concurrent caller");
                return Ok(current);
            }
        }

        let refresh_token = match credentials.refresh_token()? {
            Some(t) => t,
            None => {
                credentials.clear()?;
                return Err(ApiError::AuthExpired);
            }
        };

        match refresh(refresh_token).await {
            Ok(new_access) => {
                credentials.replace_access_token(&new_access)?;
                debug!("access token refreshed");
                Ok(new_access)
            }
            Err(err) => {
                warn!(error = %err, "token refresh failed, clearing credentials");
                credentials.clear()?;
                Err(ApiError::AuthExpired)
            }
        }
    }
}

impl Default for RefreshGate {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bloom_auth::{StoredUser, TokenPair};
    use bloom_commerce::ids::UserId;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    fn signed_in_store() -> CredentialStore {
        let creds = CredentialStore::open_default().unwrap();
        creds
            .save(
                &TokenPair {
                    access_token: "stale".into(),
                    refresh_token: "ref-1".into(),
                },
                &StoredUser {
                    id: UserId::new("u1"),
                    full_name: "Lan".into(),
                    email: "lan@example.com".into(),
                    role: Default::default(),
                },
            )
            .unwrap();
        creds
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_concurrent_401s_trigger_one_refresh() {
        let creds = signed_in_store();
        let gate = Arc::new(RefreshGate::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..4 {
            let creds = creds.clone();
            let gate = gate.clone();
            let calls = calls.clone();
            handles.push(tokio::spawn(async move {
                gate.refresh_once(&creds, Some("stale"), |refresh_token| {
                    let calls = calls.clone();
                    async move {
                        assert_eq!(refresh_token, "ref-1");
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(20)).await;
                        Ok("fresh".to_string())
                    }
                })
                .await
            }));
        }

        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap(), "fresh");
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(creds.access_token().unwrap().as_deref(), Some("fresh"));
    }

    #[tokio::test]
    async fn test_refresh_failure_clears_credentials() {
        let creds = signed_in_store();
        let gate = RefreshGate::new();

        let result = gate
            .refresh_once(&creds, Some("stale"), |_| async {
                Err(ApiError::Rejected {
                    status: 403,
                    message: "refresh token revoked".into(),
                })
            })
            .await;

        assert!(matches!(result, Err(ApiError::AuthExpired)));
        assert!(!creds.is_authenticated().unwrap());
        assert_eq!(creds.refresh_token().unwrap(), None);
        assert!(creds.user().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_already_refreshed_token_reused() {
        let creds = signed_in_store();
        creds.replace_access_token("fresh").unwrap();
        let gate = RefreshGate::new();

        // This caller's request failed under the old token; the store
        // already holds the new one, so no refresh happens.
        let token = gate
            .refresh_once(&creds, Some("stale"), |_| async {
                panic!("refresh must not be called");
            })
            .await
            .unwrap();
        assert_eq!(token, "fresh");
    }

    #[tokio::test]
    async fn test_missing_refresh_token_clears_state() {
        let creds = CredentialStore::open_default().unwrap();
        creds.replace_access_token("stale").unwrap();
        let gate = RefreshGate::new();

        let result = gate
            .refresh_once(&creds, Some("stale"), |_| async {
                panic!("refresh must not be called");
            })
            .await;
        assert!(matches!(result, Err(ApiError::AuthExpired)));
        assert!(!creds.is_authenticated().unwrap());
    }
}
