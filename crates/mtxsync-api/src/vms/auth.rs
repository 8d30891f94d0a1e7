// VMS session authentication
//
// `login` trades username/password for a session id (`sid`) that the
// query loop attaches to every request; `logout` releases it.

use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::debug;

use crate::error::Error;
use crate::vms::client::VmsClient;
use crate::vms::models::{error_code, response_succeeded};

impl VmsClient {
    /// Authenticate with the VMS.
    ///
    /// On success the session id replaces any previously held one. On a
    /// VMS-reported failure the held session is dropped and
    /// [`Error::Authentication`] is returned; nothing retries it.
    pub async fn login(&self) -> Result<(), Error> {
        debug!(user = self.username(), "logging in at {}", self.base_url());

        let params = [
            ("username", self.username()),
            ("password", self.password().expose_secret()),
        ];
        let body = match self.fetch("login", &params).await {
            Err(Error::HttpStatus {
                status: status @ (401 | 403),
                ..
            }) => {
                self.set_session(None).await;
                return Err(Error::Authentication {
                    message: format!("login rejected by VMS: HTTP {status}"),
                });
            }
            other => other?,
        };

        if !response_succeeded(&body) {
            self.set_session(None).await;
            let code = error_code(&body);
            return Err(Error::Authentication {
                message: if code.is_empty() {
                    "login rejected by VMS".into()
                } else {
                    format!("login rejected by VMS: {code}")
                },
            });
        }

        let sid = body
            .get("sid")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::Authentication {
                message: "login response carries no sid".into(),
            })?;

        self.set_session(Some(SecretString::from(sid.to_owned()))).await;
        debug!("login successful");
        Ok(())
    }

    /// End the current session, if any.
    ///
    /// The session is forgotten locally even when the VMS call fails.
    pub async fn logout(&self) -> Result<(), Error> {
        let Some(sid) = self.session_id().await else {
            return Ok(());
        };
        self.set_session(None).await;

        debug!("logging out of {}", self.base_url());
        self.fetch("logout", &[("sid", sid.expose_secret())]).await?;
        debug!("logout complete");
        Ok(())
    }
}
