// src/session.rs
//! One authenticated portal session, handed to every page's `fetch`.

use tracing::{info, warn};

use crate::config::consts::{LOGIN_PATH, LOGIN_SUCCESS_PATHS};
use crate::config::{Config, ExtractOptions};
use crate::core::{HttpTransport, Page, Transport};
use crate::error::{Result, ScrapeError};

pub struct Session<T: Transport> {
    transport: T,
    options: ExtractOptions,
}

impl Session<HttpTransport> {
    /// Open an HTTP session against `config.uri_base` and log in.
    pub fn connect(config: &Config, options: ExtractOptions) -> Result<Self> {
        let session = Session::new(HttpTransport::new(config.uri_base.as_str())?, options);
        session.login(&config.username, &config.password)?;
        Ok(session)
    }
}

impl<T: Transport> Session<T> {
    /// Wrap a transport without logging in (already authenticated, or offline pages).
    pub fn new(transport: T, options: ExtractOptions) -> Self {
        Self { transport, options }
    }

    /// Submit credentials. Success only when the final redirect lands on a
    /// known post-login path.
    pub fn login(&self, username: &str, password: &str) -> Result<()> {
        // Sets the cookie-support probe cookie; the POST fails without it.
        self.transport.get(LOGIN_PATH)?;

        let page = self.transport.post(
            LOGIN_PATH,
            &[
                ("login", username),
                ("passwd", password),
                ("ed_pass_keydown", ""),
                ("ed_pass_keyup", ""),
                ("captcha", ""),
                ("czy_js", "1"),
            ],
        )?;

        check_login(&page)?;
        info!("logged in");
        Ok(())
    }

    pub fn get(&self, path: &str) -> Result<Page> {
        self.transport.get(path)
    }

    pub fn post(&self, path: &str, form: &[(&str, &str)]) -> Result<Page> {
        self.transport.post(path, form)
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}

fn check_login(page: &Page) -> Result<()> {
    match page.last_location() {
        Some(location) if LOGIN_SUCCESS_PATHS.contains(&location) => Ok(()),
        location => {
            warn!(location, "login redirect not recognized");
            Err(ScrapeError::AuthenticationFailure { location: location.map(str::to_string) })
        }
    }
}
