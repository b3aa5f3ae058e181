// src/core/net.rs
//! Portal transport: authenticated GET/POST returning a parsed page.
//!
//! Redirects are followed by hand so every hop's raw `Location` header is kept;
//! login success is decided from that chain.

use std::cell::RefCell;
use std::collections::HashMap;

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::LOCATION;
use reqwest::redirect::Policy;
use scraper::{ElementRef, Html};
use tracing::debug;

use crate::config::consts::{MAX_REDIRECTS, USER_AGENT};
use crate::error::{Result, ScrapeError};

/// A fetched and parsed portal page.
#[derive(Clone, Debug)]
pub struct Page {
    /// Final URL after redirects.
    pub url: String,
    /// Raw `Location` header of each redirect hop, in order.
    pub redirects: Vec<String>,
    pub html: Html,
}

impl Page {
    pub fn new(url: impl Into<String>, redirects: Vec<String>, body: &str) -> Self {
        Self { url: url.into(), redirects, html: Html::parse_document(body) }
    }

    pub fn root(&self) -> ElementRef<'_> {
        self.html.root_element()
    }

    /// Location of the last redirect hop, if any.
    pub fn last_location(&self) -> Option<&str> {
        self.redirects.last().map(String::as_str)
    }
}

/// Fetches portal pages by path (`/ogloszenia`, …).
pub trait Transport {
    fn get(&self, path: &str) -> Result<Page>;
    fn post(&self, path: &str, form: &[(&str, &str)]) -> Result<Page>;
}

fn check_path(path: &str) -> Result<()> {
    if path.starts_with('/') {
        Ok(())
    } else {
        Err(ScrapeError::InvalidUrl(format!("path must start with '/': {path}")))
    }
}

/// Blocking HTTP transport with a cookie jar; one per session.
pub struct HttpTransport {
    client: Client,
    uri_base: String,
}

impl HttpTransport {
    pub fn new(uri_base: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .cookie_store(true)
            .redirect(Policy::none())
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client, uri_base: uri_base.into() })
    }

    pub fn uri_base(&self) -> &str {
        &self.uri_base
    }

    fn send(&self, req: RequestBuilder) -> Result<Page> {
        let mut resp = req.send()?;
        let mut redirects = Vec::new();

        while resp.status().is_redirection() {
            let Some(location) = location_of(&resp) else { break };
            if redirects.len() >= MAX_REDIRECTS {
                return Err(ScrapeError::TooManyRedirects(redirects.len()));
            }
            let next = resp
                .url()
                .join(&location)
                .map_err(|e| ScrapeError::InvalidUrl(format!("{location}: {e}")))?;
            debug!(status = %resp.status(), %location, "following redirect");
            redirects.push(location);
            // 301/302/303 after a form POST all continue as GET, same as browsers.
            resp = self.client.get(next).send()?;
        }

        let resp = resp.error_for_status()?;
        let url = resp.url().to_string();
        let body = resp.text()?;
        debug!(%url, bytes = body.len(), hops = redirects.len(), "fetched page");
        Ok(Page::new(url, redirects, &body))
    }
}

fn location_of(resp: &Response) -> Option<String> {
    resp.headers()
        .get(LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

impl Transport for HttpTransport {
    fn get(&self, path: &str) -> Result<Page> {
        check_path(path)?;
        debug!(path, "GET");
        self.send(self.client.get(format!("{}{}", self.uri_base, path)))
    }

    fn post(&self, path: &str, form: &[(&str, &str)]) -> Result<Page> {
        check_path(path)?;
        debug!(path, fields = form.len(), "POST");
        self.send(self.client.post(format!("{}{}", self.uri_base, path)).form(form))
    }
}

/// A request seen by [`OfflineTransport`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Request {
    Get(String),
    Post(String, Vec<(String, String)>),
}

/// Serves saved pages by path; replays captured portal HTML without a network.
/// Unknown paths yield an empty document. Every request is recorded.
#[derive(Default)]
pub struct OfflineTransport {
    pages: HashMap<String, (String, Vec<String>)>,
    log: RefCell<Vec<Request>>,
}

impl OfflineTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, path: &str, body: impl Into<String>) -> Self {
        self.pages.insert(s!(path), (body.into(), Vec::new()));
        self
    }

    /// Page reached from `path` through the given redirect `Location`s.
    pub fn with_redirects(mut self, path: &str, redirects: &[&str], body: impl Into<String>) -> Self {
        let hops = redirects.iter().map(|r| s!(*r)).collect();
        self.pages.insert(s!(path), (body.into(), hops));
        self
    }

    pub fn requests(&self) -> Vec<Request> {
        self.log.borrow().clone()
    }

    fn serve(&self, path: &str) -> Page {
        match self.pages.get(path) {
            Some((body, hops)) => Page::new(path, hops.clone(), body),
            None => Page::new(path, Vec::new(), ""),
        }
    }
}

impl Transport for OfflineTransport {
    fn get(&self, path: &str) -> Result<Page> {
        check_path(path)?;
        self.log.borrow_mut().push(Request::Get(s!(path)));
        Ok(self.serve(path))
    }

    fn post(&self, path: &str, form: &[(&str, &str)]) -> Result<Page> {
        check_path(path)?;
        let fields = form.iter().map(|(k, v)| (s!(*k), s!(*v))).collect();
        self.log.borrow_mut().push(Request::Post(s!(path), fields));
        Ok(self.serve(path))
    }
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get(&self, path: &str) -> Result<Page> {
        (**self).get(path)
    }

    fn post(&self, path: &str, form: &[(&str, &str)]) -> Result<Page> {
        (**self).post(path, form)
    }
}
