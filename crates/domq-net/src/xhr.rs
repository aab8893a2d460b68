//! XMLHttpRequest
//!
//! The ready-state machine the request helper drives. Each request moves
//! `Unsent -> Opened -> HeadersReceived -> Loading -> Done`; a transport
//! failure jumps straight to `Done` and is returned from `send`.

use std::collections::HashMap;

use crate::{Method, NetError, Request, Transport};

/// XMLHttpRequest ready states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum ReadyState {
    /// Client has been created, open() not called yet
    #[default]
    Unsent = 0,
    /// open() has been called
    Opened = 1,
    /// send() has been called, headers received
    HeadersReceived = 2,
    /// Downloading the body
    Loading = 3,
    /// Operation complete
    Done = 4,
}

type ReadyStateListener = Box<dyn FnMut(ReadyState)>;

/// XMLHttpRequest object over a [`Transport`]
pub struct XmlHttpRequest<T: Transport> {
    transport: T,
    ready_state: ReadyState,
    status: u16,
    status_text: String,
    response_text: Option<String>,
    on_ready_state_change: Option<ReadyStateListener>,

    // Internal state
    method: Method,
    url: String,
    request_headers: HashMap<String, String>,
    send_flag: bool,
}

impl<T: Transport> XmlHttpRequest<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            ready_state: ReadyState::Unsent,
            status: 0,
            status_text: String::new(),
            response_text: None,
            on_ready_state_change: None,
            method: Method::Get,
            url: String::new(),
            request_headers: HashMap::new(),
            send_flag: false,
        }
    }

    /// Register the readiness-change notification
    pub fn set_on_ready_state_change<F: FnMut(ReadyState) + 'static>(&mut self, listener: F) {
        self.on_ready_state_change = Some(Box::new(listener));
    }

    fn transition(&mut self, state: ReadyState) {
        self.ready_state = state;
        tracing::trace!(?state, url = %self.url, "xhr ready state");
        if let Some(listener) = self.on_ready_state_change.as_mut() {
            listener(state);
        }
    }

    /// Open the request, discarding any previous response
    pub fn open(&mut self, method: Method, url: &str) {
        self.method = method;
        self.url = url.to_string();
        self.request_headers.clear();
        self.send_flag = false;
        self.status = 0;
        self.status_text.clear();
        self.response_text = None;
        self.transition(ReadyState::Opened);
    }

    /// Set request header. Forbidden headers are skipped.
    pub fn set_request_header(&mut self, name: &str, value: &str) -> Result<(), NetError> {
        if self.ready_state != ReadyState::Opened || self.send_flag {
            return Err(NetError::InvalidState);
        }

        if is_forbidden_header(&name.to_ascii_lowercase()) {
            tracing::warn!("Refusing to set forbidden header: {}", name);
            return Ok(());
        }

        // Combine with existing header if present
        if let Some(existing) = self.request_headers.get_mut(name) {
            existing.push_str(", ");
            existing.push_str(value);
        } else {
            self.request_headers.insert(name.to_string(), value.to_string());
        }

        Ok(())
    }

    /// Send the request and wait for the terminal state
    pub async fn send(&mut self, payload: Option<&str>) -> Result<(), NetError> {
        if self.ready_state != ReadyState::Opened || self.send_flag {
            return Err(NetError::InvalidState);
        }
        self.send_flag = true;

        let request = Request {
            method: self.method,
            url: self.url.clone(),
            headers: self.request_headers.clone(),
            // GET and HEAD never carry a body
            payload: match self.method {
                Method::Get | Method::Head => None,
                _ => payload.map(str::to_string),
            },
        };

        match self.transport.send(&request).await {
            Ok(response) => {
                self.status = response.status;
                self.status_text = response.status_text;
                self.transition(ReadyState::HeadersReceived);
                self.transition(ReadyState::Loading);
                self.response_text = response.response_text;
                self.send_flag = false;
                self.transition(ReadyState::Done);
                Ok(())
            }
            Err(e) => {
                tracing::debug!("Request to {} failed: {}", self.url, e);
                self.send_flag = false;
                self.transition(ReadyState::Done);
                Err(e)
            }
        }
    }

    pub fn ready_state(&self) -> ReadyState {
        self.ready_state
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    /// Response body; `None` until `Done` or when the transport had none
    pub fn response_text(&self) -> Option<&str> {
        match self.ready_state {
            ReadyState::Done => self.response_text.as_deref(),
            _ => None,
        }
    }

    pub fn take_response_text(&mut self) -> Option<String> {
        match self.ready_state {
            ReadyState::Done => self.response_text.take(),
            _ => None,
        }
    }

    /// Response as JSON
    pub fn response_json<R: serde::de::DeserializeOwned>(&self) -> Result<R, NetError> {
        let text = self.response_text().ok_or(NetError::InvalidState)?;
        serde_json::from_str(text).map_err(|e| NetError::Client(e.to_string()))
    }
}

impl<T: Transport> std::fmt::Debug for XmlHttpRequest<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XmlHttpRequest")
            .field("ready_state", &self.ready_state)
            .field("method", &self.method)
            .field("url", &self.url)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

/// Check if header is forbidden
fn is_forbidden_header(name: &str) -> bool {
    matches!(
        name,
        "accept-charset"
            | "accept-encoding"
            | "access-control-request-headers"
            | "access-control-request-method"
            | "connection"
            | "content-length"
            | "cookie"
            | "cookie2"
            | "date"
            | "dnt"
            | "expect"
            | "host"
            | "keep-alive"
            | "origin"
            | "referer"
            | "te"
            | "trailer"
            | "transfer-encoding"
            | "upgrade"
            | "via"
    ) || name.starts_with("proxy-")
        || name.starts_with("sec-")
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::TransportResponse;

    struct Echo {
        seen: RefCell<Vec<Request>>,
    }

    impl Transport for Echo {
        async fn send(&self, request: &Request) -> Result<TransportResponse, NetError> {
            self.seen.borrow_mut().push(request.clone());
            Ok(TransportResponse::ok(request.payload.clone().unwrap_or_default()))
        }
    }

    fn echo() -> Echo {
        Echo { seen: RefCell::new(Vec::new()) }
    }

    #[test]
    fn test_state_sequence() {
        let transport = echo();
        let mut xhr = XmlHttpRequest::new(&transport);
        let states = Rc::new(RefCell::new(Vec::new()));
        let sink = states.clone();
        xhr.set_on_ready_state_change(move |s| sink.borrow_mut().push(s));

        assert_eq!(xhr.ready_state(), ReadyState::Unsent);
        xhr.open(Method::Post, "/echo");
        smol::block_on(xhr.send(Some("hi"))).unwrap();

        assert_eq!(
            *states.borrow(),
            vec![
                ReadyState::Opened,
                ReadyState::HeadersReceived,
                ReadyState::Loading,
                ReadyState::Done
            ]
        );
        assert_eq!(xhr.status(), 200);
        assert_eq!(xhr.response_text(), Some("hi"));
    }

    #[test]
    fn test_send_requires_open() {
        let mut xhr = XmlHttpRequest::new(echo());
        assert!(matches!(smol::block_on(xhr.send(None)), Err(NetError::InvalidState)));
        assert!(matches!(xhr.set_request_header("A", "b"), Err(NetError::InvalidState)));
    }

    #[test]
    fn test_headers_combine_and_forbidden_skipped() {
        let transport = echo();
        let mut xhr = XmlHttpRequest::new(&transport);
        xhr.open(Method::Get, "/x");
        xhr.set_request_header("Accept", "text/html").unwrap();
        xhr.set_request_header("Accept", "application/json").unwrap();
        xhr.set_request_header("Cookie", "a=b").unwrap();
        xhr.set_request_header("Sec-Fetch-Mode", "cors").unwrap();
        smol::block_on(xhr.send(Some("ignored"))).unwrap();

        let seen = transport.seen.borrow();
        assert_eq!(seen[0].headers.len(), 1);
        assert_eq!(seen[0].headers["Accept"], "text/html, application/json");
        assert!(seen[0].payload.is_none());
    }

    #[test]
    fn test_reopen_clears_response() {
        let mut xhr = XmlHttpRequest::new(echo());
        xhr.open(Method::Put, "/a");
        smol::block_on(xhr.send(Some("first"))).unwrap();
        xhr.open(Method::Put, "/a");
        assert_eq!(xhr.response_text(), None);
        assert_eq!(xhr.status(), 0);
    }

    #[test]
    fn test_response_json() {
        let mut xhr = XmlHttpRequest::new(echo());
        xhr.open(Method::Post, "/json");
        smol::block_on(xhr.send(Some(r#"{"n": 3}"#))).unwrap();
        let value: serde_json::Value = xhr.response_json().unwrap();
        assert_eq!(value["n"], 3);
    }
}
