//! Push channel and upload request addresses.
//!
//! Both are derived from the page location and the session identifier, so
//! the channel is same-origin and scoped to one upload without an extra
//! handshake.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::ProtocolError;
use crate::constants::{PENDING_SUFFIX, SESSION_QUERY_PARAM};

/// Transport used for the push channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
    /// Full-duplex socket (`ws` / `wss`).
    #[default]
    WebSocket,
    /// One-way server-push event stream (`http` / `https`).
    EventStream,
}

impl ChannelKind {
    /// Returns the URL scheme for this kind over a secure or plain transport.
    pub fn scheme(self, secure: bool) -> &'static str {
        match (self, secure) {
            (ChannelKind::WebSocket, true) => "wss",
            (ChannelKind::WebSocket, false) => "ws",
            (ChannelKind::EventStream, true) => "https",
            (ChannelKind::EventStream, false) => "http",
        }
    }
}

/// Parses a page location, accepting only absolute `http`/`https` URLs
/// with a host.
pub fn parse_page_url(location: &str) -> Result<Url, ProtocolError> {
    let url = Url::parse(location)?;
    page_is_secure(&url)?;
    if url.host_str().is_none() {
        return Err(ProtocolError::InvalidUrl(format!("{location}: missing host")));
    }
    Ok(url)
}

/// Builds `<scheme>://<host><page-path>pending?id=<session_id>`.
///
/// The secure scheme is chosen exactly when the page itself is `https`.
/// Host and port are copied verbatim; the suffix is appended to the page
/// path as-is, so a page at `/upload/` yields `/upload/pending`.
pub fn session_channel_url(
    page: &Url,
    session_id: &str,
    kind: ChannelKind,
) -> Result<Url, ProtocolError> {
    let secure = page_is_secure(page)?;
    let host = page
        .host_str()
        .ok_or_else(|| ProtocolError::InvalidUrl(format!("{page}: missing host")))?;
    let authority = match page.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    };

    let mut url = Url::parse(&format!(
        "{}://{authority}{}{PENDING_SUFFIX}",
        kind.scheme(secure),
        page.path()
    ))?;
    url.query_pairs_mut()
        .append_pair(SESSION_QUERY_PARAM, session_id);
    Ok(url)
}

/// Returns the page URL with its `id` query parameter set to `session_id`.
///
/// Other query parameters are kept; any previous `id` and the fragment
/// are dropped. The server uses this `id` to route the upload's progress
/// to the matching push channel.
pub fn upload_action_url(page: &Url, session_id: &str) -> Url {
    let retained: Vec<(String, String)> = page
        .query_pairs()
        .filter(|(k, _)| k != SESSION_QUERY_PARAM)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let mut url = page.clone();
    url.set_query(None);
    url.set_fragment(None);
    {
        let mut pairs = url.query_pairs_mut();
        for (k, v) in &retained {
            pairs.append_pair(k, v);
        }
        pairs.append_pair(SESSION_QUERY_PARAM, session_id);
    }
    url
}

fn page_is_secure(page: &Url) -> Result<bool, ProtocolError> {
    match page.scheme() {
        "https" => Ok(true),
        "http" => Ok(false),
        other => Err(ProtocolError::InvalidUrl(format!(
            "unsupported page scheme: {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(s: &str) -> Url {
        parse_page_url(s).unwrap()
    }

    #[test]
    fn plain_page_gets_ws() {
        let url = session_channel_url(&page("http://localhost:8080/"), "1234", ChannelKind::WebSocket)
            .unwrap();
        assert_eq!(url.as_str(), "ws://localhost:8080/pending?id=1234");
    }

    #[test]
    fn secure_page_gets_wss() {
        let url = session_channel_url(&page("https://example.com/"), "abc", ChannelKind::WebSocket)
            .unwrap();
        assert_eq!(url.as_str(), "wss://example.com/pending?id=abc");
    }

    #[test]
    fn event_stream_schemes() {
        let plain =
            session_channel_url(&page("http://h/"), "s", ChannelKind::EventStream).unwrap();
        assert_eq!(plain.scheme(), "http");
        let secure =
            session_channel_url(&page("https://h/"), "s", ChannelKind::EventStream).unwrap();
        assert_eq!(secure.scheme(), "https");
    }

    #[test]
    fn suffix_appended_to_page_path() {
        let url = session_channel_url(
            &page("http://example.com/files/upload/?x=1#frag"),
            "s1",
            ChannelKind::WebSocket,
        )
        .unwrap();
        assert_eq!(url.as_str(), "ws://example.com/files/upload/pending?id=s1");
    }

    #[test]
    fn suffix_appended_without_separator() {
        let url =
            session_channel_url(&page("http://example.com/up"), "s1", ChannelKind::WebSocket)
                .unwrap();
        assert_eq!(url.path(), "/uppending");
    }

    #[test]
    fn session_id_is_query_encoded() {
        let url = session_channel_url(&page("http://h/"), "a b&c", ChannelKind::WebSocket).unwrap();
        let id: Vec<String> = url
            .query_pairs()
            .filter(|(k, _)| k == "id")
            .map(|(_, v)| v.into_owned())
            .collect();
        assert_eq!(id, vec!["a b&c".to_string()]);
    }

    #[test]
    fn default_port_is_not_added() {
        let url = session_channel_url(&page("https://example.com:443/"), "s", ChannelKind::WebSocket)
            .unwrap();
        assert_eq!(url.as_str(), "wss://example.com/pending?id=s");
    }

    #[test]
    fn rejects_non_http_pages() {
        assert!(parse_page_url("ftp://example.com/").is_err());
        assert!(parse_page_url("not a url").is_err());
        let file = Url::parse("file:///tmp/index.html").unwrap();
        assert!(session_channel_url(&file, "s", ChannelKind::WebSocket).is_err());
    }

    #[test]
    fn action_url_sets_id() {
        let url = upload_action_url(&page("http://localhost:8080/"), "1234");
        assert_eq!(url.as_str(), "http://localhost:8080/?id=1234");
    }

    #[test]
    fn action_url_replaces_existing_id() {
        let url = upload_action_url(&page("http://h/up?id=old&lang=en#top"), "new");
        assert_eq!(url.as_str(), "http://h/up?lang=en&id=new");
    }
}
