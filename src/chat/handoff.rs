//! Single-use transfer of a first message into a new chat session.
//!
//! A landing view collects the first message before any session exists and passes it along.
//! The [`Handoff`] may travel in memory, or as a `message=` query parameter so that a link to a
//! new chat carries its opening line.  Either way the receiving session consumes it at most once.

use url::form_urlencoded;

use crate::error::Result;

const QUERY_KEY: &str = "message";

/// A pending outbound message waiting for the session that will send it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Handoff {
    text: Option<String>,
    consumed: bool,
}

impl Handoff {
    /// A handoff carrying `text`.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            consumed: false,
        }
    }

    /// A handoff with nothing in it.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Decode a handoff from a query string such as `message=Tell%20me%20about%20your%20art`.
    ///
    /// A leading `?` is ignored, unrelated parameters are skipped, and the first `message`
    /// parameter wins.  A query without one yields an empty handoff.
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == QUERY_KEY)
            .map(|(_, value)| Self::new(value.into_owned()))
            .unwrap_or_default()
    }

    /// Decode a handoff from the query of a full URL.
    pub fn from_url(url: &str) -> Result<Self> {
        let url = url::Url::parse(url)?;
        Ok(url.query().map(Self::from_query).unwrap_or_default())
    }

    /// Encode the pending text as a query string, or `None` if there is nothing pending.
    pub fn to_query(&self) -> Option<String> {
        let text = self.peek()?;
        Some(
            form_urlencoded::Serializer::new(String::new())
                .append_pair(QUERY_KEY, text)
                .finish(),
        )
    }

    /// The pending text, unless it was already consumed.
    pub fn peek(&self) -> Option<&str> {
        if self.consumed {
            None
        } else {
            self.text.as_deref()
        }
    }

    /// True if there is text that has not been consumed.
    pub fn is_pending(&self) -> bool {
        self.peek().is_some()
    }

    /// Take the pending text.  Every later call returns `None`.
    pub fn consume(&mut self) -> Option<String> {
        if self.consumed {
            return None;
        }
        self.consumed = true;
        self.text.clone()
    }

    /// True once [`Handoff::consume`] has been called.
    pub fn is_consumed(&self) -> bool {
        self.consumed
    }
}

impl From<&str> for Handoff {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Handoff {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl From<Option<String>> for Handoff {
    fn from(text: Option<String>) -> Self {
        Self {
            text,
            consumed: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::{ChatCommand, parse_command};

    #[test]
    fn consume_once() {
        let mut handoff = Handoff::new("Tell me about your art");
        assert!(handoff.is_pending());
        assert_eq!(handoff.consume().as_deref(), Some("Tell me about your art"));
        assert!(handoff.is_consumed());
        assert_eq!(handoff.consume(), None);
        assert_eq!(handoff.peek(), None);
    }

    #[test]
    fn empty_is_not_pending() {
        let mut handoff = Handoff::empty();
        assert!(!handoff.is_pending());
        assert_eq!(handoff.consume(), None);
        assert_eq!(handoff.to_query(), None);
    }

    #[test]
    fn query_round_trip_preserves_text() {
        let handoff = Handoff::new("what's good & what's next?");
        let query = handoff.to_query().unwrap();
        assert!(query.starts_with("message="));
        assert!(!query.contains(' '));
        assert_eq!(Handoff::from_query(&query), handoff);
    }

    #[test]
    fn from_query_skips_other_parameters() {
        let handoff = Handoff::from_query("?ref=landing&message=Hello%20Ye&message=ignored");
        assert_eq!(handoff.peek(), Some("Hello Ye"));
        assert!(!Handoff::from_query("ref=landing").is_pending());
    }

    #[test]
    fn new_command_opener_becomes_a_link() {
        let Some(ChatCommand::New(opener)) = parse_command("/new what is genius?") else {
            panic!("expected /new to parse");
        };
        let handoff = Handoff::from(opener);
        let query = handoff.to_query().unwrap();
        assert_eq!(query, "message=what+is+genius%3F");
        let link = format!("https://chat.example.com/chat/new?{query}");
        assert_eq!(Handoff::from_url(&link).unwrap(), handoff);

        let Some(ChatCommand::New(opener)) = parse_command("/new") else {
            panic!("expected /new to parse");
        };
        assert_eq!(Handoff::from(opener).to_query(), None);
    }

    #[test]
    fn from_url_reads_the_query() {
        let handoff =
            Handoff::from_url("https://chat.example.com/chat/1234?message=Tell+me").unwrap();
        assert_eq!(handoff.peek(), Some("Tell me"));
        let handoff = Handoff::from_url("https://chat.example.com/chat/1234").unwrap();
        assert!(!handoff.is_pending());
        assert!(Handoff::from_url("chat/1234").is_err());
    }
}
