//! Core chat session management.
//!
//! This module provides the `ChatSession` struct which owns the transcript of one conversation
//! and sequences each submit, generate, append cycle.  The transcript and the busy flag are
//! published together through a `tokio::sync::watch` channel so that any renderer can follow
//! along without the session knowing how it is displayed.

use std::sync::{Mutex, PoisonError};
use std::time::Instant;

use tokio::sync::watch;

use crate::chat::handoff::Handoff;
use crate::client::Generate;
use crate::error::{Error, Result};
use crate::observability::{
    SESSION_REJECTIONS, SESSION_SEEDS_CONSUMED, SESSION_SUBMISSIONS, SESSION_TURN_DURATION,
};
use crate::types::Message;

/// Observable state of a session: the transcript and whether a reply is pending.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    messages: Vec<Message>,
    busy: bool,
}

impl SessionState {
    /// The transcript, oldest first.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// True between a user message being appended and its reply being appended.
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Number of messages in the transcript.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// True if nothing has been said yet.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// A chat session that owns one transcript and allows one turn in flight at a time.
///
/// The transcript only ever grows, and every accepted submission adds exactly two entries: the
/// user's message and the reply produced by the generator.  Dropping the session discards the
/// transcript.
pub struct ChatSession<G: Generate> {
    generator: G,
    state: watch::Sender<SessionState>,
    seed: Mutex<Handoff>,
}

impl<G: Generate> ChatSession<G> {
    /// Creates a new, empty chat session.
    pub fn new(generator: G) -> Self {
        Self::with_handoff(generator, Handoff::empty())
    }

    /// Creates a new chat session that will send `handoff` on the first call to
    /// [`ChatSession::process_seed`].
    pub fn with_handoff(generator: G, handoff: Handoff) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self {
            generator,
            state,
            seed: Mutex::new(handoff),
        }
    }

    /// Sends a user message and appends the reply.
    ///
    /// This method:
    /// 1. Appends the trimmed text as a user message and marks the session busy
    /// 2. Asks the generator for a reply
    /// 3. Appends the reply as an assistant message and clears the busy flag
    ///
    /// # Errors
    ///
    /// Returns `Error::Validation` if `text` is blank and `Error::Busy` if a reply is still
    /// pending.  In both cases the transcript is left untouched.
    pub async fn submit(&self, text: &str) -> Result<()> {
        let text = text.trim();
        self.begin_turn(text)?;
        self.finish_turn(text).await;
        Ok(())
    }

    /// Sends the handoff message this session was created with, at most once.
    ///
    /// Returns `Ok(true)` if this call sent the seed and `Ok(false)` if there was none or it was
    /// already sent.  Calling this repeatedly is harmless.
    ///
    /// # Errors
    ///
    /// Returns `Error::Busy` if a reply is pending; the seed stays pending for a later call.
    /// A blank seed is consumed and reported as `Error::Validation`.
    pub async fn process_seed(&self) -> Result<bool> {
        let text = {
            let mut seed = self.seed.lock().unwrap_or_else(PoisonError::into_inner);
            let Some(text) = seed.peek() else {
                return Ok(false);
            };
            let text = text.trim().to_string();
            if let Err(err) = self.begin_turn(&text) {
                if err.is_validation() {
                    seed.consume();
                }
                return Err(err);
            }
            seed.consume();
            SESSION_SEEDS_CONSUMED.click();
            text
        };
        self.finish_turn(&text).await;
        Ok(true)
    }

    /// True if the handoff message has not been sent yet.
    pub fn has_pending_seed(&self) -> bool {
        self.seed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_pending()
    }

    /// Returns a receiver that is notified on every change to the session state.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Returns a snapshot of the session state.
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Returns a copy of the transcript.
    pub fn messages(&self) -> Vec<Message> {
        self.state.borrow().messages.clone()
    }

    /// True while a reply is pending.
    pub fn is_busy(&self) -> bool {
        self.state.borrow().busy
    }

    /// Returns the number of messages in the conversation.
    pub fn len(&self) -> usize {
        self.state.borrow().len()
    }

    /// True if the conversation is empty.
    pub fn is_empty(&self) -> bool {
        self.state.borrow().is_empty()
    }

    fn begin_turn(&self, text: &str) -> Result<()> {
        if text.is_empty() {
            SESSION_REJECTIONS.click();
            return Err(Error::validation(
                "message is empty",
                Some("text".to_string()),
            ));
        }
        let mut accepted = false;
        self.state.send_if_modified(|state| {
            if state.busy {
                return false;
            }
            state.messages.push(Message::user(text));
            state.busy = true;
            accepted = true;
            true
        });
        if !accepted {
            SESSION_REJECTIONS.click();
            log::debug!("rejected submission while a reply is pending");
            return Err(Error::busy("a reply is still pending"));
        }
        SESSION_SUBMISSIONS.click();
        log::debug!("turn started ({} chars)", text.chars().count());
        Ok(())
    }

    async fn finish_turn(&self, text: &str) {
        let start = Instant::now();
        let turn = PendingTurn {
            state: &self.state,
            finished: false,
        };
        let reply = self.generator.generate(text).await;
        turn.finish(Message::assistant(reply));
        SESSION_TURN_DURATION.add(start.elapsed().as_secs_f64());
    }
}

/// Clears the busy flag when a turn ends, however it ends.
struct PendingTurn<'a> {
    state: &'a watch::Sender<SessionState>,
    finished: bool,
}

impl PendingTurn<'_> {
    fn finish(mut self, reply: Message) {
        self.state.send_modify(|state| {
            state.messages.push(reply);
            state.busy = false;
        });
        self.finished = true;
        log::debug!("turn finished");
    }
}

impl Drop for PendingTurn<'_> {
    fn drop(&mut self) {
        if !self.finished {
            log::warn!("turn abandoned before a reply arrived");
            self.state
                .send_if_modified(|state| std::mem::replace(&mut state.busy, false));
        }
    }
}
