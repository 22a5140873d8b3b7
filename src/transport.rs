//! # Transport Module
//!
//! The outbound side of the bot: plain messages and polls. Handlers only
//! talk to the [`Messenger`] trait, which keeps them testable without a
//! Telegram connection.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{InputPollOption, MessageId};
use tracing::debug;

use crate::errors::Result;

/// Reference to a poll message that can be stopped later
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PollHandle {
    pub chat_id: i64,
    pub message_id: i32,
}

/// Final result of one poll option
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollTally {
    pub text: String,
    pub voter_count: u32,
}

#[async_trait]
pub trait Messenger: Send + Sync {
    /// Send a plain text message.
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<()>;

    /// Send a multiple-answer poll with 2 to 10 options.
    async fn send_poll(&self, chat_id: i64, question: &str, options: &[String]) -> Result<PollHandle>;

    /// Close a poll and return its options in the order they were sent.
    async fn stop_poll(&self, handle: PollHandle) -> Result<Vec<PollTally>>;
}

/// [`Messenger`] backed by the Telegram Bot API
#[derive(Clone)]
pub struct TelegramMessenger {
    bot: Bot,
}

impl TelegramMessenger {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Messenger for TelegramMessenger {
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<()> {
        self.bot.send_message(ChatId(chat_id), text).await?;
        Ok(())
    }

    async fn send_poll(&self, chat_id: i64, question: &str, options: &[String]) -> Result<PollHandle> {
        let sent = self
            .bot
            .send_poll(
                ChatId(chat_id),
                question,
                options.iter().map(|option| InputPollOption::new(option.clone())),
            )
            .allows_multiple_answers(true)
            .await?;

        debug!(chat_id, message_id = sent.id.0, options = options.len(), "Poll sent");
        Ok(PollHandle {
            chat_id,
            message_id: sent.id.0,
        })
    }

    async fn stop_poll(&self, handle: PollHandle) -> Result<Vec<PollTally>> {
        let poll = self
            .bot
            .stop_poll(ChatId(handle.chat_id), MessageId(handle.message_id))
            .await?;

        debug!(
            chat_id = handle.chat_id,
            message_id = handle.message_id,
            voters = poll.total_voter_count,
            "Poll stopped"
        );
        Ok(poll
            .options
            .into_iter()
            .map(|option| PollTally {
                text: option.text,
                voter_count: option.voter_count,
            })
            .collect())
    }
}
