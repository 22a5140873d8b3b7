//! Command handler module: turns bot commands into store operations and
//! replies.

use std::sync::Arc;

use fluent_bundle::FluentValue;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing::{debug, error, info, warn};

use crate::errors::{Result, ShoppingError};
use crate::localization::{t_args_lang, t_lang};
use crate::polls::{PollTracker, TrackedPoll};
use crate::store::ItemStore;
use crate::transport::Messenger;

use super::commands::Command;
use super::ui_builder::{build_poll_options, format_page_question};

/// Where a command came from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandContext {
    pub chat_id: i64,
    pub language_code: Option<String>,
}

impl CommandContext {
    pub fn new(chat_id: i64, language_code: Option<&str>) -> Self {
        Self {
            chat_id,
            language_code: language_code.map(str::to_string),
        }
    }

    fn lang(&self) -> Option<&str> {
        self.language_code.as_deref()
    }
}

/// Routes commands to the item store and the poll tracker
pub struct CommandDispatcher<M> {
    store: Arc<ItemStore>,
    polls: PollTracker,
    messenger: M,
}

impl<M: Messenger> CommandDispatcher<M> {
    pub fn new(store: Arc<ItemStore>, messenger: M) -> Self {
        Self {
            store,
            polls: PollTracker::new(),
            messenger,
        }
    }

    pub fn store(&self) -> &Arc<ItemStore> {
        &self.store
    }

    pub fn polls(&self) -> &PollTracker {
        &self.polls
    }

    pub fn messenger(&self) -> &M {
        &self.messenger
    }

    pub async fn handle(&self, ctx: &CommandContext, command: Command) -> Result<()> {
        debug!(chat_id = ctx.chat_id, command = ?command, "Handling command");
        match command {
            Command::Add(text) => self.handle_add(ctx, &text).await,
            Command::List => self.handle_list(ctx).await,
            Command::Done => self.handle_done(ctx).await,
            Command::Wipe => self.handle_wipe(ctx).await,
            Command::Help | Command::Start => self.handle_help(ctx).await,
        }
    }

    async fn handle_add(&self, ctx: &CommandContext, text: &str) -> Result<()> {
        let added = self.store.add(ctx.chat_id, text).await;
        info!(chat_id = ctx.chat_id, added, "Items added to list");

        let reply = t_args_lang("items-added", [("count", FluentValue::from(added))], ctx.lang());
        self.messenger.send_text(ctx.chat_id, &reply).await
    }

    async fn handle_list(&self, ctx: &CommandContext) -> Result<()> {
        let pages = self.store.get_all(ctx.chat_id).await;

        if pages.is_empty() {
            return self
                .messenger
                .send_text(ctx.chat_id, &t_lang("list-empty", ctx.lang()))
                .await;
        }

        // a poll needs at least two options
        if let [page] = pages.as_slice() {
            if let [item] = page.as_slice() {
                let reply =
                    t_args_lang("list-single", [("item", FluentValue::from(item.as_str()))], ctx.lang());
                return self.messenger.send_text(ctx.chat_id, &reply).await;
            }
        }

        let total = pages.len();
        let mut sent = Vec::with_capacity(total);
        let mut failure = None;

        for (index, page) in pages.into_iter().enumerate() {
            let question = format_page_question(index + 1, total, ctx.lang());
            let options = build_poll_options(&page);
            match self.messenger.send_poll(ctx.chat_id, &question, &options).await {
                Ok(handle) => sent.push(TrackedPoll {
                    handle,
                    items: page,
                }),
                Err(e) => {
                    error!(chat_id = ctx.chat_id, page = index + 1, error = %e, "Failed to send poll");
                    failure = Some(e);
                    break;
                }
            }
        }

        let sent_count = sent.len();
        let superseded = self.polls.begin_listing(ctx.chat_id, sent).await;
        self.close_stale_polls(ctx.chat_id, superseded).await;

        if let Some(e) = failure {
            return Err(e);
        }

        info!(chat_id = ctx.chat_id, polls = sent_count, "List sent");
        self.messenger
            .send_text(ctx.chat_id, &t_lang("list-done-hint", ctx.lang()))
            .await
    }

    async fn handle_done(&self, ctx: &CommandContext) -> Result<()> {
        let tracked = self.polls.take(ctx.chat_id).await;

        if tracked.is_empty() {
            debug!(chat_id = ctx.chat_id, "Done without open polls");
            return self
                .messenger
                .send_text(ctx.chat_id, &t_lang("done-nothing-pending", ctx.lang()))
                .await;
        }

        let mut removed = 0usize;
        let mut failure: Option<ShoppingError> = None;

        for poll in tracked {
            let tallies = match self.messenger.stop_poll(poll.handle).await {
                Ok(tallies) => tallies,
                Err(e) => {
                    error!(
                        chat_id = ctx.chat_id,
                        message_id = poll.handle.message_id,
                        error = %e,
                        "Failed to stop poll"
                    );
                    failure.get_or_insert(e);
                    continue;
                }
            };

            for (item, tally) in poll.items.iter().zip(&tallies) {
                if tally.voter_count > 0 && self.store.remove(ctx.chat_id, item).await {
                    removed += 1;
                }
            }
        }

        info!(chat_id = ctx.chat_id, removed, "Bought items removed");

        if let Some(e) = failure {
            return Err(e);
        }

        let reply = t_args_lang("done-removed", [("count", FluentValue::from(removed))], ctx.lang());
        self.messenger.send_text(ctx.chat_id, &reply).await
    }

    async fn handle_wipe(&self, ctx: &CommandContext) -> Result<()> {
        self.store.wipe(ctx.chat_id).await;
        let stale = self.polls.take(ctx.chat_id).await;
        self.close_stale_polls(ctx.chat_id, stale).await;

        info!(chat_id = ctx.chat_id, "List wiped");
        self.messenger
            .send_text(ctx.chat_id, &t_lang("list-wiped", ctx.lang()))
            .await
    }

    async fn handle_help(&self, ctx: &CommandContext) -> Result<()> {
        let help_message = format!(
            "{}\n\n{}",
            t_lang("help-title", ctx.lang()),
            Command::descriptions()
        );
        self.messenger.send_text(ctx.chat_id, &help_message).await
    }

    /// Close polls that no longer belong to a listing, ignoring their votes.
    async fn close_stale_polls(&self, chat_id: i64, stale: Vec<TrackedPoll>) {
        for poll in stale {
            if let Err(e) = self.messenger.stop_poll(poll.handle).await {
                warn!(
                    chat_id,
                    message_id = poll.handle.message_id,
                    error = %e,
                    "Failed to close superseded poll"
                );
            }
        }
    }
}

/// Teloxide endpoint for parsed commands.
///
/// Handler failures are logged and swallowed so the dispatcher keeps
/// processing later updates.
pub async fn command_handler<M: Messenger>(
    msg: Message,
    cmd: Command,
    dispatcher: Arc<CommandDispatcher<M>>,
) -> ResponseResult<()> {
    let language_code = msg
        .from
        .as_ref()
        .and_then(|user| user.language_code.as_deref());
    let ctx = CommandContext::new(msg.chat.id.0, language_code);

    if let Err(e) = dispatcher.handle(&ctx, cmd).await {
        let state = dispatcher.polls().state(ctx.chat_id).await;
        error!(chat_id = ctx.chat_id, state = ?state, error = %e, "Command failed");
    }
    Ok(())
}
