//! Bot commands understood by the shopping list

use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Supported commands:")]
pub enum Command {
    #[command(description = "add items, separated by commas or new lines.")]
    Add(String),
    #[command(description = "show the list as polls.")]
    List,
    #[command(description = "close the polls and remove the ticked items.")]
    Done,
    #[command(description = "clear the whole list.")]
    Wipe,
    #[command(description = "show this message.")]
    Help,
    #[command(description = "show this message.")]
    Start,
}
