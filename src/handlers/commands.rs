use teloxide::prelude::*;

use crate::handlers::dispatcher::{ChatUser, EventDispatcher};
use crate::handlers::utils::send_replies;
use crate::handlers::HandlerResult;
use crate::Command;

pub async fn command_handler(
    bot: Bot,
    msg: Message,
    cmd: Command,
    dispatcher: EventDispatcher,
) -> HandlerResult {
    let Some(from) = msg.from.as_ref() else {
        return Ok(());
    };

    let user = ChatUser::new(msg.chat.id, from.id, from.first_name.clone());
    let replies = dispatcher.handle_command(&user, cmd).await;
    send_replies(&bot, msg.chat.id, None, replies).await;
    Ok(())
}
