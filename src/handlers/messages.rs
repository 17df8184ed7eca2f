use teloxide::prelude::*;

use crate::handlers::dispatcher::{ChatUser, EventDispatcher};
use crate::handlers::reply::Reply;
use crate::handlers::utils::send_replies;
use crate::handlers::HandlerResult;

pub async fn message_handler(
    bot: Bot,
    msg: Message,
    dispatcher: EventDispatcher,
) -> HandlerResult {
    let Some(from) = msg.from.as_ref() else {
        return Ok(());
    };

    let replies = match msg.text() {
        Some(text) => {
            let user = ChatUser::new(msg.chat.id, from.id, from.first_name.clone());
            dispatcher.handle_text(&user, text).await
        }
        // Стикеры, фото и прочее сценарий не принимает
        None => vec![Reply::text("Отправьте текстовое сообщение. Список команд: /start")],
    };

    send_replies(&bot, msg.chat.id, None, replies).await;
    Ok(())
}
