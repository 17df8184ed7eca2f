use teloxide::prelude::*;

use crate::handlers::dispatcher::{ChatUser, EventDispatcher};
use crate::handlers::utils::send_replies;
use crate::handlers::HandlerResult;

pub async fn callback_handler(
    bot: Bot,
    q: CallbackQuery,
    dispatcher: EventDispatcher,
) -> HandlerResult {
    // Снимаем "часики" с кнопки сразу
    bot.answer_callback_query(q.id.clone()).await?;

    let Some(data) = q.data.as_deref() else {
        return Ok(());
    };

    let chat_id = q
        .message
        .as_ref()
        .map(|message| message.chat().id)
        .unwrap_or_else(|| ChatId::from(q.from.id));
    let origin = q.message.as_ref().map(|message| message.id());

    let user = ChatUser::new(chat_id, q.from.id, q.from.first_name.clone());
    let replies = dispatcher.handle_callback(&user, data).await;
    send_replies(&bot, chat_id, origin, replies).await;
    Ok(())
}
