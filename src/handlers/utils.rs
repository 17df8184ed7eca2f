use chrono::{DateTime, NaiveDate};
use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, MessageId};

use crate::api::types::{Comment, Material, MaterialId};
use crate::handlers::actions::CallbackAction;
use crate::handlers::reply::Reply;

/// Экранирование MarkdownV2
pub fn escape_markdown_v2(text: &str) -> String {
    let specials = ['_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!'];
    let mut out = String::with_capacity(text.len() * 2);

    for ch in text.chars() {
        if specials.contains(&ch) {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Дата в виде ДД.ММ.ГГГГ; нераспознанное значение выводится как есть
pub fn format_date(raw: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.date_naive().format("%d.%m.%Y").to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.format("%d.%m.%Y").to_string();
    }
    raw.to_string()
}

/// В тексте из БД переносы иногда хранятся как литерал "\n"
fn unescape_newlines(text: &str) -> String {
    text.replace("\\n", "\n")
}

pub fn format_material(material: &Material) -> String {
    [
        format!("📚 Предмет: {}", material.subject),
        format!("👨‍🏫 Преподаватель: {}", material.lecturer),
        format!("📖 Тема: {}", material.title),
        format!("📅 Дата лекции: {}", format_date(&material.date)),
        String::new(),
        "📝 Содержание:".to_string(),
        unescape_newlines(&material.content),
        String::new(),
        "📋 Домашнее задание:".to_string(),
        unescape_newlines(&material.homework),
        format!("⏳ Срок сдачи: {}", format_date(&material.homework_due)),
    ]
    .join("\n")
}

pub fn format_comments(material_id: MaterialId, comments: &[Comment]) -> String {
    if comments.is_empty() {
        return "Комментариев пока нет.".to_string();
    }

    let mut text = format!("💬 Комментарии к материалу #{}:\n", material_id);
    for comment in comments {
        text.push_str(&format!(
            "\n👤 {} ({})\n{}\n",
            comment.user_email,
            format_date(&comment.created_at),
            comment.text
        ));
        if let Some(file) = &comment.file_path {
            text.push_str(&format!("📎 Файл: {}\n", file));
        }
    }
    text
}

fn button(label: &str, action: CallbackAction) -> InlineKeyboardButton {
    InlineKeyboardButton::callback(label, action.data())
}

/// Кнопка отмены под каждым шагом сценария
pub fn cancel_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![button("Отмена", CallbackAction::Cancel)]])
}

/// Панель администратора
pub fn admin_panel_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![button("➕ Добавить материал", CallbackAction::AddMaterial)],
        vec![button("📋 Список материалов", CallbackAction::ListMaterials)],
    ])
}

pub fn material_keyboard(id: MaterialId, is_admin: bool) -> InlineKeyboardMarkup {
    let mut keyboard = Vec::new();

    if is_admin {
        keyboard.push(vec![
            button("✏️ Редактировать", CallbackAction::Edit(id)),
            button("🗑 Удалить", CallbackAction::Delete(id)),
        ]);
    }
    keyboard.push(vec![
        button("💬 Комментарии", CallbackAction::Comments(id)),
        button("✍️ Комментировать", CallbackAction::Comment(id)),
    ]);

    InlineKeyboardMarkup::new(keyboard)
}

/// Лимит Telegram на длину текста сообщения (в UTF-16 единицах)
pub const MESSAGE_LIMIT: usize = 4096;

/// Обрезает слишком длинный текст, помечая обрыв многоточием
pub fn fit_message(text: String) -> String {
    if text.encode_utf16().count() <= MESSAGE_LIMIT {
        return text;
    }

    let mut out = String::new();
    let mut units = 0;
    for ch in text.chars() {
        units += ch.len_utf16();
        if units > MESSAGE_LIMIT - 1 {
            break;
        }
        out.push(ch);
    }
    out.push('…');
    out
}

/// Отправка ответов диспетчера: `edit` заменяет сообщение с кнопкой, если оно известно.
/// Ошибка одного сообщения логируется и не мешает отправить остальные.
pub async fn send_replies(
    bot: &Bot,
    chat_id: ChatId,
    origin: Option<MessageId>,
    replies: Vec<Reply>,
) {
    for reply in replies {
        let text = fit_message(reply.text);
        let result = match (reply.edit, origin) {
            (true, Some(message_id)) => {
                let mut request = bot.edit_message_text(chat_id, message_id, text);
                if let Some(markup) = reply.markup {
                    request = request.reply_markup(markup);
                }
                if let Some(mode) = reply.parse_mode {
                    request = request.parse_mode(mode);
                }
                request.await.map(|_| ())
            }
            _ => {
                let mut request = bot.send_message(chat_id, text);
                if let Some(markup) = reply.markup {
                    request = request.reply_markup(markup);
                }
                if let Some(mode) = reply.parse_mode {
                    request = request.parse_mode(mode);
                }
                request.await.map(|_| ())
            }
        };

        if let Err(e) = result {
            log::error!("Failed to deliver reply to chat {}: {}", chat_id, e);
        }
    }
}
