use teloxide::types::{InlineKeyboardMarkup, ParseMode};

/// Ответ пользователю, который диспетчер отдаёт слою Telegram
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub text: String,
    pub markup: Option<InlineKeyboardMarkup>,
    pub parse_mode: Option<ParseMode>,
    /// Заменить текст сообщения с нажатой кнопкой вместо нового сообщения
    pub edit: bool,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            markup: None,
            parse_mode: None,
            edit: false,
        }
    }

    pub fn with_markup(mut self, markup: InlineKeyboardMarkup) -> Self {
        self.markup = Some(markup);
        self
    }

    pub fn markdown(mut self) -> Self {
        self.parse_mode = Some(ParseMode::MarkdownV2);
        self
    }

    pub fn edit(mut self) -> Self {
        self.edit = true;
        self
    }
}
