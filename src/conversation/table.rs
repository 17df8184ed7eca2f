use crate::models::Field;

/// Строка таблицы переходов для поля материала
#[derive(Debug)]
pub struct FieldStep {
    pub field: Field,
    /// Вопрос при добавлении
    pub prompt: &'static str,
    /// Подпись текущего значения при редактировании
    pub current_label: &'static str,
    /// Вопрос при редактировании (перед подсказкой про "-")
    pub replace_prompt: &'static str,
}

/// Порядок строк = порядок опроса; следующий шаг — следующая строка
pub const FIELD_STEPS: [FieldStep; 7] = [
    FieldStep {
        field: Field::Subject,
        prompt: "Введите название предмета:",
        current_label: "Текущее название предмета",
        replace_prompt: "Введите новое название предмета",
    },
    FieldStep {
        field: Field::Lecturer,
        prompt: "Введите ФИО преподавателя:",
        current_label: "Текущее ФИО преподавателя",
        replace_prompt: "Введите новое ФИО",
    },
    FieldStep {
        field: Field::Title,
        prompt: "Введите название лекции:",
        current_label: "Текущее название лекции",
        replace_prompt: "Введите новое название",
    },
    FieldStep {
        field: Field::Content,
        prompt: "Введите текст лекции:",
        current_label: "Текущий текст лекции",
        replace_prompt: "Введите новый текст",
    },
    FieldStep {
        field: Field::Homework,
        prompt: "Введите домашнее задание:",
        current_label: "Текущее домашнее задание",
        replace_prompt: "Введите новое задание",
    },
    FieldStep {
        field: Field::Date,
        prompt: "Введите дату лекции (в формате ГГГГ-ММ-ДД):",
        current_label: "Текущая дата лекции",
        replace_prompt: "Введите новую дату (ГГГГ-ММ-ДД)",
    },
    FieldStep {
        field: Field::HomeworkDue,
        prompt: "Введите срок сдачи ДЗ (в формате ГГГГ-ММ-ДД):",
        current_label: "Текущий срок сдачи ДЗ",
        replace_prompt: "Введите новый срок (ГГГГ-ММ-ДД)",
    },
];

pub fn step(field: Field) -> &'static FieldStep {
    &FIELD_STEPS[field.index()]
}

pub fn next(field: Field) -> Option<Field> {
    FIELD_STEPS.get(field.index() + 1).map(|s| s.field)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn table_rows_follow_field_order() {
        let fields: Vec<Field> = FIELD_STEPS.iter().map(|s| s.field).collect();
        assert_eq!(fields, Field::ALL.to_vec());
    }

    #[test]
    fn every_field_but_last_has_successor() {
        for pair in Field::ALL.windows(2) {
            assert_eq!(next(pair[0]), Some(pair[1]));
        }
        assert_eq!(next(Field::HomeworkDue), None);
    }
}
