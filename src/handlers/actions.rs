use crate::api::types::MaterialId;

/// Действия inline-кнопок. Идентификатор материала идёт после префикса.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackAction {
    Cancel,
    AddMaterial,
    ListMaterials,
    Edit(MaterialId),
    Delete(MaterialId),
    Comments(MaterialId),
    Comment(MaterialId),
}

const CANCEL: &str = "cancel_operation";
const ADD_MATERIAL: &str = "add_material";
const LIST_MATERIALS: &str = "list_materials";
const EDIT_PREFIX: &str = "edit_";
const DELETE_PREFIX: &str = "delete_";
const COMMENTS_PREFIX: &str = "comments_";
const COMMENT_PREFIX: &str = "comment_";

impl CallbackAction {
    pub fn parse(data: &str) -> Option<Self> {
        match data {
            CANCEL => Some(CallbackAction::Cancel),
            ADD_MATERIAL => Some(CallbackAction::AddMaterial),
            LIST_MATERIALS => Some(CallbackAction::ListMaterials),
            data if data.starts_with(EDIT_PREFIX) => {
                parse_id(&data[EDIT_PREFIX.len()..]).map(CallbackAction::Edit)
            }
            data if data.starts_with(DELETE_PREFIX) => {
                parse_id(&data[DELETE_PREFIX.len()..]).map(CallbackAction::Delete)
            }
            data if data.starts_with(COMMENTS_PREFIX) => {
                parse_id(&data[COMMENTS_PREFIX.len()..]).map(CallbackAction::Comments)
            }
            data if data.starts_with(COMMENT_PREFIX) => {
                parse_id(&data[COMMENT_PREFIX.len()..]).map(CallbackAction::Comment)
            }
            _ => None,
        }
    }

    pub fn data(&self) -> String {
        match self {
            CallbackAction::Cancel => CANCEL.to_string(),
            CallbackAction::AddMaterial => ADD_MATERIAL.to_string(),
            CallbackAction::ListMaterials => LIST_MATERIALS.to_string(),
            CallbackAction::Edit(id) => format!("{}{}", EDIT_PREFIX, id),
            CallbackAction::Delete(id) => format!("{}{}", DELETE_PREFIX, id),
            CallbackAction::Comments(id) => format!("{}{}", COMMENTS_PREFIX, id),
            CallbackAction::Comment(id) => format!("{}{}", COMMENT_PREFIX, id),
        }
    }
}

fn parse_id(raw: &str) -> Option<MaterialId> {
    raw.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_fixed_and_prefixed_actions() {
        assert_eq!(CallbackAction::parse("cancel_operation"), Some(CallbackAction::Cancel));
        assert_eq!(CallbackAction::parse("add_material"), Some(CallbackAction::AddMaterial));
        assert_eq!(CallbackAction::parse("list_materials"), Some(CallbackAction::ListMaterials));
        assert_eq!(CallbackAction::parse("edit_17"), Some(CallbackAction::Edit(17)));
        assert_eq!(CallbackAction::parse("delete_3"), Some(CallbackAction::Delete(3)));
        assert_eq!(CallbackAction::parse("comments_8"), Some(CallbackAction::Comments(8)));
        assert_eq!(CallbackAction::parse("comment_8"), Some(CallbackAction::Comment(8)));
    }

    #[test]
    fn rejects_unknown_or_malformed_data() {
        assert_eq!(CallbackAction::parse("select_ai_x"), None);
        assert_eq!(CallbackAction::parse("edit_"), None);
        assert_eq!(CallbackAction::parse("delete_abc"), None);
        assert_eq!(CallbackAction::parse(""), None);
    }

    #[test]
    fn data_matches_parser() {
        for action in [
            CallbackAction::Cancel,
            CallbackAction::Edit(5),
            CallbackAction::Comments(2),
            CallbackAction::Comment(2),
        ] {
            assert_eq!(CallbackAction::parse(&action.data()), Some(action));
        }
    }
}
