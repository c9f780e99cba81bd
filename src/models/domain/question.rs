use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: i64,
    pub content: String,
    pub options: Vec<String>,
    pub correct_option: i32,
}

/// A question that has not been assigned an id yet. Also the shape of the
/// seed file entries.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewQuestion {
    pub content: String,
    pub options: Vec<String>,
    pub correct_option: i32,
}

impl NewQuestion {
    pub fn with_id(self, id: i64) -> Question {
        Question {
            id,
            content: self.content,
            options: self.options,
            correct_option: self.correct_option,
        }
    }
}
