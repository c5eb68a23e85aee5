use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeacherRecord {
    pub id: String,
    pub name: String,
    pub contact: Option<String>,
    pub subject: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTeacherRequest {
    /// Generated when omitted.
    pub id: Option<String>,
    pub name: String,
    pub contact: Option<String>,
    pub subject: Option<String>,
}
