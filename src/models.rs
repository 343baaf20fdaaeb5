use chrono::NaiveDateTime;

/// Shape check for `YYYY-MM-DD`. Calendar validity is not checked, so
/// `2025-02-30` passes. Dates in this shape compare correctly as strings.
pub fn is_iso_date(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Student {
    pub telegram_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub group_number: String,
}

impl Student {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.last_name, self.first_name)
    }
}

/// Campus event. Stored under the `activities` key.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Activity {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// `YYYY-MM-DD`, checked for shape only
    pub date: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub survey_link: Option<String>,
    #[serde(default)]
    pub event_level: Option<String>,
    #[serde(default)]
    pub event_category: Option<String>,
    #[serde(default)]
    pub confirmed: bool,
    #[serde(default)]
    pub submitter_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Achievement {
    pub student_id: i64,
    pub event_id: String,
    pub place: String,
    pub date: NaiveDateTime,
    #[serde(default)]
    pub confirmed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Admin {
    pub telegram_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub group_number: String,
}

impl From<&Student> for Admin {
    fn from(student: &Student) -> Self {
        Self {
            telegram_id: student.telegram_id,
            first_name: student.first_name.clone(),
            last_name: student.last_name.clone(),
            group_number: student.group_number.clone(),
        }
    }
}

/// The whole persisted document. Missing keys load as empty collections.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Database {
    #[serde(default)]
    pub students: Vec<Student>,
    #[serde(default)]
    pub activities: Vec<Activity>,
    #[serde(default)]
    pub achievements: Vec<Achievement>,
    #[serde(default)]
    pub admins: Vec<Admin>,
}
