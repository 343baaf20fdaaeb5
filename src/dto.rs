use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{errors::MyError, models::Activity};

/// Telegram refuses inline buttons whose callback data exceeds this many bytes.
pub const CALLBACK_DATA_LIMIT: usize = 64;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ProfileDto {
    pub first_name: String,
    pub last_name: String,
    pub group_number: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct NewEventDto {
    pub title: String,
    pub description: String,
    pub date: String,
    pub location: String,
    pub survey_link: Option<String>,
    pub event_level: String,
    pub event_category: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct NewAchievementDto {
    pub event_id: String,
    pub place: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct UpdateEventDto {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub location: Option<String>,
    pub survey_link: Option<Option<String>>,
    pub event_level: Option<String>,
    pub event_category: Option<String>,
}

impl UpdateEventDto {
    /// Writes every present field into `event`, returns how many were set.
    /// `id`, `confirmed` and `submitter_id` are never touched.
    pub fn apply(&self, event: &mut Activity) -> usize {
        let mut fields = 0;
        if let Some(v) = &self.title {
            event.title = v.to_string();
            fields += 1;
        }
        if let Some(v) = &self.description {
            event.description = v.to_string();
            fields += 1;
        }
        if let Some(v) = &self.date {
            event.date = v.to_string();
            fields += 1;
        }
        if let Some(v) = &self.location {
            event.location = v.to_string();
            fields += 1;
        }
        if let Some(v) = &self.survey_link {
            event.survey_link = v.clone();
            fields += 1;
        }
        if let Some(v) = &self.event_level {
            event.event_level = Some(v.to_string());
            fields += 1;
        }
        if let Some(v) = &self.event_category {
            event.event_category = Some(v.to_string());
            fields += 1;
        }
        fields
    }
}

impl From<NewEventDto> for UpdateEventDto {
    fn from(dto: NewEventDto) -> Self {
        Self {
            title: Some(dto.title),
            description: Some(dto.description),
            date: Some(dto.date),
            location: Some(dto.location),
            survey_link: Some(dto.survey_link),
            event_level: Some(dto.event_level),
            event_category: Some(dto.event_category),
        }
    }
}

/// Payload carried by inline buttons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Callback {
    MyStatistics,
    MyInfo,
    EditInfo,
    MyEvents,
    ExportMyEvents,
    ShowAchievements,
    SelectEvent(String),
    UpcomingEvents,
    GetEvents,
    ReportEvent,
    BackToWelcome,
    BackToStatistics,

    AdminMenu,
    ApproveEvents,
    ReviewEvent(String),
    ConfirmEvent(String),
    DenyEvent(String),
    ApproveAchievements,
    ReviewAchievement(i64, String),
    ConfirmAchievement(i64, String),
    DenyAchievement(i64, String),
    EditEvents,
    ViewEvent(String),
    EditEvent(String),
    DeleteEvent(String),
    ViewStudents(usize),
    SelectStudent(i64, usize),
    ConfirmAddAdmin(i64),
    ExportEventData,
    ExportUsers,
}

impl Callback {
    pub fn is_admin(&self) -> bool {
        matches!(
            self,
            Callback::AdminMenu
                | Callback::ApproveEvents
                | Callback::ReviewEvent(_)
                | Callback::ConfirmEvent(_)
                | Callback::DenyEvent(_)
                | Callback::ApproveAchievements
                | Callback::ReviewAchievement(..)
                | Callback::ConfirmAchievement(..)
                | Callback::DenyAchievement(..)
                | Callback::EditEvents
                | Callback::ViewEvent(_)
                | Callback::EditEvent(_)
                | Callback::DeleteEvent(_)
                | Callback::ViewStudents(_)
                | Callback::SelectStudent(..)
                | Callback::ConfirmAddAdmin(_)
                | Callback::ExportEventData
                | Callback::ExportUsers
        )
    }
}

impl fmt::Display for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callback::MyStatistics => write!(f, "my_statistics"),
            Callback::MyInfo => write!(f, "my_info"),
            Callback::EditInfo => write!(f, "edit_info"),
            Callback::MyEvents => write!(f, "my_events"),
            Callback::ExportMyEvents => write!(f, "export_my_events"),
            Callback::ShowAchievements => write!(f, "show_achievements"),
            Callback::SelectEvent(id) => write!(f, "select_event:{id}"),
            Callback::UpcomingEvents => write!(f, "upcoming_events"),
            Callback::GetEvents => write!(f, "get_events"),
            Callback::ReportEvent => write!(f, "report_event"),
            Callback::BackToWelcome => write!(f, "back_to_welcome"),
            Callback::BackToStatistics => write!(f, "back_to_statistics"),
            Callback::AdminMenu => write!(f, "admin_back"),
            Callback::ApproveEvents => write!(f, "approve_events"),
            Callback::ReviewEvent(id) => write!(f, "review_event:{id}"),
            Callback::ConfirmEvent(id) => write!(f, "confirm_event:{id}"),
            Callback::DenyEvent(id) => write!(f, "deny_event:{id}"),
            Callback::ApproveAchievements => write!(f, "approve_achievements"),
            Callback::ReviewAchievement(student, event) => write!(f, "review_ach:{student}:{event}"),
            Callback::ConfirmAchievement(student, event) => write!(f, "confirm_ach:{student}:{event}"),
            Callback::DenyAchievement(student, event) => write!(f, "deny_ach:{student}:{event}"),
            Callback::EditEvents => write!(f, "edit_events"),
            Callback::ViewEvent(id) => write!(f, "view_event:{id}"),
            Callback::EditEvent(id) => write!(f, "edit_event:{id}"),
            Callback::DeleteEvent(id) => write!(f, "delete_event:{id}"),
            Callback::ViewStudents(page) => write!(f, "view_students:{page}"),
            Callback::SelectStudent(id, page) => write!(f, "select_student:{id}:{page}"),
            Callback::ConfirmAddAdmin(id) => write!(f, "confirm_add:{id}"),
            Callback::ExportEventData => write!(f, "export_event_data"),
            Callback::ExportUsers => write!(f, "export_users"),
        }
    }
}

fn non_empty(arg: &str) -> Result<String, MyError> {
    if arg.is_empty() {
        Err(MyError::BadClientData)
    } else {
        Ok(arg.to_string())
    }
}

fn number<T: FromStr>(arg: &str) -> Result<T, MyError> {
    arg.parse::<T>().map_err(|_| MyError::BadClientData)
}

fn pair(arg: &str) -> Result<(i64, String), MyError> {
    match arg.split_once(':') {
        Some((student, event)) => Ok((number(student)?, non_empty(event)?)),
        None => Err(MyError::BadClientData),
    }
}

impl FromStr for Callback {
    type Err = MyError;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        let (name, arg) = match data.split_once(':') {
            Some((name, arg)) => (name, arg),
            None => (data, ""),
        };
        let callback = match name {
            "my_statistics" => Callback::MyStatistics,
            "my_info" => Callback::MyInfo,
            "edit_info" => Callback::EditInfo,
            "my_events" => Callback::MyEvents,
            "export_my_events" => Callback::ExportMyEvents,
            "show_achievements" => Callback::ShowAchievements,
            "select_event" => Callback::SelectEvent(non_empty(arg)?),
            "upcoming_events" => Callback::UpcomingEvents,
            "get_events" => Callback::GetEvents,
            "report_event" => Callback::ReportEvent,
            "back_to_welcome" => Callback::BackToWelcome,
            "back_to_statistics" => Callback::BackToStatistics,
            "admin_back" => Callback::AdminMenu,
            "approve_events" => Callback::ApproveEvents,
            "review_event" => Callback::ReviewEvent(non_empty(arg)?),
            "confirm_event" => Callback::ConfirmEvent(non_empty(arg)?),
            "deny_event" => Callback::DenyEvent(non_empty(arg)?),
            "approve_achievements" => Callback::ApproveAchievements,
            "review_ach" => {
                let (student, event) = pair(arg)?;
                Callback::ReviewAchievement(student, event)
            }
            "confirm_ach" => {
                let (student, event) = pair(arg)?;
                Callback::ConfirmAchievement(student, event)
            }
            "deny_ach" => {
                let (student, event) = pair(arg)?;
                Callback::DenyAchievement(student, event)
            }
            "edit_events" => Callback::EditEvents,
            "view_event" => Callback::ViewEvent(non_empty(arg)?),
            "edit_event" => Callback::EditEvent(non_empty(arg)?),
            "delete_event" => Callback::DeleteEvent(non_empty(arg)?),
            "view_students" => Callback::ViewStudents(number(arg)?),
            "select_student" => match arg.split_once(':') {
                Some((id, page)) => Callback::SelectStudent(number(id)?, number(page)?),
                None => return Err(MyError::BadClientData),
            },
            "confirm_add" => Callback::ConfirmAddAdmin(number(arg)?),
            "export_event_data" => Callback::ExportEventData,
            "export_users" => Callback::ExportUsers,
            _ => return Err(MyError::BadClientData),
        };
        Ok(callback)
    }
}
