//! Multi-step data entry.
//!
//! A dialogue is an explicit state plus the answers collected so far. Each
//! incoming text goes through [`Dialogue::advance`], which either moves to the
//! next step, asks for the same step again, or finishes with an [`Outcome`]
//! that the caller persists in one go. Nothing is written before the last step.

use crate::{
    dto::{NewAchievementDto, NewEventDto, ProfileDto, UpdateEventDto},
    models::is_iso_date,
    ru,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileStep {
    FirstName,
    LastName,
    Group,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventStep {
    Title,
    Description,
    Date,
    Location,
    SurveyLink,
    Level,
    Category,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileDraft {
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventDraft {
    pub title: String,
    pub description: String,
    pub date: String,
    pub location: String,
    pub survey_link: Option<String>,
    pub event_level: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dialogue {
    Register { step: ProfileStep, draft: ProfileDraft },
    EditProfile { step: ProfileStep, draft: ProfileDraft },
    ReportEvent { step: EventStep, draft: EventDraft },
    EditEvent { event_id: String, step: EventStep, draft: EventDraft },
    Achievement { event_id: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Registered(ProfileDto),
    ProfileEdited(ProfileDto),
    EventReported(NewEventDto),
    EventEdited { event_id: String, fields: UpdateEventDto },
    AchievementSubmitted(NewAchievementDto),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// keep the new state and send the prompt for its step
    Next(Dialogue, &'static str),
    /// input rejected, same step again
    Retry(Dialogue, &'static str),
    Done(Outcome),
}

impl Dialogue {
    pub fn register() -> (Self, &'static str) {
        (
            Dialogue::Register { step: ProfileStep::FirstName, draft: ProfileDraft::default() },
            ru::ASK_FIRST_NAME,
        )
    }

    pub fn edit_profile() -> (Self, &'static str) {
        (
            Dialogue::EditProfile { step: ProfileStep::FirstName, draft: ProfileDraft::default() },
            ru::ASK_NEW_FIRST_NAME,
        )
    }

    pub fn report_event() -> (Self, &'static str) {
        (
            Dialogue::ReportEvent { step: EventStep::Title, draft: EventDraft::default() },
            ru::ASK_TITLE,
        )
    }

    pub fn edit_event(event_id: String) -> (Self, &'static str) {
        (
            Dialogue::EditEvent { event_id, step: EventStep::Title, draft: EventDraft::default() },
            ru::ASK_NEW_TITLE,
        )
    }

    pub fn achievement(event_id: String) -> (Self, &'static str) {
        (Dialogue::Achievement { event_id }, ru::ASK_PLACE)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Dialogue::Register { .. } => "registration",
            Dialogue::EditProfile { .. } => "profile edit",
            Dialogue::ReportEvent { .. } => "event report",
            Dialogue::EditEvent { .. } => "event edit",
            Dialogue::Achievement { .. } => "achievement",
        }
    }

    pub fn advance(self, input: &str) -> Transition {
        let input = input.trim();
        match self {
            Dialogue::Register { step, draft } => profile_step(step, draft, input, false),
            Dialogue::EditProfile { step, draft } => profile_step(step, draft, input, true),
            Dialogue::ReportEvent { step, draft } => event_step(None, step, draft, input),
            Dialogue::EditEvent { event_id, step, draft } => event_step(Some(event_id), step, draft, input),
            Dialogue::Achievement { event_id } => {
                if input.is_empty() {
                    Transition::Retry(Dialogue::Achievement { event_id }, ru::EMPTY_PLACE)
                } else {
                    Transition::Done(Outcome::AchievementSubmitted(NewAchievementDto {
                        event_id,
                        place: input.to_string(),
                    }))
                }
            }
        }
    }
}

fn profile_step(step: ProfileStep, mut draft: ProfileDraft, input: &str, editing: bool) -> Transition {
    let wrap = move |step, draft| {
        if editing {
            Dialogue::EditProfile { step, draft }
        } else {
            Dialogue::Register { step, draft }
        }
    };
    match step {
        ProfileStep::FirstName => {
            if input.is_empty() {
                return Transition::Retry(wrap(step, draft), ru::EMPTY_FIRST_NAME);
            }
            draft.first_name = input.to_string();
            let prompt = if editing { ru::ASK_NEW_LAST_NAME } else { ru::ASK_LAST_NAME };
            Transition::Next(wrap(ProfileStep::LastName, draft), prompt)
        }
        ProfileStep::LastName => {
            if input.is_empty() {
                return Transition::Retry(wrap(step, draft), ru::EMPTY_LAST_NAME);
            }
            draft.last_name = input.to_string();
            let prompt = if editing { ru::ASK_NEW_GROUP } else { ru::ASK_GROUP };
            Transition::Next(wrap(ProfileStep::Group, draft), prompt)
        }
        ProfileStep::Group => {
            if input.is_empty() {
                return Transition::Retry(wrap(step, draft), ru::EMPTY_GROUP);
            }
            let profile = ProfileDto {
                first_name: draft.first_name,
                last_name: draft.last_name,
                group_number: input.to_string(),
            };
            if editing {
                Transition::Done(Outcome::ProfileEdited(profile))
            } else {
                Transition::Done(Outcome::Registered(profile))
            }
        }
    }
}

fn event_prompt(step: EventStep, editing: bool) -> &'static str {
    match (step, editing) {
        (EventStep::Title, false) => ru::ASK_TITLE,
        (EventStep::Description, false) => ru::ASK_DESCRIPTION,
        (EventStep::Date, false) => ru::ASK_DATE,
        (EventStep::Location, false) => ru::ASK_LOCATION,
        (EventStep::SurveyLink, false) => ru::ASK_SURVEY_LINK,
        (EventStep::Level, false) => ru::ASK_LEVEL,
        (EventStep::Category, false) => ru::ASK_CATEGORY,
        (EventStep::Title, true) => ru::ASK_NEW_TITLE,
        (EventStep::Description, true) => ru::ASK_NEW_DESCRIPTION,
        (EventStep::Date, true) => ru::ASK_NEW_DATE,
        (EventStep::Location, true) => ru::ASK_NEW_LOCATION,
        (EventStep::SurveyLink, true) => ru::ASK_NEW_SURVEY_LINK,
        (EventStep::Level, true) => ru::ASK_NEW_LEVEL,
        (EventStep::Category, true) => ru::ASK_NEW_CATEGORY,
    }
}

fn event_step(event_id: Option<String>, step: EventStep, mut draft: EventDraft, input: &str) -> Transition {
    let editing = event_id.is_some();
    let wrap = |step, draft| match event_id.clone() {
        Some(event_id) => Dialogue::EditEvent { event_id, step, draft },
        None => Dialogue::ReportEvent { step, draft },
    };
    let (rejection, next) = match step {
        EventStep::Title => (input.is_empty().then_some(ru::EMPTY_TITLE), EventStep::Description),
        EventStep::Description => (None, EventStep::Date),
        EventStep::Date => ((!is_iso_date(input)).then_some(ru::BAD_DATE), EventStep::Location),
        EventStep::Location => (input.is_empty().then_some(ru::EMPTY_LOCATION), EventStep::SurveyLink),
        // an admin may clear the link, a reporter has to give one
        EventStep::SurveyLink => ((!editing && input.is_empty()).then_some(ru::EMPTY_SURVEY_LINK), EventStep::Level),
        EventStep::Level => (input.is_empty().then_some(ru::EMPTY_LEVEL), EventStep::Category),
        EventStep::Category => (input.is_empty().then_some(ru::EMPTY_CATEGORY), EventStep::Category),
    };
    if let Some(prompt) = rejection {
        return Transition::Retry(wrap(step, draft), prompt);
    }

    match step {
        EventStep::Title => draft.title = input.to_string(),
        EventStep::Description => draft.description = input.to_string(),
        EventStep::Date => draft.date = input.to_string(),
        EventStep::Location => draft.location = input.to_string(),
        EventStep::SurveyLink => {
            draft.survey_link = match input {
                "" => None,
                "-" if editing => None,
                link => Some(link.to_string()),
            }
        }
        EventStep::Level => draft.event_level = input.to_string(),
        EventStep::Category => {
            let event = NewEventDto {
                title: draft.title,
                description: draft.description,
                date: draft.date,
                location: draft.location,
                survey_link: draft.survey_link,
                event_level: draft.event_level,
                event_category: input.to_string(),
            };
            return Transition::Done(match event_id {
                Some(event_id) => Outcome::EventEdited { event_id, fields: event.into() },
                None => Outcome::EventReported(event),
            });
        }
    }
    Transition::Next(wrap(next, draft), event_prompt(next, editing))
}
