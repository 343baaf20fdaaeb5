pub mod admin;
pub mod event;
pub mod student;
pub mod webhook;

use std::sync::Arc;

use log::{debug, error, warn};

use crate::{
    db::JsonStore,
    dto::Callback,
    errors::MyError,
    ru,
    service::{
        auth::{Authorizer, Capabilities},
        dialogue::{Dialogue, Outcome, Transition},
        report::{split_message, MESSAGE_LIMIT},
        session::{Lookup, SessionStore},
    },
    transport::{Incoming, InlineKeyboard, Messenger},
};

/// Everything a handler needs. Cheap to clone.
#[derive(Clone)]
pub struct BotContext {
    pub store: Arc<JsonStore>,
    pub sessions: Arc<SessionStore>,
    pub messenger: Arc<dyn Messenger>,
    pub authorizer: Arc<dyn Authorizer>,
}

impl BotContext {
    /// Sends `text`, split into several messages if needed; the keyboard goes
    /// with the last one.
    pub async fn reply(&self, chat_id: i64, text: &str, keyboard: Option<InlineKeyboard>) -> Result<(), MyError> {
        let chunks = split_message(text, MESSAGE_LIMIT);
        let last = chunks.len().saturating_sub(1);
        for (i, chunk) in chunks.iter().enumerate() {
            let markup = if i == last { keyboard.as_ref() } else { None };
            self.messenger.send_message(chat_id, chunk, markup).await?;
        }
        Ok(())
    }

    /// Starts a dialogue, dropping whatever the user was in the middle of in this chat.
    pub async fn begin(
        &self,
        chat_id: i64,
        user_id: i64,
        (dialogue, prompt): (Dialogue, &'static str),
    ) -> Result<(), MyError> {
        debug!("chat {} user {}: {} dialogue started", chat_id, user_id, dialogue.name());
        self.sessions.put((chat_id, user_id), dialogue);
        self.reply(chat_id, prompt, None).await
    }

    pub async fn remove_menu(&self, chat_id: i64, message_id: i64) {
        if let Err(err) = self.messenger.delete_message(chat_id, message_id).await {
            debug!("could not delete message {} in chat {}: {}", message_id, chat_id, err);
        }
    }
}

pub async fn dispatch(ctx: &BotContext, incoming: Incoming) {
    let chat_id = incoming.chat_id();
    debug!("chat {}: update from user {}", chat_id, incoming.user_id());
    let res = match incoming {
        Incoming::Text { chat_id, user_id, text } => on_text(ctx, chat_id, user_id, &text).await,
        Incoming::Callback { id, chat_id, user_id, message_id, data } => {
            if let Err(err) = ctx.messenger.answer_callback(&id).await {
                debug!("answer to callback {} failed: {}", id, err);
            }
            on_callback(ctx, chat_id, user_id, message_id, &data).await
        }
    };
    if let Err(err) = res {
        let text = match err {
            MyError::Unauthorized => ru::NOT_ADMIN,
            MyError::StudentNotFound => ru::REGISTER_FIRST,
            MyError::EventNotFound => ru::EVENT_NOT_FOUND,
            MyError::AchievementNotFound => ru::ACHIEVEMENT_NOT_FOUND,
            MyError::TransportError => {
                warn!("chat {}: reply could not be delivered", chat_id);
                return;
            }
            _ => {
                error!("[{:} : {:}] HANDLER ERROR in chat {}: {:?}", file!(), line!(), chat_id, err);
                ru::INTERNAL_ERROR
            }
        };
        if let Err(err) = ctx.messenger.send_message(chat_id, text, None).await {
            warn!("chat {}: error notice not delivered: {}", chat_id, err);
        }
    }
}

async fn on_text(ctx: &BotContext, chat_id: i64, user_id: i64, text: &str) -> Result<(), MyError> {
    let command = text.trim().split_whitespace().next().unwrap_or_default();
    // "/start@some_bot" in group chats
    let command = command.split('@').next().unwrap_or_default();
    match command {
        "/start" => {
            ctx.sessions.cancel((chat_id, user_id));
            return student::send_welcome(ctx, chat_id).await;
        }
        "/cancel" => {
            let reply = match ctx.sessions.cancel((chat_id, user_id)) {
                Some(dialogue) => {
                    debug!("chat {}: {} dialogue cancelled", chat_id, dialogue.name());
                    ru::DIALOGUE_CANCELLED
                }
                None => ru::NOTHING_TO_CANCEL,
            };
            return ctx.reply(chat_id, reply, None).await;
        }
        "/admin" => {
            if !ctx.authorizer.is_admin(user_id).await {
                return Err(MyError::Unauthorized);
            }
            ctx.sessions.cancel((chat_id, user_id));
            return admin::send_menu(ctx, chat_id).await;
        }
        _ => {}
    }

    match ctx.sessions.take((chat_id, user_id)) {
        Lookup::Active(dialogue) => continue_dialogue(ctx, chat_id, user_id, dialogue, text).await,
        Lookup::Expired => ctx.reply(chat_id, ru::DIALOGUE_EXPIRED, None).await,
        Lookup::Empty => ctx.reply(chat_id, ru::UNKNOWN_INPUT, None).await,
    }
}

async fn continue_dialogue(
    ctx: &BotContext,
    chat_id: i64,
    user_id: i64,
    dialogue: Dialogue,
    text: &str,
) -> Result<(), MyError> {
    match dialogue.advance(text) {
        Transition::Next(next, prompt) => {
            ctx.sessions.put((chat_id, user_id), next);
            ctx.reply(chat_id, prompt, None).await
        }
        Transition::Retry(same, prompt) => {
            debug!("chat {}: {} input rejected", chat_id, same.name());
            ctx.sessions.put((chat_id, user_id), same);
            ctx.reply(chat_id, prompt, None).await
        }
        Transition::Done(outcome) => match outcome {
            Outcome::Registered(profile) => student::complete_registration(ctx, chat_id, user_id, profile).await,
            Outcome::ProfileEdited(profile) => student::complete_profile_edit(ctx, chat_id, user_id, profile).await,
            Outcome::EventReported(event) => event::complete_report(ctx, chat_id, user_id, event).await,
            Outcome::AchievementSubmitted(dto) => event::complete_achievement(ctx, chat_id, user_id, dto).await,
            Outcome::EventEdited { event_id, fields } => {
                admin::complete_event_edit(ctx, chat_id, user_id, &event_id, fields).await
            }
        },
    }
}

async fn on_callback(ctx: &BotContext, chat_id: i64, user_id: i64, message_id: i64, data: &str) -> Result<(), MyError> {
    let callback: Callback = match data.parse() {
        Ok(callback) => callback,
        Err(_) => {
            debug!("chat {}: unknown callback data {:?}", chat_id, data);
            return Ok(());
        }
    };
    if callback.is_admin() {
        ctx.authorizer
            .check(user_id, Capabilities::required_for(&callback))
            .await?;
        return admin::handle(ctx, chat_id, user_id, callback).await;
    }
    match callback {
        Callback::MyStatistics => student::statistics(ctx, chat_id, user_id).await,
        Callback::MyInfo => {
            ctx.remove_menu(chat_id, message_id).await;
            student::my_info(ctx, chat_id, user_id).await
        }
        Callback::EditInfo => {
            ctx.remove_menu(chat_id, message_id).await;
            student::start_profile_edit(ctx, chat_id, user_id).await
        }
        Callback::MyEvents => student::my_events(ctx, chat_id, user_id).await,
        Callback::ExportMyEvents => student::export_my_events(ctx, chat_id, user_id).await,
        Callback::BackToStatistics => {
            ctx.remove_menu(chat_id, message_id).await;
            student::send_statistics_options(ctx, chat_id).await
        }
        Callback::BackToWelcome => {
            ctx.remove_menu(chat_id, message_id).await;
            student::send_welcome(ctx, chat_id).await
        }
        Callback::ShowAchievements => event::choose_achievement_event(ctx, chat_id, user_id).await,
        Callback::SelectEvent(event_id) => event::start_achievement(ctx, chat_id, user_id, event_id).await,
        Callback::UpcomingEvents => event::send_events_menu(ctx, chat_id).await,
        Callback::GetEvents => event::upcoming(ctx, chat_id).await,
        Callback::ReportEvent => ctx.begin(chat_id, user_id, Dialogue::report_event()).await,
        admin_only => {
            warn!("callback {} reached the student router", admin_only);
            Ok(())
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use crate::{db, service::event::get_upcoming};

    async fn say(ctx: &BotContext, user_id: i64, answers: &[&str]) {
        for answer in answers {
            dispatch(ctx, text(user_id, answer)).await;
        }
    }

    #[actix_rt::test]
    async fn reported_event_reaches_students_after_confirmation() {
        let (_dir, ctx, messenger) = context().await;
        let reporter = 7;

        dispatch(&ctx, press(reporter, Callback::ReportEvent)).await;
        say(
            &ctx,
            reporter,
            &["Hack Day", "Хакатон на сутки", "2030-01-01", "Hall A", "https://forms.example/hack", "локальный", "хакатон"],
        )
        .await;
        assert_eq!(messenger.last().text, ru::EVENT_SAVED);
        assert!(get_upcoming(&ctx.store).await.is_empty());

        dispatch(&ctx, press(ADMIN, Callback::ApproveEvents)).await;
        let list = messenger.last();
        assert!(list.text.contains("1. Hack Day"));
        let event_id = db::event::get_all(&ctx.store).await[0].id.clone();
        assert!(list.keyboard.unwrap().has_callback(&Callback::ReviewEvent(event_id.clone())));

        dispatch(&ctx, press(ADMIN, Callback::ConfirmEvent(event_id.clone()))).await;
        let sent = messenger.take();
        assert!(sent.iter().any(|m| m.text == "Мероприятие подтверждено."));

        dispatch(&ctx, press(reporter, Callback::GetEvents)).await;
        let upcoming = messenger.last();
        assert!(upcoming.text.contains("Название: Hack Day"));
        assert!(upcoming.text.contains("Место: Hall A"));
        assert!(upcoming.text.contains("Дата: 2030-01-01"));
    }

    #[actix_rt::test]
    async fn bad_date_is_asked_again() {
        let (_dir, ctx, messenger) = context().await;
        dispatch(&ctx, press(7, Callback::ReportEvent)).await;
        say(&ctx, 7, &["Title", "Desc", "1 января"]).await;
        assert_eq!(messenger.last().text, ru::BAD_DATE);
        say(&ctx, 7, &["2025-02-30"]).await;
        assert_eq!(messenger.last().text, ru::ASK_LOCATION);
    }

    #[actix_rt::test]
    async fn cancel_and_start_drop_the_dialogue() {
        let (_dir, ctx, messenger) = context().await;
        dispatch(&ctx, press(7, Callback::ReportEvent)).await;
        dispatch(&ctx, text(7, "/cancel")).await;
        assert_eq!(messenger.last().text, ru::DIALOGUE_CANCELLED);
        dispatch(&ctx, text(7, "Hack Day")).await;
        assert_eq!(messenger.last().text, ru::UNKNOWN_INPUT);

        dispatch(&ctx, press(7, Callback::ReportEvent)).await;
        dispatch(&ctx, text(7, "/start")).await;
        assert!(ctx.sessions.is_empty());
    }

    #[actix_rt::test]
    async fn new_flow_replaces_the_old_one() {
        let (_dir, ctx, messenger) = context().await;
        dispatch(&ctx, press(7, Callback::ReportEvent)).await;
        dispatch(&ctx, text(7, "Hack Day")).await;
        dispatch(&ctx, press(7, Callback::MyStatistics)).await;
        say(&ctx, 7, &["Анна", "Петрова", "Б-21"]).await;
        assert!(messenger.take().iter().any(|m| m.text == ru::REGISTERED));
        assert!(db::event::get_all(&ctx.store).await.is_empty());
    }

    #[actix_rt::test]
    async fn group_members_cannot_answer_each_others_dialogue() {
        let (_dir, ctx, messenger) = context().await;
        let group = -100;
        let in_group = |user_id: i64, text: &str| Incoming::Text {
            chat_id: group,
            user_id,
            text: text.to_string(),
        };
        dispatch(
            &ctx,
            Incoming::Callback {
                id: "cb".to_string(),
                chat_id: group,
                user_id: 7,
                message_id: 1,
                data: Callback::ReportEvent.to_string(),
            },
        )
        .await;

        dispatch(&ctx, in_group(8, "Hijacked")).await;
        assert_eq!(messenger.last().text, ru::UNKNOWN_INPUT);
        dispatch(&ctx, in_group(8, "/cancel")).await;
        assert_eq!(messenger.last().text, ru::NOTHING_TO_CANCEL);

        dispatch(&ctx, in_group(7, "Hack Day")).await;
        assert_eq!(messenger.last().text, ru::ASK_DESCRIPTION);
        assert_eq!(ctx.sessions.len(), 1);
    }

    #[actix_rt::test]
    async fn admin_callbacks_are_refused_to_students() {
        let (_dir, ctx, messenger) = context().await;
        dispatch(&ctx, press(7, Callback::ViewStudents(0))).await;
        assert_eq!(messenger.last().text, ru::NOT_ADMIN);
        dispatch(&ctx, text(7, "/admin")).await;
        assert_eq!(messenger.last().text, ru::NOT_ADMIN);
    }

    #[actix_rt::test]
    async fn garbage_callback_is_ignored() {
        let (_dir, ctx, messenger) = context().await;
        dispatch(&ctx, press(7, "definitely_not_a_button")).await;
        assert!(messenger.take().is_empty());
    }
}
