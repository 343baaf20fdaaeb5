use log::debug;

use super::BotContext;
use crate::{
   dto::{Callback, NewAchievementDto, NewEventDto},
   errors::MyError,
   ru,
   service::{self, dialogue::Dialogue, report},
   transport::InlineKeyboard,
};

pub async fn send_events_menu(ctx: &BotContext, chat_id: i64) -> Result<(), MyError> {
   let keyboard = InlineKeyboard::new()
      .row("Узнать о предстоящих мероприятиях", Callback::GetEvents)
      .row("Сообщить о мероприятии", Callback::ReportEvent)
      .row("Назад", Callback::BackToWelcome);
   ctx.reply(chat_id, "Так, куда дальше? Выбирай ниже 👇", Some(keyboard)).await
}

pub async fn upcoming(ctx: &BotContext, chat_id: i64) -> Result<(), MyError> {
   let events = service::event::get_upcoming(&ctx.store)
      .await;
   let keyboard = InlineKeyboard::new().row("Назад", Callback::UpcomingEvents);
   ctx.reply(chat_id, &report::upcoming_events(&events), Some(keyboard)).await
}

pub async fn complete_report(ctx: &BotContext, chat_id: i64, user_id: i64, dto: NewEventDto) -> Result<(), MyError> {
   let res = service::event::create(user_id, dto, &ctx.store)
      .await;
   match res {
      Ok(_) => ctx.reply(chat_id, ru::EVENT_SAVED, None).await,
      Err(err) => Err(err)
   }
}

/// Lists confirmed events to attach an achievement to.
pub async fn choose_achievement_event(ctx: &BotContext, chat_id: i64, user_id: i64) -> Result<(), MyError> {
   if !service::student::is_registered(user_id, &ctx.store).await {
      return Err(MyError::StudentNotFound);
   }
   let events = service::event::get_confirmed(&ctx.store)
      .await;
   if events.is_empty() {
      return ctx.reply(chat_id, "Нет мероприятий для выбора.", None).await;
   }
   let keyboard = events
      .iter()
      .fold(InlineKeyboard::new(), |keyboard, event| {
         keyboard.row(&event.title, Callback::SelectEvent(event.id.clone()))
      })
      .row("Назад", Callback::BackToStatistics);
   ctx.reply(chat_id, "Выберите мероприятие, в котором вы участвовали:", Some(keyboard)).await
}

pub async fn start_achievement(ctx: &BotContext, chat_id: i64, user_id: i64, event_id: String) -> Result<(), MyError> {
   if !service::student::is_registered(user_id, &ctx.store).await {
      return Err(MyError::StudentNotFound);
   }
   match service::event::get_by_id(&event_id, &ctx.store).await {
      Ok(event) if event.confirmed => ctx.begin(chat_id, user_id, Dialogue::achievement(event_id)).await,
      Ok(_) => Err(MyError::EventNotFound),
      Err(err) => Err(err)
   }
}

pub async fn complete_achievement(
   ctx: &BotContext,
   chat_id: i64,
   user_id: i64,
   dto: NewAchievementDto
) -> Result<(), MyError> {
   let res = service::achievement::submit(user_id, dto, &ctx.store)
      .await;
   match res {
      Ok(_) => ctx.reply(chat_id, ru::ACHIEVEMENT_SENT, None).await,
      Err(MyError::AlreadyExists) => {
         debug!("student {} repeated an achievement", user_id);
         ctx.reply(chat_id, ru::ACHIEVEMENT_DUPLICATE, None).await
      },
      Err(err) => Err(err)
   }
}

#[cfg(test)]
mod tests {
   use super::super::{dispatch, testing::*};
   use super::*;
   use crate::{
      db,
      models::{Activity, Student},
   };

   async fn seed(ctx: &BotContext) -> String {
      db::student::create(
         Student {
            telegram_id: 5,
            first_name: "Анна".into(),
            last_name: "Петрова".into(),
            group_number: "Б-21".into(),
         },
         &ctx.store,
      )
      .await
      .unwrap();
      for (id, title, confirmed) in [("e1", "Hack Day", true), ("e2", "Draft", false)] {
         db::event::create(
            Activity {
               id: id.into(),
               title: title.into(),
               description: String::new(),
               date: "2030-01-01".into(),
               location: "Hall A".into(),
               survey_link: None,
               event_level: None,
               event_category: None,
               confirmed,
               submitter_id: 1,
            },
            &ctx.store,
         )
         .await
         .unwrap();
      }
      "e1".to_string()
   }

   #[actix_rt::test]
   async fn achievement_flow_files_one_record() {
      let (_dir, ctx, messenger) = context().await;
      let event_id = seed(&ctx).await;

      dispatch(&ctx, press(5, Callback::ShowAchievements)).await;
      let keyboard = messenger.last().keyboard.unwrap();
      assert!(keyboard.has_callback(&Callback::SelectEvent(event_id.clone())));
      assert!(!keyboard.has_callback(&Callback::SelectEvent("e2".into())));

      dispatch(&ctx, press(5, Callback::SelectEvent(event_id.clone()))).await;
      assert_eq!(messenger.last().text, ru::ASK_PLACE);
      dispatch(&ctx, text(5, "1-е место")).await;
      assert_eq!(messenger.last().text, ru::ACHIEVEMENT_SENT);

      let stored = service::achievement::get(5, &event_id, &ctx.store).await.unwrap();
      assert_eq!(stored.place, "1-е место");
      assert!(!stored.confirmed);

      dispatch(&ctx, press(5, Callback::SelectEvent(event_id.clone()))).await;
      dispatch(&ctx, text(5, "2-е место")).await;
      assert_eq!(messenger.last().text, ru::ACHIEVEMENT_DUPLICATE);
   }

   #[actix_rt::test]
   async fn unconfirmed_event_cannot_be_selected() {
      let (_dir, ctx, messenger) = context().await;
      seed(&ctx).await;
      dispatch(&ctx, press(5, Callback::SelectEvent("e2".into()))).await;
      assert_eq!(messenger.last().text, ru::EVENT_NOT_FOUND);
      assert!(ctx.sessions.is_empty());
   }

   #[actix_rt::test]
   async fn strangers_must_register_before_bragging() {
      let (_dir, ctx, messenger) = context().await;
      dispatch(&ctx, press(9, Callback::ShowAchievements)).await;
      assert_eq!(messenger.last().text, ru::REGISTER_FIRST);
   }

   #[actix_rt::test]
   async fn upcoming_hides_unconfirmed_events() {
      let (_dir, ctx, messenger) = context().await;
      seed(&ctx).await;
      dispatch(&ctx, press(5, Callback::GetEvents)).await;
      let text = messenger.last().text;
      assert!(text.contains("Hack Day"));
      assert!(!text.contains("Draft"));
   }
}
