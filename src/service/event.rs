use log::info;

use crate::{
   db::{self, event::Filter, JsonStore},
   dto::{NewEventDto, UpdateEventDto},
   errors::MyError,
   models::Activity,
};

/// Local calendar date as `YYYY-MM-DD`.
pub fn today() -> String {
   chrono::Local::now().format("%Y-%m-%d").to_string()
}

pub async fn create(submitter_id: i64, dto: NewEventDto, store: &JsonStore) -> Result<Activity, MyError> {
   let event = Activity {
      id: uuid::Uuid::new_v4().to_string(),
      title: dto.title,
      description: dto.description,
      date: dto.date,
      location: dto.location,
      survey_link: dto.survey_link,
      event_level: Some(dto.event_level),
      event_category: Some(dto.event_category),
      confirmed: false,
      submitter_id,
   };
   let res = db::event::create(event.clone(), store)
      .await;
   match res {
      Ok(_) => {
         info!("event {} reported by {}", event.id, submitter_id);
         Ok(event)
      },
      Err(err) => Err(err)
   }
}

pub async fn get_by_id(id: &str, store: &JsonStore) -> Result<Activity, MyError> {
   db::event::get_by_id(id, store).await
}

pub async fn get_upcoming(store: &JsonStore) -> Vec<Activity> {
   db::event::filter(Filter::Upcoming(today()), store).await
}

/// Everything dated today or later, confirmed or not.
pub async fn get_editable(store: &JsonStore) -> Vec<Activity> {
   db::event::filter(Filter::FromDate(today()), store).await
}

pub async fn get_unconfirmed(store: &JsonStore) -> Vec<Activity> {
   db::event::filter(Filter::Unconfirmed, store).await
}

pub async fn get_confirmed(store: &JsonStore) -> Vec<Activity> {
   db::event::filter(Filter::Confirmed, store).await
}

pub async fn confirm(id: &str, store: &JsonStore) -> Result<u64, MyError> {
   let res = db::event::confirm(id, store).await;
   if res.is_ok() {
      info!("event {} confirmed", id);
   }
   res
}

/// Denial and deletion are the same thing: the event is removed.
pub async fn delete(id: &str, store: &JsonStore) -> Result<u64, MyError> {
   let res = db::event::delete(id, store).await;
   if res.is_ok() {
      info!("event {} deleted", id);
   }
   res
}

pub async fn update(id: &str, event_fields: UpdateEventDto, store: &JsonStore) -> Result<u64, MyError> {
   let res = db::event::set_fields(id, event_fields, store)
      .await;
   match res {
      Ok(fields) => {
         info!("event {} updated, {} fields", id, fields);
         Ok(fields)
      },
      Err(err) => Err(err)
   }
}
