use crate::{
    dto,
    errors::MyError,
    models::{is_iso_date, Activity},
};

use super::JsonStore;

pub enum Filter {
    Unconfirmed,
    Confirmed,
    /// well-formed date on or after the given `YYYY-MM-DD`
    FromDate(String),
    /// confirmed and `FromDate`
    Upcoming(String),
}

impl Filter {
    fn matches(&self, event: &Activity) -> bool {
        match self {
            Filter::Unconfirmed => !event.confirmed,
            Filter::Confirmed => event.confirmed,
            Filter::FromDate(today) => is_iso_date(&event.date) && event.date.as_str() >= today.as_str(),
            Filter::Upcoming(today) => {
                event.confirmed && is_iso_date(&event.date) && event.date.as_str() >= today.as_str()
            }
        }
    }
}

pub async fn create(event: Activity, store: &JsonStore) -> Result<u64, MyError> {
    store
        .update(|data| {
            if data.activities.iter().any(|a| a.id == event.id) {
                return Err(MyError::AlreadyExists);
            }
            data.activities.push(event);
            Ok(1)
        })
        .await
}

pub async fn get_by_id(id: &str, store: &JsonStore) -> Result<Activity, MyError> {
    let res = store
        .read(|data| data.activities.iter().find(|a| a.id == id).cloned())
        .await;
    match res {
        Some(event) => Ok(event),
        None => Err(MyError::EventNotFound),
    }
}

pub async fn get_all(store: &JsonStore) -> Vec<Activity> {
    store.read(|data| data.activities.clone()).await
}

pub async fn exists(id: &str, store: &JsonStore) -> bool {
    store.read(|data| data.activities.iter().any(|a| a.id == id)).await
}

pub async fn filter(filter: Filter, store: &JsonStore) -> Vec<Activity> {
    store
        .read(|data| {
            data.activities
                .iter()
                .filter(|a| filter.matches(a))
                .cloned()
                .collect()
        })
        .await
}

pub async fn set_fields(id: &str, event_fields: dto::UpdateEventDto, store: &JsonStore) -> Result<u64, MyError> {
    store
        .update(|data| match data.activities.iter_mut().find(|a| a.id == id) {
            Some(event) => Ok(event_fields.apply(event) as u64),
            None => Err(MyError::EventNotFound),
        })
        .await
}

pub async fn confirm(id: &str, store: &JsonStore) -> Result<u64, MyError> {
    store
        .update(|data| match data.activities.iter_mut().find(|a| a.id == id) {
            Some(event) => {
                event.confirmed = true;
                Ok(1)
            }
            None => Err(MyError::EventNotFound),
        })
        .await
}

/// Removes the event. Achievements pointing at it are left in place.
pub async fn delete(id: &str, store: &JsonStore) -> Result<u64, MyError> {
    store
        .update(|data| {
            let before = data.activities.len();
            data.activities.retain(|a| a.id != id);
            match before - data.activities.len() {
                0 => Err(MyError::EventNotFound),
                removed => Ok(removed as u64),
            }
        })
        .await
}
