use log::info;

use crate::{
    db::{self, achievement::Filter, JsonStore},
    dto::NewAchievementDto,
    errors::MyError,
    models::Achievement,
};

/// Files an unconfirmed achievement. The student has to be registered and the
/// event has to exist and be confirmed.
pub async fn submit(student_id: i64, dto: NewAchievementDto, store: &JsonStore) -> Result<u64, MyError> {
    if !db::student::exists(student_id, store).await {
        return Err(MyError::StudentNotFound);
    }
    match db::event::get_by_id(&dto.event_id, store).await {
        Ok(event) if event.confirmed => {}
        _ => return Err(MyError::EventNotFound),
    }
    let achievement = Achievement {
        student_id,
        event_id: dto.event_id,
        place: dto.place,
        date: chrono::Local::now().naive_local(),
        confirmed: false,
    };
    let event_id = achievement.event_id.clone();
    let res = db::achievement::create(achievement, store).await;
    if res.is_ok() {
        info!("achievement submitted by {} for event {}", student_id, event_id);
    }
    res
}

/// Pending achievements with the event title, `None` when the event is gone.
pub async fn get_unconfirmed(store: &JsonStore) -> Vec<(Achievement, Option<String>)> {
    let pending = db::achievement::filter(Filter::Unconfirmed, store).await;
    let events = db::event::get_all(store).await;
    pending
        .into_iter()
        .map(|a| {
            let title = events.iter().find(|e| e.id == a.event_id).map(|e| e.title.clone());
            (a, title)
        })
        .collect()
}

pub async fn get(student_id: i64, event_id: &str, store: &JsonStore) -> Result<Achievement, MyError> {
    db::achievement::get(student_id, event_id, store).await
}

pub async fn confirm(student_id: i64, event_id: &str, store: &JsonStore) -> Result<u64, MyError> {
    let res = db::achievement::confirm(student_id, event_id, store).await;
    if res.is_ok() {
        info!("achievement {}:{} confirmed", student_id, event_id);
    }
    res
}

pub async fn deny(student_id: i64, event_id: &str, store: &JsonStore) -> Result<u64, MyError> {
    let res = db::achievement::delete(student_id, event_id, store).await;
    if res.is_ok() {
        info!("achievement {}:{} denied", student_id, event_id);
    }
    res
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::testing::temp_store,
        models::{Activity, Student},
    };

    async fn seed(store: &JsonStore) {
        store
            .update(|data| {
                data.students.push(Student {
                    telegram_id: 1,
                    first_name: "Ira".into(),
                    last_name: "Lis".into(),
                    group_number: "G".into(),
                });
                for (id, confirmed) in [("open", true), ("pending", false)] {
                    data.activities.push(Activity {
                        id: id.into(),
                        title: id.to_uppercase(),
                        description: String::new(),
                        date: "2030-01-01".into(),
                        location: "Hall".into(),
                        survey_link: None,
                        event_level: None,
                        event_category: None,
                        confirmed,
                        submitter_id: 1,
                    });
                }
                Ok(())
            })
            .await
            .unwrap();
    }

    fn dto(event_id: &str) -> NewAchievementDto {
        NewAchievementDto {
            event_id: event_id.into(),
            place: "3".into(),
        }
    }

    #[actix_rt::test]
    async fn submission_checks_student_and_event() {
        let (_dir, store) = temp_store().await;
        seed(&store).await;
        assert_eq!(submit(2, dto("open"), &store).await, Err(MyError::StudentNotFound));
        assert_eq!(submit(1, dto("pending"), &store).await, Err(MyError::EventNotFound));
        assert_eq!(submit(1, dto("missing"), &store).await, Err(MyError::EventNotFound));
        assert_eq!(submit(1, dto("open"), &store).await, Ok(1));
        assert!(!get(1, "open", &store).await.unwrap().confirmed);
    }

    #[actix_rt::test]
    async fn unconfirmed_list_tolerates_deleted_events() {
        let (_dir, store) = temp_store().await;
        seed(&store).await;
        submit(1, dto("open"), &store).await.unwrap();
        db::event::delete("open", &store).await.unwrap();

        let pending = get_unconfirmed(&store).await;
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].1, None);

        confirm(1, "open", &store).await.unwrap();
        assert!(get_unconfirmed(&store).await.is_empty());
        assert_eq!(deny(1, "open", &store).await, Ok(1));
        assert_eq!(deny(1, "open", &store).await, Err(MyError::AchievementNotFound));
    }
}
