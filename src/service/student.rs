use log::info;

use crate::{
    db::{self, achievement::Filter, JsonStore},
    dto::ProfileDto,
    errors::MyError,
    models::{Activity, Student},
};

pub async fn register(telegram_id: i64, dto: ProfileDto, store: &JsonStore) -> Result<u64, MyError> {
    let ProfileDto { first_name, last_name, group_number } = dto;
    let res = db::student::create(
        Student {
            telegram_id,
            first_name,
            last_name,
            group_number,
        },
        store,
    )
    .await;
    if res.is_ok() {
        info!("student {} registered", telegram_id);
    }
    res
}

pub async fn update_profile(telegram_id: i64, dto: ProfileDto, store: &JsonStore) -> Result<u64, MyError> {
    let res = db::student::set_fields(telegram_id, dto, store).await;
    if res.is_ok() {
        info!("student {} updated profile", telegram_id);
    }
    res
}

pub async fn get_by_id(telegram_id: i64, store: &JsonStore) -> Result<Student, MyError> {
    db::student::get_by_id(telegram_id, store).await
}

pub async fn is_registered(telegram_id: i64, store: &JsonStore) -> bool {
    db::student::exists(telegram_id, store).await
}

/// Events the student reported an achievement for, skipping deleted ones.
pub async fn get_events(telegram_id: i64, store: &JsonStore) -> Result<Vec<Activity>, MyError> {
    let student = db::student::get_by_id(telegram_id, store).await?;
    let achievements = db::achievement::filter(Filter::Student(student.telegram_id), store).await;
    let activities = db::event::get_all(store).await;
    let events = achievements
        .iter()
        .filter_map(|a| activities.iter().find(|e| e.id == a.event_id))
        .cloned()
        .collect();
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{db::testing::temp_store, models::Achievement};

    fn profile() -> ProfileDto {
        ProfileDto {
            first_name: "Ivan".into(),
            last_name: "Petrov".into(),
            group_number: "K-01".into(),
        }
    }

    #[actix_rt::test]
    async fn registering_twice_keeps_one_record() {
        let (_dir, store) = temp_store().await;
        assert_eq!(register(9, profile(), &store).await, Ok(1));
        assert_eq!(register(9, profile(), &store).await, Err(MyError::AlreadyExists));
        let ids: Vec<i64> = store.load().await.students.iter().map(|s| s.telegram_id).collect();
        assert_eq!(ids, vec![9]);
    }

    #[actix_rt::test]
    async fn events_skip_dangling_achievements() {
        let (_dir, store) = temp_store().await;
        register(9, profile(), &store).await.unwrap();
        store
            .update(|data| {
                data.activities.push(Activity {
                    id: "kept".into(),
                    title: "Kept".into(),
                    description: String::new(),
                    date: "2030-01-01".into(),
                    location: "Hall".into(),
                    survey_link: None,
                    event_level: None,
                    event_category: None,
                    confirmed: true,
                    submitter_id: 1,
                });
                for event_id in ["kept", "gone"] {
                    data.achievements.push(Achievement {
                        student_id: 9,
                        event_id: event_id.into(),
                        place: "1".into(),
                        date: chrono::Local::now().naive_local(),
                        confirmed: true,
                    });
                }
                Ok(())
            })
            .await
            .unwrap();

        let events = get_events(9, &store).await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, "kept");
        assert_eq!(get_events(10, &store).await, Err(MyError::StudentNotFound));
    }
}
