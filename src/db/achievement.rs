use crate::{errors::MyError, models::Achievement};

use super::JsonStore;

pub enum Filter {
    Unconfirmed,
    Student(i64),
}

fn same_key(achievement: &Achievement, student_id: i64, event_id: &str) -> bool {
    achievement.student_id == student_id && achievement.event_id == event_id
}

pub async fn create(achievement: Achievement, store: &JsonStore) -> Result<u64, MyError> {
    store
        .update(|data| {
            let duplicate = data
                .achievements
                .iter()
                .any(|a| same_key(a, achievement.student_id, &achievement.event_id));
            if duplicate {
                return Err(MyError::AlreadyExists);
            }
            data.achievements.push(achievement);
            Ok(1)
        })
        .await
}

pub async fn get(student_id: i64, event_id: &str, store: &JsonStore) -> Result<Achievement, MyError> {
    let res = store
        .read(|data| {
            data.achievements
                .iter()
                .find(|a| same_key(a, student_id, event_id))
                .cloned()
        })
        .await;
    match res {
        Some(achievement) => Ok(achievement),
        None => Err(MyError::AchievementNotFound),
    }
}

pub async fn filter(filter: Filter, store: &JsonStore) -> Vec<Achievement> {
    store
        .read(|data| {
            data.achievements
                .iter()
                .filter(|a| match &filter {
                    Filter::Unconfirmed => !a.confirmed,
                    Filter::Student(id) => a.student_id == *id,
                })
                .cloned()
                .collect()
        })
        .await
}

pub async fn confirm(student_id: i64, event_id: &str, store: &JsonStore) -> Result<u64, MyError> {
    store
        .update(|data| {
            match data
                .achievements
                .iter_mut()
                .find(|a| same_key(a, student_id, event_id))
            {
                Some(achievement) => {
                    achievement.confirmed = true;
                    Ok(1)
                }
                None => Err(MyError::AchievementNotFound),
            }
        })
        .await
}

pub async fn delete(student_id: i64, event_id: &str, store: &JsonStore) -> Result<u64, MyError> {
    store
        .update(|data| {
            let before = data.achievements.len();
            data.achievements.retain(|a| !same_key(a, student_id, event_id));
            match before - data.achievements.len() {
                0 => Err(MyError::AchievementNotFound),
                removed => Ok(removed as u64),
            }
        })
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::temp_store;

    fn achievement(student_id: i64, event_id: &str) -> Achievement {
        Achievement {
            student_id,
            event_id: event_id.into(),
            place: "2-е место".into(),
            date: chrono::Local::now().naive_local(),
            confirmed: false,
        }
    }

    #[actix_rt::test]
    async fn one_achievement_per_student_and_event() {
        let (_dir, store) = temp_store().await;
        assert_eq!(create(achievement(1, "e1"), &store).await, Ok(1));
        assert_eq!(create(achievement(1, "e1"), &store).await, Err(MyError::AlreadyExists));
        assert_eq!(create(achievement(2, "e1"), &store).await, Ok(1));
        assert_eq!(store.load().await.achievements.len(), 2);
    }

    #[actix_rt::test]
    async fn confirm_and_deny() {
        let (_dir, store) = temp_store().await;
        create(achievement(1, "e1"), &store).await.unwrap();
        create(achievement(1, "e2"), &store).await.unwrap();

        confirm(1, "e1", &store).await.unwrap();
        assert!(get(1, "e1", &store).await.unwrap().confirmed);
        assert_eq!(filter(Filter::Unconfirmed, &store).await.len(), 1);

        assert_eq!(delete(1, "e2", &store).await, Ok(1));
        assert_eq!(get(1, "e2", &store).await, Err(MyError::AchievementNotFound));
        assert_eq!(confirm(1, "e2", &store).await, Err(MyError::AchievementNotFound));
        assert_eq!(filter(Filter::Student(1), &store).await.len(), 1);
    }
}
