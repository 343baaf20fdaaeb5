use crate::{dto::ProfileDto, errors::MyError, models::Student};

use super::JsonStore;

pub async fn create(student: Student, store: &JsonStore) -> Result<u64, MyError> {
    store
        .update(|data| {
            if data.students.iter().any(|s| s.telegram_id == student.telegram_id) {
                return Err(MyError::AlreadyExists);
            }
            data.students.push(student);
            Ok(1)
        })
        .await
}

pub async fn get_by_id(telegram_id: i64, store: &JsonStore) -> Result<Student, MyError> {
    let res = store
        .read(|data| {
            data.students
                .iter()
                .find(|s| s.telegram_id == telegram_id)
                .cloned()
        })
        .await;
    match res {
        Some(student) => Ok(student),
        None => Err(MyError::StudentNotFound),
    }
}

pub async fn get_all(store: &JsonStore) -> Vec<Student> {
    store.read(|data| data.students.clone()).await
}

pub async fn exists(telegram_id: i64, store: &JsonStore) -> bool {
    store
        .read(|data| data.students.iter().any(|s| s.telegram_id == telegram_id))
        .await
}

/// One page of students in registration order plus the total count.
pub async fn get_page(page: usize, per_page: usize, store: &JsonStore) -> (Vec<Student>, usize) {
    store
        .read(|data| {
            let page_items = data
                .students
                .iter()
                .skip(page * per_page)
                .take(per_page)
                .cloned()
                .collect();
            (page_items, data.students.len())
        })
        .await
}

pub async fn set_fields(telegram_id: i64, fields: ProfileDto, store: &JsonStore) -> Result<u64, MyError> {
    store
        .update(|data| {
            match data.students.iter_mut().find(|s| s.telegram_id == telegram_id) {
                Some(student) => {
                    student.first_name = fields.first_name;
                    student.last_name = fields.last_name;
                    student.group_number = fields.group_number;
                    Ok(1)
                }
                None => Err(MyError::StudentNotFound),
            }
        })
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::temp_store;

    fn student(id: i64, last_name: &str) -> Student {
        Student {
            telegram_id: id,
            first_name: "Olga".into(),
            last_name: last_name.into(),
            group_number: "M-11".into(),
        }
    }

    #[actix_rt::test]
    async fn second_registration_is_rejected() {
        let (_dir, store) = temp_store().await;
        assert_eq!(create(student(7, "Ivanova"), &store).await, Ok(1));
        assert_eq!(create(student(7, "Sidorova"), &store).await, Err(MyError::AlreadyExists));

        let all = get_all(&store).await;
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].last_name, "Ivanova");
    }

    #[actix_rt::test]
    async fn set_fields_overwrites_profile() {
        let (_dir, store) = temp_store().await;
        create(student(7, "Ivanova"), &store).await.unwrap();
        let fields = ProfileDto {
            first_name: "Olga".into(),
            last_name: "Petrova".into(),
            group_number: "M-12".into(),
        };
        assert_eq!(set_fields(7, fields.clone(), &store).await, Ok(1));
        assert_eq!(get_by_id(7, &store).await.unwrap().group_number, "M-12");
        assert_eq!(set_fields(8, fields, &store).await, Err(MyError::StudentNotFound));
    }

    #[actix_rt::test]
    async fn pages_cover_all_students() {
        let (_dir, store) = temp_store().await;
        for id in 1..=7 {
            create(student(id, &format!("S{id}")), &store).await.unwrap();
        }
        let sizes: Vec<usize> = futures::future::join_all((0..3).map(|p| get_page(p, 3, &store)))
            .await
            .into_iter()
            .map(|(page, total)| {
                assert_eq!(total, 7);
                page.len()
            })
            .collect();
        assert_eq!(sizes, vec![3, 3, 1]);
        assert!(get_page(3, 3, &store).await.0.is_empty());
    }
}
