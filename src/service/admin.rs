use log::info;

use crate::{
    db::{self, JsonStore},
    errors::MyError,
    models::{Admin, Student},
};

pub const STUDENTS_PER_PAGE: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentPage {
    pub page: usize,
    /// 1-based position of the first student on this page
    pub first_number: usize,
    pub students: Vec<Student>,
    pub has_prev: bool,
    pub has_next: bool,
}

/// `None` when the page is past the end of the list.
pub async fn students_page(page: usize, store: &JsonStore) -> Option<StudentPage> {
    let (students, total) = db::student::get_page(page, STUDENTS_PER_PAGE, store).await;
    if students.is_empty() {
        return None;
    }
    let start = page * STUDENTS_PER_PAGE;
    Some(StudentPage {
        page,
        first_number: start + 1,
        has_prev: page > 0,
        has_next: start + students.len() < total,
        students,
    })
}

/// Copies the student into the admin list. `AlreadyExists` if already there.
pub async fn promote(telegram_id: i64, store: &JsonStore) -> Result<Admin, MyError> {
    let student = db::student::get_by_id(telegram_id, store).await?;
    let admin = Admin::from(&student);
    db::admin::create(admin.clone(), store).await?;
    info!("student {} promoted to admin", telegram_id);
    Ok(admin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::temp_store;

    async fn seed(count: i64, store: &JsonStore) {
        for id in 1..=count {
            db::student::create(
                Student {
                    telegram_id: id,
                    first_name: format!("F{id}"),
                    last_name: format!("L{id}"),
                    group_number: "G".into(),
                },
                store,
            )
            .await
            .unwrap();
        }
    }

    #[actix_rt::test]
    async fn seven_students_make_three_pages() {
        let (_dir, store) = temp_store().await;
        seed(7, &store).await;

        let first = students_page(0, &store).await.unwrap();
        let second = students_page(1, &store).await.unwrap();
        let last = students_page(2, &store).await.unwrap();
        assert_eq!(
            [first.students.len(), second.students.len(), last.students.len()],
            [3, 3, 1]
        );
        assert!(!first.has_prev && first.has_next);
        assert!(second.has_prev && second.has_next);
        assert!(last.has_prev && !last.has_next);
        assert_eq!(last.first_number, 7);
        assert_eq!(students_page(3, &store).await, None);
    }

    #[actix_rt::test]
    async fn exact_multiple_has_no_trailing_page() {
        let (_dir, store) = temp_store().await;
        seed(6, &store).await;
        assert!(!students_page(1, &store).await.unwrap().has_next);
    }

    #[actix_rt::test]
    async fn promote_copies_student_once() {
        let (_dir, store) = temp_store().await;
        seed(2, &store).await;
        let admin = promote(2, &store).await.unwrap();
        assert_eq!(admin.last_name, "L2");
        assert_eq!(promote(2, &store).await, Err(MyError::AlreadyExists));
        assert_eq!(promote(9, &store).await, Err(MyError::StudentNotFound));
        assert_eq!(db::admin::get_all(&store).await.len(), 1);
    }
}
