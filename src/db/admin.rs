use crate::{errors::MyError, models::Admin};

use super::JsonStore;

pub async fn create(admin: Admin, store: &JsonStore) -> Result<u64, MyError> {
    store
        .update(|data| {
            if data.admins.iter().any(|a| a.telegram_id == admin.telegram_id) {
                return Err(MyError::AlreadyExists);
            }
            data.admins.push(admin);
            Ok(1)
        })
        .await
}

pub async fn exists(telegram_id: i64, store: &JsonStore) -> bool {
    store
        .read(|data| data.admins.iter().any(|a| a.telegram_id == telegram_id))
        .await
}

pub async fn get_all(store: &JsonStore) -> Vec<Admin> {
    store.read(|data| data.admins.clone()).await
}
