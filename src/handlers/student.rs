use log::{debug, error};

use super::BotContext;
use crate::{
    dto::{Callback, ProfileDto},
    errors::MyError,
    ru,
    service::{self, dialogue::Dialogue, report},
    transport::{Document, InlineKeyboard},
};

pub fn welcome_keyboard() -> InlineKeyboard {
    InlineKeyboard::new()
        .row("Моя статистика", Callback::MyStatistics)
        .row("Известные мероприятия", Callback::UpcomingEvents)
}

pub async fn send_welcome(ctx: &BotContext, chat_id: i64) -> Result<(), MyError> {
    ctx.reply(chat_id, ru::WELCOME_TEXT, Some(welcome_keyboard())).await
}

pub async fn send_statistics_options(ctx: &BotContext, chat_id: i64) -> Result<(), MyError> {
    let keyboard = InlineKeyboard::new()
        .row("Похвастаться", Callback::ShowAchievements)
        .row("Мои мероприятия", Callback::MyEvents)
        .row("Информация обо мне", Callback::MyInfo)
        .row("Изменить информацию о себе", Callback::EditInfo)
        .row("Назад", Callback::BackToWelcome);
    ctx.reply(chat_id, "Что делаем в этот раз?", Some(keyboard)).await
}

/// Unregistered users are walked through registration instead.
pub async fn statistics(ctx: &BotContext, chat_id: i64, user_id: i64) -> Result<(), MyError> {
    if service::student::is_registered(user_id, &ctx.store).await {
        return send_statistics_options(ctx, chat_id).await;
    }
    ctx.reply(chat_id, ru::REGISTER_TO_CONTINUE, None).await?;
    ctx.begin(chat_id, user_id, Dialogue::register()).await
}

pub async fn my_info(ctx: &BotContext, chat_id: i64, user_id: i64) -> Result<(), MyError> {
    let res = service::student::get_by_id(user_id, &ctx.store).await;
    match res {
        Ok(student) => {
            let keyboard = InlineKeyboard::new().row("Назад", Callback::BackToStatistics);
            ctx.reply(chat_id, &report::profile(&student), Some(keyboard)).await
        }
        Err(MyError::StudentNotFound) => ctx.reply(chat_id, ru::PROFILE_NOT_FOUND, None).await,
        Err(err) => Err(err),
    }
}

pub async fn start_profile_edit(ctx: &BotContext, chat_id: i64, user_id: i64) -> Result<(), MyError> {
    if !service::student::is_registered(user_id, &ctx.store).await {
        return ctx.reply(chat_id, ru::PROFILE_NOT_FOUND, None).await;
    }
    ctx.begin(chat_id, user_id, Dialogue::edit_profile()).await
}

pub async fn my_events(ctx: &BotContext, chat_id: i64, user_id: i64) -> Result<(), MyError> {
    let events = service::student::get_events(user_id, &ctx.store).await?;
    let mut keyboard = InlineKeyboard::new();
    if !events.is_empty() {
        keyboard = keyboard.row("Скачать документ", Callback::ExportMyEvents);
    }
    keyboard = keyboard.row("Назад", Callback::BackToStatistics);
    ctx.reply(chat_id, &report::my_events(&events), Some(keyboard)).await
}

pub async fn export_my_events(ctx: &BotContext, chat_id: i64, user_id: i64) -> Result<(), MyError> {
    let student = service::student::get_by_id(user_id, &ctx.store).await?;
    let events = service::student::get_events(user_id, &ctx.store).await?;
    if events.is_empty() {
        return ctx.reply(chat_id, "Нет мероприятий для выгрузки.", None).await;
    }
    let document = Document {
        file_name: "my_events.txt".to_string(),
        caption: format!("Мероприятия: {}", student.full_name()),
        content: report::my_events(&events).into_bytes(),
    };
    match ctx.messenger.send_document(chat_id, document).await {
        Ok(_) => Ok(()),
        Err(err) => {
            error!("[{:} : {:}] EXPORT ERROR for {}: {:?}", file!(), line!(), user_id, err);
            ctx.reply(chat_id, "Произошла ошибка при генерации отчета.", None).await
        }
    }
}

pub async fn complete_registration(
    ctx: &BotContext,
    chat_id: i64,
    user_id: i64,
    profile: ProfileDto,
) -> Result<(), MyError> {
    let res = service::student::register(user_id, profile, &ctx.store).await;
    match res {
        Ok(_) => {
            ctx.reply(chat_id, ru::REGISTERED, None).await?;
            send_statistics_options(ctx, chat_id).await
        }
        Err(MyError::AlreadyExists) => {
            debug!("student {} tried to register twice", user_id);
            ctx.reply(chat_id, ru::ALREADY_REGISTERED, None).await
        }
        Err(err) => Err(err),
    }
}

pub async fn complete_profile_edit(
    ctx: &BotContext,
    chat_id: i64,
    user_id: i64,
    profile: ProfileDto,
) -> Result<(), MyError> {
    let res = service::student::update_profile(user_id, profile, &ctx.store).await;
    match res {
        Ok(_) => {
            ctx.reply(chat_id, ru::PROFILE_UPDATED, None).await?;
            send_statistics_options(ctx, chat_id).await
        }
        Err(MyError::StudentNotFound) => ctx.reply(chat_id, ru::PROFILE_NOT_FOUND, None).await,
        Err(err) => Err(err),
    }
}
