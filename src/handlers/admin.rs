//! Admin menu. Every callback routed here has already passed the
//! capability check in [`super::dispatch`].

use log::{error, info};

use super::BotContext;
use crate::{
    dto::{Callback, UpdateEventDto},
    errors::MyError,
    ru,
    service::{self, admin::StudentPage, auth::Capabilities, dialogue::Dialogue, report},
    transport::InlineKeyboard,
};

pub fn menu_keyboard() -> InlineKeyboard {
    InlineKeyboard::new()
        .row("Добавить администратора", Callback::ViewStudents(0))
        .row("Подтвердить мероприятия", Callback::ApproveEvents)
        .row("Подтвердить достижения студента", Callback::ApproveAchievements)
        .row("Редактировать мероприятия", Callback::EditEvents)
        .row("Выгрузка по мероприятиям", Callback::ExportEventData)
        .row("Выгрузка пользователей и их достижения", Callback::ExportUsers)
}

pub async fn send_menu(ctx: &BotContext, chat_id: i64) -> Result<(), MyError> {
    ctx.reply(chat_id, "Выберите действие:", Some(menu_keyboard())).await
}

fn back_to_menu() -> InlineKeyboard {
    InlineKeyboard::new().row("Назад", Callback::AdminMenu)
}

pub async fn handle(ctx: &BotContext, chat_id: i64, user_id: i64, callback: Callback) -> Result<(), MyError> {
    match callback {
        Callback::AdminMenu => send_menu(ctx, chat_id).await,

        Callback::ApproveEvents => list_unconfirmed_events(ctx, chat_id).await,
        Callback::ReviewEvent(id) => review_event(ctx, chat_id, &id).await,
        Callback::ConfirmEvent(id) => {
            service::event::confirm(&id, &ctx.store).await?;
            ctx.reply(chat_id, "Мероприятие подтверждено.", None).await?;
            list_unconfirmed_events(ctx, chat_id).await
        }
        Callback::DenyEvent(id) => {
            match service::event::delete(&id, &ctx.store).await {
                Ok(_) => {}
                Err(err) if err.is_not_found() => {}
                Err(err) => return Err(err),
            }
            ctx.reply(chat_id, "Мероприятие отклонено.", None).await?;
            list_unconfirmed_events(ctx, chat_id).await
        }

        Callback::ApproveAchievements => list_unconfirmed_achievements(ctx, chat_id).await,
        Callback::ReviewAchievement(student_id, event_id) => {
            review_achievement(ctx, chat_id, student_id, &event_id).await
        }
        Callback::ConfirmAchievement(student_id, event_id) => {
            service::achievement::confirm(student_id, &event_id, &ctx.store).await?;
            ctx.reply(chat_id, "Достижение успешно подтверждено!", None).await?;
            list_unconfirmed_achievements(ctx, chat_id).await
        }
        Callback::DenyAchievement(student_id, event_id) => {
            service::achievement::deny(student_id, &event_id, &ctx.store).await?;
            ctx.reply(chat_id, "Достижение отклонено.", None).await?;
            list_unconfirmed_achievements(ctx, chat_id).await
        }

        Callback::EditEvents => list_editable_events(ctx, chat_id).await,
        Callback::ViewEvent(id) => view_event(ctx, chat_id, &id).await,
        Callback::EditEvent(id) => {
            service::event::get_by_id(&id, &ctx.store).await?;
            ctx.begin(chat_id, user_id, Dialogue::edit_event(id)).await
        }
        Callback::DeleteEvent(id) => {
            service::event::delete(&id, &ctx.store).await?;
            ctx.reply(chat_id, "Мероприятие удалено.", None).await?;
            list_editable_events(ctx, chat_id).await
        }

        Callback::ViewStudents(page) => view_students(ctx, chat_id, page).await,
        Callback::SelectStudent(student_id, page) => select_student(ctx, chat_id, student_id, page).await,
        Callback::ConfirmAddAdmin(student_id) => confirm_add_admin(ctx, chat_id, student_id).await,

        Callback::ExportEventData => {
            let text = ctx.store.read(report::events_export).await;
            ctx.reply(chat_id, &text, Some(back_to_menu())).await
        }
        Callback::ExportUsers => {
            let text = ctx.store.read(report::users_export).await;
            ctx.reply(chat_id, &text, Some(back_to_menu())).await
        }

        other => {
            error!("[{:} : {:}] callback {} is not an admin action", file!(), line!(), other);
            Err(MyError::BadClientData)
        }
    }
}

async fn list_unconfirmed_events(ctx: &BotContext, chat_id: i64) -> Result<(), MyError> {
    let events = service::event::get_unconfirmed(&ctx.store).await;
    if events.is_empty() {
        return ctx
            .reply(chat_id, "Нет мероприятий, ожидающих подтверждения.", Some(back_to_menu()))
            .await;
    }
    let keyboard = events
        .iter()
        .fold(InlineKeyboard::new(), |keyboard, event| {
            keyboard.row(&event.title, Callback::ReviewEvent(event.id.clone()))
        })
        .row("Назад", Callback::AdminMenu);
    ctx.reply(chat_id, &report::unconfirmed_events(&events), Some(keyboard)).await
}

async fn review_event(ctx: &BotContext, chat_id: i64, id: &str) -> Result<(), MyError> {
    let event = service::event::get_by_id(id, &ctx.store).await?;
    let keyboard = InlineKeyboard::new()
        .row("Подтвердить", Callback::ConfirmEvent(event.id.clone()))
        .row("Отклонить", Callback::DenyEvent(event.id.clone()))
        .row("Редактировать", Callback::EditEvent(event.id.clone()))
        .row("Назад", Callback::ApproveEvents);
    ctx.reply(chat_id, &report::event_card(&event), Some(keyboard)).await
}

async fn list_unconfirmed_achievements(ctx: &BotContext, chat_id: i64) -> Result<(), MyError> {
    let pending = service::achievement::get_unconfirmed(&ctx.store).await;
    if pending.is_empty() {
        return ctx
            .reply(chat_id, "Нет достижений для подтверждения.", Some(back_to_menu()))
            .await;
    }
    let keyboard = pending
        .iter()
        .fold(InlineKeyboard::new(), |keyboard, (achievement, _)| {
            keyboard.row(
                &format!("Участник ID: {} - {}", achievement.student_id, achievement.place),
                Callback::ReviewAchievement(achievement.student_id, achievement.event_id.clone()),
            )
        })
        .row("Назад", Callback::AdminMenu);
    ctx.reply(chat_id, &report::unconfirmed_achievements(&pending), Some(keyboard)).await
}

async fn review_achievement(ctx: &BotContext, chat_id: i64, student_id: i64, event_id: &str) -> Result<(), MyError> {
    let achievement = service::achievement::get(student_id, event_id, &ctx.store).await?;
    let title = service::event::get_by_id(event_id, &ctx.store).await.ok().map(|e| e.title);
    let keyboard = InlineKeyboard::new()
        .row("✅ Подтвердить", Callback::ConfirmAchievement(student_id, event_id.to_string()))
        .row("❌ Отклонить", Callback::DenyAchievement(student_id, event_id.to_string()))
        .row("Назад", Callback::ApproveAchievements);
    let text = report::achievement_card(&achievement, title.as_deref());
    ctx.reply(chat_id, &text, Some(keyboard)).await
}

async fn list_editable_events(ctx: &BotContext, chat_id: i64) -> Result<(), MyError> {
    let events = service::event::get_editable(&ctx.store).await;
    if events.is_empty() {
        return ctx.reply(chat_id, "Нет предстоящих мероприятий.", Some(back_to_menu())).await;
    }
    let keyboard = events
        .iter()
        .fold(InlineKeyboard::new(), |keyboard, event| {
            keyboard.row(&event.title, Callback::ViewEvent(event.id.clone()))
        })
        .row("Назад", Callback::AdminMenu);
    ctx.reply(chat_id, "Предстоящие мероприятия:", Some(keyboard)).await
}

async fn view_event(ctx: &BotContext, chat_id: i64, id: &str) -> Result<(), MyError> {
    let event = service::event::get_by_id(id, &ctx.store).await?;
    let keyboard = InlineKeyboard::new()
        .row("Отредактировать", Callback::EditEvent(event.id.clone()))
        .row("Удалить", Callback::DeleteEvent(event.id.clone()))
        .row("Назад", Callback::EditEvents);
    ctx.reply(chat_id, &report::event_card(&event), Some(keyboard)).await
}

fn students_keyboard(page: &StudentPage) -> InlineKeyboard {
    let mut keyboard = page
        .students
        .iter()
        .enumerate()
        .fold(InlineKeyboard::new(), |keyboard, (i, student)| {
            keyboard.row(
                &format!(
                    "{}. {} {} {}",
                    page.first_number + i,
                    student.last_name,
                    student.first_name,
                    student.group_number
                ),
                Callback::SelectStudent(student.telegram_id, page.page),
            )
        });
    let mut nav = Vec::new();
    if page.has_prev {
        nav.push(("⬅️ Назад", Callback::ViewStudents(page.page - 1)));
    }
    if page.has_next {
        nav.push(("➡️ Вперёд", Callback::ViewStudents(page.page + 1)));
    }
    keyboard = keyboard.row_of(nav);
    keyboard.row("Назад", Callback::AdminMenu)
}

async fn view_students(ctx: &BotContext, chat_id: i64, page: usize) -> Result<(), MyError> {
    match service::admin::students_page(page, &ctx.store).await {
        Some(page) => {
            ctx.reply(
                chat_id,
                "Выберите студента для добавления в администраторы:",
                Some(students_keyboard(&page)),
            )
            .await
        }
        None => ctx.reply(chat_id, "Студенты закончились или страница пуста.", Some(back_to_menu())).await,
    }
}

async fn select_student(ctx: &BotContext, chat_id: i64, student_id: i64, page: usize) -> Result<(), MyError> {
    let student = service::student::get_by_id(student_id, &ctx.store).await?;
    let keyboard = InlineKeyboard::new().row_of(vec![
        ("✅ Да", Callback::ConfirmAddAdmin(student.telegram_id)),
        ("❌ Нет", Callback::ViewStudents(page)),
    ]);
    let text = format!("Сделать {} {} администратором?", student.last_name, student.first_name);
    ctx.reply(chat_id, &text, Some(keyboard)).await
}

async fn confirm_add_admin(ctx: &BotContext, chat_id: i64, student_id: i64) -> Result<(), MyError> {
    let res = service::admin::promote(student_id, &ctx.store).await;
    let text = match res {
        Ok(admin) => format!("Вы сделали {} {} администратором.", admin.last_name, admin.first_name),
        Err(MyError::AlreadyExists) => {
            let student = service::student::get_by_id(student_id, &ctx.store).await?;
            format!("{} {} уже является администратором.", student.last_name, student.first_name)
        }
        Err(err) => return Err(err),
    };
    ctx.reply(chat_id, &text, None).await?;
    send_menu(ctx, chat_id).await
}

/// Last step of the edit dialogue. Rights are checked again since the
/// dialogue may have outlived them.
pub async fn complete_event_edit(
    ctx: &BotContext,
    chat_id: i64,
    user_id: i64,
    event_id: &str,
    fields: UpdateEventDto,
) -> Result<(), MyError> {
    ctx.authorizer.check(user_id, Capabilities::MODERATE_EVENTS).await?;
    let updated = service::event::update(event_id, fields, &ctx.store).await?;
    info!("admin {} edited event {} ({} fields)", user_id, event_id, updated);
    ctx.reply(chat_id, ru::EVENT_UPDATED, None).await?;
    list_editable_events(ctx, chat_id).await
}
