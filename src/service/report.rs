//! Plain-text renderings shown to students and admins.

use std::fmt::Write;

use crate::{
    models::{Achievement, Activity, Database, Student},
    ru,
};

/// Telegram rejects messages longer than this many characters.
pub const MESSAGE_LIMIT: usize = 4096;

fn or<'a>(value: &'a Option<String>, fallback: &'a str) -> &'a str {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => fallback,
    }
}

pub fn event_card(event: &Activity) -> String {
    format!(
        "Название: {}\nОписание: {}\nДата: {}\nМесто: {}\nУровень: {}\nКатегория: {}\nСсылка на опросник: {}",
        event.title,
        event.description,
        event.date,
        event.location,
        or(&event.event_level, ru::NOT_SPECIFIED_M),
        or(&event.event_category, ru::NOT_SPECIFIED_F),
        or(&event.survey_link, ru::NO_LINK),
    )
}

pub fn upcoming_events(events: &[Activity]) -> String {
    if events.is_empty() {
        return "На данный момент предстоящих мероприятий нет.".to_string();
    }
    let cards: Vec<String> = events.iter().map(event_card).collect();
    format!("Предстоящие мероприятия:\n\n{}", cards.join("\n\n"))
}

pub fn my_events(events: &[Activity]) -> String {
    if events.is_empty() {
        return "У вас пока нет зарегистрированных мероприятий.".to_string();
    }
    let mut text = String::from("Ваши мероприятия:\n\n");
    for event in events {
        let _ = write!(
            text,
            "Название: {}\nОписание: {}\nДата: {}\nУровень: {}\nКатегория: {}\n\n",
            event.title,
            event.description,
            event.date,
            or(&event.event_level, ru::NOT_SPECIFIED_M),
            or(&event.event_category, ru::NOT_SPECIFIED_F),
        );
    }
    text.trim_end().to_string()
}

pub fn profile(student: &Student) -> String {
    format!(
        "Ваша информация:\nИмя: {}\nФамилия: {}\nГруппа: {}",
        student.first_name, student.last_name, student.group_number
    )
}

pub fn unconfirmed_events(events: &[Activity]) -> String {
    let lines: Vec<String> = events
        .iter()
        .enumerate()
        .map(|(i, e)| format!("{}. {}", i + 1, e.title))
        .collect();
    format!("Неподтверждённые мероприятия:\n{}", lines.join("\n"))
}

pub fn unconfirmed_achievements(pending: &[(Achievement, Option<String>)]) -> String {
    let mut text = String::from("Неподтверждённые достижения:\n");
    for (i, (achievement, title)) in pending.iter().enumerate() {
        let _ = writeln!(
            text,
            "{}. Студент ID {} на мероприятии {} занял {}",
            i + 1,
            achievement.student_id,
            or(title, "Мероприятие не найдено"),
            achievement.place
        );
    }
    text.trim_end().to_string()
}

pub fn achievement_card(achievement: &Achievement, title: Option<&str>) -> String {
    format!(
        "Студент ID: {}\nМероприятие: {}\nМесто: {}\nДата подачи: {}",
        achievement.student_id,
        title.unwrap_or("Мероприятие не найдено"),
        achievement.place,
        achievement.date.format("%Y-%m-%d %H:%M"),
    )
}

/// Confirmed events with everyone who reported a result there.
pub fn events_export(data: &Database) -> String {
    let mut text = String::from("Отчет по мероприятиям с участниками:\n\n");
    for event in data.activities.iter().filter(|e| e.confirmed) {
        let _ = write!(
            text,
            "Название мероприятия: {}\nДата: {}\nМесто: {}\nУровень: {}\nКатегория: {}\nУчастники и занятые места:\n",
            event.title,
            event.date,
            event.location,
            or(&event.event_level, ru::NOT_SPECIFIED_M),
            or(&event.event_category, ru::NOT_SPECIFIED_F),
        );
        let participants: Vec<(&Achievement, &Student)> = data
            .achievements
            .iter()
            .filter(|a| a.event_id == event.id)
            .filter_map(|a| {
                data.students
                    .iter()
                    .find(|s| s.telegram_id == a.student_id)
                    .map(|s| (a, s))
            })
            .collect();
        if participants.is_empty() {
            text.push_str("Нет зарегистрированных участников.\n\n");
        }
        for (achievement, student) in participants {
            let _ = write!(
                text,
                "Имя: {} {}\nНомер группы: {}\nЗанятое место: {}\n\n",
                student.first_name, student.last_name, student.group_number, achievement.place
            );
        }
    }
    text.trim_end().to_string()
}

pub fn users_export(data: &Database) -> String {
    let mut text = String::from("Отчет по пользователям и их достижениям:\n\n");
    for student in &data.students {
        let _ = write!(
            text,
            "Имя: {} {}\nГруппа: {}\n",
            student.first_name, student.last_name, student.group_number
        );
        let achievements: Vec<(&Achievement, &Activity)> = data
            .achievements
            .iter()
            .filter(|a| a.student_id == student.telegram_id)
            .filter_map(|a| data.activities.iter().find(|e| e.id == a.event_id).map(|e| (a, e)))
            .collect();
        if achievements.is_empty() {
            text.push_str("Достижения отсутствуют.\n");
        } else {
            text.push_str("Достижения:\n");
            for (achievement, event) in achievements {
                let _ = writeln!(text, " - Мероприятие: {}, место: {}", event.title, achievement.place);
            }
        }
        text.push('\n');
    }
    text.trim_end().to_string()
}

/// Splits on line boundaries so that every chunk fits in `limit` characters.
/// A single line longer than `limit` is cut by characters.
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;
    for line in text.split('\n') {
        let mut line = line.to_string();
        let mut line_len = line.chars().count();
        while line_len > limit {
            if current_len > 0 {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let head: String = line.chars().take(limit).collect();
            line = line.chars().skip(limit).collect();
            line_len -= limit;
            chunks.push(head);
        }
        let needed = if current_len == 0 { line_len } else { current_len + 1 + line_len };
        if needed > limit {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push('\n');
            current_len += 1;
        }
        current.push_str(&line);
        current_len += line_len;
    }
    if !current.trim().is_empty() {
        chunks.push(current);
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(id: &str, title: &str, confirmed: bool) -> Activity {
        Activity {
            id: id.into(),
            title: title.into(),
            description: "d".into(),
            date: "2030-01-01".into(),
            location: "Hall A".into(),
            survey_link: None,
            event_level: Some("локальный".into()),
            event_category: None,
            confirmed,
            submitter_id: 1,
        }
    }

    fn sample() -> Database {
        Database {
            students: vec![
                Student {
                    telegram_id: 1,
                    first_name: "Анна".into(),
                    last_name: "Петрова".into(),
                    group_number: "Б-21".into(),
                },
                Student {
                    telegram_id: 2,
                    first_name: "Олег".into(),
                    last_name: "Смирнов".into(),
                    group_number: "Б-22".into(),
                },
            ],
            activities: vec![event("e1", "Hack Day", true), event("e2", "Draft", false)],
            achievements: vec![
                Achievement {
                    student_id: 1,
                    event_id: "e1".into(),
                    place: "1-е место".into(),
                    date: chrono::NaiveDate::from_ymd_opt(2030, 1, 2)
                        .unwrap()
                        .and_hms_opt(10, 0, 0)
                        .unwrap(),
                    confirmed: true,
                },
                Achievement {
                    student_id: 2,
                    event_id: "gone".into(),
                    place: "2".into(),
                    date: chrono::NaiveDate::from_ymd_opt(2030, 1, 2)
                        .unwrap()
                        .and_hms_opt(10, 0, 0)
                        .unwrap(),
                    confirmed: false,
                },
            ],
            admins: vec![],
        }
    }

    #[test]
    fn card_fills_missing_fields() {
        let card = event_card(&event("e1", "Hack Day", true));
        assert!(card.contains("Уровень: локальный"));
        assert!(card.contains("Категория: Не указана"));
        assert!(card.contains("Ссылка на опросник: Нет ссылки"));
    }

    #[test]
    fn events_export_lists_confirmed_events_with_participants() {
        let text = events_export(&sample());
        assert!(text.contains("Название мероприятия: Hack Day"));
        assert!(text.contains("Имя: Анна Петрова"));
        assert!(text.contains("Занятое место: 1-е место"));
        assert!(!text.contains("Draft"));
    }

    #[test]
    fn users_export_skips_dangling_events() {
        let text = users_export(&sample());
        assert!(text.contains(" - Мероприятие: Hack Day, место: 1-е место"));
        let oleg = text.split("Имя: Олег Смирнов").nth(1).unwrap();
        assert!(oleg.contains("Достижения отсутствуют."));
    }

    #[test]
    fn pending_achievements_name_missing_events() {
        let data = sample();
        let pending = vec![(data.achievements[1].clone(), None)];
        assert!(unconfirmed_achievements(&pending).contains("на мероприятии Мероприятие не найдено занял 2"));
    }

    #[test]
    fn split_respects_limit_and_lines() {
        let text = "aaaa\nbbbb\ncccc";
        assert_eq!(split_message(text, 9), vec!["aaaa\nbbbb", "cccc"]);
        assert_eq!(split_message("абвгдеж", 3), vec!["абв", "где", "ж"]);
        assert_eq!(split_message("short", MESSAGE_LIMIT), vec!["short"]);
    }
}
