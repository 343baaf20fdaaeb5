use std::{sync::Arc, time::Duration};

use futures::{stream, StreamExt};
use log::{debug, info, warn};
use rand::seq::SliceRandom;
use rand::Rng;
use tokio_util::sync::CancellationToken;

use crate::{
    db::{self, JsonStore},
    ru,
    service::session::SessionStore,
    transport::Messenger,
};

/// Deliveries in flight at once during a broadcast.
const BROADCAST_CONCURRENCY: usize = 8;
const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    pub sent: usize,
    pub failed: usize,
}

pub fn render_reminder<R: Rng + ?Sized>(first_name: &str, rng: &mut R) -> String {
    let template = ru::RAND_MESSAGES.choose(rng).copied().unwrap_or("{name}");
    template.replace("{name}", first_name)
}

/// Sends one random reminder to every student. A failed delivery is logged
/// and does not stop the others.
pub async fn broadcast_reminders(store: &JsonStore, messenger: &dyn Messenger) -> BroadcastReport {
    let students = db::student::get_all(store).await;
    let messages: Vec<(i64, String)> = {
        let mut rng = rand::thread_rng();
        students
            .iter()
            .map(|s| (s.telegram_id, render_reminder(&s.first_name, &mut rng)))
            .collect()
    };

    let results: Vec<bool> = stream::iter(messages)
        .map(|(telegram_id, text)| async move {
            match messenger.send_message(telegram_id, &text, None).await {
                Ok(_) => true,
                Err(err) => {
                    warn!("Не удалось отправить сообщение пользователю {}: {}", telegram_id, err);
                    false
                }
            }
        })
        .buffer_unordered(BROADCAST_CONCURRENCY)
        .collect()
        .await;

    let sent = results.iter().filter(|ok| **ok).count();
    let report = BroadcastReport {
        sent,
        failed: results.len() - sent,
    };
    info!("reminder broadcast finished: {} sent, {} failed", report.sent, report.failed);
    report
}

/// Periodic reminders plus eviction of idle dialogues, until `shutdown` fires.
/// The first broadcast happens one full `interval` after start.
pub async fn run(
    store: Arc<JsonStore>,
    messenger: Arc<dyn Messenger>,
    sessions: Arc<SessionStore>,
    interval: Duration,
    shutdown: CancellationToken,
) {
    let start = tokio::time::Instant::now();
    let mut reminders = tokio::time::interval_at(start + interval, interval);
    let mut sweep = tokio::time::interval_at(start + SESSION_SWEEP_INTERVAL, SESSION_SWEEP_INTERVAL);
    info!("scheduler started, reminders every {:?}", interval);
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                info!("scheduler stopped");
                return;
            }
            _ = reminders.tick() => {
                broadcast_reminders(&store, messenger.as_ref()).await;
            }
            _ = sweep.tick() => {
                let evicted = sessions.evict_expired();
                if evicted > 0 {
                    debug!("evicted {} idle dialogues", evicted);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{db::testing::temp_store, models::Student, transport::testing::RecordingMessenger};
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn reminder_uses_the_first_name() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let text = render_reminder("Маша", &mut rng);
            assert!(text.contains("Маша"));
            assert!(!text.contains("{name}"));
        }
    }

    #[actix_rt::test]
    async fn one_failed_recipient_does_not_stop_the_broadcast() {
        let (_dir, store) = temp_store().await;
        for id in 1..=5 {
            db::student::create(
                Student {
                    telegram_id: id,
                    first_name: format!("S{id}"),
                    last_name: "L".into(),
                    group_number: "G".into(),
                },
                &store,
            )
            .await
            .unwrap();
        }
        let messenger = RecordingMessenger::default();
        messenger.block(3);

        let report = broadcast_reminders(&store, &messenger).await;
        assert_eq!(report, BroadcastReport { sent: 4, failed: 1 });

        let mut recipients: Vec<i64> = messenger.take().iter().map(|m| m.chat_id).collect();
        recipients.sort();
        assert_eq!(recipients, vec![1, 2, 4, 5]);
    }

    #[actix_rt::test]
    async fn run_stops_on_cancel() {
        let (_dir, store) = temp_store().await;
        let token = CancellationToken::new();
        token.cancel();
        run(
            Arc::new(store),
            Arc::new(RecordingMessenger::default()),
            Arc::new(SessionStore::new(Duration::from_secs(60))),
            Duration::from_secs(3600),
            token,
        )
        .await;
    }
}
