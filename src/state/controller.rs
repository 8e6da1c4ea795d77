//! Session controller: the state machine behind the tray

use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use super::{
    modes::{find_mode, format_countdown, format_friendly_duration, Mode, SessionLength, CUSTOM_LABEL},
    session::Session,
    view::{IconVariant, Notification, TrayView},
};
use crate::{
    services::{notify_detached, Notifier, PowerCall},
    tasks::serializer::CommandSerializer,
};

/// Events that drive a session transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Start(SessionLength),
    Stop,
    Tick,
}

/// Time left until `ends_at`, clamped at zero
pub fn remaining_until(ends_at: Instant, now: Instant) -> Duration {
    ends_at.saturating_duration_since(now)
}

/// Owns the current [`Session`] and is the only thing that changes it.
///
/// Every power request goes through the command serializer; every visible
/// change is published on the tray view channel. Nothing here returns an
/// error: collaborator failures are logged and the transition completes.
pub struct SessionController {
    session: Session,
    modes: &'static [Mode],
    serializer: CommandSerializer,
    notifier: Arc<dyn Notifier>,
    view_tx: watch::Sender<TrayView>,
}

impl SessionController {
    pub fn new(
        modes: &'static [Mode],
        serializer: CommandSerializer,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let (view_tx, _) = watch::channel(TrayView::decaf());
        Self {
            session: Session::Decaf,
            modes,
            serializer,
            notifier,
            view_tx,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn modes(&self) -> &'static [Mode] {
        self.modes
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    /// Feed of tray views, starting with the current one
    pub fn subscribe(&self) -> watch::Receiver<TrayView> {
        self.view_tx.subscribe()
    }

    pub async fn handle(&mut self, event: SessionEvent, now: Instant) {
        match event {
            SessionEvent::Start(length) => self.start(length, now).await,
            SessionEvent::Stop => self.stop().await,
            SessionEvent::Tick => self.tick(now).await,
        }
    }

    /// Begin a new session, replacing whatever was running
    pub async fn start(&mut self, length: SessionLength, now: Instant) {
        let mode = find_mode(self.modes, length);
        let name = mode.map_or(CUSTOM_LABEL, |mode| mode.name);
        let friendly = format_friendly_duration(length);

        self.request(PowerCall::PreventSleep).await;

        let ends_at = match length {
            SessionLength::Timed(d) => match now.checked_add(d) {
                Some(ends_at) => Some((ends_at, d)),
                None => {
                    warn!("{} is too long to schedule, keeping awake until stopped", friendly);
                    None
                }
            },
            SessionLength::Infinite => None,
        };

        let (session, view, body) = match ends_at {
            Some((ends_at, d)) => {
                let body = match mode {
                    Some(mode) => format!("{}\nPreventing sleep for {}", mode.description, friendly),
                    None => format!("Preventing sleep for {}", friendly),
                };
                (
                    Session::Timed { mode: name.to_string(), ends_at },
                    TrayView::timed(name, &friendly, &format_countdown(d)),
                    body,
                )
            }
            None => (
                Session::Infinite { mode: name.to_string() },
                TrayView::infinite(name),
                "Preventing sleep indefinitely".to_string(),
            ),
        };

        info!("{} mode started ({})", name, friendly);
        self.session = session;
        self.view_tx.send_replace(view);
        notify_detached(
            &self.notifier,
            Notification::new(format!("{} Mode Started", name), body, IconVariant::Awake),
        );
    }

    /// End the session from any state; always asks the OS to allow sleep
    pub async fn stop(&mut self) {
        info!("Stopping {} session", self.session.mode_name());
        self.reset().await;
        notify_detached(&self.notifier, Notification::stopped());
    }

    /// Detect expiry or refresh the countdown
    pub async fn tick(&mut self, now: Instant) {
        let (mode, ends_at) = match &self.session {
            Session::Timed { mode, ends_at } => (mode.clone(), *ends_at),
            Session::Infinite { .. } | Session::Decaf => return,
        };

        if now >= ends_at {
            info!("{} mode finished", mode);
            self.reset().await;
            notify_detached(&self.notifier, Notification::finished());
            return;
        }

        let countdown = format_countdown(remaining_until(ends_at, now));
        debug!("{} mode: {} remaining", mode, countdown);
        self.view_tx
            .send_modify(|view| view.set_countdown(&mode, &countdown));
    }

    /// Release the lock and close the serializer; used once the event loop is done
    pub async fn shutdown(mut self) {
        self.reset().await;
        self.serializer.close().await;
    }

    async fn reset(&mut self) {
        self.request(PowerCall::AllowSleep).await;
        self.session = Session::Decaf;
        self.view_tx.send_replace(TrayView::decaf());
    }

    async fn request(&self, call: PowerCall) {
        if let Err(e) = self.serializer.request(call).await {
            error!("Power request {:?} was not delivered: {}", call, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::doubles::{Recorded, RecordingGate, RecordingNotifier};
    use crate::state::modes::MODES;

    const DROP: SessionLength = SessionLength::minutes(10);

    fn controller() -> (SessionController, Recorded<PowerCall>, Recorded<Notification>) {
        let (gate, calls) = RecordingGate::new();
        let serializer = CommandSerializer::spawn(move || gate).unwrap();
        let (notifier, sent) = RecordingNotifier::new();
        (SessionController::new(&MODES, serializer, Arc::new(notifier)), calls, sent)
    }

    fn titles(sent: &Recorded<Notification>) -> Vec<String> {
        sent.snapshot().into_iter().map(|n| n.title).collect()
    }

    #[test]
    fn remaining_time_is_clamped() {
        let now = Instant::now();
        assert_eq!(remaining_until(now, now + Duration::from_secs(5)), Duration::ZERO);
        assert_eq!(remaining_until(now + Duration::from_secs(5), now), Duration::from_secs(5));
        assert_eq!(format_countdown(remaining_until(now, now + Duration::from_secs(5))), "0h 0m 0s");
    }

    #[tokio::test]
    async fn starts_in_decaf() {
        let (controller, calls, sent) = controller();
        assert_eq!(controller.session(), &Session::Decaf);
        assert_eq!(*controller.subscribe().borrow(), TrayView::decaf());
        assert!(calls.snapshot().is_empty());
        assert!(sent.snapshot().is_empty());
    }

    #[tokio::test]
    async fn timed_start_sets_end_time_and_view() {
        let (mut controller, calls, sent) = controller();
        let t0 = Instant::now();

        controller.start(DROP, t0).await;

        assert_eq!(
            controller.session(),
            &Session::Timed { mode: "Drop".to_string(), ends_at: t0 + Duration::from_secs(600) }
        );
        assert_eq!(calls.snapshot(), vec![PowerCall::PreventSleep]);

        let view = controller.subscribe().borrow().clone();
        assert_eq!(view.icon, IconVariant::Awake);
        assert_eq!(view.mode_label, "Mode: Drop (10m)");
        assert_eq!(view.countdown.as_deref(), Some("Time left: 0h 10m 0s"));

        let sent = sent.snapshot();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].title, "Drop Mode Started");
        assert_eq!(sent[0].body, "Just a drop, almost no caffeine.\nPreventing sleep for 10m");
        assert_eq!(sent[0].icon, IconVariant::Awake);
    }

    #[tokio::test]
    async fn tick_refreshes_countdown_only() {
        let (mut controller, calls, _sent) = controller();
        let t0 = Instant::now();
        controller.start(DROP, t0).await;

        controller.tick(t0 + Duration::from_millis(1400)).await;

        let view = controller.subscribe().borrow().clone();
        assert_eq!(view.mode_label, "Mode: Drop (10m)");
        assert_eq!(view.countdown.as_deref(), Some("Time left: 0h 9m 59s"));
        assert_eq!(view.tooltip, "Drop mode: 0h 9m 59s remaining");
        assert_eq!(calls.snapshot(), vec![PowerCall::PreventSleep]);
    }

    #[tokio::test]
    async fn expiry_fires_exactly_once() {
        let (mut controller, calls, sent) = controller();
        let t0 = Instant::now();
        controller.start(DROP, t0).await;

        let late = t0 + Duration::from_secs(601);
        controller.tick(late).await;
        assert_eq!(controller.session(), &Session::Decaf);
        assert_eq!(*controller.subscribe().borrow(), TrayView::decaf());

        controller.tick(late + Duration::from_secs(1)).await;
        controller.tick(late + Duration::from_secs(2)).await;

        assert_eq!(calls.snapshot(), vec![PowerCall::PreventSleep, PowerCall::AllowSleep]);
        assert_eq!(titles(&sent), vec!["Drop Mode Started", "Espresso Finished"]);
    }

    #[tokio::test]
    async fn expiry_at_exact_end_time() {
        let (mut controller, _calls, sent) = controller();
        let t0 = Instant::now();
        controller.start(DROP, t0).await;

        controller.tick(t0 + Duration::from_secs(600)).await;
        assert_eq!(controller.session(), &Session::Decaf);
        assert_eq!(titles(&sent).last().map(String::as_str), Some("Espresso Finished"));
    }

    #[tokio::test]
    async fn infinite_then_stop() {
        let (mut controller, calls, sent) = controller();
        let mut views = controller.subscribe();
        let t0 = Instant::now();

        controller.start(SessionLength::Infinite, t0).await;
        assert_eq!(controller.session(), &Session::Infinite { mode: "Pure Caffeine".to_string() });
        let view = views.borrow_and_update().clone();
        assert_eq!(view.mode_label, "Mode: Pure Caffeine (Infinite)");
        assert_eq!(view.countdown, None);

        controller.tick(t0 + Duration::from_secs(86_400)).await;
        assert!(controller.session().is_infinite());
        assert!(!views.has_changed().unwrap());

        controller.stop().await;
        assert_eq!(controller.session(), &Session::Decaf);
        assert_eq!(views.borrow().countdown, None);

        assert_eq!(calls.snapshot(), vec![PowerCall::PreventSleep, PowerCall::AllowSleep]);
        let sent = sent.snapshot();
        assert_eq!(sent[0].body, "Preventing sleep indefinitely");
        assert_eq!(sent[1], Notification::stopped());
    }

    #[tokio::test]
    async fn stop_while_decaf_still_allows_sleep() {
        let (mut controller, calls, sent) = controller();

        controller.stop().await;

        assert_eq!(controller.session(), &Session::Decaf);
        assert_eq!(calls.snapshot(), vec![PowerCall::AllowSleep]);
        assert_eq!(sent.snapshot(), vec![Notification::stopped()]);
    }

    #[tokio::test]
    async fn decaf_tick_is_a_no_op() {
        let (mut controller, calls, sent) = controller();
        let mut views = controller.subscribe();

        controller.tick(Instant::now()).await;

        assert!(!views.has_changed().unwrap());
        assert!(calls.snapshot().is_empty());
        assert!(sent.snapshot().is_empty());
    }

    #[tokio::test]
    async fn restart_replaces_running_session() {
        let (mut controller, calls, _sent) = controller();
        let t0 = Instant::now();

        controller.start(DROP, t0).await;
        controller.start(SessionLength::minutes(30), t0 + Duration::from_secs(5)).await;

        assert_eq!(controller.session().mode_name(), "Latte");
        assert_eq!(
            controller.session().end_time(),
            Some(t0 + Duration::from_secs(5 + 30 * 60))
        );
        assert_eq!(calls.snapshot(), vec![PowerCall::PreventSleep; 2]);
    }

    #[tokio::test]
    async fn timed_start_wins_from_any_prior_state() {
        let (mut controller, calls, sent) = controller();
        let t0 = Instant::now();

        controller.start(SessionLength::Infinite, t0).await;
        controller.start(DROP, t0 + Duration::from_secs(1)).await;
        assert_eq!(
            controller.session(),
            &Session::Timed { mode: "Drop".to_string(), ends_at: t0 + Duration::from_secs(601) }
        );
        assert_eq!(controller.subscribe().borrow().mode_label, "Mode: Drop (10m)");

        // A zero length still passes through the timed state before expiring
        let t1 = t0 + Duration::from_secs(2);
        controller.start(SessionLength::Timed(Duration::ZERO), t1).await;
        assert_eq!(controller.session().end_time(), Some(t1));
        assert_eq!(controller.session().mode_name(), "Custom");

        controller.tick(t1).await;
        assert_eq!(controller.session(), &Session::Decaf);
        assert_eq!(
            calls.snapshot(),
            vec![
                PowerCall::PreventSleep,
                PowerCall::PreventSleep,
                PowerCall::PreventSleep,
                PowerCall::AllowSleep,
            ]
        );
        assert_eq!(titles(&sent).last().map(String::as_str), Some("Espresso Finished"));
    }

    #[tokio::test]
    async fn unmatched_length_is_custom() {
        let (mut controller, _calls, sent) = controller();

        controller.start(SessionLength::minutes(45), Instant::now()).await;

        assert_eq!(controller.session().mode_name(), "Custom");
        let sent = sent.snapshot();
        assert_eq!(sent[0].title, "Custom Mode Started");
        assert_eq!(sent[0].body, "Preventing sleep for 45m");
    }

    #[tokio::test]
    async fn unschedulable_length_keeps_awake_until_stopped() {
        let (mut controller, _calls, _sent) = controller();

        controller
            .start(SessionLength::Timed(Duration::MAX), Instant::now())
            .await;

        assert!(controller.session().is_infinite());
    }

    #[tokio::test]
    async fn session_is_always_in_one_consistent_state() {
        let (mut controller, calls, _sent) = controller();
        let t0 = Instant::now();
        let events = [
            SessionEvent::Tick,
            SessionEvent::Start(SessionLength::minutes(3)),
            SessionEvent::Tick,
            SessionEvent::Start(SessionLength::Infinite),
            SessionEvent::Tick,
            SessionEvent::Stop,
            SessionEvent::Stop,
            SessionEvent::Start(SessionLength::hours(1)),
            SessionEvent::Tick,
            SessionEvent::Stop,
        ];

        for (i, event) in events.into_iter().enumerate() {
            controller.handle(event, t0 + Duration::from_secs(i as u64)).await;

            let session = controller.session();
            assert!(!session.mode_name().is_empty());
            match session {
                Session::Decaf => assert!(!session.is_active() && !session.is_infinite()),
                Session::Infinite { .. } => assert!(session.end_time().is_none()),
                Session::Timed { .. } => assert!(session.end_time().is_some()),
            }
        }

        let allows = calls
            .snapshot()
            .iter()
            .filter(|call| **call == PowerCall::AllowSleep)
            .count();
        assert_eq!(allows, 3);
    }

    #[tokio::test]
    async fn notifier_failures_do_not_affect_state() {
        let (gate, calls) = RecordingGate::new();
        let serializer = CommandSerializer::spawn(move || gate).unwrap();
        let (notifier, _sent) = RecordingNotifier::failing();
        let mut controller = SessionController::new(&MODES, serializer, Arc::new(notifier));

        controller.start(DROP, Instant::now()).await;
        tokio::task::yield_now().await;

        assert!(controller.session().is_active());
        assert_eq!(calls.snapshot(), vec![PowerCall::PreventSleep]);
    }

    #[tokio::test]
    async fn closed_serializer_does_not_block_transitions() {
        let (gate, calls) = RecordingGate::new();
        let serializer = CommandSerializer::spawn(move || gate).unwrap();
        serializer.close().await;
        let (notifier, _sent) = RecordingNotifier::new();
        let mut controller = SessionController::new(&MODES, serializer, Arc::new(notifier));

        controller.start(SessionLength::Infinite, Instant::now()).await;

        assert!(controller.session().is_infinite());
        assert!(calls.snapshot().is_empty());
    }

    #[tokio::test]
    async fn shutdown_allows_sleep_and_closes() {
        let (gate, calls) = RecordingGate::new();
        let serializer = CommandSerializer::spawn(move || gate).unwrap();
        let handle = serializer.clone();
        let (notifier, _sent) = RecordingNotifier::new();
        let mut controller = SessionController::new(&MODES, serializer, Arc::new(notifier));

        controller.start(SessionLength::Infinite, Instant::now()).await;
        controller.shutdown().await;

        assert!(handle.is_closed());
        assert_eq!(calls.snapshot(), vec![PowerCall::PreventSleep, PowerCall::AllowSleep]);
    }
}
