//! Integration tests wiring the controller to its real observers.
//!
//! Sound and inhibition use their mock backends; the indicator renders into
//! an in-memory buffer.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;

use pomodorik::indicator::{IconState, TitleRenderer, TrayIndicator};
use pomodorik::inhibit::{IdleInhibitor, Inhibitor, MockInhibitor};
use pomodorik::session::{EventForwarder, ObserverSet, SessionController, SessionEvent};
use pomodorik::sound::{MockSoundPlayer, SoundAlert, SoundSource};
use pomodorik::types::SessionPhase;

struct Harness {
    controller: SessionController,
    sound: Arc<MockSoundPlayer>,
    inhibitor: Arc<MockInhibitor>,
    renderer: TitleRenderer<Vec<u8>>,
    events: tokio::sync::mpsc::UnboundedReceiver<SessionEvent>,
}

fn create_harness() -> Harness {
    let sound = Arc::new(MockSoundPlayer::new());
    let inhibitor = Arc::new(MockInhibitor::new());
    let (forwarder, events) = EventForwarder::channel();
    let (indicator, updates) = TrayIndicator::channel();

    let observers = ObserverSet::new()
        .with(Arc::new(forwarder))
        .with(Arc::new(indicator))
        .with(Arc::new(SoundAlert::new(sound.clone(), SoundSource::Chime)))
        .with(Arc::new(IdleInhibitor::new(inhibitor.clone())));

    Harness {
        controller: SessionController::new(Arc::new(observers)),
        sound,
        inhibitor,
        renderer: TitleRenderer::new(updates, Vec::new()),
        events,
    }
}

mod completion_side_effects {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn completion_plays_sound_and_releases_inhibitor() {
        let mut h = create_harness();

        h.controller.start_session(3).unwrap();
        assert!(h.inhibitor.is_held());
        assert_eq!(h.sound.play_count(), 0);

        sleep(Duration::from_millis(3500)).await;

        assert_eq!(h.sound.play_count(), 1);
        assert_eq!(h.sound.get_play_calls(), vec![SoundSource::Chime]);
        assert!(!h.inhibitor.is_held());
        assert_eq!(h.inhibitor.release_call_count(), 1);

        let mut terminal = 0;
        while let Ok(event) = h.events.try_recv() {
            if event.is_terminal() {
                terminal += 1;
            }
        }
        assert_eq!(terminal, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn sound_failure_does_not_stop_other_observers() {
        let h = create_harness();
        h.sound.set_should_fail(true);

        h.controller.start_session(1).unwrap();
        sleep(Duration::from_millis(1500)).await;

        assert_eq!(h.controller.snapshot().phase, SessionPhase::Completed);
        assert!(!h.controller.is_ticking());
        // The inhibitor comes after the sound in the set and is still released.
        assert!(!h.inhibitor.is_held());
    }

    #[tokio::test(start_paused = true)]
    async fn inhibitor_failure_does_not_block_countdown() {
        let h = create_harness();
        h.inhibitor.set_should_fail_acquire(true);

        h.controller.start_session(2).unwrap();
        assert!(h.controller.is_ticking());

        sleep(Duration::from_millis(2500)).await;
        assert_eq!(h.sound.play_count(), 1);
    }
}

mod restart_and_cancel {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn restart_keeps_inhibitor_and_skips_sound() {
        let h = create_harness();

        h.controller.start_session(10).unwrap();
        sleep(Duration::from_millis(2500)).await;
        h.controller.start_session(10).unwrap();

        assert!(h.inhibitor.is_held());
        assert_eq!(h.sound.play_count(), 0);

        sleep(Duration::from_secs(11)).await;
        assert_eq!(h.sound.play_count(), 1);
        assert!(!h.inhibitor.is_held());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_releases_inhibitor_without_sound() {
        let h = create_harness();

        h.controller.start_session(10).unwrap();
        sleep(Duration::from_millis(1500)).await;
        assert!(h.controller.cancel_session());

        sleep(Duration::from_secs(20)).await;
        assert!(!h.inhibitor.is_held());
        assert_eq!(h.sound.play_count(), 0);
    }
}

mod indicator_rendering {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn title_follows_countdown() {
        let mut h = create_harness();

        h.controller.start_session(300).unwrap();
        h.renderer.drain().unwrap();
        assert_eq!(h.renderer.icon(), IconState::Active);
        assert_eq!(h.renderer.current_title(), "🍅 Pomodorik (05:00)");

        sleep(Duration::from_millis(1500)).await;
        h.renderer.drain().unwrap();
        assert_eq!(h.renderer.current_title(), "🍅 Pomodorik (04:59)");
    }

    #[tokio::test(start_paused = true)]
    async fn completion_restores_idle_icon_and_rings() {
        let mut h = create_harness();

        h.controller.start_session(1).unwrap();
        sleep(Duration::from_millis(1500)).await;
        h.renderer.drain().unwrap();

        assert_eq!(h.renderer.icon(), IconState::Idle);
        assert_eq!(h.renderer.current_title(), "⏸ Pomodorik (00:00)");

        let output = String::from_utf8(h.renderer.into_writer()).unwrap();
        assert!(output.ends_with("\x07\x07"));
    }
}
