//! Overlay lifecycle and auto-close timers
//!
//! Opens and closes overlays on resolved surfaces and owns at most one
//! auto-close timer per surface. Any existing timer for a surface is
//! cancelled before a new one is armed, so a stale timer from an earlier
//! item can never close a later one.
//!
//! Timers run as local tasks and must be armed from inside a
//! `tokio::task::LocalSet`.

use crate::core::target_resolver::TargetResolver;
use log::{debug, info, warn};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;
use tokio::task::JoinHandle;
use userguide_core::{Host, OverlayOp, OverlayRequest, Surface, SyncError};
use userguide_types::ContentItem;

/// Per-surface lifecycle as seen by the manager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SurfaceState {
    #[default]
    Idle,
    Opening,
    Visible,
    Closing,
}

struct AutoCloseTimer {
    token: u64,
    handle: JoinHandle<()>,
}

/// Outstanding auto-close timers, at most one per surface
#[derive(Default)]
pub struct TimerRegistry {
    timers: HashMap<Surface, AutoCloseTimer>,
    next_token: u64,
}

impl TimerRegistry {
    fn next_token(&mut self) -> u64 {
        self.next_token += 1;
        self.next_token
    }

    /// Store a timer, cancelling whatever was armed for the surface
    fn arm(&mut self, surface: Surface, token: u64, handle: JoinHandle<()>) {
        self.cancel(surface);
        self.timers.insert(surface, AutoCloseTimer { token, handle });
    }

    /// Abort the timer for `surface`; true if one was armed
    pub fn cancel(&mut self, surface: Surface) -> bool {
        match self.timers.remove(&surface) {
            Some(timer) => {
                timer.handle.abort();
                true
            }
            None => false,
        }
    }

    /// Called by a firing timer to drop its own entry. False if the entry
    /// now belongs to a newer timer.
    fn release(&mut self, surface: Surface, token: u64) -> bool {
        match self.timers.get(&surface) {
            Some(timer) if timer.token == token => {
                self.timers.remove(&surface);
                true
            }
            _ => false,
        }
    }

    pub fn is_armed(&self, surface: Surface) -> bool {
        self.timers.contains_key(&surface)
    }

    pub fn outstanding(&self) -> usize {
        self.timers.len()
    }
}

impl Drop for TimerRegistry {
    fn drop(&mut self) {
        for (_, timer) in self.timers.drain() {
            timer.handle.abort();
        }
    }
}

pub struct OverlayManager<H: Host> {
    host: Rc<H>,
    resolver: TargetResolver<H>,
    timers: RefCell<TimerRegistry>,
    states: RefCell<HashMap<Surface, SurfaceState>>,
}

impl<H: Host + 'static> OverlayManager<H> {
    pub fn new(host: Rc<H>) -> Rc<Self> {
        Rc::new(Self {
            resolver: TargetResolver::new(Rc::clone(&host)),
            host,
            timers: RefCell::new(TimerRegistry::default()),
            states: RefCell::new(HashMap::new()),
        })
    }

    pub fn state(&self, surface: Surface) -> SurfaceState {
        self.states.borrow().get(&surface).copied().unwrap_or_default()
    }

    pub fn timer_armed(&self, surface: Surface) -> bool {
        self.timers.borrow().is_armed(surface)
    }

    pub fn outstanding_timers(&self) -> usize {
        self.timers.borrow().outstanding()
    }

    fn set_state(&self, surface: Surface, state: SurfaceState) {
        debug!("Surface {} -> {:?}", surface, state);
        self.states.borrow_mut().insert(surface, state);
    }

    /// Close the item's surface if its button is active, otherwise open it
    pub async fn toggle(self: &Rc<Self>, item: &ContentItem, currently_active: bool) {
        if currently_active {
            info!("Content [{}] already active, closing", item.title);
            self.close(item.target).await;
        } else {
            self.open(item).await;
        }
    }

    /// Show `item` on its resolved surface and arm its auto-close timer
    pub async fn open(self: &Rc<Self>, item: &ContentItem) {
        let target = self.resolver.resolve(item.target).await;
        if self.timers.borrow_mut().cancel(target) {
            debug!("Cancelled pending auto-close on {}", target);
        }
        self.set_state(target, SurfaceState::Opening);

        let request = OverlayRequest {
            mode: item.mode,
            title: item.title.clone(),
            target,
            url: item.url.clone(),
        };
        info!("Opening [{}] on [{}]", item.title, target);
        match self.host.display_overlay(&request).await {
            Ok(()) => {
                self.set_state(target, SurfaceState::Visible);
                if let Some(after) = item.autoclose_after() {
                    info!("Auto closing [{}] in {:?}", item.title, after);
                    self.arm_autoclose(target, after);
                }
            }
            Err(source) => {
                self.set_state(target, SurfaceState::Idle);
                warn!(
                    "{}",
                    SyncError::OverlayOpFailure {
                        op: OverlayOp::Display,
                        surface: target,
                        source,
                    }
                );
            }
        }
    }

    /// Close whatever is shown on the surface `requested` resolves to.
    ///
    /// Idempotent. Timers armed for the requested and the resolved surface
    /// are cancelled.
    pub async fn close(&self, requested: Surface) {
        self.timers.borrow_mut().cancel(requested);
        let target = self.resolver.resolve(requested).await;
        if target != requested {
            self.timers.borrow_mut().cancel(target);
        }

        let previous = self.state(target);
        self.set_state(target, SurfaceState::Closing);
        info!("Closing overlay on [{}]", target);
        match self.host.clear_overlay(target).await {
            Ok(()) => self.set_state(target, SurfaceState::Idle),
            Err(source) => {
                self.set_state(target, previous);
                warn!(
                    "{}",
                    SyncError::OverlayOpFailure {
                        op: OverlayOp::Clear,
                        surface: target,
                        source,
                    }
                );
            }
        }
    }

    fn arm_autoclose(self: &Rc<Self>, surface: Surface, after: Duration) {
        let token = self.timers.borrow_mut().next_token();
        let manager = Rc::downgrade(self);
        let handle = tokio::task::spawn_local(async move {
            tokio::time::sleep(after).await;
            let Some(manager) = manager.upgrade() else {
                return;
            };
            if !manager.timers.borrow_mut().release(surface, token) {
                return;
            }
            info!("Auto-close timer expired on [{}]", surface);
            manager.close(surface).await;
        });
        self.timers.borrow_mut().arm(surface, token, handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{Failures, HostCommand, SimulatedHost};
    use std::future::Future;
    use tokio::task::LocalSet;
    use tokio::time::sleep;
    use userguide_types::OverlayMode;

    async fn local<F: Future>(f: F) -> F::Output {
        LocalSet::new().run_until(f).await
    }

    fn setup() -> (Rc<SimulatedHost>, Rc<OverlayManager<SimulatedHost>>) {
        let host = Rc::new(SimulatedHost::offline());
        let manager = OverlayManager::new(Rc::clone(&host));
        (host, manager)
    }

    fn item_a() -> ContentItem {
        ContentItem::new("A", "u1")
            .with_mode(OverlayMode::Modal)
            .with_autoclose(30)
    }

    fn clears(host: &SimulatedHost) -> usize {
        host.count_commands(|c| matches!(c, HostCommand::ClearOverlay(_)))
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_then_autoclose() {
        local(async {
            let (host, manager) = setup();
            manager.toggle(&item_a(), false).await;

            assert_eq!(
                host.commands(),
                vec![HostCommand::DisplayOverlay(OverlayRequest {
                    mode: OverlayMode::Modal,
                    title: "A".to_string(),
                    target: Surface::Osd,
                    url: "u1".to_string(),
                })]
            );
            assert_eq!(manager.state(Surface::Osd), SurfaceState::Visible);
            assert!(manager.timer_armed(Surface::Osd));

            sleep(Duration::from_secs(29)).await;
            assert_eq!(clears(&host), 0);

            sleep(Duration::from_secs(2)).await;
            assert_eq!(host.commands().last(), Some(&HostCommand::ClearOverlay(Surface::Osd)));
            assert_eq!(clears(&host), 1);
            assert_eq!(manager.outstanding_timers(), 0);
            assert_eq!(manager.state(Surface::Osd), SurfaceState::Idle);
        })
        .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_toggle_close_cancels_timer() {
        local(async {
            let (host, manager) = setup();
            manager.toggle(&item_a(), false).await;
            sleep(Duration::from_secs(10)).await;

            manager.toggle(&item_a(), true).await;
            assert_eq!(clears(&host), 1);
            assert!(!manager.timer_armed(Surface::Osd));

            sleep(Duration::from_secs(60)).await;
            assert_eq!(clears(&host), 1);
        })
        .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_reopen_replaces_timer() {
        local(async {
            let (host, manager) = setup();
            manager.open(&item_a()).await;
            sleep(Duration::from_secs(20)).await;

            let item_b = ContentItem::new("B", "u2").with_autoclose(60);
            manager.open(&item_b).await;
            assert_eq!(manager.outstanding_timers(), 1);

            // A's first expiry passes without closing B
            sleep(Duration::from_secs(20)).await;
            assert_eq!(clears(&host), 0);
            assert!(host.overlay_on(Surface::Osd).is_some());

            sleep(Duration::from_secs(41)).await;
            assert_eq!(clears(&host), 1);
            assert!(host.overlay_on(Surface::Osd).is_none());
        })
        .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_timers_are_per_surface() {
        local(async {
            let (host, manager) = setup();
            host.attach_navigator();
            manager.open(&item_a()).await;
            let on_panel = ContentItem::new("C", "u3")
                .with_target(Surface::Controller)
                .with_autoclose(10);
            manager.open(&on_panel).await;
            assert_eq!(manager.outstanding_timers(), 2);

            sleep(Duration::from_secs(11)).await;
            assert_eq!(
                host.commands().last(),
                Some(&HostCommand::ClearOverlay(Surface::Controller))
            );
            assert!(manager.timer_armed(Surface::Osd));
        })
        .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_display_arms_nothing() {
        local(async {
            let (host, manager) = setup();
            host.set_failures(Failures {
                display: true,
                ..Default::default()
            });
            manager.open(&item_a()).await;

            assert_eq!(manager.outstanding_timers(), 0);
            assert_eq!(manager.state(Surface::Osd), SurfaceState::Idle);
            sleep(Duration::from_secs(60)).await;
            assert_eq!(clears(&host), 0);
        })
        .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_autoclose_means_no_timer() {
        local(async {
            let (_host, manager) = setup();
            manager.open(&ContentItem::new("D", "u4")).await;
            assert_eq!(manager.outstanding_timers(), 0);
            assert_eq!(manager.state(Surface::Osd), SurfaceState::Visible);
        })
        .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_detached_navigator_closes_on_osd() {
        local(async {
            let (host, manager) = setup();
            host.attach_navigator();
            let item = ContentItem::new("C", "u3")
                .with_target(Surface::Controller)
                .with_autoclose(10);
            manager.open(&item).await;
            host.detach_navigators();

            sleep(Duration::from_secs(11)).await;
            assert_eq!(host.commands().last(), Some(&HostCommand::ClearOverlay(Surface::Osd)));
        })
        .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_clear_keeps_surface_visible() {
        local(async {
            let (host, manager) = setup();
            manager.open(&item_a()).await;
            host.set_failures(Failures {
                clear: true,
                ..Default::default()
            });

            manager.close(Surface::Osd).await;
            assert_eq!(clears(&host), 1);
            assert_eq!(manager.state(Surface::Osd), SurfaceState::Visible);
            assert!(host.overlay_on(Surface::Osd).is_some());
            // The timer is gone even though the clear failed
            assert!(!manager.timer_armed(Surface::Osd));

            host.set_failures(Failures::default());
            manager.close(Surface::Osd).await;
            assert_eq!(manager.state(Surface::Osd), SurfaceState::Idle);
            assert!(host.overlay_on(Surface::Osd).is_none());
        })
        .await;
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let (host, manager) = setup();
        manager.close(Surface::Osd).await;
        manager.close(Surface::Osd).await;
        assert_eq!(clears(&host), 2);
        assert_eq!(manager.state(Surface::Osd), SurfaceState::Idle);
    }
}
