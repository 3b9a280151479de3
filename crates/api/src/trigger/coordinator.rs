use crate::reminder::ReconcileRemindersUseCase;
use crate::shared::usecase::execute;
use rxminder_domain::{AppState, NotificationResponse, PresentationPolicy, TriggerOccasion, UserId};
use rxminder_infra::{IAppLifecycle, INotificationPlatform, ListenerId, RxminderContext};
use std::sync::Arc;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Starts a reconciliation run on every trigger occasion: once at
/// startup, on every notification tap and whenever the app comes back to
/// the foreground
pub struct TriggerCoordinator;

impl TriggerCoordinator {
    /// Returns after the startup run has completed. The listeners stay
    /// registered for as long as the returned subscription is alive.
    pub async fn start(ctx: RxminderContext, user_id: UserId) -> TriggerSubscription {
        if let Err(e) = ctx
            .services
            .notifications
            .set_presentation_policy(PresentationPolicy::always())
            .await
        {
            warn!("Unable to set notification presentation policy. Err: {:?}", e);
        }

        // Events arriving during the startup run queue up in the channels
        let (response_sender, responses) = unbounded_channel();
        let (state_sender, states) = unbounded_channel();
        let response_listener = ctx
            .services
            .notifications
            .add_response_listener(response_sender);
        let state_listener = ctx.services.app_lifecycle.add_state_listener(state_sender);

        run_reconcile(&ctx, user_id, TriggerOccasion::Startup).await;

        let notifications = ctx.services.notifications.clone();
        let app_lifecycle = ctx.services.app_lifecycle.clone();
        let task = tokio::spawn(listen(ctx, user_id, responses, states));
        info!("Listening for reminder triggers of user {}", user_id);

        TriggerSubscription {
            notifications,
            app_lifecycle,
            listeners: Some((response_listener, state_listener)),
            task: Some(task),
        }
    }
}

async fn run_reconcile(ctx: &RxminderContext, user_id: UserId, occasion: TriggerOccasion) {
    let usecase = ReconcileRemindersUseCase { user_id, occasion };
    // Failures are logged by the use case and retried on the next occasion
    let _ = execute(usecase, ctx).await;
}

fn spawn_reconcile(ctx: &RxminderContext, user_id: UserId, occasion: TriggerOccasion) {
    let ctx = ctx.clone();
    tokio::spawn(async move {
        run_reconcile(&ctx, user_id, occasion).await;
    });
}

async fn listen(
    ctx: RxminderContext,
    user_id: UserId,
    mut responses: UnboundedReceiver<NotificationResponse>,
    mut states: UnboundedReceiver<AppState>,
) {
    // The app is in the foreground when it starts
    let mut last_state = AppState::Active;
    loop {
        tokio::select! {
            Some(response) = responses.recv() => {
                info!("Notification {} was tapped", response.handle);
                spawn_reconcile(&ctx, user_id, TriggerOccasion::NotificationTap);
            }
            Some(state) = states.recv() => {
                if state.is_active() && !last_state.is_active() {
                    spawn_reconcile(&ctx, user_id, TriggerOccasion::Foreground);
                }
                last_state = state;
            }
            else => break,
        }
    }
}

/// Owned registration of the trigger listeners. Dropping it has the same
/// effect as calling `teardown`.
pub struct TriggerSubscription {
    notifications: Arc<dyn INotificationPlatform>,
    app_lifecycle: Arc<dyn IAppLifecycle>,
    listeners: Option<(ListenerId, ListenerId)>,
    task: Option<JoinHandle<()>>,
}

impl TriggerSubscription {
    pub fn is_active(&self) -> bool {
        self.listeners.is_some()
    }

    /// Unregisters both listeners and stops listening. Runs that are
    /// already in flight are not affected.
    pub fn teardown(&mut self) {
        if let Some((response_listener, state_listener)) = self.listeners.take() {
            self.notifications
                .remove_response_listener(response_listener);
            self.app_lifecycle.remove_state_listener(state_listener);
            info!("Stopped listening for reminder triggers");
        }
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for TriggerSubscription {
    fn drop(&mut self) {
        self.teardown();
    }
}
