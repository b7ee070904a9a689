//! PIN Gate Controller
//!
//! Owns the [`GateState`] reducer and carries out its effects against the
//! collaborators: notifications go to the sink, redirects are fed back as
//! route changes and status lookups are awaited and fed back with their
//! request token.

use std::collections::VecDeque;
use std::sync::Arc;

use platform::inactivity::InactivityMonitor;
use platform::notify::{Notification, NotificationSink};
use platform::pin::ClearTextPin;

use crate::application::config::GateConfig;
use crate::domain::entity::Identity;
use crate::domain::gate::{
    GateDecision, GateEffect, GateEvent, GatePhase, GateState, LookupOutcome, VerifyOutcome,
};
use crate::domain::services::{IdentityProvider, PinSetupService, PinStatusLookup, PinVerifier};
use crate::domain::value_object::{PinSetupStatus, RoutePath};
use crate::error::{GateError, GateResult};

/// PIN gate controller
pub struct PinGate<I, P>
where
    I: IdentityProvider,
    P: PinStatusLookup + PinVerifier + PinSetupService,
{
    identity: Arc<I>,
    pins: Arc<P>,
    notifier: Arc<dyn NotificationSink>,
    config: Arc<GateConfig>,
    state: GateState,
}

impl<I, P> PinGate<I, P>
where
    I: IdentityProvider,
    P: PinStatusLookup + PinVerifier + PinSetupService,
{
    pub fn new(
        identity: Arc<I>,
        pins: Arc<P>,
        notifier: Arc<dyn NotificationSink>,
        config: Arc<GateConfig>,
    ) -> Self {
        let state = GateState::new(
            config.public_routes.clone(),
            config.landing_route.clone(),
            RoutePath::root(),
        );
        Self {
            identity,
            pins,
            notifier,
            config,
            state,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn decision(&self) -> GateDecision {
        self.state.decision()
    }

    pub fn phase(&self) -> GatePhase {
        self.state.phase()
    }

    pub fn state(&self) -> &GateState {
        &self.state
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Start an inactivity monitor using the configured idle timeout
    pub fn spawn_inactivity_monitor(&self) -> InactivityMonitor {
        InactivityMonitor::spawn(self.config.idle_timeout)
    }

    // ========================================================================
    // Session
    // ========================================================================

    /// Pick up an existing session; `Ok(true)` if a member was found
    pub async fn restore_session(&mut self) -> GateResult<bool> {
        let current = self.identity.current_identity().await.inspect_err(|e| e.log())?;

        match current {
            Some(identity) => {
                self.sign_in(identity).await;
                Ok(true)
            }
            None => {
                tracing::debug!("No existing session");
                Ok(false)
            }
        }
    }

    pub async fn sign_in(&mut self, identity: Identity) {
        self.dispatch(GateEvent::SignedIn(identity)).await;
    }

    pub async fn sign_out(&mut self) {
        self.dispatch(GateEvent::SignedOut).await;
    }

    pub async fn navigate(&mut self, path: impl Into<RoutePath>) {
        self.dispatch(GateEvent::RouteChanged(path.into())).await;
    }

    // ========================================================================
    // Verification
    // ========================================================================

    /// Check a candidate PIN
    ///
    /// `Ok(false)` on mismatch (malformed input included); `Err` only when
    /// the verifier failed, after an error notification.
    pub async fn verify_attempt(&mut self, pin: &str) -> GateResult<bool> {
        let Some((token, user_id)) = self.state.begin_verification() else {
            return Err(GateError::NotSignedIn);
        };

        let candidate = match ClearTextPin::new(pin) {
            Ok(candidate) => candidate,
            Err(e) => {
                tracing::debug!(user_id = %user_id, error = %e, "Malformed PIN candidate");
                self.dispatch(GateEvent::VerificationResolved {
                    token,
                    outcome: VerifyOutcome::Mismatch,
                })
                .await;
                return Ok(false);
            }
        };

        let (outcome, result) = match self.pins.verify(&user_id, &candidate).await {
            Ok(true) => (VerifyOutcome::Match, Ok(true)),
            Ok(false) => {
                tracing::info!(user_id = %user_id, "PIN mismatch");
                (VerifyOutcome::Mismatch, Ok(false))
            }
            Err(e) => {
                e.log();
                self.notifier
                    .notify(Notification::error("Verification Failed", e.user_message()));
                (VerifyOutcome::Failed, Err(e))
            }
        };

        self.dispatch(GateEvent::VerificationResolved { token, outcome })
            .await;
        if outcome == VerifyOutcome::Match {
            tracing::info!(user_id = %user_id, "PIN verified");
        }
        result
    }

    pub async fn dismiss_verification(&mut self) {
        self.dispatch(GateEvent::VerifyDismissed).await;
    }

    // ========================================================================
    // Setup
    // ========================================================================

    /// Validate and persist a new PIN, then move on to verification
    ///
    /// Refused unless the member has no PIN on record. Policy and
    /// confirmation failures are returned without a notification; service
    /// failures are notified.
    pub async fn submit_setup(&mut self, pin: &str, confirm: &str) -> GateResult<()> {
        let user_id = self
            .state
            .identity()
            .map(|identity| identity.user_id)
            .ok_or(GateError::NotSignedIn)?;

        // Only a member with no PIN on record may create one.
        if self.state.session().has_pin_setup != PinSetupStatus::Missing {
            tracing::warn!(
                user_id = %user_id,
                status = %self.state.session().has_pin_setup,
                "Refused PIN setup"
            );
            return Err(GateError::SetupNotRequired);
        }

        let pin = ClearTextPin::new(pin)?;
        pin.check_strength()?;
        let confirm = ClearTextPin::new(confirm).map_err(|_| GateError::PinMismatch)?;
        if !pin.matches(&confirm) {
            return Err(GateError::PinMismatch);
        }

        if let Err(e) = self.pins.set_pin(&user_id, &pin).await {
            e.log();
            self.notifier
                .notify(Notification::error("PIN Setup Failed", e.user_message()));
            return Err(e);
        }

        tracing::info!(user_id = %user_id, "PIN set up");
        self.notifier.notify(Notification::success(
            "PIN Created",
            "Your PIN has been set up successfully",
        ));
        self.complete_setup().await;
        Ok(())
    }

    /// Setup persisted: require a fresh verification and re-check status
    pub async fn complete_setup(&mut self) {
        self.dispatch(GateEvent::SetupCompleted).await;
    }

    pub async fn dismiss_setup(&mut self) {
        self.dispatch(GateEvent::SetupDismissed).await;
    }

    pub async fn on_inactivity_timeout(&mut self) {
        self.dispatch(GateEvent::InactivityTimeout).await;
    }

    // ========================================================================
    // Effects
    // ========================================================================

    async fn dispatch(&mut self, event: GateEvent) {
        let mut queue = VecDeque::from([event]);

        while let Some(event) = queue.pop_front() {
            for effect in self.state.apply(event) {
                match effect {
                    GateEffect::Notify(notification) => self.notifier.notify(notification),
                    GateEffect::Redirect(route) => {
                        tracing::info!(route = %route, "Redirecting verified member");
                        queue.push_back(GateEvent::RouteChanged(route));
                    }
                    GateEffect::LookupPinStatus { token, user_id } => {
                        let outcome = match self.pins.has_pin(&user_id).await {
                            Ok(true) => LookupOutcome::Present,
                            Ok(false) => LookupOutcome::Missing,
                            Err(e) => {
                                tracing::warn!(user_id = %user_id, error = %e, "PIN status lookup failed");
                                LookupOutcome::Failed
                            }
                        };
                        queue.push_back(GateEvent::PinStatusResolved { token, outcome });
                    }
                }
            }
        }

        tracing::debug!(
            decision = %self.state.decision(),
            phase = %self.state.phase(),
            route = %self.state.route(),
            "Gate evaluated"
        );
    }
}
