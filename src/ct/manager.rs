// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Lifecycle manager for the CT interceptor
//!
//! One manager is shared (via `Arc`) by every client configuration site in
//! the process. It attaches its interceptor to a chain when the preference is
//! on, detaches it when the preference goes off, and debounces the failure
//! log lines the interceptor reports.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use ctswitch::{
//!     CertificateVerifier, HttpClient, InterceptorManager, SctPresenceVerifier, StaticPreference,
//! };
//!
//! # fn main() -> ctswitch::Result<()> {
//! let preference = Arc::new(StaticPreference::new(true));
//! let manager = Arc::new(InterceptorManager::new(preference.clone(), || {
//!     Ok(Arc::new(SctPresenceVerifier::new(2)?) as Arc<dyn CertificateVerifier>)
//! }));
//!
//! let mut builder = HttpClient::builder().custom_config(manager.clone());
//! let _verified = builder.build()?;
//! assert!(manager.is_enabled());
//!
//! preference.set(false);
//! let _plain = builder.build()?;
//! assert!(!manager.is_enabled());
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use parking_lot::Mutex;

use super::config::CtConfig;
use super::debounce::{FailureLogDebouncer, LogSink, TracingLogSink};
use super::interceptor::{CtInterceptor, CtLogger};
use super::outcome::VerificationOutcome;
use super::verifier::CertificateVerifier;
use crate::error::Result;
use crate::http::{HttpBuilderConfig, HttpClientBuilder};
use crate::network::{InterceptorChain, SharedInterceptor};
use crate::preferences::PreferenceSource;

/// Builds the verifier the first time the interceptor is needed
pub type VerifierFactory = Box<dyn Fn() -> Result<Arc<dyn CertificateVerifier>> + Send + Sync>;

/// What a reconcile pass did to the chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileAction {
    /// Interceptor appended
    Attached,
    /// This many copies of the interceptor removed
    Detached(usize),
    /// Desired and current state already agreed
    Unchanged,
}

#[derive(Default)]
struct ManagerState {
    interceptor: Option<SharedInterceptor>,
    enabled: bool,
}

/// Attaches and detaches the CT interceptor according to a live preference
pub struct InterceptorManager {
    preferences: Arc<dyn PreferenceSource>,
    verifier_factory: VerifierFactory,
    config: CtConfig,
    state: Mutex<ManagerState>,
    debouncer: Arc<FailureLogDebouncer>,
}

impl InterceptorManager {
    /// Create a manager polling `preferences` and building its verifier lazily
    pub fn new<F>(preferences: Arc<dyn PreferenceSource>, verifier_factory: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn CertificateVerifier>> + Send + Sync + 'static,
    {
        Self {
            preferences,
            verifier_factory: Box::new(verifier_factory),
            config: CtConfig::default(),
            state: Mutex::new(ManagerState::default()),
            debouncer: Arc::new(FailureLogDebouncer::new(Arc::new(TracingLogSink))),
        }
    }

    /// Set the interceptor configuration; applies from the next construction
    pub fn with_config(mut self, config: CtConfig) -> Self {
        self.config = config;
        self
    }

    /// Send debounced failure lines to `sink` instead of `tracing`
    pub fn with_log_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.debouncer = Arc::new(FailureLogDebouncer::new(sink));
        self
    }

    /// Bring `chain` in line with `desired_enabled`
    ///
    /// Repeating a call with the same value never mutates the chain again.
    /// A failure to construct the interceptor is returned as-is and leaves
    /// both the chain and the manager unchanged.
    pub fn reconcile<'a>(
        &self,
        desired_enabled: bool,
        chain: &'a mut InterceptorChain,
    ) -> Result<&'a mut InterceptorChain> {
        self.reconcile_action(desired_enabled, chain)?;
        Ok(chain)
    }

    /// Same as [`reconcile`](Self::reconcile), reporting what changed
    pub fn reconcile_action(
        &self,
        desired_enabled: bool,
        chain: &mut InterceptorChain,
    ) -> Result<ReconcileAction> {
        let mut state = self.state.lock();

        let action = match (desired_enabled, state.enabled) {
            (true, false) => {
                let interceptor = self.get_or_create(&mut state)?;
                chain.add_shared(interceptor);
                state.enabled = true;
                ReconcileAction::Attached
            }
            (false, true) => {
                let removed = state
                    .interceptor
                    .as_ref()
                    .map(|interceptor| chain.remove_same(interceptor))
                    .unwrap_or(0);
                state.enabled = false;
                ReconcileAction::Detached(removed)
            }
            _ => ReconcileAction::Unchanged,
        };

        if action != ReconcileAction::Unchanged {
            tracing::info!(?action, chain_len = chain.len(), "CT interceptor reconciled");
        }
        Ok(action)
    }

    /// Poll the preference source, then reconcile
    ///
    /// An unreadable preference counts as disabled.
    pub fn reconcile_with_preferences<'a>(
        &self,
        chain: &'a mut InterceptorChain,
    ) -> Result<&'a mut InterceptorChain> {
        let desired = self.desired_enabled();
        self.reconcile(desired, chain)
    }

    /// Current preference value, with read failures mapped to `false`
    pub fn desired_enabled(&self) -> bool {
        match self.preferences.certificate_transparency_enabled() {
            Ok(enabled) => enabled,
            Err(e) => {
                tracing::warn!(error = %e, "Could not read CT preference, treating as disabled");
                false
            }
        }
    }

    /// Verification callback: debounces failure log lines
    pub fn on_verification_result(&self, host: &str, outcome: &VerificationOutcome) {
        self.debouncer.record(host, outcome);
    }

    /// Whether the interceptor is believed to be attached
    pub fn is_enabled(&self) -> bool {
        self.state.lock().enabled
    }

    /// Whether the last reported outcome was part of a failure streak
    pub fn is_failing(&self) -> bool {
        self.debouncer.is_failing()
    }

    /// The cached interceptor, if it has been constructed
    pub fn interceptor(&self) -> Option<SharedInterceptor> {
        self.state.lock().interceptor.clone()
    }

    fn get_or_create(&self, state: &mut ManagerState) -> Result<SharedInterceptor> {
        if let Some(ref interceptor) = state.interceptor {
            return Ok(interceptor.clone());
        }

        let verifier = (self.verifier_factory)()?;
        let logger: Arc<dyn CtLogger> = self.debouncer.clone();
        let interceptor: SharedInterceptor =
            Arc::new(CtInterceptor::new(verifier, self.config.clone(), logger)?);

        tracing::debug!(
            fail_on_error = self.config.fail_on_error,
            "Constructed CT interceptor"
        );
        state.interceptor = Some(interceptor.clone());
        Ok(interceptor)
    }
}

impl HttpBuilderConfig for InterceptorManager {
    fn perform_custom_config(&self, builder: &mut HttpClientBuilder) -> Result<()> {
        self.reconcile_with_preferences(builder.network_interceptors_mut())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ct::debounce::tests::RecordingSink;
    use crate::ct::outcome::{FailureReason, SuccessReason};
    use crate::error::Error;
    use crate::network::{same_interceptor, RequestInterceptor, RequestLogger};
    use crate::preferences::StaticPreference;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct BrokenPreference;

    impl PreferenceSource for BrokenPreference {
        fn certificate_transparency_enabled(&self) -> Result<bool> {
            Err(Error::preference("store unavailable"))
        }
    }

    fn accept_all(_host: &str, _der: &[u8]) -> VerificationOutcome {
        VerificationOutcome::Success(SuccessReason::Trusted { sct_count: 2 })
    }

    fn manager_with(pref: Arc<dyn PreferenceSource>) -> InterceptorManager {
        InterceptorManager::new(pref, || Ok(Arc::new(accept_all) as Arc<dyn CertificateVerifier>))
    }

    fn manager() -> InterceptorManager {
        manager_with(Arc::new(StaticPreference::default()))
    }

    fn failure() -> VerificationOutcome {
        VerificationOutcome::failure(FailureReason::NoScts)
    }

    #[test]
    fn test_enable_is_idempotent() {
        let manager = manager();
        let mut chain = InterceptorChain::new();

        assert_eq!(
            manager.reconcile_action(true, &mut chain).unwrap(),
            ReconcileAction::Attached
        );
        for _ in 0..3 {
            assert_eq!(
                manager.reconcile_action(true, &mut chain).unwrap(),
                ReconcileAction::Unchanged
            );
        }

        let ct = manager.interceptor().unwrap();
        assert_eq!(chain.len(), 1);
        assert_eq!(chain.count_same(&ct), 1);
    }

    #[test]
    fn test_disable_is_idempotent() {
        let manager = manager();
        let mut chain = InterceptorChain::new();

        manager.reconcile(true, &mut chain).unwrap();
        assert_eq!(
            manager.reconcile_action(false, &mut chain).unwrap(),
            ReconcileAction::Detached(1)
        );
        assert_eq!(
            manager.reconcile_action(false, &mut chain).unwrap(),
            ReconcileAction::Unchanged
        );
        assert!(chain.is_empty());
        assert!(!manager.is_enabled());
    }

    #[test]
    fn test_disabled_start_never_constructs() {
        let built = Arc::new(AtomicUsize::new(0));
        let counter = built.clone();
        let manager = InterceptorManager::new(Arc::new(StaticPreference::default()), move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(accept_all) as Arc<dyn CertificateVerifier>)
        });

        let mut chain = InterceptorChain::new();
        manager.reconcile(false, &mut chain).unwrap();

        assert_eq!(built.load(Ordering::SeqCst), 0);
        assert!(manager.interceptor().is_none());
        assert!(chain.is_empty());
    }

    #[test]
    fn test_toggle_keeps_foreign_interceptors() {
        let manager = manager();
        let mut chain = InterceptorChain::new();
        let logger = chain.add(RequestLogger::default());
        let other_logger = chain.add(RequestLogger::default());

        manager.reconcile(true, &mut chain).unwrap();
        let ct = manager.interceptor().unwrap();
        assert_eq!(chain.len(), 3);
        assert_eq!(chain.count_same(&ct), 1);

        manager.reconcile(false, &mut chain).unwrap();
        assert_eq!(chain.len(), 2);
        assert!(!chain.contains_same(&ct));
        assert!(chain.contains_same(&logger));
        assert!(chain.contains_same(&other_logger));
    }

    #[test]
    fn test_interceptor_identity_is_stable() {
        let built = Arc::new(AtomicUsize::new(0));
        let counter = built.clone();
        let manager = InterceptorManager::new(Arc::new(StaticPreference::default()), move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(accept_all) as Arc<dyn CertificateVerifier>)
        });

        let mut first_chain = InterceptorChain::new();
        manager.reconcile(true, &mut first_chain).unwrap();
        let first = manager.interceptor().unwrap();

        manager.reconcile(false, &mut first_chain).unwrap();
        let mut second_chain = InterceptorChain::new();
        manager.reconcile(true, &mut second_chain).unwrap();
        let second = manager.interceptor().unwrap();

        assert!(same_interceptor(&first, &second));
        assert!(second_chain.contains_same(&first));
        assert_eq!(built.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_construction_failure_propagates() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = attempts.clone();
        let manager = InterceptorManager::new(Arc::new(StaticPreference::default()), move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(Error::verifier("log list missing"))
        });

        let mut chain = InterceptorChain::new();
        let err = manager.reconcile(true, &mut chain).unwrap_err();

        assert!(matches!(err, Error::Verifier(_)));
        assert!(chain.is_empty());
        assert!(!manager.is_enabled());
        assert!(manager.interceptor().is_none());

        // nothing cached, so the next pass tries again
        assert!(manager.reconcile(true, &mut chain).is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_invalid_config_propagates() {
        let manager = manager().with_config(CtConfig::new().include_host("a.*.com"));
        let mut chain = InterceptorChain::new();

        assert!(matches!(
            manager.reconcile(true, &mut chain),
            Err(Error::Config(_))
        ));
        assert!(!manager.is_enabled());
    }

    #[test]
    fn test_preference_is_polled() {
        let pref = Arc::new(StaticPreference::new(true));
        let manager = manager_with(pref.clone());
        let mut chain = InterceptorChain::new();

        manager.reconcile_with_preferences(&mut chain).unwrap();
        assert_eq!(chain.len(), 1);

        pref.set(false);
        manager.reconcile_with_preferences(&mut chain).unwrap();
        assert!(chain.is_empty());
    }

    #[test]
    fn test_unreadable_preference_disables() {
        let manager = manager_with(Arc::new(BrokenPreference));
        let mut chain = InterceptorChain::new();

        manager.reconcile(true, &mut chain).unwrap();
        assert!(!manager.desired_enabled());

        manager.reconcile_with_preferences(&mut chain).unwrap();
        assert!(chain.is_empty());
        assert!(!manager.is_enabled());
    }

    #[test]
    fn test_toggle_and_debounce_scenario() {
        let sink = Arc::new(RecordingSink::default());
        let manager = manager().with_log_sink(sink.clone());
        let mut chain = InterceptorChain::new();

        assert!(!manager.is_enabled());
        assert!(!manager.is_failing());

        manager.reconcile(true, &mut chain).unwrap();
        assert_eq!(chain.len(), 1);
        assert!(manager.is_enabled());

        manager.on_verification_result("example.com", &failure());
        assert_eq!(sink.count(), 1);
        manager.on_verification_result("example.com", &failure());
        assert_eq!(sink.count(), 1);

        manager.reconcile(false, &mut chain).unwrap();
        assert!(chain.is_empty());
        assert!(!manager.is_enabled());
    }

    #[tokio::test]
    async fn test_interceptor_failures_reach_debouncer() {
        use crate::http::{Request, Response};
        use bytes::Bytes;
        use reqwest::header::HeaderMap;
        use reqwest::StatusCode;

        let sink = Arc::new(RecordingSink::default());
        let manager = InterceptorManager::new(Arc::new(StaticPreference::new(true)), || {
            Ok(Arc::new(|_: &str, _: &[u8]| failure()) as Arc<dyn CertificateVerifier>)
        })
        .with_log_sink(sink.clone());

        let mut chain = InterceptorChain::new();
        manager.reconcile_with_preferences(&mut chain).unwrap();
        let ct = manager.interceptor().unwrap();

        let request = Request::get("https://example.com/").unwrap();
        for _ in 0..2 {
            let mut response = Response::new(
                StatusCode::OK,
                HeaderMap::new(),
                Bytes::new(),
                request.url.clone(),
                1,
            )
            .with_peer_certificate(Bytes::from_static(b"der"));
            let err = ct.after_response(&request, &mut response).await.unwrap_err();
            assert!(err.is_certificate_transparency());
        }

        assert_eq!(sink.count(), 1);
        assert!(manager.is_failing());
    }

    #[test]
    fn test_attach_appends_after_existing_entries() {
        let manager = manager();
        let mut chain = InterceptorChain::new();
        let logger = chain.add(RequestLogger::default());

        manager.reconcile(true, &mut chain).unwrap();
        let ct = manager.interceptor().unwrap();

        let order: Vec<_> = chain.iter().cloned().collect();
        assert!(same_interceptor(&order[0], &logger));
        assert!(same_interceptor(&order[1], &ct));
    }

    #[test]
    fn test_concurrent_reconcile_attaches_once() {
        let manager = Arc::new(manager());
        let chain = Arc::new(parking_lot::Mutex::new(InterceptorChain::new()));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let manager = manager.clone();
                let chain = chain.clone();
                std::thread::spawn(move || {
                    manager.reconcile(true, &mut chain.lock()).unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let ct = manager.interceptor().unwrap();
        assert_eq!(chain.lock().count_same(&ct), 1);
    }

    #[test]
    fn test_builder_pass() {
        let pref = Arc::new(StaticPreference::new(true));
        let manager = Arc::new(manager_with(pref.clone()));
        let mut builder = HttpClientBuilder::new().custom_config(manager.clone());

        let client = builder.build().unwrap();
        assert_eq!(client.network_interceptors().len(), 1);

        let rebuilt = builder.build().unwrap();
        assert_eq!(rebuilt.network_interceptors().len(), 1);

        pref.set(false);
        let plain = builder.build().unwrap();
        assert!(plain.network_interceptors().is_empty());
        assert!(builder.network_interceptors().is_empty());
    }

    #[tokio::test]
    async fn test_plain_http_passes_through_ct() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&server)
            .await;

        let sink = Arc::new(RecordingSink::default());
        let manager = Arc::new(
            InterceptorManager::new(Arc::new(StaticPreference::new(true)), || {
                Ok(Arc::new(|_: &str, _: &[u8]| failure()) as Arc<dyn CertificateVerifier>)
            })
            .with_log_sink(sink.clone()),
        );
        let mut builder = HttpClientBuilder::new().custom_config(manager.clone());
        let client = builder.build().unwrap();

        let response = client
            .get(format!("{}/health", server.uri()))
            .await
            .unwrap();

        assert_eq!(response.text().unwrap(), "ok");
        assert!(response.peer_certificate.is_none());
        assert!(manager.is_enabled());
        assert!(!manager.is_failing());
        assert_eq!(sink.count(), 0);
    }
}
