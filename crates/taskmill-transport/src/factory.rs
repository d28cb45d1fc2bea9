//! Transport factory chain — resolves a DSN to the transport responsible
//! for it. A factory declares which DSN prefixes it answers to; the first
//! supporting factory wins.

use crate::dsn::Dsn;
use crate::failover::{FailoverTransport, MODE_NORMAL};
use crate::filesystem::FilesystemTransport;
use crate::memory::InMemoryTransport;
use crate::serializer::TaskSerializer;
use crate::Transport;
use std::collections::HashMap;
use std::sync::Arc;
use taskmill_core::{Result, TaskmillError};
use taskmill_policy::PolicyOrchestrator;

/// Extra options a caller can pass alongside the DSN; they override the
/// DSN's own query options.
pub type TransportOptions = HashMap<String, String>;

/// A factory responsible for one transport kind.
pub trait TransportFactory: Send + Sync {
    /// Whether this factory handles the given DSN string.
    fn support(&self, dsn: &str) -> bool;

    /// Build the transport. Only called when [`support`](Self::support)
    /// returned true for the DSN.
    fn create_transport(
        &self,
        dsn: &Dsn,
        options: &TransportOptions,
        serializer: Arc<dyn TaskSerializer>,
        orchestrator: Arc<PolicyOrchestrator>,
    ) -> Result<Box<dyn Transport>>;
}

/// `memory://` transports.
#[derive(Debug, Default)]
pub struct InMemoryTransportFactory;

impl TransportFactory for InMemoryTransportFactory {
    fn support(&self, dsn: &str) -> bool {
        dsn.starts_with("memory://")
    }

    fn create_transport(
        &self,
        dsn: &Dsn,
        options: &TransportOptions,
        _serializer: Arc<dyn TaskSerializer>,
        orchestrator: Arc<PolicyOrchestrator>,
    ) -> Result<Box<dyn Transport>> {
        let dsn = dsn.with_overrides(options);
        Ok(Box::new(InMemoryTransport::from_dsn(&dsn, orchestrator)))
    }
}

/// `fs://` / `filesystem://` transports.
#[derive(Debug, Default)]
pub struct FilesystemTransportFactory;

impl TransportFactory for FilesystemTransportFactory {
    fn support(&self, dsn: &str) -> bool {
        dsn.starts_with("fs://") || dsn.starts_with("filesystem://")
    }

    fn create_transport(
        &self,
        dsn: &Dsn,
        options: &TransportOptions,
        serializer: Arc<dyn TaskSerializer>,
        orchestrator: Arc<PolicyOrchestrator>,
    ) -> Result<Box<dyn Transport>> {
        let dsn = dsn.with_overrides(options);
        Ok(Box::new(FilesystemTransport::from_dsn(
            &dsn,
            serializer,
            orchestrator,
        )?))
    }
}

/// `failover://` / `fo://` transports. Every nested DSN inside the
/// parentheses is resolved through the inner factory chain; handing this
/// factory a chain without itself keeps nested failover DSNs a configuration
/// error instead of unbounded recursion.
pub struct FailoverTransportFactory {
    factories: Vec<Arc<dyn TransportFactory>>,
}

impl FailoverTransportFactory {
    pub fn new(factories: Vec<Arc<dyn TransportFactory>>) -> Self {
        Self { factories }
    }

    /// Resolve every nested DSN through the inner chain and assemble the
    /// failover transport.
    fn build(
        &self,
        dsn: &Dsn,
        options: &TransportOptions,
        serializer: Arc<dyn TaskSerializer>,
        orchestrator: Arc<PolicyOrchestrator>,
    ) -> Result<FailoverTransport> {
        let dsn = dsn.with_overrides(options);
        let mut children: Vec<Box<dyn Transport>> = Vec::new();
        for nested in dsn.nested()? {
            let factory = self
                .factories
                .iter()
                .find(|f| f.support(nested.raw()))
                .ok_or_else(TaskmillError::unsupported_dsn)?;
            children.push(factory.create_transport(
                &nested,
                options,
                serializer.clone(),
                orchestrator.clone(),
            )?);
        }

        let mode = dsn.option("mode").unwrap_or(MODE_NORMAL);

        FailoverTransport::new(children, mode)
    }
}

impl TransportFactory for FailoverTransportFactory {
    fn support(&self, dsn: &str) -> bool {
        dsn.starts_with("failover://") || dsn.starts_with("fo://")
    }

    fn create_transport(
        &self,
        dsn: &Dsn,
        options: &TransportOptions,
        serializer: Arc<dyn TaskSerializer>,
        orchestrator: Arc<PolicyOrchestrator>,
    ) -> Result<Box<dyn Transport>> {
        Ok(Box::new(self.build(dsn, options, serializer, orchestrator)?))
    }
}

/// The full resolution chain callers go through: scans the registered
/// factories in order and delegates to the first supporting one.
pub struct TransportRegistry {
    factories: Vec<Arc<dyn TransportFactory>>,
}

impl TransportRegistry {
    pub fn new(factories: Vec<Arc<dyn TransportFactory>>) -> Self {
        Self { factories }
    }

    /// Registry pre-loaded with every factory this crate ships. The failover
    /// factory resolves its nested DSNs against the non-composite factories.
    pub fn with_defaults() -> Self {
        let memory: Arc<dyn TransportFactory> = Arc::new(InMemoryTransportFactory);
        let filesystem: Arc<dyn TransportFactory> = Arc::new(FilesystemTransportFactory);
        let failover: Arc<dyn TransportFactory> = Arc::new(FailoverTransportFactory::new(vec![
            memory.clone(),
            filesystem.clone(),
        ]));
        Self::new(vec![memory, filesystem, failover])
    }

    /// Resolve a DSN string to a transport.
    pub fn create_transport(
        &self,
        dsn: &str,
        options: &TransportOptions,
        serializer: Arc<dyn TaskSerializer>,
        orchestrator: Arc<PolicyOrchestrator>,
    ) -> Result<Box<dyn Transport>> {
        for factory in &self.factories {
            if !factory.support(dsn) {
                continue;
            }
            tracing::debug!("creating transport for dsn \"{dsn}\"");
            let parsed = Dsn::from_string(dsn)?;
            return factory.create_transport(&parsed, options, serializer, orchestrator);
        }

        Err(TaskmillError::unsupported_dsn())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serializer::JsonTaskSerializer;

    fn services() -> (Arc<dyn TaskSerializer>, Arc<PolicyOrchestrator>) {
        (
            Arc::new(JsonTaskSerializer),
            Arc::new(PolicyOrchestrator::with_defaults()),
        )
    }

    fn resolve(dsn: &str) -> Result<Box<dyn Transport>> {
        let (serializer, orchestrator) = services();
        TransportRegistry::with_defaults().create_transport(
            dsn,
            &TransportOptions::new(),
            serializer,
            orchestrator,
        )
    }

    #[test]
    fn test_failover_factory_support() {
        let factory = FailoverTransportFactory::new(Vec::new());
        assert!(!factory.support("test://"));
        assert!(factory.support("failover://(memory://a || memory://b)"));
        assert!(factory.support("fo://(memory://a || memory://b)"));
    }

    #[test]
    fn test_unregistered_scheme_is_rejected_with_fixed_message() {
        let err = resolve("test://something").map(|_| ()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "The given dsn cannot be used to create a transport"
        );
    }

    #[test]
    fn test_failover_dsn_round_trip_including_alias() {
        for dsn in [
            "failover://(memory://a || memory://b)?mode=normal",
            "fo://(memory://a || memory://b)?mode=normal",
        ] {
            let transport = resolve(dsn).unwrap();
            assert_eq!(transport.options()["mode"], "normal");
        }
    }

    #[test]
    fn test_failover_mode_defaults_to_normal() {
        let transport = resolve("failover://(memory://a || memory://b)").unwrap();
        assert_eq!(transport.options()["mode"], "normal");
    }

    #[test]
    fn test_failover_round_robin_mode_is_exposed() {
        let transport = resolve("fo://(memory://a || memory://b)?mode=round_robin").unwrap();
        assert_eq!(transport.options()["mode"], "round_robin");
    }

    #[test]
    fn test_failover_child_count_matches_nested_dsns() {
        let inner: Vec<Arc<dyn TransportFactory>> = vec![Arc::new(InMemoryTransportFactory)];
        let factory = FailoverTransportFactory::new(inner);

        for raw in [
            "failover://(memory://a || memory://b)?mode=normal",
            "fo://(memory://a || memory://b)?mode=normal",
        ] {
            let (serializer, orchestrator) = services();
            let dsn = Dsn::from_string(raw).unwrap();
            let transport = factory
                .build(&dsn, &TransportOptions::new(), serializer, orchestrator)
                .unwrap();
            assert_eq!(transport.children_count(), 2);
            assert_eq!(transport.options()["mode"], "normal");
        }
    }

    #[test]
    fn test_failover_with_unresolvable_nested_dsn() {
        // The inner chain has no failover factory, so nesting failover
        // inside failover fails resolution instead of recursing.
        let err = resolve("failover://(fo://(memory://a) || memory://b)")
            .map(|_| ())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "The given dsn cannot be used to create a transport"
        );
    }

    #[test]
    fn test_memory_dsn_resolves() {
        assert!(resolve("memory://first_in_first_out").is_ok());
    }

    #[test]
    fn test_memory_factory_honours_caller_options() {
        let (serializer, orchestrator) = services();
        let options =
            TransportOptions::from([("execution_mode".to_string(), "first_in_last_out".to_string())]);
        let transport = TransportRegistry::with_defaults()
            .create_transport(
                "memory://?execution_mode=nice",
                &options,
                serializer,
                orchestrator,
            )
            .unwrap();
        assert_eq!(transport.options()["execution_mode"], "first_in_last_out");
    }

    #[test]
    fn test_filesystem_factory_honours_caller_path_option() {
        let dir = tempfile::tempdir().unwrap();
        let (serializer, orchestrator) = services();
        let options = TransportOptions::from([(
            "path".to_string(),
            dir.path().display().to_string(),
        )]);
        let transport = TransportRegistry::with_defaults()
            .create_transport(
                "fs://first_in_first_out?path=/tmp/taskmill-ignored",
                &options,
                serializer,
                orchestrator,
            )
            .unwrap();
        assert_eq!(transport.options()["path"], dir.path().display().to_string());
    }

    #[test]
    fn test_failover_resolves_nested_dsn_carrying_its_own_options() {
        let dir = tempfile::tempdir().unwrap();
        let (serializer, orchestrator) = services();
        let dsn = format!(
            "failover://(fs://first_in_first_out?path={} || memory://a)?mode=normal",
            dir.path().display()
        );
        let transport = TransportRegistry::with_defaults()
            .create_transport(&dsn, &TransportOptions::new(), serializer, orchestrator)
            .unwrap();
        assert_eq!(transport.options()["mode"], "normal");
    }

    #[test]
    fn test_caller_options_override_dsn_options() {
        let (serializer, orchestrator) = services();
        let options = TransportOptions::from([("mode".to_string(), "round_robin".to_string())]);
        let transport = TransportRegistry::with_defaults()
            .create_transport(
                "failover://(memory://a || memory://b)?mode=normal",
                &options,
                serializer,
                orchestrator,
            )
            .unwrap();
        assert_eq!(transport.options()["mode"], "round_robin");
    }
}
