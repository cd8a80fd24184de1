use std::collections::HashMap;
use std::env;

/// Header carrying the SigNoz ingestion key on every export request.
pub const INGESTION_KEY_HEADER: &str = "signoz-ingestion-key";

/// Host suffix of the region-derived ingestion endpoint.
pub const INGEST_HOST_SUFFIX: &str = "staging.signoz.cloud:443";

/// Build the ingestion endpoint for a region code.
pub fn ingest_endpoint(region: &str) -> String {
    format!("https://ingest.{region}.{INGEST_HOST_SUFFIX}/v1/logs")
}

/// Where the process is running, decided once at startup.
///
/// Browser builds target wasm32; everything else is the server runtime.
/// The two contexts read disjoint configuration namespaces: server keys may
/// hold secrets, browser (`PUBLIC_`-prefixed) keys are embedded in publicly
/// served assets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionContext {
    Server,
    Browser,
}

impl ExecutionContext {
    /// Detect the current context from the compilation target.
    pub fn detect() -> Self {
        if cfg!(target_arch = "wasm32") {
            Self::Browser
        } else {
            Self::Server
        }
    }
}

/// Read a context-scoped variable. Empty values count as unset.
///
/// Server context reads `<name>`, browser context reads `PUBLIC_<name>` and
/// never the server-scoped key, so server secrets cannot leak into a
/// browser-resolved configuration.
fn scoped_var(context: ExecutionContext, name: &str) -> Option<String> {
    let key = match context {
        ExecutionContext::Server => name.to_string(),
        ExecutionContext::Browser => format!("PUBLIC_{name}"),
    };
    env::var(key).ok().filter(|value| !value.is_empty())
}

/// First non-empty value among the named variables.
fn first_of(names: &[&str]) -> Option<String> {
    names
        .iter()
        .find_map(|name| env::var(name).ok().filter(|value| !value.is_empty()))
}

/// Export target resolved for one execution context.
///
/// An absent endpoint means there is no export target: the pipeline must not
/// attempt any network operation and falls back to the local sink.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub endpoint: Option<String>,
    pub headers: Option<HashMap<String, String>>,
}

impl ResolvedConfig {
    /// Resolve the export target from the context's environment namespace.
    ///
    /// Endpoint resolution order, first non-empty wins:
    /// 1. explicit `SIGNOZ_ENDPOINT`
    /// 2. derived from `SIGNOZ_REGION` via [`ingest_endpoint`]
    /// 3. absent
    ///
    /// The `signoz-ingestion-key` header is derived independently from
    /// `SIGNOZ_INGESTION_KEY`. Browser context reads the `PUBLIC_`-prefixed
    /// variants of all three keys instead.
    pub fn resolve(context: ExecutionContext) -> Self {
        let endpoint = scoped_var(context, "SIGNOZ_ENDPOINT").or_else(|| {
            scoped_var(context, "SIGNOZ_REGION").map(|region| ingest_endpoint(&region))
        });

        let headers = scoped_var(context, "SIGNOZ_INGESTION_KEY")
            .map(|key| HashMap::from([(INGESTION_KEY_HEADER.to_string(), key)]));

        Self { endpoint, headers }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(HashMap::new)
            .insert(name.into(), value.into());
        self
    }
}

/// Static identity of the emitting process, attached to every exported
/// record via the pipeline's resource. Computed once, never per call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceIdentity {
    pub service_name: String,
    pub service_namespace: Option<String>,
    /// Build revision, exported as `service.version`.
    pub revision: String,
    /// Deployment environment name.
    pub environment: String,
}

impl ServiceIdentity {
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            service_namespace: None,
            revision: "dev".to_string(),
            environment: "development".to_string(),
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.service_namespace = Some(namespace.into());
        self
    }

    pub fn with_revision(mut self, revision: impl Into<String>) -> Self {
        self.revision = revision.into();
        self
    }

    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = environment.into();
        self
    }

    /// Build the identity from environment variables.
    ///
    /// Identity carries no secrets, so the public keys are consulted before
    /// the server-scoped ones regardless of context.
    pub fn from_env() -> Self {
        Self {
            service_name: first_of(&["PUBLIC_SIGNOZ_SERVICE_NAME", "SIGNOZ_SERVICE_NAME"])
                .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string()),
            service_namespace: first_of(&[
                "PUBLIC_SIGNOZ_SERVICE_NAMESPACE",
                "SIGNOZ_SERVICE_NAMESPACE",
            ]),
            revision: first_of(&["PUBLIC_GIT_COMMIT_SHA", "GIT_COMMIT_SHA"])
                .unwrap_or_else(|| "dev".to_string()),
            environment: first_of(&["APP_ENV"]).unwrap_or_else(|| "development".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, MutexGuard};

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    /// Serializes env-mutating tests and removes the named vars on drop.
    struct EnvGuard {
        vars: Vec<&'static str>,
        _lock: MutexGuard<'static, ()>,
    }

    impl EnvGuard {
        fn new(vars: &[&'static str]) -> Self {
            let lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
            for var in vars {
                env::remove_var(var);
            }
            Self {
                vars: vars.to_vec(),
                _lock: lock,
            }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for var in &self.vars {
                env::remove_var(var);
            }
        }
    }

    const ALL_KEYS: &[&str] = &[
        "SIGNOZ_ENDPOINT",
        "SIGNOZ_REGION",
        "SIGNOZ_INGESTION_KEY",
        "PUBLIC_SIGNOZ_ENDPOINT",
        "PUBLIC_SIGNOZ_REGION",
        "PUBLIC_SIGNOZ_INGESTION_KEY",
    ];

    #[test]
    fn detect_returns_server_off_wasm() {
        assert_eq!(ExecutionContext::detect(), ExecutionContext::Server);
    }

    #[test]
    fn ingest_endpoint_uses_fixed_template() {
        assert_eq!(
            ingest_endpoint("eu"),
            "https://ingest.eu.staging.signoz.cloud:443/v1/logs"
        );
    }

    #[test]
    fn resolve_prefers_explicit_endpoint() {
        let _guard = EnvGuard::new(ALL_KEYS);
        env::set_var("SIGNOZ_ENDPOINT", "https://collector.example.com/v1/logs");
        env::set_var("SIGNOZ_REGION", "us");

        let config = ResolvedConfig::resolve(ExecutionContext::Server);

        assert_eq!(
            config.endpoint.as_deref(),
            Some("https://collector.example.com/v1/logs")
        );
    }

    #[test]
    fn resolve_derives_endpoint_from_region() {
        let _guard = EnvGuard::new(ALL_KEYS);
        env::set_var("SIGNOZ_REGION", "in");

        let config = ResolvedConfig::resolve(ExecutionContext::Server);

        assert_eq!(
            config.endpoint.as_deref(),
            Some("https://ingest.in.staging.signoz.cloud:443/v1/logs")
        );
    }

    #[test]
    fn resolve_without_configuration_is_absent() {
        let _guard = EnvGuard::new(ALL_KEYS);

        let config = ResolvedConfig::resolve(ExecutionContext::Server);

        assert!(config.endpoint.is_none());
        assert!(config.headers.is_none());
    }

    #[test]
    fn resolve_treats_empty_values_as_unset() {
        let _guard = EnvGuard::new(ALL_KEYS);
        env::set_var("SIGNOZ_ENDPOINT", "");
        env::set_var("SIGNOZ_REGION", "");

        let config = ResolvedConfig::resolve(ExecutionContext::Server);

        assert!(config.endpoint.is_none());
    }

    #[test]
    fn resolve_builds_ingestion_key_header() {
        let _guard = EnvGuard::new(ALL_KEYS);
        env::set_var("SIGNOZ_INGESTION_KEY", "secret-key");

        let config = ResolvedConfig::resolve(ExecutionContext::Server);

        let headers = config.headers.expect("headers present");
        assert_eq!(
            headers.get(INGESTION_KEY_HEADER).map(String::as_str),
            Some("secret-key")
        );
        assert_eq!(headers.len(), 1);
    }

    #[test]
    fn browser_resolve_never_reads_server_keys() {
        let _guard = EnvGuard::new(ALL_KEYS);
        env::set_var("SIGNOZ_ENDPOINT", "https://server-only.example.com");
        env::set_var("SIGNOZ_REGION", "us");
        env::set_var("SIGNOZ_INGESTION_KEY", "server-secret");

        let config = ResolvedConfig::resolve(ExecutionContext::Browser);

        assert!(config.endpoint.is_none());
        assert!(config.headers.is_none());
    }

    #[test]
    fn server_resolve_never_reads_browser_keys() {
        let _guard = EnvGuard::new(ALL_KEYS);
        env::set_var("PUBLIC_SIGNOZ_ENDPOINT", "https://public.example.com");
        env::set_var("PUBLIC_SIGNOZ_REGION", "eu");
        env::set_var("PUBLIC_SIGNOZ_INGESTION_KEY", "public-key");

        let config = ResolvedConfig::resolve(ExecutionContext::Server);

        assert!(config.endpoint.is_none());
        assert!(config.headers.is_none());
    }

    #[test]
    fn browser_resolve_reads_public_keys() {
        let _guard = EnvGuard::new(ALL_KEYS);
        env::set_var("PUBLIC_SIGNOZ_REGION", "eu");
        env::set_var("PUBLIC_SIGNOZ_INGESTION_KEY", "public-key");

        let config = ResolvedConfig::resolve(ExecutionContext::Browser);

        assert_eq!(
            config.endpoint.as_deref(),
            Some("https://ingest.eu.staging.signoz.cloud:443/v1/logs")
        );
        let headers = config.headers.expect("headers present");
        assert_eq!(
            headers.get(INGESTION_KEY_HEADER).map(String::as_str),
            Some("public-key")
        );
    }

    #[test]
    fn resolved_config_builder_methods() {
        let config = ResolvedConfig::default()
            .with_endpoint("http://localhost:4318/v1/logs")
            .with_header(INGESTION_KEY_HEADER, "k");

        assert_eq!(
            config.endpoint.as_deref(),
            Some("http://localhost:4318/v1/logs")
        );
        assert_eq!(
            config
                .headers
                .as_ref()
                .and_then(|h| h.get(INGESTION_KEY_HEADER))
                .map(String::as_str),
            Some("k")
        );
    }

    #[test]
    fn identity_from_env_uses_defaults() {
        let _guard = EnvGuard::new(&[
            "SIGNOZ_SERVICE_NAME",
            "PUBLIC_SIGNOZ_SERVICE_NAME",
            "SIGNOZ_SERVICE_NAMESPACE",
            "PUBLIC_SIGNOZ_SERVICE_NAMESPACE",
            "GIT_COMMIT_SHA",
            "PUBLIC_GIT_COMMIT_SHA",
            "APP_ENV",
        ]);

        let identity = ServiceIdentity::from_env();

        assert_eq!(identity.service_name, env!("CARGO_PKG_NAME"));
        assert!(identity.service_namespace.is_none());
        assert_eq!(identity.revision, "dev");
        assert_eq!(identity.environment, "development");
    }

    #[test]
    fn identity_from_env_prefers_public_names() {
        let _guard = EnvGuard::new(&[
            "SIGNOZ_SERVICE_NAME",
            "PUBLIC_SIGNOZ_SERVICE_NAME",
            "GIT_COMMIT_SHA",
            "PUBLIC_GIT_COMMIT_SHA",
            "APP_ENV",
        ]);
        env::set_var("SIGNOZ_SERVICE_NAME", "server-name");
        env::set_var("PUBLIC_SIGNOZ_SERVICE_NAME", "public-name");
        env::set_var("GIT_COMMIT_SHA", "abc1234");
        env::set_var("APP_ENV", "production");

        let identity = ServiceIdentity::from_env();

        assert_eq!(identity.service_name, "public-name");
        assert_eq!(identity.revision, "abc1234");
        assert_eq!(identity.environment, "production");
    }

    #[test]
    fn identity_builder_chain() {
        let identity = ServiceIdentity::new("svc")
            .with_namespace("platform")
            .with_revision("deadbeef")
            .with_environment("staging");

        assert_eq!(identity.service_name, "svc");
        assert_eq!(identity.service_namespace.as_deref(), Some("platform"));
        assert_eq!(identity.revision, "deadbeef");
        assert_eq!(identity.environment, "staging");
    }
}
