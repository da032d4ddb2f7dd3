//! Production implementation of the serving capability.

use std::io::Write;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::config::loader::{load_plugin_environment, process_env};
use crate::config::ServeConfig;
use crate::http::RpcServer;
use crate::lifecycle::signals::{spawn_interrupt_handler, InterruptPolicy};
use crate::lifecycle::Shutdown;
use crate::net::handshake::{check_magic_cookie, negotiate_protocol_version, HandshakeLine};
use crate::net::listener::bind_loopback;
use crate::plugin::reattach::{self, ReattachConfig};
use crate::plugin::{Serve, ServeError};
use crate::provider::Provider;

type EnvSource = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Serves a provider over loopback after handshaking on stdout.
pub struct PluginServer {
    env: EnvSource,
    stdout: Mutex<Box<dyn Write + Send>>,
}

impl PluginServer {
    /// Server reading `env` for handshake variables and announcing on `stdout`.
    pub fn new<F, W>(env: F, stdout: W) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
        W: Write + Send + 'static,
    {
        Self {
            env: Arc::new(env),
            stdout: Mutex::new(Box::new(stdout)),
        }
    }

    /// Server wired to the real process environment and stdout.
    pub fn from_process_env() -> Self {
        Self::new(process_env, std::io::stdout())
    }

    fn announce(&self, text: &str) -> Result<(), ServeError> {
        let mut out = match self.stdout.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        out.write_all(text.as_bytes()).map_err(ServeError::Announce)?;
        out.flush().map_err(ServeError::Announce)
    }
}

#[async_trait]
impl Serve for PluginServer {
    async fn serve(
        &self,
        shutdown: Shutdown,
        provider: Arc<dyn Provider>,
        config: ServeConfig,
    ) -> Result<(), ServeError> {
        let env = load_plugin_environment(|key: &str| (self.env)(key))?;

        let (protocol_version, policy) = if config.debug {
            (negotiate_protocol_version(&[])?, InterruptPolicy::Shutdown)
        } else {
            check_magic_cookie(&env)?;
            (
                negotiate_protocol_version(&env.protocol_versions)?,
                InterruptPolicy::Ignore,
            )
        };

        let listener = bind_loopback(env.port_range()).await?;
        let address = listener.local_addr().map_err(ServeError::Transport)?;

        let announcement = if config.debug {
            let reattach_config = ReattachConfig::new(protocol_version, address);
            reattach::instructions(&config.address, &reattach_config)
                .map_err(|e| ServeError::Announce(std::io::Error::other(e)))?
        } else {
            format!("{}\n", HandshakeLine { protocol_version, address })
        };

        let server = RpcServer::new(provider, shutdown.clone());
        let interrupts = spawn_interrupt_handler(shutdown.clone(), policy);

        if let Err(e) = self.announce(&announcement) {
            interrupts.abort();
            return Err(e);
        }

        tracing::info!(
            registry_address = %config.address,
            address = %address,
            protocol_version,
            debug = config.debug,
            "Provider serving"
        );

        let result = server.run(listener).await;
        interrupts.abort();
        result.map_err(ServeError::Transport)?;

        tracing::info!(registry_address = %config.address, "Provider exited");
        Ok(())
    }
}
