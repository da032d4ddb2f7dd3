//! Shared stubs for integration tests.

use std::collections::HashMap;
use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use terraform_provider_dockhand::config::ServeConfig;
use terraform_provider_dockhand::provider::{
    ConstructionError, DockhandProviderFactory, Provider, ProviderFactory,
};
use terraform_provider_dockhand::{Serve, ServeError, Shutdown};

/// Factory that records every version it is asked to construct.
#[derive(Clone, Default)]
pub struct RecordingFactory {
    pub versions: Arc<Mutex<Vec<String>>>,
    pub fail: bool,
}

#[allow(dead_code)]
impl RecordingFactory {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn versions(&self) -> Vec<String> {
        self.versions.lock().unwrap().clone()
    }
}

impl ProviderFactory for RecordingFactory {
    fn construct(&self, version: &str) -> Result<Arc<dyn Provider>, ConstructionError> {
        self.versions.lock().unwrap().push(version.to_string());
        if self.fail {
            return Err(ConstructionError("factory wired incorrectly".to_string()));
        }
        DockhandProviderFactory::with_env(Arc::new(|_: &str| -> Option<String> { None })).construct(version)
    }
}

/// How a [`ScriptedServer`] ends its serve call.
#[derive(Clone)]
#[allow(dead_code)]
pub enum Outcome {
    /// Return immediately, as if the orchestrator closed the channel.
    Orderly,
    /// Fail with a transport error carrying this message.
    Fail(&'static str),
    /// Block until the shutdown handle fires.
    UntilShutdown,
}

/// Serve stub recording the configuration of every call.
#[derive(Clone)]
pub struct ScriptedServer {
    pub calls: Arc<Mutex<Vec<ServeConfig>>>,
    pub outcome: Outcome,
}

#[allow(dead_code)]
impl ScriptedServer {
    pub fn new(outcome: Outcome) -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            outcome,
        }
    }

    pub fn calls(&self) -> Vec<ServeConfig> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Serve for ScriptedServer {
    async fn serve(
        &self,
        shutdown: Shutdown,
        _provider: Arc<dyn Provider>,
        config: ServeConfig,
    ) -> Result<(), ServeError> {
        self.calls.lock().unwrap().push(config);
        match self.outcome {
            Outcome::Orderly => Ok(()),
            Outcome::Fail(message) => Err(ServeError::Transport(std::io::Error::other(message))),
            Outcome::UntilShutdown => {
                shutdown.wait().await;
                Ok(())
            }
        }
    }
}

/// Cloneable in-memory stdout.
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

#[allow(dead_code)]
impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    /// Poll until the buffer holds a complete line, or give up after 5s.
    pub async fn wait_for_line(&self) -> Option<String> {
        for _ in 0..250 {
            let contents = self.contents();
            if let Some(line) = contents.lines().find(|l| !l.trim().is_empty()) {
                if contents.contains('\n') {
                    return Some(line.to_string());
                }
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        None
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Environment lookup backed by a fixed set of variables.
#[allow(dead_code)]
pub fn fixed_env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + Send + Sync + 'static {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| vars.get(key).cloned()
}
