//! Shared scriptable fakes standing in for the external RPC runtime.
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::watch;

use portbridge::config::ServerConfig;
use portbridge::runtime::{
    ConnectError, ListenerControl, ListenerError, ListenerRuntime, RemoteRuntime, RemoteSession,
    ResolveError, SpawnedListener,
};

/// Listener runtime whose first N start attempts fail, as if another
/// process kept winning the bind race.
pub struct ScriptedListenerRuntime {
    failures_remaining: AtomicU32,
    start_calls: AtomicU32,
    stopped: Arc<AtomicU32>,
    started_ports: Mutex<Vec<u16>>,
}

impl ScriptedListenerRuntime {
    pub fn new() -> Arc<Self> {
        Self::failing_first(0)
    }

    /// Fail the first `failures` start attempts, then succeed.
    pub fn failing_first(failures: u32) -> Arc<Self> {
        Arc::new(Self {
            failures_remaining: AtomicU32::new(failures),
            start_calls: AtomicU32::new(0),
            stopped: Arc::new(AtomicU32::new(0)),
            started_ports: Mutex::new(Vec::new()),
        })
    }

    pub fn start_calls(&self) -> u32 {
        self.start_calls.load(Ordering::SeqCst)
    }

    pub fn stopped(&self) -> u32 {
        self.stopped.load(Ordering::SeqCst)
    }

    pub fn started_ports(&self) -> Vec<u16> {
        self.started_ports.lock().unwrap().clone()
    }
}

struct WatchControl {
    tx: watch::Sender<bool>,
    stopped: Arc<AtomicU32>,
}

#[async_trait]
impl ListenerControl for WatchControl {
    async fn stop(&self) {
        let _ = self.tx.send(true);
        self.stopped.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ListenerRuntime for ScriptedListenerRuntime {
    async fn start_listener(
        &self,
        _config: &ServerConfig,
        port: u16,
    ) -> Result<SpawnedListener, ListenerError> {
        self.start_calls.fetch_add(1, Ordering::SeqCst);

        let remaining = self.failures_remaining.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures_remaining.store(remaining - 1, Ordering::SeqCst);
            return Err(ListenerError::Start("address already in use".to_string()));
        }

        self.started_ports.lock().unwrap().push(port);

        let (tx, mut rx) = watch::channel(false);
        let task = tokio::spawn(async move {
            // Stand-in accept loop: parked until the stop signal flips.
            while !*rx.borrow() {
                if rx.changed().await.is_err() {
                    break;
                }
            }
        });

        Ok(SpawnedListener {
            control: Box::new(WatchControl {
                tx,
                stopped: Arc::clone(&self.stopped),
            }),
            task,
        })
    }
}

/// Outcome script for one connect attempt.
pub enum ConnectOutcome {
    Timeout,
    Io,
    Eof,
    Ok,
}

/// Remote runtime that plays back a scripted sequence of connect
/// outcomes. Every successful connect hands out a fresh session over the
/// same module namespace, so connection lifetime stays independent of
/// the runtime's own handles.
pub struct ScriptedRemoteRuntime {
    outcomes: Mutex<VecDeque<ConnectOutcome>>,
    connect_calls: AtomicU32,
    namespace: Arc<ModuleNamespace>,
}

impl ScriptedRemoteRuntime {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            outcomes: Mutex::new(VecDeque::new()),
            connect_calls: AtomicU32::new(0),
            namespace: Arc::new(ModuleNamespace::default()),
        })
    }

    /// Queue outcomes for successive connect calls; once the script runs
    /// out, further connects succeed.
    pub fn script(&self, outcomes: Vec<ConnectOutcome>) {
        *self.outcomes.lock().unwrap() = outcomes.into();
    }

    pub fn connect_calls(&self) -> u32 {
        self.connect_calls.load(Ordering::SeqCst)
    }

    /// The remote module namespace served to every session.
    pub fn namespace(&self) -> &ModuleNamespace {
        &self.namespace
    }
}

#[async_trait]
impl RemoteRuntime for ScriptedRemoteRuntime {
    async fn connect(
        &self,
        _host: &str,
        _port: u16,
    ) -> Result<Arc<dyn RemoteSession>, ConnectError> {
        self.connect_calls.fetch_add(1, Ordering::SeqCst);

        let outcome = self
            .outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(ConnectOutcome::Ok);

        match outcome {
            ConnectOutcome::Timeout => Err(ConnectError::Timeout),
            ConnectOutcome::Io => Err(ConnectError::Io {
                errno: Some(111),
                message: "connection refused".to_string(),
            }),
            ConnectOutcome::Eof => Err(ConnectError::Eof),
            ConnectOutcome::Ok => Ok(Arc::new(ScriptedSession {
                namespace: Arc::clone(&self.namespace),
            }) as Arc<dyn RemoteSession>),
        }
    }
}

enum ModuleBehavior {
    /// Resolvable from the Nth resolve call onward (1 = immediately).
    AvailableOnCall(u32),
    /// Never resolvable.
    Never,
    /// Breaks the session when resolved.
    Transport,
}

/// A module namespace that fills in over time, like a host application
/// still importing its embedded modules at startup.
#[derive(Default)]
pub struct ModuleNamespace {
    behaviors: Mutex<HashMap<String, ModuleBehavior>>,
    calls: Mutex<HashMap<String, u32>>,
}

impl ModuleNamespace {
    /// `name` resolves from the `available_on_call`-th resolve call on.
    pub fn module(&self, name: &str, available_on_call: u32) {
        self.behaviors.lock().unwrap().insert(
            name.to_string(),
            ModuleBehavior::AvailableOnCall(available_on_call),
        );
    }

    /// `name` never resolves.
    pub fn module_never(&self, name: &str) {
        self.behaviors
            .lock()
            .unwrap()
            .insert(name.to_string(), ModuleBehavior::Never);
    }

    /// Resolving `name` breaks the session.
    pub fn module_breaks_session(&self, name: &str) {
        self.behaviors
            .lock()
            .unwrap()
            .insert(name.to_string(), ModuleBehavior::Transport);
    }

    /// How many times `name` has been resolved against.
    pub fn resolve_calls(&self, name: &str) -> u32 {
        self.calls.lock().unwrap().get(name).copied().unwrap_or(0)
    }

    fn resolve(&self, name: &str) -> Result<(), ResolveError> {
        let call = {
            let mut calls = self.calls.lock().unwrap();
            let entry = calls.entry(name.to_string()).or_insert(0);
            *entry += 1;
            *entry
        };

        let behaviors = self.behaviors.lock().unwrap();
        match behaviors.get(name) {
            Some(ModuleBehavior::AvailableOnCall(threshold)) if call >= *threshold => Ok(()),
            Some(ModuleBehavior::AvailableOnCall(_)) | Some(ModuleBehavior::Never) | None => {
                Err(ResolveError::UnknownModule(name.to_string()))
            }
            Some(ModuleBehavior::Transport) => {
                Err(ResolveError::Transport("stream reset by peer".to_string()))
            }
        }
    }
}

/// One session handed out by [`ScriptedRemoteRuntime::connect`].
pub struct ScriptedSession {
    namespace: Arc<ModuleNamespace>,
}

#[async_trait]
impl RemoteSession for ScriptedSession {
    async fn resolve_module(&self, name: &str) -> Result<(), ResolveError> {
        self.namespace.resolve(name)
    }
}
