// src/orchestrator.rs

use std::{
    sync::{Arc, Mutex},
    thread,
    time::Duration,
};

use crossbeam::channel;

use crate::tweaks::{engine::TweakEngine, Tweak};

/// Actions that can be performed on a tweak.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TweakAction {
    /// Toggle the tweak into the opposite of its current flag.
    Apply,
    /// Re-derive the enabled flag from the live system.
    ReadState,
}

/// Represents the result of a processed task.
#[derive(Debug)]
pub struct TweakResult {
    pub id: &'static str,
    pub success: bool,
    pub enabled_state: Option<bool>,
    pub error: Option<String>,
    pub action: TweakAction,
}

/// Represents a task to be processed.
#[derive(Clone)]
pub struct TweakTask {
    pub tweak: Arc<Mutex<Tweak>>,
    pub action: TweakAction,
}

/// Runs tweak tasks on worker threads and reports results over a channel,
/// keeping the front-end decoupled from the engine: callers submit and then
/// drain results at their own pace.
pub struct TaskOrchestrator {
    engine: Arc<TweakEngine>,
    result_sender: channel::Sender<TweakResult>,
    result_receiver: channel::Receiver<TweakResult>,
}

impl TaskOrchestrator {
    pub fn new(engine: Arc<TweakEngine>) -> Self {
        let (result_sender, result_receiver) = channel::unbounded::<TweakResult>();
        Self {
            engine,
            result_sender,
            result_receiver,
        }
    }

    pub fn engine(&self) -> &Arc<TweakEngine> {
        &self.engine
    }

    /// Submits a new task to be processed. Exactly one result is delivered
    /// per submitted task, including when the tweak's lock is poisoned.
    pub fn submit(&self, task: TweakTask) {
        let engine = Arc::clone(&self.engine);
        let sender = self.result_sender.clone();
        thread::spawn(move || {
            let result = match task.tweak.lock() {
                Ok(mut tweak) => match task.action {
                    TweakAction::Apply => {
                        let success = engine.apply(&mut tweak);
                        TweakResult {
                            id: tweak.id,
                            success,
                            enabled_state: success.then_some(tweak.enabled),
                            error: (!success)
                                .then(|| format!("Failed to apply tweak '{}'", tweak.id)),
                            action: task.action,
                        }
                    }
                    TweakAction::ReadState => {
                        let state = engine.check_status(&tweak);
                        tweak.enabled = state;
                        TweakResult {
                            id: tweak.id,
                            success: true,
                            enabled_state: Some(state),
                            error: None,
                            action: task.action,
                        }
                    }
                },
                Err(poisoned) => {
                    let id = poisoned.into_inner().id;
                    tracing::error!("Failed to lock tweak '{}'", id);
                    TweakResult {
                        id,
                        success: false,
                        enabled_state: None,
                        error: Some("Failed to acquire lock on tweak".to_string()),
                        action: task.action,
                    }
                }
            };
            if let Err(e) = sender.send(result) {
                tracing::error!("Failed to send result: {:?}", e);
            }
        });
    }

    /// Attempts to receive a task result without blocking.
    pub fn try_recv_result(&self) -> Option<TweakResult> {
        self.result_receiver.try_recv().ok()
    }

    /// Waits up to `timeout` for the next task result.
    pub fn recv_result_timeout(&self, timeout: Duration) -> Option<TweakResult> {
        self.result_receiver.recv_timeout(timeout).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        store::{MemoryStore, RegistryValue, ValueStore},
        tweaks::TweakCategory,
    };

    fn fixture() -> (TaskOrchestrator, Arc<MemoryStore>, Arc<Mutex<Tweak>>) {
        let store = Arc::new(MemoryStore::new());
        store
            .write(
                "HKLM\\SYSTEM\\CurrentControlSet\\Services\\SysMain",
                "Start",
                &RegistryValue::Dword(2),
            )
            .unwrap();
        let engine = Arc::new(TweakEngine::new(store.clone()));
        let tweak = Arc::new(Mutex::new(Tweak::registry(
            "disable_superfetch",
            "Disable Superfetch/SysMain",
            "",
            TweakCategory::Memory,
            "HKLM\\SYSTEM\\CurrentControlSet\\Services\\SysMain",
            "Start",
            RegistryValue::Dword(4),
            RegistryValue::Dword(2),
            2,
            true,
        )));
        (TaskOrchestrator::new(engine), store, tweak)
    }

    #[test]
    fn apply_task_delivers_one_result() {
        let (orchestrator, store, tweak) = fixture();
        orchestrator.submit(TweakTask {
            tweak: tweak.clone(),
            action: TweakAction::Apply,
        });

        let result = orchestrator
            .recv_result_timeout(Duration::from_secs(5))
            .expect("no result within timeout");
        assert_eq!(result.id, "disable_superfetch");
        assert!(result.success);
        assert_eq!(result.enabled_state, Some(true));
        assert_eq!(
            store
                .read("HKLM\\SYSTEM\\CurrentControlSet\\Services\\SysMain", "Start")
                .unwrap(),
            RegistryValue::Dword(4)
        );
    }

    #[test]
    fn read_state_task_updates_the_flag() {
        let (orchestrator, store, tweak) = fixture();
        store
            .write(
                "HKLM\\SYSTEM\\CurrentControlSet\\Services\\SysMain",
                "Start",
                &RegistryValue::Dword(4),
            )
            .unwrap();

        orchestrator.submit(TweakTask {
            tweak: tweak.clone(),
            action: TweakAction::ReadState,
        });
        let result = orchestrator
            .recv_result_timeout(Duration::from_secs(5))
            .expect("no result within timeout");
        assert!(result.success);
        assert_eq!(result.enabled_state, Some(true));
        assert!(tweak.lock().unwrap().enabled);
    }
}
