// src/tweaks/engine.rs

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use tracing::{debug, error};

use crate::{
    ledger::BackupLedger,
    store::ValueStore,
    tweaks::Tweak,
};

/// Tally of a bulk restore. Only tweaks with a ledger entry are counted;
/// tweaks that were never applied this session are skipped entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RestoreSummary {
    pub restored: usize,
    pub failed: usize,
}

/// The only component allowed to mutate catalog-driven system settings.
///
/// Sequences backup-then-write on apply and write-then-rescan on restore.
/// Every store failure is converted to a boolean or tally outcome here; no
/// error unwinds to the caller, so one failing tweak can never abort a bulk
/// apply or restore.
pub struct TweakEngine {
    store: Arc<dyn ValueStore>,
    ledger: BackupLedger,
    applied_this_session: AtomicBool,
}

impl TweakEngine {
    pub fn new(store: Arc<dyn ValueStore>) -> Self {
        Self {
            store,
            ledger: BackupLedger::new(),
            applied_this_session: AtomicBool::new(false),
        }
    }

    pub fn ledger(&self) -> &BackupLedger {
        &self.ledger
    }

    pub fn store(&self) -> &dyn ValueStore {
        self.store.as_ref()
    }

    /// Drives `tweak` into the opposite of its current flag: writes the value
    /// for the new desired state, capturing the prior live value first. The
    /// flag flips only after a successful write; any failure leaves both the
    /// flag and the ledger's captured state intact.
    pub fn apply(&self, tweak: &mut Tweak) -> bool {
        let target = if tweak.enabled {
            &tweak.disabled_value
        } else {
            &tweak.enabled_value
        };

        if let Err(e) = self
            .ledger
            .capture_if_absent(self.store.as_ref(), tweak.key_path, tweak.value_name)
        {
            error!("Tweak '{}': refusing to write without a backup: {:#}", tweak.id, e);
            return false;
        }

        match self.store.write(tweak.key_path, tweak.value_name, target) {
            Ok(()) => {
                debug!(
                    "Tweak '{}': wrote {} to '{}\\{}'",
                    tweak.id, target, tweak.key_path, tweak.value_name
                );
                tweak.enabled = !tweak.enabled;
                self.applied_this_session.store(true, Ordering::SeqCst);
                true
            }
            Err(e) => {
                error!("Tweak '{}': write failed: {}", tweak.id, e);
                false
            }
        }
    }

    /// Stateless re-derivation of the enabled state from the live store: true
    /// iff the live value equals `enabled_value` exactly, in both type and
    /// value. Absent values and read errors report false. The ledger is not
    /// consulted.
    pub fn check_status(&self, tweak: &Tweak) -> bool {
        match self.store.read(tweak.key_path, tweak.value_name) {
            Ok(live) => live == tweak.enabled_value,
            Err(e) => {
                debug!("Tweak '{}': status read failed: {}", tweak.id, e);
                false
            }
        }
    }

    /// Re-derives every tweak's `enabled` flag from the live store.
    pub fn refresh_states(&self, tweaks: &mut [Tweak]) {
        for tweak in tweaks.iter_mut() {
            tweak.enabled = self.check_status(tweak);
        }
    }

    /// Writes every captured prior value back, deleting values whose captured
    /// state was "absent". Continues past individual failures and tallies the
    /// outcome. Afterwards re-scans all statuses so the flags reflect the
    /// restored system, and clears the session applied flag.
    pub fn restore_all(&self, tweaks: &mut [Tweak]) -> RestoreSummary {
        let mut summary = RestoreSummary::default();
        for tweak in tweaks.iter() {
            let Some(prior) = self.ledger.get(tweak.key_path, tweak.value_name) else {
                continue;
            };
            match self.store.write(tweak.key_path, tweak.value_name, &prior) {
                Ok(()) => {
                    debug!(
                        "Tweak '{}': restored '{}\\{}' to {}",
                        tweak.id, tweak.key_path, tweak.value_name, prior
                    );
                    summary.restored += 1;
                }
                Err(e) => {
                    error!("Tweak '{}': restore failed: {}", tweak.id, e);
                    summary.failed += 1;
                }
            }
        }
        self.refresh_states(tweaks);
        self.applied_this_session.store(false, Ordering::SeqCst);
        summary
    }

    /// Whether any tweak was successfully applied since process start (or the
    /// last restore).
    pub fn has_applied_tweaks(&self) -> bool {
        self.applied_this_session.load(Ordering::SeqCst)
    }
}
