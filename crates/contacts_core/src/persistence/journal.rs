//! Write-behind journal between local state and a gateway.
//!
//! # Invariants
//! - At most one pending write exists per contact id; recording a newer write
//!   for the same id replaces (cancels) the older one.
//! - `flush` keeps retryable failures queued and drops permanent ones.
//! - Entries flush in the order their latest write was recorded.
//! - Requeued leftovers never override a write recorded after they were taken.

use crate::model::contact::{Contact, ContactId};
use crate::persistence::gateway::ContactGateway;
use log::{error, info, warn};

/// One queued gateway call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingWrite {
    Save(Contact),
    Delete(ContactId),
}

impl PendingWrite {
    pub fn contact_id(&self) -> ContactId {
        match self {
            Self::Save(contact) => contact.id,
            Self::Delete(id) => *id,
        }
    }
}

/// Outcome counters of one [`WriteJournal::flush`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushReport {
    /// Writes acknowledged by the gateway.
    pub written: usize,
    /// Writes left queued after a retryable failure.
    pub retained: usize,
    /// Writes discarded after a permanent failure.
    pub dropped: usize,
}

/// Queue of not-yet-persisted contact writes.
#[derive(Debug, Clone, Default)]
pub struct WriteJournal {
    pending: Vec<PendingWrite>,
}

impl WriteJournal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues an upsert of `contact`, superseding any pending write for its id.
    pub fn record_save(&mut self, contact: &Contact) {
        self.record(PendingWrite::Save(contact.clone()));
    }

    /// Queues a delete of `id`, superseding any pending write for it.
    pub fn record_delete(&mut self, id: ContactId) {
        self.record(PendingWrite::Delete(id));
    }

    fn record(&mut self, write: PendingWrite) {
        let id = write.contact_id();
        self.pending.retain(|queued| queued.contact_id() != id);
        self.pending.push(write);
    }

    pub fn pending(&self) -> &[PendingWrite] {
        &self.pending
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Moves every queued write into a detached journal, leaving this one empty.
    ///
    /// Pair with [`WriteJournal::requeue`] to flush without holding the owner
    /// of this journal.
    pub fn take(&mut self) -> WriteJournal {
        std::mem::take(self)
    }

    /// Puts writes left over from a detached flush back in front of the queue.
    ///
    /// A leftover is discarded when a newer write for the same id was recorded
    /// meanwhile. Returns how many leftovers were discarded that way.
    pub fn requeue(&mut self, leftovers: WriteJournal) -> usize {
        let mut superseded = 0;
        let mut merged = Vec::with_capacity(leftovers.len() + self.pending.len());
        for write in leftovers.pending {
            let id = write.contact_id();
            if self.pending.iter().any(|queued| queued.contact_id() == id) {
                superseded += 1;
            } else {
                merged.push(write);
            }
        }
        merged.append(&mut self.pending);
        self.pending = merged;
        superseded
    }

    /// Pushes queued writes to `gateway` in order.
    ///
    /// Stops at the first retryable failure and keeps that write and all later
    /// ones queued. Permanent failures are logged and dropped.
    pub fn flush<G: ContactGateway>(&mut self, gateway: &G) -> FlushReport {
        let mut report = FlushReport::default();
        let mut queue = std::mem::take(&mut self.pending).into_iter();

        while let Some(write) = queue.next() {
            let result = match &write {
                PendingWrite::Save(contact) => gateway.save(contact),
                PendingWrite::Delete(id) => gateway.delete(*id),
            };
            match result {
                Ok(()) => report.written += 1,
                Err(err) if err.is_retryable() => {
                    warn!(
                        "event=journal_flush module=persistence status=retry id={} error={}",
                        write.contact_id(),
                        err
                    );
                    self.pending.push(write);
                    self.pending.extend(queue);
                    break;
                }
                Err(err) => {
                    error!(
                        "event=journal_flush module=persistence status=dropped id={} error={}",
                        write.contact_id(),
                        err
                    );
                    report.dropped += 1;
                }
            }
        }

        report.retained = self.pending.len();
        if report.written > 0 || report.retained > 0 || report.dropped > 0 {
            info!(
                "event=journal_flush module=persistence status=done written={} retained={} dropped={}",
                report.written, report.retained, report.dropped
            );
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::{PendingWrite, WriteJournal};
    use crate::model::contact::Contact;

    #[test]
    fn later_write_replaces_pending_write_for_same_id() {
        let mut journal = WriteJournal::new();
        let mut anna = Contact::new("Anna", None).unwrap();
        let bob = Contact::new("Bob", None).unwrap();

        journal.record_save(&anna);
        journal.record_save(&bob);
        anna.phone = "123456789".to_string();
        journal.record_save(&anna);

        assert_eq!(
            journal.pending(),
            &[PendingWrite::Save(bob.clone()), PendingWrite::Save(anna.clone())]
        );

        journal.record_delete(anna.id);
        assert_eq!(journal.len(), 2);
        assert_eq!(journal.pending()[1], PendingWrite::Delete(anna.id));
    }

    #[test]
    fn take_empties_the_source_journal() {
        let mut journal = WriteJournal::new();
        let anna = Contact::new("Anna", None).unwrap();
        journal.record_save(&anna);

        let detached = journal.take();
        assert!(journal.is_empty());
        assert_eq!(detached.pending(), &[PendingWrite::Save(anna)]);
    }

    #[test]
    fn requeue_keeps_newer_writes_and_restores_older_ones_first() {
        let mut anna = Contact::new("Anna", None).unwrap();
        let bob = Contact::new("Bob", None).unwrap();
        let cleo = Contact::new("Cleo", None).unwrap();

        let mut leftovers = WriteJournal::new();
        leftovers.record_save(&anna);
        leftovers.record_save(&bob);

        let mut journal = WriteJournal::new();
        anna.phone = "600700800".to_string();
        journal.record_save(&anna);
        journal.record_save(&cleo);

        assert_eq!(journal.requeue(leftovers), 1);
        assert_eq!(
            journal.pending(),
            &[
                PendingWrite::Save(bob),
                PendingWrite::Save(anna),
                PendingWrite::Save(cleo),
            ]
        );
    }
}
