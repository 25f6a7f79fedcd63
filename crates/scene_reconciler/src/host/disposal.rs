//! Deferred disposal queue
//!
//! Removing a node should not stall the commit path on resource teardown, so
//! the host queues disposal here and drains it later in idle slices. Queued
//! work has no ordering guarantee against later commits; by the time it runs
//! the object may already be gone, which is tolerated.

use std::collections::VecDeque;

use log::trace;

use crate::foundation::collections::ObjectId;

/// Handle for a queued disposal, used to cancel it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ticket(u64);

#[derive(Debug)]
struct DisposalTask {
    ticket: Ticket,
    object: ObjectId,
}

/// FIFO of cancellable disposal tasks
#[derive(Debug, Default)]
pub struct DisposalQueue {
    tasks: VecDeque<DisposalTask>,
    next_ticket: u64,
}

impl DisposalQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `object` for disposal.
    ///
    /// An object is queued at most once; queueing it again returns the
    /// ticket it already holds.
    pub fn enqueue(&mut self, object: ObjectId) -> Ticket {
        if let Some(ticket) = self.ticket_for(object) {
            return ticket;
        }
        let ticket = Ticket(self.next_ticket);
        self.next_ticket += 1;
        self.tasks.push_back(DisposalTask { ticket, object });
        trace!("Queued disposal of {object:?} as {ticket:?}");
        ticket
    }

    /// Withdraw a queued task. Returns `false` if it already ran or was cancelled.
    pub fn cancel(&mut self, ticket: Ticket) -> bool {
        let Some(index) = self.tasks.iter().position(|t| t.ticket == ticket) else {
            return false;
        };
        self.tasks.remove(index);
        trace!("Cancelled disposal {ticket:?}");
        true
    }

    /// Withdraw the queued task for `object`, if any
    pub fn cancel_object(&mut self, object: ObjectId) -> bool {
        self.ticket_for(object).is_some_and(|ticket| self.cancel(ticket))
    }

    /// Ticket of the task queued for `object`
    pub fn ticket_for(&self, object: ObjectId) -> Option<Ticket> {
        self.tasks.iter().find(|t| t.object == object).map(|t| t.ticket)
    }

    /// Whether disposal of `object` is pending
    pub fn is_pending(&self, object: ObjectId) -> bool {
        self.ticket_for(object).is_some()
    }

    /// Number of pending tasks
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether nothing is pending
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Take up to `budget` tasks off the front of the queue
    pub fn drain(&mut self, budget: usize) -> Vec<ObjectId> {
        let count = budget.min(self.tasks.len());
        self.tasks.drain(..count).map(|t| t.object).collect()
    }
}
