//! In-memory snapshots of fetched lists.
//!
//! Every fetch takes a ticket from [`SnapshotSlot::begin`]. A response is
//! only installed if its ticket is newer than the one behind the snapshot
//! currently held, so a slow response can never overwrite a fresher one.

/// Ticket identifying one fetch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

#[derive(Debug)]
pub struct SnapshotSlot<T> {
    next: u64,
    installed: Option<Ticket>,
    items: Vec<T>,
}

impl<T> Default for SnapshotSlot<T> {
    fn default() -> Self {
        Self {
            next: 0,
            installed: None,
            items: Vec::new(),
        }
    }
}

impl<T> SnapshotSlot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves the ticket for a fetch about to start.
    pub fn begin(&mut self) -> Ticket {
        let ticket = Ticket(self.next);
        self.next += 1;
        ticket
    }

    /// Replaces the snapshot wholesale unless `ticket` is stale.
    ///
    /// Returns `false` when the response was discarded.
    pub fn accept(&mut self, ticket: Ticket, items: Vec<T>) -> bool {
        if self.installed.is_some_and(|current| current >= ticket) {
            return false;
        }
        self.installed = Some(ticket);
        self.items = items;
        true
    }

    /// `true` once any response has been installed.
    pub fn is_loaded(&self) -> bool {
        self.installed.is_some()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }
}
