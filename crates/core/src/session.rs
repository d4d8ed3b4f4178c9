//! In-memory bill session.
//!
//! [`Session`] holds the authoritative item and people collections for one user session. Every
//! user action runs exactly one [`crate::bill`] transition to completion; an accepted transition
//! replaces the held collection and invalidates the cached summaries, a rejected one leaves
//! everything as it was. Nothing is persisted.
//!
//! Removing a person also unassigns every item that was assigned to them, so a summary never
//! silently loses money to a dangling assignee.

use crate::bill;
use crate::constants::MIN_PEOPLE_FOR_SPLIT;
use crate::error::{BillError, BillResult};
use crate::model::{ColorCycle, Item, ItemId, Person, PersonId};
use crate::receipt::{parse_receipt_text, ParsedLine};
use crate::recognizer::{RecognitionError, TextRecognizer};
use crate::scan::{ScanMonitor, ScanOutcome, ScanState, ScanTicket, ScanTracker};
use crate::summary::{summarize, BillTotals, PersonSummary};
use std::cell::OnceCell;
use tracing::{debug, error, info, warn};

#[derive(Debug)]
pub struct Session {
    items: Vec<Item>,
    people: Vec<Person>,
    colors: ColorCycle,
    summaries: OnceCell<Vec<PersonSummary>>,
    scan: ScanTracker,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            people: Vec::new(),
            colors: ColorCycle::new(),
            summaries: OnceCell::new(),
            scan: ScanTracker::new(),
        }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn people(&self) -> &[Person] {
        &self.people
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn person(&self, id: PersonId) -> Option<&Person> {
        self.people.iter().find(|person| person.id() == id)
    }

    /// Per-person summaries, recomputed lazily after any accepted change.
    pub fn summaries(&self) -> &[PersonSummary] {
        self.summaries
            .get_or_init(|| summarize(&self.items, &self.people))
    }

    pub fn totals(&self) -> BillTotals {
        BillTotals::compute(&self.items, self.summaries())
    }

    /// Fewer than two people: there is nothing to split yet.
    pub fn needs_more_people(&self) -> bool {
        self.people.len() < MIN_PEOPLE_FOR_SPLIT
    }

    pub fn scan_state(&self) -> ScanState {
        self.scan.state()
    }

    pub fn scan_monitor(&self) -> ScanMonitor {
        self.scan.monitor()
    }

    // ---------------------------------------------------------------------
    // Items
    // ---------------------------------------------------------------------

    pub fn add_item(&mut self, name: &str, price: f64) -> Option<ItemId> {
        match bill::add_item(&self.items, name, price) {
            Ok((items, id)) => {
                self.replace_items(items);
                Some(id)
            }
            Err(err) => {
                rejected("add_item", &err);
                None
            }
        }
    }

    pub fn update_item(&mut self, id: ItemId, name: &str, price: f64) -> bool {
        let next = bill::update_item(&self.items, id, name, price);
        self.apply_items("update_item", next)
    }

    pub fn remove_item(&mut self, id: ItemId) -> bool {
        let next = bill::remove_item(&self.items, id);
        self.apply_items("remove_item", next)
    }

    pub fn assign_item(&mut self, id: ItemId, person: PersonId) -> bool {
        let next = bill::assign_item(&self.items, id, person);
        self.apply_items("assign_item", next)
    }

    pub fn toggle_split(&mut self, id: ItemId) -> bool {
        let next = bill::toggle_split(&self.items, id);
        self.apply_items("toggle_split", next)
    }

    pub fn unassign_item(&mut self, id: ItemId) -> bool {
        let next = bill::unassign_item(&self.items, id);
        self.apply_items("unassign_item", next)
    }

    /// Appends parsed receipt lines in order, without deduplicating against existing items.
    pub fn ingest_parsed(&mut self, lines: &[ParsedLine]) -> Vec<ItemId> {
        let mut items = self.items.clone();
        let mut added = Vec::with_capacity(lines.len());

        for line in lines {
            match bill::add_item(&items, &line.name, line.price) {
                Ok((next, id)) => {
                    items = next;
                    added.push(id);
                }
                Err(err) => rejected("ingest_parsed", &err),
            }
        }

        if !added.is_empty() {
            info!(count = added.len(), "ingested receipt items");
            self.replace_items(items);
        }
        added
    }

    // ---------------------------------------------------------------------
    // People
    // ---------------------------------------------------------------------

    /// Adds a person with the next colour in the cycle. The colour counter only advances when
    /// the person is actually created.
    pub fn add_person(&mut self, name: &str) -> Option<PersonId> {
        match bill::add_person(&self.people, name, self.colors.peek()) {
            Ok((people, id)) => {
                self.colors.advance();
                self.people = people;
                self.invalidate();
                Some(id)
            }
            Err(err) => {
                rejected("add_person", &err);
                None
            }
        }
    }

    /// Removes a person and unassigns their items.
    pub fn remove_person(&mut self, id: PersonId) -> bool {
        match bill::remove_person(&self.people, id) {
            Ok(people) => {
                let released = bill::items_assigned_to(&self.items, id).len();
                if released > 0 {
                    debug!(person = %id, released, "unassigning items of removed person");
                    self.items = bill::unassign_person(&self.items, id);
                }
                self.people = people;
                self.invalidate();
                true
            }
            Err(err) => {
                rejected("remove_person", &err);
                false
            }
        }
    }

    // ---------------------------------------------------------------------
    // Receipt scanning
    // ---------------------------------------------------------------------

    /// Claims the scan slot.
    ///
    /// # Errors
    ///
    /// [`BillError::ScanInProgress`] while another scan is outstanding. The new request is
    /// rejected; the running scan is not cancelled.
    pub fn begin_scan(&mut self) -> BillResult<ScanTicket> {
        self.scan.begin()
    }

    /// Finishes a scan started with [`Session::begin_scan`].
    ///
    /// The scan slot is released first, whatever the result. On success the text is parsed and
    /// every extracted line is appended; on failure nothing is applied.
    ///
    /// # Errors
    ///
    /// [`BillError::ForeignScanTicket`] when `ticket` came from another session. Nothing is
    /// applied here and this session's slot is untouched.
    pub fn complete_scan(
        &mut self,
        ticket: ScanTicket,
        result: Result<String, RecognitionError>,
    ) -> BillResult<ScanOutcome> {
        if !self.scan.issued(&ticket) {
            let err = BillError::ForeignScanTicket;
            rejected("complete_scan", &err);
            return Err(err);
        }
        drop(ticket);

        let text = result.map_err(|err| {
            error!(error = %err, "receipt recognition failed");
            BillError::RecognitionFailed(err)
        })?;

        let lines = parse_receipt_text(&text);
        if lines.is_empty() {
            info!("no items found on receipt");
            return Ok(ScanOutcome::NothingFound);
        }

        let added = self.ingest_parsed(&lines);
        if added.is_empty() {
            return Ok(ScanOutcome::NothingFound);
        }
        Ok(ScanOutcome::Added(added))
    }

    /// Runs a full scan: claim the slot, recognise, ingest.
    pub async fn scan(
        &mut self,
        recognizer: &dyn TextRecognizer,
        image: &[u8],
    ) -> BillResult<ScanOutcome> {
        let ticket = self.begin_scan()?;
        let result = recognizer.recognize(image, ticket.reporter()).await;
        self.complete_scan(ticket, result)
    }

    // ---------------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------------

    fn apply_items(&mut self, action: &'static str, next: BillResult<Vec<Item>>) -> bool {
        match next {
            Ok(items) => {
                self.replace_items(items);
                true
            }
            Err(err) => {
                rejected(action, &err);
                false
            }
        }
    }

    fn replace_items(&mut self, items: Vec<Item>) {
        self.items = items;
        self.invalidate();
    }

    fn invalidate(&mut self) {
        self.summaries.take();
    }
}

fn rejected(action: &'static str, err: &BillError) {
    if err.is_rejection() {
        debug!(action, error = %err, "transition rejected, state unchanged");
    } else {
        warn!(action, error = %err, "action refused, state unchanged");
    }
}
