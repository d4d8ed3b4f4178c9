//! Bill entities: items, people and their identifiers.

use crate::constants::PALETTE_SIZE;
use serde::{Deserialize, Serialize};
use splitsnap_id::Uid;
use splitsnap_types::{Label, Price};
use std::fmt;

/// Identifier of a bill item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(Uid);

impl ItemId {
    pub fn new() -> Self {
        Self(Uid::new())
    }

    pub fn parse(input: &str) -> splitsnap_id::UidResult<Self> {
        Uid::parse(input).map(Self)
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Identifier of a person sharing the bill.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonId(Uid);

impl PersonId {
    pub fn new() -> Self {
        Self(Uid::new())
    }

    pub fn parse(input: &str) -> splitsnap_id::UidResult<Self> {
        Uid::parse(input).map(Self)
    }
}

impl Default for PersonId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Display colour slot of a person, always in `1..=PALETTE_SIZE`.
///
/// Purely presentational; the aggregator never looks at it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorIndex(u8);

impl ColorIndex {
    pub fn get(self) -> u8 {
        self.0
    }
}

/// Monotonic colour counter.
///
/// The counter only moves forward. Removing a person does not free their slot, so re-adding a
/// person after removals continues the cycle instead of reusing a list position.
#[derive(Clone, Debug, Default)]
pub struct ColorCycle {
    created: u64,
}

impl ColorCycle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Colour the next created person will receive.
    pub fn peek(&self) -> ColorIndex {
        // The remainder is < PALETTE_SIZE, so the narrowing cannot truncate.
        ColorIndex((self.created % u64::from(PALETTE_SIZE)) as u8 + 1)
    }

    /// Consume the current colour. Call only once a person was actually created.
    pub fn advance(&mut self) -> ColorIndex {
        let color = self.peek();
        self.created += 1;
        color
    }
}

/// A line on the bill.
///
/// `assigned_to` and `split_among_everyone` are mutually exclusive: a split item is never
/// assigned. The fields are private so that only [`crate::bill`] transitions can change them.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Item {
    id: ItemId,
    name: Label,
    price: Price,
    assigned_to: Option<PersonId>,
    split_among_everyone: bool,
}

impl Item {
    pub(crate) fn new(name: Label, price: Price) -> Self {
        Self {
            id: ItemId::new(),
            name,
            price,
            assigned_to: None,
            split_among_everyone: false,
        }
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn price(&self) -> f64 {
        self.price.amount()
    }

    pub fn assigned_to(&self) -> Option<PersonId> {
        self.assigned_to
    }

    pub fn is_split(&self) -> bool {
        self.split_among_everyone
    }

    /// Neither assigned nor split.
    pub fn is_unassigned(&self) -> bool {
        self.assigned_to.is_none() && !self.split_among_everyone
    }

    pub(crate) fn with_details(&self, name: Label, price: Price) -> Self {
        Self {
            name,
            price,
            ..self.clone()
        }
    }

    pub(crate) fn with_assignee(&self, person: PersonId) -> Self {
        Self {
            assigned_to: Some(person),
            split_among_everyone: false,
            ..self.clone()
        }
    }

    pub(crate) fn with_split_toggled(&self) -> Self {
        Self {
            assigned_to: None,
            split_among_everyone: !self.split_among_everyone,
            ..self.clone()
        }
    }

    pub(crate) fn cleared(&self) -> Self {
        Self {
            assigned_to: None,
            split_among_everyone: false,
            ..self.clone()
        }
    }
}

/// Someone sharing the bill.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Person {
    id: PersonId,
    name: Label,
    color_index: ColorIndex,
}

impl Person {
    pub(crate) fn new(name: Label, color_index: ColorIndex) -> Self {
        Self {
            id: PersonId::new(),
            name,
            color_index,
        }
    }

    pub fn id(&self) -> PersonId {
        self.id
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn color_index(&self) -> ColorIndex {
        self.color_index
    }
}
