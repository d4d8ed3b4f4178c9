//! Bill model transitions.
//!
//! Every function here is a pure state transition: it borrows the current collection and, on
//! success, returns a brand new one. Nothing is mutated in place. A rejected call (bad input or
//! an id that no longer exists) returns an error and the caller simply keeps the collection it
//! already has.

use crate::error::{BillError, BillResult};
use crate::model::{ColorIndex, Item, ItemId, Person, PersonId};
use splitsnap_types::{Label, Price};

fn validated(name: &str, price: f64) -> BillResult<(Label, Price)> {
    let name = Label::new(name).map_err(|_| BillError::InvalidName)?;
    let price = Price::new(price).map_err(|_| BillError::InvalidPrice(price))?;
    Ok((name, price))
}

/// Rebuilds `items` with `f` applied to the item matching `id`.
fn map_item(items: &[Item], id: ItemId, f: impl Fn(&Item) -> Item) -> BillResult<Vec<Item>> {
    if !items.iter().any(|item| item.id() == id) {
        return Err(BillError::ItemNotFound(id));
    }

    Ok(items
        .iter()
        .map(|item| if item.id() == id { f(item) } else { item.clone() })
        .collect())
}

/// Appends a new unassigned, unsplit item.
///
/// # Errors
///
/// [`BillError::InvalidName`] if `name` is blank, [`BillError::InvalidPrice`] if `price` is not
/// a positive finite amount.
pub fn add_item(items: &[Item], name: &str, price: f64) -> BillResult<(Vec<Item>, ItemId)> {
    let (name, price) = validated(name, price)?;
    let item = Item::new(name, price);
    let id = item.id();

    let mut next = items.to_vec();
    next.push(item);
    Ok((next, id))
}

/// Replaces name and price of an item, keeping its id and assignment.
pub fn update_item(items: &[Item], id: ItemId, name: &str, price: f64) -> BillResult<Vec<Item>> {
    let (name, price) = validated(name, price)?;
    map_item(items, id, |item| item.with_details(name.clone(), price))
}

pub fn remove_item(items: &[Item], id: ItemId) -> BillResult<Vec<Item>> {
    if !items.iter().any(|item| item.id() == id) {
        return Err(BillError::ItemNotFound(id));
    }
    Ok(items.iter().filter(|item| item.id() != id).cloned().collect())
}

/// Assigns an item to one person and takes it out of the shared pool.
///
/// `person` is not checked against any people list; a dangling assignee is representable.
pub fn assign_item(items: &[Item], id: ItemId, person: PersonId) -> BillResult<Vec<Item>> {
    map_item(items, id, |item| item.with_assignee(person))
}

/// Flips the shared flag. The assignee is cleared either way, so toggling a split off leaves the
/// item unassigned rather than restoring who had it before.
pub fn toggle_split(items: &[Item], id: ItemId) -> BillResult<Vec<Item>> {
    map_item(items, id, Item::with_split_toggled)
}

pub fn unassign_item(items: &[Item], id: ItemId) -> BillResult<Vec<Item>> {
    map_item(items, id, Item::cleared)
}

/// Clears every item assigned to `person`. Shared items are untouched.
///
/// Returns an identical copy when nothing references the person.
pub fn unassign_person(items: &[Item], person: PersonId) -> Vec<Item> {
    items
        .iter()
        .map(|item| {
            if item.assigned_to() == Some(person) {
                item.cleared()
            } else {
                item.clone()
            }
        })
        .collect()
}

/// Appends a person with the given colour.
///
/// The colour is chosen by the caller, which owns the creation counter.
pub fn add_person(
    people: &[Person],
    name: &str,
    color: ColorIndex,
) -> BillResult<(Vec<Person>, PersonId)> {
    let name = Label::new(name).map_err(|_| BillError::InvalidName)?;
    let person = Person::new(name, color);
    let id = person.id();

    let mut next = people.to_vec();
    next.push(person);
    Ok((next, id))
}

/// Removes a person. Items assigned to them are left as they are.
pub fn remove_person(people: &[Person], id: PersonId) -> BillResult<Vec<Person>> {
    if !people.iter().any(|person| person.id() == id) {
        return Err(BillError::PersonNotFound(id));
    }
    Ok(people
        .iter()
        .filter(|person| person.id() != id)
        .cloned()
        .collect())
}

/// Items whose assignee is `person`, in bill order.
pub fn items_assigned_to(items: &[Item], person: PersonId) -> Vec<&Item> {
    items
        .iter()
        .filter(|item| item.assigned_to() == Some(person))
        .collect()
}

/// Resolves the assignee of `item`. `None` when unassigned or when the reference dangles.
pub fn assignee_of<'a>(item: &Item, people: &'a [Person]) -> Option<&'a Person> {
    let id = item.assigned_to()?;
    people.iter().find(|person| person.id() == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ColorCycle;

    fn bill(entries: &[(&str, f64)]) -> Vec<Item> {
        entries.iter().fold(Vec::new(), |items, (name, price)| {
            add_item(&items, name, *price).unwrap().0
        })
    }

    fn crew(names: &[&str]) -> Vec<Person> {
        let mut colors = ColorCycle::new();
        names.iter().fold(Vec::new(), |people, name| {
            add_person(&people, name, colors.advance()).unwrap().0
        })
    }

    #[test]
    fn add_item_appends_unassigned() {
        let items = bill(&[("Soup", 4.5)]);
        let (next, id) = add_item(&items, "  Bread ", 2.25).unwrap();

        assert_eq!(next.len(), items.len() + 1);
        let added = next.last().unwrap();
        assert_eq!(added.id(), id);
        assert_eq!(added.name(), "Bread");
        assert_eq!(added.price(), 2.25);
        assert!(added.is_unassigned());
    }

    #[test]
    fn add_item_rejects_bad_input_without_touching_items() {
        let items = bill(&[("Soup", 4.5)]);
        let before = items.clone();

        for (name, price) in [
            ("", 1.0),
            ("   ", 1.0),
            ("Tea", 0.0),
            ("Tea", -3.0),
            ("Tea", f64::NAN),
            ("Tea", f64::INFINITY),
        ] {
            let err = add_item(&items, name, price).unwrap_err();
            assert!(err.is_rejection(), "{name:?} {price} should be rejected");
        }

        assert_eq!(items, before);
    }

    #[test]
    fn update_item_keeps_id_and_assignment() {
        let people = crew(&["Alice"]);
        let items = bill(&[("Soup", 4.5)]);
        let id = items[0].id();
        let items = assign_item(&items, id, people[0].id()).unwrap();

        let updated = update_item(&items, id, " Tomato soup ", 5.0).unwrap();
        assert_eq!(updated[0].id(), id);
        assert_eq!(updated[0].name(), "Tomato soup");
        assert_eq!(updated[0].price(), 5.0);
        assert_eq!(updated[0].assigned_to(), Some(people[0].id()));
    }

    #[test]
    fn update_item_validates_and_reports_missing() {
        let items = bill(&[("Soup", 4.5)]);
        let id = items[0].id();

        assert!(matches!(
            update_item(&items, id, "", 5.0),
            Err(BillError::InvalidName)
        ));
        assert!(matches!(
            update_item(&items, id, "Soup", -1.0),
            Err(BillError::InvalidPrice(_))
        ));
        assert!(matches!(
            update_item(&items, ItemId::new(), "Soup", 5.0),
            Err(BillError::ItemNotFound(_))
        ));
    }

    #[test]
    fn remove_item_drops_only_the_match() {
        let items = bill(&[("Soup", 4.5), ("Bread", 2.0), ("Wine", 30.0)]);
        let next = remove_item(&items, items[1].id()).unwrap();

        let names: Vec<&str> = next.iter().map(Item::name).collect();
        assert_eq!(names, vec!["Soup", "Wine"]);
        assert!(remove_item(&next, items[1].id()).is_err());
    }

    #[test]
    fn reassigning_last_assignment_wins() {
        let people = crew(&["Alice", "Bob"]);
        let items = bill(&[("Soup", 4.5)]);
        let id = items[0].id();

        let items = toggle_split(&items, id).unwrap();
        let items = assign_item(&items, id, people[0].id()).unwrap();
        let items = assign_item(&items, id, people[1].id()).unwrap();

        assert_eq!(items[0].assigned_to(), Some(people[1].id()));
        assert!(!items[0].is_split());
    }

    #[test]
    fn assign_accepts_unknown_person() {
        let items = bill(&[("Soup", 4.5)]);
        let ghost = PersonId::new();
        let items = assign_item(&items, items[0].id(), ghost).unwrap();
        assert_eq!(items[0].assigned_to(), Some(ghost));
    }

    #[test]
    fn assign_missing_item_is_not_found() {
        let items = bill(&[("Soup", 4.5)]);
        assert!(matches!(
            assign_item(&items, ItemId::new(), PersonId::new()),
            Err(BillError::ItemNotFound(_))
        ));
    }

    #[test]
    fn toggle_split_twice_does_not_restore_assignment() {
        let people = crew(&["Alice"]);
        let items = bill(&[("Soup", 4.5)]);
        let id = items[0].id();
        let items = assign_item(&items, id, people[0].id()).unwrap();

        let on = toggle_split(&items, id).unwrap();
        assert!(on[0].is_split());
        assert_eq!(on[0].assigned_to(), None);

        let off = toggle_split(&on, id).unwrap();
        assert!(!off[0].is_split());
        assert_eq!(off[0].assigned_to(), None);
    }

    #[test]
    fn unassign_clears_both_flags() {
        let items = bill(&[("Soup", 4.5)]);
        let id = items[0].id();
        let items = toggle_split(&items, id).unwrap();
        let items = unassign_item(&items, id).unwrap();
        assert!(items[0].is_unassigned());
    }

    #[test]
    fn unassign_person_leaves_other_items() {
        let people = crew(&["Alice", "Bob"]);
        let items = bill(&[("Soup", 4.5), ("Bread", 2.0), ("Wine", 30.0)]);
        let items = assign_item(&items, items[0].id(), people[0].id()).unwrap();
        let items = assign_item(&items, items[1].id(), people[1].id()).unwrap();
        let items = toggle_split(&items, items[2].id()).unwrap();

        let next = unassign_person(&items, people[0].id());
        assert!(next[0].is_unassigned());
        assert_eq!(next[1].assigned_to(), Some(people[1].id()));
        assert!(next[2].is_split());
    }

    #[test]
    fn add_person_trims_and_uses_given_color() {
        let mut colors = ColorCycle::new();
        colors.advance();
        let (people, id) = add_person(&[], "  Alice ", colors.peek()).unwrap();

        assert_eq!(people.len(), 1);
        assert_eq!(people[0].id(), id);
        assert_eq!(people[0].name(), "Alice");
        assert_eq!(people[0].color_index().get(), 2);
    }

    #[test]
    fn add_person_rejects_blank_and_allows_duplicates() {
        let people = crew(&["Alice"]);
        assert!(matches!(
            add_person(&people, " ", ColorCycle::new().peek()),
            Err(BillError::InvalidName)
        ));

        let (people, _) = add_person(&people, "Alice", ColorCycle::new().peek()).unwrap();
        assert_eq!(people.len(), 2);
        assert_ne!(people[0].id(), people[1].id());
    }

    #[test]
    fn remove_person_does_not_cascade() {
        let people = crew(&["Alice", "Bob"]);
        let items = bill(&[("Soup", 4.5)]);
        let items = assign_item(&items, items[0].id(), people[0].id()).unwrap();

        let people_after = remove_person(&people, people[0].id()).unwrap();
        assert_eq!(people_after.len(), 1);
        assert_eq!(items[0].assigned_to(), Some(people[0].id()));
        assert!(assignee_of(&items[0], &people_after).is_none());
        assert!(matches!(
            remove_person(&people_after, people[0].id()),
            Err(BillError::PersonNotFound(_))
        ));
    }

    #[test]
    fn items_assigned_to_lists_in_bill_order() {
        let people = crew(&["Alice", "Bob"]);
        let items = bill(&[("Soup", 4.5), ("Bread", 2.0), ("Wine", 30.0)]);
        let items = assign_item(&items, items[2].id(), people[0].id()).unwrap();
        let items = assign_item(&items, items[0].id(), people[0].id()).unwrap();

        let names: Vec<&str> = items_assigned_to(&items, people[0].id())
            .into_iter()
            .map(Item::name)
            .collect();
        assert_eq!(names, vec!["Soup", "Wine"]);
        assert!(items_assigned_to(&items, people[1].id()).is_empty());
    }
}
