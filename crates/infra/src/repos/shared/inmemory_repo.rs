use duesoon_domain::{Entity, ID};
use std::sync::Mutex;

/// Useful functions for creating inmemory repositories

pub fn insert<T: Clone>(val: &T, collection: &Mutex<Vec<T>>) {
    let mut collection = collection.lock().unwrap();
    collection.push(val.clone());
}

pub fn save<T: Clone + Entity>(val: &T, collection: &Mutex<Vec<T>>) {
    let mut collection = collection.lock().unwrap();
    if let Some(existing) = collection.iter_mut().find(|item| item.id() == val.id()) {
        *existing = val.clone();
    }
}

/// Applies `change` to the stored item in place. Returns false when no item
/// has the given id.
pub fn update<T: Entity, F: FnOnce(&mut T)>(val_id: &ID, collection: &Mutex<Vec<T>>, change: F) -> bool {
    let mut collection = collection.lock().unwrap();
    match collection.iter_mut().find(|item| item.id() == val_id) {
        Some(item) => {
            change(item);
            true
        }
        None => false,
    }
}

pub fn find<T: Clone + Entity>(val_id: &ID, collection: &Mutex<Vec<T>>) -> Option<T> {
    let collection = collection.lock().unwrap();
    collection.iter().find(|item| item.id() == val_id).cloned()
}

pub fn find_by<T: Clone, F: FnMut(&T) -> bool>(collection: &Mutex<Vec<T>>, mut compare: F) -> Vec<T> {
    let collection = collection.lock().unwrap();
    collection.iter().filter(|item| compare(item)).cloned().collect()
}

pub fn find_one_by<T: Clone, F: FnMut(&T) -> bool>(
    collection: &Mutex<Vec<T>>,
    compare: F,
) -> Option<T> {
    find_by(collection, compare).into_iter().next()
}

pub fn delete<T: Clone + Entity>(val_id: &ID, collection: &Mutex<Vec<T>>) -> Option<T> {
    let mut collection = collection.lock().unwrap();
    let index = collection.iter().position(|item| item.id() == val_id)?;
    Some(collection.remove(index))
}
