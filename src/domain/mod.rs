//! Entities of the ordering domain and the storage ports they are persisted through.

pub mod activity;
pub mod catalog;
pub mod checkout;
pub mod contact;
pub mod customer;
pub mod feedback;
pub mod order;
pub mod payment;
pub mod ports;
pub mod settings;

/// Generates a document id.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
