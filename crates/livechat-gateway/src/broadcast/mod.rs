//! Room fan-out

mod publisher;

pub use publisher::{DeliveryFailure, PublishReport, Publisher};
