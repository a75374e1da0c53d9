mod automation;
mod callback;
mod date;
mod document;
mod message_location;
mod shared;

pub use automation::AutomationAction;
pub use callback::{CallbackAction, InvalidCallbackToken};
pub use date::{
    format_day_and_date, german_weekday, next_weekday_occurrence, weekday_from_index, zoned,
};
pub use document::{Document, DocumentKind, DocumentStatus, NewDocument};
pub use message_location::MessageLocation;
pub use shared::entity::{Entity, InvalidIDError, ID};
