mod date;
mod event;
mod shared;

pub use date::{
    create_sort_date, format_date, normalize, pad_date, InvalidDateError, NormalizedDate,
};
pub use event::{strip_reserved, EventDraft, EventPatch, ReactionKind, TrackedEvent};
pub use shared::entity::{Entity, InvalidIDError, ID};
