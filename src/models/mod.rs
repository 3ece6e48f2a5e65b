//! Public representations of camps, talks and speakers
//!
//! Entities never reach the wire directly. Each model converts from its
//! entity with `From`, and request bodies convert into entities (creation) or
//! overlay onto them (update). Overlays are explicit: every mutable field is
//! listed, absent fields leave the stored value untouched.

pub mod camp;
pub mod day;
pub mod speaker;
pub mod talk;

pub use camp::{CampModel, CampUpdate};
pub use speaker::SpeakerModel;
pub use talk::{TalkModel, TalkUpdate};
