//! SeaORM entity models

mod entry;

pub use entry::{
    Entity as EntryEntity,
    Model as GlossaryEntry,
    ActiveModel as EntryActiveModel,
    Column as EntryColumn,
};
