// Selection services
// Drag/long-press range selection over date cells and time-slot cells

pub mod date_selection;
pub mod drag;
pub mod slot_selection;

pub use date_selection::{BatchAction, DateSelectionSource};
pub use drag::{
    DragCommit, DragConfig, DragPhaseKind, DragSelectionController, NoEffects, PlatformEffects,
    PointerKind, PointerPosition, SelectionSource,
};
pub use slot_selection::{SlotCell, SlotSelectionSource};
