pub mod board;
pub mod calendar;
pub mod category;
pub mod task;
pub mod views;

pub use board::Board;
pub use category::{Category, CategoryDraft, CategoryId, CategoryKind};
pub use task::{AddTaskError, Priority, Task, TaskDraft, TaskId, TaskPatch};
pub use views::StatusFilter;
