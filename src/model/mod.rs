pub mod calendar;
pub mod date;
pub mod edit;
pub mod gesture;
pub mod progress;
pub mod project;
pub mod segments;
pub mod task;
pub mod timeline;

pub use calendar::NonWorkingDays;
pub use date::CalendarDate;
pub use gesture::{ChartContext, DragState, GestureResolver, GestureUpdate, Pointer, ResizeEdge, RowBounds};
pub use project::{ColumnVisibility, Project, Settings};
pub use segments::Segment;
pub use task::Task;
pub use timeline::{DayIndex, GridSpan, ProjectWindow, ZoomLevel};
