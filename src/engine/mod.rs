//! Scheduling and diagram engine: pure, synchronous computations over a
//! disposable node/edge view of the work plan. Rebuilt from the project on
//! every pass; nothing here touches I/O or keeps state between calls.

pub mod critical;
pub mod graph;
pub mod layout;
pub mod levels;
pub mod schedule;
pub mod viewport;

pub use graph::{GraphEdge, GraphNode, TaskGraph};
pub use layout::LayoutConfig;
pub use viewport::{NetworkViewport, ZoomMode};
