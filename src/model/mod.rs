pub mod project;
pub mod task;

pub use project::{Deliverable, Milestone, Project, WorkPackage};
pub use task::{Dependency, DependencyKind, Task};
