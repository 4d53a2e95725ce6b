pub mod dialogs;
pub mod network_view;
pub mod plan_panel;
pub mod task_editor;
pub mod theme;
pub mod timeline_view;
pub mod toolbar;
