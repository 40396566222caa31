pub mod drag;
pub mod group_ops;
pub mod list_ops;
pub mod suggest;
pub mod task_ops;
