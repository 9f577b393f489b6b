pub mod cmd_check;
pub mod cmd_order;
pub mod load;
pub mod tracing_init;
