pub mod db_errors;
pub mod op_context;
pub mod state;
