// Library root
// -----------
// The binary (`main.rs`) wires these modules together into the
// interactive test harness for the vending machine service.
//
// Module responsibilities:
// - `config`: turns startup arguments into a `RuntimeConfig`.
// - `api`: one blocking HTTP call per vending machine action.
// - `format`: renders response bodies, including the product table.
// - `ui`: the menu loop reading commands from an input stream.
// - `error`: typed errors shared by the modules above.
pub mod api;
pub mod config;
pub mod error;
pub mod format;
pub mod ui;
