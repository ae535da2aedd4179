pub mod address;
pub mod capacity;
pub mod console;
pub mod error;
pub mod logging;
pub mod model;
pub mod mutate;
pub mod remote;
pub mod session;
pub mod store;
pub mod subtree;
pub mod tree;
pub mod tui;
pub mod view;

mod tui_shell;
