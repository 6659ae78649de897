//! CLI command implementations.
//!
//! - `patterns`, `controls`, `info` - what the library offers
//! - `render` - draw a pattern to SVG or PNG
//! - `url`, `instructions` - share links and hand-threading sequences
//! - `save`, `load`, `list`, `delete` - named configurations in a YAML file

pub mod common;
pub mod instructions;
pub mod patterns;
pub mod render;
pub mod store;

pub use instructions::{cmd_instructions, cmd_url};
pub use patterns::{cmd_controls, cmd_info, cmd_patterns};
pub use render::cmd_render;
pub use store::{cmd_delete, cmd_list, cmd_load, cmd_save};
