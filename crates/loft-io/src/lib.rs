//! Text formats produced and consumed by the curve/surface editor.
//!
//! Three line-oriented grammars share one tokenizer: curve groups, surface
//! definitions, and nodal curve networks. Lines starting with `#`, blank
//! lines, and stray carriage-return-only lines are skipped everywhere;
//! tokens are whitespace-split.

pub mod curve_text;
pub mod network_text;
pub mod reader;
pub mod surface_text;

pub use curve_text::{load_curves, parse_curves, save_curves, serialize_curves};
pub use network_text::{load_network, parse_network, save_network, serialize_network};
pub use surface_text::{load_surfaces, parse_surfaces, save_surfaces, serialize_surfaces};
