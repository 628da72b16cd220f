pub mod diff;
pub mod error;
pub mod fix_files;
pub mod markdown_file;
pub mod math_blocks;
pub mod nav;
pub mod util;

pub use error::{Error, Result};
pub use math_blocks::fix_math_blocks;
