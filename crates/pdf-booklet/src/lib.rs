pub mod assemble;
pub mod constants;
pub mod layout;
mod options;
mod plan;
mod range;
mod sequence;
mod stats;
mod types;

pub use assemble::{
    BookletReport, SourceDocument, assemble, load_pdf, make_booklet, open_source, save_pdf,
    write_booklet,
};
pub use options::*;
pub use plan::*;
pub use range::*;
pub use sequence::*;
pub use stats::*;
pub use types::*;
