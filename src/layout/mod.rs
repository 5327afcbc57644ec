//! Region descriptors of the template and the range notation they use.
pub mod descriptor;
pub mod range;
pub mod template;

pub use descriptor::Header;
pub use descriptor::RegionDescriptor;
pub use descriptor::RowLimit;
pub use range::Range;
pub use range::RangeError;
