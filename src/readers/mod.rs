pub mod dataset_reader;
pub mod rental_reader;

pub use dataset_reader::{DatasetReader, SourceFiles};
pub use rental_reader::RentalReader;
