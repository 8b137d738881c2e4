pub mod driver;

pub use driver::{
    ConversionDriver, ConversionLog, ConversionMode, ConversionOutcome, ConversionProgress,
    ConversionReport,
};
