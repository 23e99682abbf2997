use crate::core::models::dataset::CorrelationDataset;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Defines the interface for reading and writing correlation dataset formats.
///
/// Implementors provide the stream-based `read_from`/`write_to` pair; the path-based
/// helpers open the file and delegate.
pub trait CorrelationFile {
    /// The error type for I/O and format failures.
    type Error: Error + From<io::Error>;

    /// Reads a complete dataset from a reader.
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails or the bytes do not form a valid dataset.
    fn read_from(reader: &mut impl Read) -> Result<CorrelationDataset, Self::Error>;

    /// Writes a dataset to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_to(dataset: &CorrelationDataset, writer: &mut impl Write) -> Result<(), Self::Error>;

    /// Reads a dataset from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or its content is invalid.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<CorrelationDataset, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }

    /// Writes a dataset to a file path, creating or truncating the file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or writing fails.
    fn write_to_path<P: AsRef<Path>>(
        dataset: &CorrelationDataset,
        path: P,
    ) -> Result<(), Self::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(dataset, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
