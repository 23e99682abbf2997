use super::fetch_dataset;
use crate::cli::InspectArgs;
use crate::data::DataManager;
use crate::error::Result;
use dccmview::core::models::dataset::CorrelationDataset;
use dccmview::engine::error::EngineError;
use std::io::{self, Write};
use std::path::Path;
use tracing::info;

pub async fn run(args: InspectArgs) -> Result<()> {
    let data_manager = DataManager::new()?;
    let path = data_manager.resolve_dataset(&args.input)?;
    info!("Inspecting dataset at {:?}", &path);

    let dataset = fetch_dataset(&path).await?;
    describe(&mut io::stdout().lock(), &path, &dataset, args.slices)
}

fn describe(
    out: &mut impl Write,
    path: &Path,
    dataset: &CorrelationDataset,
    per_slice: bool,
) -> Result<()> {
    writeln!(out, "Dataset:          {}", path.display())?;
    writeln!(out, "Slices:           {}", dataset.num_slices())?;
    writeln!(out, "Residues:         {}", dataset.num_atoms())?;
    writeln!(out, "Data type:        {}", dataset.data_type())?;
    writeln!(out, "Values per slice: {}", dataset.elements_per_slice())?;

    if per_slice && dataset.num_slices() > 0 {
        writeln!(out)?;
        writeln!(out, "{:>6} {:>10} {:>10} {:>10}", "slice", "min", "max", "mean")?;
        for s in 0..dataset.num_slices() {
            let summary = dataset.slice_summary(s).map_err(EngineError::from)?;
            writeln!(
                out,
                "{:>6} {:>10.4} {:>10.4} {:>10.4}",
                s, summary.min, summary.max, summary.mean
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn describe_to_string(dataset: &CorrelationDataset, per_slice: bool) -> String {
        let mut out = Vec::new();
        describe(&mut out, Path::new("WT/Rep_1/dccm_data_25.bin"), dataset, per_slice).unwrap();
        String::from_utf8(out).unwrap()
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn describe_lists_header_fields() {
        let dataset =
            CorrelationDataset::from_packed(2, 2, vec![1.0, -0.5, 1.0, 1.0, 0.25, 1.0]).unwrap();
        let text = describe_to_string(&dataset, false);

        assert!(text.contains("Slices:           2"));
        assert!(text.contains("Residues:         2"));
        assert!(text.contains("Data type:        float32"));
        assert!(text.contains("Values per slice: 3"));
        assert!(!text.contains("mean"));
    }

    #[test]
    fn describe_adds_per_slice_table_on_request() {
        let dataset =
            CorrelationDataset::from_packed(2, 2, vec![1.0, -0.5, 1.0, 1.0, 0.25, 1.0]).unwrap();
        let text = describe_to_string(&dataset, true);

        assert!(text.contains("mean"));
        assert!(text.contains("-0.5000"));
        assert!(text.contains("0.2500"));
    }

    #[test]
    fn describe_reports_write_failures() {
        let dataset = CorrelationDataset::from_packed(1, 1, vec![1.0]).unwrap();
        let result = describe(&mut ClosedPipe, Path::new("x.bin"), &dataset, true);
        assert!(matches!(result, Err(crate::error::CliError::Io(_))));
    }
}
