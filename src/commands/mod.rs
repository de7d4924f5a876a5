pub mod list;
pub mod render;

use anyhow::Result;
use chorobind::{DatasetSource, DirSource};

/// Open a dataset source from a CLI spec: URLs become HTTP sources,
/// anything else is a local directory.
pub(crate) fn open_source(spec: &str, stats: Option<&str>) -> Result<Box<dyn DatasetSource>> {
    if spec.starts_with("http://") || spec.starts_with("https://") {
        #[cfg(feature = "remote")]
        {
            let mut source = chorobind::HttpSource::new(spec);
            if let Some(stats) = stats {
                source = source.with_stats(stats);
            }
            return Ok(Box::new(source));
        }
        #[cfg(not(feature = "remote"))]
        anyhow::bail!("built without the `remote` feature; only directory sources work");
    }
    let _ = stats;
    Ok(Box::new(DirSource::new(spec)))
}
