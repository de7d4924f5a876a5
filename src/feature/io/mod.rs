mod geojson;
mod shp;

use crate::{error::LoadError, source::DatasetSource};

use super::Feature;

/// Resolve a dataset name to its on-source file(s) and decode it.
///
/// Names may carry an explicit extension. Bare names are probed as a
/// shapefile first (the common census layout), then as GeoJSON.
pub(crate) fn read_features(
    source: &dyn DatasetSource,
    name: &str,
) -> Result<Vec<Feature>, LoadError> {
    if let Some(ext) = extension(name) {
        return match ext {
            "geojson" | "json" => geojson::read(&source.get(name)?),
            "shp" => {
                let dbf = format!("{}.dbf", &name[..name.len() - 4]);
                if !source.has(&dbf) {
                    return Err(LoadError::Malformed(format!(
                        "shapefile dataset {name} is missing its sibling {dbf}"
                    )));
                }
                shp::read(&source.get(name)?, &source.get(&dbf)?)
            }
            other => Err(LoadError::Malformed(format!(
                "unsupported dataset extension: .{other}"
            ))),
        };
    }

    for candidate in [
        format!("{name}.shp"),
        format!("{name}.geojson"),
        format!("{name}.json"),
    ] {
        if source.has(&candidate) {
            return read_features(source, &candidate);
        }
    }

    Err(LoadError::UnknownDataset(name.to_string()))
}

/// Extension of the final path component, if any.
fn extension(name: &str) -> Option<&str> {
    let file = name.rsplit('/').next().unwrap_or(name);
    file.rsplit_once('.').map(|(_, ext)| ext)
}
