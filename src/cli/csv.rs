use awsiprules::{IpRange, Result};
use log::info;
use std::path::Path;

/*-------------------------------------------------------------------------------------------------
  Save Query Results to CSV File
-------------------------------------------------------------------------------------------------*/

pub fn save(ranges: &[IpRange], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;

    // Write header
    writer.write_record(IpRange::FIELD_NAMES)?;

    // Write range records
    for range in ranges {
        writer.write_record([
            range
                .ipv4_prefix()
                .map(|prefix| prefix.to_string())
                .unwrap_or_default(),
            range
                .ipv6_prefix()
                .map(|prefix| prefix.to_string())
                .unwrap_or_default(),
            range.region().to_string(),
            range.service().to_string(),
            range.network_border_group().to_string(),
        ])?;
    }

    writer.flush()?;
    info!("Saved {} range(s) to {:?}", ranges.len(), path);

    Ok(())
}
