//! JSON loading for suppression settings.
//!
//! Missing fields fall back to [`NmsConfig::default`]:
//!
//! ```json
//! { "iou_threshold": 0.45, "per_class": true }
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::Result;
use crate::nms::NmsConfig;

/// Load an [`NmsConfig`] from a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if the threshold
/// is outside (0.0, 1.0].
///
/// # Example
///
/// ```no_run
/// use region_eval::config::load_nms_config_from_file;
///
/// let config = load_nms_config_from_file("nms.json").unwrap();
/// println!("IoU threshold: {}", config.iou_threshold);
/// ```
pub fn load_nms_config_from_file<P: AsRef<Path>>(path: P) -> Result<NmsConfig> {
    let file = File::open(path.as_ref())?;
    let reader = BufReader::new(file);
    let config: NmsConfig = serde_json::from_reader(reader)?;
    config.validate()?;

    log::debug!("loaded nms config from {}: {:?}", path.as_ref().display(), config);
    Ok(config)
}

/// Load an [`NmsConfig`] from a JSON string.
///
/// # Errors
///
/// Returns an error if the string cannot be parsed, or if the threshold is
/// outside (0.0, 1.0].
///
/// # Example
///
/// ```
/// use region_eval::config::load_nms_config_from_str;
///
/// let config = load_nms_config_from_str(r#"{ "per_class": true }"#).unwrap();
/// assert_eq!(config.iou_threshold, 0.5);
/// assert!(config.per_class);
/// ```
pub fn load_nms_config_from_str(json_str: &str) -> Result<NmsConfig> {
    let config: NmsConfig = serde_json::from_str(json_str)?;
    config.validate()?;

    log::debug!("loaded nms config from string: {:?}", config);
    Ok(config)
}
