//! Deterministic test doubles for every collaborator trait, so the full
//! pipeline can run end-to-end in unit and integration tests without OCR
//! models or network access.

use std::path::Path;
use std::sync::Mutex;

use icon_model::{ClassificationSet, IconGroupMap, LabelMap, Screenshot, SlotMap};
use serde_json::Value;

use crate::errors::{CargoError, ClassificationError, IconGroupLocatorError, IconSlotError, LocatorError};
use crate::iconset::ImageCacheMap;
use crate::traits::{CargoCatalog, IconGroupLocator, IconSlotLocator, LabelLocator, LayoutClassifier, TestInstrumentationSink};

/// Always returns a fixed label map, ignoring the screenshot pixels.
pub struct FixedLabelLocator {
    pub labels: LabelMap,
}

impl LabelLocator for FixedLabelLocator {
    fn locate(&self, _screenshot: &Screenshot) -> Result<LabelMap, LocatorError> {
        Ok(self.labels.clone())
    }
}

/// Always returns a fixed classification, ignoring the located labels.
pub struct FixedLayoutClassifier {
    pub classification: ClassificationSet,
}

impl LayoutClassifier for FixedLayoutClassifier {
    fn classify(&self, _labels: &LabelMap) -> Result<ClassificationSet, ClassificationError> {
        Ok(self.classification.clone())
    }
}

/// Always returns a fixed icon-group map, ignoring the labels and
/// classification it was given. Useful for exercising downstream stages
/// without a real geometry-expression rule table.
pub struct FixedIconGroupLocator {
    pub groups: IconGroupMap,
}

impl IconGroupLocator for FixedIconGroupLocator {
    fn locate_groups(
        &self,
        _labels: &LabelMap,
        _classification: &ClassificationSet,
    ) -> Result<IconGroupMap, IconGroupLocatorError> {
        Ok(self.groups.clone())
    }
}

/// Always returns a fixed slot map, ignoring the screenshot and groups it
/// was given.
pub struct FixedIconSlotLocator {
    pub slots: SlotMap,
}

impl IconSlotLocator for FixedIconSlotLocator {
    fn locate_slots(&self, _screenshot: &Screenshot, _groups: &IconGroupMap) -> Result<SlotMap, IconSlotError> {
        Ok(self.slots.clone())
    }
}

/// An in-memory cargo catalog: "downloading" just records the destination
/// path, and `image_cache` returns a fixed map.
#[derive(Default)]
pub struct FixedCargoCatalog {
    pub image_cache: ImageCacheMap,
    pub downloaded_to: Mutex<Option<std::path::PathBuf>>,
}

impl CargoCatalog for FixedCargoCatalog {
    fn download(&self, dest: &Path) -> Result<(), CargoError> {
        *self.downloaded_to.lock().expect("mutex poisoned") = Some(dest.to_path_buf());
        Ok(())
    }

    fn image_cache(&self) -> Result<ImageCacheMap, CargoError> {
        Ok(self.image_cache.clone())
    }
}

/// Collects every recorded section in memory rather than writing
/// `{prefix}_test_data.json` to disk, so assertions can inspect it
/// directly.
#[derive(Default)]
pub struct InMemoryInstrumentationSink {
    pub sections: Vec<(String, Value)>,
}

impl TestInstrumentationSink for InMemoryInstrumentationSink {
    fn record(&mut self, section: &str, value: Value) {
        self.sections.push((section.to_string(), value));
    }
}

impl InMemoryInstrumentationSink {
    pub fn get(&self, section: &str) -> Option<&Value> {
        self.sections.iter().find(|(name, _)| name == section).map(|(_, value)| value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use icon_model::Classification;

    #[test]
    fn fixed_label_locator_ignores_screenshot() {
        let corner = icon_model::Point::new(0, 0);
        let mut labels = LabelMap::new();
        labels.insert(icon_model::Label::new("Shield", [corner; 4]));
        let locator = FixedLabelLocator { labels: labels.clone() };
        let screenshot = Screenshot::new(image::RgbImage::new(4, 4));
        let result = locator.locate(&screenshot).unwrap();
        assert_eq!(result.labels.len(), labels.labels.len());
    }

    #[test]
    fn in_memory_instrumentation_sink_retrieves_recorded_sections() {
        let mut sink = InMemoryInstrumentationSink::default();
        sink.record("prefilter", serde_json::json!({"count": 3}));
        assert_eq!(sink.get("prefilter"), Some(&serde_json::json!({"count": 3})));
        assert_eq!(sink.get("missing"), None);
    }

    #[test]
    fn fixed_cargo_catalog_records_download_destination() {
        let catalog = FixedCargoCatalog::default();
        catalog.download(Path::new("/tmp/cargo")).unwrap();
        assert_eq!(catalog.downloaded_to.lock().unwrap().as_deref(), Some(Path::new("/tmp/cargo")));
    }

    #[test]
    fn fixed_layout_classifier_returns_configured_classification() {
        let classification = Classification {
            build_type: icon_model::BuildType::PcShipBuild,
            score: 1.0,
            is_required: true,
            icon_set_key: icon_model::IconSetKey::Ship,
            platform: icon_model::Platform::Pc,
        };
        let classifier = FixedLayoutClassifier { classification: ClassificationSet::new(classification) };
        let result = classifier.classify(&LabelMap::new()).unwrap();
        assert_eq!(result.main.build_type, icon_model::BuildType::PcShipBuild);
    }
}
