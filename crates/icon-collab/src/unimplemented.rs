//! Placeholder collaborators for the out-of-scope seams this crate only
//! defines signatures for: OCR label location and
//! rule-driven icon-group/slot geometry. These exist so the pipeline
//! crate has something to construct a default `RunResources` from
//! without attempting to reimplement OCR or contour detection — a host
//! process wires its own [`LabelLocator`]/[`IconGroupLocator`]/
//! [`IconSlotLocator`] implementation (or the [`crate::geometry`] DSL
//! driven by a real rule table) in place of these.

use icon_model::{ClassificationSet, IconGroupMap, LabelMap, Screenshot, SlotMap};

use crate::errors::{ClassificationError, IconGroupLocatorError, IconSlotError, LocatorError};
use crate::traits::{IconGroupLocator, IconSlotLocator, LabelLocator, LayoutClassifier};

/// A [`LabelLocator`] that always reports failure. Useful as an explicit
/// placeholder until a real OCR-backed locator is wired in.
#[derive(Debug, Default)]
pub struct UnimplementedLabelLocator;

impl LabelLocator for UnimplementedLabelLocator {
    fn locate(&self, _screenshot: &Screenshot) -> Result<LabelMap, LocatorError> {
        Err(LocatorError::Failed("no label locator configured; supply a real implementation".to_string()))
    }
}

/// A [`LayoutClassifier`] that always reports failure. Useful as an
/// explicit placeholder until a real build-type classifier is wired in.
#[derive(Debug, Default)]
pub struct UnimplementedLayoutClassifier;

impl LayoutClassifier for UnimplementedLayoutClassifier {
    fn classify(&self, _labels: &LabelMap) -> Result<ClassificationSet, ClassificationError> {
        Err(ClassificationError::Failed("no layout classifier configured; supply a real implementation".to_string()))
    }
}

/// An [`IconGroupLocator`] that always reports failure, for hosts that
/// have not yet wired the [`crate::geometry`] rule table.
#[derive(Debug, Default)]
pub struct UnimplementedIconGroupLocator;

impl IconGroupLocator for UnimplementedIconGroupLocator {
    fn locate_groups(&self, _labels: &LabelMap, _classification: &ClassificationSet) -> Result<IconGroupMap, IconGroupLocatorError> {
        Err(IconGroupLocatorError::ExpressionEvaluation("no icon group locator configured; supply a real implementation".to_string()))
    }
}

/// An [`IconSlotLocator`] that always reports failure, for hosts that
/// have not yet wired a contour-based slot subdivider.
#[derive(Debug, Default)]
pub struct UnimplementedIconSlotLocator;

impl IconSlotLocator for UnimplementedIconSlotLocator {
    fn locate_slots(&self, _screenshot: &Screenshot, _groups: &IconGroupMap) -> Result<SlotMap, IconSlotError> {
        Err(IconSlotError::Failed { group: "*".to_string(), reason: "no icon slot locator configured; supply a real implementation".to_string() })
    }
}
