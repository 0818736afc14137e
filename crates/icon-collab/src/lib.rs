//! Collaborator trait surface for the icon-recognition pipeline: OCR label
//! location, layout classification, icon-group/slot geometry, and cargo
//! metadata, plus the built-in Star Trek Online icon-set map and
//! deterministic test doubles for all of the above.

pub mod errors;
pub mod geometry;
pub mod iconset;
pub mod traits;
pub mod unimplemented;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use errors::{CargoError, ClassificationError, IconGroupLocatorError, IconSlotError, LocatorError};
pub use geometry::{eval, eval_required, BinOp, ContourLocator, GeomExpr, GeomField, GeometryContext};
pub use iconset::{builtin_sto_icon_sets, IconSetMap, ImageCacheEntry, ImageCacheMap};
pub use traits::{
    CargoCatalog, IconGroupLocator, IconSlotLocator, LabelLocator, LayoutClassifier, NoopInstrumentationSink,
    NoopProgressSink, ProgressSink, TestInstrumentationSink,
};
pub use unimplemented::{UnimplementedIconGroupLocator, UnimplementedIconSlotLocator, UnimplementedLabelLocator, UnimplementedLayoutClassifier};
