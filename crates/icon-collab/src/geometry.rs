//! The small geometry-expression language an [`crate::traits::IconGroupLocator`]
//! evaluates against located labels and already-computed icon groups:
//! `Literal | LabelRef | GroupRef | BinOp | FirstOf | ContourRightOf | MinMax`.
//!
//! Rule tables are built from this typed expression tree rather than
//! free-form string paths: selectors like "label mid_y" or "icon group
//! right edge" become [`LabelField`]/[`GroupField`] enum variants
//! instead of strings parsed at evaluation time.

use icon_model::{IconGroupMap, LabelMap};
use tracing::warn;

use crate::errors::IconGroupLocatorError;

/// Which coordinate of a label's bounding box an expression reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeomField {
    Left,
    Right,
    Top,
    Bottom,
    MidX,
    MidY,
}

/// Arithmetic operators over one or more operands, matching the `"add"`,
/// `"subtract"`, `"divide"`, `"multiply"`, `"distance"`, `"midpoint"` keys
/// of the original rule DSL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Subtract,
    Divide,
    Multiply,
    Distance,
    Midpoint,
}

/// A node in the geometry-expression tree.
#[derive(Debug, Clone)]
pub enum GeomExpr {
    Literal(f64),
    /// `label:<name>.<field>`
    LabelRef { label: String, field: GeomField },
    /// `icon_group:<name>.<field>`
    GroupRef { group: String, field: GeomField },
    BinOp(BinOp, Vec<GeomExpr>),
    /// Tries each expression in order, returning the first that resolves.
    /// A reference to a missing label is not fatal here: it falls through
    /// to the next candidate and, if every candidate is exhausted, the
    /// whole `FirstOf` fails to resolve (caller decides whether that is
    /// fatal for the enclosing icon group).
    FirstOf(Vec<GeomExpr>),
    /// The X coordinate of the right-most contour at or right of `label`,
    /// sampled at the given `y`. Contour detection is pixel-dependent and
    /// supplied by the caller via [`ContourLocator`].
    ContourRightOf { label: String, y: Box<GeomExpr> },
    MinOf(Vec<GeomExpr>),
    MaxOf(Vec<GeomExpr>),
}

/// Supplies contour geometry the expression evaluator cannot derive from
/// labels or groups alone. A deterministic double lives in
/// [`crate::testing`].
pub trait ContourLocator {
    /// Right edge, in pixels, of the right-most contour located at or to
    /// the right of `label`'s bounding box, sampled at row `y`. `None` if
    /// no contour was found.
    fn contour_right_of(&self, label: &str, y: f64) -> Option<f64>;
}

/// Read-only view over the labels and icon groups an expression may
/// reference, plus a current "loop label" for loop-bound expressions
/// (`"label:.mid_y"` in the original DSL, `label: None` field here).
pub struct GeometryContext<'a> {
    pub labels: &'a LabelMap,
    pub groups: &'a IconGroupMap,
    pub contours: &'a dyn ContourLocator,
    /// The label bound to the current loop iteration, if any.
    pub loop_label: Option<&'a str>,
}

fn label_field(field: GeomField, bbox_like: (i32, i32, i32, i32, i32, i32)) -> f64 {
    let (left, right, top, bottom, mid_x, mid_y) = bbox_like;
    match field {
        GeomField::Left => left as f64,
        GeomField::Right => right as f64,
        GeomField::Top => top as f64,
        GeomField::Bottom => bottom as f64,
        GeomField::MidX => mid_x as f64,
        GeomField::MidY => mid_y as f64,
    }
}

/// Evaluates `expr` against `ctx`. Returns `None` when a referenced label
/// or group is missing, so that [`GeomExpr::FirstOf`] can fall through;
/// callers at the top level turn a `None` into an
/// [`IconGroupLocatorError::ExpressionEvaluation`].
pub fn eval(expr: &GeomExpr, ctx: &GeometryContext<'_>) -> Option<f64> {
    match expr {
        GeomExpr::Literal(value) => Some(*value),
        GeomExpr::LabelRef { label, field } => {
            let name = if label.is_empty() { ctx.loop_label? } else { label.as_str() };
            let located = ctx.labels.first(name)?;
            Some(label_field(*field, (located.left(), located.right(), located.top(), located.bottom(), located.mid_x(), located.mid_y())))
        }
        GeomExpr::GroupRef { group, field } => {
            let located = ctx.groups.get(group)?;
            let bbox = located.bbox;
            Some(label_field(
                *field,
                (bbox.left(), bbox.right(), bbox.top(), bbox.bottom(), bbox.mid_x(), bbox.mid_y()),
            ))
        }
        GeomExpr::BinOp(op, args) => {
            let values: Option<Vec<f64>> = args.iter().map(|a| eval(a, ctx)).collect();
            let values = values?;
            Some(apply_binop(*op, &values))
        }
        GeomExpr::FirstOf(candidates) => {
            for candidate in candidates {
                if let Some(value) = eval(candidate, ctx) {
                    return Some(value);
                }
            }
            warn!("first_of expression exhausted every candidate without resolving");
            None
        }
        GeomExpr::ContourRightOf { label, y } => {
            let y = eval(y, ctx)?;
            ctx.contours.contour_right_of(label, y)
        }
        GeomExpr::MinOf(args) => {
            let values: Option<Vec<f64>> = args.iter().map(|a| eval(a, ctx)).collect();
            values?.into_iter().reduce(f64::min)
        }
        GeomExpr::MaxOf(args) => {
            let values: Option<Vec<f64>> = args.iter().map(|a| eval(a, ctx)).collect();
            values?.into_iter().reduce(f64::max)
        }
    }
}

fn apply_binop(op: BinOp, values: &[f64]) -> f64 {
    match op {
        BinOp::Add => values.iter().sum(),
        BinOp::Subtract => {
            let mut iter = values.iter();
            let first = *iter.next().unwrap_or(&0.0);
            iter.fold(first, |acc, v| acc - v)
        }
        BinOp::Divide => {
            let mut iter = values.iter();
            let first = *iter.next().unwrap_or(&0.0);
            iter.fold(first, |acc, v| if *v == 0.0 { acc } else { acc / v })
        }
        BinOp::Multiply => values.iter().product(),
        BinOp::Distance => (values.first().copied().unwrap_or(0.0) - values.get(1).copied().unwrap_or(0.0)).abs(),
        BinOp::Midpoint => (values.first().copied().unwrap_or(0.0) + values.get(1).copied().unwrap_or(0.0)) / 2.0,
    }
}

/// Evaluates `expr` as a required top-level value, converting a `None`
/// into an explicit error.
pub fn eval_required(expr: &GeomExpr, ctx: &GeometryContext<'_>, what: &str) -> Result<f64, IconGroupLocatorError> {
    eval(expr, ctx).ok_or_else(|| IconGroupLocatorError::ExpressionEvaluation(what.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use icon_model::{BBox, IconGroup, Label, Point};

    struct NoContours;
    impl ContourLocator for NoContours {
        fn contour_right_of(&self, _label: &str, _y: f64) -> Option<f64> {
            None
        }
    }

    fn sample_label(text: &str, x: i32, y: i32, w: i32, h: i32) -> Label {
        Label {
            text: text.to_string(),
            corners: [
                Point { x, y },
                Point { x: x + w, y },
                Point { x: x + w, y: y + h },
                Point { x, y: y + h },
            ],
        }
    }

    #[test]
    fn literal_resolves_to_itself() {
        let labels = LabelMap::default();
        let groups = IconGroupMap::default();
        let contours = NoContours;
        let ctx = GeometryContext { labels: &labels, groups: &groups, contours: &contours, loop_label: None };
        assert_eq!(eval(&GeomExpr::Literal(42.0), &ctx), Some(42.0));
    }

    #[test]
    fn label_ref_resolves_mid_y() {
        let mut labels = LabelMap::default();
        labels.insert(sample_label("Deflector", 10, 20, 40, 10));
        let groups = IconGroupMap::default();
        let contours = NoContours;
        let ctx = GeometryContext { labels: &labels, groups: &groups, contours: &contours, loop_label: None };
        let expr = GeomExpr::LabelRef { label: "Deflector".to_string(), field: GeomField::MidY };
        assert_eq!(eval(&expr, &ctx), Some(25.0));
    }

    #[test]
    fn first_of_falls_through_missing_labels() {
        let mut labels = LabelMap::default();
        labels.insert(sample_label("Impulse", 0, 30, 20, 10));
        let groups = IconGroupMap::default();
        let contours = NoContours;
        let ctx = GeometryContext { labels: &labels, groups: &groups, contours: &contours, loop_label: None };
        let expr = GeomExpr::FirstOf(vec![
            GeomExpr::LabelRef { label: "Secondary Deflector".to_string(), field: GeomField::MidY },
            GeomExpr::LabelRef { label: "Impulse".to_string(), field: GeomField::MidY },
        ]);
        assert_eq!(eval(&expr, &ctx), Some(35.0));
    }

    #[test]
    fn first_of_with_no_resolvable_candidate_is_none() {
        let labels = LabelMap::default();
        let groups = IconGroupMap::default();
        let contours = NoContours;
        let ctx = GeometryContext { labels: &labels, groups: &groups, contours: &contours, loop_label: None };
        let expr = GeomExpr::FirstOf(vec![GeomExpr::LabelRef { label: "Missing".to_string(), field: GeomField::MidY }]);
        assert_eq!(eval(&expr, &ctx), None);
    }

    #[test]
    fn binop_distance_is_absolute_difference() {
        let labels = LabelMap::default();
        let groups = IconGroupMap::default();
        let contours = NoContours;
        let ctx = GeometryContext { labels: &labels, groups: &groups, contours: &contours, loop_label: None };
        let expr = GeomExpr::BinOp(BinOp::Distance, vec![GeomExpr::Literal(10.0), GeomExpr::Literal(30.0)]);
        assert_eq!(eval(&expr, &ctx), Some(20.0));
    }

    #[test]
    fn group_ref_resolves_right_edge() {
        let labels = LabelMap::default();
        let mut groups = IconGroupMap::default();
        groups.insert(IconGroup { label: "Impulse".to_string(), bbox: BBox { x: 5, y: 5, width: 30, height: 20 } });
        let contours = NoContours;
        let ctx = GeometryContext { labels: &labels, groups: &groups, contours: &contours, loop_label: None };
        let expr = GeomExpr::GroupRef { group: "Impulse".to_string(), field: GeomField::Right };
        assert_eq!(eval(&expr, &ctx), Some(35.0));
    }
}
