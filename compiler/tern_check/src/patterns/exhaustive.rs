//! Exhaustiveness: value enumeration and coverage.

use tern_types::{Type, TypeKind};

use super::{Condition, PathStep, Pattern, PatternValue};
use crate::tir;

/// Resolves the shape of struct and enum types during enumeration.
pub trait ShapeSource {
    /// Member names and types of a struct type.
    fn struct_members(&mut self, ty: &Type) -> Option<Vec<(String, Type)>>;

    /// Variant names and payload types of an enum type, in declaration order.
    fn enum_variants(&mut self, ty: &Type) -> Option<Vec<(String, Type)>>;
}

/// Every value shape of `ty`.
///
/// Bool and Unit are enumerated; enums and structs expand into the cross
/// product of their payloads and members. A struct or enum already being
/// expanded on the current path collapses to [`PatternValue::Any`], so
/// recursive types terminate after one unrolling.
pub fn pattern_values(ty: &Type, source: &mut impl ShapeSource) -> Vec<PatternValue> {
    values_of(ty, source, &mut Vec::new())
}

fn values_of(ty: &Type, source: &mut impl ShapeSource, seen: &mut Vec<String>) -> Vec<PatternValue> {
    match &ty.kind {
        TypeKind::Unit => vec![PatternValue::Unit],
        TypeKind::Bool => vec![PatternValue::Bool(true), PatternValue::Bool(false)],
        TypeKind::Enum { path, .. } if !seen.contains(path) => {
            let Some(variants) = source.enum_variants(ty) else {
                return vec![PatternValue::Any];
            };
            seen.push(path.clone());
            let mut values = Vec::new();
            for (tag, (variant, payload)) in variants.iter().enumerate() {
                for value in values_of(payload, source, seen) {
                    values.push(PatternValue::Enum {
                        path: path.clone(),
                        tag,
                        variant: variant.clone(),
                        payload: Box::new(value),
                    });
                }
            }
            seen.pop();
            values
        }
        TypeKind::Struct { path, .. } if !seen.contains(path) => {
            let Some(members) = source.struct_members(ty) else {
                return vec![PatternValue::Any];
            };
            seen.push(path.clone());
            let mut combinations: Vec<Vec<(String, PatternValue)>> = vec![Vec::new()];
            for (name, member) in &members {
                let values = values_of(member, source, seen);
                let mut next = Vec::with_capacity(combinations.len() * values.len());
                for prefix in &combinations {
                    for value in &values {
                        let mut combination = prefix.clone();
                        combination.push((name.clone(), value.clone()));
                        next.push(combination);
                    }
                }
                combinations = next;
            }
            seen.pop();
            combinations
                .into_iter()
                .map(|members| PatternValue::Struct {
                    path: path.clone(),
                    members,
                })
                .collect()
        }
        _ => vec![PatternValue::Any],
    }
}

/// Values of `values` that none of `patterns` covers.
pub fn uncovered<'v>(values: &'v [PatternValue], patterns: &[&Pattern]) -> Vec<&'v PatternValue> {
    values
        .iter()
        .filter(|value| {
            !patterns
                .iter()
                .any(|pattern| covers(pattern, &mut Vec::new(), value))
        })
        .collect()
}

fn covers(pattern: &Pattern, path: &mut Vec<PathStep>, value: &PatternValue) -> bool {
    if pattern
        .captures
        .iter()
        .any(|capture| path.starts_with(&capture.path))
    {
        return true;
    }
    match value {
        PatternValue::Any => false,
        PatternValue::Struct { members, .. } => members.iter().all(|(name, member)| {
            path.push(PathStep::Member(name.clone()));
            let covered = covers(pattern, path, member);
            path.pop();
            covered
        }),
        PatternValue::Unit => conditions_at(pattern, path).any(|condition| {
            matches!(condition, Condition::Value { value, .. } if matches!(value.kind, tir::ExprKind::Unit))
        }),
        PatternValue::Bool(expected) => conditions_at(pattern, path).any(|condition| {
            matches!(condition, Condition::Value { value, .. } if value.kind == tir::ExprKind::Bool(*expected))
        }),
        PatternValue::Enum {
            tag,
            variant,
            payload,
            ..
        } => {
            let matching = conditions_at(pattern, path)
                .any(|condition| matches!(condition, Condition::Variant { tag: t, .. } if t == tag));
            if !matching {
                return false;
            }
            path.push(PathStep::Variant(variant.clone()));
            let covered = covers(pattern, path, payload);
            path.pop();
            covered
        }
    }
}

fn conditions_at<'p>(
    pattern: &'p Pattern,
    path: &'p [PathStep],
) -> impl Iterator<Item = &'p Condition> {
    pattern
        .conditions
        .iter()
        .filter(move |condition| condition.path() == path)
}
