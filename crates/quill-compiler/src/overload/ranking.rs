//! Ranking applicable candidates.
//!
//! Candidates are ordered by:
//!
//! 1. Non-variadic before variadic
//! 2. Non-extension before extension
//! 3. More bound generic parameters before fewer
//!
//! The sort is stable, so declaration order breaks remaining ties.

use std::cmp::Reverse;

use quill_core::{CompilationError, Span, TypeSystem};

use super::Candidate;
use crate::config::{AmbiguityPolicy, DispatchOptions};

type RankKey = (bool, bool, Reverse<usize>);

fn rank_key(candidate: &Candidate) -> RankKey {
    (
        candidate.method.is_variadic,
        candidate.is_extension,
        Reverse(candidate.substitution.len()),
    )
}

/// Sort candidates best first. Stable.
pub fn rank_candidates(candidates: &mut [Candidate]) {
    candidates.sort_by_key(rank_key);
}

/// Find the best match among applicable candidates.
///
/// Returns `Ok(None)` when there are none. When the top candidates tie, the
/// [`AmbiguityPolicy`] decides between taking the first and reporting
/// [`CompilationError::AmbiguousOverload`].
pub fn find_best_match<T: TypeSystem + ?Sized>(
    types: &T,
    mut candidates: Vec<Candidate>,
    span: Span,
    options: &DispatchOptions,
) -> Result<Option<Candidate>, CompilationError> {
    if candidates.is_empty() {
        return Ok(None);
    }

    rank_candidates(&mut candidates);

    let best = rank_key(&candidates[0]);
    let tied = candidates
        .iter()
        .take_while(|c| rank_key(c) == best)
        .count();

    if tied > 1 {
        let described: Vec<String> = candidates[..tied]
            .iter()
            .map(|c| describe(types, c))
            .collect();
        match options.ambiguity {
            AmbiguityPolicy::FirstWins => {
                tracing::debug!(
                    candidates = %described.join(", "),
                    %span,
                    "ambiguous overload; taking the first declared"
                );
            }
            AmbiguityPolicy::Reject => {
                return Err(CompilationError::AmbiguousOverload {
                    name: candidates[0].method.name.clone(),
                    candidates: described.join(", "),
                    span,
                });
            }
        }
    }

    Ok(candidates.into_iter().next())
}

/// `name(param, ...)` using type names where known.
fn describe<T: TypeSystem + ?Sized>(types: &T, candidate: &Candidate) -> String {
    let params: Vec<String> = candidate
        .method
        .params
        .iter()
        .map(|p| {
            types
                .type_name(p.data_type)
                .unwrap_or_else(|| p.data_type.to_string())
        })
        .collect();
    format!("{}({})", candidate.method.name, params.join(", "))
}
