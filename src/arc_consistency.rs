//! This module contains an implementation of the AC-3 algorithm for making a crossword's domains
//! arc-consistent. An arc `(x, y)` is consistent when every option left for `x` places a letter in
//! the cell `x` shares with `y` that at least one option left for `y` also places there.
//!
//! Whenever revising an arc `(x, y)` removes anything from `x`, every other arc `(z, x)` pointing
//! at `x` has to be checked again, since the option that used to support some value of `z` may be
//! gone. `Propagation::SinglePass` skips that requeueing; it's only useful for comparing against
//! the weaker algorithm.

use log::{debug, trace};
use std::collections::{HashSet, VecDeque};

use crate::domain::Domains;
use crate::grid_config::{GridConfig, VariableId};
use crate::settings::Propagation;
use crate::word_list::WordList;

/// An ordered pair of variables whose shared cell needs to be checked.
pub type Arc = (VariableId, VariableId);

/// Result from a call to `establish_arc_consistency` that left every domain non-empty.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ArcConsistencySuccess {
    pub revisions: usize,
    pub eliminations: usize,
}

/// Result from a call to `establish_arc_consistency` that emptied a domain, which proves the
/// puzzle has no solution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArcConsistencyFailure {
    pub exhausted_variable_id: VariableId,
    pub revisions: usize,
    pub eliminations: usize,
}

/// Result from a call to `establish_arc_consistency`.
pub type ArcConsistencyResult = Result<ArcConsistencySuccess, ArcConsistencyFailure>;

/// Work list of arcs waiting to be revised. An arc is never queued twice at the same time.
#[derive(Debug, Default)]
struct ArcQueue {
    queue: VecDeque<Arc>,
    pending: HashSet<Arc>,
}

impl ArcQueue {
    fn with_initial_arcs<Arcs>(arcs: Arcs) -> ArcQueue
    where
        Arcs: IntoIterator<Item = Arc>,
    {
        let mut queue = ArcQueue::default();
        for arc in arcs {
            queue.enqueue(arc);
        }
        queue
    }

    fn enqueue(&mut self, arc: Arc) {
        if self.pending.insert(arc) {
            self.queue.push_back(arc);
        }
    }

    fn pop_front(&mut self) -> Option<Arc> {
        let arc = self.queue.pop_front()?;
        self.pending.remove(&arc);
        Some(arc)
    }
}

/// Every ordered pair of crossing variables, in ascending order.
pub fn all_arcs(grid_config: &GridConfig) -> Vec<Arc> {
    (0..grid_config.variable_count())
        .flat_map(|x| grid_config.neighbors(x).iter().map(move |&y| (x, y)))
        .collect()
}

/// Remove the options of `x` that don't agree with any option of `y` in the cell they share, and
/// return how many were removed. Variables that don't cross are left alone.
fn revise_impl(
    grid_config: &GridConfig,
    word_list: &WordList,
    domains: &mut Domains,
    x: VariableId,
    y: VariableId,
) -> usize {
    let overlap = match grid_config.overlap(x, y) {
        Some(overlap) => overlap,
        None => return 0,
    };

    // Rather than comparing every pair of options, collect the letters `y` can still place in the
    // shared cell and check each option of `x` against those.
    let y_letters = domains.letter_counts(word_list, y, overlap.second);

    let removed = domains.retain(x, |word_id| {
        word_list
            .word(word_id)
            .chars
            .get(overlap.first)
            .map_or(false, |letter| y_letters.contains_key(letter))
    });

    if removed > 0 {
        trace!(
            target: "arc_consistency",
            "Revised {} against {}: removed {}, {} left",
            grid_config.variable(x),
            grid_config.variable(y),
            removed,
            domains.option_count(x),
        );
    }

    removed
}

/// Make `x` arc-consistent with `y`. Returns true if any option was removed from `x`.
pub fn revise(
    grid_config: &GridConfig,
    word_list: &WordList,
    domains: &mut Domains,
    x: VariableId,
    y: VariableId,
) -> bool {
    revise_impl(grid_config, word_list, domains, x, y) > 0
}

/// Run AC-3 over `domains`, starting from `initial_arcs` (or every arc in the grid if `None`).
/// Fails as soon as any domain is emptied.
pub fn establish_arc_consistency(
    grid_config: &GridConfig,
    word_list: &WordList,
    domains: &mut Domains,
    initial_arcs: Option<Vec<Arc>>,
    propagation: Propagation,
) -> ArcConsistencyResult {
    let initial_arcs = initial_arcs.unwrap_or_else(|| all_arcs(grid_config));
    let mut queue = ArcQueue::with_initial_arcs(initial_arcs);

    let mut revisions = 0;
    let mut eliminations = 0;

    while let Some((x, y)) = queue.pop_front() {
        revisions += 1;

        let removed = revise_impl(grid_config, word_list, domains, x, y);
        if removed == 0 {
            continue;
        }
        eliminations += removed;

        if domains.is_exhausted(x) {
            debug!(
                "Arc consistency emptied the domain of {} after {} revisions",
                grid_config.variable(x),
                revisions,
            );
            return Err(ArcConsistencyFailure { exhausted_variable_id: x, revisions, eliminations });
        }

        if propagation == Propagation::Full {
            for &z in grid_config.neighbors(x) {
                if z != y {
                    queue.enqueue((z, x));
                }
            }
        }
    }

    debug!("Arc consistency removed {} options in {} revisions", eliminations, revisions);

    Ok(ArcConsistencySuccess { revisions, eliminations })
}

/// Check that every option of every variable is supported by some option of each crossing
/// variable.
pub fn is_arc_consistent(grid_config: &GridConfig, word_list: &WordList, domains: &Domains) -> bool {
    all_arcs(grid_config).into_iter().all(|(x, y)| {
        let Some(overlap) = grid_config.overlap(x, y) else {
            return true;
        };
        let y_letters = domains.letter_counts(word_list, y, overlap.second);

        domains.options(x).iter().all(|word_id| {
            word_list
                .word(word_id)
                .chars
                .get(overlap.first)
                .map_or(false, |letter| y_letters.contains_key(letter))
        })
    })
}

#[cfg(test)]
mod tests {
    use crate::arc_consistency::{
        all_arcs, establish_arc_consistency, is_arc_consistent, revise, ArcConsistencySuccess,
    };
    use crate::domain::Domains;
    use crate::grid_config::GridConfig;
    use crate::settings::Propagation;
    use crate::test_utils::{all_solutions, crossing_pair, interlocked_block, single_slot, words};
    use crate::word_list::WordList;

    fn node_consistent_domains(grid_config: &GridConfig, word_list: &WordList) -> Domains {
        let mut domains = Domains::new(grid_config, word_list);
        domains.enforce_node_consistency(grid_config, word_list);
        domains
    }

    #[test]
    fn test_revise_removes_unsupported_options() {
        let grid_config = crossing_pair();
        let word_list = words(&["cat", "car", "art", "ten"]);
        let mut domains = node_consistent_domains(&grid_config, &word_list);

        // The across entry's middle letter has to start the down entry.
        assert!(revise(&grid_config, &word_list, &mut domains, 0, 1));
        assert_eq!(domains.words(&word_list, 0).collect::<Vec<_>>(), vec!["CAR", "CAT"]);

        assert!(!revise(&grid_config, &word_list, &mut domains, 0, 1));
    }

    #[test]
    fn test_revise_without_overlap_is_a_no_op() {
        let grid_config = GridConfig::from_template_string("###\n   \n###").unwrap();
        let word_list = words(&["cat", "dog"]);
        let mut domains = node_consistent_domains(&grid_config, &word_list);

        assert!(all_arcs(&grid_config).is_empty());
        assert!(!revise(&grid_config, &word_list, &mut domains, 0, 1));
        assert_eq!(domains.option_count(0), 2);
    }

    #[test]
    fn test_arc_consistency_invariant_holds_after_success() {
        let grid_config = interlocked_block();
        let word_list = words(&["at", "to", "on", "no", "it", "ox", "go", "so"]);
        let mut domains = node_consistent_domains(&grid_config, &word_list);

        let result =
            establish_arc_consistency(&grid_config, &word_list, &mut domains, None, Propagation::Full);

        assert!(result.is_ok());
        assert!(is_arc_consistent(&grid_config, &word_list, &domains));
        for variable_id in 0..grid_config.variable_count() {
            assert!(!domains.is_exhausted(variable_id));
        }
    }

    #[test]
    fn test_wipeout_fails() {
        let grid_config = crossing_pair();
        let word_list = words(&["cat", "dog"]);
        let mut domains = node_consistent_domains(&grid_config, &word_list);

        let failure =
            establish_arc_consistency(&grid_config, &word_list, &mut domains, None, Propagation::Full)
                .unwrap_err();

        assert!(domains.is_exhausted(failure.exhausted_variable_id));
    }

    #[test]
    fn test_rerunning_is_idempotent() {
        let grid_config = interlocked_block();
        let word_list = words(&["at", "to", "on", "no", "it", "ox", "go", "so", "an"]);
        let mut domains = node_consistent_domains(&grid_config, &word_list);

        establish_arc_consistency(&grid_config, &word_list, &mut domains, None, Propagation::Full)
            .unwrap();
        let settled = domains.clone();

        let second =
            establish_arc_consistency(&grid_config, &word_list, &mut domains, None, Propagation::Full)
                .unwrap();

        assert_eq!(second.eliminations, 0);
        assert_eq!(domains, settled);
    }

    #[test]
    fn test_isolated_variable_is_untouched() {
        let grid_config = single_slot(3);
        let word_list = words(&["cat", "dog"]);
        let mut domains = node_consistent_domains(&grid_config, &word_list);

        let result =
            establish_arc_consistency(&grid_config, &word_list, &mut domains, None, Propagation::Full);

        assert_eq!(result, Ok(ArcConsistencySuccess { revisions: 0, eliminations: 0 }));
        assert_eq!(domains.option_count(0), 2);
    }

    /// Propagating each arc once is strictly weaker than AC-3 with requeueing: here the down
    /// entry only loses FOX after the across entry at the top has already been revised against
    /// it, so without requeueing the top entry keeps DEF even though nothing supports it any more.
    ///
    ///  ###
    ///    #
    ///    ###
    #[test]
    fn test_single_pass_is_weaker_than_requeueing() {
        let grid_config = GridConfig::from_template_string("###  \n  #  \n  ###").unwrap();
        let word_list = words(&["abc", "cat", "def", "fox", "pit", "tan"]);

        let mut full = node_consistent_domains(&grid_config, &word_list);
        establish_arc_consistency(&grid_config, &word_list, &mut full, None, Propagation::Full)
            .unwrap();

        assert!(is_arc_consistent(&grid_config, &word_list, &full));
        assert_eq!(full.words(&word_list, 0).collect::<Vec<_>>(), vec!["ABC"]);
        assert_eq!(full.words(&word_list, 1).collect::<Vec<_>>(), vec!["CAT"]);
        assert_eq!(full.words(&word_list, 2).collect::<Vec<_>>(), vec!["TAN"]);

        let mut single_pass = node_consistent_domains(&grid_config, &word_list);
        establish_arc_consistency(&grid_config, &word_list, &mut single_pass, None, Propagation::SinglePass)
            .unwrap();

        assert!(!is_arc_consistent(&grid_config, &word_list, &single_pass));
        assert_eq!(
            single_pass.words(&word_list, 0).collect::<Vec<_>>(),
            vec!["ABC", "CAT", "DEF", "PIT"]
        );
    }

    /// Arc consistency must never remove an option that's part of a real solution, so whenever it
    /// reports a wipeout there can't be any solution at all.
    #[test]
    fn test_pruning_is_sound_against_brute_force() {
        let vocabularies: &[&[&str]] = &[
            &["cat", "car", "art", "ten"],
            &["cat", "dog"],
            &["abc", "bcd", "cde", "ace", "bed", "dab"],
            &["at", "to", "on", "no", "it", "ox", "go", "so"],
            &["ab", "ba", "aa"],
            &["ab", "bc", "ca"],
        ];
        let grids = [crossing_pair(), interlocked_block()];

        for grid_config in &grids {
            for vocabulary in vocabularies {
                let word_list = words(vocabulary);
                let solutions = all_solutions(grid_config, &word_list);
                let mut domains = node_consistent_domains(grid_config, &word_list);

                let result = establish_arc_consistency(
                    grid_config,
                    &word_list,
                    &mut domains,
                    None,
                    Propagation::Full,
                );

                if result.is_err() {
                    assert!(solutions.is_empty(), "wipeout with a solution for {:?}", vocabulary);
                }
                for solution in &solutions {
                    for (variable_id, &word_id) in solution.iter().enumerate() {
                        if result.is_ok() {
                            assert!(domains.contains(variable_id, word_id));
                        }
                    }
                }
            }
        }
    }
}
