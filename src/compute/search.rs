//! Stochastic local search over an abstract solution type.
//!
//! All strategies minimise: the objective returns a dissimilarity score and
//! lower is better. Randomness is never drawn from ambient state; every
//! strategy takes the random source explicitly and hands it to the
//! solution generators, so a seeded source reproduces a run exactly.
//!
//! Solutions are treated as values. Generators must return fresh solutions
//! rather than mutating their input, which lets the engine keep the
//! incumbent without copying it.

use rand::Rng;

use crate::schema::SearchAlgorithm;

/// Counters collected while a search runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Objective calls, including the one that scores the seed solution.
    pub evaluations: usize,
    /// Candidates that replaced the incumbent.
    pub accepted: usize,
    /// Fresh solutions drawn because a neighborhood was exhausted.
    pub restarts: usize,
}

/// Best solution found by [`run_search`], with its score and counters.
#[derive(Debug, Clone)]
pub struct SearchOutcome<S> {
    pub score: f64,
    pub solution: S,
    pub stats: SearchStats,
}

/// Draw `iterations` independent solutions and keep the best.
///
/// The incumbent is `initial_solution` when given, otherwise one extra draw.
/// A candidate only replaces the incumbent when strictly better.
pub fn random_search<S, R, O, G>(
    rng: &mut R,
    objective: O,
    new_solution: G,
    iterations: usize,
    initial_solution: Option<S>,
) -> (f64, S)
where
    R: Rng + ?Sized,
    O: FnMut(&S) -> f64,
    G: FnMut(&mut R) -> S,
{
    random_search_tracked(
        rng,
        objective,
        new_solution,
        iterations,
        initial_solution,
        &mut SearchStats::default(),
    )
}

/// Hill climbing from `initial_solution`.
///
/// Runs `evaluations - 1` neighbor steps. A neighbor is accepted when its
/// score is less than or equal to the incumbent's, so the search can drift
/// across plateaus. The seed solution is always scored once, even when
/// `evaluations` is 0.
pub fn hill_climbing<S, R, O, N>(
    rng: &mut R,
    objective: O,
    neighbor: N,
    evaluations: usize,
    initial_solution: S,
) -> (f64, S)
where
    R: Rng + ?Sized,
    O: FnMut(&S) -> f64,
    N: FnMut(&mut R, &S) -> S,
{
    hill_climbing_tracked(
        rng,
        objective,
        neighbor,
        evaluations,
        initial_solution,
        &mut SearchStats::default(),
    )
}

/// Hill climbing with a stagnation counter and random restarts.
///
/// `neighbours_explored` counts neighbor steps since the last accepted move
/// or restart. Once it reaches `neighborhood_size` the next candidate is a
/// fresh `new_solution` instead of a neighbor of the incumbent. Any accepted
/// move (ties included) resets the counter.
pub fn hill_climbing_with_restarts<S, R, O, N, G>(
    rng: &mut R,
    objective: O,
    neighbor: N,
    evaluations: usize,
    neighborhood_size: usize,
    new_solution: G,
    initial_solution: Option<S>,
) -> (f64, S)
where
    R: Rng + ?Sized,
    O: FnMut(&S) -> f64,
    N: FnMut(&mut R, &S) -> S,
    G: FnMut(&mut R) -> S,
{
    hill_climbing_with_restarts_tracked(
        rng,
        objective,
        neighbor,
        evaluations,
        neighborhood_size,
        new_solution,
        initial_solution,
        &mut SearchStats::default(),
    )
}

/// Run the selected strategy under a total budget of `evaluations`
/// objective calls and report counters alongside the result.
///
/// Every strategy starts from a fresh `new_solution`. Random search spends
/// one evaluation on that seed and `evaluations - 1` on further draws, so
/// all three strategies consume the same budget.
pub fn run_search<S, R, O, N, G>(
    algorithm: SearchAlgorithm,
    rng: &mut R,
    objective: O,
    neighbor: N,
    mut new_solution: G,
    evaluations: usize,
    neighborhood_size: usize,
) -> SearchOutcome<S>
where
    R: Rng + ?Sized,
    O: FnMut(&S) -> f64,
    N: FnMut(&mut R, &S) -> S,
    G: FnMut(&mut R) -> S,
{
    let mut stats = SearchStats::default();
    let (score, solution) = match algorithm {
        SearchAlgorithm::RandomSearch => random_search_tracked(
            rng,
            objective,
            new_solution,
            evaluations.saturating_sub(1),
            None,
            &mut stats,
        ),
        SearchAlgorithm::HillClimbing => {
            let initial = new_solution(rng);
            hill_climbing_tracked(rng, objective, neighbor, evaluations, initial, &mut stats)
        }
        SearchAlgorithm::HillClimbingWithRestarts => hill_climbing_with_restarts_tracked(
            rng,
            objective,
            neighbor,
            evaluations,
            neighborhood_size,
            new_solution,
            None,
            &mut stats,
        ),
    };

    log::debug!(
        "{:?} finished: score={:.4}, evaluations={}, accepted={}, restarts={}",
        algorithm,
        score,
        stats.evaluations,
        stats.accepted,
        stats.restarts
    );

    SearchOutcome {
        score,
        solution,
        stats,
    }
}

fn random_search_tracked<S, R, O, G>(
    rng: &mut R,
    mut objective: O,
    mut new_solution: G,
    iterations: usize,
    initial_solution: Option<S>,
    stats: &mut SearchStats,
) -> (f64, S)
where
    R: Rng + ?Sized,
    O: FnMut(&S) -> f64,
    G: FnMut(&mut R) -> S,
{
    let mut best_solution = initial_solution.unwrap_or_else(|| new_solution(rng));
    let mut best_score = objective(&best_solution);
    stats.evaluations += 1;

    for _ in 0..iterations {
        let candidate = new_solution(rng);
        let score = objective(&candidate);
        stats.evaluations += 1;

        if score < best_score {
            log::trace!("random search: {:.4} -> {:.4}", best_score, score);
            best_score = score;
            best_solution = candidate;
            stats.accepted += 1;
        }
    }

    (best_score, best_solution)
}

fn hill_climbing_tracked<S, R, O, N>(
    rng: &mut R,
    mut objective: O,
    mut neighbor: N,
    evaluations: usize,
    initial_solution: S,
    stats: &mut SearchStats,
) -> (f64, S)
where
    R: Rng + ?Sized,
    O: FnMut(&S) -> f64,
    N: FnMut(&mut R, &S) -> S,
{
    let mut best_solution = initial_solution;
    let mut best_score = objective(&best_solution);
    stats.evaluations += 1;

    for _ in 1..evaluations {
        let candidate = neighbor(rng, &best_solution);
        let score = objective(&candidate);
        stats.evaluations += 1;

        if score <= best_score {
            log::trace!("hill climbing: {:.4} -> {:.4}", best_score, score);
            best_score = score;
            best_solution = candidate;
            stats.accepted += 1;
        }
    }

    (best_score, best_solution)
}

#[allow(clippy::too_many_arguments)]
fn hill_climbing_with_restarts_tracked<S, R, O, N, G>(
    rng: &mut R,
    mut objective: O,
    mut neighbor: N,
    evaluations: usize,
    neighborhood_size: usize,
    mut new_solution: G,
    initial_solution: Option<S>,
    stats: &mut SearchStats,
) -> (f64, S)
where
    R: Rng + ?Sized,
    O: FnMut(&S) -> f64,
    N: FnMut(&mut R, &S) -> S,
    G: FnMut(&mut R) -> S,
{
    let mut best_solution = initial_solution.unwrap_or_else(|| new_solution(rng));
    let mut best_score = objective(&best_solution);
    stats.evaluations += 1;

    let mut neighbours_explored = 0usize;
    for step in 1..evaluations {
        let candidate = if neighbours_explored >= neighborhood_size {
            log::debug!(
                "neighborhood exhausted after {} probes at step {}, restarting",
                neighbours_explored,
                step
            );
            neighbours_explored = 0;
            stats.restarts += 1;
            new_solution(rng)
        } else {
            neighbours_explored += 1;
            neighbor(rng, &best_solution)
        };

        let score = objective(&candidate);
        stats.evaluations += 1;

        if score <= best_score {
            log::trace!("step {}: {:.4} -> {:.4}", step, best_score, score);
            best_score = score;
            best_solution = candidate;
            neighbours_explored = 0;
            stats.accepted += 1;
        }
    }

    (best_score, best_solution)
}
