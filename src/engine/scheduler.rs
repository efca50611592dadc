use crate::model::*;

// ── Exact DP over (day, remaining budget, previous break) ─────────

/// Relative tolerance for objective comparisons. Values are sums of
/// integers and integer multiples of the weight, so anything closer than
/// this is the same value reached in a different summation order.
const REL_EPS: f64 = 1e-9;

/// Lexicographic score of a suffix plan:
/// objective value, then fewer leave days, then more anchored leave days.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Score {
    value: f64,
    leave: u32,
    anchored: u32,
}

impl Score {
    const ZERO: Score = Score {
        value: 0.0,
        leave: 0,
        anchored: 0,
    };

    /// Strictly preferable to `other`. Equal scores return false, which is
    /// what makes "skip leave on a tie" the default.
    fn beats(&self, other: &Score) -> bool {
        let tol = REL_EPS * self.value.abs().max(other.value.abs()).max(1.0);
        if self.value > other.value + tol {
            return true;
        }
        if other.value > self.value + tol {
            return false;
        }
        if self.leave != other.leave {
            return self.leave < other.leave;
        }
        self.anchored > other.anchored
    }
}

/// `V(i, b, prev)` for `i in 0..=n`, `b in 0..=budget`.
struct Table {
    width: usize,
    cells: Vec<Score>,
}

impl Table {
    fn new(n: usize, budget: usize) -> Self {
        let width = budget + 1;
        Self {
            width,
            cells: vec![Score::ZERO; (n + 1) * width * 2],
        }
    }

    #[inline]
    fn idx(&self, i: usize, b: usize, prev: bool) -> usize {
        (i * self.width + b) * 2 + prev as usize
    }

    #[inline]
    fn get(&self, i: usize, b: usize, prev: bool) -> Score {
        self.cells[self.idx(i, b, prev)]
    }

    #[inline]
    fn set(&mut self, i: usize, b: usize, prev: bool, score: Score) {
        let k = self.idx(i, b, prev);
        self.cells[k] = score;
    }
}

struct Solver<'a> {
    days: &'a [Day],
    /// Free day whose neighbour is a fixed break day.
    anchored: Vec<bool>,
    weight: f64,
    table: Table,
}

impl<'a> Solver<'a> {
    fn new(days: &'a [Day], budget: usize, weight: f64) -> Self {
        let anchored = days
            .iter()
            .enumerate()
            .map(|(i, day)| {
                day.is_free()
                    && ((i > 0 && days[i - 1].fixed_break())
                        || days.get(i + 1).is_some_and(|next| next.fixed_break()))
            })
            .collect();
        Self {
            days,
            anchored,
            weight,
            table: Table::new(days.len(), budget),
        }
    }

    /// Outcome of taking action `leave` on day `i` in state `(b, prev)`:
    /// the total suffix score, the break flag, and the budget left after.
    fn step(&self, i: usize, b: usize, prev: bool, leave: bool) -> (Score, bool, usize) {
        let day = &self.days[i];
        let is_break = day.fixed_break() || leave;
        let spends = day.is_free() && leave;
        let next_b = if spends { b - 1 } else { b };

        let rest = self.table.get(i + 1, next_b, is_break);
        let mut gain = 0.0;
        if is_break {
            gain += 1.0;
            if prev {
                gain += self.weight;
            }
        }
        let score = Score {
            value: rest.value + gain,
            leave: rest.leave + spends as u32,
            anchored: rest.anchored + (spends && self.anchored[i]) as u32,
        };
        (score, is_break, next_b)
    }

    /// Best action on day `i`. Leave on a free day is taken only when it
    /// strictly beats skipping it.
    fn choose(&self, i: usize, b: usize, prev: bool) -> (Score, bool, bool, usize) {
        let day = &self.days[i];
        if !day.is_free() {
            let leave = day.forced_leave();
            let (score, is_break, next_b) = self.step(i, b, prev, leave);
            return (score, leave, is_break, next_b);
        }
        let (skip, skip_break, skip_b) = self.step(i, b, prev, false);
        if b >= 1 {
            let (take, take_break, take_b) = self.step(i, b, prev, true);
            if take.beats(&skip) {
                return (take, true, take_break, take_b);
            }
        }
        (skip, false, skip_break, skip_b)
    }

    fn fill(&mut self) {
        let n = self.days.len();
        let width = self.table.width;
        for i in (0..n).rev() {
            for b in 0..width {
                for prev in [false, true] {
                    let (score, ..) = self.choose(i, b, prev);
                    self.table.set(i, b, prev, score);
                }
            }
        }
    }

    fn reconstruct(&self) -> Vec<DayAssignment> {
        let mut b = self.table.width - 1;
        let mut prev = false;
        let mut out = Vec::with_capacity(self.days.len());
        for (i, day) in self.days.iter().enumerate() {
            let (_, is_leave, is_break, next_b) = self.choose(i, b, prev);
            out.push(DayAssignment {
                date: day.date,
                category: day.category,
                is_leave,
                is_break,
            });
            b = next_b;
            prev = is_break;
        }
        out
    }
}

/// Exact optimal assignment for classified `days`.
///
/// `free_budget` is the leave left after pre-booked days have been paid
/// for; it is capped at the number of workdays since extra budget can never
/// be spent. Runs in `O(days × budget)` time and space.
pub fn schedule(days: &[Day], free_budget: usize, weight: f64) -> Assignment {
    let workdays = days.iter().filter(|d| d.is_free()).count();
    let budget = free_budget.min(workdays);

    let mut solver = Solver::new(days, budget, weight);
    solver.fill();
    let assigned = solver.reconstruct();
    let objective = if days.is_empty() {
        0.0
    } else {
        solver.table.get(0, budget, false).value
    };

    tracing::debug!(
        "scheduled {} days ({workdays} free) with budget {budget}, weight {weight}: objective {objective}",
        days.len()
    );

    Assignment {
        days: assigned,
        objective,
    }
}

/// Score an arbitrary assignment with the scheduler's objective.
pub fn objective(days: &[DayAssignment], weight: f64) -> f64 {
    let breaks = days.iter().filter(|d| d.is_break).count() as f64;
    let pairs = days
        .windows(2)
        .filter(|w| w[0].is_break && w[1].is_break)
        .count() as f64;
    breaks + weight * pairs
}
