//! Time conflict detection between habits scheduled on the same date.
//!
//! Two windows conflict when they overlap as half-open intervals, so a habit
//! ending at 08:00 and another starting at 08:00 do not conflict. Conflicts
//! are grouped transitively: if A overlaps B and B overlaps C, all three land
//! in one [`ConflictGroup`].

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::habit::Habit;
use super::time::{TimeOfDay, TimeWindow};

/// How conflicting habits are grouped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictGrouping {
    /// Connected components of pairwise window overlap
    #[default]
    Overlap,
    /// Habits whose windows start at the same minute (legacy behaviour)
    StartTime,
}

/// A habit taking part in a conflict, with its window on the checked date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConflictMember {
    pub habit_id: String,
    pub habit_name: String,
    pub window: TimeWindow,
}

/// A set of habits whose windows conflict on one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConflictGroup {
    pub date: NaiveDate,
    /// Members in the order the habits were supplied
    pub members: Vec<ConflictMember>,
}

impl ConflictGroup {
    pub fn habit_ids(&self) -> Vec<&str> {
        self.members.iter().map(|m| m.habit_id.as_str()).collect()
    }

    pub fn contains(&self, habit_id: &str) -> bool {
        self.members.iter().any(|m| m.habit_id == habit_id)
    }

    /// Earliest start among the members.
    pub fn earliest_start(&self) -> Option<TimeOfDay> {
        self.members.iter().map(|m| m.window.start()).min()
    }
}

/// Detector for conflicting habit windows.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConflictDetector {
    grouping: ConflictGrouping,
}

struct Candidate<'a> {
    index: usize,
    habit: &'a Habit,
    window: TimeWindow,
}

impl ConflictDetector {
    /// Create a detector using pairwise overlap grouping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the grouping strategy
    pub fn with_grouping(mut self, grouping: ConflictGrouping) -> Self {
        self.grouping = grouping;
        self
    }

    pub fn grouping(&self) -> ConflictGrouping {
        self.grouping
    }

    /// Find groups of habits whose windows conflict on `date`.
    ///
    /// Habits not scheduled on `date` are ignored. Groups are ordered by their
    /// earliest start, then by the position of their first member.
    pub fn find_conflicts(&self, habits: &[Habit], date: NaiveDate) -> Vec<ConflictGroup> {
        let candidates: Vec<Candidate<'_>> = habits
            .iter()
            .enumerate()
            .filter_map(|(index, habit)| {
                habit
                    .time_window_on(date)
                    .map(|window| Candidate { index, habit, window })
            })
            .collect();

        let components = match self.grouping {
            ConflictGrouping::Overlap => overlap_components(&candidates),
            ConflictGrouping::StartTime => start_time_components(&candidates),
        };

        let mut groups: Vec<ConflictGroup> = components
            .into_iter()
            .filter(|component| component.len() > 1)
            .map(|component| ConflictGroup {
                date,
                members: component
                    .into_iter()
                    .map(|pos| {
                        let candidate = &candidates[pos];
                        ConflictMember {
                            habit_id: candidate.habit.id.clone(),
                            habit_name: candidate.habit.name.clone(),
                            window: candidate.window,
                        }
                    })
                    .collect(),
            })
            .collect();

        groups.sort_by_key(|group| group.earliest_start());

        debug!(
            %date,
            grouping = ?self.grouping,
            scheduled = candidates.len(),
            groups = groups.len(),
            "conflict scan finished"
        );
        groups
    }
}

/// Convenience function to find conflicts with default settings
pub fn find_conflicts(habits: &[Habit], date: NaiveDate) -> Vec<ConflictGroup> {
    ConflictDetector::new().find_conflicts(habits, date)
}

/// Components as lists of candidate positions, each sorted by input order,
/// components ordered by their first member.
fn overlap_components(candidates: &[Candidate<'_>]) -> Vec<Vec<usize>> {
    let mut sets = DisjointSet::new(candidates.len());
    for (i, a) in candidates.iter().enumerate() {
        for (j, b) in candidates.iter().enumerate().skip(i + 1) {
            if a.window.overlaps(&b.window) {
                sets.union(i, j);
            }
        }
    }

    let mut by_root: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for pos in 0..candidates.len() {
        by_root.entry(sets.find(pos)).or_default().push(pos);
    }
    let mut components: Vec<Vec<usize>> = by_root.into_values().collect();
    components.sort_by_key(|component| candidates[component[0]].index);
    components
}

fn start_time_components(candidates: &[Candidate<'_>]) -> Vec<Vec<usize>> {
    let mut by_start: BTreeMap<TimeOfDay, Vec<usize>> = BTreeMap::new();
    for (pos, candidate) in candidates.iter().enumerate() {
        by_start.entry(candidate.window.start()).or_default().push(pos);
    }
    by_start.into_values().collect()
}

struct DisjointSet {
    parent: Vec<usize>,
}

impl DisjointSet {
    fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
        }
    }

    fn find(&mut self, mut node: usize) -> usize {
        while self.parent[node] != node {
            self.parent[node] = self.parent[self.parent[node]];
            node = self.parent[node];
        }
        node
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            // Keep the smaller index as root so component order is stable.
            let (root, child) = if ra < rb { (ra, rb) } else { (rb, ra) };
            self.parent[child] = root;
        }
    }
}
